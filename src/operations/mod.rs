pub mod complex;
pub mod pair;
