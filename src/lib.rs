pub mod diagram;
pub mod error;
pub mod export;
pub mod geometry;
pub mod info;
pub mod math;
pub mod operations;
pub mod topology;

pub use error::{Result, TamaError};
