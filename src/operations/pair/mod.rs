mod build_pair;

pub use build_pair::{build_pair, classify, BuildFiltrationPair, FiltrationPair};
