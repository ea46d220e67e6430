pub mod filtration;
pub mod membership;
pub mod simplex;

pub use filtration::{
    compare_filtration_order, validate_order, Filtration, FiltrationEntry, WeightedSimplex,
};
pub use membership::{Membership, VertexMembership};
pub use simplex::Simplex;
