//! Just enough JSON-LD: containers, identities, collections, inlining.

mod container;
mod ident;
mod inline;
mod subset;
mod vocab;

pub use container::Graph;
pub use ident::{Minter, is_blank_id, is_persistent_id};
pub use subset::{Subset, SubsetOptions};
pub use vocab::Vocab;
