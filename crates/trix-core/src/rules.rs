//! Pure rule predicates and value transforms. Nothing in here owns state.

pub mod contract;
pub mod doubling;
pub mod layout;
pub mod legal;

pub use contract::{ContractId, ContractKind};
pub use layout::{LayoutBoard, SuitProgress};
pub use legal::{comparison_rank, legal_trick_plays, trick_winner};
