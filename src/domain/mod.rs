//! Domain layer: payload capability, node record, identifier index and errors
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod arena;
pub mod error;
pub mod node;
pub mod payload;

pub(crate) use arena::NodeArena;
pub use error::{GenealogyError, GenealogyResult};
pub use node::Node;
pub use payload::{BoxError, Payload};
