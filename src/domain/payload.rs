//! Payload capability: what the genealogy needs from the entities it stores.

use std::fmt::Debug;
use std::hash::Hash;

/// Boxed error returned by a failing payload constructor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Caller-supplied entity stored in a genealogy node.
///
/// A payload is identified by an immutable id and is built from that id
/// alone. The container never mutates or clones a payload; it only shares it
/// behind an `Rc` between the index and the child sets of its parents.
pub trait Payload: Sized {
    /// Totally ordered, hashable value identifying a payload.
    type Id: Clone + Ord + Hash + Debug;

    /// Build the payload for `id`.
    ///
    /// Failing here is allowed; the genealogy reports it as
    /// [`GenealogyError::Payload`](crate::GenealogyError::Payload) and stays unchanged.
    fn from_id(id: Self::Id) -> Result<Self, BoxError>;

    fn id(&self) -> &Self::Id;
}
