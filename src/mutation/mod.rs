//! Mutation engine: creation, edge connection and cascading removal.
//!
//! Each operation validates and builds everything it needs before touching the
//! identifier index. What follows validation only consumes handles resolved
//! earlier and cannot fail.

pub mod creation;
pub mod removal;

pub(crate) use removal::RemovalPlan;
