//! Entities shared by every stage of the index: where a name occurs and
//! what kind of occurrence it is.

pub mod location;
pub mod reference;

pub use location::Location;
pub use reference::{Function, Reference, ReferenceKind, Struct, Variable};
