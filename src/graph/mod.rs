//! Team hierarchy graph

mod relationships;

pub use relationships::{RelationshipEdge, RelationshipGraph, Relationships};
