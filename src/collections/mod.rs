//! Ordered collection types for enumerable vault state

pub mod ordmap;

pub use ordmap::{OrderedMap, OrderedSet};
