//! Domain types used by the parsers and the client.
//!
//! This module defines:
//!
//! - ordered field maps for series keys and attributes (`FieldMap`)
//! - coerced periods, observations and flat output rows (`Period`, `FlatRecord`)
//! - metadata triples and the structure resource catalogue (`MetadataEntry`, `StructureResource`)

pub mod resource;
pub mod types;

pub use resource::*;
pub use types::*;
