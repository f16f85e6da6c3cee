//! SDMX-ML response parsers.
//!
//! - generic-data messages → observation records (`observations`)
//! - structure messages → metadata triples (`metadata`)
//!
//! Both work on an already-parsed [`crate::xml::XmlDocument`] and never do I/O.

pub mod metadata;
pub mod observations;

pub use metadata::parse_metadata;
pub use observations::{column_names, parse_observations};
