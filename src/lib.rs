//! `sdw-client` library crate.
//!
//! Retrieves time series and structural metadata from a central-bank
//! statistical data warehouse speaking SDMX-ML over REST, and flattens the
//! XML responses into rectangular records:
//!
//! - `parse` turns generic-data messages into one [`FlatRecord`] per
//!   observation and structure messages into [`MetadataEntry`] triples
//! - `frequency` coerces raw periods according to the series frequency
//! - `client` validates arguments, performs the HTTP call and runs the parsers
//!
//! ```no_run
//! use sdw_client::{SdwClient, SeriesQuery};
//!
//! let client = SdwClient::from_env()?;
//! let records = client.fetch_series(
//!     &SeriesQuery::new("EXR")
//!         .key("D.USD.EUR.SP00.A")
//!         .start_period("2021-01-01"),
//! )?;
//! for r in &records {
//!     println!("{} {} {:?}", r.date, r.key, r.value);
//! }
//! # Ok::<(), sdw_client::SdwError>(())
//! ```

pub mod client;
pub mod domain;
pub mod error;
pub mod frequency;
pub mod parse;
pub mod xml;

pub use client::{ClientConfig, HttpFetcher, QueryParams, ResourceFetcher, SdwClient, SeriesQuery};
pub use domain::{FieldMap, FlatRecord, MetadataEntry, Observation, Period, StructureResource};
pub use error::{Result, SdwError};
pub use frequency::Frequency;
pub use parse::{column_names, parse_metadata, parse_observations};
pub use xml::{ElementSelector, XmlDocument, XmlElement};
