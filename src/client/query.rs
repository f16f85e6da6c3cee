//! Caller-supplied query parameters, their validation, and the REST paths
//! they map to.

use crate::client::fetcher::QueryParams;
use crate::domain::StructureResource;
use crate::error::{Result, SdwError};

/// Wildcard used for omitted path segments.
const ALL: &str = "all";

/// A request for observation data of one data flow.
///
/// ```
/// use sdw_client::SeriesQuery;
///
/// let query = SeriesQuery::new("EXR")
///     .key("D.USD.EUR.SP00.A")
///     .start_period("2021-01-01")
///     .last_n_observations(10);
/// assert_eq!(query.resource_path(), "data/EXR/D.USD.EUR.SP00.A");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesQuery {
    pub flow: String,
    /// Series key, possibly with wildcards (`D..EUR.SP00.A`); `None` means all series.
    pub key: Option<String>,
    pub start_period: Option<String>,
    pub end_period: Option<String>,
    pub first_n_observations: Option<u32>,
    pub last_n_observations: Option<u32>,
}

impl SeriesQuery {
    pub fn new(flow: impl Into<String>) -> Self {
        Self {
            flow: flow.into(),
            ..Self::default()
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn start_period(mut self, period: impl Into<String>) -> Self {
        self.start_period = Some(period.into());
        self
    }

    pub fn end_period(mut self, period: impl Into<String>) -> Self {
        self.end_period = Some(period.into());
        self
    }

    pub fn first_n_observations(mut self, n: u32) -> Self {
        self.first_n_observations = Some(n);
        self
    }

    pub fn last_n_observations(mut self, n: u32) -> Self {
        self.last_n_observations = Some(n);
        self
    }

    /// Reject malformed arguments before anything goes over the wire.
    pub fn validate(&self) -> Result<()> {
        check_segment("flow", &self.flow)?;
        if let Some(key) = &self.key {
            check_segment("key", key)?;
        }
        if let Some(start) = &self.start_period {
            check_value("startPeriod", start)?;
        }
        if let Some(end) = &self.end_period {
            check_value("endPeriod", end)?;
        }
        check_count("firstNObservations", self.first_n_observations)?;
        check_count("lastNObservations", self.last_n_observations)?;
        Ok(())
    }

    /// `data/{flow}/{key|all}`
    pub fn resource_path(&self) -> String {
        format!(
            "data/{}/{}",
            self.flow,
            self.key.as_deref().unwrap_or(ALL)
        )
    }

    pub fn query_params(&self) -> QueryParams {
        QueryParams::new()
            .with("startPeriod", self.start_period.as_deref())
            .with("endPeriod", self.end_period.as_deref())
            .with("firstNObservations", self.first_n_observations)
            .with("lastNObservations", self.last_n_observations)
    }
}

/// `{resource}/{agency|all}/{id|all}`, validating the optional segments.
pub fn structure_path(
    resource: StructureResource,
    agency: Option<&str>,
    id: Option<&str>,
) -> Result<String> {
    if let Some(agency) = agency {
        check_segment("agency", agency)?;
    }
    if let Some(id) = id {
        check_segment("id", id)?;
    }
    Ok(format!(
        "{}/{}/{}",
        resource.path_segment(),
        agency.unwrap_or(ALL),
        id.unwrap_or(ALL)
    ))
}

fn check_value(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SdwError::validation(format!("{name} must not be empty.")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(SdwError::validation(format!(
            "{name} '{value}' must not contain whitespace."
        )));
    }
    Ok(())
}

fn check_segment(name: &str, value: &str) -> Result<()> {
    check_value(name, value)?;
    if value.contains(['/', '?', '#', '&']) {
        return Err(SdwError::validation(format!(
            "{name} '{value}' contains characters not allowed in a resource path."
        )));
    }
    Ok(())
}

fn check_count(name: &str, value: Option<u32>) -> Result<()> {
    match value {
        Some(0) => Err(SdwError::validation(format!(
            "{name} must be a positive integer."
        ))),
        _ => Ok(()),
    }
}
