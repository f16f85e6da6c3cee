//! SDMX frequency codes and period coercion.
//!
//! The `FREQ` dimension of a series decides how its raw period strings are
//! turned into typed values:
//!
//! - daily / business: `YYYY-MM-DD` → date
//! - monthly: `YYYY-MM` → date on the 1st of the month
//! - annual: `YYYY` → integer year
//! - anything else: kept as the raw string

use std::fmt;

use chrono::NaiveDate;

use crate::domain::Period;
use crate::error::{Result, SdwError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Frequency {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
    Weekly,
    Daily,
    Business,
    /// Unrecognized code, kept verbatim (it doubles as its own label).
    Other(String),
}

impl Frequency {
    /// Resolve an SDMX `FREQ` code such as `D` or `M`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "A" => Frequency::Annual,
            "S" => Frequency::SemiAnnual,
            "Q" => Frequency::Quarterly,
            "M" => Frequency::Monthly,
            "W" => Frequency::Weekly,
            "D" => Frequency::Daily,
            "B" => Frequency::Business,
            other => Frequency::Other(other.to_string()),
        }
    }

    /// Inverse of [`Frequency::label`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "annual" => Frequency::Annual,
            "semi-annual" => Frequency::SemiAnnual,
            "quarterly" => Frequency::Quarterly,
            "monthly" => Frequency::Monthly,
            "weekly" => Frequency::Weekly,
            "daily" => Frequency::Daily,
            "business" => Frequency::Business,
            other => Frequency::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Frequency::Annual => "A",
            Frequency::SemiAnnual => "S",
            Frequency::Quarterly => "Q",
            Frequency::Monthly => "M",
            Frequency::Weekly => "W",
            Frequency::Daily => "D",
            Frequency::Business => "B",
            Frequency::Other(code) => code,
        }
    }

    /// Canonical label used in output records.
    pub fn label(&self) -> &str {
        match self {
            Frequency::Annual => "annual",
            Frequency::SemiAnnual => "semi-annual",
            Frequency::Quarterly => "quarterly",
            Frequency::Monthly => "monthly",
            Frequency::Weekly => "weekly",
            Frequency::Daily => "daily",
            Frequency::Business => "business",
            Frequency::Other(code) => code,
        }
    }

    /// Coerce a raw `TIME_PERIOD` value according to this frequency.
    pub fn coerce_period(&self, raw: &str) -> Result<Period> {
        match self {
            Frequency::Daily | Frequency::Business => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Period::Date)
                .map_err(|e| {
                    SdwError::parse(format!("Invalid {} period '{raw}': {e}", self.label()))
                }),
            Frequency::Monthly => NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
                .map(Period::Date)
                .map_err(|e| SdwError::parse(format!("Invalid monthly period '{raw}': {e}"))),
            Frequency::Annual => raw
                .parse::<i32>()
                .map(Period::Year)
                .map_err(|e| SdwError::parse(format!("Invalid annual period '{raw}': {e}"))),
            Frequency::SemiAnnual
            | Frequency::Quarterly
            | Frequency::Weekly
            | Frequency::Other(_) => Ok(Period::Raw(raw.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
