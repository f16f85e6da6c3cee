//! Generic-data (`GenericData`) message → flat observation records.
//!
//! Each `Series` carries a `SeriesKey` and an `Attributes` block of
//! `<Value id=".." value=".."/>` pairs plus a list of `Obs`. The records of all
//! series are projected onto one column set:
//!
//! `date, key, value, title, description` + the fields every series has.
//!
//! Fields present in only some series are dropped rather than null-filled.

use tracing::debug;

use crate::domain::{FIXED_COLUMNS, FieldMap, FlatRecord, Observation, Period};
use crate::error::{Result, SdwError};
use crate::frequency::Frequency;
use crate::xml::{ElementSelector, XmlDocument, XmlElement};

const SERIES: ElementSelector = ElementSelector::any_of(&["Series"]);

/// One series after extraction, before column projection.
#[derive(Debug, Clone)]
struct ParsedSeries {
    key: String,
    title: String,
    description: Option<String>,
    /// Key dimensions followed by attributes, excluding title/description.
    fields: FieldMap,
    observations: Vec<Observation>,
}

/// Flatten every series of a generic-data document into records.
pub fn parse_observations(document: &XmlDocument) -> Result<Vec<FlatRecord>> {
    let series = document
        .select(&SERIES)
        .into_iter()
        .map(parse_series)
        .collect::<Result<Vec<_>>>()?;

    let columns = common_columns(&series);

    let mut records = Vec::with_capacity(series.iter().map(|s| s.observations.len()).sum());
    for s in series {
        let fields: FieldMap = columns
            .iter()
            .filter_map(|c| s.fields.get(c).map(|v| (c.clone(), v.to_string())))
            .collect();
        for obs in s.observations {
            records.push(FlatRecord {
                date: obs.period,
                key: s.key.clone(),
                value: obs.value,
                title: s.title.clone(),
                description: s.description.clone(),
                fields: fields.clone(),
            });
        }
    }

    debug!(
        records = records.len(),
        columns = columns.len() + FIXED_COLUMNS.len(),
        "parsed observations"
    );
    Ok(records)
}

/// Shared column list for a set of records (fixed columns first).
pub fn column_names(records: &[FlatRecord]) -> Vec<String> {
    match records.first() {
        Some(record) => record.column_names().into_iter().map(str::to_string).collect(),
        None => FIXED_COLUMNS.iter().map(|c| c.to_string()).collect(),
    }
}

fn parse_series(series: &XmlElement) -> Result<ParsedSeries> {
    let key_block = series
        .child("SeriesKey")
        .ok_or_else(|| SdwError::parse("Series without a SeriesKey element."))?;
    let key_fields = read_values(key_block)?;
    let key = key_fields.values().collect::<Vec<_>>().join(".");

    let mut attributes = match series.child("Attributes") {
        Some(block) => read_values(block).map_err(|e| with_context(e, &key))?,
        None => FieldMap::new(),
    };
    attributes.rename("title_compl", "description");

    let title = attributes
        .remove("title")
        .ok_or_else(|| SdwError::parse(format!("Series {key} has no title attribute.")))?;
    let description = attributes.remove("description");

    let frequency = key_fields.get("freq").map(Frequency::from_code);

    let mut fields = FieldMap::new();
    for (name, value) in key_fields.iter() {
        match (name, &frequency) {
            ("freq", Some(freq)) => fields.insert("frequency", freq.label()),
            _ => fields.insert(name, value),
        }
    }
    for (name, value) in attributes.iter() {
        // Dimension values win over a same-named attribute.
        if fields.contains(name) {
            debug!(series = %key, attribute = name, "attribute shadows a key dimension, skipped");
            continue;
        }
        fields.insert(name, value);
    }

    let mut observations = Vec::new();
    for obs in series.children_named("Obs") {
        // Observations without an ObsValue are not reported at all.
        let Some(value_el) = obs.child("ObsValue") else {
            continue;
        };
        let raw_period = obs
            .child("ObsDimension")
            .and_then(|d| d.attr("value"))
            .ok_or_else(|| {
                SdwError::parse(format!("Series {key}: observation without an ObsDimension value."))
            })?;
        let period = match &frequency {
            Some(freq) => freq
                .coerce_period(raw_period)
                .map_err(|e| with_context(e, &key))?,
            None => Period::Raw(raw_period.to_string()),
        };
        let value = parse_obs_value(value_el.attr("value"))
            .map_err(|e| with_context(e, &format!("{key} @ {raw_period}")))?;
        observations.push(Observation { period, value });
    }

    Ok(ParsedSeries {
        key,
        title,
        description,
        fields,
        observations,
    })
}

/// Read `<Value id=".." value=".."/>` children into a map with lower-cased ids.
fn read_values(block: &XmlElement) -> Result<FieldMap> {
    let mut map = FieldMap::new();
    for value in block.children_named("Value") {
        let id = value.attr("id").ok_or_else(|| {
            SdwError::parse(format!("{} entry without an id attribute.", block.name()))
        })?;
        let v = value.attr("value").ok_or_else(|| {
            SdwError::parse(format!("{} entry '{id}' without a value attribute.", block.name()))
        })?;
        map.insert(id.to_lowercase(), v);
    }
    Ok(map)
}

fn parse_obs_value(raw: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = raw.map(str::trim) else {
        return Ok(None);
    };
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| SdwError::parse(format!("Invalid observation value '{raw}': {e}")))
}

fn common_columns(series: &[ParsedSeries]) -> Vec<String> {
    let Some((first, rest)) = series.split_first() else {
        return Vec::new();
    };

    let mut common = Vec::new();
    let mut dropped = Vec::new();
    for name in first.fields.names() {
        if FIXED_COLUMNS.iter().any(|c| *c == name) {
            continue;
        }
        if rest.iter().all(|s| s.fields.contains(name)) {
            common.push(name.to_string());
        } else {
            dropped.push(name);
        }
    }
    for s in rest {
        for name in s.fields.names() {
            if !first.fields.contains(name) && !dropped.contains(&name) {
                dropped.push(name);
            }
        }
    }
    if !dropped.is_empty() {
        debug!(?dropped, "fields not shared by every series were dropped");
    }
    common
}

fn with_context(err: SdwError, series: &str) -> SdwError {
    match err {
        SdwError::DataParse(msg) => SdwError::parse(format!("Series {series}: {msg}")),
        other => other,
    }
}
