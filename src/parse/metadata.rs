//! Structure message → `(agency, id, name)` triples.

use tracing::debug;

use crate::domain::MetadataEntry;
use crate::error::{Result, SdwError};
use crate::xml::{ElementSelector, XmlDocument};

/// List the artefacts matched by `selector` with their names in `language`.
///
/// One entry is produced per matching `Name` child, so an artefact without a
/// name in `language` does not appear at all, and one with duplicate names
/// appears once per name.
pub fn parse_metadata(
    document: &XmlDocument,
    selector: &ElementSelector,
    language: &str,
) -> Result<Vec<MetadataEntry>> {
    let mut entries = Vec::new();

    for element in document.select(selector) {
        let id = element.attr("id").ok_or_else(|| {
            SdwError::parse(format!("<{}> element without an id attribute.", element.name()))
        })?;
        let agency = element.attr("agencyID").ok_or_else(|| {
            SdwError::parse(format!("{} '{id}' has no agencyID attribute.", element.name()))
        })?;

        entries.extend(
            element
                .children_named("Name")
                .filter(|name| name.attr("lang") == Some(language))
                .map(|name| MetadataEntry {
                    agency: agency.to_string(),
                    id: id.to_string(),
                    name: name.text().to_string(),
                }),
        );
    }

    debug!(%selector, language, entries = entries.len(), "parsed structure metadata");
    Ok(entries)
}
