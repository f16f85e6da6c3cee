//! Owned XML element tree for SDMX-ML responses.
//!
//! The parsers need random access (children of a series, name children of an
//! artefact), so the `quick-xml` event stream is folded into a small tree.
//! Element and attribute names are stored by local name: `generic:Series`
//! becomes `Series` and `xml:lang` becomes `lang`. Namespace declarations are
//! dropped.

use std::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{Result, SdwError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr
                .map_err(|e| SdwError::parse(format!("Invalid attribute on <{name}>: {e}")))?;
            let raw_key = attr.key.as_ref();
            if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| SdwError::parse(format!("Invalid value for {key} on <{name}>: {e}")))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    /// Local element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated, trimmed text content of this element (not its children).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Pre-order walk over this element and everything below it.
    fn collect_matching<'a>(&'a self, selector: &ElementSelector, out: &mut Vec<&'a XmlElement>) {
        let mut stack = vec![self];
        while let Some(el) = stack.pop() {
            if selector.matches(el) {
                out.push(el);
            }
            stack.extend(el.children.iter().rev());
        }
    }
}

/// A parsed response document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => stack.push(XmlElement::from_start(&e)?),
                Ok(Event::Empty(e)) => {
                    let el = XmlElement::from_start(&e)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Ok(Event::End(_)) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| SdwError::parse("Unbalanced closing tag in response."))?;
                    attach(&mut stack, &mut root, el)?;
                }
                Ok(Event::Text(t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| SdwError::parse(format!("Invalid text content: {e}")))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(c)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(SdwError::parse(format!(
                        "Malformed XML at byte {}: {e}",
                        reader.buffer_position()
                    )));
                }
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(SdwError::parse(format!(
                "Response ended inside <{}>.",
                open.name
            )));
        }
        let root = root.ok_or_else(|| SdwError::parse("Response contained no XML elements."))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// All elements matching `selector`, in document order.
    pub fn select(&self, selector: &ElementSelector) -> Vec<&XmlElement> {
        let mut out = Vec::new();
        self.root.collect_matching(selector, &mut out);
        out
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, el: XmlElement) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(el);
        return Ok(());
    }
    if root.is_some() {
        return Err(SdwError::parse(format!(
            "Unexpected second root element <{}>.",
            el.name
        )));
    }
    *root = Some(el);
    Ok(())
}

/// Matches elements anywhere in the document by local name, the equivalent
/// of `.//ns:Name` (or a union of such paths).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSelector {
    names: &'static [&'static str],
}

impl ElementSelector {
    pub const fn any_of(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    pub fn matches(&self, el: &XmlElement) -> bool {
        self.names.iter().any(|n| *n == el.name())
    }
}

impl fmt::Display for ElementSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.names.iter().map(|n| format!(".//{n}")).collect();
        f.write_str(&parts.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="urn:message" xmlns:str="urn:structure" xmlns:com="urn:common">
  <mes:Structures>
    <str:Codelists>
      <str:Codelist id="CL_FREQ" agencyID="ECB">
        <com:Name xml:lang="en">Frequency &amp; period</com:Name>
        <str:Code id="A"><com:Name xml:lang="en">Annual</com:Name></str:Code>
      </str:Codelist>
      <str:Codelist id="CL_CURRENCY" agencyID="ECB"/>
    </str:Codelists>
  </mes:Structures>
</mes:Structure>"#;

    #[test]
    fn strips_prefixes_and_namespace_declarations() {
        let doc = XmlDocument::parse(DOC).unwrap();
        let root = doc.root();
        assert_eq!(root.name(), "Structure");
        assert!(root.attr("mes").is_none());
        assert!(root.attr("xmlns").is_none());

        let codelists = doc.select(&ElementSelector::any_of(&["Codelist"]));
        assert_eq!(codelists.len(), 2);
        let name = codelists[0].child("Name").unwrap();
        assert_eq!(name.attr("lang"), Some("en"));
        assert_eq!(name.text(), "Frequency & period");
        assert_eq!(codelists[1].attr("id"), Some("CL_CURRENCY"));
    }

    #[test]
    fn select_walks_in_document_order() {
        let doc = XmlDocument::parse(DOC).unwrap();
        let ids: Vec<_> = doc
            .select(&ElementSelector::any_of(&["Codelist", "Code"]))
            .iter()
            .filter_map(|e| e.attr("id"))
            .collect();
        assert_eq!(ids, vec!["CL_FREQ", "A", "CL_CURRENCY"]);
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(
            XmlDocument::parse("<a><b></a>"),
            Err(SdwError::DataParse(_))
        ));
        assert!(matches!(XmlDocument::parse("<a>"), Err(SdwError::DataParse(_))));
        assert!(matches!(XmlDocument::parse(""), Err(SdwError::DataParse(_))));
    }

    #[test]
    fn selector_display_reads_like_xpath() {
        let sel = ElementSelector::any_of(&["Codelist", "Dataflow"]);
        assert_eq!(sel.to_string(), ".//Codelist | .//Dataflow");
    }
}
