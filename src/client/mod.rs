//! Caller-facing client.
//!
//! [`SdwClient`] ties the pieces together:
//!
//! - validates the caller's arguments (`query`)
//! - asks a [`ResourceFetcher`] for the document (`fetcher`)
//! - hands the document to the matching parser (`crate::parse`)
//!
//! The default fetcher talks HTTPS to the configured service (`config`).

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{FlatRecord, MetadataEntry, StructureResource};
use crate::error::Result;
use crate::parse::{parse_metadata, parse_observations};

pub mod config;
pub mod fetcher;
pub mod query;

pub use config::ClientConfig;
pub use fetcher::{HttpFetcher, QueryParams, ResourceFetcher};
pub use query::{SeriesQuery, structure_path};

pub struct SdwClient<F = HttpFetcher> {
    fetcher: F,
    language: String,
}

impl SdwClient<HttpFetcher> {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let config = config.validated()?;
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self {
            fetcher,
            language: config.language,
        })
    }

    /// Build a client from `SDW_*` environment variables (see [`ClientConfig`]).
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<F: ResourceFetcher> SdwClient<F> {
    pub fn with_fetcher(fetcher: F, language: impl Into<String>) -> Self {
        Self {
            fetcher,
            language: language.into(),
        }
    }

    /// Language code used to pick metadata names.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Fetch observations for one data flow as flat records.
    pub fn fetch_series(&self, query: &SeriesQuery) -> Result<Vec<FlatRecord>> {
        query.validate()?;
        let path = query.resource_path();
        let document = self.fetcher.fetch(&path, &query.query_params())?;
        let records = parse_observations(&document)?;
        debug!(%path, records = records.len(), "fetched series");
        Ok(records)
    }

    /// List artefacts of one structure resource type.
    ///
    /// `None` for `agency` or `id` queries all of them.
    pub fn fetch_structures(
        &self,
        resource: StructureResource,
        agency: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<MetadataEntry>> {
        let path = structure_path(resource, agency, id)?;
        let document = self.fetcher.fetch(&path, &QueryParams::new())?;
        parse_metadata(&document, &resource.selector(), &self.language)
    }

    pub fn fetch_data_structures(
        &self,
        agency: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<MetadataEntry>> {
        self.fetch_structures(StructureResource::DataStructure, agency, id)
    }

    pub fn fetch_codelists(
        &self,
        agency: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<MetadataEntry>> {
        self.fetch_structures(StructureResource::Codelist, agency, id)
    }

    pub fn fetch_agency_schemes(
        &self,
        agency: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<MetadataEntry>> {
        self.fetch_structures(StructureResource::AgencyScheme, agency, id)
    }

    pub fn fetch_categorisations(
        &self,
        agency: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<MetadataEntry>> {
        self.fetch_structures(StructureResource::Categorisation, agency, id)
    }

    pub fn fetch_category_schemes(
        &self,
        agency: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<MetadataEntry>> {
        self.fetch_structures(StructureResource::CategoryScheme, agency, id)
    }

    pub fn fetch_concept_schemes(
        &self,
        agency: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<MetadataEntry>> {
        self.fetch_structures(StructureResource::ConceptScheme, agency, id)
    }

    pub fn fetch_content_constraints(
        &self,
        agency: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<MetadataEntry>> {
        self.fetch_structures(StructureResource::ContentConstraint, agency, id)
    }

    pub fn fetch_dataflows(
        &self,
        agency: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<MetadataEntry>> {
        self.fetch_structures(StructureResource::Dataflow, agency, id)
    }

    pub fn fetch_hierarchical_codelists(
        &self,
        agency: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<MetadataEntry>> {
        self.fetch_structures(StructureResource::HierarchicalCodelist, agency, id)
    }

    pub fn fetch_organisation_schemes(
        &self,
        agency: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<MetadataEntry>> {
        self.fetch_structures(StructureResource::OrganisationScheme, agency, id)
    }

    pub fn fetch_structure_sets(
        &self,
        agency: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<MetadataEntry>> {
        self.fetch_structures(StructureResource::StructureSet, agency, id)
    }
}

impl<F: ResourceFetcher + Sync> SdwClient<F> {
    /// Fetch several series queries in parallel.
    ///
    /// Results come back in input order. Every query is validated before any
    /// request is sent, and the first failure fails the whole batch.
    pub fn fetch_series_batch(&self, queries: &[SeriesQuery]) -> Result<Vec<Vec<FlatRecord>>> {
        for query in queries {
            query.validate()?;
        }
        queries
            .par_iter()
            .map(|query| self.fetch_series(query))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Period;
    use crate::error::SdwError;
    use crate::xml::XmlDocument;

    /// Serves canned documents by resource path and records every request.
    struct StubFetcher {
        responses: Vec<(String, std::result::Result<String, SdwError>)>,
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl StubFetcher {
        fn new(responses: Vec<(&str, std::result::Result<String, SdwError>)>) -> Self {
            Self {
                responses: responses
                    .into_iter()
                    .map(|(path, body)| (path.to_string(), body))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ResourceFetcher for StubFetcher {
        fn fetch(&self, resource_path: &str, query: &QueryParams) -> Result<XmlDocument> {
            let params = query
                .present()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            self.calls
                .lock()
                .unwrap()
                .push((resource_path.to_string(), params));
            let (_, response) = self
                .responses
                .iter()
                .find(|(path, _)| path == resource_path)
                .unwrap_or_else(|| panic!("no stub for {resource_path}"));
            match response {
                Ok(body) => XmlDocument::parse(body),
                Err(err) => Err(err.clone()),
            }
        }
    }

    fn exr_document(currency: &str, values: &[(&str, &str)]) -> String {
        let obs: String = values
            .iter()
            .map(|(period, value)| {
                format!(
                    r#"<generic:Obs><generic:ObsDimension value="{period}"/><generic:ObsValue value="{value}"/></generic:Obs>"#
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<message:GenericData xmlns:message="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
                     xmlns:generic="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/data/generic">
  <message:DataSet action="Replace">
    <generic:Series>
      <generic:SeriesKey>
        <generic:Value id="FREQ" value="D"/>
        <generic:Value id="CURRENCY" value="{currency}"/>
        <generic:Value id="CURRENCY_DENOM" value="EUR"/>
        <generic:Value id="EXR_TYPE" value="SP00"/>
        <generic:Value id="EXR_SUFFIX" value="A"/>
      </generic:SeriesKey>
      <generic:Attributes>
        <generic:Value id="COLLECTION" value="A"/>
        <generic:Value id="DECIMALS" value="4"/>
        <generic:Value id="TITLE" value="{currency}/Euro"/>
        <generic:Value id="TITLE_COMPL" value="ECB reference exchange rate, {currency}/Euro, 2:15 pm (C.E.T.)"/>
        <generic:Value id="UNIT" value="{currency}"/>
        <generic:Value id="UNIT_MULT" value="0"/>
      </generic:Attributes>
      {obs}
    </generic:Series>
  </message:DataSet>
</message:GenericData>"#
        )
    }

    fn date(d: u32) -> Period {
        Period::Date(NaiveDate::from_ymd_opt(2021, 1, d).unwrap())
    }

    #[test]
    fn fetch_series_end_to_end() {
        let doc = exr_document(
            "USD",
            &[("2021-01-04", "1.20"), ("2021-01-05", "1.21"), ("2021-01-06", "1.22")],
        );
        let stub = StubFetcher::new(vec![("data/EXR/D.USD.EUR.SP00.A", Ok(doc))]);
        let client = SdwClient::with_fetcher(stub, "en");

        let query = SeriesQuery::new("EXR")
            .key("D.USD.EUR.SP00.A")
            .start_period("2021-01-04")
            .end_period("2021-01-06");
        let records = client.fetch_series(&query).unwrap();

        assert_eq!(records.len(), 3);
        let dates: Vec<_> = records.iter().map(|r| r.date.clone()).collect();
        assert_eq!(dates, vec![date(4), date(5), date(6)]);
        let values: Vec<_> = records.iter().map(|r| r.value.unwrap()).collect();
        assert_eq!(values, vec![1.20, 1.21, 1.22]);
        for r in &records {
            assert_eq!(r.key, "D.USD.EUR.SP00.A");
            assert_eq!(r.fields.get("frequency"), Some("daily"));
            assert_eq!(r.title, "USD/Euro");
            assert!(r.description.as_deref().unwrap().starts_with("ECB reference"));
            assert_eq!(r.fields.get("unit_mult"), Some("0"));
        }

        let calls = client.fetcher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].1,
            vec![
                ("startPeriod".to_string(), "2021-01-04".to_string()),
                ("endPeriod".to_string(), "2021-01-06".to_string()),
            ]
        );
    }

    #[test]
    fn invalid_query_never_reaches_the_fetcher() {
        let client = SdwClient::with_fetcher(StubFetcher::new(vec![]), "en");
        let err = client
            .fetch_series(&SeriesQuery::new("EXR").first_n_observations(0))
            .unwrap_err();
        assert!(matches!(err, SdwError::Validation(_)));
        assert!(client.fetcher.calls().is_empty());
    }

    #[test]
    fn http_errors_surface_unchanged() {
        let stub = StubFetcher::new(vec![(
            "data/EXR/all",
            Err(SdwError::http(404, "No Results Found")),
        )]);
        let client = SdwClient::with_fetcher(stub, "en");
        match client.fetch_series(&SeriesQuery::new("EXR")).unwrap_err() {
            SdwError::Http { status, body, .. } => {
                assert_eq!(status, 404);
                assert_eq!(body, "No Results Found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn batch_preserves_input_order() {
        let stub = StubFetcher::new(vec![
            ("data/EXR/D.USD.EUR.SP00.A", Ok(exr_document("USD", &[("2021-01-04", "1.2")]))),
            (
                "data/EXR/D.JPY.EUR.SP00.A",
                Ok(exr_document("JPY", &[("2021-01-04", "126.6"), ("2021-01-05", "126.2")])),
            ),
        ]);
        let client = SdwClient::with_fetcher(stub, "en");
        let queries = vec![
            SeriesQuery::new("EXR").key("D.USD.EUR.SP00.A"),
            SeriesQuery::new("EXR").key("D.JPY.EUR.SP00.A"),
        ];
        let results = client.fetch_series_batch(&queries).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].len(), 1);
        assert_eq!(results[1].len(), 2);
        assert_eq!(results[1][0].key, "D.JPY.EUR.SP00.A");
    }

    #[test]
    fn batch_validates_everything_up_front() {
        let client = SdwClient::with_fetcher(StubFetcher::new(vec![]), "en");
        let queries = vec![SeriesQuery::new("EXR"), SeriesQuery::new("")];
        assert!(matches!(
            client.fetch_series_batch(&queries),
            Err(SdwError::Validation(_))
        ));
        assert!(client.fetcher.calls().is_empty());
    }

    #[test]
    fn structure_functions_use_their_resource_selector() {
        let doc = r#"<mes:Structure xmlns:mes="m" xmlns:str="s" xmlns:com="c">
  <mes:Structures>
    <str:Dataflows>
      <str:Dataflow id="EXR" agencyID="ECB"><com:Name xml:lang="en">Exchange Rates</com:Name></str:Dataflow>
    </str:Dataflows>
    <str:Codelists>
      <str:Codelist id="CL_FREQ" agencyID="ECB"><com:Name xml:lang="en">Frequency</com:Name></str:Codelist>
    </str:Codelists>
  </mes:Structures>
</mes:Structure>"#;
        let stub = StubFetcher::new(vec![
            ("dataflow/ECB/all", Ok(doc.to_string())),
            ("codelist/all/all", Ok(doc.to_string())),
        ]);
        let client = SdwClient::with_fetcher(stub, "en");

        let flows = client.fetch_dataflows(Some("ECB"), None).unwrap();
        assert_eq!(
            flows,
            vec![MetadataEntry {
                agency: "ECB".to_string(),
                id: "EXR".to_string(),
                name: "Exchange Rates".to_string(),
            }]
        );

        let codelists = client.fetch_codelists(None, None).unwrap();
        assert_eq!(codelists.len(), 1);
        assert_eq!(codelists[0].id, "CL_FREQ");
    }

    #[test]
    fn structure_language_follows_client_setting() {
        let doc = r#"<Structure><Codelist id="CL_FREQ" agencyID="ECB"><Name lang="en">Frequency</Name><Name lang="de">Frequenz</Name></Codelist></Structure>"#;
        let stub = StubFetcher::new(vec![("codelist/ECB/CL_FREQ", Ok(doc.to_string()))]);
        let client = SdwClient::with_fetcher(stub, "de");
        let entries = client.fetch_codelists(Some("ECB"), Some("CL_FREQ")).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Frequenz");
    }
}
