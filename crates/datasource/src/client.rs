//! Vulcanize GraphQL client.
//!
//! Fetches the raw ilk parameter records and the full urn set. Urns are
//! paginated with a fixed page size and offset; the loop terminates at the
//! first empty page and the result is one flattened sequence deduplicated by
//! (ilk, urn) identifier.
//!
//! Any HTTP or response-shape failure here is fatal for the run: a partial
//! position set must not be evaluated.

use std::collections::HashSet;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use vaults_common::error::AppError;
use vaults_common::types::{RawIlkRecord, RawUrnRecord};

use crate::queries;

/// HTTP client for one Vulcanize endpoint.
pub struct VulcanizeClient {
    http: reqwest::Client,
    endpoint: String,
}

impl VulcanizeClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// POST one GraphQL query.
    ///
    /// The endpoint expects `variables` as a JSON-encoded string rather than
    /// an inline object.
    async fn run_query(&self, query: &str, variables: Option<Value>) -> Result<Value, AppError> {
        let mut body = json!({ "query": query });
        if let Some(vars) = variables {
            body["variables"] = Value::String(vars.to_string());
        }

        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::DataSource(format!(
                "Vulcanize query failed: {status} ({text})"
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetch the parameter record for every known ilk.
    pub async fn fetch_ilk_parameters(&self) -> Result<Vec<RawIlkRecord>, AppError> {
        let response = self.run_query(queries::ILKS_QUERY, None).await?;
        let records: Vec<RawIlkRecord> = parse_nodes(&response, "/data/allIlks/nodes")?;

        tracing::debug!(ilks = records.len(), "Fetched ilk parameter records");
        Ok(records)
    }

    /// Fetch every urn row across all pages.
    pub async fn fetch_all_urns(&self) -> Result<Vec<RawUrnRecord>, AppError> {
        let mut pages: Vec<RawUrnRecord> = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let response = self
                .run_query(queries::URNS_QUERY, Some(json!({ "offset": offset })))
                .await?;
            let page: Vec<RawUrnRecord> = parse_nodes(&response, "/data/allUrns/nodes")?;

            if page.is_empty() {
                break;
            }
            tracing::debug!(offset, rows = page.len(), "Fetched urn page");

            pages.extend(page);
            offset += queries::URNS_PAGE_SIZE;
        }

        let records = dedup_urns(pages);
        tracing::info!(urns = records.len(), "Fetched all urn rows");
        Ok(records)
    }
}

/// Collapse repeated (ilk, urn) rows to their first occurrence, keeping the
/// page order otherwise.
fn dedup_urns(rows: impl IntoIterator<Item = RawUrnRecord>) -> Vec<RawUrnRecord> {
    let mut records: Vec<RawUrnRecord> = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for record in rows {
        let key = (
            record.ilk_identifier.clone(),
            record.urn_identifier.clone(),
        );
        if seen.insert(key) {
            records.push(record);
        } else {
            tracing::debug!(
                ilk = %record.ilk_identifier,
                urn = %record.urn_identifier,
                "Dropping duplicate urn row"
            );
        }
    }

    records
}

/// Pull a node list out of a GraphQL response body.
fn parse_nodes<T: DeserializeOwned>(response: &Value, pointer: &str) -> Result<Vec<T>, AppError> {
    let nodes = response
        .pointer(pointer)
        .cloned()
        .ok_or_else(|| AppError::Decode(format!("missing {pointer} in Vulcanize response")))?;
    serde_json::from_value(nodes)
        .map_err(|e| AppError::Decode(format!("bad node shape at {pointer}: {e}")))
}
