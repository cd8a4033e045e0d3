//! Snapshot assembly — merges OSM quotes and Vulcanize records into the
//! immutable inputs the engine evaluates.

use std::collections::BTreeMap;

use alloy::providers::Provider;

use vaults_common::error::AppError;
use vaults_common::numeric::{NumericError, Ray, Wad};
use vaults_common::types::{CollateralParams, ProtocolSnapshot, RawIlkRecord};
use vaults_oracle::deployment::Deployment;
use vaults_oracle::osm::{self, OsmQuote};

use crate::client::VulcanizeClient;

/// Fetch and assemble a full protocol snapshot.
///
/// With `requested_ilk` set, only that ilk's OSM is read; otherwise every
/// ilk in the deployment is covered. A requested ilk missing from the
/// deployment gets no parameter entry — the engine then reports it zeroed.
///
/// Fetch failures (HTTP, RPC, response shape) abort the run. Per-ilk
/// parameter strings that fail to parse are demoted to "missing" with a
/// warning, matching the engine's missing-parameter policy.
pub async fn load_snapshot(
    client: &VulcanizeClient,
    provider: &(impl Provider + Clone),
    deployment: &Deployment,
    requested_ilk: Option<&str>,
) -> Result<ProtocolSnapshot, AppError> {
    let ilks: Vec<String> = match requested_ilk {
        Some(ilk) => {
            if deployment.pip(ilk).is_none() {
                tracing::warn!(ilk = %ilk, "Requested ilk not present in deployment");
            }
            vec![ilk.to_string()]
        }
        None => deployment.ilk_ids(),
    };

    let ilk_records = client.fetch_ilk_parameters().await?;
    let urns = client.fetch_all_urns().await?;

    let mut parameters = BTreeMap::new();
    for ilk in &ilks {
        let Some(pip) = deployment.pip(ilk) else {
            continue;
        };
        let quote = osm::read_quote(provider, ilk, pip).await?;
        let record = ilk_records.iter().find(|r| r.id == *ilk);
        if record.is_none() {
            tracing::warn!(ilk = %ilk, "No ilk parameter record in data source");
        }
        parameters.insert(ilk.clone(), merge_params(ilk, quote, record));
    }

    tracing::info!(
        ilks = parameters.len(),
        urns = urns.len(),
        "Protocol snapshot assembled"
    );

    Ok(ProtocolSnapshot { parameters, urns })
}

fn merge_params(ilk: &str, quote: OsmQuote, record: Option<&RawIlkRecord>) -> CollateralParams {
    CollateralParams {
        current_price: quote.current,
        next_price: quote.next,
        spot: record.and_then(|r| parse_field(ilk, "spot", r.spot.as_deref(), Ray::from_dec_str)),
        mat: record.and_then(|r| parse_field(ilk, "mat", r.mat.as_deref(), Ray::from_dec_str)),
        rate: record.and_then(|r| parse_field(ilk, "rate", r.rate.as_deref(), Ray::from_dec_str)),
        chop: record.and_then(|r| parse_field(ilk, "chop", r.chop.as_deref(), Wad::from_dec_str)),
    }
}

fn parse_field<T>(
    ilk: &str,
    field: &str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Result<T, NumericError>,
) -> Option<T> {
    match parse(value?) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(
                ilk = %ilk,
                field,
                error = %e,
                "Unparseable ilk parameter, treating as missing"
            );
            None
        }
    }
}
