//! Risk evaluation engine.
//!
//! Pure computation over a fully materialized [`ProtocolSnapshot`]: the
//! [`evaluator`] derives per-position risk figures, the [`aggregator`] rolls
//! one ilk into a [`CollateralRiskReport`], and [`evaluate_snapshot`] runs
//! one aggregation task per ilk. There is no I/O here — fetching parameters
//! and urn rows belongs to `vaults-datasource` and `vaults-oracle`.

pub mod aggregator;
pub mod evaluator;

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;

use vaults_common::types::{CollateralRiskReport, EvaluationRequest, ProtocolSnapshot};

/// Evaluate a snapshot, one concurrent task per ilk.
///
/// Each ilk's aggregation is independent: the snapshot is immutable behind an
/// `Arc`, so tasks share it without locking. A requested ilk with no
/// parameter record still yields a (zeroed) report under its key.
///
/// The result map is ordered by ilk identifier, and evaluating the same
/// snapshot and request twice produces identical reports.
pub async fn evaluate_snapshot(
    snapshot: Arc<ProtocolSnapshot>,
    request: EvaluationRequest,
) -> anyhow::Result<BTreeMap<String, CollateralRiskReport>> {
    let ilks: Vec<String> = match &request.ilk {
        Some(ilk) => vec![ilk.clone()],
        None => snapshot.parameters.keys().cloned().collect(),
    };

    tracing::debug!(ilks = ilks.len(), urns = snapshot.urns.len(), "Evaluating snapshot");

    let mut tasks = JoinSet::new();
    for ilk in ilks {
        let snapshot = Arc::clone(&snapshot);
        let target_price = request.target_price;
        tasks.spawn(async move {
            let params = snapshot.parameters.get(&ilk);
            let records = snapshot.urns_for(&ilk);
            let report = aggregator::aggregate(&ilk, params, target_price, &records);
            (ilk, report)
        });
    }

    let mut reports = BTreeMap::new();
    while let Some(joined) = tasks.join_next().await {
        let (ilk, report) = joined?;
        reports.insert(ilk, report);
    }

    Ok(reports)
}
