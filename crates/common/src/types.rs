use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::numeric::{Ray, Wad};

/// Per-ilk risk parameter snapshot, merged from the Vulcanize ilk record and
/// the OSM price feed before evaluation begins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollateralParams {
    /// Current OSM price quote
    pub current_price: f64,
    /// Next-round OSM price quote
    pub next_price: f64,
    /// Maximum-allowed debt value per unit collateral (risk-adjusted oracle value)
    pub spot: Option<Ray>,
    /// Required overcollateralization ratio ("mat")
    pub mat: Option<Ray>,
    /// Cumulative per-unit-debt stability fee accumulator
    pub rate: Option<Ray>,
    /// Liquidation penalty multiplier ("chop"); absent means 1.0
    pub chop: Option<Wad>,
}

impl CollateralParams {
    /// The three parameters without which an ilk cannot be evaluated.
    ///
    /// Returns `None` when any of `spot`, `mat`, `rate` is missing; the
    /// aggregator then produces a zeroed report instead of failing.
    pub fn solvency_inputs(&self) -> Option<(Ray, Ray, Ray)> {
        match (self.spot, self.mat, self.rate) {
            (Some(spot), Some(mat), Some(rate)) => Some((spot, mat, rate)),
            _ => None,
        }
    }
}

/// Raw urn row as returned by the data source. Numeric fields stay as
/// strings here; parsing happens per-record in the aggregator so one bad row
/// never poisons the batch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUrnRecord {
    pub urn_identifier: String,
    pub ilk_identifier: String,
    pub ink: Option<String>,
    pub art: Option<String>,
}

/// Raw ilk row as returned by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawIlkRecord {
    pub id: String,
    pub spot: Option<String>,
    pub mat: Option<String>,
    pub rate: Option<String>,
    pub chop: Option<String>,
}

/// One borrower's evaluated position within an ilk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub identifier: String,
    /// Locked collateral quantity ("ink")
    pub ink: Wad,
    /// Normalized outstanding debt quantity ("art")
    pub art: Wad,
    /// Price at which collateral stops covering debt at the required ratio.
    /// `None` for zero-debt (or zero-rate) positions.
    pub liquidation_price: Option<f64>,
    /// Ratio of collateral value to owed debt. `None` for zero-debt positions.
    pub collateralization: Option<f64>,
    pub safe: bool,
}

/// Per-ilk evaluation output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollateralRiskReport {
    pub current_price: f64,
    pub next_price: f64,
    pub target_price: f64,
    /// Total collateral locked in positions unsafe at the target price
    pub total_collateral: f64,
    /// Total DAI that would need to be covered to liquidate those positions
    pub debt_to_cover: f64,
    /// Positions unsafe at the target price, most urgent first
    pub risky_positions: Vec<Position>,
}

impl CollateralRiskReport {
    /// Report for an ilk with nothing at risk (or nothing evaluable).
    pub fn zeroed(current_price: f64, next_price: f64, target_price: f64) -> Self {
        Self {
            current_price,
            next_price,
            target_price,
            total_collateral: 0.0,
            debt_to_cover: 0.0,
            risky_positions: Vec::new(),
        }
    }
}

/// Fully materialized, immutable inputs for one evaluation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProtocolSnapshot {
    /// Parameters per ilk identifier
    pub parameters: BTreeMap<String, CollateralParams>,
    /// All urn rows across every ilk, already flattened and deduplicated
    pub urns: Vec<RawUrnRecord>,
}

impl ProtocolSnapshot {
    /// Urn rows belonging to one ilk, in data-source order.
    pub fn urns_for(&self, ilk: &str) -> Vec<&RawUrnRecord> {
        self.urns
            .iter()
            .filter(|urn| urn.ilk_identifier == ilk)
            .collect()
    }
}

/// What the caller wants evaluated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationRequest {
    /// Specific ilk to evaluate; `None` means every known ilk
    pub ilk: Option<String>,
    /// Explicit target price; `None` means each ilk's next OSM price
    pub target_price: Option<f64>,
}
