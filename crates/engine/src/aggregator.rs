//! Collateral aggregator — per-ilk risk rollup.
//!
//! For one ilk's urn rows and parameter snapshot:
//! 1. Resolve the target price (explicit, else next OSM price)
//! 2. Evaluate every row, skipping malformed ones with a warning
//! 3. Keep positions with debt whose liquidation price exceeds the target
//! 4. Sort ascending by collateralization (most urgent first)
//! 5. Sum collateral and rate-and-penalty-adjusted debt over the risky set
//!
//! Missing `spot`/`mat`/`rate` parameters produce a zeroed report; nothing
//! in this pass is fatal.

use std::cmp::Ordering;

use vaults_common::numeric::{NumericError, Ray, Wad};
use vaults_common::types::{CollateralParams, CollateralRiskReport, Position, RawUrnRecord};

use crate::evaluator;

/// Roll up one ilk into a `CollateralRiskReport`.
///
/// `params` absent (unknown ilk, or no parameter record) yields a zeroed
/// report with zeroed prices; the caller may still have supplied an explicit
/// target price, which is echoed back.
pub fn aggregate(
    ilk: &str,
    params: Option<&CollateralParams>,
    target_price: Option<f64>,
    records: &[&RawUrnRecord],
) -> CollateralRiskReport {
    let current_price = params.map_or(0.0, |p| p.current_price);
    let next_price = params.map_or(0.0, |p| p.next_price);
    let target_price = target_price.unwrap_or(next_price);

    let Some((spot, mat, rate)) = params.and_then(CollateralParams::solvency_inputs) else {
        tracing::warn!(
            ilk = %ilk,
            "Missing spot/mat/rate parameters — returning zeroed report"
        );
        return CollateralRiskReport::zeroed(current_price, next_price, target_price);
    };

    let chop = params.and_then(|p| p.chop).unwrap_or(Wad::ONE);

    let mut positions = Vec::with_capacity(records.len());
    for record in records {
        match evaluate_record(record, spot, mat, rate) {
            Ok(position) => positions.push(position),
            Err(e) => {
                tracing::warn!(
                    ilk = %ilk,
                    urn = %record.urn_identifier,
                    error = %e,
                    "Could not process urn record, skipping"
                );
            }
        }
    }

    let mut risky: Vec<Position> = positions
        .into_iter()
        .filter(|p| !p.art.is_zero())
        .filter(|p| p.liquidation_price.is_some_and(|lp| lp > target_price))
        .collect();

    // Vec::sort_by is stable: equal ratios keep their data-source order.
    risky.sort_by(|a, b| {
        a.collateralization
            .partial_cmp(&b.collateralization)
            .unwrap_or(Ordering::Equal)
    });

    let (total_collateral, debt_to_cover) = risky_totals(&risky, rate, chop);

    CollateralRiskReport {
        current_price,
        next_price,
        target_price,
        total_collateral,
        debt_to_cover,
        risky_positions: risky,
    }
}

/// Parse one raw row and run the evaluator on it.
fn evaluate_record(
    record: &RawUrnRecord,
    spot: Ray,
    mat: Ray,
    rate: Ray,
) -> Result<Position, NumericError> {
    let ink = parse_wad_field(record.ink.as_deref(), "ink")?;
    let art = parse_wad_field(record.art.as_deref(), "art")?;
    evaluator::evaluate(&record.urn_identifier, ink, art, spot, mat, rate)
}

fn parse_wad_field(value: Option<&str>, field: &str) -> Result<Wad, NumericError> {
    match value {
        Some(raw) => Wad::from_dec_str(raw),
        None => Err(NumericError::InvalidLiteral(format!("missing {field}"))),
    }
}

/// Sum collateral and penalty-adjusted debt over the risky set.
///
/// Computed in exact fixed point; the `f64` conversion is the last step.
/// A U256 sum of wads cannot overflow for any physically meaningful ledger,
/// but if it ever does the totals fall back to float sums with an error log
/// instead of panicking.
fn risky_totals(risky: &[Position], rate: Ray, chop: Wad) -> (f64, f64) {
    if risky.is_empty() {
        return (0.0, 0.0);
    }

    let exact = (|| -> Result<(Wad, Ray), NumericError> {
        let mut ink_sum = Wad::ZERO;
        let mut art_sum = Wad::ZERO;
        for position in risky {
            ink_sum = ink_sum.checked_add(position.ink)?;
            art_sum = art_sum.checked_add(position.art)?;
        }
        let debt = Ray::from_wad(art_sum)?
            .checked_mul(rate)?
            .checked_mul(Ray::from_wad(chop)?)?;
        Ok((ink_sum, debt))
    })();

    match exact {
        Ok((ink_sum, debt)) => (ink_sum.to_f64(), debt.to_f64()),
        Err(e) => {
            tracing::error!(error = %e, "Overflow computing risky totals, falling back to float sums");
            let ink_sum: f64 = risky.iter().map(|p| p.ink.to_f64()).sum();
            let art_sum: f64 = risky.iter().map(|p| p.art.to_f64()).sum();
            (ink_sum, art_sum * rate.to_f64() * chop.to_f64())
        }
    }
}
