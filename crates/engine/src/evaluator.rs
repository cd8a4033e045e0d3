//! Position evaluator — derives the risk figures for a single urn.
//!
//! Given one position's ledger quantities and its ilk's current parameters:
//! 1. Accrue the stability rate onto the normalized debt
//! 2. Compute the liquidation price and collateralization ratio
//! 3. Flag the position safe/unsafe against the raw spot value
//!
//! Pure and side-effect free; all arithmetic stays in exact fixed point and
//! only the reported price/ratio cross into `f64`.

use vaults_common::numeric::{NumericError, Ray, Wad};
use vaults_common::types::Position;

/// Evaluate one position.
///
/// Zero debt or a zero rate accumulator means the position owes nothing:
/// liquidation price and collateralization are undefined and the position is
/// safe regardless of collateral.
///
/// Zero collateral with outstanding debt surfaces as
/// `NumericError::DivisionByZero`; the aggregator treats any error here as a
/// per-record failure, never a fatal one.
pub fn evaluate(
    identifier: &str,
    ink: Wad,
    art: Wad,
    spot: Ray,
    mat: Ray,
    rate: Ray,
) -> Result<Position, NumericError> {
    if art.is_zero() || rate.is_zero() {
        return Ok(Position {
            identifier: identifier.to_string(),
            ink,
            art,
            liquidation_price: None,
            collateralization: None,
            safe: true,
        });
    }

    let ink_ray = Ray::from_wad(ink)?;
    let debt = Ray::from_wad(art)?.checked_mul(rate)?;

    let liquidation_price = debt.checked_mul(mat)?.checked_div(ink_ray)?;
    let osm_price = spot.checked_mul(mat)?;
    let collateralization = ink_ray.checked_mul(osm_price)?.checked_div(debt)?;
    let safe = ink_ray.checked_mul(spot)? >= debt;

    Ok(Position {
        identifier: identifier.to_string(),
        ink,
        art,
        liquidation_price: Some(liquidation_price.to_f64()),
        collateralization: Some(collateralization.to_f64()),
        safe,
    })
}
