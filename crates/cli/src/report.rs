//! Operator-facing report rendering.

use vaults_common::types::CollateralRiskReport;

const BANNER: &str = "====================================================";

/// Render one ilk's report in the banner layout.
pub fn render(collateral: &str, report: &CollateralRiskReport) -> String {
    let mut out = String::new();

    out.push_str(BANNER);
    out.push('\n');
    // Trailing spaces before the newlines match the historical operator
    // output exactly.
    out.push_str(&format!("Collateral: {collateral} \n"));
    out.push_str(&format!(
        "Current OSM price: {} | Next OSM price: {} | Target price: {} \n",
        report.current_price, report.next_price, report.target_price
    ));
    out.push_str(&format!(
        "Total collateral to liquidate: {} | Total DAI to liquidate: {}\n",
        report.total_collateral, report.debt_to_cover
    ));
    out.push_str(BANNER);
    out.push('\n');
    out.push_str("Vaults at risk: \n\n");

    for urn in &report.risky_positions {
        let liquidation_price = urn
            .liquidation_price
            .map_or_else(|| "n/a".to_string(), |p| p.to_string());
        out.push_str(&format!(
            "URN: {} | Liquidation Price: {} | Collateral: {}\n",
            urn.identifier,
            liquidation_price,
            urn.ink.to_f64()
        ));
    }

    out.push_str(BANNER);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaults_common::numeric::Wad;
    use vaults_common::types::Position;

    fn make_report() -> CollateralRiskReport {
        CollateralRiskReport {
            current_price: 32.0,
            next_price: 31.0,
            target_price: 20.0,
            total_collateral: 2.0,
            debt_to_cover: 65.0,
            risky_positions: vec![Position {
                identifier: "0xabc".to_string(),
                ink: Wad::from_dec_str("1000000000000000000").unwrap(),
                art: Wad::from_dec_str("45000000000000000000").unwrap(),
                liquidation_price: Some(67.5),
                collateralization: Some(1.0),
                safe: false,
            }],
        }
    }

    #[test]
    fn test_render_contains_header_and_totals() {
        let out = render("ETH-A", &make_report());
        assert!(out.contains("Collateral: ETH-A"));
        assert!(out.contains(
            "Current OSM price: 32 | Next OSM price: 31 | Target price: 20"
        ));
        assert!(out.contains("Total collateral to liquidate: 2 | Total DAI to liquidate: 65"));
    }

    #[test]
    fn test_render_one_line_per_risky_urn() {
        let out = render("ETH-A", &make_report());
        assert!(out.contains("URN: 0xabc | Liquidation Price: 67.5 | Collateral: 1"));
        assert_eq!(out.matches("URN: ").count(), 1);
    }

    #[test]
    fn test_render_empty_risk_list() {
        let report = CollateralRiskReport::zeroed(32.0, 31.0, 31.0);
        let out = render("ETH-A", &report);
        assert!(out.contains("Vaults at risk:"));
        assert_eq!(out.matches("URN: ").count(), 0);
    }

    #[test]
    fn test_render_matches_operator_layout_exactly() {
        // The header and risk-list lines keep their historical trailing
        // spaces.
        let out = render("ETH-A", &make_report());
        assert!(out.contains("Collateral: ETH-A \n"));
        assert!(out.contains("| Target price: 20 \n"));
        assert!(out.contains("| Total DAI to liquidate: 65\n"));
        assert!(out.contains("Vaults at risk: \n\n"));
    }
}
