//! Integration tests for the risk evaluation engine.
//!
//! The engine is pure — no database or RPC needed. These tests drive
//! `evaluate_snapshot` end to end over hand-built snapshots with properly
//! scaled fixed-point literals (wads: 18 decimals, rays: 27).

use std::collections::BTreeMap;
use std::sync::Arc;

use vaults_common::numeric::Ray;
use vaults_common::types::{
    CollateralParams, EvaluationRequest, ProtocolSnapshot, RawUrnRecord,
};
use vaults_engine::evaluate_snapshot;

// ============================================================
// Shared helpers
// ============================================================

const RAY_30: &str = "30000000000000000000000000000";
const RAY_1_5: &str = "1500000000000000000000000000";
const RAY_1: &str = "1000000000000000000000000000";

fn ray(literal: &str) -> Ray {
    Ray::from_dec_str(literal).unwrap()
}

fn wad_units(units: u64) -> String {
    format!("{units}000000000000000000")
}

fn eth_params() -> CollateralParams {
    CollateralParams {
        current_price: 32.0,
        next_price: 31.0,
        spot: Some(ray(RAY_30)),
        mat: Some(ray(RAY_1_5)),
        rate: Some(ray(RAY_1)),
        chop: None,
    }
}

fn make_urn(ilk: &str, urn: &str, ink_units: u64, art_units: u64) -> RawUrnRecord {
    RawUrnRecord {
        urn_identifier: urn.to_string(),
        ilk_identifier: ilk.to_string(),
        ink: Some(wad_units(ink_units)),
        art: Some(wad_units(art_units)),
    }
}

fn make_snapshot() -> ProtocolSnapshot {
    let mut parameters = BTreeMap::new();
    parameters.insert("ETH-A".to_string(), eth_params());
    // BAT-A has no evaluable parameters
    parameters.insert(
        "BAT-A".to_string(),
        CollateralParams {
            current_price: 0.2,
            next_price: 0.19,
            spot: None,
            mat: None,
            rate: None,
            chop: None,
        },
    );

    ProtocolSnapshot {
        parameters,
        urns: vec![
            make_urn("ETH-A", "urn-low", 1, 45),  // collateralization 1.0
            make_urn("ETH-A", "urn-mid", 1, 20),  // collateralization 2.25
            make_urn("ETH-A", "urn-calm", 10, 5), // liquidation price 0.75
            make_urn("BAT-A", "urn-bat", 100, 50),
        ],
    }
}

// ============================================================
// Full-run behavior
// ============================================================

#[tokio::test]
async fn test_all_ilks_reported() {
    let reports = evaluate_snapshot(
        Arc::new(make_snapshot()),
        EvaluationRequest {
            ilk: None,
            target_price: Some(20.0),
        },
    )
    .await
    .unwrap();

    assert_eq!(reports.len(), 2);
    assert!(reports.contains_key("ETH-A"));
    assert!(reports.contains_key("BAT-A"));
}

#[tokio::test]
async fn test_scenario_eth_a_at_target_20() {
    let reports = evaluate_snapshot(
        Arc::new(make_snapshot()),
        EvaluationRequest {
            ilk: Some("ETH-A".to_string()),
            target_price: Some(20.0),
        },
    )
    .await
    .unwrap();

    assert_eq!(reports.len(), 1);
    let eth = &reports["ETH-A"];

    assert_eq!(eth.current_price, 32.0);
    assert_eq!(eth.next_price, 31.0);
    assert_eq!(eth.target_price, 20.0);

    // urn-calm: liquidation price 5 * 1.5 / 10 = 0.75, not above 20
    // urn-low:  liquidation price 45 * 1.5 = 67.5, collateralization 1.0
    // urn-mid:  liquidation price 20 * 1.5 = 30,   collateralization 2.25
    let order: Vec<&str> = eth
        .risky_positions
        .iter()
        .map(|p| p.identifier.as_str())
        .collect();
    assert_eq!(order, vec!["urn-low", "urn-mid"]);

    assert_eq!(eth.risky_positions[0].liquidation_price, Some(67.5));
    assert_eq!(eth.risky_positions[0].collateralization, Some(1.0));
    assert_eq!(eth.risky_positions[1].liquidation_price, Some(30.0));
    assert_eq!(eth.risky_positions[1].collateralization, Some(2.25));

    // Exhaustive membership: every risky position has debt and a liquidation
    // price above target; the excluded urn-calm fails the price condition.
    for p in &eth.risky_positions {
        assert!(!p.art.is_zero());
        assert!(p.liquidation_price.unwrap() > eth.target_price);
    }
    assert!(!order.contains(&"urn-calm"));

    assert_eq!(eth.total_collateral, 2.0);
    assert_eq!(eth.debt_to_cover, 65.0);
}

#[tokio::test]
async fn test_target_defaults_to_next_osm_price_per_ilk() {
    let reports = evaluate_snapshot(
        Arc::new(make_snapshot()),
        EvaluationRequest::default(),
    )
    .await
    .unwrap();

    assert_eq!(reports["ETH-A"].target_price, 31.0);
    assert_eq!(reports["BAT-A"].target_price, 0.19);
}

#[tokio::test]
async fn test_unevaluable_ilk_gets_zeroed_report() {
    let reports = evaluate_snapshot(
        Arc::new(make_snapshot()),
        EvaluationRequest {
            ilk: Some("BAT-A".to_string()),
            target_price: None,
        },
    )
    .await
    .unwrap();

    let bat = &reports["BAT-A"];
    assert_eq!(bat.total_collateral, 0.0);
    assert_eq!(bat.debt_to_cover, 0.0);
    assert!(bat.risky_positions.is_empty());
    // Prices still flow through from the OSM
    assert_eq!(bat.current_price, 0.2);
}

#[tokio::test]
async fn test_unknown_requested_ilk_gets_zeroed_report() {
    let reports = evaluate_snapshot(
        Arc::new(make_snapshot()),
        EvaluationRequest {
            ilk: Some("NOPE-Z".to_string()),
            target_price: Some(5.0),
        },
    )
    .await
    .unwrap();

    assert_eq!(reports.len(), 1);
    let report = &reports["NOPE-Z"];
    assert_eq!(report.current_price, 0.0);
    assert_eq!(report.target_price, 5.0);
    assert!(report.risky_positions.is_empty());
}

#[tokio::test]
async fn test_empty_snapshot_yields_empty_map() {
    let reports = evaluate_snapshot(
        Arc::new(ProtocolSnapshot::default()),
        EvaluationRequest::default(),
    )
    .await
    .unwrap();
    assert!(reports.is_empty());
}

#[tokio::test]
async fn test_evaluation_is_idempotent() {
    let snapshot = Arc::new(make_snapshot());
    let request = EvaluationRequest {
        ilk: None,
        target_price: Some(20.0),
    };

    let first = evaluate_snapshot(Arc::clone(&snapshot), request.clone())
        .await
        .unwrap();
    let second = evaluate_snapshot(snapshot, request).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_urns_partitioned_by_ilk() {
    // A BAT-A urn must never leak into ETH-A's evaluation, even one that
    // ETH-A's parameters would classify as risky.
    let mut snapshot = make_snapshot();
    snapshot.urns.push(make_urn("BAT-A", "urn-bat-2", 1, 45));

    let reports = evaluate_snapshot(
        Arc::new(snapshot),
        EvaluationRequest {
            ilk: Some("ETH-A".to_string()),
            target_price: Some(20.0),
        },
    )
    .await
    .unwrap();

    for p in &reports["ETH-A"].risky_positions {
        assert!(!p.identifier.starts_with("urn-bat"));
    }
}
