//! Smoke tests for the mock panel, including traffic snapshots.

use jf_core::{Join, SigValue};
use jf_panel::{MockPanel, SigEndpoint, TrafficRecord};

#[test]
fn traffic_snapshot_round_trips_through_json() {
    let panel = MockPanel::new();
    panel.send_input_digital(Join::new(4011), true);
    panel.send_input_analog(Join::new(3), 6);
    panel.send_input_serial(Join::new(11), "Row 1");

    let traffic = panel.traffic();
    let json = serde_json::to_string(&traffic).unwrap();
    let restored: Vec<TrafficRecord> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, traffic);
    assert_eq!(restored[0].join, Join::new(4011));
    assert_eq!(restored[2].value, SigValue::Serial("Row 1".to_string()));
}

#[test]
fn unbound_sentinel_serializes_as_zero() {
    let json = serde_json::to_string(&Join::UNBOUND).unwrap();
    assert_eq!(json, "0");
}
