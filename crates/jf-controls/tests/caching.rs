//! Write suppression and the unbound-join policy.

use std::sync::Arc;

use jf_core::{Join, SigKind};
use jf_panel::MockPanel;
use jf_controls::{Button, Control, ControlError, DynamicButtonList, MultiModeButton, PressButton};

#[test]
fn repeated_item_label_writes_are_suppressed() {
    let panel = Arc::new(MockPanel::new());
    let list = DynamicButtonList::new(panel.clone(), 1).unwrap();
    let smart = panel.mock_smart_object(1).unwrap();

    list.set_item_label(5, "X");
    list.set_item_label(5, "X");
    assert_eq!(smart.traffic().len(), 1);
    assert_eq!(smart.serial_input(Join::new(16)), Some("X".to_string()));

    list.set_item_label(5, "Y");
    assert_eq!(smart.traffic().len(), 2);
    assert_eq!(smart.serial_input(Join::new(16)), Some("Y".to_string()));
}

#[test]
fn item_labels_cache_per_index() {
    let panel = Arc::new(MockPanel::new());
    let list = DynamicButtonList::new(panel.clone(), 1).unwrap();
    let smart = panel.mock_smart_object(1).unwrap();

    list.set_item_label(0, "same");
    list.set_item_label(1, "same");
    list.set_item_label(0, "same");
    assert_eq!(smart.traffic().len(), 2);
}

#[test]
fn enable_round_trip_produces_two_writes() {
    let panel = Arc::new(MockPanel::new());
    let button = Button::new(panel.clone());
    button.set_enable_join(Join::new(100));

    button.enable(true).unwrap();
    button.enable(false).unwrap();

    let writes: Vec<_> = panel
        .traffic()
        .into_iter()
        .filter(|record| record.kind == SigKind::Digital && record.join == Join::new(100))
        .collect();
    assert_eq!(writes.len(), 2);
    assert_eq!(panel.digital_input(Join::new(100)), Some(false));
    assert!(!button.is_enabled());
}

#[test]
fn show_is_idempotent_but_first_write_transmits() {
    let panel = Arc::new(MockPanel::new());
    let button = Button::new(panel.clone());
    button.set_visibility_join(Join::new(10));

    // The cache starts unwritten, so even "hide" must reach the wire.
    button.show(false).unwrap();
    assert_eq!(panel.traffic().len(), 1);

    button.show(false).unwrap();
    assert_eq!(panel.traffic().len(), 1);

    button.show(true).unwrap();
    button.show(true).unwrap();
    assert_eq!(panel.traffic().len(), 2);
}

#[test]
fn unbound_visibility_join_defaults_to_visible() {
    let panel = Arc::new(MockPanel::new());
    let button = Button::new(panel.clone());

    assert!(button.is_visible());

    // Showing an always-visible control is a no-op; hiding it cannot be
    // honored.
    button.show(true).unwrap();
    assert_eq!(
        button.show(false),
        Err(ControlError::UnboundJoin { op: "show" })
    );
    assert!(panel.traffic().is_empty());
}

#[test]
fn unbound_enable_join_defaults_to_enabled() {
    let panel = Arc::new(MockPanel::new());
    let button = Button::new(panel.clone());

    assert!(button.is_enabled());
    button.enable(true).unwrap();
    assert_eq!(
        button.enable(false),
        Err(ControlError::UnboundJoin { op: "enable" })
    );
}

#[test]
fn selected_state_requires_a_press_join() {
    let panel = Arc::new(MockPanel::new());
    let button = Button::new(panel.clone());

    assert_eq!(
        button.set_selected(true),
        Err(ControlError::UnboundJoin { op: "set selected" })
    );

    button.set_press_join(Join::new(8));
    button.set_selected(true).unwrap();
    button.set_selected(true).unwrap();
    assert_eq!(panel.digital_input(Join::new(8)), Some(true));

    let writes: Vec<_> = panel
        .traffic()
        .into_iter()
        .filter(|record| record.join == Join::new(8))
        .collect();
    assert_eq!(writes.len(), 1);
}

#[test]
fn mode_writes_are_cached() {
    let panel = Arc::new(MockPanel::new());
    let button = MultiModeButton::new(panel.clone());

    assert_eq!(
        button.set_mode(2),
        Err(ControlError::UnboundJoin { op: "set mode" })
    );

    button.set_mode_join(Join::new(40));
    button.set_mode(2).unwrap();
    button.set_mode(2).unwrap();
    button.set_mode(3).unwrap();

    let writes: Vec<_> = panel
        .traffic()
        .into_iter()
        .filter(|record| record.join == Join::new(40))
        .collect();
    assert_eq!(writes.len(), 2);
    assert_eq!(panel.analog_input(Join::new(40)), Some(3));
}

#[test]
fn mode_zero_transmits_on_a_fresh_control() {
    let panel = Arc::new(MockPanel::new());
    let button = MultiModeButton::new(panel.clone());
    button.set_mode_join(Join::new(40));

    button.set_mode(0).unwrap();
    assert_eq!(panel.analog_input(Join::new(40)), Some(0));
}
