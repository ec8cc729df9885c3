//! Recursive visibility and the feedback path.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use jf_core::{Join, SigValue};
use jf_panel::MockPanel;
use jf_controls::{Button, Control, PressButton, Subpage, SubpageReferenceList};

#[test]
fn press_events_do_not_fire_inside_a_hidden_row() {
    let panel = Arc::new(MockPanel::new());
    let list = SubpageReferenceList::new(panel.clone(), 1).unwrap();
    list.set_digital_increment(10);

    let row = Arc::new(Subpage::with_parent(
        panel.clone(),
        Some(list.as_parent()),
        0,
    ));
    let button = Button::with_parent(panel.clone(), row.clone());
    button.set_press_join(Join::new(1));

    let presses = Arc::new(AtomicUsize::new(0));
    let presses_in_handler = Arc::clone(&presses);
    button.on_pressed(move || {
        presses_in_handler.fetch_add(1, Ordering::SeqCst);
    });

    // The row has never been shown, so its cached state reads hidden. The
    // button itself is visible (no visibility join), but not recursively.
    assert!(button.is_visible());
    assert!(!button.is_visible_recursive());

    // Press feedback arrives at the slot-resolved join: (4011 - 1) + 1.
    panel.raise_output(Join::new(4011), SigValue::Digital(true));
    assert_eq!(presses.load(Ordering::SeqCst), 0);

    list.set_item_visible(0, true);
    assert!(button.is_visible_recursive());
    panel.raise_output(Join::new(4011), SigValue::Digital(true));
    assert_eq!(presses.load(Ordering::SeqCst), 1);
}

#[test]
fn subpage_visibility_routes_through_the_list_rows() {
    let panel = Arc::new(MockPanel::new());
    let list = SubpageReferenceList::new(panel.clone(), 1).unwrap();
    let smart = panel.mock_smart_object(1).unwrap();

    let row = Arc::new(Subpage::with_parent(
        panel.clone(),
        Some(list.as_parent()),
        3,
    ));

    assert!(!row.is_visible());
    row.show(true).unwrap();
    assert!(row.is_visible());
    assert!(list.item_visible(3));

    // The row write lands on the list's item-visible join: 2011 + 3.
    assert_eq!(smart.digital_input(Join::new(2014)), Some(true));

    row.enable(true).unwrap();
    assert!(row.is_enabled());
    // Item enable joins start at 11.
    assert_eq!(smart.digital_input(Join::new(14)), Some(true));
}

#[test]
fn repointing_the_press_join_moves_the_subscription() {
    let panel = Arc::new(MockPanel::new());
    let button = Button::new(panel.clone());
    button.set_press_join(Join::new(5));

    let presses = Arc::new(AtomicUsize::new(0));
    let presses_in_handler = Arc::clone(&presses);
    button.on_pressed(move || {
        presses_in_handler.fetch_add(1, Ordering::SeqCst);
    });

    panel.raise_output(Join::new(5), SigValue::Digital(true));
    assert_eq!(presses.load(Ordering::SeqCst), 1);

    button.set_press_join(Join::new(6));
    panel.raise_output(Join::new(5), SigValue::Digital(true));
    assert_eq!(presses.load(Ordering::SeqCst), 1);

    panel.raise_output(Join::new(6), SigValue::Digital(true));
    assert_eq!(presses.load(Ordering::SeqCst), 2);
}

#[test]
fn dropping_a_button_unregisters_its_feedback() {
    let panel = Arc::new(MockPanel::new());
    let presses = Arc::new(AtomicUsize::new(0));

    {
        let button = Button::new(panel.clone());
        button.set_press_join(Join::new(9));
        let presses_in_handler = Arc::clone(&presses);
        button.on_pressed(move || {
            presses_in_handler.fetch_add(1, Ordering::SeqCst);
        });
        panel.raise_output(Join::new(9), SigValue::Digital(true));
        assert_eq!(presses.load(Ordering::SeqCst), 1);
    }

    panel.raise_output(Join::new(9), SigValue::Digital(true));
    assert_eq!(presses.load(Ordering::SeqCst), 1);
}

#[test]
fn release_feedback_follows_the_wire_value() {
    let panel = Arc::new(MockPanel::new());
    let button = Button::new(panel.clone());
    button.set_press_join(Join::new(2));

    let releases = Arc::new(AtomicUsize::new(0));
    let releases_in_handler = Arc::clone(&releases);
    button.on_released(move || {
        releases_in_handler.fetch_add(1, Ordering::SeqCst);
    });

    panel.raise_output(Join::new(2), SigValue::Digital(true));
    panel.raise_output(Join::new(2), SigValue::Digital(false));
    assert_eq!(releases.load(Ordering::SeqCst), 1);
}

#[test]
fn hidden_parent_gates_simulated_presses_too() {
    let panel = Arc::new(MockPanel::new());
    let page = Arc::new(Subpage::new(panel.clone()));
    page.set_visibility_join(Join::new(50));

    let button = Button::with_parent(panel.clone(), page.clone());

    let presses = Arc::new(AtomicUsize::new(0));
    let presses_in_handler = Arc::clone(&presses);
    button.on_pressed(move || {
        presses_in_handler.fetch_add(1, Ordering::SeqCst);
    });

    button.press();
    assert_eq!(presses.load(Ordering::SeqCst), 0);

    page.show(true).unwrap();
    button.press();
    assert_eq!(presses.load(Ordering::SeqCst), 1);
}
