//! List behaviors: scrolling, counts, item state and smart-object feedback.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use jf_core::{Join, SigKind, SigValue};
use jf_panel::MockPanel;
use jf_controls::{
    Control, ControlError, DynamicButtonList, EmbeddedVideo, SpinnerList, SubpageReferenceList,
    TabButton,
};

fn analog_writes_at(panel: &MockPanel, id: u32, join: Join) -> Vec<u16> {
    panel
        .mock_smart_object(id)
        .unwrap()
        .traffic()
        .into_iter()
        .filter(|record| record.kind == SigKind::Analog && record.join == join)
        .map(|record| record.value.as_analog().unwrap())
        .collect()
}

#[test]
fn scroll_sends_a_nudge_before_the_real_target() {
    let panel = Arc::new(MockPanel::new());
    let list = SubpageReferenceList::new(panel.clone(), 1).unwrap();

    list.scroll_to_item(4).unwrap();

    // 1-based target is 5; the nudge precedes it so the firmware's input
    // de-duplication cannot swallow a repeated target.
    assert_eq!(analog_writes_at(&panel, 1, Join::new(2)), vec![6, 5]);
}

#[test]
fn scroll_nudge_can_be_disabled() {
    let panel = Arc::new(MockPanel::new());
    let list = SubpageReferenceList::new(panel.clone(), 1).unwrap();
    list.set_scroll_nudge(false);

    list.scroll_to_item(4).unwrap();
    list.scroll_to_item(4).unwrap();

    assert_eq!(analog_writes_at(&panel, 1, Join::new(2)), vec![5, 5]);
}

#[test]
fn item_count_is_cached_and_zero_rescrolls() {
    let panel = Arc::new(MockPanel::new());
    let list = SubpageReferenceList::new(panel.clone(), 1).unwrap();
    list.set_scroll_nudge(false);

    list.set_number_of_items(3).unwrap();
    list.set_number_of_items(3).unwrap();
    assert_eq!(analog_writes_at(&panel, 1, Join::new(3)), vec![3]);
    assert!(analog_writes_at(&panel, 1, Join::new(2)).is_empty());

    // Emptying the list scrolls back to the top.
    list.set_number_of_items(0).unwrap();
    assert_eq!(analog_writes_at(&panel, 1, Join::new(3)), vec![3, 0]);
    assert_eq!(analog_writes_at(&panel, 1, Join::new(2)), vec![1]);
}

#[test]
fn row_state_reads_default_to_hidden_and_disabled() {
    let panel = Arc::new(MockPanel::new());
    let list = SubpageReferenceList::new(panel.clone(), 1).unwrap();

    assert!(!list.item_visible(100));
    assert!(!list.item_enabled(100));

    list.set_item_visible(100, true);
    list.set_item_enabled(100, true);
    assert!(list.item_visible(100));
    assert!(list.item_enabled(100));

    // Repeats are suppressed per index.
    list.set_item_visible(100, true);
    let smart = panel.mock_smart_object(1).unwrap();
    let digital_writes = smart
        .traffic()
        .into_iter()
        .filter(|record| record.kind == SigKind::Digital)
        .count();
    assert_eq!(digital_writes, 2);
}

#[test]
fn is_moving_feedback_is_gated_by_visibility() {
    let panel = Arc::new(MockPanel::new());
    let list = SubpageReferenceList::new(panel.clone(), 1).unwrap();
    list.set_visibility_join(Join::new(60));

    let moving_states = Arc::new(Mutex::new(Vec::new()));
    let moving_in_handler = Arc::clone(&moving_states);
    list.on_is_moving(move |moving| {
        moving_in_handler.lock().unwrap().push(moving);
    });

    let smart = panel.mock_smart_object(1).unwrap();

    // Hidden list: feedback arrives but no event fires.
    list.show(false).unwrap();
    smart.raise_output(Join::new(1), SigValue::Digital(true));
    assert!(moving_states.lock().unwrap().is_empty());

    list.show(true).unwrap();
    smart.raise_output(Join::new(1), SigValue::Digital(true));
    smart.raise_output(Join::new(1), SigValue::Digital(false));
    assert_eq!(*moving_states.lock().unwrap(), vec![true, false]);
}

#[test]
fn dynamic_button_list_maps_wire_indices_to_events() {
    let panel = Arc::new(MockPanel::new());
    let list = DynamicButtonList::new(panel.clone(), 2).unwrap();
    let smart = panel.mock_smart_object(2).unwrap();

    let clicks = Arc::new(Mutex::new(Vec::new()));
    let clicks_in_handler = Arc::clone(&clicks);
    list.on_button_clicked(move |index| {
        clicks_in_handler.lock().unwrap().push(index);
    });

    let holds = Arc::new(AtomicUsize::new(0));
    let holds_in_handler = Arc::clone(&holds);
    list.on_button_held(move |_| {
        holds_in_handler.fetch_add(1, Ordering::SeqCst);
    });

    // Clicked and held outputs carry 1-based indices.
    smart.raise_output(Join::new(1), SigValue::Analog(1));
    smart.raise_output(Join::new(1), SigValue::Analog(4));
    smart.raise_output(Join::new(2), SigValue::Analog(2));

    assert_eq!(*clicks.lock().unwrap(), vec![0, 3]);
    assert_eq!(holds.load(Ordering::SeqCst), 1);
}

#[test]
fn dynamic_button_list_bulk_labels_set_count_first() {
    let panel = Arc::new(MockPanel::new());
    let list = DynamicButtonList::new(panel.clone(), 2).unwrap();
    let smart = panel.mock_smart_object(2).unwrap();

    list.set_item_labels(&["a", "b", "c"]).unwrap();

    assert_eq!(smart.analog_input(Join::new(4)), Some(3));
    assert_eq!(smart.serial_input(Join::new(11)), Some("a".to_string()));
    assert_eq!(smart.serial_input(Join::new(12)), Some("b".to_string()));
    assert_eq!(smart.serial_input(Join::new(13)), Some("c".to_string()));

    list.set_item_icons(&["x", "y", "z"]).unwrap();
    assert_eq!(smart.serial_input(Join::new(2011)), Some("x".to_string()));
    assert_eq!(smart.serial_input(Join::new(2013)), Some("z".to_string()));
}

#[test]
fn dynamic_button_list_item_states_use_their_join_banks() {
    let panel = Arc::new(MockPanel::new());
    let list = DynamicButtonList::new(panel.clone(), 2).unwrap();
    let smart = panel.mock_smart_object(2).unwrap();

    list.set_item_selected(0, true);
    list.set_item_enabled(1, true);
    list.set_item_visible(2, true);

    assert_eq!(smart.digital_input(Join::new(11)), Some(true));
    assert_eq!(smart.digital_input(Join::new(2012)), Some(true));
    assert_eq!(smart.digital_input(Join::new(4013)), Some(true));
}

#[test]
fn tab_button_interleaves_select_and_press_joins() {
    let panel = Arc::new(MockPanel::new());
    let tabs = TabButton::new(panel.clone(), 3, None).unwrap();
    let smart = panel.mock_smart_object(3).unwrap();

    tabs.set_item_selected(0, true);
    tabs.set_item_selected(1, true);
    assert_eq!(smart.digital_input(Join::new(2)), Some(true));
    assert_eq!(smart.digital_input(Join::new(4)), Some(true));

    let pressed = Arc::new(Mutex::new(Vec::new()));
    let pressed_in_handler = Arc::clone(&pressed);
    tabs.on_button_pressed(move |index| {
        pressed_in_handler.lock().unwrap().push(index);
    });

    // Press outputs sit on joins 1, 3, 5, ...
    smart.raise_output(Join::new(1), SigValue::Digital(true));
    smart.raise_output(Join::new(3), SigValue::Digital(true));
    assert_eq!(*pressed.lock().unwrap(), vec![0, 1]);
}

#[test]
fn spinner_list_round_trips_selection_indices() {
    let panel = Arc::new(MockPanel::new());
    let spinner = SpinnerList::new(panel.clone(), 4).unwrap();
    let smart = panel.mock_smart_object(4).unwrap();

    spinner.set_item_labels(&["Mon", "Tue", "Wed"]);
    assert_eq!(smart.analog_input(Join::new(3)), Some(3));
    assert_eq!(smart.serial_input(Join::new(11)), Some("Mon".to_string()));

    spinner.select_item(2);
    assert_eq!(smart.analog_input(Join::new(2)), Some(3));

    let selected = Arc::new(Mutex::new(Vec::new()));
    let selected_in_handler = Arc::clone(&selected);
    spinner.on_item_selected(move |index| {
        selected_in_handler.lock().unwrap().push(index);
    });

    smart.raise_output(Join::new(1), SigValue::Analog(3));
    assert_eq!(*selected.lock().unwrap(), vec![2]);
}

#[test]
fn embedded_video_bounds_source_indices() {
    let panel = Arc::new(MockPanel::new());
    let video = EmbeddedVideo::new(panel.clone(), 5).unwrap();
    video.set_max_sources(2);

    assert_eq!(
        video.set_video_url(2, "rtsp://cam"),
        Err(ControlError::IndexOutOfRange {
            what: "video source",
            index: 2,
            max: 2,
        })
    );

    video.set_video_url(1, "rtsp://cam").unwrap();
    let smart = panel.mock_smart_object(5).unwrap();
    assert_eq!(smart.serial_input(Join::new(51)), Some("rtsp://cam".to_string()));
}

#[test]
fn embedded_video_pulses_on_off_when_switching_sources_while_on() {
    let panel = Arc::new(MockPanel::new());
    let video = EmbeddedVideo::new(panel.clone(), 5).unwrap();
    let smart = panel.mock_smart_object(5).unwrap();

    video.set_on_off(true);
    video.set_source(3);

    let on_off_writes: Vec<bool> = smart
        .traffic()
        .into_iter()
        .filter(|record| record.kind == SigKind::Digital && record.join == Join::new(1))
        .map(|record| record.value.as_digital().unwrap())
        .collect();
    // Initial on, then the off/on pulse after the source change.
    assert_eq!(on_off_writes, vec![true, false, true]);

    // Re-sending the same source neither writes nor pulses.
    video.set_source(3);
    let analog_writes = analog_writes_at(&panel, 5, Join::new(1));
    assert_eq!(analog_writes, vec![3]);
}
