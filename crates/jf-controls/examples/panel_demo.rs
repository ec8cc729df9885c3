//! Drives a small control tree against the mock panel and prints the wire
//! traffic it produces.
//!
//! Run with `cargo run -p jf-controls --example panel_demo` to watch every
//! sig write at trace level.

use std::sync::Arc;

use jf_core::{Join, SigValue};
use jf_panel::MockPanel;
use jf_controls::{Button, PressButton, Subpage, SubpageReferenceList, TextControl};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let panel = Arc::new(MockPanel::new());

    // A three-row subpage reference list; each row shows one labeled button.
    let list = SubpageReferenceList::new(panel.clone(), 1).expect("valid smart object id");
    list.set_digital_increment(10);
    list.set_serial_increment(10);
    list.set_number_of_items(3).expect("count join is bound");

    let mut buttons = Vec::new();
    for index in 0..3 {
        let row = Arc::new(Subpage::with_parent(
            panel.clone(),
            Some(list.as_parent()),
            index,
        ));
        let button = Button::with_parent(panel.clone(), row.clone());
        button.set_press_join(Join::new(1));
        button.set_indirect_text_join(Join::new(1));
        button
            .set_text(&format!("Room {}", index + 1))
            .expect("text join is bound");
        button.on_pressed(move || println!("row {index} pressed"));

        list.set_item_visible(index, true);
        buttons.push((row, button));
    }

    // Play the panel: the user taps the second row. The press join resolves
    // through the list's slot math, so row 1 lives at 4011 + 10.
    panel.raise_output(Join::new(4021), SigValue::Digital(true));
    panel.raise_output(Join::new(4021), SigValue::Digital(false));

    println!("\ndevice traffic:");
    for record in panel.traffic() {
        println!("  {:?} {} = {:?}", record.kind, record.join, record.value);
    }

    let smart = panel.mock_smart_object(1).expect("valid smart object id");
    println!("\nsmart object 1 traffic:");
    for record in smart.traffic() {
        println!("  {:?} {} = {:?}", record.kind, record.join, record.value);
    }
}
