//! Join resolution through nested containers.

use std::sync::Arc;

use jf_core::Join;
use jf_panel::MockPanel;
use jf_controls::{
    Button, Control, JoinOffsets, Page, Subpage, SubpageReferenceList, TextControl,
};

#[test]
fn three_level_chain_adds_one_offset_per_level() {
    let panel = Arc::new(MockPanel::new());
    let list = SubpageReferenceList::new(panel.clone(), 1).unwrap();
    list.set_digital_start_join(11);
    list.set_digital_increment(10);

    let row = Arc::new(Subpage::with_parent(
        panel.clone(),
        Some(list.as_parent()),
        2,
    ));
    row.set_digital_offset(5);

    let button = Button::with_parent(panel.clone(), row.clone());
    button.set_visibility_join(Join::new(3));

    // list slot: (11 - 1) + 2 * 10 = 30, page: + 5, local: + 3.
    button.show(true).unwrap();
    assert_eq!(panel.digital_input(Join::new(38)), Some(true));
}

#[test]
fn list_slot_offsets_follow_the_default_start_joins() {
    let panel = Arc::new(MockPanel::new());
    let list = SubpageReferenceList::new(panel.clone(), 1).unwrap();
    list.set_digital_increment(10);

    let rows: Vec<Arc<Subpage>> = (0..3)
        .map(|index| {
            Arc::new(Subpage::with_parent(
                panel.clone(),
                Some(list.as_parent()),
                index,
            ))
        })
        .collect();

    assert_eq!(list.digital_join_offset(&*rows[0]), 4010);
    assert_eq!(list.digital_join_offset(&*rows[1]), 4020);
    assert_eq!(list.digital_join_offset(&*rows[2]), 4030);

    for row in &rows {
        let button = Button::with_parent(panel.clone(), row.clone());
        button.set_visibility_join(Join::new(1));
        button.show(true).unwrap();
    }

    assert_eq!(panel.digital_input(Join::new(4011)), Some(true));
    assert_eq!(panel.digital_input(Join::new(4021)), Some(true));
    assert_eq!(panel.digital_input(Join::new(4031)), Some(true));
}

#[test]
fn analog_and_serial_channels_offset_independently() {
    let panel = Arc::new(MockPanel::new());
    let list = SubpageReferenceList::new(panel.clone(), 1).unwrap();
    list.set_analog_increment(10);
    list.set_serial_increment(20);

    let row0 = Arc::new(Subpage::with_parent(
        panel.clone(),
        Some(list.as_parent()),
        0,
    ));
    let row1 = Arc::new(Subpage::with_parent(
        panel.clone(),
        Some(list.as_parent()),
        1,
    ));

    assert_eq!(list.analog_join_offset(&*row0), 10);
    assert_eq!(list.analog_join_offset(&*row1), 20);
    assert_eq!(list.serial_join_offset(&*row0), 10);
    assert_eq!(list.serial_join_offset(&*row1), 30);

    let label0 = Button::with_parent(panel.clone(), row0.clone());
    let label1 = Button::with_parent(panel.clone(), row1.clone());

    label0.set_text_at_join(Join::new(1), "Row 0").unwrap();
    label1.set_text_at_join(Join::new(1), "Row 1").unwrap();
    assert_eq!(panel.serial_input(Join::new(11)), Some("Row 0".to_string()));
    assert_eq!(panel.serial_input(Join::new(31)), Some("Row 1".to_string()));

    label0.set_analog_at_join(Join::new(2), 7).unwrap();
    label1.set_analog_at_join(Join::new(2), 9).unwrap();
    assert_eq!(panel.analog_input(Join::new(12)), Some(7));
    assert_eq!(panel.analog_input(Join::new(22)), Some(9));
}

#[test]
fn unbound_joins_survive_any_nesting() {
    let panel = Arc::new(MockPanel::new());
    let list = SubpageReferenceList::new(panel.clone(), 1).unwrap();
    list.set_digital_start_join(4011);
    list.set_digital_increment(25);

    let row = Arc::new(Subpage::with_parent(
        panel.clone(),
        Some(list.as_parent()),
        7,
    ));
    row.set_digital_offset(1000);
    row.set_analog_offset(999);
    row.set_serial_offset(1);

    assert_eq!(
        row.digital_join_with_offset(Join::UNBOUND, &*row),
        Join::UNBOUND
    );
    assert_eq!(
        row.analog_join_with_offset(Join::UNBOUND, &*row),
        Join::UNBOUND
    );
    assert_eq!(
        row.serial_join_with_offset(Join::UNBOUND, &*row),
        Join::UNBOUND
    );
}

#[test]
fn nested_pages_ask_their_parent_about_themselves() {
    let panel = Arc::new(MockPanel::new());
    let outer = Arc::new(Page::new(panel.clone()));
    outer.set_digital_offset(100);

    let middle = Arc::new(Subpage::with_parent(panel.clone(), Some(outer.clone()), 0));
    middle.set_digital_offset(20);

    let inner = Arc::new(Subpage::with_parent(panel.clone(), Some(middle.clone()), 0));
    inner.set_digital_offset(3);

    let button = Button::with_parent(panel.clone(), inner.clone());
    button.set_enable_join(Join::new(1));
    button.enable(false).unwrap();

    assert_eq!(panel.digital_input(Join::new(124)), Some(false));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn sentinel_propagates_regardless_of_offsets(
            outer_offset in any::<u16>(),
            inner_offset in any::<u16>(),
        ) {
            let panel = Arc::new(MockPanel::new());
            let outer = Arc::new(Page::new(panel.clone()));
            outer.set_digital_offset(outer_offset);
            let inner = Arc::new(Subpage::with_parent(panel.clone(), Some(outer), 0));
            inner.set_digital_offset(inner_offset);

            prop_assert_eq!(
                inner.digital_join_with_offset(Join::UNBOUND, &*inner),
                Join::UNBOUND
            );
        }

        #[test]
        fn bound_joins_accumulate_with_wrapping(
            join in 1..=u16::MAX,
            outer_offset in any::<u16>(),
            inner_offset in any::<u16>(),
        ) {
            let panel = Arc::new(MockPanel::new());
            let outer = Arc::new(Page::new(panel.clone()));
            outer.set_digital_offset(outer_offset);
            let inner = Arc::new(Subpage::with_parent(panel.clone(), Some(outer), 0));
            inner.set_digital_offset(inner_offset);

            let expected = join
                .wrapping_add(outer_offset)
                .wrapping_add(inner_offset);
            prop_assert_eq!(
                inner.digital_join_with_offset(Join::new(join), &*inner),
                Join::new(expected)
            );
        }
    }
}
