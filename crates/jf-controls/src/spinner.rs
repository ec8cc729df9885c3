//! Spinner lists.

use std::sync::{Arc, Mutex};

use jf_core::{Join, SigKind};
use jf_panel::{PanelDevice, SigEndpoint, SmartObject, SubscriptionId};

use crate::base::{Control, ControlBase};
use crate::error::ControlResult;
use crate::event::Event;
use crate::offsets::{ControlParent, Indexed};

// Spinner list smart-object joins.
const SPINNER_SELECT_ITEM_JOIN: Join = Join(2);
const SPINNER_NUMBER_OF_ITEMS_JOIN: Join = Join(3);
const SPINNER_NEXT_ITEM_JOIN: Join = Join(4);
const SPINNER_PREVIOUS_ITEM_JOIN: Join = Join(5);
const SPINNER_ITEM_VISIBLE_START_JOIN: u16 = 2011;
const SPINNER_ITEM_TEXT_START_JOIN: u16 = 11;
const SPINNER_ITEM_SELECTED_JOIN: Join = Join(1);

/// A wheel-style spinner list.
///
/// Writes go straight to the smart object's fixed joins; the spinner widget
/// keeps no caches of its own.
pub struct SpinnerList {
    inner: Arc<SpinnerInner>,
}

struct SpinnerInner {
    base: ControlBase,
    smart: Arc<dyn SmartObject>,
    on_item_selected: Event<u16>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl SpinnerList {
    pub fn new(panel: Arc<dyn PanelDevice>, smart_object_id: u32) -> ControlResult<Self> {
        Self::build(panel, smart_object_id, None)
    }

    pub fn with_parent(
        panel: Arc<dyn PanelDevice>,
        smart_object_id: u32,
        parent: Arc<dyn ControlParent>,
    ) -> ControlResult<Self> {
        Self::build(panel, smart_object_id, Some(parent))
    }

    fn build(
        panel: Arc<dyn PanelDevice>,
        smart_object_id: u32,
        parent: Option<Arc<dyn ControlParent>>,
    ) -> ControlResult<Self> {
        let smart = panel.smart_object(smart_object_id)?;
        let inner = Arc::new(SpinnerInner {
            base: ControlBase::new(panel, parent, 0),
            smart,
            on_item_selected: Event::new(),
            subscription: Mutex::new(None),
        });

        let weak = Arc::downgrade(&inner);
        let id = inner.smart.register_output_sig(
            SPINNER_ITEM_SELECTED_JOIN,
            SigKind::Analog,
            Arc::new(move |event| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if let Some(value) = event.value.as_analog() {
                    inner.on_item_selected.raise(&value.wrapping_sub(1));
                }
            }),
        );
        *inner.subscription.lock().unwrap() = Some(id);

        Ok(Self { inner })
    }

    /// Set the number of items in the wheel.
    pub fn set_number_of_items(&self, count: u16) {
        self.inner
            .smart
            .send_input_analog(SPINNER_NUMBER_OF_ITEMS_JOIN, count);
    }

    /// Select the item at the given index.
    pub fn select_item(&self, item: u16) {
        self.inner
            .smart
            .send_input_analog(SPINNER_SELECT_ITEM_JOIN, item.wrapping_add(1));
    }

    /// Scroll to the next item.
    pub fn next_item(&self) {
        self.inner
            .smart
            .send_input_digital(SPINNER_NEXT_ITEM_JOIN, true);
    }

    /// Scroll to the previous item.
    pub fn previous_item(&self) {
        self.inner
            .smart
            .send_input_digital(SPINNER_PREVIOUS_ITEM_JOIN, true);
    }

    /// Set the visibility of the item at the given index.
    pub fn set_item_visible(&self, item: u16, visible: bool) {
        let join = Join::new(SPINNER_ITEM_VISIBLE_START_JOIN.wrapping_add(item));
        self.inner.smart.send_input_digital(join, visible);
    }

    /// Set the label of the item at the given index.
    pub fn set_item_label(&self, item: u16, label: &str) {
        let join = Join::new(SPINNER_ITEM_TEXT_START_JOIN.wrapping_add(item));
        self.inner.smart.send_input_serial(join, label);
    }

    /// Set the item count and every label in one pass.
    pub fn set_item_labels(&self, labels: &[&str]) {
        self.set_number_of_items(labels.len() as u16);
        for (index, label) in labels.iter().enumerate() {
            self.set_item_label(index as u16, label);
        }
    }

    /// Raised when the user settles the wheel on an item.
    pub fn on_item_selected(&self, handler: impl Fn(u16) + Send + Sync + 'static) {
        self.inner
            .on_item_selected
            .subscribe(move |index| handler(*index));
    }
}

impl Indexed for SpinnerList {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for SpinnerList {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl Drop for SpinnerList {
    fn drop(&mut self) {
        if let Some(id) = self.inner.subscription.lock().unwrap().take() {
            self.inner.smart.unregister_output_sig(
                SPINNER_ITEM_SELECTED_JOIN,
                SigKind::Analog,
                id,
            );
        }
        self.inner.on_item_selected.clear();
    }
}
