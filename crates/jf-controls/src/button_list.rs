//! Dynamic button lists.

use std::sync::{Arc, Mutex};

use jf_core::{Join, SigKind, SigMapCache};
use jf_panel::{PanelDevice, SigEndpoint, SmartObject, SubscriptionId};

use crate::base::{Control, ControlBase};
use crate::error::ControlResult;
use crate::event::Event;
use crate::list::{ListJoins, ListSigs};
use crate::offsets::{ControlParent, Indexed};

// Dynamic button list smart-object joins.
const DBL_SCROLL_TO_ITEM_JOIN: Join = Join(3);
const DBL_NUMBER_OF_ITEMS_JOIN: Join = Join(4);
const DBL_ITEM_CLICKED_JOIN: Join = Join(1);
const DBL_ITEM_HELD_JOIN: Join = Join(2);
const DBL_IS_MOVING_JOIN: Join = Join(2);
const DBL_SELECTED_START_JOIN: u16 = 11;
const DBL_ENABLED_START_JOIN: u16 = 2011;
const DBL_VISIBLE_START_JOIN: u16 = 4011;
const DBL_TEXT_START_JOIN: u16 = 11;
const DBL_ICON_START_JOIN: u16 = 2011;

/// A scrolling list of dynamically populated buttons.
///
/// The smart object owns a fixed join map: one serial text and icon join,
/// and one digital selected/enabled/visible join, per item index. Click and
/// held feedback arrive as 1-based analog indices.
pub struct DynamicButtonList {
    inner: Arc<DblInner>,
}

struct DblInner {
    base: ControlBase,
    list: ListSigs,
    visible: SigMapCache<u16, bool>,
    enabled: SigMapCache<u16, bool>,
    selected: SigMapCache<u16, bool>,
    labels: SigMapCache<u16, String>,
    icons: SigMapCache<u16, String>,
    labels_section: Mutex<()>,
    icons_section: Mutex<()>,
    on_button_clicked: Event<u16>,
    on_button_held: Event<u16>,
    on_button_released: Event<u16>,
    subscriptions: Mutex<Vec<(Join, SubscriptionId)>>,
}

impl DynamicButtonList {
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
        let inner = Arc::new(DblInner {
            base: ControlBase::new(panel, parent, 0),
            list: ListSigs::new(
                smart,
                ListJoins {
                    scroll_to_item: DBL_SCROLL_TO_ITEM_JOIN,
                    number_of_items: DBL_NUMBER_OF_ITEMS_JOIN,
                    is_moving: DBL_IS_MOVING_JOIN,
                },
            ),
            visible: SigMapCache::new(),
            enabled: SigMapCache::new(),
            selected: SigMapCache::new(),
            labels: SigMapCache::new(),
            icons: SigMapCache::new(),
            labels_section: Mutex::new(()),
            icons_section: Mutex::new(()),
            on_button_clicked: Event::new(),
            on_button_held: Event::new(),
            on_button_released: Event::new(),
            subscriptions: Mutex::new(Vec::new()),
        });

        let weak = Arc::downgrade(&inner);
        inner.list.attach_moving(Arc::new(move |event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Some(moving) = event.value.as_digital() {
                inner
                    .list
                    .simulate_moving(inner.base.is_visible_recursive(), moving);
            }
        }));

        let weak = Arc::downgrade(&inner);
        let clicked = inner.list.smart().register_output_sig(
            DBL_ITEM_CLICKED_JOIN,
            SigKind::Analog,
            Arc::new(move |event| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if let Some(value) = event.value.as_analog() {
                    inner.click(value.wrapping_sub(1));
                }
            }),
        );
        let weak = Arc::downgrade(&inner);
        let held = inner.list.smart().register_output_sig(
            DBL_ITEM_HELD_JOIN,
            SigKind::Analog,
            Arc::new(move |event| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if let Some(value) = event.value.as_analog() {
                    inner.hold(value.wrapping_sub(1));
                }
            }),
        );
        inner
            .subscriptions
            .lock()
            .unwrap()
            .extend([(DBL_ITEM_CLICKED_JOIN, clicked), (DBL_ITEM_HELD_JOIN, held)]);

        Ok(Self { inner })
    }

    pub fn max_size(&self) -> u16 {
        self.inner.list.max_size()
    }

    pub fn set_max_size(&self, max_size: u16) {
        self.inner.list.set_max_size(max_size);
    }

    pub fn scroll_nudge(&self) -> bool {
        self.inner.list.scroll_nudge()
    }

    pub fn set_scroll_nudge(&self, enabled: bool) {
        self.inner.list.set_scroll_nudge(enabled);
    }

    /// Scroll to the given item.
    pub fn scroll_to_item(&self, item: u16) -> ControlResult<()> {
        self.inner.list.scroll_to_item(&self.inner.base, item)
    }

    /// Set the number of items shown by the list.
    pub fn set_number_of_items(&self, count: u16) -> ControlResult<()> {
        self.inner.list.set_number_of_items(&self.inner.base, count)
    }

    /// Set the visible state of the button at the given index.
    pub fn set_item_visible(&self, index: u16, visible: bool) {
        let join = Join::new(DBL_VISIBLE_START_JOIN.wrapping_add(index));
        self.inner.visible.send_if_changed(index, visible, |v| {
            self.inner.list.smart().send_input_digital(join, *v)
        });
    }

    /// Set the enabled state of the button at the given index.
    pub fn set_item_enabled(&self, index: u16, enabled: bool) {
        let join = Join::new(DBL_ENABLED_START_JOIN.wrapping_add(index));
        self.inner.enabled.send_if_changed(index, enabled, |v| {
            self.inner.list.smart().send_input_digital(join, *v)
        });
    }

    /// Set the selected state of the button at the given index.
    pub fn set_item_selected(&self, index: u16, selected: bool) {
        let join = Join::new(DBL_SELECTED_START_JOIN.wrapping_add(index));
        self.inner.selected.send_if_changed(index, selected, |v| {
            self.inner.list.smart().send_input_digital(join, *v)
        });
    }

    /// Set the label of the button at the given index.
    pub fn set_item_label(&self, index: u16, text: &str) {
        let join = Join::new(DBL_TEXT_START_JOIN.wrapping_add(index));
        self.inner
            .labels
            .send_if_changed(index, text.to_string(), |v| {
                self.inner.list.smart().send_input_serial(join, v)
            });
    }

    /// Set the icon of the button at the given index.
    pub fn set_item_icon(&self, index: u16, icon: &str) {
        let join = Join::new(DBL_ICON_START_JOIN.wrapping_add(index));
        self.inner
            .icons
            .send_if_changed(index, icon.to_string(), |v| {
                self.inner.list.smart().send_input_serial(join, v)
            });
    }

    /// Set the item count and every button label in one pass.
    pub fn set_item_labels(&self, labels: &[&str]) -> ControlResult<()> {
        let _section = self.inner.labels_section.lock().unwrap();
        self.set_number_of_items(labels.len() as u16)?;
        for (index, label) in labels.iter().enumerate() {
            self.set_item_label(index as u16, label);
        }
        Ok(())
    }

    /// Set the item count and every button icon in one pass.
    pub fn set_item_icons(&self, icons: &[&str]) -> ControlResult<()> {
        let _section = self.inner.icons_section.lock().unwrap();
        self.set_number_of_items(icons.len() as u16)?;
        for (index, icon) in icons.iter().enumerate() {
            self.set_item_icon(index as u16, icon);
        }
        Ok(())
    }

    /// Simulate a click on the button at the given index.
    pub fn click(&self, index: u16) {
        self.inner.click(index);
    }

    /// Simulate the button at the given index being held.
    pub fn hold(&self, index: u16) {
        self.inner.hold(index);
    }

    /// Simulate a release on the button at the given index.
    pub fn release(&self, index: u16) {
        self.inner.release(index);
    }

    /// Simulate the user starting or stopping a scroll.
    pub fn set_is_moving(&self, moving: bool) {
        self.inner
            .list
            .simulate_moving(self.inner.base.is_visible_recursive(), moving);
    }

    /// Raised when a button is pressed and released without being held.
    pub fn on_button_clicked(&self, handler: impl Fn(u16) + Send + Sync + 'static) {
        self.inner
            .on_button_clicked
            .subscribe(move |index| handler(*index));
    }

    /// Raised when a button has been pressed long enough for the panel to
    /// report a hold.
    pub fn on_button_held(&self, handler: impl Fn(u16) + Send + Sync + 'static) {
        self.inner
            .on_button_held
            .subscribe(move |index| handler(*index));
    }

    /// Raised when a button is released.
    pub fn on_button_released(&self, handler: impl Fn(u16) + Send + Sync + 'static) {
        self.inner
            .on_button_released
            .subscribe(move |index| handler(*index));
    }

    /// Raised when the user starts or stops scrolling the list.
    pub fn on_is_moving(&self, handler: impl Fn(bool) + Send + Sync + 'static) {
        self.inner.list.subscribe_on_is_moving(handler);
    }
}

impl DblInner {
    fn click(&self, index: u16) {
        if self.base.is_visible_recursive() {
            self.on_button_clicked.raise(&index);
        }
    }

    fn hold(&self, index: u16) {
        if self.base.is_visible_recursive() {
            self.on_button_held.raise(&index);
        }
    }

    fn release(&self, index: u16) {
        if self.base.is_visible_recursive() {
            self.on_button_released.raise(&index);
        }
    }
}

impl Indexed for DynamicButtonList {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for DynamicButtonList {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl Drop for DynamicButtonList {
    fn drop(&mut self) {
        self.inner.list.detach();
        for (join, id) in self.inner.subscriptions.lock().unwrap().drain(..) {
            self.inner
                .list
                .smart()
                .unregister_output_sig(join, SigKind::Analog, id);
        }
        self.inner.on_button_clicked.clear();
        self.inner.on_button_held.clear();
        self.inner.on_button_released.clear();
    }
}
