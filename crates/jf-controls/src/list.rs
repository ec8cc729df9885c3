//! Smart-object lists.

use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use jf_core::{Join, SigMapCache};
use jf_panel::{PanelDevice, SigCallback, SigEndpoint, SmartObject, SubscriptionId};

use crate::base::{Control, ControlBase};
use crate::error::{ControlError, ControlResult};
use crate::event::Event;
use crate::offsets::{ControlParent, Indexed, ItemStates, JoinOffsets};

/// The fixed smart-object joins of a list template.
pub(crate) struct ListJoins {
    pub scroll_to_item: Join,
    pub number_of_items: Join,
    pub is_moving: Join,
}

/// List plumbing shared by the smart-object list types: the item count
/// cache, scrolling and the is-moving feedback.
pub(crate) struct ListSigs {
    smart: Arc<dyn SmartObject>,
    joins: ListJoins,
    count: Mutex<Option<u16>>,
    max_size: AtomicU16,
    scroll_nudge: AtomicBool,
    on_is_moving: Event<bool>,
    moving_subscription: Mutex<Option<SubscriptionId>>,
}

impl ListSigs {
    pub fn new(smart: Arc<dyn SmartObject>, joins: ListJoins) -> Self {
        Self {
            smart,
            joins,
            count: Mutex::new(None),
            max_size: AtomicU16::new(0),
            scroll_nudge: AtomicBool::new(true),
            on_is_moving: Event::new(),
            moving_subscription: Mutex::new(None),
        }
    }

    pub fn smart(&self) -> &Arc<dyn SmartObject> {
        &self.smart
    }

    pub fn max_size(&self) -> u16 {
        self.max_size.load(Ordering::Relaxed)
    }

    pub fn set_max_size(&self, max_size: u16) {
        self.max_size.store(max_size, Ordering::Relaxed);
    }

    pub fn scroll_nudge(&self) -> bool {
        self.scroll_nudge.load(Ordering::Relaxed)
    }

    pub fn set_scroll_nudge(&self, enabled: bool) {
        self.scroll_nudge.store(enabled, Ordering::Relaxed);
    }

    /// Scroll the list to the given item.
    ///
    /// The wire value is 1-based. With the nudge enabled, a throwaway value
    /// precedes the real one: the panel firmware de-duplicates analog
    /// inputs, and without the nudge a repeated scroll target is swallowed.
    pub fn scroll_to_item(&self, base: &ControlBase, item: u16) -> ControlResult<()> {
        let join = self.joins.scroll_to_item;
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin {
                op: "scroll to item",
            });
        }
        let resolved = base.resolve_analog(join);
        let value = item.wrapping_add(1);
        if self.scroll_nudge() {
            self.smart.send_input_analog(resolved, value.wrapping_add(1));
        }
        self.smart.send_input_analog(resolved, value);
        Ok(())
    }

    /// Set the number of items shown by the list.
    pub fn set_number_of_items(&self, base: &ControlBase, count: u16) -> ControlResult<()> {
        {
            let mut cached = self.count.lock().unwrap();
            let join = self.joins.number_of_items;
            if join.is_unbound() {
                return Err(ControlError::UnboundJoin {
                    op: "set number of items",
                });
            }
            if *cached == Some(count) {
                return Ok(());
            }
            let resolved = base.resolve_analog(join);
            *cached = Some(count);
            self.smart.send_input_analog(resolved, count);
        }
        // An emptied list must scroll back to the top, or it renders blank
        // after being repopulated.
        if count == 0 {
            self.scroll_to_item(base, 0)?;
        }
        Ok(())
    }

    pub fn simulate_moving(&self, visible: bool, moving: bool) {
        if visible {
            self.on_is_moving.raise(&moving);
        }
    }

    pub fn subscribe_on_is_moving(&self, handler: impl Fn(bool) + Send + Sync + 'static) {
        self.on_is_moving.subscribe(move |moving| handler(*moving));
    }

    /// Register the is-moving feedback callback on the smart object.
    pub fn attach_moving(&self, callback: SigCallback) {
        let join = self.joins.is_moving;
        if join.is_unbound() {
            return;
        }
        let id = self
            .smart
            .register_output_sig(join, jf_core::SigKind::Digital, callback);
        *self.moving_subscription.lock().unwrap() = Some(id);
    }

    pub fn detach(&self) {
        if let Some(id) = self.moving_subscription.lock().unwrap().take() {
            self.smart
                .unregister_output_sig(self.joins.is_moving, jf_core::SigKind::Digital, id);
        }
        self.on_is_moving.clear();
    }
}

// Subpage reference list smart-object joins.
const SRL_SCROLL_TO_ITEM_JOIN: Join = Join(2);
const SRL_IS_MOVING_JOIN: Join = Join(1);
const SRL_NUMBER_OF_ITEMS_JOIN: Join = Join(3);
const SRL_ITEM_ENABLED_START_JOIN: u16 = 11;
const SRL_ITEM_VISIBLE_START_JOIN: u16 = 2011;

// Start join defaults from the panel design tool's environment.
const SRL_DEFAULT_DIGITAL_START: u16 = 4011;
const SRL_DEFAULT_ANALOG_START: u16 = 11;
const SRL_DEFAULT_SERIAL_START: u16 = 11;

#[derive(Debug, Clone, Copy)]
struct SlotJoins {
    start: u16,
    increment: u16,
}

struct SrlSlots {
    digital: SlotJoins,
    analog: SlotJoins,
    serial: SlotJoins,
}

/// A subpage reference list: one set of child controls projected onto N
/// repeated rows.
///
/// The list's offset for a child is a function of the child's index:
/// `(start - 1) + index * increment` per channel. The `- 1` compensates for
/// the wire's 1-based numbering of repeated slots against the 0-based local
/// index; changing it moves every child by one full slot.
pub struct SubpageReferenceList {
    inner: Arc<SrlInner>,
}

struct SrlInner {
    base: ControlBase,
    list: ListSigs,
    slots: Mutex<SrlSlots>,
    visible_items: SigMapCache<u16, bool>,
    enabled_items: SigMapCache<u16, bool>,
}

impl SubpageReferenceList {
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
        let inner = Arc::new(SrlInner {
            base: ControlBase::new(panel, parent, 0),
            list: ListSigs::new(
                smart,
                ListJoins {
                    scroll_to_item: SRL_SCROLL_TO_ITEM_JOIN,
                    number_of_items: SRL_NUMBER_OF_ITEMS_JOIN,
                    is_moving: SRL_IS_MOVING_JOIN,
                },
            ),
            slots: Mutex::new(SrlSlots {
                digital: SlotJoins {
                    start: SRL_DEFAULT_DIGITAL_START,
                    increment: 0,
                },
                analog: SlotJoins {
                    start: SRL_DEFAULT_ANALOG_START,
                    increment: 0,
                },
                serial: SlotJoins {
                    start: SRL_DEFAULT_SERIAL_START,
                    increment: 0,
                },
            }),
            visible_items: SigMapCache::new(),
            enabled_items: SigMapCache::new(),
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

        Ok(Self { inner })
    }

    /// This list as a parent handle for its subpages.
    pub fn as_parent(&self) -> Arc<dyn ControlParent> {
        self.inner.clone()
    }

    pub fn digital_start_join(&self) -> u16 {
        self.inner.slots.lock().unwrap().digital.start
    }

    pub fn set_digital_start_join(&self, start: u16) {
        self.inner.slots.lock().unwrap().digital.start = start;
    }

    pub fn analog_start_join(&self) -> u16 {
        self.inner.slots.lock().unwrap().analog.start
    }

    pub fn set_analog_start_join(&self, start: u16) {
        self.inner.slots.lock().unwrap().analog.start = start;
    }

    pub fn serial_start_join(&self) -> u16 {
        self.inner.slots.lock().unwrap().serial.start
    }

    pub fn set_serial_start_join(&self, start: u16) {
        self.inner.slots.lock().unwrap().serial.start = start;
    }

    pub fn digital_increment(&self) -> u16 {
        self.inner.slots.lock().unwrap().digital.increment
    }

    pub fn set_digital_increment(&self, increment: u16) {
        self.inner.slots.lock().unwrap().digital.increment = increment;
    }

    pub fn analog_increment(&self) -> u16 {
        self.inner.slots.lock().unwrap().analog.increment
    }

    pub fn set_analog_increment(&self, increment: u16) {
        self.inner.slots.lock().unwrap().analog.increment = increment;
    }

    pub fn serial_increment(&self) -> u16 {
        self.inner.slots.lock().unwrap().serial.increment
    }

    pub fn set_serial_increment(&self, increment: u16) {
        self.inner.slots.lock().unwrap().serial.increment = increment;
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

    /// Set the number of rows shown by the list.
    pub fn set_number_of_items(&self, count: u16) -> ControlResult<()> {
        self.inner.list.set_number_of_items(&self.inner.base, count)
    }

    /// Set the visible state of the row at the given index.
    pub fn set_item_visible(&self, index: u16, visible: bool) {
        ItemStates::set_item_visible(&*self.inner, index, visible);
    }

    /// The cached visible state of the row at the given index.
    pub fn item_visible(&self, index: u16) -> bool {
        ItemStates::item_visible(&*self.inner, index)
    }

    /// Set the enabled state of the row at the given index.
    pub fn set_item_enabled(&self, index: u16, enabled: bool) {
        ItemStates::set_item_enabled(&*self.inner, index, enabled);
    }

    /// The cached enabled state of the row at the given index.
    pub fn item_enabled(&self, index: u16) -> bool {
        ItemStates::item_enabled(&*self.inner, index)
    }

    /// Simulate the user starting or stopping a scroll.
    pub fn set_is_moving(&self, moving: bool) {
        self.inner
            .list
            .simulate_moving(self.inner.base.is_visible_recursive(), moving);
    }

    /// Raised when the user starts or stops scrolling the list.
    pub fn on_is_moving(&self, handler: impl Fn(bool) + Send + Sync + 'static) {
        self.inner.list.subscribe_on_is_moving(handler);
    }
}

impl Indexed for SubpageReferenceList {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for SubpageReferenceList {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl JoinOffsets for SubpageReferenceList {
    fn digital_join_offset(&self, child: &dyn Indexed) -> u16 {
        self.inner.digital_join_offset(child)
    }

    fn analog_join_offset(&self, child: &dyn Indexed) -> u16 {
        self.inner.analog_join_offset(child)
    }

    fn serial_join_offset(&self, child: &dyn Indexed) -> u16 {
        self.inner.serial_join_offset(child)
    }
}

impl Drop for SubpageReferenceList {
    fn drop(&mut self) {
        self.inner.list.detach();
    }
}

impl Indexed for SrlInner {
    fn index(&self) -> u16 {
        self.base.index()
    }
}

impl Control for SrlInner {
    fn base(&self) -> &ControlBase {
        &self.base
    }
}

impl JoinOffsets for SrlInner {
    fn digital_join_offset(&self, child: &dyn Indexed) -> u16 {
        let slot = self.slots.lock().unwrap().digital;
        slot.start
            .wrapping_sub(1)
            .wrapping_add(child.index().wrapping_mul(slot.increment))
    }

    fn analog_join_offset(&self, child: &dyn Indexed) -> u16 {
        let slot = self.slots.lock().unwrap().analog;
        slot.start
            .wrapping_sub(1)
            .wrapping_add(child.index().wrapping_mul(slot.increment))
    }

    fn serial_join_offset(&self, child: &dyn Indexed) -> u16 {
        let slot = self.slots.lock().unwrap().serial;
        slot.start
            .wrapping_sub(1)
            .wrapping_add(child.index().wrapping_mul(slot.increment))
    }
}

impl ControlParent for SrlInner {
    fn items(&self) -> Option<&dyn ItemStates> {
        Some(self)
    }
}

impl ItemStates for SrlInner {
    fn item_visible(&self, index: u16) -> bool {
        self.visible_items.get_or_default(&index)
    }

    fn item_enabled(&self, index: u16) -> bool {
        self.enabled_items.get_or_default(&index)
    }

    fn set_item_visible(&self, index: u16, visible: bool) {
        let join = Join::new(SRL_ITEM_VISIBLE_START_JOIN.wrapping_add(index));
        self.visible_items.send_if_changed(index, visible, |v| {
            self.list.smart().send_input_digital(join, *v)
        });
    }

    fn set_item_enabled(&self, index: u16, enabled: bool) {
        let join = Join::new(SRL_ITEM_ENABLED_START_JOIN.wrapping_add(index));
        self.enabled_items.send_if_changed(index, enabled, |v| {
            self.list.smart().send_input_digital(join, *v)
        });
    }
}
