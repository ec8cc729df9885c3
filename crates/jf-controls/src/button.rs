//! Buttons.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use jf_core::{Join, SigCache, SigKind, SigMapCache};
use jf_panel::{PanelDevice, SigCallback, SigEndpoint, SmartObject, SubscriptionId};

use crate::base::{Control, ControlBase};
use crate::error::{ControlError, ControlResult};
use crate::event::Event;
use crate::label::{LabelSigs, TextControl};
use crate::offsets::{ControlParent, Indexed};
use crate::sigs::{AnalogInput, FeedbackSlot};
use crate::timer::HoldTimer;

/// The press sig bundle: the digital press join with its mirrored feedback
/// subscription, the selected cache, the hold timer and the interaction
/// events.
pub struct PressSigs {
    slot: FeedbackSlot,
    selected: SigCache<bool>,
    hold_duration: Mutex<Duration>,
    hold_timer: HoldTimer,
    on_pressed: Event<()>,
    on_released: Event<()>,
    on_held: Event<()>,
}

impl PressSigs {
    pub(crate) fn new(hold_callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            slot: FeedbackSlot::new(SigKind::Digital),
            selected: SigCache::new(),
            hold_duration: Mutex::new(Duration::ZERO),
            hold_timer: HoldTimer::stopped(hold_callback),
            on_pressed: Event::new(),
            on_released: Event::new(),
            on_held: Event::new(),
        }
    }

    pub(crate) fn install_callback(&self, endpoint: &dyn SigEndpoint, callback: SigCallback) {
        self.slot.attach(endpoint, Join::UNBOUND, Join::UNBOUND, callback);
    }

    pub(crate) fn configured_join(&self) -> Join {
        self.slot.configured()
    }

    pub(crate) fn simulate_press(&self, visible: bool) {
        let hold = *self.hold_duration.lock().unwrap();
        if !hold.is_zero() {
            self.hold_timer.reset(hold);
        }
        if visible {
            self.on_pressed.raise(&());
        }
    }

    pub(crate) fn simulate_release(&self, visible: bool) {
        self.hold_timer.stop();
        if visible {
            self.on_released.raise(&());
        }
    }

    pub(crate) fn simulate_hold(&self, visible: bool) {
        self.hold_timer.stop();
        if visible {
            self.on_held.raise(&());
        }
    }

    pub(crate) fn detach(&self, endpoint: &dyn SigEndpoint) {
        self.hold_timer.stop();
        self.slot.detach(endpoint);
        self.on_pressed.clear();
        self.on_released.clear();
        self.on_held.clear();
    }
}

/// The press surface shared by buttons and the controls built on them.
pub trait PressButton: Control {
    /// The control's press sigs.
    fn press_sigs(&self) -> &PressSigs;

    fn press_join(&self) -> Join {
        self.press_sigs().slot.configured()
    }

    /// Re-point the press join. The feedback subscription follows: it is
    /// dropped at the old resolved join and re-created at the new one.
    fn set_press_join(&self, join: Join) {
        let sigs = self.press_sigs();
        if join == sigs.slot.configured() {
            return;
        }
        let resolved = self.base().resolve_digital(join);
        sigs.slot
            .retarget(self.base().panel().as_ref(), join, resolved);
    }

    /// How long a press must be held before the held event fires. Zero
    /// disables hold detection.
    fn set_hold_duration(&self, duration: Duration) {
        *self.press_sigs().hold_duration.lock().unwrap() = duration;
    }

    /// Raised when the user presses the button.
    fn on_pressed(&self, handler: impl Fn() + Send + Sync + 'static)
    where
        Self: Sized,
    {
        self.press_sigs().on_pressed.subscribe(move |_| handler());
    }

    /// Raised when the user releases the button.
    fn on_released(&self, handler: impl Fn() + Send + Sync + 'static)
    where
        Self: Sized,
    {
        self.press_sigs().on_released.subscribe(move |_| handler());
    }

    /// Raised when the user holds the button.
    fn on_held(&self, handler: impl Fn() + Send + Sync + 'static)
    where
        Self: Sized,
    {
        self.press_sigs().on_held.subscribe(move |_| handler());
    }

    /// Simulate a press. Events fire only while the control and all of its
    /// ancestors are visible.
    fn press(&self) {
        self.press_sigs().simulate_press(self.is_visible_recursive());
    }

    /// Simulate a release.
    fn release(&self) {
        self.press_sigs().simulate_release(self.is_visible_recursive());
    }

    /// Simulate the button being held.
    fn hold(&self) {
        self.press_sigs().simulate_hold(self.is_visible_recursive());
    }

    /// Set the selected state, written through the press join.
    fn set_selected(&self, state: bool) -> ControlResult<()> {
        let sigs = self.press_sigs();
        let join = sigs.slot.configured();
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin { op: "set selected" });
        }
        let resolved = self.base().resolve_digital(join);
        let base = self.base();
        sigs.selected
            .send_if_changed(state, |v| base.panel().send_input_digital(resolved, *v));
        Ok(())
    }
}

fn press_callback(weak: Weak<dyn PressTarget + Send + Sync>) -> SigCallback {
    Arc::new(move |event| {
        let Some(target) = weak.upgrade() else {
            return;
        };
        if target.sigs().configured_join().is_unbound() {
            return;
        }
        match event.value.as_digital() {
            Some(true) => target.sigs().simulate_press(target.control_base().is_visible_recursive()),
            Some(false) => {
                target.sigs().simulate_release(target.control_base().is_visible_recursive())
            }
            None => {}
        }
    })
}

/// Feedback plumbing shared by every press-carrying inner type.
pub(crate) trait PressTarget {
    fn control_base(&self) -> &ControlBase;
    fn sigs(&self) -> &PressSigs;
}

pub(crate) fn hold_callback<T>(weak: Weak<T>) -> impl Fn() + Send + Sync + 'static
where
    T: PressTarget + Send + Sync + 'static,
{
    move || {
        if let Some(target) = weak.upgrade() {
            target
                .sigs()
                .simulate_hold(target.control_base().is_visible_recursive());
        }
    }
}

pub(crate) fn install_press_feedback<T>(inner: &Arc<T>)
where
    T: PressTarget + Send + Sync + 'static,
{
    let weak: Weak<dyn PressTarget + Send + Sync> = {
        let weak: Weak<T> = Arc::downgrade(inner);
        weak
    };
    let callback = press_callback(weak);
    inner
        .sigs()
        .install_callback(inner.control_base().panel().as_ref(), callback);
}

/// A standard button with a press join and an optional label.
pub struct Button {
    inner: Arc<ButtonInner>,
}

struct ButtonInner {
    base: ControlBase,
    text: LabelSigs,
    press: PressSigs,
}

impl PressTarget for ButtonInner {
    fn control_base(&self) -> &ControlBase {
        &self.base
    }

    fn sigs(&self) -> &PressSigs {
        &self.press
    }
}

impl Button {
    pub fn new(panel: Arc<dyn SigEndpoint>) -> Self {
        Self::build(panel, None)
    }

    pub fn with_parent(panel: Arc<dyn SigEndpoint>, parent: Arc<dyn ControlParent>) -> Self {
        Self::build(panel, Some(parent))
    }

    fn build(panel: Arc<dyn SigEndpoint>, parent: Option<Arc<dyn ControlParent>>) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<ButtonInner>| ButtonInner {
            base: ControlBase::new(panel, parent, 0),
            text: LabelSigs::new(),
            press: PressSigs::new(hold_callback(weak.clone())),
        });
        install_press_feedback(&inner);
        Self { inner }
    }
}

impl Indexed for Button {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for Button {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl TextControl for Button {
    fn label_sigs(&self) -> &LabelSigs {
        &self.inner.text
    }
}

impl PressButton for Button {
    fn press_sigs(&self) -> &PressSigs {
        &self.inner.press
    }
}

impl Drop for Button {
    fn drop(&mut self) {
        self.inner.press.detach(self.inner.base.panel().as_ref());
    }
}

/// A button with an analog mode join for switching its visual mode.
pub struct MultiModeButton {
    inner: Arc<MultiModeInner>,
}

struct MultiModeInner {
    base: ControlBase,
    text: LabelSigs,
    press: PressSigs,
    mode: AnalogInput,
}

impl PressTarget for MultiModeInner {
    fn control_base(&self) -> &ControlBase {
        &self.base
    }

    fn sigs(&self) -> &PressSigs {
        &self.press
    }
}

impl MultiModeButton {
    pub fn new(panel: Arc<dyn SigEndpoint>) -> Self {
        Self::build(panel, None)
    }

    pub fn with_parent(panel: Arc<dyn SigEndpoint>, parent: Arc<dyn ControlParent>) -> Self {
        Self::build(panel, Some(parent))
    }

    fn build(panel: Arc<dyn SigEndpoint>, parent: Option<Arc<dyn ControlParent>>) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<MultiModeInner>| MultiModeInner {
            base: ControlBase::new(panel, parent, 0),
            text: LabelSigs::new(),
            press: PressSigs::new(hold_callback(weak.clone())),
            mode: AnalogInput::new(),
        });
        install_press_feedback(&inner);
        Self { inner }
    }

    pub fn mode_join(&self) -> Join {
        self.inner.mode.join()
    }

    pub fn set_mode_join(&self, join: Join) {
        self.inner.mode.set_join(join);
    }

    /// Set the button mode through the analog mode join.
    pub fn set_mode(&self, mode: u16) -> ControlResult<()> {
        self.inner.mode.write(&self.inner.base, mode, "set mode")
    }
}

impl Indexed for MultiModeButton {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for MultiModeButton {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl TextControl for MultiModeButton {
    fn label_sigs(&self) -> &LabelSigs {
        &self.inner.text
    }
}

impl PressButton for MultiModeButton {
    fn press_sigs(&self) -> &PressSigs {
        &self.inner.press
    }
}

impl Drop for MultiModeButton {
    fn drop(&mut self) {
        self.inner.press.detach(self.inner.base.panel().as_ref());
    }
}

// Tab button smart-object joins.
const TAB_SELECT_START_JOIN: u16 = 2;
const TAB_PRESS_START_JOIN: u16 = 1;
const TAB_DIGITAL_INCREMENT: u16 = 2;

/// A tab strip smart object: one selected flag and one press output per tab
/// index, interleaved across the digital joins.
pub struct TabButton {
    inner: Arc<TabButtonInner>,
}

struct TabButtonInner {
    base: ControlBase,
    smart: Arc<dyn SmartObject>,
    selected: SigMapCache<u16, bool>,
    on_button_pressed: Event<u16>,
    on_button_released: Event<u16>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl TabButton {
    pub fn new(
        panel: Arc<dyn PanelDevice>,
        smart_object_id: u32,
        parent: Option<Arc<dyn ControlParent>>,
    ) -> ControlResult<Self> {
        let smart = panel.smart_object(smart_object_id)?;
        let inner = Arc::new(TabButtonInner {
            base: ControlBase::new(panel, parent, 0),
            smart,
            selected: SigMapCache::new(),
            on_button_pressed: Event::new(),
            on_button_released: Event::new(),
            subscription: Mutex::new(None),
        });

        let weak = Arc::downgrade(&inner);
        let id = inner.smart.register_output_any(Arc::new(move |event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let Some(pressed) = event.value.as_digital() else {
                return;
            };
            let index =
                event.join.get().wrapping_sub(TAB_PRESS_START_JOIN) / TAB_DIGITAL_INCREMENT;
            if pressed {
                inner.press(index);
            } else {
                inner.release(index);
            }
        }));
        *inner.subscription.lock().unwrap() = Some(id);

        Ok(Self { inner })
    }

    /// Simulate a press on the tab at the given index.
    pub fn press(&self, index: u16) {
        self.inner.press(index);
    }

    /// Simulate a release on the tab at the given index.
    pub fn release(&self, index: u16) {
        self.inner.release(index);
    }

    /// Set the selected state of the tab at the given index.
    pub fn set_item_selected(&self, index: u16, selected: bool) {
        let join = Join::new(
            index
                .wrapping_mul(TAB_DIGITAL_INCREMENT)
                .wrapping_add(TAB_SELECT_START_JOIN),
        );
        self.inner.selected.send_if_changed(index, selected, |v| {
            self.inner.smart.send_input_digital(join, *v)
        });
    }

    pub fn on_button_pressed(&self, handler: impl Fn(u16) + Send + Sync + 'static) {
        self.inner
            .on_button_pressed
            .subscribe(move |index| handler(*index));
    }

    pub fn on_button_released(&self, handler: impl Fn(u16) + Send + Sync + 'static) {
        self.inner
            .on_button_released
            .subscribe(move |index| handler(*index));
    }
}

impl TabButtonInner {
    fn press(&self, index: u16) {
        if self.base.is_visible_recursive() {
            self.on_button_pressed.raise(&index);
        }
    }

    fn release(&self, index: u16) {
        if self.base.is_visible_recursive() {
            self.on_button_released.raise(&index);
        }
    }
}

impl Indexed for TabButton {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for TabButton {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl Drop for TabButton {
    fn drop(&mut self) {
        if let Some(id) = self.inner.subscription.lock().unwrap().take() {
            self.inner.smart.unregister_output_any(id);
        }
        self.inner.on_button_pressed.clear();
        self.inner.on_button_released.clear();
    }
}
