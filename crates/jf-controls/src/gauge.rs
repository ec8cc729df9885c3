//! Gauges.

use std::sync::{Arc, Weak};

use jf_core::{Join, SigCache, SigKind};
use jf_panel::{SigCallback, SigEndpoint};

use crate::base::{Control, ControlBase};
use crate::button::{PressButton, PressSigs, PressTarget, hold_callback, install_press_feedback};
use crate::error::{ControlError, ControlResult};
use crate::event::Event;
use crate::label::{LabelSigs, TextControl};
use crate::offsets::{ControlParent, Indexed};
use crate::sigs::{AnalogInput, FeedbackSlot, SerialInput};

/// The gauge sig bundle: one analog join used both to write the shown value
/// and to receive touch feedback, plus the touched event.
pub struct GaugeSigs {
    slot: FeedbackSlot,
    value: SigCache<u16>,
    on_touched: Event<u16>,
}

impl GaugeSigs {
    pub(crate) fn new() -> Self {
        Self {
            slot: FeedbackSlot::new(SigKind::Analog),
            value: SigCache::new(),
            on_touched: Event::new(),
        }
    }

    pub(crate) fn install_callback(&self, endpoint: &dyn SigEndpoint, callback: SigCallback) {
        self.slot.attach(endpoint, Join::UNBOUND, Join::UNBOUND, callback);
    }

    pub(crate) fn configured_join(&self) -> Join {
        self.slot.configured()
    }

    pub(crate) fn simulate_touch(&self, visible: bool, value: u16) {
        if visible {
            self.on_touched.raise(&value);
        }
    }

    pub(crate) fn detach(&self, endpoint: &dyn SigEndpoint) {
        self.slot.detach(endpoint);
        self.on_touched.clear();
    }
}

/// The value/touch surface shared by gauges.
pub trait GaugeControl: Control {
    /// The control's gauge sigs.
    fn gauge_sigs(&self) -> &GaugeSigs;

    fn value_join(&self) -> Join {
        self.gauge_sigs().slot.configured()
    }

    /// Re-point the value join. The touch feedback subscription follows.
    fn set_value_join(&self, join: Join) {
        let sigs = self.gauge_sigs();
        if join == sigs.slot.configured() {
            return;
        }
        let resolved = self.base().resolve_analog(join);
        sigs.slot
            .retarget(self.base().panel().as_ref(), join, resolved);
    }

    /// Set the value shown by the gauge.
    fn set_value(&self, value: u16) -> ControlResult<()> {
        let sigs = self.gauge_sigs();
        let join = sigs.slot.configured();
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin { op: "set value" });
        }
        let resolved = self.base().resolve_analog(join);
        let base = self.base();
        sigs.value
            .send_if_changed(value, |v| base.panel().send_input_analog(resolved, *v));
        Ok(())
    }

    /// Set the value as a fraction in `0.0..=1.0`.
    fn set_value_percentage(&self, percentage: f32) -> ControlResult<()> {
        let value = (percentage * u16::MAX as f32) as u16;
        self.set_value(value)
    }

    /// Simulate a touch on the gauge.
    fn touch(&self, value: u16) {
        self.gauge_sigs()
            .simulate_touch(self.is_visible_recursive(), value);
    }

    /// Raised when the user touches the gauge.
    fn on_touched(&self, handler: impl Fn(u16) + Send + Sync + 'static)
    where
        Self: Sized,
    {
        self.gauge_sigs()
            .on_touched
            .subscribe(move |value| handler(*value));
    }
}

pub(crate) trait GaugeTarget: PressTarget {
    fn gauge(&self) -> &GaugeSigs;
}

fn gauge_callback(weak: Weak<dyn GaugeTarget + Send + Sync>) -> SigCallback {
    Arc::new(move |event| {
        let Some(target) = weak.upgrade() else {
            return;
        };
        if target.gauge().configured_join().is_unbound() {
            return;
        }
        if let Some(value) = event.value.as_analog() {
            target
                .gauge()
                .simulate_touch(target.control_base().is_visible_recursive(), value);
        }
    })
}

pub(crate) fn install_gauge_feedback<T>(inner: &Arc<T>)
where
    T: GaugeTarget + Send + Sync + 'static,
{
    let weak: Weak<dyn GaugeTarget + Send + Sync> = {
        let weak: Weak<T> = Arc::downgrade(inner);
        weak
    };
    let callback = gauge_callback(weak);
    inner
        .gauge()
        .install_callback(inner.control_base().panel().as_ref(), callback);
}

/// A linear gauge.
pub struct Gauge {
    inner: Arc<GaugeInner>,
}

struct GaugeInner {
    base: ControlBase,
    text: LabelSigs,
    press: PressSigs,
    gauge: GaugeSigs,
}

impl PressTarget for GaugeInner {
    fn control_base(&self) -> &ControlBase {
        &self.base
    }

    fn sigs(&self) -> &PressSigs {
        &self.press
    }
}

impl GaugeTarget for GaugeInner {
    fn gauge(&self) -> &GaugeSigs {
        &self.gauge
    }
}

impl Gauge {
    pub fn new(panel: Arc<dyn SigEndpoint>) -> Self {
        Self::build(panel, None)
    }

    pub fn with_parent(panel: Arc<dyn SigEndpoint>, parent: Arc<dyn ControlParent>) -> Self {
        Self::build(panel, Some(parent))
    }

    fn build(panel: Arc<dyn SigEndpoint>, parent: Option<Arc<dyn ControlParent>>) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<GaugeInner>| GaugeInner {
            base: ControlBase::new(panel, parent, 0),
            text: LabelSigs::new(),
            press: PressSigs::new(hold_callback(weak.clone())),
            gauge: GaugeSigs::new(),
        });
        install_press_feedback(&inner);
        install_gauge_feedback(&inner);
        Self { inner }
    }
}

impl Indexed for Gauge {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for Gauge {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl TextControl for Gauge {
    fn label_sigs(&self) -> &LabelSigs {
        &self.inner.text
    }
}

impl PressButton for Gauge {
    fn press_sigs(&self) -> &PressSigs {
        &self.inner.press
    }
}

impl GaugeControl for Gauge {
    fn gauge_sigs(&self) -> &GaugeSigs {
        &self.inner.gauge
    }
}

impl Drop for Gauge {
    fn drop(&mut self) {
        self.inner.press.detach(self.inner.base.panel().as_ref());
        self.inner.gauge.detach(self.inner.base.panel().as_ref());
    }
}

/// A circular gauge: a gauge with range joins and up to six caption labels
/// around the dial.
pub struct CircularGauge {
    inner: Arc<CircularGaugeInner>,
}

struct CircularGaugeInner {
    base: ControlBase,
    text: LabelSigs,
    press: PressSigs,
    gauge: GaugeSigs,
    min_value: AnalogInput,
    max_value: AnalogInput,
    child_position: AnalogInput,
    left_label: SerialInput,
    left_child_label: SerialInput,
    center_label: SerialInput,
    center_child_label: SerialInput,
    right_label: SerialInput,
    right_child_label: SerialInput,
}

impl PressTarget for CircularGaugeInner {
    fn control_base(&self) -> &ControlBase {
        &self.base
    }

    fn sigs(&self) -> &PressSigs {
        &self.press
    }
}

impl GaugeTarget for CircularGaugeInner {
    fn gauge(&self) -> &GaugeSigs {
        &self.gauge
    }
}

impl CircularGauge {
    pub fn new(panel: Arc<dyn SigEndpoint>) -> Self {
        Self::build(panel, None)
    }

    pub fn with_parent(panel: Arc<dyn SigEndpoint>, parent: Arc<dyn ControlParent>) -> Self {
        Self::build(panel, Some(parent))
    }

    fn build(panel: Arc<dyn SigEndpoint>, parent: Option<Arc<dyn ControlParent>>) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<CircularGaugeInner>| CircularGaugeInner {
            base: ControlBase::new(panel, parent, 0),
            text: LabelSigs::new(),
            press: PressSigs::new(hold_callback(weak.clone())),
            gauge: GaugeSigs::new(),
            min_value: AnalogInput::new(),
            max_value: AnalogInput::new(),
            child_position: AnalogInput::new(),
            left_label: SerialInput::new(),
            left_child_label: SerialInput::new(),
            center_label: SerialInput::new(),
            center_child_label: SerialInput::new(),
            right_label: SerialInput::new(),
            right_child_label: SerialInput::new(),
        });
        install_press_feedback(&inner);
        install_gauge_feedback(&inner);
        Self { inner }
    }

    pub fn set_min_value_join(&self, join: Join) {
        self.inner.min_value.set_join(join);
    }

    pub fn set_max_value_join(&self, join: Join) {
        self.inner.max_value.set_join(join);
    }

    pub fn set_child_position_join(&self, join: Join) {
        self.inner.child_position.set_join(join);
    }

    pub fn set_left_label_join(&self, join: Join) {
        self.inner.left_label.set_join(join);
    }

    pub fn set_left_child_label_join(&self, join: Join) {
        self.inner.left_child_label.set_join(join);
    }

    pub fn set_center_label_join(&self, join: Join) {
        self.inner.center_label.set_join(join);
    }

    pub fn set_center_child_label_join(&self, join: Join) {
        self.inner.center_child_label.set_join(join);
    }

    pub fn set_right_label_join(&self, join: Join) {
        self.inner.right_label.set_join(join);
    }

    pub fn set_right_child_label_join(&self, join: Join) {
        self.inner.right_child_label.set_join(join);
    }

    pub fn set_min_value(&self, value: u16) -> ControlResult<()> {
        self.inner
            .min_value
            .write(&self.inner.base, value, "set min value")
    }

    pub fn set_max_value(&self, value: u16) -> ControlResult<()> {
        self.inner
            .max_value
            .write(&self.inner.base, value, "set max value")
    }

    pub fn set_child_position(&self, value: u16) -> ControlResult<()> {
        self.inner
            .child_position
            .write(&self.inner.base, value, "set child position")
    }

    pub fn set_left_label(&self, text: &str) -> ControlResult<()> {
        self.inner
            .left_label
            .write(&self.inner.base, text, "set left label")
    }

    pub fn set_left_child_label(&self, text: &str) -> ControlResult<()> {
        self.inner
            .left_child_label
            .write(&self.inner.base, text, "set left child label")
    }

    pub fn set_center_label(&self, text: &str) -> ControlResult<()> {
        self.inner
            .center_label
            .write(&self.inner.base, text, "set center label")
    }

    pub fn set_center_child_label(&self, text: &str) -> ControlResult<()> {
        self.inner
            .center_child_label
            .write(&self.inner.base, text, "set center child label")
    }

    pub fn set_right_label(&self, text: &str) -> ControlResult<()> {
        self.inner
            .right_label
            .write(&self.inner.base, text, "set right label")
    }

    pub fn set_right_child_label(&self, text: &str) -> ControlResult<()> {
        self.inner
            .right_child_label
            .write(&self.inner.base, text, "set right child label")
    }
}

impl Indexed for CircularGauge {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for CircularGauge {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl TextControl for CircularGauge {
    fn label_sigs(&self) -> &LabelSigs {
        &self.inner.text
    }
}

impl PressButton for CircularGauge {
    fn press_sigs(&self) -> &PressSigs {
        &self.inner.press
    }
}

impl GaugeControl for CircularGauge {
    fn gauge_sigs(&self) -> &GaugeSigs {
        &self.inner.gauge
    }
}

impl Drop for CircularGauge {
    fn drop(&mut self) {
        self.inner.press.detach(self.inner.base.panel().as_ref());
        self.inner.gauge.detach(self.inner.base.panel().as_ref());
    }
}
