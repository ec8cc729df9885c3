//! Text entry fields.

use std::sync::{Arc, Mutex};

use jf_core::{Join, SigKind};
use jf_panel::SigEndpoint;

use crate::base::{Control, ControlBase};
use crate::error::ControlResult;
use crate::event::Event;
use crate::label::{LabelSigs, TextControl};
use crate::offsets::{ControlParent, Indexed};
use crate::sigs::{AnalogInput, FeedbackSlot};

#[derive(Debug, Default, Clone, Copy)]
struct FocusJoins {
    enter_key: Join,
    esc_key: Join,
    focus_on: Join,
    focus_off: Join,
    has_focus: Join,
}

/// A text entry field.
///
/// The serial output join carries the text the user types; the subscription
/// mirrors the write-path resolution and follows the join when it is
/// re-pointed.
pub struct TextEntry {
    inner: Arc<TextEntryInner>,
}

struct TextEntryInner {
    base: ControlBase,
    text: LabelSigs,
    mode: AnalogInput,
    output: FeedbackSlot,
    focus: Mutex<FocusJoins>,
    on_text_modified: Event<String>,
}

impl TextEntry {
    pub fn new(panel: Arc<dyn SigEndpoint>) -> Self {
        Self::build(panel, None)
    }

    pub fn with_parent(panel: Arc<dyn SigEndpoint>, parent: Arc<dyn ControlParent>) -> Self {
        Self::build(panel, Some(parent))
    }

    fn build(panel: Arc<dyn SigEndpoint>, parent: Option<Arc<dyn ControlParent>>) -> Self {
        let inner = Arc::new(TextEntryInner {
            base: ControlBase::new(panel, parent, 0),
            text: LabelSigs::new(),
            mode: AnalogInput::new(),
            output: FeedbackSlot::new(SigKind::Serial),
            focus: Mutex::new(FocusJoins::default()),
            on_text_modified: Event::new(),
        });

        let weak = Arc::downgrade(&inner);
        inner.output.attach(
            inner.base.panel().as_ref(),
            Join::UNBOUND,
            Join::UNBOUND,
            Arc::new(move |event| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if inner.output.configured().is_unbound() {
                    return;
                }
                if let Some(text) = event.value.as_serial() {
                    inner.enter_text(text);
                }
            }),
        );

        Self { inner }
    }

    pub fn output_join(&self) -> Join {
        self.inner.output.configured()
    }

    /// Re-point the serial output join; the feedback subscription follows.
    pub fn set_output_join(&self, join: Join) {
        if join == self.inner.output.configured() {
            return;
        }
        let resolved = self.inner.base.resolve_serial(join);
        self.inner
            .output
            .retarget(self.inner.base.panel().as_ref(), join, resolved);
    }

    pub fn mode_join(&self) -> Join {
        self.inner.mode.join()
    }

    pub fn set_mode_join(&self, join: Join) {
        self.inner.mode.set_join(join);
    }

    /// Set the field mode through the analog mode join.
    pub fn set_mode(&self, mode: u16) -> ControlResult<()> {
        self.inner.mode.write(&self.inner.base, mode, "set mode")
    }

    pub fn enter_key_join(&self) -> Join {
        self.inner.focus.lock().unwrap().enter_key
    }

    pub fn set_enter_key_join(&self, join: Join) {
        self.inner.focus.lock().unwrap().enter_key = join;
    }

    pub fn esc_key_join(&self) -> Join {
        self.inner.focus.lock().unwrap().esc_key
    }

    pub fn set_esc_key_join(&self, join: Join) {
        self.inner.focus.lock().unwrap().esc_key = join;
    }

    pub fn focus_on_join(&self) -> Join {
        self.inner.focus.lock().unwrap().focus_on
    }

    pub fn set_focus_on_join(&self, join: Join) {
        self.inner.focus.lock().unwrap().focus_on = join;
    }

    pub fn focus_off_join(&self) -> Join {
        self.inner.focus.lock().unwrap().focus_off
    }

    pub fn set_focus_off_join(&self, join: Join) {
        self.inner.focus.lock().unwrap().focus_off = join;
    }

    pub fn has_focus_join(&self) -> Join {
        self.inner.focus.lock().unwrap().has_focus
    }

    pub fn set_has_focus_join(&self, join: Join) {
        self.inner.focus.lock().unwrap().has_focus = join;
    }

    /// Simulate the user typing into the field.
    pub fn enter_text(&self, text: &str) {
        self.inner.enter_text(text);
    }

    /// Raised when the user modifies the text.
    pub fn on_text_modified(&self, handler: impl Fn(&str) + Send + Sync + 'static) {
        self.inner
            .on_text_modified
            .subscribe(move |text: &String| handler(text));
    }
}

impl TextEntryInner {
    fn enter_text(&self, text: &str) {
        if self.base.is_visible_recursive() {
            self.on_text_modified.raise(&text.to_string());
        }
    }
}

impl Indexed for TextEntry {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for TextEntry {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl TextControl for TextEntry {
    fn label_sigs(&self) -> &LabelSigs {
        &self.inner.text
    }
}

impl Drop for TextEntry {
    fn drop(&mut self) {
        self.inner.output.detach(self.inner.base.panel().as_ref());
        self.inner.on_text_modified.clear();
    }
}
