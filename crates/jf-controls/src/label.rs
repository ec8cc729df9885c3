//! Text controls.

use std::sync::{Arc, Mutex};

use jf_core::{Join, SigMapCache};
use jf_panel::SigEndpoint;

use crate::base::{Control, ControlBase};
use crate::error::{ControlError, ControlResult};
use crate::markup;
use crate::offsets::{ControlParent, Indexed};

/// The label sig bundle: an indirect text join plus per-resolved-join caches
/// for the three channels.
///
/// Caches are keyed by resolved join, not local join: under a repeating
/// parent the same local join lands on a different wire join per index, and
/// each must be suppressed independently.
pub struct LabelSigs {
    indirect_text_join: Mutex<Join>,
    serial: SigMapCache<Join, String>,
    analog: SigMapCache<Join, u16>,
    digital: SigMapCache<Join, bool>,
}

impl LabelSigs {
    pub(crate) fn new() -> Self {
        Self {
            indirect_text_join: Mutex::new(Join::UNBOUND),
            serial: SigMapCache::new(),
            analog: SigMapCache::new(),
            digital: SigMapCache::new(),
        }
    }

    fn indirect_text_join(&self) -> Join {
        *self.indirect_text_join.lock().unwrap()
    }

    fn set_indirect_text_join(&self, join: Join) {
        *self.indirect_text_join.lock().unwrap() = join;
    }

    fn set_text_at_join(&self, base: &ControlBase, join: Join, text: &str) -> ControlResult<()> {
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin {
                op: "set label text",
            });
        }
        let resolved = base.resolve_serial(join);
        // The cache keeps the caller's text; only the wire gets the markup
        // form, so comparisons stay meaningful and cheap.
        self.serial.send_if_changed(resolved, text.to_string(), |cached| {
            let wire = markup::normalize_newlines(cached);
            base.panel().send_input_serial(resolved, &wire);
        });
        Ok(())
    }

    fn set_analog_at_join(&self, base: &ControlBase, join: Join, value: u16) -> ControlResult<()> {
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin {
                op: "set label value",
            });
        }
        let resolved = base.resolve_analog(join);
        self.analog.send_if_changed(resolved, value, |v| {
            base.panel().send_input_analog(resolved, *v)
        });
        Ok(())
    }

    fn set_digital_at_join(&self, base: &ControlBase, join: Join, value: bool) -> ControlResult<()> {
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin {
                op: "set label flag",
            });
        }
        let resolved = base.resolve_digital(join);
        self.digital.send_if_changed(resolved, value, |v| {
            base.panel().send_input_digital(resolved, *v)
        });
        Ok(())
    }
}

/// The text surface shared by labels and every control that carries one.
pub trait TextControl: Control {
    /// The control's label sigs.
    fn label_sigs(&self) -> &LabelSigs;

    fn indirect_text_join(&self) -> Join {
        self.label_sigs().indirect_text_join()
    }

    fn set_indirect_text_join(&self, join: Join) {
        self.label_sigs().set_indirect_text_join(join)
    }

    /// Set the label text through the indirect text join.
    fn set_text(&self, text: &str) -> ControlResult<()> {
        let join = self.indirect_text_join();
        self.set_text_at_join(join, text)
    }

    /// Set serial label text at the given local join.
    fn set_text_at_join(&self, join: Join, text: &str) -> ControlResult<()> {
        self.label_sigs().set_text_at_join(self.base(), join, text)
    }

    /// Set an analog label value at the given local join.
    fn set_analog_at_join(&self, join: Join, value: u16) -> ControlResult<()> {
        self.label_sigs().set_analog_at_join(self.base(), join, value)
    }

    /// Set a digital label flag at the given local join.
    fn set_digital_at_join(&self, join: Join, value: bool) -> ControlResult<()> {
        self.label_sigs().set_digital_at_join(self.base(), join, value)
    }
}

/// A plain text label.
pub struct Label {
    base: ControlBase,
    text: LabelSigs,
}

impl Label {
    pub fn new(panel: Arc<dyn SigEndpoint>) -> Self {
        Self::with_parent_option(panel, None)
    }

    pub fn with_parent(panel: Arc<dyn SigEndpoint>, parent: Arc<dyn ControlParent>) -> Self {
        Self::with_parent_option(panel, Some(parent))
    }

    fn with_parent_option(
        panel: Arc<dyn SigEndpoint>,
        parent: Option<Arc<dyn ControlParent>>,
    ) -> Self {
        Self {
            base: ControlBase::new(panel, parent, 0),
            text: LabelSigs::new(),
        }
    }
}

impl Indexed for Label {
    fn index(&self) -> u16 {
        self.base.index()
    }
}

impl Control for Label {
    fn base(&self) -> &ControlBase {
        &self.base
    }
}

impl TextControl for Label {
    fn label_sigs(&self) -> &LabelSigs {
        &self.text
    }
}

/// A formatted text object. Same sig surface as [`Label`].
pub struct FormattedText {
    base: ControlBase,
    text: LabelSigs,
}

impl FormattedText {
    pub fn new(panel: Arc<dyn SigEndpoint>) -> Self {
        Self::with_parent_option(panel, None)
    }

    pub fn with_parent(panel: Arc<dyn SigEndpoint>, parent: Arc<dyn ControlParent>) -> Self {
        Self::with_parent_option(panel, Some(parent))
    }

    fn with_parent_option(
        panel: Arc<dyn SigEndpoint>,
        parent: Option<Arc<dyn ControlParent>>,
    ) -> Self {
        Self {
            base: ControlBase::new(panel, parent, 0),
            text: LabelSigs::new(),
        }
    }
}

impl Indexed for FormattedText {
    fn index(&self) -> u16 {
        self.base.index()
    }
}

impl Control for FormattedText {
    fn base(&self) -> &ControlBase {
        &self.base
    }
}

impl TextControl for FormattedText {
    fn label_sigs(&self) -> &LabelSigs {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jf_panel::MockPanel;

    #[test]
    fn text_is_cached_per_join_and_normalized_on_the_wire() {
        let panel = Arc::new(MockPanel::new());
        let label = Label::new(panel.clone());

        label.set_text_at_join(Join::new(7), "line1\nline2").unwrap();
        assert_eq!(
            panel.serial_input(Join::new(7)),
            Some("line1<br>line2".to_string())
        );
        assert_eq!(panel.traffic().len(), 1);

        // Same pre-normalization text: suppressed.
        label.set_text_at_join(Join::new(7), "line1\nline2").unwrap();
        assert_eq!(panel.traffic().len(), 1);

        label.set_text_at_join(Join::new(7), "line1").unwrap();
        assert_eq!(panel.traffic().len(), 2);
    }

    #[test]
    fn unbound_text_join_is_an_error() {
        let panel = Arc::new(MockPanel::new());
        let label = Label::new(panel);

        assert_eq!(
            label.set_text("hello"),
            Err(ControlError::UnboundJoin {
                op: "set label text"
            })
        );
    }

    #[test]
    fn indirect_text_join_routes_set_text() {
        let panel = Arc::new(MockPanel::new());
        let label = Label::new(panel.clone());
        label.set_indirect_text_join(Join::new(12));

        label.set_text("hello").unwrap();
        assert_eq!(panel.serial_input(Join::new(12)), Some("hello".to_string()));
    }

    #[test]
    fn analog_and_digital_labels_cache_independently() {
        let panel = Arc::new(MockPanel::new());
        let label = Label::new(panel.clone());

        label.set_analog_at_join(Join::new(3), 0).unwrap();
        label.set_analog_at_join(Join::new(3), 0).unwrap();
        label.set_digital_at_join(Join::new(3), false).unwrap();
        label.set_digital_at_join(Join::new(3), false).unwrap();

        // First writes transmit even for default values; repeats do not.
        assert_eq!(panel.traffic().len(), 2);
    }
}
