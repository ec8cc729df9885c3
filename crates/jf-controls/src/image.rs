//! Image controls.

use std::sync::{Arc, Weak};

use jf_core::Join;
use jf_panel::SigEndpoint;

use crate::base::{Control, ControlBase};
use crate::button::{PressButton, PressSigs, PressTarget, hold_callback, install_press_feedback};
use crate::error::ControlResult;
use crate::label::{LabelSigs, TextControl};
use crate::offsets::{ControlParent, Indexed};
use crate::sigs::{AnalogInput, SerialInput};

/// A static image object with a URL join and an analog mode join.
pub struct ImageObject {
    base: ControlBase,
    graphics: SerialInput,
    mode: AnalogInput,
}

impl ImageObject {
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
            graphics: SerialInput::new(),
            mode: AnalogInput::new(),
        }
    }

    pub fn graphics_join(&self) -> Join {
        self.graphics.join()
    }

    pub fn set_graphics_join(&self, join: Join) {
        self.graphics.set_join(join);
    }

    pub fn mode_join(&self) -> Join {
        self.mode.join()
    }

    pub fn set_mode_join(&self, join: Join) {
        self.mode.set_join(join);
    }

    /// Set the URL the panel loads the image from.
    pub fn set_image_url(&self, url: &str) -> ControlResult<()> {
        self.graphics.write(&self.base, url, "set image url")
    }

    /// Set the image mode.
    pub fn set_mode(&self, mode: u16) -> ControlResult<()> {
        self.mode.write(&self.base, mode, "set image mode")
    }
}

impl Indexed for ImageObject {
    fn index(&self) -> u16 {
        self.base.index()
    }
}

impl Control for ImageObject {
    fn base(&self) -> &ControlBase {
        &self.base
    }
}

/// A dynamic icon: a button whose artwork is selected by name or path.
pub struct DynamicIcon {
    inner: Arc<DynamicIconInner>,
}

struct DynamicIconInner {
    base: ControlBase,
    text: LabelSigs,
    press: PressSigs,
    icon: SerialInput,
    icon_path: SerialInput,
}

impl PressTarget for DynamicIconInner {
    fn control_base(&self) -> &ControlBase {
        &self.base
    }

    fn sigs(&self) -> &PressSigs {
        &self.press
    }
}

impl DynamicIcon {
    pub fn new(panel: Arc<dyn SigEndpoint>) -> Self {
        Self::build(panel, None)
    }

    pub fn with_parent(panel: Arc<dyn SigEndpoint>, parent: Arc<dyn ControlParent>) -> Self {
        Self::build(panel, Some(parent))
    }

    fn build(panel: Arc<dyn SigEndpoint>, parent: Option<Arc<dyn ControlParent>>) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<DynamicIconInner>| DynamicIconInner {
            base: ControlBase::new(panel, parent, 0),
            text: LabelSigs::new(),
            press: PressSigs::new(hold_callback(weak.clone())),
            icon: SerialInput::new(),
            icon_path: SerialInput::new(),
        });
        install_press_feedback(&inner);
        Self { inner }
    }

    pub fn icon_join(&self) -> Join {
        self.inner.icon.join()
    }

    pub fn set_icon_join(&self, join: Join) {
        self.inner.icon.set_join(join);
    }

    pub fn icon_path_join(&self) -> Join {
        self.inner.icon_path.join()
    }

    pub fn set_icon_path_join(&self, join: Join) {
        self.inner.icon_path.set_join(join);
    }

    /// Set the icon by name.
    pub fn set_icon(&self, icon: &str) -> ControlResult<()> {
        self.inner.icon.write(&self.inner.base, icon, "set icon")
    }

    /// Set the icon from a graphics path.
    pub fn set_icon_path(&self, path: &str) -> ControlResult<()> {
        self.inner
            .icon_path
            .write(&self.inner.base, path, "set icon path")
    }
}

impl Indexed for DynamicIcon {
    fn index(&self) -> u16 {
        self.inner.base.index()
    }
}

impl Control for DynamicIcon {
    fn base(&self) -> &ControlBase {
        &self.inner.base
    }
}

impl TextControl for DynamicIcon {
    fn label_sigs(&self) -> &LabelSigs {
        &self.inner.text
    }
}

impl PressButton for DynamicIcon {
    fn press_sigs(&self) -> &PressSigs {
        &self.inner.press
    }
}

impl Drop for DynamicIcon {
    fn drop(&mut self) {
        self.inner.press.detach(self.inner.base.panel().as_ref());
    }
}
