//! Pages and subpages: containers that offset their children's joins.

use std::sync::{Arc, Mutex};

use jf_panel::SigEndpoint;

use crate::base::{Control, ControlBase};
use crate::error::ControlResult;
use crate::offsets::{ControlParent, Indexed, JoinOffsets};

#[derive(Debug, Default, Clone, Copy)]
struct ChannelOffsets {
    digital: u16,
    analog: u16,
    serial: u16,
}

/// A top-level page. Its per-channel offsets are added to every child join,
/// on top of whatever its own parent contributes.
pub struct Page {
    base: ControlBase,
    offsets: Mutex<ChannelOffsets>,
}

impl Page {
    pub fn new(panel: Arc<dyn SigEndpoint>) -> Self {
        Self::with_parent(panel, None, 0)
    }

    pub fn with_parent(
        panel: Arc<dyn SigEndpoint>,
        parent: Option<Arc<dyn ControlParent>>,
        index: u16,
    ) -> Self {
        Self {
            base: ControlBase::new(panel, parent, index),
            offsets: Mutex::new(ChannelOffsets::default()),
        }
    }

    pub fn digital_offset(&self) -> u16 {
        self.offsets.lock().unwrap().digital
    }

    pub fn set_digital_offset(&self, offset: u16) {
        self.offsets.lock().unwrap().digital = offset;
    }

    pub fn analog_offset(&self) -> u16 {
        self.offsets.lock().unwrap().analog
    }

    pub fn set_analog_offset(&self, offset: u16) {
        self.offsets.lock().unwrap().analog = offset;
    }

    pub fn serial_offset(&self) -> u16 {
        self.offsets.lock().unwrap().serial
    }

    pub fn set_serial_offset(&self, offset: u16) {
        self.offsets.lock().unwrap().serial = offset;
    }
}

impl Indexed for Page {
    fn index(&self) -> u16 {
        self.base.index()
    }
}

impl Control for Page {
    fn base(&self) -> &ControlBase {
        &self.base
    }
}

impl JoinOffsets for Page {
    // The parent is asked for an offset on this page, not on the grandchild:
    // offsets accumulate as a chain of own contributions, one per level.
    fn digital_join_offset(&self, _child: &dyn Indexed) -> u16 {
        let own = self.offsets.lock().unwrap().digital;
        match self.base.parent() {
            None => own,
            Some(parent) => parent.digital_join_offset(&self.base).wrapping_add(own),
        }
    }

    fn analog_join_offset(&self, _child: &dyn Indexed) -> u16 {
        let own = self.offsets.lock().unwrap().analog;
        match self.base.parent() {
            None => own,
            Some(parent) => parent.analog_join_offset(&self.base).wrapping_add(own),
        }
    }

    fn serial_join_offset(&self, _child: &dyn Indexed) -> u16 {
        let own = self.offsets.lock().unwrap().serial;
        match self.base.parent() {
            None => own,
            Some(parent) => parent.serial_join_offset(&self.base).wrapping_add(own),
        }
    }
}

impl ControlParent for Page {}

/// A subpage: a page that may sit inside a repeating list.
///
/// Inside a subpage-reference list the panel manages row visibility through
/// the list's own joins, so show/enable and the visibility queries route to
/// the list's per-row state instead of this control's joins.
pub struct Subpage {
    base: ControlBase,
    offsets: Mutex<ChannelOffsets>,
}

impl Subpage {
    pub fn new(panel: Arc<dyn SigEndpoint>) -> Self {
        Self::with_parent(panel, None, 0)
    }

    pub fn with_parent(
        panel: Arc<dyn SigEndpoint>,
        parent: Option<Arc<dyn ControlParent>>,
        index: u16,
    ) -> Self {
        Self {
            base: ControlBase::new(panel, parent, index),
            offsets: Mutex::new(ChannelOffsets::default()),
        }
    }

    pub fn digital_offset(&self) -> u16 {
        self.offsets.lock().unwrap().digital
    }

    pub fn set_digital_offset(&self, offset: u16) {
        self.offsets.lock().unwrap().digital = offset;
    }

    pub fn analog_offset(&self) -> u16 {
        self.offsets.lock().unwrap().analog
    }

    pub fn set_analog_offset(&self, offset: u16) {
        self.offsets.lock().unwrap().analog = offset;
    }

    pub fn serial_offset(&self) -> u16 {
        self.offsets.lock().unwrap().serial
    }

    pub fn set_serial_offset(&self, offset: u16) {
        self.offsets.lock().unwrap().serial = offset;
    }
}

impl Indexed for Subpage {
    fn index(&self) -> u16 {
        self.base.index()
    }
}

impl Control for Subpage {
    fn base(&self) -> &ControlBase {
        &self.base
    }

    fn is_visible(&self) -> bool {
        match self.base.parent().and_then(|parent| parent.items()) {
            Some(items) => items.item_visible(self.base.index()),
            None => self.base.is_visible(),
        }
    }

    fn is_enabled(&self) -> bool {
        match self.base.parent().and_then(|parent| parent.items()) {
            Some(items) => items.item_enabled(self.base.index()),
            None => self.base.is_enabled(),
        }
    }

    fn show(&self, state: bool) -> ControlResult<()> {
        match self.base.parent().and_then(|parent| parent.items()) {
            Some(items) => {
                items.set_item_visible(self.base.index(), state);
                Ok(())
            }
            None => self.base.show(state),
        }
    }

    fn enable(&self, state: bool) -> ControlResult<()> {
        match self.base.parent().and_then(|parent| parent.items()) {
            Some(items) => {
                items.set_item_enabled(self.base.index(), state);
                Ok(())
            }
            None => self.base.enable(state),
        }
    }
}

impl JoinOffsets for Subpage {
    fn digital_join_offset(&self, _child: &dyn Indexed) -> u16 {
        let own = self.offsets.lock().unwrap().digital;
        match self.base.parent() {
            None => own,
            Some(parent) => parent.digital_join_offset(&self.base).wrapping_add(own),
        }
    }

    fn analog_join_offset(&self, _child: &dyn Indexed) -> u16 {
        let own = self.offsets.lock().unwrap().analog;
        match self.base.parent() {
            None => own,
            Some(parent) => parent.analog_join_offset(&self.base).wrapping_add(own),
        }
    }

    fn serial_join_offset(&self, _child: &dyn Indexed) -> u16 {
        let own = self.offsets.lock().unwrap().serial;
        match self.base.parent() {
            None => own,
            Some(parent) => parent.serial_join_offset(&self.base).wrapping_add(own),
        }
    }
}

impl ControlParent for Subpage {}
