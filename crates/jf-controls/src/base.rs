//! Common state and behavior shared by every panel control.

use std::sync::{Arc, Mutex};

use tracing::trace;

use jf_core::Join;
use jf_panel::SigEndpoint;

use crate::error::{ControlError, ControlResult};
use crate::offsets::{ControlParent, Indexed};

/// Join number and last-written state of one digital input, guarded as a
/// unit so the compare, the cache update and the transmit cannot interleave
/// with a concurrent writer.
#[derive(Debug, Default)]
struct BoolInput {
    join: Join,
    cache: Option<bool>,
}

/// The state every control owns: its panel endpoint, its place in the
/// control tree, and its visibility/enable joins.
///
/// Panel, parent and index are fixed at construction. Join numbers and
/// cached values are the only mutable state.
pub struct ControlBase {
    panel: Arc<dyn SigEndpoint>,
    parent: Option<Arc<dyn ControlParent>>,
    index: u16,
    visibility: Mutex<BoolInput>,
    enable: Mutex<BoolInput>,
}

impl ControlBase {
    pub fn new(
        panel: Arc<dyn SigEndpoint>,
        parent: Option<Arc<dyn ControlParent>>,
        index: u16,
    ) -> Self {
        Self {
            panel,
            parent,
            index,
            visibility: Mutex::new(BoolInput::default()),
            enable: Mutex::new(BoolInput::default()),
        }
    }

    /// The endpoint this control writes to.
    pub fn panel(&self) -> &Arc<dyn SigEndpoint> {
        &self.panel
    }

    /// The parent responsible for join offsets, if any.
    pub fn parent(&self) -> Option<&Arc<dyn ControlParent>> {
        self.parent.as_ref()
    }

    /// Zero-based position within a repeating parent.
    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn visibility_join(&self) -> Join {
        self.visibility.lock().unwrap().join
    }

    pub fn set_visibility_join(&self, join: Join) {
        self.visibility.lock().unwrap().join = join;
    }

    pub fn enable_join(&self) -> Join {
        self.enable.lock().unwrap().join
    }

    pub fn set_enable_join(&self, join: Join) {
        self.enable.lock().unwrap().join = join;
    }

    /// Resolve a local digital join through the parent chain.
    pub fn resolve_digital(&self, join: Join) -> Join {
        match &self.parent {
            None => join,
            Some(parent) => parent.digital_join_with_offset(join, self),
        }
    }

    /// Resolve a local analog join through the parent chain.
    pub fn resolve_analog(&self, join: Join) -> Join {
        match &self.parent {
            None => join,
            Some(parent) => parent.analog_join_with_offset(join, self),
        }
    }

    /// Resolve a local serial join through the parent chain.
    pub fn resolve_serial(&self, join: Join) -> Join {
        match &self.parent {
            None => join,
            Some(parent) => parent.serial_join_with_offset(join, self),
        }
    }

    /// Visible unless a bound visibility join has written hidden.
    ///
    /// A control with no visibility join is always visible; much of the
    /// tree relies on that default.
    pub fn is_visible(&self) -> bool {
        let input = self.visibility.lock().unwrap();
        input.join.is_unbound() || input.cache == Some(true)
    }

    /// Enabled unless a bound enable join has written disabled.
    pub fn is_enabled(&self) -> bool {
        let input = self.enable.lock().unwrap();
        input.join.is_unbound() || input.cache == Some(true)
    }

    /// True when this control and every ancestor is visible.
    pub fn is_visible_recursive(&self) -> bool {
        self.is_visible() && self.parent.as_ref().is_none_or(|p| p.is_visible_recursive())
    }

    /// Show or hide the control through its visibility join.
    ///
    /// With no join bound the control is always visible: `show(true)` is a
    /// no-op and `show(false)` is an unbound-join error, since the requested
    /// state cannot be reached.
    pub fn show(&self, state: bool) -> ControlResult<()> {
        self.write_bool_input(&self.visibility, state, "show")
    }

    /// Enable or disable the control through its enable join. Same unbound
    /// policy as [`ControlBase::show`].
    pub fn enable(&self, state: bool) -> ControlResult<()> {
        self.write_bool_input(&self.enable, state, "enable")
    }

    fn write_bool_input(
        &self,
        input: &Mutex<BoolInput>,
        state: bool,
        op: &'static str,
    ) -> ControlResult<()> {
        let mut input = input.lock().unwrap();
        if input.join.is_unbound() {
            return if state {
                Ok(())
            } else {
                Err(ControlError::UnboundJoin { op })
            };
        }
        if input.cache == Some(state) {
            return Ok(());
        }
        let join = self.resolve_digital(input.join);
        input.cache = Some(state);
        trace!(op, join = join.get(), state, "digital write");
        self.panel.send_input_digital(join, state);
        Ok(())
    }
}

impl Indexed for ControlBase {
    fn index(&self) -> u16 {
        self.index
    }
}

/// The surface common to every control in the tree.
///
/// Implementations provide [`Control::base`]; the rest has defaults that
/// route through it. Controls whose visibility is managed elsewhere (a
/// subpage inside a repeating list) override the affected methods.
pub trait Control: Indexed + Send + Sync {
    /// Shared control state.
    fn base(&self) -> &ControlBase;

    /// Visible unless a bound visibility join has written hidden.
    fn is_visible(&self) -> bool {
        self.base().is_visible()
    }

    /// Enabled unless a bound enable join has written disabled.
    fn is_enabled(&self) -> bool {
        self.base().is_enabled()
    }

    /// True when this control and every ancestor is visible.
    fn is_visible_recursive(&self) -> bool {
        self.is_visible()
            && self
                .base()
                .parent()
                .is_none_or(|parent| parent.is_visible_recursive())
    }

    /// Show or hide the control.
    fn show(&self, state: bool) -> ControlResult<()> {
        self.base().show(state)
    }

    /// Enable or disable the control.
    fn enable(&self, state: bool) -> ControlResult<()> {
        self.base().enable(state)
    }

    fn visibility_join(&self) -> Join {
        self.base().visibility_join()
    }

    fn set_visibility_join(&self, join: Join) {
        self.base().set_visibility_join(join)
    }

    fn enable_join(&self) -> Join {
        self.base().enable_join()
    }

    fn set_enable_join(&self, join: Join) {
        self.base().set_enable_join(join)
    }
}
