//! Reusable input-sig building blocks for leaf controls.

use std::sync::Mutex;

use jf_core::{Join, SigCache, SigKind};
use jf_panel::{SigCallback, SigEndpoint, SubscriptionId};

use crate::base::ControlBase;
use crate::error::{ControlError, ControlResult};

/// A configurable analog input join with a last-written cache.
pub(crate) struct AnalogInput {
    join: Mutex<Join>,
    cache: SigCache<u16>,
}

impl AnalogInput {
    pub fn new() -> Self {
        Self {
            join: Mutex::new(Join::UNBOUND),
            cache: SigCache::new(),
        }
    }

    pub fn join(&self) -> Join {
        *self.join.lock().unwrap()
    }

    pub fn set_join(&self, join: Join) {
        *self.join.lock().unwrap() = join;
    }

    /// Cached write at the configured join, resolved through the parent.
    pub fn write(&self, base: &ControlBase, value: u16, op: &'static str) -> ControlResult<()> {
        let join = self.join();
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin { op });
        }
        let resolved = base.resolve_analog(join);
        self.cache
            .send_if_changed(value, |v| base.panel().send_input_analog(resolved, *v));
        Ok(())
    }
}

/// A configurable serial input join with a last-written cache.
pub(crate) struct SerialInput {
    join: Mutex<Join>,
    cache: SigCache<String>,
}

impl SerialInput {
    pub fn new() -> Self {
        Self {
            join: Mutex::new(Join::UNBOUND),
            cache: SigCache::new(),
        }
    }

    pub fn join(&self) -> Join {
        *self.join.lock().unwrap()
    }

    pub fn set_join(&self, join: Join) {
        *self.join.lock().unwrap() = join;
    }

    /// Cached write at the configured join, resolved through the parent.
    pub fn write(&self, base: &ControlBase, value: &str, op: &'static str) -> ControlResult<()> {
        let join = self.join();
        if join.is_unbound() {
            return Err(ControlError::UnboundJoin { op });
        }
        let resolved = base.resolve_serial(join);
        self.cache.send_if_changed(value.to_string(), |v| {
            base.panel().send_input_serial(resolved, v)
        });
        Ok(())
    }
}

#[derive(Default)]
struct FeedbackState {
    configured: Join,
    subscribed: Join,
    subscription: Option<SubscriptionId>,
    callback: Option<SigCallback>,
}

/// An output-sig subscription that mirrors a configurable join.
///
/// The registration always sits at the join the write path resolves to.
/// Re-pointing the configured join unregisters at the old resolved join and
/// re-registers at the new one; the subscribed join is tracked separately so
/// the unregister can never name the wrong sig.
pub(crate) struct FeedbackSlot {
    kind: SigKind,
    state: Mutex<FeedbackState>,
}

impl FeedbackSlot {
    pub fn new(kind: SigKind) -> Self {
        Self {
            kind,
            state: Mutex::new(FeedbackState::default()),
        }
    }

    /// The configured (local) join.
    pub fn configured(&self) -> Join {
        self.state.lock().unwrap().configured
    }

    /// Install the callback and subscribe at the resolved join, if bound.
    pub fn attach(
        &self,
        endpoint: &dyn SigEndpoint,
        configured: Join,
        resolved: Join,
        callback: SigCallback,
    ) {
        let mut state = self.state.lock().unwrap();
        state.configured = configured;
        state.callback = Some(callback);
        Self::subscribe_locked(&mut state, endpoint, self.kind, resolved);
    }

    /// Re-point the subscription at a new configured join.
    pub fn retarget(&self, endpoint: &dyn SigEndpoint, configured: Join, resolved: Join) {
        let mut state = self.state.lock().unwrap();
        Self::unsubscribe_locked(&mut state, endpoint, self.kind);
        state.configured = configured;
        Self::subscribe_locked(&mut state, endpoint, self.kind, resolved);
    }

    /// Drop the subscription and the callback.
    pub fn detach(&self, endpoint: &dyn SigEndpoint) {
        let mut state = self.state.lock().unwrap();
        Self::unsubscribe_locked(&mut state, endpoint, self.kind);
        state.callback = None;
    }

    fn subscribe_locked(
        state: &mut FeedbackState,
        endpoint: &dyn SigEndpoint,
        kind: SigKind,
        resolved: Join,
    ) {
        if resolved.is_unbound() {
            return;
        }
        let Some(callback) = state.callback.clone() else {
            return;
        };
        state.subscribed = resolved;
        state.subscription = Some(endpoint.register_output_sig(resolved, kind, callback));
    }

    fn unsubscribe_locked(state: &mut FeedbackState, endpoint: &dyn SigEndpoint, kind: SigKind) {
        if let Some(id) = state.subscription.take() {
            endpoint.unregister_output_sig(state.subscribed, kind, id);
        }
        state.subscribed = Join::UNBOUND;
    }
}
