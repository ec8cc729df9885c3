//! The two-way sig surface of a panel or smart object.

use std::sync::Arc;

use jf_core::{Join, SigKind, SigValue};

/// Identifies one output-sig callback registration.
///
/// Unregistration must name the same join and kind the registration named;
/// an id alone is deliberately not enough, so a control that re-points a
/// join and forgets the old registration leaves an observable leak rather
/// than a silent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A change reported by the panel for one output sig.
#[derive(Debug, Clone, PartialEq)]
pub struct SigEvent {
    pub join: Join,
    pub value: SigValue,
}

impl SigEvent {
    pub fn new(join: Join, value: SigValue) -> Self {
        Self { join, value }
    }

    pub fn kind(&self) -> SigKind {
        self.value.kind()
    }
}

/// Callback invoked when a subscribed output sig changes.
///
/// The transport delivers these on its own thread; handlers must be safe to
/// run concurrently with application calls into the same control.
pub type SigCallback = Arc<dyn Fn(&SigEvent) + Send + Sync>;

/// Two-way sig surface of a panel device or smart object.
///
/// Input writes are fire-and-forget: delivery and delivery failures are the
/// transport's responsibility, nothing is awaited here.
pub trait SigEndpoint: Send + Sync {
    fn send_input_digital(&self, join: Join, value: bool);
    fn send_input_analog(&self, join: Join, value: u16);
    fn send_input_serial(&self, join: Join, value: &str);

    /// Subscribe to changes of one output sig.
    fn register_output_sig(
        &self,
        join: Join,
        kind: SigKind,
        callback: SigCallback,
    ) -> SubscriptionId;

    /// Remove a subscription. Returns false when no matching registration
    /// exists for the given join, kind and id.
    fn unregister_output_sig(&self, join: Join, kind: SigKind, id: SubscriptionId) -> bool;

    /// Subscribe to every output sig of this endpoint.
    fn register_output_any(&self, callback: SigCallback) -> SubscriptionId;

    /// Remove a wildcard subscription.
    fn unregister_output_any(&self, id: SubscriptionId) -> bool;
}
