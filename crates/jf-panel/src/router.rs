//! Output-sig callback routing.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, trace, warn};

use jf_core::{Join, SigKind};

use crate::endpoint::{SigCallback, SigEvent, SubscriptionId};

/// Registration table mapping output sigs to callbacks.
///
/// Adapters own one router per endpoint and feed every output change into
/// [`SigRouter::dispatch`]. Callbacks are collected under the lock and
/// invoked outside it, so a handler may freely register or unregister.
pub struct SigRouter {
    inner: Mutex<RouterInner>,
}

struct RouterInner {
    next_id: u64,
    by_sig: HashMap<(SigKind, Join), Vec<(SubscriptionId, SigCallback)>>,
    any: Vec<(SubscriptionId, SigCallback)>,
}

impl SigRouter {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RouterInner {
                next_id: 1,
                by_sig: HashMap::new(),
                any: Vec::new(),
            }),
        }
    }

    pub fn register(&self, join: Join, kind: SigKind, callback: SigCallback) -> SubscriptionId {
        let mut inner = self.inner.lock().unwrap();
        let id = SubscriptionId::new(inner.next_id);
        inner.next_id += 1;
        inner
            .by_sig
            .entry((kind, join))
            .or_default()
            .push((id, callback));
        debug!(join = join.get(), %kind, id = id.raw(), "registered output callback");
        id
    }

    /// Returns false when no registration matches; the miss is logged, since
    /// a mismatched unregister means a feedback registration is leaking.
    pub fn unregister(&self, join: Join, kind: SigKind, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let removed = match inner.by_sig.get_mut(&(kind, join)) {
            Some(entries) => {
                let before = entries.len();
                entries.retain(|(entry_id, _)| *entry_id != id);
                before != entries.len()
            }
            None => false,
        };
        if !removed {
            warn!(join = join.get(), %kind, id = id.raw(), "unregister without matching registration");
        }
        removed
    }

    pub fn register_any(&self, callback: SigCallback) -> SubscriptionId {
        let mut inner = self.inner.lock().unwrap();
        let id = SubscriptionId::new(inner.next_id);
        inner.next_id += 1;
        inner.any.push((id, callback));
        debug!(id = id.raw(), "registered wildcard output callback");
        id
    }

    pub fn unregister_any(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.any.len();
        inner.any.retain(|(entry_id, _)| *entry_id != id);
        let removed = before != inner.any.len();
        if !removed {
            warn!(id = id.raw(), "wildcard unregister without matching registration");
        }
        removed
    }

    /// Deliver one output change to every matching subscriber.
    pub fn dispatch(&self, event: &SigEvent) {
        let callbacks: Vec<SigCallback> = {
            let inner = self.inner.lock().unwrap();
            let matching = inner
                .by_sig
                .get(&(event.kind(), event.join))
                .into_iter()
                .flatten()
                .map(|(_, callback)| callback.clone());
            let any = inner.any.iter().map(|(_, callback)| callback.clone());
            matching.chain(any).collect()
        };
        trace!(join = event.join.get(), kind = %event.kind(), subscribers = callbacks.len(), "dispatching output change");
        for callback in callbacks {
            callback(event);
        }
    }
}

impl Default for SigRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jf_core::SigValue;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_callback(hits: &Arc<AtomicUsize>) -> SigCallback {
        let hits = Arc::clone(hits);
        Arc::new(move |_event: &SigEvent| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn dispatch_reaches_matching_subscriber_only() {
        let router = SigRouter::new();
        let hits = Arc::new(AtomicUsize::new(0));
        router.register(Join::new(5), SigKind::Digital, counter_callback(&hits));

        router.dispatch(&SigEvent::new(Join::new(5), SigValue::Digital(true)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // Same join number, different channel: no delivery.
        router.dispatch(&SigEvent::new(Join::new(5), SigValue::Analog(1)));
        // Different join: no delivery.
        router.dispatch(&SigEvent::new(Join::new(6), SigValue::Digital(true)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn wildcard_sees_every_kind() {
        let router = SigRouter::new();
        let hits = Arc::new(AtomicUsize::new(0));
        router.register_any(counter_callback(&hits));

        router.dispatch(&SigEvent::new(Join::new(1), SigValue::Digital(true)));
        router.dispatch(&SigEvent::new(Join::new(2), SigValue::Analog(9)));
        router.dispatch(&SigEvent::new(Join::new(3), SigValue::from("x")));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn unregister_stops_delivery_and_reports_misses() {
        let router = SigRouter::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let id = router.register(Join::new(7), SigKind::Analog, counter_callback(&hits));

        assert!(router.unregister(Join::new(7), SigKind::Analog, id));
        router.dispatch(&SigEvent::new(Join::new(7), SigValue::Analog(1)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        // Double unregister, and unregister at the wrong join, both miss.
        assert!(!router.unregister(Join::new(7), SigKind::Analog, id));
        assert!(!router.unregister(Join::new(8), SigKind::Analog, id));
    }
}
