//! In-memory panel endpoints for tests and demos.
//!
//! The mock records every input write, answers last-value queries, and lets
//! a test play the panel's role by raising output changes back through the
//! registered callbacks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::trace;

use jf_core::{Join, SigKind, SigValue};

use crate::device::{PanelDevice, PanelError, PanelResult, SmartObject};
use crate::endpoint::{SigCallback, SigEndpoint, SigEvent, SubscriptionId};
use crate::router::SigRouter;

/// One recorded input write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficRecord {
    pub kind: SigKind,
    pub join: Join,
    pub value: SigValue,
}

#[derive(Default)]
struct Recording {
    traffic: Vec<TrafficRecord>,
    digital: HashMap<Join, bool>,
    analog: HashMap<Join, u16>,
    serial: HashMap<Join, String>,
}

/// Shared recording + routing state behind both mock endpoint types.
struct RecordingEndpoint {
    label: String,
    recording: Mutex<Recording>,
    router: SigRouter,
}

impl RecordingEndpoint {
    fn new(label: String) -> Self {
        Self {
            label,
            recording: Mutex::new(Recording::default()),
            router: SigRouter::new(),
        }
    }

    fn record_digital(&self, join: Join, value: bool) {
        trace!(endpoint = %self.label, join = join.get(), value, "input digital");
        let mut recording = self.recording.lock().unwrap();
        recording.digital.insert(join, value);
        recording.traffic.push(TrafficRecord {
            kind: SigKind::Digital,
            join,
            value: SigValue::Digital(value),
        });
    }

    fn record_analog(&self, join: Join, value: u16) {
        trace!(endpoint = %self.label, join = join.get(), value, "input analog");
        let mut recording = self.recording.lock().unwrap();
        recording.analog.insert(join, value);
        recording.traffic.push(TrafficRecord {
            kind: SigKind::Analog,
            join,
            value: SigValue::Analog(value),
        });
    }

    fn record_serial(&self, join: Join, value: &str) {
        trace!(endpoint = %self.label, join = join.get(), value, "input serial");
        let mut recording = self.recording.lock().unwrap();
        recording.serial.insert(join, value.to_string());
        recording.traffic.push(TrafficRecord {
            kind: SigKind::Serial,
            join,
            value: SigValue::Serial(value.to_string()),
        });
    }

    fn digital_input(&self, join: Join) -> Option<bool> {
        self.recording.lock().unwrap().digital.get(&join).copied()
    }

    fn analog_input(&self, join: Join) -> Option<u16> {
        self.recording.lock().unwrap().analog.get(&join).copied()
    }

    fn serial_input(&self, join: Join) -> Option<String> {
        self.recording.lock().unwrap().serial.get(&join).cloned()
    }

    fn traffic(&self) -> Vec<TrafficRecord> {
        self.recording.lock().unwrap().traffic.clone()
    }
}

macro_rules! endpoint_surface {
    ($type:ty) => {
        impl SigEndpoint for $type {
            fn send_input_digital(&self, join: Join, value: bool) {
                self.endpoint.record_digital(join, value);
            }

            fn send_input_analog(&self, join: Join, value: u16) {
                self.endpoint.record_analog(join, value);
            }

            fn send_input_serial(&self, join: Join, value: &str) {
                self.endpoint.record_serial(join, value);
            }

            fn register_output_sig(
                &self,
                join: Join,
                kind: SigKind,
                callback: SigCallback,
            ) -> SubscriptionId {
                self.endpoint.router.register(join, kind, callback)
            }

            fn unregister_output_sig(
                &self,
                join: Join,
                kind: SigKind,
                id: SubscriptionId,
            ) -> bool {
                self.endpoint.router.unregister(join, kind, id)
            }

            fn register_output_any(&self, callback: SigCallback) -> SubscriptionId {
                self.endpoint.router.register_any(callback)
            }

            fn unregister_output_any(&self, id: SubscriptionId) -> bool {
                self.endpoint.router.unregister_any(id)
            }
        }

        impl $type {
            /// Last digital value written to `join`, if any.
            pub fn digital_input(&self, join: Join) -> Option<bool> {
                self.endpoint.digital_input(join)
            }

            /// Last analog value written to `join`, if any.
            pub fn analog_input(&self, join: Join) -> Option<u16> {
                self.endpoint.analog_input(join)
            }

            /// Last serial value written to `join`, if any.
            pub fn serial_input(&self, join: Join) -> Option<String> {
                self.endpoint.serial_input(join)
            }

            /// Every input write in arrival order.
            pub fn traffic(&self) -> Vec<TrafficRecord> {
                self.endpoint.traffic()
            }

            /// Play the panel: raise an output change into the registered
            /// callbacks.
            pub fn raise_output(&self, join: Join, value: SigValue) {
                self.endpoint.router.dispatch(&SigEvent::new(join, value));
            }
        }
    };
}

/// An in-memory panel device.
pub struct MockPanel {
    endpoint: RecordingEndpoint,
    smart_objects: Mutex<HashMap<u32, Arc<MockSmartObject>>>,
}

impl MockPanel {
    pub fn new() -> Self {
        Self {
            endpoint: RecordingEndpoint::new("panel".to_string()),
            smart_objects: Mutex::new(HashMap::new()),
        }
    }

    /// The mock smart object with the given id, created on first use.
    ///
    /// The concrete type, for tests that want recording queries on the
    /// smart object; the trait surface hands out `Arc<dyn SmartObject>`.
    pub fn mock_smart_object(&self, id: u32) -> PanelResult<Arc<MockSmartObject>> {
        if id == 0 {
            return Err(PanelError::InvalidSmartObjectId);
        }
        let mut smart_objects = self.smart_objects.lock().unwrap();
        let smart = smart_objects
            .entry(id)
            .or_insert_with(|| Arc::new(MockSmartObject::new(id)));
        Ok(Arc::clone(smart))
    }
}

impl Default for MockPanel {
    fn default() -> Self {
        Self::new()
    }
}

endpoint_surface!(MockPanel);

impl PanelDevice for MockPanel {
    fn smart_object(&self, id: u32) -> PanelResult<Arc<dyn SmartObject>> {
        Ok(self.mock_smart_object(id)?)
    }
}

/// An in-memory smart object.
pub struct MockSmartObject {
    id: u32,
    endpoint: RecordingEndpoint,
}

impl MockSmartObject {
    fn new(id: u32) -> Self {
        Self {
            id,
            endpoint: RecordingEndpoint::new(format!("smart object {id}")),
        }
    }
}

endpoint_surface!(MockSmartObject);

impl SmartObject for MockSmartObject {
    fn id(&self) -> u32 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn writes_are_recorded_with_last_value() {
        let panel = MockPanel::new();
        panel.send_input_digital(Join::new(100), true);
        panel.send_input_digital(Join::new(100), false);
        panel.send_input_serial(Join::new(3), "hello");

        assert_eq!(panel.digital_input(Join::new(100)), Some(false));
        assert_eq!(panel.serial_input(Join::new(3)), Some("hello".to_string()));
        assert_eq!(panel.analog_input(Join::new(3)), None);
        assert_eq!(panel.traffic().len(), 3);
    }

    #[test]
    fn smart_object_id_zero_is_rejected() {
        let panel = MockPanel::new();
        assert_eq!(
            panel.smart_object(0).err(),
            Some(PanelError::InvalidSmartObjectId)
        );
    }

    #[test]
    fn smart_objects_are_scoped_per_id() {
        let panel = MockPanel::new();
        let first = panel.mock_smart_object(1).unwrap();
        let second = panel.mock_smart_object(2).unwrap();
        let first_again = panel.mock_smart_object(1).unwrap();

        first.send_input_analog(Join::new(3), 5);
        assert_eq!(first_again.analog_input(Join::new(3)), Some(5));
        assert_eq!(second.analog_input(Join::new(3)), None);
        assert_eq!(panel.analog_input(Join::new(3)), None);
    }

    #[test]
    fn raised_outputs_reach_subscribers() {
        let panel = MockPanel::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_callback = Arc::clone(&hits);
        panel.register_output_sig(
            Join::new(9),
            SigKind::Digital,
            Arc::new(move |event: &SigEvent| {
                assert_eq!(event.value.as_digital(), Some(true));
                hits_in_callback.fetch_add(1, Ordering::SeqCst);
            }),
        );

        panel.raise_output(Join::new(9), SigValue::Digital(true));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
