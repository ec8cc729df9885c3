//! Panel devices and smart objects.

use std::sync::Arc;

use thiserror::Error;

use crate::endpoint::SigEndpoint;

/// Result type for panel-layer operations.
pub type PanelResult<T> = Result<T, PanelError>;

/// Errors raised at the panel boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PanelError {
    /// Smart object id 0 is reserved by the panel and never valid.
    #[error("smart object id 0 is not valid")]
    InvalidSmartObjectId,
}

/// A sub-widget endpoint scoped by a numeric smart object id.
///
/// A smart object numbers its joins independently of the device and of every
/// other smart object; beyond the id it behaves like any other endpoint.
pub trait SmartObject: SigEndpoint {
    fn id(&self) -> u32;
}

/// A full panel device: the device-level sig surface plus access to the
/// panel's smart objects.
pub trait PanelDevice: SigEndpoint {
    /// The smart object with the given id. Id 0 is invalid.
    fn smart_object(&self, id: u32) -> PanelResult<Arc<dyn SmartObject>>;
}
