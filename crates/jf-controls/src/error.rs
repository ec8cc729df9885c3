//! Error types for control operations.

use thiserror::Error;

use jf_panel::PanelError;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors raised by control operations.
///
/// Every failure here is a caller-configuration error: immediate,
/// synchronous and non-retryable. Transport failures are not modeled at
/// this layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// The operation requires a join that is unbound (0).
    #[error("{op}: join is unbound")]
    UnboundJoin { op: &'static str },

    /// An item index beyond the configured bound.
    #[error("{what} index {index} is out of range (max {max})")]
    IndexOutOfRange {
        what: &'static str,
        index: u16,
        max: u16,
    },

    /// Panel-layer failure surfaced during construction.
    #[error(transparent)]
    Panel(#[from] PanelError),
}
