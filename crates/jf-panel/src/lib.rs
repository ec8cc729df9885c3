//! jf-panel: the panel transport boundary.
//!
//! Everything above this crate talks to a touch panel exclusively through
//! the [`SigEndpoint`] trait: fire-and-forget input writes on the three sig
//! channels, and callback registration for output sigs. A [`PanelDevice`]
//! additionally hands out [`SmartObject`] endpoints, which scope the same
//! surface to one sub-widget.
//!
//! [`SigRouter`] is the reusable registration/dispatch table adapters build
//! on, and [`mock`] provides the in-memory panel used by tests and demos.

pub mod device;
pub mod endpoint;
pub mod mock;
pub mod router;

pub use device::{PanelDevice, PanelError, PanelResult, SmartObject};
pub use endpoint::{SigCallback, SigEndpoint, SigEvent, SubscriptionId};
pub use mock::{MockPanel, MockSmartObject, TrafficRecord};
pub use router::SigRouter;
