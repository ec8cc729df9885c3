//! jf-core: stable foundation for joinflow.
//!
//! Contains:
//! - join (join numbers + the three signal channel kinds)
//! - value (the digital/analog/serial sig value vocabulary)
//! - cache (last-written caches, each fused with its critical section)

pub mod cache;
pub mod join;
pub mod value;

// Re-exports: nice ergonomics for downstream crates
pub use cache::{SigCache, SigMapCache};
pub use join::{Join, SigKind};
pub use value::SigValue;
