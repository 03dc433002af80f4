//! In-process dependency injection container
//!
//! Callers register arbitrary objects; the container links them to each
//! other by matching unset interface-typed slots against compatible
//! registered objects, then drives a two-phase bring-up (initialize,
//! then start) across all objects in a deterministic order.
//!
//! ## Architecture
//!
//! ```text
//! Managed::manifest()          Container
//! ──────────────────           ─────────
//! capability views      →      add / add_service   (insertion order)
//! provisions (TypeId)   →      build_dependencies  (first match wins)
//! slots (TypeId)        →      init_required(ctx)  (fail-fast)
//!                              start_runners(ctx)  (fail-fast)
//! ```
//!
//! Matching is by declared interface type, not by name: an object's
//! manifest coerces `Arc` clones of itself into the `Arc<dyn Trait>`
//! views it provides, and slots record the `TypeId` of the interface
//! they require. Mutual dependencies resolve independently, so no cycle
//! detection is needed. A slot with no compatible provider is silently
//! left unset, and multiple compatible providers are resolved by
//! insertion order with no diagnostic.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use wireup::{Container, Globalizer, Managed, Manifest, Slot};
//!
//! // An interface other objects can depend on.
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct SystemClock;
//!
//! impl Clock for SystemClock {
//!     fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! impl Globalizer for SystemClock {}
//!
//! impl Managed for SystemClock {
//!     fn manifest(self: Arc<Self>) -> Manifest {
//!         Manifest::new()
//!             .globalizer(self.clone())
//!             .provides::<dyn Clock>(self)
//!     }
//! }
//!
//! struct Reporter {
//!     clock: Slot<dyn Clock>,
//! }
//!
//! impl Globalizer for Reporter {}
//!
//! impl Managed for Reporter {
//!     fn manifest(self: Arc<Self>) -> Manifest {
//!         Manifest::new().globalizer(self.clone()).slot(&self.clock)
//!     }
//! }
//!
//! fn main() -> wireup::Result<()> {
//!     let reporter = Arc::new(Reporter { clock: Slot::new() });
//!     let mut container = Container::new();
//!     container.add(Arc::new(SystemClock))?;
//!     container.add(reporter.clone())?;
//!     container.build_dependencies();
//!
//!     let clock = reporter.clock.get().expect("clock wired");
//!     assert_eq!(clock.now(), 42);
//!     Ok(())
//! }
//! ```
//!
//! Objects exposing [`Initializer`] and [`Runner`] additionally take
//! part in the lifecycle passes, awaited sequentially with a
//! caller-supplied [`CancellationToken`] forwarded verbatim.

pub mod capability;
pub mod container;
pub mod error;
pub mod manifest;
pub mod slot;

pub use capability::{Capability, Globalizer, Initializer, PrivateAccessor, Runner, Service};
pub use container::{Container, ObjectInfo};
pub use error::{Error, Result};
pub use manifest::{Managed, Manifest};
pub use slot::{Slot, SlotSet};

pub use async_trait::async_trait;
pub use tokio_util::sync::CancellationToken;
