//! Capability ports exposed by managed objects
//!
//! A registered object participates in the container by exposing some
//! subset of these capabilities through its [`Manifest`](crate::Manifest).
//! Registration requires at least one of [`Initializer`], [`Runner`], or
//! [`Globalizer`]; [`PrivateAccessor`] is optional on top of those.

use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::manifest::Managed;
use crate::slot::SlotSet;

/// Initializer is the capability that wraps the basic `init` operation.
///
/// `init` is invoked inside the container's
/// [`init_required`](crate::Container::init_required) pass for each
/// object exposing this capability, once, sequentially, in registration
/// order.
///
/// The cancellation token is forwarded from the caller verbatim; the
/// container itself never inspects it.
#[async_trait]
pub trait Initializer: Send + Sync {
    /// Initialize the object
    async fn init(&self, ctx: CancellationToken) -> Result<()>;
}

/// Runner is the capability that wraps the basic `start` operation.
///
/// `start` is invoked inside the container's
/// [`start_runners`](crate::Container::start_runners) pass for each
/// object exposing this capability, once, sequentially, in registration
/// order.
///
/// The container awaits each `start` to completion before moving on. A
/// start operation that serves indefinitely (e.g. an accept loop) must
/// hand the long-running work to `tokio::spawn` and return promptly, or
/// it stalls the pass for every object after it.
///
/// The cancellation token is forwarded from the caller verbatim and
/// should be used for graceful shutdown of spawned work.
#[async_trait]
pub trait Runner: Send + Sync {
    /// Start the object
    async fn start(&self, ctx: CancellationToken) -> Result<()>;
}

/// Globalizer is a no-op marker capability.
///
/// Exposing Globalizer is a simple way of registering an arbitrary
/// entity as a wiring candidate for other objects' slots when there is
/// no sense in it implementing [`Initializer`] or [`Runner`]. It
/// satisfies the registration requirement and contributes nothing to
/// either lifecycle pass.
pub trait Globalizer: Send + Sync {}

/// PrivateAccessor exposes an internal wiring target.
///
/// An object whose dependencies live on a non-public substructure can
/// expose that substructure's slots here; the linker wires them with
/// the identical algorithm it applies to the manifest's own slots. The
/// returned set is flat: only one level of indirection is supported.
pub trait PrivateAccessor: Send + Sync {
    /// Slots of the internal substructure
    fn private_slots(&self) -> SlotSet;
}

/// Service combines [`Managed`] with [`Initializer`] and [`Runner`].
///
/// A typical service has an initialisation part and a serving part.
/// Registering through [`add_service`](crate::Container::add_service)
/// uses this trait to provide compile-time validation that both
/// capabilities exist.
pub trait Service: Managed + Initializer + Runner {}

impl<T: Managed + Initializer + Runner> Service for T {}

/// One capability a registered object exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Capability {
    /// Participates in the init pass
    Initializer,
    /// Participates in the start pass
    Runner,
    /// Marker-only wiring candidate
    Globalizer,
    /// Exposes an internal wiring target
    PrivateAccessor,
}
