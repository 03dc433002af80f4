//! The container: registration, wiring, and lifecycle passes
//!
//! ## Architecture
//!
//! ```text
//! Container::add / add_service
//!        │  (manifest → entry, insertion order preserved)
//!        ▼
//! build_dependencies
//!        │  (first compatible provider per unset slot,
//!        │   self excluded, private slots included)
//!        ▼
//! init_required(ctx) ──► start_runners(ctx)
//!        (sequential, fail-fast, registration order)
//! ```
//!
//! The container holds no lock and enforces no phase ordering; callers
//! are expected to drive `add* → build_dependencies → init_required →
//! start_runners` from a single task before the wired graph sees any
//! concurrent use.

use std::any::{TypeId, type_name};
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::capability::{Capability, Initializer, Runner, Service};
use crate::error::{Error, Result};
use crate::manifest::{Managed, Manifest};
use crate::slot::{Provision, SlotBinding};

/// One registered object: its declared table plus a display name
struct Entry {
    name: &'static str,
    manifest: Manifest,
}

impl Entry {
    fn capabilities(&self) -> Vec<Capability> {
        let mut caps = Vec::new();
        if self.manifest.init.is_some() {
            caps.push(Capability::Initializer);
        }
        if self.manifest.runner.is_some() {
            caps.push(Capability::Runner);
        }
        if self.manifest.globalizer.is_some() {
            caps.push(Capability::Globalizer);
        }
        if self.manifest.private.is_some() {
            caps.push(Capability::PrivateAccessor);
        }
        caps
    }

    /// First declared provision matching the given interface key
    fn provision(&self, key: TypeId) -> Option<&Provision> {
        self.manifest.provisions.iter().find(|p| p.key == key)
    }
}

/// Information about a registered object
#[derive(Debug, Clone, Serialize)]
pub struct ObjectInfo {
    /// Concrete type name
    pub name: String,
    /// Exposed capabilities
    pub capabilities: Vec<Capability>,
}

/// Container holds references to registered objects and drives wiring
/// and bring-up.
///
/// Insertion order is significant: it is the wiring precedence order
/// and the lifecycle execution order, preserved for the lifetime of the
/// container. There is no removal operation; the registry only grows.
#[derive(Default)]
pub struct Container {
    objects: Vec<Entry>,
}

impl Container {
    /// Create an empty container
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Register an object
    ///
    /// The object's manifest must expose at least one of the
    /// [`Initializer`], [`Runner`], or [`Globalizer`](crate::Globalizer)
    /// capabilities; otherwise registration fails with
    /// [`Error::InvalidRegistration`], which indicates the container is
    /// being misused rather than a recoverable runtime condition. A
    /// [`PrivateAccessor`](crate::PrivateAccessor) declaration alone
    /// does not qualify.
    pub fn add<T: Managed>(&mut self, object: Arc<T>) -> Result<()> {
        let entry = Entry {
            name: type_name::<T>(),
            manifest: object.manifest(),
        };
        if entry.manifest.init.is_none()
            && entry.manifest.runner.is_none()
            && entry.manifest.globalizer.is_none()
        {
            return Err(Error::InvalidRegistration { object: entry.name });
        }
        info!(object = entry.name, capabilities = ?entry.capabilities(), "registered object");
        self.objects.push(entry);
        Ok(())
    }

    /// Register an object statically known to be a [`Service`]
    ///
    /// Behaviorally identical to [`add`](Self::add), but the type
    /// system guarantees the Initializer and Runner capabilities exist,
    /// so registration cannot fail. The container installs either view
    /// itself if the manifest omitted it.
    pub fn add_service<T: Service>(&mut self, object: Arc<T>) {
        let mut manifest = Arc::clone(&object).manifest();
        if manifest.init.is_none() {
            manifest.init = Some(Arc::clone(&object) as Arc<dyn Initializer>);
        }
        if manifest.runner.is_none() {
            manifest.runner = Some(object as Arc<dyn Runner>);
        }
        let entry = Entry {
            name: type_name::<T>(),
            manifest,
        };
        info!(object = entry.name, capabilities = ?entry.capabilities(), "registered service");
        self.objects.push(entry);
    }

    /// List registered objects in insertion order
    pub fn objects(&self) -> Vec<ObjectInfo> {
        self.objects
            .iter()
            .map(|entry| ObjectInfo {
                name: entry.name.to_string(),
                capabilities: entry.capabilities(),
            })
            .collect()
    }

    /// Link registered objects to each other
    ///
    /// Intended to run exactly once, after all registrations. For each
    /// object in insertion order, every unset slot (the manifest's own
    /// and, where a private accessor is exposed, the internal
    /// substructure's) is bound to the first other registered object
    /// that provides the slot's interface, scanning in insertion order
    /// and skipping the object itself. Ties are resolved silently by
    /// insertion order. A slot with no compatible provider is left
    /// unset without error; the miss surfaces later at the dependent
    /// object's own use site.
    pub fn build_dependencies(&self) {
        for (pos, entry) in self.objects.iter().enumerate() {
            for slot in &entry.manifest.slots {
                self.wire(pos, slot);
            }
            if let Some(private) = &entry.manifest.private {
                for slot in &private.private_slots().bindings {
                    self.wire(pos, slot);
                }
            }
        }
    }

    fn wire(&self, pos: usize, slot: &SlotBinding) {
        let holder = self.objects[pos].name;
        if slot.is_bound() {
            debug!(
                object = holder,
                interface = slot.interface,
                "slot already bound, leaving as-is"
            );
            return;
        }
        for (candidate, other) in self.objects.iter().enumerate() {
            if candidate == pos {
                // never wire an object to itself
                continue;
            }
            let Some(provision) = other.provision(slot.key) else {
                continue;
            };
            if slot.bind(provision.view.as_ref()) {
                debug!(
                    object = holder,
                    interface = slot.interface,
                    provider = other.name,
                    "wired slot"
                );
                return;
            }
        }
        debug!(
            object = holder,
            interface = slot.interface,
            "no compatible provider, slot left unset"
        );
    }

    /// Initialize each registered object exposing [`Initializer`]
    ///
    /// A single sequential pass in registration order. The first error
    /// is returned verbatim and aborts the pass; objects after the
    /// failing one are left uninitialized. No retry, no timeout. The
    /// token is forwarded to each `init` as-is and never inspected
    /// here.
    pub async fn init_required(&self, ctx: &CancellationToken) -> Result<()> {
        for entry in &self.objects {
            let Some(init) = &entry.manifest.init else {
                continue;
            };
            debug!(object = entry.name, "initializing");
            if let Err(err) = init.init(ctx.clone()).await {
                error!(object = entry.name, error = %err, "init failed, aborting pass");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Start each registered object exposing [`Runner`]
    ///
    /// Same iteration, ordering, and fail-fast contract as
    /// [`init_required`](Self::init_required), over the start
    /// operation. Each `start` is awaited to completion before the next
    /// object is reached; a start that never returns stalls the pass
    /// for every object after it.
    pub async fn start_runners(&self, ctx: &CancellationToken) -> Result<()> {
        for entry in &self.objects {
            let Some(runner) = &entry.manifest.runner else {
                continue;
            };
            debug!(object = entry.name, "starting");
            if let Err(err) = runner.start(ctx.clone()).await {
                error!(object = entry.name, error = %err, "start failed, aborting pass");
                return Err(err);
            }
        }
        Ok(())
    }
}
