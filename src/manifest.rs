//! Registration manifests
//!
//! A manifest is the declared capability-and-type table the container
//! works from: which capability views the object exposes, which
//! abstract interfaces it provides to other objects, and which slots of
//! its own want wiring. Declaring everything at registration time keeps
//! matching a `TypeId` lookup with no runtime reflection involved.

use std::sync::Arc;

use crate::capability::{Globalizer, Initializer, PrivateAccessor, Runner};
use crate::slot::{Provision, Slot, SlotBinding};

/// Managed is implemented by every object the container can hold.
///
/// `manifest` takes `Arc<Self>` so the implementation can coerce clones
/// of the same allocation into the capability and interface views it
/// declares:
///
/// ```ignore
/// impl Managed for Server {
///     fn manifest(self: Arc<Self>) -> Manifest {
///         Manifest::new()
///             .initializer(self.clone())
///             .runner(self.clone())
///             .slot(&self.store)
///             .provides::<dyn HealthCheck>(self)
///     }
/// }
/// ```
pub trait Managed: Send + Sync + 'static {
    /// Declare capabilities, provisions, and slots
    fn manifest(self: Arc<Self>) -> Manifest;
}

/// Declared capability table for one object
#[derive(Default)]
pub struct Manifest {
    pub(crate) init: Option<Arc<dyn Initializer>>,
    pub(crate) runner: Option<Arc<dyn Runner>>,
    pub(crate) globalizer: Option<Arc<dyn Globalizer>>,
    pub(crate) private: Option<Arc<dyn PrivateAccessor>>,
    pub(crate) provisions: Vec<Provision>,
    pub(crate) slots: Vec<SlotBinding>,
}

impl Manifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose the Initializer capability
    pub fn initializer(mut self, view: Arc<dyn Initializer>) -> Self {
        self.init = Some(view);
        self
    }

    /// Expose the Runner capability
    pub fn runner(mut self, view: Arc<dyn Runner>) -> Self {
        self.runner = Some(view);
        self
    }

    /// Expose the Globalizer marker capability
    pub fn globalizer(mut self, view: Arc<dyn Globalizer>) -> Self {
        self.globalizer = Some(view);
        self
    }

    /// Expose an internal wiring target
    pub fn private_accessor(mut self, view: Arc<dyn PrivateAccessor>) -> Self {
        self.private = Some(view);
        self
    }

    /// Declare that this object satisfies interface `I`
    ///
    /// Other objects' slots requiring `I` become wireable to this one.
    pub fn provides<I>(mut self, view: Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.provisions.push(Provision::new(view));
        self
    }

    /// Declare a slot wanting an implementation of interface `I`
    pub fn slot<I>(mut self, slot: &Slot<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.slots.push(SlotBinding::new(slot));
        self
    }
}
