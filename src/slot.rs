//! Wiring slots and provisions
//!
//! [`Slot<I>`] is the field type a managed object declares for each
//! dependency it wants auto-wired: a set-once handle around an
//! `Arc<I>` where `I` is the abstract interface the dependency must
//! satisfy. Because the linker only ever sees slots declared through a
//! manifest, concrete-typed fields are structurally incapable of
//! participating in wiring.
//!
//! [`SlotBinding`] and [`Provision`] are the type-erased registry
//! entries the linker matches against each other: both carry the
//! `TypeId` of the interface type, so matching is a table lookup
//! instead of runtime reflection.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// A wiring slot for a dependency of interface type `I`
///
/// The slot binds at most once for its lifetime: a value assigned by
/// the caller at construction time (via [`Slot::preset`]) is never
/// overwritten by the linker, and the first successful bind wins. The
/// handle is cheap to clone; clones share the same cell.
pub struct Slot<I: ?Sized> {
    cell: Arc<OnceLock<Arc<I>>>,
}

impl<I: ?Sized> Slot<I> {
    /// Create an unset slot, eligible for wiring
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OnceLock::new()),
        }
    }

    /// Create a slot already bound to `view`
    ///
    /// Explicit beats implicit: the linker leaves a preset slot
    /// untouched.
    pub fn preset(view: Arc<I>) -> Self {
        let slot = Self::new();
        let _ = slot.cell.set(view);
        slot
    }

    /// Current binding, if any
    ///
    /// Returns a clone of the bound `Arc`; reads through it observe the
    /// provider object's current state, since wiring shares the
    /// provider by reference and never copies it.
    pub fn get(&self) -> Option<Arc<I>> {
        self.cell.get().cloned()
    }

    /// Whether the slot holds a value
    pub fn is_bound(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Bind `view` unless the slot is already bound
    pub(crate) fn bind(&self, view: Arc<I>) -> bool {
        self.cell.set(view).is_ok()
    }
}

impl<I: ?Sized> Clone for Slot<I> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<I: ?Sized> Default for Slot<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ?Sized> fmt::Debug for Slot<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("interface", &type_name::<I>())
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Type-erased handle to one slot, as seen by the linker
pub struct SlotBinding {
    pub(crate) key: TypeId,
    pub(crate) interface: &'static str,
    probe: Box<dyn Fn() -> bool + Send + Sync>,
    assign: Box<dyn Fn(&(dyn Any + Send + Sync)) -> bool + Send + Sync>,
}

impl SlotBinding {
    pub(crate) fn new<I>(slot: &Slot<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let probe = slot.clone();
        let target = slot.clone();
        Self {
            key: TypeId::of::<I>(),
            interface: type_name::<I>(),
            probe: Box::new(move || probe.is_bound()),
            assign: Box::new(move |view| match view.downcast_ref::<Arc<I>>() {
                Some(view) => target.bind(Arc::clone(view)),
                None => false,
            }),
        }
    }

    pub(crate) fn is_bound(&self) -> bool {
        (self.probe)()
    }

    pub(crate) fn bind(&self, view: &(dyn Any + Send + Sync)) -> bool {
        (self.assign)(view)
    }
}

impl fmt::Debug for SlotBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotBinding")
            .field("interface", &self.interface)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// A flat collection of slot bindings
///
/// Returned by [`PrivateAccessor::private_slots`](crate::PrivateAccessor::private_slots)
/// to expose the slots of an internal substructure.
#[derive(Debug, Default)]
pub struct SlotSet {
    pub(crate) bindings: Vec<SlotBinding>,
}

impl SlotSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slot requiring interface `I`
    pub fn slot<I>(mut self, slot: &Slot<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.bindings.push(SlotBinding::new(slot));
        self
    }
}

/// One abstract interface a registered object offers to other objects
///
/// The `view` box holds the coerced `Arc<dyn Trait>` itself, so the
/// linker can hand out reference-counted clones of the original
/// allocation without knowing the trait.
pub(crate) struct Provision {
    pub(crate) key: TypeId,
    pub(crate) interface: &'static str,
    pub(crate) view: Box<dyn Any + Send + Sync>,
}

impl Provision {
    pub(crate) fn new<I>(view: Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        Self {
            key: TypeId::of::<I>(),
            interface: type_name::<I>(),
            view: Box::new(view),
        }
    }
}

impl fmt::Debug for Provision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provision")
            .field("interface", &self.interface)
            .finish()
    }
}
