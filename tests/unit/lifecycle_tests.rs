//! Unit tests for the lifecycle orchestrator
//!
//! Covers ordering and fail-fast behavior of the init and start passes,
//! token pass-through, the Globalizer no-op contract, and the full
//! register-wire-init-start scenario.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use wireup::{
    CancellationToken, Container, Error, Globalizer, Initializer, Managed, Manifest,
    PrivateAccessor, Result, Runner, Slot, SlotSet, async_trait,
};

// =============================================================================
// Fixtures
// =============================================================================

type Log = Arc<Mutex<Vec<String>>>;

/// Records init/start invocations and optionally fails either phase
struct Step {
    name: &'static str,
    log: Log,
    fail_init: bool,
    fail_start: bool,
}

impl Step {
    fn ok(name: &'static str, log: &Log) -> Arc<Self> {
        Arc::new(Self {
            name,
            log: Arc::clone(log),
            fail_init: false,
            fail_start: false,
        })
    }
}

#[async_trait]
impl Initializer for Step {
    async fn init(&self, _ctx: CancellationToken) -> Result<()> {
        self.log
            .lock()
            .expect("log lock poisoned")
            .push(format!("init:{}", self.name));
        if self.fail_init {
            return Err(Error::message(format!("{} init refused", self.name)));
        }
        Ok(())
    }
}

#[async_trait]
impl Runner for Step {
    async fn start(&self, _ctx: CancellationToken) -> Result<()> {
        self.log
            .lock()
            .expect("log lock poisoned")
            .push(format!("start:{}", self.name));
        if self.fail_start {
            return Err(Error::message(format!("{} start refused", self.name)));
        }
        Ok(())
    }
}

impl Managed for Step {
    fn manifest(self: Arc<Self>) -> Manifest {
        Manifest::new().initializer(self.clone()).runner(self)
    }
}

/// Marker-only bystander
struct Bystander;

impl Globalizer for Bystander {}

impl Managed for Bystander {
    fn manifest(self: Arc<Self>) -> Manifest {
        Manifest::new().globalizer(self)
    }
}

/// Observes the token it was handed
struct TokenProbe {
    saw_cancelled: AtomicBool,
}

#[async_trait]
impl Initializer for TokenProbe {
    async fn init(&self, ctx: CancellationToken) -> Result<()> {
        self.saw_cancelled.store(ctx.is_cancelled(), Ordering::SeqCst);
        Ok(())
    }
}

impl Managed for TokenProbe {
    fn manifest(self: Arc<Self>) -> Manifest {
        Manifest::new().initializer(self)
    }
}

// =============================================================================
// Orchestrator Tests
// =============================================================================

/// Init runs each Initializer exactly once, in registration order
#[tokio::test]
async fn test_init_runs_in_registration_order() {
    let log: Log = Arc::default();
    let mut container = Container::new();
    container.add(Step::ok("a", &log)).expect("registration failed");
    container.add(Step::ok("b", &log)).expect("registration failed");
    container.add(Step::ok("c", &log)).expect("registration failed");

    container
        .init_required(&CancellationToken::new())
        .await
        .expect("init pass failed");

    let entries = log.lock().expect("log lock poisoned").clone();
    assert_eq!(entries, vec!["init:a", "init:b", "init:c"]);
}

/// The first init error aborts the pass; later objects stay uninitialized
#[tokio::test]
async fn test_init_fail_fast() {
    let log: Log = Arc::default();
    let mut container = Container::new();
    container.add(Step::ok("a", &log)).expect("registration failed");
    container
        .add(Arc::new(Step {
            name: "b",
            log: Arc::clone(&log),
            fail_init: true,
            fail_start: false,
        }))
        .expect("registration failed");
    container.add(Step::ok("c", &log)).expect("registration failed");

    let err = container
        .init_required(&CancellationToken::new())
        .await
        .expect_err("init pass must fail");
    assert!(matches!(err, Error::Message(_)));
    assert_eq!(format!("{err}"), "b init refused");

    let entries = log.lock().expect("log lock poisoned").clone();
    assert_eq!(entries, vec!["init:a", "init:b"]);
}

/// The start pass exhibits the same ordering and fail-fast contract
#[tokio::test]
async fn test_start_fail_fast() {
    let log: Log = Arc::default();
    let mut container = Container::new();
    container.add(Step::ok("a", &log)).expect("registration failed");
    container
        .add(Arc::new(Step {
            name: "b",
            log: Arc::clone(&log),
            fail_init: false,
            fail_start: true,
        }))
        .expect("registration failed");
    container.add(Step::ok("c", &log)).expect("registration failed");

    let err = container
        .start_runners(&CancellationToken::new())
        .await
        .expect_err("start pass must fail");
    assert_eq!(format!("{err}"), "b start refused");

    let entries = log.lock().expect("log lock poisoned").clone();
    assert_eq!(entries, vec!["start:a", "start:b"]);
}

/// A Globalizer-only object contributes nothing to either pass
#[tokio::test]
async fn test_globalizer_contributes_nothing() {
    let log: Log = Arc::default();
    let mut container = Container::new();
    container.add(Step::ok("a", &log)).expect("registration failed");
    container.add(Arc::new(Bystander)).expect("registration failed");
    container.add(Step::ok("b", &log)).expect("registration failed");

    let token = CancellationToken::new();
    container.init_required(&token).await.expect("init pass failed");
    container.start_runners(&token).await.expect("start pass failed");

    let entries = log.lock().expect("log lock poisoned").clone();
    assert_eq!(entries, vec!["init:a", "init:b", "start:a", "start:b"]);
}

/// The token reaches each object verbatim; the orchestrator never
/// inspects it, so a pre-cancelled token does not abort the pass
#[tokio::test]
async fn test_token_forwarded_verbatim() {
    let probe = Arc::new(TokenProbe {
        saw_cancelled: AtomicBool::new(false),
    });
    let mut container = Container::new();
    container.add(probe.clone()).expect("registration failed");

    let token = CancellationToken::new();
    token.cancel();
    container.init_required(&token).await.expect("init pass failed");

    assert!(probe.saw_cancelled.load(Ordering::SeqCst));
}

// =============================================================================
// End-to-End Scenario
// =============================================================================

trait AgeService: Send + Sync {
    fn age(&self) -> u32;
}

trait GenderService: Send + Sync {
    fn gender(&self) -> String;
}

trait ExtService: Send + Sync {
    fn label(&self) -> String;
}

struct A {
    age: AtomicU32,
}

impl AgeService for A {
    fn age(&self) -> u32 {
        self.age.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Initializer for A {
    async fn init(&self, _ctx: CancellationToken) -> Result<()> {
        self.age.store(20, Ordering::SeqCst);
        Ok(())
    }
}

impl Managed for A {
    fn manifest(self: Arc<Self>) -> Manifest {
        Manifest::new()
            .initializer(self.clone())
            .provides::<dyn AgeService>(self)
    }
}

struct C {
    gender: Mutex<String>,
}

impl GenderService for C {
    fn gender(&self) -> String {
        self.gender.lock().expect("gender lock poisoned").clone()
    }
}

#[async_trait]
impl Initializer for C {
    async fn init(&self, _ctx: CancellationToken) -> Result<()> {
        *self.gender.lock().expect("gender lock poisoned") = "f".to_string();
        Ok(())
    }
}

impl Managed for C {
    fn manifest(self: Arc<Self>) -> Manifest {
        Manifest::new()
            .initializer(self.clone())
            .provides::<dyn GenderService>(self)
    }
}

struct E {
    v: AtomicU32,
}

impl ExtService for E {
    fn label(&self) -> String {
        format!("value={}", self.v.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl Initializer for E {
    async fn init(&self, _ctx: CancellationToken) -> Result<()> {
        self.v.store(202, Ordering::SeqCst);
        Ok(())
    }
}

impl Managed for E {
    fn manifest(self: Arc<Self>) -> Manifest {
        Manifest::new()
            .initializer(self.clone())
            .provides::<dyn ExtService>(self)
    }
}

/// Never registered; reachable only through B's concrete field
struct Helper;

struct BPrivate {
    ext: Slot<dyn ExtService>,
}

struct B {
    a: Slot<dyn AgeService>,
    c: Slot<dyn GenderService>,
    helper: Option<Arc<Helper>>,
    private: BPrivate,
    started: AtomicBool,
}

impl B {
    fn describe(&self) -> String {
        let a = self.a.get().expect("a slot must be wired");
        let c = self.c.get().expect("c slot must be wired");
        let ext = self.private.ext.get().expect("private slot must be wired");
        format!("age={}, gender={}, {}", a.age(), c.gender(), ext.label())
    }
}

#[async_trait]
impl Initializer for B {
    async fn init(&self, _ctx: CancellationToken) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Runner for B {
    async fn start(&self, _ctx: CancellationToken) -> Result<()> {
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl PrivateAccessor for B {
    fn private_slots(&self) -> SlotSet {
        SlotSet::new().slot(&self.private.ext)
    }
}

impl Managed for B {
    fn manifest(self: Arc<Self>) -> Manifest {
        Manifest::new()
            .initializer(self.clone())
            .runner(self.clone())
            .private_accessor(self.clone())
            .slot(&self.a)
            .slot(&self.c)
    }
}

/// Full bring-up: wiring (public, private, concrete), init, then start
#[tokio::test]
async fn test_end_to_end_bring_up() {
    let a = Arc::new(A {
        age: AtomicU32::new(0),
    });
    let c = Arc::new(C {
        gender: Mutex::new(String::new()),
    });
    let e = Arc::new(E {
        v: AtomicU32::new(25),
    });
    let b = Arc::new(B {
        a: Slot::new(),
        c: Slot::new(),
        helper: None,
        private: BPrivate { ext: Slot::new() },
        started: AtomicBool::new(false),
    });

    // B registered before some of its providers: the linker scans the
    // full set, so registration order of providers only decides ties.
    let mut container = Container::new();
    container.add(a.clone()).expect("registration failed");
    container.add(b.clone()).expect("registration failed");
    container.add(c.clone()).expect("registration failed");
    container.add(e.clone()).expect("registration failed");
    container.build_dependencies();

    assert!(b.a.is_bound());
    assert!(b.c.is_bound());
    assert!(b.private.ext.is_bound());
    assert!(b.helper.is_none());

    let token = CancellationToken::new();
    container.init_required(&token).await.expect("init pass failed");
    container.start_runners(&token).await.expect("start pass failed");

    assert!(b.started.load(Ordering::SeqCst));
    assert_eq!(b.describe(), "age=20, gender=f, value=202");

    // Wiring is by reference: provider mutations are immediately
    // visible through B's resolved slots.
    a.age.store(21, Ordering::SeqCst);
    e.v.store(99, Ordering::SeqCst);
    assert_eq!(b.describe(), "age=21, gender=f, value=99");
}
