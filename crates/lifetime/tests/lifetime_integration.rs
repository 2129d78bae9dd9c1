use lifeguard_config::LifetimeConfig;
use lifeguard_core::{BoxError, Error, ReleaseMode};
use lifeguard_lifetime::{
    guardian_catalog, with_lifetime_context, Construction, HoldLifetime, LifetimeContext,
    LifetimeGuardian, LifetimeObject, Releasable, WrapperRegistry,
};
use parking_lot::Mutex;
use proptest::prelude::*;
use serial_test::serial;
use std::sync::{Arc, Once};

static INSTALL: Once = Once::new();

fn install() {
    INSTALL.call_once(|| {
        lifeguard_utils::tracing::init_for_tests();
        assert!(WrapperRegistry::global().submit(guardian_catalog![WidgetGuard, LockGuard]));
    });
}

type Journal = Arc<Mutex<Vec<String>>>;

fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

/// Guarded resource that cannot release itself
#[derive(Debug)]
struct Widget {
    id: usize,
    journal: Journal,
}

impl LifetimeObject for Widget {}

/// Owner handed to the parent form of [`WidgetGuard`]
struct Factory {
    name: &'static str,
}

struct WidgetGuard {
    widget: Arc<Widget>,
    factory: Option<Arc<Factory>>,
}

impl Releasable for WidgetGuard {
    fn release(&self) -> Result<(), BoxError> {
        let entry = match &self.factory {
            Some(factory) => format!("widget {} via {}", self.widget.id, factory.name),
            None => format!("widget {}", self.widget.id),
        };
        self.widget.journal.lock().push(entry);
        Ok(())
    }
}

impl LifetimeGuardian for WidgetGuard {
    type Guarded = Widget;

    fn construction() -> Construction<Self> {
        Construction::either::<Factory>(
            |widget| WidgetGuard {
                widget,
                factory: None,
            },
            |widget, factory| WidgetGuard {
                widget,
                factory: Some(factory),
            },
        )
    }
}

/// Resource whose guardian only accepts a parent
#[derive(Debug)]
struct Lock {
    journal: Journal,
}

impl LifetimeObject for Lock {}

struct LockGuard(Arc<Lock>);

impl Releasable for LockGuard {
    fn release(&self) -> Result<(), BoxError> {
        self.0.journal.lock().push("lock".to_string());
        Ok(())
    }
}

impl LifetimeGuardian for LockGuard {
    type Guarded = Lock;

    fn construction() -> Construction<Self> {
        Construction::with_parent::<Factory>(|lock, _factory| LockGuard(lock))
    }
}

/// Resource releasing itself
#[derive(Debug)]
struct Session {
    id: usize,
    journal: Journal,
}

impl Releasable for Session {
    fn release(&self) -> Result<(), BoxError> {
        self.journal.lock().push(format!("session {}", self.id));
        Ok(())
    }
}

impl LifetimeObject for Session {
    fn as_releasable(self: Arc<Self>) -> Option<Arc<dyn Releasable>> {
        Some(self)
    }
}

#[test]
fn test_global_registry_resolves_guardians_of_this_crate() {
    install();
    let registry = WrapperRegistry::global();

    assert!(registry.resolve_for::<Widget>().is_some());
    assert!(registry.resolve_for::<Lock>().is_some());
    assert!(registry.resolve_for::<Session>().is_none());
    assert!(registry.is_populated());
}

#[test]
fn test_mixed_resources_release_in_reverse_order() {
    install();
    let journal = journal();
    let factory = Arc::new(Factory { name: "assembly" });

    let mut ctx = LifetimeContext::new(ReleaseMode::Clean, Some("mixed".to_string()));
    ctx.track(Widget {
        id: 1,
        journal: Arc::clone(&journal),
    })
    .unwrap();
    Arc::new(Session {
        id: 2,
        journal: Arc::clone(&journal),
    })
    .hold_lifetime(&mut ctx)
    .unwrap();
    ctx.track_with(
        Widget {
            id: 3,
            journal: Arc::clone(&journal),
        },
        Arc::clone(&factory),
    )
    .unwrap();
    Arc::new(Lock {
        journal: Arc::clone(&journal),
    })
    .hold_lifetime_with(&mut ctx, factory)
    .unwrap();

    ctx.teardown().unwrap();
    assert_eq!(
        *journal.lock(),
        vec!["lock", "widget 3 via assembly", "session 2", "widget 1"]
    );
}

#[test]
fn test_parent_only_guardian_without_parent() {
    install();
    let journal = journal();
    let mut ctx = LifetimeContext::new(ReleaseMode::Clean, Some("parentless".to_string()));

    let err = ctx.track(Lock { journal }).unwrap_err();
    assert!(matches!(err, Error::InvalidLifetimeObject { .. }));
    assert!(err.to_string().contains("requires a parent of type"));
    assert!(ctx.is_empty());
}

#[test]
fn test_leave_dirty_keeps_resources() {
    install();
    let journal = journal();

    let value = with_lifetime_context(ReleaseMode::LeaveDirty, |ctx| {
        ctx.track(Widget {
            id: 1,
            journal: Arc::clone(&journal),
        })
        .unwrap();
        ctx.len()
    })
    .unwrap();

    assert_eq!(value, 0);
    assert!(journal.lock().is_empty());
}

#[test]
fn test_teardown_failure_names_the_test() {
    install();
    let journal = journal();

    let result = LifetimeContext::new(ReleaseMode::Clean, Some("flaky_cleanup".to_string()))
        .scope(|ctx| {
            ctx.defer("broken socket", || Err("connection reset".into()))
                .unwrap();
            ctx.track(Session {
                id: 7,
                journal: Arc::clone(&journal),
            })
            .unwrap();
        });

    let err = result.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("flaky_cleanup"));
    assert!(message.contains("connection reset"));
    assert_eq!(*journal.lock(), vec!["session 7"]);
}

#[test]
#[serial]
fn test_context_from_environment_config() {
    install();
    std::env::set_var("LIFEGUARD_MODE", "leave-dirty");
    std::env::set_var("LIFEGUARD_TEST_NAME_LENGTH", "12");
    let config = LifetimeConfig::from_env();
    std::env::remove_var("LIFEGUARD_MODE");
    std::env::remove_var("LIFEGUARD_TEST_NAME_LENGTH");

    let ctx = LifetimeContext::builder().config(config.unwrap()).build();
    assert_eq!(ctx.mode(), ReleaseMode::LeaveDirty);
    assert_eq!(ctx.test_name().len(), 12);
}

proptest! {
    #[test]
    fn prop_release_order_is_reverse_of_registration(count in 0usize..24) {
        install();
        let journal = journal();
        let mut ctx = LifetimeContext::new(ReleaseMode::Clean, None);

        for id in 0..count {
            if id % 2 == 0 {
                ctx.track(Session { id, journal: Arc::clone(&journal) }).unwrap();
            } else {
                ctx.track(Widget { id, journal: Arc::clone(&journal) }).unwrap();
            }
        }
        prop_assert_eq!(ctx.len(), count);
        ctx.teardown().unwrap();

        let expected: Vec<String> = (0..count)
            .rev()
            .map(|id| if id % 2 == 0 { format!("session {id}") } else { format!("widget {id}") })
            .collect();
        prop_assert_eq!(&*journal.lock(), &expected);
    }
}
