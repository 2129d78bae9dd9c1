//! Per-test lifetime context
//!
//! A [`LifetimeContext`] stacks everything registered during a test and
//! releases it in reverse registration order when the test ends, either
//! through an explicit [`LifetimeContext::teardown`] or when the context is
//! dropped. Teardown always drains the whole stack; the first release failure
//! is reported afterwards as [`Error::TestTeardown`].

use crate::binding::{Erased, Parent};
use crate::registry::WrapperRegistry;
use crate::releasable::{LifetimeObject, ReleaseFn, Releasable};
use lifeguard_config::LifetimeConfig;
use lifeguard_core::{
    BoxError, Error, ReleaseMode, Result, TestName, DEFAULT_TEST_NAME_LENGTH,
};
use lifeguard_utils::tracing::teardown_span;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A release that panicked instead of returning an error
#[derive(Debug, thiserror::Error)]
#[error("release of {entry} panicked: {message}")]
pub struct ReleasePanic {
    pub entry: String,
    pub message: String,
}

/// One element of the release stack
enum ReleasableEntry {
    /// The resource released through its own capability
    Resource {
        resource: &'static str,
        handle: Arc<dyn Releasable>,
    },
    /// A guardian built around the resource
    Guardian {
        guardian: &'static str,
        resource: &'static str,
        handle: Box<dyn Releasable>,
    },
    /// A release closure registered with [`LifetimeContext::defer`]
    Deferred {
        description: String,
        handle: Box<dyn Releasable>,
    },
}

impl ReleasableEntry {
    fn release(&self) -> std::result::Result<(), BoxError> {
        match self {
            ReleasableEntry::Resource { handle, .. } => handle.release(),
            ReleasableEntry::Guardian { handle, .. } => handle.release(),
            ReleasableEntry::Deferred { handle, .. } => handle.release(),
        }
    }
}

impl fmt::Display for ReleasableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleasableEntry::Resource { resource, .. } => write!(f, "{resource}"),
            ReleasableEntry::Guardian {
                guardian, resource, ..
            } => write!(f, "{guardian} guarding {resource}"),
            ReleasableEntry::Deferred { description, .. } => write!(f, "deferred '{description}'"),
        }
    }
}

/// Tracks resources created during one test and releases them at its end
pub struct LifetimeContext {
    test_name: TestName,
    mode: ReleaseMode,
    entries: Vec<ReleasableEntry>,
    disposed: bool,
    strict_drop: bool,
    registry: Arc<WrapperRegistry>,
}

/// Builder for [`LifetimeContext`]
#[derive(Debug, Default)]
pub struct LifetimeContextBuilder {
    mode: Option<ReleaseMode>,
    name: Option<String>,
    registry: Option<Arc<WrapperRegistry>>,
    config: Option<LifetimeConfig>,
}

impl LifetimeContextBuilder {
    /// Release mode; defaults to the configuration's default mode
    pub fn mode(mut self, mode: ReleaseMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Test name; a blank or invalid name is replaced by a generated one
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Resolve guardians against `registry` instead of the global one
    pub fn registry(mut self, registry: Arc<WrapperRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Apply default mode, name length and drop behaviour from `config`
    pub fn config(mut self, config: LifetimeConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> LifetimeContext {
        let config = match self.config {
            Some(config) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "invalid lifetime configuration, using the default name length"
                    );
                    LifetimeConfig {
                        test_name_length: DEFAULT_TEST_NAME_LENGTH,
                        ..config
                    }
                }
            },
            None => LifetimeConfig::default(),
        };
        let mode = self.mode.unwrap_or(config.default_mode);

        let test_name = match self.name.map(TestName::new) {
            Some(Ok(name)) => name,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "using a generated test name");
                generated_name(&config)
            }
            None => generated_name(&config),
        };

        tracing::debug!(test_name = %test_name, mode = %mode, "lifetime context created");

        LifetimeContext {
            test_name,
            mode,
            entries: Vec::new(),
            disposed: false,
            strict_drop: config.strict_drop,
            registry: self.registry.unwrap_or_else(WrapperRegistry::global),
        }
    }
}

fn generated_name(config: &LifetimeConfig) -> TestName {
    TestName::new_unchecked(lifeguard_utils::random_identifier(config.test_name_length))
}

impl Default for LifetimeContext {
    fn default() -> Self {
        Self::new(ReleaseMode::Clean, None)
    }
}

impl LifetimeContext {
    /// Create a context using the global registry.
    ///
    /// Without a usable `name` a random identifier is generated.
    pub fn new(mode: ReleaseMode, name: Option<String>) -> Self {
        let builder = Self::builder().mode(mode);
        match name {
            Some(name) => builder.name(name).build(),
            None => builder.build(),
        }
    }

    pub fn builder() -> LifetimeContextBuilder {
        LifetimeContextBuilder::default()
    }

    /// Custom or generated name of the test
    pub fn test_name(&self) -> &str {
        self.test_name.as_str()
    }

    /// Selected release mode
    pub fn mode(&self) -> ReleaseMode {
        self.mode
    }

    /// Registry guardians are resolved against
    pub fn registry(&self) -> &Arc<WrapperRegistry> {
        &self.registry
    }

    /// Number of entries waiting for release
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Register `resource` for release at teardown and hand it back.
    ///
    /// A guardian bound to the resource's exact type takes precedence over
    /// the resource's own release capability. Under
    /// [`ReleaseMode::LeaveDirty`] nothing is tracked.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidLifetimeObject`] when the resource is absent, when the
    /// guardian has no construction form for the given parent, or when the
    /// type has neither a guardian nor its own release capability.
    /// [`Error::ContextDisposed`] after teardown.
    pub fn register<T: LifetimeObject>(
        &mut self,
        resource: Option<Arc<T>>,
        parent: Option<Parent>,
    ) -> Result<Arc<T>> {
        let resource = resource.ok_or_else(|| {
            Error::invalid_lifetime_object(format!(
                "no {} was supplied for registration",
                type_name::<T>()
            ))
        })?;

        if self.disposed {
            return Err(Error::context_disposed(self.test_name.as_str()));
        }

        if !self.mode.tracks_resources() {
            tracing::trace!(
                test_name = %self.test_name,
                resource = type_name::<T>(),
                "leave-dirty mode, resource not tracked"
            );
            return Ok(resource);
        }

        let entry = self.entry_for(&resource, parent.as_ref())?;
        tracing::debug!(test_name = %self.test_name, entry = %entry, "lifetime object registered");
        self.entries.push(entry);

        Ok(resource)
    }

    /// Move `value` into an `Arc` and register it
    pub fn track<T: LifetimeObject>(&mut self, value: T) -> Result<Arc<T>> {
        self.register(Some(Arc::new(value)), None)
    }

    /// Move `value` into an `Arc` and register it under `parent`
    pub fn track_with<T, P>(&mut self, value: T, parent: Arc<P>) -> Result<Arc<T>>
    where
        T: LifetimeObject,
        P: Any + Send + Sync,
    {
        self.register(Some(Arc::new(value)), Some(Parent::new(parent)))
    }

    /// Run `release` at teardown, in stack order with registered resources
    pub fn defer<F>(&mut self, description: impl Into<String>, release: F) -> Result<()>
    where
        F: FnOnce() -> std::result::Result<(), BoxError> + Send + 'static,
    {
        if self.disposed {
            return Err(Error::context_disposed(self.test_name.as_str()));
        }

        if self.mode.tracks_resources() {
            let entry = ReleasableEntry::Deferred {
                description: description.into(),
                handle: Box::new(ReleaseFn::new(release)),
            };
            tracing::debug!(test_name = %self.test_name, entry = %entry, "release deferred");
            self.entries.push(entry);
        }

        Ok(())
    }

    fn entry_for<T: LifetimeObject>(
        &self,
        resource: &Arc<T>,
        parent: Option<&Parent>,
    ) -> Result<ReleasableEntry> {
        let resource_name = type_name::<T>();

        if let Some(binding) = self.registry.resolve(TypeId::of::<T>(), resource_name) {
            let erased: Erased = Arc::clone(resource) as Erased;
            let handle = binding.construct(erased, parent)?;
            return Ok(ReleasableEntry::Guardian {
                guardian: binding.guardian_name(),
                resource: resource_name,
                handle,
            });
        }

        match Arc::clone(resource).as_releasable() {
            Some(handle) => {
                if let Some(parent) = parent {
                    tracing::debug!(
                        resource = resource_name,
                        parent = parent.type_name(),
                        "parent ignored for a self-releasing resource"
                    );
                }
                Ok(ReleasableEntry::Resource {
                    resource: resource_name,
                    handle,
                })
            }
            None => Err(Error::invalid_lifetime_object(format!(
                "type {resource_name} neither has a dedicated lifetime guardian nor is releasable itself"
            ))),
        }
    }

    /// Release every tracked entry, most recently registered first.
    ///
    /// The context is disposed afterwards whatever the outcome; calling this
    /// again is a no-op.
    ///
    /// # Errors
    ///
    /// [`Error::TestTeardown`] carrying the first failure, returned only
    /// after every other entry was attempted.
    pub fn teardown(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;

        let span = teardown_span(self.test_name.as_str(), self.entries.len());
        let _enter = span.enter();

        let mut first_failure: Option<BoxError> = None;
        let mut failures = 0usize;

        while let Some(entry) = self.entries.pop() {
            match release_entry(&entry) {
                Ok(()) => tracing::debug!(entry = %entry, "released"),
                Err(e) => {
                    failures += 1;
                    tracing::warn!(
                        test_name = %self.test_name,
                        entry = %entry,
                        error = %e,
                        remaining = self.entries.len(),
                        "release failed"
                    );
                    first_failure.get_or_insert(e);
                }
            }
        }

        match first_failure {
            Some(source) => Err(Error::test_teardown(
                self.test_name.as_str(),
                failures,
                source,
            )),
            None => Ok(()),
        }
    }

    /// Run `body` with this context, then tear it down.
    ///
    /// Teardown also happens, through `Drop`, when `body` unwinds.
    pub fn scope<T, F>(mut self, body: F) -> Result<T>
    where
        F: FnOnce(&mut LifetimeContext) -> T,
    {
        let value = body(&mut self);
        self.teardown()?;
        Ok(value)
    }
}

/// Run `body` inside a fresh context with a generated name
pub fn with_lifetime_context<T, F>(mode: ReleaseMode, body: F) -> Result<T>
where
    F: FnOnce(&mut LifetimeContext) -> T,
{
    LifetimeContext::new(mode, None).scope(body)
}

fn release_entry(entry: &ReleasableEntry) -> std::result::Result<(), BoxError> {
    match panic::catch_unwind(AssertUnwindSafe(|| entry.release())) {
        Ok(result) => result,
        Err(payload) => Err(Box::new(ReleasePanic {
            entry: entry.to_string(),
            message: panic_message(payload.as_ref()),
        })),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl Drop for LifetimeContext {
    fn drop(&mut self) {
        if self.disposed {
            return;
        }

        if let Err(e) = self.teardown() {
            if std::thread::panicking() || !self.strict_drop {
                tracing::error!(
                    test_name = %self.test_name,
                    error = %e,
                    "teardown failed while dropping lifetime context"
                );
            } else {
                panic!("{e}");
            }
        }
    }
}

impl fmt::Debug for LifetimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifetimeContext")
            .field("test_name", &self.test_name.as_str())
            .field("mode", &self.mode)
            .field(
                "entries",
                &self.entries.iter().map(ToString::to_string).collect::<Vec<_>>(),
            )
            .field("disposed", &self.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{Construction, LifetimeGuardian};
    use crate::registry::GuardianCatalog;
    use lifeguard_config::LifetimeConfig;
    use parking_lot::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Resource releasing itself and recording the release in a shared log
    #[derive(Debug)]
    struct Handle {
        name: &'static str,
        log: Log,
        fail: bool,
    }

    impl Handle {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Arc::clone(log),
                fail: false,
            }
        }

        fn failing(name: &'static str, log: &Log) -> Self {
            Self {
                fail: true,
                ..Self::new(name, log)
            }
        }
    }

    impl Releasable for Handle {
        fn release(&self) -> std::result::Result<(), BoxError> {
            self.log.lock().push(self.name.to_string());
            if self.fail {
                Err(format!("{} refused to close", self.name).into())
            } else {
                Ok(())
            }
        }
    }

    impl LifetimeObject for Handle {
        fn as_releasable(self: Arc<Self>) -> Option<Arc<dyn Releasable>> {
            Some(self)
        }
    }

    /// Resource without its own release capability
    #[derive(Debug)]
    struct Widget {
        log: Log,
    }

    impl LifetimeObject for Widget {}

    struct Gadget;

    struct WidgetGuard {
        widget: Arc<Widget>,
        parented: bool,
    }

    impl Releasable for WidgetGuard {
        fn release(&self) -> std::result::Result<(), BoxError> {
            let entry = if self.parented { "widget+parent" } else { "widget" };
            self.widget.log.lock().push(entry.to_string());
            Ok(())
        }
    }

    impl LifetimeGuardian for WidgetGuard {
        type Guarded = Widget;

        fn construction() -> Construction<Self> {
            Construction::with_parent::<Gadget>(|widget, _parent| WidgetGuard {
                widget,
                parented: true,
            })
        }
    }

    /// Self-releasing type that also has a guardian; the guardian wins
    struct Doubled {
        log: Log,
    }

    impl Releasable for Doubled {
        fn release(&self) -> std::result::Result<(), BoxError> {
            self.log.lock().push("doubled itself".to_string());
            Ok(())
        }
    }

    impl LifetimeObject for Doubled {
        fn as_releasable(self: Arc<Self>) -> Option<Arc<dyn Releasable>> {
            Some(self)
        }
    }

    struct DoubledGuard(Arc<Doubled>);

    impl Releasable for DoubledGuard {
        fn release(&self) -> std::result::Result<(), BoxError> {
            self.0.log.lock().push("doubled guardian".to_string());
            Ok(())
        }
    }

    impl LifetimeGuardian for DoubledGuard {
        type Guarded = Doubled;

        fn construction() -> Construction<Self> {
            Construction::standalone(DoubledGuard)
        }
    }

    #[derive(Debug)]
    struct Panicky;

    impl Releasable for Panicky {
        fn release(&self) -> std::result::Result<(), BoxError> {
            panic!("release blew up")
        }
    }

    impl LifetimeObject for Panicky {
        fn as_releasable(self: Arc<Self>) -> Option<Arc<dyn Releasable>> {
            Some(self)
        }
    }

    fn registry() -> Arc<WrapperRegistry> {
        let registry = WrapperRegistry::new();
        registry.submit(
            GuardianCatalog::new(module_path!())
                .guardian::<WidgetGuard>()
                .guardian::<DoubledGuard>(),
        );
        Arc::new(registry)
    }

    fn context(mode: ReleaseMode) -> LifetimeContext {
        LifetimeContext::builder()
            .mode(mode)
            .name("context_unit_test")
            .registry(registry())
            .build()
    }

    fn log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn test_releases_in_reverse_order() {
        let log = log();
        let mut ctx = context(ReleaseMode::Clean);

        for name in ["a", "b", "c"] {
            ctx.track(Handle::new(name, &log)).unwrap();
        }
        assert_eq!(ctx.len(), 3);

        ctx.teardown().unwrap();
        assert_eq!(*log.lock(), vec!["c", "b", "a"]);
        assert!(ctx.is_empty());
        assert!(ctx.is_disposed());
    }

    #[test]
    fn test_register_returns_same_resource() {
        let log = log();
        let mut ctx = context(ReleaseMode::Clean);
        let handle = Arc::new(Handle::new("a", &log));

        let returned = ctx.register(Some(Arc::clone(&handle)), None).unwrap();
        assert!(Arc::ptr_eq(&handle, &returned));
    }

    #[test]
    fn test_leave_dirty_never_releases() {
        let log = log();
        let mut ctx = context(ReleaseMode::LeaveDirty);

        ctx.track(Handle::new("a", &log)).unwrap();
        ctx.track(Widget { log: Arc::clone(&log) }).unwrap();
        ctx.defer("closure", || panic!("must not run")).unwrap();
        assert!(ctx.is_empty());

        ctx.teardown().unwrap();
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_absent_resource_is_rejected_in_any_mode() {
        for mode in [ReleaseMode::Clean, ReleaseMode::LeaveDirty] {
            let mut ctx = context(mode);
            let err = ctx.register::<Handle>(None, None).unwrap_err();
            assert!(matches!(err, Error::InvalidLifetimeObject { .. }));
        }
    }

    #[test]
    fn test_type_without_release_capability_is_rejected() {
        #[derive(Debug)]
        struct Opaque;
        impl LifetimeObject for Opaque {}

        let mut ctx = context(ReleaseMode::Clean);
        let err = ctx.track(Opaque).unwrap_err();
        assert!(err
            .to_string()
            .contains("neither has a dedicated lifetime guardian nor is releasable itself"));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_guardian_with_parent_form() {
        let log = log();
        let mut ctx = context(ReleaseMode::Clean);

        let err = ctx.track(Widget { log: Arc::clone(&log) }).unwrap_err();
        assert!(matches!(err, Error::InvalidLifetimeObject { .. }));
        assert!(err.to_string().contains("WidgetGuard"));
        assert!(err.to_string().contains("Widget"));
        assert!(ctx.is_empty());

        ctx.track_with(Widget { log: Arc::clone(&log) }, Arc::new(Gadget))
            .unwrap();
        assert_eq!(ctx.len(), 1);

        ctx.teardown().unwrap();
        assert_eq!(*log.lock(), vec!["widget+parent"]);
    }

    #[test]
    fn test_wrong_parent_type_is_rejected() {
        let log = log();
        let mut ctx = context(ReleaseMode::Clean);

        let err = ctx
            .track_with(Widget { log: Arc::clone(&log) }, Arc::new("not a gadget"))
            .unwrap_err();
        assert!(err.to_string().contains("expects a parent of type"));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_guardian_takes_precedence_over_own_release() {
        let log = log();
        let mut ctx = context(ReleaseMode::Clean);

        ctx.track(Doubled { log: Arc::clone(&log) }).unwrap();
        ctx.teardown().unwrap();
        assert_eq!(*log.lock(), vec!["doubled guardian"]);
    }

    #[test]
    fn test_teardown_drains_everything_and_reports_first_failure() {
        let log = log();
        let mut ctx = context(ReleaseMode::Clean);

        ctx.track(Handle::new("a", &log)).unwrap();
        ctx.track(Handle::failing("b", &log)).unwrap();
        ctx.track(Handle::new("c", &log)).unwrap();
        ctx.track(Handle::failing("d", &log)).unwrap();

        let err = ctx.teardown().unwrap_err();
        assert_eq!(*log.lock(), vec!["d", "c", "b", "a"]);

        match err {
            Error::TestTeardown {
                test_name,
                failures,
                source,
            } => {
                assert_eq!(test_name, "context_unit_test");
                assert_eq!(failures, 2);
                assert_eq!(source.to_string(), "d refused to close");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let log = log();
        let mut ctx = context(ReleaseMode::Clean);
        ctx.track(Handle::failing("a", &log)).unwrap();

        assert!(ctx.teardown().is_err());
        assert!(ctx.teardown().is_ok());
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_register_after_teardown_fails() {
        let log = log();
        let mut ctx = context(ReleaseMode::Clean);
        ctx.teardown().unwrap();

        let err = ctx.track(Handle::new("late", &log)).unwrap_err();
        assert!(matches!(err, Error::ContextDisposed { .. }));
        assert!(ctx.defer("late", || Ok(())).is_err());
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_panicking_release_is_captured() {
        let log = log();
        let mut ctx = context(ReleaseMode::Clean);

        ctx.track(Handle::new("before", &log)).unwrap();
        ctx.track(Panicky).unwrap();

        let err = ctx.teardown().unwrap_err();
        assert!(err.to_string().contains("release blew up"));
        assert_eq!(*log.lock(), vec!["before"]);
    }

    #[test]
    fn test_deferred_release_runs_in_stack_order() {
        let log = log();
        let mut ctx = context(ReleaseMode::Clean);

        ctx.track(Handle::new("first", &log)).unwrap();
        let deferred_log = Arc::clone(&log);
        ctx.defer("second", move || {
            deferred_log.lock().push("second".to_string());
            Ok(())
        })
        .unwrap();

        ctx.teardown().unwrap();
        assert_eq!(*log.lock(), vec!["second", "first"]);
    }

    #[test]
    fn test_drop_tears_down() {
        let log = log();
        {
            let mut ctx = context(ReleaseMode::Clean);
            ctx.track(Handle::new("a", &log)).unwrap();
            ctx.track(Handle::new("b", &log)).unwrap();
        }
        assert_eq!(*log.lock(), vec!["b", "a"]);
    }

    #[test]
    #[should_panic(expected = "teardown of test 'context_unit_test' failed")]
    fn test_drop_panics_on_failure_when_strict() {
        let log = log();
        let mut ctx = context(ReleaseMode::Clean);
        ctx.track(Handle::failing("a", &log)).unwrap();
        drop(ctx);
    }

    #[test]
    fn test_drop_only_logs_when_not_strict() {
        let log = log();
        let mut ctx = LifetimeContext::builder()
            .registry(registry())
            .config(LifetimeConfig::default().with_strict_drop(false))
            .build();
        ctx.track(Handle::failing("a", &log)).unwrap();
        drop(ctx);
        assert_eq!(*log.lock(), vec!["a"]);
    }

    #[test]
    fn test_unwinding_body_still_releases() {
        let log = log();
        let ctx = context(ReleaseMode::Clean);
        let body_log = Arc::clone(&log);

        let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
            ctx.scope(|ctx| {
                ctx.track(Handle::new("a", &body_log)).unwrap();
                panic!("test body failed");
            })
        }));

        assert!(outcome.is_err());
        assert_eq!(*log.lock(), vec!["a"]);
    }

    #[test]
    fn test_scope_returns_body_value() {
        let log = log();
        let value = context(ReleaseMode::Clean)
            .scope(|ctx| {
                ctx.track(Handle::new("a", &log)).unwrap();
                42
            })
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(*log.lock(), vec!["a"]);
    }

    #[test]
    fn test_generated_name() {
        let ctx = LifetimeContext::builder()
            .name("   ")
            .registry(registry())
            .build();
        assert_eq!(ctx.test_name().len(), 20);
        assert_eq!(ctx.mode(), ReleaseMode::Clean);

        let short = LifetimeContext::builder()
            .registry(registry())
            .config(LifetimeConfig::default().with_test_name_length(6))
            .build();
        assert_eq!(short.test_name().len(), 6);
    }

    #[test]
    fn test_out_of_range_name_length_falls_back_to_default() {
        for length in [0, 10_000] {
            let ctx = LifetimeContext::builder()
                .registry(registry())
                .config(LifetimeConfig::default().with_test_name_length(length))
                .build();
            assert_eq!(ctx.test_name().len(), DEFAULT_TEST_NAME_LENGTH);
            assert!(TestName::new(ctx.test_name()).is_ok());
        }
    }

    #[test]
    fn test_config_default_mode_applies_unless_overridden() {
        let config = LifetimeConfig::default().with_default_mode(ReleaseMode::LeaveDirty);

        let ctx = LifetimeContext::builder()
            .registry(registry())
            .config(config.clone())
            .build();
        assert_eq!(ctx.mode(), ReleaseMode::LeaveDirty);

        let ctx = LifetimeContext::builder()
            .registry(registry())
            .config(config)
            .mode(ReleaseMode::Clean)
            .build();
        assert_eq!(ctx.mode(), ReleaseMode::Clean);
    }
}
