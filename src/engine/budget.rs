//! Error budget bookkeeping
//!
//! A root validation call owns one [`ValidationState`]: the global error
//! counter and limit plus the optional restore hook. It is passed by `&mut`
//! through every recursive call, so nested scopes advance the same counter.
//! Each object or array level keeps its own [`LocalBudget`], reset at the
//! boundary.

/// Caller-supplied hook run before every validator invocation and every
/// array item re-validation. It may borrow caller state for `'h`.
pub type RestoreHook<'h> = dyn Fn() + Send + Sync + 'h;

/// Running state of one root validation call
pub struct ValidationState<'h> {
    global_count: usize,
    global_limit: Option<usize>,
    restore: Option<&'h RestoreHook<'h>>,
}

/// Snapshot of the global counter taken before descending into a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

impl<'h> ValidationState<'h> {
    pub fn new() -> Self {
        Self {
            global_count: 0,
            global_limit: None,
            restore: None,
        }
    }

    /// State whose validators are preceded by `hook`
    pub fn with_restore_hook(hook: &'h RestoreHook<'h>) -> Self {
        Self {
            restore: Some(hook),
            ..Self::new()
        }
    }

    /// Fix the global limit up front instead of taking it from the root scope
    pub fn with_global_limit(mut self, limit: usize) -> Self {
        self.global_limit = Some(limit);
        self
    }

    /// Run the restore hook, if any
    pub fn restore(&self) {
        if let Some(hook) = self.restore {
            hook();
        }
    }

    pub fn global_count(&self) -> usize {
        self.global_count
    }

    pub fn global_limit(&self) -> Option<usize> {
        self.global_limit
    }

    /// First entry sets the limit; nested scopes never overwrite it
    pub(crate) fn establish_global_limit(&mut self, limit: usize) {
        if self.global_limit.is_none() {
            self.global_limit = Some(limit);
        }
    }

    pub(crate) fn mark(&self) -> Mark {
        Mark(self.global_count)
    }

    /// Count one failure unless a nested scope already counted its leaves
    /// since `mark`
    pub(crate) fn record_since(&mut self, mark: Mark) {
        if self.global_count == mark.0 {
            self.global_count += 1;
        }
    }

    pub fn global_exhausted(&self) -> bool {
        self.global_limit
            .is_some_and(|limit| self.global_count >= limit)
    }
}

impl Default for ValidationState<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValidationState<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationState")
            .field("global_count", &self.global_count)
            .field("global_limit", &self.global_limit)
            .field("restore", &self.restore.is_some())
            .finish()
    }
}

/// Error counter of one object or array level
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocalBudget {
    count: usize,
    limit: usize,
}

impl LocalBudget {
    pub(crate) fn new(limit: usize) -> Self {
        Self { count: 0, limit }
    }

    pub(crate) fn record(&mut self) {
        self.count += 1;
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.count >= self.limit
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }
}
