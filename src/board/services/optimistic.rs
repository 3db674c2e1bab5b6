//! Optimistic update helper: mutate now, commit later, restore on failure.

use std::future::Future;

/// Deep copy of state captured right before an optimistic mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<S>(S);

impl<S: Clone> Snapshot<S> {
    /// Captures a copy of `state`.
    #[must_use]
    pub fn capture(state: &S) -> Self {
        Self(state.clone())
    }
}

impl<S> Snapshot<S> {
    /// Returns the captured state.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.0
    }

    /// Overwrites `target` with the captured state.
    pub fn restore_into(self, target: &mut S) {
        *target = self.0;
    }
}

/// A mutation that has been applied locally and awaits its commit.
#[must_use = "the commit does nothing until settled"]
pub struct OptimisticUpdate<S, F> {
    snapshot: Snapshot<S>,
    commit: F,
}

/// Applies `mutate` to `state` and prepares the commit.
///
/// The snapshot is taken before `mutate` runs. `commit` receives the mutated
/// state and builds the future that persists the change; it is not polled
/// until [`OptimisticUpdate::settle`] is awaited.
pub fn with_optimistic_update<S, F>(
    state: &mut S,
    mutate: impl FnOnce(&mut S),
    commit: impl FnOnce(&S) -> F,
) -> OptimisticUpdate<S, F>
where
    S: Clone,
{
    let snapshot = Snapshot::capture(state);
    mutate(state);
    let pending = commit(state);
    OptimisticUpdate {
        snapshot,
        commit: pending,
    }
}

impl<S, F, T, E> OptimisticUpdate<S, F>
where
    F: Future<Output = Result<T, E>>,
{
    /// Awaits the commit. On failure, hands the snapshot to `compensate`
    /// before returning the error; on success the snapshot is discarded.
    ///
    /// # Errors
    ///
    /// Returns the commit's error after compensation has run.
    pub async fn settle(self, compensate: impl FnOnce(Snapshot<S>, &E)) -> Result<T, E> {
        let Self { snapshot, commit } = self;
        match commit.await {
            Ok(value) => Ok(value),
            Err(err) => {
                compensate(snapshot, &err);
                Err(err)
            }
        }
    }
}
