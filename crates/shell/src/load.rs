//! Per-view load state.

use std::future::Future;

/// Lifecycle of one view's backend resource.
///
/// Each view owns its own state; the last completed request wins.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    /// Generic inline message suitable for display.
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn begin(&mut self) {
        *self = LoadState::Loading;
    }

    /// Record a completed request. Errors are logged with detail and replaced
    /// by a generic message for the view.
    pub fn finish<E: core::fmt::Display>(&mut self, resource: &str, result: Result<T, E>) {
        *self = match result {
            Ok(value) => LoadState::Loaded(value),
            Err(err) => {
                tracing::error!(%resource, error = %err, "failed to load resource");
                LoadState::Failed(failure_message(resource))
            }
        };
    }

    /// Like [`finish`](Self::finish), but shows `fallback` data instead of an
    /// error message when the request fails.
    pub fn finish_or_else<E: core::fmt::Display>(
        &mut self,
        resource: &str,
        result: Result<T, E>,
        fallback: impl FnOnce() -> T,
    ) {
        *self = match result {
            Ok(value) => LoadState::Loaded(value),
            Err(err) => {
                tracing::warn!(%resource, error = %err, "failed to load resource; showing fallback data");
                LoadState::Loaded(fallback())
            }
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Drive `request` to completion, moving `state` through `Loading`.
pub async fn load_into<T, E, F>(state: &mut LoadState<T>, resource: &str, request: F)
where
    E: core::fmt::Display,
    F: Future<Output = Result<T, E>>,
{
    state.begin();
    let result = request.await;
    state.finish(resource, result);
}

pub fn failure_message(resource: &str) -> String {
    format!("Unable to load {resource}. Please try again.")
}
