//! Interceptor chains.
//!
//! # Responsibilities
//! - Hold ordered request / response stages
//! - Hand out handles so stages can be removed later
//! - Fold a value or error through the stages
//!
//! # Fold Semantics
//! ```text
//! response chain:  Ok(v)  → stage.on_fulfilled(v)
//!                  Err(e) → stage.on_rejected(e)      (may recover)
//!
//! request chain:   same, except a stage's on_fulfilled rejection skips
//!                  every remaining request stage
//! ```
//!
//! # Design Decisions
//! - Registration order is execution order on both chains
//! - Stages of one call run strictly one after another
//! - Chains are only mutated through `&mut`, so they are read-only while
//!   requests are in flight

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;

use crate::http::error::HttpError;

/// A pipeline stage.
pub trait Interceptor<T: Send + 'static>: Send + Sync {
    /// Called with the previous stage's value.
    fn on_fulfilled(&self, value: T) -> BoxFuture<'_, Result<T, HttpError>>;

    /// Called with the previous stage's rejection. Rejects again by default.
    fn on_rejected(&self, error: HttpError) -> BoxFuture<'_, Result<T, HttpError>> {
        future::ready(Err(error)).boxed()
    }
}

/// Identifies a registered stage for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterceptorHandle(u64);

/// Ordered sequence of stages.
pub struct InterceptorChain<T: Send + 'static> {
    stages: Vec<(InterceptorHandle, Arc<dyn Interceptor<T>>)>,
    next_id: u64,
}

impl<T: Send + 'static> InterceptorChain<T> {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            next_id: 0,
        }
    }

    /// Append a stage. It runs after every stage registered before it.
    pub fn add<I>(&mut self, interceptor: I) -> InterceptorHandle
    where
        I: Interceptor<T> + 'static,
    {
        let handle = InterceptorHandle(self.next_id);
        self.next_id += 1;
        self.stages.push((handle, Arc::new(interceptor)));
        handle
    }

    /// Remove a stage. Returns false if the handle is unknown.
    pub fn eject(&mut self, handle: InterceptorHandle) -> bool {
        let before = self.stages.len();
        self.stages.retain(|(h, _)| *h != handle);
        self.stages.len() != before
    }

    pub fn clear(&mut self) {
        self.stages.clear();
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Fold with response-chain semantics.
    pub async fn fold(&self, mut state: Result<T, HttpError>) -> Result<T, HttpError> {
        for (_, stage) in &self.stages {
            state = match state {
                Ok(value) => stage.on_fulfilled(value).await,
                Err(error) => stage.on_rejected(error).await,
            };
        }
        state
    }

    /// Fold with request-chain semantics.
    ///
    /// An incoming rejection is offered to each stage's `on_rejected`; a
    /// rejection produced by `on_fulfilled` ends the fold immediately.
    pub async fn fold_short_circuit(&self, mut state: Result<T, HttpError>) -> Result<T, HttpError> {
        for (_, stage) in &self.stages {
            state = match state {
                Ok(value) => Ok(stage.on_fulfilled(value).await?),
                Err(error) => stage.on_rejected(error).await,
            };
        }
        state
    }
}

impl<T: Send + 'static> Default for InterceptorChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> fmt::Debug for InterceptorChain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("stages", &self.stages.len())
            .finish()
    }
}

/// Stage built from an `on_fulfilled` / `on_rejected` closure pair.
pub struct FnInterceptor<F, R> {
    on_fulfilled: F,
    on_rejected: R,
}

/// Build a stage from two async closures.
pub fn from_fn<F, R>(on_fulfilled: F, on_rejected: R) -> FnInterceptor<F, R> {
    FnInterceptor {
        on_fulfilled,
        on_rejected,
    }
}

impl<T, F, FutF, R, FutR> Interceptor<T> for FnInterceptor<F, R>
where
    T: Send + 'static,
    F: Fn(T) -> FutF + Send + Sync,
    FutF: Future<Output = Result<T, HttpError>> + Send + 'static,
    R: Fn(HttpError) -> FutR + Send + Sync,
    FutR: Future<Output = Result<T, HttpError>> + Send + 'static,
{
    fn on_fulfilled(&self, value: T) -> BoxFuture<'_, Result<T, HttpError>> {
        (self.on_fulfilled)(value).boxed()
    }

    fn on_rejected(&self, error: HttpError) -> BoxFuture<'_, Result<T, HttpError>> {
        (self.on_rejected)(error).boxed()
    }
}

/// Stage that only transforms values; rejections pass through.
pub struct Map<F>(F);

pub fn map<F>(f: F) -> Map<F> {
    Map(f)
}

impl<T, F, Fut> Interceptor<T> for Map<F>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, HttpError>> + Send + 'static,
{
    fn on_fulfilled(&self, value: T) -> BoxFuture<'_, Result<T, HttpError>> {
        (self.0)(value).boxed()
    }
}

/// Stage that only handles rejections; values pass through.
pub struct Recover<R>(R);

pub fn recover<R>(f: R) -> Recover<R> {
    Recover(f)
}

impl<T, R, Fut> Interceptor<T> for Recover<R>
where
    T: Send + 'static,
    R: Fn(HttpError) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, HttpError>> + Send + 'static,
{
    fn on_fulfilled(&self, value: T) -> BoxFuture<'_, Result<T, HttpError>> {
        future::ready(Ok(value)).boxed()
    }

    fn on_rejected(&self, error: HttpError) -> BoxFuture<'_, Result<T, HttpError>> {
        (self.0)(error).boxed()
    }
}

/// Stage that returns values unchanged and rejects errors unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl<T: Send + 'static> Interceptor<T> for PassThrough {
    fn on_fulfilled(&self, value: T) -> BoxFuture<'_, Result<T, HttpError>> {
        future::ready(Ok(value)).boxed()
    }
}
