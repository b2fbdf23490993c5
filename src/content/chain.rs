//! Ordered fallback chains.
//!
//! A chain holds source attempts in priority order and walks them once per
//! resolution: the first success wins, every failure is logged and skipped.
//! [`GuaranteedChain`] ends in a [`TerminalSource`], an in-memory pick that
//! cannot fail, so resolving it always yields content.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Boxed future returned by a source attempt.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>;

/// A remote (fallible) content source.
pub trait ContentSource<R, T>: Send + Sync {
    /// Identifier reported back for attribution, e.g. `unsplash`.
    fn id(&self) -> &str;

    fn fetch<'a>(&'a self, request: &'a R) -> SourceFuture<'a, T>;
}

/// The last resort of a chain. Must not fail.
pub trait TerminalSource<R, T>: Send + Sync {
    fn id(&self) -> &str;

    fn pick(&self, request: &R) -> T;
}

/// Content plus the id of the source that produced it. This is also the
/// cached payload, so a cache hit still knows its origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolved<T> {
    pub content: T,
    pub source: String,
}

/// Sources tried in order until one succeeds.
pub struct FallbackChain<R, T> {
    name: String,
    sources: Vec<Box<dyn ContentSource<R, T>>>,
}

impl<R: Sync, T: Send> FallbackChain<R, T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl ContentSource<R, T> + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_ids(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.id()).collect()
    }

    /// Try every source once, in order. Fails only when all of them fail.
    pub async fn try_resolve(&self, request: &R) -> Result<Resolved<T>, AppError> {
        let mut last_error = None;

        for source in &self.sources {
            tracing::debug!(chain = %self.name, source = source.id(), "trying source");
            match source.fetch(request).await {
                Ok(content) => {
                    return Ok(Resolved {
                        content,
                        source: source.id().to_string(),
                    })
                }
                Err(e) => {
                    tracing::warn!(chain = %self.name, source = source.id(), "source failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        Err(AppError::Exhausted {
            chain: self.name.clone(),
            last: Box::new(last_error.unwrap_or_else(|| {
                AppError::Config(format!("no sources configured for {}", self.name))
            })),
        })
    }
}

/// A fallback chain whose final step always succeeds.
pub struct GuaranteedChain<R, T> {
    chain: FallbackChain<R, T>,
    terminal: Box<dyn TerminalSource<R, T>>,
}

impl<R: Sync, T: Send> GuaranteedChain<R, T> {
    pub fn new(chain: FallbackChain<R, T>, terminal: impl TerminalSource<R, T> + 'static) -> Self {
        Self {
            chain,
            terminal: Box::new(terminal),
        }
    }

    pub fn source_ids(&self) -> Vec<&str> {
        let mut ids = self.chain.source_ids();
        ids.push(self.terminal.id());
        ids
    }

    pub async fn resolve(&self, request: &R) -> Resolved<T> {
        match self.chain.try_resolve(request).await {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::info!(
                    chain = %self.chain.name(),
                    source = self.terminal.id(),
                    "remote sources exhausted, using local pool: {}",
                    e
                );
                Resolved {
                    content: self.terminal.pick(request),
                    source: self.terminal.id().to_string(),
                }
            }
        }
    }
}
