//! Ordered chain of resolvers.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::request::RequestContext;

use super::{ResolvedIdentifier, TenantResolver, TenantSource};

/// Tries multiple resolvers in order and returns the first non-blank result.
///
/// Order encodes precedence: with `[header, query]`, a request carrying both
/// resolves from the header. The output is always one of the children's
/// outputs, unchanged, or `None`.
#[derive(Clone)]
pub struct CompositeTenantResolver {
    resolvers: Vec<Arc<dyn TenantResolver>>,
}

impl CompositeTenantResolver {
    /// Creates a composite from resolvers in precedence order.
    pub fn new(resolvers: impl IntoIterator<Item = Arc<dyn TenantResolver>>) -> Self {
        Self {
            resolvers: resolvers.into_iter().collect(),
        }
    }

    /// Returns the number of chained resolvers.
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Returns true if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Returns the sources of the chained resolvers, in precedence order.
    pub fn sources(&self) -> Vec<TenantSource> {
        self.resolvers.iter().map(|r| r.source()).collect()
    }
}

impl fmt::Debug for CompositeTenantResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeTenantResolver")
            .field("sources", &self.sources())
            .finish()
    }
}

#[async_trait]
impl TenantResolver for CompositeTenantResolver {
    async fn resolve(
        &self,
        request: &dyn RequestContext,
        cancel: &CancellationToken,
    ) -> Option<String> {
        self.resolve_identifier(request, cancel)
            .await
            .map(ResolvedIdentifier::into_value)
    }

    fn source(&self) -> TenantSource {
        TenantSource::Composite
    }

    async fn resolve_identifier(
        &self,
        request: &dyn RequestContext,
        cancel: &CancellationToken,
    ) -> Option<ResolvedIdentifier> {
        for resolver in &self.resolvers {
            if let Some(resolved) = resolver.resolve_identifier(request, cancel).await {
                return Some(resolved);
            }
            trace!(source = %resolver.source(), "no tenant identifier from source");
        }
        None
    }
}
