//! Reusable query descriptors.

use crate::collection::FindOptions;
use opaldb_document::Document;

/// A reusable description of how a find should shape its results.
///
/// Descriptors are built up by the embedder and turned into
/// [`FindOptions`] when an operation is issued. Their lifetime is managed
/// through the binding layer's handle registry: the managed side holds an
/// opaque handle and releases it through the finalizer entry point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryDescriptor {
    projection: Option<Document>,
    sort: Option<Document>,
    limit: Option<u64>,
}

impl QueryDescriptor {
    /// Creates an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the projection document.
    pub fn with_projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Sets the sort document.
    pub fn with_sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the result limit.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the projection document, if set.
    pub fn projection(&self) -> Option<&Document> {
        self.projection.as_ref()
    }

    /// Returns the sort document, if set.
    pub fn sort(&self) -> Option<&Document> {
        self.sort.as_ref()
    }

    /// Returns the result limit, if set.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Converts the descriptor into find options.
    ///
    /// An unset limit maps to 0, which the service treats as "no limit".
    pub fn to_options(&self) -> FindOptions {
        FindOptions {
            limit: self.limit.unwrap_or(0),
            projection: self.projection.clone(),
            sort: self.sort.clone(),
        }
    }
}
