use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::error::AppError;
use crate::records::NamedEntity;

/// Page size asked for on every lookup listing.
pub const LOOKUP_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Service,
    Team,
}

impl EntityKind {
    /// Listing path segment and response collection key.
    pub fn collection(self) -> &'static str {
        match self {
            EntityKind::Service => "services",
            EntityKind::Team => "teams",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Service => "service",
            EntityKind::Team => "team",
        }
    }
}

/// Network seam: one search request against the provider's listing endpoint for `kind`.
pub trait EntityLister {
    fn list_entities(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        query: &str,
        limit: u32,
    ) -> Result<Vec<NamedEntity>, AppError>;
}

/// Ids of entities whose lower-cased name contains the lower-cased `name`, in received order.
pub fn matching_ids(entities: &[NamedEntity], name: &str) -> Vec<String> {
    let needle = name.to_lowercase();
    entities
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .map(|e| e.id.clone())
        .collect()
}

/// Resolves canonical names to provider ids.
///
/// The provider's `query` parameter already fuzzy-matches server side; the substring check here is
/// a confirmation pass with the same predicate. Zero matches is a successful, empty result.
pub struct NameResolver<'a, L: EntityLister + ?Sized> {
    lister: &'a L,
}

impl<'a, L: EntityLister + ?Sized> NameResolver<'a, L> {
    pub fn new(lister: &'a L) -> Self {
        Self { lister }
    }

    pub fn resolve_ids(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        name: &str,
    ) -> Result<Vec<String>, AppError> {
        let entities = self
            .lister
            .list_entities(ctx, kind, name, LOOKUP_PAGE_LIMIT)
            .map_err(|e| {
                tracing::warn!(kind = kind.label(), name, error = %e, "name lookup failed");
                AppError::lookup(kind.label(), name, e)
            })?;

        let ids = matching_ids(&entities, name);
        tracing::debug!(
            kind = kind.label(),
            name,
            candidates = entities.len(),
            matched = ids.len(),
            "resolved name to ids"
        );
        Ok(ids)
    }
}
