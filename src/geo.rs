//! External gazetteer boundary for administrative-area resolution.
//!
//! The profiler never talks to a geo service directly; it goes through the
//! [`GeoResolver`] trait so callers can plug in their own backend. Resolution
//! failures and empty results simply mean no administrative-area tag is
//! produced.

use serde::{Deserialize, Serialize};

/// A named administrative geographic entity (country, state, city) returned
/// by a gazetteer backend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaDescriptor {
    /// Backend-specific identifier for the area.
    pub id: String,
    /// Canonical name of the area.
    pub name: String,
    /// Administrative level (0 = country, 1 = state/region, ...).
    pub level: u32,
}

/// Resolves free-text names into administrative areas.
///
/// Implementations must return one entry per input value, in input order,
/// with `None` for values the backend cannot resolve. The profiler makes at
/// most two calls per column (resolve, then disambiguate) and implements no
/// retry or timeout of its own.
pub trait GeoResolver {
    /// Looks up each value and returns the best candidate area for it, if any.
    fn resolve_names(&self, values: &[&str]) -> Vec<Option<AreaDescriptor>>;

    /// Picks a consistent interpretation for a set of resolved areas.
    ///
    /// Returns `None` when no consistent interpretation exists, in which case
    /// the column is not tagged as administrative areas.
    fn disambiguate(&self, areas: &[AreaDescriptor]) -> Option<Vec<AreaDescriptor>>;
}

/// Resolver that never matches anything. Used when no gazetteer is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGeoResolver;

impl GeoResolver for NullGeoResolver {
    fn resolve_names(&self, values: &[&str]) -> Vec<Option<AreaDescriptor>> {
        vec![None; values.len()]
    }

    fn disambiguate(&self, _areas: &[AreaDescriptor]) -> Option<Vec<AreaDescriptor>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_resolver_matches_nothing() {
        let resolver = NullGeoResolver;
        let resolved = resolver.resolve_names(&["paris", "london"]);
        assert_eq!(resolved, vec![None, None]);
        assert_eq!(resolver.disambiguate(&[]), None);
    }
}
