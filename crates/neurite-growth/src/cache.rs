//! Lazily resolved substance handle.

use std::cell::OnceCell;

use neurite_core::{GradientField, SubstanceId};
use tracing::warn;

/// Resolve-once handle to a behavior's guidance substance.
///
/// The first call to [`FieldCache::get_or_resolve`] looks the substance up
/// by name and remembers the outcome, including a failed lookup. Later calls
/// never consult the field again until the cache is [`reset`](Self::reset),
/// which propagation does for every copied behavior.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldCache {
    slot: OnceCell<Option<SubstanceId>>,
}

impl FieldCache {
    /// An unresolved cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The substance id, resolving `name` against `fields` on first use.
    ///
    /// Returns `None` if the substance is not registered. The miss is logged
    /// once and then remembered.
    pub fn get_or_resolve(&self, name: &str, fields: &dyn GradientField) -> Option<SubstanceId> {
        *self.slot.get_or_init(|| {
            let id = fields.resolve(name);
            if id.is_none() {
                warn!(substance = name, "guidance substance not registered; behavior is inert");
            }
            id
        })
    }

    /// Whether a lookup has been attempted.
    pub fn is_resolved(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The resolved id, if resolution happened and succeeded.
    pub fn get(&self) -> Option<SubstanceId> {
        self.slot.get().copied().flatten()
    }

    /// Forget the lookup.
    pub fn reset(&mut self) {
        self.slot.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurite_test_utils::MockGradientField;

    #[test]
    fn resolves_exactly_once() {
        let field = MockGradientField::new().with_substance("apical", [0.0, 0.0, 1.0]);
        let cache = FieldCache::new();
        assert!(!cache.is_resolved());
        for _ in 0..5 {
            assert_eq!(cache.get_or_resolve("apical", &field), Some(SubstanceId(0)));
        }
        assert_eq!(field.resolve_calls(), 1);
        assert_eq!(cache.get(), Some(SubstanceId(0)));
    }

    #[test]
    fn miss_is_remembered() {
        let field = MockGradientField::new();
        let cache = FieldCache::new();
        assert_eq!(cache.get_or_resolve("basal", &field), None);
        assert_eq!(cache.get_or_resolve("basal", &field), None);
        assert!(cache.is_resolved());
        assert_eq!(field.resolve_calls(), 1);
    }

    #[test]
    fn reset_forces_new_lookup() {
        let field = MockGradientField::new().with_substance("apical", [0.0; 3]);
        let mut cache = FieldCache::new();
        cache.get_or_resolve("apical", &field);
        cache.reset();
        assert!(!cache.is_resolved());
        assert_eq!(cache.get(), None);
        cache.get_or_resolve("apical", &field);
        assert_eq!(field.resolve_calls(), 2);
    }
}
