//! Substance registry: the simulation-wide owner of all diffusion grids.

use indexmap::IndexMap;
use neurite_core::{GradientField, SubstanceId, Vec3};
use tracing::debug;

use crate::error::FieldError;
use crate::grid::DiffusionGrid;

/// Owns every substance grid, keyed by name in registration order.
///
/// `SubstanceId(n)` is the n-th registered grid. Behaviors hold ids, never
/// references, so the registry can be stepped between simulation steps.
#[derive(Clone, Debug, Default)]
pub struct SubstanceRegistry {
    grids: IndexMap<String, DiffusionGrid>,
}

impl SubstanceRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grid under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DuplicateSubstance`] if the name is taken.
    pub fn register(&mut self, grid: DiffusionGrid) -> Result<SubstanceId, FieldError> {
        if self.grids.contains_key(grid.name()) {
            return Err(FieldError::DuplicateSubstance {
                name: grid.name().to_string(),
            });
        }
        let id = SubstanceId(self.grids.len() as u32);
        debug!(substance = grid.name(), %id, "registered substance");
        self.grids.insert(grid.name().to_string(), grid);
        Ok(id)
    }

    /// Number of registered substances.
    pub fn len(&self) -> usize {
        self.grids.len()
    }

    /// Whether no substance is registered.
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    /// The grid for `id`.
    pub fn grid(&self, id: SubstanceId) -> Option<&DiffusionGrid> {
        self.grids.get_index(id.0 as usize).map(|(_, g)| g)
    }

    /// Mutable grid for `id`, e.g. to add a point source between steps.
    pub fn grid_mut(&mut self, id: SubstanceId) -> Option<&mut DiffusionGrid> {
        self.grids.get_index_mut(id.0 as usize).map(|(_, g)| g)
    }

    /// Iterate `(id, grid)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (SubstanceId, &DiffusionGrid)> {
        self.grids
            .values()
            .enumerate()
            .map(|(i, g)| (SubstanceId(i as u32), g))
    }

    /// Check every grid is stable at timestep `dt`.
    ///
    /// # Errors
    ///
    /// Returns the first [`FieldError::Unstable`] found.
    pub fn check_stable(&self, dt: f64) -> Result<(), FieldError> {
        self.grids.values().try_for_each(|g| g.check_stable(dt))
    }

    /// Advance every grid by `dt`.
    pub fn step(&mut self, dt: f64) {
        for grid in self.grids.values_mut() {
            grid.step(dt);
        }
    }
}

impl GradientField for SubstanceRegistry {
    fn resolve(&self, substance: &str) -> Option<SubstanceId> {
        self.grids
            .get_index_of(substance)
            .map(|i| SubstanceId(i as u32))
    }

    fn gradient(&self, substance: SubstanceId, position: Vec3) -> Vec3 {
        self.grid(substance)
            .map(|g| g.gradient(position))
            .unwrap_or([0.0; 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializer::{Axis, Initializer};

    fn band(name: &str, mean: f64) -> DiffusionGrid {
        DiffusionGrid::builder(name)
            .bounds(-100.0, 100.0)
            .resolution(10)
            .initializer(Initializer::GaussianBand {
                mean,
                sigma: 40.0,
                axis: Axis::Z,
            })
            .build()
            .unwrap()
    }

    #[test]
    fn ids_follow_registration_order() {
        let mut reg = SubstanceRegistry::new();
        assert_eq!(reg.register(band("apical", 80.0)).unwrap(), SubstanceId(0));
        assert_eq!(reg.register(band("basal", -80.0)).unwrap(), SubstanceId(1));
        assert_eq!(reg.resolve("apical"), Some(SubstanceId(0)));
        assert_eq!(reg.resolve("basal"), Some(SubstanceId(1)));
        assert_eq!(reg.resolve("axon"), None);
        assert_eq!(reg.len(), 2);
        let names: Vec<_> = reg.iter().map(|(_, g)| g.name().to_string()).collect();
        assert_eq!(names, ["apical", "basal"]);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut reg = SubstanceRegistry::new();
        reg.register(band("apical", 0.0)).unwrap();
        let err = reg.register(band("apical", 10.0)).unwrap_err();
        assert_eq!(
            err,
            FieldError::DuplicateSubstance {
                name: "apical".into()
            }
        );
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn gradient_dispatches_per_substance() {
        let mut reg = SubstanceRegistry::new();
        let up = reg.register(band("apical", 80.0)).unwrap();
        let down = reg.register(band("basal", -80.0)).unwrap();
        let origin = [0.0, 0.0, 0.0];
        assert!(reg.gradient(up, origin)[2] > 0.0);
        assert!(reg.gradient(down, origin)[2] < 0.0);
        assert_eq!(reg.gradient(SubstanceId(7), origin), [0.0; 3]);
    }

    #[test]
    fn stability_checked_across_grids() {
        let mut reg = SubstanceRegistry::new();
        reg.register(band("a", 0.0)).unwrap();
        reg.register(
            DiffusionGrid::builder("fast")
                .bounds(0.0, 1.0)
                .resolution(10)
                .coefficient(1.0)
                .build()
                .unwrap(),
        )
        .unwrap();
        assert!(reg.check_stable(1e-4).is_ok());
        assert!(matches!(
            reg.check_stable(1.0),
            Err(FieldError::Unstable { .. })
        ));
    }
}
