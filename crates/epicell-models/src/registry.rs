//! Model-name lookup and cell construction.

use epicell_cell::CellModel;
use epicell_core::{CellId, ConfigError, ModelDescriptor, ParamBlock, Population};
use indexmap::IndexMap;

use crate::seir::SeirCell;

/// Model name that older scenario files use for the SEIR cell.
pub const DENGUE_CELL: &str = "DengueCell";

/// Constructs one cell model from its id and parameter block.
pub type ModelFactory<P> =
    Box<dyn Fn(&CellId, &ParamBlock) -> Result<Box<dyn CellModel<P>>, ConfigError> + Send + Sync>;

/// Maps model names to factories.
///
/// New variants are added with [`register`](Self::register) without
/// touching existing ones. Unknown names are a build error; there is no
/// fallback model.
///
/// # Examples
///
/// ```
/// use epicell_core::{CellId, ModelDescriptor, ParamBlock};
/// use epicell_models::ModelRegistry;
///
/// let registry = ModelRegistry::<f64>::with_defaults();
/// let params = ParamBlock::new().with("beta", 0.5).with("sigma", 0.2).with("gamma", 0.1);
/// let cell = registry
///     .build(&CellId::from("A"), &ModelDescriptor::new("seir", params.clone()))
///     .unwrap();
/// assert_eq!(cell.name(), "seir");
///
/// let err = registry
///     .build(&CellId::from("A"), &ModelDescriptor::new("sir", params))
///     .err()
///     .unwrap();
/// assert_eq!(err.to_string(), "cell 'A': unknown cell model 'sir'");
/// ```
pub struct ModelRegistry<P: Population> {
    factories: IndexMap<String, ModelFactory<P>>,
}

impl<P: Population> ModelRegistry<P> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// A registry with the built-in models: `seir`, also registered as
    /// [`DENGUE_CELL`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for name in [SeirCell::NAME, DENGUE_CELL] {
            registry.register(name, |cell, params| {
                Ok(Box::new(SeirCell::from_params(cell, params)?) as Box<dyn CellModel<P>>)
            });
        }
        registry
    }

    /// Register `factory` under `name`.
    ///
    /// Returns `true` if an existing factory with the same name was replaced.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> bool
    where
        F: Fn(&CellId, &ParamBlock) -> Result<Box<dyn CellModel<P>>, ConfigError>
            + Send
            + Sync
            + 'static,
    {
        self.factories
            .insert(name.into(), Box::new(factory))
            .is_some()
    }

    /// `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// `true` if no models are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build the cell model described by `descriptor` for `cell`.
    pub fn build(
        &self,
        cell: &CellId,
        descriptor: &ModelDescriptor,
    ) -> Result<Box<dyn CellModel<P>>, ConfigError> {
        let factory =
            self.factories
                .get(&descriptor.model)
                .ok_or_else(|| ConfigError::UnknownModel {
                    cell: cell.clone(),
                    model: descriptor.model.clone(),
                })?;
        factory(cell, &descriptor.params)
    }
}

impl<P: Population> Default for ModelRegistry<P> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<P: Population> std::fmt::Debug for ModelRegistry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epicell_cell::NeighbourView;
    use epicell_core::CompartmentState;

    fn rate_block() -> ParamBlock {
        ParamBlock::new()
            .with("transmission_rate", 0.5)
            .with("incubation_rate", 0.2)
            .with("recovery_rate", 0.1)
    }

    #[test]
    fn defaults_contain_seir_and_its_alias() {
        let r = ModelRegistry::<i64>::with_defaults();
        assert_eq!(r.names().collect::<Vec<_>>(), vec!["seir", "DengueCell"]);
        assert!(!r.contains("dengue"));
    }

    #[test]
    fn dengue_cell_builds_seir() {
        let r = ModelRegistry::<f64>::with_defaults();
        let cell = r
            .build(&CellId::from("Yishun"), &ModelDescriptor::new(DENGUE_CELL, rate_block()))
            .unwrap();
        assert_eq!(cell.name(), "seir");
    }

    #[test]
    fn unknown_model_names_cell_and_model() {
        let r = ModelRegistry::<f64>::with_defaults();
        let cell = CellId::from("Bedok");
        let err = r
            .build(&cell, &ModelDescriptor::new("seirs", rate_block()))
            .err()
            .unwrap();
        assert_eq!(
            err,
            ConfigError::UnknownModel {
                cell,
                model: "seirs".into()
            }
        );
    }

    #[test]
    fn empty_registry_rejects_everything() {
        let r = ModelRegistry::<f64>::new();
        assert!(r.is_empty());
        assert!(r
            .build(&CellId::from("x"), &ModelDescriptor::new("seir", rate_block()))
            .is_err());
    }

    #[test]
    fn factory_errors_propagate() {
        let r = ModelRegistry::<f64>::with_defaults();
        let cell = CellId::from("x");
        let err = r
            .build(&cell, &ModelDescriptor::new("seir", ParamBlock::new()))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }

    #[test]
    fn register_adds_variant_without_touching_seir() {
        struct Inert;
        impl CellModel<f64> for Inert {
            fn name(&self) -> &str {
                "inert"
            }
            fn local_computation(
                &self,
                state: CompartmentState<f64>,
                _nb: &NeighbourView<'_, f64>,
            ) -> CompartmentState<f64> {
                state
            }
        }

        let mut r = ModelRegistry::<f64>::with_defaults();
        assert!(!r.register("inert", |_, _| {
            Ok(Box::new(Inert) as Box<dyn CellModel<f64>>)
        }));
        assert_eq!(r.len(), 3);

        let cell = CellId::from("x");
        let inert = r
            .build(&cell, &ModelDescriptor::new("inert", ParamBlock::new()))
            .unwrap();
        assert_eq!(inert.name(), "inert");
        let seir = r
            .build(&cell, &ModelDescriptor::new("seir", rate_block()))
            .unwrap();
        assert_eq!(seir.name(), "seir");

        assert!(r.register("inert", |_, _| {
            Ok(Box::new(Inert) as Box<dyn CellModel<f64>>)
        }));
    }
}
