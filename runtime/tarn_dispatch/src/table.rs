//! The per-type dispatch table: the variant catalog, the selection
//! strategy chosen for its shape, and the host adapter that runs the
//! selected variant.

use std::sync::Arc;

use tarn_object::{DispatchError, RuntimeType, Value};

use crate::chooser::SelectionStrategy;
use crate::closure::{ClosureClass, ClosureRef};
use crate::host::{DispatchHost, InvokeAdapter};
use crate::variant::Variant;

pub struct DispatchTable {
    type_name: String,
    catalog: Vec<Variant>,
    strategy: SelectionStrategy,
    adapter: Arc<dyn InvokeAdapter>,
}

impl DispatchTable {
    /// Build the table for a closure type. Fails only when the host
    /// cannot supply an adapter for the catalog.
    pub(crate) fn build(class: &ClosureClass, host: &DispatchHost) -> Result<Self, DispatchError> {
        let catalog: Vec<Variant> = class
            .variants()
            .iter()
            .map(|def| Variant::new(def.signature().clone()))
            .collect();
        let strategy = SelectionStrategy::from_catalog(&catalog);
        let adapter = host.adapter_for(class)?;
        tracing::debug!(
            closure_type = class.name(),
            variants = catalog.len(),
            strategy = ?strategy,
            "built dispatch table"
        );
        Ok(DispatchTable {
            type_name: class.name().to_string(),
            catalog,
            strategy,
            adapter,
        })
    }

    /// The variant catalog, in registration order.
    pub fn catalog(&self) -> &[Variant] {
        &self.catalog
    }

    /// The selection strategy chosen for the catalog's shape.
    pub fn strategy(&self) -> &SelectionStrategy {
        &self.strategy
    }

    /// Select the catalog variant for the given argument types.
    /// `Ok(None)` when no variant matches; the error case is an
    /// ambiguous overload.
    pub fn select(
        &self,
        arg_types: &[RuntimeType],
        coerce_numerics: bool,
    ) -> Result<Option<usize>, DispatchError> {
        self.strategy
            .select(&self.catalog, &self.type_name, arg_types, coerce_numerics)
    }

    /// Run a selected variant through the host adapter, attributing the
    /// call to `receiver`.
    pub(crate) fn invoke(
        &self,
        variant: usize,
        receiver: &ClosureRef,
        args: &[Value],
    ) -> tarn_object::DispatchResult {
        tracing::trace!(
            closure_type = %self.type_name,
            variant,
            argc = args.len(),
            "invoking variant"
        );
        self.adapter.invoke(variant, receiver, args)
    }
}
