//! Host integration: invocation adapters and the fixed builtin surface.
//!
//! The engine never runs closure bodies itself. When a dispatch table is
//! built for a closure type, the host's [`AdapterFactory`] supplies an
//! [`InvokeAdapter`] that knows how to run each catalog variant. The
//! default [`ThunkAdapterFactory`] simply wraps the thunks registered on
//! the class; embedders with their own calling convention plug in a
//! factory of their own.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tarn_object::{
    initialization_failure, missing_method_for_args, DispatchError, DispatchResult, Value,
};

use crate::closure::{ClosureClass, ClosureRef, ResolveStrategy};
use crate::variant::VariantThunk;

/// Runs the variants of one closure type's catalog, by index.
pub trait InvokeAdapter: Send + Sync {
    /// Invoke catalog variant `variant` with the call attributed to
    /// `receiver`.
    fn invoke(&self, variant: usize, receiver: &ClosureRef, args: &[Value]) -> DispatchResult;
}

/// Supplies the adapter for a closure type when its dispatch table is
/// first built. A failure here is fatal for the type: it surfaces as an
/// initialization failure on every call.
pub trait AdapterFactory: Send + Sync {
    fn adapter_for(&self, class: &ClosureClass) -> Result<Arc<dyn InvokeAdapter>, DispatchError>;
}

/// Default factory: adapts the thunks registered on the class itself.
pub struct ThunkAdapterFactory;

impl AdapterFactory for ThunkAdapterFactory {
    fn adapter_for(&self, class: &ClosureClass) -> Result<Arc<dyn InvokeAdapter>, DispatchError> {
        if class.variants().is_empty() {
            return Err(initialization_failure(
                class.name(),
                "closure type declares no call variants",
            ));
        }
        let thunks = class.variants().iter().map(|v| v.thunk().clone()).collect();
        Ok(Arc::new(ThunkAdapter { thunks }))
    }
}

struct ThunkAdapter {
    thunks: Vec<VariantThunk>,
}

impl InvokeAdapter for ThunkAdapter {
    fn invoke(&self, variant: usize, receiver: &ClosureRef, args: &[Value]) -> DispatchResult {
        match self.thunks.get(variant) {
            Some(thunk) => thunk(receiver, args),
            None => Err(missing_method_for_args(
                crate::resolver::DO_CALL_METHOD,
                receiver.type_name(),
                args,
            )),
        }
    }
}

/// A builtin method on the closure surface itself, resolved before any
/// owner or delegate is consulted.
pub type BuiltinFn = fn(&ClosureRef, &[Value]) -> DispatchResult;

/// The fixed method surface every closure carries: introspection and
/// mutation of its delegation state. Matching is by name and exact
/// argument count.
pub struct BuiltinSurface {
    methods: FxHashMap<&'static str, (usize, BuiltinFn)>,
}

impl BuiltinSurface {
    /// The standard surface: `owner`, `delegate`, `resolve_strategy`,
    /// `set_delegate`, `set_resolve_strategy`, `arity`.
    pub fn standard() -> Self {
        let mut surface = BuiltinSurface {
            methods: FxHashMap::default(),
        };
        surface.register("owner", 0, builtin_owner);
        surface.register("delegate", 0, builtin_delegate);
        surface.register("resolve_strategy", 0, builtin_resolve_strategy);
        surface.register("set_delegate", 1, builtin_set_delegate);
        surface.register("set_resolve_strategy", 1, builtin_set_resolve_strategy);
        surface.register("arity", 0, builtin_arity);
        surface
    }

    /// Add or replace a surface method.
    pub fn register(&mut self, name: &'static str, arity: usize, method: BuiltinFn) {
        self.methods.insert(name, (arity, method));
    }

    /// Resolve a surface method by name and argument count.
    pub fn pick(&self, name: &str, argc: usize) -> Option<BuiltinFn> {
        self.methods
            .get(name)
            .and_then(|(arity, method)| (argc == *arity).then_some(*method))
    }
}

fn builtin_owner(closure: &ClosureRef, _args: &[Value]) -> DispatchResult {
    Ok(Value::object(closure.owner().clone()))
}

fn builtin_delegate(closure: &ClosureRef, _args: &[Value]) -> DispatchResult {
    Ok(Value::object(closure.delegate()))
}

fn builtin_resolve_strategy(closure: &ClosureRef, _args: &[Value]) -> DispatchResult {
    Ok(Value::string(closure.resolve_strategy().as_str()))
}

fn builtin_set_delegate(closure: &ClosureRef, args: &[Value]) -> DispatchResult {
    match args {
        [Value::Object(target)] => {
            closure.set_delegate(target.clone());
            Ok(Value::Null)
        }
        _ => Err(missing_method_for_args(
            "set_delegate",
            closure.type_name(),
            args,
        )),
    }
}

fn builtin_set_resolve_strategy(closure: &ClosureRef, args: &[Value]) -> DispatchResult {
    let parsed = match args {
        [Value::Str(name)] => ResolveStrategy::parse(name),
        _ => None,
    };
    match parsed {
        Some(strategy) => {
            closure.set_resolve_strategy(strategy);
            Ok(Value::Null)
        }
        None => Err(missing_method_for_args(
            "set_resolve_strategy",
            closure.type_name(),
            args,
        )),
    }
}

fn builtin_arity(closure: &ClosureRef, _args: &[Value]) -> DispatchResult {
    let widest = closure
        .class()
        .variants()
        .iter()
        .map(|v| v.signature().arity())
        .max()
        .unwrap_or(0);
    Ok(Value::Int(i64::try_from(widest).unwrap_or(i64::MAX)))
}

/// Per-host dispatch services shared by every closure the host creates:
/// the adapter factory used when tables are built, and the builtin
/// surface consulted before delegation.
pub struct DispatchHost {
    adapters: Arc<dyn AdapterFactory>,
    builtins: BuiltinSurface,
}

impl DispatchHost {
    pub fn new(adapters: Arc<dyn AdapterFactory>) -> Self {
        DispatchHost {
            adapters,
            builtins: BuiltinSurface::standard(),
        }
    }

    /// A host whose adapters run the thunks registered on each class.
    pub fn thunk_based() -> Arc<Self> {
        Arc::new(Self::new(Arc::new(ThunkAdapterFactory)))
    }

    pub fn builtins(&self) -> &BuiltinSurface {
        &self.builtins
    }

    /// Extend the builtin surface before the host is shared.
    pub fn builtins_mut(&mut self) -> &mut BuiltinSurface {
        &mut self.builtins
    }

    pub(crate) fn adapter_for(
        &self,
        class: &ClosureClass,
    ) -> Result<Arc<dyn InvokeAdapter>, DispatchError> {
        self.adapters.adapter_for(class)
    }
}
