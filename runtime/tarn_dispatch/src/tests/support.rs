//! Shared fixtures: a configurable scope object and canned closure
//! classes.

use std::any::Any;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tarn_object::{
    missing_method_for_args, BoundMethod, DispatchError, DispatchResult, ObjectRef, ParamType,
    RuntimeType, ScopeObject, Signature, Value,
};

use crate::closure::ClosureClass;
use crate::variant::VariantDef;

/// A scope object whose method surface is declared per test: statics
/// resolve through `pick_method`, dynamics only through
/// `invoke_dynamic`, and an injected failure overrides everything.
pub(crate) struct StubObject {
    name: &'static str,
    statics: FxHashMap<&'static str, Value>,
    dynamics: FxHashMap<&'static str, Value>,
    dynamic: bool,
    failure: Option<DispatchError>,
}

impl StubObject {
    pub(crate) fn named(name: &'static str) -> Self {
        StubObject {
            name,
            statics: FxHashMap::default(),
            dynamics: FxHashMap::default(),
            dynamic: false,
            failure: None,
        }
    }

    /// Declare a statically resolvable method returning `value`.
    pub(crate) fn with_static(mut self, method: &'static str, value: Value) -> Self {
        self.statics.insert(method, value);
        self
    }

    /// Declare a method only reachable through dynamic invocation.
    pub(crate) fn with_dynamic(mut self, method: &'static str, value: Value) -> Self {
        self.dynamic = true;
        self.dynamics.insert(method, value);
        self
    }

    /// Report the dynamic capability without declaring any methods.
    pub(crate) fn dynamic_capable(mut self) -> Self {
        self.dynamic = true;
        self
    }

    /// Make every dynamic invocation fail with `err`.
    pub(crate) fn with_dynamic_failure(mut self, err: DispatchError) -> Self {
        self.dynamic = true;
        self.failure = Some(err);
        self
    }

    pub(crate) fn build(self) -> ObjectRef {
        Arc::new(self)
    }
}

impl ScopeObject for StubObject {
    fn type_name(&self) -> &str {
        self.name
    }

    fn pick_method(&self, name: &str, _arg_types: &[RuntimeType]) -> Option<BoundMethod> {
        let value = self.statics.get(name)?.clone();
        Some(BoundMethod::new(name, move |_args: &[Value]| {
            Ok(value.clone())
        }))
    }

    fn supports_dynamic_invoke(&self) -> bool {
        self.dynamic
    }

    fn invoke_dynamic(&self, name: &str, args: &[Value]) -> DispatchResult {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        match self.statics.get(name).or_else(|| self.dynamics.get(name)) {
            Some(value) => Ok(value.clone()),
            None => Err(missing_method_for_args(name, self.name, args)),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A class with a sole nullary variant returning `ret`.
pub(crate) fn nullary_class(name: &'static str, ret: Value) -> Arc<ClosureClass> {
    let variant = VariantDef::new(Signature::fixed(vec![]), move |_recv, _args| Ok(ret.clone()));
    ClosureClass::new(name, vec![variant], vec![])
}

/// A class with the standard pair: the nullary variant returns the
/// string `"none"`, the unary variant echoes its argument.
pub(crate) fn echo_pair_class(name: &'static str) -> Arc<ClosureClass> {
    let nullary = VariantDef::new(Signature::fixed(vec![]), |_recv, _args| {
        Ok(Value::string("none"))
    });
    let unary = VariantDef::new(
        Signature::fixed(vec![ParamType::Any]),
        |_recv, args: &[Value]| Ok(args.first().cloned().unwrap_or(Value::Null)),
    );
    ClosureClass::new(name, vec![nullary, unary], vec![])
}

/// A bare owner with no methods and no dynamic capability.
pub(crate) fn bare_owner() -> ObjectRef {
    StubObject::named("BareOwner").build()
}
