//! The scope-object capability trait.
//!
//! Owners and delegates of closures are arbitrary host objects. The
//! dispatch engine only needs the narrow surface defined here: a type
//! name, static method resolution against argument types, an optional
//! dynamic by-name invocation capability, and property get/set. Plain
//! data objects implement the statics and leave dynamic invocation
//! unsupported; only objects reporting the capability are eligible for
//! the delegation fallback.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::errors::{missing_method_for_args, missing_property, DispatchError, DispatchResult};
use crate::types::RuntimeType;
use crate::value::Value;

/// Invocable thunk of a statically resolved method.
pub type MethodFn = Arc<dyn Fn(&[Value]) -> DispatchResult + Send + Sync>;

/// A method resolved on a concrete receiver, ready to invoke.
#[derive(Clone)]
pub struct BoundMethod {
    name: Arc<str>,
    thunk: MethodFn,
}

impl BoundMethod {
    /// Bind a method name to its thunk.
    pub fn new(
        name: impl Into<Arc<str>>,
        thunk: impl Fn(&[Value]) -> DispatchResult + Send + Sync + 'static,
    ) -> Self {
        BoundMethod {
            name: name.into(),
            thunk: Arc::new(thunk),
        }
    }

    /// The method name this binding resolves.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Perform the call.
    pub fn call(&self, args: &[Value]) -> DispatchResult {
        (self.thunk)(args)
    }
}

impl fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundMethod({})", self.name)
    }
}

/// An object that can serve as a closure's owner or delegate.
pub trait ScopeObject: Send + Sync {
    /// The object's type name, used for runtime-type comparisons and
    /// diagnostics.
    fn type_name(&self) -> &str;

    /// Statically resolve a method for the given argument types.
    /// Returns `None` when no declared method matches.
    fn pick_method(&self, name: &str, arg_types: &[RuntimeType]) -> Option<BoundMethod>;

    /// Whether this object supports dynamic by-name invocation. Only
    /// objects reporting `true` are probed by the delegation fallback.
    fn supports_dynamic_invoke(&self) -> bool {
        false
    }

    /// Dynamically invoke a method by name. The default signals a
    /// missing method; objects with the capability override this.
    fn invoke_dynamic(&self, name: &str, args: &[Value]) -> DispatchResult {
        Err(missing_method_for_args(name, self.type_name(), args))
    }

    /// Read a property by name.
    fn get_property(&self, name: &str) -> DispatchResult {
        Err(missing_property(name, self.type_name()))
    }

    /// Write a property by name.
    fn set_property(&self, name: &str, value: Value) -> Result<(), DispatchError> {
        let _ = value;
        Err(missing_property(name, self.type_name()))
    }

    /// Downcast support, used to recognize closures held in properties.
    fn as_any(&self) -> &dyn Any;
}

/// Shared, non-owning handle to a scope object.
pub type ObjectRef = Arc<dyn ScopeObject>;

/// Whether two handles refer to the same object allocation.
///
/// Delegation uses this for the delegate-equals-closure check and for
/// skipping a target already probed (owner and delegate may alias).
pub fn same_object(a: &ObjectRef, b: &ObjectRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
