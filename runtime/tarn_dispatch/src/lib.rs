//! Tarn Dispatch - the closure dispatch engine of the Tarn runtime.
//!
//! Closure calls resolve in two stages. First, variant selection: each
//! closure type's declared call variants collapse into a
//! [`SelectionStrategy`] fixed when the type's [`DispatchTable`] is
//! built, so common catalog shapes dispatch on argument count alone and
//! only genuinely overloaded catalogs pay for type-based scoring.
//! Second, delegation: a method the closure's own surface cannot
//! resolve is looked up on the owner and delegate in the order the
//! closure's [`ResolveStrategy`] prescribes, statically first, then
//! dynamically, with the first missing-method failure preserved.
//!
//! Hosts integrate through two seams: [`ScopeObject`] for anything
//! serving as an owner or delegate, and [`AdapterFactory`] for running
//! variant bodies under the host's calling convention.

mod attributes;
mod chooser;
mod closure;
mod dispatch;
mod host;
mod overload;
mod resolver;
mod table;
mod variant;

#[cfg(test)]
mod tests;

pub use attributes::{AttributeCache, FieldAccessor};
pub use chooser::SelectionStrategy;
pub use closure::{strategy_targets, Closure, ClosureClass, ClosureRef, ResolveStrategy, Target};
pub use dispatch::{call_value, get_attribute_value, invoke_value, set_attribute_value};
pub use host::{
    AdapterFactory, BuiltinFn, BuiltinSurface, DispatchHost, InvokeAdapter, ThunkAdapterFactory,
};
pub use resolver::{CALL_METHOD, CURRY_METHOD, DO_CALL_METHOD};
pub use table::DispatchTable;
pub use variant::{Variant, VariantDef, VariantThunk};

pub use tarn_object::{
    ambiguous_overload, initialization_failure, invalid_receiver, missing_method,
    missing_method_for_args, missing_property, same_object, BoundMethod, DispatchError,
    DispatchErrorKind, DispatchResult, Heap, MethodFn, ObjectRef, ParamType, RuntimeType,
    ScopeObject, Signature, Value,
};
