//! Tarn Object - host object model for the Tarn closure runtime.
//!
//! This crate defines the surface the dispatch engine consumes:
//!
//! - `Value`: runtime values, with heap allocation enforced through
//!   factory methods over the `Heap` wrapper
//! - `RuntimeType` / `ParamType` / `Signature`: runtime type
//!   introspection, parameter compatibility (including numeric
//!   coercion), and the parameter-distance specificity metric
//! - `ScopeObject`: the capability trait for objects that can act as a
//!   closure's owner or delegate (static method resolution, dynamic
//!   by-name invocation, property access)
//! - `DispatchError`: the structured error model shared by the engine

mod errors;
mod object;
mod signature;
mod types;
mod value;

pub use errors::{
    ambiguous_overload, initialization_failure, invalid_receiver, missing_method,
    missing_method_for_args, missing_property, DispatchError, DispatchErrorKind, DispatchResult,
};
pub use object::{same_object, BoundMethod, MethodFn, ObjectRef, ScopeObject};
pub use signature::Signature;
pub use types::{ParamType, RuntimeType};
pub use value::{Heap, Value};
