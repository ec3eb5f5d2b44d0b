//! Value-level entry points.
//!
//! Hosts holding plain [`Value`]s come through here: null receivers are
//! rejected before any resolution work, closure receivers run the full
//! resolution pipeline, and other objects fall back to their own
//! static-then-dynamic surface.

use tarn_object::{
    invalid_receiver, missing_method, missing_property, DispatchError, DispatchResult,
    Value,
};

use crate::closure::Closure;
use crate::resolver::{runtime_types, CALL_METHOD};

/// Call a value as a closure.
pub fn call_value(receiver: &Value, args: &[Value]) -> DispatchResult {
    invoke_value(receiver, CALL_METHOD, args)
}

/// Invoke a named method on a value receiver.
pub fn invoke_value(receiver: &Value, method: &str, args: &[Value]) -> DispatchResult {
    match receiver {
        Value::Null => Err(invalid_receiver(method)),
        Value::Object(object) => {
            if let Some(closure) = as_closure(object) {
                return closure.invoke_method(method, args);
            }
            let arg_types = runtime_types(args);
            if let Some(bound) = object.pick_method(method, &arg_types) {
                bound.call(args)
            } else if object.supports_dynamic_invoke() {
                object.invoke_dynamic(method, args)
            } else {
                Err(missing_method(method, object.type_name(), &arg_types))
            }
        }
        other => Err(missing_method(
            method,
            other.type_name(),
            &runtime_types(args),
        )),
    }
}

/// Read an attribute from a value receiver.
pub fn get_attribute_value(receiver: &Value, name: &str) -> DispatchResult {
    match receiver {
        Value::Null => Err(invalid_receiver(name)),
        Value::Object(object) => object.get_property(name),
        other => Err(missing_property(name, other.type_name())),
    }
}

/// Write an attribute on a value receiver.
pub fn set_attribute_value(
    receiver: &Value,
    name: &str,
    value: Value,
) -> Result<(), DispatchError> {
    match receiver {
        Value::Null => Err(invalid_receiver(name)),
        Value::Object(object) => object.set_property(name, value),
        other => Err(missing_property(name, other.type_name())),
    }
}

fn as_closure(object: &tarn_object::ObjectRef) -> Option<crate::closure::ClosureRef> {
    object
        .as_any()
        .downcast_ref::<Closure>()
        .and_then(Closure::handle)
}
