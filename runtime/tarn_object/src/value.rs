//! Runtime values for the Tarn closure runtime.
//!
//! Heap allocations go through factory methods on `Value`. The `Heap<T>`
//! wrapper has a crate-private constructor, so external code cannot build
//! heap values except via `Value::string`, `Value::list`, and friends.
//! All heap types use `Arc` internally, so values are cheap to clone and
//! safe to share across threads.

use std::fmt;
use std::sync::Arc;

use crate::object::{same_object, ObjectRef};
use crate::types::RuntimeType;

/// Shared heap allocation with a crate-private constructor.
pub struct Heap<T>(Arc<T>);

impl<T> Heap<T> {
    pub(crate) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }
}

impl<T> Clone for Heap<T> {
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T> std::ops::Deref for Heap<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0 == *other.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Runtime value in the Tarn closure runtime.
///
/// Scalars are stored inline; strings and lists share their payload via
/// `Heap`. `Object` holds any scope object, including closures.
#[derive(Clone)]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    Str(Heap<String>),
    /// List of values.
    List(Heap<Vec<Value>>),
    /// Scope object (plain object or closure).
    Object(ObjectRef),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    /// Create a list value.
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Create an object value from a scope object reference.
    pub fn object(object: ObjectRef) -> Self {
        Value::Object(object)
    }

    /// The runtime type of this value.
    pub fn runtime_type(&self) -> RuntimeType {
        match self {
            Value::Null => RuntimeType::Null,
            Value::Bool(_) => RuntimeType::Bool,
            Value::Int(_) => RuntimeType::Int,
            Value::Float(_) => RuntimeType::Float,
            Value::Str(_) => RuntimeType::Str,
            Value::List(_) => RuntimeType::List,
            Value::Object(o) => RuntimeType::Object(Arc::from(o.type_name())),
        }
    }

    /// The type name of this value, for diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Object(o) => o.type_name(),
        }
    }

    /// Whether this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl PartialEq for Value {
    /// Structural equality for scalars, strings, and lists; identity
    /// equality for objects.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => same_object(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{}", &**s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(o) => write!(f, "<{}>", o.type_name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", &**s),
            other => write!(f, "{other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn runtime_types_of_scalars() {
        assert_eq!(Value::Null.runtime_type(), RuntimeType::Null);
        assert_eq!(Value::Bool(true).runtime_type(), RuntimeType::Bool);
        assert_eq!(Value::Int(1).runtime_type(), RuntimeType::Int);
        assert_eq!(Value::Float(1.5).runtime_type(), RuntimeType::Float);
        assert_eq!(Value::string("x").runtime_type(), RuntimeType::Str);
        assert_eq!(Value::list(vec![]).runtime_type(), RuntimeType::List);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::string("hi").to_string(), "hi");
        assert_eq!(
            Value::list(vec![Value::Int(1), Value::Int(2)]).to_string(),
            "[1, 2]"
        );
    }

    #[test]
    fn string_equality_is_structural() {
        assert_eq!(Value::string("a"), Value::string("a"));
        assert_ne!(Value::string("a"), Value::string("b"));
    }

    #[test]
    fn cross_type_equality_is_false() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Null, Value::Bool(false));
    }
}
