//! Error types for closure dispatch.
//!
//! `DispatchErrorKind` provides typed error categories; factory
//! functions (e.g. `missing_method(..)`) are the public constructors and
//! populate both `kind` and `message`. `Display` on the kind produces
//! the message string, so the two never disagree.

use std::fmt;

use crate::types::RuntimeType;
use crate::value::Value;

/// Result of a dispatch operation.
pub type DispatchResult = Result<Value, DispatchError>;

/// Typed error category for dispatch failures.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DispatchErrorKind {
    /// No variant or delegation target resolved the call. Recoverable;
    /// delegation remembers the first one and may suppress it if a
    /// later target succeeds.
    MissingMethod {
        method: String,
        receiver_type: String,
        arg_types: Vec<String>,
    },
    /// Two or more candidate variants tied at minimal parameter
    /// distance. Fatal to the call; carries every tied signature.
    AmbiguousOverload {
        method: String,
        arg_types: Vec<String>,
        candidates: Vec<String>,
    },
    /// The host could not supply an invocation adapter for a type's
    /// catalog. Fatal: no call on that type can ever succeed.
    InitializationFailure { type_name: String, reason: String },
    /// An invocation was attempted on a null receiver. Rejected before
    /// any resolution work.
    InvalidReceiver { method: String },
    /// A property lookup found nothing on the object's surface.
    MissingProperty { property: String, type_name: String },
}

impl fmt::Display for DispatchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMethod {
                method,
                receiver_type,
                arg_types,
            } => write!(
                f,
                "no signature of method {receiver_type}.{method} matches argument types ({})",
                arg_types.join(", ")
            ),
            Self::AmbiguousOverload {
                method,
                arg_types,
                candidates,
            } => {
                write!(
                    f,
                    "ambiguous overload for {method} on argument types ({}); \
                     overlapping candidates:",
                    arg_types.join(", ")
                )?;
                for candidate in candidates {
                    write!(f, "\n\t{candidate}")?;
                }
                Ok(())
            }
            Self::InitializationFailure { type_name, reason } => {
                write!(f, "failed to initialize dispatch for {type_name}: {reason}")
            }
            Self::InvalidReceiver { method } => {
                write!(f, "cannot invoke method {method} on a null receiver")
            }
            Self::MissingProperty {
                property,
                type_name,
            } => write!(f, "no property {property} on {type_name}"),
        }
    }
}

/// Dispatch error: a structured kind plus its rendered message.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DispatchError {
    pub kind: DispatchErrorKind,
    pub message: String,
}

impl DispatchError {
    fn from_kind(kind: DispatchErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    /// Whether this is a recoverable missing-method failure.
    pub fn is_missing_method(&self) -> bool {
        matches!(self.kind, DispatchErrorKind::MissingMethod { .. })
    }

    /// Whether this is a property-surface miss.
    pub fn is_missing_property(&self) -> bool {
        matches!(self.kind, DispatchErrorKind::MissingProperty { .. })
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DispatchError {}

fn render_types(arg_types: &[RuntimeType]) -> Vec<String> {
    arg_types.iter().map(ToString::to_string).collect()
}

/// No variant or target resolved a method for the given argument types.
pub fn missing_method(
    method: &str,
    receiver_type: &str,
    arg_types: &[RuntimeType],
) -> DispatchError {
    DispatchError::from_kind(DispatchErrorKind::MissingMethod {
        method: method.to_string(),
        receiver_type: receiver_type.to_string(),
        arg_types: render_types(arg_types),
    })
}

/// Convenience form of `missing_method` for call sites holding values.
pub fn missing_method_for_args(method: &str, receiver_type: &str, args: &[Value]) -> DispatchError {
    let arg_types: Vec<RuntimeType> = args.iter().map(Value::runtime_type).collect();
    missing_method(method, receiver_type, &arg_types)
}

/// Two or more candidates tied at minimal parameter distance.
/// `candidates` holds the rendered signature of every tied variant.
pub fn ambiguous_overload(
    method: &str,
    arg_types: &[RuntimeType],
    candidates: Vec<String>,
) -> DispatchError {
    DispatchError::from_kind(DispatchErrorKind::AmbiguousOverload {
        method: method.to_string(),
        arg_types: render_types(arg_types),
        candidates,
    })
}

/// The host could not supply an invocation adapter for a type.
pub fn initialization_failure(type_name: &str, reason: impl Into<String>) -> DispatchError {
    DispatchError::from_kind(DispatchErrorKind::InitializationFailure {
        type_name: type_name.to_string(),
        reason: reason.into(),
    })
}

/// An invocation was attempted on a null receiver.
pub fn invalid_receiver(method: &str) -> DispatchError {
    DispatchError::from_kind(DispatchErrorKind::InvalidReceiver {
        method: method.to_string(),
    })
}

/// A property lookup found nothing.
pub fn missing_property(property: &str, type_name: &str) -> DispatchError {
    DispatchError::from_kind(DispatchErrorKind::MissingProperty {
        property: property.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_method_message_lists_argument_types() {
        let err = missing_method("greet", "Widget", &[RuntimeType::Int, RuntimeType::Str]);
        assert_eq!(
            err.message,
            "no signature of method Widget.greet matches argument types (int, str)"
        );
        assert!(err.is_missing_method());
    }

    #[test]
    fn ambiguous_overload_lists_every_candidate() {
        let err = ambiguous_overload(
            "do_call",
            &[RuntimeType::Int],
            vec!["(int, any)".to_string(), "(any, int)".to_string()],
        );
        assert!(err.message.contains("(int, any)"));
        assert!(err.message.contains("(any, int)"));
        assert!(!err.is_missing_method());
    }

    #[test]
    fn invalid_receiver_names_the_method() {
        let err = invalid_receiver("greet");
        assert_eq!(err.message, "cannot invoke method greet on a null receiver");
    }

    #[test]
    fn message_matches_kind_display() {
        let err = missing_property("handler", "Widget");
        assert_eq!(err.message, err.kind.to_string());
        assert!(err.is_missing_property());
    }
}
