//! Runtime type introspection and parameter compatibility.
//!
//! `RuntimeType` classifies a value at a call site; `ParamType` is a
//! declared parameter slot, either a concrete type or the generic `any`
//! marker. Compatibility honors an optional numeric-coercion mode (int
//! arguments satisfy float parameters and vice versa).
//!
//! The parameter-distance metric scores how specific a parameter is for
//! a given argument type; lower is more specific. Overload resolution
//! selects the candidate with the minimal cumulative distance, so the
//! ordering of the constants below is the contract: exact < coerced <
//! null < any.

use std::fmt;
use std::sync::Arc;

/// Distance of an exact concrete-type match.
const DIST_EXACT: u64 = 0;
/// Distance of a numeric coercion (int to float or float to int).
const DIST_COERCED: u64 = 1;
/// Distance of a null argument against a concrete parameter.
const DIST_NULL: u64 = 3;
/// Distance of any argument against the generic `any` parameter.
const DIST_ANY: u64 = 4;
/// Distance of a null argument against the generic `any` parameter.
const DIST_NULL_ANY: u64 = 5;
/// Distance of an incompatible pairing. Only reachable when distance is
/// computed without a prior compatibility check; large enough to lose
/// against any real match, small enough not to overflow a sum.
const DIST_INCOMPATIBLE: u64 = 1 << 32;

/// The runtime type of a value.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RuntimeType {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    /// A scope object type, identified by its type name.
    Object(Arc<str>),
}

impl RuntimeType {
    /// Whether this is a numeric type (eligible for coercion).
    pub fn is_numeric(&self) -> bool {
        matches!(self, RuntimeType::Int | RuntimeType::Float)
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeType::Null => write!(f, "null"),
            RuntimeType::Bool => write!(f, "bool"),
            RuntimeType::Int => write!(f, "int"),
            RuntimeType::Float => write!(f, "float"),
            RuntimeType::Str => write!(f, "str"),
            RuntimeType::List => write!(f, "list"),
            RuntimeType::Object(name) => write!(f, "{name}"),
        }
    }
}

/// A declared parameter slot: a concrete type or the generic `any`
/// marker that accepts every argument.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ParamType {
    /// Generic marker; accepts any argument, including null.
    Any,
    /// Concrete type; accepts exact matches, null, and (when coercion
    /// is enabled) numeric cross-matches.
    Concrete(RuntimeType),
}

impl ParamType {
    /// Shorthand for a concrete object parameter.
    pub fn object(name: impl Into<Arc<str>>) -> Self {
        ParamType::Concrete(RuntimeType::Object(name.into()))
    }

    /// Whether an argument of the given runtime type satisfies this
    /// parameter.
    pub fn accepts(&self, arg: &RuntimeType, coerce_numerics: bool) -> bool {
        match self {
            ParamType::Any => true,
            ParamType::Concrete(ty) => {
                if arg == ty || *arg == RuntimeType::Null {
                    return true;
                }
                coerce_numerics && ty.is_numeric() && arg.is_numeric()
            }
        }
    }

    /// Specificity distance between this parameter and an argument's
    /// runtime type. Lower is more specific.
    pub fn distance(&self, arg: &RuntimeType) -> u64 {
        match self {
            ParamType::Any => {
                if *arg == RuntimeType::Null {
                    DIST_NULL_ANY
                } else {
                    DIST_ANY
                }
            }
            ParamType::Concrete(ty) => {
                if arg == ty {
                    DIST_EXACT
                } else if *arg == RuntimeType::Null {
                    DIST_NULL
                } else if ty.is_numeric() && arg.is_numeric() {
                    DIST_COERCED
                } else {
                    DIST_INCOMPATIBLE
                }
            }
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Any => write!(f, "any"),
            ParamType::Concrete(ty) => write!(f, "{ty}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod compatibility {
        use super::*;

        #[test]
        fn any_accepts_everything() {
            for arg in [
                RuntimeType::Null,
                RuntimeType::Int,
                RuntimeType::Str,
                RuntimeType::Object(Arc::from("Widget")),
            ] {
                assert!(ParamType::Any.accepts(&arg, false));
            }
        }

        #[test]
        fn concrete_accepts_exact_and_null() {
            let p = ParamType::Concrete(RuntimeType::Int);
            assert!(p.accepts(&RuntimeType::Int, false));
            assert!(p.accepts(&RuntimeType::Null, false));
            assert!(!p.accepts(&RuntimeType::Str, false));
        }

        #[test]
        fn numeric_coercion_gated_by_mode() {
            let p = ParamType::Concrete(RuntimeType::Float);
            assert!(!p.accepts(&RuntimeType::Int, false));
            assert!(p.accepts(&RuntimeType::Int, true));
            // Coercion only applies between numerics
            assert!(!p.accepts(&RuntimeType::Str, true));
        }

        #[test]
        fn object_types_match_by_name() {
            let p = ParamType::object("Widget");
            assert!(p.accepts(&RuntimeType::Object(Arc::from("Widget")), false));
            assert!(!p.accepts(&RuntimeType::Object(Arc::from("Gadget")), false));
        }
    }

    mod distance {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn ordering_exact_coerced_null_any() {
            let concrete = ParamType::Concrete(RuntimeType::Int);
            let exact = concrete.distance(&RuntimeType::Int);
            let coerced = ParamType::Concrete(RuntimeType::Float).distance(&RuntimeType::Int);
            let null = concrete.distance(&RuntimeType::Null);
            let any = ParamType::Any.distance(&RuntimeType::Int);
            let null_any = ParamType::Any.distance(&RuntimeType::Null);
            assert!(exact < coerced);
            assert!(coerced < null);
            assert!(null < any);
            assert!(any < null_any);
        }

        #[test]
        fn exact_match_is_zero() {
            assert_eq!(
                ParamType::Concrete(RuntimeType::Str).distance(&RuntimeType::Str),
                0
            );
        }

        #[test]
        fn incompatible_loses_to_everything() {
            let bad = ParamType::Concrete(RuntimeType::Str).distance(&RuntimeType::Int);
            let any = ParamType::Any.distance(&RuntimeType::Int);
            assert!(bad > any);
        }
    }
}
