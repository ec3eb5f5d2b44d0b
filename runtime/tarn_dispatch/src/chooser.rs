//! Variant selection strategies.
//!
//! The catalog shape is inspected once, when the dispatch table is
//! built, and collapses into one of the closed strategies below. The
//! single- and two-variant shapes select on argument count alone, with
//! no per-call type inspection; only the general overloaded shape pays
//! for type-based scoring.

use tarn_object::{DispatchError, ParamType, RuntimeType};

use crate::overload;
use crate::variant::Variant;

/// Selection strategy for one closure type's catalog, fixed at table
/// build time.
#[derive(Clone, Debug)]
pub enum SelectionStrategy {
    /// Exactly a nullary variant and a unary all-purpose variant: zero
    /// arguments route to the former, one argument to the latter
    /// regardless of its type, anything else misses.
    StandardPair { nullary: usize, unary: usize },
    /// Sole nullary variant: matches only the empty argument list.
    SoleNullary { variant: usize },
    /// Sole unary variant taking `any`: matches zero or one argument.
    SoleUnaryAny { variant: usize },
    /// Sole fixed-arity variant with all-`any` parameters: matches on
    /// exact argument count.
    SoleArityMatch { variant: usize, arity: usize },
    /// Sole variadic variant with all-`any` parameters: matches any
    /// call whose argument count exceeds the parameter count minus two.
    SoleVariadic { variant: usize, param_count: usize },
    /// Sole variant with at least one concrete parameter: matches by
    /// full signature compatibility.
    SoleGeneral { variant: usize },
    /// Three or more variants, or two that do not form the standard
    /// pair: full filter-and-score overload resolution.
    Overloaded,
}

impl SelectionStrategy {
    /// Pick the strategy for a catalog based on its shape.
    pub fn from_catalog(catalog: &[Variant]) -> Self {
        match catalog {
            [sole] => Self::for_sole_variant(sole),
            [a, b] => {
                let is_nullary =
                    |v: &Variant| !v.signature().is_variadic() && v.signature().arity() == 0;
                let is_unary_any = |v: &Variant| {
                    !v.signature().is_variadic() && v.signature().params() == [ParamType::Any]
                };
                if is_nullary(a) && is_unary_any(b) {
                    SelectionStrategy::StandardPair {
                        nullary: 0,
                        unary: 1,
                    }
                } else if is_nullary(b) && is_unary_any(a) {
                    SelectionStrategy::StandardPair {
                        nullary: 1,
                        unary: 0,
                    }
                } else {
                    SelectionStrategy::Overloaded
                }
            }
            _ => SelectionStrategy::Overloaded,
        }
    }

    fn for_sole_variant(sole: &Variant) -> Self {
        let sig = sole.signature();
        if sig.is_variadic() {
            if sig.all_any() {
                SelectionStrategy::SoleVariadic {
                    variant: 0,
                    param_count: sig.arity(),
                }
            } else {
                SelectionStrategy::SoleGeneral { variant: 0 }
            }
        } else if sig.arity() == 0 {
            SelectionStrategy::SoleNullary { variant: 0 }
        } else if sig.params() == [ParamType::Any] {
            SelectionStrategy::SoleUnaryAny { variant: 0 }
        } else if sig.all_any() {
            SelectionStrategy::SoleArityMatch {
                variant: 0,
                arity: sig.arity(),
            }
        } else {
            SelectionStrategy::SoleGeneral { variant: 0 }
        }
    }

    /// Select a catalog variant for the given argument types. `Ok(None)`
    /// means no variant matches; the error case is an ambiguous
    /// overload from the general strategy.
    pub fn select(
        &self,
        catalog: &[Variant],
        type_name: &str,
        arg_types: &[RuntimeType],
        coerce_numerics: bool,
    ) -> Result<Option<usize>, DispatchError> {
        let argc = arg_types.len();
        let picked = match *self {
            SelectionStrategy::StandardPair { nullary, unary } => match argc {
                0 => Some(nullary),
                1 => Some(unary),
                _ => None,
            },
            SelectionStrategy::SoleNullary { variant } => (argc == 0).then_some(variant),
            SelectionStrategy::SoleUnaryAny { variant } => (argc < 2).then_some(variant),
            SelectionStrategy::SoleArityMatch { variant, arity } => {
                (argc == arity).then_some(variant)
            }
            // Written as argc + 2 > params to sidestep underflow on a
            // one-parameter tail; a sole `(any...)` accepts every count.
            SelectionStrategy::SoleVariadic {
                variant,
                param_count,
            } => (argc.saturating_add(2) > param_count).then_some(variant),
            SelectionStrategy::SoleGeneral { variant } => catalog
                .get(variant)
                .filter(|v| v.signature().accepts(arg_types, coerce_numerics))
                .map(|_| variant),
            SelectionStrategy::Overloaded => {
                return overload::choose(catalog, type_name, arg_types, coerce_numerics);
            }
        };
        Ok(picked)
    }
}
