//! Ordered parameter signatures for callable variants.

use std::fmt;

use crate::types::{ParamType, RuntimeType};

/// Per-argument penalty for matching through a variadic tail, so a
/// fixed-arity variant outranks a variadic one at equal slot distance.
const DIST_VARIADIC: u64 = 1;

/// The parameter signature of one callable variant: an ordered list of
/// parameter types, with an optional variadic tail on the last slot.
///
/// A variadic signature accepts `params.len() - 1` or more arguments;
/// the tail slot absorbs zero or more trailing arguments, each checked
/// against the tail's element type.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Signature {
    params: Vec<ParamType>,
    variadic: bool,
}

impl Signature {
    /// A fixed-arity signature.
    pub fn fixed(params: Vec<ParamType>) -> Self {
        Signature {
            params,
            variadic: false,
        }
    }

    /// A signature whose last parameter is a variadic tail.
    /// An empty parameter list cannot be variadic.
    pub fn variadic(params: Vec<ParamType>) -> Self {
        Signature {
            variadic: !params.is_empty(),
            params,
        }
    }

    /// The declared parameter count (the variadic tail counts as one).
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The declared parameter slots.
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    /// Whether the last parameter is a variadic tail.
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Whether every parameter is the generic `any` marker.
    pub fn all_any(&self) -> bool {
        self.params.iter().all(|p| *p == ParamType::Any)
    }

    /// Whether arguments of the given runtime types satisfy this
    /// signature (arity and per-slot compatibility).
    pub fn accepts(&self, arg_types: &[RuntimeType], coerce_numerics: bool) -> bool {
        if self.variadic {
            let fixed = self.params.len().saturating_sub(1);
            if arg_types.len() < fixed {
                return false;
            }
            let tail = &self.params[fixed];
            self.params[..fixed]
                .iter()
                .zip(arg_types)
                .all(|(p, a)| p.accepts(a, coerce_numerics))
                && arg_types[fixed..]
                    .iter()
                    .all(|a| tail.accepts(a, coerce_numerics))
        } else {
            arg_types.len() == self.params.len()
                && self
                    .params
                    .iter()
                    .zip(arg_types)
                    .all(|(p, a)| p.accepts(a, coerce_numerics))
        }
    }

    /// Cumulative parameter distance for the given argument types.
    /// Lower is more specific. Callers are expected to have checked
    /// `accepts` first; incompatible slots score far above any match.
    pub fn distance(&self, arg_types: &[RuntimeType]) -> u64 {
        let mut total: u64 = 0;
        if self.variadic {
            let fixed = self.params.len().saturating_sub(1);
            let tail = &self.params[fixed];
            for (p, a) in self.params[..fixed].iter().zip(arg_types) {
                total = total.saturating_add(p.distance(a));
            }
            for a in arg_types.iter().skip(fixed) {
                total = total.saturating_add(tail.distance(a).saturating_add(DIST_VARIADIC));
            }
        } else {
            for (p, a) in self.params.iter().zip(arg_types) {
                total = total.saturating_add(p.distance(a));
            }
        }
        total
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
            if self.variadic && i == self.params.len().saturating_sub(1) {
                write!(f, "...")?;
            }
        }
        write!(f, ")")
    }
}
