//! General overload resolution: filter compatible variants, score them
//! by cumulative parameter distance, and demand a unique minimum.

use smallvec::SmallVec;
use tarn_object::{ambiguous_overload, DispatchError, RuntimeType};

use crate::resolver::DO_CALL_METHOD;
use crate::variant::Variant;

/// Choose a variant from an overloaded catalog. `Ok(None)` when nothing
/// is compatible; an error when two candidates tie at minimal distance.
pub fn choose(
    catalog: &[Variant],
    type_name: &str,
    arg_types: &[RuntimeType],
    coerce_numerics: bool,
) -> Result<Option<usize>, DispatchError> {
    if arg_types.is_empty() {
        if let Some(idx) = exact_nullary(catalog) {
            return Ok(Some(idx));
        }
    } else if arg_types == [RuntimeType::Null] {
        return Ok(most_general_unary(catalog, coerce_numerics));
    }

    let matching: SmallVec<[usize; 4]> = catalog
        .iter()
        .enumerate()
        .filter(|(_, v)| v.signature().accepts(arg_types, coerce_numerics))
        .map(|(idx, _)| idx)
        .collect();

    match matching.as_slice() {
        [] => Ok(None),
        [sole] => Ok(Some(*sole)),
        _ => most_specific(catalog, &matching, type_name, arg_types),
    }
}

/// Zero-argument rule: a variant that legitimately takes no parameters
/// wins outright over variadic variants that merely tolerate emptiness.
fn exact_nullary(catalog: &[Variant]) -> Option<usize> {
    catalog
        .iter()
        .position(|v| !v.signature().is_variadic() && v.signature().arity() == 0)
}

/// Single-null-argument rule: among unary variants that accept null,
/// pick the most general parameter (the highest distance from null).
/// A typed slot would bind null over-eagerly.
fn most_general_unary(catalog: &[Variant], coerce_numerics: bool) -> Option<usize> {
    let null_arg = [RuntimeType::Null];
    catalog
        .iter()
        .enumerate()
        .filter(|(_, v)| v.signature().arity() == 1 && v.signature().accepts(&null_arg, coerce_numerics))
        .max_by_key(|(idx, v)| (v.signature().distance(&null_arg), usize::MAX - idx))
        .map(|(idx, _)| idx)
}

/// Score the compatible candidates and demand a unique minimum. A
/// perfect distance of zero short-circuits the scan.
fn most_specific(
    catalog: &[Variant],
    matching: &[usize],
    type_name: &str,
    arg_types: &[RuntimeType],
) -> Result<Option<usize>, DispatchError> {
    let mut best_distance = u64::MAX;
    let mut tied: SmallVec<[usize; 4]> = SmallVec::new();

    for &idx in matching {
        let distance = catalog[idx].signature().distance(arg_types);
        if distance == 0 {
            return Ok(Some(idx));
        }
        if distance < best_distance {
            best_distance = distance;
            tied.clear();
            tied.push(idx);
        } else if distance == best_distance {
            tied.push(idx);
        }
    }

    match tied.as_slice() {
        [winner] => Ok(Some(*winner)),
        _ => Err(ambiguous_overload(
            &format!("{type_name}.{DO_CALL_METHOD}"),
            arg_types,
            tied.iter()
                .map(|&idx| catalog[idx].signature().to_string())
                .collect(),
        )),
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test-only selection results")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tarn_object::{ParamType, Signature};

    fn catalog(sigs: Vec<Signature>) -> Vec<Variant> {
        sigs.into_iter().map(Variant::new).collect()
    }

    fn int_param() -> ParamType {
        ParamType::Concrete(RuntimeType::Int)
    }

    fn str_param() -> ParamType {
        ParamType::Concrete(RuntimeType::Str)
    }

    #[test]
    fn unique_minimum_wins_over_structural_match() {
        let cat = catalog(vec![
            Signature::fixed(vec![int_param()]),
            Signature::fixed(vec![ParamType::Any]),
        ]);
        let picked = choose(&cat, "Acc", &[RuntimeType::Int], false).unwrap();
        assert_eq!(picked, Some(0));
    }

    #[test]
    fn exact_distance_returns_without_scanning_rest() {
        let cat = catalog(vec![
            Signature::fixed(vec![ParamType::Any, ParamType::Any]),
            Signature::fixed(vec![int_param(), str_param()]),
            Signature::variadic(vec![ParamType::Any]),
        ]);
        let picked = choose(&cat, "Acc", &[RuntimeType::Int, RuntimeType::Str], false).unwrap();
        assert_eq!(picked, Some(1));
    }

    #[test]
    fn tie_at_minimum_is_ambiguous_and_lists_candidates() {
        let cat = catalog(vec![
            Signature::fixed(vec![int_param(), ParamType::Any]),
            Signature::fixed(vec![ParamType::Any, int_param()]),
        ]);
        let err = choose(&cat, "Acc", &[RuntimeType::Int, RuntimeType::Int], false).unwrap_err();
        assert!(err.message.contains("Acc.do_call"));
        assert!(err.message.contains("(int, any)"));
        assert!(err.message.contains("(any, int)"));
    }

    #[test]
    fn nothing_compatible_yields_none() {
        let cat = catalog(vec![Signature::fixed(vec![int_param()])]);
        let picked = choose(&cat, "Acc", &[RuntimeType::Str], false).unwrap();
        assert_eq!(picked, None);
    }

    mod zero_argument_rule {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn true_nullary_beats_tolerant_variadic() {
            let cat = catalog(vec![
                Signature::variadic(vec![ParamType::Any]),
                Signature::fixed(vec![]),
            ]);
            assert_eq!(choose(&cat, "Acc", &[], false).unwrap(), Some(1));
        }

        #[test]
        fn tolerant_variadic_still_matches_when_no_nullary_exists() {
            let cat = catalog(vec![
                Signature::variadic(vec![ParamType::Any]),
                Signature::fixed(vec![int_param()]),
            ]);
            assert_eq!(choose(&cat, "Acc", &[], false).unwrap(), Some(0));
        }
    }

    mod single_null_rule {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn most_general_unary_wins_for_null() {
            let cat = catalog(vec![
                Signature::fixed(vec![int_param()]),
                Signature::fixed(vec![ParamType::Any]),
            ]);
            assert_eq!(choose(&cat, "Acc", &[RuntimeType::Null], false).unwrap(), Some(1));
        }

        #[test]
        fn equally_general_candidates_resolve_to_the_first() {
            let cat = catalog(vec![
                Signature::fixed(vec![int_param()]),
                Signature::fixed(vec![str_param()]),
            ]);
            assert_eq!(choose(&cat, "Acc", &[RuntimeType::Null], false).unwrap(), Some(0));
        }

        #[test]
        fn no_unary_candidate_misses() {
            let cat = catalog(vec![Signature::fixed(vec![int_param(), int_param()])]);
            assert_eq!(choose(&cat, "Acc", &[RuntimeType::Null], false).unwrap(), None);
        }
    }
}
