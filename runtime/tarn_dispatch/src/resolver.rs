//! Named-method resolution on a closure receiver.
//!
//! The pipeline, in order: the call alias against the type's own
//! variants, the curry builtin, the fixed builtin surface, then
//! delegation outward. Delegation runs a static pass over the
//! strategy's targets (cheap signature-level resolution), then a
//! dynamic pass restricted to targets with the dynamic-invoke
//! capability, remembering the first missing-method failure so a later
//! target cannot mask it. A last-resort pass invokes a closure held in
//! a same-named property, attributed to the original receiver.

use smallvec::SmallVec;
use tarn_object::{
    missing_method, same_object, DispatchResult, ObjectRef, RuntimeType, Value,
};

use crate::closure::{strategy_targets, Closure, ClosureRef, Target};

/// Public call alias.
pub const CALL_METHOD: &str = "call";
/// The variant implementation name; interchangeable with `call`.
pub const DO_CALL_METHOD: &str = "do_call";
/// Builds a partially-applied closure.
pub const CURRY_METHOD: &str = "curry";

/// Runtime types of an argument list.
pub(crate) fn runtime_types(args: &[Value]) -> SmallVec<[RuntimeType; 8]> {
    args.iter().map(Value::runtime_type).collect()
}

impl Closure {
    /// Invoke the closure itself.
    pub fn call(&self, args: &[Value]) -> DispatchResult {
        self.invoke_method(CALL_METHOD, args)
    }

    /// Invoke a named method on the closure receiver.
    pub fn invoke_method(&self, name: &str, args: &[Value]) -> DispatchResult {
        tracing::trace!(
            closure_type = self.type_name(),
            method = name,
            argc = args.len(),
            "invoke"
        );
        let Some(me) = self.handle() else {
            return Err(missing_method(name, self.type_name(), &runtime_types(args)));
        };
        // First dispatch on a type initializes its table, whatever the
        // method name; an adapter failure is surfaced here.
        let table = self.class().dispatch_table(self.host())?;

        if name == CALL_METHOD || name == DO_CALL_METHOD {
            let full = self.with_curried(args);
            let full_types = runtime_types(&full);
            // Own-call selection never coerces numerics.
            if let Some(variant) = table.select(&full_types, false)? {
                return table.invoke(variant, &me, &full);
            }
            // No variant matched: the call alias resolves outward like
            // any other name.
        } else if name == CURRY_METHOD {
            return Ok(Value::object(self.curry(args)));
        } else if let Some(builtin) = self.host().builtins().pick(name, args.len()) {
            return builtin(&me, args);
        }

        resolve_through_scope(&me, name, args)
    }
}

/// Delegation: static pass, dynamic pass, then the nested-closure
/// property fallback.
fn resolve_through_scope(me: &ClosureRef, name: &str, args: &[Value]) -> DispatchResult {
    let arg_types = runtime_types(args);
    let receiver: ObjectRef = me.clone();
    let (delegate, strategy) = me.delegation_snapshot();
    let targets = strategy_targets(strategy);

    // Static pass: signature-level resolution on each distinct target.
    // A target aliasing the receiver is skipped, as is a delegate
    // aliasing the owner on the second probe.
    let mut probed: SmallVec<[ObjectRef; 2]> = SmallVec::new();
    for &slot in targets {
        let target = match slot {
            Target::Owner => me.owner(),
            Target::Delegate => &delegate,
        };
        if same_object(target, &receiver) || probed.iter().any(|seen| same_object(seen, target)) {
            continue;
        }
        probed.push(target.clone());
        if let Some(bound) = target.pick_method(name, &arg_types) {
            return bound.call(args);
        }
    }

    // Dynamic pass, same order and skips, restricted to targets that
    // report the capability. The first missing-method failure is
    // remembered; other failures abort immediately.
    let mut first_missing = None;
    probed.clear();
    for &slot in targets {
        let target = match slot {
            Target::Owner => me.owner(),
            Target::Delegate => &delegate,
        };
        if same_object(target, &receiver) || probed.iter().any(|seen| same_object(seen, target)) {
            continue;
        }
        probed.push(target.clone());
        if !target.supports_dynamic_invoke() {
            continue;
        }
        match target.invoke_dynamic(name, args) {
            Ok(value) => return Ok(value),
            Err(err) if err.is_missing_method() => {
                if first_missing.is_none() {
                    first_missing = Some(err);
                }
            }
            Err(err) => return Err(err),
        }
    }

    // Last resort: a closure stored under the method's name is invoked,
    // attributed to this receiver.
    if let Some(nested) = nested_closure_property(me, name) {
        match call_attributed(&nested, me, args) {
            Err(err) if err.is_missing_method() => {
                return Err(first_missing.unwrap_or(err));
            }
            outcome => return outcome,
        }
    }

    match first_missing {
        Some(err) => Err(err),
        None => Err(missing_method(name, me.type_name(), &arg_types)),
    }
}

/// A closure held in the same-named property, if any. Property misses
/// are swallowed here; the pipeline falls through to its final failure
/// instead.
fn nested_closure_property(me: &Closure, name: &str) -> Option<ClosureRef> {
    match me.get_attribute(name) {
        Ok(Value::Object(object)) => object
            .as_any()
            .downcast_ref::<Closure>()
            .and_then(Closure::handle),
        _ => None,
    }
}

/// Invoke `nested`'s own variants with the call attributed to
/// `receiver`, so the nested body observes the outer closure as its
/// receiver context.
fn call_attributed(nested: &ClosureRef, receiver: &ClosureRef, args: &[Value]) -> DispatchResult {
    let table = nested.class().dispatch_table(nested.host())?;
    let full = nested.with_curried(args);
    let full_types = runtime_types(&full);
    match table.select(&full_types, false)? {
        Some(variant) => table.invoke(variant, receiver, &full),
        None => Err(missing_method(
            DO_CALL_METHOD,
            nested.type_name(),
            &full_types,
        )),
    }
}
