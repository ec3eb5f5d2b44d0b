//! Closure types and instances.
//!
//! A [`ClosureClass`] is the immutable description of a closure type:
//! its name, declared call variants, and declared field names. The
//! dispatch table and the attribute-accessor cache both hang off the
//! class and are built lazily, each exactly once.
//!
//! A [`Closure`] is one instance: it binds a class to an owner, carries
//! mutable delegation state and field values, and implements
//! [`ScopeObject`] so closures can serve as owners and delegates of
//! other closures.

use std::any::Any;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use tarn_object::{BoundMethod, DispatchError, ObjectRef, RuntimeType, ScopeObject, Value};

use crate::attributes::AttributeCache;
use crate::host::DispatchHost;
use crate::resolver::{CALL_METHOD, DO_CALL_METHOD};
use crate::table::DispatchTable;
use crate::variant::VariantDef;

/// Where a method that misses the closure's own surface is looked up.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ResolveStrategy {
    /// Owner first, then delegate.
    #[default]
    OwnerFirst,
    /// Delegate first, then owner.
    DelegateFirst,
    /// Owner only; the delegate is never consulted.
    OwnerOnly,
    /// Delegate only; the owner is never consulted.
    DelegateOnly,
    /// No outward resolution at all.
    ToSelf,
}

impl ResolveStrategy {
    /// The strategy's wire name, as exposed on the property surface.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OwnerFirst => "owner_first",
            Self::DelegateFirst => "delegate_first",
            Self::OwnerOnly => "owner_only",
            Self::DelegateOnly => "delegate_only",
            Self::ToSelf => "to_self",
        }
    }

    /// Parse a wire name back into a strategy.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "owner_first" => Some(Self::OwnerFirst),
            "delegate_first" => Some(Self::DelegateFirst),
            "owner_only" => Some(Self::OwnerOnly),
            "delegate_only" => Some(Self::DelegateOnly),
            "to_self" => Some(Self::ToSelf),
            _ => None,
        }
    }
}

/// One delegation target slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Target {
    Owner,
    Delegate,
}

/// The probe order a strategy prescribes, used by both the static and
/// the dynamic delegation pass.
pub fn strategy_targets(strategy: ResolveStrategy) -> &'static [Target] {
    match strategy {
        ResolveStrategy::ToSelf => &[],
        ResolveStrategy::OwnerOnly => &[Target::Owner],
        ResolveStrategy::DelegateOnly => &[Target::Delegate],
        ResolveStrategy::OwnerFirst => &[Target::Owner, Target::Delegate],
        ResolveStrategy::DelegateFirst => &[Target::Delegate, Target::Owner],
    }
}

/// Immutable description of a closure type.
pub struct ClosureClass {
    name: String,
    variants: Vec<VariantDef>,
    field_names: Vec<String>,
    table: OnceLock<Arc<DispatchTable>>,
    build_guard: Mutex<()>,
    attributes: OnceLock<AttributeCache>,
}

impl ClosureClass {
    pub fn new(
        name: impl Into<String>,
        variants: Vec<VariantDef>,
        field_names: Vec<String>,
    ) -> Arc<Self> {
        Arc::new(ClosureClass {
            name: name.into(),
            variants,
            field_names,
            table: OnceLock::new(),
            build_guard: Mutex::new(()),
            attributes: OnceLock::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared call variants, in registration order.
    pub fn variants(&self) -> &[VariantDef] {
        &self.variants
    }

    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// The type's dispatch table, built on first use. Concurrent callers
    /// serialize on the build guard; exactly one performs the build and
    /// all observe the same table. A build failure is not cached, but
    /// every retry fails the same way, so the type stays unusable.
    pub fn dispatch_table(&self, host: &DispatchHost) -> Result<Arc<DispatchTable>, DispatchError> {
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }
        let _guard = self.build_guard.lock();
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }
        let built = Arc::new(DispatchTable::build(self, host)?);
        let _ = self.table.set(Arc::clone(&built));
        Ok(built)
    }

    /// Whether the dispatch table has been built yet.
    pub fn table_initialized(&self) -> bool {
        self.table.get().is_some()
    }

    /// The attribute-accessor cache, built on first attribute access.
    /// Independent of the dispatch table: call dispatch never forces it.
    pub(crate) fn attribute_cache(&self) -> &AttributeCache {
        self.attributes
            .get_or_init(|| AttributeCache::build(&self.field_names))
    }

    /// Whether the attribute-accessor cache has been built yet.
    pub fn attributes_initialized(&self) -> bool {
        self.attributes.get().is_some()
    }
}

struct ClosureState {
    delegate: ObjectRef,
    strategy: ResolveStrategy,
}

/// Shared handle to a closure instance.
pub type ClosureRef = Arc<Closure>;

/// One closure instance.
pub struct Closure {
    class: Arc<ClosureClass>,
    host: Arc<DispatchHost>,
    owner: ObjectRef,
    state: RwLock<ClosureState>,
    fields: RwLock<FxHashMap<String, Value>>,
    curried: Vec<Value>,
    me: Weak<Closure>,
}

impl Closure {
    /// Create an instance of `class` owned by `owner`. The delegate
    /// starts out aliasing the owner, and the strategy defaults to
    /// owner-first.
    pub fn new(class: Arc<ClosureClass>, host: Arc<DispatchHost>, owner: ObjectRef) -> ClosureRef {
        Arc::new_cyclic(|me| Closure {
            class,
            host,
            owner: owner.clone(),
            state: RwLock::new(ClosureState {
                delegate: owner,
                strategy: ResolveStrategy::default(),
            }),
            fields: RwLock::new(FxHashMap::default()),
            curried: Vec::new(),
            me: me.clone(),
        })
    }

    pub fn class(&self) -> &Arc<ClosureClass> {
        &self.class
    }

    pub(crate) fn host(&self) -> &DispatchHost {
        &self.host
    }

    /// The instance's type name. Shadows the trait method so callers
    /// holding a concrete `Closure` need no trait import.
    pub fn type_name(&self) -> &str {
        self.class.name()
    }

    pub fn owner(&self) -> &ObjectRef {
        &self.owner
    }

    pub fn delegate(&self) -> ObjectRef {
        self.state.read().delegate.clone()
    }

    pub fn set_delegate(&self, delegate: ObjectRef) {
        self.state.write().delegate = delegate;
    }

    pub fn resolve_strategy(&self) -> ResolveStrategy {
        self.state.read().strategy
    }

    pub fn set_resolve_strategy(&self, strategy: ResolveStrategy) {
        self.state.write().strategy = strategy;
    }

    /// One consistent view of the mutable delegation state.
    pub(crate) fn delegation_snapshot(&self) -> (ObjectRef, ResolveStrategy) {
        let state = self.state.read();
        (state.delegate.clone(), state.strategy)
    }

    /// The argument prefix bound by currying, oldest first.
    pub fn curried(&self) -> &[Value] {
        &self.curried
    }

    /// The curried prefix followed by the call's own arguments.
    pub(crate) fn with_curried(&self, args: &[Value]) -> Vec<Value> {
        let mut full = Vec::with_capacity(self.curried.len() + args.len());
        full.extend_from_slice(&self.curried);
        full.extend_from_slice(args);
        full
    }

    /// A new closure over the same class and scope with `args` appended
    /// to the bound argument prefix. Delegation state and field values
    /// are snapshotted at curry time.
    pub fn curry(&self, args: &[Value]) -> ClosureRef {
        let (delegate, strategy) = self.delegation_snapshot();
        let fields = self.fields.read().clone();
        let mut curried = self.curried.clone();
        curried.extend_from_slice(args);
        Arc::new_cyclic(|me| Closure {
            class: Arc::clone(&self.class),
            host: Arc::clone(&self.host),
            owner: self.owner.clone(),
            state: RwLock::new(ClosureState { delegate, strategy }),
            fields: RwLock::new(fields),
            curried,
            me: me.clone(),
        })
    }

    /// Read a declared field. `None` for fields never written.
    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields.read().get(name).cloned()
    }

    /// Write a declared field value.
    pub fn set_field(&self, name: impl Into<String>, value: Value) {
        self.fields.write().insert(name.into(), value);
    }

    /// The shared handle this instance was created under.
    pub fn handle(&self) -> Option<ClosureRef> {
        self.me.upgrade()
    }
}

impl ScopeObject for Closure {
    fn type_name(&self) -> &str {
        self.class.name()
    }

    /// Static resolution against the closure's surface: the call alias
    /// resolves through variant selection (an ambiguity here reads as
    /// no static match and is re-raised by the dynamic pass), any other
    /// name against the builtin surface.
    fn pick_method(&self, name: &str, arg_types: &[RuntimeType]) -> Option<BoundMethod> {
        if name == CALL_METHOD || name == DO_CALL_METHOD {
            let me = self.handle()?;
            let table = self.class.dispatch_table(&self.host).ok()?;
            let mut full_types: Vec<RuntimeType> =
                self.curried.iter().map(Value::runtime_type).collect();
            full_types.extend_from_slice(arg_types);
            let variant = table.select(&full_types, false).ok().flatten()?;
            Some(BoundMethod::new(DO_CALL_METHOD, move |args: &[Value]| {
                let full = me.with_curried(args);
                table.invoke(variant, &me, &full)
            }))
        } else {
            let method = self.host.builtins().pick(name, arg_types.len())?;
            let me = self.handle()?;
            Some(BoundMethod::new(name, move |args: &[Value]| {
                method(&me, args)
            }))
        }
    }

    fn supports_dynamic_invoke(&self) -> bool {
        true
    }

    fn invoke_dynamic(&self, name: &str, args: &[Value]) -> tarn_object::DispatchResult {
        match self.handle() {
            Some(me) => me.invoke_method(name, args),
            None => Err(tarn_object::missing_method_for_args(
                name,
                self.class.name(),
                args,
            )),
        }
    }

    fn get_property(&self, name: &str) -> tarn_object::DispatchResult {
        self.get_attribute(name)
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), DispatchError> {
        self.set_attribute(name, value)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
