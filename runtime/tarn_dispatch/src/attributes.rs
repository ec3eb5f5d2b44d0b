//! Attribute access: per-class accessor cache plus the generic
//! property surface every closure exposes.

use rustc_hash::FxHashMap;
use tarn_object::{missing_property, DispatchError, DispatchResult, Value};

use crate::closure::{Closure, ResolveStrategy};

/// Accessor for one declared field, keyed under the field's name.
#[derive(Clone, Debug)]
pub struct FieldAccessor {
    name: String,
}

impl FieldAccessor {
    /// Read the field from an instance; unset fields read as null.
    pub fn get(&self, closure: &Closure) -> Value {
        closure.field(&self.name).unwrap_or(Value::Null)
    }

    /// Write the field on an instance.
    pub fn set(&self, closure: &Closure, value: Value) {
        closure.set_field(self.name.clone(), value);
    }
}

/// Accessors for every declared field of a closure type. Built once,
/// lazily, on the first attribute access against the type.
pub struct AttributeCache {
    accessors: FxHashMap<String, FieldAccessor>,
}

impl AttributeCache {
    pub(crate) fn build(field_names: &[String]) -> Self {
        tracing::trace!(fields = field_names.len(), "building attribute cache");
        let accessors = field_names
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    FieldAccessor {
                        name: name.clone(),
                    },
                )
            })
            .collect();
        AttributeCache { accessors }
    }

    /// The accessor for a declared field, if the name is declared.
    pub fn accessor(&self, name: &str) -> Option<&FieldAccessor> {
        self.accessors.get(name)
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}

impl Closure {
    /// Read an attribute: declared fields first, then the generic
    /// surface (`owner`, `delegate`, `resolve_strategy`).
    pub fn get_attribute(&self, name: &str) -> DispatchResult {
        if let Some(accessor) = self.class().attribute_cache().accessor(name) {
            return Ok(accessor.get(self));
        }
        match name {
            "owner" => Ok(Value::object(self.owner().clone())),
            "delegate" => Ok(Value::object(self.delegate())),
            "resolve_strategy" => Ok(Value::string(self.resolve_strategy().as_str())),
            _ => Err(missing_property(name, self.type_name())),
        }
    }

    /// Write an attribute: declared fields accept any value; on the
    /// generic surface `delegate` takes an object and
    /// `resolve_strategy` a strategy name.
    pub fn set_attribute(&self, name: &str, value: Value) -> Result<(), DispatchError> {
        if let Some(accessor) = self.class().attribute_cache().accessor(name) {
            accessor.set(self, value);
            return Ok(());
        }
        match (name, value) {
            ("delegate", Value::Object(target)) => {
                self.set_delegate(target);
                Ok(())
            }
            ("resolve_strategy", Value::Str(strategy)) => {
                match ResolveStrategy::parse(&strategy) {
                    Some(parsed) => {
                        self.set_resolve_strategy(parsed);
                        Ok(())
                    }
                    None => Err(missing_property(name, self.type_name())),
                }
            }
            _ => Err(missing_property(name, self.type_name())),
        }
    }
}
