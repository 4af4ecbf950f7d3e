//! Object accessor - name-driven member access over a wrapped object
//!
//! The accessor bridges loose external naming (form fields, config keys,
//! user input) to strict member names without requiring exact case or
//! format matches.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ ObjectAccessor                                              │
//! │   get(name) / set(name, value) / invoke_method(name, args)  │
//! └──────────────┬──────────────────────────────────────────────┘
//!                │ per call
//!                ▼
//!   variants::expand(name) ──► ordered candidate spellings
//!                │ per candidate
//!                ▼
//!   ClassDesc lookup (field, then get/set/append-prefixed method)
//!                │ per hit
//!                ▼
//!   MemberValidator ──► eligible? ──► shim read/write/invoke
//! ```
//!
//! Strategy order is fixed: direct field, then prefixed accessor method,
//! then - after every candidate failed - the target's dynamic hooks with
//! the original name. Lookup stops at the first hit.
//!
//! Resolution failures are soft: `get` yields `None`, `set` yields `false`,
//! whether the member is missing or merely ineligible. The only hard
//! failure is wrapping a non-object [`Value`].

use std::cell::OnceCell;

use tracing::trace;

use crate::config::AccessorConfig;
use crate::describe::{ClassDesc, FieldDesc, MethodDesc};
use crate::introspect::Introspect;
use crate::validator::MemberValidator;
use crate::value::{Value, ValueKind};
use crate::variants;

/// Error type for accessor construction
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("not an object: a {kind} value cannot be wrapped")]
    NotAnObject { kind: ValueKind },
}

/// Name-driven view over one borrowed object.
///
/// The accessor never copies or outlives its target; the member table is
/// resolved once on first use and memoized for the accessor's lifetime.
pub struct ObjectAccessor<'a> {
    object: &'a mut dyn Introspect,
    handle: OnceCell<&'static ClassDesc>,
    validator: MemberValidator,
    config: AccessorConfig,
}

impl std::fmt::Debug for ObjectAccessor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectAccessor")
            .field("handle", &self.handle)
            .field("validator", &self.validator)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> ObjectAccessor<'a> {
    /// Wrap an object with the default configuration.
    pub fn new(object: &'a mut dyn Introspect) -> Self {
        Self::with_config(object, AccessorConfig::default())
    }

    /// Wrap an object with an explicit configuration.
    pub fn with_config(object: &'a mut dyn Introspect, config: AccessorConfig) -> Self {
        Self {
            object,
            handle: OnceCell::new(),
            validator: MemberValidator::new(config.type_match),
            config,
        }
    }

    /// Wrap the object inside a [`Value`].
    ///
    /// # Errors
    /// Fails with [`AccessError::NotAnObject`] for any non-object value.
    pub fn wrap(value: &'a mut Value) -> Result<Self, AccessError> {
        match value {
            Value::Object(object) => Ok(Self::new(object.as_mut())),
            other => Err(AccessError::NotAnObject { kind: other.kind() }),
        }
    }

    /// The wrapped object.
    pub fn object(&self) -> &dyn Introspect {
        self.object
    }

    /// The wrapped object, mutably.
    pub fn object_mut(&mut self) -> &mut dyn Introspect {
        self.object
    }

    /// The registered class name of the wrapped object.
    pub fn class_name(&self) -> &'static str {
        self.class().class_name
    }

    /// The member table of the wrapped object, resolved on first use.
    pub fn class_desc(&self) -> &'static ClassDesc {
        self.class()
    }

    fn class(&self) -> &'static ClassDesc {
        *self.handle.get_or_init(|| self.object.class_desc())
    }

    // ==================== READ PATH ====================

    /// Resolve `name` to a value.
    ///
    /// Tries each candidate spelling against fields first, then against a
    /// `get`-prefixed accessor method, then falls back to the target's
    /// dynamic get hook with the original name. `None` means nothing
    /// resolved - missing and ineligible members are indistinguishable.
    pub fn get(&mut self, name: &str) -> Option<Value> {
        for candidate in variants::expand(name) {
            if let Some(value) = self.get_by_field(&candidate) {
                trace!("get: {} resolved to field {}", name, candidate);
                return Some(value);
            }
            if let Some(value) = self.get_by_method(&candidate) {
                trace!("get: {} resolved to getter for {}", name, candidate);
                return Some(value);
            }
        }

        if self.config.use_fallback_hooks {
            return self.object.dynamic_get(name);
        }

        None
    }

    /// Read through a field with exactly this name, if eligible.
    pub fn get_by_field(&self, name: &str) -> Option<Value> {
        let field = self.class().field(name)?;
        if !self.validator.is_valid_field(field) {
            return None;
        }
        Some((field.get)(self.object.as_any()))
    }

    /// Read through the getter method for this postfix, if eligible.
    ///
    /// The getter runs exactly once; its computed value is then judged
    /// against the declared return spec and discarded on an invalid
    /// verdict.
    pub fn get_by_method(&mut self, postfix: &str) -> Option<Value> {
        let method = self.getter_method(postfix)?;
        if !self.validator.is_valid_method(method) {
            return None;
        }

        let value = (method.invoke)(self.object.as_any_mut(), &mut []);
        if self.validator.is_valid_getter_return(method, &value) {
            Some(value)
        } else {
            None
        }
    }

    // ==================== WRITE PATH ====================

    /// Resolve `name` to a writable member and store `value`.
    ///
    /// Tries each candidate spelling against fields first, then against
    /// `set`- and `append`-prefixed methods (in that prefix order), then
    /// falls back to the target's dynamic set hook with the original name.
    /// Returns whether anything was written.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        for candidate in variants::expand(name) {
            if let Some(field) = self.writable_field(&candidate, &value) {
                trace!("set: {} resolved to field {}", name, field.name);
                return (field.set)(self.object.as_any_mut(), value);
            }
            if let Some(method) = self.eligible_setter(&candidate, &value) {
                trace!("set: {} resolved to setter {}", name, method.name);
                return invoke_setter(method, self.object.as_any_mut(), value);
            }
        }

        if self.config.use_fallback_hooks {
            return self.object.dynamic_set(name, value);
        }

        false
    }

    /// Write through a field with exactly this name. Returns whether the
    /// write happened.
    pub fn set_by_field(&mut self, name: &str, value: Value) -> bool {
        match self.writable_field(name, &value) {
            Some(field) => (field.set)(self.object.as_any_mut(), value),
            None => false,
        }
    }

    /// Write through the setter method for this postfix. Returns whether
    /// the method was invoked.
    pub fn set_by_method(&mut self, name: &str, value: Value) -> bool {
        match self.eligible_setter(name, &value) {
            Some(method) => invoke_setter(method, self.object.as_any_mut(), value),
            None => false,
        }
    }

    fn writable_field(&self, name: &str, value: &Value) -> Option<&'static FieldDesc> {
        let field = self.class().field(name)?;
        if !self.validator.is_valid_field(field) || field.modifiers.is_readonly() {
            return None;
        }
        // Unlike untyped-language property writes, fields carry declared
        // types; an unacceptable value falls through to the next strategy.
        let acceptable = if value.is_null() {
            field.nullable
        } else {
            field.ty.accepts(value, self.config.type_match)
        };
        acceptable.then_some(field)
    }

    fn eligible_setter(&self, postfix: &str, value: &Value) -> Option<&'static MethodDesc> {
        let method = self.setter_method(postfix)?;
        self.validator
            .is_valid_setter_method(method, value)
            .then_some(method)
    }

    // ==================== METHOD RESOLUTION ====================

    /// The first `set`- or `append`-prefixed method for this postfix.
    pub fn setter_method(&self, postfix: &str) -> Option<&'static MethodDesc> {
        self.method_with_prefixes(postfix, &["set", "append"])
    }

    /// The `get`-prefixed method for this postfix.
    pub fn getter_method(&self, postfix: &str) -> Option<&'static MethodDesc> {
        self.method_with_prefixes(postfix, &["get"])
    }

    /// The first method matching `prefix + Postfix` for any of the given
    /// prefixes, in order. Matching is name-equivalent, so a `setFoo`
    /// probe resolves a method declared as `set_foo`.
    pub fn method_with_prefixes(
        &self,
        postfix: &str,
        prefixes: &[&str],
    ) -> Option<&'static MethodDesc> {
        let class = self.class();
        for prefix in prefixes {
            let name = format!("{prefix}{}", variants::upper_first(postfix));
            if let Some(method) = class.method(&name) {
                return Some(method);
            }
        }
        None
    }

    /// Invoke a method by name with positional arguments.
    ///
    /// `None` when the method is missing or the arguments fail validation;
    /// the method's return value (Null for void methods) otherwise.
    pub fn invoke_method(&mut self, name: &str, mut args: Vec<Value>) -> Option<Value> {
        let method = self.method_desc(name)?;
        if !self.validator.are_valid_method_arguments(method, &args) {
            return None;
        }
        Some((method.invoke)(self.object.as_any_mut(), &mut args))
    }

    // ==================== EXISTENCE PROBES ====================

    /// Whether a field by this name exists, regardless of eligibility.
    pub fn has_field(&self, name: &str) -> bool {
        self.class().has_field(name)
    }

    /// Whether a method by this name exists, regardless of eligibility.
    pub fn has_method(&self, name: &str) -> bool {
        self.class().has_method(name)
    }

    /// The descriptor of a field by exact name.
    pub fn field_desc(&self, name: &str) -> Option<&'static FieldDesc> {
        self.class().field(name)
    }

    /// The descriptor of a method by (equivalent) name.
    pub fn method_desc(&self, name: &str) -> Option<&'static MethodDesc> {
        self.class().method(name)
    }
}

/// Drive a validated setter: zero-parameter setters are invoked without the
/// value, everything else receives it as the single argument.
fn invoke_setter(method: &MethodDesc, object: &mut dyn std::any::Any, value: Value) -> bool {
    if method.param_count() == 0 {
        (method.invoke)(object, &mut []);
    } else {
        (method.invoke)(object, &mut [value]);
    }
    true
}
