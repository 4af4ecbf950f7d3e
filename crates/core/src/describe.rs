//! Member descriptors
//!
//! Rust has no runtime reflection, so every introspectable type carries a
//! compile-time-generated table describing its accessible members. The
//! descriptors here are that table's rows: fields and methods with their
//! modifiers, declared types, and the fn-pointer shims that perform the
//! actual reads, writes and invocations against a type-erased object.
//!
//! Descriptors are plain const-constructible data; the proc macros emit them
//! into statics and the registry merges them into one [`ClassDesc`] per type.

use std::any::TypeId;

use bitflags::bitflags;

use crate::config::TypeMatch;
use crate::value::Value;

bitflags! {
    /// Modifier mask of a member, in the style of reflection APIs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers: u32 {
        /// Externally accessible (`pub`).
        const PUBLIC = 1;
        /// Type-level member; not reachable through an instance.
        const STATIC = 1 << 1;
        /// Readable but never writable through the accessor.
        const READONLY = 1 << 2;
    }
}

impl Modifiers {
    pub fn is_public(self) -> bool {
        self.contains(Modifiers::PUBLIC)
    }

    pub fn is_static(self) -> bool {
        self.contains(Modifiers::STATIC)
    }

    pub fn is_readonly(self) -> bool {
        self.contains(Modifiers::READONLY)
    }
}

/// Declared type of a field, parameter or return value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeSpec {
    /// Undeclared; accepts anything.
    Any,
    Bool,
    Int,
    Float,
    Str,
    /// A concrete introspectable type. The id is behind a fn pointer so the
    /// variant stays const-constructible in generated statics.
    Object {
        class_name: &'static str,
        type_id: fn() -> TypeId,
    },
}

impl TypeSpec {
    /// Whether a runtime value satisfies this declared type.
    ///
    /// Null never satisfies a concrete spec; nullability is a property of
    /// the use site ([`ParamSpec::nullable`] / [`ReturnSpec::nullable`]) and
    /// is checked there.
    pub fn accepts(&self, value: &Value, mode: TypeMatch) -> bool {
        match self {
            TypeSpec::Any => true,
            TypeSpec::Bool => match value {
                Value::Bool(_) => true,
                Value::Int(_) => mode == TypeMatch::Coercive,
                _ => false,
            },
            TypeSpec::Int => match value {
                Value::Int(_) => true,
                Value::Bool(_) => mode == TypeMatch::Coercive,
                _ => false,
            },
            TypeSpec::Float => match value {
                Value::Float(_) => true,
                Value::Int(_) => mode == TypeMatch::Coercive,
                _ => false,
            },
            TypeSpec::Str => matches!(value, Value::Str(_)),
            TypeSpec::Object { type_id, .. } => value
                .as_object()
                .is_some_and(|o| o.as_any().type_id() == type_id()),
        }
    }

    /// Display name of the declared type.
    pub fn name(&self) -> &'static str {
        match self {
            TypeSpec::Any => "any",
            TypeSpec::Bool => "bool",
            TypeSpec::Int => "int",
            TypeSpec::Float => "float",
            TypeSpec::Str => "string",
            TypeSpec::Object { class_name, .. } => *class_name,
        }
    }
}

/// One declared parameter of a method.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub ty: TypeSpec,
    /// Null is an acceptable argument for this parameter.
    pub nullable: bool,
    /// The parameter has a default and may be omitted. Generated tables
    /// never set this; hand-written tables may.
    pub has_default: bool,
}

/// Declared return of a method. Absent entirely when the method declares
/// no return type.
#[derive(Debug, Clone, Copy)]
pub struct ReturnSpec {
    pub ty: TypeSpec,
    pub nullable: bool,
}

/// Descriptor of one field, with its read/write shims.
#[derive(Clone, Copy)]
pub struct FieldDesc {
    pub name: &'static str,
    pub modifiers: Modifiers,
    pub ty: TypeSpec,
    /// Null is a legal stored value (the field is an `Option`).
    pub nullable: bool,
    pub get: fn(&dyn std::any::Any) -> Value,
    pub set: fn(&mut dyn std::any::Any, Value) -> bool,
}

impl std::fmt::Debug for FieldDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDesc")
            .field("name", &self.name)
            .field("modifiers", &self.modifiers)
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// Descriptor of one method, with its invocation shim.
#[derive(Clone, Copy)]
pub struct MethodDesc {
    pub name: &'static str,
    pub modifiers: Modifiers,
    pub params: &'static [ParamSpec],
    pub ret: Option<ReturnSpec>,
    /// Type-erased invocation. Arguments are consumed positionally; the
    /// shim returns [`Value::Null`] for methods without a return value.
    pub invoke: fn(&mut dyn std::any::Any, &mut [Value]) -> Value,
}

impl MethodDesc {
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Number of parameters a caller must supply.
    pub fn required_param_count(&self) -> usize {
        self.params.iter().filter(|p| !p.has_default).count()
    }
}

impl std::fmt::Debug for MethodDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodDesc")
            .field("name", &self.name)
            .field("modifiers", &self.modifiers)
            .field("params", &self.params)
            .field("ret", &self.ret)
            .finish()
    }
}

/// The merged member table of one type.
#[derive(Debug)]
pub struct ClassDesc {
    pub class_name: &'static str,
    pub type_id: TypeId,
    pub fields: Vec<FieldDesc>,
    pub methods: Vec<MethodDesc>,
}

impl ClassDesc {
    /// Field lookup; exact name match only.
    pub fn field(&self, name: &str) -> Option<&FieldDesc> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Method lookup; exact name match first, then name equivalence, so
    /// `setFoo` resolves a method declared as `set_foo` and vice versa.
    pub fn method(&self, name: &str) -> Option<&MethodDesc> {
        self.methods
            .iter()
            .find(|m| m.name == name)
            .or_else(|| self.methods.iter().find(|m| names_equivalent(m.name, name)))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }
}

/// Case- and separator-insensitive name comparison: `setFooBar`,
/// `set_foo_bar` and `SETFOOBAR` are all equivalent.
pub fn names_equivalent(a: &str, b: &str) -> bool {
    let mut a = a.chars().filter(|c| !matches!(c, '_' | '-'));
    let mut b = b.chars().filter(|c| !matches!(c, '_' | '-'));
    loop {
        match (a.next(), b.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) => {
                if !x.eq_ignore_ascii_case(&y) {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
