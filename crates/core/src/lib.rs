//! veneer - name-driven dynamic member access
//!
//! This crate bridges loose external naming (form fields, config keys,
//! user-supplied identifiers) to strict member access on plain Rust
//! objects. A wrapped object is read and written by name: lookup expands
//! the name into candidate spellings, tries fields before accessor
//! methods, checks visibility/staticness/type compatibility, and degrades
//! to a soft `None`/`false` when nothing resolves.
//!
//! Rust has no runtime reflection, so introspectable types carry
//! compile-time-generated member tables: `#[derive(Introspect)]` registers
//! a type's fields, `#[introspect]` on an impl block registers its
//! methods, and hand-written tables can be registered for everything else.
//!
//! # Re-exports
//!
//! The macros crate is re-exported here; depending on `veneer-core` is
//! enough to use `#[derive(Introspect)]` and `#[introspect]`.

// Allow the crate to refer to itself as `veneer_core` for proc macro compatibility
extern crate self as veneer_core;

pub mod accessor;
pub mod config;
pub mod describe;
pub mod introspect;
pub mod registry;
pub mod validator;
pub mod value;
pub mod variants;

// Re-export commonly used items
pub use accessor::{AccessError, ObjectAccessor};
pub use config::{AccessorConfig, ConfigError, ConfigResult, TypeMatch};
pub use describe::{
    names_equivalent, ClassDesc, FieldDesc, MethodDesc, Modifiers, ParamSpec, ReturnSpec, TypeSpec,
};
pub use introspect::Introspect;
pub use registry::{cache_size, class_desc, register, MemberTable};
pub use validator::MemberValidator;
pub use value::{Value, ValueKind};
pub use variants::{expand, Variants};

// Re-export macros
pub use veneer_macros::{introspect, Introspect};

// Re-export for macro-generated registrations
pub use inventory;

#[cfg(test)]
mod tests {
    use crate::{introspect, AccessorConfig, Introspect, ObjectAccessor, TypeMatch, Value};

    #[derive(Introspect)]
    struct PlainBox {
        pub foo: i64,
    }

    #[derive(Introspect)]
    struct Counter {
        foo: i64,
        bar: Option<i64>,
    }

    #[introspect]
    impl Counter {
        pub fn get_foo(&self) -> i64 {
            self.foo
        }

        pub fn set_foo(&mut self, foo: i64) {
            self.foo = foo;
        }

        pub fn get_bar(&self) -> Option<i64> {
            self.bar
        }

        pub fn set_bar(&mut self, bar: Option<i64>) {
            self.bar = bar;
        }

        pub fn set_foo_bar(&mut self) {
            self.foo = 1;
            self.bar = Some(2);
        }

        pub fn reset() -> i64 {
            0
        }

        fn internal(&self) -> i64 {
            self.foo
        }
    }

    #[derive(Introspect)]
    #[veneer(fallback_get = "lookup_extra", fallback_set = "store_extra")]
    struct Grab {
        #[veneer(skip)]
        extras: Vec<(String, i64)>,
    }

    impl Grab {
        fn lookup_extra(&self, name: &str) -> Option<Value> {
            self.extras
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, v)| Value::Int(*v))
        }

        fn store_extra(&mut self, name: &str, value: Value) -> bool {
            match value.as_int() {
                Some(v) => {
                    self.extras.push((name.to_string(), v));
                    true
                }
                None => false,
            }
        }
    }

    #[derive(Introspect)]
    struct Meter {
        pub ratio: f64,
    }

    #[derive(Introspect)]
    struct Sealed {
        #[veneer(readonly)]
        pub id: i64,
    }

    #[derive(Introspect)]
    #[veneer(rename = "Translated")]
    struct Translation {
        #[veneer(rename = "name:en")]
        pub name_en: String,
    }

    #[derive(Introspect)]
    struct Holder {
        #[veneer(skip)]
        inner: Option<PlainBox>,
    }

    #[introspect]
    impl Holder {
        pub fn set_inner(&mut self, inner: PlainBox) {
            self.inner = Some(inner);
        }

        pub fn get_inner_foo(&self) -> Option<i64> {
            self.inner.as_ref().map(|b| b.foo)
        }
    }

    #[test]
    fn test_public_field_round_trip() {
        let mut target = PlainBox { foo: 42 };
        let mut facade = ObjectAccessor::new(&mut target);

        assert_eq!(facade.get("foo"), Some(Value::Int(42)));
        assert!(facade.set("foo", Value::Int(23)));
        assert_eq!(facade.get("foo"), Some(Value::Int(23)));
        assert_eq!(target.foo, 23);
    }

    #[test]
    fn test_private_field_via_accessor_methods() {
        let mut target = Counter { foo: 42, bar: None };
        let mut facade = ObjectAccessor::new(&mut target);

        assert_eq!(facade.get("foo"), Some(Value::Int(42)));
        assert!(facade.set("foo", Value::Int(23)));
        assert_eq!(facade.get("foo"), Some(Value::Int(23)));

        // The setter wants a non-null int; null and string both bounce
        // without touching the stored value.
        assert!(!facade.set("foo", Value::Null));
        assert_eq!(facade.get("foo"), Some(Value::Int(23)));
        assert!(!facade.set("foo", Value::from("abc")));
        assert_eq!(facade.get("foo"), Some(Value::Int(23)));
    }

    #[test]
    fn test_nullable_parameter_accepts_null() {
        let mut target = Counter { foo: 0, bar: None };
        let mut facade = ObjectAccessor::new(&mut target);

        assert!(facade.set("bar", Value::Int(1337)));
        assert_eq!(facade.get("bar"), Some(Value::Int(1337)));

        assert!(facade.set("bar", Value::Null));
        assert_eq!(facade.get("bar"), Some(Value::Null));
    }

    #[test]
    fn test_zero_parameter_setter_side_effects() {
        let mut target = Counter { foo: 42, bar: None };
        let mut facade = ObjectAccessor::new(&mut target);

        // No `foobar` member exists; `set_foo_bar` takes no parameters and
        // still resolves, ignoring the supplied value entirely.
        assert!(facade.set("foobar", Value::from("anything")));
        assert_eq!(facade.get("foo"), Some(Value::Int(1)));
        assert_eq!(facade.get("bar"), Some(Value::Int(2)));
    }

    #[test]
    fn test_multiword_name_resolution() {
        let mut target = Counter { foo: 42, bar: None };
        let mut facade = ObjectAccessor::new(&mut target);

        assert!(facade.set("foo bar", Value::from("ignored")));
        assert_eq!(facade.get("foo"), Some(Value::Int(1)));
    }

    #[test]
    fn test_unknown_member_is_soft() {
        let mut target = Counter { foo: 0, bar: None };
        let mut facade = ObjectAccessor::new(&mut target);

        assert_eq!(facade.get("unknown"), None);
        assert!(!facade.set("unknown", Value::Int(1)));
        assert!(!facade.has_field("unknown"));
        assert!(!facade.has_method("unknown"));
    }

    #[test]
    fn test_existence_probes_see_ineligible_members() {
        let mut target = Counter { foo: 0, bar: None };
        let facade = ObjectAccessor::new(&mut target);

        // Private field and method, and a type-level method: all exist.
        assert!(facade.has_field("foo"));
        assert!(facade.has_method("internal"));
        assert!(facade.has_method("reset"));
    }

    #[test]
    fn test_static_and_private_methods_never_eligible() {
        let mut target = Counter { foo: 7, bar: None };
        let mut facade = ObjectAccessor::new(&mut target);

        assert_eq!(facade.invoke_method("reset", vec![]), None);
        assert_eq!(facade.invoke_method("internal", vec![]), None);
        // Eligible method for contrast.
        assert_eq!(facade.invoke_method("get_foo", vec![]), Some(Value::Int(7)));
    }

    #[test]
    fn test_fallback_hooks() {
        let mut target = Grab { extras: vec![] };
        let mut facade = ObjectAccessor::new(&mut target);

        assert_eq!(facade.get("anything"), None);
        assert!(facade.set("anything", Value::Int(5)));
        assert_eq!(facade.get("anything"), Some(Value::Int(5)));
        // The hook declines non-int values.
        assert!(!facade.set("other", Value::from("nope")));
    }

    #[test]
    fn test_type_match_policy() {
        let mut target = Meter { ratio: 0.0 };
        let mut strict = ObjectAccessor::new(&mut target);
        assert!(!strict.set("ratio", Value::Int(2)));
        assert!(strict.set("ratio", Value::Float(2.0)));

        let config = AccessorConfig {
            type_match: TypeMatch::Coercive,
            ..Default::default()
        };
        let mut target = Meter { ratio: 0.0 };
        let mut coercive = ObjectAccessor::with_config(&mut target, config);
        assert!(coercive.set("ratio", Value::Int(2)));
        assert_eq!(coercive.get("ratio"), Some(Value::Float(2.0)));
    }

    #[test]
    fn test_readonly_field() {
        let mut target = Sealed { id: 99 };
        let mut facade = ObjectAccessor::new(&mut target);

        assert_eq!(facade.get("id"), Some(Value::Int(99)));
        assert!(!facade.set("id", Value::Int(1)));
        assert_eq!(target.id, 99);
    }

    #[test]
    fn test_renamed_class_and_member() {
        assert_eq!(Translation::CLASS_NAME, "Translated");

        let mut target = Translation {
            name_en: "Germany".to_string(),
        };
        let mut facade = ObjectAccessor::new(&mut target);

        assert_eq!(facade.class_name(), "Translated");
        assert_eq!(facade.get("name:en"), Some(Value::from("Germany")));
        assert!(facade.set("name:en", Value::from("Allemagne")));
        assert_eq!(target.name_en, "Allemagne");
    }

    #[test]
    fn test_object_valued_parameters() {
        let mut target = Holder { inner: None };
        let mut facade = ObjectAccessor::new(&mut target);

        assert!(facade.set("inner", Value::object(PlainBox { foo: 9 })));
        assert_eq!(facade.get("innerFoo"), Some(Value::Int(9)));

        // Wrong payload kind for the object parameter.
        assert!(!facade.set("inner", Value::Int(1)));
        assert_eq!(facade.get("innerFoo"), Some(Value::Int(9)));
    }

    #[test]
    fn test_wrap_value() {
        let mut boxed = Value::object(PlainBox { foo: 5 });
        let mut facade = ObjectAccessor::wrap(&mut boxed).unwrap();
        assert_eq!(facade.get("foo"), Some(Value::Int(5)));
        assert!(facade.set("foo", Value::Int(6)));
        drop(facade);

        let mut plain = Value::from("not an object");
        assert!(ObjectAccessor::wrap(&mut plain).is_err());
    }

    #[test]
    fn test_get_is_idempotent_for_pure_getters() {
        let mut target = Counter { foo: 11, bar: None };
        let mut facade = ObjectAccessor::new(&mut target);

        assert_eq!(facade.get("foo"), facade.get("foo"));
    }
}
