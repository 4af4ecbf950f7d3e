//! Class registry
//!
//! Member tables are emitted in pieces: the derive macro submits a type's
//! fields, each annotated impl block submits its methods, and hosts may
//! [`register`] hand-written tables for types the macros cannot reach. This
//! module collects the pieces at link time (`inventory`) and merges them
//! into one [`ClassDesc`] per type on first lookup.
//!
//! Merged descriptors are cached and never rebuilt: a `&'static ClassDesc`
//! handed out once stays valid and unchanged for the life of the process.

use std::any::TypeId;
use std::sync::LazyLock;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::describe::{ClassDesc, FieldDesc, MethodDesc};

/// One submission unit of member descriptors for a type.
///
/// The type id sits behind a fn pointer so tables stay const-constructible
/// in the statics the macros generate.
pub struct MemberTable {
    pub class_name: &'static str,
    pub type_id: fn() -> TypeId,
    pub fields: &'static [FieldDesc],
    pub methods: &'static [MethodDesc],
}

inventory::collect!(MemberTable);

/// Tables registered at runtime, for types without macro-generated tables.
static MANUAL_TABLES: RwLock<Vec<&'static MemberTable>> = RwLock::new(Vec::new());

/// Merged descriptors, built on first lookup per type.
static CLASSES: LazyLock<DashMap<TypeId, &'static ClassDesc>> = LazyLock::new(DashMap::new);

/// Register a hand-written member table.
///
/// Must happen before the first lookup of that type; a table registered
/// after its class descriptor has been built is ignored.
pub fn register(table: &'static MemberTable) {
    let type_id = (table.type_id)();
    if CLASSES.contains_key(&type_id) {
        warn!(
            "member table for {} registered after its class was built; ignored",
            table.class_name
        );
        return;
    }
    let mut manual = MANUAL_TABLES.write();
    if manual.iter().any(|t| std::ptr::eq(*t, table)) {
        return;
    }
    manual.push(table);
}

/// The merged class descriptor for a type, if any table mentions it.
pub fn class_desc(type_id: TypeId) -> Option<&'static ClassDesc> {
    if let Some(desc) = CLASSES.get(&type_id) {
        return Some(*desc);
    }
    build_class(type_id)
}

/// Number of class descriptors built so far.
pub fn cache_size() -> usize {
    CLASSES.len()
}

fn build_class(type_id: TypeId) -> Option<&'static ClassDesc> {
    let mut class_name: Option<&'static str> = None;
    let mut fields: Vec<FieldDesc> = Vec::new();
    let mut methods: Vec<MethodDesc> = Vec::new();
    let mut merged = 0usize;

    let mut merge = |table: &MemberTable| {
        if (table.type_id)() != type_id {
            return;
        }
        merged += 1;
        // A field-bearing table comes from the type's own derive and owns
        // the canonical class name; method-only tables may carry a stale
        // spelling of it.
        if class_name.is_none() || !table.fields.is_empty() {
            class_name = Some(table.class_name);
        }
        fields.extend_from_slice(table.fields);
        methods.extend_from_slice(table.methods);
    };

    for table in inventory::iter::<MemberTable> {
        merge(table);
    }
    for table in MANUAL_TABLES.read().iter() {
        merge(table);
    }

    let class_name = class_name?;

    debug!(
        "built class descriptor for {}: {} fields, {} methods ({} tables)",
        class_name,
        fields.len(),
        methods.len(),
        merged
    );

    let desc: &'static ClassDesc = Box::leak(Box::new(ClassDesc {
        class_name,
        type_id,
        fields,
        methods,
    }));

    // First insert wins if two threads raced the build; the loser's copy is
    // identical and simply leaks.
    Some(*CLASSES.entry(type_id).or_insert(desc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::{Modifiers, TypeSpec};
    use crate::value::Value;

    struct Handmade {
        score: i64,
    }

    fn handmade_type_id() -> TypeId {
        TypeId::of::<Handmade>()
    }

    fn get_score(obj: &dyn std::any::Any) -> Value {
        match obj.downcast_ref::<Handmade>() {
            Some(o) => Value::from(o.score),
            None => Value::Null,
        }
    }

    fn set_score(obj: &mut dyn std::any::Any, value: Value) -> bool {
        let Some(o) = obj.downcast_mut::<Handmade>() else {
            return false;
        };
        match value.into_int() {
            Some(v) => {
                o.score = v;
                true
            }
            None => false,
        }
    }

    static HANDMADE_FIELDS: [FieldDesc; 1] = [FieldDesc {
        name: "score",
        modifiers: Modifiers::PUBLIC,
        ty: TypeSpec::Int,
        nullable: false,
        get: get_score,
        set: set_score,
    }];

    static HANDMADE_TABLE: MemberTable = MemberTable {
        class_name: "Handmade",
        type_id: handmade_type_id,
        fields: &HANDMADE_FIELDS,
        methods: &[],
    };

    #[test]
    fn test_manual_registration_and_lookup() {
        register(&HANDMADE_TABLE);

        let desc = class_desc(TypeId::of::<Handmade>()).expect("registered class resolves");
        assert_eq!(desc.class_name, "Handmade");
        assert!(desc.has_field("score"));
        assert!(!desc.has_method("score"));

        let mut target = Handmade { score: 9 };
        let field = desc.field("score").unwrap();
        assert_eq!((field.get)(&target), Value::Int(9));
        assert!((field.set)(&mut target, Value::Int(11)));
        assert_eq!(target.score, 11);
    }

    #[test]
    fn test_unknown_type_resolves_to_none() {
        struct Unregistered;
        assert!(class_desc(TypeId::of::<Unregistered>()).is_none());
    }

    #[test]
    fn test_descriptor_is_stable() {
        register(&HANDMADE_TABLE);
        let a = class_desc(TypeId::of::<Handmade>()).unwrap() as *const ClassDesc;
        let b = class_desc(TypeId::of::<Handmade>()).unwrap() as *const ClassDesc;
        assert_eq!(a, b);
    }
}
