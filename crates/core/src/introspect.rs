//! The introspection trait
//!
//! `Introspect` is the common interface of every type the accessor can
//! wrap. It is normally implemented by `#[derive(Introspect)]`, which also
//! submits the type's member table to the registry; methods are added by
//! annotating impl blocks with `#[introspect]`.
//!
//! # Example
//!
//! ```ignore
//! use veneer_core::{introspect, Introspect};
//!
//! #[derive(Introspect)]
//! pub struct Country {
//!     pub iso_code: String,
//!     population: i64,
//! }
//!
//! #[introspect]
//! impl Country {
//!     pub fn population(&self) -> i64 {
//!         self.population
//!     }
//!
//!     pub fn set_population(&mut self, population: i64) {
//!         self.population = population;
//!     }
//! }
//! ```

use std::any::Any;

use crate::describe::ClassDesc;
use crate::value::Value;

/// An introspectable object: it knows its class descriptor and can be
/// type-erased for shim access.
pub trait Introspect: Any {
    /// The registered class name.
    fn class_name(&self) -> &'static str;

    /// The merged member table for this type.
    fn class_desc(&self) -> &'static ClassDesc;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Fallback read hook, consulted only after static member lookup is
    /// exhausted. `None` means the name is unhandled.
    ///
    /// Wire it up with `#[veneer(fallback_get = "method_name")]` on the
    /// derive, or override when implementing the trait by hand.
    fn dynamic_get(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }

    /// Fallback write hook, consulted only after static member lookup is
    /// exhausted. `false` means the name is unhandled.
    fn dynamic_set(&mut self, name: &str, value: Value) -> bool {
        let _ = (name, value);
        false
    }
}
