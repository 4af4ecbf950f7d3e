//! veneer Proc Macros
//!
//! This crate provides the proc macros for the veneer member registration
//! tables:
//!
//! - `#[derive(Introspect)]` - Implement the introspection trait and submit
//!   the type's field table
//! - `#[introspect]` - Submit the method table of an inherent impl block
//!
//! # Derive Example
//!
//! ```ignore
//! use veneer_core::{introspect, Introspect};
//!
//! #[derive(Introspect)]
//! pub struct Country {
//!     pub iso_code: String,
//!
//!     population: i64,
//!
//!     #[veneer(skip)]
//!     dirty: bool,
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
//!
//! // Generated registrations allow name-driven access:
//! // - accessor.get("isoCode") reads the public field
//! // - accessor.set("population", Value::Int(83))
//! //   resolves to set_population
//! ```
//!
//! # Attributes
//!
//! ## Struct Attributes (Introspect)
//!
//! - `#[veneer(rename = "Name")]` - Registered class name (defaults to
//!   the struct identifier).
//! - `#[veneer(fallback_get = "method")]` - Wire the dynamic get hook to
//!   a method `fn(&self, &str) -> Option<Value>`.
//! - `#[veneer(fallback_set = "method")]` - Wire the dynamic set hook to
//!   a method `fn(&mut self, &str, Value) -> bool`.
//!
//! ## Field Attributes (Introspect)
//!
//! - `#[veneer(skip)]` - Leave the field out of the member table.
//! - `#[veneer(rename = "name")]` - Registered member name.
//! - `#[veneer(readonly)]` - Readable but never writable.
//!
//! ## Method Attributes (#[introspect] impl blocks)
//!
//! - `#[veneer(skip)]` - Leave the method out of the member table.
//!   Required for generic, async, unsafe and by-value-self methods.

mod derive_introspect;
mod methods;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemImpl};

/// Derive macro implementing the introspection trait and registering the
/// type's fields.
///
/// Every named field that is not `#[veneer(skip)]`ped becomes a member
/// table entry with read/write shims. Non-`pub` fields are registered too;
/// they answer existence probes but fail the eligibility checks, exactly
/// like their `pub` siblings answer both.
///
/// # Supported field types
///
/// Integers, floats, `bool`, `String`, and `Option` of those. Anything else
/// must be skipped and exposed through methods instead.
#[proc_macro_derive(Introspect, attributes(veneer))]
pub fn derive_introspect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_introspect::derive_introspect(input).into()
}

/// Attribute macro registering the methods of an inherent impl block.
///
/// Parameter and return specs are read off each signature: `Option<T>`
/// parameters accept null, a `Value` parameter accepts anything, and any
/// other path type is treated as a registered introspectable object.
/// Methods without a receiver register as type-level members, non-`pub`
/// methods as inaccessible ones; both answer existence probes and fail
/// eligibility, matching field behavior.
#[proc_macro_attribute]
pub fn introspect(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[introspect] takes no arguments on impl blocks",
        )
        .to_compile_error()
        .into();
    }
    let item = parse_macro_input!(item as ItemImpl);
    methods::expand_introspect_impl(item).into()
}
