//! Attribute and type parsing shared by the veneer macros

use darling::{FromDeriveInput, FromField};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, Ident, PathArguments, Type, Visibility};

/// Parsed #[veneer(...)] attributes on the struct
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(veneer), supports(struct_named))]
pub struct IntrospectArgs {
    /// Struct identifier
    pub ident: Ident,

    /// Struct generics (rejected; descriptor tables are per concrete type)
    pub generics: syn::Generics,

    /// Struct fields
    pub data: darling::ast::Data<(), IntrospectFieldArgs>,

    /// Registered class name (defaults to the struct identifier)
    #[darling(default)]
    pub rename: Option<String>,

    /// Method wired into the dynamic get hook: `fn(&self, &str) -> Option<Value>`
    #[darling(default)]
    pub fallback_get: Option<Ident>,

    /// Method wired into the dynamic set hook: `fn(&mut self, &str, Value) -> bool`
    #[darling(default)]
    pub fallback_set: Option<Ident>,
}

/// Parsed #[veneer(...)] attributes on a field
#[derive(Debug, FromField)]
#[darling(attributes(veneer))]
pub struct IntrospectFieldArgs {
    /// Field identifier
    pub ident: Option<Ident>,

    /// Field type
    pub ty: Type,

    /// Field visibility
    pub vis: Visibility,

    /// Leave this field out of the member table
    #[darling(default)]
    pub skip: bool,

    /// Registered member name (defaults to the field identifier)
    #[darling(default)]
    pub rename: Option<String>,

    /// Readable but never writable through the accessor
    #[darling(default)]
    pub readonly: bool,
}

/// Parse a DeriveInput into IntrospectArgs
pub fn parse_introspect(input: &syn::DeriveInput) -> darling::Result<IntrospectArgs> {
    IntrospectArgs::from_derive_input(input)
}

/// How a Rust type maps onto the runtime value model.
#[derive(Debug, Clone)]
pub enum ValueCategory {
    /// An integer type; carries the concrete type for narrowing conversion.
    Int(Type),
    /// f32 or f64; true when f32.
    Float(bool),
    Bool,
    /// Owned `String`.
    Str,
    /// Borrowed `&str`; shims materialize an owned String and pass a borrow.
    StrRef,
    /// The dynamic `Value` type itself; undeclared, accepts anything.
    Value,
    /// `Option<inner>`; null is acceptable.
    Option(Box<ValueCategory>),
    /// Any other path type; treated as a registered introspectable object.
    Object(Type),
}

impl ValueCategory {
    pub fn is_nullable(&self) -> bool {
        matches!(self, ValueCategory::Option(_) | ValueCategory::Value)
    }
}

/// Classify a Rust type into its value category.
pub fn classify(ty: &Type) -> syn::Result<ValueCategory> {
    match ty {
        Type::Reference(r) => {
            if r.mutability.is_none() && matches!(&*r.elem, Type::Path(p) if p.path.is_ident("str"))
            {
                Ok(ValueCategory::StrRef)
            } else {
                Err(syn::Error::new_spanned(
                    ty,
                    "reference types other than &str are not supported here",
                ))
            }
        }
        Type::Path(path) => {
            let segment = path
                .path
                .segments
                .last()
                .ok_or_else(|| syn::Error::new_spanned(ty, "unsupported type"))?;
            let ident = segment.ident.to_string();
            match ident.as_str() {
                "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "usize"
                | "isize" => Ok(ValueCategory::Int(ty.clone())),
                "f32" => Ok(ValueCategory::Float(true)),
                "f64" => Ok(ValueCategory::Float(false)),
                "bool" => Ok(ValueCategory::Bool),
                "String" => Ok(ValueCategory::Str),
                "Value" => Ok(ValueCategory::Value),
                "Option" => {
                    let inner = option_inner(segment).ok_or_else(|| {
                        syn::Error::new_spanned(ty, "Option must have one type argument")
                    })?;
                    let inner = classify(inner)?;
                    if matches!(inner, ValueCategory::Option(_) | ValueCategory::StrRef) {
                        return Err(syn::Error::new_spanned(
                            ty,
                            "nested Option and Option<&str> are not supported here",
                        ));
                    }
                    Ok(ValueCategory::Option(Box::new(inner)))
                }
                _ => Ok(ValueCategory::Object(ty.clone())),
            }
        }
        _ => Err(syn::Error::new_spanned(ty, "unsupported type")),
    }
}

fn option_inner(segment: &syn::PathSegment) -> Option<&Type> {
    if let PathArguments::AngleBracketed(args) = &segment.arguments {
        if let Some(GenericArgument::Type(inner)) = args.args.first() {
            return Some(inner);
        }
    }
    None
}

/// Tokens for the `TypeSpec` describing this category.
///
/// Option and Value describe their payload type; nullability is carried
/// separately on the param/return spec.
pub fn type_spec_tokens(category: &ValueCategory) -> TokenStream {
    match category {
        ValueCategory::Int(_) => quote!(::veneer_core::describe::TypeSpec::Int),
        ValueCategory::Float(_) => quote!(::veneer_core::describe::TypeSpec::Float),
        ValueCategory::Bool => quote!(::veneer_core::describe::TypeSpec::Bool),
        ValueCategory::Str | ValueCategory::StrRef => {
            quote!(::veneer_core::describe::TypeSpec::Str)
        }
        ValueCategory::Value => quote!(::veneer_core::describe::TypeSpec::Any),
        ValueCategory::Option(inner) => type_spec_tokens(inner),
        ValueCategory::Object(ty) => {
            let name = object_class_name(ty);
            quote!(::veneer_core::describe::TypeSpec::Object {
                class_name: #name,
                type_id: || ::core::any::TypeId::of::<#ty>(),
            })
        }
    }
}

fn object_class_name(ty: &Type) -> String {
    if let Type::Path(path) = ty {
        if let Some(segment) = path.path.segments.last() {
            return segment.ident.to_string();
        }
    }
    quote!(#ty).to_string()
}

/// Tokens converting an owned `Value` in `#value` into the concrete type of
/// `category`, evaluating `#failure` when the value does not fit.
pub fn conversion_tokens(
    category: &ValueCategory,
    value: TokenStream,
    failure: &TokenStream,
) -> TokenStream {
    match category {
        ValueCategory::Int(ty) => quote! {
            match #value.into_int().and_then(|__i| <#ty as ::core::convert::TryFrom<i64>>::try_from(__i).ok()) {
                ::core::option::Option::Some(__i) => __i,
                ::core::option::Option::None => #failure,
            }
        },
        ValueCategory::Float(narrow) => {
            let cast = if *narrow { quote!(__f as f32) } else { quote!(__f) };
            quote! {
                match #value.into_float() {
                    ::core::option::Option::Some(__f) => #cast,
                    ::core::option::Option::None => #failure,
                }
            }
        }
        ValueCategory::Bool => quote! {
            match #value.into_bool() {
                ::core::option::Option::Some(__b) => __b,
                ::core::option::Option::None => #failure,
            }
        },
        ValueCategory::Str | ValueCategory::StrRef => quote! {
            match #value.into_string() {
                ::core::option::Option::Some(__s) => __s,
                ::core::option::Option::None => #failure,
            }
        },
        ValueCategory::Value => quote!(#value),
        ValueCategory::Option(inner) => {
            let inner_conversion = conversion_tokens(inner, quote!(__inner), failure);
            quote! {
                {
                    let __inner = #value;
                    if __inner.is_null() {
                        ::core::option::Option::None
                    } else {
                        ::core::option::Option::Some(#inner_conversion)
                    }
                }
            }
        }
        ValueCategory::Object(ty) => quote! {
            match #value.into_object::<#ty>() {
                ::core::option::Option::Some(__o) => __o,
                ::core::option::Option::None => #failure,
            }
        },
    }
}

/// Tokens turning an expression of this category into a `Value`.
pub fn to_value_tokens(category: &ValueCategory, expr: TokenStream) -> TokenStream {
    match category {
        ValueCategory::Value => expr,
        ValueCategory::Object(_) => quote!(::veneer_core::Value::object(#expr)),
        ValueCategory::Option(inner) => match inner.as_ref() {
            ValueCategory::Object(_) => {
                let some = to_value_tokens(inner, quote!(__r));
                quote! {
                    match #expr {
                        ::core::option::Option::Some(__r) => #some,
                        ::core::option::Option::None => ::veneer_core::Value::Null,
                    }
                }
            }
            _ => quote!(::veneer_core::Value::from(#expr)),
        },
        _ => quote!(::veneer_core::Value::from(#expr)),
    }
}

/// Whether a visibility is externally accessible.
pub fn is_public(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}
