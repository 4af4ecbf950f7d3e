//! Introspect derive macro implementation

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::DeriveInput;

use crate::parse::{
    classify, conversion_tokens, is_public, parse_introspect, type_spec_tokens, IntrospectArgs,
    IntrospectFieldArgs, ValueCategory,
};

/// Generate the Introspect implementation and the field member table.
pub fn derive_introspect(input: DeriveInput) -> TokenStream {
    match parse_introspect(&input) {
        Ok(args) => generate_impl(args).unwrap_or_else(|e| e.to_compile_error()),
        Err(e) => e.write_errors(),
    }
}

fn generate_impl(args: IntrospectArgs) -> syn::Result<TokenStream> {
    let struct_name = &args.ident;

    if !args.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &args.generics,
            "Introspect cannot be derived for generic types; member tables are per concrete type",
        ));
    }

    let class_name = args
        .rename
        .clone()
        .unwrap_or_else(|| struct_name.to_string());

    let fields = match &args.data {
        darling::ast::Data::Struct(fields) => &fields.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Introspect can only be derived for structs",
            ))
        }
    };

    let mut shims = Vec::new();
    let mut descriptors = Vec::new();
    for field in fields.iter().filter(|f| !f.skip) {
        let (shim, descriptor) = generate_field(struct_name, field)?;
        shims.push(shim);
        descriptors.push(descriptor);
    }
    let field_count = descriptors.len();

    let trait_impl = generate_trait_impl(&args, &class_name);

    Ok(quote! {
        impl #struct_name {
            /// Registered class name
            pub const CLASS_NAME: &'static str = #class_name;
        }

        #trait_impl

        const _: () = {
            #(#shims)*

            static __VENEER_FIELDS: [::veneer_core::describe::FieldDesc; #field_count] =
                [#(#descriptors),*];

            ::veneer_core::inventory::submit! {
                ::veneer_core::registry::MemberTable {
                    class_name: #class_name,
                    type_id: || ::core::any::TypeId::of::<#struct_name>(),
                    fields: &__VENEER_FIELDS,
                    methods: &[],
                }
            }
        };
    })
}

/// Read/write shims plus the descriptor entry for one field.
fn generate_field(
    struct_name: &syn::Ident,
    field: &IntrospectFieldArgs,
) -> syn::Result<(TokenStream, TokenStream)> {
    let field_ident = field.ident.as_ref().expect("named struct field");
    let member_name = field
        .rename
        .clone()
        .unwrap_or_else(|| field_ident.to_string());

    let category = classify(&field.ty)?;
    match &category {
        ValueCategory::Int(_) | ValueCategory::Float(_) | ValueCategory::Bool
        | ValueCategory::Str => {}
        ValueCategory::Option(inner)
            if !matches!(
                inner.as_ref(),
                ValueCategory::Object(_) | ValueCategory::Value
            ) => {}
        _ => {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "field type has no member representation; expose it through methods \
                 or mark it #[veneer(skip)]",
            ))
        }
    }

    let get_shim = format_ident!("__veneer_get_{}", field_ident);
    let set_shim = format_ident!("__veneer_set_{}", field_ident);

    let failure = quote!(return false);
    let conversion = conversion_tokens(&category, quote!(__value), &failure);

    let shims = quote! {
        fn #get_shim(__obj: &dyn ::core::any::Any) -> ::veneer_core::Value {
            match __obj.downcast_ref::<#struct_name>() {
                ::core::option::Option::Some(__o) =>
                    ::veneer_core::Value::from(::core::clone::Clone::clone(&__o.#field_ident)),
                ::core::option::Option::None => ::veneer_core::Value::Null,
            }
        }

        fn #set_shim(__obj: &mut dyn ::core::any::Any, __value: ::veneer_core::Value) -> bool {
            let ::core::option::Option::Some(__o) = __obj.downcast_mut::<#struct_name>() else {
                return false;
            };
            __o.#field_ident = #conversion;
            true
        }
    };

    let mut bits = 0u32;
    if is_public(&field.vis) {
        bits |= 1; // PUBLIC
    }
    if field.readonly {
        bits |= 1 << 2; // READONLY
    }

    let type_spec = type_spec_tokens(&category);
    let nullable = category.is_nullable();

    let descriptor = quote! {
        ::veneer_core::describe::FieldDesc {
            name: #member_name,
            modifiers: ::veneer_core::describe::Modifiers::from_bits_retain(#bits),
            ty: #type_spec,
            nullable: #nullable,
            get: #get_shim,
            set: #set_shim,
        }
    };

    Ok((shims, descriptor))
}

fn generate_trait_impl(args: &IntrospectArgs, class_name: &str) -> TokenStream {
    let struct_name = &args.ident;
    let expect_message = format!("no registered members for {class_name}");

    let dynamic_get = args.fallback_get.as_ref().map(|hook| {
        quote! {
            fn dynamic_get(&self, name: &str) -> ::core::option::Option<::veneer_core::Value> {
                Self::#hook(self, name)
            }
        }
    });

    let dynamic_set = args.fallback_set.as_ref().map(|hook| {
        quote! {
            fn dynamic_set(&mut self, name: &str, value: ::veneer_core::Value) -> bool {
                Self::#hook(self, name, value)
            }
        }
    });

    quote! {
        impl ::veneer_core::Introspect for #struct_name {
            fn class_name(&self) -> &'static str {
                #class_name
            }

            fn class_desc(&self) -> &'static ::veneer_core::describe::ClassDesc {
                ::veneer_core::registry::class_desc(::core::any::TypeId::of::<#struct_name>())
                    .expect(#expect_message)
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::core::any::Any> {
                self
            }

            #dynamic_get
            #dynamic_set
        }
    }
}
