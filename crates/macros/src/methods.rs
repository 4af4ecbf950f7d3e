//! #[introspect] impl-block attribute implementation
//!
//! Walks an inherent impl block and submits a method member table for the
//! self type: one descriptor per method, with parameter and return specs
//! read off the Rust signature and an invocation shim that adapts dynamic
//! `Value` arguments to the concrete call.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl, Pat, ReturnType, Type};

use crate::parse::{
    classify, conversion_tokens, is_public, to_value_tokens, type_spec_tokens, ValueCategory,
};

/// Expand the attribute: the impl block unchanged (minus marker attributes)
/// plus the generated member table.
pub fn expand_introspect_impl(mut item: ItemImpl) -> TokenStream {
    match generate(&mut item) {
        Ok(generated) => quote! {
            #item
            #generated
        },
        Err(e) => {
            let error = e.to_compile_error();
            quote! {
                #item
                #error
            }
        }
    }
}

fn generate(item: &mut ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[introspect] only supports inherent impl blocks",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[introspect] cannot register generic impl blocks",
        ));
    }

    let self_ty = item.self_ty.clone();
    let class_name = match self_ty.as_ref() {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .ok_or_else(|| syn::Error::new_spanned(&self_ty, "unsupported self type"))?,
        _ => {
            return Err(syn::Error::new_spanned(
                &self_ty,
                "#[introspect] requires a plain type path",
            ))
        }
    };

    let mut shims = Vec::new();
    let mut descriptors = Vec::new();

    for entry in &mut item.items {
        let ImplItem::Fn(method) = entry else {
            continue;
        };
        if strip_skip_marker(method)? {
            continue;
        }
        let (shim, descriptor) = generate_method(&self_ty, method)?;
        shims.push(shim);
        descriptors.push(descriptor);
    }

    let method_count = descriptors.len();

    Ok(quote! {
        const _: () = {
            #(#shims)*

            static __VENEER_METHODS: [::veneer_core::describe::MethodDesc; #method_count] =
                [#(#descriptors),*];

            ::veneer_core::inventory::submit! {
                ::veneer_core::registry::MemberTable {
                    class_name: #class_name,
                    type_id: || ::core::any::TypeId::of::<#self_ty>(),
                    fields: &[],
                    methods: &__VENEER_METHODS,
                }
            }
        };
    })
}

/// Pull `#[veneer(skip)]` off a method, reporting whether it was there.
fn strip_skip_marker(method: &mut ImplItemFn) -> syn::Result<bool> {
    let mut skip = false;
    let mut error = None;

    method.attrs.retain(|attr| {
        if !attr.path().is_ident("veneer") {
            return true;
        }
        let result = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown attribute; only #[veneer(skip)] applies to methods"))
            }
        });
        if let Err(e) = result {
            error = Some(e);
        }
        false
    });

    match error {
        Some(e) => Err(e),
        None => Ok(skip),
    }
}

fn generate_method(
    self_ty: &Type,
    method: &ImplItemFn,
) -> syn::Result<(TokenStream, TokenStream)> {
    let sig = &method.sig;
    let method_ident = &sig.ident;

    if sig.asyncness.is_some() || sig.unsafety.is_some() || sig.abi.is_some() {
        return Err(syn::Error::new_spanned(
            sig,
            "async/unsafe/extern methods cannot be registered; mark #[veneer(skip)]",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "generic methods cannot be registered; mark #[veneer(skip)]",
        ));
    }

    let receiver = match sig.inputs.first() {
        Some(FnArg::Receiver(receiver)) => {
            if receiver.reference.is_none() {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "by-value self cannot be invoked through a borrowed target; \
                     mark #[veneer(skip)]",
                ));
            }
            true
        }
        _ => false,
    };

    let failure = quote!(return ::veneer_core::Value::Null);
    let mut param_specs = Vec::new();
    let mut conversions = Vec::new();
    let mut call_args = Vec::new();

    for (index, input) in sig.inputs.iter().filter_map(as_typed).enumerate() {
        let category = classify(input.ty.as_ref())?;
        let param_name = match input.pat.as_ref() {
            Pat::Ident(pat) => pat.ident.to_string(),
            _ => format!("arg{index}"),
        };

        let type_spec = type_spec_tokens(&category);
        let nullable = category.is_nullable();
        param_specs.push(quote! {
            ::veneer_core::describe::ParamSpec {
                name: #param_name,
                ty: #type_spec,
                nullable: #nullable,
                has_default: false,
            }
        });

        let binding = format_ident!("__a{}", index);
        let taken = quote! {
            __args.get_mut(#index).map(::core::mem::take)
                .unwrap_or(::veneer_core::Value::Null)
        };
        let conversion = conversion_tokens(&category, taken, &failure);
        conversions.push(quote! {
            let #binding = #conversion;
        });
        call_args.push(if matches!(category, ValueCategory::StrRef) {
            quote!(&#binding)
        } else {
            quote!(#binding)
        });
    }

    let return_category = match &sig.output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::Tuple(tuple) if tuple.elems.is_empty() => None,
            _ => Some(classify(ty)?),
        },
    };

    let call = if receiver {
        quote!(__obj.#method_ident(#(#call_args),*))
    } else {
        quote!(<#self_ty>::#method_ident(#(#call_args),*))
    };

    let body = match &return_category {
        Some(category) => {
            let value = to_value_tokens(category, quote!(__ret));
            quote! {
                let __ret = #call;
                #value
            }
        }
        None => quote! {
            #call;
            ::veneer_core::Value::Null
        },
    };

    let downcast = if receiver {
        quote! {
            let ::core::option::Option::Some(__obj) = __obj.downcast_mut::<#self_ty>() else {
                return ::veneer_core::Value::Null;
            };
        }
    } else {
        quote!(let _ = __obj;)
    };

    let shim_ident = format_ident!("__veneer_invoke_{}", method_ident);
    let params_ident = format_ident!("__VENEER_PARAMS_{}", method_ident.to_string().to_uppercase());
    let param_count = param_specs.len();
    let shim = quote! {
        static #params_ident: [::veneer_core::describe::ParamSpec; #param_count] =
            [#(#param_specs),*];

        fn #shim_ident(
            __obj: &mut dyn ::core::any::Any,
            __args: &mut [::veneer_core::Value],
        ) -> ::veneer_core::Value {
            #downcast
            #(#conversions)*
            #body
        }
    };

    let mut bits = 0u32;
    if is_public(&method.vis) {
        bits |= 1; // PUBLIC
    }
    if !receiver {
        bits |= 1 << 1; // STATIC
    }

    let method_name = method_ident.to_string();
    let return_spec = match &return_category {
        Some(category) => {
            let type_spec = type_spec_tokens(category);
            let nullable = category.is_nullable();
            quote! {
                ::core::option::Option::Some(::veneer_core::describe::ReturnSpec {
                    ty: #type_spec,
                    nullable: #nullable,
                })
            }
        }
        None => quote!(::core::option::Option::None),
    };

    let descriptor = quote! {
        ::veneer_core::describe::MethodDesc {
            name: #method_name,
            modifiers: ::veneer_core::describe::Modifiers::from_bits_retain(#bits),
            params: &#params_ident,
            ret: #return_spec,
            invoke: #shim_ident,
        }
    };

    Ok((shim, descriptor))
}

fn as_typed(input: &FnArg) -> Option<&syn::PatType> {
    match input {
        FnArg::Typed(typed) => Some(typed),
        FnArg::Receiver(_) => None,
    }
}
