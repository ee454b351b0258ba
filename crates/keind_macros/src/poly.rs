use proc_macro2::Span;
use proc_macro2::TokenStream;
use proc_macro_crate::FoundCrate;
use proc_macro_crate::crate_name;
use quote::quote;
use syn::Data;
use syn::DeriveInput;
use syn::Fields;
use syn::Ident;
use syn::Type;

/// A single `Name(Type)` variant of a wrapper enum.
pub struct Variant<'a> {
    pub name: &'a Ident,
    pub ty: &'a Type,
}

/// Collect the variants of a wrapper enum, each of which must hold exactly
/// one unnamed field.
pub fn wrapper_variants<'a>(input: &'a DeriveInput, derive: &str) -> syn::Result<Vec<Variant<'a>>> {
    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            format!("{derive} can only be derived for enums"),
        ));
    };
    if data_enum.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            format!("{derive} needs at least one variant"),
        ));
    }
    data_enum
        .variants
        .iter()
        .map(|variant| match &variant.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => Ok(Variant {
                name: &variant.ident,
                ty: &fields.unnamed[0].ty,
            }),
            _ => Err(syn::Error::new_spanned(
                variant,
                "each variant must have exactly one unnamed field",
            )),
        })
        .collect()
}

/// Path to the keind crate as seen from the crate being expanded.
pub fn keind_path() -> TokenStream {
    match crate_name("keind") {
        Ok(FoundCrate::Itself) => quote! { crate },
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote! { ::#ident }
        }
        Err(_) => quote! { ::keind },
    }
}

/// `KPoly` for the wrapper plus a `From` impl for every wrapped type.
pub fn kpoly_impl(keind: &TokenStream, wrapper: &Ident, variants: &[Variant]) -> TokenStream {
    let names = variants.iter().map(|v| v.name).collect::<Vec<_>>();
    let types = variants.iter().map(|v| v.ty).collect::<Vec<_>>();
    quote! {
        impl #keind::prelude::KPoly for #wrapper {
            fn type_id(&self) -> ::std::any::TypeId {
                match self {
                    #( #wrapper::#names(_) => ::std::any::TypeId::of::<#types>(), )*
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                match self {
                    #( #wrapper::#names(inner) => inner, )*
                }
            }

            fn extract_ref<T: 'static>(&self) -> ::std::option::Option<&T> {
                self.as_any().downcast_ref::<T>()
            }

            fn extract_mut<T: 'static>(&mut self) -> ::std::option::Option<&mut T> {
                let inner: &mut dyn ::std::any::Any = match self {
                    #( #wrapper::#names(inner) => inner, )*
                };
                inner.downcast_mut::<T>()
            }
        }

        #(
            impl ::std::convert::From<#types> for #wrapper {
                fn from(value: #types) -> Self {
                    #wrapper::#names(value)
                }
            }
        )*
    }
}
