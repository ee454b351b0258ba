use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::poly::keind_path;
use crate::poly::kpoly_impl;
use crate::poly::wrapper_variants;

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let wrapper = &input.ident;
    let variants = wrapper_variants(input, "EngineEntity")?;
    let keind = keind_path();
    let poly = kpoly_impl(&keind, wrapper, &variants);
    let names = variants.iter().map(|v| v.name).collect::<Vec<_>>();
    let types = variants.iter().map(|v| v.ty).collect::<Vec<_>>();

    Ok(quote! {
        #poly

        impl<GL> #keind::prelude::SEEntity<GL> for #wrapper
        where
            GL: #keind::prelude::GameLogic,
            #( #types: #keind::prelude::SEEntity<GL>, )*
        {
            fn prestep(&self, engine: &#keind::prelude::GameEngine<GL>) -> bool {
                match self {
                    #( #wrapper::#names(entity) => entity.prestep(engine), )*
                }
            }

            fn step(&self, engine: &#keind::prelude::GameEngine<GL>, next_self: &mut Self) {
                match (self, next_self) {
                    #( (#wrapper::#names(entity), #wrapper::#names(next)) => entity.step(engine, next), )*
                    #[allow(unreachable_patterns)]
                    _ => #keind::tracing::error!("next version of an entity changed variant"),
                }
            }
        }

        impl<GL> #keind::prelude::EEntity<GL> for #wrapper
        where
            GL: #keind::prelude::GameLogic,
            #( #types: #keind::prelude::EEntity<GL>, )*
        {
            fn systems(&self) -> &::std::vec::Vec<#keind::prelude::RefPointer<GL::System>> {
                match self {
                    #( #wrapper::#names(entity) => entity.systems(), )*
                }
            }

            fn systems_mut(&mut self) -> &mut ::std::vec::Vec<#keind::prelude::RefPointer<GL::System>> {
                match self {
                    #( #wrapper::#names(entity) => entity.systems_mut(), )*
                }
            }

            fn state(&self) -> &#keind::prelude::BaseEntityState {
                match self {
                    #( #wrapper::#names(entity) => entity.state(), )*
                }
            }

            fn state_mut(&mut self) -> &mut #keind::prelude::BaseEntityState {
                match self {
                    #( #wrapper::#names(entity) => entity.state_mut(), )*
                }
            }

            fn step_systems(
                &self,
                engine: &#keind::prelude::GameEngine<GL>,
                next_self_maybe: &mut ::std::option::Option<GL::Entity>,
            ) {
                match self {
                    #( #wrapper::#names(entity) => entity.step_systems(engine, next_self_maybe), )*
                }
            }
        }
    })
}
