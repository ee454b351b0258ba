use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::poly::keind_path;
use crate::poly::kpoly_impl;
use crate::poly::wrapper_variants;

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let wrapper = &input.ident;
    let variants = wrapper_variants(input, "EntitySystem")?;
    let keind = keind_path();
    let poly = kpoly_impl(&keind, wrapper, &variants);
    let names = variants.iter().map(|v| v.name).collect::<Vec<_>>();
    let types = variants.iter().map(|v| v.ty).collect::<Vec<_>>();

    Ok(quote! {
        #poly

        impl<GL> #keind::prelude::EEntitySystem<GL> for #wrapper
        where
            GL: #keind::prelude::GameLogic,
            #( #types: #keind::prelude::EEntitySystem<GL>, )*
        {
            fn prestep(&self, engine: &#keind::prelude::GameEngine<GL>, entity: &GL::Entity) -> bool {
                match self {
                    #( #wrapper::#names(system) => system.prestep(engine, entity), )*
                }
            }

            fn step(
                &self,
                engine: &#keind::prelude::GameEngine<GL>,
                entity: &GL::Entity,
                next_entity: &mut GL::Entity,
            ) -> ::std::option::Option<Self> {
                match self {
                    #( #wrapper::#names(system) => system.step(engine, entity, next_entity).map(#wrapper::#names), )*
                }
            }
        }
    })
}
