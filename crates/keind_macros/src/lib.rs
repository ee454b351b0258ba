mod engine_entity;
mod entity_system;
mod poly;

use proc_macro::TokenStream;
use syn::DeriveInput;
use syn::parse_macro_input;

/// A wrapper enum around every type of entity in the game. Each variant
/// holds one entity struct. Generates `KPoly`, `From` for each entity type,
/// and `SEEntity`/`EEntity` impls that dispatch to the wrapped entity.
#[proc_macro_derive(EngineEntity)]
pub fn derive_engine_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    engine_entity::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// A wrapper enum around every type of system that can be attached to an
/// entity. Generates `KPoly`, `From` for each system type, and an
/// `EEntitySystem` impl that dispatches to the wrapped system.
#[proc_macro_derive(EntitySystem)]
pub fn derive_entity_system(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity_system::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
