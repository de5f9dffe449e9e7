use crate::drone_injected::expand_drone_injected;
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, Error};

mod attributes;
mod drone_injected;

#[proc_macro_derive(DroneInjected, attributes(drone))]
pub fn generate_drone_injected(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_drone_injected(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}
