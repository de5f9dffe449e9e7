use crate::attributes::DroneFieldAttributes;
use itertools::Itertools;
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DataStruct, DeriveInput, Error, Field, Fields, LitStr, Result};

const DRONE: &str = "drone";

struct DroneField<'a> {
    ident: &'a Ident,
    field: &'a Field,
    qualifiers: Vec<LitStr>,
}

fn extract_drone_field(field: &Field) -> Result<Option<DroneField<'_>>> {
    let attributes = field
        .attrs
        .iter()
        .filter(|attribute| attribute.path().is_ident(DRONE))
        .map(DroneFieldAttributes::try_from)
        .collect::<Result<Vec<_>>>()?;

    if attributes.is_empty() {
        return Ok(None);
    }

    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| Error::new(field.span(), "Drone fields must be named!"))?;

    Ok(Some(DroneField {
        ident,
        field,
        qualifiers: attributes
            .into_iter()
            .flat_map(|attributes| attributes.qualifiers)
            .collect(),
    }))
}

fn generate_injection_point(field: &DroneField) -> TokenStream {
    let ty = &field.field.ty;
    let name = field.ident.to_string();
    let qualifiers = &field.qualifiers;

    quote! {
        drone_spi::injection::InjectionPoint::field::<
            <#ty as drone_spi::injection::DroneSlot>::Drone,
            ::std::vec::Vec<drone_spi::drone_point::Qualifier>,
        >(#name, vec![#(drone_spi::drone_point::Qualifier::new(#qualifiers)),*])
    }
}

fn generate_injection(field: &DroneField) -> TokenStream {
    let ident = field.ident;
    let name = ident.to_string();

    quote! {
        #name => drone_spi::injection::DroneSlot::fill(&mut self.#ident, field, instance),
    }
}

pub fn expand_drone_injected(input: &DeriveInput) -> Result<TokenStream> {
    if let Data::Struct(DataStruct { fields, .. }) = &input.data {
        let drone_fields: Vec<_> = match fields {
            Fields::Named(fields) => fields
                .named
                .iter()
                .map(extract_drone_field)
                .filter_map_ok(|field| field)
                .try_collect()?,
            Fields::Unnamed(fields) if fields.unnamed.is_empty() => vec![],
            Fields::Unnamed(fields) => {
                return Err(Error::new(
                    fields.span(),
                    "DroneInjected requires named fields!",
                ))
            }
            Fields::Unit => vec![],
        };

        let ident = &input.ident;
        let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
        let points = drone_fields.iter().map(generate_injection_point);
        let injections = drone_fields.iter().map(generate_injection);

        Ok(quote! {
            #[automatically_derived]
            impl #impl_generics drone_spi::injection::DroneInjected for #ident #ty_generics #where_clause {
                fn test_class() -> drone_spi::injection::TestClass {
                    drone_spi::injection::TestClass::new(
                        ::std::any::type_name::<Self>(),
                        vec![#(#points),*],
                    )
                }

                fn drone_test_class(&self) -> drone_spi::injection::TestClass {
                    <Self as drone_spi::injection::DroneInjected>::test_class()
                }

                #[allow(unused_variables)]
                fn inject(
                    &mut self,
                    field: &str,
                    instance: drone_spi::service::DroneInstanceAnyPtr,
                ) -> ::std::result::Result<(), drone_spi::injection::InjectionError> {
                    match field {
                        #(#injections)*
                        _ => ::std::result::Result::Err(
                            drone_spi::injection::InjectionError::UnknownField(field.to_string()),
                        ),
                    }
                }
            }
        })
    } else {
        Err(Error::new(
            input.span(),
            "Can only derive DroneInjected on structs!",
        ))
    }
}
