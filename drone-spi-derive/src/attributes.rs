use syn::{Attribute, Error, LitStr, Meta};

pub struct DroneFieldAttributes {
    pub qualifiers: Vec<LitStr>,
}

impl TryFrom<&Attribute> for DroneFieldAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut qualifiers = vec![];
        if let Meta::Path(_) = value.meta {
            return Ok(Self { qualifiers });
        }

        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("qualifier") {
                qualifiers.push(meta.value().and_then(|value| value.parse())?);
                Ok(())
            } else {
                Err(meta.error("unsupported drone attribute"))
            }
        })?;

        Ok(Self { qualifiers })
    }
}
