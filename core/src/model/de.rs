//! Field-level serde helpers shared by the model records.

use serde::de::{self, Deserialize, Deserializer, Unexpected};

/// A nullable field that must still be present.
///
/// Plain `Option<T>` fields treat a missing key as `None`; routing the field
/// through `deserialize_with` makes serde report it as missing instead.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum BoolRepr {
    Bool(bool),
    Int(i64),
}

/// Moodle sends flags either as JSON booleans or as `0`/`1`.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match BoolRepr::deserialize(deserializer)? {
        BoolRepr::Bool(b) => Ok(b),
        BoolRepr::Int(0) => Ok(false),
        BoolRepr::Int(1) => Ok(true),
        BoolRepr::Int(n) => Err(de::Error::invalid_value(
            Unexpected::Signed(n),
            &"a boolean, 0 or 1",
        )),
    }
}

/// `flag` for required-but-nullable fields.
pub(crate) fn nullable_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<BoolRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolRepr::Bool(b)) => Ok(Some(b)),
        Some(BoolRepr::Int(0)) => Ok(Some(false)),
        Some(BoolRepr::Int(1)) => Ok(Some(true)),
        Some(BoolRepr::Int(n)) => Err(de::Error::invalid_value(
            Unexpected::Signed(n),
            &"a boolean, 0 or 1",
        )),
    }
}
