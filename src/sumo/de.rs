//! Lenient deserializers for fields the API does not encode consistently.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Num(u64),
    Str(String),
}

fn parse_id<E: serde::de::Error>(repr: IdRepr) -> Result<u64, E> {
    match repr {
        IdRepr::Num(n) => Ok(n),
        IdRepr::Str(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| E::custom(format!("invalid numeric id '{}'", s))),
    }
}

/// Numeric id sent either as a JSON number or a numeric string.
pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = parse_id::<D::Error>(IdRepr::deserialize(deserializer)?)?;
    u32::try_from(value).map_err(|_| D::Error::custom(format!("id {} out of range", value)))
}

/// Optional id; `null`, `""` and `0` all mean "no rikishi".
pub fn opt_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let repr = Option::<IdRepr>::deserialize(deserializer)?;
    let value = match repr {
        None => return Ok(None),
        Some(IdRepr::Str(s)) if s.trim().is_empty() => return Ok(None),
        Some(repr) => parse_id::<D::Error>(repr)?,
    };
    if value == 0 {
        return Ok(None);
    }
    u32::try_from(value)
        .map(Some)
        .map_err(|_| D::Error::custom(format!("id {} out of range", value)))
}

/// Optional text where the API uses `""` for "not applicable".
pub fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

/// `null` treated like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
