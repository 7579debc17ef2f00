//! Persisted inventory items and the casting rules applied to incoming JSON.
//!
//! Request bodies arrive as loosely typed JSON. Field values are cast the way a
//! document store schema would cast them: strings stay strings, numbers and
//! booleans become their string form for `name`, numeric strings and booleans
//! become numbers for `price`. Anything else is a cast failure.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::{DomainError, FieldError, ValidationError};

const ID_LEN: usize = 32;

/// Store-assigned identifier: 32 lowercase hex characters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let well_formed = raw.len() == ID_LEN && raw.chars().all(|ch| ch.is_ascii_hexdigit());
        if !well_formed {
            return Err(DomainError::InvalidId { value: raw.to_string() });
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub name: String,
    #[serde(serialize_with = "serialize_price", deserialize_with = "deserialize_price")]
    pub price: Decimal,
}

impl Item {
    pub fn from_new(id: ItemId, new_item: NewItem) -> Self {
        Self { id, name: new_item.name, price: new_item.price }
    }

    /// Applies the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: ItemPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
    }
}

/// A validated create request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub price: Decimal,
}

impl NewItem {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self { name: name.into(), price }
    }

    /// Casts and validates a create body. Both fields are required; unknown fields are ignored.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let fields = body_fields(body);
        let mut errors = Vec::new();

        let name = match cast_name(fields.and_then(|map| map.get("name"))) {
            Ok(Some(name)) => Some(name),
            Ok(None) => {
                errors.push(FieldError::required("name"));
                None
            }
            Err(error) => {
                errors.push(error);
                None
            }
        };
        let price = match cast_price(fields.and_then(|map| map.get("price"))) {
            Ok(Some(price)) => Some(price),
            Ok(None) => {
                errors.push(FieldError::required("price"));
                None
            }
            Err(error) => {
                errors.push(error);
                None
            }
        };

        match (name, price) {
            (Some(name), Some(price)) if errors.is_empty() => Ok(Self { name, price }),
            _ => Err(ValidationError::new(errors)),
        }
    }
}

/// A validated partial update. Absent fields stay as stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }

    /// Casts the fields present in an update body. A field that is present but
    /// null or empty still fails the required check.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let Some(fields) = body_fields(body) else {
            return Ok(Self::default());
        };
        let mut errors = Vec::new();
        let mut patch = Self::default();

        if let Some(raw) = fields.get("name") {
            match cast_name(Some(raw)) {
                Ok(Some(name)) => patch.name = Some(name),
                Ok(None) => errors.push(FieldError::required("name")),
                Err(error) => errors.push(error),
            }
        }
        if let Some(raw) = fields.get("price") {
            match cast_price(Some(raw)) {
                Ok(Some(price)) => patch.price = Some(price),
                Ok(None) => errors.push(FieldError::required("price")),
                Err(error) => errors.push(error),
            }
        }

        if errors.is_empty() {
            Ok(patch)
        } else {
            Err(ValidationError::new(errors))
        }
    }
}

fn body_fields(body: &Value) -> Option<&Map<String, Value>> {
    body.as_object()
}

fn cast_name(raw: Option<&Value>) -> Result<Option<String>, FieldError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) if value.is_empty() => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(Value::Number(value)) => Ok(Some(value.to_string())),
        Some(Value::Bool(value)) => Ok(Some(value.to_string())),
        Some(other) => Err(FieldError::cast("name", "string", other)),
    }
}

fn cast_price(raw: Option<&Value>) -> Result<Option<Decimal>, FieldError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Number(number)) => cast_numeric("price", &number.to_string(), value),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(value @ Value::String(text)) => cast_numeric("price", text.trim(), value),
        Some(Value::Bool(flag)) => Ok(Some(if *flag { Decimal::ONE } else { Decimal::ZERO })),
        Some(other) => Err(FieldError::cast("price", "Number", other)),
    }
}

/// Numeric text that a float accepts but `Decimal` cannot hold is out of range, not a
/// cast failure. Non-finite spellings such as `inf` or `NaN` are not numbers.
fn cast_numeric(
    path: &'static str,
    text: &str,
    original: &Value,
) -> Result<Option<Decimal>, FieldError> {
    if let Some(value) = parse_decimal(text) {
        return Ok(Some(value));
    }
    match text.parse::<f64>() {
        Ok(float) if float.is_finite() => Err(FieldError::out_of_range(path, original)),
        _ => Err(FieldError::cast(path, "Number", original)),
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
        .map(|value| value.normalize())
}

fn serialize_price<S>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let normalized = price.normalize();
    if normalized.scale() == 0 {
        if let Some(whole) = normalized.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }
    match normalized.to_f64() {
        Some(value) => serializer.serialize_f64(value),
        None => serializer.serialize_str(&normalized.to_string()),
    }
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    struct PriceVisitor;

    impl<'de> Visitor<'de> for PriceVisitor {
        type Value = Decimal;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a numeric price")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(value))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
            parse_decimal(&value.to_string())
                .ok_or_else(|| E::custom(format!("price `{value}` is out of range")))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
            parse_decimal(value).ok_or_else(|| E::custom(format!("price `{value}` is not numeric")))
        }
    }

    deserializer.deserialize_any(PriceVisitor)
}
