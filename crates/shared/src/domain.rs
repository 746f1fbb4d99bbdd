use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(ElementId);

/// One row of the periodic table grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodicElement {
    pub id: ElementId,
    pub name: String,
    pub position: i64,
    pub weight: f64,
    pub symbol: String,
}

impl PeriodicElement {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        position: i64,
        weight: f64,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            id: ElementId(id),
            name: name.into(),
            position,
            weight,
            symbol: symbol.into(),
        }
    }

    /// Textual form of every field, identity included, in declaration order.
    pub fn field_texts(&self) -> [String; 5] {
        [
            self.id.to_string(),
            self.name.clone(),
            self.position.to_string(),
            self.weight.to_string(),
            self.symbol.clone(),
        ]
    }

    /// `needle` must already be lowercased. An empty needle matches.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.field_texts()
            .iter()
            .any(|text| text.to_lowercase().contains(needle))
    }

    pub fn field_text(&self, field: ElementField) -> String {
        match field {
            ElementField::Position => self.position.to_string(),
            ElementField::Name => self.name.clone(),
            ElementField::Weight => self.weight.to_string(),
            ElementField::Symbol => self.symbol.clone(),
        }
    }

    /// Copy of `self` with `field` set from prompt input, coerced to the
    /// field's declared type.
    pub fn with_field(&self, field: ElementField, raw: &str) -> Result<Self, CoercionError> {
        let mut next = self.clone();
        match field {
            ElementField::Position => next.position = parse_integer(field, raw)?,
            ElementField::Weight => next.weight = parse_decimal(field, raw)?,
            ElementField::Name => next.name = raw.to_string(),
            ElementField::Symbol => next.symbol = raw.to_string(),
        }
        Ok(next)
    }
}

fn parse_integer(field: ElementField, raw: &str) -> Result<i64, CoercionError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CoercionError::new(field, raw))
}

fn parse_decimal(field: ElementField, raw: &str) -> Result<f64, CoercionError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CoercionError::new(field, raw)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Decimal,
    Text,
}

/// Editable columns. `id` is identity and never edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementField {
    Position,
    Name,
    Weight,
    Symbol,
}

impl ElementField {
    /// Display column order.
    pub const ALL: [ElementField; 4] = [
        ElementField::Position,
        ElementField::Name,
        ElementField::Weight,
        ElementField::Symbol,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementField::Position => "position",
            ElementField::Name => "name",
            ElementField::Weight => "weight",
            ElementField::Symbol => "symbol",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            ElementField::Position => FieldKind::Integer,
            ElementField::Weight => FieldKind::Decimal,
            ElementField::Name | ElementField::Symbol => FieldKind::Text,
        }
    }

    /// Coerces raw prompt input to this field's declared type.
    pub fn coerce(self, raw: &str) -> Result<FieldValue, CoercionError> {
        match self.kind() {
            FieldKind::Integer => parse_integer(self, raw).map(FieldValue::Integer),
            FieldKind::Decimal => parse_decimal(self, raw).map(FieldValue::Decimal),
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for ElementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ElementField::ALL
            .into_iter()
            .find(|field| field.as_str() == lower)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read {input:?} as a {field} value")]
pub struct CoercionError {
    pub field: ElementField,
    pub input: String,
}

impl CoercionError {
    fn new(field: ElementField, input: &str) -> Self {
        Self {
            field,
            input: input.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field '{0}' (expected one of position, name, weight, symbol)")]
pub struct UnknownField(pub String);
