//! Product entity and the two request schemas
//!
//! - Product body: `name`, `brand` (non-empty strings), `price`, `stock`
//!   (numbers); no other keys.
//! - Id parameter: a single required number.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ValidationError;

/// Keys accepted in a product body, in the order they are checked.
const PRODUCT_FIELDS: [&str; 4] = ["name", "brand", "price", "stock"];

/// Product record as returned by either store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub stock: f64,
}

/// Validated product body, used for both create and update.
///
/// Updates replace all four fields together; there is no partial form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub brand: String,
    pub price: f64,
    pub stock: f64,
}

impl ProductInput {
    /// Check a decoded JSON body against the product schema.
    ///
    /// Schema fields are checked first, in declaration order, then any
    /// unknown key is rejected. The first violation wins.
    ///
    /// # Example
    /// ```
    /// use product_api::models::ProductInput;
    /// use serde_json::json;
    ///
    /// let ok = json!({"name": "Velocity Black Gum", "brand": "Compass", "price": 798000, "stock": 10});
    /// assert!(ProductInput::from_json(&ok).is_ok());
    ///
    /// let renamed = json!({"name": "Velocity Black Gum", "brands": "Compass", "price": 798000, "stock": 10});
    /// assert!(ProductInput::from_json(&renamed).is_err());
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, ValidationError> {
        let obj = value.as_object().ok_or(ValidationError::NotAnObject)?;

        let input = Self {
            name: required_string(obj, "name")?,
            brand: required_string(obj, "brand")?,
            price: required_number(obj, "price")?,
            stock: required_number(obj, "stock")?,
        };

        if let Some(extra) = obj
            .keys()
            .find(|key| !PRODUCT_FIELDS.contains(&key.as_str()))
        {
            return Err(ValidationError::NotAllowed {
                field: extra.clone(),
            });
        }

        Ok(input)
    }
}

fn required_string(obj: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    match obj.get(field) {
        None => Err(ValidationError::Required { field }),
        Some(Value::String(s)) if s.is_empty() => Err(ValidationError::Empty { field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::WrongType {
            field,
            expected: "string",
        }),
    }
}

/// Numbers may also arrive as numeric strings (`"10"`), which are converted.
fn required_number(obj: &Map<String, Value>, field: &'static str) -> Result<f64, ValidationError> {
    let wrong_type = ValidationError::WrongType {
        field,
        expected: "number",
    };

    let parsed = match obj.get(field) {
        None => return Err(ValidationError::Required { field }),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    parsed.filter(|n| n.is_finite()).ok_or(wrong_type)
}

/// Validated product id taken from a path parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(i64);

impl ProductId {
    /// Parse a raw path segment.
    ///
    /// Anything that is not a finite number is rejected. A number no row
    /// can carry (fractional, or outside `i64`) parses to `None`.
    pub fn parse(raw: &str) -> Result<Option<Self>, ValidationError> {
        let raw = raw.trim();
        if let Ok(id) = raw.parse::<i64>() {
            return Ok(Some(Self(id)));
        }

        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or(ValidationError::WrongType {
                field: "id",
                expected: "number",
            })?;

        let fits = value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64;
        Ok(fits.then(|| Self(value as i64)))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
