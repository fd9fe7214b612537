//! Domain models and request validation for the product service

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A catalog product. Identifiers are assigned by the store and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// Incoming create payload.
///
/// Fields are kept loose (`Value`) so that type mismatches surface as 400s
/// with a descriptive message instead of a framework rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateProductRequest {
    pub name: Option<Value>,
    pub price: Option<Value>,
}

/// A validated create request, ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
}

/// Validation error for create payloads
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is absent from the payload
    MissingFields,

    /// Name present but empty after trimming
    EmptyName,

    /// Name is not a JSON string
    InvalidName,

    /// Price is not a number (or a numeric string)
    InvalidPrice,

    /// Price parsed but is below zero
    NegativePrice,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => write!(f, "Name and price are required"),
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::InvalidName => write!(f, "Name must be a string"),
            Self::InvalidPrice => write!(f, "Invalid price format"),
            Self::NegativePrice => write!(f, "Price cannot be negative"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl CreateProductRequest {
    /// Validate the payload into a [`NewProduct`].
    ///
    /// # Rules
    /// - Both `name` and `price` must be present
    /// - `name` must be a non-empty string; surrounding whitespace is trimmed
    /// - `price` must be a number or a numeric string, and non-negative
    pub fn validate(&self) -> Result<NewProduct, ValidationError> {
        let (name, price) = match (&self.name, &self.price) {
            (Some(name), Some(price)) => (name, price),
            _ => return Err(ValidationError::MissingFields),
        };

        let name = match name {
            Value::String(s) => s.trim(),
            _ => return Err(ValidationError::InvalidName),
        };
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let price = parse_price(price)?;
        if price < 0.0 {
            return Err(ValidationError::NegativePrice);
        }

        Ok(NewProduct {
            name: name.to_owned(),
            price,
        })
    }
}

/// Coerce a JSON value into a price.
///
/// Accepts JSON numbers and numeric strings ("19.99"), rejecting everything
/// else including non-finite values.
fn parse_price(value: &Value) -> Result<f64, ValidationError> {
    let price = match value {
        Value::Number(n) => n.as_f64().ok_or(ValidationError::InvalidPrice)?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::InvalidPrice)?,
        _ => return Err(ValidationError::InvalidPrice),
    };

    if !price.is_finite() {
        return Err(ValidationError::InvalidPrice);
    }

    Ok(price)
}

/// Response body for `GET /` - service name, status, and backing store.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(name: Value, price: Value) -> CreateProductRequest {
        CreateProductRequest {
            name: Some(name),
            price: Some(price),
        }
    }

    #[test]
    fn valid_request() {
        let new = request(json!("Widget"), json!(19.99)).validate().unwrap();
        assert_eq!(new.name, "Widget");
        assert_eq!(new.price, 19.99);
    }

    #[test]
    fn trims_name() {
        let new = request(json!("  Widget  "), json!(5)).validate().unwrap();
        assert_eq!(new.name, "Widget");
    }

    #[test]
    fn accepts_numeric_string_price() {
        let new = request(json!("Widget"), json!("12.50")).validate().unwrap();
        assert_eq!(new.price, 12.5);
    }

    #[test]
    fn accepts_zero_price() {
        assert!(request(json!("Widget"), json!(0)).validate().is_ok());
    }

    #[test]
    fn rejects_missing_fields() {
        let err = CreateProductRequest::default().validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingFields);

        let err = CreateProductRequest {
            name: Some(json!("Widget")),
            price: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingFields);
    }

    #[test]
    fn rejects_empty_name() {
        let err = request(json!("   "), json!(1.0)).validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyName);
    }

    #[test]
    fn rejects_non_string_name() {
        let err = request(json!(42), json!(1.0)).validate().unwrap_err();
        assert_eq!(err, ValidationError::InvalidName);
    }

    #[test]
    fn rejects_negative_price() {
        let err = request(json!("Widget"), json!(-0.01)).validate().unwrap_err();
        assert_eq!(err, ValidationError::NegativePrice);
    }

    #[test]
    fn rejects_garbage_price() {
        let err = request(json!("Widget"), json!("expensive"))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidPrice);

        let err = request(json!("Widget"), json!([1, 2])).validate().unwrap_err();
        assert_eq!(err, ValidationError::InvalidPrice);

        let err = request(json!("Widget"), json!("NaN")).validate().unwrap_err();
        assert_eq!(err, ValidationError::InvalidPrice);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ValidationError::MissingFields.to_string(),
            "Name and price are required"
        );
        assert_eq!(
            ValidationError::NegativePrice.to_string(),
            "Price cannot be negative"
        );
    }
}
