use crate::models::sensor::Sensor;
use crate::models::warehouse::validate_not_blank;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Product {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub min_humi: Option<f64>,
    pub max_humi: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `/get-products-sensors` response for one warehouse.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductsAndSensors {
    pub products: Vec<Product>,
    pub sensors: Vec<Sensor>,
}

impl ProductsAndSensors {
    pub fn available_sensors(&self) -> Vec<&Sensor> {
        self.sensors.iter().filter(|s| s.is_available()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.sensors.is_empty()
    }
}

/// Product definition form. Temperatures are in °C, humidity in percent.
#[derive(Debug, Clone, Default, Validate)]
#[validate(schema(function = "validate_envelopes", skip_on_field_errors = true))]
pub struct CreateProductRequest {
    #[validate(custom(function = "validate_not_blank", message = "Payload designation required."))]
    pub name: String,
    pub description: String,
    #[validate(required(message = "Min Temp required."), custom(function = "validate_finite", message = "Min Temp required."))]
    pub min_temp: Option<f64>,
    #[validate(required(message = "Max Temp required."), custom(function = "validate_finite", message = "Max Temp required."))]
    pub max_temp: Option<f64>,
    #[validate(
        required(message = "Min Humidity required."),
        custom(function = "validate_finite", message = "Min Humidity required."),
        range(min = 0.0, max = 100.0, message = "Humidity out of bounds (0-100%).")
    )]
    pub min_humi: Option<f64>,
    #[validate(
        required(message = "Max Humidity required."),
        custom(function = "validate_finite", message = "Max Humidity required."),
        range(min = 0.0, max = 100.0, message = "Humidity out of bounds (0-100%).")
    )]
    pub max_humi: Option<f64>,
}

impl CreateProductRequest {
    pub fn to_body(&self, mail: &str) -> Value {
        serde_json::json!({
            "mail": mail,
            "name": self.name.trim(),
            "description": self.description.trim(),
            "min_temp": self.min_temp,
            "max_temp": self.max_temp,
            "min_humi": self.min_humi,
            "max_humi": self.max_humi,
        })
    }
}

/// NaN and infinities count as missing; JSON has no way to carry them.
fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new("not_finite"));
    }
    Ok(())
}

fn validate_envelopes(request: &CreateProductRequest) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (request.min_temp, request.max_temp) {
        if min > max {
            return Err(ValidationError::new("temperature_envelope").with_message("Invalid Temperature envelope.".into()));
        }
    }

    if let (Some(min), Some(max)) = (request.min_humi, request.max_humi) {
        if min > max {
            return Err(ValidationError::new("humidity_envelope").with_message("Invalid Humidity envelope.".into()));
        }
    }

    Ok(())
}
