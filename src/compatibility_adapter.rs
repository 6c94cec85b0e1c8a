use crate::models::alert::Alert;
use crate::models::batch::Batch;
use crate::models::product::Product;
use crate::models::sensor::Sensor;
use crate::models::warehouse::Warehouse;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// Key names the backend has been seen using for a warehouse id, in lookup order.
pub const WAREHOUSE_ID_KEYS: [&str; 4] = ["id", "warehouse_id", "warehouseId", "warehouseid"];

const CAPACITY_KEYS: [&str; 2] = ["storage_capacity", "capacity"];
const QUANTITY_KEYS: [&str; 3] = ["number_of_batches", "quantity", "count"];

/// Returns the first non-empty id among [`WAREHOUSE_ID_KEYS`].
///
/// Empty strings, `0`, `false` and `null` are skipped. Numeric ids are returned
/// in their decimal form.
pub fn resolve_warehouse_id(warehouse: &Value) -> Option<String> {
    warehouse.as_object().and_then(|obj| first_truthy_string(obj, &WAREHOUSE_ID_KEYS))
}

/// First key that is present and not `null`.
pub fn first_present<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|k| obj.get(*k)).find(|v| !v.is_null())
}

/// First key whose value is truthy, rendered as a string.
pub fn first_truthy_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| obj.get(*k)).find(|v| is_truthy(v)).map(value_to_string)
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric coercion for loosely typed server fields. Anything that is not a
/// finite number (or a string holding one) becomes `0`.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    optional_number(value).unwrap_or(0.0)
}

/// Like [`coerce_number`] but keeps absence distinguishable.
pub fn optional_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(true) => 1.0,
        Value::Bool(false) => 0.0,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> String {
    first_present(obj, keys).map(value_to_string).unwrap_or_default()
}

fn optional_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_present(obj, keys)
        .map(value_to_string)
        .filter(|s| !s.trim().is_empty())
}

fn rest_of(obj: &Map<String, Value>, consumed: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(k, _)| !consumed.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Extracts a list from a response that is either a bare array or an object
/// holding the array under `key`. Anything else is an empty list.
pub fn unwrap_list(value: Value, key: &str) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Extracts an object from `{key: {...}}` or from the bare object itself.
pub fn unwrap_object(value: Value, key: &str) -> Option<Value> {
    match value {
        Value::Object(mut obj) => match obj.remove(key) {
            Some(inner @ Value::Object(_)) => Some(inner),
            Some(other) => {
                obj.insert(key.to_string(), other);
                Some(Value::Object(obj))
            }
            None => Some(Value::Object(obj)),
        },
        _ => None,
    }
}

pub fn adapt_warehouse(value: &Value) -> Option<Warehouse> {
    let obj = value.as_object()?;
    let consumed: Vec<&str> = WAREHOUSE_ID_KEYS
        .iter()
        .chain(CAPACITY_KEYS.iter())
        .chain(["name", "location"].iter())
        .copied()
        .collect();

    Some(Warehouse {
        id: resolve_warehouse_id(value),
        name: string_field(obj, &["name"]),
        location: string_field(obj, &["location"]),
        storage_capacity: coerce_number(first_present(obj, &CAPACITY_KEYS)),
        extra: rest_of(obj, &consumed),
    })
}

pub fn adapt_batch(value: &Value) -> Option<Batch> {
    let obj = value.as_object()?;
    let id_keys = ["id", "batch_id"];
    let sensor_keys = ["sensor_id", "sensorId"];
    let product_keys = ["product_id", "productId"];
    let consumed: Vec<&str> = id_keys
        .iter()
        .chain(QUANTITY_KEYS.iter())
        .chain(sensor_keys.iter())
        .chain(product_keys.iter())
        .copied()
        .collect();

    Some(Batch {
        id: first_truthy_string(obj, &id_keys),
        quantity: coerce_number(first_present(obj, &QUANTITY_KEYS)),
        sensor_id: first_truthy_string(obj, &sensor_keys),
        product_id: first_truthy_string(obj, &product_keys),
        extra: rest_of(obj, &consumed),
    })
}

pub fn adapt_product(value: &Value) -> Option<Product> {
    let obj = value.as_object()?;
    let consumed = [
        "product_id",
        "id",
        "product_name",
        "name",
        "description",
        "min_temp",
        "minTemp",
        "max_temp",
        "maxTemp",
        "min_humi",
        "minHumi",
        "max_humi",
        "maxHumi",
    ];

    Some(Product {
        id: first_truthy_string(obj, &["product_id", "id"]),
        name: first_truthy_string(obj, &["product_name", "name"]).unwrap_or_default(),
        description: string_field(obj, &["description"]),
        min_temp: optional_number(first_present(obj, &["min_temp", "minTemp"])),
        max_temp: optional_number(first_present(obj, &["max_temp", "maxTemp"])),
        min_humi: optional_number(first_present(obj, &["min_humi", "minHumi"])),
        max_humi: optional_number(first_present(obj, &["max_humi", "maxHumi"])),
        extra: rest_of(obj, &consumed),
    })
}

pub fn adapt_sensor(value: &Value) -> Option<Sensor> {
    let obj = value.as_object()?;
    let consumed = ["sensor_id", "id", "ip_address", "ip", "sensor_type", "type", "device_id", "deviceId", "status"];

    Some(Sensor {
        id: first_truthy_string(obj, &["sensor_id", "id"]),
        ip_address: first_truthy_string(obj, &["ip_address", "ip"]).unwrap_or_default(),
        sensor_type: first_truthy_string(obj, &["sensor_type", "type"]).unwrap_or_default(),
        device_id: first_truthy_string(obj, &["device_id", "deviceId"]),
        status: optional_string(obj, &["status"]),
        extra: rest_of(obj, &consumed),
    })
}

pub fn adapt_alert(value: &Value) -> Option<Alert> {
    let obj = value.as_object()?;
    let warehouse_keys = ["warehouse_id", "warehouseId", "warehouseid"];
    let resolved_keys = ["is_resolved", "isResolved", "resolved"];
    let consumed: Vec<&str> = ["id", "alert_id", "sensor_id", "sensorId", "alert_type", "type", "message", "created_at", "createdAt"]
        .iter()
        .chain(warehouse_keys.iter())
        .chain(resolved_keys.iter())
        .copied()
        .collect();

    Some(Alert {
        id: first_truthy_string(obj, &["id", "alert_id"]),
        sensor_id: first_truthy_string(obj, &["sensor_id", "sensorId"]),
        warehouse_id: first_truthy_string(obj, &warehouse_keys),
        alert_type: first_truthy_string(obj, &["alert_type", "type"]).unwrap_or_default(),
        message: optional_string(obj, &["message"]),
        is_resolved: first_present(obj, &resolved_keys).is_some_and(is_truthy),
        created_at: first_present(obj, &["created_at", "createdAt"]).and_then(parse_timestamp),
        extra: rest_of(obj, &consumed),
    })
}

pub fn adapt_list<T>(items: Vec<Value>, adapt: impl Fn(&Value) -> Option<T>) -> Vec<T> {
    items.iter().filter_map(adapt).collect()
}

/// Accepts RFC 3339, naive `YYYY-MM-DD HH:MM:SS` (taken as UTC) and epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn warehouse_id_prefers_first_present_key() {
        assert_eq!(resolve_warehouse_id(&json!({"id": "a", "warehouse_id": "b"})), Some("a".into()));
        assert_eq!(resolve_warehouse_id(&json!({"warehouse_id": "b", "warehouseId": "c"})), Some("b".into()));
        assert_eq!(resolve_warehouse_id(&json!({"warehouseId": 7})), Some("7".into()));
        assert_eq!(resolve_warehouse_id(&json!({"warehouseid": "d"})), Some("d".into()));
    }

    #[test]
    fn warehouse_id_skips_empty_values() {
        assert_eq!(resolve_warehouse_id(&json!({"id": "", "warehouse_id": null, "warehouseId": 0, "warehouseid": "z"})), Some("z".into()));
        assert_eq!(resolve_warehouse_id(&json!({"id": ""})), None);
        assert_eq!(resolve_warehouse_id(&json!({"name": "North"})), None);
        assert_eq!(resolve_warehouse_id(&json!("w1")), None);
    }

    #[test]
    fn numbers_are_coerced() {
        assert_eq!(coerce_number(Some(&json!(12))), 12.0);
        assert_eq!(coerce_number(Some(&json!(" 12.5 "))), 12.5);
        assert_eq!(coerce_number(Some(&json!("lots"))), 0.0);
        assert_eq!(coerce_number(Some(&json!("NaN"))), 0.0);
        assert_eq!(coerce_number(Some(&json!("inf"))), 0.0);
        assert_eq!(coerce_number(Some(&json!(true))), 1.0);
        assert_eq!(coerce_number(Some(&json!([1]))), 0.0);
        assert_eq!(coerce_number(Some(&Value::Null)), 0.0);
        assert_eq!(coerce_number(None), 0.0);
    }

    #[test]
    fn lists_unwrap_from_array_or_key() {
        assert_eq!(unwrap_list(json!([1, 2]), "products").len(), 2);
        assert_eq!(unwrap_list(json!({"products": [1]}), "products").len(), 1);
        assert!(unwrap_list(json!({"products": "none"}), "products").is_empty());
        assert!(unwrap_list(json!({"items": [1]}), "products").is_empty());
        assert!(unwrap_list(Value::Null, "products").is_empty());
    }

    #[test]
    fn objects_unwrap_from_key_or_bare() {
        assert_eq!(unwrap_object(json!({"product": {"id": 1}}), "product"), Some(json!({"id": 1})));
        assert_eq!(unwrap_object(json!({"id": 1}), "product"), Some(json!({"id": 1})));
        assert_eq!(unwrap_object(json!([]), "product"), None);
    }

    #[test]
    fn warehouse_capacity_falls_back_and_keeps_extras() {
        let w = adapt_warehouse(&json!({"warehouse_id": 4, "name": "North", "capacity": "250", "temp_zone": "frozen"})).unwrap();
        assert_eq!(w.id.as_deref(), Some("4"));
        assert_eq!(w.storage_capacity, 250.0);
        assert_eq!(w.extra.get("temp_zone"), Some(&json!("frozen")));
        assert!(!w.extra.contains_key("capacity"));
    }

    #[test]
    fn warehouse_round_trips_through_canonical_form() {
        let w = adapt_warehouse(&json!({"warehouseId": "w9", "name": "South", "location": "Bergen", "storage_capacity": 80, "owner": "x"})).unwrap();
        let stored = serde_json::to_value(&w).unwrap();
        assert_eq!(adapt_warehouse(&stored), Some(w));
    }

    #[test]
    fn batch_quantity_uses_null_coalescing_order() {
        let b = adapt_batch(&json!({"batch_id": 3, "number_of_batches": null, "quantity": "30", "count": 99})).unwrap();
        assert_eq!(b.quantity, 30.0);
        assert_eq!(b.id.as_deref(), Some("3"));
        let b = adapt_batch(&json!({"count": 5, "sensorId": "s1"})).unwrap();
        assert_eq!(b.quantity, 5.0);
        assert_eq!(b.sensor_id.as_deref(), Some("s1"));
        assert_eq!(adapt_batch(&json!({})).unwrap().quantity, 0.0);
    }

    #[test]
    fn product_accepts_both_naming_styles() {
        let p = adapt_product(&json!({"product_id": 2, "product_name": "Peas", "minTemp": -20, "max_temp": "-18"})).unwrap();
        assert_eq!(p.id.as_deref(), Some("2"));
        assert_eq!(p.name, "Peas");
        assert_eq!(p.min_temp, Some(-20.0));
        assert_eq!(p.max_temp, Some(-18.0));
        assert_eq!(p.min_humi, None);
    }

    #[test]
    fn sensor_fields_and_status() {
        let s = adapt_sensor(&json!({"sensor_id": 11, "ip": "10.0.0.2", "sensor_type": "DHT22", "status": "", "batch_code": "B-1"})).unwrap();
        assert_eq!(s.id.as_deref(), Some("11"));
        assert_eq!(s.ip_address, "10.0.0.2");
        assert_eq!(s.status, None);
        assert_eq!(s.extra.get("batch_code"), Some(&json!("B-1")));
    }

    #[test]
    fn alert_resolution_and_timestamps() {
        let a = adapt_alert(&json!({"id": 1, "warehouse_id": "w1", "alert_type": "TEMP_HIGH", "created_at": "2026-03-01T10:00:00Z"})).unwrap();
        assert!(!a.is_resolved);
        assert_eq!(a.warehouse_id.as_deref(), Some("w1"));
        assert_eq!(a.created_at, Some(Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()));

        let a = adapt_alert(&json!({"id": 2, "is_resolved": 1, "created_at": "2026-03-01 10:00:00"})).unwrap();
        assert!(a.is_resolved);
        assert!(a.created_at.is_some());
    }

    #[test]
    fn non_objects_are_skipped_in_lists() {
        let items = vec![json!({"id": "a"}), json!(5), json!({"id": "b"})];
        assert_eq!(adapt_list(items, adapt_batch).len(), 2);
    }
}
