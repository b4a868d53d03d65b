use serde_json::{Map, Value};

/// JavaScript-style truthiness, used to decide when a record-store field
/// falls back to its default. Airtable omits empty cells entirely, but
/// formula fields can still yield `0`, `""` or `false`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|v| is_truthy(v))
}

pub fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    optional_text_field(fields, key).unwrap_or_default()
}

pub fn optional_text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    truthy(fields, key).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Numeric cell. Formula and text cells may carry the number as a string.
pub fn number_field(fields: &Map<String, Value>, key: &str) -> f64 {
    truthy(fields, key)
        .and_then(|v| match v {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            other => other.as_f64(),
        })
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

pub fn bool_field(fields: &Map<String, Value>, key: &str) -> bool {
    truthy(fields, key).is_some_and(|v| v.as_bool().unwrap_or(true))
}

/// Linked-record and lookup fields come back as arrays.
pub fn text_list_field(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// First element of a lookup field, or an empty string.
pub fn first_text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::Array(values)) => values
            .first()
            .and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn falsy_values_fall_back_to_defaults() {
        let f = fields(json!({"a": "", "b": 0, "c": false, "d": null}));
        assert_eq!(text_field(&f, "a"), "");
        assert_eq!(number_field(&f, "b"), 0.0);
        assert!(!bool_field(&f, "c"));
        assert_eq!(optional_text_field(&f, "d"), None);
        assert_eq!(text_field(&f, "missing"), "");
    }

    #[test]
    fn truthy_values_are_kept() {
        let f = fields(json!({"name": "Ron", "qty": 2.5, "on": true}));
        assert_eq!(text_field(&f, "name"), "Ron");
        assert_eq!(number_field(&f, "qty"), 2.5);
        assert!(bool_field(&f, "on"));
    }

    #[test]
    fn numbers_in_text_cells_are_parsed() {
        let f = fields(json!({"stock": "12", "days": " 5.5 ", "bad": "n/a"}));
        assert_eq!(number_field(&f, "stock"), 12.0);
        assert_eq!(number_field(&f, "days"), 5.5);
        assert_eq!(number_field(&f, "bad"), 0.0);
    }

    #[test]
    fn lookup_fields_take_the_first_element() {
        let f = fields(json!({"names": ["Ana", "Luis"], "ids": [12345], "empty": []}));
        assert_eq!(first_text_field(&f, "names"), "Ana");
        assert_eq!(first_text_field(&f, "ids"), "12345");
        assert_eq!(first_text_field(&f, "empty"), "");
        assert_eq!(text_list_field(&f, "names"), vec!["Ana", "Luis"]);
        assert!(text_list_field(&f, "missing").is_empty());
    }
}
