//! Validators for the domain-specific parameter types.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::REQUIRED;
use crate::value::FormValue;

/// Message for a timezone value that is not an IANA-style name.
pub const INVALID_TIMEZONE: &str = "Must be a valid timezone, such as UTC or America/New_York.";
/// Message for a CloudWatch log group entry without an id.
pub const MISSING_LOG_GROUP: &str = "Each log group must have a name.";
/// Message for a sort rule without a regex key.
pub const MISSING_REGEX_KEY: &str = "Each sort rule requires a regex key.";
/// Message for an unknown sort type.
pub const INVALID_SORT_TYPE: &str = "Sort type must be one of numeric, alphabetical, or timestamp.";
/// Message for a timestamp sort rule without a layout.
pub const MISSING_LAYOUT: &str = "Timestamp sort rules require a layout.";
/// Message for a list-shaped field holding something else.
pub const NOT_A_LIST: &str = "Must be a list.";

const SORT_TYPES: [&str; 3] = ["numeric", "alphabetical", "timestamp"];

static TIMEZONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_+-]*(/[A-Za-z0-9][A-Za-z0-9_+-]*)*$")
        .expect("timezone pattern compiles")
});

pub(super) fn validate_timezone(required: bool, value: Option<&FormValue>) -> Option<String> {
    let text = match value {
        Some(FormValue::Text(text)) => text.as_str(),
        None | Some(FormValue::Null) => "",
        Some(_) => return Some(INVALID_TIMEZONE.to_string()),
    };
    if text.is_empty() {
        return required.then(|| REQUIRED.to_string());
    }
    (!TIMEZONE_PATTERN.is_match(text)).then(|| INVALID_TIMEZONE.to_string())
}

/// Entries of a list of objects, or `Err` with a message when the value has
/// some other shape. An unset value is an empty list.
fn object_entries(value: Option<&FormValue>) -> Result<Vec<&Value>, String> {
    match value {
        None | Some(FormValue::Null) => Ok(Vec::new()),
        Some(FormValue::List(items)) if items.is_empty() => Ok(Vec::new()),
        Some(FormValue::Structured(Value::Array(items))) => Ok(items.iter().collect()),
        Some(_) => Err(NOT_A_LIST.to_string()),
    }
}

fn non_empty_str<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Named CloudWatch log groups: `[{id, names?, prefixes?}]`.
pub(super) fn validate_cloudwatch_named_field(
    required: bool,
    value: Option<&FormValue>,
) -> Option<String> {
    let entries = match object_entries(value) {
        Ok(entries) => entries,
        Err(message) => return Some(message),
    };
    if entries.is_empty() {
        return required.then(|| REQUIRED.to_string());
    }
    entries
        .iter()
        .any(|entry| non_empty_str(entry, "id").is_none())
        .then(|| MISSING_LOG_GROUP.to_string())
}

/// File log sort rules: `[{regexKey, sortType, ascending, layout?}]`.
pub(super) fn validate_file_log_sort(required: bool, value: Option<&FormValue>) -> Option<String> {
    let entries = match object_entries(value) {
        Ok(entries) => entries,
        Err(message) => return Some(message),
    };
    if entries.is_empty() {
        return required.then(|| REQUIRED.to_string());
    }
    for entry in entries {
        if non_empty_str(entry, "regexKey").is_none() {
            return Some(MISSING_REGEX_KEY.to_string());
        }
        match entry.get("sortType").and_then(Value::as_str) {
            Some("timestamp") => {
                if non_empty_str(entry, "layout").is_none() {
                    return Some(MISSING_LAYOUT.to_string());
                }
            }
            Some(kind) if SORT_TYPES.contains(&kind) => {}
            _ => return Some(INVALID_SORT_TYPE.to_string()),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn structured(value: Value) -> FormValue {
        FormValue::Structured(value)
    }

    #[test]
    fn timezone_accepts_iana_names() {
        for tz in ["UTC", "America/New_York", "Etc/GMT+5", "America/Argentina/Buenos_Aires"] {
            assert_eq!(
                validate_timezone(true, Some(&FormValue::Text(tz.into()))),
                None,
                "{tz}"
            );
        }
    }

    #[test]
    fn timezone_rejects_garbage() {
        assert_eq!(
            validate_timezone(false, Some(&FormValue::Text("New York".into()))),
            Some(INVALID_TIMEZONE.to_string())
        );
        assert_eq!(
            validate_timezone(true, Some(&FormValue::Text(String::new()))),
            Some(REQUIRED.to_string())
        );
        assert_eq!(validate_timezone(false, None), None);
    }

    #[test]
    fn cloudwatch_entries_need_ids() {
        let good = structured(json!([{ "id": "/aws/lambda/fn", "names": [], "prefixes": [] }]));
        let bad = structured(json!([{ "id": "" }]));
        assert_eq!(validate_cloudwatch_named_field(true, Some(&good)), None);
        assert_eq!(
            validate_cloudwatch_named_field(false, Some(&bad)),
            Some(MISSING_LOG_GROUP.to_string())
        );
        assert_eq!(
            validate_cloudwatch_named_field(true, Some(&structured(json!([])))),
            Some(REQUIRED.to_string())
        );
        assert_eq!(validate_cloudwatch_named_field(false, None), None);
    }

    #[test]
    fn cloudwatch_rejects_non_lists() {
        assert_eq!(
            validate_cloudwatch_named_field(false, Some(&FormValue::Text("x".into()))),
            Some(NOT_A_LIST.to_string())
        );
    }

    #[test]
    fn file_log_sort_rules() {
        let numeric = structured(json!([
            { "regexKey": "num", "sortType": "numeric", "ascending": true }
        ]));
        assert_eq!(validate_file_log_sort(true, Some(&numeric)), None);

        let no_key = structured(json!([{ "regexKey": "", "sortType": "numeric" }]));
        assert_eq!(
            validate_file_log_sort(false, Some(&no_key)),
            Some(MISSING_REGEX_KEY.to_string())
        );

        let bad_type = structured(json!([{ "regexKey": "k", "sortType": "random" }]));
        assert_eq!(
            validate_file_log_sort(false, Some(&bad_type)),
            Some(INVALID_SORT_TYPE.to_string())
        );

        let no_layout = structured(json!([{ "regexKey": "ts", "sortType": "timestamp" }]));
        assert_eq!(
            validate_file_log_sort(false, Some(&no_layout)),
            Some(MISSING_LAYOUT.to_string())
        );

        let with_layout = structured(json!([
            { "regexKey": "ts", "sortType": "timestamp", "layout": "%Y%m%d%H" }
        ]));
        assert_eq!(validate_file_log_sort(false, Some(&with_layout)), None);
    }
}
