use fql_chain::*;
use time::macros::datetime;

fn object(pairs: Vec<(&str, Value)>) -> Value {
    pairs.into_iter().collect()
}

// ========================================================================
// Arguments
// ========================================================================

#[test]
fn test_string_argument_is_verbatim() {
    assert_eq!(Value::from(".name == \"x\"").to_argument(), ".name == \"x\"");
}

#[test]
fn test_number_arguments() {
    assert_eq!(Value::Integer(-3).to_argument(), "-3");
    assert_eq!(Value::Float(0.1).to_argument(), "0.1");
    assert_eq!(Value::Float(100.0).to_argument(), "100");
    assert_eq!(Value::Float(f64::NAN).to_argument(), "null");
}

#[test]
fn test_structured_argument_is_literal() {
    let value = object(vec![("b", Value::Integer(1)), ("a", Value::from("x"))]);
    assert_eq!(value.to_argument(), r#"{"a":"x","b":1}"#);
}

// ========================================================================
// Literals
// ========================================================================

#[test]
fn test_fql_literals() {
    let value = Value::from(vec![Value::Null, Value::Boolean(true), Value::from("a\"b")]);
    assert_eq!(to_fql(&value), r#"[null,true,"a\"b"]"#);
}

#[test]
fn test_tiny_float_argument() {
    let expected = format!("0.{}1", "0".repeat(29));
    assert_eq!(Value::Float(1e-30).to_argument(), expected);
    assert_eq!(to_fql(&Value::from(vec![1e-30])), format!("[{}]", expected));
}

#[test]
fn test_large_float_argument() {
    assert_eq!(Value::Float(1e21).to_argument(), "1000000000000000000000");
}

#[test]
fn test_time_literals() {
    let value = Value::from(datetime!(2030-01-02 03:04:05 UTC));
    assert_eq!(to_fql(&value), r#"Time("2030-01-02T03:04:05Z")"#);
    assert_eq!(to_json(&value).unwrap(), r#"{"@time":"2030-01-02T03:04:05Z"}"#);
}

#[test]
fn test_last_representable_year() {
    let value = Value::from(datetime!(9999-12-31 23:59:59 UTC));
    assert_eq!(to_fql(&value), r#"Time("9999-12-31T23:59:59Z")"#);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "has no RFC 3339 form")]
fn test_negative_year_has_no_literal() {
    let date = time::Date::from_calendar_date(-1, time::Month::January, 1).unwrap();
    to_fql(&Value::Time(date.midnight().assume_utc()));
}

#[test]
fn test_time_is_normalised_to_utc() {
    let parsed = Value::parse_time("2030-01-02T03:04:05+02:00").unwrap();
    assert_eq!(to_fql(&parsed), r#"Time("2030-01-02T01:04:05Z")"#);
    assert_eq!(Value::parse_time("soon"), None);
}

#[test]
fn test_json_pretty() {
    let value = object(vec![("a", Value::from(vec![1, 2]))]);
    assert_eq!(to_json_pretty(&value).unwrap(), "{\n  \"a\": [\n    1,\n    2\n  ]\n}");
}

#[test]
fn test_json_matches_wire_form() {
    let value = object(vec![
        ("when", Value::from(datetime!(2030-01-02 03:04:05 UTC))),
        ("n", Value::Float(1.5)),
        ("small", Value::Float(1e-7)),
        ("large", Value::Float(1e21)),
        ("nan", Value::Float(f64::NAN)),
    ]);
    let wire = serde_json::to_value(&value).unwrap();

    assert_eq!(to_json(&value).unwrap(), serde_json::to_string(&value).unwrap());
    assert_eq!(cli::value_to_json(&value).unwrap(), wire);
    assert_eq!(wire["small"], serde_json::json!(1e-7));
    assert_eq!(wire["large"], serde_json::json!(1e21));
    assert_eq!(wire["nan"], serde_json::Value::Null);
    assert_eq!(wire["when"], serde_json::json!({ "@time": "2030-01-02T03:04:05Z" }));
}

#[test]
fn test_from_json() {
    let value = Value::from(serde_json::json!({ "a": [1, 2.5, null], "b": true }));
    let expected = object(vec![
        (
            "a",
            Value::Array(vec![Value::Integer(1), Value::Float(2.5), Value::Null]),
        ),
        ("b", Value::Boolean(true)),
    ]);
    assert_eq!(value, expected);
}

#[test]
fn test_option_into_value() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some(3)), Value::Integer(3));
}

// ========================================================================
// Paths
// ========================================================================

#[test]
fn test_parse_fields() {
    let path = Path::parse("user.email");
    assert_eq!(
        path.segments(),
        &[
            PathSegment::Field("user".into()),
            PathSegment::Field("email".into())
        ]
    );
    assert_eq!(path.to_string(), ".user.email");
}

#[test]
fn test_parse_indices() {
    let path = Path::parse("matrix.5.10");
    assert_eq!(path.len(), 3);
    assert_eq!(path.segments()[1], PathSegment::Index(5));
    assert_eq!(path.to_string(), ".matrix[5][10]");
}

#[test]
fn test_mixed_segment_is_a_field() {
    let path = Path::parse("item1.1a");
    assert_eq!(path.segments()[1], PathSegment::Field("1a".into()));
}

#[test]
fn test_empty_path() {
    assert!(Path::parse("").is_empty());
    assert!(Path::parse("..").is_empty());
}

// ========================================================================
// Modalities
// ========================================================================

#[test]
fn test_map_optional_is_idempotent() {
    let once = Modality::Plain.map_optional();
    assert_eq!(once.clone().map_optional(), once);
}

#[test]
fn test_compose() {
    let optional_list = Modality::optional().compose(Modality::list());
    assert_eq!(optional_list, Modality::list().map_optional());
    assert!(optional_list.is_optional());
    assert!(optional_list.is_list());

    let list_of_optional = Modality::list().compose(Modality::optional());
    assert_eq!(list_of_optional, Modality::optional().map_list());
    assert!(!list_of_optional.is_optional());
}

#[test]
fn test_element() {
    assert_eq!(Modality::list().element(), Some(Modality::Plain));
    assert_eq!(Modality::list().map_optional().element(), Some(Modality::optional()));
    assert_eq!(Modality::Plain.element(), None);
}

#[test]
fn test_lookup_through_index_on_non_list() {
    let schema = Schema::new().field("name", FieldType::scalar());
    assert_eq!(schema.lookup(&Path::parse("name.0")), FieldType::unknown());
}
