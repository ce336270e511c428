//! Property-based tests for the converters
//!
//! These tests use proptest to verify:
//! 1. Writer roundtrip: compact and pretty JSON parse back to the same value
//! 2. Flat objects of scalars survive json -> xml -> json
//! 3. json -> xml yields one `root` element with a self-closing element per null
//! 4. Arbitrary input never panics either parser

use proptest::prelude::*;
use devmate::{
    from_json_str, from_xml_str, json_to_xml, xml_to_json, Array, Number, Object, Value,
    XmlElement,
};
use devmate::json::{to_string, to_string_pretty};

/// Strategy for generating arbitrary JSON values
fn arb_json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(Number::from(n))),
        (-1e6f64..1e6f64).prop_filter_map("non-finite", |f| Number::from_f64(f).map(Value::Number)),
        any::<String>().prop_map(Value::String),
    ];

    leaf.prop_recursive(6, 128, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(|v| Value::Array(Array::from(v))),
            prop::collection::vec((any::<String>(), inner), 0..8)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
        ]
    })
}

/// Scalars whose xml text classifies back to the same json value
fn arb_round_trip_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{1,8}"
            .prop_filter("boolean words", |s| s != "true" && s != "false")
            .prop_filter("float words", |s| s.parse::<f64>().is_err())
            .prop_map(Value::String),
    ]
}

/// Values whose keys are XML names and whose text XML can carry
fn arb_xml_safe_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,12}".prop_map(Value::String),
    ];

    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(|v| Value::Array(Array::from(v))),
            prop::collection::vec(("[a-z_][a-z0-9_.-]{0,8}", inner), 0..6)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
        ]
    })
}

/// Flat objects with unique keys, since xml -> json keeps one value per tag
fn arb_flat_object() -> impl Strategy<Value = Object> {
    prop::collection::vec(("[a-z_][a-z0-9_.-]{0,8}", arb_round_trip_scalar()), 0..12).prop_map(
        |pairs| {
            let mut object = Object::new();
            for (key, value) in pairs {
                object.insert(key, value);
            }
            object
        },
    )
}

fn count_nulls(value: &Value) -> usize {
    match value {
        Value::Null => 1,
        Value::Array(arr) => arr.iter().map(count_nulls).sum(),
        Value::Object(obj) => obj.iter().map(|(_, item)| count_nulls(item)).sum(),
        _ => 0,
    }
}

fn count_self_closing(element: &XmlElement) -> usize {
    usize::from(element.empty) + element.child_elements().map(count_self_closing).sum::<usize>()
}

proptest! {
    #[test]
    fn compact_and_pretty_parse_back(value in arb_json_value()) {
        let compact = from_json_str(&to_string(&value));
        let pretty = from_json_str(&to_string_pretty(&value));
        prop_assert_eq!(compact.as_ref().ok(), Some(&value));
        prop_assert_eq!(pretty.as_ref().ok(), Some(&value));
    }

    #[test]
    fn flat_objects_survive_xml(object in arb_flat_object()) {
        let json = to_string(&Value::Object(object.clone()));
        let back = json_to_xml(&json)
            .and_then(|xml| xml_to_json(&xml, false))
            .and_then(|json| from_json_str(&json));
        let back = back.ok();

        let keys: Vec<&String> = object.keys().collect();
        let back_keys: Option<Vec<&String>> =
            back.as_ref().and_then(Value::as_object).map(|o| o.keys().collect());
        prop_assert_eq!(back_keys, Some(keys));
        prop_assert_eq!(back, Some(Value::Object(object)));
    }

    #[test]
    fn json_to_xml_has_single_root(value in arb_xml_safe_value()) {
        let doc = json_to_xml(&to_string(&value)).and_then(|xml| from_xml_str(&xml));
        prop_assert!(doc.is_ok(), "{:?}", doc.as_ref().err());
        if let Ok(doc) = doc {
            prop_assert_eq!(doc.root.name.as_str(), "root");
            prop_assert_eq!(count_self_closing(&doc.root), count_nulls(&value));
        }
    }

    #[test]
    fn xml_parser_never_panics(input in any::<String>()) {
        let _ = xml_to_json(&input, false);
    }

    #[test]
    fn json_parser_never_panics(input in any::<String>()) {
        let _ = json_to_xml(&input);
    }

    #[test]
    fn tag_soup_never_panics(input in r"(<[a-z]{1,3}( [a-z]='[a-z<&;]*')?/?>|</[a-z]{1,3}>|[a-z &;#x0-9]{0,4}|<!--|-->|<!\[CDATA\[|\]\]>){0,16}") {
        let _ = xml_to_json(&input, true);
    }
}
