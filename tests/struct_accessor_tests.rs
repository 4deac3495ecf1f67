//! Integration tests for getters and updaters over schema-carrying records.

use recordpath::jsonpath::{PathError, PathMap, StructGetter, StructUpdater};
use recordpath::record::{DataError, Kind, Map, Schema, Struct, Value};

fn address_schema() -> Schema {
    Schema::builder()
        .name("address")
        .field("city", Schema::string())
        .field("zip", Schema::string().optional())
        .build()
}

fn person_schema() -> Schema {
    Schema::builder()
        .name("person")
        .field("name", Schema::string())
        .field("age", Schema::int32())
        .field("email", Schema::string().optional())
        .field("address", address_schema())
        .field("tags", Schema::array(Schema::string()))
        .field("previous", Schema::array(address_schema()).optional())
        .field(
            "labels",
            Schema::map(Schema::string(), Schema::string()).optional(),
        )
        .build()
}

fn address(city: &str) -> Struct {
    let mut address = Struct::new(address_schema()).unwrap();
    address.put("city", city).unwrap();
    address
}

fn person() -> Struct {
    let mut person = Struct::new(person_schema()).unwrap();
    person
        .put("name", "Grace")
        .unwrap()
        .put("age", 85)
        .unwrap()
        .put("address", address("Arlington"))
        .unwrap()
        .put("tags", vec![Value::from("navy"), Value::from("cobol")])
        .unwrap()
        .put(
            "previous",
            vec![Value::Struct(address("New York")), Value::Struct(address("Boston"))],
        )
        .unwrap();
    person
}

fn get(expression: &str, record: &Struct) -> Result<PathMap, PathError> {
    StructGetter::new(expression).unwrap().run(record)
}

fn paths(found: &PathMap) -> Vec<&str> {
    found.keys().map(String::as_str).collect()
}

#[test]
fn test_get_field() {
    let found = get("$.address.city", &person()).unwrap();
    assert_eq!(found["$.address.city"], Value::from("Arlington"));
}

#[test]
fn test_get_unset_field_is_empty() {
    assert!(get("$.email", &person()).unwrap().is_empty());
    assert!(get("$.address.zip", &person()).unwrap().is_empty());
}

#[test]
fn test_get_undeclared_field_is_empty() {
    assert!(get("$.nickname", &person()).unwrap().is_empty());
}

#[test]
fn test_get_root_is_the_record() {
    let record = person();
    let found = get("$", &record).unwrap();
    assert_eq!(found["$"], Value::Struct(record));
}

#[test]
fn test_get_wildcard_in_declaration_order() {
    let found = get("$.*", &person()).unwrap();
    assert_eq!(
        paths(&found),
        vec!["$.name", "$.age", "$.address", "$.tags", "$.previous"]
    );
}

#[test]
fn test_get_fan_out_over_struct_array() {
    let found = get("$.previous[*].city", &person()).unwrap();
    assert_eq!(
        paths(&found),
        vec!["$.previous[0].city", "$.previous[1].city"]
    );
    assert_eq!(found["$.previous[1].city"], Value::from("Boston"));
}

#[test]
fn test_get_type_mismatch() {
    let err = get("$.name.first", &person()).unwrap_err();
    assert_eq!(err.to_string(), "field '$.name' is not a Struct but String");

    let err = get("$.address[0]", &person()).unwrap_err();
    assert_eq!(err.to_string(), "field '$.address' is not an Array but Struct");
}

#[test]
fn test_update_leaf() {
    let original = person();
    let updated = StructUpdater::new("$.address.city")
        .unwrap()
        .run(&original, &Value::from("Washington"))
        .unwrap();
    assert_eq!(
        updated.get("address").unwrap().as_struct().unwrap().get("city").unwrap(),
        &Value::from("Washington")
    );
    assert_eq!(original, person());
}

#[test]
fn test_update_sets_unset_field() {
    let updated = StructUpdater::new("$.email")
        .unwrap()
        .run(&person(), &Value::from("grace@navy.mil"))
        .unwrap();
    assert_eq!(updated.get("email").unwrap(), &Value::from("grace@navy.mil"));
}

#[test]
fn test_update_selective_over_array() {
    let mut values = PathMap::new();
    values.insert("$.previous[0].city".to_string(), Value::from("NYC"));
    values.insert("$.previous[7].city".to_string(), Value::from("nowhere"));

    let updated = StructUpdater::new("$.previous[*].city")
        .unwrap()
        .run(&person(), &values)
        .unwrap();
    let found = get("$.previous[*].city", &updated).unwrap();
    assert_eq!(found["$.previous[0].city"], Value::from("NYC"));
    assert_eq!(found["$.previous[1].city"], Value::from("Boston"));
}

#[test]
fn test_update_array_element() {
    let updated = StructUpdater::new("$.tags[1]")
        .unwrap()
        .run(&person(), &Value::from("flow-matic"))
        .unwrap();
    assert_eq!(
        updated.get("tags").unwrap(),
        &Value::Array(vec![Value::from("navy"), Value::from("flow-matic")])
    );
}

#[test]
fn test_update_never_overwrites_structs() {
    let original = person();
    let updated = StructUpdater::new("$.address")
        .unwrap()
        .run(&original, &Value::from("flat"))
        .unwrap();
    assert_eq!(updated, original);
}

#[test]
fn test_update_wrong_kind_is_access_error() {
    let err = StructUpdater::new("$.age")
        .unwrap()
        .run(&person(), &Value::from("old"))
        .unwrap_err();
    match &err {
        PathError::Access { path, model, source } => {
            assert_eq!(path, "$.age");
            assert_eq!(*model, "Struct");
            assert_eq!(
                source,
                &DataError::invalid_value("field age", Kind::Int32, Kind::String)
            );
        }
        other => panic!("expected an access error, got {:?}", other),
    }
    assert!(err
        .to_string()
        .starts_with("An error occurred during processing of Struct value '$.age'"));
}

#[test]
fn test_update_array_element_keeps_kind() {
    let err = StructUpdater::new("$.tags[0]")
        .unwrap()
        .run(&person(), &Value::Int32(1))
        .unwrap_err();
    assert!(matches!(err, PathError::Access { .. }));
    assert_eq!(err.path(), "$.tags[0]");
}

#[test]
fn test_clone_rejects_map_field() {
    let mut record = person();
    let mut labels = Map::new();
    labels.insert("team".to_string(), Value::from("compilers"));
    record.put("labels", labels).unwrap();

    let err = StructUpdater::new("$.name")
        .unwrap()
        .run(&record, &Value::from("G"))
        .unwrap_err();
    assert!(matches!(
        err,
        PathError::UnsupportedKind {
            kind: Kind::Map,
            ..
        }
    ));
    assert_eq!(err.path(), "$.labels");
}

#[test]
fn test_empty_update_returns_equal_copy() {
    let original = person();
    let updated = StructUpdater::new("$.name")
        .unwrap()
        .run(&original, &PathMap::new())
        .unwrap();
    assert_eq!(updated, original);
    assert!(updated.validate().is_ok());
}

fn sparse_schema() -> Schema {
    Schema::builder()
        .name("sparse")
        .field("nums", Schema::array(Schema::int32().optional()))
        .field("stops", Schema::array(address_schema().optional()))
        .build()
}

fn sparse() -> Struct {
    let mut record = Struct::new(sparse_schema()).unwrap();
    record
        .put("nums", vec![Value::Int32(1), Value::Null])
        .unwrap()
        .put("stops", vec![Value::Struct(address("Boston")), Value::Null])
        .unwrap();
    record
}

#[test]
fn test_update_null_element_checks_element_schema() {
    let original = sparse();
    let err = StructUpdater::new("$.nums[1]")
        .unwrap()
        .run(&original, &Value::from("oops"))
        .unwrap_err();
    match &err {
        PathError::Access { path, source, .. } => {
            assert_eq!(path, "$.nums[1]");
            assert_eq!(
                source,
                &DataError::invalid_value("element 1 of field nums", Kind::Int32, Kind::String)
            );
        }
        other => panic!("expected an access error, got {:?}", other),
    }
    assert_eq!(original, sparse());
}

#[test]
fn test_update_null_struct_element_rejects_leaf() {
    let err = StructUpdater::new("$.stops[1]")
        .unwrap()
        .run(&sparse(), &Value::Int32(7))
        .unwrap_err();
    assert!(matches!(err, PathError::Access { .. }));
    assert_eq!(err.path(), "$.stops[1]");
}

#[test]
fn test_update_null_element_accepts_declared_kind() {
    let updated = StructUpdater::new("$.nums[1]")
        .unwrap()
        .run(&sparse(), &Value::Int32(2))
        .unwrap();
    assert_eq!(
        updated.get("nums").unwrap(),
        &Value::Array(vec![Value::Int32(1), Value::Int32(2)])
    );
    assert!(updated.validate().is_ok());
}

#[test]
fn test_update_null_struct_element_rejects_other_schema() {
    let mut badge = Struct::new(Schema::builder().name("badge").field("city", Schema::string()).build()).unwrap();
    badge.put("city", "Quantico").unwrap();

    let err = StructUpdater::new("$.stops[1]")
        .unwrap()
        .run(&sparse(), &Value::Struct(badge))
        .unwrap_err();
    match err {
        PathError::Access { source, .. } => assert!(matches!(source, DataError::SchemaMismatch { .. })),
        other => panic!("expected an access error, got {:?}", other),
    }

    let updated = StructUpdater::new("$.stops[1]")
        .unwrap()
        .run(&sparse(), &Value::Struct(address("Denver")))
        .unwrap();
    let found = get("$.stops[*].city", &updated).unwrap();
    assert_eq!(found["$.stops[1].city"], Value::from("Denver"));
}
