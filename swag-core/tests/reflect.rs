use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::json;
use swag_core::{
    define, define_object, inspect, make_schema, Field, FieldMeta, Kind, Reflect, StructType,
    SwagError, TypeInfo,
};
use swag_macros::Reflect;

// ── Fixtures ────────────────────────────────────────────────────────────────

#[derive(Serialize, Reflect)]
struct Category {
    id: i64,
    name: String,
}

/// A pet in the store.
#[derive(Serialize, Reflect)]
#[serde(rename_all = "camelCase")]
struct Pet {
    #[swag(required, example = "42")]
    id: i64,
    category: Category,
    #[swag(required, desc = "Pet name")]
    name: String,
    photo_urls: Vec<String>,
    tags: Option<Vec<Tag>>,
    #[swag(enum = "available,pending,sold")]
    status: String,
}

#[derive(Serialize, Reflect)]
struct Tag {
    id: i64,
    name: String,
}

#[derive(Serialize, Reflect)]
struct Node {
    value: i32,
    children: Vec<Node>,
    parent: Option<Box<Node>>,
}

#[derive(Serialize, Reflect)]
struct Ping {
    ping: Option<Box<Pong>>,
}

#[derive(Serialize, Reflect)]
struct Pong {
    pong: Option<Box<Ping>>,
}

#[derive(Serialize, Reflect)]
struct Hidden {
    #[serde(skip)]
    secret: String,
}

#[derive(Serialize, Reflect)]
struct Audit {
    #[swag(required)]
    created_by: String,
    updated_at: std::time::SystemTime,
}

#[derive(Serialize, Reflect)]
struct Document {
    #[swag(required)]
    title: String,
    #[serde(flatten)]
    audit: Audit,
}

#[derive(Serialize, Reflect)]
struct Described {
    /// From the doc comment.
    a: String,
    /// Doc comment loses.
    #[swag(description = "long description")]
    b: String,
    #[swag(description = "long description", desc = "short")]
    c: String,
}

#[derive(Serialize, Reflect)]
#[serde(rename_all = "snake_case")]
enum Status {
    Available,
    OutOfStock,
}

#[derive(Serialize, Reflect)]
struct Inventory {
    by_status: HashMap<String, Status>,
    blobs: BTreeMap<String, Vec<u8>>,
    lists: HashMap<String, Vec<Tag>>,
    grid: Vec<Vec<i32>>,
    extra: serde_json::Value,
    #[swag(string)]
    big: u64,
    elapsed: std::time::Duration,
}

#[derive(Serialize, Reflect)]
struct Wrapper<T> {
    data: T,
}

#[derive(Serialize, Reflect)]
struct Page<T> {
    items: Vec<T>,
    total: i64,
}

#[derive(Serialize, Reflect)]
struct UserId(u64);

#[derive(Serialize, Reflect)]
struct Weird {
    #[serde(rename = "type")]
    kind: String,
    r#ref: String,
}

fn to_json<T: Serialize>(v: &T) -> serde_json::Value {
    serde_json::to_value(v).unwrap()
}

// ── Type Inspector ──────────────────────────────────────────────────────────

#[test]
fn inspect_primitive_table() {
    let cases = [
        (TypeInfo::of::<i8>(), json!({"type": "integer", "format": "int32"})),
        (TypeInfo::of::<u32>(), json!({"type": "integer", "format": "int32"})),
        (TypeInfo::of::<i64>(), json!({"type": "integer", "format": "int64"})),
        (TypeInfo::of::<u64>(), json!({"type": "integer", "format": "int64"})),
        (TypeInfo::of::<f32>(), json!({"type": "number", "format": "float"})),
        (TypeInfo::of::<f64>(), json!({"type": "number", "format": "double"})),
        (TypeInfo::of::<bool>(), json!({"type": "boolean"})),
        (TypeInfo::of::<String>(), json!({"type": "string"})),
    ];
    for (ty, expected) in cases {
        let p = inspect(&ty, &FieldMeta::default()).unwrap();
        assert_eq!(to_json(&p), expected, "{ty:?}");
    }
}

#[test]
fn inspect_stringified_field_is_string() {
    let p = inspect(&TypeInfo::of::<u64>(), &FieldMeta::json("big,string")).unwrap();
    assert_eq!(to_json(&p), json!({"type": "string"}));
}

#[test]
fn inspect_struct_is_reference() {
    let p = inspect(&TypeInfo::of::<Option<Category>>(), &FieldMeta::default()).unwrap();
    assert_eq!(to_json(&p), json!({"$ref": "#/definitions/reflect.Category"}));
    assert_eq!(p.target.unwrap().definition_name(), "reflect.Category");
}

#[test]
fn inspect_slice_of_pointer_struct() {
    let p = inspect(&TypeInfo::of::<Vec<Box<Tag>>>(), &FieldMeta::default()).unwrap();
    assert_eq!(
        to_json(&p),
        json!({"type": "array", "items": {"$ref": "#/definitions/reflect.Tag"}})
    );
}

#[test]
fn inspect_unknown_named_type_is_error() {
    let err = inspect(&TypeInfo::Named("big.Int"), &FieldMeta::default()).unwrap_err();
    assert!(matches!(err, SwagError::UnknownNamedType(ref n) if n == "big.Int"));
}

// ── Schema Definition Builder ───────────────────────────────────────────────

#[test]
fn define_object_pet() {
    let obj = define_object(&TypeInfo::of::<Pet>(), None).unwrap();
    assert_eq!(obj.name, "reflect.Pet");
    assert!(!obj.is_array);
    assert_eq!(
        to_json(&obj),
        json!({
            "type": "object",
            "description": "A pet in the store.",
            "required": ["id", "name"],
            "properties": {
                "id": {"type": "integer", "format": "int64", "example": "42"},
                "category": {"$ref": "#/definitions/reflect.Category"},
                "name": {"type": "string", "description": "Pet name"},
                "photoUrls": {"type": "array", "items": {"type": "string"}},
                "tags": {"type": "array", "items": {"$ref": "#/definitions/reflect.Tag"}},
                "status": {"type": "string", "enum": ["available", "pending", "sold"]}
            }
        })
    );
}

#[test]
fn define_object_skipped_field_has_no_properties() {
    let obj = define_object(&TypeInfo::of::<Hidden>(), None).unwrap();
    assert!(obj.properties.is_empty());
    assert_eq!(to_json(&obj), json!({"type": "object"}));
}

#[test]
fn define_object_json_dash_tag_is_excluded() {
    let st = StructType::anonymous(vec![
        Field::new("Secret", TypeInfo::of::<String>()).with_meta(FieldMeta::json("-")),
    ]);
    let obj = define_object(&TypeInfo::Struct(st), None).unwrap();
    assert!(obj.properties.is_empty());
}

#[test]
fn define_object_bare_scalar() {
    let obj = define_object(&TypeInfo::of::<i32>(), None).unwrap();
    assert_eq!(obj.name, "int32");
    assert_eq!(obj.ty, "integer");
    assert_eq!(obj.format.as_deref(), Some("int32"));
    assert!(obj.properties.is_empty());

    let obj = define_object(&TypeInfo::of::<Vec<u8>>(), None).unwrap();
    assert!(obj.is_array);
    assert_eq!(obj.name, "uint8");
}

#[test]
fn define_object_flatten_drops_required() {
    let obj = define_object(&TypeInfo::of::<Document>(), None).unwrap();
    let names: Vec<&str> = obj.properties.keys().map(String::as_str).collect();
    assert_eq!(names, ["created_by", "title", "updated_at"]);
    assert_eq!(obj.required, ["title"]);
    assert_eq!(
        to_json(&obj.properties["updated_at"]),
        json!({"$ref": "#/definitions/time.SystemTime"})
    );
}

#[test]
fn define_object_flatten_of_scalar_is_error() {
    let st = StructType::anonymous(vec![Field::flattened("n", TypeInfo::of::<i32>())]);
    let err = define_object(&TypeInfo::Struct(st), None).unwrap_err();
    assert!(matches!(err, SwagError::UnsupportedEmbed { ref field, .. } if field == "n"));
}

#[test]
fn define_object_description_precedence() {
    let obj = define_object(&TypeInfo::of::<Described>(), None).unwrap();
    assert_eq!(obj.properties["a"].description.as_deref(), Some("From the doc comment."));
    assert_eq!(obj.properties["b"].description.as_deref(), Some("long description"));
    assert_eq!(obj.properties["c"].description.as_deref(), Some("short"));
}

#[test]
fn define_object_required_is_deduplicated() {
    let st = StructType::anonymous(vec![
        Field::new("a", TypeInfo::of::<String>()).with_meta(FieldMeta::new().rename("x").required()),
        Field::new("b", TypeInfo::of::<String>()).with_meta(FieldMeta::new().rename("x").required()),
    ]);
    let obj = define_object(&TypeInfo::Struct(st), None).unwrap();
    assert_eq!(obj.required, ["x"]);
}

#[test]
fn define_object_containers() {
    let obj = define_object(&TypeInfo::of::<Inventory>(), None).unwrap();
    assert_eq!(
        to_json(&obj.properties),
        json!({
            "by_status": {
                "type": "object",
                "additionalProperties": {"type": "string", "enum": ["available", "out_of_stock"]}
            },
            "blobs": {"type": "object", "additionalProperties": {"type": "string"}},
            "lists": {
                "type": "object",
                "additionalProperties": {"type": "array", "items": {"$ref": "#/definitions/reflect.Tag"}}
            },
            "grid": {
                "type": "array",
                "items": {"type": "array", "items": {"type": "integer", "format": "int32"}}
            },
            "extra": {},
            "big": {"type": "string"},
            "elapsed": {"$ref": "#/definitions/time.Duration"}
        })
    );
}

#[test]
fn define_object_renames() {
    let obj = define_object(&TypeInfo::of::<Weird>(), None).unwrap();
    let names: Vec<&str> = obj.properties.keys().map(String::as_str).collect();
    assert_eq!(names, ["ref", "type"]);
}

#[test]
fn newtype_delegates_to_inner_type() {
    assert_eq!(UserId::type_info(), TypeInfo::Primitive(Kind::Uint64));
}

// ── Definition Registry ─────────────────────────────────────────────────────

#[test]
fn define_collects_reachable_structs() {
    let defs = define(&TypeInfo::of::<Pet>()).unwrap();
    let names: Vec<&str> = defs.keys().map(String::as_str).collect();
    assert_eq!(names, ["reflect.Category", "reflect.Pet", "reflect.Tag"]);
}

#[test]
fn define_is_idempotent() {
    let once = define(&TypeInfo::of::<Pet>()).unwrap();
    let mut merged = once.clone();
    for (name, obj) in define(&TypeInfo::of::<Pet>()).unwrap() {
        merged.entry(name).or_insert(obj);
    }
    assert_eq!(merged, once);
}

#[test]
fn define_terminates_on_self_reference() {
    let defs = define(&TypeInfo::of::<Node>()).unwrap();
    assert_eq!(defs.len(), 1);
    let node = &defs["reflect.Node"];
    assert_eq!(to_json(&node.properties["parent"]), json!({"$ref": "#/definitions/reflect.Node"}));
}

#[test]
fn define_terminates_on_mutual_reference() {
    let defs = define(&TypeInfo::of::<Ping>()).unwrap();
    let names: Vec<&str> = defs.keys().map(String::as_str).collect();
    assert_eq!(names, ["reflect.Ping", "reflect.Pong"]);
}

#[test]
fn define_follows_map_and_array_values() {
    let defs = define(&TypeInfo::of::<Inventory>()).unwrap();
    assert!(defs.contains_key("reflect.Tag"));
}

#[test]
fn define_carries_property_description() {
    let st = StructType::anonymous(vec![Field::new("category", TypeInfo::of::<Category>())
        .with_meta(FieldMeta::new().description("the category"))]);
    let defs = define(&TypeInfo::Struct(st)).unwrap();
    assert_eq!(defs["reflect.Category"].description.as_deref(), Some("the category"));
}

#[test]
fn define_generic_instantiations_are_distinct() {
    let defs = define(&TypeInfo::of::<Wrapper<Category>>()).unwrap();
    assert!(defs.contains_key("reflect.Wrapper_Category"));
    assert!(defs.contains_key("reflect.Category"));
    assert_ne!(TypeInfo::of::<Wrapper<i32>>(), TypeInfo::of::<Wrapper<Category>>());

    let tags = define(&TypeInfo::of::<Page<Tag>>()).unwrap();
    let pets = define(&TypeInfo::of::<Page<Pet>>()).unwrap();
    assert_eq!(
        to_json(&tags["reflect.Page_Tag"].properties["items"]),
        json!({"type": "array", "items": {"$ref": "#/definitions/reflect.Tag"}})
    );
    assert_eq!(
        to_json(&pets["reflect.Page_Pet"].properties["items"]),
        json!({"type": "array", "items": {"$ref": "#/definitions/reflect.Pet"}})
    );
    assert_eq!(
        TypeInfo::of::<Page<Vec<Tag>>>().definition_name(),
        "reflect.Page_slice_Tag"
    );
}

#[test]
fn std_time_types_define_their_serde_shape() {
    let defs = define(&TypeInfo::of::<Audit>()).unwrap();
    assert_eq!(
        to_json(&defs["time.SystemTime"]),
        json!({
            "type": "object",
            "required": ["secs_since_epoch", "nanos_since_epoch"],
            "properties": {
                "secs_since_epoch": {"type": "integer", "format": "int64"},
                "nanos_since_epoch": {"type": "integer", "format": "int32"}
            }
        })
    );
    let defs = define(&TypeInfo::of::<std::time::Duration>()).unwrap();
    assert_eq!(defs["time.Duration"].required, ["secs", "nanos"]);
}

#[test]
fn anonymous_struct_names_are_stable() {
    let st = StructType::anonymous(vec![Field::new("id", TypeInfo::of::<i32>())]);
    let ty = TypeInfo::Struct(st.clone());
    let first = define(&ty).unwrap();
    let second = define(&ty).unwrap();
    assert_eq!(first.keys().collect::<Vec<_>>(), second.keys().collect::<Vec<_>>());
    assert!(first.contains_key(&st.definition_name()));
    assert!(st.definition_name().starts_with(".ptr"));
}

// ── make_schema ─────────────────────────────────────────────────────────────

#[test]
fn make_schema_struct_and_array() {
    assert_eq!(
        to_json(&make_schema(TypeInfo::of::<Pet>())),
        json!({"$ref": "#/definitions/reflect.Pet"})
    );
    assert_eq!(
        to_json(&make_schema(TypeInfo::of::<Vec<Pet>>())),
        json!({"type": "array", "items": {"$ref": "#/definitions/reflect.Pet"}})
    );
}

#[test]
fn make_schema_array_of_scalars() {
    let schema = make_schema(TypeInfo::of::<Vec<i32>>());
    assert_eq!(
        to_json(&schema),
        json!({"type": "array", "items": {"$ref": "#/definitions/int32"}})
    );
    let defs = define(&schema.prototype).unwrap();
    assert_eq!(to_json(&defs["int32"]), json!({"type": "integer", "format": "int32"}));
}

#[test]
fn nested_sequence_prototype_defines_its_elements() {
    let schema = make_schema(TypeInfo::of::<Vec<Vec<Pet>>>());
    assert_eq!(
        to_json(&schema),
        json!({"type": "array", "items": {"$ref": "#/definitions/slice_reflect.Pet"}})
    );
    let defs = define(&schema.prototype).unwrap();
    assert_eq!(
        to_json(&defs["slice_reflect.Pet"]),
        json!({"type": "array", "items": {"$ref": "#/definitions/reflect.Pet"}})
    );
    assert!(defs.contains_key("reflect.Pet"));
    assert!(defs.contains_key("reflect.Category"));
}

#[test]
fn map_prototype_defines_its_values() {
    let schema = make_schema(TypeInfo::of::<HashMap<String, Pet>>());
    assert_eq!(to_json(&schema), json!({"$ref": "#/definitions/map_reflect.Pet"}));
    let defs = define(&schema.prototype).unwrap();
    assert_eq!(
        to_json(&defs["map_reflect.Pet"]),
        json!({"type": "object", "additionalProperties": {"$ref": "#/definitions/reflect.Pet"}})
    );
    assert!(defs.contains_key("reflect.Pet"));

    let defs = define(&TypeInfo::of::<HashMap<String, i32>>()).unwrap();
    assert_eq!(
        to_json(&defs["map_int32"]),
        json!({"type": "object", "additionalProperties": {"type": "integer", "format": "int32"}})
    );
}

#[test]
fn enum_prototype_keeps_its_values() {
    let schema = make_schema(TypeInfo::of::<Status>());
    assert_eq!(to_json(&schema), json!({"$ref": "#/definitions/reflect.Status"}));
    let defs = define(&schema.prototype).unwrap();
    assert_eq!(
        to_json(&defs["reflect.Status"]),
        json!({"type": "string", "enum": ["available", "out_of_stock"]})
    );
    assert!(!defs.contains_key("string"));
}
