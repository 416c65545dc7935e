//! Schema generation: per-position inspection, object definitions and the
//! closure of every definition reachable from a prototype.

use std::collections::{BTreeMap, HashSet, VecDeque};

use serde::Serialize;

use crate::error::SwagError;
use crate::reflect::{named_type, FieldMeta, StructType, TypeInfo};
use crate::util::make_ref;

/// Shape of one field, sequence element or map value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Struct the `$ref` points at, kept for definition discovery.
    #[serde(skip)]
    pub target: Option<StructType>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Property>>,
}

impl Property {
    fn typed(ty: &str, format: Option<&str>) -> Self {
        Self {
            ty: Some(ty.to_string()),
            format: format.map(str::to_string),
            ..Self::default()
        }
    }

    fn reference_to(st: &StructType) -> Self {
        Self {
            reference: Some(make_ref(&st.definition_name())),
            target: Some(st.clone()),
            ..Self::default()
        }
    }
}

/// A named definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Object {
    /// The prototype was a sequence of this definition.
    #[serde(skip)]
    pub is_array: bool,
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Property>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Property>,
}

/// Schema of a body parameter or a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    /// Type the schema was made from, resolved into definitions on
    /// registration.
    #[serde(skip)]
    pub prototype: TypeInfo,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Shape of a single value position.
///
/// Stringified fields are always `string`. Pointers are looked through;
/// structs become references that [`define`] materializes later.
pub fn inspect(ty: &TypeInfo, meta: &FieldMeta) -> Result<Property, SwagError> {
    if meta.stringify {
        return Ok(Property::typed("string", None));
    }
    classify(ty.peel())
}

fn classify(ty: &TypeInfo) -> Result<Property, SwagError> {
    let property = match ty {
        TypeInfo::Pointer(_) => return classify(ty.peel()),
        TypeInfo::Primitive(kind) => {
            let (ty, format) = kind.schema_type();
            Property::typed(ty, format)
        }
        TypeInfo::Struct(st) => Property::reference_to(st),
        TypeInfo::Enum { values, .. } => Property {
            enum_values: values.clone(),
            ..Property::typed("string", None)
        },
        TypeInfo::Named(name) => {
            let ty = named_type(name).ok_or_else(|| SwagError::UnknownNamedType(name.to_string()))?;
            Property::typed(ty, None)
        }
        TypeInfo::Any => Property::default(),
        TypeInfo::Sequence(elem) => Property {
            items: Some(Box::new(classify(elem.peel())?)),
            ..Property::typed("array", None)
        },
        TypeInfo::Map(value) => {
            let value = if value.is_byte_sequence() {
                Property::typed("string", None)
            } else {
                classify(value.peel())?
            };
            Property {
                additional_properties: Some(Box::new(value)),
                ..Property::typed("object", None)
            }
        }
    };
    Ok(property)
}

/// Split a prototype into its array marker and the type it describes.
fn unwrap_prototype(ty: &TypeInfo) -> (bool, &TypeInfo) {
    match ty.peel() {
        TypeInfo::Sequence(elem) => (true, elem.peel()),
        other => (false, other),
    }
}

/// Build the definition of one prototype without following references.
///
/// Non-struct prototypes produce a definition holding their inspected shape,
/// keyed by [`TypeInfo::definition_name`] (`int32`, `slice_pets.Pet`,
/// `pets.Status`, ...).
pub fn define_object(ty: &TypeInfo, description: Option<&str>) -> Result<Object, SwagError> {
    let (is_array, ty) = unwrap_prototype(ty);

    let TypeInfo::Struct(st) = ty else {
        let p = inspect(ty, &FieldMeta::default())?;
        return Ok(Object {
            is_array,
            name: ty.definition_name(),
            ty: p.ty.unwrap_or_else(|| "object".to_string()),
            description: None,
            format: p.format,
            enum_values: p.enum_values,
            items: p.items,
            additional_properties: p.additional_properties,
            required: Vec::new(),
            properties: BTreeMap::new(),
        });
    };

    let mut properties = BTreeMap::new();
    let mut required = Vec::new();
    let mut embedding = HashSet::new();
    build_properties(st, &mut properties, &mut required, &mut embedding)?;

    Ok(Object {
        is_array,
        name: st.definition_name(),
        ty: "object".to_string(),
        description: description
            .filter(|d| !d.is_empty())
            .or(st.description())
            .map(str::to_string),
        format: None,
        enum_values: Vec::new(),
        items: None,
        additional_properties: None,
        required,
        properties,
    })
}

fn build_properties(
    st: &StructType,
    properties: &mut BTreeMap<String, Property>,
    required: &mut Vec<String>,
    embedding: &mut HashSet<String>,
) -> Result<(), SwagError> {
    embedding.insert(st.definition_name());

    for field in st.fields() {
        if field.flatten {
            let embedded = field.ty.as_struct().ok_or_else(|| SwagError::UnsupportedEmbed {
                owner: st.definition_name(),
                field: field.ident.clone(),
                reason: "embedded type is not a struct",
            })?;
            if embedding.contains(&embedded.definition_name()) {
                return Err(SwagError::UnsupportedEmbed {
                    owner: st.definition_name(),
                    field: field.ident.clone(),
                    reason: "embedded type contains itself",
                });
            }
            // Required markers of embedded fields are not carried over.
            let mut ignored = Vec::new();
            build_properties(embedded, properties, &mut ignored, embedding)?;
            continue;
        }

        let Some(name) = field.meta.serial_name(&field.ident) else {
            continue;
        };
        let mut p = inspect(&field.ty, &field.meta)?;

        if field.meta.required && !required.contains(&name) {
            required.push(name.clone());
        }
        if let Some(example) = field.meta.example.as_ref().filter(|e| !e.is_empty()) {
            p.example = Some(example.clone());
        }
        if let Some(description) = field.meta.resolved_description() {
            p.description = Some(description.to_string());
        }
        if !field.meta.enum_values.is_empty() {
            p.enum_values = field.meta.enum_values.clone();
        }
        properties.insert(name, p);
    }

    embedding.remove(&st.definition_name());
    Ok(())
}

fn collect_targets(p: &Property, description: Option<&str>, queue: &mut VecDeque<(StructType, Option<String>)>) {
    if let Some(target) = &p.target {
        queue.push_back((target.clone(), description.map(str::to_string)));
    }
    if let Some(items) = &p.items {
        collect_targets(items, description, queue);
    }
    if let Some(value) = &p.additional_properties {
        collect_targets(value, description, queue);
    }
}

fn enqueue_references(obj: &Object, queue: &mut VecDeque<(StructType, Option<String>)>) {
    for p in obj.properties.values() {
        collect_targets(p, p.description.as_deref(), queue);
    }
    for p in obj.items.iter().chain(&obj.additional_properties) {
        collect_targets(p, None, queue);
    }
}

/// Every definition reachable from `prototype`, keyed by name.
///
/// Runs until no pending reference is left; a name already defined is never
/// expanded again, which keeps recursive types finite.
pub fn define(prototype: &TypeInfo) -> Result<BTreeMap<String, Object>, SwagError> {
    let mut definitions = BTreeMap::new();
    let mut pending = VecDeque::new();

    let root = define_object(prototype, None)?;
    enqueue_references(&root, &mut pending);
    definitions.insert(root.name.clone(), root);

    while let Some((st, description)) = pending.pop_front() {
        let name = st.definition_name();
        if definitions.contains_key(&name) {
            continue;
        }
        let obj = define_object(&TypeInfo::Struct(st), description.as_deref())?;
        enqueue_references(&obj, &mut pending);
        definitions.insert(name, obj);
    }

    Ok(definitions)
}

/// Schema pointing at the definition of `prototype`; arrays wrap the
/// reference in `items`.
pub fn make_schema(prototype: TypeInfo) -> Schema {
    let (is_array, ty) = unwrap_prototype(&prototype);
    let reference = make_ref(&ty.definition_name());

    if is_array {
        Schema {
            ty: Some("array".to_string()),
            items: Some(Box::new(Property {
                reference: Some(reference),
                ..Property::default()
            })),
            reference: None,
            prototype,
        }
    } else {
        Schema {
            ty: None,
            items: None,
            reference: Some(reference),
            prototype,
        }
    }
}
