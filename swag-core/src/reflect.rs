//! Type descriptors: the structural view of a Rust type that schema
//! generation works from.
//!
//! A [`TypeInfo`] is produced by [`Reflect::type_info`], either from the
//! impls in this module or from `#[derive(Reflect)]`. Struct descriptors
//! list their fields lazily so recursive types can describe themselves.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::util::normalize_name;

/// Primitive kinds, named the way bare scalar definitions are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::String => "string",
        }
    }

    /// Swagger `type` and `format` for this kind.
    pub fn schema_type(self) -> (&'static str, Option<&'static str>) {
        match self {
            Kind::Int
            | Kind::Int8
            | Kind::Int16
            | Kind::Int32
            | Kind::Uint
            | Kind::Uint8
            | Kind::Uint16
            | Kind::Uint32 => ("integer", Some("int32")),
            Kind::Int64 | Kind::Uint64 => ("integer", Some("int64")),
            Kind::Float32 => ("number", Some("float")),
            Kind::Float64 => ("number", Some("double")),
            Kind::Bool => ("boolean", None),
            Kind::String => ("string", None),
        }
    }
}

/// Structural description of a type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeInfo {
    Primitive(Kind),
    /// `Option<T>`, `Box<T>`, `Rc<T>`, `Arc<T>`, `&T`.
    Pointer(Box<TypeInfo>),
    /// Any ordered or unordered collection of `T`.
    Sequence(Box<TypeInfo>),
    /// A string-keyed dictionary; only the value type matters.
    Map(Box<TypeInfo>),
    Struct(StructType),
    /// A fieldless enum serialized as one of its variant names.
    Enum {
        namespace: String,
        name: String,
        values: Vec<String>,
    },
    /// A type rendered through the fixed name table, see [`named_type`].
    Named(&'static str),
    /// A value of any shape.
    Any,
}

impl TypeInfo {
    pub fn of<T: Reflect + ?Sized>() -> TypeInfo {
        T::type_info()
    }

    /// Describe a fieldless enum declared in `module_path`.
    pub fn enumeration<I, S>(module_path: &str, name: impl Into<String>, values: I) -> TypeInfo
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TypeInfo::Enum {
            namespace: last_segment(module_path).to_string(),
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Strip every pointer level.
    pub fn peel(&self) -> &TypeInfo {
        let mut current = self;
        while let TypeInfo::Pointer(inner) = current {
            current = inner;
        }
        current
    }

    pub fn is_byte_sequence(&self) -> bool {
        match self.peel() {
            TypeInfo::Sequence(elem) => matches!(elem.peel(), TypeInfo::Primitive(Kind::Uint8)),
            _ => false,
        }
    }

    pub fn as_struct(&self) -> Option<&StructType> {
        match self.peel() {
            TypeInfo::Struct(st) => Some(st),
            _ => None,
        }
    }

    /// Key of the definition describing this type.
    ///
    /// Structs and enums use `namespace.Name`; scalars their kind name
    /// (`int32`, `string`); containers spell out their element type
    /// (`slice_int32`, `map_pets.Pet`) so distinct shapes never share a key.
    pub fn definition_name(&self) -> String {
        match self {
            TypeInfo::Primitive(kind) => kind.name().to_string(),
            TypeInfo::Pointer(inner) => inner.peel().definition_name(),
            TypeInfo::Sequence(elem) => format!("slice_{}", elem.definition_name()),
            TypeInfo::Map(value) => format!("map_{}", value.definition_name()),
            TypeInfo::Struct(st) => st.definition_name(),
            TypeInfo::Enum { namespace, name, .. } => normalize_name(&format!("{namespace}.{name}")),
            TypeInfo::Named(name) => normalize_name(name),
            TypeInfo::Any => "interface".to_string(),
        }
    }

    /// Like [`definition_name`](Self::definition_name) without namespaces,
    /// used to spell generic arguments.
    pub fn type_name(&self) -> String {
        match self {
            TypeInfo::Pointer(inner) => inner.peel().type_name(),
            TypeInfo::Sequence(elem) => format!("slice_{}", elem.type_name()),
            TypeInfo::Map(value) => format!("map_{}", value.type_name()),
            TypeInfo::Struct(st) => match st.name() {
                Some(name) => name.to_string(),
                None => st.definition_name().trim_start_matches('.').to_string(),
            },
            TypeInfo::Enum { name, .. } => name.clone(),
            TypeInfo::Named(name) => normalize_name(name.rsplit('.').next().unwrap_or(name)),
            other => other.definition_name(),
        }
    }
}

fn last_segment(module_path: &str) -> &str {
    module_path.rsplit("::").next().unwrap_or_default()
}

/// Name of one instantiation of a generic struct: `Page` with `Pet` is
/// `Page_Pet`, with `Vec<User>` it is `Page_slice_User`.
pub fn generic_name(base: &str, args: &[TypeInfo]) -> String {
    let mut name = base.to_string();
    for arg in args {
        name.push('_');
        name.push_str(&arg.type_name());
    }
    name
}

/// Primitive `type` for the special-cased named types, or `None` when the
/// name is not in the table.
pub fn named_type(name: &str) -> Option<&'static str> {
    match name {
        "time.Time" => Some("string"),
        "time.Duration" => Some("integer"),
        "json.Number" => Some("number"),
        "chrono.DateTime" | "chrono.NaiveDateTime" | "chrono.NaiveDate" => Some("string"),
        "uuid.Uuid" => Some("string"),
        _ => None,
    }
}

enum FieldSource {
    Lazy(fn() -> Vec<Field>),
    Fixed(Vec<Field>),
}

struct StructInner {
    name: Option<String>,
    namespace: String,
    description: Option<String>,
    fields: FieldSource,
}

/// Handle to a struct descriptor.
///
/// Cloning is cheap and keeps the identity: an anonymous descriptor is named
/// after its allocation, so every clone maps to the same definition.
#[derive(Clone)]
pub struct StructType(Arc<StructInner>);

impl StructType {
    /// Describe a named struct. `module_path` is usually `module_path!()`;
    /// its last segment becomes the namespace of the definition name.
    pub fn new(module_path: &str, name: impl Into<String>, fields: fn() -> Vec<Field>) -> Self {
        Self(Arc::new(StructInner {
            name: Some(name.into()),
            namespace: last_segment(module_path).to_string(),
            description: None,
            fields: FieldSource::Lazy(fields),
        }))
    }

    /// Describe a struct with no intrinsic name from an explicit field list.
    pub fn anonymous(fields: Vec<Field>) -> Self {
        Self(Arc::new(StructInner {
            name: None,
            namespace: String::new(),
            description: None,
            fields: FieldSource::Fixed(fields),
        }))
    }

    /// Attach the struct-level description (its doc comment).
    ///
    /// Call before sharing the handle; a shared handle is copied so other
    /// holders keep their descriptor.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if let Some(inner) = Arc::get_mut(&mut self.0) {
            inner.description = Some(description);
            return self;
        }
        let inner = &self.0;
        Self(Arc::new(StructInner {
            name: inner.name.clone(),
            namespace: inner.namespace.clone(),
            description: Some(description),
            fields: match &inner.fields {
                FieldSource::Lazy(f) => FieldSource::Lazy(*f),
                FieldSource::Fixed(fields) => FieldSource::Fixed(fields.clone()),
            },
        }))
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    pub fn fields(&self) -> Vec<Field> {
        match &self.0.fields {
            FieldSource::Lazy(f) => f(),
            FieldSource::Fixed(fields) => fields.clone(),
        }
    }

    /// `namespace.Name`, or `.ptr<address>` for anonymous descriptors.
    pub fn definition_name(&self) -> String {
        let name = match &self.0.name {
            Some(name) => name.clone(),
            None => format!("ptr{}", Arc::as_ptr(&self.0) as usize),
        };
        normalize_name(&format!("{}.{}", self.0.namespace, name))
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.definition_name() == other.definition_name()
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StructType").field(&self.definition_name()).finish()
    }
}

/// One field of a struct descriptor.
#[derive(Debug, Clone)]
pub struct Field {
    pub ident: String,
    pub ty: TypeInfo,
    /// Embedded field whose own fields are lifted into the owner.
    pub flatten: bool,
    pub meta: FieldMeta,
}

impl Field {
    pub fn new(ident: impl Into<String>, ty: TypeInfo) -> Self {
        Self {
            ident: ident.into(),
            ty,
            flatten: false,
            meta: FieldMeta::default(),
        }
    }

    pub fn flattened(ident: impl Into<String>, ty: TypeInfo) -> Self {
        Self {
            flatten: true,
            ..Self::new(ident, ty)
        }
    }

    pub fn with_meta(mut self, meta: FieldMeta) -> Self {
        self.meta = meta;
        self
    }
}

/// Serialization and documentation annotations of a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMeta {
    pub rename: Option<String>,
    pub skip: bool,
    /// Encoded as a string whatever the underlying type.
    pub stringify: bool,
    pub required: bool,
    pub example: Option<String>,
    pub description: Option<String>,
    pub desc: Option<String>,
    pub doc: Option<String>,
    pub enum_values: Vec<String>,
}

impl FieldMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a json-style tag: `"name,omitempty"`, `",string"`, `"-"`.
    pub fn json(tag: &str) -> Self {
        let mut meta = Self::default();
        let tag = tag.trim();
        let mut parts = tag.split(',');
        let name = parts.next().unwrap_or_default().trim();
        match name {
            "-" => meta.skip = true,
            "" => {}
            name => meta.rename = Some(name.to_string()),
        }
        meta.stringify = parts.any(|opt| opt.trim() == "string");
        meta
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.rename = Some(name.into());
        self
    }

    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn stringify(mut self) -> Self {
        self.stringify = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Name the field is serialized under, `None` when it is excluded.
    pub fn serial_name(&self, ident: &str) -> Option<String> {
        if self.skip {
            return None;
        }
        let name = match self.rename.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => ident.strip_prefix("r#").unwrap_or(ident),
        };
        if name == "-" {
            return None;
        }
        Some(name.to_string())
    }

    /// `desc`, then `description`, then the doc comment.
    pub fn resolved_description(&self) -> Option<&str> {
        [&self.desc, &self.description, &self.doc]
            .into_iter()
            .filter_map(|d| d.as_deref())
            .find(|d| !d.is_empty())
    }
}

/// Types that can describe their own structure.
pub trait Reflect {
    fn type_info() -> TypeInfo;
}

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::Primitive(Kind::$kind)
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    isize => Int,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    usize => Uint,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
    String => String,
    str => String,
    char => String,
}

macro_rules! impl_pointer {
    ($($ty:ident),*) => {
        $(
            impl<T: Reflect + ?Sized> Reflect for $ty<T> {
                fn type_info() -> TypeInfo {
                    TypeInfo::Pointer(Box::new(T::type_info()))
                }
            }
        )*
    };
}

impl_pointer!(Box, Rc, Arc);

impl<T: Reflect> Reflect for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::Pointer(Box::new(T::type_info()))
    }
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn type_info() -> TypeInfo {
        TypeInfo::Pointer(Box::new(T::type_info()))
    }
}

impl<'a, T: Reflect + ToOwned + ?Sized + 'a> Reflect for Cow<'a, T> {
    fn type_info() -> TypeInfo {
        TypeInfo::Pointer(Box::new(T::type_info()))
    }
}

macro_rules! impl_sequence {
    ($($ty:ident),*) => {
        $(
            impl<T: Reflect> Reflect for $ty<T> {
                fn type_info() -> TypeInfo {
                    TypeInfo::Sequence(Box::new(T::type_info()))
                }
            }
        )*
    };
}

impl_sequence!(Vec, VecDeque, LinkedList, BTreeSet);

impl<T: Reflect, S> Reflect for HashSet<T, S> {
    fn type_info() -> TypeInfo {
        TypeInfo::Sequence(Box::new(T::type_info()))
    }
}

impl<T: Reflect> Reflect for [T] {
    fn type_info() -> TypeInfo {
        TypeInfo::Sequence(Box::new(T::type_info()))
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::Sequence(Box::new(T::type_info()))
    }
}

impl<K, V: Reflect, S> Reflect for HashMap<K, V, S> {
    fn type_info() -> TypeInfo {
        TypeInfo::Map(Box::new(V::type_info()))
    }
}

impl<K, V: Reflect> Reflect for BTreeMap<K, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::Map(Box::new(V::type_info()))
    }
}

impl Reflect for serde_json::Value {
    fn type_info() -> TypeInfo {
        TypeInfo::Any
    }
}

impl Reflect for serde_json::Map<String, serde_json::Value> {
    fn type_info() -> TypeInfo {
        TypeInfo::Map(Box::new(TypeInfo::Any))
    }
}

impl Reflect for serde_json::Number {
    fn type_info() -> TypeInfo {
        TypeInfo::Named("json.Number")
    }
}

// serde writes both as plain structs of seconds and nanoseconds.
impl Reflect for std::time::Duration {
    fn type_info() -> TypeInfo {
        let fields: fn() -> Vec<Field> = || {
            vec![
                Field::new("secs", TypeInfo::Primitive(Kind::Uint64)).with_meta(FieldMeta::new().required()),
                Field::new("nanos", TypeInfo::Primitive(Kind::Uint32)).with_meta(FieldMeta::new().required()),
            ]
        };
        TypeInfo::Struct(StructType::new("time", "Duration", fields))
    }
}

impl Reflect for std::time::SystemTime {
    fn type_info() -> TypeInfo {
        let fields: fn() -> Vec<Field> = || {
            vec![
                Field::new("secs_since_epoch", TypeInfo::Primitive(Kind::Uint64))
                    .with_meta(FieldMeta::new().required()),
                Field::new("nanos_since_epoch", TypeInfo::Primitive(Kind::Uint32))
                    .with_meta(FieldMeta::new().required()),
            ]
        };
        TypeInfo::Struct(StructType::new("time", "SystemTime", fields))
    }
}

#[cfg(feature = "chrono")]
mod chrono_impls {
    use super::{Reflect, TypeInfo};

    impl<Tz: chrono::TimeZone> Reflect for chrono::DateTime<Tz> {
        fn type_info() -> TypeInfo {
            TypeInfo::Named("chrono.DateTime")
        }
    }

    impl Reflect for chrono::NaiveDateTime {
        fn type_info() -> TypeInfo {
            TypeInfo::Named("chrono.NaiveDateTime")
        }
    }

    impl Reflect for chrono::NaiveDate {
        fn type_info() -> TypeInfo {
            TypeInfo::Named("chrono.NaiveDate")
        }
    }
}

#[cfg(feature = "uuid")]
impl Reflect for uuid::Uuid {
    fn type_info() -> TypeInfo {
        TypeInfo::Named("uuid.Uuid")
    }
}
