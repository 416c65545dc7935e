extern crate proc_macro;
use proc_macro::TokenStream;

pub(crate) mod attrs;
pub(crate) mod crate_path;
pub(crate) mod reflect_derive;

/// Derive macro describing a type's structure for Swagger schema generation.
///
/// Generates a `Reflect` impl whose `type_info()` returns the descriptor the
/// schema builder walks.
///
/// # Supported shapes
///
/// | Shape | Descriptor |
/// |-------|------------|
/// | struct with named fields | struct definition named `module.Type` |
/// | newtype `struct Id(u64)` | the inner type |
/// | tuple struct with several fields | array of untyped values |
/// | unit struct | struct definition without properties |
/// | enum with unit variants only | `string` with the variant names as `enum` |
///
/// Generic types are named per instantiation: `Page<Pet>` is defined as
/// `module.Page_Pet`.
///
/// # Serde attributes honored
///
/// `rename` (including `rename(serialize = "..")`), `rename_all`, `skip`,
/// `skip_serializing`, `flatten` and `transparent`. Other serde options are
/// ignored.
///
/// # Field attributes
///
/// | Attribute | Effect |
/// |-----------|--------|
/// | `#[swag(required)]` | adds the field to the definition's `required` list |
/// | `#[swag(string)]` | renders the field as `string` whatever its type |
/// | `#[swag(skip)]` | leaves the field out |
/// | `#[swag(rename = "..")]` | overrides the property name |
/// | `#[swag(example = "..")]` | property `example` |
/// | `#[swag(description = "..")]` | property `description` |
/// | `#[swag(desc = "..")]` | short description, wins over `description` |
/// | `#[swag(enum = "a,b,c")]` | allowed values |
///
/// Doc comments become descriptions when no attribute sets one.
///
/// # Example
///
/// ```ignore
/// use swag::Reflect;
///
/// /// A pet in the store.
/// #[derive(serde::Serialize, Reflect)]
/// #[serde(rename_all = "camelCase")]
/// pub struct Pet {
///     #[swag(required, example = "42")]
///     pub id: i64,
///     #[swag(desc = "Pet name")]
///     pub name: String,
///     pub photo_urls: Vec<String>,
///     pub category: Option<Category>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(swag))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    reflect_derive::expand(input)
}
