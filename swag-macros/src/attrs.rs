//! Attribute extraction: `#[serde(...)]`, `#[swag(...)]` and doc comments.

use syn::meta::ParseNestedMeta;
use syn::{Lit, Meta, Token};

/// Serde's `rename_all` casing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            _ => return None,
        })
    }

    /// Rename a `snake_case` field identifier.
    pub(crate) fn apply_to_field(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_string(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => {
                let mut out = String::with_capacity(field.len());
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        out.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        out.push(ch);
                    }
                }
                out
            }
            Self::Camel => {
                let pascal = Self::Pascal.apply_to_field(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }

    /// Rename a `PascalCase` variant identifier.
    pub(crate) fn apply_to_variant(self, variant: &str) -> String {
        match self {
            Self::Pascal => variant.to_string(),
            Self::Lower => variant.to_ascii_lowercase(),
            Self::Upper => variant.to_ascii_uppercase(),
            Self::Camel => {
                let mut chars = variant.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            }
            Self::Snake => {
                let mut snake = String::with_capacity(variant.len() + 4);
                for (i, ch) in variant.char_indices() {
                    if i > 0 && ch.is_uppercase() {
                        snake.push('_');
                    }
                    snake.push(ch.to_ascii_lowercase());
                }
                snake
            }
            Self::ScreamingSnake => Self::Snake.apply_to_variant(variant).to_ascii_uppercase(),
            Self::Kebab => Self::Snake.apply_to_variant(variant).replace('_', "-"),
            Self::ScreamingKebab => Self::ScreamingSnake.apply_to_variant(variant).replace('_', "-"),
        }
    }
}

/// Struct- or enum-level attributes.
#[derive(Default)]
pub(crate) struct ContainerAttrs {
    pub rename: Option<String>,
    pub rename_all: Option<RenameRule>,
    pub transparent: bool,
    pub doc: Option<String>,
}

/// Field- or variant-level attributes.
#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub rename: Option<String>,
    pub skip: bool,
    pub flatten: bool,
    pub stringify: bool,
    pub required: bool,
    pub example: Option<String>,
    pub description: Option<String>,
    pub desc: Option<String>,
    pub enum_values: Vec<String>,
    pub doc: Option<String>,
}

/// Extract doc comments, trimmed lines joined by a space.
pub(crate) fn extract_doc_comment(attrs: &[syn::Attribute]) -> Option<String> {
    let docs: Vec<String> = attrs
        .iter()
        .filter_map(|attr| {
            if attr.path().is_ident("doc") {
                if let Meta::NameValue(nv) = &attr.meta {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        return Some(s.value().trim().to_string());
                    }
                }
            }
            None
        })
        .filter(|line| !line.is_empty())
        .collect();
    if docs.is_empty() {
        None
    } else {
        Some(docs.join(" "))
    }
}

/// Consume the value of a nested meta item we do not interpret.
fn skip_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|nested| skip_value(&nested))?;
    }
    Ok(())
}

fn lit_str(meta: &ParseNestedMeta) -> syn::Result<String> {
    let lit: syn::LitStr = meta.value()?.parse()?;
    Ok(lit.value())
}

/// Any literal rendered as text: `example = 42` and `example = "42"` agree.
fn lit_text(meta: &ParseNestedMeta) -> syn::Result<String> {
    let lit: Lit = meta.value()?.parse()?;
    Ok(match lit {
        Lit::Str(s) => s.value(),
        Lit::Int(i) => i.base10_digits().to_string(),
        Lit::Float(f) => f.base10_digits().to_string(),
        Lit::Bool(b) => b.value.to_string(),
        Lit::Char(c) => c.value().to_string(),
        other => return Err(syn::Error::new_spanned(other, "expected a literal value")),
    })
}

/// `rename = "x"` or `rename(serialize = "x", deserialize = "y")`.
fn serialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        return lit_str(meta).map(Some);
    }
    let mut name = None;
    meta.parse_nested_meta(|nested| {
        if nested.path.is_ident("serialize") {
            name = Some(lit_str(&nested)?);
            Ok(())
        } else {
            skip_value(&nested)
        }
    })?;
    Ok(name)
}

pub(crate) fn container_attrs(attrs: &[syn::Attribute]) -> syn::Result<ContainerAttrs> {
    let mut result = ContainerAttrs {
        doc: extract_doc_comment(attrs),
        ..ContainerAttrs::default()
    };
    for attr in attrs {
        if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    result.rename = serialize_name(&meta)?;
                    Ok(())
                } else if meta.path.is_ident("rename_all") {
                    let value = serialize_name(&meta)?;
                    if let Some(value) = value {
                        result.rename_all = Some(RenameRule::parse(&value).ok_or_else(|| {
                            meta.error(format!("unknown rename_all rule `{value}`"))
                        })?);
                    }
                    Ok(())
                } else if meta.path.is_ident("transparent") {
                    result.transparent = true;
                    Ok(())
                } else {
                    skip_value(&meta)
                }
            })?;
        } else if attr.path().is_ident("swag") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    result.rename = Some(lit_str(&meta)?);
                    Ok(())
                } else if meta.path.is_ident("description") {
                    result.doc = Some(lit_str(&meta)?);
                    Ok(())
                } else {
                    Err(meta.error("expected `rename` or `description` in #[swag(...)]"))
                }
            })?;
        }
    }
    Ok(result)
}

pub(crate) fn field_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs {
        doc: extract_doc_comment(attrs),
        ..FieldAttrs::default()
    };
    for attr in attrs {
        if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if let Some(name) = serialize_name(&meta)? {
                        result.rename = Some(name);
                    }
                    Ok(())
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    result.skip = true;
                    Ok(())
                } else if meta.path.is_ident("flatten") {
                    result.flatten = true;
                    Ok(())
                } else {
                    skip_value(&meta)
                }
            })?;
        } else if attr.path().is_ident("swag") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("required") {
                    result.required = true;
                } else if meta.path.is_ident("string") {
                    result.stringify = true;
                } else if meta.path.is_ident("skip") {
                    result.skip = true;
                } else if meta.path.is_ident("rename") {
                    result.rename = Some(lit_str(&meta)?);
                } else if meta.path.is_ident("example") {
                    result.example = Some(lit_text(&meta)?);
                } else if meta.path.is_ident("description") {
                    result.description = Some(lit_str(&meta)?);
                } else if meta.path.is_ident("desc") {
                    result.desc = Some(lit_str(&meta)?);
                } else if meta.path.is_ident("enum") {
                    result.enum_values = lit_str(&meta)?
                        .split(',')
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                        .collect();
                } else {
                    return Err(meta.error(
                        "expected `required`, `string`, `skip`, `rename`, `example`, `description`, `desc`, or `enum` in #[swag(...)]",
                    ));
                }
                Ok(())
            })?;
        }
    }
    Ok(result)
}
