//! Crate path resolution for generated code.
//!
//! Detects whether the user depends on `swag` (facade) or `swag-core`
//! directly, and returns the matching path prefix.

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::quote;

/// Returns the token stream for accessing `swag_core` items.
///
/// Both crates declare `extern crate self`, so `Itself` resolves through
/// the absolute path too (their integration tests rely on it).
pub fn swag_core_path() -> TokenStream {
    if let Ok(found) = crate_name("swag") {
        match found {
            FoundCrate::Itself => quote!(::swag),
            FoundCrate::Name(name) => {
                let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
                quote!(::#ident)
            }
        }
    } else if let Ok(found) = crate_name("swag-core") {
        match found {
            FoundCrate::Itself => quote!(::swag_core),
            FoundCrate::Name(name) => {
                let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
                quote!(::#ident)
            }
        }
    } else {
        // Fallback - assume swag_core is available (for error messages)
        quote!(::swag_core)
    }
}
