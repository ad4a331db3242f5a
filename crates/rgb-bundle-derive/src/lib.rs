//! Derive macro for the `Serializable` trait.
//!
//! # Usage
//!
//! ```ignore
//! use rgb_entity_state::Serializable;
//!
//! #[derive(Default, Serializable)]
//! #[serializable(tag = "rgb.position.v1")]
//! pub struct Position {
//!     pub x: f64,
//!     pub y: f64,
//!     #[serializable(skip)]
//!     pub dirty: bool,
//! }
//! ```
//!
//! Every field type must implement `BundleValue` and `Clone`.

use proc_macro::TokenStream;
use quote::{quote, quote_spanned};
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

/// Struct-level options.
#[derive(Default)]
struct ContainerAttrs {
    tag: Option<LitStr>,
}

/// Field-level options.
#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    rename: Option<LitStr>,
}

fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("serializable") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                out.tag = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `tag = \"...\"`"))
            }
        })?;
    }
    Ok(out)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("serializable") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                out.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                out.rename = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `rename = \"...\"`"))
            }
        })?;
    }
    Ok(out)
}

/// Derive macro for the `Serializable` trait.
///
/// `write` stores each field under its name; `read` assigns each field whose
/// key is present with a matching kind and leaves the others untouched.
///
/// # Attributes
///
/// - `#[serializable(tag = "...")]` on the struct - explicit type tag used as
///   the instance bundle key. Defaults to the full Rust type name.
/// - `#[serializable(skip)]` on a field - not written, not read.
/// - `#[serializable(rename = "...")]` on a field - key to store it under.
#[proc_macro_derive(Serializable, attributes(serializable))]
pub fn derive_serializable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Ok(quote_spanned! {
                    input.span() =>
                    compile_error!("Serializable can only be derived for structs with named fields.\n\
                                   Field names become bundle keys.");
                });
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Ok(quote_spanned! {
                input.span() =>
                compile_error!("Serializable can only be derived for structs.\n\
                               Implement rgb_entity_state::Serializable by hand for enums.");
            });
        }
    };

    let container = parse_container_attrs(&input.attrs)?;

    let mut writes = Vec::new();
    let mut reads = Vec::new();
    for field in fields {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let key = attrs
            .rename
            .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

        writes.push(quote! {
            bundle.put(#key, ::core::clone::Clone::clone(&self.#ident));
        });
        reads.push(quote! {
            if let ::core::option::Option::Some(value) = bundle.get(#key) {
                self.#ident = value;
            }
        });
    }

    // Without an explicit tag the trait default (full type name) applies.
    let type_tag = container.tag.map(|tag| {
        quote! {
            fn type_tag(&self) -> &'static str {
                #tag
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::rgb_entity_state::Serializable for #name #ty_generics #where_clause {
            #type_tag

            #[allow(unused_variables)]
            fn write(&self, bundle: &mut ::rgb_entity_state::Bundle) {
                #(#writes)*
            }

            #[allow(unused_variables)]
            fn read(&mut self, bundle: &::rgb_entity_state::Bundle) {
                #(#reads)*
            }
        }
    })
}
