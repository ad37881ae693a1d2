//! Emitters turning resolved plans into Rust items.
//!
//! Every emitted member is gated by a [`Capability`] of the plan. Each type is emitted as a token
//! stream and parsed back into [`syn::Item`]s, so a type that does not form valid Rust surfaces as
//! [`Error::Emission`] instead of reaching the output.

mod matrix;
mod vector;

use std::fmt;

use itertools::Itertools;
use proc_macro2::{Literal, TokenStream};
use quote::{ToTokens, TokenStreamExt};
use syn::Item;

use crate::{
    catalog::ScalarKind,
    rules::{CapabilitySet, Capability, Family, ScalarLiteral},
    Error,
};

pub use matrix::emit_matrix;
pub use vector::emit_vector;

impl ToTokens for ScalarLiteral {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append(match *self {
            ScalarLiteral::Float(v) => Literal::f64_unsuffixed(v),
            ScalarLiteral::Int(v) => Literal::i64_unsuffixed(v),
        });
    }
}

fn usize_lit(n: usize) -> Literal {
    Literal::usize_unsuffixed(n)
}

/// `{{ a, b, c }}` in `format!` syntax, ie. the parts joined by commas inside literal braces.
fn braced<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    format!("{{{{ {} }}}}", parts.into_iter().join(", "))
}

fn emission_error(type_name: &str, reason: impl Into<String>) -> Error {
    Error::Emission {
        type_name: type_name.into(),
        reason: reason.into(),
    }
}

/// Rejects capability sets no type of `family` and `kind` can have.
fn check(
    type_name: &str,
    family: Family,
    kind: ScalarKind,
    caps: &CapabilitySet,
) -> Result<(), Error> {
    if !caps.contains(Capability::Storage) {
        return Err(emission_error(type_name, "the storage capability is missing"));
    }
    for cap in caps.iter() {
        match cap.family() {
            Some(f) if f != family => {
                return Err(emission_error(
                    type_name,
                    format!("`{cap}` is a {f} capability, but this is a {family} type"),
                ));
            }
            _ => {}
        }
        if cap.is_transcendental() && !kind.supports_transcendental() {
            return Err(emission_error(
                type_name,
                format!("`{cap}` needs a square root, which {kind} scalars lack"),
            ));
        }
        if let Some(missing) = cap.requires().iter().find(|req| !caps.contains(**req)) {
            return Err(emission_error(
                type_name,
                format!("`{cap}` requires `{missing}`"),
            ));
        }
    }
    Ok(())
}

fn parse_items(type_name: &str, tokens: TokenStream) -> Result<Vec<Item>, Error> {
    syn::parse2::<syn::File>(tokens)
        .map(|file| file.items)
        .map_err(|e| emission_error(type_name, format!("emitted code does not parse: {e}")))
}
