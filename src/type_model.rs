//! The type model of the type model, written in Schema Markdown.
//!
//! Validating a JSON type model against these types (see
//! [`validate_type_model`](crate::validate::validate_type_model)) checks that it has
//! the shape produced by [`TypeModel`]'s serde implementation.

use crate::ast::TypeModel;
use crate::parser::parse_schema_markdown;
use once_cell::sync::Lazy;

/// Schema Markdown source of the bootstrap type model.
pub const TYPE_MODEL_SOURCE: &str = include_str!("type_model.smd");

pub const TYPE_MODEL_TITLE: &str = "Schema Markdown Type Model";

static TYPE_MODEL: Lazy<TypeModel> = Lazy::new(|| TypeModel {
    title: TYPE_MODEL_TITLE.to_string(),
    types: parse_schema_markdown(TYPE_MODEL_SOURCE).expect("bootstrap type model must parse"),
});

/// The bootstrap type model, parsed on first use.
pub fn type_model() -> &'static TypeModel {
    &TYPE_MODEL
}
