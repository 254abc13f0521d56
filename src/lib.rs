//! # Schema Markdown: schema language, type model checks and value validation
//!
//! Schema Markdown is a terse, indentation-based schema definition language. This
//! crate parses it (PEST line grammar) into a type model, checks the model for
//! unknown references, inheritance cycles, duplicate members and illegal
//! attributes, and validates JSON-like values against it with lenient coercion.
//! Values also round-trip through URL query strings ([`encode_query_string`],
//! [`decode_query_string`]).
//!
//! ## Language
//!
//! - **Definitions**: `struct Name`, `union Name`, `enum Name`, each with an optional
//!   base list `(Base1, Base2)`; `typedef <type> Name`; `action Name`
//! - **Members**: `[optional] <type> name`, indented under a struct or union
//! - **Types**: builtins `any`, `bool`, `date`, `datetime`, `float`, `int`, `object`,
//!   `string`, `uuid`; user type names; arrays `T[]`; dicts `T{}` or `K : T{}`
//! - **Attributes**: `int(> 0, <= 100)`, `string(len > 0)`, `T(nullable)`; array and
//!   dict attributes go in the brackets: `string[len > 0]`
//! - **Actions**: indented `path`, `query`, `input`, `output`, `errors` sections and a
//!   `urls` block of `METHOD /path` lines
//! - **Docs**: `# text` documents the next definition, member or value; `#-` is a
//!   plain comment; `group "Name"` sets the doc group; a trailing `\` continues a line
//!
//! ## Example
//!
//! ```text
//! # A point
//! struct Point
//!     float x
//!     float y
//!     optional string(len > 0) label
//!
//! action GetPoint
//!     urls
//!         GET /point
//!     query
//!         int(>= 0) id
//!     output (Point)
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use schema_markdown::{parse_schema_markdown, validate_type, Value};
//!
//! let types = parse_schema_markdown("struct S\n    int a\n").unwrap();
//! let value = Value::from(serde_json::json!({"a": "5"}));
//! assert_eq!(validate_type(&types, "S", &value).unwrap().to_json(), serde_json::json!({"a": 5}));
//! ```

pub mod ast;
pub mod dump;
pub mod lint;
pub mod parser;
pub mod query_string;
pub mod type_model;
pub mod validate;
pub mod value;

pub use ast::{
    get_enum_values, get_referenced_types, get_struct_members, Attributes, BuiltinType, TypeModel, TypeRef,
    Types, UserType,
};
pub use dump::{dump_type_model, dump_types, dump_value, DumpStyle};
pub use lint::{lint, LintMessage, LintRule};
pub use parser::{parse_schema_markdown, Diagnostic, LoadError, ParserError, SchemaMarkdownParser};
pub use query_string::{decode_query_string, encode_query_string, QueryStringError};
pub use type_model::type_model;
pub use validate::{validate_type, validate_type_model, validate_type_model_types, ValidationError};
pub use value::{Key, Value};
