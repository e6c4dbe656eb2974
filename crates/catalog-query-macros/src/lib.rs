//! Proc macros for catalog-query.
//!
//! # Available Macros
//!
//! - [`Record`] - Generate a `catalog_query::Record` implementation and
//!   field name constants from struct field annotations
//!
//! Use them through `catalog_query` (default `derive` feature) rather than
//! depending on this crate directly; the generated code refers to
//! `::catalog_query` paths.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod record;

/// Derives the `Record` trait for catalog structs.
///
/// Only annotated fields are exposed to the engine; everything else reads
/// as missing.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | Text field (`String` or anything that derefs to `str`) |
/// | `Number` | Numeric field; the type must be `Copy` and convert into `Number` |
/// | `Timestamp` | Date-like field; requires a `RecordTimestamp` impl |
/// | `Label` | Enum-like field exposed as text; requires a `RecordLabel` impl |
/// | `Bool` | Boolean field |
/// | `skip` | Never exposed |
/// | `rename = "..."` | Field name used in queries (default: the Rust name) |
///
/// # Generated Code
///
/// 1. A `pub const` per exposed field holding its query name
///    (`total_duration` renamed to `"totalDuration"` gets `TOTAL_DURATION`)
/// 2. `impl catalog_query::Record`
///
/// # Example
///
/// ```ignore
/// use catalog_query::{Record, RecordLabel};
///
/// enum Level { Beginner, Advanced }
///
/// impl RecordLabel for Level {
///     fn record_label(&self) -> &str {
///         match self {
///             Level::Beginner => "BEGINNER",
///             Level::Advanced => "ADVANCED",
///         }
///     }
/// }
///
/// #[derive(Record)]
/// struct Course {
///     #[record(String)]
///     title: String,
///     #[record(Number, rename = "totalDuration")]
///     total_duration: u32,
///     #[record(Bool, rename = "isFree")]
///     is_free: bool,
///     #[record(Label)]
///     level: Level,
///     #[record(skip)]
///     internal_notes: String,
/// }
///
/// assert_eq!(Course::TOTAL_DURATION, "totalDuration");
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
