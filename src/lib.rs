#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Modules
//!
//! - [`document`] — the [`Document`] aggregate and its builder
//! - [`field`] — control fields, data fields, subfields, and their ordered sets
//! - [`indicator`] — the [`IndicatorSpec`] matcher for data field queries
//! - [`parser`] — event-driven XML parsing with recursive record discovery
//! - [`serializer`] — canonical XML output
//! - [`error`] — error types and result type

pub mod document;
pub mod error;
pub mod field;
pub mod indicator;
pub mod parser;
pub mod serializer;

pub use document::{Document, DocumentBuilder};
pub use error::{RecordError, Result};
pub use field::{Controlfield, Datafield, DatafieldBuilder, DatafieldSet, Subfield, SubfieldSet};
pub use indicator::IndicatorSpec;
pub use parser::RecordParser;
