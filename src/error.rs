//! Error types for record operations.
//!
//! This module provides the [`RecordError`] type for all parsing and
//! serialization operations and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all record parsing and serialization operations.
///
/// Input that simply contains no record element is not an error; the
/// parser reports that case as `Ok(None)` (or an empty collection).
/// Errors are reserved for faults raised by the underlying XML reader
/// and for structurally broken fields.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Error indicating an invalid field structure, such as a
    /// `controlfield` without a `tag` attribute or a `subfield`
    /// without a `code` attribute.
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// Fault raised by the underlying XML reader or writer,
    /// propagated unmodified.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed XML attribute syntax.
    #[error("Attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Serialized output was not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Convenience type alias for [`std::result::Result`] with [`RecordError`].
pub type Result<T> = std::result::Result<T, RecordError>;
