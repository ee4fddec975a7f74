//! Event-driven XML record parsing.
//!
//! The parser walks the XML event stream and discovers `record` elements
//! at any nesting depth, so records arrive intact whether they sit at the
//! top level or buried inside harvesting-protocol envelopes with
//! `header`/`metadata` wrappers. Everything outside a record element is
//! skipped; everything inside that is not a `leader`, `controlfield`,
//! `datafield`, or `subfield` is treated as an inert wrapper.
//!
//! All captured text passes through the character-entity decoder before
//! it is stored, resolving named, decimal, and hexadecimal references.
//!
//! Input that never produces a record element is not an error: single
//! mode reports `Ok(None)` and collection mode an empty vector, so batch
//! pipelines can skip bad records without aborting. Faults raised by the
//! underlying XML reader propagate unmodified.
//!
//! # Examples
//!
//! ```
//! use bibxml::parser;
//!
//! let xml = r#"<record><controlfield tag="001">123456</controlfield></record>"#;
//! let document = parser::parse_record(xml).unwrap().unwrap();
//! assert_eq!(document.controlfield("001").map(|f| f.value.as_str()), Some("123456"));
//!
//! let none = parser::parse_record("<foo><bar/></foo>").unwrap();
//! assert!(none.is_none());
//! ```

use crate::document::Document;
use crate::error::{RecordError, Result};
use crate::field::{Controlfield, Datafield};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse the first record found in the given XML.
///
/// Returns `Ok(None)` when the input contains no record element. A
/// record element with no child fields yields a valid empty document.
///
/// # Errors
///
/// Returns an error when the underlying XML reader raises a fault or a
/// field element is missing its identifying attribute.
pub fn parse_record(xml: &str) -> Result<Option<Document>> {
    RecordParser::new(xml).next_document()
}

/// Parse every record found in the given XML, in document order.
///
/// Returns an empty vector when the input contains no record element.
///
/// # Errors
///
/// Returns an error when the underlying XML reader raises a fault or a
/// field element is missing its identifying attribute.
pub fn parse_collection(xml: &str) -> Result<Vec<Document>> {
    let mut parser = RecordParser::new(xml);
    let mut documents = Vec::new();
    while let Some(document) = parser.next_document()? {
        documents.push(document);
    }
    Ok(documents)
}

/// Streaming record parser over an XML input string.
///
/// Each call to [`RecordParser::next_document`] consumes events up to
/// and including the next completed record element and returns the
/// fully built [`Document`]. Documents are always fully materialized;
/// no partial document is ever handed out.
pub struct RecordParser<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> RecordParser<'a> {
    /// Create a parser over the given XML input.
    #[must_use]
    pub fn new(xml: &'a str) -> Self {
        RecordParser {
            reader: Reader::from_str(xml),
        }
    }

    /// Build the next document from the event stream.
    ///
    /// Returns `Ok(None)` once the input is exhausted without another
    /// record element.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying XML reader raises a fault
    /// or a field element is missing its identifying attribute.
    pub fn next_document(&mut self) -> Result<Option<Document>> {
        // Current document plus the value buffers for whichever text
        // carrying element is open. Text is captured only while one of
        // these is open; inter-element whitespace never reaches a field.
        let mut document: Option<Document> = None;
        let mut leader: Option<String> = None;
        let mut controlfield: Option<(String, String)> = None;
        let mut datafield: Option<Datafield> = None;
        let mut subfield: Option<(String, String)> = None;

        loop {
            match self.reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    // A record start while a record is already open is a
                    // harvesting-envelope shape: the outer element was a
                    // wrapper, so restart with a fresh document.
                    b"record" => {
                        document = Some(Document::new());
                        leader = None;
                        controlfield = None;
                        datafield = None;
                        subfield = None;
                    }
                    _ if document.is_none() => {}
                    b"leader" => leader = Some(String::new()),
                    b"controlfield" => {
                        let tag = require_attr(&e, "tag")?;
                        controlfield = Some((tag, String::new()));
                    }
                    b"datafield" => {
                        let tag = require_attr(&e, "tag")?;
                        let ind1 = indicator_attr(&e, "ind1")?;
                        let ind2 = indicator_attr(&e, "ind2")?;
                        datafield = Some(Datafield::new(tag, ind1, ind2));
                    }
                    b"subfield" if datafield.is_some() => {
                        let code = require_attr(&e, "code")?;
                        subfield = Some((code, String::new()));
                    }
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    // A record with no children is still a valid,
                    // empty document.
                    b"record" => return Ok(Some(Document::new())),
                    _ if document.is_none() => {}
                    b"leader" => {
                        if let Some(doc) = document.as_mut() {
                            doc.set_leader(String::new());
                        }
                    }
                    b"controlfield" => {
                        if let Some(doc) = document.as_mut() {
                            let tag = require_attr(&e, "tag")?;
                            doc.add_controlfield(Controlfield::new(tag, ""));
                        }
                    }
                    b"datafield" => {
                        if let Some(doc) = document.as_mut() {
                            let tag = require_attr(&e, "tag")?;
                            let ind1 = indicator_attr(&e, "ind1")?;
                            let ind2 = indicator_attr(&e, "ind2")?;
                            doc.add_datafield(Datafield::new(tag, ind1, ind2));
                        }
                    }
                    b"subfield" => {
                        if let Some(field) = datafield.as_mut() {
                            let code = require_attr(&e, "code")?;
                            field.add_subfield(code, "");
                        }
                    }
                    _ => {}
                },
                Event::Text(e) => {
                    if let Some(buffer) = open_buffer(&mut subfield, &mut controlfield, &mut leader)
                    {
                        let raw = e.into_inner();
                        let raw = String::from_utf8_lossy(&raw);
                        buffer.push_str(&html_escape::decode_html_entities(&raw));
                    }
                }
                Event::CData(e) => {
                    // CDATA content is literal; no entity decoding.
                    if let Some(buffer) = open_buffer(&mut subfield, &mut controlfield, &mut leader)
                    {
                        let raw = e.into_inner();
                        buffer.push_str(&String::from_utf8_lossy(&raw));
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"subfield" => {
                        if let (Some(field), Some((code, value))) =
                            (datafield.as_mut(), subfield.take())
                        {
                            field.add_subfield(code, value);
                        }
                    }
                    b"datafield" => {
                        if let (Some(doc), Some(field)) = (document.as_mut(), datafield.take()) {
                            doc.add_datafield(field);
                        }
                    }
                    b"controlfield" => {
                        if let (Some(doc), Some((tag, value))) =
                            (document.as_mut(), controlfield.take())
                        {
                            doc.add_controlfield(Controlfield::new(tag, value));
                        }
                    }
                    b"leader" => {
                        if let (Some(doc), Some(value)) = (document.as_mut(), leader.take()) {
                            doc.set_leader(value);
                        }
                    }
                    b"record" => {
                        if let Some(doc) = document.take() {
                            return Ok(Some(doc));
                        }
                        // A close for an envelope record already
                        // abandoned by a nested restart; keep seeking.
                    }
                    _ => {}
                },
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

/// The innermost open text buffer, if any.
///
/// A subfield nests inside a data field inside a record, so the open
/// subfield buffer always wins over control field and leader buffers.
fn open_buffer<'b>(
    subfield: &'b mut Option<(String, String)>,
    controlfield: &'b mut Option<(String, String)>,
    leader: &'b mut Option<String>,
) -> Option<&'b mut String> {
    if let Some((_, value)) = subfield.as_mut() {
        Some(value)
    } else if let Some((_, value)) = controlfield.as_mut() {
        Some(value)
    } else {
        leader.as_mut()
    }
}

/// Look up an attribute value by name, unescaping standard references.
fn attr(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attribute in e.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == name.as_bytes() {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Look up a required attribute, failing with an invalid-field error
/// when it is missing.
fn require_attr(e: &BytesStart<'_>, name: &str) -> Result<String> {
    attr(e, name)?.ok_or_else(|| {
        RecordError::InvalidField(format!(
            "missing {name} attribute on <{}>",
            String::from_utf8_lossy(e.name().as_ref())
        ))
    })
}

/// Read an indicator attribute. An absent attribute and an empty value
/// both store as an absent indicator; an indicator is at most one
/// character, so a longer value is an invalid field.
fn indicator_attr(e: &BytesStart<'_>, name: &str) -> Result<Option<char>> {
    match attr(e, name)? {
        None => Ok(None),
        Some(value) => {
            let mut chars = value.chars();
            let first = chars.next();
            if chars.next().is_some() {
                return Err(RecordError::InvalidField(format!(
                    "{name} attribute on <{}> is not a single character: {value:?}",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            Ok(first)
        }
    }
}
