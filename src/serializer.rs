//! Canonical XML output for documents.
//!
//! Emits a UTF-8 XML declaration, one root `<collection>` wrapper, and
//! one `<record>` element per document with two-space indentation. The
//! indentation is for readability only and is not semantically
//! significant; parsing the output restores the same documents.
//!
//! Emission order is fixed: the leader when present, then control
//! fields in tag-insertion order, then data fields in tag-insertion
//! order with each tag's fields in append order and subfields in append
//! order. Text content gets standard XML escaping of reserved
//! characters and nothing more.

use crate::document::Document;
use crate::error::Result;
use crate::field::Datafield;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Serialize a single document to an XML string.
///
/// # Errors
///
/// Returns an error when the underlying XML writer raises a fault.
pub fn document_to_xml(document: &Document) -> Result<String> {
    collection_to_xml(std::slice::from_ref(document))
}

/// Serialize several documents into one collection, in order.
///
/// # Errors
///
/// Returns an error when the underlying XML writer raises a fault.
pub fn collection_to_xml(documents: &[Document]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("collection")))?;
    for document in documents {
        write_record(&mut writer, document)?;
    }
    writer.write_event(Event::End(BytesEnd::new("collection")))?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_record<W: Write>(writer: &mut Writer<W>, document: &Document) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("record")))?;

    if let Some(leader) = document.leader() {
        write_text_element(writer, BytesStart::new("leader"), leader)?;
    }

    for controlfield in document.controlfields() {
        let mut start = BytesStart::new("controlfield");
        start.push_attribute(("tag", controlfield.tag.as_str()));
        write_text_element(writer, start, &controlfield.value)?;
    }

    for set in document.datafield_sets() {
        for datafield in set {
            write_datafield(writer, datafield)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("record")))?;
    Ok(())
}

fn write_datafield<W: Write>(writer: &mut Writer<W>, datafield: &Datafield) -> Result<()> {
    let mut start = BytesStart::new("datafield");
    start.push_attribute(("tag", datafield.tag.as_str()));
    start.push_attribute(("ind1", indicator_text(datafield.ind1).as_str()));
    start.push_attribute(("ind2", indicator_text(datafield.ind2).as_str()));

    writer.write_event(Event::Start(start))?;
    for subfield in &datafield.subfields {
        let mut sub = BytesStart::new("subfield");
        sub.push_attribute(("code", subfield.code.as_str()));
        write_text_element(writer, sub, &subfield.value)?;
    }
    writer.write_event(Event::End(BytesEnd::new("datafield")))?;
    Ok(())
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<()> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

/// An absent indicator serializes as an empty attribute value, which
/// parses back to absent.
fn indicator_text(indicator: Option<char>) -> String {
    indicator.map(String::from).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Controlfield;

    fn sample_document() -> Document {
        Document::builder()
            .leader("00000nM2.01200024      h")
            .controlfield(Controlfield::new("001", "123456"))
            .datafield(
                Datafield::builder("331", Some('1'), None)
                    .subfield("a", "Ein Titel")
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_output_format() {
        let xml = document_to_xml(&sample_document()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<collection>"));
        assert!(xml.contains("<leader>00000nM2.01200024      h</leader>"));
        assert!(xml.contains("<controlfield tag=\"001\">123456</controlfield>"));
        assert!(xml.contains("<datafield tag=\"331\" ind1=\"1\" ind2=\"\">"));
        assert!(xml.contains("<subfield code=\"a\">Ein Titel</subfield>"));
        assert!(xml.trim_end().ends_with("</collection>"));
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        let document = Document::builder()
            .datafield(
                Datafield::builder("335", None, None)
                    .subfield("a", "Fish & <Chips>")
                    .build(),
            )
            .build();

        let xml = document_to_xml(&document).unwrap();
        assert!(xml.contains("Fish &amp; &lt;Chips&gt;"));
    }

    #[test]
    fn test_empty_document_serializes() {
        let xml = document_to_xml(&Document::new()).unwrap();
        assert!(xml.contains("<record>"));
        assert!(xml.contains("</record>"));
    }

    #[test]
    fn test_collection_emits_every_document() {
        let documents = vec![sample_document(), Document::new()];
        let xml = collection_to_xml(&documents).unwrap();
        assert_eq!(xml.matches("<record>").count(), 2);
    }

    #[test]
    fn test_controlfields_in_tag_insertion_order() {
        let document = Document::builder()
            .controlfield(Controlfield::new("050", "second-tag-first"))
            .controlfield(Controlfield::new("001", "first-tag-second"))
            .build();

        let xml = document_to_xml(&document).unwrap();
        let pos_050 = xml.find("tag=\"050\"").unwrap();
        let pos_001 = xml.find("tag=\"001\"").unwrap();
        assert!(pos_050 < pos_001);
    }
}
