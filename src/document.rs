//! The document aggregate: a single bibliographic record in memory.
//!
//! A [`Document`] owns its control fields and data fields exclusively.
//! Both maps preserve first-insertion tag order, which fixes the field
//! order used by serialization and by union queries. Documents are
//! write-once-append: fields are added through [`Document::add_controlfield`]
//! and [`Document::add_datafield`] and never removed.
//!
//! # Examples
//!
//! ```
//! use bibxml::{Controlfield, Datafield, Document, IndicatorSpec};
//!
//! let mut document = Document::new();
//! document.add_controlfield(Controlfield::new("001", "123456"));
//! document.add_datafield(
//!     Datafield::builder("331", Some('1'), None)
//!         .subfield("a", "Ein Titel")
//!         .build(),
//! );
//!
//! assert_eq!(document.controlfield("001").map(|f| f.value.as_str()), Some("123456"));
//!
//! let titles = document.datafields_matching("331", &IndicatorSpec::Exact('1'), &IndicatorSpec::Any);
//! assert_eq!(titles.len(), 1);
//! ```

use crate::error::Result;
use crate::field::{Controlfield, Datafield, DatafieldSet};
use crate::indicator::IndicatorSpec;
use crate::parser;
use crate::serializer;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Shared empty set returned for tags that were never added.
///
/// Immutable, so handing out a reference to it cannot alias any stored
/// state.
static EMPTY_SET: DatafieldSet = DatafieldSet::new();

/// An in-memory bibliographic record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Leader value, when the source record carried one.
    leader: Option<String>,
    /// Control fields by tag, preserving first-insertion order.
    controlfields: IndexMap<String, Controlfield>,
    /// Data field sets by tag, preserving first-insertion order.
    datafields: IndexMap<String, DatafieldSet>,
}

impl Document {
    /// Create a new empty document.
    #[must_use]
    pub fn new() -> Self {
        Document {
            leader: None,
            controlfields: IndexMap::new(),
            datafields: IndexMap::new(),
        }
    }

    /// Create a builder for fluently constructing documents.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibxml::{Controlfield, Datafield, Document};
    ///
    /// let document = Document::builder()
    ///     .controlfield(Controlfield::new("001", "123456"))
    ///     .datafield(Datafield::builder("100", None, None).subfield("p", "Doe, Jane").build())
    ///     .build();
    ///
    /// assert_eq!(document.datafields("100").len(), 1);
    /// ```
    #[must_use]
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder {
            document: Document::new(),
        }
    }

    // ------------------------------------------------------------------
    // Leader
    // ------------------------------------------------------------------

    /// The leader value, if present.
    #[must_use]
    pub fn leader(&self) -> Option<&str> {
        self.leader.as_deref()
    }

    /// Set the leader value.
    pub fn set_leader(&mut self, leader: impl Into<String>) {
        self.leader = Some(leader.into());
    }

    // ------------------------------------------------------------------
    // Control fields
    // ------------------------------------------------------------------

    /// The control field with the given tag, or `None` if never added.
    #[must_use]
    pub fn controlfield(&self, tag: &str) -> Option<&Controlfield> {
        self.controlfields.get(tag)
    }

    /// Store a control field, overwriting any earlier field with the
    /// same tag (last-write-wins; catalog feeds sometimes emit
    /// corrected duplicates).
    pub fn add_controlfield(&mut self, controlfield: Controlfield) {
        self.controlfields
            .insert(controlfield.tag.clone(), controlfield);
    }

    /// Iterate over all control fields in tag-insertion order.
    pub fn controlfields(&self) -> impl Iterator<Item = &Controlfield> {
        self.controlfields.values()
    }

    // ------------------------------------------------------------------
    // Data fields
    // ------------------------------------------------------------------

    /// The data fields with the given tag, in append order.
    ///
    /// Returns an empty set, never an absence sentinel, for tags that
    /// were never added.
    #[must_use]
    pub fn datafields(&self, tag: &str) -> &DatafieldSet {
        self.datafields.get(tag).unwrap_or(&EMPTY_SET)
    }

    /// The data fields with the given tag whose indicators match both
    /// specs.
    ///
    /// The two indicator positions are matched independently and
    /// combined with AND. When both specs are [`IndicatorSpec::Any`]
    /// this is a plain copy of the stored set.
    #[must_use]
    pub fn datafields_matching(
        &self,
        tag: &str,
        ind1: &IndicatorSpec,
        ind2: &IndicatorSpec,
    ) -> DatafieldSet {
        let set = self.datafields(tag);
        if matches!(ind1, IndicatorSpec::Any) && matches!(ind2, IndicatorSpec::Any) {
            set.clone()
        } else {
            set.select(ind1, ind2)
        }
    }

    /// The concatenation of every tag's data fields, in tag-insertion
    /// order.
    #[must_use]
    pub fn all_datafields(&self) -> DatafieldSet {
        let mut all = DatafieldSet::new();
        for set in self.datafields.values() {
            all.concat(set);
        }
        all
    }

    /// Append a data field to the set for its tag, creating the set on
    /// first use. Never replaces earlier fields.
    pub fn add_datafield(&mut self, datafield: Datafield) {
        self.datafields
            .entry(datafield.tag.clone())
            .or_default()
            .push(datafield);
    }

    /// Iterate over the per-tag data field sets in tag-insertion order.
    pub fn datafield_sets(&self) -> impl Iterator<Item = &DatafieldSet> {
        self.datafields.values()
    }

    // ------------------------------------------------------------------
    // Parsing and serialization
    // ------------------------------------------------------------------

    /// Parse the first record found in the given XML.
    ///
    /// Returns `Ok(None)` when the input contains no record element
    /// anywhere; records nested inside arbitrary wrapper elements are
    /// discovered.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying XML reader raises a fault.
    pub fn from_xml(xml: &str) -> Result<Option<Document>> {
        parser::parse_record(xml)
    }

    /// Parse every record found in the given XML, in document order.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying XML reader raises a fault.
    pub fn from_xml_collection(xml: &str) -> Result<Vec<Document>> {
        parser::parse_collection(xml)
    }

    /// Serialize this document to canonical XML.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying XML writer raises a fault.
    pub fn to_xml(&self) -> Result<String> {
        serializer::document_to_xml(self)
    }
}

/// Builder for fluently constructing documents.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Set the leader of the document being built.
    #[must_use]
    pub fn leader(mut self, leader: impl Into<String>) -> Self {
        self.document.set_leader(leader);
        self
    }

    /// Add a control field to the document being built.
    #[must_use]
    pub fn controlfield(mut self, controlfield: Controlfield) -> Self {
        self.document.add_controlfield(controlfield);
        self
    }

    /// Add a data field to the document being built.
    #[must_use]
    pub fn datafield(mut self, datafield: Datafield) -> Self {
        self.document.add_datafield(datafield);
        self
    }

    /// Build the document.
    #[must_use]
    pub fn build(self) -> Document {
        self.document
    }
}
