//! Core field structures: control fields, data fields, and subfields.
//!
//! A [`Controlfield`] is a tagged scalar value. A [`Datafield`] carries a
//! tag, two positional indicators, and an ordered [`SubfieldSet`] of coded
//! [`Subfield`] values. [`DatafieldSet`] is the ordered collection of data
//! fields sharing a tag inside a document.
//!
//! Subfield and data field order is insertion order and is preserved
//! through queries and serialization.
//!
//! # Examples
//!
//! ```
//! use bibxml::Datafield;
//!
//! let field = Datafield::builder("331", Some('1'), None)
//!     .subfield("a", "Ein Titel")
//!     .subfield("b", "Ein Untertitel")
//!     .build();
//!
//! assert_eq!(field.value("a"), Some("Ein Titel"));
//! assert_eq!(field.subfields.values(), vec!["Ein Titel", "Ein Untertitel"]);
//! ```

use crate::indicator::IndicatorSpec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A control field: a tagged scalar metadata value with no subdivision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controlfield {
    /// Field tag (non-empty).
    pub tag: String,
    /// Field value, with character entities already decoded.
    pub value: String,
}

impl Controlfield {
    /// Create a new control field.
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Controlfield {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

/// A coded text atom inside a data field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code. Repeated codes within a field are legal.
    pub code: String,
    /// Decoded text value.
    pub value: String,
}

impl Subfield {
    /// Create a new subfield.
    pub fn new(code: impl Into<String>, value: impl Into<String>) -> Self {
        Subfield {
            code: code.into(),
            value: value.into(),
        }
    }
}

/// An insertion-ordered collection of subfields.
///
/// Stored in a `SmallVec` to avoid allocation for typical fields with
/// four or fewer subfields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubfieldSet {
    subfields: SmallVec<[Subfield; 4]>,
}

impl SubfieldSet {
    /// Create a new empty subfield set.
    #[must_use]
    pub fn new() -> Self {
        SubfieldSet {
            subfields: SmallVec::new(),
        }
    }

    /// Append a subfield, preserving insertion order.
    pub fn push(&mut self, subfield: Subfield) {
        self.subfields.push(subfield);
    }

    /// Append clones of all subfields from another set.
    pub fn concat(&mut self, other: &SubfieldSet) {
        self.subfields.extend(other.subfields.iter().cloned());
    }

    /// Iterate over the subfields in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Subfield> {
        self.subfields.iter()
    }

    /// Number of subfields in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subfields.len()
    }

    /// `true` if the set contains no subfields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subfields.is_empty()
    }

    /// All subfield values in insertion order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        self.subfields.iter().map(|s| s.value.as_str()).collect()
    }

    /// The first value that is not blank (empty or whitespace-only).
    #[must_use]
    pub fn first_value(&self) -> Option<&str> {
        self.subfields
            .iter()
            .map(|s| s.value.as_str())
            .find(|v| !v.trim().is_empty())
    }
}

impl<'a> IntoIterator for &'a SubfieldSet {
    type Item = &'a Subfield;
    type IntoIter = std::slice::Iter<'a, Subfield>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Subfield> for SubfieldSet {
    fn from_iter<T: IntoIterator<Item = Subfield>>(iter: T) -> Self {
        SubfieldSet {
            subfields: iter.into_iter().collect(),
        }
    }
}

/// A data field: a tagged field with two positional indicators and an
/// ordered set of coded subfields.
///
/// Indicators keep their storage form: `Some(' ')`, `Some('-')`, and
/// `None` are distinct values, interchangeable only under the
/// [`IndicatorSpec::Blank`] wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datafield {
    /// Field tag (non-empty).
    pub tag: String,
    /// First indicator.
    pub ind1: Option<char>,
    /// Second indicator.
    pub ind2: Option<char>,
    /// Subfields in insertion order.
    pub subfields: SubfieldSet,
}

impl Datafield {
    /// Create a new data field with no subfields.
    pub fn new(tag: impl Into<String>, ind1: Option<char>, ind2: Option<char>) -> Self {
        Datafield {
            tag: tag.into(),
            ind1,
            ind2,
            subfields: SubfieldSet::new(),
        }
    }

    /// Create a builder for constructing data fields fluently.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibxml::Datafield;
    ///
    /// let field = Datafield::builder("100", Some('1'), None)
    ///     .subfield("a", "Doe, Jane")
    ///     .build();
    /// ```
    pub fn builder(tag: impl Into<String>, ind1: Option<char>, ind2: Option<char>) -> DatafieldBuilder {
        DatafieldBuilder {
            field: Datafield::new(tag, ind1, ind2),
        }
    }

    /// Append a subfield.
    pub fn add_subfield(&mut self, code: impl Into<String>, value: impl Into<String>) {
        self.subfields.push(Subfield::new(code, value));
    }

    /// The value of the first subfield with the given code.
    #[must_use]
    pub fn value(&self, code: &str) -> Option<&str> {
        self.subfields
            .iter()
            .find(|s| s.code == code)
            .map(|s| s.value.as_str())
    }

    /// All values of subfields with the given code, in insertion order.
    #[must_use]
    pub fn values(&self, code: &str) -> Vec<&str> {
        self.subfields
            .iter()
            .filter(|s| s.code == code)
            .map(|s| s.value.as_str())
            .collect()
    }

    /// Check both indicator positions against the given specs.
    ///
    /// A field matches only when both positions match (AND).
    #[must_use]
    pub fn matches(&self, ind1: &IndicatorSpec, ind2: &IndicatorSpec) -> bool {
        ind1.matches(self.ind1) && ind2.matches(self.ind2)
    }
}

/// Builder for fluently constructing data fields.
#[derive(Debug)]
pub struct DatafieldBuilder {
    field: Datafield,
}

impl DatafieldBuilder {
    /// Add a subfield to the field being built.
    #[must_use]
    pub fn subfield(mut self, code: impl Into<String>, value: impl Into<String>) -> Self {
        self.field.add_subfield(code, value);
        self
    }

    /// Build the field.
    #[must_use]
    pub fn build(self) -> Datafield {
        self.field
    }
}

/// An insertion-ordered collection of data fields sharing a tag.
///
/// An empty set is a legal state; document queries for untouched tags
/// return an empty set rather than an absence sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatafieldSet {
    fields: Vec<Datafield>,
}

impl DatafieldSet {
    /// Create a new empty set.
    #[must_use]
    pub const fn new() -> Self {
        DatafieldSet { fields: Vec::new() }
    }

    /// Append a field, preserving insertion order.
    pub fn push(&mut self, field: Datafield) {
        self.fields.push(field);
    }

    /// Append clones of all fields from another set.
    pub fn concat(&mut self, other: &DatafieldSet) {
        self.fields.extend(other.fields.iter().cloned());
    }

    /// Iterate over the fields in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Datafield> {
        self.fields.iter()
    }

    /// Number of fields in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` if the set contains no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The first field in the set, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Datafield> {
        self.fields.first()
    }

    /// Fields whose indicators match both specs, in insertion order.
    ///
    /// Order is never changed by filtering.
    #[must_use]
    pub fn select(&self, ind1: &IndicatorSpec, ind2: &IndicatorSpec) -> DatafieldSet {
        DatafieldSet {
            fields: self
                .fields
                .iter()
                .filter(|f| f.matches(ind1, ind2))
                .cloned()
                .collect(),
        }
    }
}

impl Default for DatafieldSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a DatafieldSet {
    type Item = &'a Datafield;
    type IntoIter = std::slice::Iter<'a, Datafield>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Datafield> for DatafieldSet {
    fn from_iter<T: IntoIterator<Item = Datafield>>(iter: T) -> Self {
        DatafieldSet {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subfield_order_is_insertion_order() {
        let mut set = SubfieldSet::new();
        set.push(Subfield::new("b", "second"));
        set.push(Subfield::new("a", "first"));
        set.push(Subfield::new("b", "third"));

        assert_eq!(set.values(), vec!["second", "first", "third"]);
    }

    #[test]
    fn test_repeated_codes_are_legal_and_ordered() {
        let field = Datafield::builder("902", None, None)
            .subfield("s", "one")
            .subfield("s", "two")
            .build();

        assert_eq!(field.value("s"), Some("one"));
        assert_eq!(field.values("s"), vec!["one", "two"]);
    }

    #[test]
    fn test_first_value_skips_blank_values() {
        let mut set = SubfieldSet::new();
        set.push(Subfield::new("a", ""));
        set.push(Subfield::new("b", "   "));
        set.push(Subfield::new("c", "found"));

        assert_eq!(set.first_value(), Some("found"));
    }

    #[test]
    fn test_first_value_on_empty_set() {
        assert_eq!(SubfieldSet::new().first_value(), None);
    }

    #[test]
    fn test_datafield_matches_requires_both_positions() {
        let field = Datafield::new("331", Some('1'), Some('2'));

        assert!(field.matches(&IndicatorSpec::Exact('1'), &IndicatorSpec::Exact('2')));
        assert!(field.matches(&IndicatorSpec::Any, &IndicatorSpec::Exact('2')));
        assert!(!field.matches(&IndicatorSpec::Exact('1'), &IndicatorSpec::Exact('9')));
        assert!(!field.matches(&IndicatorSpec::Exact('9'), &IndicatorSpec::Exact('2')));
    }

    #[test]
    fn test_select_preserves_order() {
        let mut set = DatafieldSet::new();
        set.push(Datafield::new("331", Some('1'), None));
        set.push(Datafield::new("331", Some('2'), None));
        set.push(Datafield::new("331", Some('1'), None));

        let selected = set.select(&IndicatorSpec::Exact('1'), &IndicatorSpec::Any);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|f| f.ind1 == Some('1')));
    }

    #[test]
    fn test_select_blank_on_hyphen_and_absent() {
        let mut set = DatafieldSet::new();
        set.push(Datafield::new("100", Some(' '), None));
        set.push(Datafield::new("100", Some('-'), None));
        set.push(Datafield::new("100", None, None));
        set.push(Datafield::new("100", Some('1'), None));

        let blank = set.select(&IndicatorSpec::Blank, &IndicatorSpec::Any);
        assert_eq!(blank.len(), 3);
    }

    #[test]
    fn test_concat_appends_in_order() {
        let mut a = DatafieldSet::new();
        a.push(Datafield::new("100", None, None));
        let mut b = DatafieldSet::new();
        b.push(Datafield::new("331", None, None));
        b.push(Datafield::new("335", None, None));

        a.concat(&b);
        let tags: Vec<&str> = a.iter().map(|f| f.tag.as_str()).collect();
        assert_eq!(tags, vec!["100", "331", "335"]);
    }
}
