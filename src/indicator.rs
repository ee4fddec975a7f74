//! Indicator matching for data field queries.
//!
//! Data fields carry two positional indicators. A stored indicator is an
//! `Option<char>`: `Some(' ')` (space), `Some('-')` (hyphen placeholder),
//! and `None` (attribute absent) are distinct storage values, but all
//! three count as "blank" for matching purposes.
//!
//! Queries describe the wanted indicator with an [`IndicatorSpec`]:
//!
//! ```
//! use bibxml::IndicatorSpec;
//!
//! // Blank matches space, hyphen, and absent indicators
//! assert!(IndicatorSpec::Blank.matches(Some(' ')));
//! assert!(IndicatorSpec::Blank.matches(Some('-')));
//! assert!(IndicatorSpec::Blank.matches(None));
//! assert!(!IndicatorSpec::Blank.matches(Some('1')));
//!
//! // OneOf is a logical OR over its members
//! let spec = IndicatorSpec::OneOf(vec![IndicatorSpec::Blank, IndicatorSpec::Exact('1')]);
//! assert!(spec.matches(None));
//! assert!(spec.matches(Some('1')));
//! assert!(!spec.matches(Some('2')));
//! ```

use serde::{Deserialize, Serialize};

/// A requested indicator filter for data field queries.
///
/// The two indicator positions of a field are matched independently;
/// [`crate::Datafield::matches`] combines the two results with AND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorSpec {
    /// No filter; matches every stored indicator.
    Any,
    /// Matches a space, a hyphen, or an absent indicator.
    Blank,
    /// Matches exactly the given character.
    Exact(char),
    /// Matches when any member matches (logical OR). One level of
    /// flattening only; members must be `Any`, `Blank`, or `Exact`.
    OneOf(Vec<IndicatorSpec>),
}

impl IndicatorSpec {
    /// Check whether this spec matches a stored indicator value.
    ///
    /// # Panics
    ///
    /// Panics if a `OneOf` contains a nested `OneOf`. Lists of lists
    /// are an unsupported filter shape and a programmer error, so they
    /// fail loudly at the call site instead of being silently coerced.
    #[must_use]
    pub fn matches(&self, actual: Option<char>) -> bool {
        match self {
            IndicatorSpec::Any => true,
            IndicatorSpec::Blank => matches!(actual, None | Some(' ') | Some('-')),
            IndicatorSpec::Exact(c) => actual == Some(*c),
            IndicatorSpec::OneOf(members) => {
                // Reject the invalid shape up front, not only when the
                // offending member happens to be reached.
                assert!(
                    !members
                        .iter()
                        .any(|member| matches!(member, IndicatorSpec::OneOf(_))),
                    "nested OneOf indicator filters are not supported"
                );
                members.iter().any(|member| member.matches(actual))
            }
        }
    }
}

impl From<char> for IndicatorSpec {
    fn from(c: char) -> Self {
        IndicatorSpec::Exact(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_matches_everything() {
        assert!(IndicatorSpec::Any.matches(None));
        assert!(IndicatorSpec::Any.matches(Some(' ')));
        assert!(IndicatorSpec::Any.matches(Some('9')));
    }

    #[test]
    fn test_blank_matches_space_hyphen_and_absent() {
        assert!(IndicatorSpec::Blank.matches(Some(' ')));
        assert!(IndicatorSpec::Blank.matches(Some('-')));
        assert!(IndicatorSpec::Blank.matches(None));
        assert!(!IndicatorSpec::Blank.matches(Some('0')));
        assert!(!IndicatorSpec::Blank.matches(Some('a')));
    }

    #[test]
    fn test_exact_matches_only_itself() {
        assert!(IndicatorSpec::Exact('1').matches(Some('1')));
        assert!(!IndicatorSpec::Exact('1').matches(Some('2')));
        assert!(!IndicatorSpec::Exact('1').matches(None));
        // Exact space is narrower than Blank
        assert!(IndicatorSpec::Exact(' ').matches(Some(' ')));
        assert!(!IndicatorSpec::Exact(' ').matches(Some('-')));
        assert!(!IndicatorSpec::Exact(' ').matches(None));
    }

    #[test]
    fn test_one_of_is_logical_or() {
        let spec = IndicatorSpec::OneOf(vec![
            IndicatorSpec::Blank,
            IndicatorSpec::Exact('1'),
        ]);
        assert!(spec.matches(None));
        assert!(spec.matches(Some(' ')));
        assert!(spec.matches(Some('-')));
        assert!(spec.matches(Some('1')));
        assert!(!spec.matches(Some('2')));
    }

    #[test]
    fn test_empty_one_of_matches_nothing() {
        let spec = IndicatorSpec::OneOf(Vec::new());
        assert!(!spec.matches(None));
        assert!(!spec.matches(Some('1')));
    }

    #[test]
    #[should_panic(expected = "nested OneOf")]
    fn test_nested_one_of_panics() {
        let spec = IndicatorSpec::OneOf(vec![IndicatorSpec::OneOf(vec![IndicatorSpec::Blank])]);
        spec.matches(Some('1'));
    }

    #[test]
    #[should_panic(expected = "nested OneOf")]
    fn test_nested_one_of_panics_even_when_an_earlier_member_matches() {
        let spec = IndicatorSpec::OneOf(vec![
            IndicatorSpec::Exact('1'),
            IndicatorSpec::OneOf(vec![IndicatorSpec::Blank]),
        ]);
        // '1' would satisfy the first member; the invalid shape must
        // still be rejected.
        spec.matches(Some('1'));
    }

    #[test]
    fn test_from_char() {
        assert_eq!(IndicatorSpec::from('7'), IndicatorSpec::Exact('7'));
    }
}
