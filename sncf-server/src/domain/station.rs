//! Upstream location identifiers and ranked place matches.

use std::fmt;

/// Error returned when constructing a [`LocationId`] from blank input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location id: must not be blank")]
pub struct InvalidLocationId;

/// An upstream location identifier, e.g. `stop_area:SNCF:87686006`.
///
/// Never blank. A journey search can only be built from `LocationId`s,
/// so an empty or placeholder identifier cannot reach the upstream API.
///
/// # Examples
///
/// ```
/// use sncf_server::domain::LocationId;
///
/// let id = LocationId::parse("stop_area:SNCF:87686006").unwrap();
/// assert_eq!(id.as_str(), "stop_area:SNCF:87686006");
///
/// assert!(LocationId::parse("").is_err());
/// assert!(LocationId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct LocationId(String);

impl LocationId {
    /// Parse an identifier, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidLocationId> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidLocationId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationId({})", self.0)
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One ranked match from the upstream places search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCandidate {
    /// Name as the upstream displays it, e.g. "Paris Gare de Lyon (Paris)".
    pub display_name: String,
    /// Identifier to pass to the journey search.
    pub external_id: LocationId,
    /// 1-based position in upstream relevance order.
    pub match_rank: u32,
}

impl LocationCandidate {
    /// Creates a new candidate.
    pub fn new(display_name: impl Into<String>, external_id: LocationId, match_rank: u32) -> Self {
        Self {
            display_name: display_name.into(),
            external_id,
            match_rank,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims() {
        let id = LocationId::parse("  admin:fr:69123 ").unwrap();
        assert_eq!(id.as_str(), "admin:fr:69123");
    }

    #[test]
    fn reject_blank() {
        assert_eq!(LocationId::parse(""), Err(InvalidLocationId));
        assert_eq!(LocationId::parse("\t\n"), Err(InvalidLocationId));
    }

    #[test]
    fn display_and_debug() {
        let id = LocationId::parse("stop_area:SNCF:87723197").unwrap();
        assert_eq!(id.to_string(), "stop_area:SNCF:87723197");
        assert_eq!(format!("{:?}", id), "LocationId(stop_area:SNCF:87723197)");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any string with a non-whitespace character parses and keeps its trimmed form.
        #[test]
        fn non_blank_parses(s in "[ ]{0,3}[a-z_:0-9]{1,20}[ ]{0,3}") {
            let id = LocationId::parse(&s).unwrap();
            prop_assert_eq!(id.as_str(), s.trim());
        }

        /// Whitespace-only strings never parse.
        #[test]
        fn blank_rejected(s in "[ \t\n]{0,10}") {
            prop_assert!(LocationId::parse(&s).is_err());
        }
    }
}
