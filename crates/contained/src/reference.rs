//! Reference string classification.
//!
//! FHIR references come in several shapes. Only the internal form
//! (`#<id>`) addresses a contained resource; everything else points outside
//! the parent document.

/// Prefix marking an internal reference to a contained resource.
pub const INTERNAL_PREFIX: char = '#';

/// Name of the array holding contained resources.
pub const CONTAINED_FIELD: &str = "contained";

/// Name of the field that carries a reference string.
pub const REFERENCE_FIELD: &str = "reference";

/// A classified reference string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    /// `#<id>` - a contained resource of the same parent.
    Internal(&'a str),
    /// `Type/id`, or an absolute URL ending in `Type/id`.
    External {
        /// The target resource type.
        resource_type: &'a str,
        /// The target logical id.
        id: &'a str,
    },
    /// Anything else (`urn:uuid:...`, canonical URLs, malformed values).
    Other(&'a str),
}

impl<'a> Reference<'a> {
    /// Classifies a reference string.
    ///
    /// # Example
    ///
    /// ```
    /// use nest_contained::Reference;
    ///
    /// assert_eq!(Reference::parse("#med1"), Reference::Internal("med1"));
    /// assert_eq!(
    ///     Reference::parse("Medication/123"),
    ///     Reference::External { resource_type: "Medication", id: "123" }
    /// );
    /// assert_eq!(Reference::parse("urn:uuid:1234"), Reference::Other("urn:uuid:1234"));
    /// ```
    pub fn parse(value: &'a str) -> Self {
        if let Some(id) = value.strip_prefix(INTERNAL_PREFIX) {
            return Reference::Internal(id);
        }

        if value.starts_with("urn:") {
            return Reference::Other(value);
        }

        let trimmed = value.split(['?', '#']).next().unwrap_or(value);
        let mut segments = trimmed.rsplit('/');
        match (segments.next(), segments.next()) {
            (Some(id), Some(resource_type))
                if !id.is_empty() && is_resource_type_name(resource_type) =>
            {
                Reference::External { resource_type, id }
            }
            _ => Reference::Other(value),
        }
    }

    /// Returns `true` for `#<id>` references.
    pub fn is_internal(&self) -> bool {
        matches!(self, Reference::Internal(_))
    }

    /// Returns the contained id for internal references.
    pub fn internal_id(&self) -> Option<&'a str> {
        match self {
            Reference::Internal(id) => Some(id),
            _ => None,
        }
    }
}

/// Strips every leading `#` from a contained id.
///
/// `"##med1"` and `"#med1"` both become `"med1"`, so stripping is idempotent.
pub fn strip_internal_prefix(id: &str) -> &str {
    id.trim_start_matches(INTERNAL_PREFIX)
}

/// Formats the internal reference string for a contained id.
pub fn internal_reference(id: &str) -> String {
    format!("{}{}", INTERNAL_PREFIX, strip_internal_prefix(id))
}

fn is_resource_type_name(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}
