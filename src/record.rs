//! Company record produced for every discovered slug

/// One exhibitor entry
///
/// Every field degrades independently to its empty default, so a record can
/// exist even when the detail page could not be fetched at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyRecord {
    /// Slug the record was fetched for (not exported)
    pub slug: String,

    /// Company name from the first heading, empty when absent
    pub name: String,

    /// Category labels in document order
    pub tags: Vec<String>,

    /// Whitespace-normalized description text
    pub overview: String,

    /// First qualifying external link, empty when none
    pub website: String,
}

impl CompanyRecord {
    /// Creates a record with every field empty except the slug
    pub fn empty(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            ..Self::default()
        }
    }

    /// Joins the tags with `separator` for tabular output
    pub fn joined_tags(&self, separator: &str) -> String {
        self.tags.join(separator)
    }

    /// Returns true if no field was extracted
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.tags.is_empty()
            && self.overview.is_empty()
            && self.website.is_empty()
    }
}
