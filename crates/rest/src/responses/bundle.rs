//! Bundle response building.
//!
//! Contained listings are returned as `collection` Bundles.

use serde_json::Value;

/// Bundle types produced by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleType {
    /// Collection bundle.
    Collection,
}

impl BundleType {
    /// Returns the FHIR code string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleType::Collection => "collection",
        }
    }
}

/// A link in a Bundle.
#[derive(Debug, Clone)]
pub struct BundleLink {
    /// The relation type (self, next, previous, first, last).
    pub relation: String,
    /// The URL.
    pub url: String,
}

impl BundleLink {
    /// Creates a new link.
    pub fn new(relation: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            url: url.into(),
        }
    }

    /// Creates a self link.
    pub fn self_link(url: impl Into<String>) -> Self {
        Self::new("self", url)
    }

    /// Converts to FHIR JSON.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "relation": self.relation,
            "url": self.url
        })
    }
}

/// An entry in a Bundle.
#[derive(Debug, Clone)]
pub struct BundleEntry {
    /// Full URL of the resource.
    pub full_url: Option<String>,
    /// The resource itself.
    pub resource: Value,
}

impl BundleEntry {
    /// Creates a new entry with a resource and its full URL.
    pub fn with_resource(resource: Value, full_url: impl Into<String>) -> Self {
        Self {
            full_url: Some(full_url.into()),
            resource,
        }
    }

    /// Converts to FHIR JSON.
    pub fn to_json(&self) -> Value {
        let mut entry = serde_json::json!({});

        if let Some(url) = &self.full_url {
            entry["fullUrl"] = serde_json::json!(url);
        }
        entry["resource"] = self.resource.clone();

        entry
    }
}

/// Builder for Bundle resources.
#[derive(Debug)]
pub struct BundleBuilder {
    bundle_type: BundleType,
    total: Option<usize>,
    links: Vec<BundleLink>,
    entries: Vec<BundleEntry>,
    timestamp: Option<String>,
}

impl BundleBuilder {
    /// Creates a new builder for a specific bundle type.
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            bundle_type,
            total: None,
            links: Vec::new(),
            entries: Vec::new(),
            timestamp: None,
        }
    }

    /// Creates a collection bundle builder.
    pub fn collection() -> Self {
        Self::new(BundleType::Collection)
    }

    /// Sets the total count.
    pub fn total(mut self, count: usize) -> Self {
        self.total = Some(count);
        self
    }

    /// Adds a link.
    pub fn add_link(mut self, link: BundleLink) -> Self {
        self.links.push(link);
        self
    }

    /// Adds a self link.
    pub fn self_link(self, url: impl Into<String>) -> Self {
        self.add_link(BundleLink::self_link(url))
    }

    /// Adds an entry.
    pub fn add_entry(mut self, entry: BundleEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Sets the timestamp.
    pub fn timestamp(mut self, ts: impl Into<String>) -> Self {
        self.timestamp = Some(ts.into());
        self
    }

    /// Builds the Bundle resource.
    ///
    /// `entry` is always present, possibly empty.
    pub fn build(self) -> Value {
        let mut bundle = serde_json::json!({
            "resourceType": "Bundle",
            "type": self.bundle_type.as_str()
        });

        if let Some(ts) = self.timestamp {
            bundle["timestamp"] = serde_json::json!(ts);
        }

        if let Some(total) = self.total {
            bundle["total"] = serde_json::json!(total);
        }

        if !self.links.is_empty() {
            bundle["link"] =
                serde_json::json!(self.links.iter().map(|l| l.to_json()).collect::<Vec<_>>());
        }

        bundle["entry"] =
            serde_json::json!(self.entries.iter().map(|e| e.to_json()).collect::<Vec<_>>());

        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_bundle() {
        let medication = serde_json::json!({
            "resourceType": "Medication",
            "id": "med1"
        });

        let bundle = BundleBuilder::collection()
            .total(1)
            .self_link("http://example.com/MedicationRequest/rx1/contained")
            .add_entry(BundleEntry::with_resource(
                medication,
                "http://example.com/MedicationRequest/rx1#med1",
            ))
            .build();

        assert_eq!(bundle["resourceType"], "Bundle");
        assert_eq!(bundle["type"], "collection");
        assert_eq!(bundle["total"], 1);
        assert_eq!(bundle["link"][0]["relation"], "self");
        assert_eq!(bundle["entry"][0]["resource"]["id"], "med1");
    }

    #[test]
    fn test_empty_bundle_has_empty_entry_array() {
        let bundle = BundleBuilder::collection().total(0).build();
        assert_eq!(bundle["entry"], serde_json::json!([]));
    }
}
