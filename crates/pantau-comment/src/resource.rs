//! Comment-bearing resource identifiers.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// The four entities that carry a comment thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceType {
    /// News article.
    Berita,
    /// Uploaded document.
    Document,
    /// Implementation (execution) record.
    Pelaksanaan,
    /// Proposal.
    Usulan,
}

impl ResourceType {
    /// Name of the body field that carries the resource id on submissions.
    pub const fn id_field(&self) -> &'static str {
        match self {
            Self::Berita => "beritaId",
            Self::Document => "documentId",
            Self::Pelaksanaan => "pelaksanaanId",
            Self::Usulan => "usulanId",
        }
    }

    /// Whether the backend exposes a dedicated comment count endpoint.
    ///
    /// Other resources derive their count from the loaded list.
    pub const fn has_count_endpoint(&self) -> bool {
        matches!(self, Self::Berita)
    }
}

/// A `(resourceType, resourceId)` pair identifying one comment thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    /// Kind of the commented resource.
    pub resource_type: ResourceType,
    /// Server-assigned id of the commented resource.
    pub resource_id: i64,
}

impl ResourceRef {
    /// Creates a new resource reference.
    pub const fn new(resource_type: ResourceType, resource_id: i64) -> Self {
        Self {
            resource_type,
            resource_id,
        }
    }

    /// News article reference.
    pub const fn berita(id: i64) -> Self {
        Self::new(ResourceType::Berita, id)
    }

    /// Document reference.
    pub const fn document(id: i64) -> Self {
        Self::new(ResourceType::Document, id)
    }

    /// Implementation record reference.
    pub const fn pelaksanaan(id: i64) -> Self {
        Self::new(ResourceType::Pelaksanaan, id)
    }

    /// Proposal reference.
    pub const fn usulan(id: i64) -> Self {
        Self::new(ResourceType::Usulan, id)
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.resource_id)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_parse_resource_type() {
        assert_eq!(
            ResourceType::from_str("pelaksanaan").unwrap(),
            ResourceType::Pelaksanaan
        );
        assert_eq!(ResourceType::Usulan.as_ref(), "usulan");
        assert!(ResourceType::from_str("laporan").is_err());
    }

    #[test]
    fn test_id_fields_are_distinct() {
        let fields = ResourceType::iter()
            .map(|kind| kind.id_field())
            .collect::<std::collections::HashSet<_>>();
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(ResourceRef::usulan(42).to_string(), "usulan/42");
    }
}
