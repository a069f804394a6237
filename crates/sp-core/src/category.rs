//! Node classification used for rendering emphasis.
//!
//! Categories never influence path weights.  Source tables label nodes in
//! Spanish (`principal`, `secundario`, `carretera`); the parser also accepts
//! the English spellings.  Anything it does not recognise maps to
//! [`NodeCategory::Unknown`].

use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeCategory {
    /// Touches a motorway or primary road.
    Principal,
    /// Touches a secondary/tertiary road, or explicitly labelled secondary.
    Secondary,
    #[default]
    Unknown,
}

impl NodeCategory {
    pub const ALL: [NodeCategory; 3] =
        [NodeCategory::Principal, NodeCategory::Secondary, NodeCategory::Unknown];

    /// Parse a classification label.  Missing or unrecognised labels yield
    /// `Unknown`; this never fails.
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return NodeCategory::Unknown;
        };
        match label.trim().to_ascii_lowercase().as_str() {
            "principal" | "primary" => NodeCategory::Principal,
            "secundario" | "secondary" | "carretera" => NodeCategory::Secondary,
            _ => NodeCategory::Unknown,
        }
    }

    /// Canonical lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeCategory::Principal => "principal",
            NodeCategory::Secondary => "secondary",
            NodeCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
