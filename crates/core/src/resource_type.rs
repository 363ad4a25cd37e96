//! Discriminant tag for approvable resources.

use serde::{Deserialize, Serialize};

/// The kind of resource moving through the approval lifecycle.
///
/// This is a closed set so permission rules and payload handling stay
/// exhaustive when a new kind is added.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Generic ad creative.
    Ad,
    /// Campaign-level grouping of creatives.
    Campaign,
    /// App store screenshot set.
    Screenshot,
    /// App store custom product page.
    CustomProductPage,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Ad,
        ResourceType::Campaign,
        ResourceType::Screenshot,
        ResourceType::CustomProductPage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Ad => "ad",
            ResourceType::Campaign => "campaign",
            ResourceType::Screenshot => "screenshot",
            ResourceType::CustomProductPage => "custom_product_page",
        }
    }
}

impl core::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
