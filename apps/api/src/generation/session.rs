use serde::{Deserialize, Serialize};

use crate::generation::generator::PlatformVariation;
use crate::models::platform::Platform;

/// The variations of one authoring session, in the brief's platform order.
/// Held by the client between requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariationSet(Vec<PlatformVariation>);

impl VariationSet {
    pub fn new(variations: Vec<PlatformVariation>) -> Self {
        Self(variations)
    }

    /// Swaps in a fresh variation for its platform, keeping position.
    /// Returns false when the platform is not part of the set.
    pub fn replace_platform(&mut self, variation: PlatformVariation) -> bool {
        match self.0.iter_mut().find(|v| v.platform == variation.platform) {
            Some(slot) => {
                *slot = variation;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, platform: Platform) -> Option<&PlatformVariation> {
        self.0.iter().find(|v| v.platform == platform)
    }

    pub fn contains(&self, platform: Platform) -> bool {
        self.get(platform).is_some()
    }

    pub fn into_inner(self) -> Vec<PlatformVariation> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> VariationSet {
        VariationSet::new(vec![
            PlatformVariation::new(Platform::Twitter, "tweet".into(), vec!["a".into()]),
            PlatformVariation::new(Platform::Linkedin, "post".into(), vec![]),
        ])
    }

    #[test]
    fn test_replace_platform_keeps_order_and_others() {
        let mut s = set();
        let fresh = PlatformVariation::new(Platform::Twitter, "new tweet".into(), vec![]);
        assert!(s.replace_platform(fresh));
        let out = s.into_inner();
        assert_eq!(out[0].content, "new tweet");
        assert_eq!(out[1].content, "post");
    }

    #[test]
    fn test_replace_unknown_platform_is_noop() {
        let mut s = set();
        let fresh = PlatformVariation::new(Platform::Facebook, "fb".into(), vec![]);
        assert!(!s.replace_platform(fresh));
        assert!(!s.contains(Platform::Facebook));
        assert_eq!(s.into_inner().len(), 2);
    }

    #[test]
    fn test_deserializes_from_plain_list() {
        let s: VariationSet = serde_json::from_value(serde_json::json!([
            {"platform": "linkedin", "content": "post", "hashtags": []}
        ]))
        .unwrap();
        assert_eq!(s.get(Platform::Linkedin).map(|v| v.content.as_str()), Some("post"));
    }
}
