pub mod behavioral;
pub mod blacklist;
pub mod brand_impersonation;
pub mod hex_encoding;
pub mod phishing_keywords;
pub mod suspicious_tld;
pub mod typosquatting;

use crate::domain_utils::DomainUtils;
use crate::rule_set::{RuleSet, ThreatCategory};
use serde::{Deserialize, Serialize};

/// One rule that fired during an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatMatch {
    pub category: ThreatCategory,
    pub description: String,
    pub points: i32,
}

impl ThreatMatch {
    pub fn new(category: ThreatCategory, description: String, points: i32) -> Self {
        Self {
            category,
            description,
            points,
        }
    }

    /// Build a match scored from the rule set's table.
    pub fn scored(rules: &RuleSet, category: ThreatCategory, description: String) -> Self {
        Self::new(category, description, rules.points(category))
    }
}

/// A URL prepared for detection: lower-cased once, host and query parsed
/// once. `host` is `None` when the URL has no usable network location;
/// `query` is always present and empty when the URL has none.
#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub url: String,
    pub host: Option<String>,
    pub query: String,
}

impl ScanTarget {
    pub fn new(url: &str) -> Self {
        let url = url.trim().to_lowercase();
        let parsed = DomainUtils::parse(&url);
        let host = parsed
            .as_ref()
            .and_then(|u| u.host_str().map(|h| h.to_string()));
        let query = match parsed.as_ref() {
            Some(u) => u.query().unwrap_or("").to_string(),
            None => DomainUtils::raw_query(&url).to_string(),
        };
        Self { url, host, query }
    }
}

/// A single category of heuristic rules.
pub trait Detector: Send + Sync {
    fn detect(&self, target: &ScanTarget, rules: &RuleSet) -> Vec<ThreatMatch>;
    fn name(&self) -> &str;
}

/// Detectors in evaluation order. The trusted-domain check is not part of
/// this list; it runs first and short-circuits.
pub fn default_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(blacklist::BlacklistDetector),
        Box::new(typosquatting::TyposquattingDetector),
        Box::new(phishing_keywords::PhishingKeywordDetector),
        Box::new(suspicious_tld::SuspiciousTldDetector),
        Box::new(brand_impersonation::BrandImpersonationDetector),
        Box::new(hex_encoding::HexEncodingDetector),
        Box::new(behavioral::SocialEngineeringDetector),
        Box::new(behavioral::UrgencyDetector),
    ]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::RuleSetConfig;

    pub(crate) fn builtin_rules() -> RuleSet {
        RuleSet::from_config(&RuleSetConfig::builtin()).unwrap()
    }

    #[test]
    fn test_scan_target_parses_once() {
        let target = ScanTarget::new("  HTTP://Login.Example.XYZ/a?Urgent=1 ");

        assert_eq!(target.url, "http://login.example.xyz/a?urgent=1");
        assert_eq!(target.host.as_deref(), Some("login.example.xyz"));
        assert_eq!(target.query, "urgent=1");
    }

    #[test]
    fn test_scan_target_without_host() {
        let target = ScanTarget::new("login.example.xyz/a?urgent=1");

        assert_eq!(target.host, None);
        assert_eq!(target.query, "urgent=1");
    }

    #[test]
    fn test_default_detector_order() {
        let names: Vec<String> = default_detectors()
            .iter()
            .map(|d| d.name().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "blacklist",
                "typosquatting",
                "phishing_keywords",
                "suspicious_tld",
                "brand_impersonation",
                "hex_encoding",
                "social_engineering",
                "urgency",
            ]
        );
    }

    #[test]
    fn test_scored_uses_table() {
        let rules = builtin_rules();
        let threat = ThreatMatch::scored(
            &rules,
            ThreatCategory::SuspiciousTld,
            "Suspicious TLD: .xyz".to_string(),
        );

        assert_eq!(threat.points, 4);
    }
}
