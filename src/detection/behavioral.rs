use super::{Detector, ScanTarget, ThreatMatch};
use crate::rule_set::{RuleSet, ThreatCategory};

fn query_matches(
    target: &ScanTarget,
    rules: &RuleSet,
    category: ThreatCategory,
    label: &str,
) -> Vec<ThreatMatch> {
    rules
        .contains_as_substring(&target.query, category)
        .map(|phrase| ThreatMatch::scored(rules, category, format!("{}: {}", label, phrase)))
        .collect()
}

/// Social engineering phrases carried in the query string.
pub struct SocialEngineeringDetector;

impl Detector for SocialEngineeringDetector {
    fn detect(&self, target: &ScanTarget, rules: &RuleSet) -> Vec<ThreatMatch> {
        query_matches(target, rules, ThreatCategory::SocialEngineering, "Social engineering")
    }

    fn name(&self) -> &str {
        "social_engineering"
    }
}

/// Urgency wording carried in the query string.
pub struct UrgencyDetector;

impl Detector for UrgencyDetector {
    fn detect(&self, target: &ScanTarget, rules: &RuleSet) -> Vec<ThreatMatch> {
        query_matches(target, rules, ThreatCategory::Urgency, "Urgency indicator")
    }

    fn name(&self) -> &str {
        "urgency"
    }
}
