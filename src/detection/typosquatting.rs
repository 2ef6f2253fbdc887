use super::{Detector, ScanTarget, ThreatMatch};
use crate::rule_set::{RuleSet, ThreatCategory};

pub struct TyposquattingDetector;

impl Detector for TyposquattingDetector {
    fn detect(&self, target: &ScanTarget, rules: &RuleSet) -> Vec<ThreatMatch> {
        rules
            .contains_as_substring(&target.url, ThreatCategory::Typosquatting)
            .map(|typo| {
                ThreatMatch::scored(
                    rules,
                    ThreatCategory::Typosquatting,
                    format!("Typosquatting detected: {}", typo),
                )
            })
            .collect()
    }

    fn name(&self) -> &str {
        "typosquatting"
    }
}
