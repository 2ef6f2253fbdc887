use super::{Detector, ScanTarget, ThreatMatch};
use crate::rule_set::{RuleSet, ThreatCategory};

/// Percent or escape encoded characters commonly used to hide the real
/// destination of a link.
pub struct HexEncodingDetector;

impl Detector for HexEncodingDetector {
    fn detect(&self, target: &ScanTarget, rules: &RuleSet) -> Vec<ThreatMatch> {
        rules
            .contains_as_substring(&target.url, ThreatCategory::HexEncoding)
            .map(|pattern| {
                ThreatMatch::scored(
                    rules,
                    ThreatCategory::HexEncoding,
                    format!("Hex encoding detected: {}", pattern),
                )
            })
            .collect()
    }

    fn name(&self) -> &str {
        "hex_encoding"
    }
}
