use super::{Detector, ScanTarget, ThreatMatch};
use crate::rule_set::{RuleSet, ThreatCategory};

/// Flags a brand token (e.g. "paypal") used in a URL that does not contain
/// the brand's canonical domain (e.g. "paypal.com"), then any configured
/// lookalike pattern (e.g. "paypal-") found in the URL.
pub struct BrandImpersonationDetector;

impl Detector for BrandImpersonationDetector {
    fn detect(&self, target: &ScanTarget, rules: &RuleSet) -> Vec<ThreatMatch> {
        let mut threats = Vec::new();

        if target.host.is_some() {
            for brand_domain in rules.legitimate_brand_domains() {
                if target.url.contains(&brand_domain.brand)
                    && !target.url.contains(&brand_domain.domain)
                {
                    threats.push(ThreatMatch::scored(
                        rules,
                        ThreatCategory::BrandImpersonation,
                        format!("Brand impersonation: {}", brand_domain.brand),
                    ));
                }
            }
        } else {
            log::debug!("No host in '{}', skipping brand domain check", target.url);
        }

        // Lookalike patterns are plain substrings and need no host
        for pattern in rules.contains_as_substring(&target.url, ThreatCategory::BrandImpersonation)
        {
            threats.push(ThreatMatch::scored(
                rules,
                ThreatCategory::BrandImpersonation,
                format!("Brand impersonation: {}", pattern),
            ));
        }

        threats
    }

    fn name(&self) -> &str {
        "brand_impersonation"
    }
}
