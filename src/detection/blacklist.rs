use super::{Detector, ScanTarget, ThreatMatch};
use crate::rule_set::{RuleSet, ThreatCategory};

/// Known-bad domains found anywhere in the URL. Every hit is scored.
pub struct BlacklistDetector;

impl Detector for BlacklistDetector {
    fn detect(&self, target: &ScanTarget, rules: &RuleSet) -> Vec<ThreatMatch> {
        let mut threats = Vec::new();

        for domain in rules.contains_as_substring(&target.url, ThreatCategory::KnownPhishingDomain) {
            threats.push(ThreatMatch::scored(
                rules,
                ThreatCategory::KnownPhishingDomain,
                format!("Known phishing domain: {}", domain),
            ));
        }

        for domain in rules.contains_as_substring(&target.url, ThreatCategory::RecentMaliciousDomain)
        {
            threats.push(ThreatMatch::scored(
                rules,
                ThreatCategory::RecentMaliciousDomain,
                format!("Recent malicious domain: {}", domain),
            ));
        }

        threats
    }

    fn name(&self) -> &str {
        "blacklist"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::tests::builtin_rules;

    #[test]
    fn test_known_phishing_domain() {
        let rules = builtin_rules();
        let threats = BlacklistDetector.detect(
            &ScanTarget::new("http://PayPal-Security-Center.com/verify"),
            &rules,
        );

        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].category, ThreatCategory::KnownPhishingDomain);
        assert_eq!(
            threats[0].description,
            "Known phishing domain: paypal-security-center.com"
        );
        assert_eq!(threats[0].points, 10);
    }

    #[test]
    fn test_multiple_hits_accumulate() {
        let rules = builtin_rules();
        let threats = BlacklistDetector.detect(
            &ScanTarget::new("http://amazon-account-verify.net/r?to=bank-alert-secure.top"),
            &rules,
        );

        assert_eq!(threats.len(), 2);
        assert_eq!(threats[1].category, ThreatCategory::RecentMaliciousDomain);
        assert_eq!(threats.iter().map(|t| t.points).sum::<i32>(), 20);
    }

    #[test]
    fn test_matches_without_host() {
        let rules = builtin_rules();
        let threats = BlacklistDetector.detect(&ScanTarget::new("wallet-connect-sync.xyz"), &rules);

        assert_eq!(threats.len(), 1);
    }

    #[test]
    fn test_clean_url() {
        let rules = builtin_rules();
        assert!(BlacklistDetector
            .detect(&ScanTarget::new("http://example.org"), &rules)
            .is_empty());
    }
}
