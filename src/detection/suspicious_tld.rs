use super::{Detector, ScanTarget, ThreatMatch};
use crate::rule_set::{RuleSet, ThreatCategory};

/// Host suffix check. Skipped when the URL has no parsable host.
pub struct SuspiciousTldDetector;

impl Detector for SuspiciousTldDetector {
    fn detect(&self, target: &ScanTarget, rules: &RuleSet) -> Vec<ThreatMatch> {
        let Some(host) = target.host.as_deref() else {
            log::debug!("No host in '{}', skipping TLD check", target.url);
            return Vec::new();
        };

        rules
            .indicators(ThreatCategory::SuspiciousTld)
            .iter()
            .filter(|tld| rules.has_suffix(host, tld))
            .map(|tld| {
                ThreatMatch::scored(
                    rules,
                    ThreatCategory::SuspiciousTld,
                    format!("Suspicious TLD: {}", tld),
                )
            })
            .collect()
    }

    fn name(&self) -> &str {
        "suspicious_tld"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::tests::builtin_rules;

    #[test]
    fn test_suspicious_tld() {
        let rules = builtin_rules();
        let threats =
            SuspiciousTldDetector.detect(&ScanTarget::new("https://free-prize.tk/claim"), &rules);

        assert_eq!(threats.len(), 1);
        assert_eq!(threats[0].description, "Suspicious TLD: .tk");
        assert_eq!(threats[0].points, 4);
    }

    #[test]
    fn test_tld_only_checked_on_host() {
        let rules = builtin_rules();
        let threats = SuspiciousTldDetector
            .detect(&ScanTarget::new("https://example.org/download.xyz"), &rules);

        assert!(threats.is_empty());
    }

    #[test]
    fn test_port_does_not_hide_tld() {
        let rules = builtin_rules();
        let threats =
            SuspiciousTldDetector.detect(&ScanTarget::new("http://evil.top:8080/"), &rules);

        assert_eq!(threats.len(), 1);
    }

    #[test]
    fn test_malformed_url_skipped() {
        let rules = builtin_rules();
        assert!(SuspiciousTldDetector
            .detect(&ScanTarget::new("secure-login-verify.xyz"), &rules)
            .is_empty());
    }
}
