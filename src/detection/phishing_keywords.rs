use super::{Detector, ScanTarget, ThreatMatch};
use crate::rule_set::{RuleSet, ThreatCategory};

/// Phishing vocabulary matched on word boundaries, so `login` fires on
/// `/secure-login` but not on `/loginpage`.
pub struct PhishingKeywordDetector;

impl Detector for PhishingKeywordDetector {
    fn detect(&self, target: &ScanTarget, rules: &RuleSet) -> Vec<ThreatMatch> {
        rules
            .phishing_keywords()
            .iter()
            .filter(|rule| rule.matches(&target.url))
            .map(|rule| {
                log::debug!("Phishing keyword '{}' in {}", rule.keyword, target.url);
                ThreatMatch::scored(
                    rules,
                    ThreatCategory::PhishingKeyword,
                    format!("Suspicious keyword: {}", rule.keyword),
                )
            })
            .collect()
    }

    fn name(&self) -> &str {
        "phishing_keywords"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::tests::builtin_rules;

    fn keywords(url: &str) -> Vec<String> {
        let rules = builtin_rules();
        PhishingKeywordDetector
            .detect(&ScanTarget::new(url), &rules)
            .into_iter()
            .map(|t| t.description)
            .collect()
    }

    #[test]
    fn test_keywords_in_hyphenated_domain() {
        assert_eq!(
            keywords("http://secure-login-verify.xyz"),
            vec![
                "Suspicious keyword: login",
                "Suspicious keyword: verify",
                "Suspicious keyword: secure",
            ]
        );
    }

    #[test]
    fn test_whole_word_only() {
        assert!(keywords("http://example.org/loginpage/updated").is_empty());
    }

    #[test]
    fn test_keyword_in_path_and_query() {
        assert_eq!(
            keywords("http://example.org/account?next=password"),
            vec!["Suspicious keyword: account", "Suspicious keyword: password"]
        );
    }

    #[test]
    fn test_keyword_points() {
        let rules = builtin_rules();
        let threats =
            PhishingKeywordDetector.detect(&ScanTarget::new("http://a.org/wallet"), &rules);

        assert_eq!(threats[0].points, 2);
        assert_eq!(threats[0].category, ThreatCategory::PhishingKeyword);
    }
}
