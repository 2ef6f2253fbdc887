use crate::classifier::{TierClassifier, Verdict};
use crate::detection::{self, Detector, ScanTarget, ThreatMatch};
use crate::error::{Result, ScanError};
use crate::rule_set::{RuleSet, ThreatCategory};
use serde::Serialize;
use std::sync::Arc;

/// Aggregate of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub total_score: i32,
    pub threats: Vec<ThreatMatch>,
}

impl ScoreResult {
    /// True when the URL short-circuited on a trusted domain.
    pub fn is_trusted(&self) -> bool {
        self.threats
            .first()
            .map_or(false, |t| t.category == ThreatCategory::TrustedDomain)
    }
}

/// Stateless URL scorer over a shared, immutable rule set.
pub struct ScoringEngine {
    rules: Arc<RuleSet>,
    detectors: Vec<Box<dyn Detector>>,
    classifier: TierClassifier,
}

impl ScoringEngine {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        let classifier = TierClassifier::new(&rules);
        Self {
            rules,
            detectors: detection::default_detectors(),
            classifier,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn classifier(&self) -> &TierClassifier {
        &self.classifier
    }

    pub fn evaluate(&self, url: &str) -> Result<ScoreResult> {
        if url.trim().is_empty() {
            return Err(ScanError::InvalidInput("URL parameter required".to_string()));
        }

        let target = ScanTarget::new(url);

        // Trust overrides every other signal
        if let Some(domain) = self
            .rules
            .contains_as_substring(&target.url, ThreatCategory::TrustedDomain)
            .next()
        {
            log::debug!("Trusted domain '{}' in {}", domain, target.url);
            return Ok(ScoreResult {
                total_score: 0,
                threats: vec![ThreatMatch::new(
                    ThreatCategory::TrustedDomain,
                    format!("Trusted domain: {}", domain),
                    0,
                )],
            });
        }

        let mut total_score: i32 = 0;
        let mut threats = Vec::new();
        for detector in &self.detectors {
            for threat in detector.detect(&target, &self.rules) {
                log::debug!(
                    "{} fired on {}: {} (+{})",
                    detector.name(),
                    target.url,
                    threat.description,
                    threat.points
                );
                total_score = total_score.saturating_add(threat.points);
                threats.push(threat);
            }
        }

        Ok(ScoreResult {
            total_score,
            threats,
        })
    }

    /// Evaluate and classify a single URL.
    pub fn assess(&self, url: &str) -> Result<Verdict> {
        let result = self.evaluate(url)?;
        Ok(self.verdict(url.trim().to_lowercase(), result))
    }

    pub fn verdict(&self, url: String, result: ScoreResult) -> Verdict {
        let tier = self.classifier.classify(result.total_score);
        let total_threats = result
            .threats
            .iter()
            .filter(|t| t.category != ThreatCategory::TrustedDomain)
            .count();
        Verdict {
            url,
            score: result.total_score,
            tier,
            threats: result.threats,
            total_threats,
            recommendation: tier.recommendation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Recommendation, RiskLevel};
    use crate::config::RuleSetConfig;

    fn engine() -> ScoringEngine {
        ScoringEngine::new(Arc::new(
            RuleSet::from_config(&RuleSetConfig::builtin()).unwrap(),
        ))
    }

    #[test]
    fn test_trusted_domain_is_safe() {
        let verdict = engine().assess("http://paypal.com/login").unwrap();

        assert_eq!(verdict.score, 0);
        assert_eq!(verdict.tier, RiskLevel::LowRisk);
        assert_eq!(verdict.recommendation, Recommendation::Safe);
        assert_eq!(verdict.threats.len(), 1);
        assert_eq!(verdict.threats[0].description, "Trusted domain: paypal.com");
        assert_eq!(verdict.total_threats, 0);
    }

    #[test]
    fn test_whitelist_overrides_everything() {
        let result = engine()
            .evaluate("http://paypal.com.paypa1-security.xyz/secure/login?msg=urgent%2f")
            .unwrap();

        assert_eq!(result.total_score, 0);
        assert!(result.is_trusted());
    }

    #[test]
    fn test_known_phishing_domain_blocks() {
        let verdict = engine()
            .assess("http://paypal-security-center.com")
            .unwrap();

        // Blacklist hit plus "paypal" outside paypal.com
        assert_eq!(verdict.score, 16);
        assert_eq!(verdict.tier, RiskLevel::HighRisk);
        assert_eq!(verdict.recommendation, Recommendation::Block);
        assert_eq!(
            verdict.threats[0].description,
            "Known phishing domain: paypal-security-center.com"
        );
    }

    #[test]
    fn test_keywords_and_tld_accumulate() {
        let result = engine().evaluate("http://secure-login-verify.xyz").unwrap();

        // 3 keywords x 2 points + .xyz for 4 points
        assert_eq!(result.total_score, 10);
        let categories: Vec<ThreatCategory> = result.threats.iter().map(|t| t.category).collect();
        assert_eq!(
            categories,
            vec![
                ThreatCategory::PhishingKeyword,
                ThreatCategory::PhishingKeyword,
                ThreatCategory::PhishingKeyword,
                ThreatCategory::SuspiciousTld,
            ]
        );
        assert_eq!(
            engine().classifier().classify(result.total_score),
            RiskLevel::HighRisk
        );
    }

    #[test]
    fn test_medium_risk() {
        let verdict = engine().assess("http://example.org/account/update").unwrap();

        assert_eq!(verdict.score, 4);
        assert_eq!(verdict.tier, RiskLevel::LowRisk);

        let verdict = engine()
            .assess("http://example.org/account/update?t=urgent")
            .unwrap();
        assert_eq!(verdict.score, 6);
        assert_eq!(verdict.tier, RiskLevel::MediumRisk);
        assert_eq!(verdict.recommendation, Recommendation::Caution);
        assert_eq!(verdict.total_threats, 3);
    }

    #[test]
    fn test_empty_url_rejected() {
        for url in ["", "   ", "\t\n"] {
            assert!(matches!(
                engine().evaluate(url),
                Err(ScanError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_malformed_url_still_scored() {
        let result = engine().evaluate("secure-login-verify.xyz").unwrap();

        // Keywords still count; TLD and brand checks need a host
        assert_eq!(result.total_score, 6);
        assert!(result
            .threats
            .iter()
            .all(|t| t.category == ThreatCategory::PhishingKeyword));
    }

    #[test]
    fn test_query_scored_without_host() {
        let verdict = engine()
            .assess("example.org/notice?reason=account_suspended&msg=urgent")
            .unwrap();

        // Social engineering phrase (3) plus urgency word (2)
        assert_eq!(verdict.score, 5);
        assert_eq!(verdict.tier, RiskLevel::MediumRisk);
    }

    #[test]
    fn test_brand_pattern_from_database() {
        let mut config = RuleSetConfig::builtin();
        config.brand_protection.legitimate_brand_domains.clear();
        config.brand_protection.brand_impersonation_patterns = vec!["paypal-".to_string()];
        let engine = ScoringEngine::new(Arc::new(RuleSet::from_config(&config).unwrap()));

        let result = engine.evaluate("http://paypal-verify.com").unwrap();
        // Pattern (6) plus the "verify" keyword (2)
        assert_eq!(result.total_score, 8);
        assert!(result
            .threats
            .iter()
            .any(|t| t.description == "Brand impersonation: paypal-"));
    }

    #[test]
    fn test_large_points_saturate() {
        let mut config = RuleSetConfig::builtin();
        config
            .scoring_system
            .risk_scores
            .insert(crate::config::TYPOSQUATTING.to_string(), i32::MAX);
        config
            .suspicious_patterns
            .typosquatting_keywords
            .push("paypa1".to_string());
        let engine = ScoringEngine::new(Arc::new(RuleSet::from_config(&config).unwrap()));

        let verdict = engine.assess("http://paypa1.net").unwrap();
        assert_eq!(verdict.score, i32::MAX);
        assert_eq!(verdict.tier, RiskLevel::HighRisk);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let engine = engine();
        let url = "http://amaz0n-account.tk/verify?reason=verify_account";

        assert_eq!(engine.evaluate(url).unwrap(), engine.evaluate(url).unwrap());
    }

    #[test]
    fn test_adding_tokens_never_lowers_score() {
        let engine = engine();
        let urls = [
            "http://example.org/",
            "http://example.org/login",
            "http://example.org/login/wallet",
            "http://example.org/login/wallet?urgent",
            "http://g00gle-example.org/login/wallet?urgent",
            "http://g00gle-example.tk/login/wallet?urgent",
        ];

        let scores: Vec<i32> = urls
            .iter()
            .map(|u| engine.evaluate(u).unwrap().total_score)
            .collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]), "{:?}", scores);
        assert!(scores[5] > scores[0]);
    }

    #[test]
    fn test_duplicate_indicators_score_twice() {
        let mut config = RuleSetConfig::builtin();
        config
            .suspicious_patterns
            .typosquatting_keywords
            .push("paypa1".to_string());
        let engine = ScoringEngine::new(Arc::new(RuleSet::from_config(&config).unwrap()));

        let result = engine.evaluate("http://paypa1.net").unwrap();
        let typos = result
            .threats
            .iter()
            .filter(|t| t.category == ThreatCategory::Typosquatting)
            .count();
        assert_eq!(typos, 2);
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScoringEngine>();
    }
}
