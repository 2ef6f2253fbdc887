use crate::config::{self, RuleSetConfig};
use crate::domain_utils::DomainUtils;
use crate::error::{Result, ScanError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Category a threat indicator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatCategory {
    TrustedDomain,
    KnownPhishingDomain,
    RecentMaliciousDomain,
    Typosquatting,
    PhishingKeyword,
    SuspiciousTld,
    BrandImpersonation,
    HexEncoding,
    SocialEngineering,
    Urgency,
}

impl ThreatCategory {
    pub const ALL: [ThreatCategory; 10] = [
        ThreatCategory::TrustedDomain,
        ThreatCategory::KnownPhishingDomain,
        ThreatCategory::RecentMaliciousDomain,
        ThreatCategory::Typosquatting,
        ThreatCategory::PhishingKeyword,
        ThreatCategory::SuspiciousTld,
        ThreatCategory::BrandImpersonation,
        ThreatCategory::HexEncoding,
        ThreatCategory::SocialEngineering,
        ThreatCategory::Urgency,
    ];

    /// Key in `scoring_system.risk_scores`. Trusted domains carry no score.
    pub fn score_key(&self) -> Option<&'static str> {
        match self {
            ThreatCategory::TrustedDomain => None,
            ThreatCategory::KnownPhishingDomain | ThreatCategory::RecentMaliciousDomain => {
                Some(config::KNOWN_PHISHING_DOMAIN)
            }
            ThreatCategory::Typosquatting => Some(config::TYPOSQUATTING),
            ThreatCategory::PhishingKeyword => Some(config::PHISHING_KEYWORD),
            ThreatCategory::SuspiciousTld => Some(config::SUSPICIOUS_TLD),
            ThreatCategory::BrandImpersonation => Some(config::BRAND_IMPERSONATION),
            ThreatCategory::HexEncoding => Some(config::HEX_ENCODING),
            ThreatCategory::SocialEngineering => Some(config::SOCIAL_ENGINEERING_PHRASE),
            ThreatCategory::Urgency => Some(config::URGENCY_INDICATOR),
        }
    }
}

impl fmt::Display for ThreatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThreatCategory::TrustedDomain => "trusted_domain",
            ThreatCategory::KnownPhishingDomain => "known_phishing_domain",
            ThreatCategory::RecentMaliciousDomain => "recent_malicious_domain",
            ThreatCategory::Typosquatting => "typosquatting",
            ThreatCategory::PhishingKeyword => "phishing_keyword",
            ThreatCategory::SuspiciousTld => "suspicious_tld",
            ThreatCategory::BrandImpersonation => "brand_impersonation",
            ThreatCategory::HexEncoding => "hex_encoding",
            ThreatCategory::SocialEngineering => "social_engineering",
            ThreatCategory::Urgency => "urgency",
        };
        f.write_str(name)
    }
}

/// A keyword matched on word boundaries.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub keyword: String,
    pattern: Regex,
}

impl KeywordRule {
    pub fn new(keyword: &str) -> Result<Self> {
        let keyword = keyword.to_lowercase();
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&keyword))).map_err(|e| {
            ScanError::Configuration(format!("Invalid keyword '{}': {}", keyword, e))
        })?;
        Ok(Self { keyword, pattern })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// A canonical brand domain and the brand token derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandDomain {
    pub domain: String,
    pub brand: String,
}

/// Immutable snapshot of every indicator list, the scoring table and the
/// risk thresholds. Built once and shared read-only between evaluations.
#[derive(Debug, Clone)]
pub struct RuleSet {
    known_phishing_domains: Vec<String>,
    recent_malicious_domains: Vec<String>,
    trusted_domains: Vec<String>,
    typosquatting_keywords: Vec<String>,
    phishing_keywords: Vec<KeywordRule>,
    suspicious_tlds: Vec<String>,
    legitimate_brand_domains: Vec<BrandDomain>,
    brand_impersonation_patterns: Vec<String>,
    hex_patterns: Vec<String>,
    social_engineering_phrases: Vec<String>,
    urgency_indicators: Vec<String>,
    points: HashMap<ThreatCategory, i32>,
    high_risk_threshold: i32,
    medium_risk_threshold: i32,
}

fn normalize(category: &str, entries: &[String]) -> Vec<String> {
    let mut normalized = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = entry.trim().to_lowercase();
        if entry.is_empty() {
            // An empty indicator would match every URL
            log::warn!("Ignoring empty entry in {}", category);
            continue;
        }
        normalized.push(entry);
    }
    normalized
}

impl RuleSet {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = RuleSetConfig::from_file(&path)?;
        let rule_set = Self::from_config(&config)?;
        log::info!(
            "Loaded rule set from {} ({} indicators)",
            path.as_ref().display(),
            rule_set.indicator_count()
        );
        Ok(rule_set)
    }

    pub fn from_config(config: &RuleSetConfig) -> Result<Self> {
        let scoring = &config.scoring_system;
        let high_risk_threshold = scoring.high_risk_threshold.ok_or_else(|| {
            ScanError::Configuration("missing scoring_system.high_risk_threshold".to_string())
        })?;
        let medium_risk_threshold = scoring.medium_risk_threshold.ok_or_else(|| {
            ScanError::Configuration("missing scoring_system.medium_risk_threshold".to_string())
        })?;
        if medium_risk_threshold < 0 || high_risk_threshold <= medium_risk_threshold {
            return Err(ScanError::Configuration(format!(
                "thresholds must satisfy high > medium >= 0 (high={}, medium={})",
                high_risk_threshold, medium_risk_threshold
            )));
        }

        let patterns = &config.suspicious_patterns;
        let phishing_keywords = normalize("phishing_keywords", &patterns.phishing_keywords)
            .iter()
            .map(|k| KeywordRule::new(k))
            .collect::<Result<Vec<_>>>()?;

        let legitimate_brand_domains = normalize(
            "legitimate_brand_domains",
            &config.brand_protection.legitimate_brand_domains,
        )
        .into_iter()
        .map(|domain| BrandDomain {
            brand: DomainUtils::brand_label(&domain),
            domain,
        })
        .collect();

        let mut rule_set = Self {
            known_phishing_domains: normalize(
                "known_phishing_domains",
                &config.immediate_blacklist.known_phishing_domains,
            ),
            recent_malicious_domains: normalize(
                "recent_malicious_domains",
                &config.immediate_blacklist.recent_malicious_domains,
            ),
            trusted_domains: normalize("trusted_domains", &config.whitelist.trusted_domains),
            typosquatting_keywords: normalize(
                "typosquatting_keywords",
                &patterns.typosquatting_keywords,
            ),
            phishing_keywords,
            suspicious_tlds: normalize("suspicious_tlds", &patterns.suspicious_tlds),
            legitimate_brand_domains,
            brand_impersonation_patterns: normalize(
                "brand_impersonation_patterns",
                &config.brand_protection.brand_impersonation_patterns,
            ),
            hex_patterns: normalize(
                "hex_encoded_urls",
                &config.technical_indicators.hex_encoded_urls,
            ),
            social_engineering_phrases: normalize(
                "social_engineering_phrases",
                &config.behavioral_patterns.social_engineering_phrases,
            ),
            urgency_indicators: normalize(
                "urgency_indicators",
                &config.behavioral_patterns.urgency_indicators,
            ),
            points: HashMap::new(),
            high_risk_threshold,
            medium_risk_threshold,
        };

        // A category only needs points when it can fire.
        for category in ThreatCategory::ALL {
            let Some(key) = category.score_key() else {
                continue;
            };
            if rule_set.category_len(category) == 0 {
                continue;
            }
            let points = scoring.points(key)?;
            if points < 0 {
                return Err(ScanError::Configuration(format!(
                    "risk score for '{}' must not be negative ({})",
                    key, points
                )));
            }
            rule_set.points.insert(category, points);
        }

        Ok(rule_set)
    }

    fn category_len(&self, category: ThreatCategory) -> usize {
        match category {
            ThreatCategory::PhishingKeyword => self.phishing_keywords.len(),
            ThreatCategory::BrandImpersonation => {
                self.legitimate_brand_domains.len() + self.brand_impersonation_patterns.len()
            }
            other => self.indicators(other).len(),
        }
    }

    /// Plain substring indicators of a category. Phishing keywords and
    /// legitimate brand domains are exposed through their own accessors;
    /// for `BrandImpersonation` this is the lookalike pattern list.
    pub fn indicators(&self, category: ThreatCategory) -> &[String] {
        match category {
            ThreatCategory::TrustedDomain => &self.trusted_domains,
            ThreatCategory::KnownPhishingDomain => &self.known_phishing_domains,
            ThreatCategory::RecentMaliciousDomain => &self.recent_malicious_domains,
            ThreatCategory::Typosquatting => &self.typosquatting_keywords,
            ThreatCategory::SuspiciousTld => &self.suspicious_tlds,
            ThreatCategory::HexEncoding => &self.hex_patterns,
            ThreatCategory::SocialEngineering => &self.social_engineering_phrases,
            ThreatCategory::Urgency => &self.urgency_indicators,
            ThreatCategory::BrandImpersonation => &self.brand_impersonation_patterns,
            ThreatCategory::PhishingKeyword => &[],
        }
    }

    /// Every indicator of `category` contained in `text`, in rule order.
    pub fn contains_as_substring<'a>(
        &'a self,
        text: &'a str,
        category: ThreatCategory,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.indicators(category)
            .iter()
            .filter(move |entry| text.contains(entry.as_str()))
            .map(String::as_str)
    }

    /// Whole-word test for any keyword. Configured phishing keywords reuse
    /// their compiled pattern; other keywords are compiled on demand.
    pub fn matches_whole_word(&self, text: &str, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return false;
        }
        if let Some(rule) = self.phishing_keywords.iter().find(|r| r.keyword == keyword) {
            return rule.matches(text);
        }
        match KeywordRule::new(&keyword) {
            Ok(rule) => rule.matches(text),
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }

    pub fn phishing_keywords(&self) -> &[KeywordRule] {
        &self.phishing_keywords
    }

    pub fn has_suffix(&self, domain: &str, tld: &str) -> bool {
        domain.to_lowercase().ends_with(&tld.to_lowercase())
    }

    pub fn split_brand_name(&self, domain: &str) -> String {
        DomainUtils::brand_label(domain)
    }

    pub fn legitimate_brand_domains(&self) -> &[BrandDomain] {
        &self.legitimate_brand_domains
    }

    /// Points awarded for one hit in `category`.
    pub fn points(&self, category: ThreatCategory) -> i32 {
        self.points.get(&category).copied().unwrap_or(0)
    }

    pub fn high_risk_threshold(&self) -> i32 {
        self.high_risk_threshold
    }

    pub fn medium_risk_threshold(&self) -> i32 {
        self.medium_risk_threshold
    }

    pub fn indicator_count(&self) -> usize {
        ThreatCategory::ALL
            .iter()
            .map(|c| self.category_len(*c))
            .sum()
    }
}
