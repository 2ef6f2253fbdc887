use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Scoring categories understood by the engine. Each one is a key of
/// `scoring_system.risk_scores`.
pub const KNOWN_PHISHING_DOMAIN: &str = "known_phishing_domain";
pub const TYPOSQUATTING: &str = "typosquatting";
pub const PHISHING_KEYWORD: &str = "phishing_keyword";
pub const SUSPICIOUS_TLD: &str = "suspicious_tld";
pub const BRAND_IMPERSONATION: &str = "brand_impersonation";
pub const HEX_ENCODING: &str = "hex_encoding";
pub const SOCIAL_ENGINEERING_PHRASE: &str = "social_engineering_phrase";
pub const URGENCY_INDICATOR: &str = "urgency_indicator";

/// On-disk shape of the rule database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSetConfig {
    #[serde(default)]
    pub immediate_blacklist: BlacklistConfig,
    #[serde(default)]
    pub whitelist: WhitelistConfig,
    #[serde(default)]
    pub suspicious_patterns: SuspiciousPatternsConfig,
    #[serde(default)]
    pub brand_protection: BrandProtectionConfig,
    #[serde(default)]
    pub technical_indicators: TechnicalIndicatorsConfig,
    #[serde(default)]
    pub behavioral_patterns: BehavioralPatternsConfig,
    pub scoring_system: ScoringSystemConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlacklistConfig {
    #[serde(default)]
    pub known_phishing_domains: Vec<String>,
    #[serde(default)]
    pub recent_malicious_domains: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhitelistConfig {
    #[serde(default)]
    pub trusted_domains: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuspiciousPatternsConfig {
    #[serde(default)]
    pub typosquatting_keywords: Vec<String>,
    #[serde(default)]
    pub phishing_keywords: Vec<String>,
    #[serde(default)]
    pub suspicious_tlds: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandProtectionConfig {
    #[serde(default)]
    pub legitimate_brand_domains: Vec<String>,
    /// Lookalike fragments such as "paypal-" scored wherever they appear.
    #[serde(default)]
    pub brand_impersonation_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalIndicatorsConfig {
    #[serde(default)]
    pub hex_encoded_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehavioralPatternsConfig {
    #[serde(default)]
    pub social_engineering_phrases: Vec<String>,
    #[serde(default)]
    pub urgency_indicators: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringSystemConfig {
    #[serde(default)]
    pub risk_scores: BTreeMap<String, i32>,
    // Optional so a missing field surfaces as a configuration error
    // instead of a parse error.
    pub high_risk_threshold: Option<i32>,
    pub medium_risk_threshold: Option<i32>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl RuleSetConfig {
    /// Built-in rule database used when no configuration file is present.
    pub fn builtin() -> Self {
        let risk_scores = [
            (KNOWN_PHISHING_DOMAIN, 10),
            (TYPOSQUATTING, 7),
            (PHISHING_KEYWORD, 2),
            (SUSPICIOUS_TLD, 4),
            (BRAND_IMPERSONATION, 6),
            (HEX_ENCODING, 3),
            (SOCIAL_ENGINEERING_PHRASE, 3),
            (URGENCY_INDICATOR, 2),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        RuleSetConfig {
            immediate_blacklist: BlacklistConfig {
                known_phishing_domains: strings(&[
                    "paypal-security-center.com",
                    "amazon-account-verify.net",
                    "secure-appleid-login.com",
                    "microsoft-support-alert.com",
                    "netflix-billing-update.com",
                ]),
                recent_malicious_domains: strings(&[
                    "wallet-connect-sync.xyz",
                    "bank-alert-secure.top",
                ]),
            },
            whitelist: WhitelistConfig {
                trusted_domains: strings(&[
                    "paypal.com",
                    "google.com",
                    "amazon.com",
                    "microsoft.com",
                    "apple.com",
                    "github.com",
                    "wikipedia.org",
                ]),
            },
            suspicious_patterns: SuspiciousPatternsConfig {
                typosquatting_keywords: strings(&[
                    "paypa1", "amaz0n", "g00gle", "micros0ft", "rnicrosoft", "faceb00k", "app1e",
                    "netf1ix",
                ]),
                phishing_keywords: strings(&[
                    "login",
                    "signin",
                    "verify",
                    "secure",
                    "account",
                    "update",
                    "confirm",
                    "banking",
                    "password",
                    "suspended",
                    "wallet",
                ]),
                suspicious_tlds: strings(&[
                    ".xyz", ".tk", ".ml", ".ga", ".cf", ".gq", ".top", ".icu", ".buzz", ".click",
                ]),
            },
            brand_protection: BrandProtectionConfig {
                legitimate_brand_domains: strings(&[
                    "paypal.com",
                    "amazon.com",
                    "google.com",
                    "microsoft.com",
                    "apple.com",
                    "netflix.com",
                    "facebook.com",
                ]),
                brand_impersonation_patterns: Vec::new(),
            },
            technical_indicators: TechnicalIndicatorsConfig {
                hex_encoded_urls: strings(&["%2e", "%2f", "%40", "\\x"]),
            },
            behavioral_patterns: BehavioralPatternsConfig {
                social_engineering_phrases: strings(&[
                    "verify_account",
                    "account_suspended",
                    "confirm_identity",
                    "security_alert",
                    "update_payment",
                ]),
                urgency_indicators: strings(&[
                    "urgent",
                    "immediately",
                    "expire",
                    "final_notice",
                    "limited_time",
                ]),
            },
            scoring_system: ScoringSystemConfig {
                risk_scores,
                high_risk_threshold: Some(10),
                medium_risk_threshold: Some(5),
            },
        }
    }

    /// Load a rule database. `.json` files are read as JSON, anything else
    /// as YAML (a superset of JSON).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            serde_yaml::to_string(self)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

impl ScoringSystemConfig {
    pub fn points(&self, category: &str) -> Result<i32> {
        self.risk_scores.get(category).copied().ok_or_else(|| {
            ScanError::Configuration(format!(
                "scoring_system.risk_scores has no entry for '{}'",
                category
            ))
        })
    }
}
