use crate::detection::ThreatMatch;
use crate::rule_set::RuleSet;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    LowRisk,
    MediumRisk,
    HighRisk,
}

impl RiskLevel {
    pub fn recommendation(&self) -> Recommendation {
        match self {
            RiskLevel::HighRisk => Recommendation::Block,
            RiskLevel::MediumRisk => Recommendation::Caution,
            RiskLevel::LowRisk => Recommendation::Safe,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::LowRisk => "LOW_RISK",
            RiskLevel::MediumRisk => "MEDIUM_RISK",
            RiskLevel::HighRisk => "HIGH_RISK",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Safe,
    Caution,
    Block,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Recommendation::Safe => "SAFE",
            Recommendation::Caution => "CAUTION",
            Recommendation::Block => "BLOCK",
        })
    }
}

/// Maps an aggregate score onto a risk level.
#[derive(Debug, Clone, Copy)]
pub struct TierClassifier {
    high_risk_threshold: i32,
    medium_risk_threshold: i32,
}

impl TierClassifier {
    pub fn new(rules: &RuleSet) -> Self {
        Self {
            high_risk_threshold: rules.high_risk_threshold(),
            medium_risk_threshold: rules.medium_risk_threshold(),
        }
    }

    pub fn classify(&self, score: i32) -> RiskLevel {
        match score {
            s if s >= self.high_risk_threshold => RiskLevel::HighRisk,
            s if s >= self.medium_risk_threshold => RiskLevel::MediumRisk,
            _ => RiskLevel::LowRisk,
        }
    }
}

/// Final answer for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    #[serde(rename = "url_analyzed")]
    pub url: String,
    #[serde(rename = "risk_score")]
    pub score: i32,
    #[serde(rename = "risk_level")]
    pub tier: RiskLevel,
    #[serde(rename = "threats_detected", serialize_with = "serialize_descriptions")]
    pub threats: Vec<ThreatMatch>,
    pub total_threats: usize,
    pub recommendation: Recommendation,
}

fn serialize_descriptions<S>(threats: &[ThreatMatch], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(threats.iter().map(|t| t.description.as_str()))
}
