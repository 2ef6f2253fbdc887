pub mod batch;
pub mod classifier;
pub mod config;
pub mod detection;
pub mod domain_utils;
pub mod engine;
pub mod error;
pub mod rule_set;
pub mod service;

pub use batch::{scan_batch, BatchItem};
pub use classifier::{Recommendation, RiskLevel, TierClassifier, Verdict};
pub use config::RuleSetConfig;
pub use detection::ThreatMatch;
pub use engine::{ScoreResult, ScoringEngine};
pub use error::ScanError;
pub use rule_set::{RuleSet, ThreatCategory};
