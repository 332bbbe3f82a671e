use crate::error::KycError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

pub const CATALOG_VERSION: u32 = 2;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct KycConfig {
    #[serde(default)]
    pub catalog: GoalCatalog,
    #[serde(default)]
    pub checklist: ChecklistThresholds,
    #[serde(default)]
    pub verification: VerificationThresholds,
}

/// An investment venue and the verification it demands.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub min_score: f64,
    pub min_amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub why: String,
}

/// Goals with `min_score` at or above this tier need `receipts` processed receipts.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct ReceiptTier {
    pub min_score: f64,
    pub receipts: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GoalCatalog {
    #[serde(default = "default_catalog_version")]
    pub version: u32,
    #[serde(default = "default_goals")]
    pub goals: Vec<Goal>,
    #[serde(default = "default_receipt_tiers")]
    pub receipt_tiers: Vec<ReceiptTier>,
}

impl Default for GoalCatalog {
    fn default() -> Self {
        Self {
            version: default_catalog_version(),
            goals: default_goals(),
            receipt_tiers: default_receipt_tiers(),
        }
    }
}

impl GoalCatalog {
    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    /// Step function from a goal's score requirement to its receipt requirement.
    pub fn receipts_needed(&self, min_score: f64) -> u32 {
        let matching = self
            .receipt_tiers
            .iter()
            .filter(|tier| tier.min_score <= min_score)
            .max_by(|a, b| a.min_score.total_cmp(&b.min_score));
        let lowest = || {
            self.receipt_tiers
                .iter()
                .min_by(|a, b| a.min_score.total_cmp(&b.min_score))
        };
        matching
            .or_else(lowest)
            .map(|tier| tier.receipts)
            .unwrap_or(0)
    }

    /// Hex SHA-256 over the catalog's JSON form; identifies the catalog in reports.
    pub fn digest(&self) -> Result<String, KycError> {
        let bytes = serde_json::to_vec(self)?;
        let hash = Sha256::digest(&bytes);
        Ok(hash.iter().map(|byte| format!("{byte:02x}")).collect())
    }
}

fn default_catalog_version() -> u32 {
    CATALOG_VERSION
}

fn default_receipt_tiers() -> Vec<ReceiptTier> {
    vec![
        ReceiptTier {
            min_score: 85.0,
            receipts: 20,
        },
        ReceiptTier {
            min_score: 80.0,
            receipts: 15,
        },
        ReceiptTier {
            min_score: 75.0,
            receipts: 10,
        },
        ReceiptTier {
            min_score: 0.0,
            receipts: 8,
        },
    ]
}

fn goal(
    id: &str,
    name: &str,
    (min_score, min_amount): (f64, f64),
    description: &str,
    requirements: &[&str],
    why: &str,
) -> Goal {
    Goal {
        id: id.to_string(),
        name: name.to_string(),
        min_score,
        min_amount,
        description: description.to_string(),
        requirements: requirements.iter().map(ToString::to_string).collect(),
        why: why.to_string(),
    }
}

fn default_goals() -> Vec<Goal> {
    vec![
        goal(
            "nyse",
            "NYSE - New York Stock Exchange",
            (75.0, 50_000.0),
            "Trade US stocks - Apple, Tesla, Microsoft, Amazon",
            &[
                "KYC Score ≥ 75",
                "KES 50,000+ transaction history",
                "10+ processed receipts over 60 days",
                "Alternative to SEC verification",
            ],
            "Access the world's largest stock market without traditional SEC paperwork",
        ),
        goal(
            "nasdaq",
            "NASDAQ - Tech Stocks",
            (75.0, 50_000.0),
            "Invest in global tech companies - Google, Meta, Netflix",
            &[
                "KYC Score ≥ 75",
                "KES 50,000+ transaction history",
                "10+ processed receipts over 60 days",
                "Alternative to SEC verification",
            ],
            "Trade NASDAQ without US-based verification",
        ),
        goal(
            "lse",
            "LSE - London Stock Exchange",
            (75.0, 75_000.0),
            "European market access - BP, HSBC, Unilever",
            &[
                "KYC Score ≥ 75",
                "KES 75,000+ transaction history",
                "10+ processed receipts over 60 days",
                "FCA-equivalent verification",
            ],
            "Access European markets with receipt-based KYC",
        ),
        goal(
            "crypto",
            "Global Crypto Exchanges",
            (70.0, 30_000.0),
            "Trade cryptocurrency - Bitcoin, Ethereum, stablecoins",
            &[
                "KYC Score ≥ 70",
                "KES 30,000+ transaction history",
                "8+ processed receipts over 30 days",
                "Faster than traditional crypto KYC",
            ],
            "Bypass lengthy crypto exchange verification processes",
        ),
        goal(
            "forex",
            "Forex Trading Platforms",
            (70.0, 40_000.0),
            "Foreign exchange trading - USD, EUR, GBP pairs",
            &[
                "KYC Score ≥ 70",
                "KES 40,000+ transaction history",
                "8+ processed receipts over 45 days",
                "International broker access",
            ],
            "Access global forex markets with simplified verification",
        ),
        goal(
            "nse",
            "NSE - Nairobi Securities Exchange",
            (65.0, 25_000.0),
            "Local Kenyan stocks - Safaricom, KCB, Equity Bank",
            &[
                "KYC Score ≥ 65",
                "KES 25,000+ transaction history",
                "8+ processed receipts over 30 days",
                "Simplified local verification",
            ],
            "Start with local markets before going global",
        ),
    ]
}

/// `complete_at` marks the milestone done; `target` is the value the progress bar fills to.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct Milestone {
    pub complete_at: f64,
    pub target: f64,
}

impl Milestone {
    pub const fn new(complete_at: f64, target: f64) -> Self {
        Self {
            complete_at,
            target,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ChecklistThresholds {
    pub receipts_uploaded: Milestone,
    pub receipts_processed: Milestone,
    pub spending: Milestone,
    pub diversity: Milestone,
    pub consistency: Milestone,
}

impl Default for ChecklistThresholds {
    fn default() -> Self {
        Self {
            receipts_uploaded: Milestone::new(5.0, 10.0),
            receipts_processed: Milestone::new(5.0, 10.0),
            spending: Milestone::new(50_000.0, 100_000.0),
            diversity: Milestone::new(3.0, 5.0),
            consistency: Milestone::new(60.0, 90.0),
        }
    }
}

impl ChecklistThresholds {
    fn named(&self) -> [(&'static str, Milestone); 5] {
        [
            ("receipts_uploaded", self.receipts_uploaded),
            ("receipts_processed", self.receipts_processed),
            ("spending", self.spending),
            ("diversity", self.diversity),
            ("consistency", self.consistency),
        ]
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct VerificationThresholds {
    /// Score at which a user counts as verified.
    pub threshold: f64,
    /// Score at which a user is under review rather than pending.
    pub review_threshold: f64,
}

impl Default for VerificationThresholds {
    fn default() -> Self {
        Self {
            threshold: 75.0,
            review_threshold: 60.0,
        }
    }
}

impl KycConfig {
    pub fn validate(&self) -> Result<(), KycError> {
        validate_catalog(&self.catalog)?;

        for (name, milestone) in self.checklist.named() {
            if !milestone.complete_at.is_finite() || milestone.complete_at < 0.0 {
                return Err(KycError::ConfigParse(format!(
                    "checklist.{name}.complete_at must be a non-negative number"
                )));
            }
            if !milestone.target.is_finite() || milestone.target <= 0.0 {
                return Err(KycError::ConfigParse(format!(
                    "checklist.{name}.target must be greater than 0"
                )));
            }
        }

        let verification = &self.verification;
        for (name, value) in [
            ("threshold", verification.threshold),
            ("review_threshold", verification.review_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(KycError::ConfigParse(format!(
                    "verification.{name} must be between 0 and 100"
                )));
            }
        }
        if verification.review_threshold > verification.threshold {
            return Err(KycError::ConfigParse(format!(
                "verification.review_threshold ({}) cannot exceed verification.threshold ({})",
                verification.review_threshold, verification.threshold
            )));
        }

        Ok(())
    }
}

fn validate_catalog(catalog: &GoalCatalog) -> Result<(), KycError> {
    if catalog.goals.is_empty() {
        return Err(KycError::InvalidCatalog(
            "catalog.goals must contain at least one goal".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for goal in &catalog.goals {
        let id = goal.id.trim();
        if id.is_empty() {
            return Err(KycError::InvalidCatalog(
                "goal ids must be non-empty".to_string(),
            ));
        }
        if !seen.insert(id) {
            return Err(KycError::InvalidCatalog(format!("duplicate goal id: {id}")));
        }
        if goal.min_score.is_nan() || goal.min_score <= 0.0 || goal.min_score > 100.0 {
            return Err(KycError::InvalidCatalog(format!(
                "goal '{id}' min_score must be in (0, 100] (found {})",
                goal.min_score
            )));
        }
        if !goal.min_amount.is_finite() || goal.min_amount < 0.0 {
            return Err(KycError::InvalidCatalog(format!(
                "goal '{id}' min_amount must be a non-negative number"
            )));
        }
    }

    if catalog.receipt_tiers.is_empty() {
        return Err(KycError::InvalidCatalog(
            "catalog.receipt_tiers must contain at least one tier".to_string(),
        ));
    }
    if let Some(tier) = catalog
        .receipt_tiers
        .iter()
        .find(|tier| !(0.0..=100.0).contains(&tier.min_score))
    {
        return Err(KycError::InvalidCatalog(format!(
            "receipt tier min_score must be between 0 and 100 (found {})",
            tier.min_score
        )));
    }
    if !catalog
        .receipt_tiers
        .iter()
        .any(|tier| tier.min_score == 0.0)
    {
        return Err(KycError::InvalidCatalog(
            "catalog.receipt_tiers must include a floor tier with min_score = 0".to_string(),
        ));
    }

    Ok(())
}
