use crate::types::config::{Goal, ReceiptTier};
use crate::types::progress::{Checklist, KycStatus, RankedGoal};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct GoalRanking {
    pub catalog_version: u32,
    pub goals: Vec<RankedGoal>,
}

impl GoalRanking {
    pub fn eligible_count(&self) -> usize {
        self.goals
            .iter()
            .filter(|ranked| ranked.progress.eligible)
            .count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionReport {
    pub generated_at: String,
    pub catalog_version: u32,
    pub catalog_digest: String,
    pub score: f64,
    pub status: KycStatus,
    pub next_step: String,
    pub checklist: Checklist,
    pub goals: Vec<RankedGoal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub version: u32,
    pub digest: String,
    pub goals: Vec<Goal>,
    pub receipt_tiers: Vec<ReceiptTier>,
}
