use crate::types::config::Goal;
use serde::Serialize;

pub type Percent = f64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressResult {
    pub score_progress: Percent,
    pub spending_progress: Percent,
    pub receipt_progress: Percent,
    pub overall: Percent,
    pub receipts_needed: u32,
    pub eligible: bool,
}

/// What is still missing before a goal's thresholds are met.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shortfall {
    pub score_points: f64,
    pub amount: f64,
    pub receipts: u32,
}

impl Shortfall {
    pub fn is_met(&self) -> bool {
        self.score_points <= 0.0 && self.amount <= 0.0 && self.receipts == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedGoal {
    pub goal: Goal,
    pub progress: ProgressResult,
    pub shortfall: Shortfall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
}

impl ChecklistItem {
    /// Fill level of the item's progress bar, when it has a numeric target.
    pub fn fill(&self) -> Option<Percent> {
        match (self.current, self.target) {
            (Some(current), Some(target)) if target > 0.0 => {
                Some((current / target * 100.0).clamp(0.0, 100.0))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checklist {
    pub items: Vec<ChecklistItem>,
    pub completed_count: usize,
    pub total_count: usize,
}

impl Checklist {
    pub fn new(items: Vec<ChecklistItem>) -> Self {
        let completed_count = items.iter().filter(|item| item.completed).count();
        let total_count = items.len();
        Self {
            items,
            completed_count,
            total_count,
        }
    }

    pub fn percent(&self) -> Percent {
        if self.total_count == 0 {
            return 0.0;
        }
        self.completed_count as f64 / self.total_count as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    Verified,
    UnderReview,
    Pending,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::Verified => "verified",
            KycStatus::UnderReview => "under_review",
            KycStatus::Pending => "pending",
        }
    }
}
