use crate::types::config::{ChecklistThresholds, Milestone, VerificationThresholds};
use crate::types::metrics::MetricSnapshot;
use crate::types::progress::{Checklist, ChecklistItem};

fn measured_item(
    id: &str,
    title: &str,
    description: String,
    current: f64,
    milestone: Milestone,
) -> ChecklistItem {
    ChecklistItem {
        id: id.to_string(),
        title: title.to_string(),
        description,
        completed: current >= milestone.complete_at,
        current: Some(current),
        target: Some(milestone.target),
    }
}

pub(crate) fn fmt_amount(value: f64) -> String {
    let whole = value.round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Milestones of the verification journey, always in the same order.
pub fn build_verification_checklist(
    metrics: &MetricSnapshot,
    thresholds: &ChecklistThresholds,
    verification: &VerificationThresholds,
) -> Checklist {
    let metrics = metrics.sanitized();

    let items = vec![
        ChecklistItem {
            id: "account".to_string(),
            title: "Create Account".to_string(),
            description: "Register an account to start verification".to_string(),
            completed: true,
            current: None,
            target: None,
        },
        measured_item(
            "receipts",
            "Upload Receipts",
            format!(
                "Upload at least {} receipts for a good frequency score",
                fmt_amount(thresholds.receipts_uploaded.target)
            ),
            f64::from(metrics.receipts_uploaded()),
            thresholds.receipts_uploaded,
        ),
        measured_item(
            "processing",
            "Process Receipts",
            "Process your uploaded receipts to extract data".to_string(),
            f64::from(metrics.receipts_processed),
            thresholds.receipts_processed,
        ),
        measured_item(
            "spending",
            "Transaction History",
            format!(
                "KES {} for a good score, KES {} for the maximum",
                fmt_amount(thresholds.spending.complete_at),
                fmt_amount(thresholds.spending.target)
            ),
            metrics.total_spending,
            thresholds.spending,
        ),
        measured_item(
            "diversity",
            "Transaction Diversity",
            format!(
                "{}+ companies for a good score, {}+ for the maximum",
                fmt_amount(thresholds.diversity.complete_at),
                fmt_amount(thresholds.diversity.target)
            ),
            f64::from(metrics.unique_companies),
            thresholds.diversity,
        ),
        measured_item(
            "consistency",
            "Consistent Activity",
            format!(
                "{}+ days of activity for bonus points",
                fmt_amount(thresholds.consistency.complete_at)
            ),
            f64::from(metrics.date_range_days),
            thresholds.consistency,
        ),
        ChecklistItem {
            id: "verification".to_string(),
            title: "Get Verified".to_string(),
            description: format!(
                "Achieve a KYC score of {} or higher",
                fmt_amount(verification.threshold)
            ),
            completed: metrics.is_verified || metrics.score >= verification.threshold,
            current: None,
            target: None,
        },
    ];

    Checklist::new(items)
}
