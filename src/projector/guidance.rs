use super::checklist::fmt_amount;
use crate::types::config::{ChecklistThresholds, VerificationThresholds};
use crate::types::metrics::MetricSnapshot;
use crate::types::progress::KycStatus;

pub fn kyc_status(metrics: &MetricSnapshot, verification: &VerificationThresholds) -> KycStatus {
    let metrics = metrics.sanitized();
    if metrics.is_verified || metrics.score >= verification.threshold {
        KycStatus::Verified
    } else if metrics.score >= verification.review_threshold {
        KycStatus::UnderReview
    } else {
        KycStatus::Pending
    }
}

/// One-line hint on what the user should do next.
pub fn next_step(
    status: KycStatus,
    thresholds: &ChecklistThresholds,
    verification: &VerificationThresholds,
) -> String {
    match status {
        KycStatus::Verified => {
            "You're verified! Investment platforms and opportunities are now open to you."
                .to_string()
        }
        KycStatus::UnderReview => format!(
            "You're close! Upload more receipts to reach the {}-point verification threshold.",
            fmt_amount(verification.threshold)
        ),
        KycStatus::Pending => format!(
            "Continue uploading receipts regularly. Aim for at least {} receipts from {}+ different stores over {}+ days with KES {}+ total spending.",
            fmt_amount(thresholds.receipts_processed.target),
            fmt_amount(thresholds.diversity.complete_at),
            fmt_amount(thresholds.consistency.complete_at),
            fmt_amount(thresholds.spending.complete_at)
        ),
    }
}
