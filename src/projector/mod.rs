pub mod checklist;
pub mod guidance;

use crate::error::Result;
use crate::types::config::{Goal, GoalCatalog, KycConfig};
use crate::types::metrics::MetricSnapshot;
use crate::types::progress::{Percent, ProgressResult, RankedGoal, Shortfall};
use crate::types::report::{CatalogSummary, GoalRanking, ProjectionReport};
use chrono::Utc;

pub use checklist::build_verification_checklist;

const FULL: Percent = 100.0;

/// Share of `required` covered by `current`, in [0, 100].
///
/// A zero requirement is already satisfied.
pub fn progress_ratio(current: f64, required: f64) -> Percent {
    if required.is_nan() || required <= 0.0 {
        return FULL;
    }
    (current / required * 100.0).clamp(0.0, FULL)
}

pub fn compute_goal_progress(
    metrics: &MetricSnapshot,
    goal: &Goal,
    catalog: &GoalCatalog,
) -> ProgressResult {
    let metrics = metrics.sanitized();
    let receipts_needed = catalog.receipts_needed(goal.min_score);

    let score_progress = progress_ratio(metrics.score, goal.min_score);
    let spending_progress = progress_ratio(metrics.total_spending, goal.min_amount);
    let receipt_progress = progress_ratio(
        f64::from(metrics.receipts_processed),
        f64::from(receipts_needed),
    );
    let overall = ((score_progress + spending_progress + receipt_progress) / 3.0).clamp(0.0, FULL);

    ProgressResult {
        score_progress,
        spending_progress,
        receipt_progress,
        overall,
        receipts_needed,
        eligible: overall >= FULL,
    }
}

pub fn shortfall(metrics: &MetricSnapshot, goal: &Goal, receipts_needed: u32) -> Shortfall {
    let metrics = metrics.sanitized();
    Shortfall {
        score_points: (goal.min_score - metrics.score).max(0.0),
        amount: (goal.min_amount - metrics.total_spending).max(0.0),
        receipts: receipts_needed.saturating_sub(metrics.receipts_processed),
    }
}

pub fn evaluate_goal(metrics: &MetricSnapshot, goal: &Goal, catalog: &GoalCatalog) -> RankedGoal {
    let progress = compute_goal_progress(metrics, goal, catalog);
    RankedGoal {
        goal: goal.clone(),
        progress,
        shortfall: shortfall(metrics, goal, progress.receipts_needed),
    }
}

/// Every catalog goal, closest to eligible first. Ties keep catalog order.
pub fn rank_goals(metrics: &MetricSnapshot, catalog: &GoalCatalog) -> Vec<RankedGoal> {
    let mut ranked = catalog
        .goals
        .iter()
        .map(|goal| evaluate_goal(metrics, goal, catalog))
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.progress.overall.total_cmp(&a.progress.overall));
    ranked
}

pub fn rank(metrics: &MetricSnapshot, catalog: &GoalCatalog) -> GoalRanking {
    GoalRanking {
        catalog_version: catalog.version,
        goals: rank_goals(metrics, catalog),
    }
}

/// Status, checklist and ranked goals for one snapshot.
pub fn project(metrics: &MetricSnapshot, config: &KycConfig) -> Result<ProjectionReport> {
    let status = guidance::kyc_status(metrics, &config.verification);
    Ok(ProjectionReport {
        generated_at: Utc::now().to_rfc3339(),
        catalog_version: config.catalog.version,
        catalog_digest: config.catalog.digest()?,
        score: metrics.sanitized().score,
        status,
        next_step: guidance::next_step(status, &config.checklist, &config.verification),
        checklist: build_verification_checklist(metrics, &config.checklist, &config.verification),
        goals: rank_goals(metrics, &config.catalog),
    })
}

pub fn summarize_catalog(catalog: &GoalCatalog) -> Result<CatalogSummary> {
    Ok(CatalogSummary {
        version: catalog.version,
        digest: catalog.digest()?,
        goals: catalog.goals.clone(),
        receipt_tiers: catalog.receipt_tiers.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(id: &str, min_score: f64, min_amount: f64) -> Goal {
        Goal {
            id: id.to_string(),
            name: id.to_uppercase(),
            min_score,
            min_amount,
            description: String::new(),
            requirements: Vec::new(),
            why: String::new(),
        }
    }

    fn strong_metrics() -> MetricSnapshot {
        MetricSnapshot {
            score: 80.0,
            total_spending: 60_000.0,
            receipts_processed: 12,
            receipts_uploaded: None,
            unique_companies: 4,
            date_range_days: 70,
            is_verified: true,
        }
    }

    fn assert_in_range(progress: &ProgressResult) {
        for value in [
            progress.score_progress,
            progress.spending_progress,
            progress.receipt_progress,
            progress.overall,
        ] {
            assert!((0.0..=100.0).contains(&value), "{value} out of range");
        }
    }

    #[test]
    fn fully_qualified_user_is_eligible() {
        let catalog = GoalCatalog::default();
        let progress = compute_goal_progress(&strong_metrics(), &goal("nyse", 75.0, 50_000.0), &catalog);

        assert_eq!(progress.score_progress, 100.0);
        assert_eq!(progress.spending_progress, 100.0);
        assert_eq!(progress.receipts_needed, 10);
        assert_eq!(progress.receipt_progress, 100.0);
        assert_eq!(progress.overall, 100.0);
        assert!(progress.eligible);
    }

    #[test]
    fn empty_history_makes_no_progress_on_spending_or_receipts() {
        let catalog = GoalCatalog::default();
        let metrics = MetricSnapshot {
            score: 40.0,
            ..MetricSnapshot::default()
        };

        for goal in &catalog.goals {
            let progress = compute_goal_progress(&metrics, goal, &catalog);
            assert_eq!(progress.spending_progress, 0.0);
            assert_eq!(progress.receipt_progress, 0.0);
            assert!(!progress.eligible);
            assert_in_range(&progress);
        }

        let zeroed = compute_goal_progress(
            &MetricSnapshot::default(),
            &goal("nyse", 75.0, 50_000.0),
            &catalog,
        );
        assert_eq!(zeroed.overall, 0.0);
    }

    #[test]
    fn partial_progress_is_averaged() {
        let catalog = GoalCatalog::default();
        let metrics = MetricSnapshot {
            score: 37.5,
            total_spending: 25_000.0,
            receipts_processed: 5,
            ..MetricSnapshot::default()
        };
        let progress = compute_goal_progress(&metrics, &goal("nyse", 75.0, 50_000.0), &catalog);
        assert_eq!(progress.score_progress, 50.0);
        assert_eq!(progress.spending_progress, 50.0);
        assert_eq!(progress.receipt_progress, 50.0);
        assert_eq!(progress.overall, 50.0);
        assert!(!progress.eligible);
    }

    #[test]
    fn zero_amount_goal_counts_spending_as_complete() {
        let catalog = GoalCatalog::default();
        let free = goal("free", 50.0, 0.0);
        for spending in [0.0, 10.0, 1_000_000.0] {
            let metrics = MetricSnapshot {
                total_spending: spending,
                ..MetricSnapshot::default()
            };
            let progress = compute_goal_progress(&metrics, &free, &catalog);
            assert_eq!(progress.spending_progress, 100.0);
        }
    }

    #[test]
    fn zero_receipt_tier_counts_receipts_as_complete() {
        let mut catalog = GoalCatalog::default();
        for tier in &mut catalog.receipt_tiers {
            tier.receipts = 0;
        }
        let progress = compute_goal_progress(
            &MetricSnapshot::default(),
            &goal("nyse", 75.0, 50_000.0),
            &catalog,
        );
        assert_eq!(progress.receipt_progress, 100.0);
    }

    #[test]
    fn progress_ratio_guards_zero_requirement() {
        assert_eq!(progress_ratio(0.0, 0.0), 100.0);
        assert_eq!(progress_ratio(5.0, -1.0), 100.0);
        assert_eq!(progress_ratio(5.0, 10.0), 50.0);
        assert_eq!(progress_ratio(50.0, 10.0), 100.0);
    }

    #[test]
    fn invalid_metrics_are_clamped_before_projection() {
        let catalog = GoalCatalog::default();
        let metrics = MetricSnapshot {
            score: f64::NAN,
            total_spending: -500.0,
            ..MetricSnapshot::default()
        };
        let progress = compute_goal_progress(&metrics, &goal("nyse", 75.0, 50_000.0), &catalog);
        assert_eq!(progress.score_progress, 0.0);
        assert_eq!(progress.spending_progress, 0.0);
        assert_in_range(&progress);
    }

    #[test]
    fn progress_is_monotonic_in_each_metric() {
        let catalog = GoalCatalog::default();
        let target = goal("lse", 75.0, 75_000.0);
        let base = MetricSnapshot {
            score: 30.0,
            total_spending: 10_000.0,
            receipts_processed: 2,
            ..MetricSnapshot::default()
        };
        let before = compute_goal_progress(&base, &target, &catalog);

        let mut prev_overall = before.overall;
        let mut prev_component = before.score_progress;
        for score in [40.0, 60.0, 75.0, 99.0] {
            let progress = compute_goal_progress(&MetricSnapshot { score, ..base }, &target, &catalog);
            assert!(progress.score_progress >= prev_component);
            assert!(progress.overall >= prev_overall);
            prev_component = progress.score_progress;
            prev_overall = progress.overall;
        }

        let mut prev_overall = before.overall;
        let mut prev_component = before.spending_progress;
        for total_spending in [20_000.0, 74_999.0, 75_000.0, 200_000.0] {
            let progress =
                compute_goal_progress(&MetricSnapshot { total_spending, ..base }, &target, &catalog);
            assert!(progress.spending_progress >= prev_component);
            assert!(progress.overall >= prev_overall);
            prev_component = progress.spending_progress;
            prev_overall = progress.overall;
        }

        let mut prev_overall = before.overall;
        let mut prev_component = before.receipt_progress;
        for receipts_processed in [3, 9, 10, 40] {
            let progress = compute_goal_progress(
                &MetricSnapshot {
                    receipts_processed,
                    ..base
                },
                &target,
                &catalog,
            );
            assert!(progress.receipt_progress >= prev_component);
            assert!(progress.overall >= prev_overall);
            prev_component = progress.receipt_progress;
            prev_overall = progress.overall;
        }
    }

    #[test]
    fn eligibility_matches_overall_threshold() {
        let catalog = GoalCatalog::default();
        let samples = [
            MetricSnapshot::default(),
            strong_metrics(),
            MetricSnapshot {
                score: 74.9,
                ..strong_metrics()
            },
            MetricSnapshot {
                receipts_processed: 9,
                ..strong_metrics()
            },
        ];
        for metrics in &samples {
            for goal in &catalog.goals {
                let progress = compute_goal_progress(metrics, goal, &catalog);
                assert_eq!(progress.eligible, progress.overall >= 100.0);
                assert_in_range(&progress);
            }
        }
    }

    #[test]
    fn repeated_evaluation_is_identical() {
        let catalog = GoalCatalog::default();
        let target = goal("crypto", 70.0, 30_000.0);
        let metrics = MetricSnapshot {
            score: 55.0,
            total_spending: 12_345.0,
            receipts_processed: 3,
            ..MetricSnapshot::default()
        };
        assert_eq!(
            compute_goal_progress(&metrics, &target, &catalog),
            compute_goal_progress(&metrics, &target, &catalog)
        );
    }

    #[test]
    fn rank_goals_orders_by_overall_then_catalog_order() {
        let catalog = GoalCatalog {
            goals: vec![
                goal("hard", 90.0, 200_000.0),
                goal("first_tie", 75.0, 50_000.0),
                goal("easy", 50.0, 10_000.0),
                goal("second_tie", 75.0, 50_000.0),
            ],
            ..GoalCatalog::default()
        };
        let metrics = MetricSnapshot {
            score: 50.0,
            total_spending: 10_000.0,
            receipts_processed: 8,
            ..MetricSnapshot::default()
        };

        let ids = rank_goals(&metrics, &catalog)
            .into_iter()
            .map(|ranked| ranked.goal.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["easy", "first_tie", "second_tie", "hard"]);
    }

    #[test]
    fn shortfall_reports_remaining_requirements() {
        let metrics = MetricSnapshot {
            score: 70.0,
            total_spending: 30_000.0,
            receipts_processed: 4,
            ..MetricSnapshot::default()
        };
        let remaining = shortfall(&metrics, &goal("nyse", 75.0, 50_000.0), 10);
        assert_eq!(remaining.score_points, 5.0);
        assert_eq!(remaining.amount, 20_000.0);
        assert_eq!(remaining.receipts, 6);
        assert!(!remaining.is_met());

        let met = shortfall(&strong_metrics(), &goal("nyse", 75.0, 50_000.0), 10);
        assert!(met.is_met());
    }

    #[test]
    fn project_combines_status_checklist_and_goals() {
        let config = KycConfig::default();
        let report = project(&strong_metrics(), &config).expect("projection should succeed");

        assert_eq!(report.status, crate::types::progress::KycStatus::Verified);
        assert_eq!(report.catalog_version, config.catalog.version);
        assert_eq!(report.catalog_digest.len(), 64);
        assert_eq!(report.checklist.total_count, 7);
        assert_eq!(report.goals.len(), config.catalog.goals.len());
        assert!(report
            .goals
            .windows(2)
            .all(|pair| pair[0].progress.overall >= pair[1].progress.overall));
    }
}
