use crate::projector::checklist::fmt_amount;
use crate::types::progress::{Checklist, RankedGoal};
use crate::types::report::{CatalogSummary, GoalRanking, ProjectionReport};

/// Whole percent, rounded down so an unmet goal never shows as 100%.
pub fn fmt_percent(value: f64) -> String {
    format!("{:.0}%", value.floor())
}

fn receipts_label(count: u32) -> String {
    if count == 1 {
        "1 receipt".to_string()
    } else {
        format!("{count} receipts")
    }
}

/// Score points still missing, rounded up.
pub fn points_label(points: f64) -> String {
    let points = points.ceil();
    if points == 1.0 {
        "1 point".to_string()
    } else {
        format!("{points:.0} points")
    }
}

fn push_goals(output: &mut String, goals: &[RankedGoal]) {
    if goals.is_empty() {
        output.push_str("- none\n");
        return;
    }
    for ranked in goals {
        let progress = &ranked.progress;
        output.push_str(&format!(
            "- {} `{}`: {}{}\n",
            ranked.goal.name,
            ranked.goal.id,
            fmt_percent(progress.overall),
            if progress.eligible { " [eligible]" } else { "" }
        ));
        output.push_str(&format!(
            "  - score {} | spending {} | receipts {} (needs {})\n",
            fmt_percent(progress.score_progress),
            fmt_percent(progress.spending_progress),
            fmt_percent(progress.receipt_progress),
            progress.receipts_needed
        ));
        let shortfall = &ranked.shortfall;
        if !shortfall.is_met() {
            let mut missing = Vec::new();
            if shortfall.score_points > 0.0 {
                missing.push(points_label(shortfall.score_points));
            }
            if shortfall.amount > 0.0 {
                missing.push(format!("KES {}", fmt_amount(shortfall.amount)));
            }
            if shortfall.receipts > 0 {
                missing.push(receipts_label(shortfall.receipts));
            }
            output.push_str(&format!("  - still needed: {}\n", missing.join(", ")));
        }
    }
}

fn push_checklist(output: &mut String, checklist: &Checklist) {
    output.push_str(&format!(
        "Overall progress: {} / {} completed ({})\n\n",
        checklist.completed_count,
        checklist.total_count,
        fmt_percent(checklist.percent())
    ));
    for item in &checklist.items {
        output.push_str(&format!(
            "- [{}] {}",
            if item.completed { "x" } else { " " },
            item.title
        ));
        if let (Some(current), Some(target), Some(fill)) = (item.current, item.target, item.fill())
        {
            output.push_str(&format!(
                " ({} / {}, {})",
                fmt_amount(current),
                fmt_amount(target),
                fmt_percent(fill)
            ));
        }
        output.push('\n');
        if !item.description.is_empty() {
            output.push_str(&format!("  {}\n", item.description));
        }
    }
}

pub fn ranking_to_markdown(ranking: &GoalRanking) -> String {
    let mut output = String::new();
    output.push_str("# Investment Goals\n\n");
    output.push_str(&format!(
        "Catalog v{} - eligible for {} of {}\n\n",
        ranking.catalog_version,
        ranking.eligible_count(),
        ranking.goals.len()
    ));
    push_goals(&mut output, &ranking.goals);
    output
}

pub fn checklist_to_markdown(checklist: &Checklist) -> String {
    let mut output = String::new();
    output.push_str("# Verification Progress\n\n");
    push_checklist(&mut output, checklist);
    output
}

pub fn report_to_markdown(report: &ProjectionReport) -> String {
    let mut output = String::new();
    output.push_str("# KYC Progress Report\n\n");
    output.push_str(&format!(
        "Score: {:.1} ({})\n\n",
        report.score,
        report.status.as_str()
    ));
    output.push_str(&format!("Next step: {}\n\n", report.next_step));

    output.push_str("## Verification Checklist\n\n");
    push_checklist(&mut output, &report.checklist);
    output.push('\n');

    output.push_str("## Investment Goals\n\n");
    push_goals(&mut output, &report.goals);
    output.push_str(&format!(
        "\nCatalog v{} ({})\n",
        report.catalog_version, report.catalog_digest
    ));
    output
}

pub fn catalog_to_markdown(summary: &CatalogSummary) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Goal Catalog v{}\n\n", summary.version));
    output.push_str(&format!("Digest: {}\n\n", summary.digest));

    output.push_str("## Goals\n\n");
    for goal in &summary.goals {
        output.push_str(&format!(
            "- {} `{}`: score >= {}, KES {}+\n",
            goal.name,
            goal.id,
            fmt_amount(goal.min_score),
            fmt_amount(goal.min_amount)
        ));
        for requirement in &goal.requirements {
            output.push_str(&format!("  - {requirement}\n"));
        }
    }

    output.push_str("\n## Receipt Tiers\n\n");
    let mut tiers = summary.receipt_tiers.clone();
    tiers.sort_by(|a, b| b.min_score.total_cmp(&a.min_score));
    for tier in &tiers {
        output.push_str(&format!(
            "- score >= {}: {}\n",
            fmt_amount(tier.min_score),
            receipts_label(tier.receipts)
        ));
    }
    output
}
