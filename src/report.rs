use std::fmt::Write;

use chrono::NaiveDate;

use crate::cases::CaseOutcome;
use crate::models::{ChannelSnapshot, Eligibility, MetricScore, PerformanceResult};
use crate::scorer::{self, Band};

fn metric_line(output: &mut String, name: &str, score: &MetricScore, band: Band, percent: bool) {
    let _ = if percent {
        writeln!(
            output,
            "- {}: {:.2}% (expected {:.2}%..{:.2}%) -> {}",
            name,
            score.value * 100.0,
            band.min * 100.0,
            band.max * 100.0,
            score.level.label()
        )
    } else {
        writeln!(
            output,
            "- {}: {:.0} (expected {:.0}..{:.0}) -> {}",
            name,
            score.value,
            band.min,
            band.max,
            score.level.label()
        )
    };
}

pub fn build_report(
    snapshot: &ChannelSnapshot,
    as_of: NaiveDate,
    eligibility: Eligibility,
    result: Option<&PerformanceResult>,
    case: Option<&CaseOutcome<'_>>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Channel Performance Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} subscribers, {} recent videos, as of {})",
        snapshot.title,
        snapshot.subscriber_count,
        snapshot.videos.len(),
        as_of
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Upload Recency");
    let _ = writeln!(
        output,
        "- {} uploads within 3 months, {} within 1 month",
        eligibility.in_three_months, eligibility.in_one_month
    );
    if eligibility.eligible {
        let _ = writeln!(output, "- Channel qualifies for analysis.");
    } else {
        let _ = writeln!(
            output,
            "- Channel does not qualify: needs at least 5 uploads within 3 months and 1 within 1 month."
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Performance Metrics");

    let result = match result {
        Some(result) => result,
        None => {
            let _ = writeln!(output, "No recent videos to score.");
            return output;
        }
    };

    metric_line(
        &mut output,
        "Mean adjusted views",
        &result.views,
        scorer::view_thresholds(snapshot.subscriber_count),
        false,
    );
    metric_line(
        &mut output,
        "Like ratio",
        &result.likes,
        scorer::like_band(snapshot.subscriber_count),
        true,
    );
    metric_line(
        &mut output,
        "Comment ratio",
        &result.comments,
        scorer::comment_band(snapshot.subscriber_count),
        true,
    );
    let _ = writeln!(output, "- Case identifier: {}", result.case_id());

    let case = match case {
        Some(case) => case,
        None => return output,
    };

    let _ = writeln!(output);
    match case {
        CaseOutcome::Matched(case) => {
            let _ = writeln!(output, "## Analysis: Case {}", case.case_id);
            let _ = writeln!(output, "{}", case.analysis.interpretation);

            if let Some(detail) = &case.analysis.detailed_analysis {
                let _ = writeln!(output);
                let _ = writeln!(output, "- Views: {}", detail.views_analysis);
                let _ = writeln!(output, "- Likes: {}", detail.likes_analysis);
                let _ = writeln!(output, "- Comments: {}", detail.comments_analysis);
            }

            if !case.analysis.causes.is_empty() {
                let _ = writeln!(output);
                let _ = writeln!(output, "### Likely Causes");
                for cause in &case.analysis.causes {
                    let _ = writeln!(output, "- {}: {}", cause.title, cause.description);
                }
            }

            if !case.recommendations.strategy.is_empty() {
                let _ = writeln!(output);
                let _ = writeln!(output, "### Recommended Strategies");
                for strategy in &case.recommendations.strategy {
                    let _ = writeln!(output, "- {}", strategy.title);
                    for action in &strategy.actions {
                        let _ = writeln!(output, "  - {}", action);
                    }
                }
            }
        }
        CaseOutcome::Unclassified { case_id } => {
            let _ = writeln!(output, "## Analysis");
            let _ = writeln!(
                output,
                "No authored case covers identifier {}; review this channel manually.",
                case_id
            );
        }
    }

    output
}
