use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::dates;
use crate::models::{MetricLevel, MetricScore, PerformanceResult, VideoSample};

/// Weight applied when a sample's upload date is missing or unparseable.
/// Equals the slowest-decay bucket, so such samples are treated as old.
pub const FALLBACK_TIME_WEIGHT: f64 = 14.0;

/// Recency discount buckets: inclusive upper bound in elapsed whole days,
/// paired with the weight T applied to that bucket. Anything past the last
/// bound falls through to `FALLBACK_TIME_WEIGHT`.
const TIME_WEIGHT_STEPS: &[(i64, f64)] = &[
    (13, 1.0),
    (20, 2.0),
    (27, 3.0),
    (34, 4.0),
    (62, 6.0),
    (90, 10.0),
];

/// Expected classification range for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

/// Mean adjusted views expected as a fraction of subscriber count, bucketed
/// by channel size. Each row is an exclusive subscriber-count upper bound.
const VIEW_BANDS: &[(u64, Band)] = &[
    (1_000, Band { min: 0.3, max: 0.5 }),
    (10_000, Band { min: 0.2, max: 0.4 }),
    (100_000, Band { min: 0.15, max: 0.3 }),
    (500_000, Band { min: 0.08, max: 0.2 }),
    (1_000_000, Band { min: 0.05, max: 0.15 }),
];
const VIEW_BAND_LARGEST: Band = Band { min: 0.02, max: 0.1 };

/// Expected likes-per-view ratio by channel size.
const LIKE_BANDS: &[(u64, Band)] = &[
    (1_000, Band { min: 0.05, max: 0.1 }),
    (10_000, Band { min: 0.04, max: 0.08 }),
    (100_000, Band { min: 0.03, max: 0.06 }),
    (500_000, Band { min: 0.02, max: 0.05 }),
    (1_000_000, Band { min: 0.015, max: 0.04 }),
];
const LIKE_BAND_LARGEST: Band = Band { min: 0.01, max: 0.03 };

/// Expected comments-per-view ratio by channel size.
const COMMENT_BANDS: &[(u64, Band)] = &[
    (1_000, Band { min: 0.005, max: 0.015 }),
    (10_000, Band { min: 0.004, max: 0.01 }),
    (100_000, Band { min: 0.003, max: 0.008 }),
    (500_000, Band { min: 0.002, max: 0.006 }),
    (1_000_000, Band { min: 0.002, max: 0.005 }),
];
const COMMENT_BAND_LARGEST: Band = Band { min: 0.001, max: 0.003 };

/// Recency weight T for a video published `elapsed_days` ago.
pub fn time_weight(elapsed_days: i64) -> f64 {
    let elapsed = elapsed_days.max(0);
    for &(upper, weight) in TIME_WEIGHT_STEPS {
        if elapsed <= upper {
            return weight;
        }
    }
    FALLBACK_TIME_WEIGHT
}

fn sample_time_weight(sample: &VideoSample, as_of: NaiveDate) -> f64 {
    match sample.published_at {
        Some(published) => time_weight(dates::elapsed_days(as_of, published)),
        None => {
            warn!(
                video = %sample.title,
                "no usable upload date, assuming oldest recency bucket"
            );
            FALLBACK_TIME_WEIGHT
        }
    }
}

/// Raw view count discounted for recency. Square-root dampening keeps fresh
/// uploads from being scaled down as hard as linear weighting would.
pub fn adjusted_views(view_count: u64, weight: f64) -> f64 {
    view_count as f64 / weight.sqrt()
}

/// Per-sample engagement ratio. A sample with zero views yields 0 so one bad
/// record cannot push a non-finite value into the batch mean.
fn engagement_ratio(count: u64, view_count: u64) -> f64 {
    if view_count == 0 {
        debug!(count, "sample has zero views, ratio counted as 0");
        0.0
    } else {
        count as f64 / view_count as f64
    }
}

fn band_for(subscriber_count: u64, steps: &[(u64, Band)], largest: Band) -> Band {
    for &(upper, band) in steps {
        if subscriber_count < upper {
            return band;
        }
    }
    largest
}

/// Expected mean-adjusted-views band as a fraction of subscriber count.
pub fn view_band(subscriber_count: u64) -> Band {
    band_for(subscriber_count, VIEW_BANDS, VIEW_BAND_LARGEST)
}

/// Expected likes-per-view band.
pub fn like_band(subscriber_count: u64) -> Band {
    band_for(subscriber_count, LIKE_BANDS, LIKE_BAND_LARGEST)
}

/// Expected comments-per-view band.
pub fn comment_band(subscriber_count: u64) -> Band {
    band_for(subscriber_count, COMMENT_BANDS, COMMENT_BAND_LARGEST)
}

/// Grades a value against its band. Values equal to either bound count as
/// Adequate.
pub fn classify(value: f64, band: Band) -> MetricLevel {
    if value < band.min {
        MetricLevel::Below
    } else if value > band.max {
        MetricLevel::Above
    } else {
        MetricLevel::Adequate
    }
}

/// The view band scaled into absolute view counts for a given channel size.
pub fn view_thresholds(subscriber_count: u64) -> Band {
    let fractions = view_band(subscriber_count);
    Band {
        min: fractions.min * subscriber_count as f64,
        max: fractions.max * subscriber_count as f64,
    }
}

/// Scores a channel's recent uploads against its subscriber-scaled bands.
///
/// `as_of` is the analysis date; it is injected rather than read from a
/// clock so identical inputs always produce identical results. Returns
/// `None` when there are no samples to average over.
pub fn score_channel(
    samples: &[VideoSample],
    subscriber_count: u64,
    as_of: NaiveDate,
) -> Option<PerformanceResult> {
    if samples.is_empty() {
        return None;
    }
    let n = samples.len() as f64;

    let mean_adjusted_views = samples
        .iter()
        .map(|sample| {
            let weight = sample_time_weight(sample, as_of);
            let adjusted = adjusted_views(sample.view_count, weight);
            debug!(
                video = %sample.title,
                raw_views = sample.view_count,
                weight,
                adjusted,
                "applied recency discount"
            );
            adjusted
        })
        .sum::<f64>()
        / n;

    let mean_like_ratio = samples
        .iter()
        .map(|sample| engagement_ratio(sample.like_count, sample.view_count))
        .sum::<f64>()
        / n;

    let mean_comment_ratio = samples
        .iter()
        .map(|sample| engagement_ratio(sample.comment_count, sample.view_count))
        .sum::<f64>()
        / n;

    let views_band = view_thresholds(subscriber_count);
    let likes_band = like_band(subscriber_count);
    let comments_band = comment_band(subscriber_count);

    let result = PerformanceResult {
        views: MetricScore {
            value: mean_adjusted_views,
            level: classify(mean_adjusted_views, views_band),
        },
        likes: MetricScore {
            value: mean_like_ratio,
            level: classify(mean_like_ratio, likes_band),
        },
        comments: MetricScore {
            value: mean_comment_ratio,
            level: classify(mean_comment_ratio, comments_band),
        },
    };

    debug!(
        case_id = %result.case_id(),
        views = result.views.value,
        like_ratio = result.likes.value,
        comment_ratio = result.comments.value,
        "channel scored"
    );

    Some(result)
}
