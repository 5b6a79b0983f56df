use chrono::NaiveDate;
use serde::Deserialize;

/// One recently published video, as supplied by the channel-data collaborator.
/// `published_at` is `None` when the upload date was missing or unparseable;
/// the scorer treats such samples as maximally aged.
#[derive(Debug, Clone)]
pub struct VideoSample {
    pub title: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub published_at: Option<NaiveDate>,
}

/// A channel's analysis input at a point in time.
#[derive(Debug, Clone)]
pub struct ChannelSnapshot {
    pub title: String,
    pub subscriber_count: u64,
    pub videos: Vec<VideoSample>,
}

/// Three-way performance grade for a single metric.
///
/// Serde names match the vocabulary used by the authored case table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum MetricLevel {
    #[serde(rename = "low")]
    Below,
    #[serde(rename = "medium")]
    Adequate,
    #[serde(rename = "high")]
    Above,
}

impl MetricLevel {
    /// Symbol used when composing a case identifier.
    pub fn symbol(self) -> char {
        match self {
            MetricLevel::Above => 'H',
            MetricLevel::Adequate => 'M',
            MetricLevel::Below => 'L',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricLevel::Above => "above range",
            MetricLevel::Adequate => "within range",
            MetricLevel::Below => "below range",
        }
    }
}

/// Computed value for one metric together with its grade.
#[derive(Debug, Clone, Copy)]
pub struct MetricScore {
    pub value: f64,
    pub level: MetricLevel,
}

/// The scorer's output: one score per metric, in the fixed order
/// views-vs-subscribers, likes-vs-views, comments-vs-views.
#[derive(Debug, Clone)]
pub struct PerformanceResult {
    pub views: MetricScore,
    pub likes: MetricScore,
    pub comments: MetricScore,
}

impl PerformanceResult {
    /// Three-symbol case identifier, one symbol per metric in fixed order.
    pub fn case_id(&self) -> String {
        [self.views.level, self.likes.level, self.comments.level]
            .iter()
            .map(|level| level.symbol())
            .collect()
    }
}

/// Result of the upload-recency prefilter.
#[derive(Debug, Clone, Copy)]
pub struct Eligibility {
    pub in_three_months: usize,
    pub in_one_month: usize,
    pub eligible: bool,
}
