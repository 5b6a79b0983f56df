use chrono::{Months, NaiveDate};
use tracing::debug;

use crate::models::{Eligibility, VideoSample};

/// Minimum uploads within the last three calendar months.
const MIN_IN_THREE_MONTHS: usize = 5;
/// Minimum uploads within the last calendar month.
const MIN_IN_ONE_MONTH: usize = 1;

/// Upload-recency prefilter: a channel qualifies for analysis only when it
/// has been publishing recently enough for the score to mean anything.
///
/// Samples without a parseable upload date count toward neither window.
pub fn check(videos: &[VideoSample], as_of: NaiveDate) -> Eligibility {
    let one_month_ago = as_of - Months::new(1);
    let three_months_ago = as_of - Months::new(3);

    let in_three_months = videos
        .iter()
        .filter(|video| video.published_at.is_some_and(|date| date >= three_months_ago))
        .count();
    let in_one_month = videos
        .iter()
        .filter(|video| video.published_at.is_some_and(|date| date >= one_month_ago))
        .count();

    let eligible = in_three_months >= MIN_IN_THREE_MONTHS && in_one_month >= MIN_IN_ONE_MONTH;
    debug!(in_three_months, in_one_month, eligible, "eligibility checked");

    Eligibility {
        in_three_months,
        in_one_month,
        eligible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn upload(days_ago: i64) -> VideoSample {
        VideoSample {
            title: format!("upload {days_ago}d ago"),
            view_count: 100,
            like_count: 10,
            comment_count: 1,
            published_at: Some(as_of() - Duration::days(days_ago)),
        }
    }

    #[test]
    fn five_recent_and_one_fresh_qualifies() {
        // Only upload(2) is inside the one-calendar-month window
        // (2025-05-15 onward); the rest are older than 31 days.
        let videos = vec![upload(2), upload(35), upload(40), upload(60), upload(80)];
        let result = check(&videos, as_of());
        assert_eq!(result.in_three_months, 5);
        assert_eq!(result.in_one_month, 1);
        assert!(result.eligible);
    }

    #[test]
    fn every_upload_inside_the_month_counts() {
        let videos = vec![upload(2), upload(20), upload(40), upload(60), upload(80)];
        let result = check(&videos, as_of());
        // 2025-06-13 and 2025-05-26 both sit inside the window starting
        // 2025-05-15.
        assert_eq!(result.in_one_month, 2);
        assert_eq!(result.in_three_months, 5);
        assert!(result.eligible);
    }

    #[test]
    fn four_recent_is_not_enough() {
        let videos = vec![upload(2), upload(20), upload(40), upload(60)];
        let result = check(&videos, as_of());
        assert_eq!(result.in_three_months, 4);
        assert!(!result.eligible);
    }

    #[test]
    fn requires_at_least_one_upload_within_a_month() {
        let videos = vec![upload(40), upload(45), upload(50), upload(60), upload(80)];
        let result = check(&videos, as_of());
        assert_eq!(result.in_three_months, 5);
        assert_eq!(result.in_one_month, 0);
        assert!(!result.eligible);
    }

    #[test]
    fn window_bounds_are_calendar_months() {
        // as_of 2025-06-15: one month back is 2025-05-15, three months back
        // is 2025-03-15, both inclusive.
        let on_month_bound = VideoSample {
            published_at: NaiveDate::from_ymd_opt(2025, 5, 15),
            ..upload(0)
        };
        let before_month_bound = VideoSample {
            published_at: NaiveDate::from_ymd_opt(2025, 5, 14),
            ..upload(0)
        };
        let on_quarter_bound = VideoSample {
            published_at: NaiveDate::from_ymd_opt(2025, 3, 15),
            ..upload(0)
        };
        let before_quarter_bound = VideoSample {
            published_at: NaiveDate::from_ymd_opt(2025, 3, 14),
            ..upload(0)
        };

        let result = check(
            &[
                on_month_bound,
                before_month_bound,
                on_quarter_bound,
                before_quarter_bound,
            ],
            as_of(),
        );
        assert_eq!(result.in_one_month, 1);
        assert_eq!(result.in_three_months, 3);
    }

    #[test]
    fn undated_uploads_count_toward_neither_window() {
        let mut undated = upload(0);
        undated.published_at = None;
        let videos = vec![undated, upload(2), upload(5), upload(10), upload(15)];
        let result = check(&videos, as_of());
        assert_eq!(result.in_three_months, 4);
        assert_eq!(result.in_one_month, 4);
        assert!(!result.eligible);
    }
}
