use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

use crate::dates;
use crate::models::{ChannelSnapshot, VideoSample};

/// Extracts a count from a collaborator-formatted string by keeping only the
/// digits, so "1,234", "5,230명" and "1234" all parse the same. `None` when
/// no digit survives.
pub fn parse_count(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn parse_count_or_zero(raw: &str, field: &str, video: &str) -> u64 {
    match parse_count(raw) {
        Some(count) => count,
        None => {
            warn!(video, field, raw, "unreadable count, treating as 0");
            0
        }
    }
}

// Wire shape of the channel-data collaborator's JSON snapshot.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotWire {
    title: String,
    subscriber_count: String,
    recent_videos: Vec<VideoWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoWire {
    title: String,
    published_at: Option<String>,
    statistics: StatisticsWire,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatisticsWire {
    view_count: String,
    like_count: String,
    comment_count: String,
}

/// Loads a channel snapshot in the collaborator's JSON wire format. Counts
/// arrive as formatted strings; per-video counts degrade to 0 when
/// unreadable, but a snapshot without a usable subscriber count is rejected.
pub fn load_snapshot_json(path: &Path) -> anyhow::Result<ChannelSnapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read channel snapshot {}", path.display()))?;
    let wire: SnapshotWire = serde_json::from_str(&raw)
        .with_context(|| format!("channel snapshot {} is not valid JSON", path.display()))?;

    let subscriber_count = parse_count(&wire.subscriber_count).with_context(|| {
        format!(
            "snapshot {} has no usable subscriber count ({:?})",
            path.display(),
            wire.subscriber_count
        )
    })?;

    let videos = wire
        .recent_videos
        .into_iter()
        .map(|video| {
            let published_at = video
                .published_at
                .as_deref()
                .and_then(dates::parse_long_date);
            VideoSample {
                view_count: parse_count_or_zero(&video.statistics.view_count, "views", &video.title),
                like_count: parse_count_or_zero(&video.statistics.like_count, "likes", &video.title),
                comment_count: parse_count_or_zero(
                    &video.statistics.comment_count,
                    "comments",
                    &video.title,
                ),
                published_at,
                title: video.title,
            }
        })
        .collect();

    Ok(ChannelSnapshot {
        title: wire.title,
        subscriber_count,
        videos,
    })
}

/// Loads video samples from a CSV file with columns
/// `title,view_count,like_count,comment_count,published_at`, where the date
/// uses the collaborator's localized long format.
pub fn load_videos_csv(path: &Path) -> anyhow::Result<Vec<VideoSample>> {
    #[derive(Deserialize)]
    struct CsvRow {
        title: String,
        view_count: u64,
        like_count: u64,
        comment_count: u64,
        published_at: String,
    }

    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open video CSV {}", path.display()))?;
    let mut videos = Vec::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result.with_context(|| format!("bad row in {}", path.display()))?;
        videos.push(VideoSample {
            published_at: dates::parse_long_date(&row.published_at),
            title: row.title,
            view_count: row.view_count,
            like_count: row.like_count,
            comment_count: row.comment_count,
        });
    }

    Ok(videos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    #[test]
    fn parse_count_strips_formatting() {
        assert_eq!(parse_count("1,234"), Some(1_234));
        assert_eq!(parse_count("5,230명"), Some(5_230));
        assert_eq!(parse_count("조회수 12,345회"), Some(12_345));
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count("비공개"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn loads_collaborator_json_snapshot() {
        let raw = r#"{
          "title": "데일리 브이로그",
          "subscriberCount": "5,230명",
          "recentVideos": [
            {
              "title": "첫 번째 영상",
              "publishedAt": "2025년 6월 10일",
              "statistics": {
                "viewCount": "1,000",
                "likeCount": "40",
                "commentCount": "5"
              }
            },
            {
              "title": "날짜 없는 영상",
              "publishedAt": null,
              "statistics": {
                "viewCount": "비공개",
                "likeCount": "3",
                "commentCount": "0"
              }
            }
          ]
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(raw.as_bytes()).unwrap();

        let snapshot = load_snapshot_json(file.path()).unwrap();
        assert_eq!(snapshot.title, "데일리 브이로그");
        assert_eq!(snapshot.subscriber_count, 5_230);
        assert_eq!(snapshot.videos.len(), 2);

        let first = &snapshot.videos[0];
        assert_eq!(first.view_count, 1_000);
        assert_eq!(first.like_count, 40);
        assert_eq!(first.published_at, NaiveDate::from_ymd_opt(2025, 6, 10));

        // Unreadable count and missing date both degrade instead of failing.
        let second = &snapshot.videos[1];
        assert_eq!(second.view_count, 0);
        assert_eq!(second.published_at, None);
    }

    #[test]
    fn rejects_snapshot_without_subscriber_count() {
        let raw = r#"{
          "title": "채널",
          "subscriberCount": "비공개",
          "recentVideos": []
        }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(raw.as_bytes()).unwrap();
        assert!(load_snapshot_json(file.path()).is_err());
    }

    #[test]
    fn loads_video_csv() {
        let raw = "title,view_count,like_count,comment_count,published_at\n\
                   영상 A,1000,40,5,2025년 6월 10일\n\
                   영상 B,200,8,1,알 수 없음\n";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(raw.as_bytes()).unwrap();

        let videos = load_videos_csv(file.path()).unwrap();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].view_count, 1_000);
        assert_eq!(videos[0].published_at, NaiveDate::from_ymd_opt(2025, 6, 10));
        assert_eq!(videos[1].published_at, None);
    }

    #[test]
    fn csv_with_bad_numeric_row_errors() {
        let raw = "title,view_count,like_count,comment_count,published_at\n\
                   영상 A,lots,40,5,2025년 6월 10일\n";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(raw.as_bytes()).unwrap();
        assert!(load_videos_csv(file.path()).is_err());
    }
}
