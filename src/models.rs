use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 하위 카테고리 하나에 대한 크롤 단위
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    pub label: String,
    pub start_url: String,
}

impl Mission {
    pub fn new(label: impl Into<String>, start_url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start_url: start_url.into(),
        }
    }
}

/// 상세 페이지 수집 결과. 실패는 JSON에서 null로 직렬화된다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DetailContent {
    Content(String),
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub description: String,
    pub posted_time: String,
    pub job_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_content: Option<DetailContent>,
    pub source: String,
    pub scraped_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// 처리할 미션 개수 상한. 0이면 제한 없음
    pub mission_limit: usize,
    pub max_scrolls: usize,
    pub fetch_details: bool,
    pub headless: bool,
    pub sandbox: bool,
    pub window_size: (u32, u32),
    pub output_dir: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            mission_limit: 5,
            max_scrolls: 50,
            fetch_details: true,
            headless: false,
            sandbox: false,
            window_size: (920, 980),
            output_dir: PathBuf::from("data"),
        }
    }
}

impl CrawlConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mission_limit = std::env::var("CHILD_MISSION_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.mission_limit);

        let headless = std::env::var("CRAWLER_HEADLESS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(defaults.headless);

        let output_dir = std::env::var("CRAWLER_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| defaults.output_dir.clone());

        Self {
            mission_limit,
            headless,
            output_dir,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> JobRecord {
        JobRecord {
            title: "Backend Developer".to_string(),
            company: "Acme".to_string(),
            location: String::new(),
            job_type: String::new(),
            description: String::new(),
            posted_time: "2 days ago".to_string(),
            job_url: "https://www.monster.ca/job/1".to_string(),
            detail_content: None,
            source: "Software Engineer".to_string(),
            scraped_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn serializes_with_camel_case_keys_and_empty_defaults() {
        let json = serde_json::to_value(record()).unwrap();

        assert_eq!(json["title"], "Backend Developer");
        assert_eq!(json["postedTime"], "2 days ago");
        assert_eq!(json["jobUrl"], "https://www.monster.ca/job/1");
        // 누락 필드는 null이 아니라 빈 문자열로 남는다
        assert_eq!(json["location"], "");
        assert_eq!(json["jobType"], "");
        assert_eq!(json["description"], "");
    }

    #[test]
    fn detail_content_absent_when_never_fetched() {
        let json = serde_json::to_value(record()).unwrap();
        assert!(json.get("detailContent").is_none());
    }

    #[test]
    fn detail_content_null_when_fetch_failed() {
        let mut failed = record();
        failed.detail_content = Some(DetailContent::Failed);
        let json = serde_json::to_value(&failed).unwrap();
        assert!(json["detailContent"].is_null());

        let mut fetched = record();
        fetched.detail_content = Some(DetailContent::Content("<html></html>".to_string()));
        let json = serde_json::to_value(&fetched).unwrap();
        assert_eq!(json["detailContent"], "<html></html>");
    }

    #[test]
    fn round_trips_through_json() {
        let original = record();
        let json = serde_json::to_string(&original).unwrap();
        let parsed: JobRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
