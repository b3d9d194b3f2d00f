use rand::Rng;
use regex::Regex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub fn sample_delay(min_ms: u64, max_ms: u64) -> Duration {
    let ms = if min_ms >= max_ms {
        min_ms
    } else {
        rand::rng().random_range(min_ms..=max_ms)
    };
    Duration::from_millis(ms)
}

pub fn random_delay(min_ms: u64, max_ms: u64) {
    let duration = sample_delay(min_ms, max_ms);
    if !duration.is_zero() {
        println!("{}ms 대기..", duration.as_millis());
        std::thread::sleep(duration);
    }
}

/// 프로토콜 생략 href(`//host/path`)를 https 절대 URL로 맞춘다
pub fn normalize_job_url(href: &str) -> String {
    if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        href.to_string()
    }
}

/// `https://grabjobs.co/canada/jobs-in-canada` → `canada`
pub fn country_slug(url: &str) -> Option<String> {
    let segment = url.split('/').nth(3)?;
    let re = Regex::new(r"[^a-z0-9]+").unwrap();
    let slug = re
        .replace_all(&segment.to_lowercase(), "_")
        .trim_matches('_')
        .to_string();
    if slug.is_empty() { None } else { Some(slug) }
}

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
