use crate::crawler::{
    DetailCrawler, JobCrawler, JobFieldExtractor, JobListInfiniteScrollCrawler, MissionDiscoverer,
    MissionProcessor,
};
use crate::models::Mission;
use crate::utils::{CancelToken, normalize_job_url};
use scraper::{Html, Selector};

const JOB_CARD_SELECTOR: &str = r#"[data-testid="JobCard"]"#;
const TITLE_SELECTOR: &str = r#"[data-testid="jobTitle"]"#;
const COMPANY_SELECTOR: &str = r#"[data-testid="company"]"#;
const LOCATION_SELECTOR: &str = r#"[data-testid="jobDetailLocation"]"#;
const POSTED_TIME_SELECTOR: &str = r#"[data-testid="jobDetailDateRecency"]"#;
const END_SENTINEL_SELECTOR: &str =
    r#"button[data-testid="svx-no-more-results-disabled-button"]"#;
const CATEGORY_LINK_SELECTOR: &str =
    "div.browse-jobs-list__list ul.item-list--browse-jobs--job-titles li a";
const SUB_CATEGORY_LINK_SELECTOR: &str = "div.browse-jobs-list__list ul li a";

#[derive(Debug, Clone)]
pub struct MonsterCrawlConfig {
    pub max_scrolls: usize,
    /// 레코드마다 상세 탭을 열어 내용을 붙일지 여부
    pub fetch_details: bool,
    pub delay_bounds: (u64, u64),
}

impl Default for MonsterCrawlConfig {
    fn default() -> Self {
        Self {
            max_scrolls: 50,
            fetch_details: true,
            delay_bounds: (2000, 4000),
        }
    }
}

pub struct MonsterClient {
    base_url: String,
    config: MonsterCrawlConfig,
    cancel: CancelToken,
}

impl MonsterClient {
    pub fn new(config: MonsterCrawlConfig) -> Self {
        Self {
            base_url: "https://www.monster.ca".to_string(),
            config,
            cancel: CancelToken::default(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl Default for MonsterClient {
    fn default() -> Self {
        Self::new(MonsterCrawlConfig::default())
    }
}

impl JobCrawler for MonsterClient {
    fn output_slug(&self) -> String {
        "monster_ca".to_string()
    }

    fn delay_bounds(&self) -> (u64, u64) {
        self.config.delay_bounds
    }

    fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
}

impl MissionDiscoverer for MonsterClient {
    fn browse_url(&self) -> String {
        format!("{}/jobs", self.base_url)
    }

    fn parse_category_links(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(CATEGORY_LINK_SELECTOR).unwrap();

        document
            .select(&selector)
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter(|href| !href.is_empty())
            .map(|href| format!("{}{}", self.base_url, href))
            .collect()
    }

    fn parse_missions(&self, html: &str) -> Vec<Mission> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(SUB_CATEGORY_LINK_SELECTOR).unwrap();

        document
            .select(&selector)
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                if href.is_empty() {
                    return None;
                }
                let label = anchor.text().collect::<String>().trim().to_string();
                Some(Mission::new(label, href))
            })
            .collect()
    }
}

impl JobListInfiniteScrollCrawler for MonsterClient {
    fn end_sentinel_selector(&self) -> &str {
        END_SENTINEL_SELECTOR
    }
}

impl JobFieldExtractor for MonsterClient {
    fn extract_title(&self, fragment: &Html) -> Option<String> {
        first_text(fragment, TITLE_SELECTOR)
    }

    fn extract_company(&self, fragment: &Html) -> Option<String> {
        first_text(fragment, COMPANY_SELECTOR)
    }

    fn extract_location(&self, fragment: &Html) -> Option<String> {
        first_text(fragment, LOCATION_SELECTOR)
    }

    fn extract_posted_time(&self, fragment: &Html) -> Option<String> {
        first_text(fragment, POSTED_TIME_SELECTOR)
    }

    fn extract_job_url(&self, fragment: &Html) -> Option<String> {
        let selector = Selector::parse(TITLE_SELECTOR).ok()?;
        let href = fragment.select(&selector).next()?.value().attr("href")?;
        Some(normalize_job_url(href))
    }
}

impl DetailCrawler for MonsterClient {}

impl MissionProcessor for MonsterClient {
    fn job_card_selector(&self) -> &str {
        JOB_CARD_SELECTOR
    }

    fn max_scrolls(&self) -> usize {
        self.config.max_scrolls
    }

    fn fetch_details(&self) -> bool {
        self.config.fetch_details
    }
}

fn first_text(fragment: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let text = fragment
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    if text.is_empty() { None } else { Some(text) }
}
