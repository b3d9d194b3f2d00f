use crate::Result;
use crate::browser::BrowserPage;
use crate::crawler::{JobCrawler, JobFieldExtractor, JobListPaginatedCrawler};
use crate::utils::{CancelToken, country_slug, normalize_job_url};
use scraper::{ElementRef, Html, Selector};

const JOB_CARD_SELECTOR: &str = "a.link-card";
const TITLE_SELECTOR: &str = "h2";
const COMPANY_SELECTOR: &str = "h3";
const LOCATION_ICON_ALT: &str = "geo-alt icon";
const JOB_TYPE_ICON_ALT: &str = "briefcase icon";
const DESCRIPTION_SELECTOR: &str = ".break-words";
const POSTED_TIME_SELECTOR: &str = ".text-sm:last-child";
// 비활성 버튼은 text-gray-400이 붙으므로 선택되지 않는다
const NEXT_BUTTON_SELECTOR: &str = "a.rounded-e-md:not(.text-gray-400)";

#[derive(Debug, Clone)]
pub struct GrabJobsCrawlConfig {
    /// 국가별 목록 페이지, 예: https://grabjobs.co/canada/jobs-in-canada
    pub listing_url: String,
    pub max_pages: usize,
    pub delay_bounds: (u64, u64),
}

impl Default for GrabJobsCrawlConfig {
    fn default() -> Self {
        Self {
            listing_url: "https://grabjobs.co/canada/jobs-in-canada".to_string(),
            max_pages: 50,
            delay_bounds: (4000, 6000),
        }
    }
}

pub struct GrabJobsClient {
    config: GrabJobsCrawlConfig,
    cancel: CancelToken,
}

impl GrabJobsClient {
    pub fn new(config: GrabJobsCrawlConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::default(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

impl Default for GrabJobsClient {
    fn default() -> Self {
        Self::new(GrabJobsCrawlConfig::default())
    }
}

impl JobCrawler for GrabJobsClient {
    fn output_slug(&self) -> String {
        country_slug(&self.config.listing_url).unwrap_or_else(|| "grabjobs".to_string())
    }

    fn delay_bounds(&self) -> (u64, u64) {
        self.config.delay_bounds
    }

    fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn wait_for_list_page_load(&self, page: &dyn BrowserPage) -> Result<()> {
        page.wait_for(JOB_CARD_SELECTOR)?;
        self.pause();
        Ok(())
    }
}

impl JobFieldExtractor for GrabJobsClient {
    fn extract_title(&self, fragment: &Html) -> Option<String> {
        first_text(fragment, TITLE_SELECTOR)
    }

    fn extract_company(&self, fragment: &Html) -> Option<String> {
        first_text(fragment, COMPANY_SELECTOR)
    }

    fn extract_location(&self, fragment: &Html) -> Option<String> {
        icon_label_text(fragment, LOCATION_ICON_ALT)
    }

    fn extract_job_type(&self, fragment: &Html) -> Option<String> {
        icon_label_text(fragment, JOB_TYPE_ICON_ALT)
    }

    fn extract_description(&self, fragment: &Html) -> Option<String> {
        first_text(fragment, DESCRIPTION_SELECTOR)
    }

    fn extract_posted_time(&self, fragment: &Html) -> Option<String> {
        first_text(fragment, POSTED_TIME_SELECTOR)
    }

    fn extract_job_url(&self, fragment: &Html) -> Option<String> {
        let selector = Selector::parse(JOB_CARD_SELECTOR).ok()?;
        let href = fragment.select(&selector).next()?.value().attr("href")?;
        Some(normalize_job_url(href))
    }
}

impl JobListPaginatedCrawler for GrabJobsClient {
    fn listing_url(&self) -> String {
        self.config.listing_url.clone()
    }

    fn job_card_selector(&self) -> &str {
        JOB_CARD_SELECTOR
    }

    fn next_button_selector(&self) -> &str {
        NEXT_BUTTON_SELECTOR
    }

    fn max_pages(&self) -> usize {
        self.config.max_pages
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

/// 아이콘 이미지는 텍스트가 없으므로 부모 노드의 텍스트를 읽는다
fn icon_label_text(fragment: &Html, icon_alt: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"img[alt="{}"]"#, icon_alt)).ok()?;
    let icon = fragment.select(&selector).next()?;
    let parent = icon.parent().and_then(ElementRef::wrap)?;
    let text = parent.text().collect::<String>().trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobRecord;
    use crate::testing::{MockPage, MockSession};

    fn zero_delay_client() -> GrabJobsClient {
        GrabJobsClient::new(GrabJobsCrawlConfig {
            delay_bounds: (0, 0),
            ..GrabJobsCrawlConfig::default()
        })
    }

    fn card(title: &str) -> String {
        format!(
            r#"<a class="link-card" href="https://grabjobs.co/canada/job/{title}">
                <h2>{title}</h2>
                <h3>Maple Corp</h3>
                <div><img alt="geo-alt icon" src="geo.svg">Toronto, ON</div>
                <div><img alt="briefcase icon" src="case.svg">Full-time</div>
                <p class="break-words">Ship maple syrup pipelines.</p>
                <div><span class="text-sm">meta</span><span class="text-sm">4 days ago</span></div>
            </a>"#
        )
    }

    fn page_html(cards: &[String], with_next: bool) -> String {
        let mut html = String::from("<html><body>");
        for card in cards {
            html.push_str(card);
        }
        if with_next {
            html.push_str(r#"<a class="rounded-e-md" href="?p=2">Next</a>"#);
        } else {
            // 마지막 페이지의 비활성 버튼
            html.push_str(r##"<a class="rounded-e-md text-gray-400" href="#">Next</a>"##);
        }
        html.push_str("</body></html>");
        html
    }

    #[test]
    fn extracts_grabjobs_card_fields() {
        let client = zero_delay_client();
        let record = client.build_record(&card("barista"), "canada").unwrap();

        assert_eq!(record.title, "barista");
        assert_eq!(record.company, "Maple Corp");
        assert_eq!(record.location, "Toronto, ON");
        assert_eq!(record.job_type, "Full-time");
        assert_eq!(record.description, "Ship maple syrup pipelines.");
        assert_eq!(record.posted_time, "4 days ago");
        assert_eq!(record.job_url, "https://grabjobs.co/canada/job/barista");
        assert_eq!(record.source, "canada");
    }

    #[test]
    fn output_slug_comes_from_listing_url_country() {
        assert_eq!(zero_delay_client().output_slug(), "canada");

        let client = GrabJobsClient::new(GrabJobsCrawlConfig {
            listing_url: "https://grabjobs.co/singapore/jobs-in-singapore".to_string(),
            ..GrabJobsCrawlConfig::default()
        });
        assert_eq!(client.output_slug(), "singapore");
    }

    #[test]
    fn walks_pages_until_next_button_disabled() {
        let frames = vec![
            page_html(&[card("first-a"), card("first-b")], true),
            page_html(&[card("second-a")], false),
        ];
        let session = MockSession::new().with_page(
            "https://grabjobs.co/canada/jobs-in-canada",
            MockPage::with_frames(frames),
        );
        let client = zero_delay_client();

        let mut pages: Vec<Vec<String>> = Vec::new();
        let total = client
            .crawl_paginated(&session, &mut |records: &[JobRecord]| {
                pages.push(records.iter().map(|r| r.title.clone()).collect());
            })
            .unwrap();

        assert_eq!(total, 3);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], ["first-a", "first-b"]);
        assert_eq!(pages[1], ["second-a"]);
    }

    #[test]
    fn stops_when_a_page_has_no_cards() {
        let session = MockSession::new().with_page(
            "https://grabjobs.co/canada/jobs-in-canada",
            MockPage::with_content(page_html(&[], true)),
        );
        let client = zero_delay_client();

        let mut calls = 0;
        let total = client
            .crawl_paginated(&session, &mut |_records: &[JobRecord]| calls += 1)
            .unwrap();

        assert_eq!(total, 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn respects_max_pages() {
        // 항상 다음 버튼이 있는 페이지: 예산만큼만 돈다
        let session = MockSession::new().with_page(
            "https://grabjobs.co/canada/jobs-in-canada",
            MockPage::with_content(page_html(&[card("loop")], true)),
        );
        let client = GrabJobsClient::new(GrabJobsCrawlConfig {
            max_pages: 3,
            delay_bounds: (0, 0),
            ..GrabJobsCrawlConfig::default()
        });

        let mut calls = 0;
        let total = client
            .crawl_paginated(&session, &mut |_records: &[JobRecord]| calls += 1)
            .unwrap();

        assert_eq!(calls, 3);
        assert_eq!(total, 3);
    }
}
