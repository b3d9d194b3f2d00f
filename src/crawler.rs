use crate::Result;
use crate::browser::{BrowserPage, BrowserSession};
use crate::models::{DetailContent, JobRecord, Mission};
use crate::utils::{CancelToken, random_delay};
use chrono::Utc;
use scraper::{Html, Selector};

/// 크롤러 공통 동작. 사이트별 클라이언트가 구현한다.
pub trait JobCrawler {
    /// 출력 파일명에 쓰이는 식별자 (`{slug}_job_listings.json`)
    fn output_slug(&self) -> String;

    fn delay_bounds(&self) -> (u64, u64) {
        (2000, 4000)
    }

    fn scroll_script(&self) -> &str {
        "window.scrollBy(0, window.innerHeight);"
    }

    fn cancel_token(&self) -> CancelToken {
        CancelToken::default()
    }

    fn wait_for_list_page_load(&self, _page: &dyn BrowserPage) -> Result<()> {
        self.pause();
        Ok(())
    }

    fn pause(&self) {
        let (min_ms, max_ms) = self.delay_bounds();
        random_delay(min_ms, max_ms);
    }
}

/// 스크롤 종료 상태. 센티넬을 만나지 못하고 한도가 소진된 경우도
/// 실패가 아니라 현재 로딩된 목록으로 진행하는 degraded success다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    pub reached_end: bool,
    pub scrolls: usize,
}

pub trait JobListInfiniteScrollCrawler: JobCrawler {
    /// 목록 끝을 표시하는 센티넬. disabled 여부와 무관하게 존재만 확인한다.
    fn end_sentinel_selector(&self) -> &str;

    fn scroll_to_end(&self, page: &dyn BrowserPage, max_scrolls: usize) -> Result<ScrollOutcome> {
        let cancel = self.cancel_token();
        let mut scrolls = 0;

        while scrolls < max_scrolls && !cancel.is_cancelled() {
            let html = page.content()?;
            if selector_present(&html, self.end_sentinel_selector()) {
                println!("목록 끝 도달 (스크롤 {}회)", scrolls);
                return Ok(ScrollOutcome {
                    reached_end: true,
                    scrolls,
                });
            }

            page.evaluate(self.scroll_script())?;
            scrolls += 1;
            self.pause();
        }

        println!("⚠️ 센티넬 미발견 (스크롤 {}회), 현재 로딩된 목록으로 진행", scrolls);
        Ok(ScrollOutcome {
            reached_end: false,
            scrolls,
        })
    }
}

/// 잡 카드 조각에서 필드별로 독립 추출한다.
/// 누락된 노드는 None으로 끝나고 레코드 전체를 버리지 않는다.
pub trait JobFieldExtractor {
    fn extract_title(&self, fragment: &Html) -> Option<String>;
    fn extract_company(&self, fragment: &Html) -> Option<String>;
    fn extract_location(&self, fragment: &Html) -> Option<String>;
    fn extract_posted_time(&self, fragment: &Html) -> Option<String>;
    fn extract_job_url(&self, fragment: &Html) -> Option<String>;

    fn extract_job_type(&self, _fragment: &Html) -> Option<String> {
        None
    }

    fn extract_description(&self, _fragment: &Html) -> Option<String> {
        None
    }

    fn build_record(&self, card_html: &str, source: &str) -> Result<JobRecord> {
        let fragment = Html::parse_fragment(card_html);
        Ok(JobRecord {
            title: self.extract_title(&fragment).unwrap_or_default(),
            company: self.extract_company(&fragment).unwrap_or_default(),
            location: self.extract_location(&fragment).unwrap_or_default(),
            job_type: self.extract_job_type(&fragment).unwrap_or_default(),
            description: self.extract_description(&fragment).unwrap_or_default(),
            posted_time: self.extract_posted_time(&fragment).unwrap_or_default(),
            job_url: self.extract_job_url(&fragment).unwrap_or_default(),
            detail_content: None,
            source: source.to_string(),
            scraped_at: Utc::now(),
        })
    }
}

pub trait DetailCrawler: JobCrawler {
    /// 상세 탭을 열어 내용을 가져온다. 실패는 해당 레코드에만 격리된다.
    fn fetch_detail_content(&self, session: &dyn BrowserSession, url: &str) -> DetailContent {
        match self.try_fetch_detail(session, url) {
            Ok(content) => DetailContent::Content(content),
            Err(e) => {
                eprintln!("❌ 상세 페이지 수집 실패 ({}): {}", url, e);
                DetailContent::Failed
            }
        }
    }

    fn try_fetch_detail(&self, session: &dyn BrowserSession, url: &str) -> Result<String> {
        let page = session.open(url)?;
        self.pause();
        let content = page.content();
        if let Err(e) = page.close() {
            eprintln!("⚠️ 상세 탭 닫기 실패: {}", e);
        }
        content
    }
}

pub trait MissionDiscoverer: JobCrawler {
    /// 상위 카테고리 목록 페이지
    fn browse_url(&self) -> String;

    fn parse_category_links(&self, html: &str) -> Vec<String>;

    fn parse_missions(&self, html: &str) -> Vec<Mission>;

    /// 2단계 카테고리 구조를 걸어 미션 목록을 만든다.
    /// 오류가 나도 그때까지 모은 미션을 반환하고, 연 탭은 모두 닫는다.
    fn discover_missions(&self, session: &dyn BrowserSession, mission_limit: usize) -> Vec<Mission> {
        let mut missions = Vec::new();
        if let Err(e) = self.try_discover(session, mission_limit, &mut missions) {
            eprintln!("❌ 미션 준비 중 오류: {} ({}개까지 수집됨)", e, missions.len());
        }
        println!("미션 {}개 준비 완료", missions.len());
        missions
    }

    fn try_discover(
        &self,
        session: &dyn BrowserSession,
        mission_limit: usize,
        missions: &mut Vec<Mission>,
    ) -> Result<()> {
        let page = session.open(&self.browse_url())?;
        let result = self.collect_from_categories(session, page.as_ref(), mission_limit, missions);
        if let Err(e) = page.close() {
            eprintln!("⚠️ 탭 닫기 실패: {}", e);
        }
        result
    }

    fn collect_from_categories(
        &self,
        session: &dyn BrowserSession,
        page: &dyn BrowserPage,
        mission_limit: usize,
        missions: &mut Vec<Mission>,
    ) -> Result<()> {
        self.wait_for_list_page_load(page)?;
        let category_links = self.parse_category_links(&page.content()?);
        println!("카테고리 {}개 발견", category_links.len());

        let cancel = self.cancel_token();
        for link in category_links {
            if cancel.is_cancelled() || at_limit(missions, mission_limit) {
                break;
            }

            let sub_page = session.open(&link)?;
            let collected =
                self.collect_missions_from(sub_page.as_ref(), mission_limit, missions);
            if let Err(e) = sub_page.close() {
                eprintln!("⚠️ 탭 닫기 실패: {}", e);
            }
            collected?;
        }
        Ok(())
    }

    fn collect_missions_from(
        &self,
        page: &dyn BrowserPage,
        mission_limit: usize,
        missions: &mut Vec<Mission>,
    ) -> Result<()> {
        self.wait_for_list_page_load(page)?;
        let found = self.parse_missions(&page.content()?);
        println!("하위 카테고리 {}개 발견", found.len());

        for mission in found {
            if at_limit(missions, mission_limit) {
                break;
            }
            missions.push(mission);
        }
        Ok(())
    }
}

pub trait MissionProcessor:
    JobListInfiniteScrollCrawler + DetailCrawler + JobFieldExtractor
{
    fn job_card_selector(&self) -> &str;

    fn max_scrolls(&self) -> usize {
        50
    }

    fn fetch_details(&self) -> bool {
        true
    }

    /// 미션 하나를 처리한다. 중간에 실패해도 그때까지 만든 레코드는 반환한다.
    fn process_mission(&self, session: &dyn BrowserSession, mission: &Mission) -> Vec<JobRecord> {
        println!("미션 처리 시작: {}", mission.start_url);
        let mut records = Vec::new();
        if let Err(e) = self.try_process(session, mission, &mut records) {
            eprintln!(
                "❌ 미션 처리 중 오류 ({}): {} ({}건까지 수집됨)",
                mission.start_url,
                e,
                records.len()
            );
        }
        records
    }

    fn try_process(
        &self,
        session: &dyn BrowserSession,
        mission: &Mission,
        records: &mut Vec<JobRecord>,
    ) -> Result<()> {
        let page = session.open(&mission.start_url)?;
        let result = self.collect_records(session, page.as_ref(), mission, records);
        if let Err(e) = page.close() {
            eprintln!("⚠️ 탭 닫기 실패: {}", e);
        }
        result
    }

    fn collect_records(
        &self,
        session: &dyn BrowserSession,
        page: &dyn BrowserPage,
        mission: &Mission,
        records: &mut Vec<JobRecord>,
    ) -> Result<()> {
        self.wait_for_list_page_load(page)?;
        self.scroll_to_end(page, self.max_scrolls())?;

        let cards = select_fragments(&page.content()?, self.job_card_selector())?;
        println!("잡 카드 {}개 발견", cards.len());

        let cancel = self.cancel_token();
        for card in &cards {
            if cancel.is_cancelled() {
                break;
            }

            let mut record = self.build_record(card, &mission.label)?;
            if self.fetch_details() && !record.job_url.is_empty() {
                record.detail_content = Some(self.fetch_detail_content(session, &record.job_url));
            }
            records.push(record);
        }

        println!("미션 {}: {}건 수집 완료", mission.start_url, records.len());
        Ok(())
    }
}

pub trait JobListPaginatedCrawler: JobCrawler + JobFieldExtractor {
    fn listing_url(&self) -> String;

    fn job_card_selector(&self) -> &str;

    /// 활성 상태의 다음 페이지 버튼. 비활성이거나 없으면 종료한다.
    fn next_button_selector(&self) -> &str;

    fn max_pages(&self) -> usize {
        50
    }

    fn source_label(&self) -> String {
        self.output_slug()
    }

    /// 페이지 단위로 수집해 매 페이지 직후 `on_page`로 넘긴다.
    fn crawl_paginated(
        &self,
        session: &dyn BrowserSession,
        on_page: &mut dyn FnMut(&[JobRecord]),
    ) -> Result<usize> {
        let page = session.open(&self.listing_url())?;
        let result = self.walk_pages(page.as_ref(), on_page);
        if let Err(e) = page.close() {
            eprintln!("⚠️ 탭 닫기 실패: {}", e);
        }
        result
    }

    fn walk_pages(
        &self,
        page: &dyn BrowserPage,
        on_page: &mut dyn FnMut(&[JobRecord]),
    ) -> Result<usize> {
        self.wait_for_list_page_load(page)?;
        let cancel = self.cancel_token();
        let source = self.source_label();
        let mut total = 0;

        for page_no in 1..=self.max_pages() {
            if cancel.is_cancelled() {
                break;
            }

            let html = page.content()?;
            let cards = select_fragments(&html, self.job_card_selector())?;
            if cards.is_empty() {
                println!("페이지 {}: 잡 카드 없음, 종료", page_no);
                break;
            }

            let records = cards
                .iter()
                .map(|card| self.build_record(card, &source))
                .collect::<Result<Vec<_>>>()?;
            println!("페이지 {}: {}건 수집", page_no, records.len());
            total += records.len();
            on_page(&records);

            if !selector_present(&html, self.next_button_selector()) {
                println!("다음 페이지 버튼 없음, 종료");
                break;
            }
            page.evaluate(&format!(
                "document.querySelector('{}').click();",
                self.next_button_selector()
            ))?;
            self.pause();
        }

        Ok(total)
    }
}

fn at_limit(missions: &[Mission], mission_limit: usize) -> bool {
    mission_limit > 0 && missions.len() >= mission_limit
}

pub(crate) fn selector_present(html: &str, selector: &str) -> bool {
    let Ok(parsed) = Selector::parse(selector) else {
        return false;
    };
    Html::parse_document(html).select(&parsed).next().is_some()
}

pub(crate) fn select_fragments(html: &str, selector: &str) -> Result<Vec<String>> {
    let parsed = Selector::parse(selector)
        .map_err(|e| format!("잘못된 셀렉터 {}: {}", selector, e))?;
    Ok(Html::parse_document(html)
        .select(&parsed)
        .map(|element| element.html())
        .collect())
}
