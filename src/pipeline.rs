use crate::browser::BrowserSession;
use crate::crawler::{JobListPaginatedCrawler, MissionDiscoverer, MissionProcessor};
use crate::models::JobRecord;
use crate::utils::CancelToken;
use crate::writer::append_to_json;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub missions: usize,
    pub records: usize,
}

/// 미션 발견 → 미션별 처리 → 미션별 저장을 순서대로 묶는다.
/// 미션 하나가 실패해도 다음 미션으로 넘어간다.
pub struct CrawlPipeline {
    output_dir: PathBuf,
    mission_limit: usize,
    cancel: CancelToken,
}

impl CrawlPipeline {
    pub fn new(output_dir: impl Into<PathBuf>, mission_limit: usize) -> Self {
        Self {
            output_dir: output_dir.into(),
            mission_limit,
            cancel: CancelToken::default(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn run_missions<C>(&self, session: &dyn BrowserSession, client: &C) -> RunSummary
    where
        C: MissionDiscoverer + MissionProcessor,
    {
        let missions = client.discover_missions(session, self.mission_limit);
        let path = self.output_path(&client.output_slug());
        let mut summary = RunSummary {
            missions: missions.len(),
            records: 0,
        };

        for mission in &missions {
            if self.cancel.is_cancelled() {
                println!("⚠️ 취소 요청, 남은 미션 건너뜀");
                break;
            }

            // 다음 미션으로 넘어가기 전에 이번 미션 결과부터 저장한다
            let records = client.process_mission(session, mission);
            summary.records += records.len();
            append_to_json(&path, &records);
        }

        println!(
            "✅ 전체 완료: 미션 {}개, 레코드 {}건 → {}",
            summary.missions,
            summary.records,
            path.display()
        );
        summary
    }

    pub fn run_paginated<C>(&self, session: &dyn BrowserSession, client: &C) -> RunSummary
    where
        C: JobListPaginatedCrawler,
    {
        let path = self.output_path(&client.output_slug());
        let mut records_total = 0;

        let result = client.crawl_paginated(session, &mut |records: &[JobRecord]| {
            records_total += records.len();
            append_to_json(&path, records);
        });
        if let Err(e) = result {
            eprintln!("❌ 페이지 크롤 실패: {}", e);
        }

        println!(
            "✅ 전체 완료: 레코드 {}건 → {}",
            records_total,
            path.display()
        );
        RunSummary {
            missions: 1,
            records: records_total,
        }
    }

    fn output_path(&self, slug: &str) -> PathBuf {
        self.output_dir.join(format!("{}_job_listings.json", slug))
    }
}
