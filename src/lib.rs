pub mod browser;
pub mod clients;
pub mod crawler;
pub mod models;
pub mod pipeline;
pub mod testing;
pub mod user_agent;
pub mod utils;
pub mod writer;

pub use browser::{BrowserPage, BrowserSession, ChromeSession};
pub use clients::{GrabJobsClient, GrabJobsCrawlConfig, MonsterClient, MonsterCrawlConfig};
pub use crawler::{
    DetailCrawler, JobCrawler, JobFieldExtractor, JobListInfiniteScrollCrawler,
    JobListPaginatedCrawler, MissionDiscoverer, MissionProcessor, ScrollOutcome,
};
pub use models::{CrawlConfig, DetailContent, JobRecord, Mission};
pub use pipeline::{CrawlPipeline, RunSummary};
pub use utils::CancelToken;
pub use writer::append_to_json;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
