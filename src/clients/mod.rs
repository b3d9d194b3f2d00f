pub mod grabjobs;
pub mod monster;

pub use grabjobs::{GrabJobsClient, GrabJobsCrawlConfig};
pub use monster::{MonsterClient, MonsterCrawlConfig};
