use monster_crawler::{
    ChromeSession, CrawlConfig, CrawlPipeline, GrabJobsClient, GrabJobsCrawlConfig, MonsterClient,
    MonsterCrawlConfig, Result,
};

fn main() -> Result<()> {
    let config = CrawlConfig::from_env();
    let session = ChromeSession::launch(&config)?;
    println!("브라우저 시작 완료");

    let pipeline = CrawlPipeline::new(config.output_dir.clone(), config.mission_limit);

    pipeline.run_missions(
        &session,
        &MonsterClient::new(MonsterCrawlConfig {
            max_scrolls: config.max_scrolls,
            fetch_details: config.fetch_details,
            ..MonsterCrawlConfig::default()
        }),
    );

    pipeline.run_paginated(&session, &GrabJobsClient::new(GrabJobsCrawlConfig::default()));

    Ok(())
}
