use crate::Result;
use crate::models::CrawlConfig;
use crate::user_agent::random_user_agent;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsString;
use std::sync::Arc;

/// 브라우저 탭 하나에 대한 조작 경계.
/// 페이지 내용은 HTML 스냅샷으로 읽어 scraper로 파싱한다.
pub trait BrowserPage {
    fn content(&self) -> Result<String>;
    fn evaluate(&self, script: &str) -> Result<()>;
    fn wait_for(&self, selector: &str) -> Result<()>;
    fn close(&self) -> Result<()>;
}

pub trait BrowserSession {
    /// 새 탭을 열어 URL로 이동한다. 탭은 호출자가 닫아야 한다.
    fn open(&self, url: &str) -> Result<Box<dyn BrowserPage>>;
}

pub struct ChromeSession {
    browser: Browser,
}

impl ChromeSession {
    pub fn launch(config: &CrawlConfig) -> Result<Self> {
        let user_agent = OsString::from(format!("--user-agent={}", random_user_agent()));
        let automation = OsString::from("--disable-blink-features=AutomationControlled");

        let browser = Browser::new(LaunchOptions {
            headless: config.headless,
            sandbox: config.sandbox,
            window_size: Some(config.window_size),
            args: vec![&automation, &user_agent],
            ..Default::default()
        })?;

        Ok(Self { browser })
    }
}

impl BrowserSession for ChromeSession {
    fn open(&self, url: &str) -> Result<Box<dyn BrowserPage>> {
        let tab = self.browser.new_tab()?;
        tab.navigate_to(url)?;
        tab.wait_until_navigated()?;
        println!("{} 이동 완료", url);
        Ok(Box::new(ChromeTab { tab }))
    }
}

struct ChromeTab {
    tab: Arc<Tab>,
}

impl BrowserPage for ChromeTab {
    fn content(&self) -> Result<String> {
        self.tab.get_content().map_err(Into::into)
    }

    fn evaluate(&self, script: &str) -> Result<()> {
        self.tab.evaluate(script, false)?;
        Ok(())
    }

    fn wait_for(&self, selector: &str) -> Result<()> {
        self.tab.wait_for_element(selector)?;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.tab.close(true)?;
        Ok(())
    }
}
