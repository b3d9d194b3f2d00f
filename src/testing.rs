//! 실제 브라우저 없이 크롤 경로를 검증하기 위한 목 구현.

use crate::Result;
use crate::browser::{BrowserPage, BrowserSession};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// URL별로 스크립트된 페이지를 돌려주는 목 세션.
/// 열린 URL을 기록해 탭 사용을 검증할 수 있다.
#[derive(Default, Clone)]
pub struct MockSession {
    pages: Arc<RwLock<HashMap<String, MockPage>>>,
    fail_urls: Arc<RwLock<Vec<String>>>,
    opened: Arc<RwLock<Vec<String>>>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: impl Into<String>, page: MockPage) -> Self {
        self.pages.write().unwrap().insert(url.into(), page);
        self
    }

    pub fn fail_url(self, url: impl Into<String>) -> Self {
        self.fail_urls.write().unwrap().push(url.into());
        self
    }

    /// 지금까지 열린 URL, 열린 순서대로
    pub fn opened(&self) -> Vec<String> {
        self.opened.read().unwrap().clone()
    }
}

impl BrowserSession for MockSession {
    fn open(&self, url: &str) -> Result<Box<dyn BrowserPage>> {
        self.opened.write().unwrap().push(url.to_string());

        if self.fail_urls.read().unwrap().iter().any(|u| u == url) {
            return Err(format!("mock: {} 접속 실패", url).into());
        }

        let page = self
            .pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| format!("mock: {} 페이지 없음", url))?;
        Ok(Box::new(page))
    }
}

/// 스크롤(evaluate) 횟수에 따라 다른 스냅샷을 돌려주는 목 페이지.
/// Clone은 내부 상태를 공유하므로 테스트에서 원본 핸들로 검증한다.
#[derive(Default, Clone)]
pub struct MockPage {
    frames: Vec<String>,
    scrolls: Arc<RwLock<usize>>,
    evaluated: Arc<RwLock<Vec<String>>>,
    closed: Arc<RwLock<bool>>,
    fail_content: bool,
}

impl MockPage {
    pub fn with_content(html: impl Into<String>) -> Self {
        Self {
            frames: vec![html.into()],
            ..Self::default()
        }
    }

    /// n번째 evaluate 호출 이후 content()는 frames[n]을 돌려준다.
    /// 프레임이 모자라면 마지막 프레임이 유지된다.
    pub fn with_frames(frames: Vec<String>) -> Self {
        Self {
            frames,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_content: true,
            ..Self::default()
        }
    }

    pub fn scroll_count(&self) -> usize {
        *self.scrolls.read().unwrap()
    }

    pub fn evaluated(&self) -> Vec<String> {
        self.evaluated.read().unwrap().clone()
    }

    pub fn was_closed(&self) -> bool {
        *self.closed.read().unwrap()
    }
}

impl BrowserPage for MockPage {
    fn content(&self) -> Result<String> {
        if self.fail_content {
            return Err("mock: 콘텐츠 읽기 실패".into());
        }

        let scrolls = *self.scrolls.read().unwrap();
        let idx = scrolls.min(self.frames.len().saturating_sub(1));
        Ok(self.frames.get(idx).cloned().unwrap_or_default())
    }

    fn evaluate(&self, script: &str) -> Result<()> {
        self.evaluated.write().unwrap().push(script.to_string());
        *self.scrolls.write().unwrap() += 1;
        Ok(())
    }

    fn wait_for(&self, _selector: &str) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        *self.closed.write().unwrap() = true;
        Ok(())
    }
}
