//! The page-fetching capability the registry pulls records through.
//!
//! A [`PageSource`] hides where records come from: a remote API, a file being
//! replayed from disk, or a scripted fixture in tests. The registry hands it a
//! [`PageRequest`] and stores whatever [`Page`] comes back.
//!
//! # Ordering contract
//!
//! Sources must return records already in display order for the requested
//! direction. The registry splices pages in verbatim and never sorts by
//! timestamp, so an out-of-order page stays out of order.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::record::LogRecord;
use crate::uri::LogUri;

/// Which end of a buffer a page is merged into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Older records, prepended before the existing ones.
    Head,
    /// Newer records, appended after the existing ones.
    Tail,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Head => write!(f, "head"),
            Direction::Tail => write!(f, "tail"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "head" => Ok(Direction::Head),
            "tail" => Ok(Direction::Tail),
            _ => Err(format!("unknown direction {s:?}")),
        }
    }
}

/// Everything a source needs to produce one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub uri: LogUri,
    /// `None` for the initial page of a registration.
    pub direction: Option<Direction>,
    /// The cursor the source handed back for this direction last time.
    pub token: Option<String>,
    pub limit: Option<usize>,
}

/// One page of records plus the cursors to continue from either end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub records: Vec<LogRecord>,
    pub head_token: Option<String>,
    pub tail_token: Option<String>,
}

impl Page {
    pub fn new(records: Vec<LogRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn with_tokens(mut self, head_token: Option<String>, tail_token: Option<String>) -> Self {
        self.head_token = head_token;
        self.tail_token = tail_token;
        self
    }
}

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page of records.
    ///
    /// # Errors
    ///
    /// Whatever the underlying stream reports. The registry returns the error
    /// to its caller untouched.
    async fn fetch_page(&self, request: PageRequest) -> Result<Page, FetchError>;
}

/// Adapts an async closure into a [`PageSource`].
pub struct FnPageSource<F> {
    fetch: F,
}

pub fn from_fn<F, Fut>(fetch: F) -> FnPageSource<F>
where
    F: Fn(PageRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page, FetchError>> + Send + 'static,
{
    FnPageSource { fetch }
}

#[async_trait]
impl<F, Fut> PageSource for FnPageSource<F>
where
    F: Fn(PageRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page, FetchError>> + Send + 'static,
{
    async fn fetch_page(&self, request: PageRequest) -> Result<Page, FetchError> {
        (self.fetch)(request).await
    }
}

/// A source that replays a fixed script of responses, one per fetch, and
/// remembers every request it saw. Once the script runs out it returns empty
/// pages.
#[derive(Default)]
pub struct ScriptedPageSource {
    responses: Mutex<VecDeque<Result<Page, FetchError>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, page: Page) -> &Self {
        self.lock_responses().push_back(Ok(page));
        self
    }

    pub fn push_records(&self, records: Vec<LogRecord>) -> &Self {
        self.push_page(Page::new(records))
    }

    pub fn push_error(&self, err: FetchError) -> &Self {
        self.lock_responses().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn remaining(&self) -> usize {
        self.lock_responses().len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<Page, FetchError>>> {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl PageSource for ScriptedPageSource {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.lock_responses().pop_front().unwrap_or_else(|| Ok(Page::default()))
    }
}
