// Serve a local log file as if it were a paged remote stream.
//
// Tokens are line indices. The head token is the index of the oldest line
// handed out so far, the tail token one past the newest.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use log_registry::{Direction, FetchError, LogRecord, Page, PageRequest, PageSource};

use crate::time_stamper::TimeStamper;

pub const DEFAULT_PAGE_SIZE: usize = 20;

pub struct FileReplaySource {
    records: Vec<LogRecord>,
    page_size: usize,
}

impl FileReplaySource {
    pub fn open(path: &Path, page_size: usize) -> std::io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let source = Self::from_text(&text, page_size);
        log::info!("Loaded {} lines from {}", source.records.len(), path.display());
        Ok(source)
    }

    pub fn from_text(text: &str, page_size: usize) -> Self {
        let mut stamper = TimeStamper::default();
        let records = text
            .split_inclusive('\n')
            .map(|line| LogRecord {
                timestamp: stamper.time(line),
                message: line.to_string(),
            })
            .collect::<Vec<_>>();
        log::debug!("{} lines without a timestamp", stamper.unmatched());
        Self { records, page_size }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    fn position(&self, token: Option<&str>, default: usize) -> Result<usize, FetchError> {
        let Some(token) = token else {
            return Ok(default);
        };
        match token.parse::<usize>() {
            Ok(pos) if pos <= self.records.len() => Ok(pos),
            _ => Err(FetchError::InvalidToken(token.to_string())),
        }
    }

    fn page(&self, start: usize, end: usize) -> Page {
        Page::new(self.records[start..end].to_vec())
    }
}

#[async_trait]
impl PageSource for FileReplaySource {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page, FetchError> {
        let limit = request.limit.unwrap_or(self.page_size);
        let len = self.records.len();
        let token = request.token.as_deref();

        let page = match request.direction {
            None => {
                let start = len.saturating_sub(limit);
                self.page(start, len)
                    .with_tokens(Some(start.to_string()), Some(len.to_string()))
            }
            Some(Direction::Head) => {
                let end = self.position(token, 0)?;
                let start = end.saturating_sub(limit);
                self.page(start, end).with_tokens(Some(start.to_string()), None)
            }
            Some(Direction::Tail) => {
                let start = self.position(token, len)?;
                let end = start.saturating_add(limit).min(len);
                self.page(start, end).with_tokens(None, Some(end.to_string()))
            }
        };
        log::trace!("{} served {} records", request.uri, page.records.len());
        Ok(page)
    }
}
