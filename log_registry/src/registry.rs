// A long-lived collection of remote log streams, each presented as one
// growing document.
//
// Buffers are created by register_log, grown by update_log and dropped by
// deregister_log. Nothing else touches `entries`.

use std::collections::{HashMap, VecDeque};

use crossbeam_channel::{Receiver, Sender};

use crate::config::{RegistryConfig, RenderOptions};
use crate::error::FetchError;
use crate::record::LogRecord;
use crate::render;
use crate::source::{Direction, Page, PageRequest, PageSource};
use crate::uri::LogUri;

// Records held for one registered stream, plus the cursors to page further
// from either end.
struct StreamBuffer {
    uri: LogUri,
    records: VecDeque<LogRecord>,
    head_token: Option<String>,
    tail_token: Option<String>,
}

impl StreamBuffer {
    fn from_page(uri: LogUri, page: Page) -> Self {
        Self {
            uri,
            records: page.records.into(),
            head_token: page.head_token,
            tail_token: page.tail_token,
        }
    }

    fn token(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Head => self.head_token.as_deref(),
            Direction::Tail => self.tail_token.as_deref(),
        }
    }

    // Splice a page onto one end, keeping the page's own order. Returns the
    // number of records added.
    fn merge(&mut self, direction: Direction, page: Page) -> usize {
        let added = page.records.len();
        match direction {
            Direction::Head => {
                for record in page.records.into_iter().rev() {
                    self.records.push_front(record);
                }
                if page.head_token.is_some() {
                    self.head_token = page.head_token;
                }
            }
            Direction::Tail => {
                self.records.extend(page.records);
                if page.tail_token.is_some() {
                    self.tail_token = page.tail_token;
                }
            }
        }
        added
    }
}

/// In-memory cache of log stream documents keyed by [`LogUri::key`].
///
/// Construct one per feature activation and drop or [`clear`](Self::clear) it
/// on teardown. Mutating operations take `&mut self`, so a host that shares
/// the registry between tasks serializes access itself.
pub struct LogStreamRegistry {
    config: RegistryConfig,
    entries: HashMap<String, StreamBuffer>,
    subscribers: Vec<Sender<String>>,
}

impl Default for LogStreamRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl LogStreamRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn has_log(&self, uri: &LogUri) -> bool {
        self.entries.contains_key(uri.key())
    }

    /// Fetch the initial page for `uri` and start tracking it.
    ///
    /// Registering a uri that is already tracked returns at once without
    /// calling the source. If the fetch fails the uri stays unregistered.
    pub async fn register_log(
        &mut self,
        uri: &LogUri,
        source: &dyn PageSource,
    ) -> Result<(), FetchError> {
        if self.has_log(uri) {
            log::debug!("{uri} is already registered");
            return Ok(());
        }

        let request = self.request(uri, None, None);
        log::trace!("Fetching initial page for {uri}");
        let page = source.fetch_page(request).await?;

        log::debug!("Registered {uri} with {} records", page.records.len());
        let buffer = StreamBuffer::from_page(uri.clone(), page);
        self.entries.insert(uri.key().to_string(), buffer);
        Ok(())
    }

    /// Fetch one more page and splice it onto the `direction` end.
    ///
    /// Does nothing for an unregistered uri. A failed fetch leaves the buffer
    /// exactly as it was.
    pub async fn update_log(
        &mut self,
        uri: &LogUri,
        direction: Direction,
        source: &dyn PageSource,
    ) -> Result<(), FetchError> {
        let token = match self.entries.get(uri.key()) {
            Some(buffer) => buffer.token(direction).map(str::to_string),
            None => {
                log::trace!("Ignoring {direction} update for unregistered {uri}");
                return Ok(());
            }
        };

        let request = self.request(uri, Some(direction), token);
        log::trace!("Fetching {direction} page for {uri}: {request:?}");
        let page = source.fetch_page(request).await?;

        if let Some(buffer) = self.entries.get_mut(uri.key()) {
            let added = buffer.merge(direction, page);
            log::debug!(
                "Merged {added} records at {direction} of {uri}; {} total",
                buffer.records.len()
            );
            if added > 0 {
                self.notify(uri.key());
            }
        }
        Ok(())
    }

    /// The document text for `uri`, or `None` if it isn't registered.
    pub fn get_log_content(&self, uri: &LogUri, options: RenderOptions) -> Option<String> {
        let buffer = self.entries.get(uri.key())?;
        Some(render::render(&buffer.records, options, self.config.time_zone))
    }

    /// Keys of every registered stream, in no particular order.
    pub fn registered_logs(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// The full uri a stream was registered under.
    pub fn registered_uri(&self, key: &str) -> Option<&LogUri> {
        self.entries.get(key).map(|buffer| &buffer.uri)
    }

    pub fn record_count(&self, uri: &LogUri) -> Option<usize> {
        self.entries.get(uri.key()).map(|buffer| buffer.records.len())
    }

    pub fn deregister_log(&mut self, uri: &LogUri) {
        if self.entries.remove(uri.key()).is_some() {
            log::debug!("Deregistered {uri}");
        }
    }

    /// Drop every buffer. Subscribers stay connected.
    pub fn clear(&mut self) {
        log::debug!("Clearing {} registered logs", self.entries.len());
        self.entries.clear();
    }

    /// Receive the key of a stream each time an update adds records to it.
    pub fn subscribe(&mut self) -> Receiver<String> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, key: &str) {
        self.subscribers.retain(|tx| tx.send(key.to_string()).is_ok());
    }

    fn request(&self, uri: &LogUri, direction: Option<Direction>, token: Option<String>) -> PageRequest {
        PageRequest {
            uri: uri.clone(),
            direction,
            token,
            limit: self.config.page_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(messages: &[&str]) -> Page {
        Page::new(messages.iter().map(|m| LogRecord::untimed(*m)).collect())
    }

    fn messages(buffer: &StreamBuffer) -> Vec<&str> {
        buffer.records.iter().map(|r| r.message.as_str()).collect()
    }

    #[test]
    fn merge_head_keeps_page_order() {
        let uri = LogUri::parse("aws-cwl:g:s").unwrap();
        let mut buffer = StreamBuffer::from_page(uri, page(&["c", "d"]));
        assert_eq!(buffer.merge(Direction::Head, page(&["a", "b"])), 2);
        assert_eq!(messages(&buffer), vec!["a", "b", "c", "d"]);
        assert_eq!(buffer.merge(Direction::Tail, page(&["e"])), 1);
        assert_eq!(messages(&buffer), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn merge_updates_only_its_own_token() {
        let uri = LogUri::parse("aws-cwl:g:s").unwrap();
        let initial = page(&["x"]).with_tokens(Some("h0".into()), Some("t0".into()));
        let mut buffer = StreamBuffer::from_page(uri, initial);

        buffer.merge(Direction::Head, page(&[]).with_tokens(Some("h1".into()), Some("ignored".into())));
        assert_eq!(buffer.token(Direction::Head), Some("h1"));
        assert_eq!(buffer.token(Direction::Tail), Some("t0"));

        // A page without a cursor keeps the old one
        buffer.merge(Direction::Tail, page(&["y"]));
        assert_eq!(buffer.token(Direction::Tail), Some("t0"));
    }
}
