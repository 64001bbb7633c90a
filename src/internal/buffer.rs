use anyhow::Result;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

use crate::internal::data_types::{CaptionEntry, CaptionEvent};
use crate::internal::names::NameCache;
use crate::internal::timer::ExpiryTimer;
use crate::surface::CaptionSurface;
use crate::CaptionConfig;

/// Holds the captions currently on screen.
///
/// At most `max_captions` sources are shown at once, each for `timeout` after its latest
/// event. `entries` is kept in recency order: the front is the least recently updated source
/// and is the one evicted when a new source arrives and the buffer is full. Renders list the
/// most recent source last.
///
/// Every mutation renders the whole buffer to the surface.
pub struct CaptionBuffer<S, T> {
    max_captions: usize,
    timeout: Duration,
    entries: VecDeque<CaptionEntry>,
    names: NameCache,
    surface: S,
    timer: T,
}

impl<S: CaptionSurface, T: ExpiryTimer> CaptionBuffer<S, T> {
    pub fn new(config: &CaptionConfig, surface: S, timer: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            max_captions: config.max_captions,
            timeout: config.timeout(),
            entries: VecDeque::new(),
            names: NameCache::new(),
            surface,
            timer,
        })
    }

    /// inserts or refreshes the caption for the event's stream
    pub fn handle_caption(&mut self, event: CaptionEvent, now: Instant) {
        let CaptionEvent {
            stream_id,
            caption,
            connection,
        } = event;
        let display_name = self.names.resolve(connection.as_ref());
        let deadline = now + self.timeout;

        let existing = self
            .position(&stream_id)
            .and_then(|idx| self.entries.remove(idx));
        let entry = match existing {
            Some(mut entry) => {
                entry.text = caption;
                entry.deadline = deadline;
                entry
            }
            None => {
                if self.entries.len() >= self.max_captions {
                    self.evict_oldest();
                }
                log::debug!("showing captions for source {}", &stream_id);
                CaptionEntry {
                    source_id: stream_id,
                    connection_id: connection.map(|c| c.connection_id),
                    display_name,
                    text: caption,
                    deadline,
                }
            }
        };
        self.timer.schedule(&entry.source_id, deadline);
        self.entries.push_back(entry);
        self.render_or_warn();
    }

    /// called when the timer armed for `deadline` fires. ignored if the source was refreshed
    /// or removed since then
    pub fn expire(&mut self, source: &str, deadline: Instant) {
        let idx = match self.position(source) {
            Some(idx) => idx,
            None => {
                log::debug!("expiry for source {} which is no longer shown", source);
                return;
            }
        };
        if self.entries[idx].deadline != deadline {
            log::debug!("stale expiry for source {}", source);
            return;
        }
        self.entries.remove(idx);
        log::debug!("captions for source {} expired", source);
        self.render_or_warn();
    }

    /// relabels a connection, including any of its sources that are on screen
    pub fn set_name(&mut self, connection_id: &str, name: String) {
        let mut changed = false;
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| e.connection_id.as_deref() == Some(connection_id))
        {
            if entry.display_name != name {
                entry.display_name = name.clone();
                changed = true;
            }
        }
        self.names.set(connection_id, name);
        if changed {
            self.render_or_warn();
        }
    }

    /// one "name: text" line per source, most recent last
    pub fn compose(&self) -> String {
        self.entries
            .iter()
            .map(CaptionEntry::line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render(&mut self) -> Result<()> {
        let text = self.compose();
        self.surface.write(&text)
    }

    /// cancels every timer and clears the surface
    pub fn close(&mut self) {
        self.timer.cancel_all();
        self.entries.clear();
        self.render_or_warn();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, source: &str) -> bool {
        self.position(source).is_some()
    }

    /// least recently updated first
    pub fn entries(&self) -> impl Iterator<Item = &CaptionEntry> {
        self.entries.iter()
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn position(&self, source: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.source_id == source)
    }

    fn evict_oldest(&mut self) {
        if let Some(evicted) = self.entries.pop_front() {
            self.timer.cancel(&evicted.source_id);
            log::debug!("evicted captions for source {}", &evicted.source_id);
        }
    }

    // a dropped caption frame isn't worth failing over
    fn render_or_warn(&mut self) {
        if let Err(e) = self.render() {
            log::warn!("failed to render captions: {}", e);
        }
    }
}
