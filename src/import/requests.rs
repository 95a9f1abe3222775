use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;

use super::{ImportSource, KeywordDetector, Outcome, Rasterizer, Resolution};
use crate::page::PageId;

/// Runs imports and keyword detection off the pointer path.
///
/// Work is driven by [`RequestQueue::poll`], typically once per frame. Every
/// request is tagged with the page it was made for and a sequence number, so
/// the session can drop resolutions that arrive after the user moved on.
pub struct RequestQueue {
    pool: LocalPool,
    sender: UnboundedSender<Resolution>,
    receiver: UnboundedReceiver<Resolution>,
    next_sequence: u64,
    in_flight: usize,
}

impl std::fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestQueue")
            .field("next_sequence", &self.next_sequence)
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            pool: LocalPool::new(),
            sender,
            receiver,
            next_sequence: 1,
            in_flight: 0,
        }
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    fn spawn<F>(&mut self, future: F)
    where
        F: std::future::Future<Output = Resolution> + 'static,
    {
        let sender = self.sender.clone();
        let spawned = self.pool.spawner().spawn_local(async move {
            let resolution = future.await;
            // The queue owns the receiver, so this only fails during teardown.
            let _ = sender.unbounded_send(resolution);
        });
        match spawned {
            Ok(()) => self.in_flight += 1,
            Err(e) => log::error!("Failed to spawn request: {e}"),
        }
    }

    /// Rasterize `source` as the new background of `page_id`.
    pub fn import(&mut self, page_id: PageId, rasterizer: &dyn Rasterizer, source: ImportSource) -> u64 {
        let sequence = self.next_sequence();
        let title = source.page_title();
        log::info!("Import #{sequence} of {} for page {page_id}", source.name);
        let work = rasterizer.rasterize(source);
        self.spawn(async move {
            Resolution {
                page_id,
                sequence,
                outcome: Outcome::Background {
                    result: work.await,
                    title,
                },
            }
        });
        sequence
    }

    /// Ask `detector` for keywords. A failed detection resolves to no keywords.
    pub fn detect_keywords(&mut self, page_id: PageId, detector: &dyn KeywordDetector, text: String) -> u64 {
        let sequence = self.next_sequence();
        let work = detector.detect(text);
        self.spawn(async move {
            let keywords = match work.await {
                Ok(keywords) => keywords,
                Err(e) => {
                    log::warn!("Keyword detection #{sequence} failed: {e}");
                    Vec::new()
                }
            };
            Resolution {
                page_id,
                sequence,
                outcome: Outcome::Keywords(keywords),
            }
        });
        sequence
    }

    /// Drive pending work as far as it goes without blocking and collect
    /// whatever finished, in completion order.
    pub fn poll(&mut self) -> Vec<Resolution> {
        self.pool.run_until_stalled();
        let mut finished = Vec::new();
        while let Ok(resolution) = self.receiver.try_recv() {
            finished.push(resolution);
        }
        self.in_flight = self.in_flight.saturating_sub(finished.len());
        finished
    }

    /// Requests issued but not yet collected by `poll`.
    pub fn pending(&self) -> usize {
        self.in_flight
    }
}
