use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::content::ContentSource;

/// Refill kicks in once fewer than this many paragraphs are pending
pub const REFILL_THRESHOLD: usize = 3;
/// Longest wait on an in-flight fetch before fetching directly
const IN_FLIGHT_WAIT: Duration = Duration::from_secs(5);

/// Pending paragraphs, topped up by background fetches.
///
/// Fetches run on worker threads and report back over a channel; nothing here
/// blocks except [`ParagraphQueue::take_or_fetch`] on an empty queue.
pub struct ParagraphQueue {
    source: Arc<dyn ContentSource>,
    pending: VecDeque<String>,
    tx: Sender<String>,
    rx: Receiver<String>,
    in_flight: usize,
}

impl ParagraphQueue {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            pending: VecDeque::new(),
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Start `count` background fetches
    pub fn prime(&mut self, count: usize) {
        for _ in 0..count {
            self.spawn_fetch();
        }
    }

    fn spawn_fetch(&mut self) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            // the queue may be gone by the time we finish; that's fine
            let _ = tx.send(source.fetch_paragraph());
        });
    }

    /// Collect any finished fetches. Returns how many arrived.
    pub fn pump(&mut self) -> usize {
        let mut arrived = 0;
        while let Ok(paragraph) = self.rx.try_recv() {
            self.pending.push_back(paragraph);
            self.in_flight = self.in_flight.saturating_sub(1);
            arrived += 1;
        }
        if arrived > 0 {
            debug!("{arrived} paragraph(s) arrived, {} pending", self.pending.len());
        }
        arrived
    }

    /// Spawn one background fetch when the queue runs low and nothing is in flight.
    pub fn refill_if_low(&mut self) -> bool {
        self.pump();
        if self.pending.len() < REFILL_THRESHOLD && self.in_flight == 0 {
            self.spawn_fetch();
            return true;
        }
        false
    }

    /// Next paragraph. An empty queue waits for a fetch already in flight;
    /// only with nothing on the way is the source called on this thread.
    pub fn take_or_fetch(&mut self) -> String {
        self.pump();
        if let Some(paragraph) = self.pending.pop_front() {
            return paragraph;
        }
        if self.in_flight > 0 {
            debug!("paragraph queue empty, waiting on {} fetch(es)", self.in_flight);
            if let Ok(paragraph) = self.rx.recv_timeout(IN_FLIGHT_WAIT) {
                self.in_flight -= 1;
                return paragraph;
            }
            warn!("in-flight fetch is late, fetching synchronously");
        } else {
            debug!("paragraph queue empty, fetching synchronously");
        }
        self.source.fetch_paragraph()
    }

    /// Nothing pending yet, but a fetch is on its way
    pub fn is_loading(&self) -> bool {
        self.pending.is_empty() && self.in_flight > 0
    }

    pub fn pop(&mut self) -> Option<String> {
        self.pump();
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl std::fmt::Debug for ParagraphQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParagraphQueue")
            .field("pending", &self.pending.len())
            .field("in_flight", &self.in_flight)
            .finish()
    }
}
