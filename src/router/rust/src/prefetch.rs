/* src/router/rust/src/prefetch.rs */

//! Prefetch scheduling. Paths queue at low priority (viewport sightings)
//! or high priority (hover/touch), with a cap on concurrent fetches and
//! per-path de-duplication across queued, in-flight, and finished work.

use std::collections::{BTreeSet, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
  Low,
  High,
}

pub struct PrefetchQueue {
  rate: usize,
  queue: VecDeque<String>,
  in_flight: BTreeSet<String>,
  done: BTreeSet<String>,
}

impl PrefetchQueue {
  pub fn new(rate: usize) -> Self {
    Self { rate: rate.max(1), queue: VecDeque::new(), in_flight: BTreeSet::new(), done: BTreeSet::new() }
  }

  /// Queue a path for prefetching. High-priority paths jump the queue;
  /// a path already queued, in flight, or finished is ignored, except
  /// that a high-priority sighting promotes a queued low-priority one.
  pub fn enqueue(&mut self, path: &str, priority: Priority) {
    if self.in_flight.contains(path) || self.done.contains(path) {
      return;
    }
    if let Some(pos) = self.queue.iter().position(|p| p == path) {
      if priority == Priority::High && pos != 0 {
        self.queue.remove(pos);
        self.queue.push_front(path.to_string());
      }
      return;
    }
    match priority {
      Priority::High => self.queue.push_front(path.to_string()),
      Priority::Low => self.queue.push_back(path.to_string()),
    }
  }

  /// Paths the host should start fetching now, respecting the rate cap.
  /// Returned paths are moved into the in-flight set.
  pub fn next_batch(&mut self) -> Vec<String> {
    let mut batch = Vec::new();
    while self.in_flight.len() < self.rate {
      let Some(path) = self.queue.pop_front() else { break };
      self.in_flight.insert(path.clone());
      batch.push(path);
    }
    batch
  }

  pub fn mark_done(&mut self, path: &str) {
    if self.in_flight.remove(path) {
      self.done.insert(path.to_string());
    }
  }

  /// A failed prefetch is forgotten entirely so a later sighting can
  /// retry it.
  pub fn mark_failed(&mut self, path: &str) {
    self.in_flight.remove(path);
  }

  pub fn is_done(&self, path: &str) -> bool {
    self.done.contains(path)
  }

  pub fn pending(&self) -> usize {
    self.queue.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rate_caps_in_flight_fetches() {
    let mut q = PrefetchQueue::new(2);
    for path in ["/a", "/b", "/c", "/d"] {
      q.enqueue(path, Priority::Low);
    }
    assert_eq!(q.next_batch(), vec!["/a", "/b"]);
    assert!(q.next_batch().is_empty());
    q.mark_done("/a");
    assert_eq!(q.next_batch(), vec!["/c"]);
  }

  #[test]
  fn high_priority_jumps_the_queue() {
    let mut q = PrefetchQueue::new(1);
    q.enqueue("/slow", Priority::Low);
    q.enqueue("/hover", Priority::High);
    assert_eq!(q.next_batch(), vec!["/hover"]);
  }

  #[test]
  fn hover_promotes_a_queued_path() {
    let mut q = PrefetchQueue::new(1);
    q.enqueue("/a", Priority::Low);
    q.enqueue("/b", Priority::Low);
    q.enqueue("/b", Priority::High);
    assert_eq!(q.next_batch(), vec!["/b"]);
    assert_eq!(q.pending(), 1);
  }

  #[test]
  fn duplicates_are_ignored() {
    let mut q = PrefetchQueue::new(4);
    q.enqueue("/a", Priority::Low);
    q.enqueue("/a", Priority::Low);
    assert_eq!(q.next_batch(), vec!["/a"]);
    q.enqueue("/a", Priority::High);
    assert!(q.next_batch().is_empty());
    q.mark_done("/a");
    q.enqueue("/a", Priority::High);
    assert!(q.next_batch().is_empty());
    assert!(q.is_done("/a"));
  }

  #[test]
  fn failed_prefetch_can_retry() {
    let mut q = PrefetchQueue::new(1);
    q.enqueue("/a", Priority::Low);
    assert_eq!(q.next_batch(), vec!["/a"]);
    q.mark_failed("/a");
    q.enqueue("/a", Priority::Low);
    assert_eq!(q.next_batch(), vec!["/a"]);
  }
}
