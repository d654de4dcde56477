//! Crawl frontier and the set of already-fetched URLs

use crate::crawler::records::LinkRef;
use std::collections::HashSet;

/// Anchor text given to the seed and to anchors without visible text
pub const BLANK_TEXT: &str = " ";

/// URLs whose fetch completed with a usable response
///
/// The sole deduplication authority of a crawl. A URL enters the set when its
/// successful fetch is classified, not when it is queued, so two anchors that
/// resolve to the same URL on sibling pages of one round can both be fetched
/// before either lands here. That duplication is bounded by one round.
/// Failed fetches never enter the set, so a broken URL is fetched again each
/// time it is rediscovered.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    urls: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Adds a URL; returns false if it was already present
    pub fn insert(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Links awaiting fetch in the next round, plus the seen set
///
/// Entries are deduplicated on the exact `(url, text)` pair. The same URL
/// with two different anchor texts is queued twice; the second completed
/// fetch is then discarded by the seen-set check.
#[derive(Debug, Default)]
pub struct Frontier {
    seen: SeenSet,
    pending: Vec<LinkRef>,
    queued: HashSet<LinkRef>,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    pub fn new(seed: &str) -> Self {
        let mut frontier = Self::default();
        frontier.push(LinkRef::new(seed, BLANK_TEXT));
        frontier
    }

    /// Queues a link for the next round; returns false for an exact duplicate
    pub fn push(&mut self, link: LinkRef) -> bool {
        if !self.queued.insert(link.clone()) {
            return false;
        }
        self.pending.push(link);
        true
    }

    /// Takes the whole pending batch, leaving the frontier empty
    pub fn take_batch(&mut self) -> Vec<LinkRef> {
        self.queued.clear();
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn seen_mut(&mut self) -> &mut SeenSet {
        &mut self.seen
    }

    /// Consumes the frontier, returning the final seen set
    pub fn into_seen(self) -> SeenSet {
        self.seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_holds_seed() {
        let mut frontier = Frontier::new("https://ex.com/");
        assert_eq!(frontier.len(), 1);
        assert!(frontier.seen().is_empty());

        let batch = frontier.take_batch();
        assert_eq!(batch, vec![LinkRef::new("https://ex.com/", " ")]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_exact_duplicates_dropped() {
        let mut frontier = Frontier::default();
        assert!(frontier.push(LinkRef::new("https://ex.com/a", "A")));
        assert!(!frontier.push(LinkRef::new("https://ex.com/a", "A")));
        assert!(frontier.push(LinkRef::new("https://ex.com/a", "Other text")));
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_batch_order_preserved() {
        let mut frontier = Frontier::default();
        frontier.push(LinkRef::new("https://ex.com/b", "B"));
        frontier.push(LinkRef::new("https://ex.com/a", "A"));
        let urls: Vec<_> = frontier.take_batch().into_iter().map(|l| l.url).collect();
        assert_eq!(urls, vec!["https://ex.com/b", "https://ex.com/a"]);
    }

    #[test]
    fn test_requeue_after_take() {
        let mut frontier = Frontier::default();
        frontier.push(LinkRef::new("https://ex.com/a", "A"));
        frontier.take_batch();
        assert!(frontier.push(LinkRef::new("https://ex.com/a", "A")));
    }

    #[test]
    fn test_seen_set_insert() {
        let mut seen = SeenSet::new();
        assert!(seen.insert("https://ex.com/"));
        assert!(!seen.insert("https://ex.com/"));
        assert!(seen.contains("https://ex.com/"));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_seen_survives_take_batch() {
        let mut frontier = Frontier::new("https://ex.com/");
        frontier.seen_mut().insert("https://ex.com/");
        frontier.take_batch();
        assert!(frontier.seen().contains("https://ex.com/"));
    }
}
