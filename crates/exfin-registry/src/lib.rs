//! Pair registry for the exfin tick archive downloader.
//!
//! The archive root serves a plain-text listing with one pair per line.
//! [`PairRegistry::from_listing`] turns that body into an ordered set of
//! [`Pair`]s; lines that cannot be decomposed are skipped with a warning.
//!
//! # Example
//!
//! ```
//! use exfin_registry::PairRegistry;
//!
//! let body = "listing\r\n{ \"name\":\"EURUSD\",\"size\":1}\r\n{ \"name\":\"GBPUSD\",\"size\":2}\r\n";
//! let registry = PairRegistry::from_listing(body);
//!
//! assert!(registry.contains("eurusd"));
//! assert_eq!(registry.len(), 2);
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/exfin-rs/exfin/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use std::collections::HashSet;

use exfin_types::Pair;

/// Registry of the pairs published by the archive.
///
/// Populated once from a listing body and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct PairRegistry {
    pairs: Vec<Pair>,
    index: HashSet<Pair>,
    skipped: usize,
}

impl PairRegistry {
    /// Builds a registry from a listing body.
    ///
    /// The first line is a header and blank lines are ignored. Every other
    /// line must yield a token by [`parse_listing_line`]; lines that don't
    /// are logged and skipped.
    #[must_use]
    pub fn from_listing(body: &str) -> Self {
        let mut registry = Self::default();

        for line in body.lines().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            match parse_listing_line(line) {
                Some(pair) => registry.insert(pair),
                None => {
                    tracing::warn!(line, "failed to parse pair from listing line");
                    registry.skipped += 1;
                }
            }
        }

        tracing::debug!(
            pairs = registry.pairs.len(),
            skipped = registry.skipped,
            "parsed pair listing"
        );
        registry
    }

    /// Builds a registry from known pairs, without a listing.
    #[must_use]
    pub fn from_pairs<I, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Pair>,
    {
        let mut registry = Self::default();
        for pair in pairs {
            registry.insert(pair.into());
        }
        registry
    }

    fn insert(&mut self, pair: Pair) {
        if self.index.insert(pair.clone()) {
            self.pairs.push(pair);
        }
    }

    /// Returns the available pairs in listing order.
    #[must_use]
    pub fn available_pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Looks up a pair (case-insensitive).
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Pair> {
        self.index.get(&Pair::new(id))
    }

    /// Returns true if the pair is available (case-insensitive).
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns the number of available pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no pairs are available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the number of listing lines that were skipped as malformed.
    #[must_use]
    pub const fn skipped_lines(&self) -> usize {
        self.skipped
    }

    /// Returns all pairs as an iterator.
    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.iter()
    }

    /// Searches pairs containing the pattern (case-insensitive).
    pub fn search(&self, pattern: &str) -> Vec<&Pair> {
        let pattern = pattern.to_uppercase();
        self.pairs
            .iter()
            .filter(|p| p.as_str().contains(&pattern))
            .collect()
    }
}

/// Extracts the pair token from one listing line.
///
/// The token is the second whitespace-separated field, after its first
/// colon and before the next comma, with quotes stripped.
#[must_use]
pub fn parse_listing_line(line: &str) -> Option<Pair> {
    let field = line.split_whitespace().nth(1)?;
    let value = field.split(':').nth(1)?;
    let token = value.split(',').next()?.trim_matches('"');
    let pair = Pair::new(token);
    (!pair.is_empty()).then_some(pair)
}
