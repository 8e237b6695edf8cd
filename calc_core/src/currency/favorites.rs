//! Favorite currency pairs.
//!
//! An ordered, unbounded list of `(from, to, pinned)` entries. Front ends
//! show at most [`DEFAULT_DISPLAY_LIMIT`] of them.

use serde::{Deserialize, Serialize};

use super::codes::CurrencyCode;
use super::converter::Notice;

/// Default number of favorites shown at once
pub const DEFAULT_DISPLAY_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    #[serde(default)]
    pub pinned: bool,
}

impl CurrencyPair {
    pub fn new(from: CurrencyCode, to: CurrencyCode) -> Self {
        CurrencyPair {
            from,
            to,
            pinned: false,
        }
    }

    pub fn matches(&self, from: CurrencyCode, to: CurrencyCode) -> bool {
        self.from == from && self.to == to
    }

    /// `USD > THB`
    pub fn label(&self) -> String {
        format!("{} > {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favorites {
    pairs: Vec<CurrencyPair>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: Vec<CurrencyPair>) -> Self {
        let mut favorites = Favorites::new();
        for pair in pairs {
            if !favorites.contains(pair.from, pair.to) {
                favorites.pairs.push(pair);
            }
        }
        favorites
    }

    /// Rebuild from stored JSON entries, one at a time. An entry that no
    /// longer decodes (say, a currency dropped from the supported list) is
    /// skipped instead of discarding the whole list.
    pub fn from_stored(entries: Vec<serde_json::Value>) -> Self {
        let pairs = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<CurrencyPair>(entry) {
                Ok(pair) => Some(pair),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable favorite pair");
                    None
                }
            })
            .collect();
        Self::from_pairs(pairs)
    }

    pub fn pairs(&self) -> &[CurrencyPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, from: CurrencyCode, to: CurrencyCode) -> bool {
        self.pairs.iter().any(|p| p.matches(from, to))
    }

    /// Entries to show, in insertion order.
    pub fn displayed(&self, limit: usize) -> &[CurrencyPair] {
        &self.pairs[..self.pairs.len().min(limit)]
    }

    /// Append an unpinned pair. Already-present pairs are left alone and
    /// produce no notice.
    pub fn add(&mut self, from: CurrencyCode, to: CurrencyCode) -> Option<Notice> {
        if self.contains(from, to) {
            return None;
        }
        let pair = CurrencyPair::new(from, to);
        self.pairs.push(pair);
        Some(Notice::success(format!("Added {} to favorites!", pair.label())))
    }

    /// Flip the pinned flag of a pair. `None` when the pair is not a favorite.
    pub fn toggle_pin(&mut self, from: CurrencyCode, to: CurrencyCode) -> Option<Notice> {
        let pair = self.pairs.iter_mut().find(|p| p.matches(from, to))?;
        pair.pinned = !pair.pinned;
        let state = if pair.pinned { "pinned" } else { "unpinned" };
        Some(Notice::success(format!("{} {}!", pair.label(), state)))
    }

    pub fn clear(&mut self) -> Notice {
        self.pairs.clear();
        Notice::success("Favorites cleared!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    #[test]
    fn test_add_dedups_by_pair() {
        let mut favorites = Favorites::new();
        let notice = favorites.add(code("USD"), code("THB")).unwrap();
        assert_eq!(notice, Notice::success("Added USD > THB to favorites!"));

        assert!(favorites.add(code("USD"), code("THB")).is_none());
        assert_eq!(favorites.len(), 1);

        // Direction matters
        assert!(favorites.add(code("THB"), code("USD")).is_some());
        assert_eq!(favorites.len(), 2);
        assert!(!favorites.pairs()[0].pinned);
    }

    #[test]
    fn test_toggle_pin() {
        let mut favorites = Favorites::new();
        favorites.add(code("EUR"), code("JPY"));

        let pinned = favorites.toggle_pin(code("EUR"), code("JPY")).unwrap();
        assert_eq!(pinned.message, "EUR > JPY pinned!");
        assert!(favorites.pairs()[0].pinned);

        let unpinned = favorites.toggle_pin(code("EUR"), code("JPY")).unwrap();
        assert_eq!(unpinned.message, "EUR > JPY unpinned!");

        assert!(favorites.toggle_pin(code("GBP"), code("USD")).is_none());
    }

    #[test]
    fn test_display_limit_does_not_truncate_list() {
        let mut favorites = Favorites::new();
        for to in ["THB", "EUR", "JPY", "GBP", "KRW", "AUD"] {
            favorites.add(code("USD"), code(to));
        }
        assert_eq!(favorites.len(), 6);
        let shown = favorites.displayed(DEFAULT_DISPLAY_LIMIT);
        assert_eq!(shown.len(), 4);
        assert_eq!(shown[0].to, code("THB"));
    }

    #[test]
    fn test_clear() {
        let mut favorites = Favorites::new();
        favorites.add(code("USD"), code("THB"));
        assert_eq!(favorites.clear().message, "Favorites cleared!");
        assert!(favorites.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut favorites = Favorites::new();
        favorites.add(code("USD"), code("THB"));
        let json = serde_json::to_string(&favorites).unwrap();
        assert_eq!(json, r#"[{"from":"USD","to":"THB","pinned":false}]"#);

        let stored: Favorites =
            serde_json::from_str(r#"[{"from":"EUR","to":"USD"}]"#).unwrap();
        assert!(!stored.pairs()[0].pinned);
    }

    #[test]
    fn test_from_stored_skips_unreadable_entries() {
        let favorites = Favorites::from_stored(vec![
            json!({ "from": "USD", "to": "THB", "pinned": true }),
            json!({ "from": "XYZ", "to": "THB" }),
            json!("garbage"),
            json!({ "from": "EUR", "to": "JPY" }),
        ]);
        assert_eq!(favorites.len(), 2);
        assert!(favorites.pairs()[0].pinned);
        assert!(favorites.contains(code("EUR"), code("JPY")));
    }
}
