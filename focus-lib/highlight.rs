//! Matched-bracket highlighting.
//!
//! [`BracketHighlighter`] remembers the ranges it last decorated and nothing
//! else. Each update reports those ranges as cleared before reporting the
//! new ones, so a host that undecorates `cleared` and decorates `applied`
//! never leaves a stale mark behind.

use bitflags::bitflags;
use ropey::RopeSlice;
use smallvec::SmallVec;

use crate::{
  language::Language,
  match_brackets::find_match,
  selection::Range,
};

bitflags! {
  /// Text decoration applied to a range.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct Emphasis: u8 {
    const BOLD      = 0b0000_0001;
    const UNDERLINE = 0b0000_0010;
  }
}

/// Emphasis used for both brackets of the current match.
pub const MATCH_EMPHASIS: Emphasis = Emphasis::BOLD.union(Emphasis::UNDERLINE);

pub type HighlightRanges = SmallVec<[Range; 2]>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HighlightUpdate {
  /// Ranges to undecorate, exactly the ones applied last time.
  pub cleared: HighlightRanges,
  /// The two bracket cells of the current match, or nothing.
  pub applied: HighlightRanges,
}

#[derive(Debug, Default, Clone)]
pub struct BracketHighlighter {
  applied: HighlightRanges,
}

impl BracketHighlighter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Currently decorated ranges.
  pub fn applied(&self) -> &[Range] {
    &self.applied
  }

  /// Forget the applied ranges and hand them back for undecorating.
  pub fn clear(&mut self) -> HighlightRanges {
    std::mem::take(&mut self.applied)
  }

  /// Recompute the match for `range` and replace the applied ranges with it.
  pub fn update(&mut self, text: RopeSlice, range: Range, language: Language) -> HighlightUpdate {
    let cleared = self.clear();
    let applied: HighlightRanges = find_match(text, range, language)
      .map(|found| HighlightRanges::from(found.ranges()))
      .unwrap_or_default();

    tracing::trace!(?cleared, ?applied, "bracket highlight");
    self.applied = applied.clone();
    HighlightUpdate { cleared, applied }
  }
}

#[cfg(test)]
mod test {
  use ropey::Rope;

  use super::*;

  const CURLY: Language = Language::CurlyBraceFamily;

  #[test]
  fn applies_both_bracket_cells() {
    let doc = Rope::from("f(x)");
    let mut highlighter = BracketHighlighter::new();
    let update = highlighter.update(doc.slice(..), Range::point(1), CURLY);
    assert!(update.cleared.is_empty());
    assert_eq!(update.applied.as_slice(), &[Range::new(1, 2), Range::new(3, 4)]);
    assert_eq!(highlighter.applied(), update.applied.as_slice());
  }

  #[test]
  fn repeated_updates_clear_exactly_what_was_applied() {
    let doc = Rope::from("f(x)");
    let text = doc.slice(..);
    let mut highlighter = BracketHighlighter::new();

    let first = highlighter.update(text, Range::point(1), CURLY);
    let second = highlighter.update(text, Range::point(1), CURLY);
    assert_eq!(second.cleared, first.applied);
    assert_eq!(second.applied, first.applied);
    assert_eq!(highlighter.applied().len(), 2);
  }

  #[test]
  fn no_match_applies_nothing() {
    let doc = Rope::from("f(x) y");
    let text = doc.slice(..);
    let mut highlighter = BracketHighlighter::new();
    highlighter.update(text, Range::point(4), CURLY);

    let update = highlighter.update(text, Range::point(6), CURLY);
    assert_eq!(update.cleared.as_slice(), &[Range::new(1, 2), Range::new(3, 4)]);
    assert!(update.applied.is_empty());
    assert!(highlighter.applied().is_empty());
  }

  #[test]
  fn clear_hands_back_and_forgets() {
    let doc = Rope::from("[]");
    let mut highlighter = BracketHighlighter::new();
    highlighter.update(doc.slice(..), Range::point(0), CURLY);
    assert_eq!(highlighter.clear().len(), 2);
    assert!(highlighter.clear().is_empty());
  }

  #[test]
  fn match_emphasis_is_bold_and_underlined() {
    assert!(MATCH_EMPHASIS.contains(Emphasis::BOLD));
    assert!(MATCH_EMPHASIS.contains(Emphasis::UNDERLINE));
  }
}
