//! Structural editing of typed delimiters.
//!
//! [`hook`] is consulted before a single typed character is inserted. It
//! either returns a [`Transaction`] that replaces the default insertion or
//! `None` to let the host insert the character itself.
//!
//! # Rules
//!
//! Checked in this order, first hit wins:
//!
//! 1. **Wrap** - an opener (bracket or quote) typed over a selection
//!    surrounds it: `abc` → `(abc)`, caret right after `(`.
//! 2. **Skip quote** - a quote typed right before the same quote moves past
//!    it.
//! 3. **Insert pair** - an opener inserts itself and its closer with the
//!    caret in between: `|` → `(|)`.
//! 4. **Align closer** - a closing bracket typed into a line that holds only
//!    whitespace before the caret replaces that whitespace with the
//!    indentation of the line its opener is on.
//! 5. **Skip closer** - a closing bracket typed right before the same bracket
//!    moves past it: `(|)` → `()|`.
//!
//! Every transaction built here ends with a collapsed caret.
//!
//! ```
//! use focus_lib::{
//!   auto_pairs::hook,
//!   indent::IndentUnit,
//!   language::Language,
//!   selection::Range,
//! };
//! use ropey::Rope;
//!
//! let mut doc = Rope::from("abc");
//! let lang = Language::CurlyBraceFamily;
//! let tx = hook(&doc, &Range::new(0, 3), '(', lang, IndentUnit::Spaces(2))
//!   .unwrap()
//!   .unwrap();
//! tx.apply(&mut doc).unwrap();
//! assert_eq!(doc, "(abc)");
//! assert_eq!(tx.selection(), Some(&Range::point(1)));
//! ```

use focus_core::rope::RopeSliceExt;
use ropey::{
  Rope,
  RopeSlice,
};
use thiserror::Error;

use crate::{
  Tendril,
  indent::{
    IndentUnit,
    leading_indentation,
  },
  language::{
    BracketPair,
    Language,
  },
  match_brackets::match_backward,
  selection::Range,
  transaction::{
    Transaction,
    TransactionError,
  },
};

pub type Result<T> = std::result::Result<T, AutoPairsError>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum AutoPairsError {
  #[error(transparent)]
  Transaction(#[from] TransactionError),
}

/// Decide what typing `ch` over `range` does.
pub fn hook(
  doc: &Rope,
  range: &Range,
  ch: char,
  language: Language,
  unit: IndentUnit,
) -> Result<Option<Transaction>> {
  tracing::trace!("autopairs hook range: {:?}, char: {:?}", range, ch);

  let text = doc.slice(..);
  let cursor = range.cursor();

  if let Some(pair) = language.auto_pair(ch) {
    if !range.is_empty() {
      return wrap(doc, range, pair).map(Some);
    }
    if language.is_quote(ch) && text.get_char(cursor) == Some(ch) {
      tracing::trace!("skipping over existing quote");
      return Ok(Some(skip(doc, cursor)));
    }
    return insert_pair(doc, cursor, pair).map(Some);
  }

  if !language.is_auto_closer(ch) || !range.is_empty() {
    return Ok(None);
  }

  if let Some(transaction) = align_closer(doc, cursor, ch, language, unit)? {
    return Ok(Some(transaction));
  }

  if text.get_char(cursor) == Some(ch) {
    tracing::trace!("skipping over existing closer");
    return Ok(Some(skip(doc, cursor)));
  }

  Ok(None)
}

/// Entry point for host insertions. Only a single typed character is ever
/// handled; pastes and other multi-char insertions yield `None`.
pub fn intercept_insertion(
  doc: &Rope,
  range: &Range,
  text: &str,
  language: Language,
  unit: IndentUnit,
) -> Result<Option<Transaction>> {
  let mut chars = text.chars();
  let (Some(ch), None) = (chars.next(), chars.next()) else {
    return Ok(None);
  };
  hook(doc, range, ch, language, unit)
}

fn wrap(doc: &Rope, range: &Range, pair: BracketPair) -> Result<Transaction> {
  let text = doc.slice(..);
  let mut wrapped = Tendril::new();
  wrapped.push(pair.open);
  for chunk in range.slice(text).chunks() {
    wrapped.push_str(chunk);
  }
  wrapped.push(pair.close);

  let from = range.from();
  let transaction =
    Transaction::change(doc, [(from, range.to(), Some(wrapped))])?.with_selection(Range::point(from + 1));
  tracing::debug!("wrapping {}..{} in {}{}", from, range.to(), pair.open, pair.close);
  Ok(transaction)
}

fn insert_pair(doc: &Rope, cursor: usize, pair: BracketPair) -> Result<Transaction> {
  let mut text = Tendril::new();
  text.push(pair.open);
  text.push(pair.close);

  let transaction = Transaction::change(doc, [(cursor, cursor, Some(text))])?.with_selection(Range::point(cursor + 1));
  tracing::debug!("inserting pair {}{} at {}", pair.open, pair.close, cursor);
  Ok(transaction)
}

fn skip(doc: &Rope, cursor: usize) -> Transaction {
  Transaction::new(doc).with_selection(Range::point(cursor + 1))
}

/// Start of the line holding `pos` when everything between it and `pos` is
/// whitespace.
fn blank_prefix_start(text: RopeSlice, pos: usize) -> Option<usize> {
  let line_start = text.line_to_char(text.char_to_line(pos));
  text
    .slice(line_start..pos)
    .is_whitespace_only()
    .then_some(line_start)
}

fn align_closer(
  doc: &Rope,
  cursor: usize,
  closer: char,
  language: Language,
  unit: IndentUnit,
) -> Result<Option<Transaction>> {
  let text = doc.slice(..);
  let Some(line_start) = blank_prefix_start(text, cursor) else {
    return Ok(None);
  };
  let Some(open) = match_backward(text, cursor, closer, language) else {
    tracing::trace!("no opener for {:?}, not aligning", closer);
    return Ok(None);
  };

  let mut insert = leading_indentation(text.line(text.char_to_line(open)), unit);
  insert.push(closer);
  let caret = line_start + insert.chars().count();

  let transaction = Transaction::change(doc, [(line_start, cursor, Some(insert))])?.with_selection(Range::point(caret));
  tracing::debug!("aligning {:?} with opener at {}", closer, open);
  Ok(Some(transaction))
}
