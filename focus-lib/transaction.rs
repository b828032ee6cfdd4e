//! The single mutation primitive of the engine.
//!
//! Every edit the engine wants to make is expressed as a [`Transaction`]: a
//! [`ChangeSet`] describing the text replacements plus the selection the
//! buffer should end up with. Hosts apply transactions through a path that
//! never re-enters the insertion hooks, so engine edits cannot re-trigger
//! themselves.
//!
//! A [`ChangeSet`] is a sequence of [`Operation`]s applied from the start of
//! the document:
//!
//! - **Retain(n)** - keep `n` characters
//! - **Delete(n)** - remove `n` characters
//! - **Insert(s)** - insert `s`
//!
//! ```
//! use focus_lib::{selection::Range, transaction::Transaction};
//! use ropey::Rope;
//!
//! let mut doc = Rope::from("hello world");
//! let tx = Transaction::change(&doc, [(6, 11, Some("rust".into()))])
//!   .unwrap()
//!   .with_selection(Range::point(10));
//! tx.apply(&mut doc).unwrap();
//! assert_eq!(doc, "hello rust");
//! ```

use ropey::{
  Rope,
  RopeSlice,
};
use thiserror::Error;

use crate::{
  Tendril,
  selection::Range,
};

pub type Result<T> = std::result::Result<T, TransactionError>;

/// (from, to) replacement.
pub type Change = (usize, usize, Option<Tendril>);

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransactionError {
  #[error("changeset length mismatch: expected {expected}, got {actual}")]
  LengthMismatch { expected: usize, actual: usize },
  #[error("invalid change range: start {from} is after end {to}")]
  InvalidRange { from: usize, to: usize },
  #[error("change range {from}..{to} is out of bounds for document length {len}")]
  RangeOutOfBounds {
    from: usize,
    to:   usize,
    len:  usize,
  },
  #[error("change range {from}..{to} overlaps previous end {prev_end}")]
  OverlappingRange {
    prev_end: usize,
    from:     usize,
    to:       usize,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
  /// Move past n characters.
  Retain(usize),

  /// Delete n characters.
  Delete(usize),

  /// Insert text at the current position.
  Insert(Tendril),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
  changes: Vec<Operation>,
  /// The required document length. Changes are refused unless it matches.
  len:     usize,
}

impl ChangeSet {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      changes: Vec::with_capacity(capacity),
      len:     0,
    }
  }

  #[must_use]
  pub fn new(doc: RopeSlice) -> Self {
    Self {
      changes: Vec::new(),
      len:     doc.len_chars(),
    }
  }

  pub fn delete(&mut self, n: usize) {
    if n == 0 {
      return;
    }

    self.len += n;

    if let Some(Operation::Delete(count)) = self.changes.last_mut() {
      *count += n;
    } else {
      self.changes.push(Operation::Delete(n));
    }
  }

  pub fn insert(&mut self, fragment: Tendril) {
    if fragment.is_empty() {
      return;
    }

    if let Some(Operation::Insert(prev)) = self.changes.last_mut() {
      prev.push_str(&fragment);
      return;
    }
    self.changes.push(Operation::Insert(fragment));
  }

  pub fn retain(&mut self, n: usize) {
    if n == 0 {
      return;
    }

    self.len += n;

    if let Some(Operation::Retain(count)) = self.changes.last_mut() {
      *count += n;
    } else {
      self.changes.push(Operation::Retain(n));
    }
  }

  fn ensure_len(&self, text_len: usize) -> Result<()> {
    if text_len != self.len {
      return Err(TransactionError::LengthMismatch {
        expected: self.len,
        actual:   text_len,
      });
    }
    Ok(())
  }

  /// Apply this changeset in-place.
  pub fn apply(&self, text: &mut Rope) -> Result<()> {
    self.ensure_len(text.len_chars())?;
    let mut pos = 0;

    for change in &self.changes {
      match change {
        Operation::Retain(n) => pos += n,
        Operation::Delete(n) => text.remove(pos..pos + *n),
        Operation::Insert(s) => {
          text.insert(pos, s);
          pos += s.chars().count();
        },
      }
    }

    Ok(())
  }

  pub fn changes_iter(&self) -> ChangeIterator<'_> {
    ChangeIterator {
      iter: self.changes.iter().peekable(),
      pos:  0,
    }
  }
}

/// Yields the changes of a [`ChangeSet`] as `(from, to, text)` replacements
/// in old-document coordinates.
pub struct ChangeIterator<'a> {
  iter: std::iter::Peekable<std::slice::Iter<'a, Operation>>,
  pos:  usize,
}

impl Iterator for ChangeIterator<'_> {
  type Item = Change;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      match self.iter.next()? {
        Operation::Retain(len) => {
          self.pos += len;
        },
        Operation::Delete(len) => {
          let start = self.pos;
          self.pos += len;
          return Some((start, self.pos, None));
        },
        Operation::Insert(s) => {
          let start = self.pos;
          // a following delete makes this a replacement
          if let Some(Operation::Delete(len)) = self.iter.peek() {
            self.iter.next();
            self.pos += len;
            return Some((start, self.pos, Some(s.clone())));
          }
          return Some((start, start, Some(s.clone())));
        },
      }
    }
  }
}

fn validate_change_bounds(from: usize, to: usize, len: usize) -> Result<()> {
  if from > to {
    return Err(TransactionError::InvalidRange { from, to });
  }
  if to > len {
    return Err(TransactionError::RangeOutOfBounds { from, to, len });
  }
  Ok(())
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transaction {
  changes:   ChangeSet,
  selection: Option<Range>,
}

impl From<ChangeSet> for Transaction {
  fn from(changes: ChangeSet) -> Self {
    Self {
      changes,
      selection: None,
    }
  }
}

impl Transaction {
  pub fn new(doc: &Rope) -> Self {
    Self {
      changes:   ChangeSet::new(doc.slice(..)),
      selection: None,
    }
  }

  /// When set, the selection the buffer ends up with.
  pub fn selection(&self) -> Option<&Range> {
    self.selection.as_ref()
  }

  /// Apply the text changes in-place. The selection is the caller's to set.
  pub fn apply(&self, doc: &mut Rope) -> Result<()> {
    self.changes.apply(doc)
  }

  pub fn with_selection(mut self, selection: Range) -> Self {
    self.selection = Some(selection);
    self
  }

  /// Build a transaction from sorted, non-overlapping changes.
  pub fn change<I>(doc: &Rope, changes: I) -> Result<Self>
  where
    I: IntoIterator<Item = Change>,
  {
    let len = doc.len_chars();
    let changes = changes.into_iter();
    let (lower, upper) = changes.size_hint();
    let mut changeset = ChangeSet::with_capacity(2 * upper.unwrap_or(lower) + 1);

    let mut last = 0;
    for (from, to, tendril) in changes {
      validate_change_bounds(from, to, len)?;
      if from < last {
        return Err(TransactionError::OverlappingRange {
          prev_end: last,
          from,
          to,
        });
      }

      changeset.retain(from - last);
      if let Some(text) = tendril {
        changeset.insert(text);
      }
      changeset.delete(to - from);
      last = to;
    }

    changeset.retain(len - last);

    Ok(Self::from(changeset))
  }

  /// Replace `range` with `text` and leave a caret right after it.
  pub fn replace(doc: &Rope, range: Range, text: Tendril) -> Result<Self> {
    let caret = range.from() + text.chars().count();
    Ok(Self::change(doc, [(range.from(), range.to(), Some(text))])?.with_selection(Range::point(caret)))
  }

  pub fn changes_iter(&self) -> ChangeIterator<'_> {
    self.changes.changes_iter()
  }
}
