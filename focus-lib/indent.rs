//! Indentation management: newline, tab, outdent and backspace-dedent.
//!
//! All entry points take the document and the current [`Range`] and return a
//! [`Transaction`] carrying the new selection. Indentation is always measured
//! in [`IndentUnit`]s; a tab found in existing leading whitespace counts as
//! one full unit.
//!
//! ```
//! use focus_lib::{
//!   indent::{IndentUnit, handle_newline},
//!   language::Language,
//!   selection::Range,
//! };
//! use ropey::Rope;
//!
//! let mut doc = Rope::from("func f() {}");
//! let unit = IndentUnit::Spaces(2);
//! let tx = handle_newline(&doc, &Range::point(10), Language::CurlyBraceFamily, unit).unwrap();
//! tx.apply(&mut doc).unwrap();
//! assert_eq!(doc, "func f() {\n  \n}");
//! assert_eq!(tx.selection(), Some(&Range::point(13)));
//! ```

use focus_core::{
  chars::char_is_indent,
  line_ending::{
    DEFAULT_LINE_ENDING,
    auto_detect_line_ending,
  },
  rope::RopeSliceExt,
};
use ropey::{
  Rope,
  RopeSlice,
};
use thiserror::Error;

use crate::{
  Tendril,
  language::Language,
  selection::Range,
  transaction::{
    Change,
    Transaction,
    TransactionError,
  },
};

/// Widest indent unit made of spaces.
pub const MAX_INDENT: usize = 16;
const SPACES: &str = "                ";

pub type Result<T> = std::result::Result<T, IndentError>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum IndentError {
  #[error(transparent)]
  Transaction(#[from] TransactionError),
}

/// The whitespace inserted for one indentation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndentUnit {
  Tabs,
  /// Between 1 and [`MAX_INDENT`] spaces.
  Spaces(u8),
}

impl IndentUnit {
  pub fn for_language(language: Language) -> Self {
    Self::Spaces(language.default_indent_width() as u8)
  }

  pub fn as_str(&self) -> &'static str {
    match *self {
      Self::Tabs => "\t",
      Self::Spaces(n) => &SPACES[..(n as usize).clamp(1, MAX_INDENT)],
    }
  }

  /// Length of one unit in chars.
  pub fn len(&self) -> usize {
    self.as_str().len()
  }

  fn tendril(&self) -> Tendril {
    Tendril::from(self.as_str())
  }
}

impl Default for IndentUnit {
  fn default() -> Self {
    Self::for_language(Language::default())
  }
}

/// The leading spaces and tabs of `line`, with every tab replaced by `unit`.
pub fn leading_indentation(line: RopeSlice, unit: IndentUnit) -> Tendril {
  let mut indent = Tendril::new();
  for ch in line.chars().take_while(|&ch| char_is_indent(ch)) {
    match ch {
      '\t' => indent.push_str(unit.as_str()),
      _ => indent.push(ch),
    }
  }
  indent
}

/// Start of the line holding `pos`, and the text between it and `pos`.
fn line_prefix(text: RopeSlice, pos: usize) -> (usize, RopeSlice) {
  let line_start = text.line_to_char(text.char_to_line(pos));
  (line_start, text.slice(line_start..pos))
}

/// Replace the selection with a line break and the indentation the new line
/// should start with.
///
/// The new line keeps the indentation of the text before the caret, plus one
/// unit when that text (trimmed) ends in one of the language's indent
/// triggers. If it ends in an unbalanced `{` and a `}` follows the selection,
/// the closing brace is pushed onto its own line at the original indentation
/// and the caret is left on the indented line in between.
pub fn handle_newline(
  doc: &Rope,
  range: &Range,
  language: Language,
  unit: IndentUnit,
) -> Result<Transaction> {
  let text = doc.slice(..);
  let from = range.from();
  let (_, prefix) = line_prefix(text, from);

  let indent = leading_indentation(prefix, unit);
  let trimmed = prefix.to_string();
  let trimmed = trimmed.trim_matches(char_is_indent);
  let last = trimmed.chars().next_back();

  let increase = last.is_some_and(|ch| language.indent_triggers().contains(&ch));
  let split = last == Some('{')
    && trimmed.matches('{').count() > trimmed.matches('}').count()
    && text.get_char(range.to()) == Some('}');

  let line_ending = auto_detect_line_ending(doc).unwrap_or(DEFAULT_LINE_ENDING);

  let mut insert = Tendril::from(line_ending.as_str());
  insert.push_str(&indent);
  if increase {
    insert.push_str(unit.as_str());
  }
  let caret = from + insert.chars().count();

  if split {
    insert.push_str(line_ending.as_str());
    insert.push_str(&indent);
  }

  tracing::trace!(increase, split, "newline indentation: {:?}", indent);

  let transaction =
    Transaction::change(doc, [(from, range.to(), Some(insert))])?.with_selection(Range::point(caret));
  Ok(transaction)
}

/// Start of the first touched line, and end of the last touched line
/// including its line ending.
fn touched_lines(text: RopeSlice, range: &Range) -> (usize, usize, usize, usize) {
  let (first, last) = range.line_range(text);
  (first, last, text.line_to_char(first), text.line_to_char(last + 1))
}

/// Indent.
///
/// A caret gets one unit inserted at its position. A selection has one unit
/// prepended to every line it touches and is then extended to cover those
/// lines in full, keeping its direction.
pub fn handle_tab(doc: &Rope, range: &Range, unit: IndentUnit) -> Result<Transaction> {
  if range.is_empty() {
    return Ok(Transaction::replace(doc, *range, unit.tendril())?);
  }

  let text = doc.slice(..);
  let (first, last, start, end) = touched_lines(text, range);
  let changes = (first..=last).map(|line| {
    let pos = text.line_to_char(line);
    (pos, pos, Some(unit.tendril()))
  });

  let transaction = Transaction::change(doc, changes)?;
  let end = end + (last - first + 1) * unit.len();
  let selection = Range::new(start, end).with_direction(range.direction());

  tracing::debug!(first, last, "indented lines");
  Ok(transaction.with_selection(selection))
}

/// How many leading chars of `line` one outdent step removes.
fn outdent_len(line: RopeSlice, unit: IndentUnit) -> usize {
  if line.starts_with(unit.as_str()) {
    return unit.len();
  }
  if line.get_char(0) == Some('\t') {
    return 1;
  }
  line
    .chars()
    .take_while(|&ch| ch == ' ')
    .count()
    .min(unit.len())
}

/// Outdent.
///
/// A caret delegates to [`handle_backspace`] and yields `None` when that does
/// not apply. A selection loses, on every touched line, one unit of leading
/// spaces, else one tab, else whatever leading spaces it has up to the unit
/// width. The touched lines are reselected in full.
pub fn handle_backtab(doc: &Rope, range: &Range, unit: IndentUnit) -> Result<Option<Transaction>> {
  if range.is_empty() {
    return handle_backspace(doc, range, unit);
  }

  let text = doc.slice(..);
  let (first, last, start, end) = touched_lines(text, range);

  let mut removed = 0;
  let mut changes: Vec<Change> = Vec::with_capacity(last - first + 1);
  for line in first..=last {
    let len = outdent_len(text.line(line), unit);
    if len == 0 {
      continue;
    }
    let pos = text.line_to_char(line);
    changes.push((pos, pos + len, None));
    removed += len;
  }

  let transaction = Transaction::change(doc, changes)?;
  let selection = Range::new(start, end - removed).with_direction(range.direction());

  tracing::debug!(first, last, removed, "outdented lines");
  Ok(Some(transaction.with_selection(selection)))
}

/// Backspace inside leading whitespace removes up to one unit's width of the
/// whitespace before the caret. Anything else, including a non-empty
/// selection, yields `None` so the host falls back to its own deletion.
pub fn handle_backspace(doc: &Rope, range: &Range, unit: IndentUnit) -> Result<Option<Transaction>> {
  if !range.is_empty() {
    return Ok(None);
  }

  let text = doc.slice(..);
  let caret = range.cursor();
  let (_, prefix) = line_prefix(text, caret);
  if prefix.len_chars() == 0 || !prefix.is_whitespace_only() {
    return Ok(None);
  }

  let remove = unit.len().min(prefix.len_chars());
  let from = caret - remove;
  let transaction = Transaction::change(doc, [(from, caret, None)])?.with_selection(Range::point(from));
  Ok(Some(transaction))
}
