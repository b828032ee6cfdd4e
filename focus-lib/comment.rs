//! Line comment toggling.
//!
//! ```
//! use focus_lib::{comment::toggle_line_comments, language::Language, selection::Range};
//! use ropey::Rope;
//!
//! let mut doc = Rope::from("a\n\n  b");
//! let tx = toggle_line_comments(&doc, &Range::new(0, 6), Language::CurlyBraceFamily).unwrap();
//! tx.apply(&mut doc).unwrap();
//! assert_eq!(doc, "// a\n\n  // b");
//! ```

use focus_core::rope::RopeSliceExt;
use ropey::Rope;
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

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommentError {
  #[error(transparent)]
  Transaction(#[from] TransactionError),
}

type Result<T> = std::result::Result<T, CommentError>;

/// Comment or uncomment every line `range` touches.
///
/// The lines are uncommented when each non-blank one already starts, after
/// its indentation, with the language's line comment token; the token and a
/// single space after it are removed. Otherwise every non-blank line gets
/// the token and a space inserted after its own indentation. Blank lines are
/// left alone. The touched lines end up selected in full.
pub fn toggle_line_comments(doc: &Rope, range: &Range, language: Language) -> Result<Transaction> {
  let text = doc.slice(..);
  let token = language.line_comment();
  let token_len = token.chars().count();

  let (first, last) = range.line_range(text);
  let start = text.line_to_char(first);
  let end = text.line_to_char(last + 1);

  // (line start, indentation width) of every non-blank line
  let lines: Vec<(usize, usize)> = (first..=last)
    .filter_map(|line| {
      let indent = text.line(line).first_non_whitespace_char()?;
      Some((text.line_to_char(line), indent))
    })
    .collect();

  let commented = !lines.is_empty()
    && lines
      .iter()
      .all(|&(line_start, indent)| text.slice(line_start + indent..).starts_with(token));

  let mut changes: Vec<Change> = Vec::with_capacity(lines.len());
  let mut new_end = end;
  for &(line_start, indent) in &lines {
    let pos = line_start + indent;
    if commented {
      let margin = usize::from(text.get_char(pos + token_len) == Some(' '));
      changes.push((pos, pos + token_len + margin, None));
      new_end -= token_len + margin;
    } else {
      let mut insert = Tendril::from(token);
      insert.push(' ');
      changes.push((pos, pos, Some(insert)));
      new_end += token_len + 1;
    }
  }

  tracing::debug!(first, last, commented, "toggling line comments");

  let selection = Range::new(start, new_end).with_direction(range.direction());
  Ok(Transaction::change(doc, changes)?.with_selection(selection))
}

#[cfg(test)]
mod test {
  use super::*;

  fn toggle(text: &str, range: Range, language: Language) -> (String, Range) {
    let mut doc = Rope::from(text);
    let tx = toggle_line_comments(&doc, &range, language).unwrap();
    tx.apply(&mut doc).unwrap();
    (doc.to_string(), *tx.selection().unwrap())
  }

  #[test]
  fn comments_non_blank_lines_at_their_indentation() {
    let text = "fn a() {\n\n  b\n}";
    let (out, selection) = toggle(text, Range::new(0, text.len()), Language::CurlyBraceFamily);
    assert_eq!(out, "// fn a() {\n\n  // b\n// }");
    assert_eq!(selection, Range::new(0, out.len()));
  }

  #[test]
  fn uncomments_when_every_line_is_commented() {
    let text = "// fn a() {\n\n  // b\n//c";
    let (out, _) = toggle(text, Range::new(0, text.len()), Language::CurlyBraceFamily);
    assert_eq!(out, "fn a() {\n\n  b\nc");
  }

  #[test]
  fn mixed_lines_are_commented() {
    let (out, _) = toggle("// a\nb", Range::new(0, 6), Language::CurlyBraceFamily);
    assert_eq!(out, "// // a\n// b");
  }

  #[test]
  fn uses_language_token() {
    let (out, _) = toggle("x = 1", Range::point(2), Language::IndentationSensitive);
    assert_eq!(out, "# x = 1");
    let (out, _) = toggle("    # x = 1", Range::point(0), Language::IndentationSensitive);
    assert_eq!(out, "    x = 1");
  }

  #[test]
  fn caret_selects_its_line() {
    let (out, selection) = toggle("x\ny", Range::point(0), Language::CurlyBraceFamily);
    assert_eq!(out, "// x\ny");
    assert_eq!(selection, Range::new(0, 5));

    let (out, selection) = toggle("x\ny", Range::new(3, 1), Language::CurlyBraceFamily);
    assert_eq!(out, "// x\n// y");
    assert_eq!(selection, Range::new(9, 0));
  }

  #[test]
  fn blank_lines_only_are_left_alone() {
    let (out, selection) = toggle("\n  \n", Range::new(0, 4), Language::CurlyBraceFamily);
    assert_eq!(out, "\n  \n");
    assert_eq!(selection, Range::new(0, 4));
  }

  #[test]
  fn toggling_twice_restores() {
    let text = "if x {\n  call()\n\n}\n";
    for language in [Language::CurlyBraceFamily, Language::IndentationSensitive] {
      let mut doc = Rope::from(text);
      let mut range = Range::new(0, text.len());
      for _ in 0..2 {
        let tx = toggle_line_comments(&doc, &range, language).unwrap();
        tx.apply(&mut doc).unwrap();
        range = *tx.selection().unwrap();
      }
      assert_eq!(doc, text);
    }
  }
}
