//! Structural bracket matching.
//!
//! Matching runs on top of the [`lexer`](crate::lexer): only brackets in
//! [`LexicalState::Code`](crate::lexer::LexicalState::Code) count, so braces
//! inside strings and comments are ignored. Unbalanced or unmatched brackets
//! never error, they simply produce no match.
//!
//! ```
//! use focus_lib::{
//!   language::Language,
//!   match_brackets::{BracketMatch, find_match},
//!   selection::Range,
//! };
//! use ropey::Rope;
//!
//! let doc = Rope::from("a { brace inside \"{quoted}\" here } end");
//! let text = doc.slice(..);
//! let found = find_match(text, Range::point(2), Language::CurlyBraceFamily);
//! assert_eq!(found, Some(BracketMatch { open: 2, close: 33 }));
//! ```

use ropey::RopeSlice;

use crate::{
  language::Language,
  lexer::{
    Scanner,
    state_at,
  },
  selection::Range,
};

/// Positions of a matched bracket pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BracketMatch {
  pub open:  usize,
  pub close: usize,
}

impl BracketMatch {
  /// The half-open range strictly between the two brackets.
  pub fn interior(&self) -> Range {
    Range::new(self.open + 1, self.close)
  }

  /// One-character ranges covering each bracket.
  pub fn ranges(&self) -> [Range; 2] {
    [
      Range::new(self.open, self.open + 1),
      Range::new(self.close, self.close + 1),
    ]
  }
}

/// Scans right of `open_pos` for the `closer` that balances the opener there.
/// Only `opener`/`closer` in code adjust the depth.
pub fn match_forward(
  text: RopeSlice,
  open_pos: usize,
  opener: char,
  closer: char,
  language: Language,
) -> Option<usize> {
  let mut depth = 0usize;

  for classified in Scanner::new(text, language)
    .code()
    .skip_while(|classified| classified.pos <= open_pos)
  {
    if classified.ch == opener {
      depth += 1;
    } else if classified.ch == closer {
      if depth == 0 {
        return Some(classified.pos);
      }
      depth -= 1;
    }
  }

  None
}

/// Finds the opener of the `closer` at `close_pos` with a single forward scan
/// from the buffer start. Openers in code are pushed on a stack, closers pop
/// a matching top and are otherwise ignored. The answer is the most recent
/// opener of the right kind still on the stack.
pub fn match_backward(
  text: RopeSlice,
  close_pos: usize,
  closer: char,
  language: Language,
) -> Option<usize> {
  let opener = language.opener_for(closer)?;
  let mut stack: Vec<(char, usize)> = Vec::with_capacity(16);

  for classified in Scanner::until(text, language, close_pos).code() {
    if language.is_open_bracket(classified.ch) {
      stack.push((classified.ch, classified.pos));
      continue;
    }

    let Some(open) = language.opener_for(classified.ch) else {
      continue;
    };
    if stack.last().map(|&(ch, _)| ch) == Some(open) {
      stack.pop();
    }
  }

  stack
    .iter()
    .rev()
    .find(|&&(ch, _)| ch == opener)
    .map(|&(_, pos)| pos)
}

/// Match the bracket at `pos`, if it is a structural bracket.
pub fn find_matching_bracket(text: RopeSlice, pos: usize, language: Language) -> Option<BracketMatch> {
  let ch = text.get_char(pos)?;
  let pair = language.bracket_pair(ch)?;
  if !state_at(text, pos, language)?.is_code() {
    return None;
  }

  if ch == pair.open {
    match_forward(text, pos, pair.open, pair.close, language).map(|close| BracketMatch { open: pos, close })
  } else {
    match_backward(text, pos, pair.close, language).map(|open| BracketMatch { open, close: pos })
  }
}

/// The char at the caret, then the one before it.
fn caret_candidates(caret: usize) -> impl Iterator<Item = usize> {
  std::iter::once(caret).chain(caret.checked_sub(1))
}

/// The bracket pair the caret or selection refers to.
///
/// A non-empty selection whose neighbours are an exact opener/closer pair is
/// answered directly. Otherwise the char at the caret and the char before it
/// are tried in that order; the first structural bracket with a counterpart
/// wins.
pub fn find_match(text: RopeSlice, range: Range, language: Language) -> Option<BracketMatch> {
  if !range.is_empty() && range.from() > 0 {
    let open = range.from() - 1;
    let close = range.to();
    if let (Some(open_ch), Some(close_ch)) = (text.get_char(open), text.get_char(close))
      && language.closer_for(open_ch) == Some(close_ch)
      && language.is_open_bracket(open_ch)
    {
      return Some(BracketMatch { open, close });
    }
  }

  caret_candidates(range.cursor()).find_map(|pos| find_matching_bracket(text, pos, language))
}

/// Interior of the pair next to `pos`, for selecting a bracketed block by
/// double-clicking one of its brackets.
pub fn select_enclosed(text: RopeSlice, pos: usize, language: Language) -> Option<Range> {
  caret_candidates(pos)
    .find_map(|pos| find_matching_bracket(text, pos, language))
    .map(|found| found.interior())
}
