//! Lexical classification of buffer positions.
//!
//! The [`Scanner`] walks a buffer from its start and tags every character as
//! code, line comment, block comment or string literal. Bracket matching only
//! ever looks at characters tagged [`LexicalState::Code`], which is what keeps
//! `"{"` or `// }` from unbalancing a scan.
//!
//! Rules, in the order they are checked while in code:
//!
//! 1. A comment start (the language's line comment token, or its block
//!    comment start) opens a comment. Line comments end with, and include,
//!    the next line break. Block comments end at the first block comment end
//!    token; they do not nest.
//! 2. A quote opens a string literal closed by the same quote. Inside a
//!    string, `\` consumes itself and the following character, whatever it
//!    is. A string that is never closed runs to the end of the buffer.
//! 3. Anything else is code.
//!
//! There is no per-line state cache: every query rescans from the buffer
//! start, so the cost is linear in the distance scanned.
//!
//! ```
//! use focus_lib::{language::Language, lexer::{LexicalState, state_at}};
//! use ropey::Rope;
//!
//! let doc = Rope::from("x = \"}\" // {");
//! let text = doc.slice(..);
//! let lang = Language::CurlyBraceFamily;
//! assert_eq!(state_at(text, 0, lang), Some(LexicalState::Code));
//! assert_eq!(state_at(text, 5, lang), Some(LexicalState::StringLiteral('"')));
//! assert_eq!(state_at(text, 11, lang), Some(LexicalState::LineComment));
//! ```

use std::iter::Peekable;

use ropey::{
  RopeSlice,
  iter::Chars,
};

use crate::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexicalState {
  Code,
  LineComment,
  BlockComment,
  /// Inside a string opened by the given quote.
  StringLiteral(char),
}

impl LexicalState {
  #[inline]
  pub fn is_code(self) -> bool {
    self == Self::Code
  }

  #[inline]
  pub fn is_comment(self) -> bool {
    matches!(self, Self::LineComment | Self::BlockComment)
  }
}

/// One scanned character and the state it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
  pub pos:   usize,
  pub ch:    char,
  pub state: LexicalState,
}

/// Comment and quote tokens, resolved once per scan.
#[derive(Debug, Clone, Copy)]
struct Tokens {
  language:    Language,
  line:        (char, Option<char>),
  block_start: Option<(char, Option<char>)>,
  block_end:   Option<(char, Option<char>)>,
}

fn split_token(token: &str) -> (char, Option<char>) {
  let mut chars = token.chars();
  // comment tokens are one or two chars long and never empty
  let first = chars.next().unwrap_or('\0');
  (first, chars.next())
}

fn token_at(token: (char, Option<char>), ch: char, next: Option<char>) -> bool {
  match token {
    (first, None) => first == ch,
    (first, second) => first == ch && second == next,
  }
}

impl Tokens {
  fn new(language: Language) -> Self {
    let block = language.block_comment();
    Self {
      language,
      line: split_token(language.line_comment()),
      block_start: block.map(|tokens| split_token(tokens.start)),
      block_end: block.map(|tokens| split_token(tokens.end)),
    }
  }
}

/// Iterator over [`Classified`] characters from the start of a buffer.
///
/// Two-character tokens (`//`, `/*`, `*/`, an escape pair) are classified as
/// a unit, and the lookahead used to recognise them is not clipped by the
/// scan bound. The state reported for a position therefore never depends on
/// where the scan stops.
pub struct Scanner<'a> {
  chars:  Peekable<Chars<'a>>,
  tokens: Tokens,
  pos:    usize,
  end:    usize,
  state:  LexicalState,
  /// Class of the second half of a two-character token, and the state that
  /// follows it.
  carry:  Option<(LexicalState, LexicalState)>,
}

impl<'a> Scanner<'a> {
  pub fn new(text: RopeSlice<'a>, language: Language) -> Self {
    Self::until(text, language, text.len_chars())
  }

  /// Scan `[0, end)`; `end` is clamped to the buffer length.
  pub fn until(text: RopeSlice<'a>, language: Language, end: usize) -> Self {
    Self {
      chars: text.chars().peekable(),
      tokens: Tokens::new(language),
      pos: 0,
      end: end.min(text.len_chars()),
      state: LexicalState::Code,
      carry: None,
    }
  }

  /// Only the characters in code, i.e. the ones that can be structural.
  pub fn code(self) -> impl Iterator<Item = Classified> + 'a {
    self.filter(|classified| classified.state.is_code())
  }

  fn classify(&mut self, ch: char, next: Option<char>) -> LexicalState {
    use LexicalState::*;

    match self.state {
      Code => {
        if token_at(self.tokens.line, ch, next) {
          if self.tokens.line.1.is_some() {
            self.carry = Some((LineComment, LineComment));
          }
          self.state = LineComment;
          LineComment
        } else if let Some(start) = self
          .tokens
          .block_start
          .filter(|&start| token_at(start, ch, next))
        {
          if start.1.is_some() {
            self.carry = Some((BlockComment, BlockComment));
          }
          self.state = BlockComment;
          BlockComment
        } else if self.tokens.language.is_quote(ch) {
          self.state = StringLiteral(ch);
          self.state
        } else {
          Code
        }
      },
      LineComment => {
        if ch == '\n' {
          self.state = Code;
        }
        LineComment
      },
      BlockComment => {
        if let Some(end) = self.tokens.block_end.filter(|&end| token_at(end, ch, next)) {
          if end.1.is_some() {
            self.carry = Some((BlockComment, Code));
          } else {
            self.state = Code;
          }
        }
        BlockComment
      },
      StringLiteral(delimiter) => {
        if ch == '\\' {
          self.carry = Some((self.state, self.state));
        } else if ch == delimiter {
          self.state = Code;
        }
        StringLiteral(delimiter)
      },
    }
  }
}

impl Iterator for Scanner<'_> {
  type Item = Classified;

  fn next(&mut self) -> Option<Self::Item> {
    if self.pos >= self.end {
      return None;
    }
    let ch = self.chars.next()?;
    let pos = self.pos;
    self.pos += 1;

    let state = match self.carry.take() {
      Some((class, after)) => {
        self.state = after;
        class
      },
      None => {
        let next = self.chars.peek().copied();
        self.classify(ch, next)
      },
    };

    Some(Classified { pos, ch, state })
  }
}

/// Lexical state of every position in `[0, upto)`.
pub fn classify(text: RopeSlice, upto: usize, language: Language) -> Vec<LexicalState> {
  Scanner::until(text, language, upto)
    .map(|classified| classified.state)
    .collect()
}

/// Lexical state of the character at `pos`, or `None` past the buffer end.
pub fn state_at(text: RopeSlice, pos: usize, language: Language) -> Option<LexicalState> {
  if pos >= text.len_chars() {
    return None;
  }
  Scanner::until(text, language, pos + 1)
    .last()
    .filter(|classified| classified.pos == pos)
    .map(|classified| classified.state)
}
