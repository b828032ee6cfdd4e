//! Token colouring for the editor surface.
//!
//! Strings and comments come straight from the [`lexer`](crate::lexer); the
//! remaining code is split into words and looked up in the language's
//! keyword and type tables. The result is a flat, ordered list of
//! non-overlapping [`Span`]s. Text not covered by a span is plain.

use std::ops::Range;

use focus_core::chars::{
  char_is_whitespace,
  char_is_word,
};
use ropey::RopeSlice;

use crate::{
  language::Language,
  lexer::{
    Classified,
    LexicalState,
    Scanner,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  Keyword,
  Type,
  Function,
  Number,
  String,
  Comment,
  Decorator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
  /// Char range.
  pub range: Range<usize>,
  pub kind:  TokenKind,
}

fn region_kind(state: LexicalState) -> Option<TokenKind> {
  match state {
    LexicalState::StringLiteral(_) => Some(TokenKind::String),
    state if state.is_comment() => Some(TokenKind::Comment),
    _ => None,
  }
}

/// Keywords that name a type with the identifier following them.
fn type_declaration_keywords(language: Language) -> &'static [&'static str] {
  match language {
    Language::CurlyBraceFamily => &[
      "class",
      "struct",
      "enum",
      "protocol",
      "actor",
      "extension",
      "typealias",
      "associatedtype",
    ],
    Language::IndentationSensitive => &[],
  }
}

/// `0x1F`, `0b101`, `0o17` or plain digits.
fn is_number(word: &str) -> bool {
  let digits = |s: &str, radix: u32| !s.is_empty() && s.chars().all(|ch| ch.is_digit(radix));
  if let Some(rest) = word.strip_prefix("0x") {
    return digits(rest, 16);
  }
  if let Some(rest) = word.strip_prefix("0b") {
    return digits(rest, 2);
  }
  if let Some(rest) = word.strip_prefix("0o") {
    return digits(rest, 8);
  }
  digits(word, 10)
}

struct Colorizer<'a> {
  chars:    &'a [Classified],
  language: Language,
  spans:    Vec<Span>,
  /// Kind given to the next word when only whitespace separates it from a
  /// declaration keyword.
  declared: Option<TokenKind>,
}

impl Colorizer<'_> {
  fn is_code(&self, pos: usize) -> bool {
    self
      .chars
      .get(pos)
      .is_some_and(|classified| classified.state.is_code())
  }

  fn is_code_where(&self, pos: usize, f: impl Fn(char) -> bool) -> bool {
    self.is_code(pos) && f(self.chars[pos].ch)
  }

  fn push(&mut self, range: Range<usize>, kind: TokenKind) {
    self.spans.push(Span { range, kind });
  }

  /// End of the run of code word chars starting at `pos`.
  fn word_end(&self, mut pos: usize) -> usize {
    while self.is_code_where(pos, char_is_word) {
      pos += 1;
    }
    pos
  }

  fn next_non_blank(&self, mut pos: usize) -> Option<char> {
    while self.is_code_where(pos, char_is_whitespace) {
      pos += 1;
    }
    self
      .is_code(pos)
      .then(|| self.chars[pos].ch)
  }

  fn region(&mut self, start: usize, kind: TokenKind) -> usize {
    let mut end = start + 1;
    while self
      .chars
      .get(end)
      .is_some_and(|classified| region_kind(classified.state) == Some(kind))
    {
      end += 1;
    }
    self.push(start..end, kind);
    end
  }

  fn number(&mut self, start: usize, end: usize, word: &str) -> usize {
    // a fraction only follows plain digits
    let mut end = end;
    if word.chars().all(|ch| ch.is_ascii_digit())
      && self.is_code_where(end, |ch| ch == '.')
      && self.is_code_where(end + 1, |ch| ch.is_ascii_digit())
    {
      let fraction_end = self.word_end(end + 1);
      if self.chars[end + 1..fraction_end]
        .iter()
        .all(|classified| classified.ch.is_ascii_digit())
      {
        self.push(start..fraction_end, TokenKind::Number);
        return fraction_end;
      }
    }

    if is_number(word) {
      self.push(start..end, TokenKind::Number);
    }
    end
  }

  fn word(&mut self, start: usize) -> usize {
    let end = self.word_end(start);
    let word: String = self.chars[start..end]
      .iter()
      .map(|classified| classified.ch)
      .collect();

    let declared = self.declared.take();
    if word.starts_with(|ch: char| ch.is_ascii_digit()) {
      return self.number(start, end, &word);
    }

    let language = self.language;
    let word = word.as_str();
    let kind = if language.keywords().contains(&word) {
      if language.declaration_keywords().contains(&word) {
        self.declared = Some(TokenKind::Function);
      } else if type_declaration_keywords(language).contains(&word) {
        self.declared = Some(TokenKind::Type);
      }
      Some(TokenKind::Keyword)
    } else if language.types().contains(&word) {
      Some(TokenKind::Type)
    } else if declared.is_some() {
      declared
    } else if self.next_non_blank(end) == Some('(') {
      Some(TokenKind::Function)
    } else {
      None
    };

    if let Some(kind) = kind {
      self.push(start..end, kind);
    }
    end
  }

  fn run(mut self) -> Vec<Span> {
    let mut pos = 0;
    while let Some(classified) = self.chars.get(pos).copied() {
      if let Some(kind) = region_kind(classified.state) {
        self.declared = None;
        pos = self.region(pos, kind);
        continue;
      }

      let ch = classified.ch;
      if Some(ch) == self.language.decorator_prefix() && self.is_code_where(pos + 1, char_is_word) {
        let end = self.word_end(pos + 1);
        self.declared = None;
        self.push(pos..end, TokenKind::Decorator);
        pos = end;
      } else if char_is_word(ch) {
        pos = self.word(pos);
      } else {
        if !char_is_whitespace(ch) {
          self.declared = None;
        }
        pos += 1;
      }
    }
    self.spans
  }
}

/// Colour spans for the whole of `text`.
pub fn colorize(text: RopeSlice, language: Language) -> Vec<Span> {
  let chars: Vec<Classified> = Scanner::new(text, language).collect();
  let spans = Colorizer {
    chars: &chars,
    language,
    spans: Vec::new(),
    declared: None,
  }
  .run();

  tracing::trace!(spans = spans.len(), "colorized");
  spans
}
