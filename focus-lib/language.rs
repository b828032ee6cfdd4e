//! Per-language constant tables.
//!
//! The editor supports two language families. Everything that differs between
//! them (bracket set, comment tokens, indent triggers, indent width, word
//! tables) hangs off [`Language`] as `const` data.

use serde::Deserialize;

/// An opener/closer pair of structural brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BracketPair {
  pub open:  char,
  pub close: char,
}

impl BracketPair {
  const fn new(open: char, close: char) -> Self {
    Self { open, close }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCommentTokens {
  pub start: &'static str,
  pub end:   &'static str,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Language {
  /// C-like syntax: braces delimit blocks, `//` and `/* */` comments,
  /// angle brackets take part in pairing.
  #[default]
  #[serde(alias = "swift")]
  CurlyBraceFamily,
  /// Python-like syntax: a trailing `:` opens a block and `#` starts a comment.
  #[serde(alias = "python")]
  IndentationSensitive,
}

const CURLY_BRACKETS: &[BracketPair] = &[
  BracketPair::new('{', '}'),
  BracketPair::new('(', ')'),
  BracketPair::new('[', ']'),
  BracketPair::new('<', '>'),
];

const INDENTATION_BRACKETS: &[BracketPair] = &[
  BracketPair::new('{', '}'),
  BracketPair::new('(', ')'),
  BracketPair::new('[', ']'),
];

const QUOTES: &[char] = &['"', '\''];

/// Delimiters completed as they are typed. Angle brackets are matched but
/// never auto-paired.
const AUTO_PAIRS: &[BracketPair] = &[
  BracketPair::new('{', '}'),
  BracketPair::new('(', ')'),
  BracketPair::new('[', ']'),
  BracketPair::new('"', '"'),
  BracketPair::new('\'', '\''),
];

const CURLY_INDENT_TRIGGERS: &[char] = &['{', '(', '['];
const INDENTATION_INDENT_TRIGGERS: &[char] = &['{', '(', '[', ':'];

const CURLY_KEYWORDS: &[&str] = &[
  "func", "var", "let", "if", "else", "for", "while", "return", "import", "struct", "class",
  "enum", "case", "switch", "guard", "defer", "true", "false", "nil", "self", "Self", "init",
  "deinit", "static", "private", "public", "internal", "fileprivate", "open", "override",
  "mutating", "throws", "throw", "try", "catch", "async", "await", "in", "where", "extension",
  "protocol", "typealias", "associatedtype", "inout", "break", "continue", "fallthrough",
  "default", "do", "repeat", "is", "as", "super", "convenience", "required", "final", "lazy",
  "weak", "unowned", "optional", "some", "any",
];

const CURLY_TYPES: &[&str] = &[
  "String", "Int", "Double", "Float", "Bool", "Array", "Dictionary", "Set", "Optional", "Any",
  "AnyObject", "Void", "Never", "Error", "Result", "UUID", "Data", "Date", "URL", "Character",
  "Substring", "Int8", "Int16", "Int32", "Int64", "UInt", "UInt8", "UInt16", "UInt32", "UInt64",
  "CGFloat", "CGPoint", "CGSize", "CGRect", "NSRange",
];

const INDENTATION_KEYWORDS: &[&str] = &[
  "def", "class", "if", "elif", "else", "for", "while", "return", "import", "from", "as", "try",
  "except", "finally", "raise", "with", "pass", "break", "continue", "True", "False", "None",
  "and", "or", "not", "in", "is", "lambda", "global", "nonlocal", "yield", "async", "await",
  "assert", "del", "print", "self", "super",
];

const INDENTATION_TYPES: &[&str] = &[
  "str", "int", "float", "bool", "list", "dict", "set", "tuple", "type", "object", "Exception",
  "List", "Dict", "Set", "Tuple", "Optional", "Union", "Any", "Callable", "Iterator", "Iterable",
  "Generator", "Sequence", "Mapping",
];

impl Language {
  /// Structural brackets tracked for nesting and matching.
  pub const fn brackets(self) -> &'static [BracketPair] {
    match self {
      Self::CurlyBraceFamily => CURLY_BRACKETS,
      Self::IndentationSensitive => INDENTATION_BRACKETS,
    }
  }

  /// String delimiters. Each quote closes itself.
  pub const fn quotes(self) -> &'static [char] {
    QUOTES
  }

  pub const fn line_comment(self) -> &'static str {
    match self {
      Self::CurlyBraceFamily => "//",
      Self::IndentationSensitive => "#",
    }
  }

  pub const fn block_comment(self) -> Option<BlockCommentTokens> {
    match self {
      Self::CurlyBraceFamily => Some(BlockCommentTokens {
        start: "/*",
        end:   "*/",
      }),
      Self::IndentationSensitive => None,
    }
  }

  /// Line endings (after trimming) that open a new indentation level.
  pub const fn indent_triggers(self) -> &'static [char] {
    match self {
      Self::CurlyBraceFamily => CURLY_INDENT_TRIGGERS,
      Self::IndentationSensitive => INDENTATION_INDENT_TRIGGERS,
    }
  }

  /// Width in spaces of one indentation level unless configured otherwise.
  pub const fn default_indent_width(self) -> usize {
    match self {
      Self::CurlyBraceFamily => 2,
      Self::IndentationSensitive => 4,
    }
  }

  pub const fn keywords(self) -> &'static [&'static str] {
    match self {
      Self::CurlyBraceFamily => CURLY_KEYWORDS,
      Self::IndentationSensitive => INDENTATION_KEYWORDS,
    }
  }

  pub const fn types(self) -> &'static [&'static str] {
    match self {
      Self::CurlyBraceFamily => CURLY_TYPES,
      Self::IndentationSensitive => INDENTATION_TYPES,
    }
  }

  /// Keywords whose following identifier names a function or type.
  pub const fn declaration_keywords(self) -> &'static [&'static str] {
    match self {
      Self::CurlyBraceFamily => &["func"],
      Self::IndentationSensitive => &["def", "class"],
    }
  }

  pub const fn decorator_prefix(self) -> Option<char> {
    match self {
      Self::CurlyBraceFamily => None,
      Self::IndentationSensitive => Some('@'),
    }
  }

  pub fn is_open_bracket(self, ch: char) -> bool {
    self.brackets().iter().any(|pair| pair.open == ch)
  }

  pub fn is_bracket(self, ch: char) -> bool {
    self.bracket_pair(ch).is_some()
  }

  /// The pair `ch` belongs to, whichever side it is.
  pub fn bracket_pair(self, ch: char) -> Option<BracketPair> {
    self
      .brackets()
      .iter()
      .copied()
      .find(|pair| pair.open == ch || pair.close == ch)
  }

  /// Pairs completed on insertion; quotes included.
  pub const fn auto_pairs(self) -> &'static [BracketPair] {
    AUTO_PAIRS
  }

  /// The auto-pair opened by `ch`.
  pub fn auto_pair(self, ch: char) -> Option<BracketPair> {
    self.auto_pairs().iter().copied().find(|pair| pair.open == ch)
  }

  /// Closing brackets of the auto-pairs, the ones typed over and aligned.
  pub fn is_auto_closer(self, ch: char) -> bool {
    !self.is_quote(ch) && self.auto_pairs().iter().any(|pair| pair.close == ch)
  }

  pub fn is_quote(self, ch: char) -> bool {
    self.quotes().contains(&ch)
  }

  /// Closing counterpart of an auto-paired opening delimiter (bracket or
  /// quote).
  pub fn closer_for(self, ch: char) -> Option<char> {
    if self.is_quote(ch) {
      return Some(ch);
    }
    self
      .brackets()
      .iter()
      .find(|pair| pair.open == ch)
      .map(|pair| pair.close)
  }

  /// Opening counterpart of a structural closing bracket.
  pub fn opener_for(self, ch: char) -> Option<char> {
    self
      .brackets()
      .iter()
      .find(|pair| pair.close == ch)
      .map(|pair| pair.open)
  }
}
