use ropey::{Rope, RopeSlice};

/// Line ending used for new lines when a document has none to copy.
pub const DEFAULT_LINE_ENDING: LineEnding = LineEnding::LF;

/// Every line break ropey recognises.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum LineEnding {
  /// CarriageReturn followed by LineFeed.
  Crlf,
  /// U+000A -- LineFeed
  LF,
  /// U+000B -- VerticalTab
  VT,
  /// U+000C -- FormFeed
  FF,
  /// U+000D -- CarriageReturn
  CR,
  /// U+0085 -- NextLine
  Nel,
  /// U+2028 -- Line Separator
  LS,
  /// U+2029 -- ParagraphSeparator
  PS,
}

impl LineEnding {
  #[inline]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Crlf => "\u{000D}\u{000A}",
      Self::LF => "\u{000A}",
      Self::VT => "\u{000B}",
      Self::FF => "\u{000C}",
      Self::CR => "\u{000D}",
      Self::Nel => "\u{0085}",
      Self::LS => "\u{2028}",
      Self::PS => "\u{2029}",
    }
  }

  #[inline]
  pub const fn from_char(ch: char) -> Option<LineEnding> {
    match ch {
      '\u{000A}' => Some(LineEnding::LF),
      '\u{000B}' => Some(LineEnding::VT),
      '\u{000C}' => Some(LineEnding::FF),
      '\u{000D}' => Some(LineEnding::CR),
      '\u{0085}' => Some(LineEnding::Nel),
      '\u{2028}' => Some(LineEnding::LS),
      '\u{2029}' => Some(LineEnding::PS),
      _ => None,
    }
  }
}

/// Detects the line ending a document uses from its first lines. Form feeds,
/// vertical tabs and paragraph separators are skipped since they rarely mean
/// "new line" in source code.
pub fn auto_detect_line_ending(doc: &Rope) -> Option<LineEnding> {
  for line in doc.lines().take(100) {
    match get_line_ending(&line) {
      None | Some(LineEnding::VT) | Some(LineEnding::FF) | Some(LineEnding::PS) => {},
      ending => return ending,
    }
  }

  None
}

/// Returns the passed line's line ending, if any.
pub fn get_line_ending(line: &RopeSlice) -> Option<LineEnding> {
  let len = line.len_chars();
  let last = line.get_char(len.checked_sub(1)?)?;
  if last == '\u{000A}' && len >= 2 && line.get_char(len - 2) == Some('\u{000D}') {
    return Some(LineEnding::Crlf);
  }
  LineEnding::from_char(last)
}
