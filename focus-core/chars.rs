/// Horizontal whitespace. Line endings are never whitespace here, so a line's
/// leading whitespace run always stops at its line ending.
#[inline]
pub fn char_is_whitespace(ch: char) -> bool {
  match ch {
      '\u{0009}' | // Character Tabulation
      '\u{0020}' | // Space
      '\u{00A0}' | // No-break Space
      '\u{180E}' | // Mongolian Vowel Separator
      '\u{202F}' | // Narrow No-break Space
      '\u{205F}' | // Medium Mathematical Space
      '\u{3000}' | // Ideographic Space
      '\u{FEFF}'   // Zero Width No-break Space
      => true,

      // En Quad through Zero Width Space.
      ch if ('\u{2000}' ..= '\u{200B}').contains(&ch) => true,

      _ => false,
    }
}

/// Characters that make up an indentation run.
#[inline]
pub fn char_is_indent(ch: char) -> bool {
  ch == ' ' || ch == '\t'
}

#[inline]
pub fn char_is_word(ch: char) -> bool {
  ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn word_chars() {
    assert!(char_is_word('_'));
    assert!(char_is_word('é'));
    assert!(char_is_word('7'));
    assert!(!char_is_word('{'));
    assert!(!char_is_word('@'));
  }

  #[test]
  fn line_endings_are_not_whitespace() {
    assert!(!char_is_whitespace('\n'));
    assert!(!char_is_whitespace('\r'));
    assert!(char_is_whitespace('\u{3000}'));
    assert!(!char_is_indent('\u{3000}'));
  }
}
