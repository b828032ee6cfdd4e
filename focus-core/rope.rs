//! Small helpers over [`RopeSlice`] used when inspecting single lines.

use ropey::RopeSlice;

use crate::chars::char_is_whitespace;

pub trait RopeSliceExt {
  /// Index of the first char that is neither whitespace nor a line ending.
  fn first_non_whitespace_char(&self) -> Option<usize>;

  /// True when every char is horizontal whitespace (an empty slice counts).
  fn is_whitespace_only(&self) -> bool;

  fn starts_with(&self, text: &str) -> bool;
}

impl RopeSliceExt for RopeSlice<'_> {
  fn first_non_whitespace_char(&self) -> Option<usize> {
    self.chars().position(|ch| !ch.is_whitespace())
  }

  fn is_whitespace_only(&self) -> bool {
    self.chars().all(char_is_whitespace)
  }

  fn starts_with(&self, text: &str) -> bool {
    let mut chars = self.chars();
    text.chars().all(|expected| chars.next() == Some(expected))
  }
}
