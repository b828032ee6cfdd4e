//! Direction of a selection.
//!
//! A [`crate::selection::Range`] extends either toward the end of the buffer
//! (head after anchor) or toward its start (head before anchor).

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
  /// Toward the end of the document (increasing positions).
  Forward,
  /// Toward the start of the document (decreasing positions).
  Backward,
}
