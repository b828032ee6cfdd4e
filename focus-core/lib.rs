//! Text primitives shared by the editing engine: character classes, line
//! ending detection and a few rope slice helpers.

pub mod chars;
pub mod line_ending;
pub mod rope;
