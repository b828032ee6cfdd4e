use smartstring::{LazyCompact, SmartString};

pub mod auto_pairs;
pub mod colorize;
pub mod comment;
pub mod config;
pub mod coordinator;
pub mod highlight;
pub mod indent;
pub mod language;
pub mod lexer;
pub mod match_brackets;
pub mod movement;
pub mod selection;
pub mod transaction;

pub type Tendril = SmartString<LazyCompact>;
