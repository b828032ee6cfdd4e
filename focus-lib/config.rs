//! Editor configuration.
//!
//! ```toml
//! language     = "indentationSensitive" # or "curlyBraceFamily", "swift", "python"
//! indent-width = 4                      # spaces per level, defaults per language
//! indent-tabs  = false                  # indent with tabs instead
//! ```

use serde::Deserialize;
use thiserror::Error;
use toml::de::Error as TomlError;

use crate::{
  indent::{
    IndentUnit,
    MAX_INDENT,
  },
  language::Language,
};

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
  #[error("failed to parse editor config: {0}")]
  BadConfig(#[from] TomlError),
  #[error("indent-width must be between 1 and {max}, got {0}", max = MAX_INDENT)]
  IndentWidth(u8),
  #[error("indent-width cannot be combined with indent-tabs = true")]
  ConflictingIndent,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct ConfigRaw {
  language:     Option<Language>,
  indent_width: Option<u8>,
  indent_tabs:  Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
  pub language:    Language,
  pub indent_unit: IndentUnit,
}

impl EditorConfig {
  /// The language with its default indent unit.
  pub fn new(language: Language) -> Self {
    Self {
      language,
      indent_unit: IndentUnit::for_language(language),
    }
  }

  pub fn from_toml(source: &str) -> Result<Self> {
    let raw: ConfigRaw = toml::from_str(source)?;
    Self::from_raw(raw)
  }

  fn from_raw(raw: ConfigRaw) -> Result<Self> {
    let language = raw.language.unwrap_or_default();
    let indent_unit = match (raw.indent_width, raw.indent_tabs.unwrap_or(false)) {
      (Some(_), true) => return Err(ConfigError::ConflictingIndent),
      (None, true) => IndentUnit::Tabs,
      (Some(width), false) if width == 0 || width as usize > MAX_INDENT => {
        return Err(ConfigError::IndentWidth(width));
      },
      (Some(width), false) => IndentUnit::Spaces(width),
      (None, false) => IndentUnit::for_language(language),
    };

    Ok(Self {
      language,
      indent_unit,
    })
  }
}

impl Default for EditorConfig {
  fn default() -> Self {
    Self::new(Language::default())
  }
}
