//! Glue between a host text surface and the editing engine.
//!
//! The host owns the text widget and implements [`TextSurface`]. It forwards
//! typed characters to [`EditorCoordinator::intercept_insertion`], editing
//! commands to [`EditorCoordinator::handle_command`] and change notifications
//! to [`EditorCoordinator::on_selection_changed`] /
//! [`EditorCoordinator::on_text_changed`].
//!
//! Engine edits reach the surface through [`TextSurface::replace`] tagged
//! [`EditOrigin::Synthetic`]. Hosts must not route those back into
//! `intercept_insertion`; if one does anyway while an edit is being applied,
//! the call is declined.

use ropey::Rope;
use thiserror::Error;

use crate::{
  auto_pairs::{
    self,
    AutoPairsError,
  },
  colorize::{
    Span,
    colorize,
  },
  comment::{
    CommentError,
    toggle_line_comments,
  },
  config::EditorConfig,
  highlight::{
    BracketHighlighter,
    Emphasis,
    MATCH_EMPHASIS,
  },
  indent::{
    self,
    IndentError,
  },
  match_brackets::select_enclosed,
  selection::Range,
  transaction::{
    Change,
    Transaction,
  },
};

/// Where an edit handed to [`TextSurface::replace`] comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
  /// Typed or pasted by the user.
  User,
  /// Produced by the engine. Must not be intercepted again.
  Synthetic,
}

/// A position in the host's view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("surface rejected edit {from}..{to}: {reason}")]
pub struct SurfaceError {
  pub from:   usize,
  pub to:     usize,
  pub reason: String,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoordinatorError {
  #[error(transparent)]
  AutoPairs(#[from] AutoPairsError),
  #[error(transparent)]
  Indent(#[from] IndentError),
  #[error(transparent)]
  Comment(#[from] CommentError),
  #[error(transparent)]
  Surface(#[from] SurfaceError),
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;

/// The text widget the engine edits. Implemented by the host.
pub trait TextSurface {
  fn text(&self) -> &Rope;
  fn selection(&self) -> Range;
  /// Replace the chars in `from..to` with `text`.
  fn replace(&mut self, from: usize, to: usize, text: &str, origin: EditOrigin) -> std::result::Result<(), SurfaceError>;
  fn set_selection(&mut self, range: Range);
  fn decorate(&mut self, range: Range, emphasis: Emphasis);
  fn undecorate(&mut self, range: Range, emphasis: Emphasis);

  /// Char index under a view point, if the host can resolve one.
  fn char_index_at(&self, _point: Point) -> Option<usize> {
    None
  }
}

/// Editing commands the host forwards instead of performing them itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
  InsertNewline,
  InsertTab,
  InsertBacktab,
  DeleteBackward,
  ToggleComment,
}

pub struct EditorCoordinator<S> {
  surface:     S,
  config:      EditorConfig,
  highlighter: BracketHighlighter,
  /// Set while a transaction is being written to the surface.
  applying:    bool,
}

impl<S: TextSurface> EditorCoordinator<S> {
  pub fn new(surface: S, config: EditorConfig) -> Self {
    Self {
      surface,
      config,
      highlighter: BracketHighlighter::new(),
      applying: false,
    }
  }

  pub fn surface(&self) -> &S {
    &self.surface
  }

  pub fn surface_mut(&mut self) -> &mut S {
    &mut self.surface
  }

  pub fn into_surface(self) -> S {
    self.surface
  }

  pub fn config(&self) -> &EditorConfig {
    &self.config
  }

  /// Switch language or indentation; the match highlight is recomputed.
  pub fn set_config(&mut self, config: EditorConfig) {
    self.config = config;
    self.refresh_highlight();
  }

  /// True while an engine edit is being applied to the surface.
  pub fn is_applying(&self) -> bool {
    self.applying
  }

  /// Offer a pending insertion of `text` over `range` to the engine.
  ///
  /// Returns `true` when the engine edited the surface itself and the host
  /// must drop its default insertion.
  pub fn intercept_insertion(&mut self, range: Range, text: &str) -> Result<bool> {
    if self.applying {
      tracing::trace!("insertion during synthetic edit, passing through");
      return Ok(false);
    }

    let transaction = auto_pairs::intercept_insertion(
      self.surface.text(),
      &range,
      text,
      self.config.language,
      self.config.indent_unit,
    )?;

    match transaction {
      Some(transaction) => {
        self.apply(&transaction)?;
        Ok(true)
      },
      None => Ok(false),
    }
  }

  /// Run an editing command. Returns `false` when the host should perform
  /// its own default behaviour instead.
  pub fn handle_command(&mut self, command: EditorCommand) -> Result<bool> {
    let doc = self.surface.text();
    let range = self.surface.selection();
    let EditorConfig {
      language,
      indent_unit,
    } = self.config;

    let transaction = match command {
      EditorCommand::InsertNewline => Some(indent::handle_newline(doc, &range, language, indent_unit)?),
      EditorCommand::InsertTab => Some(indent::handle_tab(doc, &range, indent_unit)?),
      EditorCommand::InsertBacktab => {
        // consumed even when there is nothing to outdent
        match indent::handle_backtab(doc, &range, indent_unit)? {
          Some(transaction) => Some(transaction),
          None => return Ok(true),
        }
      },
      EditorCommand::DeleteBackward => indent::handle_backspace(doc, &range, indent_unit)?,
      EditorCommand::ToggleComment => Some(toggle_line_comments(doc, &range, language)?),
    };

    tracing::trace!(?command, handled = transaction.is_some(), "editor command");
    let Some(transaction) = transaction else {
      return Ok(false);
    };
    self.apply(&transaction)?;
    Ok(true)
  }

  /// Select the interior of the bracket pair under `point`.
  pub fn handle_double_click(&mut self, point: Point) -> bool {
    let Some(pos) = self.surface.char_index_at(point) else {
      return false;
    };
    let Some(interior) = select_enclosed(self.surface.text().slice(..), pos, self.config.language) else {
      return false;
    };

    self.surface.set_selection(interior);
    self.refresh_highlight();
    true
  }

  pub fn on_selection_changed(&mut self) {
    self.refresh_highlight();
  }

  pub fn on_text_changed(&mut self) {
    self.refresh_highlight();
  }

  /// Colour spans for the current text.
  pub fn colorize(&self) -> Vec<Span> {
    colorize(self.surface.text().slice(..), self.config.language)
  }

  fn refresh_highlight(&mut self) {
    let update = self.highlighter.update(
      self.surface.text().slice(..),
      self.surface.selection(),
      self.config.language,
    );
    for range in update.cleared {
      self.surface.undecorate(range, MATCH_EMPHASIS);
    }
    for range in update.applied {
      self.surface.decorate(range, MATCH_EMPHASIS);
    }
  }

  fn apply(&mut self, transaction: &Transaction) -> Result<()> {
    self.applying = true;
    let result = write_to_surface(&mut self.surface, transaction);
    self.applying = false;

    if let Err(err) = &result {
      tracing::warn!("failed to apply edit: {err}");
    }
    result?;

    self.refresh_highlight();
    Ok(())
  }
}

/// Replay `transaction` on the surface, last change first so earlier
/// positions stay valid, then move the selection.
fn write_to_surface<S: TextSurface>(surface: &mut S, transaction: &Transaction) -> std::result::Result<(), SurfaceError> {
  let changes: Vec<Change> = transaction.changes_iter().collect();
  tracing::debug!(changes = changes.len(), "applying synthetic edit");

  for (from, to, text) in changes.into_iter().rev() {
    surface.replace(from, to, text.as_deref().unwrap_or(""), EditOrigin::Synthetic)?;
  }
  if let Some(&selection) = transaction.selection() {
    let len = surface.text().len_chars();
    surface.set_selection(selection.clamp(len));
  }
  Ok(())
}
