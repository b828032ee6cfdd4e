//! Editing sessions driven through the coordinator against an in-memory
//! surface.

use focus_lib::{
  config::EditorConfig,
  coordinator::{
    EditOrigin,
    EditorCommand,
    EditorCoordinator,
    Point,
    SurfaceError,
    TextSurface,
  },
  highlight::Emphasis,
  language::Language,
  selection::Range,
};
use ropey::Rope;

/// A plain rope buffer that records what the engine does to it.
struct MemorySurface {
  text:         Rope,
  selection:    Range,
  origins:      Vec<EditOrigin>,
  decorated:    Vec<(Range, Emphasis)>,
  decorate_ops: usize,
}

impl MemorySurface {
  fn new(text: &str, selection: Range) -> Self {
    Self {
      text: Rope::from(text),
      selection,
      origins: Vec::new(),
      decorated: Vec::new(),
      decorate_ops: 0,
    }
  }
}

impl TextSurface for MemorySurface {
  fn text(&self) -> &Rope {
    &self.text
  }

  fn selection(&self) -> Range {
    self.selection
  }

  fn replace(&mut self, from: usize, to: usize, text: &str, origin: EditOrigin) -> Result<(), SurfaceError> {
    if to > self.text.len_chars() {
      return Err(SurfaceError {
        from,
        to,
        reason: "out of bounds".into(),
      });
    }
    self.text.remove(from..to);
    self.text.insert(from, text);
    self.origins.push(origin);
    Ok(())
  }

  fn set_selection(&mut self, range: Range) {
    self.selection = range;
  }

  fn decorate(&mut self, range: Range, emphasis: Emphasis) {
    self.decorate_ops += 1;
    self.decorated.push((range, emphasis));
  }

  fn undecorate(&mut self, range: Range, emphasis: Emphasis) {
    if let Some(idx) = self
      .decorated
      .iter()
      .position(|&entry| entry == (range, emphasis))
    {
      self.decorated.remove(idx);
    }
  }

  /// One char per unit of `x`, single line.
  fn char_index_at(&self, point: Point) -> Option<usize> {
    if point.x < 0.0 {
      return None;
    }
    let idx = point.x as usize;
    (idx <= self.text.len_chars()).then_some(idx)
  }
}

fn editor(text: &str, selection: Range) -> EditorCoordinator<MemorySurface> {
  EditorCoordinator::new(MemorySurface::new(text, selection), EditorConfig::default())
}

fn decorated_ranges(editor: &EditorCoordinator<MemorySurface>) -> Vec<Range> {
  editor
    .surface()
    .decorated
    .iter()
    .map(|&(range, _)| range)
    .collect()
}

/// Type `text` the way a host would: offer it to the engine first and insert
/// it at the caret if the engine declines.
fn type_text(editor: &mut EditorCoordinator<MemorySurface>, text: &str) {
  let range = editor.surface().selection();
  let handled = editor
    .intercept_insertion(range, text)
    .expect("Failed to intercept insertion");
  if !handled {
    let len = text.chars().count();
    let surface = editor.surface_mut();
    surface
      .replace(range.from(), range.to(), text, EditOrigin::User)
      .expect("Failed to insert");
    surface.set_selection(Range::point(range.from() + len));
    editor.on_text_changed();
  }
}

#[test]
fn test_typing_a_call() {
  let mut editor = editor("", Range::point(0));
  for ch in ["f", "(", "x", ")", ";"] {
    type_text(&mut editor, ch);
  }
  assert_eq!(editor.surface().text, "f(x);");
  assert_eq!(editor.surface().selection, Range::point(5));
}

#[test]
fn test_open_paren_pairs_and_highlights() {
  let mut editor = editor("foo", Range::point(3));
  assert!(editor.intercept_insertion(Range::point(3), "(").unwrap());

  let surface = editor.surface();
  assert_eq!(surface.text, "foo()");
  assert_eq!(surface.selection, Range::point(4));
  assert_eq!(surface.origins, vec![EditOrigin::Synthetic]);
  assert_eq!(decorated_ranges(&editor), vec![Range::new(3, 4), Range::new(4, 5)]);
}

#[test]
fn test_plain_characters_pass_through() {
  let mut editor = editor("foo", Range::point(3));
  assert!(!editor.intercept_insertion(Range::point(3), "x").unwrap());
  assert!(!editor.intercept_insertion(Range::point(3), "()").unwrap());
  assert_eq!(editor.surface().text, "foo");
  assert!(editor.surface().origins.is_empty());
}

#[test]
fn test_wrap_selection() {
  let mut editor = editor("abc", Range::new(0, 3));
  assert!(editor.intercept_insertion(Range::new(0, 3), "[").unwrap());
  assert_eq!(editor.surface().text, "[abc]");
  assert_eq!(editor.surface().selection, Range::point(1));
}

#[test]
fn test_type_over_closer_moves_caret_only() {
  let mut editor = editor("f()", Range::point(2));
  assert!(editor.intercept_insertion(Range::point(2), ")").unwrap());
  assert_eq!(editor.surface().text, "f()");
  assert_eq!(editor.surface().selection, Range::point(3));
  assert!(editor.surface().origins.is_empty());
}

#[test]
fn test_newline_between_braces() {
  let mut editor = editor("if x {}\n", Range::point(6));
  assert!(editor.handle_command(EditorCommand::InsertNewline).unwrap());
  assert_eq!(editor.surface().text, "if x {\n  \n}\n");
  assert_eq!(editor.surface().selection, Range::point(9));

  // the closer typed on the blank line lines up with its opener
  type_text(&mut editor, "}");
  assert_eq!(editor.surface().text, "if x {\n}\n}\n");
}

#[test]
fn test_tab_and_backtab_selection() {
  let mut editor = editor("a\nb", Range::new(0, 3));
  assert!(editor.handle_command(EditorCommand::InsertTab).unwrap());
  assert_eq!(editor.surface().text, "  a\n  b");
  assert_eq!(editor.surface().selection, Range::new(0, 7));

  assert!(editor.handle_command(EditorCommand::InsertBacktab).unwrap());
  assert_eq!(editor.surface().text, "a\nb");
  assert_eq!(editor.surface().selection, Range::new(0, 3));
}

#[test]
fn test_backtab_is_consumed_without_indent() {
  let mut editor = editor("a\nb", Range::point(0));
  assert!(editor.handle_command(EditorCommand::InsertBacktab).unwrap());
  assert_eq!(editor.surface().text, "a\nb");
  assert!(editor.surface().origins.is_empty());
}

#[test]
fn test_tab_at_caret() {
  let mut editor = editor("x", Range::point(0));
  assert!(editor.handle_command(EditorCommand::InsertTab).unwrap());
  assert_eq!(editor.surface().text, "  x");
  assert_eq!(editor.surface().selection, Range::point(2));
}

#[test]
fn test_backspace_dedents_then_falls_back() {
  let mut editor = editor("    x", Range::point(4));
  assert!(editor.handle_command(EditorCommand::DeleteBackward).unwrap());
  assert_eq!(editor.surface().text, "  x");
  assert_eq!(editor.surface().selection, Range::point(2));

  assert!(editor.handle_command(EditorCommand::DeleteBackward).unwrap());
  assert_eq!(editor.surface().text, "x");

  // nothing left to dedent
  assert!(!editor.handle_command(EditorCommand::DeleteBackward).unwrap());
  assert_eq!(editor.surface().text, "x");
}

#[test]
fn test_backspace_outside_indentation_is_left_to_host() {
  for (text, caret) in [("x = 'a''b'", 7), ("f()", 2), ("''", 1), ("ab", 2)] {
    let mut editor = editor(text, Range::point(caret));
    assert!(
      !editor.handle_command(EditorCommand::DeleteBackward).unwrap(),
      "backspace in {text:?} at {caret} should fall back to the host"
    );
    assert_eq!(editor.surface().text, text);
    assert_eq!(editor.surface().selection, Range::point(caret));
    assert!(editor.surface().origins.is_empty());
  }
}

#[test]
fn test_toggle_comment_round_trip() {
  let mut editor = editor("let a\n  let b", Range::new(0, 13));
  assert!(editor.handle_command(EditorCommand::ToggleComment).unwrap());
  assert_eq!(editor.surface().text, "// let a\n  // let b");
  assert_eq!(editor.surface().selection, Range::new(0, 19));

  assert!(editor.handle_command(EditorCommand::ToggleComment).unwrap());
  assert_eq!(editor.surface().text, "let a\n  let b");
  assert_eq!(editor.surface().selection, Range::new(0, 13));
}

#[test]
fn test_highlight_never_stacks() {
  let mut editor = editor("(a) b", Range::point(0));
  for _ in 0..3 {
    editor.on_selection_changed();
  }
  assert_eq!(decorated_ranges(&editor), vec![Range::new(0, 1), Range::new(2, 3)]);
  assert_eq!(editor.surface().decorate_ops, 6);

  editor.surface_mut().set_selection(Range::point(5));
  editor.on_selection_changed();
  assert!(editor.surface().decorated.is_empty());
}

#[test]
fn test_brackets_in_strings_are_not_highlighted() {
  let mut editor = editor("\"(\" x", Range::point(1));
  editor.on_selection_changed();
  assert!(editor.surface().decorated.is_empty());
}

#[test]
fn test_double_click_selects_interior() {
  let mut editor = editor("f(abc)", Range::point(0));
  assert!(editor.handle_double_click(Point { x: 1.0, y: 0.0 }));
  assert_eq!(editor.surface().selection, Range::new(2, 5));
  assert_eq!(decorated_ranges(&editor), vec![Range::new(1, 2), Range::new(5, 6)]);

  assert!(!editor.handle_double_click(Point { x: 3.0, y: 0.0 }));
  assert_eq!(editor.surface().selection, Range::new(2, 5));
}

#[test]
fn test_python_session_from_config() {
  let config = EditorConfig::from_toml("language = \"python\"").expect("Failed to parse config");
  let mut editor = EditorCoordinator::new(MemorySurface::new("def f():\n", Range::point(8)), config);

  assert!(editor.handle_command(EditorCommand::InsertNewline).unwrap());
  assert_eq!(editor.surface().text, "def f():\n    \n");
  assert_eq!(editor.surface().selection, Range::point(13));

  assert!(editor.handle_command(EditorCommand::DeleteBackward).unwrap());
  assert_eq!(editor.surface().text, "def f():\n\n");

  editor.surface_mut().set_selection(Range::point(0));
  assert!(editor.handle_command(EditorCommand::ToggleComment).unwrap());
  assert_eq!(editor.surface().text, "# def f():\n\n");
}

#[test]
fn test_switching_language() {
  let mut editor = editor("x = 1", Range::point(0));
  editor.set_config(EditorConfig::new(Language::IndentationSensitive));
  assert_eq!(editor.config().indent_unit.len(), 4);

  assert!(editor.handle_command(EditorCommand::ToggleComment).unwrap());
  assert_eq!(editor.surface().text, "# x = 1");
  assert_eq!(editor.colorize().len(), 1);
}
