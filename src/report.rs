//! Rendering of [`ParseError`]s as annotated source excerpts, using the
//! [`annotate_snippets`] crate.
use annotate_snippets::{Level, Renderer, Snippet};
use crate::parser::ParseError;

/// Render `err` against the source it was read from.
///
/// # Parameters
///
/// - `source`: The text that was parsed
/// - `origin`: The file name shown in the excerpt header
/// - `err`: The error
/// - `color`: Whether to emit ANSI colors
#[must_use]
pub fn render(source: &str, origin: &str, err: &ParseError, color: bool) -> String {
  let msg = err.to_string();
  let mut range = err.pos.start.min(source.len())..err.pos.end.min(source.len());
  if range.is_empty() {
    if let Some(c) = source[range.start..].chars().next() {
      range.end = range.start + c.len_utf8();
    }
  }
  let line_start = source[..range.start].matches('\n').count() + 1;
  let start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
  let end = source[range.end..].find('\n').map_or(source.len(), |i| range.end + i);
  let message = Level::Error.title(&msg).snippet(
    Snippet::source(&source[start..end])
      .line_start(line_start)
      .origin(origin)
      .fold(true)
      .annotation(Level::Error.span(range.start - start..range.end - start)),
  );
  let renderer = if color { Renderer::styled() } else { Renderer::plain() };
  renderer.render(message).to_string()
}

#[cfg(test)]
mod tests {
  use crate::TermEnv;
  use super::render;

  #[test]
  fn points_at_the_offending_token() {
    let src = "a.\nf(a b).\n";
    let err = TermEnv::new().parse_all(src).expect_err("syntax error");
    let out = render(src, "test.pl", &err, false);
    assert!(out.starts_with("error: expected ',' or ')', found 'b'"), "{out}");
    assert!(out.contains("test.pl:2:"), "{out}");
    assert!(out.contains("f(a b)."), "{out}");
  }

  #[test]
  fn end_of_input() {
    let src = "f(a,";
    let err = TermEnv::new().parse(src).expect_err("truncated");
    let out = render(src, "eof.pl", &err, false);
    assert!(out.starts_with("error: unexpected end of input"), "{out}");
    assert!(out.contains("f(a,"), "{out}");
  }
}
