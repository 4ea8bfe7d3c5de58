//! Tokenizer for Prolog source text.
//!
//! The [`Tokenizer`] scans one token per call to [`next_token`](Tokenizer::next_token),
//! following the token syntax of ISO Prolog as documented for SICStus:
//!
//! ```text
//! token          --> name | natural-number | unsigned-float | variable | string
//!                 |  punctuation-char | layout-text | full-stop
//! name           --> quoted-name | word | symbol | solo-char
//! natural-number --> digit... | base ' alpha... | 0 ' char-item
//! unsigned-float --> digit... . digit... [ (e|E) [+|-] digit... ]
//! variable       --> (underline | capital-letter) ?alpha...
//! layout-text    --> (layout-char | /* ... */ | % ... LFD)...
//! full-stop      --> .   { followed by layout-text or end of input }
//! ```
//!
//! Layout is returned as a token of its own so callers can decide whether to keep it.
//! Malformed input is reported as a [`TokenError`]; the tokenizer does not try to recover
//! from it, and iteration stops after the first error.

// rust lints we want
#![warn(
  bare_trait_objects,
  elided_lifetimes_in_paths,
  missing_copy_implementations,
  missing_debug_implementations,
  future_incompatible,
  rust_2018_idioms,
  trivial_numeric_casts,
  variant_size_differences,
  unreachable_pub,
  unused,
  missing_docs
)]
#![forbid(unsafe_code)]
// all the clippy
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
// all the clippy::restriction lints we want
#![warn(
  clippy::else_if_without_else,
  clippy::get_unwrap,
  clippy::rest_pat_in_fully_bound_structs,
  clippy::string_add,
  clippy::unwrap_used
)]
// all the clippy lints we don't want
#![allow(
  clippy::missing_const_for_fn,
  clippy::missing_errors_doc,
  clippy::missing_panics_doc,
  clippy::module_name_repetitions,
  clippy::multiple_crate_versions,
  clippy::option_if_let_else,
  clippy::semicolon_if_nothing_returned,
  clippy::use_self
)]

#[macro_use]
extern crate bitflags;

pub mod chars;

use chars::{
  is_alpha, is_capital_letter, is_digit, is_layout_char, is_punctuation_char, is_small_letter,
  is_solo_char, is_symbol_char,
};
use num::{BigUint, Num};
use plterm_util::{Position, Span};
use std::fmt::{self, Write};

/// The lexical category of a [`Token`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
  /// A word, symbol run, solo character or quoted name.
  Name,
  /// A name starting with `_` or a capital letter.
  Variable,
  /// A decimal, based or character code integer.
  NaturalNumber,
  /// A decimal number with a fraction and/or an exponent.
  UnsignedFloat,
  /// A double quoted string.
  String,
  /// One of `(),[]{|}`.
  PunctuationChar,
  /// Whitespace and comments.
  LayoutText,
  /// A `.` ending a clause.
  FullStop,
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TokenKind::Name => "NAME",
      TokenKind::Variable => "VARIABLE",
      TokenKind::NaturalNumber => "NATURAL_NUMBER",
      TokenKind::UnsignedFloat => "UNSIGNED_FLOAT",
      TokenKind::String => "STRING",
      TokenKind::PunctuationChar => "PUNCTUATION_CHAR",
      TokenKind::LayoutText => "LAYOUT_TEXT",
      TokenKind::FullStop => "FULL_STOP",
    }
    .fmt(f)
  }
}

/// A single token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
  /// The lexical category.
  pub kind: TokenKind,
  /// The token text. This is the source text of the token, except that quoted names and
  /// strings hold their decoded contents, and `0'c` literals hold the decimal code of `c`.
  pub lexeme: String,
  /// The source bytes covered by the token.
  pub span: Span,
  /// The line and column where the token starts.
  pub pos: Position,
}

impl Token {
  /// Renders the token as `token<KIND>[lexeme]`, writing spaces, control characters and
  /// `"` as `\xHH`.
  #[must_use]
  pub fn str(&self) -> String {
    let mut s = format!("token<{}>[", self.kind);
    for c in self.lexeme.chars() {
      if c.is_ascii_graphic() && c != '"' || u32::from(c) > 0xff {
        s.push(c)
      } else {
        let _ = write!(s, "\\x{:02x}", u32::from(c));
      }
    }
    s.push(']');
    s
  }

  /// The value of a [`NaturalNumber`](TokenKind::NaturalNumber) token.
  #[must_use]
  pub fn natural_value(&self) -> Option<BigUint> {
    if self.kind != TokenKind::NaturalNumber {
      return None
    }
    match self.lexeme.split_once('\'') {
      Some((base, digits)) => BigUint::from_str_radix(digits, base.parse().ok()?).ok(),
      None => self.lexeme.parse().ok(),
    }
  }

  /// Returns true if this is the punctuation character `c`.
  #[must_use]
  pub fn is_punct(&self, c: &str) -> bool {
    self.kind == TokenKind::PunctuationChar && self.lexeme == c
  }
}

/// The ways in which a token can be malformed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenErrorKind {
  /// End of input inside `'...'`.
  UnterminatedQuotedName,
  /// End of input inside a `\` escape sequence.
  UnterminatedEscape,
  /// A `\x` escape with a character that is not a hex digit.
  HexCode(char),
  /// A `\^` escape with a character that is not a letter or `?`.
  ControlChar(char),
  /// `0'` with nothing after it.
  NoCharCode,
  /// `base'` with no digits valid in that base after it.
  MissingNumberAfterBase,
  /// A `.` after a number that is not followed by digits.
  MissingDecimal,
  /// An `e` or `E` after a number that is not followed by digits.
  MissingExponent,
  /// End of input inside `"..."`.
  UnterminatedString,
  /// A character that cannot start any token.
  UnexpectedChar(char),
}

impl fmt::Display for TokenErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TokenErrorKind::UnterminatedQuotedName => write!(f, "unterminated quoted name"),
      TokenErrorKind::UnterminatedEscape => write!(f, "unterminated escape sequence"),
      TokenErrorKind::HexCode(c) => write!(f, "unexpected hex character ({c:?})"),
      TokenErrorKind::ControlChar(c) => write!(f, "unexpected control character ({c:?})"),
      TokenErrorKind::NoCharCode => write!(f, "no character code provided for 0'"),
      TokenErrorKind::MissingNumberAfterBase => write!(f, "missing number after base"),
      TokenErrorKind::MissingDecimal => write!(f, "missing decimal digits after '.'"),
      TokenErrorKind::MissingExponent => write!(f, "missing digits in exponent"),
      TokenErrorKind::UnterminatedString => write!(f, "unterminated string"),
      TokenErrorKind::UnexpectedChar(c) => write!(f, "unexpected character ({c:?})"),
    }
  }
}

/// A malformed token, with the location of the offending text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenError {
  /// The text scanned before the error was detected.
  pub span: Span,
  /// Where the malformed token starts.
  pub pos: Position,
  /// What went wrong.
  pub kind: TokenErrorKind,
}

impl fmt::Display for TokenError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} at {}", self.kind, self.pos)
  }
}

impl std::error::Error for TokenError {}

type Result<T> = std::result::Result<T, TokenErrorKind>;

/// Splits a source string into [`Token`]s.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
  /// The input text
  source: &'a str,
  /// The byte offset of the next unconsumed character
  idx: usize,
  /// The line and column of the next unconsumed character
  pos: Position,
  /// Set once a malformed token has been reported
  failed: bool,
}

impl<'a> Tokenizer<'a> {
  /// Create a tokenizer positioned at the start of `source`.
  #[must_use]
  pub fn new(source: &'a str) -> Self {
    Tokenizer { source, idx: 0, pos: Position::default(), failed: false }
  }

  /// The source text being tokenized.
  #[must_use]
  pub fn source(&self) -> &'a str { self.source }

  /// The byte offset of the next unconsumed character.
  #[must_use]
  pub fn offset(&self) -> usize { self.idx }

  /// The line and column of the next unconsumed character.
  #[must_use]
  pub fn position(&self) -> Position { self.pos }

  /// Returns true if there is unconsumed input and no error has been reported.
  #[must_use]
  pub fn has_more_tokens(&self) -> bool { !self.failed && self.idx < self.source.len() }

  /// Returns true if the next character starts layout text, or there is no more input.
  /// A `.` token is only a full stop when this holds right after it.
  #[must_use]
  pub fn at_layout_or_eof(&self) -> bool { self.layout_at(0) }

  fn peek(&self) -> Option<char> { self.source[self.idx..].chars().next() }

  fn peek_nth(&self, n: usize) -> Option<char> { self.source[self.idx..].chars().nth(n) }

  fn bump(&mut self) -> Option<char> {
    let c = self.peek()?;
    self.idx += c.len_utf8();
    self.pos.advance(c);
    Some(c)
  }

  fn eat_while(&mut self, f: impl Fn(char) -> bool) -> usize {
    let mut n = 0;
    while self.peek().is_some_and(&f) {
      self.bump();
      n += 1;
    }
    n
  }

  /// Does layout text (or the end of input) start `n` characters ahead?
  fn layout_at(&self, n: usize) -> bool {
    match self.peek_nth(n) {
      None | Some('%') => true,
      Some('/') => self.peek_nth(n + 1) == Some('*'),
      Some(c) => is_layout_char(c),
    }
  }

  fn is_comment_begin(&self) -> bool {
    match self.peek() {
      Some('%') => true,
      Some('/') => self.peek_nth(1) == Some('*'),
      _ => false,
    }
  }

  /// Scan the next token. Returns `Ok(None)` at the end of the input.
  pub fn next_token(&mut self) -> std::result::Result<Option<Token>, TokenError> {
    let Some(c) = self.peek() else { return Ok(None) };
    let (start, pos) = (self.idx, self.pos);
    match self.scan(c, start) {
      Ok((kind, lexeme)) => Ok(Some(Token { kind, lexeme, span: (start..self.idx).into(), pos })),
      Err(kind) => {
        self.failed = true;
        Err(TokenError { span: (start..self.idx).into(), pos, kind })
      }
    }
  }

  fn raw(&self, start: usize) -> String { self.source[start..self.idx].to_owned() }

  fn scan(&mut self, c: char, start: usize) -> Result<(TokenKind, String)> {
    if self.is_comment_begin() || is_layout_char(c) {
      self.layout_text();
      return Ok((TokenKind::LayoutText, self.raw(start)))
    }
    let kind = match c {
      _ if is_digit(c) => return self.number(start),
      '\'' => return Ok((TokenKind::Name, self.quoted('\'', TokenErrorKind::UnterminatedQuotedName)?)),
      '"' => return Ok((TokenKind::String, self.quoted('"', TokenErrorKind::UnterminatedString)?)),
      _ if is_small_letter(c) => {
        self.eat_while(is_alpha);
        TokenKind::Name
      }
      _ if is_capital_letter(c) || c == '_' => {
        self.eat_while(is_alpha);
        TokenKind::Variable
      }
      '.' if !self.peek_nth(1).is_some_and(is_symbol_char) || self.layout_at(1) => {
        self.bump();
        TokenKind::FullStop
      }
      _ if is_symbol_char(c) => {
        self.symbol();
        TokenKind::Name
      }
      _ if is_solo_char(c) => {
        self.bump();
        TokenKind::Name
      }
      _ if is_punctuation_char(c) => {
        self.bump();
        TokenKind::PunctuationChar
      }
      _ => {
        self.bump();
        return Err(TokenErrorKind::UnexpectedChar(c))
      }
    };
    Ok((kind, self.raw(start)))
  }

  fn layout_text(&mut self) {
    loop {
      match self.peek() {
        Some('%') => self.line_comment(),
        Some('/') if self.peek_nth(1) == Some('*') => self.block_comment(),
        Some(c) if is_layout_char(c) => {
          self.bump();
        }
        _ => break,
      }
    }
  }

  /// Block comments nest; an unterminated one runs to the end of the input.
  fn block_comment(&mut self) {
    self.idx += 2;
    self.pos.character += 2;
    let mut depth = 1_u32;
    while depth > 0 {
      match self.bump() {
        None => break,
        Some('*') if self.peek() == Some('/') => {
          self.bump();
          depth -= 1
        }
        Some('/') if self.peek() == Some('*') => {
          self.bump();
          depth += 1
        }
        Some(_) => {}
      }
    }
  }

  fn line_comment(&mut self) {
    while let Some(c) = self.bump() {
      if c == '\n' {
        break
      }
    }
  }

  /// A maximal run of symbol characters, stopping at the start of a block comment.
  fn symbol(&mut self) {
    while self.peek().is_some_and(is_symbol_char) && !self.is_comment_begin() {
      self.bump();
    }
  }

  fn number(&mut self, start: usize) -> Result<(TokenKind, String)> {
    self.eat_while(is_digit);
    match self.peek() {
      Some('\'') => {
        let digits = &self.source[start..self.idx];
        if digits == "0" {
          self.bump();
          return self.char_code()
        }
        let Some(base) = digits.parse::<u32>().ok().filter(|b| (2..=36).contains(b)) else {
          return Ok((TokenKind::NaturalNumber, self.raw(start)))
        };
        self.bump();
        if self.eat_while(|c| c.is_digit(base)) == 0 {
          return Err(TokenErrorKind::MissingNumberAfterBase)
        }
        Ok((TokenKind::NaturalNumber, self.raw(start)))
      }
      Some('.') => match self.peek_nth(1) {
        Some(c) if is_digit(c) => {
          self.bump();
          self.eat_while(is_digit);
          if matches!(self.peek(), Some('e' | 'E')) {
            self.exponent()?
          }
          Ok((TokenKind::UnsignedFloat, self.raw(start)))
        }
        // `1.` then layout is an integer followed by a full stop
        Some(_) if self.layout_at(1) => Ok((TokenKind::NaturalNumber, self.raw(start))),
        _ => {
          self.bump();
          Err(TokenErrorKind::MissingDecimal)
        }
      },
      Some('e' | 'E') => {
        self.exponent()?;
        Ok((TokenKind::UnsignedFloat, self.raw(start)))
      }
      _ => Ok((TokenKind::NaturalNumber, self.raw(start))),
    }
  }

  fn exponent(&mut self) -> Result<()> {
    self.bump();
    if matches!(self.peek(), Some('+' | '-')) {
      self.bump();
    }
    if self.eat_while(is_digit) == 0 {
      return Err(TokenErrorKind::MissingExponent)
    }
    Ok(())
  }

  /// The character code of the item following `0'`.
  fn char_code(&mut self) -> Result<(TokenKind, String)> {
    let c = match self.bump() {
      None => return Err(TokenErrorKind::NoCharCode),
      Some('\\') => {
        let mut s = String::new();
        self.escape(&mut s)?;
        s.chars().next().ok_or(TokenErrorKind::NoCharCode)?
      }
      Some('\'') => {
        if self.peek() == Some('\'') {
          self.bump();
        }
        '\''
      }
      Some(c) => c,
    };
    Ok((TokenKind::NaturalNumber, u32::from(c).to_string()))
  }

  /// The decoded contents of a quoted name or string delimited by `q`.
  fn quoted(&mut self, q: char, unterminated: TokenErrorKind) -> Result<String> {
    self.bump();
    let mut s = String::new();
    loop {
      match self.bump() {
        None => return Err(unterminated),
        Some(c) if c == q => {
          if self.peek() != Some(q) {
            return Ok(s)
          }
          self.bump();
          s.push(q)
        }
        Some('\\') => self.escape(&mut s)?,
        Some(c) => s.push(c),
      }
    }
  }

  fn hex_digit(&mut self) -> Result<u8> {
    let c = self.bump().ok_or(TokenErrorKind::UnterminatedEscape)?;
    c.to_digit(16).and_then(|d| u8::try_from(d).ok()).ok_or(TokenErrorKind::HexCode(c))
  }

  /// Decode the escape sequence after a `\`, appending the result (if any) to `out`.
  fn escape(&mut self, out: &mut String) -> Result<()> {
    let c = self.bump().ok_or(TokenErrorKind::UnterminatedEscape)?;
    let decoded = match c {
      'b' => '\u{8}',
      't' => '\t',
      'n' => '\n',
      'v' => '\u{b}',
      'f' => '\u{c}',
      'r' => '\r',
      'e' => '\u{1b}',
      'd' => '\u{7f}',
      'a' => '\u{7}',
      'x' => {
        let hi = self.hex_digit()?;
        let lo = self.hex_digit()?;
        char::from(hi << 4 | lo)
      }
      'c' => {
        self.eat_while(is_layout_char);
        return Ok(())
      }
      '^' => match self.bump() {
        None => return Err(TokenErrorKind::UnterminatedEscape),
        Some('?') => '\u{7f}',
        Some(c @ 'A'..='Z') => control(c, 'A'),
        Some(c @ 'a'..='z') => control(c, 'a'),
        Some(c) => return Err(TokenErrorKind::ControlChar(c)),
      },
      '0'..='7' => {
        let mut v = c.to_digit(8).unwrap_or(0);
        for _ in 0..2 {
          match self.peek().and_then(|c| c.to_digit(8)) {
            Some(d) => {
              self.bump();
              v = v << 3 | d
            }
            None => break,
          }
        }
        char::from_u32(v).unwrap_or('\0')
      }
      c if is_layout_char(c) => return Ok(()),
      c => c,
    };
    out.push(decoded);
    Ok(())
  }
}

/// The control character `^c`, for an ASCII letter `c` in the range starting at `base`.
fn control(c: char, base: char) -> char {
  char::from_u32((u32::from(c) - u32::from(base) + 1) % 32).unwrap_or('\0')
}

impl Iterator for Tokenizer<'_> {
  type Item = std::result::Result<Token, TokenError>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.failed {
      return None
    }
    self.next_token().transpose()
  }
}
