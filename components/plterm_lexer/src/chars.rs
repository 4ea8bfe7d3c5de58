//! Character classes of the tokenizer.
//!
//! Codes below 256 follow the ISO 8859/1 tables:
//!
//! ```text
//! layout-char       0..32, 127..159
//! small-letter      97..122, 223..246, 248..255
//! capital-letter    65..90, 192..214, 216..222
//! digit             48..57
//! symbol-char       35, 36, 38, 42, 43, 45..47, 58, 60..64, 92, 94, 96, 126,
//!                   160..191, 215, 247
//! solo-char         33, 59                   ! ;
//! punctuation-char  37, 40, 41, 44, 91, 93, 123..125    % ( ) , [ ] { | }
//! quote-char        34, 39                   " '
//! underline         95                       _
//! ```
//!
//! Above 255, alphabetic characters are letters (capital if uppercase), whitespace is
//! layout, and everything else belongs to no class.

bitflags! {
  /// The set of classes a character belongs to.
  #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
  pub struct CharClass: u8 {
    /// Whitespace and control characters.
    const LAYOUT = 1;
    /// Characters that may start an unquoted word.
    const SMALL = 2;
    /// Characters that may start a variable (together with `_`).
    const CAPITAL = 4;
    /// Decimal digits.
    const DIGIT = 8;
    /// Characters that glue together into symbol names like `=..`.
    const SYMBOL = 16;
    /// `!` and `;`, which are names on their own.
    const SOLO = 32;
    /// `%(),[]{|}`.
    const PUNCTUATION = 64;
    /// `"` and `'`.
    const QUOTE = 128;
  }
}

fn latin1(b: u8) -> CharClass {
  match b {
    0..=32 | 127..=159 => CharClass::LAYOUT,
    b'a'..=b'z' | 223..=246 | 248..=255 => CharClass::SMALL,
    b'A'..=b'Z' | 192..=214 | 216..=222 => CharClass::CAPITAL,
    b'0'..=b'9' => CharClass::DIGIT,
    35 | 36 | 38 | 42 | 43 | 45..=47 | 58 | 60..=64 | 92 | 94 | 96 | 126 | 160..=191 | 215
    | 247 => CharClass::SYMBOL,
    b'!' | b';' => CharClass::SOLO,
    b'%' | b'(' | b')' | b',' | b'[' | b']' | b'{' | b'|' | b'}' => CharClass::PUNCTUATION,
    b'"' | b'\'' => CharClass::QUOTE,
    _ => CharClass::empty(),
  }
}

/// Classify a character.
#[must_use]
pub fn char_class(c: char) -> CharClass {
  match u8::try_from(c) {
    Ok(b) => latin1(b),
    Err(_) if c.is_uppercase() => CharClass::CAPITAL,
    Err(_) if c.is_alphabetic() => CharClass::SMALL,
    Err(_) if c.is_whitespace() => CharClass::LAYOUT,
    Err(_) => CharClass::empty(),
  }
}

/// Is `c` a layout (whitespace or control) character?
#[must_use]
pub fn is_layout_char(c: char) -> bool { char_class(c).contains(CharClass::LAYOUT) }

/// Is `c` a small letter?
#[must_use]
pub fn is_small_letter(c: char) -> bool { char_class(c).contains(CharClass::SMALL) }

/// Is `c` a capital letter?
#[must_use]
pub fn is_capital_letter(c: char) -> bool { char_class(c).contains(CharClass::CAPITAL) }

/// Is `c` a decimal digit?
#[must_use]
pub fn is_digit(c: char) -> bool { c.is_ascii_digit() }

/// Is `c` a symbol character?
#[must_use]
pub fn is_symbol_char(c: char) -> bool { char_class(c).contains(CharClass::SYMBOL) }

/// Is `c` one of the solo characters `!` or `;`?
#[must_use]
pub fn is_solo_char(c: char) -> bool { char_class(c).contains(CharClass::SOLO) }

/// Is `c` one of the punctuation characters `%(),[]{|}`?
#[must_use]
pub fn is_punctuation_char(c: char) -> bool { char_class(c).contains(CharClass::PUNCTUATION) }

/// Is `c` an alphanumeric character (letter, digit or underline)?
#[must_use]
pub fn is_alpha(c: char) -> bool {
  c == '_' || char_class(c).intersects(CharClass::SMALL | CharClass::CAPITAL | CharClass::DIGIT)
}
