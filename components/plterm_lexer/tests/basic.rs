use plterm_lexer::{TokenErrorKind, TokenKind, Tokenizer};

fn dump(s: &str) -> Vec<String> {
  let mut t = Tokenizer::new(s);
  let mut out = vec![];
  while t.has_more_tokens() {
    match t.next_token() {
      Ok(Some(tok)) => out.push(tok.str()),
      Ok(None) => break,
      Err(e) => panic!("{s:?}: {e}"),
    }
  }
  out
}

#[test]
fn token_dump() {
  let s = "this is a test'\\^?\\^Z\\^a'\t\n+=/*bla/* ha */ xx *q*/\u{1}%To/*themoon\u{f0}\n\
    'foo'!0'a0'\\^g4242 42.4711 42e3 47.11e-12Foo_Bar\"string\"\"\\^g\" _Baz__ 'bar\\x55'[;].";
  let expected = [
    "token<NAME>[this]",
    "token<LAYOUT_TEXT>[\\x20]",
    "token<NAME>[is]",
    "token<LAYOUT_TEXT>[\\x20]",
    "token<NAME>[a]",
    "token<LAYOUT_TEXT>[\\x20]",
    "token<NAME>[test]",
    "token<NAME>[\\x7f\\x1a\\x01]",
    "token<LAYOUT_TEXT>[\\x09\\x0a]",
    "token<NAME>[+=]",
    "token<LAYOUT_TEXT>[/*bla/*\\x20ha\\x20*/\\x20xx\\x20*q*/\\x01%To/*themoon\\xf0\\x0a]",
    "token<NAME>[foo]",
    "token<NAME>[!]",
    "token<NATURAL_NUMBER>[97]",
    "token<NATURAL_NUMBER>[7]",
    "token<NATURAL_NUMBER>[4242]",
    "token<LAYOUT_TEXT>[\\x20]",
    "token<UNSIGNED_FLOAT>[42.4711]",
    "token<LAYOUT_TEXT>[\\x20]",
    "token<UNSIGNED_FLOAT>[42e3]",
    "token<LAYOUT_TEXT>[\\x20]",
    "token<UNSIGNED_FLOAT>[47.11e-12]",
    "token<VARIABLE>[Foo_Bar]",
    "token<STRING>[string\\x22\\x07]",
    "token<LAYOUT_TEXT>[\\x20]",
    "token<VARIABLE>[_Baz__]",
    "token<LAYOUT_TEXT>[\\x20]",
    "token<NAME>[barU]",
    "token<PUNCTUATION_CHAR>[[]",
    "token<NAME>[;]",
    "token<PUNCTUATION_CHAR>[]]",
    "token<FULL_STOP>[.]",
  ];
  assert_eq!(dump(s), expected);
}

#[test]
fn negative_tokens() {
  use TokenErrorKind::*;
  let table = [
    ("'foo", UnterminatedQuotedName),
    ("'esc\\", UnterminatedEscape),
    ("'esc\\x", UnterminatedEscape),
    ("'esc\\x3", UnterminatedEscape),
    ("'esc\\^", UnterminatedEscape),
    ("'esc\\^\t", ControlChar('\t')),
    ("'esc\\xg", HexCode('g')),
    ("0'", NoCharCode),
    ("11'", MissingNumberAfterBase),
    ("1.", MissingDecimal),
    ("1.e", MissingDecimal),
    ("1e", MissingExponent),
    ("1e+", MissingExponent),
    ("1e-", MissingExponent),
    ("2E-", MissingExponent),
    ("\"foo", UnterminatedString),
  ];
  for (input, kind) in table {
    match Tokenizer::new(input).next_token() {
      Err(e) => assert_eq!(e.kind, kind, "{input:?}"),
      Ok(tok) => panic!("{input:?}: expected {kind}, got {tok:?}"),
    }
  }
}

#[test]
fn literal_forms() {
  let cases = [
    ("0'a", TokenKind::NaturalNumber, "97"),
    ("0' ", TokenKind::NaturalNumber, "32"),
    ("16'1F", TokenKind::NaturalNumber, "16'1F"),
    ("'hello world'", TokenKind::Name, "hello world"),
    ("\"ab\"", TokenKind::String, "ab"),
    ("_", TokenKind::Variable, "_"),
    ("[]", TokenKind::PunctuationChar, "["),
    ("{}", TokenKind::PunctuationChar, "{"),
    ("1.0e10", TokenKind::UnsignedFloat, "1.0e10"),
    ("-->", TokenKind::Name, "-->"),
  ];
  for (input, kind, lexeme) in cases {
    let tok = Tokenizer::new(input).next_token().expect("valid token").expect("a token");
    assert_eq!((tok.kind, tok.lexeme.as_str()), (kind, lexeme), "{input:?}");
  }
}

#[test]
fn error_positions() {
  let mut t = Tokenizer::new("foo(\n  'bar");
  let err = loop {
    match t.next_token() {
      Ok(Some(_)) => {}
      Ok(None) => panic!("no error"),
      Err(e) => break e,
    }
  };
  assert_eq!(err.kind, TokenErrorKind::UnterminatedQuotedName);
  assert_eq!(err.to_string(), "unterminated quoted name at line 2, column 3");
  assert_eq!(err.span.start, 7);
}
