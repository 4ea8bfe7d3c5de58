//! An operator precedence parser that builds terms directly on the heap.
//!
//! Layout is dropped from the token stream, but each token remembers whether layout came right
//! before it, which is what separates `f(X)` (a compound term) from `f (X)` (the prefix operator
//! `f` applied to `(X)`), and whether layout came right after it, which a full stop requires.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use num::{BigInt, ToPrimitive};
use plterm_lexer::{Token, TokenError, TokenErrorKind, TokenKind, Tokenizer};
use plterm_util::{AtomId, BoxError, HeapIdx, Span, usize_as_u32};
use crate::atoms::Atoms;
use crate::heap::{Cell, Functor, Heap};
use crate::interner::Interner;
use crate::ops::{OpDef, OpTable};

/// What went wrong in a [`ParseError`].
#[derive(Debug)]
pub enum ParseErrorKind {
  /// A malformed token.
  Lexical(TokenErrorKind),
  /// Well-formed tokens in an order that does not make a term.
  Syntax(BoxError),
}

/// Error type; a message and the offending [`Span`] of the source.
#[derive(Debug)]
pub struct ParseError {
  /// The location of the error (possibly zero-length)
  pub pos: Span,
  /// The error
  pub kind: ParseErrorKind,
}

/// Newtype for `Result<T, ParseError>`.
type Result<T> = std::result::Result<T, ParseError>;

impl Clone for ParseError {
  fn clone(&self) -> Self {
    let kind = match &self.kind {
      &ParseErrorKind::Lexical(k) => ParseErrorKind::Lexical(k),
      ParseErrorKind::Syntax(msg) => ParseErrorKind::Syntax(format!("{msg}").into()),
    };
    ParseError { pos: self.pos, kind }
  }
}

impl ParseError {
  /// Construct a syntax error from a position and a message.
  pub fn new(pos: impl Into<Span>, msg: BoxError) -> ParseError {
    ParseError { pos: pos.into(), kind: ParseErrorKind::Syntax(msg) }
  }
}

impl fmt::Display for ParseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.kind {
      ParseErrorKind::Lexical(k) => k.fmt(f),
      ParseErrorKind::Syntax(msg) => msg.fmt(f),
    }
  }
}

impl std::error::Error for ParseError {}

impl From<TokenError> for ParseError {
  fn from(e: TokenError) -> Self { ParseError { pos: e.span, kind: ParseErrorKind::Lexical(e.kind) } }
}

fn err<T>(pos: impl Into<Span>, msg: impl Into<BoxError>) -> Result<T> {
  Err(ParseError::new(pos, msg.into()))
}

/// A token with its surrounding layout.
#[derive(Debug)]
struct Lexeme {
  tok: Token,
  layout_before: bool,
  layout_after: bool,
}

/// The name of `l` if it could be an infix or postfix operator.
fn op_name(l: &Lexeme) -> Option<&str> {
  match l.tok.kind {
    TokenKind::Name => Some(&l.tok.lexeme),
    TokenKind::PunctuationChar if matches!(&*l.tok.lexeme, "," | "|") => Some(&l.tok.lexeme),
    _ => None,
  }
}

/// A term that is still waiting for an operand. `max` is the priority allowed where the
/// term itself appears.
#[derive(Debug)]
enum Frame {
  /// The right operand of an infix operator
  Infix { f: Functor, lhs: Cell, prec: u32, max: u32 },
  /// The operand of a prefix operator
  Prefix { f: Functor, prec: u32, max: u32 },
  /// A term in parentheses
  Paren { max: u32 },
  /// The next argument of a compound term
  Args { name: AtomId, args: Vec<Cell>, max: u32 },
  /// The next element of a list
  List { items: Vec<Cell>, max: u32 },
  /// The tail of a list, after `|`
  Tail { items: Vec<Cell>, max: u32 },
  /// The contents of a curly term
  Curly { max: u32 },
}

/// The start of an operand.
#[derive(Debug)]
enum Primary {
  /// A complete operand and its priority
  Done(Cell, u32),
  /// A term that continues with an operand of at most the given priority
  Open(Frame, u32),
}

/// Reads clauses from a source string onto a heap.
#[derive(Debug)]
pub struct Parser<'a> {
  tokens: Tokenizer<'a>,
  peeked: VecDeque<Lexeme>,
  heap: &'a mut Heap,
  atoms: &'a mut Interner,
  ops: &'a OpTable,
  /// Names of every named variable read so far, shared with the printer
  var_names: &'a mut HashMap<HeapIdx, String>,
  /// The named variables of the current clause
  vars: HashMap<String, Cell>,
}

impl<'a> Parser<'a> {
  /// Create a parser over `source`. New variable names are recorded in `var_names`.
  pub fn new(
    source: &'a str, heap: &'a mut Heap, atoms: &'a mut Interner, ops: &'a OpTable,
    var_names: &'a mut HashMap<HeapIdx, String>,
  ) -> Self {
    Parser {
      tokens: Tokenizer::new(source),
      peeked: VecDeque::new(),
      heap,
      atoms,
      ops,
      var_names,
      vars: HashMap::new(),
    }
  }

  fn eof(&self) -> Span { Span::from(self.tokens.source().len()) }

  /// Read non-layout tokens until `n` are buffered or the input runs out.
  fn fill(&mut self, n: usize) -> Result<()> {
    while self.peeked.len() < n {
      let mut layout_before = false;
      loop {
        match self.tokens.next_token()? {
          None => return Ok(()),
          Some(tok) if tok.kind == TokenKind::LayoutText => layout_before = true,
          Some(tok) => {
            let layout_after = self.tokens.at_layout_or_eof();
            self.peeked.push_back(Lexeme { tok, layout_before, layout_after });
            break
          }
        }
      }
    }
    Ok(())
  }

  fn peek(&mut self) -> Result<Option<&Lexeme>> {
    self.fill(1)?;
    Ok(self.peeked.front())
  }

  fn next_lex(&mut self) -> Result<Option<Lexeme>> {
    self.fill(1)?;
    Ok(self.peeked.pop_front())
  }

  fn unexpected<T>(&self, l: Option<Lexeme>, msg: &str) -> Result<T> {
    match l {
      Some(l) => err(l.tok.span, format!("{msg}, found '{}'", l.tok.lexeme)),
      None => err(self.eof(), format!("{msg}, found end of input")),
    }
  }

  fn expect(&mut self, punct: &str) -> Result<()> {
    match self.next_lex()? {
      Some(l) if l.tok.is_punct(punct) => Ok(()),
      l => self.unexpected(l, &format!("expected '{punct}'")),
    }
  }

  fn functor(&mut self, name: &str, arity: u32) -> Functor {
    Functor::new(self.atoms.intern(name), arity)
  }

  /// Read one clause, or return `None` at the end of the input. The closing full stop may be
  /// left out at the end of the input.
  pub fn clause(&mut self) -> Result<Option<Cell>> {
    if self.peek()?.is_none() {
      return Ok(None)
    }
    self.vars.clear();
    let (t, _) = self.expr(1200)?;
    match self.next_lex()? {
      None => {}
      Some(l) if l.tok.kind == TokenKind::FullStop => {
        if !l.layout_after {
          return err(l.tok.span, "expected layout after full stop")
        }
      }
      l => return self.unexpected(l, "operator expected"),
    }
    Ok(Some(t))
  }

  /// A term of priority at most `max`, together with its actual priority.
  ///
  /// Terms still waiting for an operand are kept on a stack of [`Frame`]s, so the nesting
  /// depth of the input is limited only by memory.
  fn expr(&mut self, mut max: u32) -> Result<(Cell, u32)> {
    let mut frames = vec![];
    'operand: loop {
      let (mut t, mut p) = match self.primary(max)? {
        Primary::Done(t, p) => (t, p),
        Primary::Open(frame, inner) => {
          frames.push(frame);
          max = inner;
          continue
        }
      };
      loop {
        if let Some((f, def)) = self.operator(max, p)? {
          if f.arity == 2 {
            frames.push(Frame::Infix { f, lhs: t, prec: def.prec, max });
            max = def.right_max();
            continue 'operand
          }
          t = self.heap.new_str(f, &[t]);
          p = def.prec;
          continue
        }
        let Some(frame) = frames.pop() else { return Ok((t, p)) };
        (t, p, max) = match frame {
          Frame::Infix { f, lhs, prec, max } => (self.heap.new_str(f, &[lhs, t]), prec, max),
          Frame::Prefix { f, prec, max } => (self.heap.new_str(f, &[t]), prec, max),
          Frame::Paren { max } => {
            self.expect(")")?;
            (t, 0, max)
          }
          Frame::Curly { max } => {
            self.expect("}")?;
            (self.heap.new_str(Functor::CURLY, &[t]), 0, max)
          }
          Frame::Args { name, mut args, max: outer } => {
            args.push(t);
            match self.next_lex()? {
              Some(l) if l.tok.is_punct(",") => {
                frames.push(Frame::Args { name, args, max: outer });
                max = 999;
                continue 'operand
              }
              Some(l) if l.tok.is_punct(")") => {
                let f = Functor::new(name, usize_as_u32(args.len()));
                (self.heap.new_str(f, &args), 0, outer)
              }
              l => return self.unexpected(l, "expected ',' or ')'"),
            }
          }
          Frame::List { mut items, max: outer } => {
            items.push(t);
            match self.next_lex()? {
              Some(l) if l.tok.is_punct(",") => {
                frames.push(Frame::List { items, max: outer });
                max = 999;
                continue 'operand
              }
              Some(l) if l.tok.is_punct("|") => {
                frames.push(Frame::Tail { items, max: outer });
                max = 999;
                continue 'operand
              }
              Some(l) if l.tok.is_punct("]") => (self.list(items, Cell::Con(Functor::NIL)), 0, outer),
              l => return self.unexpected(l, "expected ',', '|' or ']'"),
            }
          }
          Frame::Tail { items, max } => {
            self.expect("]")?;
            (self.list(items, t), 0, max)
          }
        };
      }
    }
  }

  /// Consume an infix or postfix operator that may follow an operand of priority `lp` in a
  /// context allowing `max`. A bare `|` builds `;`.
  fn operator(&mut self, max: u32, lp: u32) -> Result<Option<(Functor, OpDef)>> {
    let ops = self.ops;
    let Some(l) = self.peek()? else { return Ok(None) };
    let bar = l.tok.is_punct("|");
    let Some(name) = op_name(l).map(str::to_owned) else { return Ok(None) };
    let fits = |d: &OpDef| d.prec <= max && lp <= d.left_max();
    let (def, arity) = if let Some(def) = ops.infix(&name).filter(fits) {
      (def, 2)
    } else if let Some(def) = ops.postfix(&name).filter(fits) {
      (def, 1)
    } else {
      return Ok(None)
    };
    self.next_lex()?;
    Ok(Some((self.functor(if bar { ";" } else { &name }, arity), def)))
  }

  fn primary(&mut self, max: u32) -> Result<Primary> {
    let Some(l) = self.next_lex()? else { return err(self.eof(), "unexpected end of input") };
    Ok(match l.tok.kind {
      TokenKind::NaturalNumber => Primary::Done(Cell::Int(int(&l.tok, false)?), 0),
      TokenKind::UnsignedFloat => return err(l.tok.span, "floating point numbers are not supported"),
      TokenKind::Variable => Primary::Done(self.var(l.tok.lexeme), 0),
      TokenKind::String => Primary::Done(self.code_list(&l.tok.lexeme), 0),
      TokenKind::Name => return self.name(l.tok.lexeme, max),
      TokenKind::PunctuationChar if l.tok.is_punct("(") => Primary::Open(Frame::Paren { max }, 1200),
      TokenKind::PunctuationChar if l.tok.is_punct("[") => {
        if self.peek()?.is_some_and(|l| l.tok.is_punct("]")) {
          self.next_lex()?;
          Primary::Done(Cell::Con(Functor::NIL), 0)
        } else {
          Primary::Open(Frame::List { items: vec![], max }, 999)
        }
      }
      TokenKind::PunctuationChar if l.tok.is_punct("{") => {
        if self.peek()?.is_some_and(|l| l.tok.is_punct("}")) {
          self.next_lex()?;
          Primary::Done(Cell::atom(Atoms::CURLY), 0)
        } else {
          Primary::Open(Frame::Curly { max }, 1200)
        }
      }
      TokenKind::PunctuationChar | TokenKind::FullStop | TokenKind::LayoutText =>
        return self.unexpected(Some(l), "expected a term"),
    })
  }

  fn var(&mut self, name: String) -> Cell {
    if name == "_" {
      return self.heap.new_ref()
    }
    if let Some(&c) = self.vars.get(&name) {
      return c
    }
    let c = self.heap.new_ref();
    if let Cell::Ref(i) = c {
      self.var_names.insert(i, name.clone());
    }
    self.vars.insert(name, c);
    c
  }

  fn code_list(&mut self, s: &str) -> Cell {
    let codes = s.chars().map(|c| Cell::Int(i64::from(u32::from(c)))).collect();
    self.list(codes, Cell::Con(Functor::NIL))
  }

  fn list(&mut self, items: Vec<Cell>, tail: Cell) -> Cell {
    items.into_iter().rev().fold(tail, |tl, hd| self.heap.new_str(Functor::DOT, &[hd, tl]))
  }

  /// The start of a term beginning with the name `name`: a compound term, a negative number,
  /// a prefix operator application or an atom.
  fn name(&mut self, name: String, max: u32) -> Result<Primary> {
    let ops = self.ops;
    let (call, negative) = match self.peek()? {
      Some(n) => (
        n.tok.is_punct("(") && !n.layout_before,
        name == "-" && !n.layout_before &&
          matches!(n.tok.kind, TokenKind::NaturalNumber | TokenKind::UnsignedFloat),
      ),
      None => (false, false),
    };
    if call {
      self.next_lex()?;
      let name = self.atoms.intern(&name);
      return Ok(Primary::Open(Frame::Args { name, args: vec![], max }, 999))
    }
    if negative {
      let Some(n) = self.next_lex()? else { unreachable!("peeked token vanished") };
      if n.tok.kind == TokenKind::UnsignedFloat {
        return err(n.tok.span, "floating point numbers are not supported")
      }
      return Ok(Primary::Done(Cell::Int(int(&n.tok, true)?), 0))
    }
    if let Some(def) = ops.prefix(&name) {
      if def.prec <= max && !self.at_operand_end()? {
        let f = self.functor(&name, 1);
        return Ok(Primary::Open(Frame::Prefix { f, prec: def.prec, max }, def.right_max()))
      }
    }
    Ok(Primary::Done(Cell::atom(self.atoms.intern(&name)), 0))
  }

  /// Returns true if the next token cannot start an operand, so that a prefix operator before
  /// it must be read as an atom.
  fn at_operand_end(&mut self) -> Result<bool> {
    let ops = self.ops;
    let Some(n) = self.peek()? else { return Ok(true) };
    Ok(match n.tok.kind {
      TokenKind::FullStop => true,
      TokenKind::PunctuationChar => matches!(&*n.tok.lexeme, ")" | "," | "|" | "]" | "}"),
      TokenKind::Name => {
        let s = &*n.tok.lexeme;
        (ops.infix(s).is_some() || ops.postfix(s).is_some()) && ops.prefix(s).is_none()
      }
      _ => false,
    })
  }
}

/// The value of a natural number token, negated if `negative`.
fn int(tok: &Token, negative: bool) -> Result<i64> {
  let Some(v) = tok.natural_value() else { return err(tok.span, "malformed number") };
  let v = BigInt::from(v);
  let v = if negative { -v } else { v };
  match v.to_i64() {
    Some(n) => Ok(n),
    None => err(tok.span, "big integers are not supported"),
  }
}

#[cfg(test)]
mod tests {
  use crate::TermEnv;
  use super::ParseErrorKind;
  use plterm_lexer::TokenErrorKind;

  fn syntax_error(text: &str) -> String {
    match TermEnv::new().parse(text) {
      Ok(t) => panic!("{text:?} parsed as {t:?}"),
      Err(e) => {
        assert!(matches!(e.kind, ParseErrorKind::Syntax(_)), "{text:?}: {e}");
        e.to_string()
      }
    }
  }

  #[test]
  fn operators() {
    let mut env = TermEnv::new();
    for (text, printed) in [
      ("a:-b,c;d.", "a :- b, c ; d"),
      ("1-2-3.\n", "1 - 2 - 3"),
      ("1-(2-3).", "1 - (2 - 3)"),
      ("2*3+4.\n", "2 * 3 + 4"),
      ("2*(3+4).", "2 * (3 + 4)"),
      ("a=b.", "a = b"),
      ("\\+a.", "\\+ a"),
      ("- - a.", "- - a"),
      ("a|b.", "a ; b"),
      ("f((a;b)).", "f((a ; b))"),
      ("f((a,b)).", "f((a, b))"),
    ] {
      let t = env.parse(text).unwrap_or_else(|e| panic!("{text:?}: {e}"));
      assert_eq!(env.to_string(t), printed, "{text:?}");
    }
  }

  #[test]
  fn prefix_operators_as_atoms() {
    let mut env = TermEnv::new();
    for (text, printed) in [
      ("- = a.", "(-) = a"),
      ("f(-).", "f(-)"),
      ("f(-, +).", "f(-, +)"),
      ("[-].", "[-]"),
      ("(-).", "-"),
      ("f(dynamic).", "f(dynamic)"),
    ] {
      let t = env.parse(text).unwrap_or_else(|e| panic!("{text:?}: {e}"));
      assert_eq!(env.to_string(t), printed, "{text:?}");
    }
  }

  #[test]
  fn numbers() {
    let mut env = TermEnv::new();
    for (text, printed) in [
      ("-1.\n", "-1"),
      ("- 1 .", "- 1"),
      ("-(1).", "- 1"),
      ("a - -1.\n", "a - -1"),
      ("0'a.", "97"),
      ("16'ff.", "255"),
      ("-9223372036854775808.\n", "-9223372036854775808"),
      ("\"ab\".", "[97, 98]"),
    ] {
      let t = env.parse(text).unwrap_or_else(|e| panic!("{text:?}: {e}"));
      assert_eq!(env.to_string(t), printed, "{text:?}");
    }
    assert_eq!(syntax_error("9223372036854775808.\n"), "big integers are not supported");
    assert_eq!(syntax_error("1.5."), "floating point numbers are not supported");
  }

  #[test]
  fn compound_versus_prefix_application() {
    let mut env = TermEnv::new();
    let a = env.parse("-(1, 2).").expect("parses");
    assert_eq!(env.to_string(a), "1 - 2");
    let b = env.parse("- (1, 2).").expect("parses");
    assert_eq!(env.to_string(b), "- (1, 2)");
    assert_eq!(env.functor(b).map(|f| f.arity), Some(1));
  }

  #[test]
  fn clause_boundaries() {
    let mut env = TermEnv::new();
    let ts = env.parse_all("a. b.\nc").expect("parses");
    assert_eq!(ts.iter().map(|&t| env.to_string(t)).collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(syntax_error("a.b."), "expected layout after full stop");
    assert_eq!(syntax_error("a b."), "operator expected, found 'b'");
    assert_eq!(syntax_error(""), "unexpected end of input");
    assert_eq!(syntax_error("f(a."), "expected ',' or ')', found '.'");
    assert_eq!(syntax_error("a = b = c."), "operator expected, found '='");
  }

  #[test]
  fn quoted_bar_is_not_a_disjunction() {
    let mut env = TermEnv::new();
    let a = env.parse("'|'(a, b).").expect("parses");
    assert_eq!(env.to_string(a), "a '|' b");
    let b = env.parse("a '|' b.").expect("parses");
    assert!(env.equal(a, b));
    assert_eq!(env.functor(b).map(|f| env.atom_name(f.name).to_owned()), Some("|".to_owned()));
    let c = env.parse("a | b.").expect("parses");
    assert_eq!(env.to_string(c), "a ; b");
    assert!(!env.equal(b, c));
  }

  #[test]
  fn lexical_errors_propagate() {
    let e = TermEnv::new().parse("foo('bar).").expect_err("unterminated");
    assert!(matches!(e.kind, ParseErrorKind::Lexical(TokenErrorKind::UnterminatedQuotedName)));
    assert_eq!(e.pos.start, 4);
  }

  #[test]
  fn variables_are_shared_within_a_clause() {
    let mut env = TermEnv::new();
    let t = env.parse("f(X, Y, X, _, _).").expect("parses");
    let args: Vec<_> = (0..5).map(|i| env.arg(t, i)).collect();
    assert_eq!(args[0], args[2]);
    assert_ne!(args[0], args[1]);
    assert_ne!(args[3], args[4]);
    assert_eq!(env.var_name(args[1]), Some("Y"));
    assert_eq!(env.var_name(args[3]), None);
    let u = env.parse("g(X).").expect("parses");
    assert_ne!(env.arg(u, 0), args[0]);
  }
}
