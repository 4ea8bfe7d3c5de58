//! The term environment, which owns everything a term needs to live in.
use std::collections::HashMap;
use log::debug;
use plterm_lexer::chars::is_symbol_char;
use plterm_util::{AtomId, HeapIdx, Span, usize_as_u32};
use crate::emitter::Emitter;
use crate::heap::{Cell, Functor, Heap, Term};
use crate::interner::Interner;
use crate::ops::OpTable;
use crate::parser::{ParseError, Parser};
use crate::trail::Trail;

/// The heap, the atom table, the operator table, the trail and the variable names of a
/// collection of terms.
///
/// Terms from different environments must not be mixed.
#[derive(Debug, Default)]
pub struct TermEnv {
  pub(crate) heap: Heap,
  pub(crate) atoms: Interner,
  pub(crate) ops: OpTable,
  pub(crate) trail: Trail,
  /// Pending pairs of [`unify`](Self::unify)
  pub(crate) stack: Vec<Cell>,
  /// The heap size when the innermost open transaction started
  pub(crate) register_hb: usize,
  pub(crate) var_names: HashMap<HeapIdx, String>,
}

impl TermEnv {
  /// An empty environment with the standard operators.
  #[must_use]
  pub fn new() -> Self { Self::default() }

  /// An empty environment with the given operators.
  #[must_use]
  pub fn with_ops(ops: OpTable) -> Self { TermEnv { ops, ..Self::default() } }

  /// The heap.
  #[must_use]
  pub fn heap(&self) -> &Heap { &self.heap }

  /// The atom table.
  #[must_use]
  pub fn atoms(&self) -> &Interner { &self.atoms }

  /// The operator table.
  #[must_use]
  pub fn ops(&self) -> &OpTable { &self.ops }

  /// The operator table, for adding or removing operators.
  pub fn ops_mut(&mut self) -> &mut OpTable { &mut self.ops }

  /// The trail.
  #[must_use]
  pub fn trail(&self) -> &Trail { &self.trail }

  /// Read the first clause of `text`.
  ///
  /// A full stop must be followed by layout, so a clause ending in an integer directly followed
  /// by `.` at the very end of `text` is a [`MissingDecimal`](crate::TokenErrorKind::MissingDecimal)
  /// error. Write `X = 1 .` or end the text with a newline instead.
  pub fn parse(&mut self, text: &str) -> Result<Term, ParseError> {
    let t = Parser::new(text, &mut self.heap, &mut self.atoms, &self.ops, &mut self.var_names)
      .clause()?;
    let Some(t) = t else {
      return Err(ParseError::new(Span::from(text.len()), "unexpected end of input".into()))
    };
    let t = Term::new(t);
    debug!("parsed {}", self.to_string(t));
    Ok(t)
  }

  /// Read every clause of `text`.
  pub fn parse_all(&mut self, text: &str) -> Result<Vec<Term>, ParseError> {
    let mut p = Parser::new(text, &mut self.heap, &mut self.atoms, &self.ops, &mut self.var_names);
    let mut out = vec![];
    while let Some(t) = p.clause()? {
      out.push(Term::new(t))
    }
    drop(p);
    for &t in &out {
      debug!("parsed {}", self.to_string(t));
    }
    Ok(out)
  }

  /// Print `t` as text that [`parse`](Self::parse) reads back as an equal term (up to the names
  /// of anonymous variables).
  #[must_use]
  pub fn to_string(&self, t: Term) -> String {
    let mut e = Emitter::new(&self.heap, &self.atoms, &self.ops, &self.var_names);
    e.print(t.cell());
    e.finish()
  }

  /// Print `t` followed by a full stop, with a space in between where the stop would otherwise
  /// run into the last token.
  #[must_use]
  pub fn to_clause(&self, t: Term) -> String {
    let mut s = self.to_string(t);
    if s.ends_with(|c: char| is_symbol_char(c) || c.is_ascii_digit()) {
      s.push(' ')
    }
    s.push('.');
    s
  }

  /// A one line summary of the sizes of the heap, the work stack and the trail.
  #[must_use]
  pub fn status(&self) -> String {
    format!("term_env::status() {{ heap_size={},stack_size={},trail_size={}}}",
      self.heap_size(), self.stack_depth(), self.trail_depth())
  }

  /// The number of heap cells.
  #[must_use]
  pub fn heap_size(&self) -> usize { self.heap.len() }

  /// The depth of the unification work stack, which is 0 between calls.
  #[must_use]
  pub fn stack_depth(&self) -> usize { self.stack.len() }

  /// The number of trail entries.
  #[must_use]
  pub fn trail_depth(&self) -> usize { self.trail.depth() }

  /// Reset the bindings recorded in trail entries `from..to`.
  pub fn unwind_trail(&mut self, from: usize, to: usize) {
    self.trail.unwind(&mut self.heap, from, to)
  }

  /// Drop the trail entries at or above `to`.
  pub fn trim_trail(&mut self, to: usize) { self.trail.trim(to) }

  /// Follow bound variables.
  #[must_use]
  pub fn deref(&self, t: Term) -> Term { Term::new(self.heap.deref(t.cell())) }

  /// The empty list.
  #[must_use]
  pub fn empty_list(&self) -> Term { Term::new(Cell::Con(Functor::NIL)) }

  /// Is `t` the empty list or a list cell?
  #[must_use]
  pub fn is_list(&self, t: Term) -> bool { self.heap.is_list(t.cell()) }

  /// Is `t` a list cell?
  #[must_use]
  pub fn is_dotted_pair(&self, t: Term) -> bool { self.heap.is_dotted_pair(t.cell()) }

  /// Is `t` the empty list?
  #[must_use]
  pub fn is_empty_list(&self, t: Term) -> bool { self.heap.is_empty_list(t.cell()) }

  /// The name and arity of an atom or compound term.
  #[must_use]
  pub fn functor(&self, t: Term) -> Option<Functor> { self.heap.functor(t.cell()) }

  /// Is `t` a compound term?
  #[must_use]
  pub fn is_functor(&self, t: Term) -> bool { matches!(self.heap.deref(t.cell()), Cell::Str(_)) }

  /// Does `t` have functor `f`?
  #[must_use]
  pub fn has_functor(&self, t: Term, f: Functor) -> bool { self.functor(t) == Some(f) }

  /// Argument `n` (zero-based) of the compound term `t`.
  #[must_use]
  pub fn arg(&self, t: Term, n: usize) -> Term { Term::new(self.heap.arg(t.cell(), n)) }

  /// The functor `name/arity`.
  pub fn functor_of(&mut self, name: &str, arity: usize) -> Functor {
    Functor::new(self.atoms.intern(name), usize_as_u32(arity))
  }

  /// The name of an atom.
  #[must_use]
  pub fn atom_name(&self, a: AtomId) -> &str { self.atoms.name(a) }

  /// The atom `name`.
  pub fn new_atom(&mut self, name: &str) -> Term { Term::new(Cell::atom(self.atoms.intern(name))) }

  /// The integer `n`.
  #[must_use]
  pub fn new_int(&self, n: i64) -> Term { Term::new(Cell::Int(n)) }

  /// A fresh unbound variable.
  pub fn new_ref(&mut self) -> Term { Term::new(self.heap.new_ref()) }

  /// The term `name(args...)`, or the atom `name` if `args` is empty.
  pub fn new_compound(&mut self, name: &str, args: &[Term]) -> Term {
    let f = self.functor_of(name, args.len());
    let args: Vec<Cell> = args.iter().map(|t| t.cell()).collect();
    Term::new(self.heap.new_term(f, &args))
  }

  /// The list of `items` ending in `tail`.
  pub fn new_list(&mut self, items: &[Term], tail: Term) -> Term {
    items.iter().rev().fold(tail, |tl, hd| Term::new(self.heap.new_str(Functor::DOT, &[hd.cell(), tl.cell()])))
  }

  /// The name a variable had in the source text, if it was read by the parser.
  #[must_use]
  pub fn var_name(&self, t: Term) -> Option<&str> {
    match self.heap.deref(t.cell()) {
      Cell::Ref(i) => self.var_names.get(&i).map(|s| &**s),
      _ => None,
    }
  }

  /// Is `t` an unbound variable?
  #[must_use]
  pub fn is_var(&self, t: Term) -> bool { matches!(self.heap.deref(t.cell()), Cell::Ref(_)) }

  /// Is `t` the atom `a`?
  #[must_use]
  pub fn is_atom(&self, t: Term, a: AtomId) -> bool { self.heap.deref(t.cell()) == Cell::atom(a) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::ParseErrorKind;
  use plterm_lexer::TokenErrorKind;

  #[test]
  fn integer_before_final_stop_needs_layout() {
    let mut env = TermEnv::new();
    let e = env.parse("X = 1.").expect_err("no layout after the stop");
    assert!(matches!(e.kind, ParseErrorKind::Lexical(TokenErrorKind::MissingDecimal)));
    for text in ["X = 1.\n", "X = 1 ."] {
      let t = env.parse(text).unwrap_or_else(|e| panic!("{text:?}: {e}"));
      assert_eq!(env.to_string(t), "X = 1");
    }
  }

  #[test]
  fn status_format() {
    let mut env = TermEnv::new();
    assert_eq!(env.status(), "term_env::status() { heap_size=0,stack_size=0,trail_size=0}");
    env.parse("f(X).").expect("parses");
    assert_eq!(env.status(), "term_env::status() { heap_size=3,stack_size=0,trail_size=0}");
  }

  #[test]
  fn builders() {
    let mut env = TermEnv::new();
    let x = env.new_ref();
    let one = env.new_int(1);
    let nil = env.empty_list();
    let l = env.new_list(&[one, x], nil);
    let m2 = env.new_int(-2);
    let t = env.new_compound("foo", &[l, m2]);
    assert_eq!(env.to_string(t), format!("foo([1, _G{}], -2)", 0));
    assert!(env.is_list(env.arg(t, 0)));
    assert!(env.is_var(x));
    assert!(env.is_atom(nil, crate::Atoms::NIL) && env.is_empty_list(nil));
    let foo2 = env.functor_of("foo", 2);
    assert!(env.has_functor(t, foo2));
    assert!(env.is_functor(t));
    let a = env.new_compound("a", &[]);
    assert!(!env.is_functor(a));
    assert_eq!(env.functor(a).map(|f| env.atom_name(f.name).to_owned()), Some("a".to_owned()));
  }

  #[test]
  fn custom_operators() {
    let mut env = TermEnv::new();
    env.ops_mut().add("likes", 700, crate::OpType::Xfx);
    let t = env.parse("mary likes wine.").expect("parses");
    assert_eq!(env.to_string(t), "mary likes wine");
    let mut plain = TermEnv::with_ops(OpTable::empty());
    let u = plain.parse("a = b.");
    assert!(u.is_err());
    let v = plain.parse("=(a, b).").expect("parses");
    assert_eq!(plain.to_string(v), "=(a, b)");
  }
}
