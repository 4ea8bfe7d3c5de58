//! Printing terms as text the parser reads back.
use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use plterm_lexer::chars::{is_alpha, is_small_letter, is_symbol_char};
use plterm_util::{AtomId, HeapIdx};
use crate::atoms::Atoms;
use crate::heap::{Cell, Functor, Heap};
use crate::interner::Interner;
use crate::ops::OpTable;

/// Returns true if the atom `name` must be quoted to read back as itself.
#[must_use]
pub fn needs_quotes(name: &str) -> bool {
  let mut chars = name.chars();
  match chars.next() {
    None => true,
    Some(c) if is_small_letter(c) => !chars.all(is_alpha),
    Some(_) if matches!(name, "[]" | "{}" | "!" | ";") => false,
    Some(_) => !name.chars().all(is_symbol_char) || name == "." || name.contains("/*"),
  }
}

/// Write `name` as an atom, quoted if necessary.
pub fn write_atom(out: &mut String, name: &str) {
  if !needs_quotes(name) {
    out.push_str(name);
    return
  }
  out.push('\'');
  for c in name.chars() {
    match c {
      '\'' => out.push_str("\\'"),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\t' => out.push_str("\\t"),
      '\0'..='\u{1f}' | '\u{7f}'..='\u{9f}' => {
        let _ = write!(out, "\\x{:02x}", u32::from(c));
      }
      _ => out.push(c),
    }
  }
  out.push('\'');
}

/// A pending piece of output.
#[derive(Copy, Clone, Debug)]
enum Item {
  /// A term, the priority its context allows, and whether it is an operand of an operator
  Term(Cell, u32, bool),
  /// The rest of a list after an element
  Tail(Cell),
  /// An operator name
  Atom(AtomId),
  /// Fixed text
  Text(&'static str),
}

/// Prints terms using the operator table and the source names of variables.
///
/// Variables keep their source names where these are unambiguous. Unnamed variables are
/// printed as `_G<index>`, with underscores appended until the name clashes neither with a
/// source name nor with another variable printed by the same emitter.
#[derive(Debug)]
pub struct Emitter<'a> {
  heap: &'a Heap,
  atoms: &'a Interner,
  ops: &'a OpTable,
  var_names: &'a HashMap<HeapIdx, String>,
  /// The names given to the variables printed so far
  printed: HashMap<HeapIdx, String>,
  used: HashSet<String>,
  /// All source names, collected on the first unnamed variable
  taken: Option<HashSet<&'a str>>,
  out: String,
}

impl<'a> Emitter<'a> {
  /// Create an emitter with an empty output buffer.
  #[must_use]
  pub fn new(
    heap: &'a Heap, atoms: &'a Interner, ops: &'a OpTable, var_names: &'a HashMap<HeapIdx, String>,
  ) -> Self {
    Emitter {
      heap, atoms, ops, var_names,
      printed: HashMap::new(),
      used: HashSet::new(),
      taken: None,
      out: String::new(),
    }
  }

  /// The text printed so far.
  #[must_use]
  pub fn finish(self) -> String { self.out }

  /// Print `c` as a top level term.
  ///
  /// Work is kept on an explicit stack, so deeply nested terms do not exhaust the call stack.
  pub fn print(&mut self, c: Cell) {
    let mut stack = vec![Item::Term(c, 1200, false)];
    while let Some(item) = stack.pop() {
      match item {
        Item::Term(c, max, operand) => self.term(c, max, operand, &mut stack),
        Item::Tail(c) => self.tail(c, &mut stack),
        Item::Atom(a) => write_atom(&mut self.out, self.atoms.name(a)),
        Item::Text(s) => self.out.push_str(s),
      }
    }
  }

  fn var(&mut self, i: HeapIdx) {
    if let Some(name) = self.printed.get(&i) {
      self.out.push_str(name);
      return
    }
    let var_names = self.var_names;
    let mut name = match var_names.get(&i) {
      Some(name) => name.clone(),
      None => {
        let taken = self.taken.get_or_insert_with(|| var_names.values().map(String::as_str).collect());
        let mut name = format!("_G{}", i.into_inner());
        while taken.contains(&*name) {
          name.push('_')
        }
        name
      }
    };
    while self.used.contains(&name) {
      name.push('_')
    }
    self.out.push_str(&name);
    self.used.insert(name.clone());
    self.printed.insert(i, name);
  }

  /// Print `c` in a context that allows priority `max`. `operand` is set for the arguments of
  /// operators, where a bare operator atom would be misread. Subterms go on `stack`.
  fn term(&mut self, c: Cell, max: u32, operand: bool, stack: &mut Vec<Item>) {
    match self.heap.deref(c) {
      Cell::Ref(i) => self.var(i),
      Cell::Int(n) => {
        let _ = write!(self.out, "{n}");
      }
      Cell::Big(n) => {
        let _ = write!(self.out, "'$big'({n})");
      }
      Cell::Gbl(n) => {
        let _ = write!(self.out, "'$gbl'({n})");
      }
      Cell::Con(f) => {
        let name = self.atoms.name(f.name);
        if operand && self.ops.is_op(name) {
          self.out.push('(');
          write_atom(&mut self.out, name);
          self.out.push(')');
        } else {
          write_atom(&mut self.out, name);
        }
      }
      Cell::Str(i) => {
        let heap = self.heap;
        let Cell::Con(f) = heap.get(i) else { unreachable!("compound term without functor") };
        let args = heap.args(i, f.arity);
        if f == Functor::DOT {
          self.out.push('[');
          stack.extend([Item::Text("]"), Item::Tail(args[1]), Item::Term(args[0], 999, false)]);
        } else if f == Functor::CURLY {
          self.out.push('{');
          stack.extend([Item::Text("}"), Item::Term(args[0], 1200, false)]);
        } else if !self.operator(f, args, max, stack) {
          self.compound(f, args, stack)
        }
      }
    }
  }

  fn compound(&mut self, f: Functor, args: &[Cell], stack: &mut Vec<Item>) {
    let atoms = self.atoms;
    let name = atoms.name(f.name);
    if matches!(f.name, Atoms::NIL | Atoms::CURLY) {
      let _ = write!(self.out, "'{name}'");
    } else {
      write_atom(&mut self.out, name);
    }
    self.out.push('(');
    stack.push(Item::Text(")"));
    for (k, &a) in args.iter().enumerate().rev() {
      stack.push(Item::Term(a, 999, false));
      if k > 0 {
        stack.push(Item::Text(", "))
      }
    }
  }

  /// The rest of a list whose `[` and first element are already printed.
  fn tail(&mut self, tail: Cell, stack: &mut Vec<Item>) {
    let tail = self.heap.deref(tail);
    if self.heap.is_dotted_pair(tail) {
      self.out.push_str(", ");
      stack.extend([Item::Tail(self.heap.arg(tail, 1)), Item::Term(self.heap.arg(tail, 0), 999, false)]);
    } else if !self.heap.is_empty_list(tail) {
      self.out.push('|');
      stack.push(Item::Term(tail, 999, false));
    }
  }

  /// Print `f(args)` in operator form, if `f` is an operator of matching arity.
  fn operator(&mut self, f: Functor, args: &[Cell], max: u32, stack: &mut Vec<Item>) -> bool {
    let (ops, atoms) = (self.ops, self.atoms);
    let name = atoms.name(f.name);
    match *args {
      [lhs, rhs] => {
        let Some(def) = ops.infix(name) else { return false };
        self.open(def.prec, max, stack);
        stack.push(Item::Term(rhs, def.right_max(), true));
        if f.name == Atoms::COMMA {
          stack.push(Item::Text(", "))
        } else {
          stack.extend([Item::Text(" "), Item::Atom(f.name), Item::Text(" ")]);
        }
        stack.push(Item::Term(lhs, def.left_max(), true));
      }
      [arg] => {
        if let Some(def) = ops.prefix(name) {
          self.open(def.prec, max, stack);
          write_atom(&mut self.out, name);
          self.out.push(' ');
          stack.push(Item::Term(arg, def.right_max(), true));
        } else if let Some(def) = ops.postfix(name) {
          self.open(def.prec, max, stack);
          stack.extend([Item::Atom(f.name), Item::Text(" "), Item::Term(arg, def.left_max(), true)]);
        } else {
          return false
        }
      }
      _ => return false,
    }
    true
  }

  /// Open a parenthesis, closed after everything pushed later, if `prec` exceeds `max`.
  fn open(&mut self, prec: u32, max: u32, stack: &mut Vec<Item>) {
    if prec > max {
      self.out.push('(');
      stack.push(Item::Text(")"));
    }
  }
}
