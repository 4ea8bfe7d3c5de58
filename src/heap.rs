//! The term store: an append-only arena of tagged [`Cell`]s.
//!
//! A compound term `f(a1, ..., an)` occupies `n + 1` consecutive slots: the functor cell
//! `Con(f/n)` followed by the argument cells, and is referred to by a `Str` cell holding the
//! index of the functor slot. An unbound variable is a `Ref` cell that points at its own slot;
//! binding it overwrites the slot with the value it is bound to.

use std::fmt;
use std::ops::Deref;
use plterm_util::{AtomId, HeapIdx, HeapVec, u32_as_usize};
use crate::atoms::Atoms;

/// A name together with an arity. An atom is a functor of arity 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Functor {
  /// The interned name.
  pub name: AtomId,
  /// The number of arguments.
  pub arity: u32,
}

impl Functor {
  /// Construct a functor.
  #[must_use]
  pub const fn new(name: AtomId, arity: u32) -> Self { Functor { name, arity } }

  /// The functor of an atom.
  #[must_use]
  pub const fn atom(name: AtomId) -> Self { Functor { name, arity: 0 } }

  /// The list constructor `'.'/2`.
  pub const DOT: Functor = Functor::new(Atoms::DOT, 2);
  /// The empty list `[]/0`.
  pub const NIL: Functor = Functor::atom(Atoms::NIL);
  /// The curly term constructor `'{}'/1`.
  pub const CURLY: Functor = Functor::new(Atoms::CURLY, 1);
}

/// A single heap slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
  /// A variable. Unbound if it points at its own slot.
  Ref(HeapIdx),
  /// A compound term whose functor cell is at the given index.
  Str(HeapIdx),
  /// An atom, or the functor cell at the head of a compound term.
  Con(Functor),
  /// A machine integer.
  Int(i64),
  /// Reserved for big integers.
  Big(u64),
  /// Reserved for references to global terms.
  Gbl(u64),
}

/// The tag of a [`Cell`], without its payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
  /// [`Cell::Ref`]
  Ref,
  /// [`Cell::Str`]
  Str,
  /// [`Cell::Con`]
  Con,
  /// [`Cell::Int`]
  Int,
  /// [`Cell::Big`]
  Big,
  /// [`Cell::Gbl`]
  Gbl,
}

impl Cell {
  /// The tag of this cell.
  #[must_use]
  pub fn tag(self) -> Tag {
    match self {
      Cell::Ref(_) => Tag::Ref,
      Cell::Str(_) => Tag::Str,
      Cell::Con(_) => Tag::Con,
      Cell::Int(_) => Tag::Int,
      Cell::Big(_) => Tag::Big,
      Cell::Gbl(_) => Tag::Gbl,
    }
  }

  /// The atom `name`.
  #[must_use]
  pub const fn atom(name: AtomId) -> Cell { Cell::Con(Functor::atom(name)) }
}

impl fmt::Display for Tag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Tag::Ref => "REF",
      Tag::Str => "STR",
      Tag::Con => "CON",
      Tag::Int => "INT",
      Tag::Big => "BIG",
      Tag::Gbl => "GBL",
    }
    .fmt(f)
  }
}

/// A handle to a term on the heap.
///
/// Heap cells are never reclaimed, so a handle stays usable for as long as the
/// [`TermEnv`](crate::TermEnv) that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Term(Cell);

impl Term {
  /// Wrap a cell.
  #[must_use]
  pub const fn new(c: Cell) -> Self { Term(c) }

  /// The wrapped cell, which may need dereferencing.
  #[must_use]
  pub const fn cell(self) -> Cell { self.0 }
}

impl Deref for Term {
  type Target = Cell;
  fn deref(&self) -> &Cell { &self.0 }
}

impl From<Cell> for Term {
  fn from(c: Cell) -> Self { Term(c) }
}

impl From<Term> for Cell {
  fn from(t: Term) -> Self { t.0 }
}

/// The cell arena.
#[derive(Clone, Debug, Default)]
pub struct Heap {
  cells: HeapVec<Cell>,
}

impl Heap {
  /// An empty heap.
  #[must_use]
  pub fn new() -> Self { Self::default() }

  /// The number of allocated cells.
  #[must_use]
  pub fn len(&self) -> usize { self.cells.len() }

  /// Returns true if nothing has been allocated.
  #[must_use]
  pub fn is_empty(&self) -> bool { self.cells.is_empty() }

  /// Append a cell, returning its index.
  pub fn push(&mut self, c: Cell) -> HeapIdx { self.cells.push(c) }

  /// The cell at `i`.
  #[must_use]
  pub fn get(&self, i: HeapIdx) -> Cell { self.cells[i] }

  /// Overwrite the cell at `i`.
  pub fn set(&mut self, i: HeapIdx, c: Cell) { self.cells[i] = c }

  /// Allocate a fresh unbound variable.
  pub fn new_ref(&mut self) -> Cell {
    let i = self.cells.next_id();
    self.cells.push(Cell::Ref(i));
    Cell::Ref(i)
  }

  /// Allocate the compound term `f(args...)`. `args` must have `f.arity` elements.
  pub fn new_str(&mut self, f: Functor, args: &[Cell]) -> Cell {
    debug_assert_eq!(args.len(), u32_as_usize(f.arity));
    let i = self.push(Cell::Con(f));
    self.cells.extend_from_slice(args);
    Cell::Str(i)
  }

  /// Like [`new_str`](Self::new_str), but an atom if `f` has arity 0.
  pub fn new_term(&mut self, f: Functor, args: &[Cell]) -> Cell {
    if f.arity == 0 { Cell::Con(f) } else { self.new_str(f, args) }
  }

  /// Follow bound variables until reaching a non-variable or an unbound variable.
  #[must_use]
  pub fn deref(&self, mut c: Cell) -> Cell {
    while let Cell::Ref(i) = c {
      let next = self.get(i);
      if next == c {
        break
      }
      c = next
    }
    c
  }

  /// The functor of a compound term or atom, after dereferencing.
  #[must_use]
  pub fn functor(&self, c: Cell) -> Option<Functor> {
    match self.deref(c) {
      Cell::Con(f) => Some(f),
      Cell::Str(i) => match self.get(i) {
        Cell::Con(f) => Some(f),
        _ => None,
      },
      _ => None,
    }
  }

  /// Argument `n` (zero-based) of the compound term `c`.
  ///
  /// The caller must check that `c` is a compound term with more than `n` arguments.
  #[must_use]
  pub fn arg(&self, c: Cell, n: usize) -> Cell {
    let Cell::Str(i) = self.deref(c) else { panic!("arg of non-compound term {c:?}") };
    debug_assert!(self.functor(c).is_some_and(|f| n < u32_as_usize(f.arity)));
    self.get(HeapIdx::from_usize(i.into_usize() + 1 + n))
  }

  /// The argument cells of the compound term whose functor cell is at `i`.
  #[must_use]
  pub(crate) fn args(&self, i: HeapIdx, arity: u32) -> &[Cell] {
    let start = i.into_usize() + 1;
    &self.cells.0[start..start + u32_as_usize(arity)]
  }

  /// Is `c` the empty list or a list cell? Only the outermost cell is inspected.
  #[must_use]
  pub fn is_list(&self, c: Cell) -> bool { self.is_empty_list(c) || self.is_dotted_pair(c) }

  /// Is `c` a list cell `'.'(H, T)`?
  #[must_use]
  pub fn is_dotted_pair(&self, c: Cell) -> bool {
    matches!(self.deref(c), Cell::Str(_)) && self.functor(c) == Some(Functor::DOT)
  }

  /// Is `c` the empty list?
  #[must_use]
  pub fn is_empty_list(&self, c: Cell) -> bool { self.deref(c) == Cell::Con(Functor::NIL) }

  /// Iterate over the cells in allocation order.
  pub fn iter(&self) -> impl Iterator<Item = (HeapIdx, &Cell)> { self.cells.enum_iter() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deref_follows_chains() {
    let mut h = Heap::new();
    let a = h.new_ref();
    let b = h.new_ref();
    let c = h.new_ref();
    assert_eq!(h.deref(c), c);
    let Cell::Ref(ib) = b else { unreachable!() };
    let Cell::Ref(ic) = c else { unreachable!() };
    h.set(ic, b);
    h.set(ib, a);
    assert_eq!(h.deref(c), a);
    h.set(HeapIdx(0), Cell::Int(7));
    assert_eq!(h.deref(c), Cell::Int(7));
  }

  #[test]
  fn compound_layout() {
    let mut h = Heap::new();
    let f = Functor::new(AtomId(100), 2);
    let x = h.new_ref();
    let t = h.new_str(f, &[Cell::Int(1), x]);
    assert_eq!(t, Cell::Str(HeapIdx(1)));
    assert_eq!(h.len(), 4);
    assert_eq!(h.functor(t), Some(f));
    assert_eq!(h.arg(t, 0), Cell::Int(1));
    assert_eq!(h.arg(t, 1), x);
    assert_eq!(h.new_term(Functor::atom(AtomId(100)), &[]), Cell::atom(AtomId(100)));
  }

  #[test]
  fn list_shapes() {
    let mut h = Heap::new();
    let nil = Cell::Con(Functor::NIL);
    let l = h.new_str(Functor::DOT, &[Cell::Int(1), nil]);
    let v = h.new_ref();
    assert!(h.is_list(nil) && h.is_empty_list(nil) && !h.is_dotted_pair(nil));
    assert!(h.is_list(l) && h.is_dotted_pair(l) && !h.is_empty_list(l));
    assert!(!h.is_list(v));
    assert!(!h.is_list(Cell::Con(Functor::DOT)));
  }
}
