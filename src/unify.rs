//! Unification, structural equality and the transactions that make binding reversible.
//!
//! Both algorithms walk their arguments with an explicit stack of pending pairs, so the depth of
//! a term is limited by memory rather than by the call stack. Argument pairs are pushed in
//! reverse, so they are visited left to right.

use std::ops::{Deref, DerefMut};
use log::trace;
use plterm_util::u32_as_usize;
use crate::env::TermEnv;
use crate::heap::{Cell, Term};

/// A reversible unit of work on a [`TermEnv`].
///
/// While the transaction is open, `register_hb` is the heap size at the time it was opened, so
/// every binding of an older variable is trailed. [`commit`](Self::commit) keeps the bindings;
/// dropping the transaction without committing undoes them and trims the trail and the work stack
/// back to where they were.
///
/// The transaction dereferences to the environment, so further work (including nested
/// transactions) can be done through it.
#[derive(Debug)]
pub struct Transaction<'a> {
  env: &'a mut TermEnv,
  trail_depth: usize,
  stack_depth: usize,
  old_hb: usize,
  committed: bool,
}

impl<'a> Transaction<'a> {
  pub(crate) fn new(env: &'a mut TermEnv) -> Self {
    let old_hb = std::mem::replace(&mut env.register_hb, env.heap.len());
    Transaction {
      trail_depth: env.trail.depth(),
      stack_depth: env.stack.len(),
      old_hb,
      committed: false,
      env,
    }
  }

  /// Keep everything done in this transaction. The bindings remain on the trail, so an enclosing
  /// transaction that rolls back will still undo them.
  pub fn commit(mut self) {
    self.env.register_hb = self.old_hb;
    self.committed = true;
  }

  /// Undo everything done in this transaction.
  pub fn rollback(self) { drop(self) }
}

impl Drop for Transaction<'_> {
  fn drop(&mut self) {
    if self.committed {
      return
    }
    let env = &mut *self.env;
    let to = env.trail.depth();
    trace!("rollback: unbinding {:?}", env.trail.entries(self.trail_depth));
    env.trail.unwind(&mut env.heap, self.trail_depth, to);
    env.trail.trim(self.trail_depth);
    env.stack.truncate(self.stack_depth);
    env.register_hb = self.old_hb;
  }
}

impl Deref for Transaction<'_> {
  type Target = TermEnv;
  fn deref(&self) -> &TermEnv { self.env }
}

impl DerefMut for Transaction<'_> {
  fn deref_mut(&mut self) -> &mut TermEnv { self.env }
}

impl TermEnv {
  /// Open a [`Transaction`].
  pub fn transaction(&mut self) -> Transaction<'_> { Transaction::new(self) }

  /// Bind the variable `a` to `b`, trailing the binding if `a` is older than the current
  /// transaction.
  pub(crate) fn bind(&mut self, a: Cell, b: Cell) {
    let Cell::Ref(i) = a else { unreachable!("bind of non-variable {a:?}") };
    self.heap.set(i, b);
    if i.into_usize() < self.register_hb {
      self.trail.push(i)
    }
  }

  /// Unify `a` with `b`, returning the open transaction on success and rolling back on failure.
  pub fn try_unify(&mut self, a: Term, b: Term) -> Option<Transaction<'_>> {
    let mut tx = self.transaction();
    if tx.unify_helper(a.cell(), b.cell()) { Some(tx) } else { None }
  }

  /// Unify `a` with `b`. On failure every binding made along the way is undone, leaving the
  /// environment exactly as it was.
  pub fn unify(&mut self, a: Term, b: Term) -> bool {
    match self.try_unify(a, b) {
      Some(tx) => {
        tx.commit();
        true
      }
      None => false,
    }
  }

  fn unify_helper(&mut self, a: Cell, b: Cell) -> bool {
    let d = self.stack.len();
    self.stack.push(b);
    self.stack.push(a);
    while self.stack.len() > d {
      let a = self.pop();
      let b = self.pop();
      let (a, b) = (self.heap.deref(a), self.heap.deref(b));
      if a == b {
        continue
      }
      match (a, b) {
        (Cell::Ref(ia), Cell::Ref(ib)) => if ia < ib { self.bind(b, a) } else { self.bind(a, b) },
        (Cell::Ref(_), _) => self.bind(a, b),
        (_, Cell::Ref(_)) => self.bind(b, a),
        _ if a.tag() != b.tag() => return false,
        (Cell::Con(_) | Cell::Int(_), _) => return false,
        (Cell::Str(ia), Cell::Str(ib)) => {
          let (Cell::Con(fa), Cell::Con(fb)) = (self.heap.get(ia), self.heap.get(ib)) else {
            unreachable!("compound term without functor")
          };
          if fa != fb {
            return false
          }
          for k in (0..u32_as_usize(fa.arity)).rev() {
            let xb = self.heap.args(ib, fb.arity)[k];
            let xa = self.heap.args(ia, fa.arity)[k];
            self.stack.push(xb);
            self.stack.push(xa);
          }
        }
        _ => unimplemented!("unification of {} cells", a.tag()),
      }
    }
    true
  }

  fn pop(&mut self) -> Cell {
    let Some(c) = self.stack.pop() else { unreachable!("unify stack underflow") };
    c
  }

  /// Structural equality. Unlike [`unify`](Self::unify) this never binds anything: two distinct
  /// unbound variables are unequal.
  #[must_use]
  pub fn equal(&self, a: Term, b: Term) -> bool {
    let mut stack = vec![(a.cell(), b.cell())];
    while let Some((a, b)) = stack.pop() {
      let (a, b) = (self.heap.deref(a), self.heap.deref(b));
      if a == b {
        continue
      }
      let (Cell::Str(ia), Cell::Str(ib)) = (a, b) else { return false };
      let (fa, fb) = (self.heap.get(ia), self.heap.get(ib));
      if fa != fb {
        return false
      }
      let Cell::Con(f) = fa else { unreachable!("compound term without functor") };
      let pairs = self.heap.args(ia, f.arity).iter().zip(self.heap.args(ib, f.arity));
      stack.extend(pairs.rev().map(|(&x, &y)| (x, y)));
    }
    true
  }
}
