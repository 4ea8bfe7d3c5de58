//! The undo log of variable bindings.
use plterm_util::HeapIdx;
use crate::heap::{Cell, Heap};

/// Heap slots bound since some earlier point, in binding order.
#[derive(Clone, Debug, Default)]
pub struct Trail(Vec<HeapIdx>);

impl Trail {
  /// Record that slot `i` was bound.
  pub fn push(&mut self, i: HeapIdx) { self.0.push(i) }

  /// The number of entries.
  #[must_use]
  pub fn depth(&self) -> usize { self.0.len() }

  /// The entries from `from` onward.
  #[must_use]
  pub fn entries(&self, from: usize) -> &[HeapIdx] { &self.0[from..] }

  /// Reset every slot recorded in entries `from..to` to an unbound variable.
  pub fn unwind(&self, heap: &mut Heap, from: usize, to: usize) {
    for &i in &self.0[from..to] {
      heap.set(i, Cell::Ref(i))
    }
  }

  /// Drop every entry at or above `to`.
  pub fn trim(&mut self, to: usize) { self.0.truncate(to) }
}
