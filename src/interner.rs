//! The atom table.
use std::collections::HashMap;
use plterm_util::{AtomId, AtomVec};
use crate::atoms::Atoms;

/// Maps atom names to compact [`AtomId`]s and back.
///
/// Each [`TermEnv`](crate::TermEnv) owns one interner; ids are only meaningful
/// relative to the interner that produced them. Names are never removed.
#[derive(Clone, Debug)]
pub struct Interner {
  names: AtomVec<Box<str>>,
  ids: HashMap<Box<str>, AtomId>,
}

impl Default for Interner {
  fn default() -> Self { Self::new() }
}

impl Interner {
  /// Create an interner holding the pinned [`Atoms`].
  #[must_use]
  pub fn new() -> Self {
    let mut this = Interner { names: AtomVec::default(), ids: HashMap::new() };
    Atoms::on_atoms(|name, id| {
      let new = this.intern(name);
      assert_eq!(new, id, "pinned atom {name:?} out of order");
    });
    this
  }

  /// Get the id of `name`, adding it if it is new.
  pub fn intern(&mut self, name: &str) -> AtomId {
    if let Some(&id) = self.ids.get(name) {
      return id
    }
    let id = self.names.push(name.into());
    self.ids.insert(name.into(), id);
    id
  }

  /// Get the id of `name` if it has been interned.
  #[must_use]
  pub fn get(&self, name: &str) -> Option<AtomId> { self.ids.get(name).copied() }

  /// The name of an atom.
  #[must_use]
  pub fn name(&self, id: AtomId) -> &str { &self.names[id] }

  /// The number of distinct atoms.
  #[must_use]
  pub fn len(&self) -> usize { self.names.len() }

  /// Always false, since the pinned atoms are present from the start.
  #[must_use]
  pub fn is_empty(&self) -> bool { self.names.is_empty() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pinned_atoms() {
    let mut i = Interner::new();
    assert_eq!(i.name(Atoms::NIL), "[]");
    assert_eq!(i.intern("|"), Atoms::BAR);
    assert_eq!(i.get(""), Some(Atoms::EMPTY));
  }

  #[test]
  fn intern_is_stable() {
    let mut i = Interner::new();
    let n = i.len();
    let a = i.intern("kallekula");
    assert_eq!(i.intern("kallekula"), a);
    assert_eq!(i.len(), n + 1);
    assert_eq!(i.name(a), "kallekula");
    assert_eq!(i.get("world"), None);
  }
}
