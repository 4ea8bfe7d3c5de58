//! Strongly typed indices into the atom table and the heap.

use std::fmt;
use std::iter::FromIterator;
use std::ops::{Deref, DerefMut, Index, IndexMut};

/// Declares a newtyped index and a vector that can only be indexed by it.
#[macro_export]
macro_rules! id_wrapper {
  ($id:ident: $ty:ty, $vec:ident) => {
    $crate::id_wrapper!($id: $ty, $vec,
      concat!("An index into a [`", stringify!($vec), "`]"));
  };
  ($id:ident: $ty:ty, $vec:ident, $svec:expr) => {
    #[doc=$svec]
    #[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
    pub struct $id(pub $ty);

    impl $id {
      /// Convert this newtyped integer into its underlying integer.
      #[must_use]
      pub fn into_inner(self) -> $ty { self.0 }

      /// Convert this index into a `usize`.
      #[must_use]
      pub fn into_usize(self) -> usize { self.0 as usize }

      /// Construct an index from a `usize`, panicking if it does not fit.
      #[must_use]
      pub fn from_usize(n: usize) -> Self {
        $id(<$ty>::try_from(n).expect("index space exhausted"))
      }
    }

    impl fmt::Debug for $id {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
    }

    /// A vector wrapper with a strongly typed index interface.
    #[derive(Clone, Debug)]
    pub struct $vec<T>(pub Vec<T>);

    #[allow(dead_code)]
    impl<T> $vec<T> {
      /// Get a reference to the element at the given index.
      #[must_use]
      pub fn get(&self, i: $id) -> Option<&T> { self.0.get(i.0 as usize) }

      /// Get a mutable reference to the element at the given index.
      #[must_use]
      pub fn get_mut(&mut self, i: $id) -> Option<&mut T> { self.0.get_mut(i.0 as usize) }

      /// Append an element, returning its index.
      pub fn push(&mut self, t: T) -> $id {
        let id = $id::from_usize(self.0.len());
        self.0.push(t);
        id
      }

      /// The index that the next pushed element will receive.
      #[must_use]
      pub fn next_id(&self) -> $id { $id::from_usize(self.0.len()) }

      /// Returns the equivalent of `iter().enumerate()` but with the right indexing type.
      pub fn enum_iter(&self) -> impl Iterator<Item=($id, &T)> {
        self.0.iter().enumerate().map(|(i, t)| ($id::from_usize(i), t))
      }
    }

    impl<T> Default for $vec<T> {
      fn default() -> $vec<T> { $vec(Vec::new()) }
    }

    impl<T> Index<$id> for $vec<T> {
      type Output = T;
      fn index(&self, i: $id) -> &T { &self.0[i.0 as usize] }
    }

    impl<T> IndexMut<$id> for $vec<T> {
      fn index_mut(&mut self, i: $id) -> &mut T { &mut self.0[i.0 as usize] }
    }

    impl<T> Deref for $vec<T> {
      type Target = Vec<T>;
      fn deref(&self) -> &Vec<T> { &self.0 }
    }

    impl<T> DerefMut for $vec<T> {
      fn deref_mut(&mut self) -> &mut Vec<T> { &mut self.0 }
    }

    impl<T> FromIterator<T> for $vec<T> {
      fn from_iter<I: IntoIterator<Item=T>>(iter: I) -> Self { $vec(Vec::from_iter(iter)) }
    }
  };
}

id_wrapper!(AtomId: u32, AtomVec);
id_wrapper!(HeapIdx: u32, HeapVec);
