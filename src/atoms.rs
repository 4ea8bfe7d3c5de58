//! Atoms the engine needs to recognize without a table lookup.
use plterm_util::AtomId;

macro_rules! make_atoms {
  {consts $n:expr;} => {};
  {consts $n:expr; $(#[$attr:meta])* $x:ident $doc0:expr, $($xs:tt)*} => {
    #[doc=$doc0]
    $(#[$attr])*
    pub const $x: AtomId = AtomId($n);
    make_atoms! {consts Atoms::$x.0+1; $($xs)*}
  };
  {$($(#[$attr:meta])* $x:ident: $e:expr,)*} => {
    /// Pinned atoms. A fresh [`Interner`](crate::Interner) assigns exactly these ids.
    #[derive(Copy, Clone, Debug)]
    pub struct Atoms;

    impl Atoms {
      make_atoms! {consts 0; $($(#[$attr])* $x concat!("The atom `", $e, "`.\n"),)*}

      /// Call `f` on every pinned atom, in increasing id order.
      pub fn on_atoms(mut f: impl FnMut(&str, AtomId)) { $(f($e, Atoms::$x);)* }
    }
  }
}

make_atoms! {
  /// The empty list.
  NIL: "[]",
  /// The list constructor, `'.'(Head, Tail)`.
  DOT: ".",
  /// Conjunction, and the argument separator.
  COMMA: ",",
  /// `{}`; `{X}` reads as `'{}'(X)`.
  CURLY: "{}",
  /// Minus, which also marks negative literals.
  MINUS: "-",
  /// Disjunction. An infix `|` reads as `;`.
  SEMI: ";",
  /// The bar, as an atom.
  BAR: "|",
  /// The neck of a rule.
  NECK: ":-",
  /// The empty atom, `''`.
  EMPTY: "",
}
