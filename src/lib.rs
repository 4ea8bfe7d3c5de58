//! Prolog terms on a heap of tagged cells.
//!
//! ```text
//! USAGE:
//! plterm [--debug] <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     tokenize   Print the tokens of a file, one per line
//!     parse      Parse a file and print each clause back
//!     unify      Unify the first two clauses of a file
//! ```
//!
//! A [`TermEnv`] owns a [`Heap`] of [`Cell`]s, the atom [`Interner`], an [`OpTable`] and the
//! [`Trail`]. Terms are read with [`TermEnv::parse`], printed with [`TermEnv::to_string`],
//! and compared with [`TermEnv::unify`] and [`TermEnv::equal`]. Bindings made inside a
//! [`Transaction`] are undone unless it is committed.

// rust lints we want
#![warn(bare_trait_objects, elided_lifetimes_in_paths,
  missing_copy_implementations, missing_debug_implementations, future_incompatible,
  rust_2018_idioms, trivial_numeric_casts, variant_size_differences, unreachable_pub,
  unused, missing_docs)]
// all the clippy
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
// all the clippy::restriction lints we want
#![warn(clippy::get_unwrap, clippy::rest_pat_in_fully_bound_structs,
  clippy::string_add, clippy::unwrap_used)]
// all the clippy lints we don't want
#![allow(clippy::cognitive_complexity, clippy::comparison_chain,
  clippy::default_trait_access, clippy::enum_glob_use, clippy::missing_const_for_fn,
  clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions,
  clippy::multiple_crate_versions, clippy::option_if_let_else, clippy::redundant_pub_crate,
  clippy::semicolon_if_nothing_returned, clippy::shadow_unrelated, clippy::too_many_lines,
  clippy::use_self)]

pub mod atoms;
pub mod interner;
pub mod heap;
pub mod trail;
pub mod unify;
pub mod ops;
pub mod parser;
pub mod emitter;
pub mod env;
pub mod report;

pub use atoms::Atoms;
pub use emitter::{Emitter, needs_quotes, write_atom};
pub use env::TermEnv;
pub use heap::{Cell, Functor, Heap, Tag, Term};
pub use interner::Interner;
pub use ops::{Fixity, OpDef, OpTable, OpType};
pub use parser::{ParseError, ParseErrorKind, Parser};
pub use trail::Trail;
pub use unify::Transaction;
pub use plterm_lexer::{Token, TokenError, TokenErrorKind, TokenKind, Tokenizer};
pub use plterm_util::{AtomId, BoxError, HeapIdx, Position, Span};
