//! The operator table consulted by the parser and the printer.
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Where an operator goes relative to its arguments.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Fixity {
  /// `op X`
  Prefix,
  /// `X op Y`
  Infix,
  /// `X op`
  Postfix,
}

/// An operator class. `x` marks an argument of strictly lower priority than the operator,
/// `y` one of lower or equal priority.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum OpType { Xfx, Xfy, Yfx, Fy, Fx, Xf, Yf }

impl OpType {
  /// The fixity of operators of this class.
  #[must_use]
  pub fn fixity(self) -> Fixity {
    match self {
      OpType::Xfx | OpType::Xfy | OpType::Yfx => Fixity::Infix,
      OpType::Fy | OpType::Fx => Fixity::Prefix,
      OpType::Xf | OpType::Yf => Fixity::Postfix,
    }
  }
}

impl fmt::Display for OpType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OpType::Xfx => "xfx",
      OpType::Xfy => "xfy",
      OpType::Yfx => "yfx",
      OpType::Fy => "fy",
      OpType::Fx => "fx",
      OpType::Xf => "xf",
      OpType::Yf => "yf",
    }
    .fmt(f)
  }
}

impl FromStr for OpType {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, String> {
    Ok(match s {
      "xfx" => OpType::Xfx,
      "xfy" => OpType::Xfy,
      "yfx" => OpType::Yfx,
      "fy" => OpType::Fy,
      "fx" => OpType::Fx,
      "xf" => OpType::Xf,
      "yf" => OpType::Yf,
      _ => return Err(format!("unknown operator type '{s}'")),
    })
  }
}

/// A single operator definition.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OpDef {
  /// The priority, 1 to 1200.
  pub prec: u32,
  /// The class.
  pub ty: OpType,
}

impl OpDef {
  /// The maximum priority of the left argument (infix and postfix operators).
  #[must_use]
  pub fn left_max(self) -> u32 {
    match self.ty {
      OpType::Yfx | OpType::Yf => self.prec,
      _ => self.prec - 1,
    }
  }

  /// The maximum priority of the right argument (infix and prefix operators).
  #[must_use]
  pub fn right_max(self) -> u32 {
    match self.ty {
      OpType::Xfy | OpType::Fy => self.prec,
      _ => self.prec - 1,
    }
  }
}

/// Operator definitions for one name, indexed by [`Fixity`].
type OpSlots = [Option<OpDef>; 3];

/// The operator table.
#[derive(Clone, Debug)]
pub struct OpTable {
  ops: HashMap<Box<str>, OpSlots>,
}

impl Default for OpTable {
  fn default() -> Self { Self::iso() }
}

const ISO_OPS: &[(u32, OpType, &[&str])] = &[
  (1200, OpType::Xfx, &[":-", "-->"]),
  (1200, OpType::Fx, &[":-", "?-"]),
  (1150, OpType::Fx, &["dynamic", "discontiguous", "initialization", "multifile"]),
  (1100, OpType::Xfy, &[";", "|"]),
  (1050, OpType::Xfy, &["->", "*->"]),
  (1000, OpType::Xfy, &[","]),
  (900, OpType::Fy, &["\\+"]),
  (700, OpType::Xfx, &[
    "=", "\\=", "==", "\\==", "@<", "@>", "@=<", "@>=", "=..", "is", "=:=", "=\\=", "<", ">",
    "=<", ">=",
  ]),
  (600, OpType::Xfy, &[":"]),
  (500, OpType::Yfx, &["+", "-", "/\\", "\\/", "xor"]),
  (400, OpType::Yfx, &["*", "/", "//", "rem", "mod", "div", "<<", ">>"]),
  (200, OpType::Xfx, &["**"]),
  (200, OpType::Xfy, &["^"]),
  (200, OpType::Fy, &["-", "+", "\\"]),
];

impl OpTable {
  /// A table with no operators.
  #[must_use]
  pub fn empty() -> Self { OpTable { ops: HashMap::new() } }

  /// The standard operator table.
  #[must_use]
  pub fn iso() -> Self {
    let mut table = Self::empty();
    for &(prec, ty, names) in ISO_OPS {
      for name in names {
        table.add(name, prec, ty)
      }
    }
    table
  }

  /// Define `name` as an operator of class `ty`, replacing any operator of the same fixity.
  /// A priority of 0 removes the definition.
  pub fn add(&mut self, name: &str, prec: u32, ty: OpType) {
    let slot = ty.fixity() as usize;
    if prec == 0 {
      if let Some(slots) = self.ops.get_mut(name) {
        slots[slot] = None;
        if slots.iter().all(Option::is_none) {
          self.ops.remove(name);
        }
      }
    } else {
      self.ops.entry(name.into()).or_default()[slot] = Some(OpDef { prec: prec.min(1200), ty })
    }
  }

  /// The definition of `name` with the given fixity.
  #[must_use]
  pub fn get(&self, name: &str, fixity: Fixity) -> Option<OpDef> {
    self.ops.get(name).and_then(|slots| slots[fixity as usize])
  }

  /// The prefix definition of `name`.
  #[must_use]
  pub fn prefix(&self, name: &str) -> Option<OpDef> { self.get(name, Fixity::Prefix) }

  /// The infix definition of `name`.
  #[must_use]
  pub fn infix(&self, name: &str) -> Option<OpDef> { self.get(name, Fixity::Infix) }

  /// The postfix definition of `name`.
  #[must_use]
  pub fn postfix(&self, name: &str) -> Option<OpDef> { self.get(name, Fixity::Postfix) }

  /// Is `name` an operator of any fixity?
  #[must_use]
  pub fn is_op(&self, name: &str) -> bool { self.ops.contains_key(name) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn iso_defaults() {
    let t = OpTable::iso();
    assert_eq!(t.infix(":-"), Some(OpDef { prec: 1200, ty: OpType::Xfx }));
    assert_eq!(t.prefix(":-"), Some(OpDef { prec: 1200, ty: OpType::Fx }));
    assert_eq!(t.infix("-").map(|d| d.prec), Some(500));
    assert_eq!(t.prefix("-").map(|d| d.ty), Some(OpType::Fy));
    assert_eq!(t.infix("|").map(|d| d.prec), Some(1100));
    assert!(t.postfix("-").is_none());
    assert!(!t.is_op("foo"));
  }

  #[test]
  fn argument_priorities() {
    let minus = OpDef { prec: 500, ty: OpType::Yfx };
    assert_eq!((minus.left_max(), minus.right_max()), (500, 499));
    let comma = OpDef { prec: 1000, ty: OpType::Xfy };
    assert_eq!((comma.left_max(), comma.right_max()), (999, 1000));
  }

  #[test]
  fn add_and_remove() {
    let mut t = OpTable::iso();
    t.add("likes", 700, "xfx".parse().expect("valid type"));
    assert!(t.is_op("likes"));
    t.add("likes", 0, OpType::Xfx);
    assert!(!t.is_op("likes"));
    t.add("-", 0, OpType::Fy);
    assert!(t.prefix("-").is_none() && t.infix("-").is_some());
    assert!("yfy".parse::<OpType>().is_err());
  }
}
