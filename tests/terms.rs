use plterm::{Cell, Functor, OpType, TermEnv, Term};

const SAMPLE: &str = "foo(1, bar(kallekula, [1,2,baz]), Foo, kallekula, world, test4711, Foo, Bar).";

#[test]
fn print_and_read_back() {
  let mut env = TermEnv::new();
  let t = env.parse(SAMPLE).expect("parses");
  let printed = env.to_string(t);
  assert_eq!(printed, "foo(1, bar(kallekula, [1, 2, baz]), Foo, kallekula, world, test4711, Foo, Bar)");
  let u = env.parse(&format!("{printed}.")).expect("reparses");
  assert_eq!(env.to_string(u), printed);
  assert!(!env.equal(t, u));
  assert!(env.equal(env.arg(t, 1), env.arg(u, 1)));
  assert!(env.unify(t, u));
  assert!(env.equal(t, u));
}

#[test]
fn reading_is_independent_of_the_environment() {
  for text in [
    "a :- b, (c -> d ; e).",
    "X = f(Y, 'hello world', \"hi\", [a|T]).",
    "'\\n'(- 1, -1, - a, 1 - -1, {x, y}, '[]', [], '{}').",
    "p(- (1), -(-(1)), \\+ (a, b), (:-), f(:-, ',')).",
    "a = (b :- c).",
    "'|'(a, b).",
    "f((a '|' b), (c | d)).",
  ] {
    let mut e1 = TermEnv::new();
    let t1 = e1.parse(text).unwrap_or_else(|e| panic!("{text:?}: {e}"));
    let s1 = e1.to_string(t1);
    let mut e2 = TermEnv::new();
    let t2 = e2.parse(&format!("{s1} .")).unwrap_or_else(|e| panic!("{s1:?}: {e}"));
    assert_eq!(e2.to_string(t2), s1, "{text:?}");
  }
}

#[test]
fn failed_unification_is_invisible() {
  let mut env = TermEnv::new();
  let ts = env.parse_all("f(X, g(Y, X), [1, 2]).\nf(a, g(b, Z), [1, 3]).\n").expect("parses");
  let before = env.status();
  let cells: Vec<Cell> = env.heap().iter().map(|(_, &c)| c).collect();
  assert!(!env.unify(ts[0], ts[1]));
  assert_eq!(env.status(), before);
  assert!(env.heap().iter().map(|(_, &c)| c).eq(cells));
  assert_eq!(env.to_string(ts[0]), "f(X, g(Y, X), [1, 2])");
  assert_eq!(env.to_string(ts[1]), "f(a, g(b, Z), [1, 3])");
}

#[test]
fn successful_unification_shares_bindings() {
  let mut env = TermEnv::new();
  let ts = env.parse_all("f(X, g(Y, X)).\nf(a, g(b, Z)).\n").expect("parses");
  assert!(env.unify(ts[0], ts[1]));
  assert_eq!(env.to_string(ts[0]), "f(a, g(b, a))");
  assert_eq!(env.to_string(ts[1]), "f(a, g(b, a))");
  assert_eq!(env.stack_depth(), 0);
  assert!(env.equal(ts[0], ts[1]));
}

#[test]
fn deep_terms_do_not_overflow() {
  let mut env = TermEnv::new();
  let nil = env.empty_list();
  let mut a = nil;
  let mut b = nil;
  for i in 0..200_000 {
    let x = env.new_ref();
    let n = env.new_int(i);
    a = env.new_compound("s", &[n, a]);
    b = env.new_compound("s", &[x, b]);
  }
  assert!(!env.equal(a, b));
  assert!(env.unify(a, b));
  assert!(env.equal(a, b));
}

#[test]
fn deep_terms_print_and_read_back() {
  let mut env = TermEnv::new();
  let mut t = env.empty_list();
  for i in 0..200_000 {
    let n = env.new_int(i);
    t = env.new_compound("s", &[n, t]);
  }
  let printed = env.to_string(t);
  assert!(printed.starts_with("s(199999, s(199998, "));
  assert!(printed.ends_with(&format!("s(0, []){}", ")".repeat(199_999))));
  let u = env.parse(&env.to_clause(t)).expect("reparses");
  assert!(env.equal(t, u));
}

#[test]
fn long_conjunctions() {
  let goals = vec!["g"; 100_000].join(", ");
  let text = format!("p :- {goals}.\n");
  let mut env = TermEnv::new();
  let t = env.parse(&text).expect("parses");
  assert_eq!(env.to_string(t), format!("p :- {goals}"));
  let comma = env.functor_of(",", 2);
  let mut body = env.arg(t, 1);
  let mut n = 1;
  while env.has_functor(body, comma) {
    body = env.arg(body, 1);
    n += 1;
  }
  assert_eq!(n, 100_000);
  let list = format!("[{goals}].\n");
  let l = env.parse(&list).expect("parses");
  assert_eq!(env.to_string(l), format!("[{goals}]"));
}

#[test]
fn generated_names_avoid_source_names() {
  let mut env = TermEnv::new();
  let t = env.parse("f(_G1, _, _G2, _, X).").expect("parses");
  let printed = env.to_string(t);
  let u = env.parse(&env.to_clause(t)).expect("reparses");
  assert_eq!(env.to_string(u), printed);
  let args: Vec<_> = (0..5).map(|i| env.arg(u, i)).collect();
  for (i, a) in args.iter().enumerate() {
    for b in &args[i + 1..] {
      assert!(!env.equal(*a, *b), "{printed}");
    }
  }
  let x1 = env.arg(t, 4);
  let v = env.parse("g(X).").expect("parses");
  let x2 = env.arg(v, 0);
  let both = env.new_compound("h", &[x1, x2, x1]);
  assert_eq!(env.to_string(both), "h(X, X_, X)");
}

#[test]
fn clauses_print_with_a_separate_full_stop() {
  let mut env = TermEnv::new();
  for (text, clause) in [
    ("a = @@ .", "a = @@ ."),
    ("X = 1 .", "X = 1 ."),
    ("X = - .", "X = (-)."),
    ("f(x).", "f(x)."),
  ] {
    let t = env.parse(text).unwrap_or_else(|e| panic!("{text:?}: {e}"));
    let printed = env.to_clause(t);
    assert_eq!(printed, clause);
    let u = env.parse(&printed).unwrap_or_else(|e| panic!("{printed:?}: {e}"));
    assert!(env.unify(t, u), "{printed:?}");
  }
}

#[test]
fn unify_is_symmetric_for_variables() {
  let mut env = TermEnv::new();
  let x = env.new_ref();
  let y = env.new_ref();
  assert!(env.unify(x, y));
  assert!(env.equal(x, y));
  let one = env.new_int(1);
  assert!(env.unify(one, y));
  assert_eq!(env.deref(x), one);
  assert!(!env.unify(x, env.new_int(2)));
  assert_eq!(env.deref(y), one);
}

#[test]
fn list_predicates() {
  let mut env = TermEnv::new();
  let ts = env.parse_all("[1, 2].\n[].\n'[]'.\n'.'(a, b).\nf(x).\n").expect("parses");
  let shapes: Vec<_> = ts.iter()
    .map(|&t| (env.is_list(t), env.is_dotted_pair(t), env.is_empty_list(t)))
    .collect();
  assert_eq!(shapes, [
    (true, true, false),
    (true, false, true),
    (true, false, true),
    (true, true, false),
    (false, false, false),
  ]);
  assert!(env.has_functor(ts[0], Functor::DOT));
  assert!(env.has_functor(ts[1], Functor::NIL));
  assert_eq!(env.empty_list(), ts[1]);
}

#[test]
fn status_reports_sizes() {
  let mut env = TermEnv::new();
  let t = env.parse("p(X, Y).").expect("parses");
  assert_eq!(env.status(), "term_env::status() { heap_size=5,stack_size=0,trail_size=0}");
  assert!(env.unify(env.arg(t, 0), env.arg(t, 1)));
  assert_eq!(env.status(), "term_env::status() { heap_size=5,stack_size=0,trail_size=1}");
  assert_eq!(env.heap_size(), 5);
  assert_eq!(env.trail().depth(), 1);
}

#[test]
fn user_operators() {
  let mut env = TermEnv::new();
  env.ops_mut().add("===>", 1200, OpType::Xfx);
  env.ops_mut().add("done", 100, OpType::Xf);
  let t = env.parse("a, b ===> c done.").expect("parses");
  assert_eq!(env.to_string(t), "a, b ===> c done");
  let Some(f) = env.functor(t) else { panic!("not compound") };
  assert_eq!((env.atom_name(f.name), f.arity), ("===>", 2));
  let rhs = env.arg(t, 1);
  assert_eq!(env.functor(rhs).map(|f| env.atom_name(f.name).to_owned()), Some("done".to_owned()));
}

#[test]
#[should_panic(expected = "not implemented")]
fn unification_of_big_cells_is_unimplemented() {
  let mut env = TermEnv::new();
  let a = env.new_compound("f", &[Term::new(Cell::Big(7))]);
  let b = env.new_compound("f", &[Term::new(Cell::Big(8))]);
  env.unify(a, b);
}
