use std::rc::Rc;

use ast::hir::{Host, Val};
use errors::YolkError;
use expect_test::{expect, Expect};
use indoc::indoc;

use crate::run_with_host;

#[derive(Default)]
struct CapturingHost {
    lines: Vec<String>,
}

impl Host for CapturingHost {
    fn print(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

fn run(src: &str) -> Result<Val, YolkError> {
    run_with_host(src, &mut CapturingHost::default())
}

fn run_lines(src: &str) -> Vec<String> {
    let mut host = CapturingHost::default();
    run_with_host(src, &mut host).unwrap();
    host.lines
}

fn e(src: &str, expect: Expect) {
    let printed = match run(src) {
        Ok(val) => format!("{:?}\n", val),
        Err(err) => format!("{:?}\n", err),
    };
    expect.assert_eq(&printed);
}

#[test]
fn test_literals_and_constants() {
    e("5", expect![[r#"
        Number(5)
    "#]]);
    e(r#""hi""#, expect![[r#"
        String("hi")
    "#]]);
    e("true", expect![[r#"
        Bool(true)
    "#]]);
    e("null", expect![[r#"
        Null
    "#]]);
    e("undefined", expect![[r#"
        Undefined
    "#]]);
}

#[test]
fn test_empty_program_is_null() {
    e("", expect![[r#"
        Null
    "#]]);
    e("{}", expect![[r#"
        Null
    "#]]);
}

#[test]
fn test_arithmetic() {
    e("+(1, 2)", expect![[r#"
        Number(3)
    "#]]);
    e("-(0, 12)", expect![[r#"
        Number(-12)
    "#]]);
    e("*(6, 7)", expect![[r#"
        Number(42)
    "#]]);
    e("/(7, 2)", expect![[r#"
        Number(3)
    "#]]);
    e("%(7, 2)", expect![[r#"
        Number(1)
    "#]]);
}

#[test]
fn test_string_concat() {
    e(r#"+("ab", "cd")"#, expect![[r#"
        String("abcd")
    "#]]);
    e(r#"+("n=", 5)"#, expect![[r#"
        String("n=5")
    "#]]);
    e(r#"+(5, "!")"#, expect![[r#"
        String("5!")
    "#]]);
}

#[test]
fn test_comparisons() {
    e("<=(1, 2)", expect![[r#"
        Bool(true)
    "#]]);
    e(">(1, 2)", expect![[r#"
        Bool(false)
    "#]]);
    e(r#"<("apple", "banana")"#, expect![[r#"
        Bool(true)
    "#]]);
    e(r#"==(1, "1")"#, expect![[r#"
        Bool(false)
    "#]]);
    e("!=(null, undefined)", expect![[r#"
        Bool(true)
    "#]]);
    e("==(null, null)", expect![[r#"
        Bool(true)
    "#]]);
}

#[test]
fn test_sequence_yields_last_value() {
    e("{ 1 2 3 }", expect![[r#"
        Number(3)
    "#]]);
}

#[test]
fn test_put_returns_and_binds() {
    // Both names end up bound in the enclosing scope, and the whole chain
    // evaluates to the bound value.
    e("put(x, put(y, 5)) +(x, y)", expect![[r#"
        Number(10)
    "#]]);
}

#[test]
fn test_put_inside_while_mutates_enclosing_scope() {
    e("put(i, 0) while(<(i, 3), { put(i, +(i, 1)) }) i", expect![[r#"
        Number(3)
    "#]]);
}

#[test]
fn test_while_returns_null() {
    e("put(i, 0) while(<(i, 1), { put(i, 1) })", expect![[r#"
        Null
    "#]]);
}

#[test]
fn test_sum_to_ten() {
    e(
        indoc! {r#"
            put(sum, 0)
            put(i, 1)
            while(<=(i, 10), {
              put(sum, +(sum, i))
              put(i, +(i, 1))
            })
            sum
        "#},
        expect![[r#"
            Number(55)
        "#]],
    );
}

#[test]
fn test_if_branches() {
    e(r#"if(<=(1, 0), { "A" }, { "B" })"#, expect![[r#"
        String("B")
    "#]]);
    e(r#"if(<=(0, 1), { "A" })"#, expect![[r#"
        String("A")
    "#]]);
    e("if(false, 1)", expect![[r#"
        Null
    "#]]);
}

#[test]
fn test_truthiness() {
    e("if(0, 1, 2)", expect![[r#"
        Number(2)
    "#]]);
    e(r#"if("", 1, 2)"#, expect![[r#"
        Number(2)
    "#]]);
    e(r#"if("x", 1, 2)"#, expect![[r#"
        Number(1)
    "#]]);
    e("if(null, 1, 2)", expect![[r#"
        Number(2)
    "#]]);
    e("if(undefined, 1, 2)", expect![[r#"
        Number(2)
    "#]]);
}

#[test]
fn test_closure_sees_definition_scope_mutation() {
    // `f` captures the top scope itself, not a snapshot of it.
    e("put(a, 5) func(f, { a }) put(a, 6) f()", expect![[r#"
        Number(6)
    "#]]);
}

#[test]
fn test_call_frames_shadow_instead_of_mutating() {
    // The `put` inside `g` writes g's call frame, so f's defining scope
    // still holds 5.
    e(
        "put(a, 5) func(f, { a }) func(g, { put(a, 6) f() }) g()",
        expect![[r#"
            Number(5)
        "#]],
    );
}

#[test]
fn test_currying_through_chained_application() {
    e(
        "func(add2, a, { func(inner, b, { +(a, b) }) }) add2(1)(2)",
        expect![[r#"
            Number(3)
        "#]],
    );
}

#[test]
fn test_recursion() {
    e(
        indoc! {r#"
            func(fact, n, {
              if(<=(n, 1), 1, *(n, fact(-(n, 1))))
            })
            fact(5)
        "#},
        expect![[r#"
            Number(120)
        "#]],
    );
}

#[test]
fn test_missing_and_extra_arguments() {
    e("func(f, x, { x }) f()", expect![[r#"
        Undefined
    "#]]);
    e("func(f, x, { x }) f(1, 2)", expect![[r#"
        Number(1)
    "#]]);
}

#[test]
fn test_print_forwards_to_host() {
    assert_eq!(run_lines(r#"print(1, "two", true)"#), vec!["1 two true"]);

    let triangle = indoc! {r#"
        put(i, 1)
        while(<=(i, 3), {
          put(str, "")
          put(j, 1)
          while(<=(j, i), {
            put(str, +(str, "*"))
            put(j, +(j, 1))
          })
          print(str)
          put(i, +(i, 1))
        })
    "#};
    assert_eq!(run_lines(triangle), vec!["*", "**", "***"]);
}

#[test]
fn test_print_returns_undefined() {
    e("print(1)", expect![[r#"
        Undefined
    "#]]);
}

#[test]
fn test_form_misuse_is_a_syntax_failure() {
    e("put(x)", expect![[r#"
        Syntax(SyntaxError { start: 0, end: 6, message: "put takes a name and a value" })
    "#]]);
    e("put(1, 2)", expect![[r#"
        Syntax(SyntaxError { start: 4, end: 5, message: "put binds a plain word" })
    "#]]);
    e("while(true)", expect![[r#"
        Syntax(SyntaxError { start: 0, end: 11, message: "while takes a condition and a body" })
    "#]]);
    e("if(1)", expect![[r#"
        Syntax(SyntaxError { start: 0, end: 5, message: "if takes a condition and one or two branches" })
    "#]]);
    e("func(f)", expect![[r#"
        Syntax(SyntaxError { start: 0, end: 7, message: "func takes a name, parameters, and a body" })
    "#]]);
    e("func(f, 1, { 1 })", expect![[r#"
        Syntax(SyntaxError { start: 8, end: 9, message: "func parameters must be plain words" })
    "#]]);
}

#[test]
fn test_unbound_name_failure() {
    e("zzz", expect![[r#"
        Lookup(LookupError { start: 0, end: 3, name: "zzz" })
    "#]]);
}

#[test]
fn test_type_failures() {
    e("5()", expect![[r#"
        Type(TypeError { start: 0, end: 1, message: "Number is not callable" })
    "#]]);
    e(r#"-(1, "x")"#, expect![[r#"
        Type(TypeError { start: 5, end: 8, message: "- expects Number, found String" })
    "#]]);
    e("/(1, 0)", expect![[r#"
        Type(TypeError { start: 5, end: 6, message: "division by zero" })
    "#]]);
    e("+(1)", expect![[r#"
        Type(TypeError { start: 0, end: 1, message: "+ takes exactly two arguments" })
    "#]]);
}

#[test]
fn test_failures_render_as_reports() {
    // One rendered report per failure kind, each labelling the offending
    // span with its message.
    let src = "put(x)";
    let report = run(src).unwrap_err().to_report(src);
    assert!(report.contains("syntax failure"), "{report}");
    assert!(report.contains("put takes a name and a value"), "{report}");

    let src = "zzz";
    let report = run(src).unwrap_err().to_report(src);
    assert!(report.contains("unbound name"), "{report}");
    assert!(
        report.contains("`zzz` is not bound in any enclosing scope"),
        "{report}"
    );

    let src = "5()";
    let report = run(src).unwrap_err().to_report(src);
    assert!(report.contains("type failure"), "{report}");
    assert!(report.contains("Number is not callable"), "{report}");
}

#[test]
fn test_root_scope_is_shared_across_runs() {
    assert!(Rc::ptr_eq(&crate::root_env(), &crate::root_env()));
}

#[test]
fn test_runs_are_independent() {
    // A binding made by one run is invisible to the next.
    assert_eq!(run("put(x, 1) x"), Ok(Val::Number(1)));
    assert!(matches!(run("x"), Err(YolkError::Lookup(_))));
}
