use std::cmp::Ordering;
use std::rc::Rc;

use ast::{
    hir::{Env, Host, Native, NativeFunction, RFunc, TVal, Val},
    trivia::Range,
};
use errors::{TypeError, YolkError};
use smol_str::SmolStr;

fn type_error(span: Range, message: impl Into<SmolStr>) -> YolkError {
    YolkError::Type(TypeError {
        start: span.start,
        end: span.end,
        message: message.into(),
    })
}

fn binary<'a>(op: &str, span: Range, args: &'a [TVal]) -> Result<(&'a TVal, &'a TVal), YolkError> {
    match args {
        [l, r] => Ok((l, r)),
        _ => Err(type_error(span, format!("{op} takes exactly two arguments"))),
    }
}

fn number(op: &str, operand: &TVal) -> Result<isize, YolkError> {
    match operand.inner {
        Val::Number(n) => Ok(n),
        _ => Err(type_error(
            operand.span,
            format!(
                "{op} expects Number, found {}",
                operand.inner.to_readable_type()
            ),
        )),
    }
}

fn add(_host: &mut dyn Host, span: Range, args: &[TVal]) -> RFunc {
    let (l, r) = binary("+", span, args)?;
    match (&l.inner, &r.inner) {
        (Val::Number(lhs), Val::Number(rhs)) => lhs
            .checked_add(*rhs)
            .map(Val::Number)
            .ok_or_else(|| type_error(span, "+ overflowed")),
        (Val::String(_), _) | (_, Val::String(_)) => {
            Ok(Val::String(format!("{}{}", l.inner, r.inner).into()))
        }
        _ => Err(type_error(
            span,
            format!(
                "+ cannot combine {} and {}",
                l.inner.to_readable_type(),
                r.inner.to_readable_type()
            ),
        )),
    }
}

fn sub(_host: &mut dyn Host, span: Range, args: &[TVal]) -> RFunc {
    let (l, r) = binary("-", span, args)?;
    let lhs = number("-", l)?;
    let rhs = number("-", r)?;
    lhs.checked_sub(rhs)
        .map(Val::Number)
        .ok_or_else(|| type_error(span, "- overflowed"))
}

fn mul(_host: &mut dyn Host, span: Range, args: &[TVal]) -> RFunc {
    let (l, r) = binary("*", span, args)?;
    let lhs = number("*", l)?;
    let rhs = number("*", r)?;
    lhs.checked_mul(rhs)
        .map(Val::Number)
        .ok_or_else(|| type_error(span, "* overflowed"))
}

fn div(_host: &mut dyn Host, span: Range, args: &[TVal]) -> RFunc {
    let (l, r) = binary("/", span, args)?;
    let lhs = number("/", l)?;
    let rhs = number("/", r)?;
    if rhs == 0 {
        return Err(type_error(r.span, "division by zero"));
    }
    lhs.checked_div(rhs)
        .map(Val::Number)
        .ok_or_else(|| type_error(span, "/ overflowed"))
}

fn rem(_host: &mut dyn Host, span: Range, args: &[TVal]) -> RFunc {
    let (l, r) = binary("%", span, args)?;
    let lhs = number("%", l)?;
    let rhs = number("%", r)?;
    if rhs == 0 {
        return Err(type_error(r.span, "remainder by zero"));
    }
    lhs.checked_rem(rhs)
        .map(Val::Number)
        .ok_or_else(|| type_error(span, "% overflowed"))
}

// Total across value kinds: different kinds are simply unequal, functions
// compare by identity.
fn eq(_host: &mut dyn Host, span: Range, args: &[TVal]) -> RFunc {
    let (l, r) = binary("==", span, args)?;
    Ok(Val::Bool(l.inner == r.inner))
}

fn ne(_host: &mut dyn Host, span: Range, args: &[TVal]) -> RFunc {
    let (l, r) = binary("!=", span, args)?;
    Ok(Val::Bool(l.inner != r.inner))
}

fn ordering(op: &str, span: Range, args: &[TVal]) -> Result<Ordering, YolkError> {
    let (l, r) = binary(op, span, args)?;
    match (&l.inner, &r.inner) {
        (Val::Number(lhs), Val::Number(rhs)) => Ok(lhs.cmp(rhs)),
        (Val::String(lhs), Val::String(rhs)) => Ok(lhs.cmp(rhs)),
        _ => Err(type_error(
            span,
            format!(
                "{op} cannot order {} and {}",
                l.inner.to_readable_type(),
                r.inner.to_readable_type()
            ),
        )),
    }
}

fn lt(_host: &mut dyn Host, span: Range, args: &[TVal]) -> RFunc {
    ordering("<", span, args).map(|o| Val::Bool(o == Ordering::Less))
}

fn lte(_host: &mut dyn Host, span: Range, args: &[TVal]) -> RFunc {
    ordering("<=", span, args).map(|o| Val::Bool(o != Ordering::Greater))
}

fn gt(_host: &mut dyn Host, span: Range, args: &[TVal]) -> RFunc {
    ordering(">", span, args).map(|o| Val::Bool(o == Ordering::Greater))
}

fn gte(_host: &mut dyn Host, span: Range, args: &[TVal]) -> RFunc {
    ordering(">=", span, args).map(|o| Val::Bool(o != Ordering::Less))
}

fn print(host: &mut dyn Host, _span: Range, args: &[TVal]) -> RFunc {
    let line = args
        .iter()
        .map(|arg| arg.inner.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    host.print(&line);
    Ok(Val::Undefined)
}

/// The builtin table is plain data; `root_env` materializes it into the
/// root scope each `run` hangs its top frame off of.
const BUILTINS: &[(&str, Native)] = &[
    ("+", add),
    ("-", sub),
    ("*", mul),
    ("/", div),
    ("%", rem),
    ("==", eq),
    ("!=", ne),
    ("<", lt),
    ("<=", lte),
    (">", gt),
    (">=", gte),
    ("print", print),
];

thread_local! {
    static ROOT: Rc<Env> = build_root_env();
}

/// The root scope is built once per thread and shared read-only by every
/// `run` on it; each `run` only ever writes its own child frames.
pub fn root_env() -> Rc<Env> {
    ROOT.with(Rc::clone)
}

fn build_root_env() -> Rc<Env> {
    let env = Env::root();

    for (name, apply) in BUILTINS {
        env.insert(
            *name,
            Val::NativeFunction(NativeFunction {
                name: (*name).into(),
                apply: *apply,
            }),
        );
    }

    env.insert("true", Val::Bool(true));
    env.insert("false", Val::Bool(false));
    env.insert("null", Val::Null);
    env.insert("undefined", Val::Undefined);

    env
}
