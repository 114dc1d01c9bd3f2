use std::rc::Rc;

use ast::{
    ast::{Expr, Literal, TExpr},
    hir::{Env, Function, Host, Val},
    trivia::{new, Range},
};
use errors::{LookupError, SyntaxError, TypeError, YolkError};
use smol_str::SmolStr;

pub type Res = Result<Val, YolkError>;

/// The closed set of operators that receive their arguments unevaluated.
/// These need access to raw syntax (names to bind, branches to skip,
/// bodies to re-run) that eager application cannot express.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Form {
    Seq,
    Put,
    While,
    If,
    Func,
}

impl Form {
    fn from_name(name: &str) -> Option<Form> {
        match name {
            "" => Some(Form::Seq),
            "put" => Some(Form::Put),
            "while" => Some(Form::While),
            "if" => Some(Form::If),
            "func" => Some(Form::Func),
            _ => None,
        }
    }
}

pub fn eval(host: &mut dyn Host, env: &Rc<Env>, expr: &TExpr) -> Res {
    match expr.inner.as_ref() {
        Expr::Value(Literal::Number(number)) => Ok(Val::Number(*number)),
        Expr::Value(Literal::String(string)) => Ok(Val::String(string.clone())),
        Expr::Word(name) => env.lookup(name).ok_or_else(|| {
            YolkError::Lookup(LookupError {
                start: expr.span.start,
                end: expr.span.end,
                name: name.clone(),
            })
        }),
        Expr::Apply(operator, args) => {
            if let Expr::Word(name) = operator.inner.as_ref() {
                if let Some(form) = Form::from_name(name) {
                    return eval_form(host, env, form, expr.span, args);
                }
            }
            eval_call(host, env, operator, args)
        }
    }
}

fn eval_form(host: &mut dyn Host, env: &Rc<Env>, form: Form, span: Range, args: &[TExpr]) -> Res {
    match form {
        Form::Seq => eval_seq(host, env, args),
        Form::Put => eval_put(host, env, span, args),
        Form::While => eval_while(host, env, span, args),
        Form::If => eval_if(host, env, span, args),
        Form::Func => eval_func(env, span, args),
    }
}

fn eval_seq(host: &mut dyn Host, env: &Rc<Env>, args: &[TExpr]) -> Res {
    let mut last = Val::Null;
    for arg in args {
        last = eval(host, env, arg)?;
    }
    Ok(last)
}

fn eval_put(host: &mut dyn Host, env: &Rc<Env>, span: Range, args: &[TExpr]) -> Res {
    let [target, value] = args else {
        return Err(form_error(span, "put takes a name and a value"));
    };
    let name = word_arg(target, "put binds a plain word")?;

    let val = eval(host, env, value)?;
    env.insert(name.clone(), val.clone());
    Ok(val)
}

fn eval_while(host: &mut dyn Host, env: &Rc<Env>, span: Range, args: &[TExpr]) -> Res {
    let [condition, body] = args else {
        return Err(form_error(span, "while takes a condition and a body"));
    };

    while eval(host, env, condition)?.truthy() {
        eval(host, env, body)?;
    }
    Ok(Val::Null)
}

fn eval_if(host: &mut dyn Host, env: &Rc<Env>, span: Range, args: &[TExpr]) -> Res {
    let (condition, then_do, else_do) = match args {
        [condition, then_do] => (condition, then_do, None),
        [condition, then_do, else_do] => (condition, then_do, Some(else_do)),
        _ => return Err(form_error(span, "if takes a condition and one or two branches")),
    };

    if eval(host, env, condition)?.truthy() {
        eval(host, env, then_do)
    } else if let Some(else_do) = else_do {
        eval(host, env, else_do)
    } else {
        Ok(Val::Null)
    }
}

/// `func(name, params.., body)`: binds a closure over the scope that is
/// active right now. Calls resolve against that scope, not the call site.
fn eval_func(env: &Rc<Env>, span: Range, args: &[TExpr]) -> Res {
    let [name, rest @ ..] = args else {
        return Err(form_error(span, "func takes a name, parameters, and a body"));
    };
    let [params @ .., body] = rest else {
        return Err(form_error(span, "func takes a name, parameters, and a body"));
    };

    let name = word_arg(name, "func names must be plain words")?;
    let params = params
        .iter()
        .map(|param| word_arg(param, "func parameters must be plain words").map(SmolStr::clone))
        .collect::<Result<Vec<_>, _>>()?;

    let func = Val::Function(Rc::new(Function {
        name: name.clone(),
        params,
        body: body.clone(),
        env: Rc::clone(env),
    }));
    env.insert(name.clone(), func.clone());
    Ok(func)
}

fn eval_call(host: &mut dyn Host, env: &Rc<Env>, operator: &TExpr, args: &[TExpr]) -> Res {
    match eval(host, env, operator)? {
        Val::Function(func) => {
            let mut actuals = Vec::with_capacity(args.len());
            for arg in args {
                actuals.push(eval(host, env, arg)?);
            }

            let local = Env::child(Rc::clone(&func.env));
            for (slot, param) in func.params.iter().enumerate() {
                let actual = actuals.get(slot).cloned().unwrap_or(Val::Undefined);
                local.insert(param.clone(), actual);
            }
            eval(host, &local, &func.body)
        }
        Val::NativeFunction(native) => {
            let mut actuals = Vec::with_capacity(args.len());
            for arg in args {
                actuals.push(new(eval(host, env, arg)?, arg.span));
            }
            (native.apply)(host, operator.span, &actuals)
        }
        not_callable => Err(YolkError::Type(TypeError {
            start: operator.span.start,
            end: operator.span.end,
            message: format!("{} is not callable", not_callable.to_readable_type()).into(),
        })),
    }
}

fn form_error(span: Range, message: &str) -> YolkError {
    YolkError::Syntax(SyntaxError {
        start: span.start,
        end: span.end,
        message: message.into(),
    })
}

fn word_arg<'a>(arg: &'a TExpr, message: &str) -> Result<&'a SmolStr, YolkError> {
    match arg.inner.as_ref() {
        Expr::Word(name) => Ok(name),
        _ => Err(form_error(arg.span, message)),
    }
}
