use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use errors::YolkError;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::ast::TExpr;
use crate::trivia::{Range, Trivia};

/// Output collaborator for `print`. The only I/O the language has.
pub trait Host {
    fn print(&mut self, line: &str);
}

pub type TVal = Trivia<Val>;
pub type RFunc = Result<Val, YolkError>;

/// An eagerly-applied builtin. Arguments arrive already evaluated, each
/// still carrying the span of the expression it came from.
pub type Native = fn(&mut dyn Host, Range, &[TVal]) -> RFunc;

#[derive(Clone, Debug)]
pub struct NativeFunction {
    pub name: SmolStr,
    pub apply: Native,
}

/// A user closure: parameter names, a body, and the scope that was active
/// when `func` ran. Calls build one child frame of `env`, never of the
/// call site.
#[derive(Debug)]
pub struct Function {
    pub name: SmolStr,
    pub params: Vec<SmolStr>,
    pub body: TExpr,
    pub env: Rc<Env>,
}

#[derive(Clone, Debug)]
pub enum Val {
    Null,
    Undefined,
    Bool(bool),
    Number(isize),
    String(SmolStr),
    Function(Rc<Function>),
    NativeFunction(NativeFunction),
}

impl PartialEq for Val {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Val::Null, Val::Null) => true,
            (Val::Undefined, Val::Undefined) => true,
            (Val::Bool(l), Val::Bool(r)) => l == r,
            (Val::Number(l), Val::Number(r)) => l == r,
            (Val::String(l), Val::String(r)) => l == r,
            (Val::Function(l), Val::Function(r)) => Rc::ptr_eq(l, r),
            (Val::NativeFunction(l), Val::NativeFunction(r)) => l.name == r.name,
            _ => false,
        }
    }
}

impl Val {
    pub fn to_readable_type(&self) -> SmolStr {
        match self {
            Val::Null => "Null",
            Val::Undefined => "Undefined",
            Val::Bool(_) => "Bool",
            Val::Number(_) => "Number",
            Val::String(_) => "String",
            Val::Function(_) => "Function",
            Val::NativeFunction(_) => "Builtin",
        }
        .into()
    }

    /// Everything is truthy except `false`, the two sentinels, zero, and
    /// the empty string.
    pub fn truthy(&self) -> bool {
        match self {
            Val::Null | Val::Undefined | Val::Bool(false) => false,
            Val::Number(n) => *n != 0,
            Val::String(s) => !s.is_empty(),
            _ => true,
        }
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Null => write!(f, "null"),
            Val::Undefined => write!(f, "undefined"),
            Val::Bool(bool) => write!(f, "{bool}"),
            Val::Number(number) => write!(f, "{number}"),
            Val::String(string) => write!(f, "{string}"),
            Val::Function(func) => write!(f, "func({})", func.name),
            Val::NativeFunction(func) => write!(f, "builtin({})", func.name),
        }
    }
}

/// One scope frame: an owned name→value map plus an optional parent link.
/// Lookup walks the parent chain; `insert` only ever writes this frame,
/// which is what makes a `put` inside a loop body land in the enclosing
/// function scope rather than a transient block scope.
#[derive(Debug, Default)]
pub struct Env {
    bindings: RefCell<FxHashMap<SmolStr, Val>>,
    parent: Option<Rc<Env>>,
}

impl Env {
    pub fn root() -> Rc<Env> {
        Rc::new(Env::default())
    }

    pub fn child(parent: Rc<Env>) -> Rc<Env> {
        Rc::new(Env {
            bindings: RefCell::new(FxHashMap::default()),
            parent: Some(parent),
        })
    }

    pub fn lookup(&self, name: &str) -> Option<Val> {
        if let Some(val) = self.bindings.borrow().get(name) {
            return Some(val.clone());
        }
        self.parent.as_ref()?.lookup(name)
    }

    pub fn insert(&self, name: impl Into<SmolStr>, val: Val) {
        self.bindings.borrow_mut().insert(name.into(), val);
    }
}
