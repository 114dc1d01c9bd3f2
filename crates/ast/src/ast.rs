use smol_str::SmolStr;

use crate::trivia::{Trivia, WithTrivia};

/// A literal as it appears in source: a quoted string or a digit run.
/// Negative numbers have no literal form; they are produced at runtime
/// through subtraction.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Literal {
    Number(isize),
    String(SmolStr),
}

/// The whole language fits in three node shapes. `Word("")` is reserved:
/// it is never looked up and only ever names the implicit sequence form.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Expr {
    Value(Literal),
    Word(SmolStr),
    Apply(TExpr, Vec<TExpr>),
}

pub type TExpr = Trivia<Box<Expr>>;

impl WithTrivia for TExpr {
    fn pretty_string(&self, indent: usize) -> String {
        let buffer = String::from_utf8(vec![b' '; indent]).unwrap();

        match self.inner.as_ref() {
            Expr::Value(Literal::Number(number)) => {
                format!(
                    "{buffer}Number({number}) {}..{}",
                    self.span.start, self.span.end
                )
            }
            Expr::Value(Literal::String(string)) => {
                format!(
                    "{buffer}String(\"{string}\") {}..{}",
                    self.span.start, self.span.end
                )
            }
            Expr::Word(name) => {
                format!("{buffer}Word({name}) {}..{}", self.span.start, self.span.end)
            }
            Expr::Apply(operator, args) => {
                let line = format!("{buffer}Apply {}..{}", self.span.start, self.span.end);
                let mut lines = vec![line, operator.pretty_string(indent + 2)];
                lines.extend(args.iter().map(|x| x.pretty_string(indent + 2)));

                lines.join("\n")
            }
        }
    }
}
