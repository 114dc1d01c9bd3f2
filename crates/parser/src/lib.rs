use ast::{
    ast::{Expr, Literal, TExpr},
    trivia::{new, Range},
};
use errors::{SyntaxError, YolkError};
use smol_str::SmolStr;

/// Byte cursor over the program text. There is no token stream: every step
/// strips leading whitespace and matches the next literal, word, or bracket
/// directly against the remaining text.
struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self, ch: char) {
        self.pos += ch.len_utf8();
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.bump(ch);
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Span of the character under the cursor, or the empty span at end of
    /// input.
    fn here(&self) -> Range {
        let end = match self.peek() {
            Some(ch) => self.pos + ch.len_utf8(),
            None => self.pos,
        };
        Range::new(self.pos, end)
    }
}

fn is_word_char(ch: char) -> bool {
    !ch.is_whitespace() && !matches!(ch, '{' | '}' | '(' | ')' | ',')
}

fn syntax_error(span: Range, message: &str) -> YolkError {
    YolkError::Syntax(SyntaxError {
        start: span.start,
        end: span.end,
        message: message.into(),
    })
}

/// Parses a whole program as the arguments of an implicit top-level
/// sequence. Anything left over that is not an expression fails here, so
/// trailing garbage is a syntax failure.
pub fn parse(src: &str) -> Result<TExpr, YolkError> {
    let mut cur = Cursor::new(src);

    let mut args = Vec::new();
    loop {
        cur.skip_whitespace();
        if cur.at_end() {
            break;
        }
        args.push(parse_expression(&mut cur)?);
    }

    let operator = new(Box::new(Expr::Word(SmolStr::default())), Range::empty_at(0));
    Ok(new(
        Box::new(Expr::Apply(operator, args)),
        Range::new(0, src.len()),
    ))
}

fn parse_expression(cur: &mut Cursor) -> Result<TExpr, YolkError> {
    cur.skip_whitespace();
    let start = cur.pos;

    let primary = match cur.peek() {
        Some('"') => parse_string(cur)?,
        Some(ch) if ch.is_ascii_digit() => parse_number(cur)?,
        // Lookahead only: a `{` with no preceding word is the implicit
        // sequence form, an apply of the empty word.
        Some('{') => new(
            Box::new(Expr::Word(SmolStr::default())),
            Range::empty_at(start),
        ),
        Some(ch) if is_word_char(ch) => parse_word(cur),
        _ => return Err(syntax_error(cur.here(), "expected an expression")),
    };

    parse_apply(cur, primary)
}

fn parse_string(cur: &mut Cursor) -> Result<TExpr, YolkError> {
    let start = cur.pos;
    cur.bump('"');
    let content = cur.pos;

    while let Some(ch) = cur.peek() {
        if ch == '"' {
            let text = &cur.src[content..cur.pos];
            cur.bump('"');
            return Ok(new(
                Box::new(Expr::Value(Literal::String(text.into()))),
                Range::new(start, cur.pos),
            ));
        }
        cur.bump(ch);
    }

    Err(syntax_error(
        Range::new(start, cur.pos),
        "unterminated string literal",
    ))
}

fn parse_number(cur: &mut Cursor) -> Result<TExpr, YolkError> {
    let start = cur.pos;
    while let Some(ch) = cur.peek() {
        if !ch.is_ascii_digit() {
            break;
        }
        cur.bump(ch);
    }

    let span = Range::new(start, cur.pos);
    let number = cur.src[start..cur.pos]
        .parse::<isize>()
        .map_err(|_| syntax_error(span, "number literal out of range"))?;

    Ok(new(Box::new(Expr::Value(Literal::Number(number))), span))
}

fn parse_word(cur: &mut Cursor) -> TExpr {
    let start = cur.pos;
    while let Some(ch) = cur.peek() {
        if !is_word_char(ch) {
            break;
        }
        cur.bump(ch);
    }

    new(
        Box::new(Expr::Word(cur.src[start..cur.pos].into())),
        Range::new(start, cur.pos),
    )
}

/// Repeatedly turns `expr` into the operator of a new apply while an
/// argument list follows, which is what makes chains like `f(x)(y)` work.
fn parse_apply(cur: &mut Cursor, mut expr: TExpr) -> Result<TExpr, YolkError> {
    loop {
        cur.skip_whitespace();
        expr = match cur.peek() {
            Some('{') => parse_brace_args(cur, expr)?,
            Some('(') => parse_paren_args(cur, expr)?,
            _ => return Ok(expr),
        };
    }
}

/// `{...}`: arguments back to back, whitespace separated, up to the `}`.
fn parse_brace_args(cur: &mut Cursor, operator: TExpr) -> Result<TExpr, YolkError> {
    let start = operator.span.start;
    let open = cur.pos;
    cur.bump('{');

    let mut args = Vec::new();
    loop {
        cur.skip_whitespace();
        match cur.peek() {
            Some('}') => {
                cur.bump('}');
                break;
            }
            Some(_) => args.push(parse_expression(cur)?),
            None => {
                return Err(syntax_error(
                    Range::new(open, cur.pos),
                    "unclosed `{` argument list",
                ))
            }
        }
    }

    Ok(new(
        Box::new(Expr::Apply(operator, args)),
        Range::new(start, cur.pos),
    ))
}

/// `(...)`: comma-separated arguments up to the `)`. After each argument
/// the next character must be `,` or `)`; a trailing comma is tolerated.
fn parse_paren_args(cur: &mut Cursor, operator: TExpr) -> Result<TExpr, YolkError> {
    let start = operator.span.start;
    let open = cur.pos;
    cur.bump('(');

    let mut args = Vec::new();
    loop {
        cur.skip_whitespace();
        match cur.peek() {
            Some(')') => {
                cur.bump(')');
                break;
            }
            Some(_) => {
                args.push(parse_expression(cur)?);
                cur.skip_whitespace();
                match cur.peek() {
                    Some(',') => cur.bump(','),
                    Some(')') => {}
                    Some(_) => return Err(syntax_error(cur.here(), "expected `,` or `)`")),
                    None => {
                        return Err(syntax_error(
                            Range::new(open, cur.pos),
                            "unclosed `(` argument list",
                        ))
                    }
                }
            }
            None => {
                return Err(syntax_error(
                    Range::new(open, cur.pos),
                    "unclosed `(` argument list",
                ))
            }
        }
    }

    Ok(new(
        Box::new(Expr::Apply(operator, args)),
        Range::new(start, cur.pos),
    ))
}

/// Renders the canonical surface form: paren application for named
/// operators, brace blocks for implicit sequences. Parsing the result of
/// `unparse` reproduces the expression.
pub fn unparse(expr: &TExpr) -> String {
    match expr.inner.as_ref() {
        Expr::Value(Literal::Number(number)) => number.to_string(),
        Expr::Value(Literal::String(string)) => format!("\"{string}\""),
        Expr::Word(name) => name.to_string(),
        Expr::Apply(operator, args) => {
            let args: Vec<String> = args.iter().map(unparse).collect();
            let implicit = matches!(operator.inner.as_ref(), Expr::Word(name) if name.is_empty());

            if implicit {
                if args.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", args.join(" "))
                }
            } else {
                format!("{}({})", unparse(operator), args.join(", "))
            }
        }
    }
}
