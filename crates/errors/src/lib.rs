use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use smol_str::SmolStr;
use thiserror::Error;

const REPORT_ERR: ReportKind = ReportKind::Custom("yolk", Color::Unset);

/// Every way a `run` can fail. There is no recovery construct in the
/// language; each of these unwinds straight to the caller.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum YolkError {
    #[error("syntax failure")]
    Syntax(SyntaxError),

    #[error("unbound name")]
    Lookup(LookupError),

    #[error("type failure")]
    Type(TypeError),
}

impl YolkError {
    pub fn to_report(&self, source: &str) -> String {
        let report = match self {
            Self::Syntax(e) => e.to_report(),
            Self::Lookup(e) => e.to_report(),
            Self::Type(e) => e.to_report(),
        };

        let source = Source::from(source);
        let mut buf = Vec::new();
        report.write(source, &mut buf).unwrap();

        String::from_utf8(buf).unwrap()
    }
}

/// Raised by the parser on malformed input and by special forms on wrong
/// argument count or shape.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyntaxError {
    pub start: usize,
    pub end: usize,
    pub message: SmolStr,
}

impl SyntaxError {
    fn to_report(&self) -> Report {
        Report::build(REPORT_ERR, (), self.start)
            .with_message("syntax failure")
            .with_label(Label::new(self.start..self.end).with_message(&self.message))
            .with_config(Config::default().with_color(false))
            .finish()
    }
}

/// A word resolved against the whole environment chain and came up empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LookupError {
    pub start: usize,
    pub end: usize,
    pub name: SmolStr,
}

impl LookupError {
    fn to_report(&self) -> Report {
        Report::build(REPORT_ERR, (), self.start)
            .with_message("unbound name")
            .with_label(Label::new(self.start..self.end).with_message(format!(
                "`{}` is not bound in any enclosing scope",
                self.name
            )))
            .with_config(Config::default().with_color(false))
            .finish()
    }
}

/// Applying a non-callable operator, or handing a builtin operands it has
/// no semantics for (wrong kind, wrong count, division by zero, overflow).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeError {
    pub start: usize,
    pub end: usize,
    pub message: SmolStr,
}

impl TypeError {
    fn to_report(&self) -> Report {
        Report::build(REPORT_ERR, (), self.start)
            .with_message("type failure")
            .with_label(Label::new(self.start..self.end).with_message(&self.message))
            .with_config(Config::default().with_color(false))
            .finish()
    }
}
