/// Half-open byte range into the program text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Range {
        Range { start, end }
    }

    /// Zero-width range, used for the implicit sequence word, which has
    /// no text of its own.
    pub fn empty_at(pos: usize) -> Range {
        Range {
            start: pos,
            end: pos,
        }
    }
}

/// A node annotated with the span it was parsed from. Spans only feed
/// error reports and test dumps; they carry no semantics.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Trivia<T> {
    pub inner: T,
    pub span: Range,
}

pub fn new<T>(inner: T, span: Range) -> Trivia<T> {
    Trivia { inner, span }
}

pub trait WithTrivia {
    fn pretty_string(&self, indent: usize) -> String;
}
