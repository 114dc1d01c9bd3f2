pub mod ast;
pub mod hir;
pub mod trivia;
