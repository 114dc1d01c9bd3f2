use ast::hir::{Env, Host, Val};
use errors::YolkError;
use parser::parse;

mod builtins;
mod eval;

#[cfg(test)]
mod test;

pub use builtins::root_env;
pub use eval::eval;

/// Host that forwards `print` lines to stdout.
pub struct StdoutHost;

impl Host for StdoutHost {
    fn print(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Parses and evaluates one program in a fresh top scope hanging off the
/// builtin bindings, routing `print` through `host`. The top scope dies
/// with the call; only closures created during it can keep frames alive.
pub fn run_with_host<S>(src: S, host: &mut dyn Host) -> Result<Val, YolkError>
where
    S: AsRef<str>,
{
    let program = parse(src.as_ref())?;

    let top = Env::child(builtins::root_env());
    eval(host, &top, &program)
}

pub fn run<S>(src: S) -> Result<Val, YolkError>
where
    S: AsRef<str>,
{
    run_with_host(src, &mut StdoutHost)
}
