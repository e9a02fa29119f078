mod app;
mod config;
mod error;
mod exitcode;
mod logging;
mod output;
mod tool;

use std::io::Write;

fn main() {
    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let env = config::Environment::from_process();

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let mut code = app::run(&argv, &env, &mut out, &mut err);
    if out.flush().is_err() && code == exitcode::OK {
        code = exitcode::IOERR;
    }
    std::process::exit(code);
}
