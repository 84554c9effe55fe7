use std::env;
use std::process;
use std::time::Instant;

use tracing::debug;
use tracing_subscriber::EnvFilter;

mod builtins;
mod command;
mod config;
mod control;
mod editor;
mod error;
mod history;
mod jobs;
mod launcher;
mod prompt;
mod shell;
mod signals;

use config::ShellConfig;

fn print_help() {
    println!("bgshell - command interpreter with background job control");
    println!();
    println!("Usage: bgshell [OPTIONS]");
    println!("  -h, --help       Print this help");
    println!("  -v, --version    Print version");
    println!();
    println!("Environment:");
    println!("  RSHELL_HISTFILE  History file (empty disables it)");
    println!("  RSHELL_LOG       Log filter, e.g. debug or bgshell=trace");
}

fn print_version() {
    println!("bgshell v{}", env!("CARGO_PKG_VERSION"));
}

fn init_logging(config: &ShellConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        process::exit(0);
    }

    if args.iter().any(|a| a == "-v" || a == "--version" || a == "-V") {
        print_version();
        process::exit(0);
    }

    let start = Instant::now();
    let config = ShellConfig::from_env();
    init_logging(&config);

    let mut shell = shell::Shell::new(config);
    debug!(elapsed = ?start.elapsed(), "startup");

    if let Err(e) = shell.run() {
        eprintln!("bgshell: {}", e);
        process::exit(1);
    }
}
