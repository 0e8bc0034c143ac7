use luma::{RunOption, interpret, interpret_with_option};
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const VERSION: &str = concat!("luma ", env!("CARGO_PKG_VERSION"));

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    match args.len() {
        1 => {
            run_repl();
            ExitCode::SUCCESS
        }
        2 => run_file(&args[1]),
        _ => {
            eprintln!("usage: luma [script]");
            ExitCode::FAILURE
        }
    }
}

fn run_file(path: &str) -> ExitCode {
    let option = RunOption::default();

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("luma: cannot open {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };
    if source.len() > option.max_source_bytes {
        eprintln!("luma: {}: source too large", path);
        return ExitCode::FAILURE;
    }

    match interpret_with_option(&source, &option) {
        Ok(output) => {
            print!("{}", output);
            let _ = io::stdout().flush();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("luma: {}: {}", path, e);
            ExitCode::FAILURE
        }
    }
}

/// Line-at-a-time loop. Every line runs in a fresh VM: globals do not
/// persist from one line to the next.
fn run_repl() {
    println!("{}", VERSION);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(_)) | None => break,
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }

        match interpret(&line) {
            Ok(output) => {
                print!("{}", output);
                let _ = io::stdout().flush();
            }
            Err(e) => eprintln!("luma: {}", e),
        }
    }
}
