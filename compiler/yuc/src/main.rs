//! Yu compiler CLI.
//!
//! `yuc [options] <directory>` walks the target directory for `*.yu`
//! files, tokenizes and parses each one (in parallel, one independent
//! pipeline per file), and writes `.ytok` token dumps under
//! `build/tokens/`. Terminal output serializes through a single mutex.

mod pipeline;
mod style;
mod tracing_setup;

use std::path::PathBuf;
use std::process::ExitCode;

/// Parsed command-line configuration.
#[derive(Debug, Default)]
struct Config {
    verbose: bool,
    optimize: bool,
    target_dir: Option<PathBuf>,
    linker_script: Option<PathBuf>,
}

fn print_version() {
    println!(
        "{}{}Yu{} v{}",
        style::BOLD,
        style::MAGENTA,
        style::RESET,
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{}A compiler for the Yu programming language{}\n",
        style::GRAY,
        style::RESET
    );
}

fn print_help() {
    print_version();
    println!("{}{}Usage:{}", style::BOLD, style::YELLOW, style::RESET);
    println!("  yuc [options] <directory>\n");
    println!("{}{}Examples:{}", style::BOLD, style::YELLOW, style::RESET);
    println!("  {}yuc -v src/{}", style::CYAN, style::RESET);
    println!("  {}yuc -o -T=linker.ld src/{}\n", style::CYAN, style::RESET);
    println!("{}{}Options:{}", style::BOLD, style::YELLOW, style::RESET);
    println!(
        "  {}-v{}\t\tEnable verbose output",
        style::GREEN,
        style::RESET
    );
    println!(
        "  {}-o{}\t\tEnable optimizations",
        style::GREEN,
        style::RESET
    );
    println!(
        "  {}-T=<file>{}\tSpecify linker script",
        style::GREEN,
        style::RESET
    );
}

fn parse_args(args: &[String]) -> Result<Config, String> {
    let mut config = Config::default();
    for arg in args {
        if arg == "help" {
            print_help();
            std::process::exit(0);
        }
        if let Some(option) = arg.strip_prefix('-') {
            match option {
                "v" => config.verbose = true,
                "o" => config.optimize = true,
                _ => {
                    if let Some(script) = option.strip_prefix("T=") {
                        config.linker_script = Some(PathBuf::from(script));
                    } else {
                        return Err(format!("Unknown option: {arg}"));
                    }
                }
            }
        } else {
            config.target_dir = Some(PathBuf::from(arg));
        }
    }
    Ok(config)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_help();
        return ExitCode::FAILURE;
    }

    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!(
                "{}{}✘ Error:{} {}",
                style::BOLD,
                style::RED,
                style::RESET,
                message
            );
            return ExitCode::FAILURE;
        }
    };

    let Some(target_dir) = config.target_dir.clone() else {
        print_help();
        return ExitCode::FAILURE;
    };

    tracing_setup::init(config.verbose);
    tracing::debug!(?config, "starting pipeline");

    match pipeline::run(&target_dir, &config) {
        Ok(()) => {
            println!(
                "{}{}✓ Token files generated in build/tokens{}",
                style::BOLD,
                style::GREEN,
                style::RESET
            );
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!(
                "{}{}✘ Error:{} {}",
                style::BOLD,
                style::RED,
                style::RESET,
                message
            );
            ExitCode::FAILURE
        }
    }
}
