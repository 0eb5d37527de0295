//! typegen: The schema generator CLI.
//!
//! Usage:
//!   typegen [options] [file...]
//!
//! Prints the agent schemas of the input files as JSON.
//!
//! Exit codes: 0 on success, 1 on usage or I/O errors, 2 when the run
//! produced error diagnostics.

use clap::Parser as ClapParser;
use miette::{IntoDiagnostic, WrapErr};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use typegen_compiler::{resolve_input_files, CompileError, Program, ProgramOptions};
use typegen_diagnostics::{Diagnostic, DiagnosticCategory};
use typegen_options::TypegenConfig;

const CONFIG_FILE_NAME: &str = "typegen.json";

#[derive(ClapParser, Debug)]
#[command(name = "typegen", version, about = "typegen - TypeScript agent type-to-schema mapper")]
struct Cli {
    /// TypeScript files to scan.
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// Path to typegen.json.
    #[arg(short = 'p', long = "project")]
    project: Option<String>,

    /// Write the JSON output to this file instead of stdout.
    #[arg(short = 'o', long = "out-file")]
    out_file: Option<String>,

    /// Print compact JSON.
    #[arg(long)]
    compact: bool,

    /// Abort on the first error instead of skipping the declaration.
    #[arg(long)]
    strict: bool,

    /// Also emit the schema of every named declaration.
    #[arg(long = "emit-types")]
    emit_types: bool,

    /// List all files that are part of the run.
    #[arg(long = "list-files")]
    list_files: bool,

    /// Initialize a typegen.json file.
    #[arg(long)]
    init: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = if cli.init { run_init().map(|()| 0) } else { run(&cli) };
    match result {
        Ok(code) => process::exit(code),
        Err(report) => {
            eprintln!("{:?}", report);
            process::exit(1);
        }
    }
}

/// `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> miette::Result<i32> {
    let start = Instant::now();
    let (files, config, base_dir) = resolve_inputs(cli)?;

    if files.is_empty() {
        print_error("No input files found.");
        return Ok(1);
    }

    if cli.list_files {
        for file in &files {
            println!("{}", file);
        }
    }

    // CLI options override typegen.json
    let mut options = ProgramOptions::from_config(&config);
    if cli.strict {
        options.strict = true;
    }
    if cli.emit_types {
        options.emit_types = true;
    }

    let arena = bumpalo::Bump::new();
    let mut program = Program::new(&arena, files, options);
    program
        .load_root_files()
        .into_diagnostic()
        .wrap_err("Failed to load source files")?;

    let use_color = is_terminal();
    let generated = match program.generate() {
        Ok(generated) => generated,
        Err(CompileError::Strict(diagnostic)) => {
            print_diagnostic(&diagnostic, use_color);
            print_error("Aborted in strict mode.");
            return Ok(2);
        }
        Err(err) => return Err(err).into_diagnostic().wrap_err("Schema generation failed"),
    };

    for diag in generated.diagnostics.diagnostics() {
        print_diagnostic(diag, use_color);
    }

    let json = if cli.compact {
        serde_json::to_string(&generated.output)
    } else {
        serde_json::to_string_pretty(&generated.output)
    }
    .into_diagnostic()?;

    let out_file = cli
        .out_file
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| config.out_file.as_ref().map(|f| base_dir.join(f)));
    match out_file {
        Some(path) => std::fs::write(&path, json + "\n")
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to write '{}'", path.display()))?,
        None => println!("{}", json),
    }

    if generated.diagnostics.has_errors() {
        let count = generated.diagnostics.error_count();
        let plural = if count == 1 { "" } else { "s" };
        if use_color {
            eprintln!("\n{}Found {} error{}.{}", RED, count, plural, RESET);
        } else {
            eprintln!("\nFound {} error{}.", count, plural);
        }
        return Ok(2);
    }

    if use_color {
        eprintln!(
            "{}Generated {} agent schema{} in {:.2}s.{}",
            GRAY,
            generated.output.agents.len(),
            if generated.output.agents.len() == 1 { "" } else { "s" },
            start.elapsed().as_secs_f64(),
            RESET
        );
    }
    Ok(0)
}

fn run_init() -> miette::Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(miette::miette!("A {} file already exists in the current directory.", CONFIG_FILE_NAME));
    }

    let content = serde_json::to_string_pretty(&TypegenConfig::init_template()).into_diagnostic()?;
    std::fs::write(path, content + "\n")
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to create {}", CONFIG_FILE_NAME))?;
    println!("Successfully created a {} file.", CONFIG_FILE_NAME);
    Ok(())
}

/// Input files, project config and the directory relative paths in the
/// config resolve against.
fn resolve_inputs(cli: &Cli) -> miette::Result<(Vec<String>, TypegenConfig, PathBuf)> {
    if let Some(ref project) = cli.project {
        load_project(Path::new(project))
    } else if !cli.files.is_empty() {
        Ok((cli.files.clone(), TypegenConfig::default(), PathBuf::from(".")))
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        load_project(Path::new(CONFIG_FILE_NAME))
    } else {
        Ok((Vec::new(), TypegenConfig::default(), PathBuf::from(".")))
    }
}

fn load_project(path: &Path) -> miette::Result<(Vec<String>, TypegenConfig, PathBuf)> {
    let config = typegen_options::parse_config_file(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read project '{}'", path.display()))?;
    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let files = resolve_input_files(&config, &base_dir).into_diagnostic()?;
    tracing::debug!(project = %path.display(), files = files.len(), "loaded project");
    Ok((files, config, base_dir))
}

fn print_diagnostic(diag: &Diagnostic, use_color: bool) {
    if !use_color {
        eprintln!("{}", diag);
        return;
    }
    let color = match diag.category {
        DiagnosticCategory::Error => RED,
        DiagnosticCategory::Warning => YELLOW,
        DiagnosticCategory::Message => GRAY,
    };
    if let Some(ref file) = diag.file {
        eprint!("{}{}{}", CYAN, file, RESET);
        if let Some(ref position) = diag.position {
            eprint!(":{}", position);
        } else if let Some(span) = diag.span {
            eprint!("({})", span.start);
        }
        eprint!(": ");
    }
    eprintln!(
        "{}{}{}{} {}TG{}{}: {}",
        BOLD, color, diag.category, RESET, CYAN, diag.code, RESET, diag.message_text
    );
}

fn print_error(msg: &str) {
    if is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn is_terminal() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: isatty only inspects the descriptor.
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        true
    }
}
