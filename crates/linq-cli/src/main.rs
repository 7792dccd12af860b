//! Command-line interface for the LINQ list DSL example generator.

use clap::{Parser, Subcommand};
use linq_eval::{generate_examples, Example, GenerateConfig};
use linq_ir::{analyze, compile, pipe_to_lines, CompileError, CompileOptions, Program};
use linq_lang::{Catalog, Interval};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI error with source context for pretty printing.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("failed to read file: {message}")]
    IoError { message: String },

    #[error("compile error: {message}")]
    #[diagnostic(code(linq::compile_error))]
    CompileError {
        message: String,
        #[source_code]
        src: NamedSource<Arc<String>>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("generation failed: {message}")]
    #[diagnostic(code(linq::generate_error))]
    GenerateError { message: String },

    #[error("{message}")]
    Other { message: String },
}

impl CliError {
    fn from_compile_error(e: &CompileError, source: Arc<String>, name: &str) -> Self {
        let span = e.line().and_then(|line| line_span(&source, line));
        CliError::CompileError {
            message: e.to_string(),
            src: NamedSource::new(name, source),
            span,
        }
    }
}

type CliResult<T> = Result<T, CliError>;

/// Byte span of the 1-based `line`, without its terminator.
fn line_span(source: &str, line: usize) -> Option<SourceSpan> {
    let mut offset = 0;
    for (i, raw) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let text = raw.trim_end_matches(['\n', '\r']);
            return Some((offset, text.len()).into());
        }
        offset += raw.len();
    }
    None
}

#[derive(Parser)]
#[command(name = "linq", version)]
#[command(about = "Compile LINQ list DSL programs and generate input/output examples", long_about = None)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random input/output examples for a program
    Generate {
        /// Program text, e.g. "a <- [int] | b <- int | c <- TAKE b a"
        #[arg(value_name = "PROGRAM_TEXT")]
        program: String,

        /// Treat PROGRAM_TEXT as a path to a program file
        #[arg(short, long)]
        file: bool,

        /// Number of examples to generate
        #[arg(short = 'N', long, default_value = "5")]
        number: usize,

        /// Length of generated lists
        #[arg(short = 'L', long, default_value = "10")]
        length: usize,

        /// Value bound V; every value stays within [-V, V]
        #[arg(short = 'V', long, default_value = "512")]
        value_range: i64,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Reject programs whose input range is this wide or narrower
        #[arg(long, default_value = "0")]
        min_range: i64,

        /// Print one JSON object instead of example lines
        #[arg(long)]
        json: bool,

        /// Generate examples on all cores
        #[arg(long)]
        parallel: bool,
    },

    /// Type check a program and show its input bounds
    Check {
        /// Program text
        #[arg(value_name = "PROGRAM_TEXT")]
        program: String,

        /// Treat PROGRAM_TEXT as a path to a program file
        #[arg(short, long)]
        file: bool,

        /// Length of generated lists
        #[arg(short = 'L', long, default_value = "10")]
        length: usize,

        /// Value bound V
        #[arg(short = 'V', long, default_value = "512")]
        value_range: i64,
    },

    /// List every function with its signature
    Catalog {
        /// Value bound V
        #[arg(short = 'V', long, default_value = "512")]
        value_range: i64,
    },
}

/// JSON output of `generate`.
#[derive(Serialize)]
struct GenerateReport<'a> {
    program: String,
    input_bounds: &'a [Interval],
    examples: &'a [Example],
}

fn main() {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Generate {
            program,
            file,
            number,
            length,
            value_range,
            seed,
            min_range,
            json,
            parallel,
        } => {
            let config = GenerateConfig {
                count: number,
                list_len: length,
                value_bound: value_range,
                seed,
                parallel,
            };
            cmd_generate(&program, file, &config, min_range, json)
        }
        Commands::Check {
            program,
            file,
            length,
            value_range,
        } => cmd_check(&program, file, length, value_range),
        Commands::Catalog { value_range } => cmd_catalog(value_range),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}

/// Program text in line form plus a display name for diagnostics.
fn load_program(program: &str, file: bool) -> CliResult<(Arc<String>, String)> {
    if file {
        let path = Path::new(program);
        let text = fs::read_to_string(path).map_err(|e| CliError::IoError {
            message: format!("{}: {}", path.display(), e),
        })?;
        Ok((Arc::new(text), path.display().to_string()))
    } else {
        Ok((Arc::new(pipe_to_lines(program)), "<program>".to_string()))
    }
}

fn value_bound(value_range: i64) -> CliResult<i64> {
    if value_range <= 0 {
        return Err(CliError::Other {
            message: format!("value range must be positive, got {}", value_range),
        });
    }
    Ok(value_range)
}

/// Compile, or `Ok(None)` when the program has no valid inputs.
fn compile_program(
    source: &Arc<String>,
    name: &str,
    catalog: &Catalog,
    options: &CompileOptions,
) -> CliResult<Option<Program>> {
    match compile(source, catalog, options) {
        Ok(program) => Ok(Some(program)),
        Err(e) if e.is_rejection() => {
            println!("Program with no valid inputs: {}", source.replace('\n', " | "));
            info!(reason = %e, "rejected");
            Ok(None)
        }
        Err(e) => Err(CliError::from_compile_error(&e, source.clone(), name)),
    }
}

fn cmd_generate(
    program: &str,
    file: bool,
    config: &GenerateConfig,
    min_range: i64,
    json: bool,
) -> CliResult<()> {
    let (source, name) = load_program(program, file)?;
    let catalog = Catalog::new(value_bound(config.value_bound)?);
    let options = CompileOptions {
        list_len: Some(config.list_len),
        min_input_range: min_range,
    };

    let Some(program) = compile_program(&source, &name, &catalog, &options)? else {
        return Ok(());
    };

    let examples = generate_examples(&program, config).map_err(|e| CliError::GenerateError {
        message: e.to_string(),
    })?;

    if json {
        let report = GenerateReport {
            program: program.pipe_form(),
            input_bounds: program.input_bounds.as_deref().unwrap_or_default(),
            examples: &examples,
        };
        let text = serde_json::to_string_pretty(&report).map_err(|e| CliError::Other {
            message: e.to_string(),
        })?;
        println!("{}", text);
    } else {
        for example in &examples {
            println!("{}", example);
        }
    }
    Ok(())
}

fn cmd_check(program: &str, file: bool, length: usize, value_range: i64) -> CliResult<()> {
    let (source, name) = load_program(program, file)?;
    let catalog = Catalog::new(value_bound(value_range)?);
    let options = CompileOptions::with_list_len(length);

    let Some(program) = compile_program(&source, &name, &catalog, &options)? else {
        return Ok(());
    };

    let bounds = program.register_bounds.as_deref().unwrap_or_default();
    for (register, bound) in program.registers.iter().zip(bounds) {
        let line = linq_ir::pretty::render_register(register);
        println!("  {:<24} : {:<5}  {}", line, register.kind, bound.to_string());
    }

    let profile = analyze(&program);
    println!(
        "{} inputs, {} instructions, output {}",
        profile.num_inputs,
        profile.num_instructions,
        program.output_kind()
    );
    for warning in &profile.warnings {
        println!("warning: {}", warning);
    }
    println!("check: ok");
    Ok(())
}

fn cmd_catalog(value_range: i64) -> CliResult<()> {
    let catalog = Catalog::new(value_bound(value_range)?);
    for function in catalog.functions() {
        println!("{:<14} :: {}", function.name(), function.signature());
    }
    println!("{} functions, null value {}", catalog.len(), catalog.null());
    Ok(())
}
