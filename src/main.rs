use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use quill_lang as quill;

use quill::interpreter::Interpreter;
use quill::lexer;
use quill::parser::Parser;

#[derive(ClapParser, Debug)]
#[command(version, about = "Quill language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: Option<PathBuf> },

    /// Parses input from a file and prints its AST as JSON
    Parse { filename: Option<PathBuf> },

    /// Runs input from a file as a Quill program
    Run { filename: Option<PathBuf> },

    /// Starts an interactive session reading statements from stdin
    Repl,
}

/// Reads the contents of a file into a String
fn read_file(filename: PathBuf) -> Result<String> {
    info!("Reading file: {:?}", filename);

    let file = File::open(&filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut source = String::new();

    let bytes = reader
        .read_to_string(&mut source)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(source)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Write records to file with the module path and source line
    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("quill_lang::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .init();

    info!("Logger initialized, writing to app.log");

    Ok(())
}

fn no_filepath() -> ! {
    println!("No input filepath was provided. Exiting...");

    std::process::exit(0);
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize the file logger only if --log was provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename } => match filename {
            Some(filename) => {
                info!("Running Tokenize subcommand");
                let source = read_file(filename)?;

                match lexer::tokenize(&source) {
                    Ok(tokens) => {
                        for token in &tokens {
                            println!("{}", token);
                        }

                        info!("Tokenization completed successfully");
                    }

                    Err(e) => {
                        debug!("Tokenization debug: {}", e);
                        eprintln!("{}", e);
                        std::process::exit(65);
                    }
                }
            }

            None => no_filepath(),
        },

        Commands::Parse { filename } => match filename {
            Some(filename) => {
                info!("Running Parse subcommand");
                let source = read_file(filename)?;

                match Parser::new().produce_ast(&source) {
                    Ok(program) => {
                        info!("Program parsed successfully");

                        let json = serde_json::to_string_pretty(&program)
                            .context("Failed to serialize AST")?;

                        println!("{}", json);
                    }

                    Err(e) => {
                        debug!("Parse debug: {}", e);
                        eprintln!("{}", e);
                        std::process::exit(65);
                    }
                }

                info!("Parse subcommand completed");
            }

            None => no_filepath(),
        },

        Commands::Run { filename } => match filename {
            Some(filename) => {
                info!("Running Run subcommand");
                let source = read_file(filename)?;

                info!("Provided input:\n{}", source);

                let program = match Parser::new().produce_ast(&source) {
                    Ok(program) => program,

                    Err(e) => {
                        debug!("Parse debug: {}", e);
                        eprintln!("{}", e);
                        std::process::exit(65);
                    }
                };

                info!("Parsed {} statements", program.body.len());

                let mut interpreter = Interpreter::new();

                match interpreter.run(&program) {
                    Ok(value) => {
                        debug!("Program evaluated to: {}", value);
                        info!("Program executed successfully");
                    }

                    Err(e) => {
                        debug!("Runtime debug: {}", e);
                        eprintln!("{}", e);
                        std::process::exit(70);
                    }
                }
            }

            None => no_filepath(),
        },

        Commands::Repl => {
            info!("Starting REPL session");

            println!("Quill v0.1 - type 'exit' to quit");

            // One interpreter for the whole session; declarations persist
            // across lines.
            let mut interpreter = Interpreter::new();
            let stdin = std::io::stdin();

            for line in stdin.lock().lines() {
                let line = line.context("Failed to read from stdin")?;

                if line.trim() == "exit" {
                    break;
                }

                if line.trim().is_empty() {
                    continue;
                }

                let program = match Parser::new().produce_ast(&line) {
                    Ok(program) => program,

                    Err(e) => {
                        eprintln!("{}", e);
                        continue;
                    }
                };

                match interpreter.run(&program) {
                    Ok(value) => println!("{}", value),
                    Err(e) => eprintln!("{}", e),
                }
            }

            info!("REPL session ended");
        }
    }

    Ok(())
}
