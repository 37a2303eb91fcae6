use std::path::Path;

use clap::{Arg, ArgAction, Command};
use owo_colors::OwoColorize;
use tracing::debug;

use vbafmt::editing;
use vbafmt::formatting;
use vbafmt::loading;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("vbafmt")
        .version(VERSION)
        .propagate_version(true)
        .about("An indentation formatter for VBA source code.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging on standard error."),
        )
        .arg(
            Arg::new("indent")
                .long("indent")
                .global(true)
                .value_parser(clap::value_parser!(usize))
                .default_value("4")
                .help("Number of spaces per indentation level."),
        )
        .subcommand(
            Command::new("format")
                .about("Reformat the given module and print the result")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the VBA code you want to reformat, or '-' to read standard input."),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Report whether the given module is already formatted")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the VBA code you want to check, or '-' to read standard input."),
                ),
        )
        .subcommand(
            Command::new("edits")
                .about("Print the line edits needed to format the given module, as JSON")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the VBA code you want edits for, or '-' to read standard input."),
                ),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let width = matches
        .get_one::<usize>("indent")
        .copied()
        .unwrap_or(4);
    let indent = " ".repeat(width);

    match matches.subcommand() {
        Some(("format", submatches)) => {
            if let Some(filename) = submatches.get_one::<String>("filename") {
                let filename = Path::new(filename);
                let content = load_or_exit(filename);

                let formatted = formatting::format(&content, &indent);
                println!("{}", formatted);
            }
        }
        Some(("check", submatches)) => {
            if let Some(filename) = submatches.get_one::<String>("filename") {
                let filename = Path::new(filename);
                let content = load_or_exit(filename);

                let formatted = formatting::format(&content, &indent);
                let original_lines: Vec<&str> = content
                    .lines()
                    .collect();
                let formatted_lines: Vec<&str> = formatted
                    .lines()
                    .collect();

                if original_lines == formatted_lines {
                    debug!("already formatted: {}", filename.display());
                } else {
                    eprintln!("{} would be reformatted", filename.display());
                    std::process::exit(1);
                }
            }
        }
        Some(("edits", submatches)) => {
            if let Some(filename) = submatches.get_one::<String>("filename") {
                let filename = Path::new(filename);
                let content = load_or_exit(filename);

                let formatted = formatting::format(&content, &indent);
                let original_lines: Vec<&str> = content
                    .lines()
                    .collect();
                let formatted_lines: Vec<&str> = formatted
                    .lines()
                    .collect();

                let operations = editing::plan_edits(&original_lines, &formatted_lines);
                match serde_json::to_string_pretty(&operations) {
                    Ok(json) => println!("{}", json),
                    Err(error) => {
                        eprintln!("{}: {}", "error".bright_red(), error);
                        std::process::exit(1);
                    }
                }
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: vbafmt [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn load_or_exit(filename: &Path) -> String {
    match loading::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    }
}
