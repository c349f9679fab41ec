//! untable CLI - table extraction tool for scientific HTML

mod files;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use untable::{
    table_index_from_file_name, ExtractOptions, JsonFormat, TableConfig, TableExtractor,
    TableRecord,
};

use files::{check_start_dir, discover, group_files, output_dir, FileGroup};

#[derive(Parser)]
#[command(name = "untable")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract tables from scientific HTML to BioC-style JSON", long_about = None)]
struct Cli {
    /// Input file, directory or glob pattern
    #[arg(value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = "untable_output")]
    target_dir: PathBuf,

    /// Selector configuration (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Mirror input directories starting from this directory name
    #[arg(short = 's', long, value_name = "NAME")]
    start_output_at: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long)]
    compact: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the tables of every article under a path
    Extract {
        /// Input file, directory or glob pattern
        #[arg(value_name = "PATH")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "untable_output")]
        target_dir: PathBuf,

        /// Selector configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Mirror input directories starting from this directory name
        #[arg(short = 's', long, value_name = "NAME")]
        start_output_at: Option<String>,

        /// Compact JSON output (no indentation)
        #[arg(long)]
        compact: bool,

        /// Process the files of an article one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Extract the tables of one HTML file to JSON
    Json {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Selector configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Compact JSON output (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show the tables found in an HTML file
    Info {
        /// Input HTML file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Selector configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// Settings of a batch extraction run
struct ExtractRun<'a> {
    input: &'a Path,
    target_dir: &'a Path,
    config: Option<&'a Path>,
    start_output_at: Option<&'a str>,
    compact: bool,
    sequential: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            target_dir,
            config,
            start_output_at,
            compact,
            sequential,
        }) => cmd_extract(&ExtractRun {
            input: &input,
            target_dir: &target_dir,
            config: config.as_deref(),
            start_output_at: start_output_at.as_deref(),
            compact,
            sequential,
        }),
        Some(Commands::Json {
            input,
            output,
            config,
            compact,
        }) => cmd_json(&input, output.as_deref(), config.as_deref(), compact),
        Some(Commands::Info { input, config }) => cmd_info(&input, config.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: batch extraction if input is provided
            if let Some(input) = cli.input {
                cmd_extract(&ExtractRun {
                    input: &input,
                    target_dir: &cli.target_dir,
                    config: cli.config.as_deref(),
                    start_output_at: cli.start_output_at.as_deref(),
                    compact: cli.compact,
                    sequential: false,
                })
            } else {
                println!("{}", "Usage: untable <PATH> [-t DIR] [-c CONFIG] [-s NAME]".yellow());
                println!("       untable --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<TableConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(TableConfig::from_file(path)?),
        None => Ok(TableConfig::default()),
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn cmd_extract(run: &ExtractRun<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let options = ExtractOptions::new()
        .with_config(load_config(run.config)?)
        .with_parallel(!run.sequential);

    if let Some(name) = run.start_output_at {
        check_start_dir(run.input, name)?;
    }

    let paths = discover(run.input)?;
    let groups = group_files(&paths);
    if groups.is_empty() {
        println!("{} {}", "No input files found in".yellow(), run.input.display());
        return Ok(());
    }

    let pb = ProgressBar::new(groups.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut written = 0;
    let mut without_tables = 0;
    let mut failed = 0;
    for group in &groups {
        pb.set_message(group.key.clone());

        if !group.table_images.is_empty() {
            log::info!(
                "{}: skipping {} table images",
                group.key,
                group.table_images.len()
            );
        }

        let sources = group.html_sources();
        if sources.is_empty() {
            pb.inc(1);
            continue;
        }

        let record = match untable::parse_files(&sources, &options) {
            Ok(record) => record,
            Err(e) => {
                pb.println(format!("{} {}: {}", "Failed".red(), group.key, e));
                failed += 1;
                pb.inc(1);
                continue;
            }
        };

        if record.has_tables() {
            match write_record(run, group, &record) {
                Ok(()) => written += 1,
                Err(e) => {
                    pb.println(format!("{} {}: {}", "Failed".red(), group.key, e));
                    failed += 1;
                }
            }
        } else {
            log::debug!("{}: no tables", group.key);
            without_tables += 1;
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!("\n{}", "Summary:".green().bold());
    println!("  {} {} articles", "├─".dimmed(), groups.len());
    println!("  {} {} table files written", "├─".dimmed(), written);
    println!("  {} {} without tables", "├─".dimmed(), without_tables);
    println!("  {} {} failed", "└─".dimmed(), failed);
    println!("{} {}", "Output in".green(), run.target_dir.display());

    Ok(())
}

fn write_record(
    run: &ExtractRun<'_>,
    group: &FileGroup,
    record: &TableRecord,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = output_dir(run.target_dir, &group.out_dir, run.start_output_at)?;
    fs::create_dir_all(&dir)?;
    let json = untable::render::to_json(record, json_format(run.compact))?;
    fs::write(dir.join(group.output_file_name()), &json)?;
    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = ExtractOptions::new().with_config(load_config(config)?);
    let record = untable::parse_file(input, &options)?;

    let json = untable::render::to_json(&record, json_format(compact))?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let html = fs::read_to_string(input)?;
    let extractor = TableExtractor::new(load_config(config)?);
    let tables = extractor.extract(&html);
    let table_index = input
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(table_index_from_file_name);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref index) = table_index {
        println!("{}: {}", "Linked table".bold(), index);
    }
    println!("{}: {}", "Tables".bold(), tables.len());

    for table in tables.iter() {
        println!();
        let id = table_index.as_deref().unwrap_or(table.identifier.as_str());
        println!("{}", format!("Table T{}", id).cyan().bold());
        println!("{}", "─".repeat(40).dimmed());

        if !table.title.is_empty() {
            println!("{}: {}", "Title".bold(), table.title);
        }
        if !table.caption.is_empty() {
            println!("{}: {}", "Caption".bold(), table.caption_text());
        }
        println!("{}: {}", "Columns".bold(), table.column_count());
        println!("{}: {}", "Rows".bold(), table.row_count());

        let sections: Vec<&str> = table
            .section_names()
            .into_iter()
            .filter(|name| !name.is_empty())
            .collect();
        if !sections.is_empty() {
            println!("{}: {}", "Sections".bold(), sections.join(", "));
        }
        if !table.footer.is_empty() {
            println!("{}: {}", "Footer".bold(), table.footer_text());
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "untable".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Table extraction tool for scientific HTML");
    println!();
    println!("License: MIT");
}
