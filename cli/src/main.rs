//! untextract CLI - OCR analysis result reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use untextract::render::{self, ExtractionStats};
use untextract::{
    reconstruct_files, DocumentResult, DocumentSource, FeatureFlags, JsonFormat, Pipeline,
    PollOptions, ProviderConfig, RenderOptions, ReplayProvider,
};

#[derive(Parser)]
#[command(name = "untextract")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Reconstruct text, tables, and form fields from OCR analysis results", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the linear text (lines outside tables)
    Text {
        /// Saved provider responses, in page order
        #[arg(value_name = "RESPONSE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print tables, tab-separated
    Tables {
        /// Saved provider responses, in page order
        #[arg(value_name = "RESPONSE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print form fields as `key: value` lines
    Forms {
        /// Saved provider responses, in page order
        #[arg(value_name = "RESPONSE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Saved provider responses, in page order
        #[arg(value_name = "RESPONSE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Leave tables out
        #[arg(long)]
        no_tables: bool,

        /// Leave form fields out
        #[arg(long)]
        no_forms: bool,

        /// Append reconstruction warnings
        #[arg(short, long)]
        warnings: bool,
    },

    /// Convert to JSON
    Json {
        /// Saved provider responses, in page order
        #[arg(value_name = "RESPONSE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Run the full job lifecycle against recorded responses
    Replay {
        /// Recorded responses, in page order
        #[arg(value_name = "RESPONSE", required = true)]
        inputs: Vec<PathBuf>,

        /// Number of status calls that report the job as still running
        #[arg(long, default_value = "0")]
        in_progress: usize,

        /// Give up after this many seconds
        #[arg(long, value_name = "SECS", default_value = "3600")]
        max_wait: u64,

        /// First backoff delay in seconds
        #[arg(long, value_name = "SECS", default_value = "5")]
        initial_delay: u64,

        /// Provider region
        #[arg(long, env = "UNTEXTRACT_REGION", default_value = "local")]
        region: String,

        /// Storage bucket
        #[arg(long, env = "UNTEXTRACT_BUCKET", default_value = "replay")]
        bucket: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter with the job summary
        #[arg(short, long)]
        frontmatter: bool,
    },

    /// Show counts and warnings
    Info {
        /// Saved provider responses, in page order
        #[arg(value_name = "RESPONSE", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Text { inputs, output } => {
            cmd_render(&inputs, output.as_deref(), RenderOptions::text_only())
        }
        Commands::Tables { inputs, output } => {
            cmd_render(&inputs, output.as_deref(), RenderOptions::tables_only())
        }
        Commands::Forms { inputs, output } => {
            cmd_render(&inputs, output.as_deref(), RenderOptions::forms_only())
        }
        Commands::Markdown {
            inputs,
            output,
            no_tables,
            no_forms,
            warnings,
        } => cmd_markdown(&inputs, output.as_deref(), no_tables, no_forms, warnings),
        Commands::Json {
            inputs,
            output,
            compact,
        } => cmd_json(&inputs, output.as_deref(), compact),
        Commands::Replay {
            inputs,
            in_progress,
            max_wait,
            initial_delay,
            region,
            bucket,
            output,
            frontmatter,
        } => {
            let options = PollOptions::new()
                .with_initial_delay(Duration::from_secs(initial_delay))
                .with_max_wait(Duration::from_secs(max_wait));
            let config = ProviderConfig::new(region, bucket);
            cmd_replay(
                &inputs,
                in_progress,
                options,
                &config,
                output.as_deref(),
                frontmatter,
            )
        }
        Commands::Info { inputs } => cmd_info(&inputs),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_render(
    inputs: &[PathBuf],
    output: Option<&Path>,
    options: RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = reconstruct_files(inputs)?;
    let text = render::to_text(&doc, &options)?;
    write_output(output, &text)
}

fn cmd_markdown(
    inputs: &[PathBuf],
    output: Option<&Path>,
    no_tables: bool,
    no_forms: bool,
    warnings: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = reconstruct_files(inputs)?;

    let render_options = RenderOptions::new()
        .with_tables(!no_tables)
        .with_forms(!no_forms)
        .with_warnings(warnings);

    let markdown = render::to_markdown(&doc, &render_options)?;
    write_output(output, &markdown)
}

fn cmd_json(
    inputs: &[PathBuf],
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = reconstruct_files(inputs)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&doc, format)?;
    write_output(output, &json)
}

fn cmd_replay(
    inputs: &[PathBuf],
    in_progress: usize,
    options: PollOptions,
    config: &ProviderConfig,
    output: Option<&Path>,
    frontmatter: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = ReplayProvider::from_files(inputs)?.with_in_progress(in_progress);
    let name = inputs[0]
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let location = config.destination(&name);

    let rt = tokio::runtime::Runtime::new()?;
    let doc = rt.block_on(async {
        let pipeline = Pipeline::new(&provider, config).with_poll_options(options);
        let cancel = pipeline.cancel_handle();

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        pb.set_message(format!("Waiting for analysis of {}", location));

        let run = pipeline.run(DocumentSource::location(location.clone()), FeatureFlags::all());
        tokio::pin!(run);

        let finished = tokio::select! {
            result = &mut run => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };
        let result = match finished {
            Some(result) => result,
            None => {
                debug!("Interrupted, cancelling job");
                cancel.cancel();
                run.await
            }
        };

        match &result {
            Ok(_) => pb.finish_with_message(format!(
                "Done after {} status calls",
                provider.status_calls()
            )),
            Err(_) => pb.abandon_with_message("Job did not complete"),
        }
        result
    })?;

    let render_options = RenderOptions::new().with_frontmatter(frontmatter);
    let markdown = render::to_markdown(&doc, &render_options)?;
    write_output(output, &markdown)?;

    print_warnings(&doc);
    Ok(())
}

fn cmd_info(inputs: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let mut blocks = 0;
    let mut pages = None;
    for input in inputs {
        let response = untextract::parse_response_file(input)?;
        blocks += response.blocks.len();
        pages = pages.or(response.page_count);
    }
    let doc = reconstruct_files(inputs)?;
    let stats = ExtractionStats::from_result(&doc);

    println!("{}", "Result Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for input in inputs {
        println!("{}: {}", "File".bold(), input.display());
    }
    println!("{}: {}", "Responses".bold(), inputs.len());
    if let Some(pages) = pages {
        println!("{}: {}", "Pages".bold(), pages);
    }
    println!("{}: {}", "Blocks".bold(), blocks);

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    for (i, table) in doc.tables().iter().enumerate() {
        println!(
            "  {} table {}: {} x {}",
            "├─".dimmed(),
            i + 1,
            table.row_count(),
            table.column_count()
        );
    }
    println!("{}: {}", "Form fields".bold(), stats.form_field_count);
    println!("{}: {}", "Warnings".bold(), stats.warning_count);

    print_warnings(&doc);
    Ok(())
}

fn print_warnings(doc: &DocumentResult) {
    if doc.warnings().is_empty() {
        return;
    }
    eprintln!();
    for warning in doc.warnings() {
        eprintln!("{}: {}", "Warning".yellow().bold(), warning);
    }
}

fn cmd_version() {
    println!("{} {}", "untextract".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("OCR analysis result reconstruction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/untextract".dimmed());
    println!("License: MIT");
}
