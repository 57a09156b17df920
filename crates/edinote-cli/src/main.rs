//! EDI Notepad CLI
//!
//! Inspect EDI X12 files from the terminal:
//! - annotated views with segment titles and per-element tooltips
//! - expanded/compact normalization
//! - envelope overviews (ISA / GS / ST..SE)
//! - plain-language AI summaries and file-aware questions

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use edinote_summary::{Summary, SummaryOrchestrator};
use edinote_view::{element_tooltip, segment_tooltip, ContextSelection, DocumentView, FileSource};
use edinote_x12::{Envelope, Format};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod config;
mod render;

use config::ProviderArgs;

#[derive(Parser)]
#[command(name = "edinote")]
#[command(author, version, about = "EDI Notepad: annotate and summarize EDI X12 files")]
struct Cli {
    /// Directory holding x12_segments.json and x12_code_values.json
    /// (default: $EDINOTE_DICT_DIR, then the bundled dictionaries)
    #[arg(long, global = true)]
    dict_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a file one segment per line with segment titles.
    View {
        file: PathBuf,
        /// Print the compact form instead of the annotated view
        #[arg(long)]
        compact: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the normalized text (one segment per line, or compact).
    Normalize {
        file: PathBuf,
        #[arg(long)]
        compact: bool,
    },

    /// Show the tooltip for a segment, or for one of its elements.
    ///
    /// SEGMENT is a 1-based position or a tag (first match).
    Inspect {
        file: PathBuf,
        segment: String,
        /// 1-based element index
        element: Option<usize>,
    },

    /// Summarize a file in plain language.
    Summarize {
        file: PathBuf,
        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Ask a question about up to five files.
    Ask {
        question: String,
        #[arg(long = "context", required = true, num_args = 1..)]
        context: Vec<PathBuf>,
        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Query the dictionaries directly.
    Dict {
        #[command(subcommand)]
        command: DictCommands,
    },

    /// Show the ISA / GS / ST..SE overview of a file.
    Envelope {
        file: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum DictCommands {
    /// Describe a segment tag
    Segment { tag: String },
    /// Describe an element position
    Element { tag: String, index: usize },
    /// Look up a coded value, or list known codes when VALUE is omitted
    Code {
        tag: String,
        index: usize,
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    config::init_logging();
    let cli = Cli::parse();
    let resolver = Arc::new(config::load_resolver(cli.dict_dir.clone()).await);

    match cli.command {
        Commands::View {
            file,
            compact,
            no_color,
        } => {
            if no_color {
                colored::control::set_override(false);
            }
            cmd_view(&file, compact, resolver)?;
        }
        Commands::Normalize { file, compact } => {
            let source = read_file(&file)?;
            let normalized = edinote_x12::normalize(&source.content);
            let format = if compact { Format::Compact } else { Format::Expanded };
            println!("{}", format.render(&normalized));
        }
        Commands::Inspect {
            file,
            segment,
            element,
        } => cmd_inspect(&file, &segment, element, resolver)?,
        Commands::Summarize { file, provider } => cmd_summarize(&file, &provider, resolver).await?,
        Commands::Ask {
            question,
            context,
            provider,
        } => cmd_ask(&question, &context, &provider, resolver).await?,
        Commands::Dict { command } => cmd_dict(command, &resolver),
        Commands::Envelope { file, json } => {
            let source = read_file(&file)?;
            let doc = edinote_x12::parse(&edinote_x12::normalize(&source.content));
            let envelope = Envelope::scan(&doc);
            if json {
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            } else {
                print!("{}", render::envelope_report(&envelope));
            }
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> Result<edinote_view::SourceFile> {
    let mut source = FileSource::new();
    let file = source
        .add_path(path)
        .with_context(|| format!("cannot open {}", path.display()))?;
    Ok(file.clone())
}

fn cmd_view(path: &Path, compact: bool, resolver: Arc<edinote_dict::DictionaryResolver>) -> Result<()> {
    let source = read_file(path)?;
    let mut view = DocumentView::new(resolver);
    view.open(&source.name, &source.content);

    if compact {
        view.set_format(Format::Compact);
        if let Some(text) = view.rendered() {
            println!("{text}");
        }
        return Ok(());
    }

    let annotated = view
        .annotate()
        .ok_or_else(|| anyhow!("no document open"))?;
    if annotated.is_empty() {
        eprintln!("{} no segments found", "info:".yellow().bold());
    }
    print!("{}", render::annotated_lines(&annotated));
    Ok(())
}

fn cmd_inspect(
    path: &Path,
    segment: &str,
    element: Option<usize>,
    resolver: Arc<edinote_dict::DictionaryResolver>,
) -> Result<()> {
    let source = read_file(path)?;
    let mut view = DocumentView::new(resolver);
    view.open(&source.name, &source.content);
    let annotated = view
        .annotate()
        .ok_or_else(|| anyhow!("no document open"))?;

    let found = match segment.parse::<usize>() {
        Ok(position) => annotated.segment(position),
        Err(_) => annotated
            .segments
            .iter()
            .find(|s| s.tag().eq_ignore_ascii_case(segment)),
    }
    .ok_or_else(|| anyhow!("no segment `{segment}` in {}", source.name))?;

    match element {
        None => println!("{}", segment_tooltip(found)),
        Some(index) => {
            let el = found.element(index).ok_or_else(|| {
                anyhow!(
                    "segment {} has {} elements, no element {index}",
                    found.tag(),
                    found.elements.len()
                )
            })?;
            println!("{}", element_tooltip(el));
        }
    }
    Ok(())
}

async fn cmd_summarize(
    path: &Path,
    args: &ProviderArgs,
    resolver: Arc<edinote_dict::DictionaryResolver>,
) -> Result<()> {
    let provider = args.provider()?;
    let credential = args.credential(provider);
    let orchestrator = SummaryOrchestrator::new(Arc::new(args.service(provider)?), resolver.clone());

    let source = read_file(path)?;
    let mut view = DocumentView::new(resolver);
    view.open(&source.name, &source.content);
    let request = view
        .request_summary(&orchestrator)
        .ok_or_else(|| anyhow!("no document open"))?;

    eprintln!(
        "{} {} with {}",
        "Summarizing".green().bold(),
        source.name,
        provider.display_name()
    );
    let result = orchestrator
        .summarize(&request.ticket, &request.content, provider, credential.as_ref())
        .await;
    view.apply_summary(&request.ticket, result);
    print_summary(view.summary())
}

async fn cmd_ask(
    question: &str,
    paths: &[PathBuf],
    args: &ProviderArgs,
    resolver: Arc<edinote_dict::DictionaryResolver>,
) -> Result<()> {
    let mut source = FileSource::new();
    let mut selection = ContextSelection::new();
    for path in paths {
        let name = source
            .add_path(path)
            .with_context(|| format!("cannot open {}", path.display()))?
            .name
            .clone();
        selection.select(&source, &name)?;
    }

    let provider = args.provider()?;
    let credential = args.credential(provider);
    let orchestrator = SummaryOrchestrator::new(Arc::new(args.service(provider)?), resolver);
    let ticket = orchestrator.begin(uuid::Uuid::new_v4());

    let answer = orchestrator
        .ask(
            &ticket,
            question,
            &selection.files(&source),
            provider,
            credential.as_ref(),
        )
        .await;
    match answer {
        Ok(summary) => {
            println!("{}", summary.as_str());
            Ok(())
        }
        Err(err) => {
            tracing::debug!(error = %err, "assistant request failed");
            Err(anyhow!(err.user_message()))
        }
    }
}

fn print_summary(state: &edinote_view::SummaryState) -> Result<()> {
    match state {
        edinote_view::SummaryState::Ready(Summary::Text(text)) => {
            println!("{text}");
            Ok(())
        }
        edinote_view::SummaryState::Ready(Summary::Empty) => {
            println!("{}", edinote_summary::NO_SUMMARY.yellow());
            Ok(())
        }
        edinote_view::SummaryState::Failed { message, .. } => Err(anyhow!(message.clone())),
        other => Err(anyhow!("summary did not complete: {other:?}")),
    }
}

fn cmd_dict(command: DictCommands, resolver: &edinote_dict::DictionaryResolver) {
    match command {
        DictCommands::Segment { tag } => {
            println!("{}", resolver.describe_segment(&tag));
        }
        DictCommands::Element { tag, index } => {
            println!("{}", resolver.describe_element(&tag, index));
        }
        DictCommands::Code {
            tag,
            index,
            value: Some(value),
        } => match resolver.describe_code_at(&tag, index, &value) {
            Some(meaning) => println!("{meaning}"),
            None => println!("{} {}", value, "(no coded meaning)".dimmed()),
        },
        DictCommands::Code {
            tag,
            index,
            value: None,
        } => {
            let codes = resolver.code_values(&tag, index);
            if codes.is_empty() {
                println!("{}", "(no coded values known)".dimmed());
            }
            for (code, meaning) in codes {
                println!("{} {}", format!("{code:<6}").bold(), meaning);
            }
        }
    }
}
