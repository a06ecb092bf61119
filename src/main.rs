//! helene: generate cross-linked markdown documentation for a library.
//!
//! Usage: `helene Acme.Core.dll -o docs --github-pages`
//!
//! Reads `Acme.Core.json` (metadata manifest) and, when present,
//! `Acme.Core.xml` (doc comments) next to the library path.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use helene::docs::xml::XmlDocumentation;
use helene::generate::{FsWriter, Generator};
use helene::metadata::{documentation_path, ManifestLibrary};
use helene::model::Accessibility;
use helene::options::{HostingFlags, RenderOptions, Structure};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "helene",
    version,
    about = "Generate markdown documentation from library metadata and XML doc comments"
)]
struct Cli {
    /// Library to document (its `.json` manifest and `.xml` doc file sit beside it)
    src: PathBuf,

    /// Output directory
    #[arg(short = 'o', long, default_value = ".")]
    output: PathBuf,

    /// Base name of the index page
    #[arg(long, default_value = "index")]
    index_page_name: String,

    /// Directory of example snippets named after member identifiers
    #[arg(long)]
    examples_path: Option<PathBuf>,

    /// Strip `.md` from generated links
    #[arg(long)]
    github_pages: bool,

    /// Generate for mkdocs (forces the tree structure)
    #[arg(long)]
    mkdocs: bool,

    /// Strip `.md` and the leading `./` from generated links
    #[arg(long)]
    gitlab_wiki: bool,

    /// Add a link back to the index at the top and bottom of every page
    #[arg(long)]
    back_button: bool,

    /// Lowest member accessibility to document
    #[arg(long, value_enum, default_value_t = AccessibilityLevel::Protected)]
    member_accessibility_level: AccessibilityLevel,

    /// Output layout
    #[arg(long, value_enum, default_value_t = StructureArg::Flat)]
    structure: StructureArg,

    /// Debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum AccessibilityLevel {
    Public,
    Protected,
    Internal,
    Private,
}

impl From<AccessibilityLevel> for Accessibility {
    fn from(level: AccessibilityLevel) -> Self {
        match level {
            AccessibilityLevel::Public => Accessibility::Public,
            AccessibilityLevel::Protected => Accessibility::Protected,
            AccessibilityLevel::Internal => Accessibility::Internal,
            AccessibilityLevel::Private => Accessibility::Private,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StructureArg {
    Flat,
    Tree,
}

impl From<StructureArg> for Structure {
    fn from(arg: StructureArg) -> Self {
        match arg {
            StructureArg::Flat => Structure::Flat,
            StructureArg::Tree => Structure::Tree,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let dispatch = log_dispatch(cli.verbose);

    tracing::dispatcher::with_default(&dispatch, || match run(&cli, dispatch.clone()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Unable to generate documentation: {:#}", err);
            ExitCode::FAILURE
        }
    })
}

/// Log subscriber for one run: stderr, `RUST_LOG` or `info`, `debug` when verbose.
fn log_dispatch(verbose: bool) -> Dispatch {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    Dispatch::new(subscriber)
}

fn run(cli: &Cli, dispatch: Dispatch) -> Result<()> {
    let options = RenderOptions {
        output_dir: cli.output.clone(),
        index_page_name: cli.index_page_name.clone(),
        examples_dir: cli.examples_path.clone(),
        member_accessibility: cli.member_accessibility_level.into(),
        back_button: cli.back_button,
        ..Default::default()
    }
    .with_hosting(
        cli.structure.into(),
        HostingFlags {
            github_pages: cli.github_pages,
            mkdocs: cli.mkdocs,
            gitlab_wiki: cli.gitlab_wiki,
        },
    );

    let library = ManifestLibrary::load(&cli.src)
        .with_context(|| format!("failed to load library {}", cli.src.display()))?;
    let documentation = XmlDocumentation::load(&documentation_path(&cli.src))
        .context("failed to load documentation comments")?;
    tracing::debug!(comments = documentation.len(), "documentation loaded");

    let generator = Generator::new(options, dispatch);
    let summary = generator
        .generate(&library, &documentation, &mut FsWriter)
        .with_context(|| format!("failed to write the index page to {}", cli.output.display()))?;
    tracing::debug!(?summary, "run finished");
    Ok(())
}
