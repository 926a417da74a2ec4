use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use mdimport::backend::{MemoryBackend, RecordId};
use mdimport::hierarchy::HierarchyPolicy;
use mdimport::import::Importer;
use mdimport::parser::parse_directory;

#[derive(Parser)]
#[command(
    name = "mdimport",
    about = "Import Markdown content files as CMS pages and content blocks",
    version
)]
struct Cli {
    /// Path to directory containing Markdown files
    path: PathBuf,

    /// Root container id under which pages are created
    #[arg(long, default_value = "1")]
    root_page: u64,

    /// Root/section convention applied to parent references
    #[arg(long, default_value = "root-anchored")]
    policy: PolicyArg,

    /// Output format
    #[arg(long, default_value = "plain")]
    format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
enum PolicyArg {
    RootAnchored,
    Flat,
}

impl From<PolicyArg> for HierarchyPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::RootAnchored => HierarchyPolicy::RootAnchored,
            PolicyArg::Flat => HierarchyPolicy::FlatTopLevel,
        }
    }
}

#[derive(Clone, Debug, clap::ValueEnum)]
enum OutputFormat {
    Plain,
    Json,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if !cli.path.is_dir() {
        anyhow::bail!("Directory not found: {}", cli.path.display());
    }

    let pages = parse_directory(&cli.path)
        .with_context(|| format!("Failed to load {}", cli.path.display()))?;

    if pages.is_empty() {
        anyhow::bail!("No Markdown files found in: {}", cli.path.display());
    }

    let root = RecordId(cli.root_page);
    let plain = matches!(cli.format, OutputFormat::Plain);

    if plain {
        println!("Importing from: {}", cli.path.display());
        println!("Root container: {}", root);
        println!("Found {} pages to import.", pages.len());
        println!();
    }

    // Dry-run collaborator: records what a real backend would be asked to
    // create, with ids allocated after the root container.
    let mut backend = MemoryBackend::new(cli.root_page + 1);
    let mut importer = Importer::new(&mut backend, cli.policy.clone().into());
    let imported = importer.import_all(&pages, root)?;

    match cli.format {
        OutputFormat::Plain => {
            for (i, title) in imported.iter().enumerate() {
                println!("[{}/{}] {} ✓", i + 1, imported.len(), title);
            }
            println!();
            println!("{} pages imported successfully.", imported.len());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "pages": backend.pages,
                "blocks": backend.blocks,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
