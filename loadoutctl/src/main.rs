//! Loadout CLI
//!
//! Resolves, applies and exports character loadouts.
//!
//! # Usage
//!
//! ```bash
//! # Preview what a loadout would do
//! loadoutctl --character C1 plan --from-file raid.txt
//!
//! # Apply one shared on a paste service
//! loadoutctl --character C1 apply --from-pastebin https://pastebin.com/AbC123
//!
//! # Revise it in $EDITOR first
//! loadoutctl --character C1 apply --edit --from-file raid.txt
//!
//! # Export what C1 is wearing
//! loadoutctl --character C1 export --include-unequipped --name "Raid Night"
//! ```
//!
//! # Environment Variables
//!
//! - `LOADOUT_ENV`: Environment (test, development, production)
//! - `LOADOUT_CHARACTER_ID`: Active character
//! - `LOADOUT_SNAPSHOT_PATH`: Inventory feed (default: inventory.json)
//! - `LOADOUT_MANIFEST_PATH`: Item definitions (default: manifest.json)
//! - `LOADOUT_DEFAULT_NAME`: Name for loadouts without one (default: Unnamed Loadout)
//! - `LOADOUT_PASTE_TIMEOUT_SECS`: Paste fetch timeout (default: 10)
//! - `LOADOUT_LOG_FORMAT`: `text` or `json`
//! - `VISUAL` / `EDITOR`: Editor for `apply --edit` (default: vi)

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use loadoutctl::{
    edit_text, load_inventory, Config, LoadoutManager, LoadoutSource, LogFormat, ManifestFile,
};

#[derive(Parser, Debug)]
#[command(name = "loadoutctl", version, about = "Character loadout resolver")]
struct Cli {
    /// Character to act on (overrides LOADOUT_CHARACTER_ID)
    #[arg(long, global = true)]
    character: Option<String>,

    /// Inventory feed JSON (overrides LOADOUT_SNAPSHOT_PATH)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Item definitions JSON (overrides LOADOUT_MANIFEST_PATH)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a loadout and print the plan
    Plan {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Resolve a loadout and execute it
    Apply {
        /// Report what would run without mutating anything
        #[arg(long)]
        dry_run: bool,
        /// Open the loadout text in $EDITOR before resolving it
        #[arg(long)]
        edit: bool,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the character's current gear as loadout text
    Export {
        /// Also list unequipped weapons and armor as EXTRA items
        #[arg(long)]
        include_unequipped: bool,
        /// Loadout name
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Read the loadout from a file
    #[arg(long)]
    from_file: Option<PathBuf>,
    /// Fetch the loadout from a paste service URL
    #[arg(long)]
    from_pastebin: Option<String>,
}

impl SourceArgs {
    fn into_source(self) -> anyhow::Result<LoadoutSource> {
        match (self.from_file, self.from_pastebin) {
            (Some(path), _) => Ok(LoadoutSource::File(path)),
            (None, Some(url)) => Ok(LoadoutSource::Paste(url)),
            (None, None) => anyhow::bail!("pass --from-file or --from-pastebin"),
        }
    }
}

fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("loadoutctl=info".parse()?);
    let json = format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .with(filter)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?.with_overrides(cli.character, cli.snapshot, cli.manifest)?;
    init_tracing(config.log_format)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        snapshot = %config.snapshot_path.display(),
        manifest = %config.manifest_path.display(),
        "Loadout CLI"
    );

    let raw = load_inventory(&config.snapshot_path).await?;
    let manifest = Arc::new(ManifestFile::load(&config.manifest_path).await?);
    let timeout = config.paste_timeout;
    let editor = config.editor.clone();
    let manager = LoadoutManager::new(config, manifest);

    match cli.command {
        Commands::Plan { source } => {
            let text = source.into_source()?.fetch(timeout).await?;
            let resolution = manager.plan(&raw, &text).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&resolution.plan)?);
            } else {
                print!("{}", resolution.plan);
            }
        },
        Commands::Apply {
            dry_run,
            edit,
            source,
        } => {
            let mut text = source.into_source()?.fetch(timeout).await?;
            if edit {
                text = edit_text(&text, &editor).await?;
            }
            let report = manager.apply(&raw, &text, dry_run).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
            if !report.is_success() {
                anyhow::bail!("{} action(s) failed", report.failed());
            }
        },
        Commands::Export {
            include_unequipped,
            name,
        } => {
            let text = manager.export(&raw, name, include_unequipped).await?;
            print!("{}", text);
        },
    }

    Ok(())
}
