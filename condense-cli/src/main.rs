//! Condense CLI - Bundle source trees into one prompt-sized text blob

use clap::{Parser, Subcommand};
use condense_core::{discover_files, Bundle, BundleStats, Config, CondenseError};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "condense")]
#[command(about = "Bundle and condense source files for pasting into a prompt", long_about = None)]
struct Cli {
    /// Config file (default: .condense.toml in the first directory source)
    #[arg(long, global = true, env = "CONDENSE_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .condense.toml
    Init {
        /// Directory to write the config into (default: current directory)
        root: Option<PathBuf>,
    },

    /// Walk sources and write the labelled bundle
    Pack {
        /// Files or directories to bundle
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// Extensions to include (e.g. .py .md)
        #[arg(long, num_args = 1..)]
        include_ext: Vec<String>,

        /// Extensions to exclude
        #[arg(long, num_args = 1..)]
        exclude_ext: Vec<String>,

        /// Directory names to descend into
        #[arg(long, num_args = 1..)]
        include_dirs: Vec<String>,

        /// Directory names to skip
        #[arg(long, num_args = 1..)]
        exclude_dirs: Vec<String>,

        /// Condense Python files to selectively omit content
        #[arg(long)]
        modify_python: bool,

        /// Walk files even if .gitignore excludes them
        #[arg(long)]
        no_gitignore: bool,

        /// Write the bundle to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a size summary to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Condense a single file and print it
    File {
        /// Path to the file, or `-` for stdin
        path: PathBuf,

        /// Print the file without condensing it
        #[arg(long)]
        raw: bool,
    },
}

/// Command-line overrides for the `pack` filters
struct PackOverrides {
    include_ext: Vec<String>,
    exclude_ext: Vec<String>,
    include_dirs: Vec<String>,
    exclude_dirs: Vec<String>,
    modify_python: bool,
    no_gitignore: bool,
}

impl PackOverrides {
    fn apply(self, config: &mut Config) {
        if !self.include_ext.is_empty() {
            config.filter.include_ext = self.include_ext;
        }
        if !self.exclude_ext.is_empty() {
            config.filter.exclude_ext = self.exclude_ext;
        }
        if !self.include_dirs.is_empty() {
            config.filter.include_dirs = self.include_dirs;
        }
        if !self.exclude_dirs.is_empty() {
            config.filter.exclude_dirs = self.exclude_dirs;
        }
        if self.modify_python {
            config.condense.enabled = true;
        }
        if self.no_gitignore {
            config.ignore.respect_gitignore = false;
        }
    }
}

fn main() {
    // Set RUST_LOG=debug for verbose logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { root } => cmd_init(root, cli.json),
        Commands::Pack {
            sources,
            include_ext,
            exclude_ext,
            include_dirs,
            exclude_dirs,
            modify_python,
            no_gitignore,
            output,
            stats,
        } => {
            let overrides = PackOverrides {
                include_ext,
                exclude_ext,
                include_dirs,
                exclude_dirs,
                modify_python,
                no_gitignore,
            };
            cmd_pack(
                cli.config.as_deref(),
                &sources,
                overrides,
                output.as_deref(),
                stats,
                cli.json,
            )
        }
        Commands::File { path, raw } => cmd_file(&path, raw, cli.json),
    };

    if let Err(e) = result {
        if cli.json {
            let error_json = serde_json::json!({
                "code": e.code(),
                "message": e.to_string(),
                "hint": e.hint(),
            });
            eprintln!("{}", error_json);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn cmd_init(root: Option<PathBuf>, json: bool) -> condense_core::Result<()> {
    use colored::Colorize;

    let root = match root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let path = Config::init(&root)?;

    if json {
        println!("{}", serde_json::json!({ "created": path }));
    } else {
        println!("{} {}", "Created".green(), path.display());
    }
    Ok(())
}

fn cmd_pack(
    config_path: Option<&Path>,
    sources: &[PathBuf],
    overrides: PackOverrides,
    output: Option<&Path>,
    show_stats: bool,
    json: bool,
) -> condense_core::Result<()> {
    let mut config = load_config(config_path, sources)?;
    overrides.apply(&mut config);

    let files = discover_files(sources, &config)?;
    tracing::debug!(files = files.len(), "discovered files");

    let bundle = Bundle::build(&files, &config);
    let rendered = bundle.render();

    if let Some(path) = output {
        std::fs::write(path, &rendered)?;
    }

    if json {
        let stats = bundle.stats();
        let mut value = serde_json::json!({
            "stats": stats,
            "skipped": bundle.skipped,
        });
        match output {
            Some(path) => value["output"] = serde_json::json!(path),
            None => value["bundle"] = serde_json::json!(rendered),
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if output.is_none() {
        print!("{}", rendered);
    }

    if show_stats || output.is_some() {
        print_summary(&bundle.stats(), output);
    }
    Ok(())
}

fn cmd_file(path: &Path, raw: bool, json: bool) -> condense_core::Result<()> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else if path.is_file() {
        std::fs::read_to_string(path)?
    } else {
        return Err(CondenseError::SourceNotFound(path.to_path_buf()));
    };

    let content = condense_core::condense(&text, !raw);

    if json {
        let value = serde_json::json!({
            "path": path,
            "condensed": !raw,
            "original_lines": text.lines().count(),
            "lines": content.lines().count(),
            "content": content,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Explicit `--config`, else `.condense.toml` beside the first directory source
fn load_config(config_path: Option<&Path>, sources: &[PathBuf]) -> condense_core::Result<Config> {
    if let Some(path) = config_path {
        return Config::load(path);
    }
    match sources.iter().find(|s| s.is_dir()) {
        Some(root) => Config::discover(root),
        None => Ok(Config::default()),
    }
}

fn print_summary(stats: &BundleStats, output: Option<&Path>) {
    use colored::Colorize;

    if let Some(path) = output {
        eprintln!("{}: {}", "Wrote".green(), path.display());
    }
    eprintln!(
        "{}: {} files ({} condensed)",
        "Bundled".green(),
        stats.files_included,
        stats.files_condensed
    );
    if stats.files_skipped > 0 {
        eprintln!("{}: {} files", "Skipped".yellow(), stats.files_skipped);
    }
    eprintln!(
        "{}: {} -> {} lines",
        "Lines".blue(),
        stats.original_lines,
        stats.bundle_lines
    );
    eprintln!(
        "{}: {} -> {} ({:.1}% saved)",
        "Tokens".blue(),
        stats.original_tokens,
        stats.bundle_tokens,
        stats.token_savings() * 100.0
    );
}
