use std::{
    collections::BTreeMap,
    ffi::OsStr,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

use modscript::{
    Definition, Dispatcher, DispatchRequest, EngineSettings, IndexedDefinitionsBuilder, ParseError, StoreError,
    config::{LoggingSettings, SettingsError},
    definition::normalize_path,
    format_code,
    metadata::{MetadataError, ModDescriptor, parse_mod_descriptor},
    rules::RulesetError,
};

const DESCRIPTOR_FILE: &str = "descriptor.mod";

#[derive(Parser, Debug)]
#[command(name = "modscript", version, about)]
struct Args {
    #[arg(long, short, global = true)]
    verbose: bool,

    /// JSON settings applied over `modscript.toml`, bare or under a
    /// `modscript` key.
    #[arg(long, global = true, value_name = "JSON")]
    settings_json: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract definitions from every file of a mod directory.
    Scan(ScanArgs),
    /// Print the canonical form of a script file.
    Format {
        file: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct ScanArgs {
    dir: PathBuf,

    /// Built-in ruleset to use instead of the configured one.
    #[arg(long)]
    game: Option<String>,

    /// Custom TOML ruleset.
    #[arg(long)]
    ruleset: Option<PathBuf>,

    /// Mod name recorded on definitions; defaults to the descriptor name.
    #[arg(long)]
    mod_name: Option<String>,

    /// Search term to run against the loaded store.
    #[arg(long)]
    search: Option<String>,

    /// Keep definition bodies on disk under this directory.
    #[arg(long)]
    disk: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Ruleset(#[from] RulesetError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid descriptor {path}: {error}")]
    Descriptor {
        path: PathBuf,
        error: MetadataError,
    },

    #[error("cannot parse {path}: {error}")]
    Syntax {
        path: PathBuf,
        error: ParseError,
    },

    #[error("I/O error at {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },
}

fn read_to_string(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|error| CliError::Io {
        path: path.to_path_buf(),
        error,
    })
}

fn init_logging(
    settings: &LoggingSettings,
    verbose: bool,
) {
    let directive = settings.filter_directive(verbose);

    let file_layer = settings.file.as_ref().map(|file| {
        let path = Path::new(file);
        let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let appender =
            tracing_appender::rolling::never(dir, path.file_name().unwrap_or(OsStr::new("modscript.log")));
        fmt::layer()
            .with_writer(appender)
            .with_ansi(false)
            .with_target(false)
            .with_filter(EnvFilter::new(&directive))
    });

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new(&directive));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    let start = match &args.command {
        Command::Scan(scan) => scan.dir.clone(),
        Command::Format {
            file,
        } => file.clone(),
    };
    let (settings, settings_error) = match EngineSettings::load(&start, args.settings_json.as_deref()) {
        Ok(settings) => (settings, None),
        Err(error) => (EngineSettings::default(), Some(error)),
    };
    init_logging(&settings.logging, args.verbose);
    if let Some(error) = settings_error {
        error!("{error}");
        return ExitCode::FAILURE;
    }

    let result = match args.command {
        Command::Scan(scan_args) => scan(scan_args, settings),
        Command::Format {
            file,
        } => format_file(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            ExitCode::FAILURE
        },
    }
}

fn format_file(path: &Path) -> Result<(), CliError> {
    let text = read_to_string(path)?;
    let canonical = format_code(&text).map_err(|error| CliError::Syntax {
        path: path.to_path_buf(),
        error,
    })?;
    println!("{canonical}");
    Ok(())
}

fn read_descriptor(dir: &Path) -> Result<Option<ModDescriptor>, CliError> {
    let path = dir.join(DESCRIPTOR_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = read_to_string(&path)?;
    let lines: Vec<&str> = text.lines().collect();
    parse_mod_descriptor(&lines).map(Some).map_err(|error| CliError::Descriptor {
        path,
        error,
    })
}

/// Reads a file as lines plus the hex SHA-256 of its bytes.
fn read_lines(path: &Path) -> Result<(Vec<String>, String), CliError> {
    let bytes = std::fs::read(path).map_err(|error| CliError::Io {
        path: path.to_path_buf(),
        error,
    })?;
    let sha = format!("{:x}", Sha256::digest(&bytes));
    let lines = String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect();
    Ok((lines, sha))
}

fn scan(
    args: ScanArgs,
    mut settings: EngineSettings,
) -> Result<(), CliError> {
    if let Some(game) = &args.game {
        settings.rules.game = game.trim().to_ascii_lowercase();
        settings.rules.ruleset_path = None;
    }
    if let Some(path) = args.ruleset {
        settings.rules.ruleset_path = Some(path);
    }
    let ruleset = Arc::new(settings.rules.load_ruleset()?);
    let dispatcher = Dispatcher::new(ruleset);

    let descriptor = read_descriptor(&args.dir)?;
    let mod_name = args
        .mod_name
        .or_else(|| descriptor.as_ref().map(|d| d.name.clone()))
        .or_else(|| args.dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_default();
    let dependencies = descriptor.map(|d| d.dependencies).unwrap_or_default();
    info!("[scan] {} ({}) with ruleset {}", args.dir.display(), mod_name, dispatcher.ruleset().name);

    let mut definitions: Vec<Definition> = Vec::new();
    let mut per_parser: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut undefined = 0usize;
    let mut failed = 0usize;

    for entry in WalkDir::new(&args.dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!("[scan] skipping unreadable entry: {error}");
                continue;
            },
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&args.dir) else {
            continue;
        };
        let relative = normalize_path(&relative.to_string_lossy());
        if relative.eq_ignore_ascii_case(DESCRIPTOR_FILE) {
            continue;
        }

        let (lines, sha) = read_lines(entry.path())?;
        let request = DispatchRequest::new(relative.as_str(), lines, mod_name.as_str())
            .with_content_sha(sha)
            .with_dependencies(dependencies.clone());
        let outcome = dispatcher.dispatch_with_outcome(&request);
        if outcome.error.is_some() {
            failed += 1;
        }
        match outcome.used_parser {
            Some(parser) if !outcome.is_undefined() => *per_parser.entry(parser).or_default() += 1,
            _ => {
                debug!("[scan] no definitions from {relative}");
                undefined += 1;
            },
        }

        let disk_file = entry.path().display().to_string();
        definitions.extend(outcome.definitions.into_iter().map(|mut definition| {
            definition.disk_file = Some(disk_file.clone());
            definition
        }));
    }

    let mut builder = IndexedDefinitionsBuilder::from_settings(&settings.store);
    if let Some(dir) = args.disk {
        builder = builder.disk_storage(dir);
    }
    if args.search.is_some() {
        builder = builder.enable_search(true);
    }
    let mut store = builder.build()?;
    store.init(definitions, settings.store.build_hierarchy)?;

    println!("{} definition(s) in {} file(s)", store.len(), store.get_all_file_keys().len());
    for (parser, files) in &per_parser {
        println!("  {parser:<24} {files} file(s)");
    }
    println!("  {:<24} {undefined} file(s)", "undefined");
    if failed > 0 {
        println!("  {:<24} {failed} file(s)", "parse errors");
    }

    let conflicts: Vec<(String, usize)> = store
        .get_all_type_and_id_keys()
        .into_iter()
        .map(|key| {
            let count = store.get_by_type_and_id_key(&key).len();
            (key, count)
        })
        .filter(|(_, count)| *count > 1)
        .collect();
    if !conflicts.is_empty() {
        println!("{} conflicting key(s):", conflicts.len());
        for (key, count) in &conflicts {
            println!("  {key} ({count})");
        }
    }

    if let Some(term) = &args.search {
        for line in store.search(term)? {
            println!("{line}");
        }
    }
    Ok(())
}
