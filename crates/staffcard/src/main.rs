//! `staffcard` - CLI for the employee directory
//!
//! This binary drives the directory over the on-disk store: listing and
//! editing employees, seeding an empty directory and exporting vCards.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use staffcard::card::{chat_link, vcard_file_name};
use staffcard::cli::{
    CardCommand, Cli, Command, ConfigCommand, ListCommand, OutputFormat, SeedCommand,
};
use staffcard::{
    init_logging, BootstrapOutcome, CardRenderer, Config, Directory, Employee, FakerSeedSource,
    RecordStore, SeedSource, SqliteBackend, StaticSeedSource,
};

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    let guard = cancel_on_ctrl_c();

    // Each command opens the store itself so `config` works without one.
    match cli.command {
        Command::List(cmd) => {
            let directory = open_directory(&config, Some(remote_source(&config)?))?;
            handle_list(&directory, &config, &cmd, &guard).await
        }
        Command::Show(cmd) => {
            let directory = open_directory(&config, None)?;
            handle_show(&directory, &cmd.id, cmd.json)
        }
        Command::Add(cmd) => {
            let directory = open_directory(&config, None)?;
            check_bio(&config, cmd.fields.bio.as_deref())?;
            let employee = directory.create(cmd.into())?;
            println!("Added {} ({})", employee.name, employee.id);
            Ok(())
        }
        Command::Update(cmd) => {
            let directory = open_directory(&config, None)?;
            check_bio(&config, cmd.fields.bio.as_deref())?;
            match directory.patch(&cmd.id, cmd.fields.into())? {
                Some(employee) => println!("Updated {} ({})", employee.name, employee.id),
                None => println!("No employee with id {}", cmd.id),
            }
            Ok(())
        }
        Command::Remove(cmd) => {
            let directory = open_directory(&config, None)?;
            let before = directory.list().len();
            let remaining = directory.delete(&cmd.id)?;
            if remaining.len() < before {
                println!("Removed {}; {} remaining", cmd.id, remaining.len());
            } else {
                println!("No employee with id {}", cmd.id);
            }
            Ok(())
        }
        Command::Seed(cmd) => handle_seed(&config, &cmd, &guard).await,
        Command::Card(cmd) => {
            let directory = open_directory(&config, None)?;
            handle_card(&directory, &cmd)
        }
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

/// Cancel the returned token when the user hits Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let guard = CancellationToken::new();
    let trigger = guard.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, cancelling pending work");
            trigger.cancel();
        }
    });
    guard
}

fn open_store(config: &Config) -> CliResult<RecordStore> {
    let backend = SqliteBackend::open(config.database_path())?;
    Ok(RecordStore::with_key(
        Arc::new(backend),
        config.storage.key.clone(),
    ))
}

fn open_directory(config: &Config, source: Option<Arc<dyn SeedSource>>) -> CliResult<Directory> {
    let directory = Directory::new(open_store(config)?, CardRenderer::from_config(&config.card));
    Ok(match source {
        Some(source) => directory.with_seed_source(source),
        None => directory,
    })
}

fn remote_source(config: &Config) -> CliResult<Arc<dyn SeedSource>> {
    Ok(Arc::new(FakerSeedSource::from_config(&config.seed)?))
}

fn check_bio(config: &Config, bio: Option<&str>) -> CliResult {
    let limit = config.card.bio_limit;
    match bio {
        Some(bio) if bio.chars().count() > limit => {
            Err(format!("bio is longer than {limit} characters").into())
        }
        _ => Ok(()),
    }
}

async fn handle_list(
    directory: &Directory,
    config: &Config,
    cmd: &ListCommand,
    guard: &CancellationToken,
) -> CliResult {
    if config.seed.enabled {
        let outcome = directory.seed_if_empty(config.seed.quantity, guard).await?;
        if let BootstrapOutcome::Seeded(n) = outcome {
            eprintln!("Seeded {n} employees from {}", config.seed.endpoint);
        }
    }

    let employees = match &cmd.search {
        Some(term) => directory.search(term),
        None => directory.list(),
    };

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&employees)?),
        OutputFormat::Plain => {
            for employee in &employees {
                println!("{}  {} - {}", employee.id, employee.name, employee.position);
            }
        }
        OutputFormat::Table => print_table(&employees),
    }
    Ok(())
}

fn print_table(employees: &[Employee]) {
    if employees.is_empty() {
        println!("No employees.");
        return;
    }

    let id_w = column_width(employees.iter().map(|e| e.id.as_str()), "ID");
    let name_w = column_width(employees.iter().map(|e| e.name.as_str()), "NAME");
    let pos_w = column_width(employees.iter().map(|e| e.position.as_str()), "POSITION");

    println!("{:id_w$}  {:name_w$}  {:pos_w$}  EMAIL", "ID", "NAME", "POSITION");
    for e in employees {
        println!(
            "{:id_w$}  {:name_w$}  {:pos_w$}  {}",
            e.id, e.name, e.position, e.email
        );
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .fold(header.len(), usize::max)
}

fn handle_show(directory: &Directory, id: &str, json: bool) -> CliResult {
    let Some(employee) = directory.get(id) else {
        println!("No employee with id {id}");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&employee)?);
        return Ok(());
    }

    println!("{}", employee.name);
    println!("{}", "-".repeat(employee.name.chars().count().max(8)));
    println!("Id:        {}", employee.id);
    println!("Position:  {}", employee.position);
    println!("Phone:     {}", employee.phone);
    println!("Email:     {}", employee.email);
    println!("LinkedIn:  {}", employee.linkedin_link);
    println!("Image:     {}", employee.image_url);
    if let Some(link) = chat_link(&employee) {
        println!("Chat:      {link}");
    }
    if let Some(url) = directory.profile_url(&employee.id) {
        println!("Profile:   {url}");
    }
    if !employee.bio.is_empty() {
        println!();
        println!("{}", employee.bio);
    }
    Ok(())
}

async fn handle_seed(config: &Config, cmd: &SeedCommand, guard: &CancellationToken) -> CliResult {
    let source: Arc<dyn SeedSource> = match &cmd.from {
        Some(path) => {
            let payload: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            Arc::new(StaticSeedSource::from_payload(&payload))
        }
        None => remote_source(config)?,
    };
    let directory = open_directory(config, Some(source))?;
    let count = cmd.count.unwrap_or(config.seed.quantity);

    let outcome = if cmd.force {
        directory.reseed(count, guard).await?
    } else {
        directory.seed_if_empty(count, guard).await?
    };

    match outcome {
        BootstrapOutcome::AlreadyPopulated(n) => {
            println!("Directory already holds {n} employees; use --force to replace them.");
        }
        BootstrapOutcome::Seeded(n) => println!("Seeded {n} employees."),
        BootstrapOutcome::SourceEmpty => {
            warn!("Seed source returned no records");
            println!("No records were seeded.");
        }
        BootstrapOutcome::Abandoned => println!("Seeding cancelled."),
    }
    Ok(())
}

fn handle_card(directory: &Directory, cmd: &CardCommand) -> CliResult {
    let (Some(employee), Some(card)) = (directory.get(&cmd.id), directory.card(&cmd.id)) else {
        println!("No employee with id {}", cmd.id);
        return Ok(());
    };

    match &cmd.output {
        None => print!("{card}"),
        Some(path) => {
            let target = card_target(path, &employee);
            std::fs::write(&target, card)?;
            println!("Wrote {}", target.display());
        }
    }
    Ok(())
}

fn card_target(path: &Path, employee: &Employee) -> PathBuf {
    if path.is_dir() {
        path.join(vcard_file_name(employee))
    } else {
        path.to_path_buf()
    }
}

fn handle_status(config: &Config, json: bool) -> CliResult {
    let store = open_store(config)?;
    let snapshot = store.snapshot();
    let info = store.blob_info()?;
    let state = format!("{:?}", snapshot.state);

    if json {
        let status = serde_json::json!({
            "backend": store.backend_name(),
            "database_path": config.database_path(),
            "key": store.key(),
            "state": state,
            "employees": snapshot.records.len(),
            "size_bytes": info.as_ref().map(|i| i.size_bytes),
            "updated_at": info.as_ref().and_then(|i| i.updated_at),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("staffcard status");
        println!("----------------");
        println!("Backend:       {}", store.backend_name());
        println!("Database:      {}", config.database_path().display());
        println!("Key:           {}", store.key());
        println!("State:         {state}");
        println!("Employees:     {}", snapshot.records.len());
        if let Some(info) = info {
            println!("Size:          {} bytes", info.size_bytes);
            if let Some(updated_at) = info.updated_at {
                println!("Updated:       {}", updated_at.to_rfc3339());
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Key:                {}", config.storage.key);
                println!();
                println!("[Seed]");
                println!("  Enabled:            {}", config.seed.enabled);
                println!("  Endpoint:           {}", config.seed.endpoint);
                println!("  Quantity:           {}", config.seed.quantity);
                println!("  Timeout (ms):       {}", config.seed.timeout_ms);
                println!();
                println!("[Card]");
                println!("  Organization:       {}", config.card.organization);
                println!("  Public base URL:    {}", config.card.public_base_url);
                println!("  Bio limit:          {}", config.card.bio_limit);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
