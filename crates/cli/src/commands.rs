// FILE: crates/cli/src/commands.rs

use anyhow::{bail, Context, Result};
use audiostories_config::{BackendConfig, Config, ValidationError};
use audiostories_core::{AppError, RecoveryAction, Session, Story};
use audiostories_database::{Backend, DatabaseConfig, MemoryAuthService};
use audiostories_library::{AccountManager, StoryStore};
use audiostories_player::{CatalogView, StatsView};
use audiostories_resilience::RetryPolicy;
use clap::ArgMatches;
use console::style;
use std::path::Path;
use std::sync::Arc;

/// Email, password and optional display name from the command line
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

impl Credentials {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let value = |name: &str| {
            matches
                .get_one::<String>(name)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("--{} is required", name))
        };
        Ok(Self {
            email: value("email")?,
            password: value("password")?,
            name: matches.get_one::<String>("name").cloned(),
        })
    }
}

/// Refuses to run with settings outside their ranges. Every problem is
/// logged; the first one is returned.
pub fn check_config(config: &Config) -> std::result::Result<(), AppError> {
    let Err(errors) = config.validate() else {
        return Ok(());
    };
    for e in &errors {
        log::error!("Invalid setting: {}", e);
    }
    match errors.into_iter().next() {
        Some(first) => Err(invalid_setting(first)),
        None => Ok(()),
    }
}

fn invalid_setting(e: ValidationError) -> AppError {
    AppError::invalid_configuration(e.field, e.value.unwrap_or_default(), e.problem)
}

/// The line shown when a command fails.
///
/// Failures that carry an `AppError` are shown by their user message, with a
/// hint on what to do next; anything else by its own text.
pub fn failure_message(err: &anyhow::Error) -> String {
    let Some(app) = err.chain().find_map(|cause| cause.downcast_ref::<AppError>()) else {
        return format!("{:#}", err);
    };
    let message = app.user_message();
    match app.recovery_action() {
        RecoveryAction::Reauthenticate => format!("{} Check --email and --password.", message),
        RecoveryAction::UserIntervention if app.is_critical() => {
            format!("{} ({})", message, app)
        }
        _ => message,
    }
}

pub fn report_failure(err: &anyhow::Error) {
    if err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<AppError>())
        .any(AppError::is_critical)
    {
        log::error!("{:#}", err);
    } else {
        log::debug!("{:#}", err);
    }
    eprintln!("{} {}", style("Error:").red().bold(), failure_message(err));
}

/// SQLite documents with a process-local session
pub async fn open_backend(db_path: &Path, config: &Config) -> Result<Backend> {
    let db_config = DatabaseConfig::new(db_path.to_string_lossy());
    let backend = Backend::sqlite(db_config, Arc::new(MemoryAuthService::new()))
        .await
        .context("Failed to open document store")?;
    Ok(backend.with_transaction_attempts(config.backend.transaction_attempts))
}

pub fn story_store(backend: &Backend, config: &BackendConfig) -> StoryStore {
    StoryStore::new(backend.clone()).with_retry_policy(
        RetryPolicy::new(config.fetch_attempts).with_initial_delay(config.retry_initial_delay()),
    )
}

/// Signs in, creating the account on first use
pub async fn sign_in(backend: &Backend, credentials: &Credentials) -> Result<Session> {
    let accounts = AccountManager::new(backend.clone());
    match accounts
        .sign_in_or_register(
            credentials.name.as_deref(),
            &credentials.email,
            &credentials.password,
        )
        .await
    {
        Some(session) => Ok(session),
        None => Err(AppError::AuthenticationFailed {
            reason: format!("could not sign in as {}", credentials.email),
        }
        .into()),
    }
}

/// Reads a JSON array of stories and stores each one
pub async fn import_stories(backend: &Backend, config: &Config, file: &Path) -> Result<usize> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let stories: Vec<Story> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of stories", file.display()))?;

    if let Some(index) = stories.iter().position(|s| s.id.is_empty()) {
        bail!("Story #{} in {} has no id", index + 1, file.display());
    }

    let store = story_store(backend, &config.backend);
    for story in &stories {
        store
            .save(story)
            .await
            .with_context(|| format!("Failed to save story {}", story.id))?;
    }
    Ok(stories.len())
}

pub async fn seed(backend: &Backend, config: &Config, file: &Path) -> Result<()> {
    let count = import_stories(backend, config, file).await?;
    println!(
        "{} Imported {} stories from {}",
        style("✓").green().bold(),
        count,
        file.display()
    );
    Ok(())
}

pub async fn load_catalog(backend: &Backend, config: &Config) -> Result<Vec<Story>> {
    let view = CatalogView::new(story_store(backend, &config.backend));
    view.load_strict().await;

    let state = view.snapshot();
    if let Some(message) = state.error_message {
        bail!(message);
    }
    Ok(state.stories)
}

pub async fn show_catalog(backend: &Backend, config: &Config) -> Result<()> {
    let stories = load_catalog(backend, config).await?;

    if stories.is_empty() {
        println!("No stories yet. Use 'seed' to import some.");
        return Ok(());
    }

    println!("\n{} Stories", style(stories.len()).bold().cyan());
    println!("{}", "=".repeat(80));
    for story in &stories {
        print_story_summary(story);
    }
    Ok(())
}

fn print_story_summary(story: &Story) {
    print!("{}  {}", style(&story.id).dim(), style(&story.title).bold());
    if !story.author.is_empty() {
        print!(" by {}", story.author);
    }
    println!();
    if !story.image_url.is_empty() {
        println!("    {}", style(story.display_image_url()).dim());
    }
}

pub async fn show_stats(backend: &Backend, config: &Config, credentials: &Credentials) -> Result<()> {
    sign_in(backend, credentials).await?;

    let view = StatsView::new(
        AccountManager::new(backend.clone()),
        story_store(backend, &config.backend),
    );
    view.load().await;

    let state = view.snapshot();
    if let Some(message) = state.error_message {
        bail!(message);
    }

    let name = state
        .profile
        .as_ref()
        .and_then(|p| p.name.clone())
        .unwrap_or_else(|| credentials.email.clone());
    println!("\n{}", style(format!("Favorite stories of {}", name)).bold().cyan());
    println!("{}", "=".repeat(80));

    if state.ranking.is_empty() {
        println!("Nothing played yet.");
        return Ok(());
    }

    for row in &state.ranking {
        let medal = match row.medal {
            Some(medal) => format!("[{}]", medal),
            None => String::new(),
        };
        let title = row.title.as_deref().unwrap_or(row.story_id.as_str());
        println!(
            "{:>3}. {:<40} {:>5} plays {}",
            row.rank,
            title,
            row.play_count,
            style(medal).yellow()
        );
    }

    let last = state
        .profile
        .and_then(|p| p.stats)
        .and_then(|s| s.last_listened_story_id);
    if let Some(id) = last {
        println!("\nLast listened: {}", id);
    }
    Ok(())
}
