// FILE: crates/cli/src/player.rs

use crate::commands::{sign_in, story_store, Credentials};
use anyhow::{bail, Context, Result};
use audiostories_config::Config;
use audiostories_core::{Duration, Voice};
use audiostories_database::Backend;
use audiostories_library::StatsStore;
use audiostories_player::{PlaybackCoordinator, ScreenState};
use audiostories_speech::{SimulatedSpeechEngine, SpeechAdapter, VoiceFilter};
use console::{style, Term};
use std::sync::Arc;

const PROGRESS_WIDTH: usize = 40;

pub struct PlayOptions {
    pub story_id: String,
    pub rate: Option<f32>,
    pub voice: Option<String>,
}

/// Voices the simulated engine reports, shaped like a platform catalog
fn simulated_voices() -> Vec<Voice> {
    vec![
        Voice::new("en-us-x-sfg-network", "en-US"),
        Voice::new("en-us-x-iol-network", "en-US"),
        Voice::new("en-us-x-sfg-local", "en-US"),
        Voice::new("en-gb-x-gba-network", "en-GB"),
    ]
}

pub async fn play_story(
    backend: &Backend,
    config: &Config,
    credentials: &Credentials,
    options: PlayOptions,
) -> Result<()> {
    sign_in(backend, credentials).await?;

    let engine = SimulatedSpeechEngine::new()
        .with_voices(simulated_voices())
        .with_playback(std::time::Duration::from_millis(
            config.playback.progress_tick_ms,
        ));
    let adapter = SpeechAdapter::new(Arc::new(engine))
        .with_voice_filter(VoiceFilter::new(
            config.playback.voice_marker.clone(),
            config.playback.voice_locale.clone(),
        ))
        .with_words_per_minute(config.playback.words_per_minute)
        .with_init_timeout(config.backend.init_timeout());

    let coordinator = PlaybackCoordinator::new(
        story_store(backend, &config.backend),
        StatsStore::new(backend.clone()),
        adapter,
    );

    coordinator.set_speech_rate(options.rate.unwrap_or(config.playback.default_speech_rate));
    coordinator.enter(options.story_id.as_str());
    coordinator.settle().await;

    let state = coordinator.snapshot();
    if let Some(message) = state.error_message {
        bail!(message);
    }
    if !state.speech_ready {
        bail!("Text-to-speech is not available");
    }

    if let Some(voice) = options.voice {
        if !state.voices.contains(&voice) {
            log::warn!("Voice {} is not offered, using the default voice", voice);
        }
        coordinator.select_voice(Some(voice));
    }

    let term = Term::stdout();
    if term.hide_cursor().is_err() {
        log::warn!("Failed to hide cursor");
    }

    let result = run_player(&term, &coordinator).await;

    let _ = term.show_cursor();
    coordinator.settle().await;
    coordinator.teardown();
    result
}

async fn run_player(term: &Term, coordinator: &PlaybackCoordinator) -> Result<()> {
    let mut state = coordinator.state();
    let mut progress = coordinator.progress();

    if !coordinator.play() {
        bail!("Playback could not be started");
    }
    let total = *coordinator.total_duration().borrow();
    draw_header(term, &coordinator.snapshot(), total)?;

    let interrupted = loop {
        draw_progress(term, *progress.borrow_and_update(), total)?;
        if !state.borrow_and_update().is_playing() {
            break false;
        }

        tokio::select! {
            changed = progress.changed() => {
                if changed.is_err() {
                    break false;
                }
            }
            changed = state.changed() => {
                if changed.is_err() {
                    break false;
                }
            }
            _ = tokio::signal::ctrl_c() => break true,
        }
    };

    if interrupted {
        coordinator.stop();
        term.write_line("")?;
        term.write_line(&format!("{}", style("Stopped").red()))?;
    } else {
        draw_progress(term, *progress.borrow(), total)?;
        term.write_line("")?;
        match coordinator.snapshot().error_message {
            Some(message) => term.write_line(&format!("{}", style(message).red()))?,
            None => term.write_line(&format!("{}", style("Finished").green()))?,
        }
    }
    Ok(())
}

fn draw_header(term: &Term, state: &ScreenState, total: Duration) -> Result<()> {
    let Some(story) = &state.story else {
        return Ok(());
    };
    term.write_line(&format!("\n  {}", style(&story.title).bold().cyan()))
        .context("Failed to write to terminal")?;
    if !story.author.is_empty() {
        term.write_line(&format!("  by {}", style(&story.author).dim()))?;
    }
    let voice = state.selected_voice.as_deref().unwrap_or("default voice");
    term.write_line(&format!(
        "  {} at {}, about {}\n",
        voice, state.speech_rate, total
    ))?;
    Ok(())
}

fn draw_progress(term: &Term, progress: f32, total: Duration) -> Result<()> {
    let progress = progress.clamp(0.0, 1.0);
    let filled = (progress * PROGRESS_WIDTH as f32).round() as usize;
    let elapsed = Duration::from_millis((total.as_millis() as f64 * progress as f64) as u64);

    term.clear_line()?;
    term.write_str(&format!(
        "  [{}{}] {} / {}",
        "=".repeat(filled),
        " ".repeat(PROGRESS_WIDTH - filled),
        elapsed,
        total
    ))?;
    Ok(())
}
