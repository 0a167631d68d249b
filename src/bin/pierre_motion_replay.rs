// ABOUTME: Replays a recorded landmark stream through a motion session and reports the result
// ABOUTME: Drives the session with a manual clock set to each frame's capture timestamp
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Frame recording replay tool.
//!
//! Usage:
//! ```bash
//! # Summary for a recorded set
//! cargo run --bin pierre-motion-replay -- squat_set.json
//!
//! # Grade as a beginner, feminine agreement, English messages
//! cargo run --bin pierre-motion-replay -- squat_set.json --level beginner --gender f --locale en
//!
//! # Machine-readable output with every frame report
//! cargo run --bin pierre-motion-replay -- squat_set.json --json --verbose
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use pierre_motion::clock::ManualClock;
use pierre_motion::config::MotionConfig;
use pierre_motion::logging::LoggingConfig;
use pierre_motion::models::{FitnessLevel, Locale, UserGender};
use pierre_motion::recording::FrameRecording;
use pierre_motion::session::{FrameReport, MotionSession, SessionSummary};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "pierre-motion-replay",
    about = "Pierre Motion Frame Replay",
    long_about = "Replay a JSON frame recording through the rep counter and form analyzer"
)]
struct ReplayArgs {
    /// Path to the JSON frame recording
    recording: PathBuf,

    /// Fitness level override (beginner, intermediate, advanced)
    #[arg(long)]
    level: Option<FitnessLevel>,

    /// Grammatical gender for feedback messages (feminino/female/f, masculino/male/m)
    #[arg(long)]
    gender: Option<UserGender>,

    /// Feedback message locale (pt-BR, en)
    #[arg(long, default_value = "pt-BR")]
    locale: Locale,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Include every frame report
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = ReplayArgs::parse();

    let mut logging = LoggingConfig::from_env();
    if args.verbose {
        logging = logging.with_verbose();
    }
    logging.init()?;

    let recording = FrameRecording::load(&args.recording)
        .with_context(|| format!("Failed to load recording {}", args.recording.display()))?;
    let config = MotionConfig::load_or_default();

    let level = args.level.unwrap_or(recording.level);
    let start_ms = recording.frames.first().map_or(0, |frame| frame.timestamp_ms);
    let clock = ManualClock::new(start_ms);

    let mut session = MotionSession::new(
        recording.exercise,
        level,
        &config,
        None,
        None,
        clock.clone(),
    )?;
    session.set_locale(args.locale);
    session.set_user_gender(args.gender);

    info!(
        exercise = %recording.exercise,
        %level,
        frames = recording.frames.len(),
        duration_ms = recording.duration_ms(),
        "Replaying recording"
    );

    let reports = recording.replay(&mut session, &clock);
    let summary = session.summary();

    if args.json {
        print_json(&summary, args.verbose.then_some(reports.as_slice()))?;
    } else {
        print_text(&summary, args.verbose.then_some(reports.as_slice()));
    }

    Ok(())
}

fn print_json(summary: &SessionSummary, reports: Option<&[FrameReport]>) -> Result<()> {
    let output = reports.map_or_else(
        || json!({ "summary": summary }),
        |reports| json!({ "summary": summary, "frames": reports }),
    );
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text(summary: &SessionSummary, reports: Option<&[FrameReport]>) {
    if let Some(reports) = reports {
        for (index, report) in reports.iter().enumerate() {
            let reps = &report.reps;
            println!(
                "#{index:<5} {:>6.1}° {:<4} reps={} partial={}{}",
                reps.angles.primary,
                reps.current_phase,
                reps.total_reps,
                reps.partial_reps,
                reps.last_event
                    .map(|event| format!(" [{:?}]", event.outcome))
                    .unwrap_or_default()
            );
            for issue in &report.form.issues {
                println!("       {} ({}): {}", issue.kind, issue.severity, issue.message);
            }
        }
        println!();
    }

    let stats = &summary.stats;
    println!("Session {}", summary.id);
    println!("  Exercise:         {}", summary.exercise);
    println!("  Level:            {}", summary.level);
    println!("  Repetitions:      {}", stats.total_reps);
    println!("  Partial reps:     {}", stats.partial_reps);
    println!("  Rejected:         {}", stats.rejected_closures);
    if let Some(average) = stats.average_quality {
        println!("  Average quality:  {average:.1}");
    }
    println!("  Issues emitted:   {}", summary.issues_emitted);
    if let Some(score) = summary.average_form_score {
        println!("  Avg form score:   {score:.1}");
    }
}
