//! Replay one recorded frame through the goal detector.
//!
//! Usage: `detect_frame <frame.json> [config.json]`. Set `FIELDVISION_LOG=debug`
//! to see per-stage counts.

use fieldvision::goals::{load_frame_json, GoalDetectConfig};

#[cfg(feature = "tracing")]
use fieldvision::core::{init_tracing, TracingFormat};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    init_tracing(TracingFormat::Text)?;
    #[cfg(not(feature = "tracing"))]
    fieldvision::core::init_from_env(log::LevelFilter::Info)?;

    let mut args = std::env::args().skip(1);
    let Some(frame_path) = args.next() else {
        eprintln!("Usage: detect_frame <frame.json> [config.json]");
        return Ok(());
    };
    let config = match args.next() {
        Some(path) => GoalDetectConfig::load_json(path)?,
        None => GoalDetectConfig::default(),
    };

    let frame = load_frame_json(&frame_path)?;
    log::info!(
        "{frame_path}: {} horizontal, {} vertical segments",
        frame.horizontal.len(),
        frame.vertical.len()
    );
    let detection = config.build_detector()?.detect_with_diagnostics(&frame)?;
    log::log!(
        if detection.goals.is_empty() {
            log::Level::Warn
        } else {
            log::Level::Info
        },
        "{} candidates, {} accepted, {} goals",
        detection.candidates.len(),
        detection.accepted.len(),
        detection.goals.len()
    );
    println!("{}", serde_json::to_string_pretty(&detection.goals)?);
    Ok(())
}
