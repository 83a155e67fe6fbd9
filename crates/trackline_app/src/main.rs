// SPDX-License-Identifier: MIT OR Apache-2.0
//! Trackline - headless session replay for the timeline engine.
//!
//! Loads a RON session, replays its scripted input through
//! [`trackline_engine::TimelineEngine`] and prints the final timeline and
//! the signal log as JSON on stdout. Logs go to stderr; set `RUST_LOG` to
//! change the filter.
//!
//! ```text
//! trackline session.ron
//! ```

mod session;

use session::{Session, SessionError};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn run(path: &Path) -> Result<(), SessionError> {
    let session = Session::load(path)?;
    tracing::info!(
        path = %path.display(),
        tracks = session.tracks.len(),
        items = session.items.len(),
        steps = session.steps.len(),
        "session loaded"
    );
    let report = session.run()?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trackline=info,trackline_engine=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Trackline v{}", env!("CARGO_PKG_VERSION"));

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: trackline <session.ron>");
        return ExitCode::from(2);
    };

    match run(Path::new(&path)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Replay failed: {e}");
            ExitCode::FAILURE
        }
    }
}
