//! Storyreel player entry point.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use storyreel_catalog::application::loader::CachedProfileLoader;
use storyreel_core::clock::SystemClock;
use storyreel_core::scheduler::FrameQueue;
use storyreel_playback::application::player::StoryPlayer;
use storyreel_player::config::PlayerConfig;
use storyreel_player::host::{self, DEFAULT_SURFACE};
use storyreel_player::source::FileProfileSource;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr; stdin carries viewer commands.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!("Starting Storyreel player");

    let config = PlayerConfig::from_env()?;

    let loader = CachedProfileLoader::new(FileProfileSource::new(&config.profile_data));
    let catalog = loader.load_catalog().await;
    if catalog.is_empty() {
        tracing::warn!(path = %config.profile_data.display(), "no stories to play");
        return Ok(());
    }

    let entry = host::resolve_entry(&catalog, config.start_owner.as_deref())?;
    let frames = FrameQueue::new();
    let mut player = StoryPlayer::new(
        catalog,
        Arc::new(SystemClock),
        Box::new(frames.clone()),
        DEFAULT_SURFACE,
        config.playback,
    );
    player.open(entry)?;

    let summary = host::run(
        &mut player,
        &frames,
        Duration::from_millis(config.frame_interval_ms),
        BufReader::new(tokio::io::stdin()),
    )
    .await?;

    tracing::info!(
        stories_shown = summary.stories_shown,
        stories_viewed = player.viewed().len(),
        close_reason = ?summary.close_reason,
        "player finished"
    );

    Ok(())
}
