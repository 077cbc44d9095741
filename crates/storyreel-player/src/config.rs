//! Host configuration read from the environment.

use std::path::PathBuf;

use storyreel_playback::application::config::PlaybackConfig;

use crate::error::AppError;

/// Path to the profile JSON document. Required.
pub const PROFILE_DATA_VAR: &str = "STORYREEL_PROFILE_DATA";
/// Milliseconds between display frames.
pub const FRAME_INTERVAL_VAR: &str = "STORYREEL_FRAME_INTERVAL_MS";
/// Per-story duration for feed openings.
pub const FEED_STORY_VAR: &str = "STORYREEL_FEED_STORY_MS";
/// Per-story duration for profile openings.
pub const PROFILE_STORY_VAR: &str = "STORYREEL_PROFILE_STORY_MS";
/// Owner (id or username) to open from a profile page instead of the feed.
pub const START_OWNER_VAR: &str = "STORYREEL_START_OWNER";

const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Settings for one run of the host.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Where the profile document lives.
    pub profile_data: PathBuf,
    /// Milliseconds between display frames.
    pub frame_interval_ms: u64,
    /// Owner to open from a profile page, if any.
    pub start_owner: Option<String>,
    /// Story durations and gesture thresholds.
    pub playback: PlaybackConfig,
}

impl PlayerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// numeric variable does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable if it is set.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a required variable is missing or a
    /// numeric variable does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile_data = lookup(PROFILE_DATA_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| {
                AppError::Config(format!("{PROFILE_DATA_VAR} environment variable must be set"))
            })?;

        let defaults = PlaybackConfig::default();
        let frame_interval_ms =
            parse_millis(&lookup, FRAME_INTERVAL_VAR)?.unwrap_or(DEFAULT_FRAME_INTERVAL_MS);
        if frame_interval_ms == 0 {
            return Err(AppError::Config(format!(
                "{FRAME_INTERVAL_VAR} must be greater than zero"
            )));
        }

        let playback = PlaybackConfig {
            feed_story_duration_ms: parse_millis(&lookup, FEED_STORY_VAR)?
                .unwrap_or(defaults.feed_story_duration_ms),
            profile_story_duration_ms: parse_millis(&lookup, PROFILE_STORY_VAR)?
                .unwrap_or(defaults.profile_story_duration_ms),
            gestures: defaults.gestures,
        };

        let start_owner = lookup(START_OWNER_VAR)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            profile_data,
            frame_interval_ms,
            start_owner,
            playback,
        })
    }
}

fn parse_millis<F>(lookup: &F, name: &str) -> Result<Option<u64>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("{name} must be a whole number of milliseconds: {e}")))
        })
        .transpose()
}
