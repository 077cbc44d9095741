//! The story player: the single entry point presentation code talks to.
//!
//! The player owns the loaded catalog, one [`PlaybackSession`], the gesture
//! router, viewed-state and the ephemeral per-opening interactions. Every
//! operation applies its commands to the session and then drains the
//! session's events, so viewed-state and the outbox stay in step with
//! playback.

use std::fmt;
use std::sync::Arc;

use storyreel_catalog::domain::catalog::StoryCatalog;
use storyreel_core::clock::Clock;
use storyreel_core::command::Command;
use storyreel_core::error::DomainError;
use storyreel_core::scheduler::{FrameHandle, FrameScheduler};
use tracing::{debug, info, instrument};

use crate::application::config::PlaybackConfig;
use crate::application::view::{PlaybackFrame, StoryBarItem, StoryInteractions};
use crate::domain::commands::{EntryPoint, PlaybackCommand};
use crate::domain::events::{PlaybackEvent, PlaybackEventKind};
use crate::domain::gestures::{GestureRouter, InputEvent, SurfaceBounds};
use crate::domain::session::{PlaybackSession, PlaybackState};
use crate::domain::timer::TimerTick;
use crate::domain::viewed::ViewedTracker;

/// Application facade over the playback domain.
pub struct StoryPlayer {
    config: PlaybackConfig,
    catalog: StoryCatalog,
    session: PlaybackSession,
    router: GestureRouter,
    viewed: ViewedTracker,
    interactions: StoryInteractions,
    clock: Arc<dyn Clock>,
    outbox: Vec<PlaybackEvent>,
}

impl fmt::Debug for StoryPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryPlayer")
            .field("config", &self.config)
            .field("catalog_len", &self.catalog.len())
            .field("session", &self.session)
            .field("viewed", &self.viewed.len())
            .finish_non_exhaustive()
    }
}

impl StoryPlayer {
    /// Creates a player over a loaded catalog. The overlay starts closed.
    #[must_use]
    pub fn new(
        catalog: StoryCatalog,
        clock: Arc<dyn Clock>,
        scheduler: Box<dyn FrameScheduler>,
        surface: SurfaceBounds,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            session: PlaybackSession::new(Arc::clone(&clock), scheduler),
            router: GestureRouter::new(surface, config.gestures),
            config,
            catalog,
            viewed: ViewedTracker::new(),
            interactions: StoryInteractions::default(),
            clock,
            outbox: Vec::new(),
        }
    }

    /// Replaces the catalog used by later openings. A running session keeps
    /// the catalog it was opened with.
    pub fn set_catalog(&mut self, catalog: StoryCatalog) {
        self.catalog = catalog;
    }

    /// The loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> &StoryCatalog {
        &self.catalog
    }

    /// The surface gestures are routed against.
    #[must_use]
    pub fn surface(&self) -> SurfaceBounds {
        self.router.surface()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Opens the overlay from a feed story ring or a profile page.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntryNotFound` for a feed index outside the
    /// catalog, or `DomainError::OwnerNotFound` for a profile with no stories.
    #[instrument(skip(self))]
    pub fn open(&mut self, entry: EntryPoint) -> Result<(), DomainError> {
        let duration_ms = self.config.duration_for(&entry);
        let (catalog, global_index) = match &entry {
            EntryPoint::FeedBar { global_index } => (self.catalog.clone(), *global_index),
            EntryPoint::Profile { owner_id } => {
                let scoped = self
                    .catalog
                    .scoped_to_owner(owner_id)
                    .ok_or_else(|| DomainError::OwnerNotFound(owner_id.clone()))?;
                (scoped, 0)
            }
        };

        self.session.open(catalog, global_index, duration_ms)?;
        self.router.clear();
        self.sync();
        Ok(())
    }

    /// Applies one playback command.
    pub fn dispatch(&mut self, command: PlaybackCommand) {
        debug!(command = command.command_type(), "dispatching playback command");
        match command {
            PlaybackCommand::Pause => self.session.pause(),
            PlaybackCommand::Resume => self.session.resume(),
            PlaybackCommand::Next => self.session.next(),
            PlaybackCommand::Prev => self.session.prev(),
            PlaybackCommand::Close => self.session.close(),
        }
        self.sync();
    }

    /// Freezes progress.
    pub fn pause(&mut self) {
        self.dispatch(PlaybackCommand::Pause);
    }

    /// Continues from the frozen progress.
    pub fn resume(&mut self) {
        self.dispatch(PlaybackCommand::Resume);
    }

    /// Advances forward, closing after the last story.
    pub fn next(&mut self) {
        self.dispatch(PlaybackCommand::Next);
    }

    /// Retreats backward, staying put at the first story.
    pub fn prev(&mut self) {
        self.dispatch(PlaybackCommand::Prev);
    }

    /// Closes the overlay.
    pub fn close(&mut self) {
        self.dispatch(PlaybackCommand::Close);
    }

    /// Routes raw input and applies the resulting commands. Returns the
    /// commands that were applied. Input is ignored while closed.
    pub fn handle_input(&mut self, input: InputEvent) -> Vec<PlaybackCommand> {
        if self.session.state() == PlaybackState::Closed {
            self.router.clear();
            return Vec::new();
        }
        let commands = self.router.route(input, self.clock.now());
        for command in &commands {
            self.dispatch(*command);
        }
        commands
    }

    /// Delivers a display frame. Stale handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Option<TimerTick> {
        let tick = self.session.on_frame(handle);
        self.sync();
        tick
    }

    /// Snapshot of the open overlay, `None` while closed.
    #[must_use]
    pub fn frame(&self) -> Option<PlaybackFrame> {
        let entry = self.session.active_entry()?;
        let owner = self.session.catalog()?.owner(&entry.owner_id)?.clone();
        Some(PlaybackFrame {
            session_id: self.session.session_id()?,
            active_story: entry.story.clone(),
            owner,
            progress: self.session.progress_fractions(),
            is_paused: self.session.is_paused(),
            position_in_owner_queue: self.session.position_in_owner_queue()?,
            global_position: self.session.global_position()?,
            elapsed_ms: self.session.elapsed_ms(),
            is_liked: self.interactions.is_liked(&entry.story.key()),
        })
    }

    /// One ring per owner with stories, in catalog order.
    #[must_use]
    pub fn story_bar(&self) -> Vec<StoryBarItem> {
        self.catalog
            .owners()
            .iter()
            .filter_map(|owner| {
                let first = self.catalog.first_entry_of(&owner.id)?;
                Some(StoryBarItem {
                    owner: owner.clone(),
                    first_entry_index: first.global_index,
                    label: StoryBarItem::label_for(owner),
                    has_unviewed: self.viewed.has_unviewed(&first.owner_stories),
                })
            })
            .collect()
    }

    /// Stories viewed so far.
    #[must_use]
    pub fn viewed(&self) -> &ViewedTracker {
        &self.viewed
    }

    /// Current playback state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.session.state()
    }

    /// Flips the like on the active story. Returns the new value, or `None`
    /// while closed.
    pub fn toggle_like(&mut self) -> Option<bool> {
        let story = self.session.active_entry()?.story.key();
        let liked = self.interactions.toggle_like(story.clone());
        debug!(story = %story, liked, "story like toggled");
        Some(liked)
    }

    /// Replaces the reply draft. Ignored while closed.
    pub fn set_message_draft(&mut self, text: &str) {
        if self.session.active_entry().is_some() {
            self.interactions.set_draft(text);
        }
    }

    /// The current reply draft.
    #[must_use]
    pub fn message_draft(&self) -> &str {
        self.interactions.draft()
    }

    /// Sends the trimmed reply draft to the active story's owner and clears
    /// it. Returns the sent text; blank drafts send nothing.
    pub fn send_message(&mut self) -> Option<String> {
        let entry = self.session.active_entry()?;
        let to = entry.owner_id.clone();
        let message = self.interactions.take_draft()?;
        info!(to = %to, length = message.len(), "story reply sent");
        Some(message)
    }

    /// Closes the overlay to navigate to the active owner's profile. Returns
    /// the owner's username, or `None` while closed.
    pub fn open_owner_profile(&mut self) -> Option<String> {
        let entry = self.session.active_entry()?;
        let username = self
            .session
            .catalog()?
            .owner(&entry.owner_id)?
            .username
            .clone();
        self.close();
        Some(username)
    }

    /// Removes and returns the events produced since the last call.
    pub fn take_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn sync(&mut self) {
        for event in self.session.take_uncommitted_events() {
            self.viewed.observe(&event);
            if matches!(event.kind, PlaybackEventKind::SessionClosed(_)) {
                self.interactions.clear();
                self.router.clear();
            }
            debug!(
                event_type = event.kind.event_type(),
                sequence_number = event.metadata.sequence_number,
                "playback event recorded"
            );
            self.outbox.push(event);
        }
        if let Some(entry) = self.session.active_entry() {
            self.interactions.seed_like(&entry.story);
        }
    }
}
