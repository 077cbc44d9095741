//! The playback session state machine.
//!
//! A session is `Closed` until [`PlaybackSession::open`] selects an entry from
//! a catalog. While open it is either `Playing` or `Paused`. Forward navigation
//! past the last story closes the session; backward navigation before the
//! first story does nothing. Any successful move lands in `Playing` with a
//! fresh timer.
//!
//! Every transition is recorded as a [`PlaybackEvent`]; the application layer
//! drains them after each command.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storyreel_catalog::domain::catalog::{StoryCatalog, StoryEntry};
use storyreel_catalog::domain::profile::Story;
use storyreel_core::clock::Clock;
use storyreel_core::error::DomainError;
use storyreel_core::event::EventMetadata;
use storyreel_core::scheduler::{FrameHandle, FrameScheduler};
use tracing::{debug, info};
use uuid::Uuid;

use super::events::{
    Activation, CloseReason, PlaybackEvent, PlaybackEventKind, PlaybackPaused, PlaybackResumed,
    SessionClosed, SessionOpened, StoryActivated,
};
use super::timer::{ProgressTimer, TimerTick};

/// Observable state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// No overlay shown.
    Closed,
    /// The active story's timer is running.
    Playing,
    /// The active story's timer is frozen.
    Paused,
}

/// Per-opening state. Built fresh by every `open` and dropped on close.
#[derive(Debug)]
struct ActivePlayback {
    catalog: StoryCatalog,
    entry: StoryEntry,
    owner_queue: Arc<[Story]>,
    position_in_owner_queue: usize,
    global_position: usize,
    paused: bool,
    duration_ms: u64,
}

/// The playback state machine for the story overlay.
pub struct PlaybackSession {
    clock: Arc<dyn Clock>,
    scheduler: Box<dyn FrameScheduler>,
    timer: ProgressTimer,
    active: Option<ActivePlayback>,
    session_id: Uuid,
    last_sequence: i64,
    uncommitted_events: Vec<PlaybackEvent>,
}

impl fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("session_id", &self.session_id)
            .field("timer", &self.timer)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl PlaybackSession {
    /// Creates a closed session.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            clock,
            scheduler,
            timer: ProgressTimer::new(),
            active: None,
            session_id: Uuid::nil(),
            last_sequence: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Opens the overlay on the entry at `global_index` of `catalog`.
    ///
    /// `catalog` is the set of stories reachable by navigation for this
    /// opening. A running session is closed first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EntryNotFound` if `global_index` is outside the
    /// catalog, or `DomainError::StoryNotInOwnerQueue` if the entry's story is
    /// missing from its owner's story list. A running session is left as it
    /// was.
    pub fn open(
        &mut self,
        catalog: StoryCatalog,
        global_index: usize,
        duration_ms: u64,
    ) -> Result<(), DomainError> {
        let entry = catalog
            .get(global_index)
            .cloned()
            .ok_or(DomainError::EntryNotFound(global_index))?;
        let position = entry
            .position_in_owner_queue()
            .ok_or_else(|| DomainError::StoryNotInOwnerQueue {
                owner_id: entry.owner_id.clone(),
                story_id: entry.story.id.clone(),
            })?;

        self.close_with(CloseReason::Superseded);

        self.session_id = Uuid::new_v4();
        self.last_sequence = 0;
        let story = entry.story.key();
        let catalog_len = catalog.len();
        self.active = Some(ActivePlayback {
            catalog,
            owner_queue: Arc::clone(&entry.owner_stories),
            entry,
            position_in_owner_queue: position,
            global_position: global_index,
            paused: false,
            duration_ms,
        });
        self.timer
            .start(duration_ms, self.clock.now(), self.scheduler.as_mut());

        info!(session_id = %self.session_id, story = %story, duration_ms, "story session opened");
        self.record(PlaybackEventKind::SessionOpened(SessionOpened {
            story: story.clone(),
            global_index,
            catalog_len,
            duration_ms,
        }));
        self.record(PlaybackEventKind::StoryActivated(StoryActivated {
            story,
            global_index,
            position_in_owner_queue: position,
            activation: Activation::Opened,
        }));
        Ok(())
    }

    /// Freezes progress. No-op unless playing.
    pub fn pause(&mut self) {
        let now = self.clock.now();
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.paused || !self.timer.pause(now, self.scheduler.as_mut()) {
            return;
        }
        active.paused = true;
        let story = active.entry.story.key();
        let elapsed_ms = self.timer.elapsed_ms(now);
        debug!(story = %story, elapsed_ms, "playback paused");
        self.record(PlaybackEventKind::PlaybackPaused(PlaybackPaused {
            story,
            elapsed_ms,
        }));
    }

    /// Continues from the frozen progress. No-op unless paused.
    pub fn resume(&mut self) {
        let now = self.clock.now();
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if !active.paused || !self.timer.resume(now, self.scheduler.as_mut()) {
            return;
        }
        active.paused = false;
        let story = active.entry.story.key();
        let elapsed_ms = self.timer.elapsed_ms(now);
        debug!(story = %story, elapsed_ms, "playback resumed");
        self.record(PlaybackEventKind::PlaybackResumed(PlaybackResumed {
            story,
            elapsed_ms,
        }));
    }

    /// Advances forward: next story of the owner, else the next owner's first
    /// story, else closes. No-op while closed.
    pub fn next(&mut self) {
        self.advance_forward();
    }

    /// Retreats backward: previous story of the owner, else the previous
    /// owner's last story, else stays put. No-op while closed.
    pub fn prev(&mut self) {
        self.retreat_backward();
    }

    /// Closes the overlay, revoking the timer. No-op while closed.
    pub fn close(&mut self) {
        self.close_with(CloseReason::Requested);
    }

    /// Delivers a display frame to the timer and advances on completion.
    ///
    /// Frames that do not carry the timer's live registration are ignored and
    /// return `None`, so a completion is acted on at most once.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Option<TimerTick> {
        self.active.as_ref()?;
        let tick = self
            .timer
            .on_frame(handle, self.clock.now(), self.scheduler.as_mut())?;
        if tick == TimerTick::Completed {
            self.advance_forward();
        }
        Some(tick)
    }

    fn advance_forward(&mut self) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        let next_global = active.global_position + 1;
        if active.position_in_owner_queue + 1 < active.owner_queue.len() {
            let position = active.position_in_owner_queue + 1;
            let owner_queue = Arc::clone(&active.owner_queue);
            self.activate(owner_queue, position, next_global, Activation::Advanced);
        } else if let Some(next_owner_first) = active.catalog.get(next_global) {
            let owner_queue = Arc::clone(&next_owner_first.owner_stories);
            self.activate(owner_queue, 0, next_global, Activation::Advanced);
        } else {
            self.close_with(CloseReason::Exhausted);
        }
    }

    fn retreat_backward(&mut self) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        if active.position_in_owner_queue > 0 {
            let position = active.position_in_owner_queue - 1;
            let owner_queue = Arc::clone(&active.owner_queue);
            let global = active.global_position - 1;
            self.activate(owner_queue, position, global, Activation::Retreated);
        } else if active.global_position > 0 {
            let global = active.global_position - 1;
            let Some(prev_owner_last) = active.catalog.get(global) else {
                return;
            };
            let owner_queue = Arc::clone(&prev_owner_last.owner_stories);
            let position = owner_queue.len() - 1;
            self.activate(owner_queue, position, global, Activation::Retreated);
        }
    }

    /// Makes `owner_queue[position]` (catalog index `global`) the active story,
    /// unpaused, with a fresh timer.
    fn activate(
        &mut self,
        owner_queue: Arc<[Story]>,
        position: usize,
        global: usize,
        activation: Activation,
    ) {
        let now = self.clock.now();
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(entry) = active.catalog.get(global).cloned() else {
            self.close_with(CloseReason::Exhausted);
            return;
        };
        debug_assert_eq!(owner_queue[position].id, entry.story.id);

        active.entry = entry;
        active.owner_queue = owner_queue;
        active.position_in_owner_queue = position;
        active.global_position = global;
        active.paused = false;
        let duration_ms = active.duration_ms;
        let story = active.entry.story.key();
        self.timer.start(duration_ms, now, self.scheduler.as_mut());

        debug!(story = %story, global, position, ?activation, "story activated");
        self.record(PlaybackEventKind::StoryActivated(StoryActivated {
            story,
            global_index: global,
            position_in_owner_queue: position,
            activation,
        }));
    }

    fn close_with(&mut self, reason: CloseReason) {
        let Some(active) = self.active.take() else {
            return;
        };
        self.timer.reset(self.scheduler.as_mut());
        info!(session_id = %self.session_id, ?reason, "story session closed");
        self.record(PlaybackEventKind::SessionClosed(SessionClosed {
            last_story: active.entry.story.key(),
            reason,
        }));
    }

    fn record(&mut self, kind: PlaybackEventKind) {
        // TODO: event_id uses Uuid::new_v4() which makes event streams differ
        // between otherwise identical test runs; inject an id generator.
        self.last_sequence += 1;
        let event = PlaybackEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                session_id: self.session_id,
                sequence_number: self.last_sequence,
                occurred_at: self.clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        match &self.active {
            None => PlaybackState::Closed,
            Some(active) if active.paused => PlaybackState::Paused,
            Some(_) => PlaybackState::Playing,
        }
    }

    /// Identifier of the current (or most recent) opening.
    #[must_use]
    pub fn session_id(&self) -> Option<Uuid> {
        self.active.as_ref().map(|_| self.session_id)
    }

    /// The active entry, `None` iff closed.
    #[must_use]
    pub fn active_entry(&self) -> Option<&StoryEntry> {
        self.active.as_ref().map(|active| &active.entry)
    }

    /// The stories reachable in the current opening.
    #[must_use]
    pub fn catalog(&self) -> Option<&StoryCatalog> {
        self.active.as_ref().map(|active| &active.catalog)
    }

    /// The current owner's full story list.
    #[must_use]
    pub fn owner_queue(&self) -> Option<&[Story]> {
        self.active.as_ref().map(|active| &*active.owner_queue)
    }

    /// Index of the active story within the owner queue.
    #[must_use]
    pub fn position_in_owner_queue(&self) -> Option<usize> {
        self.active
            .as_ref()
            .map(|active| active.position_in_owner_queue)
    }

    /// Index of the active story within the catalog.
    #[must_use]
    pub fn global_position(&self) -> Option<usize> {
        self.active.as_ref().map(|active| active.global_position)
    }

    /// Whether progress is frozen.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state() == PlaybackState::Paused
    }

    /// Per-story duration for the current opening.
    #[must_use]
    pub fn duration_ms(&self) -> Option<u64> {
        self.active.as_ref().map(|active| active.duration_ms)
    }

    /// Progress of the active story; zero while closed.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        if self.active.is_none() {
            return 0;
        }
        self.timer.elapsed_ms(self.clock.now())
    }

    /// One fraction per story in the owner queue: 1.0 for passed stories,
    /// partial for the active one and 0.0 for the rest. Empty while closed.
    #[must_use]
    pub fn progress_fractions(&self) -> Vec<f64> {
        let Some(active) = self.active.as_ref() else {
            return Vec::new();
        };
        let current = self.timer.fraction(self.clock.now());
        (0..active.owner_queue.len())
            .map(|index| match index.cmp(&active.position_in_owner_queue) {
                std::cmp::Ordering::Less => 1.0,
                std::cmp::Ordering::Equal => current,
                std::cmp::Ordering::Greater => 0.0,
            })
            .collect()
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[PlaybackEvent] {
        &self.uncommitted_events
    }

    /// Removes and returns the events recorded since the last drain.
    pub fn take_uncommitted_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.timer.reset(self.scheduler.as_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyreel_catalog::domain::profile::decode_profiles;
    use storyreel_core::ids::StoryId;
    use storyreel_test_support::{ManualClock, RecordingScheduler, profile_document};

    struct Harness {
        clock: ManualClock,
        scheduler: RecordingScheduler,
        session: PlaybackSession,
        catalog: StoryCatalog,
    }

    impl Harness {
        fn new(owners: &[(&str, &[&str])]) -> Self {
            let clock = ManualClock::default();
            let scheduler = RecordingScheduler::new();
            let session = PlaybackSession::new(Arc::new(clock.clone()), Box::new(scheduler.clone()));
            let catalog = StoryCatalog::build(&decode_profiles(&profile_document(owners)));
            Self {
                clock,
                scheduler,
                session,
                catalog,
            }
        }

        fn open(&mut self, global_index: usize) {
            self.session
                .open(self.catalog.clone(), global_index, 5_000)
                .unwrap();
        }

        fn position(&self) -> (String, usize, usize) {
            let entry = self.session.active_entry().unwrap();
            (
                entry.owner_id.to_string(),
                self.session.position_in_owner_queue().unwrap(),
                self.session.global_position().unwrap(),
            )
        }

        fn active_story_id(&self) -> StoryId {
            self.session.active_entry().unwrap().story.id.clone()
        }

        fn deliver_frames(&mut self) -> Vec<TimerTick> {
            self.scheduler
                .take_pending()
                .into_iter()
                .filter_map(|handle| self.session.on_frame(handle))
                .collect()
        }
    }

    fn event_types(session: &PlaybackSession) -> Vec<&'static str> {
        session
            .uncommitted_events()
            .iter()
            .map(|event| event.kind.event_type())
            .collect()
    }

    #[test]
    fn test_new_session_is_closed() {
        let harness = Harness::new(&[("a", &["1"])]);

        assert_eq!(harness.session.state(), PlaybackState::Closed);
        assert!(harness.session.active_entry().is_none());
        assert_eq!(harness.session.elapsed_ms(), 0);
        assert!(harness.session.progress_fractions().is_empty());
    }

    #[test]
    fn test_open_starts_playing_at_selected_entry() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1", "2"]), ("b", &["1", "2", "3"])]);

        // Act
        harness.open(3);

        // Assert
        assert_eq!(harness.session.state(), PlaybackState::Playing);
        assert_eq!(harness.session.elapsed_ms(), 0);
        assert_eq!(harness.position(), ("b".to_owned(), 1, 3));
        assert_eq!(harness.session.owner_queue().unwrap().len(), 3);
        assert_eq!(harness.active_story_id(), StoryId::new("2"));
        assert_eq!(harness.scheduler.pending().len(), 1);
        assert_eq!(
            event_types(&harness.session),
            vec!["playback.session_opened", "playback.story_activated"]
        );
    }

    #[test]
    fn test_open_rejects_index_outside_catalog() {
        let mut harness = Harness::new(&[("a", &["1"])]);

        let result = harness.session.open(harness.catalog.clone(), 5, 5_000);

        match result {
            Err(DomainError::EntryNotFound(index)) => assert_eq!(index, 5),
            other => panic!("expected EntryNotFound, got {other:?}"),
        }
        assert_eq!(harness.session.state(), PlaybackState::Closed);
    }

    #[test]
    fn test_next_walks_two_owners_then_closes() {
        // Arrange
        let mut harness = Harness::new(&[("o1", &["s1", "s2"]), ("o2", &["s1", "s2"])]);
        harness.open(0);

        // Act / Assert
        assert_eq!(harness.position(), ("o1".to_owned(), 0, 0));
        harness.session.next();
        assert_eq!(harness.position(), ("o1".to_owned(), 1, 1));
        harness.session.next();
        assert_eq!(harness.position(), ("o2".to_owned(), 0, 2));
        harness.session.next();
        assert_eq!(harness.position(), ("o2".to_owned(), 1, 3));
        harness.session.next();
        assert_eq!(harness.session.state(), PlaybackState::Closed);
        assert!(harness.scheduler.pending().is_empty());
    }

    #[test]
    fn test_scenario_single_story_owner_then_two_story_owner() {
        // Arrange
        let mut harness = Harness::new(&[("A", &["a1"]), ("B", &["b1", "b2"])]);

        // Act / Assert
        harness.open(0);
        assert_eq!(harness.position(), ("A".to_owned(), 0, 0));
        harness.session.next();
        assert_eq!(harness.position(), ("B".to_owned(), 0, 1));
        assert_eq!(harness.session.owner_queue().unwrap().len(), 2);
        harness.session.next();
        assert_eq!(harness.position(), ("B".to_owned(), 1, 2));
        harness.session.next();
        assert_eq!(harness.session.state(), PlaybackState::Closed);

        match &harness.session.uncommitted_events().last().unwrap().kind {
            PlaybackEventKind::SessionClosed(payload) => {
                assert_eq!(payload.reason, CloseReason::Exhausted);
                assert_eq!(payload.last_story.story_id, StoryId::new("b2"));
            }
            other => panic!("expected SessionClosed, got {other:?}"),
        }
    }

    #[test]
    fn test_prev_on_first_story_is_a_noop() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1", "2"])]);
        harness.open(0);
        harness.clock.advance_ms(1_000);
        let events_before = harness.session.uncommitted_events().len();

        // Act
        harness.session.prev();

        // Assert
        assert_eq!(harness.session.state(), PlaybackState::Playing);
        assert_eq!(harness.position(), ("a".to_owned(), 0, 0));
        assert_eq!(harness.session.elapsed_ms(), 1_000);
        assert_eq!(harness.session.uncommitted_events().len(), events_before);
    }

    #[test]
    fn test_prev_within_owner_moves_to_previous_story() {
        let mut harness = Harness::new(&[("a", &["1"]), ("b", &["1", "2"])]);
        harness.open(2);

        harness.session.prev();

        assert_eq!(harness.position(), ("b".to_owned(), 0, 1));
        assert_eq!(harness.session.owner_queue().unwrap().len(), 2);
    }

    #[test]
    fn test_prev_across_owner_boundary_lands_on_last_story() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1", "2", "3"]), ("b", &["1"])]);
        harness.open(3);

        // Act
        harness.session.prev();

        // Assert
        assert_eq!(harness.position(), ("a".to_owned(), 2, 2));
        assert_eq!(harness.active_story_id(), StoryId::new("3"));
        assert_eq!(harness.session.owner_queue().unwrap().len(), 3);
    }

    #[test]
    fn test_pause_then_resume_preserves_elapsed() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1"])]);
        harness.open(0);
        harness.clock.advance_ms(1_700);

        // Act
        harness.session.pause();
        let at_pause = harness.session.elapsed_ms();
        harness.clock.advance_ms(60_000);
        harness.session.resume();

        // Assert
        assert_eq!(at_pause, 1_700);
        assert_eq!(harness.session.state(), PlaybackState::Playing);
        assert_eq!(harness.session.elapsed_ms(), 1_700);
    }

    #[test]
    fn test_paused_session_ignores_time() {
        let mut harness = Harness::new(&[("a", &["1"])]);
        harness.open(0);
        harness.session.pause();

        harness.clock.advance_ms(20_000);

        assert_eq!(harness.session.state(), PlaybackState::Paused);
        assert!(harness.deliver_frames().is_empty());
        assert_eq!(harness.session.elapsed_ms(), 0);
    }

    #[test]
    fn test_next_from_paused_lands_playing_with_fresh_timer() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1", "2"])]);
        harness.open(0);
        harness.clock.advance_ms(2_000);
        harness.session.pause();

        // Act
        harness.session.next();

        // Assert
        assert_eq!(harness.session.state(), PlaybackState::Playing);
        assert_eq!(harness.session.elapsed_ms(), 0);
        assert_eq!(harness.scheduler.pending().len(), 1);
    }

    #[test]
    fn test_timer_completion_advances_exactly_once() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1", "2", "3"])]);
        harness.open(0);
        let first_registration = harness.scheduler.pending()[0];

        // Act
        harness.clock.advance_ms(5_000);
        let ticks = harness.deliver_frames();
        let replayed = harness.session.on_frame(first_registration);
        let replayed_again = harness.session.on_frame(first_registration);

        // Assert
        assert_eq!(ticks, vec![TimerTick::Completed]);
        assert_eq!(replayed, None);
        assert_eq!(replayed_again, None);
        assert_eq!(harness.position(), ("a".to_owned(), 1, 1));
    }

    #[test]
    fn test_frames_drive_progress_until_completion() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1", "2"])]);
        harness.open(0);

        // Act
        harness.clock.advance_ms(2_500);
        let halfway = harness.deliver_frames();
        let fractions = harness.session.progress_fractions();

        // Assert
        assert_eq!(halfway, vec![TimerTick::Progress(0.5)]);
        assert_eq!(fractions, vec![0.5, 0.0]);
    }

    #[test]
    fn test_progress_fractions_mark_passed_stories_full() {
        let mut harness = Harness::new(&[("a", &["1", "2", "3"])]);
        harness.open(1);

        harness.clock.advance_ms(1_000);

        assert_eq!(harness.session.progress_fractions(), vec![1.0, 0.2, 0.0]);
    }

    #[test]
    fn test_completion_on_last_story_closes() {
        let mut harness = Harness::new(&[("a", &["1"])]);
        harness.open(0);

        harness.clock.advance_ms(6_000);
        let ticks = harness.deliver_frames();

        assert_eq!(ticks, vec![TimerTick::Completed]);
        assert_eq!(harness.session.state(), PlaybackState::Closed);
        assert!(harness.scheduler.pending().is_empty());
    }

    #[test]
    fn test_user_next_revokes_pending_completion() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1", "2", "3"])]);
        harness.open(0);
        let stale = harness.scheduler.pending()[0];
        harness.clock.advance_ms(5_000);

        // Act
        harness.session.next();
        let stale_tick = harness.session.on_frame(stale);

        // Assert
        assert_eq!(stale_tick, None);
        assert_eq!(harness.position(), ("a".to_owned(), 1, 1));
        assert!(harness.scheduler.cancelled().contains(&stale));
    }

    #[test]
    fn test_next_across_owners_from_paused_lands_playing() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1"]), ("b", &["1", "2"])]);
        harness.open(0);
        harness.clock.advance_ms(1_000);
        harness.session.pause();

        // Act
        harness.session.next();

        // Assert
        assert_eq!(harness.position(), ("b".to_owned(), 0, 1));
        assert_eq!(harness.session.state(), PlaybackState::Playing);
        assert_eq!(harness.session.elapsed_ms(), 0);
        assert_eq!(harness.scheduler.pending().len(), 1);
    }

    #[test]
    fn test_prev_across_owners_from_paused_lands_playing() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1", "2"]), ("b", &["1"])]);
        harness.open(2);
        harness.clock.advance_ms(3_000);
        harness.session.pause();

        // Act
        harness.session.prev();

        // Assert
        assert_eq!(harness.position(), ("a".to_owned(), 1, 1));
        assert_eq!(harness.session.state(), PlaybackState::Playing);
        assert_eq!(harness.session.elapsed_ms(), 0);
        assert_eq!(harness.scheduler.pending().len(), 1);
    }

    #[test]
    fn test_prev_on_first_story_while_paused_stays_paused() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1", "2"])]);
        harness.open(0);
        harness.clock.advance_ms(700);
        harness.session.pause();
        let events_before = harness.session.uncommitted_events().len();

        // Act
        harness.session.prev();
        harness.clock.advance_ms(5_000);

        // Assert
        assert_eq!(harness.position(), ("a".to_owned(), 0, 0));
        assert_eq!(harness.session.state(), PlaybackState::Paused);
        assert_eq!(harness.session.elapsed_ms(), 700);
        assert!(harness.scheduler.pending().is_empty());
        assert_eq!(harness.session.uncommitted_events().len(), events_before);
    }

    #[test]
    fn test_repeated_story_ids_still_close_at_catalog_end() {
        // Arrange
        let mut single = Harness::new(&[("a", &["x", "x"])]);
        let mut followed = Harness::new(&[("a", &["x", "x"]), ("b", &["y"])]);

        // Act
        single.open(0);
        single.session.next();
        followed.open(0);
        followed.session.next();
        let after_boundary = followed.position();
        followed.clock.advance_ms(6_000);
        let ticks = followed.deliver_frames();

        // Assert
        assert_eq!(single.catalog.len(), 1);
        assert_eq!(single.session.state(), PlaybackState::Closed);
        assert_eq!(after_boundary, ("b".to_owned(), 0, 1));
        assert_eq!(ticks, vec![TimerTick::Completed]);
        assert_eq!(followed.session.state(), PlaybackState::Closed);
        assert!(followed.scheduler.pending().is_empty());
    }

    #[test]
    fn test_commands_while_closed_are_noops() {
        let mut harness = Harness::new(&[("a", &["1"])]);

        harness.session.pause();
        harness.session.resume();
        harness.session.next();
        harness.session.prev();
        harness.session.close();

        assert_eq!(harness.session.state(), PlaybackState::Closed);
        assert!(harness.session.uncommitted_events().is_empty());
        assert!(harness.scheduler.requested().is_empty());
    }

    #[test]
    fn test_close_revokes_timer_and_clears_state() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1", "2"])]);
        harness.open(0);
        let registration = harness.scheduler.pending()[0];

        // Act
        harness.session.close();

        // Assert
        assert_eq!(harness.session.state(), PlaybackState::Closed);
        assert!(harness.session.owner_queue().is_none());
        assert!(harness.session.session_id().is_none());
        assert!(harness.scheduler.pending().is_empty());
        assert_eq!(harness.session.on_frame(registration), None);
    }

    #[test]
    fn test_reopen_supersedes_running_session() {
        // Arrange
        let mut harness = Harness::new(&[("a", &["1"]), ("b", &["1"])]);
        harness.open(0);
        let first_session = harness.session.session_id().unwrap();
        harness.session.take_uncommitted_events();

        // Act
        harness.open(1);

        // Assert
        assert_ne!(harness.session.session_id().unwrap(), first_session);
        assert_eq!(harness.scheduler.pending().len(), 1);
        assert_eq!(
            event_types(&harness.session),
            vec![
                "playback.session_closed",
                "playback.session_opened",
                "playback.story_activated"
            ]
        );
    }

    #[test]
    fn test_event_sequence_numbers_restart_per_session() {
        let mut harness = Harness::new(&[("a", &["1", "2"])]);
        harness.open(0);
        harness.session.next();

        let sequence: Vec<i64> = harness
            .session
            .uncommitted_events()
            .iter()
            .map(|event| event.metadata.sequence_number)
            .collect();

        assert_eq!(sequence, vec![1, 2, 3]);
    }

    #[test]
    fn test_drop_revokes_pending_frame() {
        let mut harness = Harness::new(&[("a", &["1"])]);
        harness.open(0);
        let scheduler = harness.scheduler.clone();

        drop(harness);

        assert!(scheduler.pending().is_empty());
    }
}
