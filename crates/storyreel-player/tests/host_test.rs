//! Integration tests for the terminal frame loop.

mod common;

use std::time::Duration;

use storyreel_playback::domain::commands::EntryPoint;
use storyreel_playback::domain::events::CloseReason;
use storyreel_playback::domain::session::PlaybackState;
use storyreel_player::host;
use tokio::io::BufReader;

const TICK: Duration = Duration::from_millis(1);

#[tokio::test]
async fn test_next_past_the_last_story_ends_the_run() {
    // Arrange
    let (mut player, frames, _clock) = common::build_player(&[("1", &["a"]), ("2", &["a"])]);
    player.open(EntryPoint::FeedBar { global_index: 0 }).unwrap();

    // Act
    let summary = host::run(&mut player, &frames, TICK, &b"next\nnext\n"[..])
        .await
        .unwrap();

    // Assert
    assert_eq!(summary.stories_shown, 2);
    assert_eq!(summary.close_reason, Some(CloseReason::Exhausted));
    assert_eq!(player.state(), PlaybackState::Closed);
    assert_eq!(player.viewed().len(), 2);
}

#[tokio::test]
async fn test_end_of_input_closes_the_session() {
    let (mut player, frames, _clock) = common::build_player(&[("1", &["a", "b"])]);
    player.open(EntryPoint::FeedBar { global_index: 0 }).unwrap();

    let summary = host::run(&mut player, &frames, TICK, &b""[..]).await.unwrap();

    assert_eq!(summary.stories_shown, 1);
    assert_eq!(summary.close_reason, Some(CloseReason::Requested));
    assert_eq!(frames.pending_len(), 0);
}

#[tokio::test]
async fn test_escape_closes_and_ignores_later_lines() {
    let (mut player, frames, _clock) = common::build_player(&[("1", &["a", "b"])]);
    player.open(EntryPoint::FeedBar { global_index: 0 }).unwrap();

    let summary = host::run(&mut player, &frames, TICK, &b"q\nnext\nnext\n"[..])
        .await
        .unwrap();

    assert_eq!(summary.stories_shown, 1);
    assert_eq!(summary.close_reason, Some(CloseReason::Requested));
}

#[tokio::test]
async fn test_hold_release_and_chatter_keep_the_story() {
    // Arrange
    let (mut player, frames, _clock) = common::build_player(&[("1", &["a", "b"])]);
    player.open(EntryPoint::FeedBar { global_index: 0 }).unwrap();

    // Act
    let summary = host::run(
        &mut player,
        &frames,
        TICK,
        &b"hold\nrelease\nlike\nsend hello\nwhat\nprev\nprofile\n"[..],
    )
    .await
    .unwrap();

    // Assert
    assert_eq!(summary.stories_shown, 1);
    assert_eq!(summary.close_reason, Some(CloseReason::Requested));
    assert_eq!(player.message_draft(), "");
}

#[tokio::test]
async fn test_closed_player_returns_immediately() {
    let (mut player, frames, _clock) = common::build_player(&[("1", &["a"])]);

    let summary = host::run(&mut player, &frames, TICK, &b"next\n"[..])
        .await
        .unwrap();

    assert_eq!(summary, host::RunSummary::default());
}

#[tokio::test]
async fn test_timer_completion_plays_through_without_input() {
    // Arrange
    let (mut player, frames, clock) = common::build_player(&[("1", &["a"]), ("2", &["a"])]);
    player.open(EntryPoint::FeedBar { global_index: 0 }).unwrap();
    let (_keep_open, input) = tokio::io::duplex(64);
    let advance_clock = async {
        loop {
            tokio::time::sleep(Duration::from_millis(2)).await;
            clock.advance_ms(10_000);
        }
    };

    // Act
    let summary = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::select! {
            summary = host::run(&mut player, &frames, TICK, BufReader::new(input)) => summary,
            _ = advance_clock => unreachable!("the clock advances forever"),
        }
    })
    .await
    .expect("playback should close on its own")
    .unwrap();

    // Assert
    assert_eq!(summary.stories_shown, 2);
    assert_eq!(summary.close_reason, Some(CloseReason::Exhausted));
    assert_eq!(player.state(), PlaybackState::Closed);
    assert_eq!(frames.pending_len(), 0);
}

#[tokio::test]
async fn test_run_summary_records_every_event_with_metadata() {
    // Arrange
    let (mut player, frames, _clock) = common::build_player(&[("1", &["a", "b"])]);
    player.open(EntryPoint::FeedBar { global_index: 0 }).unwrap();

    // Act
    let summary = host::run(&mut player, &frames, TICK, &b"next\nq\n"[..])
        .await
        .unwrap();

    // Assert
    let types: Vec<&str> = summary
        .events
        .iter()
        .map(|record| record["event_type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        vec![
            "playback.session_opened",
            "playback.story_activated",
            "playback.story_activated",
            "playback.session_closed",
        ]
    );
    let sequence: Vec<i64> = summary
        .events
        .iter()
        .map(|record| record["sequence_number"].as_i64().unwrap())
        .collect();
    assert_eq!(sequence, vec![1, 2, 3, 4]);
    assert_eq!(summary.events[0]["payload"]["SessionOpened"]["catalog_len"], 2);
    assert_eq!(
        summary.events[2]["payload"]["StoryActivated"]["story"]["story_id"],
        "b"
    );
    assert_eq!(
        summary.events[3]["payload"]["SessionClosed"]["reason"],
        "requested"
    );
    assert_eq!(summary.events[0]["session_id"], summary.events[3]["session_id"]);
}
