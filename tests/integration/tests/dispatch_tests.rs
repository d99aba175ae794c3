//! Gateway Dispatch Tests
//!
//! Feeds newline-delimited JSON through the gateway's event source and
//! dispatcher into a starboard wired to doubles.
//!
//! Run with: cargo test -p integration-tests --test dispatch_tests

use std::sync::Arc;
use std::time::{Duration, Instant};

use integration_tests::{unique_id, GuildFixture, TestStarboard};
use star_core::StarEvent;
use star_gateway::source::pump_lines;
use tokio::sync::mpsc;

fn line(event: &StarEvent) -> String {
    serde_json::to_string(event).unwrap() + "\n"
}

#[tokio::test]
async fn test_stream_drives_starboard() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    let message = unique_id();
    let (alice, bob) = (unique_id(), unique_id());

    let mut input = line(&StarEvent::ConfigureStarboard {
        guild_id: guild.guild_id,
        channel_id: Some(guild.channel_id),
        threshold: Some(2),
    });
    input += &line(&guild.star(message, alice));
    input += "this is not json\n";
    input += &line(&StarEvent::ReactionAdded {
        guild_id: guild.guild_id,
        message_id: message,
        user_id: bob,
        emoji: "🔥".to_string(),
    });
    input += &line(&guild.star(message, bob));

    let dispatcher = Arc::new(t.dispatcher());
    let (tx, rx) = mpsc::channel(4);
    let handle = Arc::clone(&dispatcher).start(rx);

    let forwarded = pump_lines(input.as_bytes(), tx).await.unwrap();
    handle.await.unwrap();

    assert_eq!(forwarded, 4);
    assert_eq!(dispatcher.processed(), 4);
    assert_eq!(t.count(guild.guild_id, message).await, 2);
    assert_eq!(t.poster.post_count(), 1);
}

#[tokio::test]
async fn test_events_for_unconfigured_guild_are_dropped() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    let message = unique_id();
    let dispatcher = t.dispatcher();

    dispatcher.dispatch(guild.star(message, unique_id())).await.unwrap();
    dispatcher
        .dispatch(StarEvent::MessageDeleted {
            guild_id: guild.guild_id,
            message_id: message,
        })
        .await
        .unwrap();

    assert_eq!(t.store.message_count(guild.guild_id), 0);
    assert!(t.manager.is_empty());
}

#[tokio::test]
async fn test_store_fault_does_not_stop_the_loop() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(5)).await.unwrap();
    let message = unique_id();
    let dispatcher = t.dispatcher();

    t.store.fail_all(true);
    dispatcher.handle_event(guild.star(message, unique_id())).await;
    t.store.fail_all(false);
    dispatcher.handle_event(guild.star(message, unique_id())).await;

    assert_eq!(dispatcher.processed(), 2);
    assert_eq!(t.count(guild.guild_id, message).await, 1);
}

#[tokio::test]
async fn test_slow_post_does_not_hold_back_other_messages() {
    let t = TestStarboard::new();
    let (slow, quick) = (GuildFixture::unique(), GuildFixture::unique());
    t.manager.configure(slow.settings(1)).await.unwrap();
    t.manager.configure(quick.settings(5)).await.unwrap();
    t.poster.set_delay(Duration::from_millis(400));
    let (posted, counted) = (unique_id(), unique_id());

    let dispatcher = Arc::new(t.dispatcher());
    let (tx, rx) = mpsc::channel(4);
    let handle = Arc::clone(&dispatcher).start(rx);

    let started = Instant::now();
    tx.send(slow.star(posted, unique_id())).await.unwrap();
    tx.send(quick.star(counted, unique_id())).await.unwrap();

    while t.count(quick.guild_id, counted).await == 0 {
        assert!(started.elapsed() < Duration::from_millis(200), "star waited behind a slow post");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    drop(tx);
    handle.await.unwrap();
    assert_eq!(t.poster.post_count(), 1);
    assert_eq!(dispatcher.processed(), 2);
}

#[tokio::test]
async fn test_events_on_one_message_keep_their_order() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(1)).await.unwrap();
    t.poster.set_delay(Duration::from_millis(50));
    let message = unique_id();
    let user = unique_id();

    let dispatcher = Arc::new(t.dispatcher());
    let (tx, rx) = mpsc::channel(8);
    let handle = Arc::clone(&dispatcher).start(rx);

    tx.send(guild.star(message, user)).await.unwrap();
    tx.send(guild.unstar(message, user)).await.unwrap();
    tx.send(guild.star(message, user)).await.unwrap();
    drop(tx);
    handle.await.unwrap();

    assert_eq!(t.count(guild.guild_id, message).await, 1);
    assert_eq!(t.poster.post_count(), 2);
    assert_eq!(t.poster.delete_count(), 1);
}
