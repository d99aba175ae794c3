//! Starboard Integration Tests
//!
//! End-to-end behaviour of the starboard manager against collaborator
//! doubles. No external services needed.
//!
//! Run with: cargo test -p integration-tests --test starboard_tests

use std::sync::Arc;
use std::time::Duration;

use integration_tests::{unique_id, users, FlakyStore, GuildFixture, TestStarboard};
use star_core::{ReactionStore, StarTier};
use star_service::{EntryState, ServiceError};

// ============================================================================
// Idempotence
// ============================================================================

#[tokio::test]
async fn test_duplicate_star_counts_once() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(3)).await.unwrap();
    let message = unique_id();
    let user = unique_id();

    t.manager.on_reaction_added(guild.guild_id, message, user).await.unwrap();
    t.manager.on_reaction_added(guild.guild_id, message, user).await.unwrap();

    assert_eq!(t.count(guild.guild_id, message).await, 1);
    let board = t.manager.board(guild.guild_id).unwrap();
    assert_eq!(board.star_count(message).await.unwrap(), 1);
    assert_eq!(t.renderer.render_count(), 0);
}

// ============================================================================
// Lifecycle (threshold 3)
// ============================================================================

#[tokio::test]
async fn test_threshold_three_lifecycle() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(3)).await.unwrap();
    let board = t.manager.board(guild.guild_id).unwrap();
    let message = unique_id();
    let [a, b, c] = [unique_id(), unique_id(), unique_id()];

    board.on_reaction_added(message, a).await.unwrap();
    assert_eq!(board.star_count(message).await.unwrap(), 1);
    assert_eq!(board.lookup(message).unwrap().entry_state().await, EntryState::NoEntry);

    board.on_reaction_added(message, b).await.unwrap();
    assert_eq!(board.star_count(message).await.unwrap(), 2);
    assert_eq!(board.lookup(message).unwrap().entry_state().await, EntryState::NoEntry);

    board.on_reaction_added(message, c).await.unwrap();
    assert_eq!(board.star_count(message).await.unwrap(), 3);
    let EntryState::EntryExists(entry_id) = board.lookup(message).unwrap().entry_state().await else {
        panic!("entry should exist at threshold");
    };
    assert_eq!(t.poster.posted_ids(), vec![entry_id]);
    assert_eq!(t.poster.posted_channels(), vec![guild.channel_id]);

    board.on_reaction_removed(message, a).await.unwrap();
    assert_eq!(board.star_count(message).await.unwrap(), 2);
    assert_eq!(t.poster.edit_count(), 1);
    assert!(t.poster.latest_content().unwrap().contains("**2**"));

    board.on_reaction_removed(message, b).await.unwrap();
    assert_eq!(board.star_count(message).await.unwrap(), 1);
    assert_eq!(t.poster.edit_count(), 2);

    board.on_reaction_removed(message, c).await.unwrap();
    assert_eq!(board.star_count(message).await.unwrap(), 0);
    assert!(board.lookup(message).is_none());
    assert_eq!(t.poster.deleted_ids(), vec![entry_id]);
    assert_eq!(t.store.message_count(guild.guild_id), 0);
}

// ============================================================================
// Zero-count cleanup
// ============================================================================

#[tokio::test]
async fn test_zero_count_clears_every_reactor() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(10)).await.unwrap();
    let board = t.manager.board(guild.guild_id).unwrap();
    let message = unique_id();
    let reactors = users(3);

    for user in &reactors {
        board.on_reaction_added(message, *user).await.unwrap();
    }
    for user in &reactors {
        board.on_reaction_removed(message, *user).await.unwrap();
    }

    assert_eq!(board.tracked(), 0);
    for user in reactors {
        assert!(!board.is_starring(message, user).await.unwrap());
    }
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_stars_create_one_entry() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(2)).await.unwrap();
    t.poster.set_delay(Duration::from_millis(20));
    let message = unique_id();

    let handles: Vec<_> = users(2)
        .into_iter()
        .map(|user| {
            let manager = Arc::clone(&t.manager);
            tokio::spawn(async move { manager.on_reaction_added(guild.guild_id, message, user).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let board = t.manager.board(guild.guild_id).unwrap();
    assert_eq!(board.tracked(), 1);
    assert_eq!(t.poster.post_count(), 1);
    assert_eq!(board.star_count(message).await.unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_stars_are_all_counted() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(3)).await.unwrap();
    t.poster.set_delay(Duration::from_millis(5));
    let message = unique_id();

    let tasks = users(32).into_iter().map(|user| {
        let manager = Arc::clone(&t.manager);
        tokio::spawn(async move { manager.on_reaction_added(guild.guild_id, message, user).await })
    });
    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }

    assert_eq!(t.count(guild.guild_id, message).await, 32);
    assert_eq!(t.poster.post_count(), 1);
    assert!(t.poster.latest_content().unwrap().contains("**32**"));
}

// ============================================================================
// Re-add after full removal
// ============================================================================

#[tokio::test]
async fn test_readd_after_full_removal_starts_fresh() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(1)).await.unwrap();
    let board = t.manager.board(guild.guild_id).unwrap();
    let message = unique_id();
    let user = unique_id();

    board.on_reaction_added(message, user).await.unwrap();
    let first_entry = t.poster.posted_ids()[0];
    board.on_reaction_removed(message, user).await.unwrap();
    board.on_reaction_added(message, user).await.unwrap();

    assert_eq!(board.star_count(message).await.unwrap(), 1);
    assert_eq!(t.poster.post_count(), 2);
    let EntryState::EntryExists(second_entry) = board.lookup(message).unwrap().entry_state().await else {
        panic!("fresh entry expected");
    };
    assert_ne!(first_entry, second_entry);
    assert_eq!(t.poster.deleted_ids(), vec![first_entry]);
    assert_eq!(
        t.store.get_entry(guild.guild_id, message).await.unwrap(),
        Some(second_entry)
    );
}

// ============================================================================
// Capability skip and retry
// ============================================================================

#[tokio::test]
async fn test_capability_skip_then_retry_on_add() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(2)).await.unwrap();
    let board = t.manager.board(guild.guild_id).unwrap();
    let message = unique_id();

    t.capability.set_can_post(false);
    for user in users(2) {
        board.on_reaction_added(message, user).await.unwrap();
    }
    assert_eq!(board.star_count(message).await.unwrap(), 2);
    assert_eq!(board.lookup(message).unwrap().entry_state().await, EntryState::NoEntry);
    assert_eq!(t.poster.post_count(), 0);

    t.capability.set_can_post(true);
    board.on_reaction_added(message, unique_id()).await.unwrap();
    assert_eq!(t.poster.post_count(), 1);
}

#[tokio::test]
async fn test_capability_skip_then_retry_on_remove() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(2)).await.unwrap();
    let board = t.manager.board(guild.guild_id).unwrap();
    let message = unique_id();
    let reactors = users(3);

    t.capability.set_can_embed(false);
    for user in &reactors {
        board.on_reaction_added(message, *user).await.unwrap();
    }
    assert_eq!(t.poster.post_count(), 0);

    t.capability.set_can_embed(true);
    board.on_reaction_removed(message, reactors[0]).await.unwrap();
    assert_eq!(t.poster.post_count(), 1);
    assert_eq!(board.star_count(message).await.unwrap(), 2);
}

#[tokio::test]
async fn test_missing_channel_leaves_no_entry() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings_without_channel(1)).await.unwrap();
    let message = unique_id();

    t.manager.on_reaction_added(guild.guild_id, message, unique_id()).await.unwrap();
    assert_eq!(t.poster.post_count(), 0);

    t.manager.set_channel(guild.guild_id, Some(guild.channel_id)).await.unwrap();
    t.manager.on_reaction_added(guild.guild_id, message, unique_id()).await.unwrap();
    assert_eq!(t.poster.posted_channels(), vec![guild.channel_id]);
}

// ============================================================================
// Tiers
// ============================================================================

#[tokio::test]
async fn test_rendered_tiers_never_drop_while_growing() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(1)).await.unwrap();
    let message = unique_id();

    for user in users(16) {
        t.manager.on_reaction_added(guild.guild_id, message, user).await.unwrap();
    }

    let tiers = t.renderer.tiers();
    assert_eq!(tiers.len(), 16);
    assert!(tiers.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(tiers.first(), Some(&StarTier::Star));
    assert_eq!(tiers.last(), Some(&StarTier::Sparkles));
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_store_fault_propagates_without_advancing() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(2)).await.unwrap();
    let message = unique_id();
    let first = unique_id();
    t.manager.on_reaction_added(guild.guild_id, message, first).await.unwrap();

    t.store.fail_all(true);
    let err = t
        .manager
        .on_reaction_added(guild.guild_id, message, unique_id())
        .await
        .unwrap_err();
    assert!(err.is_store_fault());
    assert_eq!(t.poster.post_count(), 0);

    t.store.fail_all(false);
    assert_eq!(t.count(guild.guild_id, message).await, 1);
}

#[tokio::test]
async fn test_post_and_render_failures_are_absorbed() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(1)).await.unwrap();
    let board = t.manager.board(guild.guild_id).unwrap();
    let message = unique_id();

    t.poster.fail_posts(true);
    board.on_reaction_added(message, unique_id()).await.unwrap();
    assert_eq!(board.lookup(message).unwrap().entry_state().await, EntryState::NoEntry);

    t.poster.fail_posts(false);
    t.renderer.fail(true);
    board.on_reaction_added(message, unique_id()).await.unwrap();
    assert_eq!(t.poster.post_count(), 0);

    t.renderer.fail(false);
    board.on_reaction_added(message, unique_id()).await.unwrap();
    assert_eq!(t.poster.post_count(), 1);

    t.poster.fail_edits(true);
    board.on_reaction_added(message, unique_id()).await.unwrap();
    assert_eq!(board.star_count(message).await.unwrap(), 4);
}

#[tokio::test]
async fn test_unlinkable_entry_is_withdrawn() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(1)).await.unwrap();
    let board = t.manager.board(guild.guild_id).unwrap();
    let message = unique_id();

    t.store.fail_set_entry(true);
    let err = board.on_reaction_added(message, unique_id()).await.unwrap_err();
    assert!(err.is_store_fault());
    assert_eq!(t.poster.post_count(), 1);
    assert_eq!(t.poster.deleted_ids(), t.poster.posted_ids());
    assert_eq!(board.lookup(message).unwrap().entry_state().await, EntryState::NoEntry);

    t.store.fail_set_entry(false);
    board.on_reaction_added(message, unique_id()).await.unwrap();
    assert_eq!(t.poster.post_count(), 2);
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_deleting_starred_message() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(1)).await.unwrap();
    let message = unique_id();
    t.manager.on_reaction_added(guild.guild_id, message, unique_id()).await.unwrap();

    t.manager.on_message_deleted(guild.guild_id, message).await.unwrap();

    assert_eq!(t.poster.delete_count(), 1);
    assert_eq!(t.count(guild.guild_id, message).await, 0);
    assert_eq!(t.manager.board(guild.guild_id).unwrap().tracked(), 0);
}

#[tokio::test]
async fn test_deleting_entry_drops_starred_message() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(1)).await.unwrap();
    let message = unique_id();
    t.manager.on_reaction_added(guild.guild_id, message, unique_id()).await.unwrap();
    let entry_id = t.poster.posted_ids()[0];

    t.manager.on_message_deleted(guild.guild_id, entry_id).await.unwrap();

    assert_eq!(t.count(guild.guild_id, message).await, 0);
    assert_eq!(t.manager.board(guild.guild_id).unwrap().tracked(), 0);
}

// ============================================================================
// Restart and leave
// ============================================================================

#[tokio::test]
async fn test_restart_resumes_existing_entry() {
    let store = Arc::new(FlakyStore::new());
    let guild = GuildFixture::unique();
    let message = unique_id();

    let before = TestStarboard::with_store(Arc::clone(&store));
    before.manager.configure(guild.settings(2)).await.unwrap();
    for user in users(2) {
        before.manager.on_reaction_added(guild.guild_id, message, user).await.unwrap();
    }
    let entry_id = before.poster.posted_ids()[0];

    let after = TestStarboard::with_store(store);
    after.manager.configure(guild.settings(2)).await.unwrap();
    after.manager.on_reaction_added(guild.guild_id, message, unique_id()).await.unwrap();

    assert_eq!(after.poster.post_count(), 0);
    assert_eq!(after.poster.edit_count(), 1);
    let board = after.manager.board(guild.guild_id).unwrap();
    assert_eq!(
        board.lookup(message).unwrap().entry_state().await,
        EntryState::EntryExists(entry_id)
    );
    assert_eq!(board.star_count(message).await.unwrap(), 3);
}

#[tokio::test]
async fn test_leave_cascades() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    let other = GuildFixture::unique();
    t.manager.configure(guild.settings(1)).await.unwrap();
    t.manager.configure(other.settings(1)).await.unwrap();

    for _ in 0..3 {
        t.manager.on_reaction_added(guild.guild_id, unique_id(), unique_id()).await.unwrap();
    }
    let kept = unique_id();
    t.manager.on_reaction_added(other.guild_id, kept, unique_id()).await.unwrap();

    t.manager.leave(guild.guild_id).await.unwrap();

    assert!(t.manager.board(guild.guild_id).is_none());
    assert_eq!(t.store.message_count(guild.guild_id), 0);
    assert_eq!(t.count(other.guild_id, kept).await, 1);

    let err = t.manager.set_threshold(guild.guild_id, 2).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotConfigured { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_leave_waits_for_in_flight_stars() {
    let t = TestStarboard::new();
    let guild = GuildFixture::unique();
    t.manager.configure(guild.settings(1)).await.unwrap();
    t.poster.set_delay(Duration::from_millis(100));
    let board = t.manager.board(guild.guild_id).unwrap();

    let mut tasks = Vec::new();
    for _ in 0..16 {
        let board = Arc::clone(&board);
        tasks.push(tokio::spawn(async move {
            board.on_reaction_added(unique_id(), unique_id()).await
        }));
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
    let leaving = {
        let board = Arc::clone(&board);
        tokio::spawn(async move { board.leave().await })
    };
    for _ in 0..16 {
        let board = Arc::clone(&board);
        tasks.push(tokio::spawn(async move {
            board.on_reaction_added(unique_id(), unique_id()).await
        }));
    }

    for result in futures::future::join_all(tasks).await {
        result.unwrap().unwrap();
    }
    leaving.await.unwrap().unwrap();

    assert!(board.is_closed());
    assert_eq!(board.tracked(), 0);
    assert_eq!(t.store.message_count(guild.guild_id), 0);
}
