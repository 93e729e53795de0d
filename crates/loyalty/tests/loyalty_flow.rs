//! End-to-end loyalty flows against the in-memory store.

use chrono::{Duration, Utc};
use loyalty::{LoyaltyEngine, LoyaltyError};
use rust_decimal::Decimal;
use std::sync::Arc;
use store::MemoryStore;

fn engine() -> LoyaltyEngine {
    LoyaltyEngine::new(Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn test_order_completion_flow() {
    let engine = engine();
    let start = Utc::now();
    engine.get_or_init("u1", start).await.unwrap();

    let points = engine
        .award_order_points("u1", Decimal::new(45550, 2), start + Duration::hours(30))
        .await
        .unwrap();
    assert_eq!(points, 45);

    let unlocked = engine
        .check_order_achievements("u1", 1, Decimal::new(45550, 2), start + Duration::hours(30))
        .await
        .unwrap();
    assert_eq!(unlocked, vec!["first_order"]);

    let profile = engine.get("u1").await.unwrap().unwrap();
    assert_eq!(profile.points, 95);
    assert_eq!(profile.streak, 1);
    assert_eq!(profile.level, 1);
}

#[tokio::test]
async fn test_milestones_unlock_once() {
    let engine = engine();
    let now = Utc::now();

    let unlocked = engine
        .check_order_achievements("u1", 6, Decimal::from(1200), now)
        .await
        .unwrap();
    assert_eq!(unlocked, vec!["first_order", "five_orders", "big_spender"]);

    let again = engine
        .check_order_achievements("u1", 7, Decimal::from(1300), now)
        .await
        .unwrap();
    assert!(again.is_empty());

    // 50 + 100 + 300
    let profile = engine.get("u1").await.unwrap().unwrap();
    assert_eq!(profile.total_points, 450);
    assert_eq!(profile.level, 3);
}

#[tokio::test]
async fn test_redeem_flow() {
    let engine = engine();
    let now = Utc::now();
    engine.add_points("u1", 450, "test credit", now).await.unwrap();

    let reward = engine.redeem_reward("u1", "free_wings", now).await.unwrap();
    assert!(reward.code.starts_with("SMK-"));
    assert_eq!(reward.expires_at, now + Duration::days(30));

    let second = engine.redeem_reward("u1", "free_wings", now).await;
    assert!(matches!(
        second,
        Err(LoyaltyError::InsufficientPoints { required: 400, available: 50 })
    ));

    let profile = engine.get("u1").await.unwrap().unwrap();
    assert_eq!(profile.points, 50);
    assert_eq!(profile.total_points, 450);
    assert_eq!(profile.rewards.len(), 1);
}

#[tokio::test]
async fn test_custom_reward_expiry() {
    let engine = engine().with_reward_expiry_days(7);
    let now = Utc::now();
    engine.add_points("u1", 200, "test credit", now).await.unwrap();

    let reward = engine.redeem_reward("u1", "discount_10", now).await.unwrap();
    assert_eq!(reward.expires_at - now, Duration::days(7));
}

#[tokio::test]
async fn test_leaderboard_orders_by_lifetime_points() {
    let engine = engine();
    let now = Utc::now();
    engine.add_points("a", 300, "test", now).await.unwrap();
    engine.add_points("b", 1200, "test", now).await.unwrap();
    engine.add_points("c", 700, "test", now).await.unwrap();
    engine.redeem_reward("b", "discount_20", now).await.unwrap();

    let top = engine.leaderboard(2).await.unwrap();
    let users: Vec<&str> = top.iter().map(|p| p.user_id.as_str()).collect();
    assert_eq!(users, vec!["b", "c"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redemptions_never_overdraw() {
    let engine = Arc::new(engine());
    let now = Utc::now();
    engine.add_points("u1", 500, "test credit", now).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.redeem_reward("u1", "discount_10", now).await
        }));
    }

    let mut redeemed = 0u64;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => redeemed += 1,
            Err(e) => assert!(
                e.is_conflict() || matches!(e, LoyaltyError::InsufficientPoints { .. }),
                "unexpected error: {}",
                e
            ),
        }
    }

    let profile = engine.get("u1").await.unwrap().unwrap();
    assert!(redeemed >= 1 && redeemed <= 2);
    assert_eq!(profile.points, 500 - 200 * redeemed);
    assert_eq!(profile.rewards.len() as u64, redeemed);
}
