//! Benchmarks for candidate generation
//!
//! Run with: cargo bench --package sources

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use domain::{FoodPreferences, MenuCatalog, Order, OrderItem, OrderStatus, OrderType};
use rust_decimal::Decimal;
use sources::{build_user_context, SimilarSource, TrendingSource};
use std::sync::Arc;

/// Synthetic history cycling through the house menu
fn synthetic_orders(catalog: &MenuCatalog, count: usize) -> Vec<Order> {
    let items = catalog.items();
    (0..count)
        .map(|i| {
            let lines: Vec<OrderItem> = (0..3)
                .map(|j| {
                    let item = &items[(i * 7 + j * 3) % items.len()];
                    OrderItem {
                        name: item.name.clone(),
                        price: item.price,
                        quantity: 1 + (j as u32 % 2),
                        category: item.category.clone(),
                    }
                })
                .collect();
            let now = Utc::now();
            Order {
                id: format!("o{}", i),
                user_id: "bench".to_string(),
                user_email: "bench@example.com".to_string(),
                user_name: "Bench".to_string(),
                items: lines,
                order_type: OrderType::Takeaway,
                delivery_address: None,
                delivery_instructions: None,
                table_number: None,
                phone_number: None,
                subtotal: Decimal::ZERO,
                delivery_fee: Decimal::ZERO,
                total: Decimal::ZERO,
                status: OrderStatus::Completed,
                payment_method: None,
                payment_intent_id: None,
                created_at: now,
                updated_at: now,
            }
        })
        .collect()
}

fn bench_build_user_context(c: &mut Criterion) {
    let catalog = MenuCatalog::smokeville();
    let orders = synthetic_orders(&catalog, 20);
    let preferences = FoodPreferences::default();

    c.bench_function("build_user_context", |b| {
        b.iter(|| {
            let context = build_user_context(None, black_box(&orders), &preferences, 20);
            black_box(context)
        })
    });
}

fn bench_trending(c: &mut Criterion) {
    let catalog = Arc::new(MenuCatalog::smokeville());
    let orders = synthetic_orders(&catalog, 5_000);
    let trending = TrendingSource::new(catalog).with_window(5_000);

    c.bench_function("trending_get_candidates", |b| {
        b.iter(|| {
            let candidates = trending.get_candidates(black_box(&orders), black_box(6));
            black_box(candidates)
        })
    });
}

fn bench_similar(c: &mut Criterion) {
    let similar = SimilarSource::new(Arc::new(MenuCatalog::smokeville()));

    c.bench_function("similar_get_candidates", |b| {
        b.iter(|| {
            let candidates = similar.get_candidates(black_box("Margherita Pizza"), 4);
            black_box(candidates)
        })
    });
}

criterion_group!(benches, bench_build_user_context, bench_trending, bench_similar);
criterion_main!(benches);
