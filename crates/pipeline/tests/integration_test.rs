//! Integration tests for the pipeline.
//!
//! These tests build a diner's context from real order history and check the
//! ranking properties the personalized scorer guarantees.

use chrono::Utc;
use domain::{
    DietaryRestriction, FoodPreferences, MenuCatalog, Order, OrderItem, OrderStatus, OrderType,
    SpiceLevel,
};
use pipeline::filters::ExcludeItemsFilter;
use pipeline::{FilterPipeline, PersonalizedScorer, ScoringPipeline};
use rust_decimal::Decimal;
use sources::{build_user_context, Candidate, UserContext};

fn order_of(catalog: &MenuCatalog, names: &[&str]) -> Order {
    let items: Vec<OrderItem> = names
        .iter()
        .map(|name| {
            let item = catalog.get(name).unwrap();
            OrderItem {
                name: item.name.clone(),
                price: item.price,
                quantity: 1,
                category: item.category.clone(),
            }
        })
        .collect();
    let subtotal: Decimal = items.iter().map(OrderItem::line_total).sum();
    let now = Utc::now();
    Order {
        id: String::new(),
        user_id: "u1".to_string(),
        user_email: "lerato@example.com".to_string(),
        user_name: "Lerato".to_string(),
        items,
        order_type: OrderType::EatIn,
        delivery_address: None,
        delivery_instructions: None,
        table_number: Some("4".to_string()),
        phone_number: None,
        subtotal,
        delivery_fee: Decimal::ZERO,
        total: subtotal,
        status: OrderStatus::Completed,
        payment_method: None,
        payment_intent_id: None,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn test_scores_never_negative() {
    let catalog = MenuCatalog::smokeville();
    let preferences = FoodPreferences {
        spice_level: SpiceLevel::ExtraHot,
        dietary_restrictions: vec![
            DietaryRestriction::Vegan,
            DietaryRestriction::Halal,
            DietaryRestriction::GlutenFree,
        ],
        disliked_ingredients: vec!["cheese".to_string(), "beef".to_string(), "chicken".to_string()],
    };
    let context = build_user_context(None, &[], &preferences, 20);

    let picks = PersonalizedScorer::house()
        .recommend(Candidate::all(&catalog), &context, catalog.len())
        .unwrap();

    assert_eq!(picks.len(), catalog.len());
    assert!(picks.iter().all(|p| p.score >= 0));
}

#[test]
fn test_dietary_violation_never_outranks_compliant_item() {
    let catalog = MenuCatalog::smokeville();
    // heavy pizza-free history so meat items collect the category bonus
    let orders: Vec<Order> = (0..5)
        .map(|_| order_of(&catalog, &["Smoked Full Chicken", "BBQ Ribs Platter"]))
        .collect();
    let preferences = FoodPreferences {
        dietary_restrictions: vec![DietaryRestriction::Vegetarian],
        ..Default::default()
    };
    let context = build_user_context(Some("u1".to_string()), &orders, &preferences, 20);

    let picks = PersonalizedScorer::house()
        .recommend(Candidate::all(&catalog), &context, catalog.len())
        .unwrap();

    let first_violation = picks
        .iter()
        .position(|p| !p.tags.iter().any(|t| t == "vegetarian"))
        .unwrap();
    let last_compliant = picks
        .iter()
        .rposition(|p| p.tags.iter().any(|t| t == "vegetarian"))
        .unwrap();
    assert!(last_compliant < first_violation);
}

#[test]
fn test_reordering_lowers_score() {
    let catalog = MenuCatalog::smokeville();
    let scoring = ScoringPipeline::house();
    let wings = catalog.get("8 Smoked Wings").unwrap();

    let mut previous = scoring.score(wings, &UserContext::anonymous());
    for times in 1..4 {
        let orders: Vec<Order> = (0..times)
            .map(|_| order_of(&catalog, &["8 Smoked Wings"]))
            .collect();
        let context = build_user_context(None, &orders, &FoodPreferences::default(), 20);

        // keep the favourite-category bonus out of the comparison
        let mut without_history = context.clone();
        without_history.item_order_counts.clear();

        let score = scoring.score(wings, &context);
        assert!(score < scoring.score(wings, &without_history));
        assert!(score < previous || times == 1);
        previous = score;
    }
}

#[test]
fn test_favourite_category_lifts_items() {
    let catalog = MenuCatalog::smokeville();
    let orders = vec![
        order_of(&catalog, &["Margherita Pizza"]),
        order_of(&catalog, &["Margherita Pizza", "Veggie Supreme Pizza"]),
    ];
    let context = build_user_context(None, &orders, &FoodPreferences::default(), 20);
    assert_eq!(context.top_categories[0], "pizza");

    let picks = PersonalizedScorer::house()
        .recommend(Candidate::all(&catalog), &context, 3)
        .unwrap();

    // Peri-Peri: 50 + 30 pizza + 15 untried + 10 popular - 5 hot
    assert_eq!(picks[0].name, "Peri-Peri Chicken Pizza");
    assert_eq!(picks[0].score, 100);
    assert_eq!(picks[0].reason, "You love pizza • Try something new");
}

#[test]
fn test_custom_filters() {
    let catalog = MenuCatalog::smokeville();
    let scorer = PersonalizedScorer::house()
        .with_filters(FilterPipeline::new().add_filter(ExcludeItemsFilter::new(["8 Smoked Wings"])));

    let picks = scorer
        .recommend(Candidate::all(&catalog), &UserContext::anonymous(), 1)
        .unwrap();
    assert_eq!(picks.len(), 1);
    assert_ne!(picks[0].name, "8 Smoked Wings");
}
