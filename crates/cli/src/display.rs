//! Terminal output for the smokeville commands.

use chrono::{DateTime, Utc};
use colored::Colorize;
use domain::{Booking, GalleryItem, MenuItem, NewsletterSubscriber, Order, Review};
use loyalty::{points_to_next_level, LoyaltyProfile, REWARDS};
use server::{DashboardStats, RatingSummary};
use sources::Recommendation;

pub fn print_menu(items: &[MenuItem]) {
    println!("{}", "SMOKEVILLE Menu:".bold().blue());
    let mut category = "";
    for item in items {
        if item.category != category {
            category = &item.category;
            println!("\n{}", category.to_uppercase().bold());
        }
        let name = if item.available {
            item.name.normal()
        } else {
            item.name.dimmed().strikethrough()
        };
        println!(
            "  {} {} [{}] {}",
            format!("R{:.2}", item.price).green(),
            name,
            item.spice_level,
            item.tags.join(", ").dimmed()
        );
        if !item.id.is_empty() {
            println!("      id: {}", item.id.dimmed());
        }
    }
}

pub fn print_order(order: &Order) {
    println!(
        "{} {} ({}, {})",
        "Order".bold(),
        order.id.bold().blue(),
        order.order_type,
        status_colored(order.status.as_str())
    );
    for line in &order.items {
        println!(
            "  {}x {} @ R{:.2} = R{:.2}",
            line.quantity,
            line.name,
            line.price,
            line.line_total()
        );
    }
    if order.delivery_fee > rust_decimal::Decimal::ZERO {
        println!("  Delivery fee: R{:.2}", order.delivery_fee);
    }
    println!("  {} R{:.2}", "Total:".bold(), order.total);
    if let Some(address) = &order.delivery_address {
        println!("  Deliver to: {}", address);
    }
    if let Some(intent) = &order.payment_intent_id {
        println!("  Payment: {}", intent.dimmed());
    }
    println!("  Placed: {}", order.created_at.format("%Y-%m-%d %H:%M UTC"));
}

pub fn print_booking(booking: &Booking) {
    println!(
        "{} {} for {} on {} at {} - {} guests ({})",
        "Booking".bold(),
        booking.id.bold().blue(),
        booking.user_name,
        booking.date,
        booking.time.format("%H:%M"),
        booking.guests,
        status_colored(booking.status.as_str())
    );
    if let Some(occasion) = &booking.occasion {
        println!("  Occasion: {}", occasion);
    }
    if let Some(requests) = &booking.special_requests {
        println!("  Requests: {}", requests);
    }
}

pub fn print_reviews(reviews: &[Review]) {
    if reviews.is_empty() {
        println!("No reviews yet.");
        return;
    }
    for review in reviews {
        println!(
            "{} {:.2} by {} ({} found this helpful)",
            stars(review.overall_rating).yellow(),
            review.overall_rating,
            review.user_name.bold(),
            review.helpful
        );
        println!("  \"{}\"", review.comment);
        println!("  id: {}", review.id.dimmed());
    }
}

pub fn print_rating_summary(summary: &RatingSummary) {
    println!("{}", format!("Ratings from {} reviews:", summary.count).bold().blue());
    println!("{}Overall: {:.2}", "• ".green(), summary.overall);
    println!("{}Service: {:.2}", "• ".green(), summary.service);
    println!("{}Food: {:.2}", "• ".green(), summary.food);
    println!("{}Ambience: {:.2}", "• ".green(), summary.ambience);
    println!("{}Value: {:.2}", "• ".green(), summary.value);
}

pub fn print_gallery(items: &[GalleryItem]) {
    for item in items {
        println!(
            "{} [{:?}/{}] {}",
            item.title.bold(),
            item.media_type,
            item.category,
            item.url.dimmed()
        );
        println!("  id: {}  uploaded {}", item.id, item.uploaded_at.format("%Y-%m-%d"));
    }
}

pub fn print_subscribers(subscribers: &[NewsletterSubscriber]) {
    println!("{}", format!("{} subscribers:", subscribers.len()).bold().blue());
    for subscriber in subscribers {
        println!(
            "  {} {} (since {})",
            subscriber.email,
            subscriber.name.dimmed(),
            subscriber.subscribed_at.format("%Y-%m-%d")
        );
    }
}

pub fn print_profile(profile: &LoyaltyProfile, now: DateTime<Utc>) {
    println!("{}", format!("Loyalty profile for {}", profile.user_id).bold().blue());
    println!("{}Level: {}", "• ".green(), profile.level);
    println!("{}Points: {} (lifetime {})", "• ".green(), profile.points, profile.total_points);
    match points_to_next_level(profile.total_points) {
        Some(missing) => println!("{}Next level in {} points", "• ".green(), missing),
        None => println!("{}Top level reached", "• ".green()),
    }
    println!("{}Streak: {} days", "• ".green(), profile.streak);

    if !profile.achievements.is_empty() {
        println!("Achievements:");
        for achievement in &profile.achievements {
            println!(
                "  - {} ({:?}, +{}) {}",
                achievement.name.bold(),
                achievement.rarity,
                achievement.points,
                achievement.description.dimmed()
            );
        }
    }

    let active = profile.active_rewards(now);
    if !active.is_empty() {
        println!("Active rewards:");
        for reward in active {
            println!(
                "  - {} {} (expires {})",
                reward.code.yellow().bold(),
                reward.name,
                reward.expires_at.format("%Y-%m-%d")
            );
        }
    }
}

pub fn print_reward_catalog() {
    println!("{}", "Rewards:".bold().blue());
    for reward in REWARDS.iter() {
        println!(
            "  {:<14} {:>4} pts  {} - {}",
            reward.id,
            reward.points_cost,
            reward.name.bold(),
            reward.description
        );
    }
}

pub fn print_leaderboard(profiles: &[LoyaltyProfile]) {
    println!("{}", "Leaderboard:".bold().blue());
    for (rank, profile) in profiles.iter().enumerate() {
        println!(
            "{}. {} - {} pts (level {})",
            (rank + 1).to_string().green(),
            profile.user_id,
            profile.total_points,
            profile.level
        );
    }
}

pub fn print_recommendations(recommendations: &[Recommendation], explain: bool) {
    println!("{}", "Recommended for you:".bold().blue());
    if recommendations.is_empty() {
        println!("Nothing to suggest right now.");
        return;
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) R{:.2} - Score: {}",
            (rank + 1).to_string().green(),
            rec.name.bold(),
            rec.category,
            rec.price,
            rec.score
        );
        if explain {
            println!("   {} [{:?}]", rec.reason.italic(), rec.source);
        }
    }
}

pub fn print_dashboard(stats: &DashboardStats) {
    println!("{}", "Dashboard:".bold().blue());
    println!(
        "{}Orders: {} ({} pending), revenue R{:.2}",
        "• ".green(),
        stats.total_orders,
        stats.pending_orders,
        stats.total_revenue
    );
    println!(
        "{}Today: {} orders, R{:.2}",
        "• ".green(),
        stats.today_orders,
        stats.today_revenue
    );
    println!(
        "{}Bookings: {} ({} pending)",
        "• ".cyan(),
        stats.total_bookings,
        stats.pending_bookings
    );
    println!(
        "{}Reviews: {} averaging {:.1}",
        "• ".cyan(),
        stats.total_reviews,
        stats.average_rating
    );
    println!("{}Newsletter subscribers: {}", "• ".cyan(), stats.newsletter_subscribers);
}

fn status_colored(status: &str) -> colored::ColoredString {
    match status {
        "completed" | "confirmed" => status.green(),
        "cancelled" => status.red(),
        _ => status.yellow(),
    }
}

fn stars(rating: f64) -> String {
    let full = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(full), "☆".repeat(5 - full))
}
