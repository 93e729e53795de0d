mod display;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use domain::{
    BookingStatus, Cart, DietaryRestriction, FoodPreferences, MenuCatalog, MenuItem, OrderStatus,
    OrderType, PaymentMethod, SpiceLevel, SubRatings, User, parse_cart_line, parse_date,
    parse_list, parse_time,
};
use rand::Rng;
use rust_decimal::Decimal;
use server::{
    CheckoutDetails, MenuItemPatch, NewBooking, RecommendationMode, ServiceConfig, Services, Upload,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use store::{DirBlobStore, DocumentStore, MemoryStore, collections};
use tracing::info;

/// SMOKEVILLE - restaurant back office
#[derive(Parser)]
#[command(name = "smokeville")]
#[command(about = "Menu, orders, bookings, reviews and loyalty for SMOKEVILLE", long_about = None)]
struct Cli {
    /// JSON snapshot holding all stored documents
    #[arg(long, default_value = "smokeville.json", global = true)]
    data_file: PathBuf,

    /// Menu catalog JSON to use instead of the house menu
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Service configuration JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for uploaded gallery media
    #[arg(long, default_value = "media", global = true)]
    media_dir: PathBuf,

    /// Skip the simulated payment and email delays
    #[arg(long, global = true)]
    no_delay: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
    },

    /// Save the food preferences personalized recommendations use
    Preferences {
        #[arg(long)]
        user: String,
        #[arg(long, default_value = "medium")]
        spice: SpiceLevel,
        /// Comma separated: vegetarian, vegan, gluten-free, halal
        #[arg(long, value_delimiter = ',')]
        dietary: Vec<DietaryRestriction>,
        /// Comma separated ingredients to avoid
        #[arg(long, default_value = "")]
        dislikes: String,
    },

    /// Browse and administer the menu
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },

    /// Checkout and order management
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },

    /// Table bookings
    Booking {
        #[command(subcommand)]
        action: BookingAction,
    },

    /// Guest reviews
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },

    /// Photo and video gallery
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },

    /// Newsletter sign-ups
    Newsletter {
        #[command(subcommand)]
        action: NewsletterAction,
    },

    /// Points, achievements and rewards
    Loyalty {
        #[command(subcommand)]
        action: LoyaltyAction,
    },

    /// Get menu recommendations
    Recommend {
        #[arg(long, value_enum, default_value = "personalized")]
        mode: Mode,

        /// User to personalize for
        #[arg(long)]
        user: Option<String>,

        /// Menu item for complementary and similar modes
        #[arg(long)]
        item: Option<String>,

        /// Number of recommendations to return
        #[arg(long)]
        limit: Option<usize>,

        /// Show the reason and source for each recommendation
        #[arg(long)]
        explain: bool,
    },

    /// Admin dashboard figures
    Dashboard {
        #[arg(long = "as")]
        admin: String,
    },

    /// Run personalized recommendations for random users to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[derive(Subcommand)]
enum MenuAction {
    /// Show the menu in effect
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Store the house menu so it can be edited
    Seed {
        #[arg(long = "as")]
        admin: String,
    },
    Add {
        #[arg(long = "as")]
        admin: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long, default_value = "")]
        description: String,
        /// Comma separated tags
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value = "medium")]
        spice: SpiceLevel,
        /// Comma separated ingredients
        #[arg(long, default_value = "")]
        ingredients: String,
    },
    Update {
        #[arg(long = "as")]
        admin: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        available: Option<bool>,
        #[arg(long)]
        featured: Option<bool>,
    },
    Delete {
        #[arg(long = "as")]
        admin: String,
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Place an order
    Checkout {
        #[arg(long)]
        user: String,
        /// Cart line as "name" or "name:quantity"; repeat for more lines
        #[arg(long = "item", required = true)]
        items: Vec<String>,
        #[arg(long = "type", default_value = "takeaway")]
        order_type: OrderType,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        instructions: Option<String>,
        #[arg(long)]
        table: Option<String>,
        #[arg(long)]
        payment: Option<PaymentMethod>,
    },
    /// A user's orders, or every order for an admin
    List {
        #[arg(long)]
        user: Option<String>,
        #[arg(long = "as")]
        admin: Option<String>,
    },
    Show {
        #[arg(long)]
        id: String,
    },
    /// Move an order along its lifecycle
    Status {
        #[arg(long = "as")]
        admin: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        status: OrderStatus,
    },
    Delete {
        #[arg(long = "as")]
        admin: String,
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum BookingAction {
    /// Book a table
    Create {
        #[arg(long)]
        user: String,
        /// Name on the booking, defaults to the account name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: String,
        /// YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        /// HH:MM
        #[arg(long, value_parser = parse_time)]
        time: NaiveTime,
        #[arg(long)]
        guests: u32,
        #[arg(long)]
        occasion: Option<String>,
        #[arg(long)]
        requests: Option<String>,
    },
    List {
        #[arg(long)]
        user: Option<String>,
        #[arg(long = "as")]
        admin: Option<String>,
    },
    /// Seats left in a slot
    Availability {
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long, value_parser = parse_time)]
        time: NaiveTime,
    },
    Status {
        #[arg(long = "as")]
        admin: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        status: BookingStatus,
    },
    /// Cancel one of your own bookings
    Cancel {
        #[arg(long)]
        user: String,
        #[arg(long)]
        id: String,
    },
    Delete {
        #[arg(long = "as")]
        admin: String,
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// Rate a visit from 1 to 5 stars in each category
    Create {
        #[arg(long)]
        user: String,
        #[arg(long)]
        service: u8,
        #[arg(long)]
        food: u8,
        #[arg(long)]
        ambience: u8,
        #[arg(long)]
        value: u8,
        #[arg(long)]
        comment: String,
    },
    List {
        #[arg(long)]
        user: Option<String>,
    },
    Top {
        #[arg(long, default_value = "3")]
        count: usize,
    },
    Helpful {
        #[arg(long)]
        id: String,
    },
    Summary,
    Delete {
        #[arg(long = "as")]
        admin: String,
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum GalleryAction {
    Upload {
        #[arg(long = "as")]
        admin: String,
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        category: String,
        /// MIME type, guessed from the extension when omitted
        #[arg(long)]
        content_type: Option<String>,
    },
    List {
        #[arg(long)]
        category: Option<String>,
    },
    Delete {
        #[arg(long = "as")]
        admin: String,
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum NewsletterAction {
    Subscribe {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
    },
    List {
        #[arg(long = "as")]
        admin: String,
    },
}

#[derive(Subcommand)]
enum LoyaltyAction {
    Show {
        #[arg(long)]
        user: String,
    },
    /// The rewards points can be exchanged for
    Rewards,
    Redeem {
        #[arg(long)]
        user: String,
        #[arg(long)]
        reward: String,
    },
    Leaderboard {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Personalized,
    Trending,
    Complementary,
    Similar,
    TimeBased,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config =
        ServiceConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if cli.no_delay {
        config = config.without_delays();
    }

    let catalog = match &cli.catalog {
        Some(path) => MenuCatalog::load_from_file(path)
            .with_context(|| format!("Failed to load menu catalog from {}", path.display()))?,
        None => MenuCatalog::smokeville(),
    };

    let store = Arc::new(
        MemoryStore::load(&cli.data_file)
            .await
            .with_context(|| format!("Failed to open {}", cli.data_file.display()))?,
    );
    info!("Opened data file {}", cli.data_file.display());
    let blobs = Arc::new(DirBlobStore::new(&cli.media_dir));
    let services = Services::new(store.clone(), blobs, Arc::new(catalog), config);

    // Dispatch to appropriate command handler
    let now = Utc::now();
    match cli.command {
        Commands::Register { email, name, phone } => {
            let user = services
                .users
                .register(&email, &name, phone.as_deref(), now)
                .await?;
            println!("{} Welcome, {}! Your user id is {}", "✓".green(), user.display_name, user.id.bold());
        }
        Commands::Preferences {
            user,
            spice,
            dietary,
            dislikes,
        } => {
            let preferences = FoodPreferences {
                spice_level: spice,
                dietary_restrictions: dietary,
                disliked_ingredients: parse_list(&dislikes),
            };
            services.users.update_preferences(&user, preferences).await?;
            println!("{} Preferences saved", "✓".green());
        }
        Commands::Menu { action } => handle_menu(&services, action).await?,
        Commands::Order { action } => handle_order(&services, action, now).await?,
        Commands::Booking { action } => handle_booking(&services, action, now).await?,
        Commands::Review { action } => handle_review(&services, action, now).await?,
        Commands::Gallery { action } => handle_gallery(&services, action, now).await?,
        Commands::Newsletter { action } => handle_newsletter(&services, action, now).await?,
        Commands::Loyalty { action } => handle_loyalty(&services, action, now).await?,
        Commands::Recommend {
            mode,
            user,
            item,
            limit,
            explain,
        } => handle_recommend(&services, mode, user, item, limit, explain, now).await?,
        Commands::Dashboard { admin } => {
            services.users.require_admin(&admin)?;
            let stats = services.admin.dashboard(now).await?;
            display::print_dashboard(&stats);
        }
        Commands::Benchmark { requests } => {
            handle_benchmark(&services, store.as_ref(), requests).await?
        }
    }

    store
        .save(&cli.data_file)
        .await
        .with_context(|| format!("Failed to save {}", cli.data_file.display()))?;
    Ok(())
}

/// Handle the 'menu' commands
async fn handle_menu(services: &Services, action: MenuAction) -> Result<()> {
    match action {
        MenuAction::List { category } => {
            let catalog = services.menu.catalog().await?;
            let items: Vec<MenuItem> = match &category {
                Some(category) => catalog.by_category(category).into_iter().cloned().collect(),
                None => catalog.items().to_vec(),
            };
            display::print_menu(&items);
        }
        MenuAction::Seed { admin } => {
            services.users.require_admin(&admin)?;
            let count = services.menu.seed().await?;
            println!("{} Stored {} menu items", "✓".green(), count);
        }
        MenuAction::Add {
            admin,
            name,
            category,
            price,
            description,
            tags,
            spice,
            ingredients,
        } => {
            services.users.require_admin(&admin)?;
            let item = MenuItem {
                id: String::new(),
                name,
                description,
                price,
                category,
                tags: parse_list(&tags),
                spice_level: spice,
                ingredients: parse_list(&ingredients),
                image: None,
                available: true,
                featured: false,
            };
            let item = services.menu.add_item(item).await?;
            println!("{} Added {} ({})", "✓".green(), item.name, item.id);
        }
        MenuAction::Update {
            admin,
            id,
            description,
            price,
            available,
            featured,
        } => {
            services.users.require_admin(&admin)?;
            let patch = MenuItemPatch {
                description,
                price,
                available,
                featured,
            };
            let item = services.menu.update_item(&id, &patch).await?;
            display::print_menu(&[item]);
        }
        MenuAction::Delete { admin, id } => {
            services.users.require_admin(&admin)?;
            services.menu.delete_item(&id).await?;
            println!("{} Deleted menu item {}", "✓".green(), id);
        }
    }
    Ok(())
}

/// Handle the 'order' commands
async fn handle_order(services: &Services, action: OrderAction, now: DateTime<Utc>) -> Result<()> {
    match action {
        OrderAction::Checkout {
            user,
            items,
            order_type,
            phone,
            address,
            instructions,
            table,
            payment,
        } => {
            let user = services.users.require_user(&user).await?;
            let lines = items
                .iter()
                .map(|line| parse_cart_line(line))
                .collect::<domain::Result<Vec<_>>>()?;
            let catalog = services.menu.catalog().await?;
            let cart = Cart::from_lines(order_type, &catalog, &lines)?;

            if payment == Some(PaymentMethod::Card) {
                println!("Processing card payment of R{:.2}...", cart.total(services.config.delivery_fee));
            }
            let details = CheckoutDetails {
                phone_number: phone,
                delivery_address: address,
                delivery_instructions: instructions,
                table_number: table,
                payment_method: payment,
            };
            let receipt = services.orders.checkout(&user, &cart, details, now).await?;
            println!("{} Order placed", "✓".green());
            display::print_order(&receipt.order);
            if !receipt.confirmation_sent {
                println!("{} Confirmation email could not be sent", "!".yellow());
            }
        }
        OrderAction::List { user, admin } => {
            let orders = match (user, admin) {
                (Some(user), _) => services.orders.user_orders(&user).await?,
                (None, Some(admin)) => {
                    services.users.require_admin(&admin)?;
                    services.orders.all_orders().await?
                }
                (None, None) => bail!("Pass --user to list your orders or --as <admin> for all orders"),
            };
            if orders.is_empty() {
                println!("No orders yet.");
            }
            for order in &orders {
                display::print_order(order);
            }
        }
        OrderAction::Show { id } => {
            let order = services
                .orders
                .get_order(&id)
                .await?
                .ok_or_else(|| anyhow!("Order {} not found", id))?;
            display::print_order(&order);
        }
        OrderAction::Status { admin, id, status } => {
            services.users.require_admin(&admin)?;
            let update = services.orders.update_status(&id, status, now).await?;
            println!("{} Order {} is now {}", "✓".green(), id, update.order.status);
            if update.points_awarded > 0 {
                println!("  {} loyalty points awarded", update.points_awarded);
            }
            for achievement in &update.achievements_unlocked {
                println!("  {} Achievement unlocked: {}", "★".yellow(), achievement);
            }
        }
        OrderAction::Delete { admin, id } => {
            services.users.require_admin(&admin)?;
            services.orders.delete_order(&id).await?;
            println!("{} Deleted order {}", "✓".green(), id);
        }
    }
    Ok(())
}

/// Handle the 'booking' commands
async fn handle_booking(services: &Services, action: BookingAction, now: DateTime<Utc>) -> Result<()> {
    match action {
        BookingAction::Create {
            user,
            name,
            phone,
            date,
            time,
            guests,
            occasion,
            requests,
        } => {
            let user = services.users.require_user(&user).await?;
            let request = NewBooking {
                name: name.unwrap_or_else(|| user.display_name.clone()),
                phone_number: phone,
                date,
                time,
                guests,
                occasion,
                special_requests: requests,
            };
            let confirmation = services.bookings.create_booking(&user, request, now).await?;
            println!("{} Table booked", "✓".green());
            display::print_booking(&confirmation.booking);
        }
        BookingAction::List { user, admin } => {
            let bookings = match (user, admin) {
                (Some(user), _) => services.bookings.user_bookings(&user).await?,
                (None, Some(admin)) => {
                    services.users.require_admin(&admin)?;
                    services.bookings.all_bookings().await?
                }
                (None, None) => bail!("Pass --user to list your bookings or --as <admin> for all bookings"),
            };
            if bookings.is_empty() {
                println!("No bookings yet.");
            }
            for booking in &bookings {
                display::print_booking(booking);
            }
        }
        BookingAction::Availability { date, time } => {
            let seats = services.bookings.check_availability(date, time).await?;
            println!("{} seats available on {} at {}", seats.to_string().bold(), date, time.format("%H:%M"));
        }
        BookingAction::Status { admin, id, status } => {
            services.users.require_admin(&admin)?;
            let booking = services.bookings.update_status(&id, status, now).await?;
            display::print_booking(&booking);
        }
        BookingAction::Cancel { user, id } => {
            let booking = services
                .bookings
                .get_booking(&id)
                .await?
                .ok_or_else(|| anyhow!("Booking {} not found", id))?;
            if booking.user_id != user && !services.users.is_admin(&user) {
                bail!("Booking {} belongs to someone else", id);
            }
            let booking = services.bookings.cancel_booking(&id, now).await?;
            display::print_booking(&booking);
        }
        BookingAction::Delete { admin, id } => {
            services.users.require_admin(&admin)?;
            services.bookings.delete_booking(&id).await?;
            println!("{} Deleted booking {}", "✓".green(), id);
        }
    }
    Ok(())
}

/// Handle the 'review' commands
async fn handle_review(services: &Services, action: ReviewAction, now: DateTime<Utc>) -> Result<()> {
    match action {
        ReviewAction::Create {
            user,
            service,
            food,
            ambience,
            value,
            comment,
        } => {
            let user = services.users.require_user(&user).await?;
            let ratings = SubRatings {
                service,
                food,
                ambience,
                value,
            };
            let review = services.reviews.create_review(&user, ratings, &comment, now).await?;
            println!("{} Thanks for your review!", "✓".green());
            display::print_reviews(&[review]);
        }
        ReviewAction::List { user } => {
            let reviews = match user {
                Some(user) => services.reviews.user_reviews(&user).await?,
                None => services.reviews.all_reviews().await?,
            };
            display::print_reviews(&reviews);
        }
        ReviewAction::Top { count } => {
            display::print_reviews(&services.reviews.top_reviews(count).await?);
        }
        ReviewAction::Helpful { id } => {
            let helpful = services.reviews.mark_helpful(&id, now).await?;
            println!("{} {} people found this helpful", "✓".green(), helpful);
        }
        ReviewAction::Summary => {
            display::print_rating_summary(&services.reviews.average_ratings().await?);
        }
        ReviewAction::Delete { admin, id } => {
            services.users.require_admin(&admin)?;
            services.reviews.delete_review(&id).await?;
            println!("{} Deleted review {}", "✓".green(), id);
        }
    }
    Ok(())
}

/// Handle the 'gallery' commands
async fn handle_gallery(services: &Services, action: GalleryAction, now: DateTime<Utc>) -> Result<()> {
    match action {
        GalleryAction::Upload {
            admin,
            file,
            title,
            category,
            content_type,
        } => {
            services.users.require_admin(&admin)?;
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| anyhow!("{} is not a file", file.display()))?;
            let upload = Upload {
                content_type: content_type.unwrap_or_else(|| guess_content_type(&file).to_string()),
                file_name,
                bytes,
                title,
                category,
            };
            let item = services.gallery.upload(upload, &admin, now).await?;
            println!("{} Uploaded {}", "✓".green(), item.url);
        }
        GalleryAction::List { category } => {
            let items = match category {
                Some(category) => services.gallery.items_by_category(&category).await?,
                None => services.gallery.all_items().await?,
            };
            display::print_gallery(&items);
        }
        GalleryAction::Delete { admin, id } => {
            services.users.require_admin(&admin)?;
            services.gallery.delete_item(&id).await?;
            println!("{} Deleted gallery item {}", "✓".green(), id);
        }
    }
    Ok(())
}

/// Handle the 'newsletter' commands
async fn handle_newsletter(
    services: &Services,
    action: NewsletterAction,
    now: DateTime<Utc>,
) -> Result<()> {
    match action {
        NewsletterAction::Subscribe { email, name } => {
            let subscriber = services.newsletter.subscribe(&email, name.as_deref(), now).await?;
            println!("{} Subscribed {}", "✓".green(), subscriber.email);
        }
        NewsletterAction::List { admin } => {
            services.users.require_admin(&admin)?;
            display::print_subscribers(&services.newsletter.all_subscribers().await?);
        }
    }
    Ok(())
}

/// Handle the 'loyalty' commands
async fn handle_loyalty(services: &Services, action: LoyaltyAction, now: DateTime<Utc>) -> Result<()> {
    match action {
        LoyaltyAction::Show { user } => {
            let profile = services.loyalty.get_or_init(&user, now).await?;
            display::print_profile(&profile, now);
        }
        LoyaltyAction::Rewards => display::print_reward_catalog(),
        LoyaltyAction::Redeem { user, reward } => {
            let redeemed = services.loyalty.redeem_reward(&user, &reward, now).await?;
            println!(
                "{} {} redeemed. Your code: {} (valid until {})",
                "✓".green(),
                redeemed.name,
                redeemed.code.yellow().bold(),
                redeemed.expires_at.format("%Y-%m-%d")
            );
        }
        LoyaltyAction::Leaderboard { limit } => {
            display::print_leaderboard(&services.loyalty.leaderboard(limit).await?);
        }
    }
    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    services: &Services,
    mode: Mode,
    user: Option<String>,
    item: Option<String>,
    limit: Option<usize>,
    explain: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    let item_for = |mode: &str| {
        item.clone()
            .ok_or_else(|| anyhow!("--item is required for {} recommendations", mode))
    };
    let mode = match mode {
        Mode::Personalized => RecommendationMode::Personalized,
        Mode::Trending => RecommendationMode::Trending,
        Mode::Complementary => RecommendationMode::Complementary(item_for("complementary")?),
        Mode::Similar => RecommendationMode::Similar(item_for("similar")?),
        Mode::TimeBased => RecommendationMode::TimeBased,
    };
    let limit = limit.unwrap_or_else(|| services.recommendations.count());

    let recommendations = services
        .recommendations
        .get_recommendations(user.as_deref(), &mode, limit, now)
        .await?;
    display::print_recommendations(&recommendations, explain);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(services: &Services, store: &dyn DocumentStore, requests: usize) -> Result<()> {
    let users: Vec<User> = store::decode_all(&store.all(collections::USERS).await?)?;
    if users.is_empty() {
        bail!("Register at least one user before benchmarking");
    }
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    // Pick random registered users
    let user_ids: Vec<String> = {
        let mut rng = rand::rng();
        (0..requests)
            .map(|_| users[rng.random_range(0..users.len())].id.clone())
            .collect()
    };

    // Use tokio::spawn to make concurrent requests
    let started = Instant::now();
    let mut handles = vec![];
    for user_id in user_ids {
        let orchestrator = services.recommendations.clone();
        let count = orchestrator.count();
        let handle = tokio::spawn(async move {
            let start = Instant::now();
            orchestrator.personalized(Some(&user_id), count).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let wall_time = started.elapsed();

    let total_time: std::time::Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// MIME type from the file extension
fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_checkout() {
        let cli = Cli::try_parse_from([
            "smokeville",
            "--no-delay",
            "order",
            "checkout",
            "--user",
            "u1",
            "--item",
            "8 Smoked Wings:2",
            "--item",
            "Margherita Pizza",
            "--type",
            "delivery",
            "--phone",
            "0821234567",
            "--payment",
            "card",
        ])
        .unwrap();

        assert!(cli.no_delay);
        match cli.command {
            Commands::Order {
                action:
                    OrderAction::Checkout {
                        items,
                        order_type,
                        payment,
                        ..
                    },
            } => {
                assert_eq!(items.len(), 2);
                assert_eq!(order_type, OrderType::Delivery);
                assert_eq!(payment, Some(PaymentMethod::Card));
            }
            _ => panic!("expected order checkout"),
        }
    }

    #[test]
    fn test_cli_parses_booking_slot() {
        let cli = Cli::try_parse_from([
            "smokeville",
            "booking",
            "availability",
            "--date",
            "2025-12-24",
            "--time",
            "19:30",
        ])
        .unwrap();
        match cli.command {
            Commands::Booking {
                action: BookingAction::Availability { date, time },
            } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 12, 24).unwrap());
                assert_eq!(time, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
            }
            _ => panic!("expected booking availability"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_spice() {
        assert!(
            Cli::try_parse_from(["smokeville", "preferences", "--user", "u1", "--spice", "volcanic"])
                .is_err()
        );
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("braai.JPG")), "image/jpeg");
        assert_eq!(guess_content_type(Path::new("tour.mp4")), "video/mp4");
        assert_eq!(guess_content_type(Path::new("menu.pdf")), "application/octet-stream");
    }
}
