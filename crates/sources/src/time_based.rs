//! Time-of-day and day-of-week specials.

use crate::types::{CandidateSource, Recommendation};
use chrono::{Datelike, Timelike, Weekday};
use domain::MenuCatalog;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const MONDAY_SPECIAL: &str = "Mogodu Special";
pub const MONDAY_SCORE: i32 = 100;
pub const LATE_NIGHT_SCORE: i32 = 90;

const BREAKFAST_START: u32 = 6;
const BREAKFAST_END: u32 = 10;
const LATE_NIGHT_START: u32 = 20;
const LATE_NIGHT_ITEMS: usize = 3;

#[derive(Clone)]
pub struct TimeBasedSource {
    catalog: Arc<MenuCatalog>,
}

impl TimeBasedSource {
    pub fn new(catalog: Arc<MenuCatalog>) -> Self {
        Self { catalog }
    }

    /// Specials for a moment in the restaurant's local time.
    ///
    /// Monday wins over the hour rules. Breakfast hours (06:00 to 10:00)
    /// have no specials; from 20:00 comfort food and pizza are suggested.
    #[instrument(skip_all, fields(weekday = ?at.weekday(), hour = at.hour()))]
    pub fn get_candidates<T: Datelike + Timelike>(&self, at: &T) -> Vec<Recommendation> {
        if at.weekday() == Weekday::Mon {
            if let Some(special) = self.catalog.get(MONDAY_SPECIAL) {
                return vec![Recommendation::from_item(
                    special,
                    MONDAY_SCORE,
                    "It's Mogodu Monday!",
                    CandidateSource::TimeBased,
                )];
            }
            debug!("{} missing from the menu", MONDAY_SPECIAL);
        }

        let hour = at.hour();
        if (BREAKFAST_START..BREAKFAST_END).contains(&hour) {
            return Vec::new();
        }

        if hour >= LATE_NIGHT_START {
            return self
                .catalog
                .items()
                .iter()
                .filter(|item| item.has_tag("comfort-food") || item.category == "pizza")
                .take(LATE_NIGHT_ITEMS)
                .map(|item| {
                    Recommendation::from_item(
                        item,
                        LATE_NIGHT_SCORE,
                        "Perfect for late night",
                        CandidateSource::TimeBased,
                    )
                })
                .collect();
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn source() -> TimeBasedSource {
        TimeBasedSource::new(Arc::new(MenuCatalog::smokeville()))
    }

    // 2025-03-10 is a Monday, 2025-03-12 a Wednesday
    fn at(day: u32, hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_monday_special() {
        let specials = source().get_candidates(&at(10, 7));
        assert_eq!(specials.len(), 1);
        assert_eq!(specials[0].name, MONDAY_SPECIAL);
        assert_eq!(specials[0].score, MONDAY_SCORE);
        assert_eq!(specials[0].reason, "It's Mogodu Monday!");
    }

    #[test]
    fn test_breakfast_has_nothing() {
        assert!(source().get_candidates(&at(12, 6)).is_empty());
        assert!(source().get_candidates(&at(12, 9)).is_empty());
    }

    #[test]
    fn test_late_night() {
        let specials = source().get_candidates(&at(12, 21));
        let names: Vec<&str> = specials.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(
            names,
            vec!["Margherita Pizza", "Peri-Peri Chicken Pizza", "Beef Burger Deluxe"]
        );
        assert!(specials.iter().all(|r| r.reason == "Perfect for late night"));
    }

    #[test]
    fn test_afternoon_has_nothing() {
        assert!(source().get_candidates(&at(12, 10)).is_empty());
        assert!(source().get_candidates(&at(12, 19)).is_empty());
    }

    #[test]
    fn test_monday_without_special_uses_hour_rules() {
        let catalog = MenuCatalog::from_items(
            MenuCatalog::smokeville()
                .items()
                .iter()
                .filter(|item| item.name != MONDAY_SPECIAL)
                .cloned()
                .collect(),
        )
        .unwrap();
        let source = TimeBasedSource::new(Arc::new(catalog));
        assert_eq!(source.get_candidates(&at(10, 22)).len(), 3);
    }
}
