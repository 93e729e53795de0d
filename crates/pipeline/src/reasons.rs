//! Short human-readable explanations for personalized picks.

use domain::MenuItem;
use sources::UserContext;

pub const FALLBACK_REASON: &str = "Recommended for you";
const MAX_REASONS: usize = 2;
const SEPARATOR: &str = " • ";

/// Build the reason line for an item, e.g. "You love pizza • Try something new".
pub fn explain(item: &MenuItem, context: &UserContext) -> String {
    let mut reasons = Vec::with_capacity(MAX_REASONS);

    if context.loves_category(&item.category) {
        reasons.push(format!("You love {}", item.category));
    }
    if context.times_ordered(&item.name) == 0 {
        reasons.push("Try something new".to_string());
    }
    if item.has_tag("popular") {
        reasons.push("Customer favorite".to_string());
    }
    if item.has_tag("premium") {
        reasons.push("Premium quality".to_string());
    }
    if item.spice_level == context.spice_level {
        reasons.push("Perfect spice level".to_string());
    }

    if reasons.is_empty() {
        return FALLBACK_REASON.to_string();
    }
    reasons.truncate(MAX_REASONS);
    reasons.join(SEPARATOR)
}
