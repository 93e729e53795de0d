//! Flat bonuses for tagged items.

use crate::traits::ScoreRule;
use domain::MenuItem;
use sources::UserContext;

pub struct TagBonusRule {
    name: String,
    tag: String,
    bonus: i32,
}

impl TagBonusRule {
    pub fn new(tag: impl Into<String>, bonus: i32) -> Self {
        let tag = tag.into();
        Self {
            name: format!("TagBonusRule({})", tag),
            tag,
            bonus,
        }
    }

    pub fn popular() -> Self {
        Self::new("popular", 10)
    }

    pub fn premium() -> Self {
        Self::new("premium", 5)
    }
}

impl ScoreRule for TagBonusRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self, item: &MenuItem, _context: &UserContext) -> i32 {
        if item.has_tag(&self.tag) { self.bonus } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::MenuCatalog;

    #[test]
    fn test_tag_bonus() {
        let catalog = MenuCatalog::smokeville();
        let context = UserContext::anonymous();

        let popular = TagBonusRule::popular();
        let premium = TagBonusRule::premium();
        let ribs = catalog.get("BBQ Ribs Platter").unwrap();
        let chicken = catalog.get("Smoked Full Chicken").unwrap();

        assert_eq!(popular.score(chicken, &context), 10);
        assert_eq!(popular.score(ribs, &context), 0);
        assert_eq!(premium.score(ribs, &context), 5);
        assert_eq!(premium.name(), "TagBonusRule(premium)");
    }
}
