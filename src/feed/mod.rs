//! Feed query engine.
//!
//! A meal is shown when it passes both filters:
//! - text: the lowercased query is a substring of the title, the description,
//!   or any tag (an empty query passes everything);
//! - tags: the meal carries every required tag, compared exactly.
//!
//! Filtering is stable. Meals keep their input order and are never re-ranked.

pub mod handlers;

use crate::meals::repo_types::Meal;

pub use handlers::router;

#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    needle: String,
    required_tags: Vec<String>,
}

impl FeedQuery {
    pub fn new(query: &str, required_tags: &[String]) -> Self {
        Self {
            needle: query.trim().to_lowercase(),
            required_tags: required_tags.to_vec(),
        }
    }

    pub fn matches(&self, meal: &Meal) -> bool {
        self.matches_text(meal) && self.matches_tags(meal)
    }

    fn matches_text(&self, meal: &Meal) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        let hit = |s: &str| s.to_lowercase().contains(&self.needle);
        hit(meal.title.as_str())
            || hit(meal.description.as_str())
            || meal.tags.iter().any(|t| hit(t.as_str()))
    }

    fn matches_tags(&self, meal: &Meal) -> bool {
        self.required_tags
            .iter()
            .all(|required| meal.tags.iter().any(|t| t == required))
    }
}

pub fn filter_meals(meals: Vec<Meal>, query: &str, required_tags: &[String]) -> Vec<Meal> {
    let q = FeedQuery::new(query, required_tags);
    meals.into_iter().filter(|m| q.matches(m)).collect()
}
