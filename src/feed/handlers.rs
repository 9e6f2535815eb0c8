use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{
    error::{AppError, AppResult},
    meals::repo_types::Meal,
    state::AppState,
};

/// `GET /api/feed?q=<text>&tags=<a,b>`. `tags` may also repeat
/// (`?tags=a&tags=b`); both forms are merged.
#[derive(Debug, Default)]
pub struct FeedParams {
    pub q: String,
    pub tags: Vec<String>,
}

impl FeedParams {
    /// Builds params from raw query pairs. Unknown keys are ignored; a
    /// repeated `q` keeps the last value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "q" => params.q = value,
                "tags" => params.tags.push(value),
                _ => {}
            }
        }
        params
    }

    pub fn required_tags(&self) -> Vec<String> {
        self.tags
            .iter()
            .flat_map(|raw| raw.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/feed", get(get_feed))
}

#[instrument(skip(state, query))]
pub async fn get_feed(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<Json<Vec<Meal>>> {
    let Query(pairs) = query.map_err(|e| AppError::Invalid(e.body_text()))?;
    let params = FeedParams::from_pairs(pairs);
    let meals = state.meals.list_newest_first().await?;
    let total = meals.len();
    let shown = super::filter_meals(meals, &params.q, &params.required_tags());
    debug!(total, shown = shown.len(), "feed filtered");
    Ok(Json(shown))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::test_support::{send, TestApp};

    #[test]
    fn splits_and_trims_tag_list() {
        let p = FeedParams { q: String::new(), tags: vec![" halal, ,vegan ,".into()] };
        assert_eq!(p.required_tags(), vec!["halal", "vegan"]);
        assert!(FeedParams::default().required_tags().is_empty());
    }

    #[test]
    fn repeated_tag_keys_merge_with_comma_lists() {
        let p = FeedParams::from_pairs(vec![
            ("tags".into(), "halal".into()),
            ("q".into(), "old".into()),
            ("tags".into(), "vegan,spicy".into()),
            ("page".into(), "2".into()),
            ("q".into(), "curry".into()),
        ]);
        assert_eq!(p.q, "curry");
        assert_eq!(p.required_tags(), vec!["halal", "vegan", "spicy"]);
    }

    #[tokio::test]
    async fn feed_applies_query_and_tags_over_newest_first_list() {
        let app = TestApp::new();
        for (title, tags) in [
            ("Butter Chicken", json!(["Punjabi", "halal"])),
            ("Ramen", json!(["Japanese", "vegan"])),
            ("Chana Masala", json!(["Punjabi", "vegan", "halal"])),
        ] {
            let (status, _) = send(
                &app.router,
                "POST",
                "/api/meals",
                Some(json!({ "title": title, "price": 5, "servings": 3, "tags": tags })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app.router, "GET", "/api/feed?tags=halal", None).await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<_> = body.as_array().unwrap().iter().map(|m| m["title"].clone()).collect();
        assert_eq!(titles, vec![json!("Chana Masala"), json!("Butter Chicken")]);

        let (_, body) = send(&app.router, "GET", "/api/feed?q=RAMEN", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = send(&app.router, "GET", "/api/feed?tags=halal,vegan", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Chana Masala");

        let (status, body) =
            send(&app.router, "GET", "/api/feed?tags=vegan&tags=halal", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["title"], "Chana Masala");

        let (_, body) = send(&app.router, "GET", "/api/feed", None).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }
}
