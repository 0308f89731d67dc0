use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

const FIRST_NAMES: &[&str] = &[
    "Olivia", "Liam", "Emma", "Noah", "Ava", "Ethan", "Sophia", "Mason", "Isabella", "Lucas",
    "Mia", "Oliver", "Amelia", "Elijah", "Harper", "James",
];

const CITIES: &[&str] = &[
    "Austin", "Portland", "Denver", "Chicago", "Seattle", "Nashville", "Boston", "Miami",
    "Phoenix", "Atlanta", "Minneapolis", "San Diego",
];

// Shown when the products table is empty.
const FALLBACK_PRODUCTS: &[&str] = &["Classic Tee", "Canvas Tote", "Enamel Mug", "Sticker Pack"];

const DEFAULT_EVENT_COUNT: usize = 6;
const MAX_EVENT_COUNT: usize = 20;

#[derive(Deserialize)]
pub struct SocialProofParams {
    pub count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SocialProofEvent {
    pub name: String,
    pub city: String,
    pub product: String,
    pub minutes_ago: u32,
}

/// Fake "recent purchase" popups for the storefront. Nothing here is real
/// or persisted; every call draws a fresh batch.
pub async fn social_proof(
    State(state): State<SharedState>,
    Query(params): Query<SocialProofParams>,
) -> Result<Json<Vec<SocialProofEvent>>, AppError> {
    let count = params
        .count
        .unwrap_or(DEFAULT_EVENT_COUNT)
        .min(MAX_EVENT_COUNT);

    let products = db::products::list_names(&state.pool).await?;

    Ok(Json(generate_events(&products, count)))
}

fn generate_events(products: &[String], count: usize) -> Vec<SocialProofEvent> {
    let mut rng = rand::rng();

    (0..count)
        .map(|_| {
            let product = products
                .choose(&mut rng)
                .cloned()
                .unwrap_or_else(|| {
                    FALLBACK_PRODUCTS.choose(&mut rng).unwrap().to_string()
                });

            SocialProofEvent {
                name: FIRST_NAMES.choose(&mut rng).unwrap().to_string(),
                city: CITIES.choose(&mut rng).unwrap().to_string(),
                product,
                minutes_ago: rng.random_range(1..=59),
            }
        })
        .collect()
}

/// 1200x630 share card for link unfurls. Product fields are user-managed
/// content and get XML-escaped before interpolation.
pub async fn product_preview(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let product = db::products::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let svg = render_preview_card(&product.name, &product.tagline, product.price_cents);

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        svg,
    ))
}

fn render_preview_card(name: &str, tagline: &str, price_cents: i64) -> String {
    let name = xml_escape(name);
    let tagline = xml_escape(tagline);
    let price = format_price(price_cents);

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="1200" height="630" viewBox="0 0 1200 630">
  <rect width="1200" height="630" fill="#0f172a"/>
  <rect x="40" y="40" width="1120" height="550" rx="24" fill="#1e293b"/>
  <text x="100" y="260" font-family="sans-serif" font-size="72" font-weight="bold" fill="#f8fafc">{name}</text>
  <text x="100" y="340" font-family="sans-serif" font-size="36" fill="#94a3b8">{tagline}</text>
  <text x="100" y="480" font-family="sans-serif" font-size="56" font-weight="bold" fill="#38bdf8">{price}</text>
  <text x="100" y="540" font-family="sans-serif" font-size="28" fill="#64748b">shopfront</text>
</svg>"##
    )
}

fn format_price(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_respect_count_and_pools() {
        let products = vec!["Classic Tee".to_string()];
        let events = generate_events(&products, 6);
        assert_eq!(events.len(), 6);
        for event in &events {
            assert_eq!(event.product, "Classic Tee");
            assert!(FIRST_NAMES.contains(&event.name.as_str()));
            assert!(CITIES.contains(&event.city.as_str()));
            assert!((1..=59).contains(&event.minutes_ago));
        }
    }

    #[test]
    fn empty_product_table_falls_back_to_static_pool() {
        let events = generate_events(&[], 3);
        for event in &events {
            assert!(FALLBACK_PRODUCTS.contains(&event.product.as_str()));
        }
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price(1999), "$19.99");
        assert_eq!(format_price(500), "$5.00");
        assert_eq!(format_price(5), "$0.05");
    }

    #[test]
    fn preview_card_escapes_markup() {
        let svg = render_preview_card("<Tee> & \"Co\"", "it's nice", 1999);
        assert!(svg.contains("&lt;Tee&gt; &amp; &quot;Co&quot;"));
        assert!(svg.contains("it&apos;s nice"));
        assert!(!svg.contains("<Tee>"));
    }
}
