use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A raw location record returned by the places catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCandidate {
    #[serde(default, alias = "location_id", deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, alias = "address_string", deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(
        default,
        alias = "review_count",
        alias = "num_reviews",
        deserialize_with = "lenient_u64"
    )]
    pub review_count: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub photos: Vec<Value>,
    #[serde(default, alias = "web_url", alias = "detail_url")]
    pub detail_url: Option<String>,
}

impl CatalogCandidate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            address: address.into(),
            rating: None,
            review_count: None,
            description: None,
            photos: Vec::new(),
            detail_url: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_review_count(mut self, review_count: u64) -> Self {
        self.review_count = Some(review_count);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_detail_url(mut self, url: impl Into<String>) -> Self {
        self.detail_url = Some(url.into());
        self
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub(crate) fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

/// A candidate that survived filtering, with its personalization score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecommendation {
    #[serde(flatten)]
    pub candidate: CatalogCandidate,
    /// Always within `[0, 1]`
    pub personalization_score: f64,
}

impl RankedRecommendation {
    pub fn new(candidate: CatalogCandidate, personalization_score: f64) -> Self {
        Self {
            candidate,
            personalization_score: personalization_score.clamp(0.0, 1.0),
        }
    }

    pub fn name(&self) -> &str {
        &self.candidate.name
    }
}

// Catalogs disagree on whether category is a string or `{ "name": ... }`,
// and whether numbers are quoted.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Object(map)) => map
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|rating| rating.is_finite()))
}

fn lenient_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().replace(',', "").parse::<u64>().ok(),
        _ => None,
    })
}

fn lenient_vec<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}
