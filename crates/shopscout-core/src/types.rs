use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Product category. `All` doubles as the "no filter" value and as the
/// catch-all for category strings the backend sends that we do not know.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Category {
    #[default]
    All,
    Electronics,
    Fashion,
    Groceries,
}

impl Category {
    /// Every category in sidebar display order.
    pub const ALL_CATEGORIES: [Category; 4] = [
        Category::All,
        Category::Electronics,
        Category::Fashion,
        Category::Groceries,
    ];

    /// Wire name, as sent in the `category` field of a search request.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Electronics => "Electronics",
            Category::Fashion => "Fashion",
            Category::Groceries => "Groceries",
        }
    }

    /// Case-insensitive lookup. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Category> {
        let name = name.trim();
        Self::ALL_CATEGORIES
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::parse(&name).unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who authored a chat turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    #[serde(alias = "bot")]
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A catalog entry as returned by the search backend.
///
/// Products are immutable once received and are replaced wholesale by the
/// next successful search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    #[serde(default)]
    pub category: Category,
    pub price: f64,
    pub rating: f64,
    /// Short specification fragments. Travels as a `|`-delimited string.
    #[serde(default, with = "pipe_delimited")]
    pub specifications: Vec<String>,
    /// Relevance score, present only on search results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Product {
    /// All specification fragments in order.
    pub fn spec_list(&self) -> &[String] {
        &self.specifications
    }

    /// The first `n` specification fragments, as shown on a result card.
    pub fn highlights(&self, n: usize) -> &[String] {
        let end = n.min(self.specifications.len());
        &self.specifications[..end]
    }
}

/// Serde adapter for the `a|b|c` specification encoding.
mod pipe_delimited {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(specs: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&specs.join("|"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(raw
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }
}

// =============================================================================
// Filters
// =============================================================================

/// Inclusive price bounds. `min <= max` is the caller's responsibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Whether the bounds satisfy `min <= max`.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Round both bounds to the nearest multiple of `step`.
    pub fn snap(&self, step: u64) -> Self {
        if step == 0 {
            return *self;
        }
        let round = |v: u64| ((v + step / 2) / step) * step;
        Self {
            min: round(self.min),
            max: round(self.max),
        }
    }
}

/// The user's current search inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub price: PriceRange,
    pub category: Category,
}

impl FilterState {
    /// Empty query, the given price bounds, category `All`.
    pub fn with_price(price: PriceRange) -> Self {
        Self {
            query: String::new(),
            price,
            category: Category::All,
        }
    }
}

/// Length of a query in characters, the unit the search gate counts in.
pub fn query_len(query: &str) -> usize {
    query.chars().count()
}

// =============================================================================
// Chat
// =============================================================================

/// One message in a chat transcript.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Product the assistant recommended alongside this reply, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<Product>,
}

impl ChatTurn {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            created_at: Utc::now(),
            recommended: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, text)
    }

    pub fn with_recommendation(mut self, product: Option<Product>) -> Self {
        self.recommended = product;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "product_id": 7,
            "product_name": "Pixel 8",
            "category": "Electronics",
            "price": 59999,
            "rating": 4.6,
            "specifications": "8GB RAM | 128GB|Tensor G3||OLED",
            "score": 11.2
        }"#
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(Category::All.as_str(), "All");
        assert_eq!(Category::Electronics.to_string(), "Electronics");
        assert_eq!(
            serde_json::to_string(&Category::Groceries).unwrap(),
            "\"Groceries\""
        );
    }

    #[test]
    fn test_category_unknown_falls_back_to_all() {
        let c: Category = serde_json::from_str("\"Furniture\"").unwrap();
        assert_eq!(c, Category::All);
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("fashion"), Some(Category::Fashion));
        assert_eq!(Category::parse(" ALL "), Some(Category::All));
        assert_eq!(Category::parse("toys"), None);
    }

    #[test]
    fn test_product_deserialize_splits_specifications() {
        let p: Product = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(p.product_id, 7);
        assert_eq!(p.category, Category::Electronics);
        assert_eq!(
            p.spec_list(),
            &["8GB RAM", "128GB", "Tensor G3", "OLED"].map(String::from)
        );
        assert_eq!(p.score, Some(11.2));
    }

    #[test]
    fn test_product_without_score_or_specs() {
        let p: Product = serde_json::from_str(
            r#"{"product_id":1,"product_name":"Rice","category":"Groceries","price":120,"rating":4.0}"#,
        )
        .unwrap();
        assert!(p.score.is_none());
        assert!(p.spec_list().is_empty());
    }

    #[test]
    fn test_product_serializes_specs_as_delimited_string() {
        let p: Product = serde_json::from_str(sample_json()).unwrap();
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["specifications"], "8GB RAM|128GB|Tensor G3|OLED");
    }

    #[test]
    fn test_highlights_caps_at_available() {
        let p: Product = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(p.highlights(2).len(), 2);
        assert_eq!(p.highlights(10).len(), 4);
        assert!(p.highlights(0).is_empty());
    }

    #[test]
    fn test_price_range_snap() {
        let r = PriceRange::new(1499, 250_400).snap(1000);
        assert_eq!(r, PriceRange::new(1000, 250_000));
        assert_eq!(PriceRange::new(3, 7).snap(0), PriceRange::new(3, 7));
    }

    #[test]
    fn test_price_range_ordering() {
        assert!(PriceRange::new(0, 0).is_ordered());
        assert!(!PriceRange::new(10, 5).is_ordered());
    }

    #[test]
    fn test_query_len_counts_chars() {
        assert_eq!(query_len(""), 0);
        assert_eq!(query_len("tv"), 2);
        assert_eq!(query_len("é"), 1);
    }

    #[test]
    fn test_chat_role_accepts_bot_alias() {
        let role: ChatRole = serde_json::from_str("\"bot\"").unwrap();
        assert_eq!(role, ChatRole::Assistant);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"assistant\"");
    }

    #[test]
    fn test_chat_turn_constructors() {
        let a = ChatTurn::user("hi");
        let b = ChatTurn::assistant("hello");
        assert_eq!(a.role, ChatRole::User);
        assert_eq!(b.role, ChatRole::Assistant);
        assert_ne!(a.id, b.id);
        assert!(b.recommended.is_none());
    }
}
