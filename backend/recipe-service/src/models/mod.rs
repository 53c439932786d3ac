use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const ANONYMOUS_USERNAME: &str = "Anonymous";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RecipeCategory {
    Breakfast,
    Lunch,
    Dinner,
    Appetizer,
    Dessert,
    Drink,
}

impl RecipeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeCategory::Breakfast => "Breakfast",
            RecipeCategory::Lunch => "Lunch",
            RecipeCategory::Dinner => "Dinner",
            RecipeCategory::Appetizer => "Appetizer",
            RecipeCategory::Dessert => "Dessert",
            RecipeCategory::Drink => "Drink",
        }
    }

    /// Breakfast, lunch and dinner are grouped as "Meal" in the category browser
    pub fn is_meal(&self) -> bool {
        matches!(
            self,
            RecipeCategory::Breakfast | RecipeCategory::Lunch | RecipeCategory::Dinner
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetails {
    pub servings: String,
    pub cook_time: String,
    pub difficulty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub category: RecipeCategory,
    pub image: String,
    pub details: RecipeDetails,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub video: Option<String>,
}

/// A published review as stored remotely.
///
/// The realtime database keys reviews by a push id that is not part of the
/// record body, so `id` defaults to empty and is filled in by the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub id: String,
    pub recipe_id: String,
    pub user_id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub date: String,
}

impl Review {
    pub fn has_valid_rating(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }
}

/// Mean of a recipe's review ratings, recomputed on every read.
///
/// `Unrated` is distinct from a low average: a recipe with no reviews has no
/// rating at all and never satisfies a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AggregateRating {
    Unrated,
    Rated { average: f64, count: usize },
}

impl AggregateRating {
    pub fn average(&self) -> Option<f64> {
        match self {
            AggregateRating::Unrated => None,
            AggregateRating::Rated { average, .. } => Some(*average),
        }
    }

    pub fn count(&self) -> usize {
        match self {
            AggregateRating::Unrated => 0,
            AggregateRating::Rated { count, .. } => *count,
        }
    }

    /// Inclusive threshold check; always false when unrated
    pub fn meets(&self, threshold: f64) -> bool {
        self.average().is_some_and(|avg| avg >= threshold)
    }

    /// One-decimal label shown next to the star icon
    pub fn display(&self) -> Option<String> {
        self.average().map(|avg| format!("{:.1}", avg))
    }
}

/// A recipe paired with its computed average rating
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub avg_rating: f64,
    pub review_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeRating {
    pub recipe_id: String,
    pub rating: AggregateRating,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub avatar: Option<u32>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReviewAuthor {
    pub username: String,
    pub avatar: Option<u32>,
}

impl ReviewAuthor {
    pub fn anonymous() -> Self {
        Self {
            username: ANONYMOUS_USERNAME.to_string(),
            avatar: None,
        }
    }
}

impl From<UserProfile> for ReviewAuthor {
    fn from(profile: UserProfile) -> Self {
        Self {
            username: profile.username,
            avatar: profile.avatar,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewWithAuthor {
    #[serde(flatten)]
    pub review: Review,
    pub author: ReviewAuthor,
}

/// Review submission from the write-review screen
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewReview {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: u8,
    #[serde(default)]
    #[validate(length(max = 100, message = "comment must be at most 100 characters"))]
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteState {
    pub recipe_id: String,
    pub is_favorite: bool,
}
