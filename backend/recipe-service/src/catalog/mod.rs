//! Static recipe catalog.
//!
//! Recipes are loaded once at startup and never change while the service
//! runs. Order is significant: it is the display order of the recipe lists
//! and the tie-break order of the trending selection.
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::{Recipe, RecipeCategory};

const SAMPLE_CATALOG: &str = include_str!("../../data/recipes.json");

/// Category browser selection; `Meal` spans breakfast, lunch and dinner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    Meal,
    Only(RecipeCategory),
}

impl CategoryFilter {
    pub fn matches(&self, category: RecipeCategory) -> bool {
        match self {
            CategoryFilter::Meal => category.is_meal(),
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let filter = match s.to_ascii_lowercase().as_str() {
            "meal" => CategoryFilter::Meal,
            "breakfast" => CategoryFilter::Only(RecipeCategory::Breakfast),
            "lunch" => CategoryFilter::Only(RecipeCategory::Lunch),
            "dinner" => CategoryFilter::Only(RecipeCategory::Dinner),
            "appetizer" => CategoryFilter::Only(RecipeCategory::Appetizer),
            "dessert" => CategoryFilter::Only(RecipeCategory::Dessert),
            "drink" => CategoryFilter::Only(RecipeCategory::Drink),
            other => {
                return Err(AppError::InvalidInput(format!(
                    "unknown recipe category: {}",
                    other
                )))
            }
        };
        Ok(filter)
    }
}

#[derive(Debug, Clone)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    /// Builds a catalog, rejecting empty or duplicate ids
    pub fn new(recipes: Vec<Recipe>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(recipes.len());
        for recipe in &recipes {
            if recipe.id.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "recipe '{}' has an empty id",
                    recipe.title
                )));
            }
            if !seen.insert(recipe.id.as_str()) {
                return Err(AppError::Config(format!(
                    "duplicate recipe id '{}'",
                    recipe.id
                )));
            }
        }

        Ok(Self { recipes })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let recipes: Vec<Recipe> = serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("invalid recipe catalog: {}", e)))?;
        Self::new(recipes)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("failed to read catalog {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_json(&json)?;

        info!(path = %path.display(), recipes = catalog.len(), "Loaded recipe catalog");
        Ok(catalog)
    }

    /// The catalog bundled with the service
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_CATALOG)
    }

    pub fn all(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn by_category(&self, filter: CategoryFilter) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|recipe| filter.matches(recipe.category))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
