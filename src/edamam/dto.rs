use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Meal-time slots of one planned day, in the order they are served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Teatime,
}

impl MealSlot {
    pub const ALL: [MealSlot; 5] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
        MealSlot::Teatime,
    ];

    /// Section key used by the planner in both request and response.
    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
            MealSlot::Snack => "Snack",
            MealSlot::Teatime => "Teatime",
        }
    }

    /// Edamam `mealType` filter value for this slot.
    pub fn meal_type(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch | MealSlot::Dinner => "lunch/dinner",
            MealSlot::Snack => "snack",
            MealSlot::Teatime => "teatime",
        }
    }
}

// ---- meal planner request ----

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MealPlanRequest {
    pub size: i32,
    pub plan: PlanSpec,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<Accept>,
    pub fit: Fit,
    pub sections: BTreeMap<&'static str, SectionSpec>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Accept {
    pub all: Vec<Filter>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Fit {
    #[serde(rename = "ENERC_KCAL")]
    pub calories: Range,
    #[serde(rename = "PROCNT")]
    pub protein: Range,
    #[serde(rename = "CHOCDF")]
    pub carbohydrates: Range,
    #[serde(rename = "FASAT")]
    pub fats: Range,
}

/// Inclusive min/max quantity.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Range {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SectionSpec {
    pub accept: Accept,
}

// ---- meal planner response ----

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealPlanResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub selection: Vec<DaySelection>,
}

impl MealPlanResponse {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("OK")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaySelection {
    #[serde(default)]
    pub sections: Option<DaySections>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DaySections {
    #[serde(rename = "Breakfast", default)]
    pub breakfast: Option<SlotAssignment>,
    #[serde(rename = "Lunch", default)]
    pub lunch: Option<SlotAssignment>,
    #[serde(rename = "Dinner", default)]
    pub dinner: Option<SlotAssignment>,
    #[serde(rename = "Snack", default)]
    pub snack: Option<SlotAssignment>,
    #[serde(rename = "Teatime", default)]
    pub teatime: Option<SlotAssignment>,
}

impl DaySections {
    /// Every slot of the day in serving order; unfilled slots are `None`.
    pub fn slots(&self) -> [(MealSlot, Option<&SlotAssignment>); 5] {
        [
            (MealSlot::Breakfast, self.breakfast.as_ref()),
            (MealSlot::Lunch, self.lunch.as_ref()),
            (MealSlot::Dinner, self.dinner.as_ref()),
            (MealSlot::Snack, self.snack.as_ref()),
            (MealSlot::Teatime, self.teatime.as_ref()),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotAssignment {
    #[serde(default)]
    pub assigned: Option<String>,
}

// ---- recipe detail ----

#[derive(Debug, Clone, Deserialize)]
pub struct RecipeInfoResponse {
    pub recipe: EdamamRecipe,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EdamamRecipe {
    #[serde(default)]
    pub uri: String,
    pub label: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "yield", default)]
    pub servings: f64,
    /// Whole-recipe energy in kcal.
    #[serde(default)]
    pub calories: f64,
    #[serde(rename = "ingredientLines", default)]
    pub ingredient_lines: Vec<String>,
    #[serde(rename = "totalNutrients", default)]
    pub total_nutrients: TotalNutrients,
}

impl EdamamRecipe {
    /// Yield used for per-serving division; a missing or zero yield counts as one serving.
    pub fn effective_yield(&self) -> f64 {
        if self.servings > 0.0 {
            self.servings
        } else {
            1.0
        }
    }

    pub fn calories_per_serving(&self) -> f64 {
        self.calories / self.effective_yield()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TotalNutrients {
    #[serde(rename = "CHOCDF", default)]
    pub carbohydrates: Nutrient,
    #[serde(rename = "FAT", default)]
    pub fat: Nutrient,
    #[serde(rename = "PROCNT", default)]
    pub protein: Nutrient,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Nutrient {
    #[serde(default)]
    pub quantity: f64,
}
