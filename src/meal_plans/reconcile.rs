use std::collections::{BTreeMap, HashSet};

use futures_util::future::try_join_all;
use tracing::{debug, error, info};

use super::services::GenerationContext;
use crate::edamam::dto::{EdamamRecipe, MealPlanResponse};
use crate::images::archive_recipe_image;
use crate::recipes::services::normalize_ingredient_lines;
use crate::store::{NewRecipe, Recipe};

const RECIPE_MARKER: &str = "#recipe_";

pub fn trimmed_id_from_url(url: &str) -> String {
    match url.to_ascii_lowercase().find(RECIPE_MARKER) {
        Some(i) => url[i + RECIPE_MARKER.len()..].to_string(),
        None => url.to_string(),
    }
}

pub fn ids_per_day(plan: &MealPlanResponse) -> BTreeMap<u32, Vec<String>> {
    let mut out = BTreeMap::new();
    for (day, selection) in (1u32..).zip(plan.selection.iter()) {
        let Some(sections) = &selection.sections else {
            continue;
        };
        let ids: Vec<String> = sections
            .slots()
            .into_iter()
            .filter_map(|(_, slot)| slot?.assigned.as_deref())
            .filter(|url| !url.is_empty())
            .map(trimmed_id_from_url)
            .collect();
        out.insert(day, ids);
    }
    out
}

pub fn recipe_from_edamam(external_id: &str, recipe: &EdamamRecipe, image_key: Option<String>) -> NewRecipe {
    let servings = recipe.effective_yield();
    let per_serving = |total: f64| (total / servings).ceil() as i32;
    NewRecipe {
        name: recipe.label.clone(),
        kcal: recipe.calories_per_serving().ceil() as i32,
        servings: servings.ceil() as i32,
        carbohydrates: per_serving(recipe.total_nutrients.carbohydrates.quantity),
        fats: per_serving(recipe.total_nutrients.fat.quantity),
        protein: per_serving(recipe.total_nutrients.protein.quantity),
        ingredient_lines: normalize_ingredient_lines(&recipe.ingredient_lines.join("\n")),
        edamam_id: Some(external_id.to_string()),
        image_key,
        user_id: None,
    }
}

pub async fn reconcile(
    ctx: &GenerationContext<'_>,
    ids_per_day: &BTreeMap<u32, Vec<String>>,
) -> anyhow::Result<Vec<Recipe>> {
    let wanted: Vec<String> = ids_per_day.values().flatten().cloned().collect();
    let mut recipes = ctx.store.find_recipes_by_edamam_ids(&wanted).await?;

    let missing: Vec<&str> = {
        let known: HashSet<&str> = recipes.iter().filter_map(|r| r.edamam_id.as_deref()).collect();
        let mut seen = HashSet::new();
        wanted
            .iter()
            .map(String::as_str)
            .filter(|id| !known.contains(id) && seen.insert(*id))
            .collect()
    };
    debug!(known = recipes.len(), missing = missing.len(), "recipes matched against store");

    if missing.is_empty() {
        return Ok(recipes);
    }

    let fetched = match try_join_all(missing.iter().map(|id| ctx.planner.get_recipe_info(id))).await {
        Ok(found) => found,
        Err(e) => {
            error!(error = %e, count = missing.len(), "failed to get recipe info from edamam");
            Vec::new()
        }
    };

    let mut to_save = Vec::new();
    for (requested, recipe) in missing.iter().zip(fetched) {
        let Some(recipe) = recipe else {
            debug!(external_id = *requested, "recipe unknown to planner");
            continue;
        };
        let external_id = match trimmed_id_from_url(&recipe.uri) {
            id if id.is_empty() => requested.to_string(),
            id => id,
        };
        let image_key =
            archive_recipe_image(ctx.storage, ctx.images, &external_id, recipe.image.as_deref()).await;
        to_save.push(recipe_from_edamam(&external_id, &recipe, image_key));
    }

    if !to_save.is_empty() {
        let saved = ctx.store.insert_recipes(to_save).await?;
        info!(count = saved.len(), "new recipes saved");
        recipes.extend(saved);
    }
    Ok(recipes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edamam::dto::{DaySections, DaySelection, Nutrient, SlotAssignment, TotalNutrients};

    fn assigned(id: &str) -> Option<SlotAssignment> {
        Some(SlotAssignment {
            assigned: Some(format!("http://www.edamam.com/ontologies/edamam.owl#recipe_{}", id)),
        })
    }

    #[test]
    fn trims_after_marker_case_insensitively() {
        assert_eq!(trimmed_id_from_url("http://x.owl#recipe_abc123"), "abc123");
        assert_eq!(trimmed_id_from_url("http://x.owl#RECIPE_Abc"), "Abc");
        assert_eq!(trimmed_id_from_url("plainid"), "plainid");
        assert_eq!(trimmed_id_from_url(""), "");
    }

    #[test]
    fn ids_follow_slot_order_and_count_every_day() {
        let plan = MealPlanResponse {
            status: Some("OK".into()),
            selection: vec![
                DaySelection {
                    sections: Some(DaySections {
                        dinner: assigned("c"),
                        breakfast: assigned("a"),
                        lunch: Some(SlotAssignment { assigned: None }),
                        ..Default::default()
                    }),
                },
                DaySelection { sections: None },
                DaySelection {
                    sections: Some(DaySections {
                        teatime: assigned("d"),
                        ..Default::default()
                    }),
                },
            ],
        };
        let days = ids_per_day(&plan);
        assert_eq!(days.len(), 2);
        assert_eq!(days[&1], vec!["a".to_string(), "c".to_string()]);
        assert!(!days.contains_key(&2));
        assert_eq!(days[&3], vec!["d".to_string()]);
    }

    #[test]
    fn per_serving_values_round_up() {
        let recipe = EdamamRecipe {
            uri: "http://x.owl#recipe_r1".into(),
            label: "Oat bowl".into(),
            image: None,
            servings: 2.5,
            calories: 1001.0,
            ingredient_lines: vec!["1 cup oats".into(), "milk&&honey".into()],
            total_nutrients: TotalNutrients {
                carbohydrates: Nutrient { quantity: 100.0 },
                fat: Nutrient { quantity: 20.1 },
                protein: Nutrient { quantity: 30.0 },
            },
        };
        let row = recipe_from_edamam("r1", &recipe, Some("recipes/r1.jpg".into()));
        assert_eq!(row.kcal, 401);
        assert_eq!(row.servings, 3);
        assert_eq!(row.carbohydrates, 40);
        assert_eq!(row.fats, 9);
        assert_eq!(row.protein, 12);
        assert_eq!(row.ingredient_lines, "1 cup oats\nmilk\nhoney");
        assert_eq!(row.edamam_id.as_deref(), Some("r1"));
        assert_eq!(row.image_key.as_deref(), Some("recipes/r1.jpg"));
        assert_eq!(row.user_id, None);
    }

    #[test]
    fn zero_yield_counts_as_one_serving() {
        let recipe = EdamamRecipe {
            label: "Snack".into(),
            calories: 99.2,
            ..Default::default()
        };
        let row = recipe_from_edamam("s", &recipe, None);
        assert_eq!(row.kcal, 100);
        assert_eq!(row.servings, 1);
    }
}
