use std::collections::{BTreeMap, HashMap, HashSet};

use crate::store::Recipe;

/// Day order; a repeated recipe keeps its first slot, unassigned ones are dropped.
pub fn order_by_day(recipes: Vec<Recipe>, ids_per_day: &BTreeMap<u32, Vec<String>>) -> Vec<Recipe> {
    let mut by_id: HashMap<String, Recipe> = HashMap::with_capacity(recipes.len());
    for recipe in recipes {
        if let Some(id) = recipe.edamam_id.clone().filter(|id| !id.is_empty()) {
            by_id.entry(id).or_insert(recipe);
        }
    }

    let mut emitted = HashSet::new();
    let mut ordered = Vec::new();
    for ids in ids_per_day.values() {
        for id in ids {
            if !emitted.insert(id.as_str()) {
                continue;
            }
            if let Some(recipe) = by_id.remove(id) {
                ordered.push(recipe);
            }
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn recipe(edamam_id: &str) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            name: edamam_id.to_uppercase(),
            kcal: 500,
            servings: 2,
            carbohydrates: 50,
            fats: 20,
            protein: 30,
            ingredient_lines: String::new(),
            edamam_id: Some(edamam_id.to_string()),
            image_key: None,
            user_id: None,
            finished: false,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn days(entries: &[(u32, Vec<&str>)]) -> BTreeMap<u32, Vec<String>> {
        entries
            .iter()
            .map(|(d, ids)| (*d, ids.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    fn names(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn orders_by_day_then_assignment() {
        let all = vec![recipe("c"), recipe("b"), recipe("a")];
        let ordered = order_by_day(all, &days(&[(2, vec!["c"]), (1, vec!["a", "b"])]));
        assert_eq!(names(&ordered), ["A", "B", "C"]);
    }

    #[test]
    fn unassigned_recipes_are_dropped() {
        let all = vec![recipe("a"), recipe("x"), recipe("b")];
        let ordered = order_by_day(all, &days(&[(1, vec!["a"]), (3, vec!["b"])]));
        assert_eq!(names(&ordered), ["A", "B"]);
    }

    #[test]
    fn repeated_assignment_emits_once() {
        let all = vec![recipe("a"), recipe("b")];
        let ordered = order_by_day(all, &days(&[(1, vec!["a", "b"]), (2, vec!["a"])]));
        assert_eq!(names(&ordered), ["A", "B"]);
    }

    #[test]
    fn missing_recipe_leaves_no_hole() {
        let all = vec![recipe("b")];
        let ordered = order_by_day(all, &days(&[(1, vec!["a", "b"])]));
        assert_eq!(names(&ordered), ["B"]);
    }
}
