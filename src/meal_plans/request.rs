use std::collections::BTreeMap;

use super::targets::NutritionTargets;
use crate::edamam::dto::{Accept, Filter, Fit, MealPlanRequest, MealSlot, PlanSpec, Range, SectionSpec};

pub const MAX_SECTIONS: usize = 5;
pub const MACRO_TOLERANCE_G: i32 = 5;

fn around(target: i32) -> Range {
    Range {
        min: target.saturating_sub(MACRO_TOLERANCE_G),
        max: target.saturating_add(MACRO_TOLERANCE_G),
    }
}

pub fn build_plan_request(
    days: i32,
    meals_per_day: i32,
    targets: &NutritionTargets,
    diet_type: Option<&str>,
) -> MealPlanRequest {
    let section_count = usize::try_from(meals_per_day).unwrap_or(0).min(MAX_SECTIONS);
    let sections: BTreeMap<&'static str, SectionSpec> = MealSlot::ALL
        .iter()
        .take(section_count)
        .map(|slot| {
            let spec = SectionSpec {
                accept: Accept {
                    all: vec![Filter {
                        meal: Some(vec![slot.meal_type().to_string()]),
                        ..Default::default()
                    }],
                },
            };
            (slot.label(), spec)
        })
        .collect();

    let accept = diet_type
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|diet| Accept {
            all: vec![Filter {
                health: Some(vec![diet.to_string()]),
                ..Default::default()
            }],
        });

    MealPlanRequest {
        size: days,
        plan: PlanSpec {
            accept,
            fit: Fit {
                calories: Range {
                    min: targets.min_calories,
                    max: targets.max_calories,
                },
                protein: around(targets.protein),
                carbohydrates: around(targets.carbohydrates),
                fats: around(targets.fats),
            },
            sections,
        },
    }
}
