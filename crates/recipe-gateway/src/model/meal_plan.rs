//! Meal-plan service records.
//!
//! `GET /mealprep?date=` answers with a list of days, each a list of
//! entries. Only the first entry of the first day is read: it is the week
//! plan a composite recipe links to. Other entries are kept as raw JSON and
//! never checked.
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MealPlanEntry {
    pub week_plan_id: i64,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct MealPlanListing(pub Vec<Value>);

impl MealPlanListing {
    /// The raw entry composite responses are linked to.
    pub fn linked_entry(&self) -> Option<&Value> {
        self.0.first().and_then(|day| day.get(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_linked_entry_is_first_of_first() {
        let listing: MealPlanListing = serde_json::from_value(json!([
            [{"week_plan_id": 3, "weeks": 1}, {"week_plan_id": 4}],
            [{"week_plan_id": 5}]
        ]))
        .unwrap();

        let entry = MealPlanEntry::deserialize(listing.linked_entry().unwrap()).unwrap();
        assert_eq!(entry.week_plan_id, 3);
        assert_eq!(entry.details.get("weeks"), Some(&json!(1)));
    }

    #[test]
    fn test_empty_listing_has_no_link() {
        let listing: MealPlanListing = serde_json::from_value(json!([[]])).unwrap();
        assert!(listing.linked_entry().is_none());

        let listing: MealPlanListing = serde_json::from_value(json!([])).unwrap();
        assert!(listing.linked_entry().is_none());
    }
}
