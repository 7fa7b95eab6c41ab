//! # Meal-Plan Client
use crate::clients::backend_client::BackendClient;
use crate::model::{MealPlanEntry, MealPlanListing, MEAL_PLAN};
use chrono::NaiveDate;
use fanout_framework::{BackendCall, BackendFailure, BackendResult, SharedBackend};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for the meal-plan service.
#[derive(Clone)]
pub struct MealPlanClient {
    backend: SharedBackend,
}

impl MealPlanClient {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    pub fn get_meal_plan_call(date: NaiveDate) -> BackendCall {
        BackendCall::get(MEAL_PLAN, "get_meal_plan", "/mealprep")
            .with_query("date", date.format("%Y-%m-%d").to_string())
    }

    #[instrument(skip(self))]
    pub async fn get_meal_plan(&self, date: NaiveDate, timeout: Duration) -> BackendResult {
        debug!("Sending request");
        self.execute(&Self::get_meal_plan_call(date), timeout).await
    }
}

impl BackendClient for MealPlanClient {
    type Record = MealPlanListing;

    fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    /// Only the linked entry must be a week plan; a listing without one has
    /// nothing to link to.
    fn validate(payload: &Value) -> Result<MealPlanListing, BackendFailure> {
        let schema_error = |e: serde_json::Error| {
            BackendFailure::invalid_response(format!("response does not match the expected schema: {e}"))
        };
        let listing = MealPlanListing::deserialize(payload).map_err(schema_error)?;
        let linked = listing
            .linked_entry()
            .ok_or_else(|| BackendFailure::invalid_response("meal plan has no entries"))?;
        MealPlanEntry::deserialize(linked).map_err(schema_error)?;
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanout_framework::mock::MockBackend;
    use fanout_framework::FailureKind;
    use serde_json::json;
    use std::sync::Arc;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 30).unwrap()
    }

    #[test]
    fn test_call_carries_the_day() {
        let call = MealPlanClient::get_meal_plan_call(date());
        assert_eq!(call.path, "/mealprep");
        assert_eq!(call.query, vec![("date".to_string(), "2024-10-30".to_string())]);
    }

    #[tokio::test]
    async fn test_empty_meal_plan_is_invalid_response() {
        let mock = MockBackend::new(MEAL_PLAN);
        mock.expect_get("/mealprep").return_json(json!([]));
        let client = MealPlanClient::new(Arc::new(mock));

        let failure = client
            .get_meal_plan(date(), Duration::from_secs(1))
            .await
            .unwrap_err();

        assert_eq!(failure.kind, FailureKind::InvalidResponse);
        assert!(failure.message.contains("no entries"));
    }

    #[tokio::test]
    async fn test_only_the_linked_entry_is_checked() {
        let listing = json!([[{"week_plan_id": 3}], [{"note": "rest day"}]]);
        let mock = MockBackend::new(MEAL_PLAN);
        mock.expect_get("/mealprep").return_json(listing.clone());
        let client = MealPlanClient::new(Arc::new(mock));

        let fragment = client.get_meal_plan(date(), Duration::from_secs(1)).await.unwrap();

        assert_eq!(fragment, listing);
    }

    #[tokio::test]
    async fn test_linked_entry_without_week_plan_is_invalid_response() {
        let mock = MockBackend::new(MEAL_PLAN);
        mock.expect_get("/mealprep")
            .return_json(json!([[{"note": "rest day"}], [{"week_plan_id": 4}]]));
        let client = MealPlanClient::new(Arc::new(mock));

        let failure = client
            .get_meal_plan(date(), Duration::from_secs(1))
            .await
            .unwrap_err();

        assert_eq!(failure.kind, FailureKind::InvalidResponse);
        assert!(failure.message.contains("week_plan_id"));
    }

    #[tokio::test]
    async fn test_listing_is_returned_unchanged() {
        let listing = json!([[{"week_plan_id": 3, "weeks": 2, "food": "Stew"}]]);
        let mock = MockBackend::new(MEAL_PLAN);
        mock.expect_get("/mealprep").return_json(listing.clone());
        let client = MealPlanClient::new(Arc::new(mock));

        let fragment = client.get_meal_plan(date(), Duration::from_secs(1)).await.unwrap();

        assert_eq!(fragment, listing);
    }
}
