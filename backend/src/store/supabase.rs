//! Supabase REST (PostgREST) store
//!
//! Talks to `{url}/rest/v1/{table}` with the service key. Rows are the
//! shared models serialized as-is.

use super::{DataStore, DuplicateRecord};
use crate::config::SupabaseConfig;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use diet_tracker_shared::{MealEntry, RecordFilter, SleepSession, StepSession, UserProfile};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

const PROFILES: &str = "user_profiles";
const SLEEP: &str = "sleep_sessions";
const STEPS: &str = "step_sessions";
const MEALS: &str = "meal_entries";

const RETURN_ROWS: &str = "return=representation";
const UPSERT_ROWS: &str = "resolution=merge-duplicates,return=representation";

/// PostgREST client for the diet tracker tables
pub struct SupabaseStore {
    client: Client,
    rest_url: String,
    service_key: SecretString,
}

impl SupabaseStore {
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create Supabase HTTP client")?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            service_key: config.service_key.clone(),
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let key = self.service_key.expose_secret();
        self.client
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", key.as_str())
            .bearer_auth(key)
    }

    async fn rows<T: DeserializeOwned>(&self, request: RequestBuilder, operation: &str) -> Result<Vec<T>> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Supabase {} request failed", operation))?;

        if response.status() == StatusCode::CONFLICT {
            return Err(DuplicateRecord(format!("Row for Supabase {}", operation)).into());
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Supabase {} failed: {} - {}", operation, status, error_text);
            bail!("Supabase {} failed: {}", operation, status);
        }

        let rows = response
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("Failed to parse Supabase {} response", operation))?;
        debug!(operation, rows = rows.len(), "Supabase request completed");
        Ok(rows)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        table: &str,
        time_column: &str,
        user_id: i64,
        filter: &RecordFilter,
    ) -> Result<Vec<T>> {
        let mut params = vec![("user_id".to_string(), format!("eq.{}", user_id))];
        if let Some(from) = filter.from {
            params.push((time_column.to_string(), format!("gte.{}", timestamp(from))));
        }
        if let Some(to) = filter.to {
            params.push((time_column.to_string(), format!("lt.{}", timestamp(to))));
        }
        params.push(("order".to_string(), format!("{}.desc", time_column)));
        params.push(("limit".to_string(), filter.limit.to_string()));

        let request = self.request(Method::GET, table).query(&params);
        self.rows(request, &format!("list {}", table)).await
    }

    async fn get_owned<T: DeserializeOwned>(&self, table: &str, user_id: i64, id: Uuid) -> Result<Option<T>> {
        let request = self
            .request(Method::GET, table)
            .query(&owned_row(user_id, id));
        let rows = self.rows(request, &format!("get {}", table)).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert<T: Serialize + DeserializeOwned>(&self, table: &str, row: &T) -> Result<T> {
        let request = self
            .request(Method::POST, table)
            .header("Prefer", RETURN_ROWS)
            .json(row);
        let rows = self.rows(request, &format!("insert {}", table)).await?;
        match rows.into_iter().next() {
            Some(row) => Ok(row),
            None => bail!("Supabase insert into {} returned no row", table),
        }
    }

    async fn update_owned<T: Serialize + DeserializeOwned>(
        &self,
        table: &str,
        user_id: i64,
        id: Uuid,
        row: &T,
    ) -> Result<Option<T>> {
        let request = self
            .request(Method::PATCH, table)
            .query(&owned_row(user_id, id))
            .header("Prefer", RETURN_ROWS)
            .json(row);
        let rows = self.rows(request, &format!("update {}", table)).await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_where(&self, table: &str, params: &[(String, String)]) -> Result<bool> {
        let request = self
            .request(Method::DELETE, table)
            .query(params)
            .header("Prefer", RETURN_ROWS);
        let rows: Vec<serde_json::Value> = self.rows(request, &format!("delete {}", table)).await?;
        Ok(!rows.is_empty())
    }
}

fn timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn owned_row(user_id: i64, id: Uuid) -> [(String, String); 2] {
    [
        ("id".to_string(), format!("eq.{}", id)),
        ("user_id".to_string(), format!("eq.{}", user_id)),
    ]
}

#[async_trait]
impl DataStore for SupabaseStore {
    fn name(&self) -> &'static str {
        "supabase"
    }

    async fn health_check(&self) -> Result<()> {
        let request = self
            .request(Method::GET, PROFILES)
            .query(&[("select", "telegram_id"), ("limit", "1")]);
        self.rows::<serde_json::Value>(request, "health check")
            .await
            .map(|_| ())
    }

    async fn get_profile(&self, telegram_id: i64) -> Result<Option<UserProfile>> {
        let request = self
            .request(Method::GET, PROFILES)
            .query(&[("telegram_id", format!("eq.{}", telegram_id))]);
        let rows = self.rows(request, "get profile").await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<UserProfile> {
        let request = self
            .request(Method::POST, PROFILES)
            .query(&[("on_conflict", "telegram_id")])
            .header("Prefer", UPSERT_ROWS)
            .json(profile);
        let rows = self.rows(request, "upsert profile").await?;
        match rows.into_iter().next() {
            Some(row) => Ok(row),
            None => bail!("Supabase profile upsert returned no row"),
        }
    }

    async fn delete_profile(&self, telegram_id: i64) -> Result<bool> {
        self.delete_where(
            PROFILES,
            &[("telegram_id".to_string(), format!("eq.{}", telegram_id))],
        )
        .await
    }

    async fn list_sleep(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<SleepSession>> {
        self.list(SLEEP, "start_time", user_id, filter).await
    }

    async fn get_sleep(&self, user_id: i64, id: Uuid) -> Result<Option<SleepSession>> {
        self.get_owned(SLEEP, user_id, id).await
    }

    async fn insert_sleep(&self, session: &SleepSession) -> Result<SleepSession> {
        self.insert(SLEEP, session).await
    }

    async fn update_sleep(&self, session: &SleepSession) -> Result<Option<SleepSession>> {
        self.update_owned(SLEEP, session.user_id, session.id, session)
            .await
    }

    async fn delete_sleep(&self, user_id: i64, id: Uuid) -> Result<bool> {
        self.delete_where(SLEEP, &owned_row(user_id, id)).await
    }

    async fn list_steps(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<StepSession>> {
        self.list(STEPS, "start_time", user_id, filter).await
    }

    async fn get_steps(&self, user_id: i64, id: Uuid) -> Result<Option<StepSession>> {
        self.get_owned(STEPS, user_id, id).await
    }

    async fn insert_steps(&self, session: &StepSession) -> Result<StepSession> {
        self.insert(STEPS, session).await
    }

    async fn update_steps(&self, session: &StepSession) -> Result<Option<StepSession>> {
        self.update_owned(STEPS, session.user_id, session.id, session)
            .await
    }

    async fn delete_steps(&self, user_id: i64, id: Uuid) -> Result<bool> {
        self.delete_where(STEPS, &owned_row(user_id, id)).await
    }

    async fn list_meals(&self, user_id: i64, filter: &RecordFilter) -> Result<Vec<MealEntry>> {
        self.list(MEALS, "eaten_at", user_id, filter).await
    }

    async fn get_meal(&self, user_id: i64, id: Uuid) -> Result<Option<MealEntry>> {
        self.get_owned(MEALS, user_id, id).await
    }

    async fn insert_meal(&self, meal: &MealEntry) -> Result<MealEntry> {
        self.insert(MEALS, meal).await
    }

    async fn update_meal(&self, meal: &MealEntry) -> Result<Option<MealEntry>> {
        self.update_owned(MEALS, meal.user_id, meal.id, meal).await
    }

    async fn delete_meal(&self, user_id: i64, id: Uuid) -> Result<bool> {
        self.delete_where(MEALS, &owned_row(user_id, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> SupabaseStore {
        SupabaseStore::new(&SupabaseConfig {
            url: server.uri(),
            service_key: SecretString::new("service-key".to_string()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn profile_row() -> serde_json::Value {
        json!({
            "telegram_id": 42,
            "username": "ann",
            "first_name": "Ann",
            "last_name": null,
            "age": 30,
            "gender": "female",
            "weight_kg": 60.0,
            "height_cm": 165.0,
            "activity_level": "moderate",
            "goal": "maintain",
            "target_weight_kg": null,
            "bmr": 1384,
            "daily_calories": 2145,
            "created_at": "2024-06-01T08:00:00Z",
            "updated_at": "2024-06-01T08:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_get_profile_sends_keys_and_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/user_profiles"))
            .and(query_param("telegram_id", "eq.42"))
            .and(header("apikey", "service-key"))
            .and(header("authorization", "Bearer service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([profile_row()])))
            .expect(1)
            .mount(&server)
            .await;

        let profile = store_for(&server).get_profile(42).await.unwrap().unwrap();
        assert_eq!(profile.telegram_id, 42);
        assert_eq!(profile.daily_calories, 2145);
    }

    #[tokio::test]
    async fn test_missing_profile_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/user_profiles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        assert!(store_for(&server).get_profile(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_profile_uses_on_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/user_profiles"))
            .and(query_param("on_conflict", "telegram_id"))
            .and(body_partial_json(json!({"telegram_id": 42, "gender": "female"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([profile_row()])))
            .expect(1)
            .mount(&server)
            .await;

        let profile: UserProfile = serde_json::from_value(profile_row()).unwrap();
        let stored = store_for(&server).upsert_profile(&profile).await.unwrap();
        assert_eq!(stored, profile);
    }

    #[tokio::test]
    async fn test_list_meals_builds_window_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/meal_entries"))
            .and(query_param("user_id", "eq.42"))
            .and(query_param("order", "eaten_at.desc"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let filter = RecordFilter {
            from: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
            to: None,
            limit: 10,
        };
        let meals = store_for(&server).list_meals(42, &filter).await.unwrap();
        assert!(meals.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_whether_a_row_went_away() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/sleep_sessions"))
            .and(query_param("id", format!("eq.{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": id}])))
            .mount(&server)
            .await;

        assert!(store_for(&server).delete_sleep(42, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let store = store_for(&server);
        assert!(store.get_profile(1).await.is_err());
        assert!(store.health_check().await.is_err());
    }

    #[test]
    fn test_timestamp_format() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
        assert_eq!(timestamp(ts), "2024-06-01T08:30:00.000000Z");
    }
}
