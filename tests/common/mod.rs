#![allow(dead_code)]

use std::str::FromStr;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use slotfleet_api::{config::AppConfig, db, AppState};
use tower::ServiceExt;

/// Application router over a fresh in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    token: Option<String>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Build the app after letting the caller adjust the configuration.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        // A single connection keeps every query on the same in-memory database.
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        adjust(&mut cfg);

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let token = cfg.api_token.clone();
        let state = AppState::new(pool, cfg);
        let router = slotfleet_api::app_router(state.clone());

        Self {
            router,
            state,
            token,
        }
    }

    /// Send a request, attaching the configured API token when there is one.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        self.request_with_token(method, uri, body, self.token.as_deref())
            .await
    }

    pub async fn request_with_token(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Status plus parsed JSON body (`Value::Null` for empty bodies).
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    /// POST that must return 201; yields the `data` envelope member.
    pub async fn create(&self, uri: &str, body: Value) -> Value {
        let (status, value) = self.send(Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {value}");
        value["data"].clone()
    }

    /// GET that must return 200; yields the `data` envelope member.
    pub async fn get_data(&self, uri: &str) -> Value {
        let (status, value) = self.send(Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "GET {uri} failed: {value}");
        value["data"].clone()
    }

    pub async fn seed_company(&self, name: &str) -> String {
        let slug = name.to_lowercase().replace(' ', "-");
        let company = self
            .create(
                "/api/v1/companies",
                json!({
                    "name": name,
                    "registration_number": format!("J40/{slug}"),
                    "email": format!("office@{slug}.ro"),
                }),
            )
            .await;
        id_of(&company)
    }

    pub async fn seed_location(&self, name: &str) -> String {
        let company_id = self.seed_company(&format!("{name} Operator")).await;
        let location = self
            .create(
                "/api/v1/locations",
                json!({
                    "company_id": company_id,
                    "name": name,
                    "city": "Cluj-Napoca",
                }),
            )
            .await;
        id_of(&location)
    }
}

pub fn id_of(value: &Value) -> String {
    value["id"]
        .as_str()
        .unwrap_or_else(|| panic!("missing id in {value}"))
        .to_string()
}

/// Money fields serialize as strings; compare them at cent precision.
pub fn money(value: &Value) -> Decimal {
    let decimal = match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("not a money value: {other}"),
    };
    decimal.round_dp(2)
}
