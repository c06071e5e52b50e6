//! HTTP client for the Finance Tracker REST API.
//!
//! Every domain request runs through the configured `Pipeline`, which
//! attaches the bearer token and watches for authorization failures.
//! Authentication endpoints go straight to the wire: a 401 from a
//! credential check is a rejection, not an expired session, and must not
//! clear an existing session.

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::api::pipeline::Pipeline;
use crate::api::ApiError;
use crate::auth::Registration;
use crate::models::{
    Account, Budget, Category, NewAccount, NewBudget, NewCategory, NewTransaction, Transaction,
    User,
};

/// HTTP request timeout in seconds.
/// Matches the original client's transport timeout; interactive forms need
/// failures to surface quickly.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Successful login payload.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

/// Registration acknowledgement. Carries no session; login follows.
#[derive(Debug, Deserialize)]
pub struct RegisterAck {
    pub message: String,
    pub user_id: i64,
}

/// API client for the Finance Tracker service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    pipeline: Pipeline,
}

impl ApiClient {
    /// Create a new API client with an empty pipeline.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            pipeline: Pipeline::new(),
        })
    }

    /// Replace the request pipeline, sharing the connection pool.
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    // ===== Authentication (pipeline-bypassing) =====

    /// `POST /auth/login` with the raw credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::json!({ "username": username, "password": password });
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    /// `POST /auth/register`. Returns the creation ack; no session yet.
    pub async fn register(&self, registration: &Registration) -> Result<RegisterAck, ApiError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(registration)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    // ===== Request plumbing =====

    /// Check if response is successful, returning a typed error with the
    /// body's detail if not.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Run a request through the pipeline: outbound stages, send, inbound
    /// stages, then status check.
    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = self.pipeline.prepare(request);
        let response = request.send().await?;
        self.pipeline.observe(response.status());
        Self::check(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self.execute(self.client.get(self.url(path))).await?;
        Ok(response.json().await?)
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path, "POST");
        let response = self
            .execute(self.client.post(self.url(path)).json(body))
            .await?;
        Ok(response.json().await?)
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path, "PUT");
        let response = self
            .execute(self.client.put(self.url(path)).json(body))
            .await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        debug!(path, "DELETE");
        self.execute(self.client.delete(self.url(path))).await?;
        Ok(())
    }

    // ===== Profile =====

    /// Fetch the authenticated user's profile
    pub async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.get("/users/me").await
    }

    // ===== Accounts =====

    pub async fn fetch_accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.get("/accounts").await
    }

    pub async fn fetch_account(&self, account_id: i64) -> Result<Account, ApiError> {
        self.get(&format!("/accounts/{}", account_id)).await
    }

    pub async fn create_account(&self, account: &NewAccount) -> Result<Account, ApiError> {
        self.post("/accounts", account).await
    }

    pub async fn update_account(
        &self,
        account_id: i64,
        account: &NewAccount,
    ) -> Result<Account, ApiError> {
        self.put(&format!("/accounts/{}", account_id), account).await
    }

    pub async fn delete_account(&self, account_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/accounts/{}", account_id)).await
    }

    // ===== Transactions =====

    pub async fn fetch_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        self.get("/transactions").await
    }

    pub async fn fetch_transaction(&self, transaction_id: i64) -> Result<Transaction, ApiError> {
        self.get(&format!("/transactions/{}", transaction_id)).await
    }

    pub async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<Transaction, ApiError> {
        self.post("/transactions", transaction).await
    }

    pub async fn update_transaction(
        &self,
        transaction_id: i64,
        transaction: &NewTransaction,
    ) -> Result<Transaction, ApiError> {
        self.put(&format!("/transactions/{}", transaction_id), transaction)
            .await
    }

    pub async fn delete_transaction(&self, transaction_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/transactions/{}", transaction_id)).await
    }

    // ===== Categories =====

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/categories").await
    }

    pub async fn fetch_category(&self, category_id: i64) -> Result<Category, ApiError> {
        self.get(&format!("/categories/{}", category_id)).await
    }

    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, ApiError> {
        self.post("/categories", category).await
    }

    // ===== Budgets =====

    pub async fn fetch_budgets(&self) -> Result<Vec<Budget>, ApiError> {
        self.get("/budgets").await
    }

    pub async fn create_budget(&self, budget: &NewBudget) -> Result<Budget, ApiError> {
        self.post("/budgets", budget).await
    }

    pub async fn update_budget(&self, budget_id: i64, budget: &NewBudget) -> Result<Budget, ApiError> {
        self.put(&format!("/budgets/{}", budget_id), budget).await
    }

    pub async fn delete_budget(&self, budget_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/budgets/{}", budget_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = ApiClient::new("http://localhost:8000/").expect("Failed to build client");
        assert_eq!(client.url("/accounts"), "http://localhost:8000/accounts");

        let client = ApiClient::new("http://localhost:8000").expect("Failed to build client");
        assert_eq!(client.url("/accounts"), "http://localhost:8000/accounts");
    }

    #[test]
    fn test_parse_login_response() {
        let json = r#"{
            "access_token": "T1",
            "token_type": "bearer",
            "user": {"user_id": 1, "username": "alice", "email": "alice@example.com", "first_name": null, "last_name": null}
        }"#;
        let parsed: LoginResponse = serde_json::from_str(json).expect("Failed to parse login response");
        assert_eq!(parsed.access_token, "T1");
        assert_eq!(parsed.token_type, "bearer");
        assert_eq!(parsed.user.username, "alice");
    }

    #[test]
    fn test_parse_register_ack() {
        let json = r#"{"message": "User created successfully", "user_id": 42}"#;
        let parsed: RegisterAck = serde_json::from_str(json).expect("Failed to parse register ack");
        assert_eq!(parsed.user_id, 42);
    }
}
