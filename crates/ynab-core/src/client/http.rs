//! HTTP implementation of the YNAB API
//!
//! Every response body is wrapped as `{"data": {...}}`; failures come back as
//! `{"error": {"id": "401", "name": "unauthorized", "detail": "..."}}`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{Config, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::{Error, Result};
use crate::models::{
    Account, AccountList, BudgetDetailData, BudgetSettings, BudgetSummaryList, Category,
    CategoryGroupList, Payee, PayeeList, PayeeLocation, SaveAccount, SaveCategory,
    SaveMonthCategory, SavePayee, SaveTransaction, SaveTransactionsData, Transaction,
    TransactionList, TransactionQuery, TransactionsImportData, User,
};

use super::YnabApi;

/// reqwest-backed YNAB client using bearer authentication
#[derive(Clone)]
pub struct YnabClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for YnabClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YnabClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Successful response wrapper
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Error response wrapper
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    name: String,
    #[serde(default)]
    detail: String,
}

#[derive(Debug, Serialize)]
struct AccountBody<'a> {
    account: &'a SaveAccount,
}

#[derive(Debug, Serialize)]
struct TransactionBody<'a> {
    transaction: &'a SaveTransaction,
}

#[derive(Debug, Serialize)]
struct CategoryBody<'a, T: Serialize> {
    category: &'a T,
}

#[derive(Debug, Serialize)]
struct PayeeBody<'a> {
    payee: &'a SavePayee,
}

impl YnabClient {
    /// Create a client for the public YNAB API
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(
            api_key,
            DEFAULT_API_URL,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a client against a custom base URL (mock servers, proxies)
    pub fn with_base_url(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config(
                "YNAB_API_KEY environment variable is not set".to_string(),
            ));
        }

        // Validate once so per-request URL building only fails on bad segments
        Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid YNAB API URL {}: {}", base_url, e)))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Create from process configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_base_url(&config.api_key, &config.api_url, config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL, percent-encoding each path segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("Invalid YNAB API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("YNAB API URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!("YNAB {} {}", method, url.path());
        Ok(self
            .http_client
            .request(method, url)
            .bearer_auth(&self.api_key))
    }

    /// Send a request and unwrap the `data` field
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("Failed to read error response: {}", e),
            };
            return Err(match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => Error::api(status.as_u16(), envelope.error.name, envelope.error.detail),
                Err(_) => Error::api(
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("unknown").to_lowercase(),
                    body,
                ),
            });
        }

        let envelope: DataEnvelope<T> = response.json().await?;
        Ok(envelope.data)
    }

    /// Send a request and extract one named field from `data`
    async fn send_field<T: DeserializeOwned>(&self, request: RequestBuilder, field: &str) -> Result<T> {
        let mut data: Map<String, Value> = self.send(request).await?;
        let value = data
            .remove(field)
            .ok_or_else(|| Error::InvalidData(format!("Response is missing '{}'", field)))?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Query pairs for delta requests
fn knowledge_query(last_knowledge_of_server: Option<i64>) -> Vec<(&'static str, String)> {
    last_knowledge_of_server
        .map(|k| vec![("last_knowledge_of_server", k.to_string())])
        .unwrap_or_default()
}

#[async_trait]
impl YnabApi for YnabClient {
    async fn get_user(&self) -> Result<User> {
        let request = self.request(Method::GET, &["user"])?;
        self.send_field(request, "user").await
    }

    async fn get_budgets(&self, include_accounts: bool) -> Result<BudgetSummaryList> {
        let request = self
            .request(Method::GET, &["budgets"])?
            .query(&[("include_accounts", include_accounts)]);
        self.send(request).await
    }

    async fn get_budget_by_id(
        &self,
        budget_id: &str,
        last_knowledge_of_server: Option<i64>,
    ) -> Result<BudgetDetailData> {
        let request = self
            .request(Method::GET, &["budgets", budget_id])?
            .query(&knowledge_query(last_knowledge_of_server));
        self.send(request).await
    }

    async fn get_budget_settings(&self, budget_id: &str) -> Result<BudgetSettings> {
        let request = self.request(Method::GET, &["budgets", budget_id, "settings"])?;
        self.send_field(request, "settings").await
    }

    async fn get_accounts(
        &self,
        budget_id: &str,
        last_knowledge_of_server: Option<i64>,
    ) -> Result<AccountList> {
        let request = self
            .request(Method::GET, &["budgets", budget_id, "accounts"])?
            .query(&knowledge_query(last_knowledge_of_server));
        self.send(request).await
    }

    async fn get_account_by_id(&self, budget_id: &str, account_id: &str) -> Result<Account> {
        let request = self.request(Method::GET, &["budgets", budget_id, "accounts", account_id])?;
        self.send_field(request, "account").await
    }

    async fn create_account(&self, budget_id: &str, account: &SaveAccount) -> Result<Account> {
        let request = self
            .request(Method::POST, &["budgets", budget_id, "accounts"])?
            .json(&AccountBody { account });
        self.send_field(request, "account").await
    }

    async fn get_transactions(
        &self,
        budget_id: &str,
        query: &TransactionQuery,
    ) -> Result<TransactionList> {
        let mut params = knowledge_query(query.last_knowledge_of_server);
        if let Some(since_date) = &query.since_date {
            params.push(("since_date", since_date.clone()));
        }
        if let Some(transaction_type) = query.transaction_type {
            params.push(("type", transaction_type.as_str().to_string()));
        }

        let request = self
            .request(Method::GET, &["budgets", budget_id, "transactions"])?
            .query(&params);
        self.send(request).await
    }

    async fn get_transaction_by_id(
        &self,
        budget_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction> {
        let request = self.request(
            Method::GET,
            &["budgets", budget_id, "transactions", transaction_id],
        )?;
        self.send_field(request, "transaction").await
    }

    async fn create_transaction(
        &self,
        budget_id: &str,
        transaction: &SaveTransaction,
    ) -> Result<SaveTransactionsData> {
        let request = self
            .request(Method::POST, &["budgets", budget_id, "transactions"])?
            .json(&TransactionBody { transaction });
        self.send(request).await
    }

    async fn update_transaction(
        &self,
        budget_id: &str,
        transaction_id: &str,
        transaction: &SaveTransaction,
    ) -> Result<Transaction> {
        let request = self
            .request(
                Method::PUT,
                &["budgets", budget_id, "transactions", transaction_id],
            )?
            .json(&TransactionBody { transaction });
        self.send_field(request, "transaction").await
    }

    async fn delete_transaction(
        &self,
        budget_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction> {
        let request = self.request(
            Method::DELETE,
            &["budgets", budget_id, "transactions", transaction_id],
        )?;
        self.send_field(request, "transaction").await
    }

    async fn import_transactions(&self, budget_id: &str) -> Result<TransactionsImportData> {
        let request = self.request(
            Method::POST,
            &["budgets", budget_id, "transactions", "import"],
        )?;
        self.send(request).await
    }

    async fn get_categories(
        &self,
        budget_id: &str,
        last_knowledge_of_server: Option<i64>,
    ) -> Result<CategoryGroupList> {
        let request = self
            .request(Method::GET, &["budgets", budget_id, "categories"])?
            .query(&knowledge_query(last_knowledge_of_server));
        self.send(request).await
    }

    async fn get_category_by_id(&self, budget_id: &str, category_id: &str) -> Result<Category> {
        let request = self.request(
            Method::GET,
            &["budgets", budget_id, "categories", category_id],
        )?;
        self.send_field(request, "category").await
    }

    async fn get_month_category(
        &self,
        budget_id: &str,
        month: &str,
        category_id: &str,
    ) -> Result<Category> {
        let request = self.request(
            Method::GET,
            &["budgets", budget_id, "months", month, "categories", category_id],
        )?;
        self.send_field(request, "category").await
    }

    async fn update_category(
        &self,
        budget_id: &str,
        category_id: &str,
        category: &SaveCategory,
    ) -> Result<Category> {
        let request = self
            .request(
                Method::PATCH,
                &["budgets", budget_id, "categories", category_id],
            )?
            .json(&CategoryBody { category });
        self.send_field(request, "category").await
    }

    async fn update_month_category(
        &self,
        budget_id: &str,
        month: &str,
        category_id: &str,
        category: &SaveMonthCategory,
    ) -> Result<Category> {
        let request = self
            .request(
                Method::PATCH,
                &["budgets", budget_id, "months", month, "categories", category_id],
            )?
            .json(&CategoryBody { category });
        self.send_field(request, "category").await
    }

    async fn get_payees(
        &self,
        budget_id: &str,
        last_knowledge_of_server: Option<i64>,
    ) -> Result<PayeeList> {
        let request = self
            .request(Method::GET, &["budgets", budget_id, "payees"])?
            .query(&knowledge_query(last_knowledge_of_server));
        self.send(request).await
    }

    async fn get_payee_by_id(&self, budget_id: &str, payee_id: &str) -> Result<Payee> {
        let request = self.request(Method::GET, &["budgets", budget_id, "payees", payee_id])?;
        self.send_field(request, "payee").await
    }

    async fn update_payee(
        &self,
        budget_id: &str,
        payee_id: &str,
        payee: &SavePayee,
    ) -> Result<Payee> {
        let request = self
            .request(Method::PATCH, &["budgets", budget_id, "payees", payee_id])?
            .json(&PayeeBody { payee });
        self.send_field(request, "payee").await
    }

    async fn get_payee_locations(&self, budget_id: &str) -> Result<Vec<PayeeLocation>> {
        let request = self.request(Method::GET, &["budgets", budget_id, "payee_locations"])?;
        self.send_field(request, "payee_locations").await
    }

    async fn get_payee_location_by_id(
        &self,
        budget_id: &str,
        payee_location_id: &str,
    ) -> Result<PayeeLocation> {
        let request = self.request(
            Method::GET,
            &["budgets", budget_id, "payee_locations", payee_location_id],
        )?;
        self.send_field(request, "payee_location").await
    }

    async fn get_payee_locations_by_payee(
        &self,
        budget_id: &str,
        payee_id: &str,
    ) -> Result<Vec<PayeeLocation>> {
        let request = self.request(
            Method::GET,
            &["budgets", budget_id, "payees", payee_id, "payee_locations"],
        )?;
        self.send_field(request, "payee_locations").await
    }
}
