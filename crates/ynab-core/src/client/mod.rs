//! YNAB API client abstraction
//!
//! # Architecture
//!
//! - `YnabApi` trait: one method per upstream operation the tools use
//! - `YnabClient`: reqwest implementation against the YNAB v1 REST API
//! - `MockYnab`: in-memory implementation with fixtures and call recording
//! - `ClientProvider`: the shared handle built once at startup
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = Config::from_env()?;
//! let clients = ClientProvider::from_config(&config)?;
//!
//! let user = clients.client().get_user().await?;
//! println!("Authenticated as {}", user.id);
//! ```

mod http;
mod mock;

pub use http::YnabClient;
pub use mock::{MockYnab, UpstreamCall};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::models::{
    Account, AccountList, BudgetDetailData, BudgetSettings, BudgetSummaryList, Category,
    CategoryGroupList, Payee, PayeeList, PayeeLocation, SaveAccount, SaveCategory,
    SaveMonthCategory, SavePayee, SaveTransaction, SaveTransactionsData, Transaction,
    TransactionList, TransactionQuery, TransactionsImportData, User,
};

/// Operations of the YNAB API
///
/// Every method performs exactly one upstream request. Budget ids are passed
/// already resolved (see [`crate::budget::BudgetResolver`]).
#[async_trait]
pub trait YnabApi: Send + Sync {
    /// `GET /user`
    async fn get_user(&self) -> Result<User>;

    /// `GET /budgets`
    async fn get_budgets(&self, include_accounts: bool) -> Result<BudgetSummaryList>;

    /// `GET /budgets/{budget_id}`
    async fn get_budget_by_id(
        &self,
        budget_id: &str,
        last_knowledge_of_server: Option<i64>,
    ) -> Result<BudgetDetailData>;

    /// `GET /budgets/{budget_id}/settings`
    async fn get_budget_settings(&self, budget_id: &str) -> Result<BudgetSettings>;

    /// `GET /budgets/{budget_id}/accounts`
    async fn get_accounts(
        &self,
        budget_id: &str,
        last_knowledge_of_server: Option<i64>,
    ) -> Result<AccountList>;

    /// `GET /budgets/{budget_id}/accounts/{account_id}`
    async fn get_account_by_id(&self, budget_id: &str, account_id: &str) -> Result<Account>;

    /// `POST /budgets/{budget_id}/accounts`
    async fn create_account(&self, budget_id: &str, account: &SaveAccount) -> Result<Account>;

    /// `GET /budgets/{budget_id}/transactions`
    async fn get_transactions(
        &self,
        budget_id: &str,
        query: &TransactionQuery,
    ) -> Result<TransactionList>;

    /// `GET /budgets/{budget_id}/transactions/{transaction_id}`
    async fn get_transaction_by_id(
        &self,
        budget_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction>;

    /// `POST /budgets/{budget_id}/transactions`
    async fn create_transaction(
        &self,
        budget_id: &str,
        transaction: &SaveTransaction,
    ) -> Result<SaveTransactionsData>;

    /// `PUT /budgets/{budget_id}/transactions/{transaction_id}`
    async fn update_transaction(
        &self,
        budget_id: &str,
        transaction_id: &str,
        transaction: &SaveTransaction,
    ) -> Result<Transaction>;

    /// `DELETE /budgets/{budget_id}/transactions/{transaction_id}`
    async fn delete_transaction(&self, budget_id: &str, transaction_id: &str)
        -> Result<Transaction>;

    /// `POST /budgets/{budget_id}/transactions/import`
    async fn import_transactions(&self, budget_id: &str) -> Result<TransactionsImportData>;

    /// `GET /budgets/{budget_id}/categories`
    async fn get_categories(
        &self,
        budget_id: &str,
        last_knowledge_of_server: Option<i64>,
    ) -> Result<CategoryGroupList>;

    /// `GET /budgets/{budget_id}/categories/{category_id}`
    async fn get_category_by_id(&self, budget_id: &str, category_id: &str) -> Result<Category>;

    /// `GET /budgets/{budget_id}/months/{month}/categories/{category_id}`
    async fn get_month_category(
        &self,
        budget_id: &str,
        month: &str,
        category_id: &str,
    ) -> Result<Category>;

    /// `PATCH /budgets/{budget_id}/categories/{category_id}`
    async fn update_category(
        &self,
        budget_id: &str,
        category_id: &str,
        category: &SaveCategory,
    ) -> Result<Category>;

    /// `PATCH /budgets/{budget_id}/months/{month}/categories/{category_id}`
    async fn update_month_category(
        &self,
        budget_id: &str,
        month: &str,
        category_id: &str,
        category: &SaveMonthCategory,
    ) -> Result<Category>;

    /// `GET /budgets/{budget_id}/payees`
    async fn get_payees(
        &self,
        budget_id: &str,
        last_knowledge_of_server: Option<i64>,
    ) -> Result<PayeeList>;

    /// `GET /budgets/{budget_id}/payees/{payee_id}`
    async fn get_payee_by_id(&self, budget_id: &str, payee_id: &str) -> Result<Payee>;

    /// `PATCH /budgets/{budget_id}/payees/{payee_id}`
    async fn update_payee(&self, budget_id: &str, payee_id: &str, payee: &SavePayee)
        -> Result<Payee>;

    /// `GET /budgets/{budget_id}/payee_locations`
    async fn get_payee_locations(&self, budget_id: &str) -> Result<Vec<PayeeLocation>>;

    /// `GET /budgets/{budget_id}/payee_locations/{payee_location_id}`
    async fn get_payee_location_by_id(
        &self,
        budget_id: &str,
        payee_location_id: &str,
    ) -> Result<PayeeLocation>;

    /// `GET /budgets/{budget_id}/payees/{payee_id}/payee_locations`
    async fn get_payee_locations_by_payee(
        &self,
        budget_id: &str,
        payee_id: &str,
    ) -> Result<Vec<PayeeLocation>>;
}

/// Shared upstream client handle
///
/// Built once at startup and passed to everything that needs the API.
/// `client()` always hands out the same instance.
#[derive(Clone)]
pub struct ClientProvider {
    client: Arc<dyn YnabApi>,
}

impl ClientProvider {
    /// Wrap an existing client implementation
    pub fn new(client: Arc<dyn YnabApi>) -> Self {
        Self { client }
    }

    /// Build the HTTP client from configuration.
    ///
    /// Fails when the credential is missing, so misconfiguration surfaces at
    /// startup instead of on the first tool call.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = YnabClient::from_config(config)?;
        tracing::info!("YNAB API client initialized ({})", client.base_url());
        Ok(Self::new(Arc::new(client)))
    }

    /// The shared client handle
    pub fn client(&self) -> Arc<dyn YnabApi> {
        Arc::clone(&self.client)
    }
}
