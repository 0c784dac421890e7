//! Test utilities for ynab-core
//!
//! Provides a mock YNAB HTTP server backed by [`MockYnab`], so the reqwest
//! client can be exercised end to end: `{"data": ...}` wrapping, upstream
//! error bodies, bearer authentication and path/query encoding.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::oneshot;

use crate::client::{MockYnab, YnabApi};
use crate::error::{Error, Result};
use crate::models::{
    SaveAccount, SaveCategory, SaveMonthCategory, SavePayee, SaveTransaction, TransactionQuery,
    TransactionTypeFilter,
};

struct ServerState {
    api: Arc<MockYnab>,
    token: Option<String>,
    auth_headers: Mutex<Vec<String>>,
}

type AppState = State<Arc<ServerState>>;

/// Mock YNAB API server for integration tests
pub struct MockYnabServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockYnabServer {
    /// Start on an available port, accepting any bearer token
    pub async fn start() -> Self {
        Self::start_with(Arc::new(MockYnab::new()), None).await
    }

    /// Start over the given mock; when `token` is set, other tokens get a 401
    pub async fn start_with(api: Arc<MockYnab>, token: Option<&str>) -> Self {
        let state = Arc::new(ServerState {
            api,
            token: token.map(str::to_string),
            auth_headers: Mutex::new(Vec::new()),
        });

        let routes = Router::new()
            .route("/user", get(handle_user))
            .route("/budgets", get(handle_budgets))
            .route("/budgets/:budget_id", get(handle_budget))
            .route("/budgets/:budget_id/settings", get(handle_settings))
            .route(
                "/budgets/:budget_id/accounts",
                get(handle_accounts).post(handle_create_account),
            )
            .route("/budgets/:budget_id/accounts/:account_id", get(handle_account))
            .route(
                "/budgets/:budget_id/transactions",
                get(handle_transactions).post(handle_create_transaction),
            )
            .route("/budgets/:budget_id/transactions/import", post(handle_import))
            .route(
                "/budgets/:budget_id/transactions/:transaction_id",
                get(handle_transaction)
                    .put(handle_update_transaction)
                    .delete(handle_delete_transaction),
            )
            .route("/budgets/:budget_id/categories", get(handle_categories))
            .route(
                "/budgets/:budget_id/categories/:category_id",
                get(handle_category).patch(handle_update_category),
            )
            .route(
                "/budgets/:budget_id/months/:month/categories/:category_id",
                get(handle_month_category).patch(handle_update_month_category),
            )
            .route("/budgets/:budget_id/payees", get(handle_payees))
            .route(
                "/budgets/:budget_id/payees/:payee_id",
                get(handle_payee).patch(handle_update_payee),
            )
            .route(
                "/budgets/:budget_id/payees/:payee_id/payee_locations",
                get(handle_locations_by_payee),
            )
            .route("/budgets/:budget_id/payee_locations", get(handle_locations))
            .route(
                "/budgets/:budget_id/payee_locations/:location_id",
                get(handle_location),
            )
            .layer(middleware::from_fn_with_state(state.clone(), check_auth))
            .with_state(state.clone());

        let app = Router::new().nest("/v1", routes);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL including the `/v1` prefix
    pub fn url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// The in-memory API behind the server
    pub fn api(&self) -> Arc<MockYnab> {
        self.state.api.clone()
    }

    /// Authorization headers seen so far, in request order
    pub fn auth_headers(&self) -> Vec<String> {
        self.state
            .auth_headers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockYnabServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Record the Authorization header and enforce the expected token
async fn check_auth(State(state): AppState, request: Request, next: Next) -> Response {
    let auth = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    state
        .auth_headers
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(auth.clone());

    if let Some(token) = &state.token {
        if auth != format!("Bearer {}", token) {
            return respond::<()>(Err(Error::api(401, "unauthorized", "Unauthorized")));
        }
    }

    next.run(request).await
}

/// Wrap a result the way the YNAB API does
fn respond<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(data) => Json(json!({ "data": data })).into_response(),
        Err(Error::Api {
            status,
            name,
            detail,
        }) => {
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let body = json!({
                "error": { "id": status.to_string(), "name": name, "detail": detail }
            });
            (code, Json(body)).into_response()
        }
        Err(e) => {
            let body = json!({
                "error": { "id": "500", "name": "internal_server_error", "detail": e.to_string() }
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

/// Respond with `{"data": {name: value}}`
fn field<T: Serialize>(name: &str, result: Result<T>) -> Response {
    respond(result.and_then(|value| {
        let mut data = serde_json::Map::new();
        data.insert(name.to_string(), serde_json::to_value(value)?);
        Ok(data)
    }))
}

#[derive(Debug, Default, Deserialize)]
struct KnowledgeQuery {
    last_knowledge_of_server: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct BudgetsQuery {
    #[serde(default)]
    include_accounts: bool,
}

#[derive(Debug, Default, Deserialize)]
struct TransactionsQuery {
    since_date: Option<String>,
    #[serde(rename = "type")]
    transaction_type: Option<TransactionTypeFilter>,
    last_knowledge_of_server: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AccountBody {
    account: SaveAccount,
}

#[derive(Debug, Deserialize)]
struct TransactionBody {
    transaction: SaveTransaction,
}

#[derive(Debug, Deserialize)]
struct CategoryBody<T> {
    category: T,
}

#[derive(Debug, Deserialize)]
struct PayeeBody {
    payee: SavePayee,
}

// =============================================================================
// User and budgets
// =============================================================================

async fn handle_user(State(state): AppState) -> Response {
    field("user", state.api.get_user().await)
}

async fn handle_budgets(State(state): AppState, Query(query): Query<BudgetsQuery>) -> Response {
    respond(state.api.get_budgets(query.include_accounts).await)
}

async fn handle_budget(
    State(state): AppState,
    Path(budget_id): Path<String>,
    Query(query): Query<KnowledgeQuery>,
) -> Response {
    respond(
        state
            .api
            .get_budget_by_id(&budget_id, query.last_knowledge_of_server)
            .await,
    )
}

async fn handle_settings(State(state): AppState, Path(budget_id): Path<String>) -> Response {
    field("settings", state.api.get_budget_settings(&budget_id).await)
}

// =============================================================================
// Accounts
// =============================================================================

async fn handle_accounts(
    State(state): AppState,
    Path(budget_id): Path<String>,
    Query(query): Query<KnowledgeQuery>,
) -> Response {
    respond(
        state
            .api
            .get_accounts(&budget_id, query.last_knowledge_of_server)
            .await,
    )
}

async fn handle_account(
    State(state): AppState,
    Path((budget_id, account_id)): Path<(String, String)>,
) -> Response {
    field(
        "account",
        state.api.get_account_by_id(&budget_id, &account_id).await,
    )
}

async fn handle_create_account(
    State(state): AppState,
    Path(budget_id): Path<String>,
    Json(body): Json<AccountBody>,
) -> Response {
    field(
        "account",
        state.api.create_account(&budget_id, &body.account).await,
    )
}

// =============================================================================
// Transactions
// =============================================================================

async fn handle_transactions(
    State(state): AppState,
    Path(budget_id): Path<String>,
    Query(query): Query<TransactionsQuery>,
) -> Response {
    let query = TransactionQuery {
        since_date: query.since_date,
        transaction_type: query.transaction_type,
        last_knowledge_of_server: query.last_knowledge_of_server,
    };
    respond(state.api.get_transactions(&budget_id, &query).await)
}

async fn handle_transaction(
    State(state): AppState,
    Path((budget_id, transaction_id)): Path<(String, String)>,
) -> Response {
    field(
        "transaction",
        state
            .api
            .get_transaction_by_id(&budget_id, &transaction_id)
            .await,
    )
}

async fn handle_create_transaction(
    State(state): AppState,
    Path(budget_id): Path<String>,
    Json(body): Json<TransactionBody>,
) -> Response {
    respond(
        state
            .api
            .create_transaction(&budget_id, &body.transaction)
            .await,
    )
}

async fn handle_update_transaction(
    State(state): AppState,
    Path((budget_id, transaction_id)): Path<(String, String)>,
    Json(body): Json<TransactionBody>,
) -> Response {
    field(
        "transaction",
        state
            .api
            .update_transaction(&budget_id, &transaction_id, &body.transaction)
            .await,
    )
}

async fn handle_delete_transaction(
    State(state): AppState,
    Path((budget_id, transaction_id)): Path<(String, String)>,
) -> Response {
    field(
        "transaction",
        state
            .api
            .delete_transaction(&budget_id, &transaction_id)
            .await,
    )
}

async fn handle_import(State(state): AppState, Path(budget_id): Path<String>) -> Response {
    respond(state.api.import_transactions(&budget_id).await)
}

// =============================================================================
// Categories
// =============================================================================

async fn handle_categories(
    State(state): AppState,
    Path(budget_id): Path<String>,
    Query(query): Query<KnowledgeQuery>,
) -> Response {
    respond(
        state
            .api
            .get_categories(&budget_id, query.last_knowledge_of_server)
            .await,
    )
}

async fn handle_category(
    State(state): AppState,
    Path((budget_id, category_id)): Path<(String, String)>,
) -> Response {
    field(
        "category",
        state.api.get_category_by_id(&budget_id, &category_id).await,
    )
}

async fn handle_update_category(
    State(state): AppState,
    Path((budget_id, category_id)): Path<(String, String)>,
    Json(body): Json<CategoryBody<SaveCategory>>,
) -> Response {
    field(
        "category",
        state
            .api
            .update_category(&budget_id, &category_id, &body.category)
            .await,
    )
}

async fn handle_month_category(
    State(state): AppState,
    Path((budget_id, month, category_id)): Path<(String, String, String)>,
) -> Response {
    field(
        "category",
        state
            .api
            .get_month_category(&budget_id, &month, &category_id)
            .await,
    )
}

async fn handle_update_month_category(
    State(state): AppState,
    Path((budget_id, month, category_id)): Path<(String, String, String)>,
    Json(body): Json<CategoryBody<SaveMonthCategory>>,
) -> Response {
    field(
        "category",
        state
            .api
            .update_month_category(&budget_id, &month, &category_id, &body.category)
            .await,
    )
}

// =============================================================================
// Payees and locations
// =============================================================================

async fn handle_payees(
    State(state): AppState,
    Path(budget_id): Path<String>,
    Query(query): Query<KnowledgeQuery>,
) -> Response {
    respond(
        state
            .api
            .get_payees(&budget_id, query.last_knowledge_of_server)
            .await,
    )
}

async fn handle_payee(
    State(state): AppState,
    Path((budget_id, payee_id)): Path<(String, String)>,
) -> Response {
    field("payee", state.api.get_payee_by_id(&budget_id, &payee_id).await)
}

async fn handle_update_payee(
    State(state): AppState,
    Path((budget_id, payee_id)): Path<(String, String)>,
    Json(body): Json<PayeeBody>,
) -> Response {
    field(
        "payee",
        state
            .api
            .update_payee(&budget_id, &payee_id, &body.payee)
            .await,
    )
}

async fn handle_locations(State(state): AppState, Path(budget_id): Path<String>) -> Response {
    field(
        "payee_locations",
        state.api.get_payee_locations(&budget_id).await,
    )
}

async fn handle_location(
    State(state): AppState,
    Path((budget_id, location_id)): Path<(String, String)>,
) -> Response {
    field(
        "payee_location",
        state
            .api
            .get_payee_location_by_id(&budget_id, &location_id)
            .await,
    )
}

async fn handle_locations_by_payee(
    State(state): AppState,
    Path((budget_id, payee_id)): Path<(String, String)>,
) -> Response {
    field(
        "payee_locations",
        state
            .api
            .get_payee_locations_by_payee(&budget_id, &payee_id)
            .await,
    )
}
