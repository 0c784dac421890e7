//! Integration tests for ynab-core
//!
//! These run the reqwest client against the mock YNAB HTTP server, then run
//! tools over that client to cover the full request path.

use std::sync::Arc;
use std::time::Duration;

use ynab_core::{
    models::{AccountType, SaveAccount, SaveTransaction, TransactionQuery, TransactionTypeFilter},
    test_utils::MockYnabServer,
    tools::{self, accounts, transactions},
    BudgetResolver, ClientProvider, Error, MockYnab, ToolContext, YnabApi, YnabClient,
};

fn client_for(server: &MockYnabServer, token: &str) -> YnabClient {
    YnabClient::with_base_url(token, &server.url(), Duration::from_secs(5))
        .expect("Failed to build client")
}

// =============================================================================
// Client Tests
// =============================================================================

#[tokio::test]
async fn test_client_sends_bearer_token() {
    let server = MockYnabServer::start().await;
    let client = client_for(&server, "secret-token");

    let user = client.get_user().await.unwrap();
    assert_eq!(user.id, "user-1");
    assert_eq!(server.auth_headers(), vec!["Bearer secret-token".to_string()]);
}

#[tokio::test]
async fn test_client_unwraps_lists() {
    let server = MockYnabServer::start().await;
    let client = client_for(&server, "token");

    let budgets = client.get_budgets(true).await.unwrap();
    assert_eq!(budgets.budgets.len(), 1);
    assert_eq!(budgets.budgets[0].accounts.as_ref().unwrap().len(), 3);

    let accounts = client.get_accounts("last-used", Some(5)).await.unwrap();
    assert_eq!(accounts.accounts.len(), 3);
    assert_eq!(accounts.server_knowledge, 6);

    let call = server.api().calls().into_iter().last().unwrap();
    assert_eq!(call.budget_id.as_deref(), Some("last-used"));
}

#[tokio::test]
async fn test_client_maps_error_body() {
    let server = MockYnabServer::start().await;
    server.api().fail_next(429, "too_many_requests", "Too many requests");
    let client = client_for(&server, "token");

    let err = client.get_user().await.unwrap_err();
    match err {
        Error::Api {
            status,
            name,
            detail,
        } => {
            assert_eq!(status, 429);
            assert_eq!(name, "too_many_requests");
            assert_eq!(detail, "Too many requests");
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_rejected_token_is_unauthorized() {
    let server = MockYnabServer::start_with(Arc::new(MockYnab::new()), Some("good")).await;
    let client = client_for(&server, "bad");

    let err = client.get_user().await.unwrap_err();
    assert!(err.is_unauthorized());

    let good = client_for(&server, "good");
    assert!(good.get_user().await.is_ok());
}

/// Serve one raw HTTP response to the first connection, then close it
async fn raw_upstream(response: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });
    format!("http://{}/v1", addr)
}

#[tokio::test]
async fn test_client_keeps_non_json_error_body() {
    let url = raw_upstream(
        "HTTP/1.1 502 Bad Gateway\r\nContent-Length: 13\r\nConnection: close\r\n\r\nupstream down",
    )
    .await;
    let client = YnabClient::with_base_url("token", &url, Duration::from_secs(5)).unwrap();

    match client.get_user().await.unwrap_err() {
        Error::Api { status, name, detail } => {
            assert_eq!(status, 502);
            assert_eq!(name, "bad gateway");
            assert_eq!(detail, "upstream down");
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_reports_unreadable_error_body() {
    // Declared length is longer than what is sent before the connection closes
    let url = raw_upstream(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\nConnection: close\r\n\r\ntruncated",
    )
    .await;
    let client = YnabClient::with_base_url("token", &url, Duration::from_secs(5)).unwrap();

    match client.get_user().await.unwrap_err() {
        Error::Api { status, detail, .. } => {
            assert_eq!(status, 500);
            assert!(
                detail.starts_with("Failed to read error response"),
                "unexpected detail: {}",
                detail
            );
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_not_found() {
    let server = MockYnabServer::start().await;
    let client = client_for(&server, "token");

    let err = client
        .get_transaction_by_id("budget-1", "does-not-exist")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { status: 404, .. }));
}

#[tokio::test]
async fn test_client_transaction_lifecycle() {
    let server = MockYnabServer::start().await;
    let client = client_for(&server, "token");

    let created = client
        .create_transaction(
            "budget-1",
            &SaveTransaction {
                account_id: Some("acct-checking".into()),
                date: Some("2024-03-18".into()),
                amount: Some(-25000),
                payee_name: Some("Hardware Store".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let transaction = created.transaction.unwrap();
    assert_eq!(transaction.amount, -25000);
    assert_eq!(transaction.iso_date().as_deref(), Some("2024-03-18"));
    assert_eq!(transaction.account_name.as_deref(), Some("Checking"));

    let updated = client
        .update_transaction(
            "budget-1",
            &transaction.id,
            &SaveTransaction {
                memo: Some("hinges".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.memo.as_deref(), Some("hinges"));
    assert_eq!(updated.amount, -25000);

    let deleted = client
        .delete_transaction("budget-1", &transaction.id)
        .await
        .unwrap();
    assert!(deleted.deleted);

    // Only the payload fields that were set go over the wire
    let saved = server.api().saved_transactions();
    assert_eq!(saved[1], SaveTransaction {
        memo: Some("hinges".into()),
        ..Default::default()
    });
}

#[tokio::test]
async fn test_client_transaction_query() {
    let server = MockYnabServer::start().await;
    let client = client_for(&server, "token");

    let list = client
        .get_transactions(
            "budget-1",
            &TransactionQuery {
                since_date: Some("2024-03-01".into()),
                transaction_type: Some(TransactionTypeFilter::Unapproved),
                last_knowledge_of_server: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(list.transactions.len(), 1);
    assert_eq!(list.transactions[0].id, "txn-2");
}

#[tokio::test]
async fn test_client_import_route_is_not_a_transaction_id() {
    let server = MockYnabServer::start().await;
    let client = client_for(&server, "token");

    let imported = client.import_transactions("budget-1").await.unwrap();
    assert_eq!(imported.transaction_ids.len(), 2);
    assert_eq!(
        server.api().calls().last().map(|c| c.operation),
        Some("import_transactions")
    );
}

#[tokio::test]
async fn test_client_categories_and_months() {
    let server = MockYnabServer::start().await;
    let client = client_for(&server, "token");

    let groups = client.get_categories("budget-1", None).await.unwrap();
    assert_eq!(groups.category_groups.len(), 2);

    let month = client
        .update_month_category(
            "budget-1",
            "2024-05-01",
            "cat-groceries",
            &ynab_core::models::SaveMonthCategory { budgeted: 550_000 },
        )
        .await
        .unwrap();
    assert_eq!(month.budgeted, 550_000);

    let fetched = client
        .get_month_category("budget-1", "2024-05-01", "cat-groceries")
        .await
        .unwrap();
    assert_eq!(fetched.budgeted, 550_000);

    let detail = client.get_budget_by_id("budget-1", None).await.unwrap();
    let grouped = detail.budget.grouped_categories().unwrap();
    assert_eq!(grouped[0].categories.len(), 2);
}

#[tokio::test]
async fn test_client_payee_locations() {
    let server = MockYnabServer::start().await;
    let client = client_for(&server, "token");

    let all = client.get_payee_locations("budget-1").await.unwrap();
    assert_eq!(all.len(), 2);

    let by_payee = client
        .get_payee_locations_by_payee("budget-1", "payee-coffee")
        .await
        .unwrap();
    assert_eq!(by_payee.len(), 1);

    let location = client
        .get_payee_location_by_id("budget-1", "loc-1")
        .await
        .unwrap();
    assert_eq!(location.payee_id, "payee-whole-foods");
}

#[tokio::test]
async fn test_client_create_account() {
    let server = MockYnabServer::start().await;
    let client = client_for(&server, "token");

    let account = client
        .create_account(
            "budget-1",
            &SaveAccount {
                name: "Brokerage".into(),
                account_type: AccountType::InvestmentAccount,
                balance: 1_000_000,
            },
        )
        .await
        .unwrap();
    assert_eq!(account.account_type, "investmentAccount");
    assert_eq!(account.balance, 1_000_000);
}

// =============================================================================
// Tools over HTTP
// =============================================================================

fn http_context(server: &MockYnabServer, default_budget: Option<&str>) -> ToolContext {
    ToolContext::new(
        ClientProvider::new(Arc::new(client_for(server, "token"))),
        BudgetResolver::new(default_budget.map(str::to_string)),
    )
}

#[tokio::test]
async fn test_tool_resolves_default_budget_over_http() {
    let server = MockYnabServer::start().await;
    let ctx = http_context(&server, Some("budget-1"));

    let params: accounts::GetAccountsParams = serde_json::from_value(serde_json::json!({})).unwrap();
    let result = accounts::get_accounts(&ctx, params).await.unwrap();
    assert_eq!(result.accounts.len(), 1);

    let call = server.api().calls().into_iter().last().unwrap();
    assert_eq!(call.budget_id.as_deref(), Some("budget-1"));
}

#[tokio::test]
async fn test_tool_error_envelope_over_http() {
    let server = MockYnabServer::start().await;
    server
        .api()
        .fail_next(401, "unauthorized", "Unauthorized");
    let ctx = http_context(&server, None);

    let result = transactions::delete_transaction(
        &ctx,
        transactions::TransactionIdParams {
            transaction_id: "txn-1".into(),
            budget_id: "default".into(),
        },
    )
    .await;
    let value = tools::envelope("delete_transaction", result);
    assert_eq!(
        value,
        serde_json::json!({"error": "YNAB API error 401 (unauthorized): Unauthorized"})
    );

    // The next call goes through normally
    let result = transactions::delete_transaction(
        &ctx,
        transactions::TransactionIdParams {
            transaction_id: "txn-1".into(),
            budget_id: "default".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(result.message, "Transaction txn-1 deleted successfully");
}
