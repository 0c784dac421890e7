//! Transaction tools
//!
//! Amounts are milliunits in both directions: `-25000` is an outflow of
//! 25.00 and reaches the API unchanged.

use serde::{Deserialize, Serialize};

use super::{default_budget_id, ToolContext};
use crate::error::Result;
use crate::models::{
    format_milliunits, ClearedStatus, FlagColor, SaveTransaction, SubTransaction, Transaction,
    TransactionQuery, TransactionTypeFilter,
};

// =============================================================================
// Views
// =============================================================================

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct TransactionView {
    pub id: String,
    pub date: Option<String>,
    pub amount: i64,
    pub amount_formatted: String,
    pub memo: Option<String>,
    pub cleared: String,
    pub approved: bool,
    pub flag_color: Option<String>,
    pub account_id: String,
    pub account_name: Option<String>,
    pub payee_id: Option<String>,
    pub payee_name: Option<String>,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub transfer_account_id: Option<String>,
    pub import_id: Option<String>,
    pub deleted: bool,
    pub subtransactions: Vec<SubTransaction>,
}

impl From<Transaction> for TransactionView {
    fn from(transaction: Transaction) -> Self {
        Self {
            date: transaction.iso_date(),
            amount_formatted: format_milliunits(transaction.amount),
            id: transaction.id,
            amount: transaction.amount,
            memo: transaction.memo,
            cleared: transaction.cleared,
            approved: transaction.approved,
            flag_color: transaction.flag_color,
            account_id: transaction.account_id,
            account_name: transaction.account_name,
            payee_id: transaction.payee_id,
            payee_name: transaction.payee_name,
            category_id: transaction.category_id,
            category_name: transaction.category_name,
            transfer_account_id: transaction.transfer_account_id,
            import_id: transaction.import_id,
            deleted: transaction.deleted,
            subtransactions: transaction.subtransactions,
        }
    }
}

/// Compact form returned after create and update
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct TransactionSummary {
    pub id: String,
    pub date: Option<String>,
    pub amount: i64,
    pub amount_formatted: String,
    pub payee_name: Option<String>,
    pub category_name: Option<String>,
    pub memo: Option<String>,
    pub cleared: String,
    pub approved: bool,
}

impl From<Transaction> for TransactionSummary {
    fn from(transaction: Transaction) -> Self {
        Self {
            date: transaction.iso_date(),
            amount_formatted: format_milliunits(transaction.amount),
            id: transaction.id,
            amount: transaction.amount,
            payee_name: transaction.payee_name,
            category_name: transaction.category_name,
            memo: transaction.memo,
            cleared: transaction.cleared,
            approved: transaction.approved,
        }
    }
}

// =============================================================================
// get_transactions
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetTransactionsParams {
    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,

    #[schemars(description = "Only transactions on or after this date (YYYY-MM-DD)")]
    pub since_date: Option<String>,

    #[schemars(description = "Filter by type: 'uncategorized' or 'unapproved'")]
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionTypeFilter>,

    #[schemars(description = "The starting server knowledge for delta requests")]
    pub last_knowledge_of_server: Option<i64>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct TransactionsResult {
    pub transactions: Vec<TransactionView>,
    pub server_knowledge: i64,
}

pub async fn get_transactions(
    ctx: &ToolContext,
    params: GetTransactionsParams,
) -> Result<TransactionsResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let query = TransactionQuery {
        since_date: params.since_date,
        transaction_type: params.transaction_type,
        last_knowledge_of_server: params.last_knowledge_of_server,
    };

    let response = ctx.api().get_transactions(&budget_id, &query).await?;
    Ok(TransactionsResult {
        transactions: response
            .transactions
            .into_iter()
            .map(TransactionView::from)
            .collect(),
        server_knowledge: response.server_knowledge,
    })
}

// =============================================================================
// get_transaction_by_id / delete_transaction
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct TransactionIdParams {
    #[schemars(description = "The transaction ID")]
    pub transaction_id: String,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

pub async fn get_transaction_by_id(
    ctx: &ToolContext,
    params: TransactionIdParams,
) -> Result<TransactionView> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let transaction = ctx
        .api()
        .get_transaction_by_id(&budget_id, &params.transaction_id)
        .await?;
    Ok(transaction.into())
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct DeleteTransactionResult {
    pub id: String,
    pub deleted: bool,
    pub message: String,
}

pub async fn delete_transaction(
    ctx: &ToolContext,
    params: TransactionIdParams,
) -> Result<DeleteTransactionResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let transaction = ctx
        .api()
        .delete_transaction(&budget_id, &params.transaction_id)
        .await?;

    Ok(DeleteTransactionResult {
        message: format!("Transaction {} deleted successfully", transaction.id),
        id: transaction.id,
        deleted: true,
    })
}

// =============================================================================
// create_transaction
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateTransactionParams {
    #[schemars(description = "Account ID for the transaction")]
    pub account_id: String,

    #[schemars(description = "Amount in milliunits (e.g., -$10.50 = -10500)")]
    pub amount: i64,

    #[schemars(description = "Transaction date (YYYY-MM-DD)")]
    pub date: String,

    #[schemars(description = "Payee name (creates a new payee if it does not exist)")]
    pub payee_name: Option<String>,

    #[schemars(description = "Existing payee ID (use instead of payee_name)")]
    pub payee_id: Option<String>,

    #[schemars(description = "Category ID")]
    pub category_id: Option<String>,

    #[schemars(description = "Status: 'cleared', 'uncleared', or 'reconciled'")]
    #[serde(default)]
    pub cleared: ClearedStatus,

    #[schemars(description = "Whether the transaction is approved")]
    #[serde(default)]
    pub approved: bool,

    #[schemars(description = "Transaction memo")]
    pub memo: Option<String>,

    #[schemars(description = "Flag color: red, orange, yellow, green, blue, purple")]
    pub flag_color: Option<FlagColor>,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum CreateTransactionResult {
    Created {
        #[serde(flatten)]
        transaction: TransactionSummary,
        message: String,
    },
    /// The API accepted the request but returned no single transaction
    Duplicate {
        message: String,
        duplicate_import_ids: Vec<String>,
    },
}

pub async fn create_transaction(
    ctx: &ToolContext,
    params: CreateTransactionParams,
) -> Result<CreateTransactionResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let save = SaveTransaction {
        account_id: Some(params.account_id),
        date: Some(params.date),
        amount: Some(params.amount),
        payee_id: params.payee_id,
        payee_name: params.payee_name,
        category_id: params.category_id,
        memo: params.memo,
        cleared: Some(params.cleared),
        approved: Some(params.approved),
        flag_color: params.flag_color,
    };

    let response = ctx.api().create_transaction(&budget_id, &save).await?;
    Ok(match response.transaction {
        Some(transaction) => CreateTransactionResult::Created {
            transaction: transaction.into(),
            message: "Transaction created successfully".to_string(),
        },
        None => CreateTransactionResult::Duplicate {
            message: "Transaction created".to_string(),
            duplicate_import_ids: response.duplicate_import_ids,
        },
    })
}

// =============================================================================
// update_transaction
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateTransactionParams {
    #[schemars(description = "The transaction ID to update")]
    pub transaction_id: String,

    #[schemars(description = "New account ID")]
    pub account_id: Option<String>,

    #[schemars(description = "New amount in milliunits")]
    pub amount: Option<i64>,

    #[schemars(description = "New date (YYYY-MM-DD)")]
    pub date: Option<String>,

    #[schemars(description = "New payee name")]
    pub payee_name: Option<String>,

    #[schemars(description = "New payee ID")]
    pub payee_id: Option<String>,

    #[schemars(description = "New category ID")]
    pub category_id: Option<String>,

    #[schemars(description = "New status: 'cleared', 'uncleared', or 'reconciled'")]
    pub cleared: Option<ClearedStatus>,

    #[schemars(description = "New approved status")]
    pub approved: Option<bool>,

    #[schemars(description = "New memo")]
    pub memo: Option<String>,

    #[schemars(description = "New flag color")]
    pub flag_color: Option<FlagColor>,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct UpdateTransactionResult {
    #[serde(flatten)]
    pub transaction: TransactionSummary,
    pub message: String,
}

/// Update a transaction, sending only the fields that were supplied
pub async fn update_transaction(
    ctx: &ToolContext,
    params: UpdateTransactionParams,
) -> Result<UpdateTransactionResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let save = SaveTransaction {
        account_id: params.account_id,
        date: params.date,
        amount: params.amount,
        payee_id: params.payee_id,
        payee_name: params.payee_name,
        category_id: params.category_id,
        memo: params.memo,
        cleared: params.cleared,
        approved: params.approved,
        flag_color: params.flag_color,
    };

    let transaction = ctx
        .api()
        .update_transaction(&budget_id, &params.transaction_id, &save)
        .await?;

    Ok(UpdateTransactionResult {
        transaction: transaction.into(),
        message: "Transaction updated successfully".to_string(),
    })
}

// =============================================================================
// import_transactions
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ImportTransactionsParams {
    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct ImportTransactionsResult {
    pub transaction_ids: Vec<String>,
    pub count: usize,
    pub message: String,
}

/// Trigger an import from linked accounts
pub async fn import_transactions(
    ctx: &ToolContext,
    params: ImportTransactionsParams,
) -> Result<ImportTransactionsResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let response = ctx.api().import_transactions(&budget_id).await?;

    let count = response.transaction_ids.len();
    Ok(ImportTransactionsResult {
        transaction_ids: response.transaction_ids,
        count,
        message: format!("Imported {} transactions", count),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::mock_context;

    fn create_params(amount: i64) -> CreateTransactionParams {
        serde_json::from_value(serde_json::json!({
            "account_id": "acct-checking",
            "amount": amount,
            "date": "2024-03-18",
            "payee_name": "Hardware Store",
            "memo": "screws"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_transaction_forwards_milliunits() {
        let (ctx, mock) = mock_context(None);
        let result = create_transaction(&ctx, create_params(-25000)).await.unwrap();

        let saved = mock.saved_transactions();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].amount, Some(-25000));
        assert_eq!(saved[0].cleared, Some(ClearedStatus::Uncleared));
        assert_eq!(saved[0].approved, Some(false));
        assert_eq!(mock.last_call().unwrap().budget_id.as_deref(), Some("last-used"));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["amount"], -25000);
        assert_eq!(value["amount_formatted"], "$-25.00");
        assert_eq!(value["date"], "2024-03-18");
        assert_eq!(value["payee_name"], "Hardware Store");
        assert_eq!(value["message"], "Transaction created successfully");
    }

    #[tokio::test]
    async fn test_update_transaction_sends_only_supplied_fields() {
        let (ctx, mock) = mock_context(None);
        let params: UpdateTransactionParams = serde_json::from_value(serde_json::json!({
            "transaction_id": "txn-1",
            "memo": "weekly shop",
            "flag_color": "green"
        }))
        .unwrap();

        let result = update_transaction(&ctx, params).await.unwrap();
        assert_eq!(result.transaction.memo.as_deref(), Some("weekly shop"));
        assert_eq!(result.transaction.amount, -85_420);
        assert_eq!(result.message, "Transaction updated successfully");

        let saved = mock.saved_transactions();
        assert_eq!(
            serde_json::to_value(&saved[0]).unwrap(),
            serde_json::json!({"memo": "weekly shop", "flag_color": "green"})
        );
    }

    #[tokio::test]
    async fn test_get_transactions_type_filter() {
        let (ctx, _) = mock_context(None);
        let params: GetTransactionsParams =
            serde_json::from_value(serde_json::json!({"type": "uncategorized"})).unwrap();

        let result = get_transactions(&ctx, params).await.unwrap();
        assert_eq!(result.transactions.len(), 1);
        assert_eq!(result.transactions[0].id, "txn-2");
        assert_eq!(result.transactions[0].amount_formatted, "$-4.50");
    }

    #[tokio::test]
    async fn test_get_transactions_since_date() {
        let (ctx, _) = mock_context(None);
        let params: GetTransactionsParams =
            serde_json::from_value(serde_json::json!({"since_date": "2024-03-01"})).unwrap();

        let result = get_transactions(&ctx, params).await.unwrap();
        let ids: Vec<_> = result.transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["txn-2", "txn-3"]);
    }

    #[tokio::test]
    async fn test_delete_transaction_message() {
        let (ctx, _) = mock_context(None);
        let result = delete_transaction(
            &ctx,
            TransactionIdParams {
                transaction_id: "txn-1".into(),
                budget_id: "default".into(),
            },
        )
        .await
        .unwrap();

        assert!(result.deleted);
        assert_eq!(result.message, "Transaction txn-1 deleted successfully");
    }

    #[tokio::test]
    async fn test_import_transactions_counts() {
        let (ctx, _) = mock_context(None);
        let result = import_transactions(
            &ctx,
            ImportTransactionsParams {
                budget_id: "default".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(result.message, "Imported 2 transactions");
    }

    #[test]
    fn test_invalid_cleared_status_rejected() {
        let result = serde_json::from_value::<CreateTransactionParams>(serde_json::json!({
            "account_id": "a",
            "amount": 1,
            "date": "2024-01-01",
            "cleared": "pending"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_result_shape() {
        let result = CreateTransactionResult::Duplicate {
            message: "Transaction created".into(),
            duplicate_import_ids: vec!["YNAB:-25000:2024-03-18:1".into()],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["message"], "Transaction created");
        assert_eq!(value["duplicate_import_ids"][0], "YNAB:-25000:2024-03-18:1");
    }
}
