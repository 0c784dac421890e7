//! Account tools

use serde::{Deserialize, Serialize};

use super::{default_budget_id, ToolContext};
use crate::error::Result;
use crate::models::{format_milliunits, Account, AccountType, SaveAccount};

// =============================================================================
// Views
// =============================================================================

/// Full account as returned by the account tools
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct AccountView {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub on_budget: bool,
    pub closed: bool,
    pub note: Option<String>,
    pub balance: i64,
    pub cleared_balance: i64,
    pub uncleared_balance: i64,
    pub transfer_payee_id: Option<String>,
    pub direct_import_linked: Option<bool>,
    pub direct_import_in_error: Option<bool>,
    pub deleted: bool,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            account_type: account.account_type,
            on_budget: account.on_budget,
            closed: account.closed,
            note: account.note,
            balance: account.balance,
            cleared_balance: account.cleared_balance,
            uncleared_balance: account.uncleared_balance,
            transfer_payee_id: account.transfer_payee_id,
            direct_import_linked: account.direct_import_linked,
            direct_import_in_error: account.direct_import_in_error,
            deleted: account.deleted,
        }
    }
}

/// Short account form embedded in budget listings
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub on_budget: bool,
    pub closed: bool,
    pub balance: i64,
    pub cleared_balance: i64,
    pub uncleared_balance: i64,
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            account_type: account.account_type,
            on_budget: account.on_budget,
            closed: account.closed,
            balance: account.balance,
            cleared_balance: account.cleared_balance,
            uncleared_balance: account.uncleared_balance,
        }
    }
}

// =============================================================================
// get_accounts
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetAccountsParams {
    #[schemars(description = "Budget ID, 'last-used', or 'default' (uses DEFAULT_BUDGET_ID)")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,

    #[schemars(description = "The starting server knowledge for delta requests")]
    pub last_knowledge_of_server: Option<i64>,

    #[schemars(description = "Whether to include closed accounts (default: false)")]
    #[serde(default)]
    pub include_closed: bool,

    #[schemars(description = "Whether to include deleted accounts (default: false)")]
    #[serde(default)]
    pub include_deleted: bool,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct AccountsResult {
    pub accounts: Vec<AccountView>,
    pub server_knowledge: i64,
}

/// List accounts, dropping closed and deleted ones unless asked for
pub async fn get_accounts(ctx: &ToolContext, params: GetAccountsParams) -> Result<AccountsResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let response = ctx
        .api()
        .get_accounts(&budget_id, params.last_knowledge_of_server)
        .await?;

    let accounts = response
        .accounts
        .into_iter()
        .filter(|a| params.include_closed || !a.closed)
        .filter(|a| params.include_deleted || !a.deleted)
        .map(AccountView::from)
        .collect();

    Ok(AccountsResult {
        accounts,
        server_knowledge: response.server_knowledge,
    })
}

// =============================================================================
// get_account_by_id
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AccountIdParams {
    #[schemars(description = "The account ID")]
    pub account_id: String,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

pub async fn get_account_by_id(ctx: &ToolContext, params: AccountIdParams) -> Result<AccountView> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let account = ctx
        .api()
        .get_account_by_id(&budget_id, &params.account_id)
        .await?;
    Ok(account.into())
}

// =============================================================================
// create_account
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CreateAccountParams {
    #[schemars(description = "Account name")]
    pub name: String,

    #[schemars(
        description = "Account type: checking, savings, creditCard, cash, lineOfCredit, otherAsset, otherLiability, payPal, merchantAccount, investmentAccount, mortgage"
    )]
    #[serde(rename = "type")]
    pub account_type: AccountType,

    #[schemars(description = "Initial balance in milliunits (e.g., $10.50 = 10500)")]
    pub balance: i64,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CreateAccountResult {
    #[serde(flatten)]
    pub account: AccountView,
    pub message: String,
}

pub async fn create_account(
    ctx: &ToolContext,
    params: CreateAccountParams,
) -> Result<CreateAccountResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let save = SaveAccount {
        name: params.name,
        account_type: params.account_type,
        balance: params.balance,
    };

    let account = ctx.api().create_account(&budget_id, &save).await?;
    Ok(CreateAccountResult {
        account: account.into(),
        message: "Account created successfully".to_string(),
    })
}

// =============================================================================
// get_account_balance
// =============================================================================

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct AccountBalance {
    pub account_name: String,
    pub balance: i64,
    pub cleared_balance: i64,
    pub uncleared_balance: i64,
    pub balance_formatted: String,
    pub cleared_balance_formatted: String,
    pub uncleared_balance_formatted: String,
}

impl From<Account> for AccountBalance {
    fn from(account: Account) -> Self {
        Self {
            balance_formatted: format_milliunits(account.balance),
            cleared_balance_formatted: format_milliunits(account.cleared_balance),
            uncleared_balance_formatted: format_milliunits(account.uncleared_balance),
            account_name: account.name,
            balance: account.balance,
            cleared_balance: account.cleared_balance,
            uncleared_balance: account.uncleared_balance,
        }
    }
}

pub async fn get_account_balance(
    ctx: &ToolContext,
    params: AccountIdParams,
) -> Result<AccountBalance> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let account = ctx
        .api()
        .get_account_by_id(&budget_id, &params.account_id)
        .await?;
    Ok(account.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::mock_context;

    fn list_params() -> GetAccountsParams {
        serde_json::from_value(serde_json::json!({})).unwrap()
    }

    #[tokio::test]
    async fn test_get_accounts_default_budget_is_last_used() {
        let (ctx, mock) = mock_context(None);
        get_accounts(&ctx, list_params()).await.unwrap();

        let call = mock.last_call().unwrap();
        assert_eq!(call.operation, "get_accounts");
        assert_eq!(call.budget_id.as_deref(), Some("last-used"));
    }

    #[tokio::test]
    async fn test_get_accounts_filters_closed_and_deleted() {
        let (ctx, _) = mock_context(None);

        let result = get_accounts(&ctx, list_params()).await.unwrap();
        let ids: Vec<_> = result.accounts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["acct-checking"]);

        let mut params = list_params();
        params.include_closed = true;
        let result = get_accounts(&ctx, params).await.unwrap();
        assert_eq!(result.accounts.len(), 2);

        let mut params = list_params();
        params.include_closed = true;
        params.include_deleted = true;
        let result = get_accounts(&ctx, params).await.unwrap();
        assert_eq!(result.accounts.len(), 3);
    }

    #[tokio::test]
    async fn test_get_account_balance_formats_milliunits() {
        let (ctx, _) = mock_context(None);
        let balance = get_account_balance(
            &ctx,
            AccountIdParams {
                account_id: "acct-checking".into(),
                budget_id: "default".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(balance.account_name, "Checking");
        assert_eq!(balance.balance, 1_234_560);
        assert_eq!(balance.balance_formatted, "$1234.56");
        assert_eq!(balance.uncleared_balance_formatted, "$34.56");
    }

    #[tokio::test]
    async fn test_create_account_flattens_message() {
        let (ctx, _) = mock_context(Some("budget-1"));
        let params: CreateAccountParams = serde_json::from_value(serde_json::json!({
            "name": "Vacation Fund",
            "type": "savings",
            "balance": 250000
        }))
        .unwrap();

        let result = create_account(&ctx, params).await.unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["name"], "Vacation Fund");
        assert_eq!(value["type"], "savings");
        assert_eq!(value["balance"], 250000);
        assert_eq!(value["message"], "Account created successfully");
    }

    #[test]
    fn test_create_account_rejects_unknown_type() {
        let result = serde_json::from_value::<CreateAccountParams>(serde_json::json!({
            "name": "Jar",
            "type": "piggyBank",
            "balance": 0
        }));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_account_by_id_not_found_is_error() {
        let (ctx, _) = mock_context(None);
        let result = get_account_by_id(
            &ctx,
            AccountIdParams {
                account_id: "missing".into(),
                budget_id: "default".into(),
            },
        )
        .await;
        assert!(result.is_err());
    }
}
