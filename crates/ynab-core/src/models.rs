//! YNAB API data models
//!
//! These mirror the JSON the YNAB v1 API returns. They are owned by the
//! upstream service; the tool modules only reshape them for output.
//! Money is in milliunits (1000 = one unit of currency) everywhere.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Render milliunits as a dollar string (e.g. -25000 -> "$-25.00")
pub fn format_milliunits(milliunits: i64) -> String {
    format!("${:.2}", milliunits as f64 / 1000.0)
}

// =============================================================================
// User
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
}

// =============================================================================
// Budgets
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DateFormat {
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CurrencyFormat {
    pub iso_code: String,
    pub example_format: String,
    pub decimal_digits: i32,
    pub decimal_separator: String,
    pub symbol_first: bool,
    pub group_separator: String,
    pub currency_symbol: String,
    pub display_symbol: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_modified_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_format: Option<DateFormat>,
    #[serde(default)]
    pub currency_format: Option<CurrencyFormat>,
    /// Only present when requested with `include_accounts=true`
    #[serde(default)]
    pub accounts: Option<Vec<Account>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummaryList {
    pub budgets: Vec<BudgetSummary>,
    #[serde(default)]
    pub default_budget: Option<BudgetSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MonthSummary {
    pub month: String,
    #[serde(default)]
    pub income: i64,
    #[serde(default)]
    pub budgeted: i64,
    #[serde(default)]
    pub activity: i64,
    #[serde(default)]
    pub to_be_budgeted: i64,
    #[serde(default)]
    pub deleted: bool,
}

/// Full budget export (`GET /budgets/{id}`)
///
/// The API returns categories as a flat list next to the groups; see
/// [`BudgetDetail::grouped_categories`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_modified_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_format: Option<DateFormat>,
    #[serde(default)]
    pub currency_format: Option<CurrencyFormat>,
    #[serde(default)]
    pub accounts: Option<Vec<Account>>,
    #[serde(default)]
    pub payees: Option<Vec<Payee>>,
    #[serde(default)]
    pub category_groups: Option<Vec<CategoryGroup>>,
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
    #[serde(default)]
    pub months: Option<Vec<MonthSummary>>,
}

impl BudgetDetail {
    /// Category groups with their categories attached.
    ///
    /// Groups that already carry categories keep them; otherwise categories
    /// are matched from the flat list by `category_group_id`.
    pub fn grouped_categories(&self) -> Option<Vec<CategoryGroup>> {
        let groups = self.category_groups.as_ref()?;
        let flat = self.categories.as_deref().unwrap_or_default();

        Some(
            groups
                .iter()
                .map(|group| {
                    let mut group = group.clone();
                    if group.categories.is_empty() {
                        group.categories = flat
                            .iter()
                            .filter(|c| c.category_group_id.as_deref() == Some(group.id.as_str()))
                            .cloned()
                            .collect();
                    }
                    group
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetDetailData {
    pub budget: BudgetDetail,
    pub server_knowledge: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSettings {
    #[serde(default)]
    pub date_format: Option<DateFormat>,
    #[serde(default)]
    pub currency_format: Option<CurrencyFormat>,
}

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Kept as the raw upstream string so new account types never break parsing
    #[serde(rename = "type")]
    pub account_type: String,
    pub on_budget: bool,
    pub closed: bool,
    #[serde(default)]
    pub note: Option<String>,
    pub balance: i64,
    pub cleared_balance: i64,
    pub uncleared_balance: i64,
    #[serde(default)]
    pub transfer_payee_id: Option<String>,
    #[serde(default)]
    pub direct_import_linked: Option<bool>,
    #[serde(default)]
    pub direct_import_in_error: Option<bool>,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountList {
    pub accounts: Vec<Account>,
    pub server_knowledge: i64,
}

/// Account types accepted by `POST /budgets/{id}/accounts`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum AccountType {
    Checking,
    Savings,
    CreditCard,
    Cash,
    LineOfCredit,
    OtherAsset,
    OtherLiability,
    PayPal,
    MerchantAccount,
    InvestmentAccount,
    Mortgage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveAccount {
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub balance: i64,
}

// =============================================================================
// Transactions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClearedStatus {
    Cleared,
    Uncleared,
    Reconciled,
}

impl Default for ClearedStatus {
    fn default() -> Self {
        Self::Uncleared
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlagColor {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
}

/// Server-side filter for `GET /budgets/{id}/transactions`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionTypeFilter {
    Uncategorized,
    Unapproved,
}

impl TransactionTypeFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uncategorized => "uncategorized",
            Self::Unapproved => "unapproved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SubTransaction {
    pub id: String,
    pub transaction_id: String,
    pub amount: i64,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub payee_id: Option<String>,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub transfer_account_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// ISO YYYY-MM-DD; parsed here and nowhere else
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub amount: i64,
    #[serde(default)]
    pub memo: Option<String>,
    pub cleared: String,
    pub approved: bool,
    #[serde(default)]
    pub flag_color: Option<String>,
    pub account_id: String,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub payee_id: Option<String>,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub transfer_account_id: Option<String>,
    #[serde(default)]
    pub import_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub subtransactions: Vec<SubTransaction>,
}

impl Transaction {
    /// ISO-8601 date string, if the upstream supplied one
    pub fn iso_date(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
    pub server_knowledge: i64,
}

/// Query options for listing transactions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    pub since_date: Option<String>,
    pub transaction_type: Option<TransactionTypeFilter>,
    pub last_knowledge_of_server: Option<i64>,
}

/// Transaction payload for create (POST) and update (PUT).
///
/// Unset fields are omitted from the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared: Option<ClearedStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag_color: Option<FlagColor>,
}

/// Response data for `POST /budgets/{id}/transactions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveTransactionsData {
    #[serde(default)]
    pub transaction_ids: Vec<String>,
    #[serde(default)]
    pub transaction: Option<Transaction>,
    #[serde(default)]
    pub duplicate_import_ids: Vec<String>,
    #[serde(default)]
    pub server_knowledge: i64,
}

/// Response data for `POST /budgets/{id}/transactions/import`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionsImportData {
    #[serde(default)]
    pub transaction_ids: Vec<String>,
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub category_group_id: Option<String>,
    #[serde(default)]
    pub category_group_name: Option<String>,
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub budgeted: i64,
    #[serde(default)]
    pub activity: i64,
    #[serde(default)]
    pub balance: i64,
    #[serde(default)]
    pub goal_type: Option<String>,
    #[serde(default)]
    pub goal_creation_month: Option<String>,
    #[serde(default)]
    pub goal_target: Option<i64>,
    #[serde(default)]
    pub goal_target_month: Option<String>,
    #[serde(default)]
    pub goal_percentage_complete: Option<i32>,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroupList {
    pub category_groups: Vec<CategoryGroup>,
    pub server_knowledge: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMonthCategory {
    pub budgeted: i64,
}

// =============================================================================
// Payees
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub transfer_account_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayeeList {
    pub payees: Vec<Payee>,
    pub server_knowledge: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavePayee {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PayeeLocation {
    pub id: String,
    pub payee_id: String,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_milliunits() {
        assert_eq!(format_milliunits(-25000), "$-25.00");
        assert_eq!(format_milliunits(10500), "$10.50");
        assert_eq!(format_milliunits(0), "$0.00");
        assert_eq!(format_milliunits(1_234_560), "$1234.56");
    }

    #[test]
    fn test_transaction_date_parsing() {
        let json = serde_json::json!({
            "id": "t1",
            "date": "2024-03-15",
            "amount": -25000,
            "memo": null,
            "cleared": "cleared",
            "approved": true,
            "flag_color": null,
            "account_id": "a1",
            "account_name": "Checking",
            "payee_id": null,
            "payee_name": "Grocer",
            "category_id": null,
            "category_name": null,
            "transfer_account_id": null,
            "import_id": null,
            "deleted": false,
            "subtransactions": []
        });

        let transaction: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(transaction.iso_date().as_deref(), Some("2024-03-15"));
        assert_eq!(transaction.amount, -25000);
    }

    #[test]
    fn test_account_type_wire_names() {
        assert_eq!(
            serde_json::to_value(AccountType::CreditCard).unwrap(),
            "creditCard"
        );
        assert_eq!(serde_json::to_value(AccountType::PayPal).unwrap(), "payPal");
        assert_eq!(
            serde_json::from_value::<AccountType>(serde_json::json!("lineOfCredit")).unwrap(),
            AccountType::LineOfCredit
        );
        assert!(serde_json::from_value::<AccountType>(serde_json::json!("piggyBank")).is_err());
    }

    #[test]
    fn test_save_transaction_omits_unset_fields() {
        let save = SaveTransaction {
            amount: Some(-1000),
            memo: Some("lunch".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&save).unwrap();
        assert_eq!(value, serde_json::json!({"amount": -1000, "memo": "lunch"}));
    }

    #[test]
    fn test_grouped_categories_from_flat_list() {
        let category = |id: &str, group: &str| Category {
            id: id.into(),
            category_group_id: Some(group.into()),
            category_group_name: None,
            name: id.into(),
            hidden: false,
            note: None,
            budgeted: 0,
            activity: 0,
            balance: 0,
            goal_type: None,
            goal_creation_month: None,
            goal_target: None,
            goal_target_month: None,
            goal_percentage_complete: None,
            deleted: false,
        };
        let group = |id: &str| CategoryGroup {
            id: id.into(),
            name: id.into(),
            hidden: false,
            deleted: false,
            categories: vec![],
        };

        let detail = BudgetDetail {
            id: "b1".into(),
            name: "Budget".into(),
            last_modified_on: None,
            date_format: None,
            currency_format: None,
            accounts: None,
            payees: None,
            category_groups: Some(vec![group("g1"), group("g2")]),
            categories: Some(vec![category("c1", "g1"), category("c2", "g2"), category("c3", "g1")]),
            months: None,
        };

        let groups = detail.grouped_categories().unwrap();
        assert_eq!(groups[0].categories.len(), 2);
        assert_eq!(groups[1].categories.len(), 1);
        assert_eq!(groups[1].categories[0].id, "c2");
    }
}
