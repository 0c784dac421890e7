//! Mock YNAB client for testing
//!
//! Serves a small fixture budget from memory, records every upstream call
//! (operation + resolved budget id + transaction payloads), and can be told
//! to fail the next call or every call with an API error.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{
    Account, AccountList, BudgetDetail, BudgetDetailData, BudgetSettings, BudgetSummary,
    BudgetSummaryList, Category, CategoryGroup, CategoryGroupList, CurrencyFormat, DateFormat,
    MonthSummary, Payee, PayeeList, PayeeLocation, SaveAccount, SaveCategory, SaveMonthCategory,
    SavePayee, SaveTransaction, SaveTransactionsData, Transaction, TransactionList,
    TransactionQuery, TransactionsImportData, User,
};

use super::YnabApi;

/// Budget id of the fixture budget
pub const MOCK_BUDGET_ID: &str = "budget-1";

/// One recorded upstream call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCall {
    pub operation: &'static str,
    pub budget_id: Option<String>,
}

#[derive(Debug, Clone)]
struct Failure {
    status: u16,
    name: String,
    detail: String,
    persistent: bool,
}

#[derive(Debug, Default)]
struct MockState {
    failure: Option<Failure>,
    calls: Vec<UpstreamCall>,
    saved_transactions: Vec<SaveTransaction>,
    next_id: u64,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    category_groups: Vec<CategoryGroup>,
    payees: Vec<Payee>,
    payee_locations: Vec<PayeeLocation>,
    /// Month-specific budgeted amounts set through `update_month_category`
    month_budgets: Vec<(String, String, i64)>,
}

/// In-memory YNAB API
#[derive(Debug)]
pub struct MockYnab {
    user_id: String,
    state: Mutex<MockState>,
}

impl Default for MockYnab {
    fn default() -> Self {
        Self::new()
    }
}

impl MockYnab {
    /// Create a mock seeded with the fixture budget
    pub fn new() -> Self {
        let state = MockState {
            accounts: fixture_accounts(),
            transactions: fixture_transactions(),
            category_groups: fixture_category_groups(),
            payees: fixture_payees(),
            payee_locations: fixture_payee_locations(),
            ..Default::default()
        };
        Self {
            user_id: "user-1".to_string(),
            state: Mutex::new(state),
        }
    }

    /// Fail the next upstream call with the given API error
    pub fn fail_next(&self, status: u16, name: &str, detail: &str) {
        self.set_failure(status, name, detail, false);
    }

    /// Fail every upstream call with the given API error
    pub fn fail_always(&self, status: u16, name: &str, detail: &str) {
        self.set_failure(status, name, detail, true);
    }

    fn set_failure(&self, status: u16, name: &str, detail: &str, persistent: bool) {
        self.lock().failure = Some(Failure {
            status,
            name: name.to_string(),
            detail: detail.to_string(),
            persistent,
        });
    }

    /// All upstream calls made so far
    pub fn calls(&self) -> Vec<UpstreamCall> {
        self.lock().calls.clone()
    }

    /// The most recent upstream call
    pub fn last_call(&self) -> Option<UpstreamCall> {
        self.lock().calls.last().cloned()
    }

    /// Transaction payloads received by create/update, in order
    pub fn saved_transactions(&self) -> Vec<SaveTransaction> {
        self.lock().saved_transactions.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panicking test may poison the lock; the state is still usable
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call and apply any pending failure
    fn begin(&self, operation: &'static str, budget_id: Option<&str>) -> Result<std::sync::MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.calls.push(UpstreamCall {
            operation,
            budget_id: budget_id.map(str::to_string),
        });

        if let Some(failure) = state.failure.clone() {
            if !failure.persistent {
                state.failure = None;
            }
            return Err(Error::api(failure.status, failure.name, failure.detail));
        }

        Ok(state)
    }
}

fn not_found() -> Error {
    Error::api(404, "not_found", "Resource not found")
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-new-{}", prefix, self.next_id)
    }

    fn find_category(&self, category_id: &str) -> Option<Category> {
        self.category_groups.iter().find_map(|group| {
            group.categories.iter().find(|c| c.id == category_id).map(|c| {
                let mut category = c.clone();
                category.category_group_id = Some(group.id.clone());
                category.category_group_name = Some(group.name.clone());
                category
            })
        })
    }

    fn category_mut(&mut self, category_id: &str) -> Option<&mut Category> {
        self.category_groups
            .iter_mut()
            .flat_map(|group| group.categories.iter_mut())
            .find(|c| c.id == category_id)
    }

    fn hydrate(&self, transaction: &mut Transaction) {
        transaction.account_name = self
            .accounts
            .iter()
            .find(|a| a.id == transaction.account_id)
            .map(|a| a.name.clone());
        if let Some(category_id) = &transaction.category_id {
            transaction.category_name = self.find_category(category_id).map(|c| c.name);
        }
        if transaction.payee_name.is_none() {
            if let Some(payee_id) = &transaction.payee_id {
                transaction.payee_name =
                    self.payees.iter().find(|p| &p.id == payee_id).map(|p| p.name.clone());
            }
        }
    }
}

#[async_trait]
impl YnabApi for MockYnab {
    async fn get_user(&self) -> Result<User> {
        let _state = self.begin("get_user", None)?;
        Ok(User {
            id: self.user_id.clone(),
        })
    }

    async fn get_budgets(&self, include_accounts: bool) -> Result<BudgetSummaryList> {
        let state = self.begin("get_budgets", None)?;
        let mut budget = fixture_budget_summary();
        if include_accounts {
            budget.accounts = Some(state.accounts.clone());
        }
        Ok(BudgetSummaryList {
            budgets: vec![budget.clone()],
            default_budget: Some(budget),
        })
    }

    async fn get_budget_by_id(
        &self,
        budget_id: &str,
        last_knowledge_of_server: Option<i64>,
    ) -> Result<BudgetDetailData> {
        let state = self.begin("get_budget_by_id", Some(budget_id))?;
        let summary = fixture_budget_summary();

        // The real API sends categories as a flat list beside empty groups
        let categories = state
            .category_groups
            .iter()
            .flat_map(|group| {
                group.categories.iter().map(move |c| Category {
                    category_group_id: Some(group.id.clone()),
                    ..c.clone()
                })
            })
            .collect();
        let groups = state
            .category_groups
            .iter()
            .map(|g| CategoryGroup {
                categories: vec![],
                ..g.clone()
            })
            .collect();

        Ok(BudgetDetailData {
            budget: BudgetDetail {
                id: summary.id,
                name: summary.name,
                last_modified_on: summary.last_modified_on,
                date_format: summary.date_format,
                currency_format: summary.currency_format,
                accounts: Some(state.accounts.clone()),
                payees: Some(state.payees.clone()),
                category_groups: Some(groups),
                categories: Some(categories),
                months: Some(vec![MonthSummary {
                    month: "2024-03-01".to_string(),
                    income: 5_000_000,
                    budgeted: 4_200_000,
                    activity: -3_100_000,
                    to_be_budgeted: 800_000,
                    deleted: false,
                }]),
            },
            server_knowledge: last_knowledge_of_server.unwrap_or(0) + 1,
        })
    }

    async fn get_budget_settings(&self, budget_id: &str) -> Result<BudgetSettings> {
        let _state = self.begin("get_budget_settings", Some(budget_id))?;
        let summary = fixture_budget_summary();
        Ok(BudgetSettings {
            date_format: summary.date_format,
            currency_format: summary.currency_format,
        })
    }

    async fn get_accounts(
        &self,
        budget_id: &str,
        last_knowledge_of_server: Option<i64>,
    ) -> Result<AccountList> {
        let state = self.begin("get_accounts", Some(budget_id))?;
        Ok(AccountList {
            accounts: state.accounts.clone(),
            server_knowledge: last_knowledge_of_server.unwrap_or(0) + 1,
        })
    }

    async fn get_account_by_id(&self, budget_id: &str, account_id: &str) -> Result<Account> {
        let state = self.begin("get_account_by_id", Some(budget_id))?;
        state
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_account(&self, budget_id: &str, account: &SaveAccount) -> Result<Account> {
        let mut state = self.begin("create_account", Some(budget_id))?;
        let id = state.next_id("account");
        let account_type = serde_json::to_value(account.account_type)?
            .as_str()
            .unwrap_or_default()
            .to_string();

        let created = Account {
            id: id.clone(),
            name: account.name.clone(),
            account_type,
            on_budget: true,
            closed: false,
            note: None,
            balance: account.balance,
            cleared_balance: account.balance,
            uncleared_balance: 0,
            transfer_payee_id: Some(format!("payee-transfer-{}", id)),
            direct_import_linked: Some(false),
            direct_import_in_error: Some(false),
            deleted: false,
        };
        state.accounts.push(created.clone());
        Ok(created)
    }

    async fn get_transactions(
        &self,
        budget_id: &str,
        query: &TransactionQuery,
    ) -> Result<TransactionList> {
        let state = self.begin("get_transactions", Some(budget_id))?;
        let since = query
            .since_date
            .as_deref()
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        let transactions = state
            .transactions
            .iter()
            .filter(|t| match (since, t.date) {
                (Some(since), Some(date)) => date >= since,
                _ => true,
            })
            .filter(|t| match query.transaction_type {
                Some(crate::models::TransactionTypeFilter::Uncategorized) => t.category_id.is_none(),
                Some(crate::models::TransactionTypeFilter::Unapproved) => !t.approved,
                None => true,
            })
            .cloned()
            .collect();

        Ok(TransactionList {
            transactions,
            server_knowledge: query.last_knowledge_of_server.unwrap_or(0) + 1,
        })
    }

    async fn get_transaction_by_id(
        &self,
        budget_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction> {
        let state = self.begin("get_transaction_by_id", Some(budget_id))?;
        state
            .transactions
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_transaction(
        &self,
        budget_id: &str,
        transaction: &SaveTransaction,
    ) -> Result<SaveTransactionsData> {
        let mut state = self.begin("create_transaction", Some(budget_id))?;
        state.saved_transactions.push(transaction.clone());

        let id = state.next_id("txn");
        let mut created = Transaction {
            id: id.clone(),
            date: transaction
                .date
                .as_deref()
                .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            amount: transaction.amount.unwrap_or_default(),
            memo: transaction.memo.clone(),
            cleared: serde_json::to_value(transaction.cleared.unwrap_or_default())?
                .as_str()
                .unwrap_or("uncleared")
                .to_string(),
            approved: transaction.approved.unwrap_or(false),
            flag_color: match transaction.flag_color {
                Some(color) => serde_json::to_value(color)?.as_str().map(str::to_string),
                None => None,
            },
            account_id: transaction.account_id.clone().unwrap_or_default(),
            account_name: None,
            payee_id: transaction.payee_id.clone(),
            payee_name: transaction.payee_name.clone(),
            category_id: transaction.category_id.clone(),
            category_name: None,
            transfer_account_id: None,
            import_id: None,
            deleted: false,
            subtransactions: vec![],
        };
        state.hydrate(&mut created);
        state.transactions.push(created.clone());

        Ok(SaveTransactionsData {
            transaction_ids: vec![id],
            transaction: Some(created),
            duplicate_import_ids: vec![],
            server_knowledge: 1,
        })
    }

    async fn update_transaction(
        &self,
        budget_id: &str,
        transaction_id: &str,
        transaction: &SaveTransaction,
    ) -> Result<Transaction> {
        let mut state = self.begin("update_transaction", Some(budget_id))?;
        state.saved_transactions.push(transaction.clone());

        let index = state
            .transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(not_found)?;

        let mut updated = state.transactions[index].clone();
        if let Some(account_id) = &transaction.account_id {
            updated.account_id = account_id.clone();
        }
        if let Some(date) = &transaction.date {
            updated.date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok();
        }
        if let Some(amount) = transaction.amount {
            updated.amount = amount;
        }
        if let Some(payee_id) = &transaction.payee_id {
            updated.payee_id = Some(payee_id.clone());
            updated.payee_name = None;
        }
        if let Some(payee_name) = &transaction.payee_name {
            updated.payee_name = Some(payee_name.clone());
        }
        if let Some(category_id) = &transaction.category_id {
            updated.category_id = Some(category_id.clone());
        }
        if let Some(memo) = &transaction.memo {
            updated.memo = Some(memo.clone());
        }
        if let Some(cleared) = transaction.cleared {
            if let Some(s) = serde_json::to_value(cleared)?.as_str() {
                updated.cleared = s.to_string();
            }
        }
        if let Some(approved) = transaction.approved {
            updated.approved = approved;
        }
        if let Some(color) = transaction.flag_color {
            updated.flag_color = serde_json::to_value(color)?.as_str().map(str::to_string);
        }

        state.hydrate(&mut updated);
        state.transactions[index] = updated.clone();
        Ok(updated)
    }

    async fn delete_transaction(
        &self,
        budget_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction> {
        let mut state = self.begin("delete_transaction", Some(budget_id))?;
        let transaction = state
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction_id)
            .ok_or_else(not_found)?;
        transaction.deleted = true;
        Ok(transaction.clone())
    }

    async fn import_transactions(&self, budget_id: &str) -> Result<TransactionsImportData> {
        let _state = self.begin("import_transactions", Some(budget_id))?;
        Ok(TransactionsImportData {
            transaction_ids: vec!["txn-imported-1".to_string(), "txn-imported-2".to_string()],
        })
    }

    async fn get_categories(
        &self,
        budget_id: &str,
        last_knowledge_of_server: Option<i64>,
    ) -> Result<CategoryGroupList> {
        let state = self.begin("get_categories", Some(budget_id))?;
        Ok(CategoryGroupList {
            category_groups: state.category_groups.clone(),
            server_knowledge: last_knowledge_of_server.unwrap_or(0) + 1,
        })
    }

    async fn get_category_by_id(&self, budget_id: &str, category_id: &str) -> Result<Category> {
        let state = self.begin("get_category_by_id", Some(budget_id))?;
        state.find_category(category_id).ok_or_else(not_found)
    }

    async fn get_month_category(
        &self,
        budget_id: &str,
        month: &str,
        category_id: &str,
    ) -> Result<Category> {
        let state = self.begin("get_month_category", Some(budget_id))?;
        let mut category = state.find_category(category_id).ok_or_else(not_found)?;
        if let Some((_, _, budgeted)) = state
            .month_budgets
            .iter()
            .find(|(m, c, _)| m == month && c == category_id)
        {
            category.balance += budgeted - category.budgeted;
            category.budgeted = *budgeted;
        }
        Ok(category)
    }

    async fn update_category(
        &self,
        budget_id: &str,
        category_id: &str,
        category: &SaveCategory,
    ) -> Result<Category> {
        let mut state = self.begin("update_category", Some(budget_id))?;
        let existing = state.category_mut(category_id).ok_or_else(not_found)?;
        if let Some(name) = &category.name {
            existing.name = name.clone();
        }
        if let Some(note) = &category.note {
            existing.note = Some(note.clone());
        }
        if let Some(hidden) = category.hidden {
            existing.hidden = hidden;
        }
        state.find_category(category_id).ok_or_else(not_found)
    }

    async fn update_month_category(
        &self,
        budget_id: &str,
        month: &str,
        category_id: &str,
        category: &SaveMonthCategory,
    ) -> Result<Category> {
        let mut state = self.begin("update_month_category", Some(budget_id))?;
        let mut current = state.find_category(category_id).ok_or_else(not_found)?;
        state
            .month_budgets
            .retain(|(m, c, _)| !(m == month && c == category_id));
        state
            .month_budgets
            .push((month.to_string(), category_id.to_string(), category.budgeted));

        current.balance += category.budgeted - current.budgeted;
        current.budgeted = category.budgeted;
        Ok(current)
    }

    async fn get_payees(
        &self,
        budget_id: &str,
        last_knowledge_of_server: Option<i64>,
    ) -> Result<PayeeList> {
        let state = self.begin("get_payees", Some(budget_id))?;
        Ok(PayeeList {
            payees: state.payees.clone(),
            server_knowledge: last_knowledge_of_server.unwrap_or(0) + 1,
        })
    }

    async fn get_payee_by_id(&self, budget_id: &str, payee_id: &str) -> Result<Payee> {
        let state = self.begin("get_payee_by_id", Some(budget_id))?;
        state
            .payees
            .iter()
            .find(|p| p.id == payee_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn update_payee(
        &self,
        budget_id: &str,
        payee_id: &str,
        payee: &SavePayee,
    ) -> Result<Payee> {
        let mut state = self.begin("update_payee", Some(budget_id))?;
        let existing = state
            .payees
            .iter_mut()
            .find(|p| p.id == payee_id)
            .ok_or_else(not_found)?;
        existing.name = payee.name.clone();
        Ok(existing.clone())
    }

    async fn get_payee_locations(&self, budget_id: &str) -> Result<Vec<PayeeLocation>> {
        let state = self.begin("get_payee_locations", Some(budget_id))?;
        Ok(state.payee_locations.clone())
    }

    async fn get_payee_location_by_id(
        &self,
        budget_id: &str,
        payee_location_id: &str,
    ) -> Result<PayeeLocation> {
        let state = self.begin("get_payee_location_by_id", Some(budget_id))?;
        state
            .payee_locations
            .iter()
            .find(|l| l.id == payee_location_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn get_payee_locations_by_payee(
        &self,
        budget_id: &str,
        payee_id: &str,
    ) -> Result<Vec<PayeeLocation>> {
        let state = self.begin("get_payee_locations_by_payee", Some(budget_id))?;
        Ok(state
            .payee_locations
            .iter()
            .filter(|l| l.payee_id == payee_id)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn fixture_budget_summary() -> BudgetSummary {
    BudgetSummary {
        id: MOCK_BUDGET_ID.to_string(),
        name: "Household".to_string(),
        last_modified_on: chrono::DateTime::parse_from_rfc3339("2024-03-20T12:00:00Z")
            .ok()
            .map(|dt| dt.with_timezone(&chrono::Utc)),
        date_format: Some(DateFormat {
            format: "MM/DD/YYYY".to_string(),
        }),
        currency_format: Some(CurrencyFormat {
            iso_code: "USD".to_string(),
            example_format: "123,456.78".to_string(),
            decimal_digits: 2,
            decimal_separator: ".".to_string(),
            symbol_first: true,
            group_separator: ",".to_string(),
            currency_symbol: "$".to_string(),
            display_symbol: true,
        }),
        accounts: None,
    }
}

fn fixture_account(id: &str, name: &str, account_type: &str, balance: i64) -> Account {
    Account {
        id: id.to_string(),
        name: name.to_string(),
        account_type: account_type.to_string(),
        on_budget: true,
        closed: false,
        note: None,
        balance,
        cleared_balance: balance,
        uncleared_balance: 0,
        transfer_payee_id: Some(format!("payee-transfer-{}", id)),
        direct_import_linked: Some(false),
        direct_import_in_error: Some(false),
        deleted: false,
    }
}

fn fixture_accounts() -> Vec<Account> {
    let checking = Account {
        cleared_balance: 1_200_000,
        uncleared_balance: 34_560,
        balance: 1_234_560,
        note: Some("Main account".to_string()),
        ..fixture_account("acct-checking", "Checking", "checking", 1_234_560)
    };
    let closed = Account {
        closed: true,
        ..fixture_account("acct-old-savings", "Old Savings", "savings", 0)
    };
    let deleted = Account {
        deleted: true,
        ..fixture_account("acct-deleted", "Deleted Card", "creditCard", 0)
    };
    vec![checking, closed, deleted]
}

fn fixture_transaction(id: &str, date: &str, amount: i64, payee: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        amount,
        memo: None,
        cleared: "cleared".to_string(),
        approved: true,
        flag_color: None,
        account_id: "acct-checking".to_string(),
        account_name: Some("Checking".to_string()),
        payee_id: None,
        payee_name: Some(payee.to_string()),
        category_id: Some("cat-groceries".to_string()),
        category_name: Some("Groceries".to_string()),
        transfer_account_id: None,
        import_id: None,
        deleted: false,
        subtransactions: vec![],
    }
}

fn fixture_transactions() -> Vec<Transaction> {
    let uncategorized = Transaction {
        category_id: None,
        category_name: None,
        approved: false,
        cleared: "uncleared".to_string(),
        ..fixture_transaction("txn-2", "2024-03-10", -4_500, "Coffee Shop")
    };
    vec![
        fixture_transaction("txn-1", "2024-02-28", -85_420, "Whole Foods"),
        uncategorized,
        Transaction {
            payee_id: Some("payee-employer".to_string()),
            payee_name: Some("Employer".to_string()),
            category_id: Some("cat-inflow".to_string()),
            category_name: Some("Inflow: Ready to Assign".to_string()),
            ..fixture_transaction("txn-3", "2024-03-15", 2_500_000, "Employer")
        },
    ]
}

fn fixture_category(id: &str, name: &str, budgeted: i64, activity: i64) -> Category {
    Category {
        id: id.to_string(),
        category_group_id: None,
        category_group_name: None,
        name: name.to_string(),
        hidden: false,
        note: None,
        budgeted,
        activity,
        balance: budgeted + activity,
        goal_type: None,
        goal_creation_month: None,
        goal_target: None,
        goal_target_month: None,
        goal_percentage_complete: None,
        deleted: false,
    }
}

fn fixture_category_groups() -> Vec<CategoryGroup> {
    vec![
        CategoryGroup {
            id: "group-everyday".to_string(),
            name: "Everyday Expenses".to_string(),
            hidden: false,
            deleted: false,
            categories: vec![
                Category {
                    goal_type: Some("NEED".to_string()),
                    goal_target: Some(500_000),
                    goal_percentage_complete: Some(80),
                    ..fixture_category("cat-groceries", "Groceries", 500_000, -89_920)
                },
                fixture_category("cat-dining", "Dining Out", 150_000, -42_000),
            ],
        },
        CategoryGroup {
            id: "group-internal".to_string(),
            name: "Internal Master Category".to_string(),
            hidden: false,
            deleted: false,
            categories: vec![fixture_category(
                "cat-inflow",
                "Inflow: Ready to Assign",
                0,
                2_500_000,
            )],
        },
    ]
}

fn fixture_payees() -> Vec<Payee> {
    let payee = |id: &str, name: &str| Payee {
        id: id.to_string(),
        name: name.to_string(),
        transfer_account_id: None,
        deleted: false,
    };
    vec![
        payee("payee-whole-foods", "Whole Foods"),
        payee("payee-coffee", "Coffee Shop"),
        payee("payee-employer", "Employer"),
        Payee {
            transfer_account_id: Some("acct-old-savings".to_string()),
            ..payee("payee-transfer-acct-old-savings", "Transfer : Old Savings")
        },
    ]
}

fn fixture_payee_locations() -> Vec<PayeeLocation> {
    vec![
        PayeeLocation {
            id: "loc-1".to_string(),
            payee_id: "payee-whole-foods".to_string(),
            latitude: Some("47.6062".to_string()),
            longitude: Some("-122.3321".to_string()),
            deleted: false,
        },
        PayeeLocation {
            id: "loc-2".to_string(),
            payee_id: "payee-coffee".to_string(),
            latitude: Some("47.6097".to_string()),
            longitude: Some("-122.3331".to_string()),
            deleted: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_with_budget_id() {
        let mock = MockYnab::new();
        mock.get_accounts("last-used", None).await.unwrap();
        mock.get_user().await.unwrap();

        assert_eq!(
            mock.calls(),
            vec![
                UpstreamCall {
                    operation: "get_accounts",
                    budget_id: Some("last-used".to_string()),
                },
                UpstreamCall {
                    operation: "get_user",
                    budget_id: None,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let mock = MockYnab::new();
        mock.fail_next(401, "unauthorized", "Unauthorized");

        let err = mock.get_user().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(mock.get_user().await.is_ok());
    }

    #[tokio::test]
    async fn test_fail_always_persists() {
        let mock = MockYnab::new();
        mock.fail_always(429, "too_many_requests", "Too many requests");

        assert!(mock.get_user().await.is_err());
        assert!(mock.get_budgets(false).await.is_err());
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let mock = MockYnab::new();
        let err = mock.get_account_by_id(MOCK_BUDGET_ID, "nope").await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_month_budget_is_remembered() {
        let mock = MockYnab::new();
        mock.update_month_category(
            MOCK_BUDGET_ID,
            "2024-04-01",
            "cat-dining",
            &SaveMonthCategory { budgeted: 200_000 },
        )
        .await
        .unwrap();

        let april = mock
            .get_month_category(MOCK_BUDGET_ID, "2024-04-01", "cat-dining")
            .await
            .unwrap();
        assert_eq!(april.budgeted, 200_000);

        let current = mock.get_category_by_id(MOCK_BUDGET_ID, "cat-dining").await.unwrap();
        assert_eq!(current.budgeted, 150_000);
    }
}
