//! Category tools

use serde::{Deserialize, Serialize};

use super::{default_budget_id, ToolContext};
use crate::error::Result;
use crate::models::{format_milliunits, Category, CategoryGroup, SaveCategory, SaveMonthCategory};

// =============================================================================
// Views
// =============================================================================

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct CategoryView {
    pub id: String,
    pub category_group_id: Option<String>,
    pub category_group_name: Option<String>,
    pub name: String,
    pub hidden: bool,
    pub note: Option<String>,
    pub budgeted: i64,
    pub budgeted_formatted: String,
    pub activity: i64,
    pub activity_formatted: String,
    pub balance: i64,
    pub balance_formatted: String,
    pub goal_type: Option<String>,
    pub goal_creation_month: Option<String>,
    pub goal_target: Option<i64>,
    pub goal_target_month: Option<String>,
    pub goal_percentage_complete: Option<i32>,
    pub deleted: bool,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            budgeted_formatted: format_milliunits(category.budgeted),
            activity_formatted: format_milliunits(category.activity),
            balance_formatted: format_milliunits(category.balance),
            id: category.id,
            category_group_id: category.category_group_id,
            category_group_name: category.category_group_name,
            name: category.name,
            hidden: category.hidden,
            note: category.note,
            budgeted: category.budgeted,
            activity: category.activity,
            balance: category.balance,
            goal_type: category.goal_type,
            goal_creation_month: category.goal_creation_month,
            goal_target: category.goal_target,
            goal_target_month: category.goal_target_month,
            goal_percentage_complete: category.goal_percentage_complete,
            deleted: category.deleted,
        }
    }
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct CategoryGroupView {
    pub id: String,
    pub name: String,
    pub hidden: bool,
    pub deleted: bool,
    pub categories: Vec<CategoryView>,
}

impl From<CategoryGroup> for CategoryGroupView {
    fn from(group: CategoryGroup) -> Self {
        Self {
            id: group.id,
            name: group.name,
            hidden: group.hidden,
            deleted: group.deleted,
            categories: group.categories.into_iter().map(CategoryView::from).collect(),
        }
    }
}

// =============================================================================
// get_categories
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetCategoriesParams {
    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,

    #[schemars(description = "The starting server knowledge for delta requests")]
    pub last_knowledge_of_server: Option<i64>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CategoriesResult {
    pub category_groups: Vec<CategoryGroupView>,
    pub server_knowledge: i64,
}

pub async fn get_categories(
    ctx: &ToolContext,
    params: GetCategoriesParams,
) -> Result<CategoriesResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let response = ctx
        .api()
        .get_categories(&budget_id, params.last_knowledge_of_server)
        .await?;

    Ok(CategoriesResult {
        category_groups: response
            .category_groups
            .into_iter()
            .map(CategoryGroupView::from)
            .collect(),
        server_knowledge: response.server_knowledge,
    })
}

// =============================================================================
// get_category_by_id / get_month_category
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CategoryIdParams {
    #[schemars(description = "The category ID")]
    pub category_id: String,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

pub async fn get_category_by_id(ctx: &ToolContext, params: CategoryIdParams) -> Result<CategoryView> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let category = ctx
        .api()
        .get_category_by_id(&budget_id, &params.category_id)
        .await?;
    Ok(category.into())
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MonthCategoryParams {
    #[schemars(description = "The category ID")]
    pub category_id: String,

    #[schemars(description = "The month (YYYY-MM-01) or 'current'")]
    pub month: String,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

pub async fn get_month_category(
    ctx: &ToolContext,
    params: MonthCategoryParams,
) -> Result<CategoryView> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let category = ctx
        .api()
        .get_month_category(&budget_id, &params.month, &params.category_id)
        .await?;
    Ok(category.into())
}

// =============================================================================
// update_category
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateCategoryParams {
    #[schemars(description = "The category ID to update")]
    pub category_id: String,

    #[schemars(description = "New category name")]
    pub name: Option<String>,

    #[schemars(description = "New note for the category")]
    pub note: Option<String>,

    #[schemars(description = "Whether the category is hidden")]
    pub hidden: Option<bool>,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct UpdateCategoryResult {
    #[serde(flatten)]
    pub category: CategoryView,
    pub message: String,
}

pub async fn update_category(
    ctx: &ToolContext,
    params: UpdateCategoryParams,
) -> Result<UpdateCategoryResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let save = SaveCategory {
        name: params.name,
        note: params.note,
        hidden: params.hidden,
    };

    let category = ctx
        .api()
        .update_category(&budget_id, &params.category_id, &save)
        .await?;

    Ok(UpdateCategoryResult {
        category: category.into(),
        message: "Category updated successfully".to_string(),
    })
}

// =============================================================================
// update_month_category
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdateMonthCategoryParams {
    #[schemars(description = "The category ID to update")]
    pub category_id: String,

    #[schemars(description = "The month to update (YYYY-MM-01)")]
    pub month: String,

    #[schemars(description = "Budgeted amount in milliunits (e.g., $100.50 = 100500)")]
    pub budgeted: i64,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct UpdateMonthCategoryResult {
    pub month: String,
    #[serde(flatten)]
    pub category: CategoryView,
    pub message: String,
}

pub async fn update_month_category(
    ctx: &ToolContext,
    params: UpdateMonthCategoryParams,
) -> Result<UpdateMonthCategoryResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let save = SaveMonthCategory {
        budgeted: params.budgeted,
    };

    let category = ctx
        .api()
        .update_month_category(&budget_id, &params.month, &params.category_id, &save)
        .await?;

    Ok(UpdateMonthCategoryResult {
        message: format!("Category budget updated for {}", params.month),
        month: params.month,
        category: category.into(),
    })
}

// =============================================================================
// get_category_balance
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CategoryBalanceParams {
    #[schemars(description = "The category ID")]
    pub category_id: String,

    #[schemars(description = "Optional month (YYYY-MM-01); defaults to the current month")]
    pub month: Option<String>,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct CategoryBalance {
    pub category_name: String,
    pub month: String,
    pub budgeted: i64,
    pub budgeted_formatted: String,
    pub activity: i64,
    pub activity_formatted: String,
    pub balance: i64,
    pub balance_formatted: String,
    /// Amount still available to spend; same as `balance`
    pub available: i64,
    pub available_formatted: String,
}

impl CategoryBalance {
    fn new(category: Category, month: String) -> Self {
        Self {
            category_name: category.name,
            month,
            budgeted: category.budgeted,
            budgeted_formatted: format_milliunits(category.budgeted),
            activity: category.activity,
            activity_formatted: format_milliunits(category.activity),
            balance: category.balance,
            balance_formatted: format_milliunits(category.balance),
            available: category.balance,
            available_formatted: format_milliunits(category.balance),
        }
    }
}

/// Balance for a category, month-specific when `month` is given
pub async fn get_category_balance(
    ctx: &ToolContext,
    params: CategoryBalanceParams,
) -> Result<CategoryBalance> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let api = ctx.api();

    match params.month.filter(|m| !m.is_empty()) {
        Some(month) => {
            let category = api
                .get_month_category(&budget_id, &month, &params.category_id)
                .await?;
            Ok(CategoryBalance::new(category, month))
        }
        None => {
            let category = api
                .get_category_by_id(&budget_id, &params.category_id)
                .await?;
            Ok(CategoryBalance::new(category, "current".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::mock_context;

    #[tokio::test]
    async fn test_get_categories_formats_amounts() {
        let (ctx, _) = mock_context(None);
        let params: GetCategoriesParams = serde_json::from_value(serde_json::json!({})).unwrap();
        let result = get_categories(&ctx, params).await.unwrap();

        assert_eq!(result.category_groups.len(), 2);
        let groceries = &result.category_groups[0].categories[0];
        assert_eq!(groceries.name, "Groceries");
        assert_eq!(groceries.budgeted_formatted, "$500.00");
        assert_eq!(groceries.activity_formatted, "$-89.92");
        assert_eq!(groceries.balance, 410_080);
    }

    #[tokio::test]
    async fn test_get_category_by_id_includes_group() {
        let (ctx, _) = mock_context(None);
        let category = get_category_by_id(
            &ctx,
            CategoryIdParams {
                category_id: "cat-dining".into(),
                budget_id: "default".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(category.category_group_name.as_deref(), Some("Everyday Expenses"));
    }

    #[tokio::test]
    async fn test_update_month_category_then_balance() {
        let (ctx, mock) = mock_context(None);
        let updated = update_month_category(
            &ctx,
            UpdateMonthCategoryParams {
                category_id: "cat-dining".into(),
                month: "2024-04-01".into(),
                budgeted: 200_000,
                budget_id: "default".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.message, "Category budget updated for 2024-04-01");
        assert_eq!(updated.category.budgeted, 200_000);
        let value = serde_json::to_value(&updated).unwrap();
        assert_eq!(value["month"], "2024-04-01");

        let balance = get_category_balance(
            &ctx,
            CategoryBalanceParams {
                category_id: "cat-dining".into(),
                month: Some("2024-04-01".into()),
                budget_id: "default".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(balance.month, "2024-04-01");
        assert_eq!(balance.budgeted, 200_000);
        assert_eq!(balance.available, balance.balance);
        assert_eq!(mock.last_call().unwrap().operation, "get_month_category");
    }

    #[tokio::test]
    async fn test_category_balance_without_month_is_current() {
        let (ctx, mock) = mock_context(None);
        let balance = get_category_balance(
            &ctx,
            CategoryBalanceParams {
                category_id: "cat-groceries".into(),
                month: None,
                budget_id: "default".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(balance.month, "current");
        assert_eq!(balance.available_formatted, "$410.08");
        assert_eq!(mock.last_call().unwrap().operation, "get_category_by_id");
    }

    #[tokio::test]
    async fn test_update_category_partial() {
        let (ctx, _) = mock_context(None);
        let params: UpdateCategoryParams = serde_json::from_value(serde_json::json!({
            "category_id": "cat-dining",
            "hidden": true
        }))
        .unwrap();

        let result = update_category(&ctx, params).await.unwrap();
        assert!(result.category.hidden);
        assert_eq!(result.category.name, "Dining Out");
        assert_eq!(result.message, "Category updated successfully");
    }
}
