//! Payee and payee location tools

use serde::{Deserialize, Serialize};

use super::{default_budget_id, ToolContext};
use crate::error::Result;
use crate::models::{Payee, PayeeLocation, SavePayee};

// =============================================================================
// Views
// =============================================================================

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct PayeeView {
    pub id: String,
    pub name: String,
    pub transfer_account_id: Option<String>,
    pub deleted: bool,
}

impl From<Payee> for PayeeView {
    fn from(payee: Payee) -> Self {
        Self {
            id: payee.id,
            name: payee.name,
            transfer_account_id: payee.transfer_account_id,
            deleted: payee.deleted,
        }
    }
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct PayeeLocationView {
    pub id: String,
    pub payee_id: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub deleted: bool,
}

impl From<PayeeLocation> for PayeeLocationView {
    fn from(location: PayeeLocation) -> Self {
        Self {
            id: location.id,
            payee_id: location.payee_id,
            latitude: location.latitude,
            longitude: location.longitude,
            deleted: location.deleted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct BudgetOnlyParams {
    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

// =============================================================================
// get_payees
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GetPayeesParams {
    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,

    #[schemars(description = "The starting server knowledge for delta requests")]
    pub last_knowledge_of_server: Option<i64>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct PayeesResult {
    pub payees: Vec<PayeeView>,
    pub server_knowledge: i64,
}

pub async fn get_payees(ctx: &ToolContext, params: GetPayeesParams) -> Result<PayeesResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let response = ctx
        .api()
        .get_payees(&budget_id, params.last_knowledge_of_server)
        .await?;

    Ok(PayeesResult {
        payees: response.payees.into_iter().map(PayeeView::from).collect(),
        server_knowledge: response.server_knowledge,
    })
}

// =============================================================================
// get_payee_by_id / update_payee
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PayeeIdParams {
    #[schemars(description = "The payee ID")]
    pub payee_id: String,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

pub async fn get_payee_by_id(ctx: &ToolContext, params: PayeeIdParams) -> Result<PayeeView> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let payee = ctx
        .api()
        .get_payee_by_id(&budget_id, &params.payee_id)
        .await?;
    Ok(payee.into())
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpdatePayeeParams {
    #[schemars(description = "The payee ID to update")]
    pub payee_id: String,

    #[schemars(description = "New name for the payee")]
    pub name: String,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct UpdatePayeeResult {
    #[serde(flatten)]
    pub payee: PayeeView,
    pub message: String,
}

pub async fn update_payee(ctx: &ToolContext, params: UpdatePayeeParams) -> Result<UpdatePayeeResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let save = SavePayee { name: params.name };

    let payee = ctx
        .api()
        .update_payee(&budget_id, &params.payee_id, &save)
        .await?;

    Ok(UpdatePayeeResult {
        payee: payee.into(),
        message: "Payee updated successfully".to_string(),
    })
}

// =============================================================================
// Payee locations
// =============================================================================

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct PayeeLocationsResult {
    pub payee_locations: Vec<PayeeLocationView>,
}

pub async fn get_payee_locations(
    ctx: &ToolContext,
    params: BudgetOnlyParams,
) -> Result<PayeeLocationsResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let locations = ctx.api().get_payee_locations(&budget_id).await?;

    Ok(PayeeLocationsResult {
        payee_locations: locations.into_iter().map(PayeeLocationView::from).collect(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PayeeLocationIdParams {
    #[schemars(description = "The payee location ID")]
    pub payee_location_id: String,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

pub async fn get_payee_location_by_id(
    ctx: &ToolContext,
    params: PayeeLocationIdParams,
) -> Result<PayeeLocationView> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let location = ctx
        .api()
        .get_payee_location_by_id(&budget_id, &params.payee_location_id)
        .await?;
    Ok(location.into())
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct PayeeLocationsByPayeeResult {
    pub payee_id: String,
    pub locations: Vec<PayeeLocationView>,
}

pub async fn get_payee_locations_by_payee(
    ctx: &ToolContext,
    params: PayeeIdParams,
) -> Result<PayeeLocationsByPayeeResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let locations = ctx
        .api()
        .get_payee_locations_by_payee(&budget_id, &params.payee_id)
        .await?;

    Ok(PayeeLocationsByPayeeResult {
        payee_id: params.payee_id,
        locations: locations.into_iter().map(PayeeLocationView::from).collect(),
    })
}

// =============================================================================
// search_payees
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchPayeesParams {
    #[schemars(description = "Text to match against payee names (case-insensitive)")]
    pub search_term: String,

    #[schemars(description = "Budget ID, 'last-used', or 'default'")]
    #[serde(default = "default_budget_id")]
    pub budget_id: String,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct SearchPayeesResult {
    pub search_term: String,
    pub matches: Vec<PayeeView>,
    pub count: usize,
}

/// Case-insensitive substring search over the full payee list
pub async fn search_payees(
    ctx: &ToolContext,
    params: SearchPayeesParams,
) -> Result<SearchPayeesResult> {
    let budget_id = ctx.budget_id(&params.budget_id);
    let response = ctx.api().get_payees(&budget_id, None).await?;

    let needle = params.search_term.to_lowercase();
    let matches: Vec<PayeeView> = response
        .payees
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .map(PayeeView::from)
        .collect();

    Ok(SearchPayeesResult {
        count: matches.len(),
        search_term: params.search_term,
        matches,
    })
}
