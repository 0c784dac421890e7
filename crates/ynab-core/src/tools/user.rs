//! User tools

use serde::Serialize;

use super::ToolContext;
use crate::error::Result;

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct UserResult {
    pub id: String,
    pub message: String,
}

pub async fn get_user(ctx: &ToolContext) -> Result<UserResult> {
    let user = ctx.api().get_user().await?;
    Ok(UserResult {
        id: user.id,
        message: "User information retrieved successfully".to_string(),
    })
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
pub struct VerifyApiKeyResult {
    pub valid: bool,
    pub user_id: String,
    pub message: String,
}

/// Check the credential with one authenticated request
pub async fn verify_api_key(ctx: &ToolContext) -> Result<VerifyApiKeyResult> {
    let user = ctx.api().get_user().await?;
    Ok(VerifyApiKeyResult {
        valid: true,
        user_id: user.id,
        message: "API key is valid and authenticated".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::envelope;
    use crate::tools::test_support::mock_context;

    #[tokio::test]
    async fn test_get_user() {
        let (ctx, _) = mock_context(None);
        let user = get_user(&ctx).await.unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.message, "User information retrieved successfully");
    }

    #[tokio::test]
    async fn test_verify_api_key_valid() {
        let (ctx, _) = mock_context(None);
        let result = verify_api_key(&ctx).await.unwrap();
        assert!(result.valid);
        assert_eq!(result.user_id, "user-1");
    }

    #[tokio::test]
    async fn test_verify_api_key_invalid_is_error_envelope() {
        let (ctx, mock) = mock_context(None);
        mock.fail_next(401, "unauthorized", "Unauthorized");

        let value = envelope("verify_api_key", verify_api_key(&ctx).await);
        assert_eq!(value.as_object().unwrap().len(), 1);
        assert!(value["error"].as_str().unwrap().contains("401"));
    }
}
