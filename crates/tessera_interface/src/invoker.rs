//! Agent invocation.

use crate::TokenStream;
use async_trait::async_trait;
use tessera_error::TesseraResult;

/// Turns a prompt into a token stream on behalf of one agent.
///
/// Two call shapes exist. [`act`](Self::act) is the structured call: the
/// `action_control` text tells the agent what JSON object to answer with.
/// [`chat`](Self::chat) is free-form generation. Both authenticate with the
/// agent's bearer token.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    /// Structured-output call.
    async fn act(
        &self,
        access_token: &str,
        message: &str,
        action_control: &str,
    ) -> TesseraResult<TokenStream>;

    /// Free-form call.
    async fn chat(&self, access_token: &str, message: &str) -> TesseraResult<TokenStream>;
}
