//! Scripted invoker for testing.

use async_trait::async_trait;
use futures::stream;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tessera_error::{ClientError, ClientErrorKind, TesseraResult};
use tessera_interface::{AgentInvoker, StreamChunk, TokenStream};

/// What a scripted call answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Stream this text, split in two chunks
    Text(String),
    /// Fail the call
    Error,
    /// Stream half the text, then fail mid-stream
    BrokenStream(String),
    /// Never answer
    Hang,
}

/// Which call shape was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Extraction,
    Proposal,
    Weaving,
}

/// One agent's replies, per phase.
#[derive(Debug, Clone)]
pub struct Script {
    pub extraction: Reply,
    pub proposal: Reply,
    pub weaving: Reply,
}

impl Script {
    /// An agent that answers every phase well.
    pub fn happy(title: &str, content: &str, position: &str, refined: &str) -> Self {
        Self {
            extraction: Reply::Text(
                json!({
                    "has_memory": true,
                    "memory_title": title,
                    "memory_content": content,
                    "emotion": "nostalgic",
                    "time_hint": "one summer",
                    "unique_detail": "a detail"
                })
                .to_string(),
            ),
            proposal: Reply::Text(
                json!({
                    "proposed_position": position,
                    "reason": "fits",
                    "connection_to_others": "shares the heat",
                    "transition_suggestion": "And then"
                })
                .to_string(),
            ),
            weaving: Reply::Text(refined.to_string()),
        }
    }

    /// An agent with nothing relevant to share.
    pub fn no_memory() -> Self {
        Self {
            extraction: Reply::Text(r#"{"has_memory": false}"#.to_string()),
            proposal: Reply::Error,
            weaving: Reply::Error,
        }
    }

    pub fn with_extraction(mut self, reply: Reply) -> Self {
        self.extraction = reply;
        self
    }

    pub fn with_proposal(mut self, reply: Reply) -> Self {
        self.proposal = reply;
        self
    }

    pub fn with_weaving(mut self, reply: Reply) -> Self {
        self.weaving = reply;
        self
    }
}

/// Mock invoker keyed by bearer token.
///
/// Unknown tokens fail every call.
#[derive(Clone, Default)]
pub struct MockInvoker {
    scripts: HashMap<String, Script>,
    calls: Arc<Mutex<Vec<(String, CallKind, String)>>>,
}

impl MockInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, token: &str, script: Script) -> Self {
        self.scripts.insert(token.to_string(), script);
        self
    }

    /// Every call made so far as `(token, kind)`, in order.
    pub fn calls(&self) -> Vec<(String, CallKind)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(token, kind, _)| (token.clone(), *kind))
            .collect()
    }

    /// Number of calls of `kind`.
    pub fn call_count(&self, kind: CallKind) -> usize {
        self.calls().iter().filter(|(_, k)| *k == kind).count()
    }

    /// Messages sent with calls of `kind` as `(token, message)`, in order.
    pub fn messages(&self, kind: CallKind) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(token, _, message)| (token.clone(), message.clone()))
            .collect()
    }

    async fn reply(
        &self,
        token: &str,
        kind: CallKind,
        message: &str,
    ) -> TesseraResult<TokenStream> {
        self.calls
            .lock()
            .unwrap()
            .push((token.to_string(), kind, message.to_string()));
        let reply = match self.scripts.get(token) {
            Some(script) => match kind {
                CallKind::Extraction => script.extraction.clone(),
                CallKind::Proposal => script.proposal.clone(),
                CallKind::Weaving => script.weaving.clone(),
            },
            None => Reply::Error,
        };

        match reply {
            Reply::Text(text) => {
                let mid = text.char_indices().nth(text.chars().count() / 2).map_or(0, |(i, _)| i);
                let (head, tail) = text.split_at(mid);
                let chunks: Vec<TesseraResult<StreamChunk>> = vec![
                    Ok(StreamChunk::text(head)),
                    Ok(StreamChunk::text(tail)),
                    Ok(StreamChunk::end()),
                ];
                Ok(Box::pin(stream::iter(chunks)))
            }
            Reply::BrokenStream(text) => {
                let chunks: Vec<TesseraResult<StreamChunk>> = vec![
                    Ok(StreamChunk::text(text)),
                    Err(ClientError::new(ClientErrorKind::Stream("connection reset".into()))
                        .into()),
                ];
                Ok(Box::pin(stream::iter(chunks)))
            }
            Reply::Error => {
                Err(ClientError::new(ClientErrorKind::Http("mock failure".into())).into())
            }
            Reply::Hang => {
                futures::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

#[async_trait]
impl AgentInvoker for MockInvoker {
    async fn act(
        &self,
        access_token: &str,
        message: &str,
        action_control: &str,
    ) -> TesseraResult<TokenStream> {
        let kind = if action_control.contains("proposed_position") {
            CallKind::Proposal
        } else {
            CallKind::Extraction
        };
        self.reply(access_token, kind, message).await
    }

    async fn chat(&self, access_token: &str, message: &str) -> TesseraResult<TokenStream> {
        self.reply(access_token, CallKind::Weaving, message).await
    }
}
