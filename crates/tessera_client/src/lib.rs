//! Client for the SecondMe agent-hosting service.
//!
//! Every participant in a Tessera story is a SecondMe agent. This crate
//! covers the parts of the SecondMe API the engine needs:
//!
//! - streaming `act` (structured) and `chat` (free-form) calls, decoded from
//!   server-sent events into a [`TokenStream`](tessera_interface::TokenStream)
//! - OAuth2 code exchange and token refresh, including refreshing an
//!   agent whose stored token has expired
//! - profile lookups (user info, shades, soft memory) and note writing
//! - onboarding a freshly authorized user into an agent directory
//!
//! [`SecondMeClient`] implements [`AgentInvoker`](tessera_interface::AgentInvoker),
//! so the orchestrator can drive live agents through it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod dto;
mod onboarding;
mod settings;
mod sse;

pub use client::SecondMeClient;
pub use dto::{Envelope, Shade, SoftMemory, TokenGrant, UserInfo};
pub use onboarding::{
    DEFAULT_TOKEN_LIFETIME_SECS, STARTING_CREDITS, refresh_if_expired, register_agent,
};
pub use settings::{ClientSettings, ClientSettingsBuilder, OAuthApp};
pub use sse::{SseDecoder, SseEvent, decode_sse_stream};
