//! Incremental text streams.

use futures_util::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tessera_error::TesseraResult;

/// A single chunk from a streaming response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Incremental text
    pub text: String,
    /// Whether this is the final chunk
    pub is_final: bool,
}

impl StreamChunk {
    /// A non-final text chunk.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }

    /// The end-of-stream marker.
    pub fn end() -> Self {
        Self {
            text: String::new(),
            is_final: true,
        }
    }
}

/// Boxed stream of chunks returned by an invoker.
pub type TokenStream = Pin<Box<dyn Stream<Item = TesseraResult<StreamChunk>> + Send>>;

/// Drain a token stream into one string.
///
/// Stops at the first final chunk. A transport error mid-stream aborts the
/// drain and is returned.
///
/// # Examples
///
/// ```
/// use futures_util::stream;
/// use tessera_error::TesseraResult;
/// use tessera_interface::{StreamChunk, TokenStream, collect_text};
///
/// # #[tokio::main]
/// # async fn main() {
/// let chunks: Vec<TesseraResult<StreamChunk>> = vec![
///     Ok(StreamChunk::text("Hello, ")),
///     Ok(StreamChunk::text("world")),
///     Ok(StreamChunk::end()),
///     Ok(StreamChunk::text("ignored")),
/// ];
/// let stream: TokenStream = Box::pin(stream::iter(chunks));
/// assert_eq!(collect_text(stream).await.unwrap(), "Hello, world");
/// # }
/// ```
pub async fn collect_text(mut stream: TokenStream) -> TesseraResult<String> {
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        text.push_str(&chunk.text);
        if chunk.is_final {
            break;
        }
    }
    Ok(text)
}
