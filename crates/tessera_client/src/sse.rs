//! Server-sent event decoding for the streaming endpoints.
//!
//! The service emits lines of the form `data: {json}` and ends the stream
//! with `data: [DONE]`. Transport chunks do not respect line boundaries, so
//! the decoder keeps the unterminated tail of the previous chunk and joins
//! it with the next one.

use crate::dto::DeltaEvent;
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use tessera_error::{ClientError, ClientErrorKind, TesseraResult};
use tessera_interface::{StreamChunk, TokenStream};

const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

/// A decoded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Incremental text
    Delta(String),
    /// End-of-stream sentinel
    Done,
}

/// Incremental line decoder.
///
/// # Examples
///
/// ```
/// use tessera_client::{SseDecoder, SseEvent};
///
/// let mut decoder = SseDecoder::new();
/// assert!(decoder.push(b"data: {\"choices\":[{\"delta\":{\"content\":\"He").is_empty());
/// let events = decoder.push(b"llo\"}}]}\ndata: [DONE]\n");
/// assert_eq!(events, vec![SseEvent::Delta("Hello".into()), SseEvent::Done]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes; returns the events completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = parse_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Decode whatever is left once the transport has closed.
    pub fn finish(&mut self) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        parse_line(&rest)
    }
}

fn parse_line(raw: &[u8]) -> Option<SseEvent> {
    let line = String::from_utf8_lossy(raw);
    let data = line.trim().strip_prefix(DATA_PREFIX)?.trim();
    if data == DONE_SENTINEL {
        return Some(SseEvent::Done);
    }
    match serde_json::from_str::<DeltaEvent>(data) {
        Ok(event) => event.into_text().map(SseEvent::Delta),
        Err(e) => {
            tracing::debug!(error = %e, "Skipping malformed event");
            None
        }
    }
}

struct DecodeState<S> {
    bytes: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<TesseraResult<StreamChunk>>,
    finished: bool,
}

impl<S> DecodeState<S> {
    fn enqueue(&mut self, events: impl IntoIterator<Item = SseEvent>) {
        for event in events {
            if self.finished {
                break;
            }
            match event {
                SseEvent::Delta(text) => self.pending.push_back(Ok(StreamChunk::text(text))),
                SseEvent::Done => {
                    self.pending.push_back(Ok(StreamChunk::end()));
                    self.finished = true;
                }
            }
        }
    }
}

/// Turn a raw byte stream into a token stream.
///
/// Decoupled from the transport so it can be driven by synthetic chunks.
/// A transport error is yielded once and ends the stream. If the transport
/// closes without the sentinel, the stream still ends with a final chunk.
pub fn decode_sse_stream<S, E>(bytes: S) -> TokenStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = DecodeState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(bytes)) => {
                    let events = state.decoder.push(&bytes);
                    state.enqueue(events);
                }
                Some(Err(e)) => {
                    state.pending.push_back(Err(ClientError::new(ClientErrorKind::Stream(
                        e.to_string(),
                    ))
                    .into()));
                    state.finished = true;
                }
                None => {
                    let tail = state.decoder.finish();
                    state.enqueue(tail);
                    if !state.finished {
                        state.pending.push_back(Ok(StreamChunk::end()));
                        state.finished = true;
                    }
                }
            }
        }
    }))
}
