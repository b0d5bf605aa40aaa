//! SSE delta decoding.
//!
//! The completion endpoint frames its response as one specific SSE dialect:
//! each event sits on a single `data: ` line, the literal `[DONE]` payload
//! ends the stream, and every other line is noise. The decoder is a lazy,
//! forward-only pass over the response bytes; it holds at most one
//! unterminated line in memory and is not restartable.
//!
//! Malformed payloads are dropped, not fatal: one garbled event must not
//! abort an otherwise healthy stream.

use async_stream::try_stream;
use bytes::Bytes;
use futures_util::{pin_mut, Stream, StreamExt};
use log::{debug, warn};

use crate::api::models::{ChatCompletionStreamChunk, ChatDelta};
use crate::error::ClientError;

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

enum LineOutcome {
    Delta(ChatDelta),
    Skip,
    Done,
}

fn decode_line(raw: &[u8]) -> LineOutcome {
    let Ok(line) = std::str::from_utf8(raw) else {
        warn!("Skipping non-UTF-8 stream line");
        return LineOutcome::Skip;
    };
    let line = line.strip_suffix('\r').unwrap_or(line);

    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        // Blank separators, comments, event/id fields: all ignored.
        return LineOutcome::Skip;
    };

    if payload == DONE_SENTINEL {
        return LineOutcome::Done;
    }

    match serde_json::from_str::<ChatCompletionStreamChunk>(payload) {
        Ok(chunk) => match chunk.content_fragment() {
            Some(content) => LineOutcome::Delta(ChatDelta { content }),
            // "No content this event" is indistinguishable from malformed
            // as far as callers observe: nothing is emitted either way.
            None => LineOutcome::Skip,
        },
        Err(e) => {
            debug!("Skipping malformed stream event: {e}, data: {payload}");
            LineOutcome::Skip
        }
    }
}

/// Decode a response byte stream into an ordered sequence of deltas.
///
/// Terminates on the `[DONE]` sentinel (without reading further), on
/// end-of-input, or after surfacing one transport error.
pub fn delta_stream<S>(bytes: S) -> impl Stream<Item = Result<ChatDelta, ClientError>>
where
    S: Stream<Item = reqwest::Result<Bytes>>,
{
    try_stream! {
        pin_mut!(bytes);
        let mut buf: Vec<u8> = Vec::new();
        let mut done = false;

        while !done {
            let chunk = match bytes.next().await {
                Some(chunk) => chunk?,
                None => break,
            };
            buf.extend_from_slice(&chunk);

            while let Some(newline) = buf.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buf.drain(..=newline).collect();
                match decode_line(&line[..line.len() - 1]) {
                    LineOutcome::Delta(delta) => yield delta,
                    LineOutcome::Skip => {}
                    LineOutcome::Done => {
                        done = true;
                        break;
                    }
                }
            }
        }

        // A final line without a trailing newline still counts.
        if !done && !buf.is_empty() {
            if let LineOutcome::Delta(delta) = decode_line(&buf) {
                yield delta;
            }
        }
    }
}
