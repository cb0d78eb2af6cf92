//! # JSON-Line Session
//!
//! One invocation per input line, one response per output line.

use std::io::{BufRead, Write};

use parcel_registry::ipc::{Invocation, RegistryHandler, Response};
use parcel_registry::ports::ParcelRegistryApi;
use serde::Serialize;
use tracing::{debug, warn};

/// Response as written to the output stream.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WireResponse {
    Success { payload: String },
    Error { message: String },
}

impl From<Response> for WireResponse {
    fn from(response: Response) -> Self {
        match response {
            Response::Success { payload } => Self::Success {
                payload: String::from_utf8_lossy(&payload).into_owned(),
            },
            Response::Error { message } => Self::Error { message },
        }
    }
}

/// Counters for one session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub handled: u64,
    pub rejected_lines: u64,
}

/// Read invocations from `input` until EOF, writing one response per line.
pub fn run<A, R, W>(
    handler: &RegistryHandler<A>,
    mut input: R,
    mut output: W,
) -> anyhow::Result<SessionSummary>
where
    A: ParcelRegistryApi,
    R: BufRead,
    W: Write,
{
    let mut summary = SessionSummary::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let response = match parse_line(&buf) {
            Ok(None) => continue,
            Ok(Some(invocation)) => {
                debug!(line = line_no, function = %invocation.function, "Dispatching");
                summary.handled += 1;
                WireResponse::from(handler.handle(&invocation))
            }
            Err(reason) => {
                warn!(line = line_no, error = %reason, "Unparsable invocation");
                summary.rejected_lines += 1;
                WireResponse::Error {
                    message: format!("invalid invocation on line {line_no}: {reason}"),
                }
            }
        };

        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
    }

    output.flush()?;
    Ok(summary)
}

/// `Ok(None)` for blank lines.
fn parse_line(raw: &[u8]) -> Result<Option<Invocation>, String> {
    let text = std::str::from_utf8(raw).map_err(|e| e.to_string())?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text).map(Some).map_err(|e| e.to_string())
}
