//! A line-oriented request/response channel for hosts that ask for grids by
//! message rather than by function call.
//!
//! Each input line is a JSON object such as
//! `{"anchor": "2018 Jan 15", "offset": -1}` (`offset` may be omitted).  Each
//! request is answered by exactly one output line, either
//! `{"grid": ["2017-11-26", ...]}` or `{"error": "..."}`, in the order the
//! requests were received.
use crate::cell::CellFormat;
use crate::grid::build_grid;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GridRequest {
    pub anchor: String,
    #[serde(default)]
    pub offset: Option<i32>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridResponse {
    Grid(Vec<String>),
    Error(String),
}

impl GridResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, GridResponse::Error(_))
    }
}

/// Counts of how `serve()` answered its requests
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ServeStats {
    pub answered: usize,
    pub failed: usize,
}

pub fn respond(request: &GridRequest, format: CellFormat) -> GridResponse {
    match build_grid(&request.anchor, request.offset.unwrap_or(0)) {
        Ok(grid) => GridResponse::Grid(grid.render(format)),
        Err(e) => GridResponse::Error(e.to_string()),
    }
}

/// Answer requests read from `reader` until end of input, writing responses
/// to `writer`.  Blank lines are skipped.  Lines that are not valid JSON (or
/// not UTF-8 at all) are answered with an error; only I/O errors stop the
/// loop.
pub fn serve<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    format: CellFormat,
) -> io::Result<ServeStats> {
    let mut stats = ServeStats::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }
        let response = match serde_json::from_slice::<GridRequest>(line) {
            Ok(request) => {
                debug!(anchor = %request.anchor, offset = ?request.offset, "answering grid request");
                respond(&request, format)
            }
            Err(e) => {
                warn!(error = %e, "malformed grid request");
                GridResponse::Error(format!("malformed request: {e}"))
            }
        };
        if let GridResponse::Error(msg) = &response {
            debug!(error = %msg, "grid request failed");
            stats.failed += 1;
        } else {
            stats.answered += 1;
        }
        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    info!(
        answered = stats.answered,
        failed = stats.failed,
        "request stream closed"
    );
    Ok(stats)
}
