//! Typed failures reported by upstream services.

use thiserror::Error;

/// An upstream service answered, but not with usable data.
///
/// Transport failures stay as `reqwest` errors; these cover the cases where a
/// response arrived and was rejected.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("subgraph errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("{0} response contained no data")]
    MissingData(&'static str),
}
