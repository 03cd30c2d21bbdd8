use std::fmt;

use thiserror::Error;

/// Which external service a fetch failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    ShortRange,
    LongRange,
    Geocoder,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Upstream::ShortRange => "short-range forecast",
            Upstream::LongRange => "day summary",
            Upstream::Geocoder => "geocoder",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by a weather refresh. The engine never retries; callers
/// decide whether to surface, log, or try again.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The free-text location could not be resolved to a coordinate.
    #[error("no coordinate found for {0:?}")]
    GeocodeNotFound(String),

    /// Non-success status, timeout, or transport failure.
    #[error("{upstream} unavailable: {reason}")]
    UpstreamUnavailable { upstream: Upstream, reason: String },

    /// Success status but an undecodable payload.
    #[error("{upstream} returned an undecodable payload")]
    MalformedResponse { upstream: Upstream },

    /// The caller abandoned the refresh. Never logged as a failure and never
    /// produced by the engine itself; callers racing a refresh against
    /// navigation map their abandoned branch to this.
    #[error("refresh cancelled")]
    Cancelled,
}

impl FetchError {
    pub(crate) fn unavailable(upstream: Upstream, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            upstream,
            reason: reason.into(),
        }
    }

    /// Maps a reqwest failure from `upstream`, keeping the malformed-payload
    /// case distinct from transport errors.
    pub(crate) fn from_reqwest(upstream: Upstream, err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse { upstream }
        } else {
            Self::unavailable(upstream, err.to_string())
        }
    }
}
