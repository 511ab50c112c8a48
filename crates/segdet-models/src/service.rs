//! Upstream service families.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upstream service that owns a long-running job.
///
/// Selects the status normalizer applied to the job's notifications.
/// The serialized names are the provider signing names, which is also what
/// is persisted in the correlation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    /// Transcoding jobs (MediaConvert).
    #[serde(rename = "mediaconvert")]
    Transcode,
    /// Video analysis jobs (Rekognition).
    #[serde(rename = "rekognition")]
    VideoAnalysis,
    /// Document analysis jobs (Textract).
    #[serde(rename = "textract")]
    DocumentAnalysis,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 3] = [
        ServiceKind::Transcode,
        ServiceKind::VideoAnalysis,
        ServiceKind::DocumentAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Transcode => "mediaconvert",
            ServiceKind::VideoAnalysis => "rekognition",
            ServiceKind::DocumentAnalysis => "textract",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a persisted service name is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service: {0}")]
pub struct UnknownService(pub String);

impl FromStr for ServiceKind {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownService(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_kind_parses_its_own_names() {
        for kind in ServiceKind::ALL {
            assert_eq!(kind.as_str().parse::<ServiceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_service_kind_rejects_unknown() {
        let err = "transcribe".parse::<ServiceKind>().unwrap_err();
        assert_eq!(err, UnknownService("transcribe".to_string()));
    }

    #[test]
    fn test_service_kind_serde_names() {
        let json = serde_json::to_string(&ServiceKind::VideoAnalysis).unwrap();
        assert_eq!(json, "\"rekognition\"");
        let kind: ServiceKind = serde_json::from_str("\"mediaconvert\"").unwrap();
        assert_eq!(kind, ServiceKind::Transcode);
    }
}
