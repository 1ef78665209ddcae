use error_stack::{AttachmentKind, FrameKind, Report};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub type ModelResult<T> = Result<T, Report<Error>>;

#[derive(Error, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Error {
    #[error("Parse error")]
    ParseError,

    #[error(
        "Unsupported network: {chain_id}. Supported networks: {}",
        join_chain_ids(.supported)
    )]
    UnsupportedChain { chain_id: u32, supported: Vec<u32> },

    #[error("Chain registry error: {0}")]
    RegistryError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Reqwest error: {0}")]
    ReqwestError(String),

    #[error("Upstream responded with status {status}")]
    UpstreamStatus { status: u16, details: Value },

    #[error("Serde deserialize error: {0}")]
    SerdeDeserialize(String),
}

pub fn join_chain_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub trait ReportDisplayExt {
    fn format(&self) -> String;
}

impl ReportDisplayExt for Report<Error> {
    fn format(&self) -> String {
        let mut output = String::new();

        for frame in self.current_frames() {
            if let FrameKind::Attachment(AttachmentKind::Printable(attachment)) = frame.kind() {
                output.push_str(&format!(" {attachment} "));
            }
        }

        output.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use error_stack::report;

    #[test]
    fn test_format_report() {
        let report = report!(Error::ParseError).attach_printable("bad chain id");
        assert_eq!("bad chain id".to_string(), report.format());
    }

    #[test]
    fn test_unsupported_chain_message_lists_ids() {
        let error = Error::UnsupportedChain {
            chain_id: 999,
            supported: vec![1, 56, 137],
        };
        assert_eq!(
            error.to_string(),
            "Unsupported network: 999. Supported networks: 1, 56, 137"
        );
    }
}
