//! Messages exchanged with the parse/print worker.
//!
//! Every message is a plain serde type so it can cross a thread or process
//! boundary. [`encode`] / [`decode`] use MessagePack with named fields.

use crate::error::WorkerResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use uisync_core::model::{HighlightBounds, ParseSuccess, ParsedTextFile};
use uisync_core::uid::Uid;

/// Correlates a response with its request. Issued by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ─── Requests ────────────────────────────────────────────────────────────

/// Parse `content`, reusing UIDs of `previous_parsed` by structural position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseFile {
    pub file_name: String,
    pub content: String,
    pub previous_parsed: Option<ParseSuccess>,
    /// Echoed back so the caller can drop results older than its file.
    pub last_revised_time: u64,
}

/// Print a tree back to code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintCode {
    pub file_name: String,
    pub parse_success: ParseSuccess,
    pub strip_uids: bool,
    pub last_revised_time: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseOrPrint {
    ParseFile(ParseFile),
    PrintCode(PrintCode),
}

impl ParseOrPrint {
    pub fn file_name(&self) -> &str {
        match self {
            ParseOrPrint::ParseFile(f) => &f.file_name,
            ParseOrPrint::PrintCode(f) => &f.file_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsePrintFilesRequest {
    pub message_id: MessageId,
    pub files: Vec<ParseOrPrint>,
    /// UIDs taken by files outside this request; new UIDs avoid them.
    pub already_existing_uids: HashSet<Uid>,
}

// ─── Responses ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseFileResult {
    pub file_name: String,
    pub parse_result: ParsedTextFile,
    pub last_revised_time: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintCodeResult {
    pub file_name: String,
    pub print_result: String,
    /// Where each element landed in the printed code. Empty when the printed
    /// code could not be read back.
    pub highlight_bounds: BTreeMap<Uid, HighlightBounds>,
    pub last_revised_time: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseOrPrintResult {
    ParseFile(ParseFileResult),
    PrintCode(PrintCodeResult),
}

impl ParseOrPrintResult {
    pub fn file_name(&self) -> &str {
        match self {
            ParseOrPrintResult::ParseFile(r) => &r.file_name,
            ParseOrPrintResult::PrintCode(r) => &r.file_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParsePrintResultMessage {
    FilesResult {
        message_id: MessageId,
        files: Vec<ParseOrPrintResult>,
    },
    Failed {
        message_id: MessageId,
    },
}

impl ParsePrintResultMessage {
    pub fn message_id(&self) -> MessageId {
        match self {
            ParsePrintResultMessage::FilesResult { message_id, .. }
            | ParsePrintResultMessage::Failed { message_id } => *message_id,
        }
    }
}

// ─── Wire encoding ───────────────────────────────────────────────────────

/// Encode a message as MessagePack.
pub fn encode<T: Serialize>(message: &T) -> WorkerResult<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(message)?)
}

/// Decode a message encoded by [`encode`].
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> WorkerResult<T> {
    Ok(rmp_serde::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkerError;
    use pretty_assertions::assert_eq;
    use uisync_core::parser::parse_code_fresh;

    #[test]
    fn request_survives_the_wire() {
        let previous = parse_code_fresh(
            "/app.jsx",
            "export const App = () => <div data-uid=\"root\" />\n",
        )
        .into_success();
        let request = ParsePrintFilesRequest {
            message_id: MessageId(7),
            files: vec![ParseOrPrint::ParseFile(ParseFile {
                file_name: "/app.jsx".to_string(),
                content: "export const App = () => <div />\n".to_string(),
                previous_parsed: previous,
                last_revised_time: 3,
            })],
            already_existing_uids: HashSet::from([Uid::intern("taken")]),
        };
        let bytes = encode(&request).expect("encodes");
        let decoded: ParsePrintFilesRequest = decode(&bytes).expect("decodes");
        assert_eq!(decoded, request);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let result: WorkerResult<ParsePrintResultMessage> = decode(&[0xc1, 0x00]);
        assert!(matches!(result, Err(WorkerError::Decode(_))));
    }

    #[test]
    fn message_id_of_either_response() {
        let failed = ParsePrintResultMessage::Failed {
            message_id: MessageId(4),
        };
        assert_eq!(failed.message_id(), MessageId(4));
        assert_eq!(MessageId(4).to_string(), "#4");
    }
}
