//! Defines the event and message structures for communication between the
//! workers, the web view and the event loop.

use serde::Deserialize;

use crate::core::{ExpansionListing, NodeId, ScanResult, SortColumn};

/// Events delivered to the event loop (UI thread) through the proxy.
///
/// This is the only way anything outside the UI thread talks to the
/// application state.
#[derive(Debug)]
pub enum UserEvent {
    /// A gesture forwarded from the web view.
    Command(UiCommand),
    /// A selection scan finished on a worker.
    ScanFinished(Box<ScanResult>),
    /// The subdirectories of an expanded node were listed on a worker.
    ExpansionFinished {
        node: NodeId,
        listing: ExpansionListing,
    },
}

/// A message received from the WebView via the IPC channel.
#[derive(Deserialize, Debug)]
pub struct IpcMessage {
    /// The name of the command to execute.
    pub command: String,
    /// The payload associated with the command, as a JSON value.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// A parsed IPC command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// The page finished loading and wants its first render.
    Ready,
    Select(NodeId),
    Expand(NodeId),
    Collapse(NodeId),
    Sort(SortColumn),
    /// Re-scan the selected directory.
    Refresh,
}

#[derive(Deserialize)]
struct NodePayload {
    id: NodeId,
}

#[derive(Deserialize)]
struct SortPayload {
    column: SortColumn,
}

impl TryFrom<IpcMessage> for UiCommand {
    type Error = String;

    fn try_from(message: IpcMessage) -> Result<Self, Self::Error> {
        let node = |payload: serde_json::Value| {
            serde_json::from_value::<NodePayload>(payload)
                .map(|p| p.id)
                .map_err(|e| format!("Invalid node payload: {e}"))
        };

        match message.command.as_str() {
            "ready" => Ok(UiCommand::Ready),
            "refresh" => Ok(UiCommand::Refresh),
            "select" => node(message.payload).map(UiCommand::Select),
            "expand" => node(message.payload).map(UiCommand::Expand),
            "collapse" => node(message.payload).map(UiCommand::Collapse),
            "sort" => serde_json::from_value::<SortPayload>(message.payload)
                .map(|p| UiCommand::Sort(p.column))
                .map_err(|e| format!("Invalid sort payload: {e}")),
            other => Err(format!("Unknown command: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<UiCommand, String> {
        let message: IpcMessage = serde_json::from_str(raw).unwrap();
        UiCommand::try_from(message)
    }

    #[test]
    fn test_parses_node_commands() {
        let Ok(UiCommand::Select(id)) = parse(r#"{"command":"select","payload":{"id":4}}"#) else {
            panic!("select did not parse");
        };
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!(4));
        assert!(matches!(
            parse(r#"{"command":"expand","payload":{"id":1}}"#),
            Ok(UiCommand::Expand(_))
        ));
        assert!(matches!(
            parse(r#"{"command":"collapse","payload":{"id":1}}"#),
            Ok(UiCommand::Collapse(_))
        ));
    }

    #[test]
    fn test_parses_payloadless_and_sort_commands() {
        assert_eq!(parse(r#"{"command":"ready"}"#), Ok(UiCommand::Ready));
        assert_eq!(
            parse(r#"{"command":"refresh","payload":null}"#),
            Ok(UiCommand::Refresh)
        );
        assert_eq!(
            parse(r#"{"command":"sort","payload":{"column":"modified"}}"#),
            Ok(UiCommand::Sort(SortColumn::Modified))
        );
    }

    #[test]
    fn test_rejects_bad_messages() {
        assert!(parse(r#"{"command":"select","payload":{"id":"x"}}"#).is_err());
        assert!(parse(r#"{"command":"sort","payload":{"column":"color"}}"#).is_err());
        assert!(parse(r#"{"command":"delete","payload":{}}"#).is_err());
    }
}
