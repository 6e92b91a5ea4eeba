//! Tool executor: maps each validated tool call onto one backend request.

use serde_json::{json, Map, Value};
use tracing::debug;

use super::params::{ToolCall, UpdateNoteArgs};
use crate::backend::{BackendClient, BackendRequest};
use crate::error::Result;

/// Fixed field projection requested by `get_note`.
pub const NOTE_FIELDS: &str = "id,parent_id,title,body,markup_language";

impl ToolCall {
    /// Build the backend request this call translates to.
    pub fn to_request(&self) -> BackendRequest {
        match self {
            ToolCall::ListNotes(args) => {
                let req = match &args.folder_id {
                    Some(folder) => BackendRequest::get(["folders", folder.as_str(), "notes"]),
                    None => BackendRequest::get(["notes"]),
                };
                req.query_opt("limit", args.limit.filter(|&n| n > 0))
                    .query_opt("page", args.page.filter(|&n| n > 1))
            }
            ToolCall::GetNote(args) => {
                BackendRequest::get(["notes", args.note_id.as_str()]).query("fields", NOTE_FIELDS)
            }
            ToolCall::CreateNote(args) => {
                let mut body = json!({
                    "title": args.title,
                    "body": args.body,
                });
                if let Some(folder) = &args.folder_id {
                    body["folder_id"] = json!(folder);
                }
                BackendRequest::post(["notes"]).json(body)
            }
            ToolCall::UpdateNote(args) => {
                BackendRequest::put(["notes", args.note_id.as_str()]).json(update_body(args))
            }
            ToolCall::DeleteNote(args) => BackendRequest::delete(["notes", args.note_id.as_str()]),
            ToolCall::SearchNotes(args) => BackendRequest::get(["search"])
                .query("query", &args.query)
                .query_opt("type", args.item_type.as_ref()),
            ToolCall::ListFolders => BackendRequest::get(["folders"]),
            ToolCall::ListTags => BackendRequest::get(["tags"]),
        }
    }
}

/// Partial update: only supplied fields are sent.
fn update_body(args: &UpdateNoteArgs) -> Value {
    let mut body = Map::new();
    if let Some(title) = &args.title {
        body.insert("title".to_string(), json!(title));
    }
    if let Some(text) = &args.body {
        body.insert("body".to_string(), json!(text));
    }
    Value::Object(body)
}

/// Runs tool calls against the backend. Holds no per-call state.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    client: BackendClient,
}

impl ToolExecutor {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Validate and run one tool call, returning the result text.
    pub async fn execute(&self, name: &str, arguments: &Value) -> Result<String> {
        let call = ToolCall::parse(name, arguments)?;
        let request = call.to_request();
        debug!(tool = %call.name(), method = %request.method, path = %request.path(), "executing tool");

        let body = self.client.send(&request).await?;

        match call {
            ToolCall::DeleteNote(args) => Ok(format!("Note {} deleted successfully", args.note_id)),
            _ => Ok(body),
        }
    }
}
