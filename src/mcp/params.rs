//! Typed tool arguments.
//!
//! `tools/call` delivers an untyped argument map. [`ToolCall::parse`] turns
//! it into one variant per tool, rejecting unknown names and malformed or
//! missing arguments before anything is sent to the backend.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{BridgeError, Result};

/// Every tool the adapter exposes, in listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ListNotes,
    GetNote,
    CreateNote,
    UpdateNote,
    DeleteNote,
    SearchNotes,
    ListFolders,
    ListTags,
}

impl ToolName {
    pub const ALL: [ToolName; 8] = [
        ToolName::ListNotes,
        ToolName::GetNote,
        ToolName::CreateNote,
        ToolName::UpdateNote,
        ToolName::DeleteNote,
        ToolName::SearchNotes,
        ToolName::ListFolders,
        ToolName::ListTags,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ListNotes => "list_notes",
            ToolName::GetNote => "get_note",
            ToolName::CreateNote => "create_note",
            ToolName::UpdateNote => "update_note",
            ToolName::DeleteNote => "delete_note",
            ToolName::SearchNotes => "search_notes",
            ToolName::ListFolders => "list_folders",
            ToolName::ListTags => "list_tags",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        ToolName::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BridgeError::UnknownTool(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListNotesArgs {
    #[serde(default)]
    pub folder_id: Option<String>,
    /// Sent only when > 0.
    #[serde(default)]
    pub limit: Option<i64>,
    /// Sent only when > 1.
    #[serde(default)]
    pub page: Option<i64>,
}

/// Arguments for the tools that address one note by id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NoteIdArgs {
    pub note_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateNoteArgs {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub folder_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateNoteArgs {
    pub note_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchNotesArgs {
    pub query: String,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
}

/// A validated tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    ListNotes(ListNotesArgs),
    GetNote(NoteIdArgs),
    CreateNote(CreateNoteArgs),
    UpdateNote(UpdateNoteArgs),
    DeleteNote(NoteIdArgs),
    SearchNotes(SearchNotesArgs),
    ListFolders,
    ListTags,
}

impl ToolCall {
    /// Resolve `name` and decode `arguments` for it.
    ///
    /// `null` arguments are treated as an empty object; any other non-object
    /// is rejected. Empty optional strings are normalized to `None`. Required
    /// `note_id`, `title` and `query` must be non-empty; `body` may be empty.
    /// Ids that end up as path segments may not be `.` or `..`.
    pub fn parse(name: &str, arguments: &Value) -> Result<Self> {
        let tool: ToolName = name.parse()?;

        let call = match tool {
            ToolName::ListNotes => {
                let mut args: ListNotesArgs = decode(tool, arguments)?;
                args.folder_id = non_empty(args.folder_id);
                if let Some(folder) = &args.folder_id {
                    path_id(tool, "folder_id", folder)?;
                }
                ToolCall::ListNotes(args)
            }
            ToolName::GetNote => {
                let args: NoteIdArgs = decode(tool, arguments)?;
                require_id(tool, "note_id", &args.note_id)?;
                ToolCall::GetNote(args)
            }
            ToolName::CreateNote => {
                let mut args: CreateNoteArgs = decode(tool, arguments)?;
                require(tool, "title", &args.title)?;
                args.folder_id = non_empty(args.folder_id);
                ToolCall::CreateNote(args)
            }
            ToolName::UpdateNote => {
                let mut args: UpdateNoteArgs = decode(tool, arguments)?;
                require_id(tool, "note_id", &args.note_id)?;
                args.title = non_empty(args.title);
                args.body = non_empty(args.body);
                ToolCall::UpdateNote(args)
            }
            ToolName::DeleteNote => {
                let args: NoteIdArgs = decode(tool, arguments)?;
                require_id(tool, "note_id", &args.note_id)?;
                ToolCall::DeleteNote(args)
            }
            ToolName::SearchNotes => {
                let mut args: SearchNotesArgs = decode(tool, arguments)?;
                require(tool, "query", &args.query)?;
                args.item_type = non_empty(args.item_type);
                ToolCall::SearchNotes(args)
            }
            ToolName::ListFolders => {
                ensure_object(tool, arguments)?;
                ToolCall::ListFolders
            }
            ToolName::ListTags => {
                ensure_object(tool, arguments)?;
                ToolCall::ListTags
            }
        };

        Ok(call)
    }

    pub fn name(&self) -> ToolName {
        match self {
            ToolCall::ListNotes(_) => ToolName::ListNotes,
            ToolCall::GetNote(_) => ToolName::GetNote,
            ToolCall::CreateNote(_) => ToolName::CreateNote,
            ToolCall::UpdateNote(_) => ToolName::UpdateNote,
            ToolCall::DeleteNote(_) => ToolName::DeleteNote,
            ToolCall::SearchNotes(_) => ToolName::SearchNotes,
            ToolCall::ListFolders => ToolName::ListFolders,
            ToolCall::ListTags => ToolName::ListTags,
        }
    }
}

fn decode<T: DeserializeOwned>(tool: ToolName, arguments: &Value) -> Result<T> {
    ensure_object(tool, arguments)?;
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    };
    serde_json::from_value(arguments)
        .map_err(|e| BridgeError::InvalidArguments(format!("{}: {}", tool, e)))
}

fn ensure_object(tool: ToolName, arguments: &Value) -> Result<()> {
    match arguments {
        Value::Null | Value::Object(_) => Ok(()),
        _ => Err(BridgeError::InvalidArguments(format!(
            "{}: arguments must be an object",
            tool
        ))),
    }
}

fn require(tool: ToolName, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(BridgeError::InvalidArguments(format!(
            "{}: missing required parameter: {}",
            tool, field
        )));
    }
    Ok(())
}

fn require_id(tool: ToolName, field: &str, value: &str) -> Result<()> {
    require(tool, field, value)?;
    path_id(tool, field, value)
}

/// Dot segments would be resolved away by URL normalization.
fn path_id(tool: ToolName, field: &str, value: &str) -> Result<()> {
    if value == "." || value == ".." {
        return Err(BridgeError::InvalidArguments(format!(
            "{}: invalid {}: {}",
            tool, field, value
        )));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
