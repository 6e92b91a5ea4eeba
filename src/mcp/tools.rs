//! Tool registry: names, descriptions and input schemas for tools/list.

use serde_json::{json, Value};

use super::params::ToolName;
use super::types::ToolDefinition;

/// The fixed tool catalog. Built once and shared for the process lifetime.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: ToolName::ALL.into_iter().map(definition).collect(),
        }
    }

    /// All tools, in declaration order.
    pub fn list(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }
}

fn definition(tool: ToolName) -> ToolDefinition {
    let (description, input_schema) = match tool {
        ToolName::ListNotes => (
            "List all notes or notes in a specific folder",
            json!({
                "type": "object",
                "properties": {
                    "folder_id": {
                        "type": "string",
                        "description": "Optional folder ID to filter notes"
                    },
                    "limit": {
                        "type": "number",
                        "description": "Number of notes per page (max 100)",
                        "default": 50
                    },
                    "page": {
                        "type": "number",
                        "description": "Page number (starts at 1)",
                        "default": 1
                    }
                }
            }),
        ),
        ToolName::GetNote => (
            "Get a specific note by ID",
            json!({
                "type": "object",
                "properties": {
                    "note_id": {
                        "type": "string",
                        "description": "The ID of the note to retrieve"
                    }
                },
                "required": ["note_id"]
            }),
        ),
        ToolName::CreateNote => (
            "Create a new note",
            json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "The title of the note"
                    },
                    "body": {
                        "type": "string",
                        "description": "The body of the note in Markdown"
                    },
                    "folder_id": {
                        "type": "string",
                        "description": "Optional folder ID to create the note in"
                    }
                },
                "required": ["title", "body"]
            }),
        ),
        ToolName::UpdateNote => (
            "Update an existing note",
            json!({
                "type": "object",
                "properties": {
                    "note_id": {
                        "type": "string",
                        "description": "The ID of the note to update"
                    },
                    "title": {
                        "type": "string",
                        "description": "New title for the note"
                    },
                    "body": {
                        "type": "string",
                        "description": "New body for the note in Markdown"
                    }
                },
                "required": ["note_id"]
            }),
        ),
        ToolName::DeleteNote => (
            "Delete a note (moves to trash by default)",
            json!({
                "type": "object",
                "properties": {
                    "note_id": {
                        "type": "string",
                        "description": "The ID of the note to delete"
                    }
                },
                "required": ["note_id"]
            }),
        ),
        ToolName::SearchNotes => (
            "Search for notes using Joplin's search syntax",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    },
                    "type": {
                        "type": "string",
                        "description": "Type of item to search (note, folder, tag)"
                    }
                },
                "required": ["query"]
            }),
        ),
        ToolName::ListFolders => ("List all notebooks/folders", empty_schema()),
        ToolName::ListTags => ("List all tags", empty_schema()),
    };

    ToolDefinition {
        name: tool.as_str().to_string(),
        description: description.to_string(),
        input_schema,
    }
}

fn empty_schema() -> Value {
    json!({
        "type": "object",
        "properties": {}
    })
}
