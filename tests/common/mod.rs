//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

pub const CHATGPT_EXPORT_DIR: &str = "chat-gpt-2025-06-13";
pub const CLAUDE_EXPORT_DIR: &str = "claude-2025-06-13";

/// Builder for an input folder holding Claude and ChatGPT export directories
pub struct ExportDirBuilder {
    temp_dir: TempDir,
}

impl ExportDirBuilder {
    /// Create a new builder with an empty input folder
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `chat-gpt-<date>/conversations.json` from built conversations
    pub fn with_chatgpt(self, conversations: &[ChatGptConversationBuilder]) -> Self {
        let values: Vec<Value> = conversations.iter().map(|c| c.to_json()).collect();
        self.with_chatgpt_raw(&serde_json::to_string_pretty(&values).unwrap())
    }

    /// Write `chat-gpt-<date>/conversations.json` verbatim
    pub fn with_chatgpt_raw(self, content: &str) -> Self {
        self.write_file(CHATGPT_EXPORT_DIR, "conversations.json", content);
        self
    }

    /// Write `claude-<date>/conversations.json` from built conversations
    pub fn with_claude(self, conversations: &[ClaudeConversationBuilder]) -> Self {
        let values: Vec<Value> = conversations.iter().map(|c| c.to_json()).collect();
        self.write_file(CLAUDE_EXPORT_DIR, "conversations.json", &serde_json::to_string_pretty(&values).unwrap());
        self
    }

    /// Write `claude-<date>/projects.json`
    pub fn with_claude_projects(self, projects: &[(&str, &str)]) -> Self {
        let values: Vec<Value> =
            projects.iter().map(|(uuid, name)| json!({"uuid": uuid, "name": name})).collect();
        self.with_claude_projects_raw(&serde_json::to_string(&values).unwrap())
    }

    /// Write `claude-<date>/projects.json` verbatim
    pub fn with_claude_projects_raw(self, content: &str) -> Self {
        self.write_file(CLAUDE_EXPORT_DIR, "projects.json", content);
        self
    }

    fn write_file(&self, dir: &str, name: &str, content: &str) {
        let dir = self.temp_dir.path().join(dir);
        fs::create_dir_all(&dir).expect("Failed to create export dir");
        fs::write(dir.join(name), content).expect("Failed to write export file");
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ExportDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one node of a ChatGPT conversation tree
pub struct NodeBuilder {
    id: String,
    parent: Option<String>,
    children: Vec<String>,
    message: Option<Value>,
}

impl NodeBuilder {
    /// A node without a message
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string(), parent: None, children: Vec::new(), message: None }
    }

    pub fn parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn children(mut self, children: &[&str]) -> Self {
        self.children = children.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Attach a text message
    pub fn message(mut self, role: &str, text: &str, create_time: f64) -> Self {
        self.message = Some(json!({
            "id": format!("msg-{}", self.id),
            "author": {"role": role},
            "create_time": create_time,
            "content": {"content_type": "text", "parts": [text]},
        }));
        self
    }

    /// Attach an arbitrary message value
    pub fn raw_message(mut self, message: Value) -> Self {
        self.message = Some(message);
        self
    }

    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "parent": self.parent,
            "children": self.children,
            "message": self.message,
        })
    }
}

/// Builder for a ChatGPT export conversation
pub struct ChatGptConversationBuilder {
    id: String,
    title: String,
    create_time: Option<f64>,
    current_node: Option<String>,
    nodes: Vec<NodeBuilder>,
}

impl ChatGptConversationBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: format!("Conversation {}", id),
            create_time: Some(1_700_000_000.0),
            current_node: None,
            nodes: Vec::new(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn create_time(mut self, create_time: Option<f64>) -> Self {
        self.create_time = create_time;
        self
    }

    pub fn current_node(mut self, node: &str) -> Self {
        self.current_node = Some(node.to_string());
        self
    }

    pub fn node(mut self, node: NodeBuilder) -> Self {
        self.nodes.push(node);
        self
    }

    /// A root-to-leaf chain alternating user and assistant messages,
    /// one second apart from `create_time`
    pub fn chain(mut self, texts: &[&str]) -> Self {
        let start = self.create_time.unwrap_or(1_700_000_000.0);
        let ids: Vec<String> = (0..texts.len()).map(|i| format!("{}-n{}", self.id, i)).collect();
        for (i, text) in texts.iter().enumerate() {
            let role = if i % 2 == 0 { "user" } else { "assistant" };
            let mut node = NodeBuilder::new(&ids[i]).message(role, text, start + i as f64);
            if i > 0 {
                node = node.parent(&ids[i - 1]);
            }
            if let Some(next) = ids.get(i + 1) {
                node = node.children(&[next]);
            }
            self.nodes.push(node);
        }
        self
    }

    pub fn to_json(&self) -> Value {
        let mapping: serde_json::Map<String, Value> =
            self.nodes.iter().map(|n| (n.id.clone(), n.to_json())).collect();
        json!({
            "id": self.id,
            "title": self.title,
            "create_time": self.create_time,
            "update_time": self.create_time,
            "current_node": self.current_node,
            "mapping": mapping,
        })
    }
}

/// Builder for a Claude export conversation
pub struct ClaudeConversationBuilder {
    uuid: String,
    name: String,
    created_at: Option<String>,
    project_uuid: Option<String>,
    messages: Vec<Value>,
}

impl ClaudeConversationBuilder {
    pub fn new(uuid: &str) -> Self {
        Self {
            uuid: uuid.to_string(),
            name: format!("Claude chat {}", uuid),
            created_at: Some("2024-06-01T10:00:00Z".to_string()),
            project_uuid: None,
            messages: Vec::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn created_at(mut self, created_at: Option<&str>) -> Self {
        self.created_at = created_at.map(str::to_string);
        self
    }

    pub fn project(mut self, project_uuid: &str) -> Self {
        self.project_uuid = Some(project_uuid.to_string());
        self
    }

    /// Append a plain-text message from `sender` ("human" or "assistant")
    pub fn message(mut self, sender: &str, text: &str) -> Self {
        let index = self.messages.len();
        self.messages.push(json!({
            "uuid": format!("{}-m{}", self.uuid, index),
            "text": text,
            "sender": sender,
            "created_at": self.created_at,
            "content": [{"type": "text", "text": text}],
        }));
        self
    }

    /// Append an arbitrary message value
    pub fn raw_message(mut self, message: Value) -> Self {
        self.messages.push(message);
        self
    }

    pub fn to_json(&self) -> Value {
        json!({
            "uuid": self.uuid,
            "name": self.name,
            "created_at": self.created_at,
            "updated_at": self.created_at,
            "project_uuid": self.project_uuid,
            "chat_messages": self.messages,
        })
    }
}

/// Every `.json` conversation file written under `<output>/<platform>/`
///
/// Index files and Claude project artifacts (`project.json`, `documents/`)
/// are left out.
pub fn conversation_files(output: &Path, platform: &str) -> Vec<PathBuf> {
    walk_json(&output.join(platform))
        .into_iter()
        .filter(|p| !p.components().any(|c| c.as_os_str() == "index" || c.as_os_str() == "documents"))
        .filter(|p| p.file_name().is_none_or(|name| name != "project.json"))
        .collect()
}

fn walk_json(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return files;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            files.extend(walk_json(&path));
        } else if path.extension().is_some_and(|e| e == "json") {
            files.push(path);
        }
    }
    files.sort();
    files
}
