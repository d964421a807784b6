/// End-to-end integration tests for the chat export transformer
///
/// These tests verify complete workflows: discovery → conversion → persistence → indexing
mod common;

use std::path::Path;

use chat_export_transformer::indexer::persistence::{
    load_timeline, load_topics_index, platform_index_path,
};
use chat_export_transformer::indexer::load_unified_index;
use chat_export_transformer::models::{ClaudeDocument, ConversationIndexFile, ProjectManifest};
use chat_export_transformer::pipeline::run::REPORT_FILENAME;
use chat_export_transformer::storage::{load_conversation, read_json};
use chat_export_transformer::{Platform, PipelineConfig, TransformConfig, run_transform};
use common::{
    ChatGptConversationBuilder, ClaudeConversationBuilder, ExportDirBuilder, conversation_files,
};
use tempfile::TempDir;

fn config(input: &Path, output: &Path) -> TransformConfig {
    TransformConfig {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        platforms: Platform::ALL.to_vec(),
        pipeline: PipelineConfig { concurrency: 4, ..Default::default() },
    }
}

fn sample_exports() -> TempDir {
    ExportDirBuilder::new()
        .with_chatgpt(&[
            ChatGptConversationBuilder::new("gpt-00000001")
                .title("Python decorators")
                .create_time(Some(1_700_000_000.0))
                .chain(&["What is a decorator?", "A function wrapping a function.", "Thanks"]),
            ChatGptConversationBuilder::new("gpt-00000002")
                .title("Trip planning")
                .create_time(Some(1_710_000_000.0))
                .chain(&["Where should I go?", "Lisbon."]),
        ])
        .with_claude(&[
            ClaudeConversationBuilder::new("cla-00000001")
                .name("SQL query help")
                .project("proj-1")
                .message("human", "Why is my join slow?")
                .message("assistant", "Add an index on the join column."),
        ])
        .with_claude_projects(&[("proj-1", "Warehouse")])
        .build()
}

#[test]
fn test_e2e_transform_writes_conversations_and_indexes() {
    let input = sample_exports();
    let output = TempDir::new().unwrap();

    let summary = run_transform(&config(input.path(), output.path())).unwrap();

    assert_eq!(summary.indexed, 3);
    assert_eq!(summary.total_failures(), 0);
    let chatgpt = summary.platform(Platform::ChatGpt).unwrap();
    assert_eq!(chatgpt.total, 2);
    assert_eq!(chatgpt.persisted, 2);
    assert_eq!(chatgpt.messages, 5);
    let claude = summary.platform(Platform::Claude).unwrap();
    assert_eq!(claude.persisted, 1);
    assert_eq!(claude.messages, 2);
    assert_eq!(claude.projects, 1);
    assert_eq!(claude.documents, 0);

    assert_eq!(conversation_files(output.path(), "chatgpt").len(), 2);
    assert_eq!(conversation_files(output.path(), "claude").len(), 1);
    assert!(output.path().join(REPORT_FILENAME).is_file());

    let unified = load_unified_index(output.path()).unwrap();
    assert_eq!(unified.len(), 3);

    let claude_index: ConversationIndexFile =
        read_json(&platform_index_path(output.path(), Platform::Claude)).unwrap();
    assert_eq!(claude_index.conversations.len(), 1);
    assert_eq!(claude_index.conversations[0].project.as_deref(), Some("Warehouse"));
}

#[test]
fn test_e2e_claude_project_layout() {
    let input = sample_exports();
    let output = TempDir::new().unwrap();

    run_transform(&config(input.path(), output.path())).unwrap();

    let expected = output
        .path()
        .join("claude/projects/Warehouse/2024-06-01_SQL query help_cla-0000.json");
    let record = load_conversation(&expected).unwrap();
    assert_eq!(record.metadata.id, "cla-00000001");
    assert_eq!(record.messages[0].author, "User");
    assert_eq!(record.messages[1].author, "Claude");
    assert!(record.metadata.topics.contains(&"sql".to_string()));
}

#[test]
fn test_e2e_claude_projects_and_documents_are_exported() {
    let input = ExportDirBuilder::new()
        .with_claude(&[ClaudeConversationBuilder::new("cla-in-proj")
            .name("Schema review")
            .project("proj-1")
            .message("human", "Look at the schema")])
        .with_claude_projects_raw(
            r#"[
                {"uuid": "proj-1", "name": "Warehouse", "description": "Data warehouse notes",
                 "created_at": "2024-05-01T09:00:00Z", "updated_at": "2024-06-01T09:00:00Z",
                 "docs": [
                    {"uuid": "doc-aaaa-1", "filename": "schema.sql", "content": "CREATE TABLE facts;",
                     "created_at": "2024-05-02T09:00:00Z"},
                    {"uuid": "doc-bbbb-2", "filename": "../escape.md", "content": "still inside"}
                 ]},
                {"uuid": "proj-2", "name": "Empty project", "docs": null}
            ]"#,
        )
        .build();
    let output = TempDir::new().unwrap();

    let summary = run_transform(&config(input.path(), output.path())).unwrap();

    let report = summary.platform(Platform::Claude).unwrap();
    assert_eq!(report.projects, 2);
    assert_eq!(report.documents, 2);
    assert_eq!(conversation_files(output.path(), "claude").len(), 1);

    let project_dir = output.path().join("claude/projects/Warehouse");
    let manifest: ProjectManifest = read_json(&project_dir.join("project.json")).unwrap();
    assert_eq!(manifest.uuid, "proj-1");
    assert_eq!(manifest.description, "Data warehouse notes");
    assert!(manifest.created_at.is_some());
    let filenames: Vec<&str> = manifest.documents.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(filenames, vec!["schema.sql", "../escape.md"]);

    for entry in &manifest.documents {
        let path = output.path().join(&entry.file_path);
        assert!(path.starts_with(project_dir.join("documents")), "{}", path.display());
        let document: ClaudeDocument = read_json(&path).unwrap();
        assert_eq!(document.uuid, entry.uuid);
    }
    let schema: ClaudeDocument = read_json(&output.path().join(&manifest.documents[0].file_path)).unwrap();
    assert_eq!(schema.content, "CREATE TABLE facts;");

    let empty: ProjectManifest =
        read_json(&output.path().join("claude/projects/Empty project/project.json")).unwrap();
    assert!(empty.documents.is_empty());
}

#[test]
fn test_e2e_round_trip_preserves_message_order() {
    let input = sample_exports();
    let output = TempDir::new().unwrap();

    run_transform(&config(input.path(), output.path())).unwrap();

    let unified = load_unified_index(output.path()).unwrap();
    let meta = unified.iter().find(|c| c.id == "gpt-00000001").unwrap();
    let record = load_conversation(&output.path().join(&meta.file_path)).unwrap();

    let contents: Vec<&str> = record.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["What is a decorator?", "A function wrapping a function.", "Thanks"]);
    let authors: Vec<&str> = record.messages.iter().map(|m| m.author.as_str()).collect();
    assert_eq!(authors, vec!["User", "ChatGPT", "User"]);
    assert_eq!(record.metadata, *meta);
}

#[test]
fn test_e2e_topics_and_timeline() {
    let input = sample_exports();
    let output = TempDir::new().unwrap();

    run_transform(&config(input.path(), output.path())).unwrap();

    let topics = load_topics_index(output.path()).unwrap().topics;
    assert_eq!(topics["python"], vec!["gpt-00000001"]);
    assert_eq!(topics["sql"], vec!["cla-00000001"]);
    assert_eq!(topics["general"], vec!["gpt-00000002"]);

    let timeline = load_timeline(output.path()).unwrap().timeline;
    let order: Vec<&str> = timeline.conversations.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, vec!["gpt-00000001", "gpt-00000002", "cla-00000001"]);
    let range = timeline.date_range.unwrap();
    assert!(range.earliest < range.latest);
}

#[test]
fn test_e2e_single_platform_selection() {
    let input = sample_exports();
    let output = TempDir::new().unwrap();
    let mut config = config(input.path(), output.path());
    config.platforms = vec![Platform::Claude];

    let summary = run_transform(&config).unwrap();

    assert_eq!(summary.indexed, 1);
    assert!(summary.platform(Platform::ChatGpt).is_none());
    assert!(conversation_files(output.path(), "chatgpt").is_empty());
}

#[test]
fn test_e2e_missing_platform_export_is_skipped() {
    let input = ExportDirBuilder::new()
        .with_chatgpt(&[ChatGptConversationBuilder::new("only-gpt").chain(&["hello"])])
        .build();
    let output = TempDir::new().unwrap();

    let summary = run_transform(&config(input.path(), output.path())).unwrap();

    assert_eq!(summary.indexed, 1);
    assert!(summary.platform(Platform::Claude).is_none());
    // Index files exist for both platforms regardless
    assert!(platform_index_path(output.path(), Platform::Claude).is_file());
}

#[test]
fn test_e2e_latest_export_wins() {
    let input = ExportDirBuilder::new()
        .with_chatgpt(&[ChatGptConversationBuilder::new("new-export").chain(&["hi"])])
        .build();
    // An older export next to the newer one
    let older = input.path().join("chat-gpt-2024-01-01");
    std::fs::create_dir_all(&older).unwrap();
    std::fs::write(older.join("conversations.json"), "[]").unwrap();
    let output = TempDir::new().unwrap();

    let summary = run_transform(&config(input.path(), output.path())).unwrap();

    assert_eq!(summary.indexed, 1);
    let unified = load_unified_index(output.path()).unwrap();
    assert_eq!(unified[0].id, "new-export");
}
