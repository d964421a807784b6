//! Fixed keyword topic tagging and code detection

/// Keywords looked up in conversation titles
const TOPIC_KEYWORDS: [&str; 21] = [
    "python",
    "javascript",
    "go",
    "golang",
    "react",
    "node",
    "api",
    "database",
    "sql",
    "web",
    "frontend",
    "backend",
    "code",
    "programming",
    "debug",
    "error",
    "function",
    "class",
    "algorithm",
    "data",
    "structure",
];

/// Keywords this short only match whole words ("go" must not match "google")
const WHOLE_WORD_MAX_LEN: usize = 3;

const TOPIC_HELP: &str = "help";
const TOPIC_GENERAL: &str = "general";

/// Extract topic tags from a conversation title
///
/// Returns matched keywords in keyword-list order. A title with no keyword
/// is tagged `help` when it mentions help or a question, otherwise `general`,
/// so every conversation carries at least one topic.
pub fn extract_topics(title: &str) -> Vec<String> {
    let lower = title.to_lowercase();
    let words: Vec<&str> = lower.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).collect();

    let mut topics: Vec<String> = TOPIC_KEYWORDS
        .iter()
        .filter(|keyword| {
            if keyword.len() <= WHOLE_WORD_MAX_LEN {
                words.contains(*keyword)
            } else {
                lower.contains(**keyword)
            }
        })
        .map(|keyword| keyword.to_string())
        .collect();

    if topics.is_empty() {
        let fallback = if lower.contains("help") || lower.contains("question") {
            TOPIC_HELP
        } else {
            TOPIC_GENERAL
        };
        topics.push(fallback.to_string());
    }

    topics
}

/// Fenced or inline code delimiters
pub fn contains_code(text: &str) -> bool {
    text.contains('`')
}
