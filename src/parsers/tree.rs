//! Tree-to-sequence linearization for ChatGPT conversation mappings.
//!
//! A conversation arrives as a flat `node id -> node` mapping whose nodes name
//! their parent and children by id. Exports in the wild contain placeholder
//! nodes without messages, parents that were never exported, children that
//! point back up the tree and mappings with no root at all. [`linearize`]
//! walks whatever is there and returns the messages in chronological order.
//! Anomalies become [`LinearizeWarning`]s; linearization itself never fails.
//!
//! The walk is an explicit-stack post-order traversal (children before the
//! node's own message) with a visited set keyed by node id, so deep or cyclic
//! mappings cannot overflow the call stack or loop forever.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use indexmap::IndexMap;

use crate::models::{EMPTY_MESSAGE_SENTINEL, NormalizedMessage, Platform, RawMessage, RawNode};
use crate::parsers::content::{contains_media, content_fragments, join_fragments};
use crate::parsers::topics::contains_code;

/// Structural anomaly found while linearizing; informational only
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinearizeWarning {
    EmptyMapping,
    NoRootNodes,
    StartedFromCurrentNode { node: String },
    StartedFromArbitraryNode { node: String },
    NoStartingNode,
    DanglingParent { node: String, parent: String },
    MissingChild { parent: String, child: String },
    AlreadyVisited { node: String },
    MalformedMessage { node: String, error: String },
    /// Nodes no traversal reached, e.g. a detached cycle beside a rooted tree
    UnreachableNodes { count: usize, with_messages: usize },
}

impl fmt::Display for LinearizeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMapping => write!(f, "conversation has an empty mapping"),
            Self::NoRootNodes => write!(f, "no root nodes found"),
            Self::StartedFromCurrentNode { node } => {
                write!(f, "traversal started from current node {}", node)
            }
            Self::StartedFromArbitraryNode { node } => {
                write!(f, "traversal started from arbitrary message node {}", node)
            }
            Self::NoStartingNode => write!(f, "no node to start traversal from"),
            Self::DanglingParent { node, parent } => {
                write!(f, "node {} references missing parent {}", node, parent)
            }
            Self::MissingChild { parent, child } => {
                write!(f, "node {} references missing child {}", parent, child)
            }
            Self::AlreadyVisited { node } => {
                write!(f, "node {} reached more than once (cycle or shared child)", node)
            }
            Self::MalformedMessage { node, error } => {
                write!(f, "message in node {} could not be decoded: {}", node, error)
            }
            Self::UnreachableNodes { count, with_messages } => write!(
                f,
                "{} nodes not reachable from any starting node ({} with messages dropped)",
                count, with_messages
            ),
        }
    }
}

/// Messages and derived facts extracted from one conversation tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linearized {
    /// Sorted by timestamp, ties in traversal order, undated first
    pub messages: Vec<NormalizedMessage>,
    /// Distinct canonical author labels, sorted
    pub participants: Vec<String>,
    pub has_code: bool,
    pub has_media: bool,
    pub warnings: Vec<LinearizeWarning>,
}

/// Flatten a node mapping into a chronological message sequence
///
/// Roots are nodes without a parent, or whose parent is not in the mapping.
/// With no roots at all, traversal starts from `current_node` when it exists,
/// otherwise from the first node that carries a message.
///
/// Nodes without a message (or with one that fails to decode) are kept as
/// placeholders: their children are still visited. Messages with empty
/// content are kept with [`EMPTY_MESSAGE_SENTINEL`] as their content.
pub fn linearize(
    nodes: &IndexMap<String, RawNode>,
    current_node: Option<&str>,
    platform: Platform,
) -> Linearized {
    let mut walker = Walker::new(nodes, platform);

    if nodes.is_empty() {
        walker.warnings.push(LinearizeWarning::EmptyMapping);
        return walker.finish();
    }

    let mut roots = Vec::new();
    for (id, node) in nodes {
        match node.parent_id() {
            None => roots.push(id.as_str()),
            Some(parent) if !nodes.contains_key(parent) => {
                walker.warnings.push(LinearizeWarning::DanglingParent {
                    node: id.clone(),
                    parent: parent.to_string(),
                });
                roots.push(id.as_str());
            }
            Some(_) => {}
        }
    }

    if roots.is_empty() {
        walker.warnings.push(LinearizeWarning::NoRootNodes);

        let from_current = current_node
            .and_then(|id| nodes.get_key_value(id))
            .map(|(id, _)| id.as_str())
            .filter(|id| !walker.visited.contains(id));

        match from_current {
            Some(id) => {
                walker.warnings.push(LinearizeWarning::StartedFromCurrentNode { node: id.to_string() });
                walker.traverse(id);
            }
            None => {
                let arbitrary = nodes
                    .iter()
                    .find(|(id, node)| node.message.is_some() && !walker.visited.contains(id.as_str()))
                    .map(|(id, _)| id.as_str());
                match arbitrary {
                    Some(id) => {
                        walker.warnings.push(LinearizeWarning::StartedFromArbitraryNode {
                            node: id.to_string(),
                        });
                        walker.traverse(id);
                    }
                    None => walker.warnings.push(LinearizeWarning::NoStartingNode),
                }
            }
        }
    } else {
        for root in roots {
            walker.traverse(root);
        }
    }

    walker.report_unreachable();
    walker.finish()
}

enum Step<'a> {
    Enter { id: &'a str, parent: Option<&'a str> },
    Emit(&'a str),
}

struct Walker<'a> {
    nodes: &'a IndexMap<String, RawNode>,
    platform: Platform,
    visited: HashSet<&'a str>,
    messages: Vec<NormalizedMessage>,
    participants: BTreeSet<String>,
    has_code: bool,
    has_media: bool,
    warnings: Vec<LinearizeWarning>,
}

impl<'a> Walker<'a> {
    fn new(nodes: &'a IndexMap<String, RawNode>, platform: Platform) -> Self {
        Self {
            nodes,
            platform,
            visited: HashSet::with_capacity(nodes.len()),
            messages: Vec::new(),
            participants: BTreeSet::new(),
            has_code: false,
            has_media: false,
            warnings: Vec::new(),
        }
    }

    fn traverse(&mut self, start: &'a str) {
        let mut stack = vec![Step::Enter { id: start, parent: None }];

        while let Some(step) = stack.pop() {
            match step {
                Step::Enter { id, parent } => {
                    if !self.visited.insert(id) {
                        self.warnings.push(LinearizeWarning::AlreadyVisited { node: id.to_string() });
                        continue;
                    }
                    let Some(node) = self.nodes.get(id) else {
                        self.warnings.push(LinearizeWarning::MissingChild {
                            parent: parent.unwrap_or_default().to_string(),
                            child: id.to_string(),
                        });
                        continue;
                    };
                    // Emit after every child has been handled
                    stack.push(Step::Emit(id));
                    for child in node.children.iter().rev() {
                        stack.push(Step::Enter { id: child.as_str(), parent: Some(id) });
                    }
                }
                Step::Emit(id) => self.emit(id),
            }
        }
    }

    fn report_unreachable(&mut self) {
        let (count, with_messages) = self
            .nodes
            .iter()
            .filter(|(id, _)| !self.visited.contains(id.as_str()))
            .fold((0, 0), |(count, with_messages), (_, node)| {
                (count + 1, with_messages + usize::from(node.message.is_some()))
            });
        if count > 0 {
            self.warnings.push(LinearizeWarning::UnreachableNodes { count, with_messages });
        }
    }

    fn emit(&mut self, id: &'a str) {
        let Some(raw) = self.nodes.get(id).and_then(|node| node.message.as_ref()) else {
            return;
        };

        // Decoded per node: a message too deep or oddly shaped only fails itself
        let message = match serde_json::from_str::<RawMessage>(raw.get()) {
            Ok(message) => message,
            Err(e) => {
                self.warnings.push(LinearizeWarning::MalformedMessage {
                    node: id.to_string(),
                    error: e.to_string(),
                });
                return;
            }
        };

        let mut content = join_fragments(&content_fragments(&message.content));
        if content.is_empty() {
            content = EMPTY_MESSAGE_SENTINEL.to_string();
        }

        self.has_code |= contains_code(&content);
        self.has_media |= contains_media(message.content.parts.as_ref());

        let author = message.author.role.canonical_label(self.platform).to_string();
        self.participants.insert(author.clone());

        self.messages.push(NormalizedMessage {
            id: message.id.filter(|m| !m.is_empty()).unwrap_or_else(|| id.to_string()),
            author,
            content,
            timestamp: message.create_time,
            metadata: message.metadata,
        });
    }

    fn finish(mut self) -> Linearized {
        // Stable: equal timestamps keep traversal order
        self.messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        Linearized {
            messages: self.messages,
            participants: self.participants.into_iter().collect(),
            has_code: self.has_code,
            has_media: self.has_media,
            warnings: self.warnings,
        }
    }
}
