//! core-keymap: Navigation-mode command table.
//!
//! The fixed table (`h l j k w b i gg G 0 $ x dd [ ]`) is compiled into a
//! small trie. [`PendingCommand`] accumulates keystrokes and resolves them
//! after every push:
//! - exact match: the command is returned and the buffer cleared;
//! - strict prefix of some entry: keep waiting;
//! - anything else: the buffer is discarded silently.
//!
//! Resolution is pure; logging is TRACE for traversal and DEBUG for outcomes.

use smallvec::SmallVec;
use std::fmt;
use tracing::{debug, trace};

/// Operations bound in the Navigation-mode table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveDown,
    MoveUp,
    WordForward,
    WordBackward,
    EnterEdit,
    FirstRow,
    LastRow,
    RowStart,
    RowEnd,
    DeleteUnder,
    DeleteRow,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub sequence: Vec<char>,
    pub command: Command,
}

impl CommandSpec {
    pub fn new(sequence: &str, command: Command) -> Self {
        Self {
            sequence: sequence.chars().collect(),
            command,
        }
    }
}

/// The built-in command table.
pub fn default_commands() -> Vec<CommandSpec> {
    use Command::*;
    [
        ("h", MoveLeft),
        ("l", MoveRight),
        ("j", MoveDown),
        ("k", MoveUp),
        ("w", WordForward),
        ("b", WordBackward),
        ("i", EnterEdit),
        ("gg", FirstRow),
        ("G", LastRow),
        ("0", RowStart),
        ("$", RowEnd),
        ("x", DeleteUnder),
        ("dd", DeleteRow),
        ("[", ScrollUp),
        ("]", ScrollDown),
    ]
    .into_iter()
    .map(|(seq, cmd)| CommandSpec::new(seq, cmd))
    .collect()
}

#[derive(Debug, Clone)]
struct Edge {
    key: char,
    next: usize,
}

#[derive(Debug, Clone)]
struct Node {
    terminal: Option<Command>,
    edges: SmallVec<[Edge; 4]>,
}

impl Node {
    fn new() -> Self {
        Self {
            terminal: None,
            edges: SmallVec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Exact(Command),
    /// Strict prefix of one or more entries.
    Prefix,
    NoMatch,
}

#[derive(Debug)]
pub struct CommandTrie {
    nodes: Vec<Node>,
}

impl Default for CommandTrie {
    fn default() -> Self {
        Self::build(default_commands())
    }
}

impl CommandTrie {
    pub fn build(specs: Vec<CommandSpec>) -> Self {
        let mut trie = CommandTrie {
            nodes: vec![Node::new()],
        };
        for spec in specs {
            let mut cur = 0usize;
            for &key in &spec.sequence {
                cur = match trie.nodes[cur].edges.iter().find(|e| e.key == key) {
                    Some(e) => e.next,
                    None => {
                        let new_idx = trie.nodes.len();
                        trie.nodes.push(Node::new());
                        trie.nodes[cur].edges.push(Edge { key, next: new_idx });
                        new_idx
                    }
                };
            }
            if trie.nodes[cur].terminal.is_some() {
                // Later entry wins.
                trace!(
                    target: "input.map",
                    command = ?spec.command,
                    node = cur,
                    "terminal_override"
                );
            }
            trie.nodes[cur].terminal = Some(spec.command);
        }
        trie
    }

    /// Resolve the whole of `keys` against the table.
    pub fn resolve(&self, keys: &[char]) -> Resolution {
        if keys.is_empty() {
            return Resolution::Prefix;
        }
        let mut node = 0usize;
        for (step, key) in keys.iter().enumerate() {
            match self.nodes[node].edges.iter().find(|e| e.key == *key) {
                Some(edge) => {
                    node = edge.next;
                    trace!(target: "input.map", step, key = %key, node, "advance");
                }
                None => return Resolution::NoMatch,
            }
        }
        match self.nodes[node].terminal {
            Some(cmd) => Resolution::Exact(cmd),
            None if !self.nodes[node].edges.is_empty() => Resolution::Prefix,
            None => Resolution::NoMatch,
        }
    }
}

/// Accumulated but unresolved Navigation-mode keystrokes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingCommand {
    keys: SmallVec<[char; 4]>,
}

impl PendingCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Append `key` and resolve. The buffer is cleared on an exact match and
    /// on a dead end; it is kept only while it is a strict prefix.
    pub fn push(&mut self, key: char, table: &CommandTrie) -> Resolution {
        self.keys.push(key);
        let res = table.resolve(&self.keys);
        match res {
            Resolution::Exact(cmd) => {
                debug!(target: "input.map", keys = %self, command = ?cmd, "command_resolved");
                self.keys.clear();
            }
            Resolution::NoMatch => {
                debug!(target: "input.map", keys = %self, "sequence_discarded");
                self.keys.clear();
            }
            Resolution::Prefix => {
                trace!(target: "input.map", keys = %self, "pending");
            }
        }
        res
    }
}

impl fmt::Display for PendingCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.keys.iter().try_for_each(|c| write!(f, "{c}"))
    }
}
