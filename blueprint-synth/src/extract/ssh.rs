//! sshd_config sanitizing and port detection

use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_SSH_PORT: u16 = 22;

fn port_directive() -> &'static Regex {
    static PORT: OnceLock<Regex> = OnceLock::new();
    PORT.get_or_init(|| Regex::new(r"\bPort\s+(\d+)").expect("valid port regex"))
}

/// sshd_config reduced to its effective directives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshSettings {
    /// Non-blank, non-comment lines in original order
    pub lines: Vec<String>,
    pub port: u16,
}

impl SshSettings {
    pub fn from_config(raw: &str) -> Self {
        Self::with_default_port(raw, DEFAULT_SSH_PORT)
    }

    pub fn with_default_port(raw: &str, default_port: u16) -> Self {
        let lines: Vec<String> = raw
            .lines()
            .filter(|line| {
                let trimmed = line.trim();
                !trimmed.is_empty() && !trimmed.starts_with('#')
            })
            .map(|line| line.trim_end().to_string())
            .collect();

        let port = extract_port(&lines.join("\n")).unwrap_or(default_port);
        Self { lines, port }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// File contents for the `copy` task, newline terminated
    pub fn content(&self) -> String {
        let mut content = self.lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        content
    }

    /// Lines prefixed with `width` spaces, for embedding under a `|` block
    pub fn indented(&self, width: usize) -> String {
        let pad = " ".repeat(width);
        self.lines
            .iter()
            .map(|line| format!("{pad}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// First `Port <n>` occurrence wins; later ones (e.g. under `Match`) are ignored.
pub fn extract_port(raw: &str) -> Option<u16> {
    port_directive()
        .captures(raw)
        .and_then(|caps| caps[1].parse().ok())
}
