//! Crontab text parsing
//!
//! A crontab line is `minute hour day month weekday command`. The first five
//! fields are whitespace-delimited tokens; the command is whatever remains and
//! is never split further. Lines that do not yield six fields are dropped
//! without an error, so `SHELL=/bin/sh` or a truncated schedule simply
//! contributes nothing.

use serde::{Deserialize, Serialize};

const SCHEDULE_FIELDS: usize = 5;

/// One schedule line, fields passed through verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronEntry {
    pub minute: String,
    pub hour: String,
    pub day: String,
    pub month: String,
    pub weekday: String,
    pub command: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CrontabParser {
    /// Drop lines whose first non-blank character is `#`
    pub skip_comments: bool,
}

impl CrontabParser {
    pub fn new(skip_comments: bool) -> Self {
        Self { skip_comments }
    }

    /// Parse raw crontab text, keeping line order
    pub fn parse(&self, text: &str) -> Vec<CronEntry> {
        text.lines()
            .filter(|line| !self.skip_comments || !line.trim_start().starts_with('#'))
            .filter_map(parse_line)
            .collect()
    }
}

/// Parse with the default policy: every line is taken verbatim
pub fn parse_crontab(text: &str) -> Vec<CronEntry> {
    CrontabParser::default().parse(text)
}

fn parse_line(line: &str) -> Option<CronEntry> {
    let mut rest = line.trim_start();
    let mut schedule = Vec::with_capacity(SCHEDULE_FIELDS);

    for _ in 0..SCHEDULE_FIELDS {
        let end = rest.find(char::is_whitespace)?;
        schedule.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }

    let command = rest.trim_end();
    if command.is_empty() {
        return None;
    }

    Some(CronEntry {
        minute: schedule[0].to_string(),
        hour: schedule[1].to_string(),
        day: schedule[2].to_string(),
        month: schedule[3].to_string(),
        weekday: schedule[4].to_string(),
        command: command.to_string(),
    })
}
