use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn subject_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([a-zA-Z]+)(?:\(([^)]*)\))?(!)?:\s*(\S.*)$").expect("valid subject regex")
    })
}

fn footer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^((?i:BREAKING CHANGE)|[A-Za-z][A-Za-z0-9_-]*)(?:: | #)(.+)$")
            .expect("valid footer regex")
    })
}

/// Footer keys that mark a breaking change, compared case-insensitively
pub fn is_breaking_change_key(key: &str) -> bool {
    key.eq_ignore_ascii_case("BREAKING CHANGE") || key.eq_ignore_ascii_case("BREAKING-CHANGE")
}

/// Commit footers in the order they were written
///
/// A key may repeat; its values are collected under the first occurrence.
/// Serializes as a JSON object with sorted keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Footers {
    entries: Vec<(String, Vec<String>)>,
}

impl Footers {
    pub fn new() -> Self {
        Footers::default()
    }

    /// Append a value under `key`
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.into()),
            None => self.entries.push((key, vec![value.into()])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Values of all `BREAKING CHANGE` / `BREAKING-CHANGE` footers
    pub fn breaking_change_descriptions(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| is_breaking_change_key(k))
            .flat_map(|(_, values)| values.iter().map(String::as_str))
            .collect()
    }

    fn last_value_mut(&mut self, key: &str) -> Option<&mut String> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .and_then(|(_, values)| values.last_mut())
    }
}

impl Serialize for Footers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted: BTreeMap<&str, &Vec<String>> =
            self.entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
        sorted.serialize(serializer)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Parsed representation of a conventional commit message
///
/// Field order is the key order of the JSON changelog records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConventionalCommit {
    pub r#type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(rename = "breaking_change", skip_serializing_if = "is_false")]
    pub is_breaking_change: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Footers::is_empty")]
    pub footers: Footers,
}

impl ConventionalCommit {
    /// Parse a commit message in the Conventional Commits format
    ///
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    ///
    /// The description runs until the first blank line. Following paragraphs
    /// form the body, up to the first paragraph that opens with a footer
    /// line (`Token: value` or `Token #value`); from there on every line is
    /// a footer or the continuation of the previous footer's value.
    ///
    /// Returns `None` for non-conventional messages.
    pub fn parse(message: &str) -> Option<Self> {
        let normalized = message.replace("\r\n", "\n");
        let mut lines = normalized
            .lines()
            .skip_while(|line| line.trim().is_empty())
            .peekable();

        let captures = subject_regex().captures(lines.next()?)?;
        let r#type = captures[1].to_lowercase();
        let scope = captures
            .get(2)
            .map(|m| m.as_str().to_string())
            .filter(|s| !s.is_empty());
        let has_exclamation = captures.get(3).is_some();

        let mut description = captures[4].trim_end().to_string();
        while let Some(line) = lines.next_if(|line| !line.trim().is_empty()) {
            description.push('\n');
            description.push_str(line.trim_end());
        }

        let paragraphs = split_paragraphs(lines);
        let footer_start = paragraphs
            .iter()
            .position(|p| footer_regex().is_match(p[0]))
            .unwrap_or(paragraphs.len());

        let body = paragraphs[..footer_start]
            .iter()
            .map(|p| p.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n");
        let body = Some(body.trim().to_string()).filter(|b| !b.is_empty());

        let footers = parse_footers(&paragraphs[footer_start..]);

        let is_breaking_change =
            has_exclamation || footers.iter().any(|(key, _)| is_breaking_change_key(key));

        Some(ConventionalCommit {
            r#type,
            scope,
            is_breaking_change,
            description,
            body,
            footers,
        })
    }
}

/// Group lines into paragraphs separated by blank lines
fn split_paragraphs<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<Vec<&'a str>> {
    let mut paragraphs: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

fn parse_footers(paragraphs: &[Vec<&str>]) -> Footers {
    let mut footers = Footers::new();
    let mut current_key: Option<String> = None;

    for (index, paragraph) in paragraphs.iter().enumerate() {
        for (line_index, line) in paragraph.iter().enumerate() {
            if let Some(captures) = footer_regex().captures(line) {
                footers.push(&captures[1], captures[2].trim_end());
                current_key = Some(captures[1].to_string());
                continue;
            }

            // continuation of a multi-line footer value
            let value = current_key
                .as_deref()
                .and_then(|key| footers.last_value_mut(key));
            if let Some(value) = value {
                if line_index == 0 && index > 0 {
                    value.push('\n');
                }
                value.push('\n');
                value.push_str(line);
            }
        }
    }

    footers
}
