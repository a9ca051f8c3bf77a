//! Rendering of a commit range as plain log, JSON or Markdown
//!
//! Input commits arrive newest first, as the graph walk delivers them.
//! The plain log keeps that order; the JSON and Markdown renderings list the
//! conventional commits oldest first and drop everything else.

use crate::config::ChangelogConfig;
use crate::domain::ConventionalCommit;
use crate::error::Result;
use crate::git::CommitInfo;
use std::cmp::Reverse;
use std::fmt::Write as _;
use tracing::debug;

const DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// Output format of the log command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Classic git log layout
    #[default]
    Plain,
    /// JSON array of conventional commit records
    ConventionalJson,
    /// Markdown changelog grouped by type
    Markdown,
}

/// Render commits (newest first) in the requested mode
pub fn render(commits: &[CommitInfo], mode: OutputMode, config: &ChangelogConfig) -> Result<String> {
    match mode {
        OutputMode::Plain => Ok(render_plain(commits)),
        OutputMode::ConventionalJson => render_json(&conventional_commits(commits)),
        OutputMode::Markdown => Ok(render_markdown(&conventional_commits(commits), config)),
    }
}

/// Parse the conventional commits of a newest-first range, oldest first
pub fn conventional_commits(commits: &[CommitInfo]) -> Vec<ConventionalCommit> {
    commits
        .iter()
        .rev()
        .filter_map(|commit| {
            let parsed = ConventionalCommit::parse(&commit.message);
            if parsed.is_none() {
                debug!(commit = %commit.hash, "omitting non-conventional commit");
            }
            parsed
        })
        .collect()
}

pub fn render_plain(commits: &[CommitInfo]) -> String {
    let mut out = String::new();

    for commit in commits {
        let _ = writeln!(out, "commit {}", commit.hash);
        let _ = writeln!(out, "Author: {} <{}>", commit.author_name, commit.author_email);
        let _ = writeln!(out, "Date:   {}", commit.time.format(DATE_FORMAT));
        out.push('\n');

        for line in commit.message.trim_end().lines() {
            if !line.is_empty() {
                out.push_str("    ");
            }
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// Two-space indented JSON array followed by a newline
pub fn render_json(commits: &[ConventionalCommit]) -> Result<String> {
    let mut json = serde_json::to_string_pretty(commits)?;
    json.push('\n');
    Ok(json)
}

pub fn render_markdown(commits: &[ConventionalCommit], config: &ChangelogConfig) -> String {
    let mut sections: Vec<String> = Vec::new();

    let mut breaking: Vec<&ConventionalCommit> =
        commits.iter().filter(|c| c.is_breaking_change).collect();
    breaking.sort_by_key(|c| Reverse(type_priority(&c.r#type)));
    if !breaking.is_empty() {
        let mut section = String::from("### BREAKING CHANGES\n\n");
        for commit in breaking {
            let descriptions = commit.footers.breaking_change_descriptions();
            if descriptions.is_empty() {
                push_entry(&mut section, commit.scope.as_deref(), &commit.description, None);
                if let Some(body) = commit.body.as_deref() {
                    // own paragraph below the entry
                    let _ = writeln!(section, "\n{}", body);
                }
            } else {
                for description in descriptions {
                    push_entry(&mut section, commit.scope.as_deref(), description, None);
                }
            }
        }
        sections.push(section);
    }

    let mut types: Vec<&str> = Vec::new();
    for commit in commits {
        if !types.contains(&commit.r#type.as_str()) {
            types.push(&commit.r#type);
        }
    }

    for commit_type in types {
        let mut entries = String::new();
        // breaking commits without their own description are listed above only
        for commit in commits.iter().filter(|c| {
            c.r#type == commit_type
                && !(c.is_breaking_change && c.footers.breaking_change_descriptions().is_empty())
        }) {
            push_entry(&mut entries, commit.scope.as_deref(), &commit.description, commit.body.as_deref());
        }

        if !entries.is_empty() {
            sections.push(format!("### {}\n\n{}", config.label_for(commit_type), entries));
        }
    }

    sections.join("\n")
}

/// Rank of a commit type in the BREAKING CHANGES section, higher first
fn type_priority(commit_type: &str) -> u8 {
    match commit_type {
        "feat" => 10,
        "fix" => 9,
        "perf" => 8,
        "docs" => 7,
        "chore" => 6,
        "ci" => 5,
        "style" => 4,
        "refactor" => 3,
        _ => 0,
    }
}

fn push_entry(out: &mut String, scope: Option<&str>, description: &str, body: Option<&str>) {
    out.push_str("* ");
    if let Some(scope) = scope {
        let _ = write!(out, "**{}** ", scope);
    }
    out.push_str(description);
    out.push('\n');
    if let Some(body) = body {
        out.push_str(body);
        out.push('\n');
    }
}
