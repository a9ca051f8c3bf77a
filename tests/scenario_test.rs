use git_semver::analyzer::NextOptions;
use git_semver::changelog::OutputMode;
use git_semver::cli::{render_log, resolve_latest, resolve_next, LogOptions};
use git_semver::config::Config;
use git_semver::domain::{PreReleaseOptions, Version};
use git_semver::git::MockRepository;
use git_semver::GitSemverError;

const FIX_WITH_FOOTERS: &str = "fix(some_component): Add fix\n\nLorem ipsum dolor sit amet, consectetur adipiscing elit. Nunc bibendum vulputate sapien vel mattis.\n\nVivamus faucibus leo id libero suscipit, varius tincidunt neque interdum. Mauris rutrum at velit vitae semper.\n\nFixes: http://issues.example.com/123\nBREAKING CHANGE: This commit is breaking some API.";

fn next(repo: &MockRepository) -> git_semver::Result<String> {
    next_with(repo, &NextOptions::default())
}

fn next_with(repo: &MockRepository, options: &NextOptions) -> git_semver::Result<String> {
    resolve_next(repo, options, &Config::default()).map(|n| n.version.to_string())
}

fn latest(repo: &MockRepository, major: Option<u64>, include_prereleases: bool) -> String {
    resolve_latest(repo, major, include_prereleases)
        .unwrap()
        .to_string()
}

fn log(repo: &MockRepository, reference: Option<&str>, mode: OutputMode) -> git_semver::Result<String> {
    let options = LogOptions {
        reference: reference.map(str::to_string),
        mode,
        ..LogOptions::default()
    };
    render_log(repo, &options, &Config::default())
}

// ============================================================================
// latest
// ============================================================================

#[test]
fn test_latest_without_tags_is_zero() {
    let mut repo = MockRepository::new();
    repo.commit("Initial commit");

    assert_eq!(latest(&repo, None, false), "0.0.0");
}

#[test]
fn test_latest_skips_prereleases_by_default() {
    let mut repo = MockRepository::new();
    let first = repo.commit("feat: Add feature");
    repo.add_tag("v1.2.3", first);
    let second = repo.commit("feat: Add feature 2");
    repo.add_tag("v1.3.0-beta", second);

    assert_eq!(latest(&repo, None, false), "1.2.3");
    assert_eq!(latest(&repo, None, true), "1.3.0-beta");

    let third = repo.commit("fix: Add fix");
    repo.add_tag("v1.3.0", third);
    assert_eq!(latest(&repo, None, true), "1.3.0");
}

#[test]
fn test_latest_ignores_reachability() {
    let mut repo = MockRepository::new();
    let base = repo.commit("feat: Master commit");
    let side = repo.add_commit("feat: v1 commit", &[base]);
    repo.add_tag("v1.2.3", side);
    repo.commit("fix: master only");

    assert_eq!(latest(&repo, None, false), "1.2.3");
}

#[test]
fn test_latest_major_filter() {
    let mut repo = MockRepository::new();
    let a = repo.commit("feat: a");
    repo.add_tag("v1.4.0", a);
    let b = repo.commit("feat: b");
    repo.add_tag("v2.1.0", b);

    assert_eq!(latest(&repo, Some(1), false), "1.4.0");
    assert_eq!(latest(&repo, Some(2), false), "2.1.0");
    assert_eq!(latest(&repo, Some(3), false), "0.0.0");
}

#[test]
fn test_latest_ignores_non_version_tags() {
    let mut repo = MockRepository::new();
    let a = repo.commit("feat: a");
    repo.add_tag("v1.0.0", a);
    repo.add_tag("release-2", a);
    repo.add_tag("v3.0", a);

    assert_eq!(latest(&repo, None, true), "1.0.0");
}

// ============================================================================
// next
// ============================================================================

#[test]
fn test_next_patch_after_fix() {
    let mut repo = MockRepository::new();
    let tagged = repo.commit("feat: Add feature");
    repo.add_tag("v1.0.0", tagged);
    repo.commit("fix: Add fix");

    assert_eq!(next(&repo).unwrap(), "1.0.1");
}

#[test]
fn test_next_patch_after_fix_annotated_tag() {
    let mut repo = MockRepository::new();
    let tagged = repo.commit("feat: Add feature");
    repo.add_annotated_tag("v1.0.0", tagged);
    repo.commit("fix: Add fix");

    assert_eq!(next(&repo).unwrap(), "1.0.1");
}

#[test]
fn test_next_minor_after_feature() {
    let mut repo = MockRepository::new();
    let tagged = repo.commit("feat: Add feature");
    repo.add_tag("v1.0.0", tagged);
    repo.commit("feat: Add another feature");

    assert_eq!(next(&repo).unwrap(), "1.1.0");
}

#[test]
fn test_next_major_after_breaking_change() {
    let mut repo = MockRepository::new();
    let tagged = repo.commit("feat: Add feature");
    repo.add_tag("v1.0.0", tagged);
    repo.commit("fix: Add fix\n\nBREAKING CHANGE: removed an endpoint");

    assert_eq!(next(&repo).unwrap(), "2.0.0");
}

#[test]
fn test_next_breaking_change_on_zero_major() {
    let mut repo = MockRepository::new();
    let tagged = repo.commit("feat: Add feature");
    repo.add_tag("v0.3.1", tagged);
    repo.commit("feat!: rework everything");

    assert_eq!(next(&repo).unwrap(), "0.4.0");

    let stable = NextOptions {
        zero_major_rule: false,
        ..NextOptions::default()
    };
    assert_eq!(next_with(&repo, &stable).unwrap(), "1.0.0");
}

#[test]
fn test_next_unchanged_after_chore() {
    let mut repo = MockRepository::new();
    let tagged = repo.commit("feat: Add feature");
    repo.add_tag("v1.0.0", tagged);
    repo.commit("chore: Some maintenance");

    let result = resolve_next(&repo, &NextOptions::default(), &Config::default()).unwrap();
    assert_eq!(result.version.to_string(), "1.0.0");
    assert!(result.is_unchanged());
    assert_eq!(result.level, None);
}

#[test]
fn test_next_converts_prerelease_to_release() {
    let mut repo = MockRepository::new();
    let first = repo.commit("feat: Add feature");
    repo.add_tag("v1.2.3", first);
    let second = repo.commit("feat: Add feature 2");
    repo.add_tag("v1.3.0-beta", second);

    assert_eq!(next(&repo).unwrap(), "1.3.0");
}

#[test]
fn test_next_first_version_without_tags() {
    let mut repo = MockRepository::new();
    repo.commit("Initial commit");

    assert_eq!(next(&repo).unwrap(), "1.0.0");
}

#[test]
fn test_next_first_version_as_prerelease() {
    let mut repo = MockRepository::new();
    repo.commit("Initial commit");

    let options = NextOptions {
        pre_release: PreReleaseOptions::new("alpha", true),
        ..NextOptions::default()
    };
    assert_eq!(next_with(&repo, &options).unwrap(), "1.0.0-alpha.1");
}

#[test]
fn test_next_prerelease_counter_continues() {
    let mut repo = MockRepository::new();
    let first = repo.commit("feat: Add feature");
    repo.add_tag("v1.0.0", first);
    let second = repo.commit("feat: Add feature 2");
    repo.add_tag("v1.1.0-rc.1", second);
    repo.commit("fix: Add fix");

    let options = NextOptions {
        pre_release: PreReleaseOptions::new("rc", true),
        ..NextOptions::default()
    };
    // latest is 1.1.0-rc.1, the fix patches its release to 1.1.1
    assert_eq!(next_with(&repo, &options).unwrap(), "1.1.1-rc.1");
}

#[test]
fn test_next_prerelease_counter_same_release() {
    let mut repo = MockRepository::new();
    let first = repo.commit("feat: Add feature");
    repo.add_tag("v1.0.0", first);
    let second = repo.commit("feat: Add feature 2");
    repo.add_tag("v1.1.0-rc.1", second);
    repo.commit("chore: Prepare");

    let options = NextOptions {
        pre_release: PreReleaseOptions::new("rc", true),
        ..NextOptions::default()
    };
    assert_eq!(next_with(&repo, &options).unwrap(), "1.1.0-rc.2");
}

#[test]
fn test_next_for_specific_major_version() {
    let mut repo = MockRepository::new();
    let v1 = repo.commit("feat: Add feature");
    repo.add_tag("v1.0.0", v1);
    let v2 = repo.add_commit("feat: Add feature 2\nBREAKING CHANGE: some breaking change", &[v1]);
    repo.add_tag("v2.0.0", v2);
    repo.commit("fix: Fix something in v1");

    let options = NextOptions {
        major: Some(1),
        ..NextOptions::default()
    };
    assert_eq!(next_with(&repo, &options).unwrap(), "1.0.1");
}

#[test]
fn test_next_after_merge_of_chore_branch_parallel_to_release() {
    let mut repo = MockRepository::new();
    let first = repo.commit("feat: First commit");
    let chore = repo.add_commit("chore: some maintenance", &[first]);
    let release = repo.commit("feat: More features in master");
    repo.add_tag("v1.2.3", release);
    repo.merge(chore, "Merge branch 'branch-with-chore-commit'");

    assert_eq!(next(&repo).unwrap(), "1.2.3");
}

#[test]
fn test_next_after_merge_of_feature_branch_parallel_to_release() {
    let mut repo = MockRepository::new();
    let first = repo.commit("feat: Add feature");
    let feature = repo.add_commit("feat: Add feature in branch", &[first]);
    let release = repo.commit("feat: More features in master");
    repo.add_tag("v1.0.0", release);
    repo.merge(feature, "Merge branch 'branch-with-feature-commit'");

    assert_eq!(next(&repo).unwrap(), "1.1.0");
}

#[test]
fn test_next_fails_when_latest_tag_not_on_head() {
    let mut repo = MockRepository::new();
    let base = repo.commit("feat: Master commit");
    let side = repo.add_commit("feat: v1 commit", &[base]);
    repo.add_tag("v1.2.3", side);
    repo.commit("fix: master only");

    let err = next(&repo).unwrap_err();
    assert!(matches!(err, GitSemverError::ReleaseNotOnHead { .. }));
    let msg = err.to_string();
    assert!(msg.contains("Latest tag is not on HEAD"));
    assert!(msg.contains("refs/tags/v1.2.3"));
}

#[test]
fn test_next_fails_on_shallow_gap() {
    let mut repo = MockRepository::new();
    let initial = repo.commit("Initial Commit");
    let tagged = repo.commit("feat: First Version");
    repo.add_tag("v1.0.0", tagged);
    let missing = repo.commit("feat: Missing commit");
    repo.commit("feat: Latest commit");

    // depth 1 clone plus fetched tags: the tagged commit is present, its
    // surroundings are not
    repo.remove_commit(initial);
    repo.remove_commit(missing);

    let err = next(&repo).unwrap_err();
    assert!(matches!(err, GitSemverError::MissingObject { .. }));
    assert!(err.to_string().contains("object not found"));
}

#[test]
fn test_next_on_shallow_history_with_necessary_commits() {
    let mut repo = MockRepository::new();
    let initial = repo.commit("Initial Commit");
    let feature = repo.add_commit("feat: Feature branch commit", &[initial]);
    let tagged = repo.commit("feat: First Version");
    repo.add_tag("v1.0.0", tagged);
    repo.commit("fix: Some fix in master");
    repo.merge(feature, "Merge branch 'some-feature-branch'");

    // shallow-exclude of v1.0.0: only the shared root is gone
    repo.remove_commit(initial);

    assert_eq!(next(&repo).unwrap(), "1.1.0");
}

#[test]
fn test_log_on_shallow_history_behind_release() {
    let mut repo = MockRepository::new();
    let initial = repo.commit("Initial Commit");
    let tagged = repo.commit("feat: First Version");
    repo.add_tag("v1.0.0", tagged);
    repo.commit("fix: after release");
    repo.remove_commit(initial);

    let out = log(&repo, None, OutputMode::Plain).unwrap();
    assert!(out.contains("fix: after release"));
    assert!(!out.contains("First Version"));

    // the release itself reaches into the cut off history
    let err = log(&repo, Some("v1.0.0"), OutputMode::Plain).unwrap_err();
    assert!(matches!(err, GitSemverError::MissingObject { .. }));
}

#[test]
fn test_next_is_idempotent() {
    let mut repo = MockRepository::new();
    let tagged = repo.commit("feat: Add feature");
    repo.add_tag("v1.0.0", tagged);
    repo.commit("feat: more");

    assert_eq!(next(&repo).unwrap(), next(&repo).unwrap());
}

// ============================================================================
// log
// ============================================================================

#[test]
fn test_log_plain_contains_author() {
    let mut repo = MockRepository::new();
    repo.commit("feat: Add feature");

    let out = log(&repo, None, OutputMode::Plain).unwrap();
    assert!(out.contains("Author: testuser <test@example.com>"));
    assert!(out.contains("    feat: Add feature"));
}

#[test]
fn test_log_without_tags_contains_everything() {
    let mut repo = MockRepository::new();
    repo.commit("feat: Add feature");
    repo.commit("fix: Add fix");

    let out = log(&repo, None, OutputMode::Plain).unwrap();
    let fix = out.find("fix: Add fix").unwrap();
    let feat = out.find("feat: Add feature").unwrap();
    assert!(fix < feat, "newest commit comes first");
}

#[test]
fn test_log_empty_when_head_is_tagged() {
    let mut repo = MockRepository::new();
    repo.commit("feat: Add feature");
    let head = repo.commit("fix: Add fix");
    repo.add_tag("v1.0.0", head);

    assert_eq!(log(&repo, None, OutputMode::Plain).unwrap(), "");
    assert_eq!(log(&repo, None, OutputMode::ConventionalJson).unwrap(), "[]\n");
}

#[test]
fn test_log_since_latest_tag() {
    let mut repo = MockRepository::new();
    let tagged = repo.commit("feat: Add feature");
    repo.add_annotated_tag("v1.0.0", tagged);
    repo.commit("fix: Add fix");

    let out = log(&repo, None, OutputMode::Plain).unwrap();
    assert!(!out.contains("feat: Add feature"));
    assert!(out.contains("fix: Add fix"));
}

#[test]
fn test_log_for_specific_version() {
    let mut repo = MockRepository::new();
    let first = repo.commit("feat: Add feature");
    repo.add_tag("v0.1.0", first);
    repo.commit("fix: Add fix");
    let release = repo.commit("fix: Add another fix");
    repo.add_tag("v1.0.0", release);

    let out = log(&repo, Some("v1.0.0"), OutputMode::Plain).unwrap();
    assert!(!out.contains("feat: Add feature"));
    assert!(out.contains("fix: Add fix"));
    assert!(out.contains("fix: Add another fix"));
}

#[test]
fn test_log_up_to_tag() {
    let mut repo = MockRepository::new();
    let tagged = repo.commit("feat: Add feature");
    repo.add_tag("v1.0.0", tagged);
    repo.commit("fix: Add fix");

    let out = log(&repo, Some("v1.0.0"), OutputMode::Plain).unwrap();
    assert!(out.contains("feat: Add feature"));
    assert!(!out.contains("fix: Add fix"));
}

#[test]
fn test_log_accepts_version_without_prefix() {
    let mut repo = MockRepository::new();
    let tagged = repo.commit("feat: Add feature");
    repo.add_tag("v1.0.0", tagged);
    repo.commit("fix: Add fix");

    let out = log(&repo, Some("1.0.0"), OutputMode::Plain).unwrap();
    assert!(out.contains("feat: Add feature"));
}

#[test]
fn test_log_unknown_reference() {
    let mut repo = MockRepository::new();
    repo.commit("feat: Add feature");

    let err = log(&repo, Some("v9.9.9"), OutputMode::Plain).unwrap_err();
    assert!(matches!(err, GitSemverError::RefNotFound { .. }));

    let err = log(&repo, Some("9.9.9"), OutputMode::Plain).unwrap_err();
    assert!(err.to_string().contains("'9.9.9'"));
}

#[test]
fn test_log_prerelease_commits_inclusive_by_default() {
    let mut repo = MockRepository::new();
    let tagged = repo.commit("feat: Add feature");
    repo.add_tag("v1.0.0-alpha", tagged);
    repo.commit("fix: Add fix");

    let out = log(&repo, None, OutputMode::Plain).unwrap();
    assert!(out.contains("feat: Add feature"));
    assert!(out.contains("fix: Add fix"));

    let options = LogOptions {
        exclude_prereleases: true,
        ..LogOptions::default()
    };
    let out = render_log(&repo, &options, &Config::default()).unwrap();
    assert!(!out.contains("feat: Add feature"));
    assert!(out.contains("fix: Add fix"));
}

#[test]
fn test_log_with_preceding_version_not_reachable() {
    let mut repo = MockRepository::new();
    let initial = repo.commit("feat: Initial feature, which is contained in v1.0.0");
    let v1 = repo.add_commit("feat: v1", &[initial]);
    repo.add_tag("v1.0.0", v1);
    let v2 = repo.commit("fix: Commit which is only on v2.0.0");
    repo.add_tag("v2.0.0", v2);

    let out = log(&repo, Some("v2.0.0"), OutputMode::Plain).unwrap();
    assert!(!out.contains("Initial feature"));
    assert!(!out.contains("feat: v1"));
    assert!(out.contains("fix: Commit which is only on v2.0.0"));
}

#[test]
fn test_log_as_conventional_commits() {
    let mut repo = MockRepository::new();
    repo.commit("feat: Add feature");
    repo.commit("Some non-conventional-commit");
    repo.commit(FIX_WITH_FOOTERS);

    let expected = "[\n  {\n    \"type\": \"feat\",\n    \"description\": \"Add feature\"\n  },\n  {\n    \"type\": \"fix\",\n    \"scope\": \"some_component\",\n    \"breaking_change\": true,\n    \"description\": \"Add fix\",\n    \"body\": \"Lorem ipsum dolor sit amet, consectetur adipiscing elit. Nunc bibendum vulputate sapien vel mattis.\\n\\nVivamus faucibus leo id libero suscipit, varius tincidunt neque interdum. Mauris rutrum at velit vitae semper.\",\n    \"footers\": {\n      \"BREAKING CHANGE\": [\n        \"This commit is breaking some API.\"\n      ],\n      \"Fixes\": [\n        \"http://issues.example.com/123\"\n      ]\n    }\n  }\n]\n";

    assert_eq!(log(&repo, None, OutputMode::ConventionalJson).unwrap(), expected);
}

#[test]
fn test_log_as_markdown() {
    let mut repo = MockRepository::new();
    repo.commit("feat: Add feature");
    repo.commit("Some non-conventional-commit");
    repo.commit(FIX_WITH_FOOTERS);

    let expected = "### BREAKING CHANGES\n\n* **some_component** This commit is breaking some API.\n\n### Features\n\n* Add feature\n\n### Bug Fixes\n\n* **some_component** Add fix\nLorem ipsum dolor sit amet, consectetur adipiscing elit. Nunc bibendum vulputate sapien vel mattis.\n\nVivamus faucibus leo id libero suscipit, varius tincidunt neque interdum. Mauris rutrum at velit vitae semper.\n";

    assert_eq!(log(&repo, None, OutputMode::Markdown).unwrap(), expected);
}

#[test]
fn test_log_major_filter() {
    let mut repo = MockRepository::new();
    let v1 = repo.commit("feat: one");
    repo.add_tag("v1.0.0", v1);
    let v2 = repo.commit("feat!: two");
    repo.add_tag("v2.0.0", v2);
    repo.commit("fix: after two");

    let options = LogOptions {
        major: Some(1),
        ..LogOptions::default()
    };
    let out = render_log(&repo, &options, &Config::default()).unwrap();
    assert!(out.contains("feat!: two"));
    assert!(out.contains("fix: after two"));
    assert!(!out.contains("feat: one"));
}

#[test]
fn test_version_ordering_properties() {
    let v = |s: &str| s.parse::<Version>().unwrap();
    assert!(v("1.2.3") < v("1.3.0-beta"));
    assert!(v("1.3.0-beta") < v("1.3.0"));
    assert!(v("1.0.0-alpha") < v("1.0.0-alpha.1"));
    assert!(v("1.0.0-alpha.1") < v("1.0.0-beta"));
    assert!(v("1.0.0-beta") < v("1.0.0"));
}
