use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use git_semver::analyzer::NextOptions;
use git_semver::boundary::BoundaryWarning;
use git_semver::changelog::OutputMode;
use git_semver::cli::{self, LogOptions};
use git_semver::config::{self, Config};
use git_semver::domain::PreReleaseOptions;
use git_semver::git::Git2Repository;
use git_semver::ui;
use git_semver::GitSemverError;

#[derive(Parser)]
#[command(
    name = "git-semver",
    version,
    about = "Resolve semantic versions and changelogs from git tags and conventional commits"
)]
struct Cli {
    #[arg(short, long, global = true, default_value = ".", help = "Repository working directory")]
    workdir: PathBuf,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Log level filter (overrides RUST_LOG), e.g. debug")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the latest semantic version
    Latest {
        #[arg(long, help = "Consider pre-release versions as well")]
        include_pre_releases: bool,

        #[arg(long, help = "Only consider versions with this major version")]
        major_version: Option<u64>,
    },

    /// Print the next semantic version, based on the commits since the latest version
    Next {
        #[arg(long, help = "Only consider versions with this major version")]
        major_version: Option<u64>,

        #[arg(long, help = "Treat 0.x versions as stable: breaking changes bump the major version")]
        stable: bool,

        #[arg(long, help = "Pre-release label, e.g. \"alpha\" or \"rc.2026-01-01\"")]
        pre_release_tag: Option<String>,

        #[arg(long, help = "Append a counter to the pre-release label")]
        pre_release_counter: bool,
    },

    /// Print the commits belonging to a version, or the unreleased commits
    Log {
        #[arg(value_name = "REF", help = "Release tag, version or other reference")]
        reference: Option<String>,

        #[arg(long, help = "Leave out commits already released in a pre-release")]
        exclude_pre_releases: bool,

        #[arg(long, conflicts_with = "markdown", help = "Print conventional commits as JSON")]
        conventional_commits: bool,

        #[arg(long, help = "Print a Markdown changelog")]
        markdown: bool,

        #[arg(long, help = "Only consider versions with this major version")]
        major_version: Option<u64>,
    },

    /// Compare two semantic versions and print "<", "=" or ">"
    Compare {
        #[arg(value_name = "VERSION1")]
        first: String,

        #[arg(value_name = "VERSION2")]
        second: String,
    },
}

fn main() {
    let args = Cli::parse();
    init_tracing(args.log_level.as_deref());

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));

        let user_error = e
            .downcast_ref::<GitSemverError>()
            .is_some_and(GitSemverError::is_user_error);
        std::process::exit(if user_error { 2 } else { 1 });
    }
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(args: Cli) -> Result<()> {
    match args.command {
        Command::Latest {
            include_pre_releases,
            major_version,
        } => {
            let repo = open_repository(&args.workdir)?;
            let version = cli::resolve_latest(&repo, major_version, include_pre_releases)?;
            print_output(&version.to_string())
        }

        Command::Next {
            major_version,
            stable,
            pre_release_tag,
            pre_release_counter,
        } => {
            let config = load_config(args.config.as_deref(), &args.workdir)?;
            let repo = open_repository(&args.workdir)?;

            let options = NextOptions {
                major: major_version,
                zero_major_rule: config.versioning.zero_major_rule && !stable,
                pre_release: PreReleaseOptions::new(
                    pre_release_tag.unwrap_or_default(),
                    pre_release_counter,
                ),
            };

            let next = cli::resolve_next(&repo, &options, &config)?;
            if next.is_unchanged() {
                let warning = BoundaryWarning::NothingToRelease {
                    version: next.version.to_string(),
                    current_commit_hash: next.head.to_string(),
                };
                tracing::info!("{}", warning);
            }

            print_output(&next.version.to_string())
        }

        Command::Log {
            reference,
            exclude_pre_releases,
            conventional_commits,
            markdown,
            major_version,
        } => {
            let config = load_config(args.config.as_deref(), &args.workdir)?;
            let repo = open_repository(&args.workdir)?;

            let mode = if conventional_commits {
                OutputMode::ConventionalJson
            } else if markdown {
                OutputMode::Markdown
            } else {
                OutputMode::Plain
            };

            let options = LogOptions {
                reference,
                mode,
                exclude_prereleases: exclude_pre_releases,
                major: major_version,
            };

            print_output(&cli::render_log(&repo, &options, &config)?)
        }

        Command::Compare { first, second } => {
            let ordering = cli::compare_versions(&first, &second)?;
            print_output(cli::ordering_symbol(ordering))
        }
    }
}

fn open_repository(workdir: &Path) -> Result<Git2Repository> {
    Git2Repository::open(workdir)
        .with_context(|| format!("Could not open git repository at '{}'", workdir.display()))
}

fn load_config(config_path: Option<&Path>, workdir: &Path) -> Result<Config> {
    Ok(config::load_config(config_path, workdir)?)
}

fn print_output(output: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
