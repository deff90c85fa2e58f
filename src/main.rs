use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use ownercheck_audit::report::Report;
use ownercheck_core::{FileScope, OutputFormat, OwnerCheckConfig, CONFIG_FILE_NAME};
use ownercheck_rules::{RuleSet, SectionHeader};

#[derive(Parser)]
#[command(
    name = "ownercheck",
    version,
    about = "Check CODEOWNERS against the files tracked by git",
    long_about = "Checks that every CODEOWNERS rule matches at least one tracked file and that\n\
                   every tracked file is owned by a rule other than the catch-all '*'.\n\n\
                   The exit status is the number of violations found (0 = clean, at most 255).\n\n\
                   Examples:\n  \
                     ownercheck                          Check all tracked files\n  \
                     ownercheck --diff_only              Check staged changes (pre-commit hook)\n  \
                     ownercheck --out report.txt         Write the report to a file\n  \
                     ownercheck explain src/main.cpp     Show which rule owns a file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Only check files with staged changes; skips the unused-rule check
    #[arg(
        long = "diff_only",
        visible_alias = "diff-only",
        long_help = "Only check files with staged changes.\n\n\
                       Lists files with `git diff --name-only --cached --diff-filter=MRAC`\n\
                       instead of `git ls-files`. Rules are not checked for usage because\n\
                       the staged set is only part of the repository. Use this as a\n\
                       pre-commit hook."
    )]
    diff_only: bool,

    /// Write the report to this file instead of standard error
    #[arg(long)]
    out: Option<PathBuf>,

    /// CODEOWNERS file (default: .gitlab/CODEOWNERS in the repository root)
    #[arg(long, global = true)]
    codeowners: Option<PathBuf>,

    /// Repository to check (default: current directory)
    #[arg(long, global = true, default_value = ".")]
    repo: PathBuf,

    /// Path to configuration file (default: .ownercheck.toml in the repository root)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for the report.\n\n\
                       Formats:\n  \
                         text      Findings framed by separator lines (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Show which rule decides ownership of each path
    #[command(long_about = "Show which rule decides ownership of each path.\n\n\
        Prints the last matching rule (line and section) and the combined owners\n\
        across all sections. Paths do not have to exist.\n\n\
        Examples:\n  ownercheck explain src/core/solver.cpp\n  ownercheck explain --format json doc/index.md README.md")]
    Explain {
        /// Repository-relative paths
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Create a default .ownercheck.toml configuration file
    #[command(long_about = "Create a default .ownercheck.toml configuration file.\n\n\
        Writes a commented-out template into the --repo directory.\n\
        Fails if .ownercheck.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

const DEFAULT_CONFIG: &str = r#"# ownercheck configuration

[codeowners]
# Ownership file, relative to the repository root
# path = ".gitlab/CODEOWNERS"
# Raw path of the catch-all rule; files only it matches are unowned
# catch_all = "*"
# Also report files no rule matches at all
# treat_unmatched_as_unowned = false

[git]
# Status letters for --diff_only (added, copied, modified, renamed)
# diff_filter = "MRAC"
"#;

fn init_tracing(verbose: bool, use_color: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_ansi(use_color)
        .init();
}

fn load_config(cli: &Cli, root: Option<&Path>) -> Result<OwnerCheckConfig> {
    let mut config = match (&cli.config, root) {
        (Some(path), _) => OwnerCheckConfig::from_file(path)
            .into_diagnostic()
            .wrap_err(format!("loading {}", path.display()))?,
        (None, Some(root)) if root.join(CONFIG_FILE_NAME).is_file() => {
            let path = root.join(CONFIG_FILE_NAME);
            OwnerCheckConfig::from_file(&path)
                .into_diagnostic()
                .wrap_err(format!("loading {}", path.display()))?
        }
        (None, _) => OwnerCheckConfig::default(),
    };

    if let Some(path) = &cli.codeowners {
        config.codeowners.path = if path.is_absolute() {
            path.clone()
        } else {
            std::env::current_dir().into_diagnostic()?.join(path)
        };
    }
    Ok(config)
}

fn run_check(cli: &Cli) -> Result<ExitCode> {
    let scope = if cli.diff_only {
        FileScope::Staged
    } else {
        FileScope::Tracked
    };

    let mut report = Report::new(scope);
    match ownercheck_git::discover_root(&cli.repo) {
        Ok(root) => match load_config(cli, Some(&root)) {
            Ok(config) => report = ownercheck_audit::run_check(&root, &config, scope),
            Err(e) => report.record_failure(error_chain(&e)),
        },
        Err(e) => report.record_failure(e.to_string()),
    }

    ownercheck_audit::write_report(&report, cli.format, cli.out.as_deref())
        .into_diagnostic()
        .wrap_err("writing report")?;

    tracing::info!(
        %scope,
        unused_rules = report.unused_rules.len(),
        unowned_files = report.unowned_files.len(),
        failures = report.failures.len(),
        "ownership check finished"
    );
    Ok(ExitCode::from(report.exit_code()))
}

fn error_chain(err: &miette::Report) -> String {
    err.chain()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

fn run_explain(cli: &Cli, paths: &[String]) -> Result<()> {
    let root = ownercheck_git::discover_root(&cli.repo)?;
    let config = load_config(cli, Some(&root))?;
    let codeowners = ownercheck_audit::codeowners_path(&root, &config);
    let rules = RuleSet::from_path(&codeowners)
        .into_diagnostic()
        .wrap_err(format!("reading {}", codeowners.display()))?;

    match cli.format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = paths
                .iter()
                .map(|path| {
                    let rule = rules.best_match(path);
                    let header = rule.and_then(|r| rules.section_of(r));
                    serde_json::json!({
                        "path": path,
                        "rule": rule.map(|r| serde_json::json!({
                            "path": r.path(),
                            "line": r.line,
                            "section": r.section,
                        })),
                        "section": header.map(|s| serde_json::json!({
                            "name": s.name,
                            "optional": s.optional,
                            "approvals": s.approvals,
                        })),
                        "catchAll": rule.is_some_and(|r| r.path() == config.codeowners.catch_all),
                        "owners": rules.owners_of(path),
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&entries).into_diagnostic()?
            );
        }
        OutputFormat::Markdown => {
            println!("| Path | Rule | Line | Owners |");
            println!("|------|------|------|--------|");
            for path in paths {
                let owners = owner_names(&rules, path);
                match rules.best_match(path) {
                    Some(rule) => println!(
                        "| `{path}` | `{}` | {} | {owners} |",
                        rule.path(),
                        rule.line
                    ),
                    None => println!("| `{path}` | - | - | - |"),
                }
            }
        }
        OutputFormat::Text => {
            for path in paths {
                println!("{path}");
                match rules.best_match(path) {
                    Some(rule) => {
                        let section = rule
                            .section
                            .as_deref()
                            .map(|s| format!(", section {s}"))
                            .unwrap_or_default();
                        let marker = if rule.path() == config.codeowners.catch_all {
                            " (catch-all)"
                        } else {
                            ""
                        };
                        println!("  rule:   {} (line {}{section}){marker}", rule.path(), rule.line);
                        if let Some(header) = rules.section_of(rule) {
                            println!("  section: {}", describe_section(header));
                        }
                        println!("  owners: {}", owner_names(&rules, path));
                    }
                    None => println!("  rule:   none"),
                }
            }
        }
    }
    Ok(())
}

fn describe_section(header: &SectionHeader) -> String {
    let mut text = header.name.clone();
    if header.optional {
        text.push_str(" (optional)");
    }
    if let Some(n) = header.approvals {
        text.push_str(&format!(", {n} approval(s) required"));
    }
    text
}

fn owner_names(rules: &RuleSet, path: &str) -> String {
    let owners: Vec<&str> = rules
        .owners_of(path)
        .into_iter()
        .map(|o| o.name.as_str())
        .collect();
    if owners.is_empty() {
        "(none)".into()
    } else {
        owners.join(", ")
    }
}

fn main() -> Result<ExitCode> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err()
        }
    };
    init_tracing(cli.verbose, use_color);
    tracing::debug!(format = %cli.format, repo = %cli.repo.display(), "starting");

    match &cli.command {
        None => run_check(&cli),
        Some(Command::Explain { paths }) => {
            run_explain(&cli, paths)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Init) => {
            let path = cli.repo.join(CONFIG_FILE_NAME);
            if path.exists() {
                miette::bail!("{} already exists", path.display());
            }
            std::fs::write(&path, DEFAULT_CONFIG)
                .into_diagnostic()
                .wrap_err(format!("writing {}", path.display()))?;
            println!("Created {} with default configuration", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "ownercheck", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}
