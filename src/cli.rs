use crate::api::{parse_share_id, ApiClient};
use crate::model::{ActionError, Language, RunConfig, RunOutcome};
use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "coderun-cli",
    version,
    about = "Terminal client for a remote code-runner service",
    group(ArgGroup::new("oneshot").args(["run", "share", "fetch"]).multiple(false))
)]
pub struct Cli {
    /// Base URL of the code-runner service
    #[arg(long, env = "API_URL", default_value = "http://localhost:5000")]
    pub base_url: String,

    /// Execute a source file and print its output (use '-' for stdin), no TUI
    #[arg(long, value_name = "FILE")]
    pub run: Option<PathBuf>,

    /// Share a source file and print the share URL, no TUI
    #[arg(long, value_name = "FILE")]
    pub share: Option<PathBuf>,

    /// Fetch a shared snippet by id or share URL and print its code, no TUI
    #[arg(long, value_name = "ID")]
    pub fetch: Option<String>,

    /// With a one-shot mode: print the raw JSON response instead of
    /// interpreting it
    #[arg(long)]
    pub json: bool,

    /// Start the TUI with a shared snippet loaded (id or share URL)
    #[arg(long, value_name = "ID", conflicts_with = "oneshot")]
    pub open: Option<String>,

    /// Health poll interval
    #[arg(long, default_value = "5s")]
    pub status_interval: humantime::Duration,

    /// Per-request timeout; expiry is reported as its own error class
    #[arg(long, default_value = "30s")]
    pub request_timeout: humantime::Duration,

    /// Language tag submitted with execute/share requests
    #[arg(long, value_enum, default_value_t = Language::Python)]
    pub language: Language,

    /// Start with automatic completion suggestions disabled
    #[arg(long)]
    pub no_autocomplete: bool,
}

pub async fn run(args: Cli) -> Result<()> {
    if args.run.is_some() || args.share.is_some() || args.fetch.is_some() {
        return run_oneshot(args).await;
    }

    #[cfg(feature = "tui")]
    {
        crate::tui::run(args).await
    }
    #[cfg(not(feature = "tui"))]
    {
        anyhow::bail!("built without TUI support; use --run, --share, or --fetch")
    }
}

/// Floor for `--status-interval`; `tokio::time::interval` panics on zero.
const MIN_STATUS_INTERVAL: Duration = Duration::from_millis(100);

/// Build a `RunConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> RunConfig {
    RunConfig {
        base_url: args.base_url.clone(),
        language: args.language,
        status_interval: Duration::from(args.status_interval).max(MIN_STATUS_INTERVAL),
        request_timeout: Duration::from(args.request_timeout),
        user_agent: format!("coderun-cli/{}", env!("CARGO_PKG_VERSION")),
    }
}

/// Scriptable single-action modes. Failures print the rendered error to
/// stderr and exit 1; exit 0 means the action itself succeeded.
async fn run_oneshot(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let client = ApiClient::new(&cfg)?;

    if let Some(path) = &args.run {
        let code = read_source(path)?;
        if code.trim().is_empty() {
            fail(&ActionError::EmptyCode);
        }
        if args.json {
            match client.execute_raw(&code, cfg.language).await {
                Ok(body) => {
                    println!("{}", serde_json::to_string_pretty(&body)?);
                    if body.get("error").and_then(|v| v.as_str()).is_some() {
                        std::process::exit(1);
                    }
                }
                Err(e) => fail(&e),
            }
        } else {
            match client.execute(&code, cfg.language).await {
                Ok(RunOutcome::Output(out)) => {
                    print!("{out}");
                    if !out.ends_with('\n') {
                        println!();
                    }
                }
                Ok(RunOutcome::NoOutput) => eprintln!("{}", RunOutcome::NoOutput.render()),
                Err(e) => fail(&e),
            }
        }
        return Ok(());
    }

    if let Some(path) = &args.share {
        let code = read_source(path)?;
        if code.trim().is_empty() {
            fail(&ActionError::EmptyCode);
        }
        if args.json {
            match client.share_raw(&code, cfg.language).await {
                Ok(body) => {
                    println!("{}", serde_json::to_string_pretty(&body)?);
                    if body.get("error").and_then(|v| v.as_str()).is_some() {
                        std::process::exit(1);
                    }
                }
                Err(e) => fail(&e),
            }
        } else {
            match client.share(&code, cfg.language).await {
                Ok(url) => println!("{url}"),
                Err(e) => fail(&e),
            }
        }
        return Ok(());
    }

    if let Some(input) = &args.fetch {
        let id = parse_share_id(input)
            .with_context(|| format!("'{input}' is not a share id or share URL"))?;
        if args.json {
            match client.fetch_snippet_raw(&id).await {
                Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
                Err(e) => fail(&e),
            }
        } else {
            match client.fetch_snippet(&id).await {
                Ok(snippet) => {
                    print!("{}", snippet.code);
                    if !snippet.code.ends_with('\n') {
                        println!();
                    }
                }
                Err(e) => fail(&e),
            }
        }
        return Ok(());
    }

    unreachable!("run_oneshot called without a one-shot flag");
}

fn fail(e: &ActionError) -> ! {
    eprintln!("{}", e.render());
    std::process::exit(1);
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut code = String::new();
        std::io::stdin()
            .read_to_string(&mut code)
            .context("read code from stdin")?;
        Ok(code)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("read source file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_status_interval_is_floored() {
        let args = Cli::try_parse_from(["coderun-cli", "--status-interval", "0s"]).unwrap();
        let cfg = build_config(&args);
        assert!(cfg.status_interval >= MIN_STATUS_INTERVAL);
    }

    #[test]
    fn default_intervals_pass_through() {
        let args = Cli::try_parse_from(["coderun-cli"]).unwrap();
        let cfg = build_config(&args);
        assert_eq!(cfg.status_interval, Duration::from_secs(5));
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn oneshot_flags_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["coderun-cli", "--run", "a.py", "--fetch", "id"]).is_err());
        assert!(Cli::try_parse_from(["coderun-cli", "--share", "a.py", "--run", "b.py"]).is_err());
        assert!(Cli::try_parse_from(["coderun-cli", "--open", "id", "--run", "a.py"]).is_err());
    }

    #[test]
    fn json_parses_with_every_oneshot_mode() {
        for (flag, value) in [("--run", "a.py"), ("--share", "a.py"), ("--fetch", "abc")] {
            let args = Cli::try_parse_from(["coderun-cli", flag, value, "--json"]).unwrap();
            assert!(args.json, "--json rejected alongside {flag}");
        }
    }
}
