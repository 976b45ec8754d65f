//! twentyq binary: play one game of Twenty Questions between LLM agents.
//!
//! Settings come from flags, then env, then `.env`, then `$XDG_CONFIG_HOME/twentyq/config.toml`.

mod log_format;
mod logging;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use cli::{display, GameOptions, RunError};
use config::GameSettings;
use twentyq::TraceEvent;

#[derive(Parser, Debug)]
#[command(name = "twentyq")]
#[command(about = "twentyq: one LLM asks yes/no questions, another answers, a third judges")]
struct Args {
    /// Secret object to guess (default: random pick from the catalogue)
    #[arg(long, value_name = "OBJECT")]
    secret: Option<String>,

    /// Comma-separated catalogue to pick the secret from, e.g. "ball,chair,tree"
    #[arg(long, value_name = "LIST")]
    catalogue: Option<String>,

    /// Maximum number of rounds (default 20 or TWENTYQ_MAX_ROUNDS)
    #[arg(long, value_name = "N")]
    max_rounds: Option<u32>,

    /// Seed for the secret pick; the same seed always picks the same secret
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Model for the questioner (default gpt-4.1 or TWENTYQ_QUESTIONER_MODEL)
    #[arg(long, value_name = "MODEL")]
    questioner_model: Option<String>,

    /// Model for the answerer (default gpt-4-turbo or TWENTYQ_ANSWERER_MODEL)
    #[arg(long, value_name = "MODEL")]
    answerer_model: Option<String>,

    /// Model for the judge (default gpt-4-turbo or TWENTYQ_JUDGE_MODEL)
    #[arg(long, value_name = "MODEL")]
    judge_model: Option<String>,

    /// Sampling temperature for all three roles
    #[arg(long, value_name = "T")]
    temperature: Option<f32>,

    /// Directory holding a game.yaml that overrides the built-in prompts
    #[arg(long, value_name = "DIR")]
    prompts_dir: Option<PathBuf>,

    /// Stop at the next phase boundary once this many seconds have passed
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Print the final record, summary and events as JSON instead of the transcript
    #[arg(long)]
    json: bool,

    /// When using --json, write output to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// When using --json, pretty-print (multi-line)
    #[arg(long)]
    pretty: bool,

    /// Human output: print only the GAME OVER summary, no live transcript
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Layers flags over settings resolved from env and config file.
    fn apply(&self, settings: &mut GameSettings) {
        if let Some(list) = &self.catalogue {
            settings.catalogue = Some(list.split(',').map(str::to_string).collect());
        }
        if let Some(n) = self.max_rounds {
            settings.max_rounds = n;
        }
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(m) = &self.questioner_model {
            settings.questioner_model = m.clone();
        }
        if let Some(m) = &self.answerer_model {
            settings.answerer_model = m.clone();
        }
        if let Some(m) = &self.judge_model {
            settings.judge_model = m.clone();
        }
        if let Some(t) = self.temperature {
            settings.temperature = Some(t);
        }
        if let Some(dir) = &self.prompts_dir {
            settings.prompts_dir = Some(dir.clone());
        }
    }
}

/// Writes JSON to stdout or to the given file.
fn write_json_output(
    value: &serde_json::Value,
    file: Option<&Path>,
    pretty: bool,
) -> Result<(), RunError> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match file {
        Some(path) => std::fs::write(path, format!("{}\n", s))?,
        None => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", s)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    let mut out = std::io::stdout().lock();
    for line in lines {
        let _ = writeln!(out, "{}", line);
    }
    let _ = out.flush();
}

async fn run(args: Args) -> Result<(), RunError> {
    let file_config = config::load_and_apply(config::APP_NAME, None)?;
    let mut settings = GameSettings::resolve(&file_config)?;
    args.apply(&mut settings);

    let options = GameOptions {
        secret: args.secret.clone(),
        settings,
        timeout: args.timeout_secs.map(Duration::from_secs),
    };
    let secret = options.choose_secret()?;
    let record = options.record(secret.clone());

    cli::require_api_key()?;
    let coordinator = cli::build_coordinator(&options.settings)?;

    let (json, quiet) = (args.json, args.quiet);
    if !json && !quiet {
        print_lines(&display::banner(&secret, options.settings.max_rounds));
    }
    // Quiet mode keeps only the GAME OVER block; JSON mode prints nothing until the end.
    let on_event = move |event: &TraceEvent| {
        let show = !json && (!quiet || matches!(event, TraceEvent::GameOver { .. }));
        if show {
            print_lines(&display::event_lines(event));
        }
    };

    let output = match cli::play(
        coordinator,
        record,
        on_event,
        options.timeout,
        cli::cancel_on_ctrl_c(),
    )
    .await
    {
        Ok(output) => output,
        Err(e) => {
            if let (false, Some(partial)) = (args.json, e.partial_record()) {
                print_lines(&display::aborted(partial));
            }
            return Err(e);
        }
    };

    if args.json {
        write_json_output(&output.to_json(), args.file.as_deref(), args.pretty)?;
    } else if !args.quiet {
        print_lines(&display::closing(&output.record));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging reads LOG_FILE/RUST_LOG, which may come from .env or XDG; apply them first.
    // A config error here is reported again, with context, by `run`.
    config::load_and_apply(config::APP_NAME, None).ok();
    logging::init()?;

    let args = Args::parse();
    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "twentyq failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
