use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use trivia_quiz::{
    telemetry, Config, EndpointSource, FileSource, FileStore, OpenTdbSource, QuestionSource, Quiz,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML config file (defaults to ./trivia-quiz.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take the quiz in the terminal
    Play(PlayArgs),
    /// Serve question batches over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
struct SourceArgs {
    /// Fetch questions from an internal endpoint instead of the provider
    #[arg(long, conflicts_with = "questions")]
    endpoint: Option<String>,

    /// Load questions from a local JSON file
    #[arg(short, long)]
    questions: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct PlayArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Session name; each session resumes independently
    #[arg(short, long)]
    session: Option<String>,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Address to listen on
    #[arg(short, long)]
    bind: Option<String>,
}

fn build_source(args: &SourceArgs, config: &Config) -> Result<Arc<dyn QuestionSource>> {
    let source: Arc<dyn QuestionSource> = match (&args.endpoint, &args.questions) {
        (Some(url), _) => Arc::new(EndpointSource::new(
            url.clone(),
            Duration::from_secs(config.provider.timeout_secs),
        )?),
        (None, Some(path)) => Arc::new(FileSource::new(path)),
        (None, None) => Arc::new(OpenTdbSource::new(&config.provider)?),
    };
    Ok(source)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Play(PlayArgs::default())) {
        Command::Play(args) => {
            if let Some(session) = args.session {
                config.store.session = session;
            }
            telemetry::init_file(&config.store.dir)
                .with_context(|| format!("Failed to open log in {}", config.store.dir.display()))?;

            let source = build_source(&args.source, &config)?;
            let store = FileStore::open(config.store.session_file())
                .context("Failed to open session store")?;

            Quiz::new(Arc::new(store), source, config.quiz).run().await?;
        }
        Command::Serve(args) => {
            telemetry::init_stderr();
            if let Some(bind) = args.bind {
                config.server.bind = bind;
            }

            let source = build_source(&args.source, &config)?;
            trivia_quiz::server::run(&config.server.bind, source).await?;
        }
    }

    Ok(())
}
