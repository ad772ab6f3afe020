use std::path::PathBuf;

mod app;
mod collector;
mod config;
mod dataset;
mod db;
mod error;
mod models;
mod pipeline;
mod report;
mod sentiment;

use app::App;
use collector::TwitterSearch;
use config::Config;
use error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Analyze,
    Prepare,
    Collect,
    All,
    Train(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    command: Command,
    top_k: Option<usize>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut command = Command::Analyze;
    let mut top_k = None;
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--analyze" => command = Command::Analyze,
            "--prepare" => command = Command::Prepare,
            "--collect" => command = Command::Collect,
            "--all" => command = Command::All,
            "--train" => {
                let path = iter
                    .next()
                    .ok_or_else(|| AppError::Config("--train needs a CSV path".to_string()))?;
                command = Command::Train(PathBuf::from(path));
            }
            "--top" => {
                let k = iter
                    .next()
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| AppError::Config("--top needs a number".to_string()))?;
                top_k = Some(k);
            }
            other => return Err(AppError::Config(format!("unknown argument {:?}", other))),
        }
    }

    Ok(Args { command, top_k })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (info and above unless RUST_LOG says otherwise)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let args = parse_args(&args)?;

    let config = Config::load()?;
    let top_k = args.top_k.unwrap_or(config.top_k);
    let app = App::new(config).await?;

    match args.command {
        Command::Train(path) => {
            app.train(&path)?;
            println!("Saved model to {}", app.config().model_path);
        }
        Command::Prepare => {
            let (cleaned, _) = app.prepare()?;
            println!(
                "Prepared {} posts into {}",
                cleaned.len(),
                app.config().prepared_csv_path().display()
            );
        }
        Command::Collect => {
            collect(&app).await?;
        }
        Command::All => {
            collect(&app).await?;
            analyze(&app, top_k).await?;
        }
        Command::Analyze => {
            analyze(&app, top_k).await?;
        }
    }

    Ok(())
}

async fn collect(app: &App) -> Result<()> {
    let token = app.config().bearer_token.clone().ok_or_else(|| {
        AppError::Config(format!(
            "bearer_token is not set in {}",
            Config::config_path().display()
        ))
    })?;
    let source = TwitterSearch::new(token, &app.config().search_environment)?;
    let posts = app.collect(&source).await?;
    println!(
        "Collected {} posts into {}",
        posts.len(),
        app.config().raw_csv_path().display()
    );
    Ok(())
}

async fn analyze(app: &App, top_k: usize) -> Result<()> {
    let scorer = app.load_scorer()?;
    let report = app.analyze(&scorer, top_k).await?;
    print!("{}", report.render());
    println!(
        "\nWrote {} and {}",
        app.config().scored_csv_path().display(),
        app.config().report_path().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("election-sentiment")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn defaults_to_analyze() {
        let args = parse_args(&argv(&[])).unwrap();
        assert_eq!(args.command, Command::Analyze);
        assert_eq!(args.top_k, None);
    }

    #[test]
    fn reads_flags() {
        let args = parse_args(&argv(&["--collect"])).unwrap();
        assert_eq!(args.command, Command::Collect);

        let args = parse_args(&argv(&["--all", "--top", "25"])).unwrap();
        assert_eq!(args.command, Command::All);
        assert_eq!(args.top_k, Some(25));

        let args = parse_args(&argv(&["--train", "labeled.csv"])).unwrap();
        assert_eq!(args.command, Command::Train(PathBuf::from("labeled.csv")));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&argv(&["--train"])).is_err());
        assert!(parse_args(&argv(&["--top", "many"])).is_err());
        assert!(parse_args(&argv(&["--refresh"])).is_err());
    }
}
