use std::fmt;

use quiz_core::Clock;
use quiz_core::model::{SectionId, SectionQuestions};
use quiz_core::reward::RewardEvent;
use services::quiz::QuestionLoad;
use services::{AppConfig, AppServices, Route, Submission};

mod play;
mod telemetry;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { name: &'static str },
    UnknownArg(String),
    InvalidPercent { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { name } => write!(f, "missing <{name}>"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPercent { raw } => write!(f, "invalid percent: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- status    [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- questions <section> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- play      <section> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- submit    <section> <percent> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- spin      [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- reset     [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {}", services::config::DEFAULT_DB_URL);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_QUESTIONS_URL, QUIZ_REWARD_DELAY_MS, QUIZ_LOG, QUIZ_LOG_FORMAT");
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Status,
    Questions { section: SectionId },
    Play { section: SectionId },
    Submit { section: SectionId, percent: f64 },
    Spin,
    Reset,
}

struct Args {
    command: Command,
    db_url: Option<String>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut args = args.into_iter();
        let mut positional = Vec::new();
        let mut db_url = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            None | Some("status") => Command::Status,
            Some("questions") => Command::Questions {
                section: section_arg(positional.next())?,
            },
            Some("play") => Command::Play {
                section: section_arg(positional.next())?,
            },
            Some("submit") => {
                let section = section_arg(positional.next())?;
                let raw = positional
                    .next()
                    .ok_or(ArgsError::MissingArgument { name: "percent" })?;
                let percent = raw
                    .parse::<f64>()
                    .map_err(|_| ArgsError::InvalidPercent { raw: raw.clone() })?;
                Command::Submit { section, percent }
            }
            Some("spin") => Command::Spin,
            Some("reset") => Command::Reset,
            Some(other) => return Err(ArgsError::UnknownArg(other.to_owned())),
        };

        if let Some(extra) = positional.next() {
            return Err(ArgsError::UnknownArg(extra));
        }

        Ok(Self { command, db_url })
    }
}

fn section_arg(raw: Option<String>) -> Result<SectionId, ArgsError> {
    let raw = raw.ok_or(ArgsError::MissingArgument { name: "section" })?;
    raw.parse::<SectionId>()
        .map_err(|_| ArgsError::MissingArgument { name: "section" })
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn print_status(app: &AppServices) -> Result<(), Box<dyn std::error::Error>> {
    let progress = app.progress().snapshot().await;
    for section in app.catalog().iter() {
        let Some(entry) = progress.get(section.id()) else {
            continue;
        };
        println!(
            "{:<12} {:<28} completed={:<5} high_score={:<5} best={:.0}",
            section.id(),
            section.title(),
            entry.completed,
            entry.high_score_achieved,
            entry.highest_score
        );
    }
    println!(
        "reveal {}%  stage {:?}",
        progress.reveal_level(),
        app.rewards().stage().await
    );
    if let Some(prize) = app.prizes().stored_prize().await? {
        println!("prize: {prize}");
    }
    Ok(())
}

fn print_questions(questions: &SectionQuestions) {
    match questions {
        SectionQuestions::MultipleChoice(list) => {
            for question in list {
                println!("{}. {}", question.id(), question.text());
                for option in question.options() {
                    println!("   {}) {}", option.id, option.text);
                }
            }
        }
        SectionQuestions::TrueFalse(sets) => {
            for set in sets {
                println!("{}. {}", set.id(), set.passage());
                for (id, text) in set.statements() {
                    println!("   {id}) {text}");
                }
            }
        }
    }
}

async fn report_submission(section: &SectionId, submission: Submission) {
    println!(
        "{section}: reveal {}%{}",
        submission.update.reveal_level,
        if submission.update.changed { "" } else { " (unchanged)" }
    );
    match submission.event {
        Some(RewardEvent::FirstUnlock { .. }) => println!("first reward piece unlocked"),
        Some(RewardEvent::PieceUnlocked { from, to, .. }) => {
            println!("reward piece unlocked ({from}% -> {to}%)");
        }
        Some(RewardEvent::AllUnlocked { .. }) => println!("all sections passed"),
        None => {}
    }
    if let Some(command) = submission.navigation {
        let route = command.wait().await;
        println!("next: {route}");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut config = AppConfig::from_env()?;
    if let Some(db_url) = parsed.db_url {
        config.db_url = db_url;
    }
    config.db_url = normalize_sqlite_url(config.db_url);

    // Open + migrate SQLite at startup; services stay storage-agnostic.
    prepare_sqlite_file(&config.db_url)?;
    let app = AppServices::new_sqlite(&config, Clock::system()).await?;

    match parsed.command {
        Command::Status => print_status(&app).await?,
        Command::Questions { section } => {
            let def = app
                .catalog()
                .get(&section)
                .cloned()
                .ok_or_else(|| format!("unknown section: {section}"))?;
            match app.questions().load(&def).await {
                QuestionLoad::Ready(questions) => print_questions(&questions),
                QuestionLoad::Failed(reason) => return Err(reason.into()),
            }
        }
        Command::Play { section } => {
            let mut session = app.start_quiz(&section).await?;
            {
                let stdin = std::io::stdin();
                play::answer_session(&mut session, &mut stdin.lock(), &mut std::io::stdout())?;
            }
            println!("{}", play::summary(&session));
            let submission = app.rewards().submit_session(&session).await?;
            report_submission(&section, submission).await;
        }
        Command::Submit { section, percent } => {
            let submission = app.rewards().submit_score(&section, percent).await?;
            report_submission(&section, submission).await;
        }
        Command::Spin => {
            if !app.can_enter(&Route::PrizeWheel).await {
                return Err("the prize wheel unlocks once every section is passed".into());
            }
            let outcome = app.prizes().spin().await?;
            if outcome.first_draw {
                println!("you won: {}", outcome.kept);
            } else {
                println!("landed on {}; your prize stays {}", outcome.landed, outcome.kept);
            }
        }
        Command::Reset => {
            app.progress().clear().await?;
            app.prizes().clear().await?;
            println!("progress and prize cleared");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
