use std::fmt;

use prep_core::model::{Difficulty, PerformanceRecord, SessionKind};
use services::{AppServices, Clock, SessionLoopService, SessionState};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownQuiz(String),
    MissingSubject,
    InvalidDifficulty { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownQuiz(raw) => write!(f, "unknown quiz kind: {raw}"),
            ArgsError::MissingSubject => write!(f, "focus quizzes need --subject <name>"),
            ArgsError::InvalidDifficulty { raw } => write!(f, "invalid --difficulty value: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
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
    eprintln!("  cargo run -p app -- quiz daily                        [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- quiz exam [--difficulty <level>]  [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- quiz focus --subject <name>       [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- stats                             [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- history [--limit <n>]             [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- days [--toggle <day>]             [--db <sqlite_url>]");
    eprintln!();
    eprintln!("During a quiz, answer with 1-4, 'h' shows a hint, 'q' quits without saving.");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://prep.sqlite3");
    eprintln!("  --difficulty medium");
    eprintln!("  --limit 10");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PREP_DB_URL, PREP_AI_API_KEY, PREP_AI_BASE_URL, PREP_AI_MODEL, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Quiz(SessionKind),
    Stats,
    History { limit: usize },
    Days { toggle: Option<u32> },
}

struct Args {
    db_url: String,
    command: Command,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("PREP_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://prep.sqlite3".into(), normalize_sqlite_url);

        let Some(name) = args.next() else {
            return Err(ArgsError::UnknownArg(String::new()));
        };
        let quiz = if name == "quiz" {
            Some(require_value(args, "quiz")?)
        } else {
            None
        };

        let mut difficulty = Difficulty::default();
        let mut subject: Option<String> = None;
        let mut limit = 10_usize;
        let mut toggle = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    difficulty = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidDifficulty { raw: value.clone() })?;
                }
                "--subject" => {
                    let value = require_value(args, "--subject")?;
                    if !value.trim().is_empty() {
                        subject = Some(value.trim().to_string());
                    }
                }
                "--limit" => {
                    let value = require_value(args, "--limit")?;
                    limit = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--limit",
                        raw: value.clone(),
                    })?;
                }
                "--toggle" => {
                    let value = require_value(args, "--toggle")?;
                    toggle = Some(value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--toggle",
                        raw: value.clone(),
                    })?);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let command = match (name.as_str(), quiz.as_deref()) {
            ("quiz", Some("daily")) => Command::Quiz(SessionKind::DailyQuiz),
            ("quiz", Some("exam")) => Command::Quiz(SessionKind::FullExam { difficulty }),
            ("quiz", Some("focus")) => Command::Quiz(SessionKind::FocusQuiz {
                subject: subject.ok_or(ArgsError::MissingSubject)?,
            }),
            ("quiz", Some(other)) => return Err(ArgsError::UnknownQuiz(other.to_string())),
            ("stats", _) => Command::Stats,
            ("history", _) => Command::History { limit },
            ("days", _) => Command::Days { toggle },
            _ => return Err(ArgsError::UnknownArg(name)),
        };

        Ok(Self { db_url, command })
    }
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

/// Create the database file (and its directory) so the pool can open it.
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

//
// ─── QUIZ RUNNER ───────────────────────────────────────────────────────────────
//

type Input = Lines<BufReader<Stdin>>;

async fn run_quiz(
    loop_svc: &SessionLoopService,
    kind: SessionKind,
    input: &mut Input,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Preparing {}...", kind.title());
    let mut session = loop_svc.start(kind).await?;
    if session.state() == SessionState::Empty {
        println!("No questions are available right now. Please try again later.");
        loop_svc.exit(session);
        return Ok(());
    }

    while let Some(question) = session.current_question() {
        let progress = session.progress();
        println!();
        println!(
            "[{}/{}] {} - {}",
            progress.current_index + 1,
            progress.total,
            question.subject(),
            question.prompt()
        );
        for (index, option) in question.options().iter().enumerate() {
            println!("  {}) {option}", index + 1);
        }
        let hint = question.hint().map(str::to_string);

        let Some(line) = input.next_line().await? else {
            loop_svc.exit(session);
            return Ok(());
        };
        match line.trim() {
            "q" | "Q" => {
                println!("Session abandoned; nothing was recorded.");
                loop_svc.exit(session);
                return Ok(());
            }
            "h" | "H" => {
                println!("Hint: {}", hint.as_deref().unwrap_or("no hint for this one"));
                continue;
            }
            choice => match choice.parse::<usize>() {
                Ok(n @ 1..=4) => {
                    session.select_index(n - 1);
                }
                _ => {
                    println!("Answer with a number from 1 to 4.");
                    continue;
                }
            },
        }

        let result = loop_svc.advance(&mut session).await?;
        if result.answer.is_correct {
            println!("Correct!");
        } else if let Some(asked) = session.questions().get(progress.current_index) {
            println!("Wrong. The answer is: {}", asked.answer());
            if let Some(explanation) = asked.explanation() {
                println!("{explanation}");
            }
        }

        if let Some(record) = result.record {
            println!();
            println!(
                "Finished: {}/{} ({:.1}%)",
                record.score(),
                record.total(),
                record.percentage()
            );
            if !result.persisted {
                println!("Warning: the result could not be saved and will be lost on exit.");
            }
        }
    }

    Ok(())
}

//
// ─── REPORTS ───────────────────────────────────────────────────────────────────
//

async fn print_stats(services: &AppServices) {
    let stats = services.stats();
    let overview = stats.overview().await;
    println!(
        "Answered {} questions, {} correct ({:.1}%)",
        overview.total_questions, overview.total_correct, overview.average
    );

    let subjects = stats.subject_breakdown().await;
    if subjects.is_empty() {
        println!("No sessions recorded yet.");
        return;
    }
    for subject in subjects {
        println!(
            "  {:<12} {:>5.1}%  ({}/{})",
            subject.subject, subject.percentage, subject.correct, subject.total
        );
    }
}

async fn print_history(services: &AppServices, clock: Clock, limit: usize) {
    let items = services.stats().recent(limit).await;
    if items.is_empty() {
        println!("No sessions recorded yet.");
        return;
    }
    let today = clock.today();
    for item in items {
        let date = item.completed_at.date_naive();
        let when = if date == today {
            "today".to_string()
        } else {
            date.to_string()
        };
        println!(
            "{when:<10}  {:<28} {}/{} ({:.1}%)",
            item.kind.title(),
            item.score,
            item.total,
            item.percentage
        );
        if let Some(record) = services.stats().record(item.id).await {
            print_mistakes(&record);
        }
    }
}

fn print_mistakes(record: &PerformanceRecord) {
    for item in record.review() {
        if let Some(correct) = item.correction() {
            println!(
                "    x {} (you: {}, answer: {correct})",
                item.question.prompt(),
                item.answer.selected_option
            );
        }
    }
}

async fn print_days(
    services: &AppServices,
    toggle: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = services.study_days();
    if let Some(day) = toggle {
        let done = store.toggle(day).await?;
        println!("Day {day} marked as {}.", if done { "done" } else { "not done" });
    }
    let days = store.days().await;
    if days.is_empty() {
        println!("No study days completed yet.");
    } else {
        let list: Vec<String> = days.iter().map(|d| d.to_string()).collect();
        println!("Completed days: {}", list.join(", "));
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    if argv.is_empty() || matches!(argv[0].as_str(), "--help" | "-h") {
        print_usage();
        return Ok(());
    }

    let parsed = Args::parse(&mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    log::info!("using database {}", parsed.db_url);
    let clock = Clock::default_clock();
    let services = AppServices::new_sqlite(&parsed.db_url, clock).await?;

    match parsed.command {
        Command::Quiz(kind) => {
            let mut input = BufReader::new(tokio::io::stdin()).lines();
            run_quiz(&services.session_loop(), kind, &mut input).await
        }
        Command::Stats => {
            print_stats(&services).await;
            Ok(())
        }
        Command::History { limit } => {
            print_history(&services, clock, limit).await;
            Ok(())
        }
        Command::Days { toggle } => print_days(&services, toggle).await,
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
