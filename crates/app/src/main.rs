mod setup;
mod terminal;

use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use finlit_core::model::SessionState;
use finlit_core::planner::{self, RiskAppetite};
use finlit_core::quiz::{QuizPhaseEngine, QuizSettings};
use services::{
    AvatarSelector, Clock, IntentResponder, QuizLoopService, ResponseEngine, SessionProgress,
    SetupService,
};
use storage::{FileSource, InMemorySource, QuestionRepository};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use setup::{SetupRequest, complete_setup, read_answer};
use terminal::TerminalDriver;

const BUNDLED_QUESTIONS: &str = include_str!("../../../data/questions.json");
const BUNDLED_INTENTS: &str = include_str!("../../../data/intents.json");

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
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

fn parse_number<T: FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn env_number(key: &str) -> Option<u32> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [-v] quiz   [--questions <path>] [--name <name>] [--country <c>]");
    eprintln!("                                  [--catalog <n> | --emoji <e> | --avatar-image <path>]");
    eprintln!("                                  [--collect-secs <s>] [--reveal-secs <s>] [--count <n>]");
    eprintln!("  cargo run -p app -- [-v] chat   [--intents <path>]");
    eprintln!("  cargo run -p app -- budget <monthly_income>");
    eprintln!("  cargo run -p app -- invest <low|medium|high>");
    eprintln!("  cargo run -p app -- save --goal <name> --amount <n> [--months <1-24>]");
    eprintln!();
    eprintln!("Defaults for quiz:");
    eprintln!("  --questions data/questions.json (bundled set if unusable)");
    eprintln!("  --catalog 0, --collect-secs 5, --reveal-secs 5, --count 5");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FINLIT_LOG, FINLIT_QUESTIONS, FINLIT_INTENTS, FINLIT_COLLECT_SECS, FINLIT_REVEAL_SECS");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Chat,
    Budget,
    Invest,
    Save,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "chat" => Some(Self::Chat),
            "budget" => Some(Self::Budget),
            "invest" => Some(Self::Invest),
            "save" => Some(Self::Save),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AvatarChoice {
    Catalog(usize),
    Emoji(String),
    Image(PathBuf),
}

#[derive(Debug)]
struct QuizArgs {
    questions: PathBuf,
    name: Option<String>,
    country: String,
    avatar: AvatarChoice,
    collect_secs: u32,
    reveal_secs: u32,
    count: u32,
}

impl QuizArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let defaults = QuizSettings::default();
        let mut parsed = Self {
            questions: std::env::var("FINLIT_QUESTIONS")
                .map_or_else(|_| PathBuf::from("data/questions.json"), PathBuf::from),
            name: None,
            country: String::new(),
            avatar: AvatarChoice::Catalog(0),
            collect_secs: env_number("FINLIT_COLLECT_SECS").unwrap_or(defaults.collect_secs()),
            reveal_secs: env_number("FINLIT_REVEAL_SECS").unwrap_or(defaults.reveal_secs()),
            count: defaults.questions_per_quiz(),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => parsed.questions = require_value(args, "--questions")?.into(),
                "--name" => parsed.name = Some(require_value(args, "--name")?),
                "--country" => parsed.country = require_value(args, "--country")?,
                "--catalog" => {
                    let raw = require_value(args, "--catalog")?;
                    parsed.avatar = AvatarChoice::Catalog(parse_number("--catalog", raw)?);
                }
                "--emoji" => parsed.avatar = AvatarChoice::Emoji(require_value(args, "--emoji")?),
                "--avatar-image" => {
                    let path = require_value(args, "--avatar-image")?;
                    parsed.avatar = AvatarChoice::Image(path.into());
                }
                "--collect-secs" => {
                    let raw = require_value(args, "--collect-secs")?;
                    parsed.collect_secs = parse_number("--collect-secs", raw)?;
                }
                "--reveal-secs" => {
                    let raw = require_value(args, "--reveal-secs")?;
                    parsed.reveal_secs = parse_number("--reveal-secs", raw)?;
                }
                "--count" => {
                    let raw = require_value(args, "--count")?;
                    parsed.count = parse_number("--count", raw)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn parse_intents_path(args: &mut impl Iterator<Item = String>) -> Result<PathBuf, ArgsError> {
    let mut path = std::env::var("FINLIT_INTENTS")
        .map_or_else(|_| PathBuf::from("data/intents.json"), PathBuf::from);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--intents" => path = require_value(args, "--intents")?.into(),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(path)
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env("FINLIT_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Forward option numbers typed on stdin (1-based) to the quiz loop.
///
/// Runs on a plain thread so a pending read never holds up runtime shutdown.
fn spawn_stdin_selections(tx: mpsc::Sender<usize>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match line.trim().parse::<usize>() {
                Ok(number) if number >= 1 => {
                    if tx.blocking_send(number - 1).is_err() {
                        break;
                    }
                }
                _ => eprintln!("enter an option number"),
            }
        }
    });
}

async fn run_quiz(args: QuizArgs) -> Result<(), Box<dyn std::error::Error>> {
    let defaults = QuizSettings::default();
    let settings = QuizSettings::new(
        args.collect_secs,
        args.reveal_secs,
        defaults.poll_interval_ms(),
        args.count,
    )?;

    let repo = QuestionRepository::new();
    let mut report = repo.load(&FileSource::new(&args.questions)).await;
    if report.questions.is_empty() {
        warn!(path = %args.questions.display(), "no usable questions, using bundled set");
        report = repo
            .load(&InMemorySource::new("bundled-questions", BUNDLED_QUESTIONS))
            .await;
    }

    if !report.is_clean() {
        warn!(skipped = report.diagnostics.len(), "some question records were skipped");
    }

    let clock = Clock::system();
    let mut state = SessionState::new(clock.now());
    let mut selector = AvatarSelector::new();
    let chosen = match &args.avatar {
        AvatarChoice::Catalog(index) => selector.pick_catalog(&mut state, *index),
        AvatarChoice::Emoji(raw) => selector.type_emoji(&mut state, raw),
        AvatarChoice::Image(path) => match tokio::fs::read(path).await {
            Ok(bytes) => selector.upload_image(&mut state, &file_name(path), bytes),
            Err(err) => {
                warn!(path = %path.display(), "avatar image unreadable: {err}");
                Ok(())
            }
        },
    };
    if let Err(err) = chosen {
        warn!("avatar not accepted: {err}");
    }

    let service = SetupService::new(settings);
    let completed = complete_setup(
        &mut std::io::stdin().lock(),
        &mut std::io::stderr(),
        &mut state,
        &mut selector,
        SetupRequest {
            name: args.name,
            country: args.country,
            pool: &report.questions,
            service: &service,
            clock: &clock,
        },
        &mut rand::rng(),
    )?;
    if !completed {
        eprintln!("Setup was not completed; no quiz started.");
        return Ok(());
    }

    let (tx, rx) = mpsc::channel(8);
    spawn_stdin_selections(tx);

    let service = QuizLoopService::new(clock, QuizPhaseEngine::new(settings));
    let mut driver = TerminalDriver::new(std::io::stdout());
    let ratio = service.run(&mut state, &mut driver, rx).await?;
    let progress = SessionProgress::of(&state);
    info!(
        score = ratio.score,
        total = ratio.total,
        answered = progress.answered,
        "quiz finished"
    );
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

async fn run_chat(intents: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let bot = match IntentResponder::from_source(&FileSource::new(&intents)).await {
        Ok(bot) => bot,
        Err(err) => {
            warn!(path = %intents.display(), "intents unavailable, using bundled rules: {err}");
            IntentResponder::from_source(&InMemorySource::new("bundled-intents", BUNDLED_INTENTS))
                .await?
        }
    };

    println!("Ask a finance question (empty line or 'quit' to leave).");
    let mut input = std::io::stdin().lock();
    let mut out = std::io::stderr();
    while let Some(question) = read_answer(&mut input, &mut out, "You: ")? {
        if question.is_empty() || question.eq_ignore_ascii_case("quit") {
            break;
        }
        println!("Bot: {}", bot.respond(&question));
    }
    Ok(())
}

fn run_budget(args: &mut impl Iterator<Item = String>) -> Result<(), Box<dyn std::error::Error>> {
    let raw = require_value(args, "<monthly_income>")?;
    let income: f64 = parse_number("<monthly_income>", raw)?;
    match planner::budget_split(income) {
        Some(split) => {
            println!("Needs (50%):   {:.2}", split.needs);
            println!("Wants (30%):   {:.2}", split.wants);
            println!("Savings (20%): {:.2}", split.savings);
        }
        None => println!("Enter a monthly income above zero."),
    }
    Ok(())
}

fn run_invest(args: &mut impl Iterator<Item = String>) -> Result<(), Box<dyn std::error::Error>> {
    let risk: RiskAppetite = require_value(args, "<risk>")?.parse()?;
    println!("{risk} risk options:");
    for suggestion in risk.suggestions() {
        println!("  - {suggestion}");
    }
    Ok(())
}

fn run_save(args: &mut impl Iterator<Item = String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut goal = String::new();
    let mut amount = 0.0;
    let mut months = 12;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--goal" => goal = require_value(args, "--goal")?,
            "--amount" => amount = parse_number("--amount", require_value(args, "--amount")?)?,
            "--months" => months = parse_number("--months", require_value(args, "--months")?)?,
            _ => return Err(ArgsError::UnknownArg(arg).into()),
        }
    }

    match planner::savings_plan(&goal, amount, months)? {
        Some(plan) => println!(
            "Save {:.2} per month for {} months to reach '{}'.",
            plan.monthly, plan.months, plan.goal
        ),
        None => println!("Enter a goal name and an amount above zero."),
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let before = argv.len();
    argv.retain(|arg| arg != "-v" && arg != "--verbose");
    init_logging(argv.len() != before);

    // Default behavior: run the quiz when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Quiz,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Quiz,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            ArgsError::UnknownArg(first.to_owned())
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let outcome = match cmd {
        Command::Quiz => match QuizArgs::parse(&mut iter) {
            Ok(args) => run_quiz(args).await,
            Err(err) => Err(err.into()),
        },
        Command::Chat => match parse_intents_path(&mut iter) {
            Ok(path) => run_chat(path).await,
            Err(err) => Err(err.into()),
        },
        Command::Budget => run_budget(&mut iter),
        Command::Invest => run_invest(&mut iter),
        Command::Save => run_save(&mut iter),
    };

    if matches!(&outcome, Err(err) if err.is::<ArgsError>()) {
        print_usage();
    }
    outcome
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
