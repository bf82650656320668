use std::{path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use topicdeck::{logging, AppConfig, DisplayLanguage, JsonFileStore, TopicError, TopicSession};
use tracing::error;

#[derive(Parser)]
#[command(
    name = "topicdeck",
    version,
    about = "Draw random conversation topics for language-exchange practice"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Topic dataset (JSON). Defaults to the bundled sample.
    #[arg(long, value_name = "PATH", env = "TOPICDECK_DATASET", global = true)]
    dataset: Option<PathBuf>,

    /// Preference file. Defaults to the user data directory.
    #[arg(long, value_name = "PATH", env = "TOPICDECK_STORE", global = true)]
    store: Option<PathBuf>,

    /// Seed for reproducible draws.
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// List levels and their categories.
    Levels,
    /// Show the saved preferences.
    Status,
    /// Choose the active level.
    Level { name: String },
    /// Enable or disable one category of the active level.
    Toggle { category: String },
    /// Enable or disable every category of the active level.
    All { state: Switch },
    /// Choose which language is shown first.
    Language { language: LanguageArg },
    /// Draw a random topic.
    Draw {
        /// Also show the translation.
        #[arg(long)]
        reveal: bool,
    },
    /// Forget all saved preferences.
    Reset,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    English,
    Korean,
}

impl From<LanguageArg> for DisplayLanguage {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::English => DisplayLanguage::LanguageA,
            LanguageArg::Korean => DisplayLanguage::LanguageB,
        }
    }
}

impl Cli {
    fn config(&self) -> AppConfig {
        AppConfig {
            dataset: self.dataset.clone(),
            store: self.store.clone().unwrap_or_else(|| AppConfig::default().store),
            seed: self.seed,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("{}", e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(TopicError::EmptySelection(reason)) => {
            println!("No eligible topic: {}.", reason);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), TopicError> {
    let config = cli.config();
    let dataset = config.load_dataset()?;
    let mut session = TopicSession::open(dataset, config.open_store(), config.seed);

    match &cli.command {
        Command::Levels => print_levels(&session),
        Command::Status => print_status(&session),
        Command::Level { name } => {
            session.set_active_level(name)?;
            print_status(&session);
        }
        Command::Toggle { category } => {
            session.toggle_category(category)?;
            print_status(&session);
        }
        Command::All { state } => {
            session.set_all_categories(matches!(state, Switch::On));
            print_status(&session);
        }
        Command::Language { language } => {
            session.set_display_language((*language).into());
            println!("Display language: {}", session.display_language().label());
        }
        Command::Draw { reveal } => {
            session.try_new_topic()?;
            if *reveal {
                session.toggle_translation();
            }
            print_topic(&session);
        }
        Command::Reset => {
            session.reset_preferences();
            println!("Preferences reset.");
        }
    }
    Ok(())
}

fn print_levels(session: &TopicSession<JsonFileStore>) {
    for level in session.dataset().levels() {
        println!("{}", level.name);
        for category in &level.categories {
            println!("  {} ({} questions)", category.name, category.questions.len());
        }
    }
}

fn print_status(session: &TopicSession<JsonFileStore>) {
    let prefs = session.preferences();
    println!("Level: {}", prefs.active_level().unwrap_or("(none)"));
    println!("Language: {}", prefs.display_language().label());
    if let Some(level) = prefs.active_level().and_then(|name| session.dataset().level(name)) {
        for name in level.category_names() {
            let mark = if prefs.is_category_enabled(name) { "x" } else { " " };
            println!("  [{}] {}", mark, name);
        }
    }
    if !session.can_draw() {
        println!("No topics can be drawn with these settings.");
    }
}

fn print_topic(session: &TopicSession<JsonFileStore>) {
    let Some(view) = session.view() else {
        return;
    };

    println!("[{}]", view.category);
    println!("{}", view.primary);
    if let Some(translation) = view.translation {
        println!("  {}", translation);
    }
    if !view.vocabulary.is_empty() {
        println!();
        println!("Vocabulary:");
        for (primary, secondary) in view.vocabulary {
            println!("  {} - {}", primary, secondary);
        }
    }
}
