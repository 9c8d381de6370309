use ausome_core::config::model_from_env_value;
use ausome_core::constants::{DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use ausome_core::{
    ActivityRequest, ActivitySelector, ActivityType, ContextFormatter, CoreConfig, KnownActivity,
    ProfileField, ProfileOption, ProfileStore, SessionStore, SessionValue, WorksheetService,
};
use ausome_openai::{OpenAiClient, OpenAiConfig};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "ausome")]
#[command(about = "Ausome worksheet assistant CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the context summary of a child profile
    Context {
        /// Profile file (YAML or JSON)
        #[arg(long)]
        profile: PathBuf,
    },
    /// Resolve an activity selection to its activity type
    Resolve {
        /// Profile file (YAML or JSON); supplies the focus when --focus is omitted
        #[arg(long)]
        profile: Option<PathBuf>,
        #[command(flatten)]
        activity: ActivityArgs,
    },
    /// Print the prompts for an activity without calling the generation service
    Prompt {
        /// Profile file (YAML or JSON)
        #[arg(long)]
        profile: Option<PathBuf>,
        #[command(flatten)]
        activity: ActivityArgs,
        /// Which prompt to print
        #[arg(long, value_enum, default_value_t = PromptKind::Worksheet)]
        kind: PromptKind,
    },
    /// Generate activity instructions with the text model
    Text {
        /// Profile file (YAML or JSON)
        #[arg(long)]
        profile: Option<PathBuf>,
        #[command(flatten)]
        activity: ActivityArgs,
    },
    /// Generate a worksheet image and save it as PNG
    Image {
        /// Profile file (YAML or JSON)
        #[arg(long)]
        profile: Option<PathBuf>,
        #[command(flatten)]
        activity: ActivityArgs,
        /// Output file or directory (default: <activity>.png in the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List activity menus and profile field options
    Options,
}

/// Activity menu selection
#[derive(Args, Debug, Default)]
struct ActivityArgs {
    /// Focus area: Cognitive or Self-Help
    #[arg(long)]
    focus: Option<String>,
    /// Subtype under the focus area, e.g. "Shapes (Math)" or "Daily Routines"
    #[arg(long, default_value = "")]
    subtype: String,
    /// Tracing choice when the subtype is tracing (default: Line Tracing)
    #[arg(long = "tracing")]
    tracing_focus: Option<String>,
    /// Topic when the subtype is custom
    #[arg(long)]
    topic: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PromptKind {
    Worksheet,
    Image,
    Text,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("Error initialising logging: {}", e);
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() -> CliResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ausome_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Some(Commands::Context { profile }) => {
            let store = load_profile(&profile)?;
            print!("{}", ContextFormatter::format(&store.profile()));
        }
        Some(Commands::Resolve { profile, activity }) => {
            let store = load_optional_profile(profile.as_deref())?;
            let resolved = resolve_activity(&store, &activity)?;
            println!("{}", resolved);
        }
        Some(Commands::Prompt {
            profile,
            activity,
            kind,
        }) => {
            let store = load_optional_profile(profile.as_deref())?;
            let resolved = resolve_activity(&store, &activity)?;
            warn_if_incomplete(&store);
            let service = worksheet_service()?;
            let prompts = service.prompts(&store.profile(), &resolved);
            match kind {
                PromptKind::Worksheet => println!("{}", prompts.worksheet),
                PromptKind::Image => println!("{}", prompts.image),
                PromptKind::Text => println!("{}", prompts.text),
            }
        }
        Some(Commands::Text { profile, activity }) => {
            let store = load_optional_profile(profile.as_deref())?;
            let resolved = resolve_activity(&store, &activity)?;
            warn_if_incomplete(&store);
            let service = worksheet_service()?;
            let generated = service
                .generate_text_activity(&store.profile(), &resolved)
                .await?;
            println!("{}", generated.text);
        }
        Some(Commands::Image {
            profile,
            activity,
            out,
        }) => {
            let store = load_optional_profile(profile.as_deref())?;
            let resolved = resolve_activity(&store, &activity)?;
            warn_if_incomplete(&store);
            let service = worksheet_service()?;
            let image = service
                .generate_worksheet_image(&store.profile(), &resolved)
                .await?;
            let path = output_path(out, &image.file_name);
            std::fs::write(&path, &image.bytes)?;
            println!("{} ({})", image.caption, path.display());
        }
        Some(Commands::Options) => {
            print!("{}", render_options());
        }
        None => {
            println!("Use 'ausome --help' for commands");
        }
    }

    Ok(())
}

/// Reads a profile file. YAML is a superset of JSON, so both formats parse.
fn load_profile(path: &Path) -> CliResult<ProfileStore> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read profile {}: {}", path.display(), e))?;
    let values: BTreeMap<String, SessionValue> = serde_yaml::from_str(&contents)
        .map_err(|e| format!("failed to parse profile {}: {}", path.display(), e))?;

    let mut session = SessionStore::new();
    for (key, value) in values {
        if ProfileField::from_key(&key).is_none() {
            tracing::warn!("ignoring unknown profile key: {}", key);
        }
        session.set(key, value);
    }

    Ok(ProfileStore::from_session(session)?)
}

fn load_optional_profile(path: Option<&Path>) -> CliResult<ProfileStore> {
    match path {
        Some(path) => load_profile(path),
        None => Ok(ProfileStore::new()),
    }
}

fn resolve_activity(store: &ProfileStore, args: &ActivityArgs) -> CliResult<ActivityType> {
    let focus = match &args.focus {
        Some(focus) => SessionValue::text(focus.as_str()),
        None => store.get(ProfileField::ActivityFocus),
    };

    let mut request =
        ActivityRequest::from_session_focus(&focus, args.subtype.as_str(), args.topic.clone())?;
    if let Some(tracing_focus) = &args.tracing_focus {
        request = request.with_tracing_focus(tracing_focus.as_str());
    }

    Ok(ActivitySelector::resolve(&request)?)
}

fn warn_if_incomplete(store: &ProfileStore) {
    let missing = store.missing_required();
    if !missing.is_empty() {
        let keys: Vec<&str> = missing.iter().map(|field| field.key()).collect();
        eprintln!(
            "Warning: profile is incomplete (missing {}); prompts will use placeholders",
            keys.join(", ")
        );
    }
}

fn worksheet_service() -> CliResult<WorksheetService> {
    let cfg = CoreConfig::new(
        model_from_env_value(std::env::var("AUSOME_TEXT_MODEL").ok(), DEFAULT_TEXT_MODEL),
        model_from_env_value(std::env::var("AUSOME_IMAGE_MODEL").ok(), DEFAULT_IMAGE_MODEL),
    )?;
    let openai = OpenAiConfig::from_env_values(
        std::env::var("OPENAI_API_KEY").ok(),
        std::env::var("OPENAI_BASE_URL").ok(),
        std::env::var("AUSOME_HTTP_TIMEOUT_SECS").ok(),
    )?;
    let client = OpenAiClient::new(openai)?;

    Ok(WorksheetService::new(Arc::new(cfg), Arc::new(client)))
}

/// A directory gets the generated file name; any other path is used as given.
fn output_path(out: Option<PathBuf>, file_name: &str) -> PathBuf {
    let file_name = file_name.replace(['/', '\\'], "_");
    match out {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path,
        None => PathBuf::from(file_name),
    }
}

fn render_options() -> String {
    let mut out = String::new();
    for (focus, subtypes) in ActivitySelector::menu() {
        out.push_str(&format!("{}:\n", focus.label()));
        for subtype in subtypes {
            out.push_str(&format!("  - {}\n", subtype));
        }
    }
    out.push_str("Tracing:\n");
    for label in ActivitySelector::tracing_labels() {
        out.push_str(&format!("  - {}\n", label));
    }
    out.push_str("Worksheet templates:\n");
    for known in KnownActivity::ALL {
        out.push_str(&format!("  - {}\n", known.label()));
    }
    for field in ProfileField::ALL {
        if !field.options().is_empty() {
            out.push_str(&format!("{}: {}\n", field.key(), field.options().join(", ")));
        }
    }
    out
}
