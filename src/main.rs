use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};

use tripwise::auth::{Attempt, CredentialResolver, Role, SecretStore};
use tripwise::backend::gemini::GeminiConnector;
use tripwise::banner::{BannerInfo, print_banner};
use tripwise::commands::CommandRegistry;
use tripwise::config::Settings;
use tripwise::consts::{
    API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_DAYS, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
    default_secrets_path,
};
use tripwise::form::terminal::TerminalPrompter;
use tripwise::form::{TripForm, parse_date};
use tripwise::itinerary::{ItineraryCache, Requester};
use tripwise::session::{Session, SessionContext};
use tripwise::{logging, oneshot, repl};

#[derive(Parser)]
#[command(name = "tripwise", version, about = "Tell it where, it tells you how.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Gemini model name
    #[arg(short, long, env = "TRIPWISE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Generative Language API base URL
    #[arg(long, env = "TRIPWISE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// SQLite secret store path (use :memory: for ephemeral)
    #[arg(short, long, env = "TRIPWISE_SECRETS")]
    secrets: Option<PathBuf>,

    /// Backend request timeout in seconds
    #[arg(short, long, env = "TRIPWISE_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Always ask the backend, even for a trip already planned this session
    #[arg(long, default_value_t = false)]
    no_cache: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides
    #[arg(long, env = "TRIPWISE_LOG", default_value = "info")]
    log_level: String,

    /// Also append JSON logs to <DIR>/tripwise.log
    #[arg(long, env = "TRIPWISE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Sign in as this role right away
    #[arg(short, long, value_enum)]
    role: Option<Role>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one itinerary and exit (non-interactive)
    #[command(group(ArgGroup::new("sign_in").args(["owner", "guest_key"]).required(true)))]
    Plan {
        /// Number of traveling days (1-99)
        #[arg(short, long, default_value_t = DEFAULT_DAYS)]
        days: u32,

        /// Where you are going
        #[arg(long, default_value = "")]
        destination: String,

        /// Departure date, YYYY-MM-DD (default: today)
        #[arg(long, default_value = "")]
        departure: String,

        /// Where you go afterwards, if you know
        #[arg(short, long, default_value = "")]
        next: String,

        /// Sign in as owner (password is prompted)
        #[arg(long)]
        owner: bool,

        /// Use your own Gemini API key
        #[arg(long)]
        guest_key: Option<String>,
    },
    /// Manage the local secret store
    Secrets {
        #[command(subcommand)]
        action: SecretsAction,
    },
}

#[derive(Subcommand)]
enum SecretsAction {
    /// Set a secret (value is prompted, not echoed)
    Set { name: String },
    /// Remove a secret
    Remove { name: String },
    /// List which secrets are set
    List,
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings {
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            secrets_path: self.secrets.clone().unwrap_or_else(default_secrets_path),
            timeout: Duration::from_secs(self.timeout),
            cache: !self.no_cache,
            log_level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local overrides first, so clap's env fallbacks see them too.
    let dotenv = dotenvy::dotenv();
    let mut cli = Cli::parse();

    let settings = cli.settings();
    settings.validate()?;
    let _log_guard = logging::init(&settings.log_level, settings.log_dir.as_deref())?;

    match dotenv {
        Ok(path) => tracing::info!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring .env: {e}"),
    }
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %settings.model,
        cache = settings.cache,
        "tripwise starting"
    );

    let store = Arc::new(
        SecretStore::open(settings.secrets_path_str()?).context("failed to open secret store")?,
    );

    let mut session = build_session(&settings, Arc::clone(&store));

    match cli.command.take() {
        Some(Command::Secrets { action }) => handle_secrets(&store, &session, action),
        Some(Command::Plan {
            days,
            destination,
            departure,
            next,
            owner,
            guest_key,
        }) => {
            let attempt = if owner {
                Attempt::Owner {
                    password: session.prompter.read_secret("Password: ")?,
                }
            } else {
                Attempt::Guest {
                    api_key: guest_key.unwrap_or_default(),
                }
            };
            let today = chrono::Local::now().date_naive();
            let form = TripForm {
                days,
                destination,
                departure: parse_date(&departure, today)?,
                next_destination: next,
            };
            let text = oneshot::plan(&mut session, attempt, &form).await?;
            println!("{text}");
            Ok(())
        }
        None => {
            let registry = CommandRegistry::new();

            print_banner(&BannerInfo {
                model: &settings.model,
                role: &cli.role.map(|r| r.to_string()).unwrap_or_else(|| "—".to_string()),
                auth_status: &session.context.auth_status(),
                cache: settings.cache,
            });

            if let Some(role) = cli.role {
                let trigger = match role {
                    Role::Owner => "/owner",
                    Role::Guest => "/guest",
                };
                repl::run_turn(&registry, &mut session, trigger).await;
            }

            repl::run(&registry, &mut session).await;
            Ok(())
        }
    }
}

fn build_session(settings: &Settings, store: Arc<SecretStore>) -> Session {
    let mut requester = Requester::new(settings.timeout);
    if settings.cache {
        requester = requester.with_cache(Arc::new(ItineraryCache::new()));
    }
    Session {
        context: SessionContext::default(),
        resolver: CredentialResolver::from_env(store, API_KEY_ENV),
        requester,
        connector: Arc::new(GeminiConnector {
            model: settings.model.clone(),
            base_url: settings.base_url.clone(),
            timeout: settings.timeout,
        }),
        prompter: Box::new(TerminalPrompter),
        model: settings.model.clone(),
    }
}

fn handle_secrets(store: &SecretStore, session: &Session, action: SecretsAction) -> anyhow::Result<()> {
    match action {
        SecretsAction::Set { name } => {
            oneshot::set_secret(store, session.prompter.as_ref(), &name)?;
            println!("✓ {name} saved");
        }
        SecretsAction::Remove { name } => {
            oneshot::remove_secret(store, &name)?;
            println!("✓ {name} removed");
        }
        SecretsAction::List => {
            let names = store.names()?;
            if names.is_empty() {
                println!("no secrets set");
            }
            for name in names {
                println!("  {name}");
            }
        }
    }
    Ok(())
}
