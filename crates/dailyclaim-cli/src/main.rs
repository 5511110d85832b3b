mod commands;
mod output;

use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};
use commands::tline::TLineParams;
use dailyclaim_core::config::{DEFAULT_PROXY_HOST, DEFAULT_PROXY_PORT};
use dailyclaim_notify::{NotifyHub, NotifySettings};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "dailyclaim",
    version,
    about = "Daily check-in bots that report their results to PushPlus or DingTalk"
)]
struct Cli {
    #[command(flatten)]
    notify: NotifyArgs,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct NotifyArgs {
    /// PushPlus token
    #[arg(long, env = "PUSH_PLUS_TOKEN", default_value = "", global = true, hide_env_values = true)]
    pushplus_token: String,

    /// DingTalk robot access token
    #[arg(long, env = "DD_BOT_TOKEN", default_value = "", global = true, hide_env_values = true)]
    dd_bot_token: String,

    /// DingTalk robot signing secret
    #[arg(long, env = "DD_BOT_SECRET", default_value = "", global = true, hide_env_values = true)]
    dd_bot_secret: String,

    /// Print results only; do not push notifications
    #[arg(long, global = true)]
    no_notify: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// RainYun: claim the daily sign-in points task
    Rainyun {
        /// API key(s), separated by '&' or newlines
        #[arg(long, env = "RAINYUN_API_KEY", default_value = "", hide_env_values = true)]
        api_key: String,

        /// Optional rain-dev-token header
        #[arg(long, env = "RAINYUN_DEV_TOKEN", hide_env_values = true)]
        dev_token: Option<String>,
    },

    /// iKuuu: log in, check in and report traffic
    Ikuuu {
        /// Account emails, one per line
        #[arg(long, env = "IKUUU_EMAIL", default_value = "")]
        email: String,

        /// Passwords, one per line, in the same order as the emails
        #[arg(long, env = "IKUUU_PWD", default_value = "", hide_env_values = true)]
        password: String,
    },

    /// iPzan: claim the daily wallet reward
    Ipzan {
        /// Login account strings, separated by '@'
        #[arg(long, env = "pz_account", default_value = "", hide_env_values = true)]
        accounts: String,
    },

    /// LeafLow: check in with captured browser cookies/headers
    Leaflow {
        /// Tokens separated by '&' (cookie string, cookie|Header: value, or JSON)
        #[arg(long, env = "LEAFLOW_TOKENS", default_value = "", hide_env_values = true)]
        tokens: String,
    },

    /// TLine: register a fresh account and report its subscription links
    Tline {
        /// Service base URL
        #[arg(long, env = "TLINE_BASE_URL")]
        base_url: String,

        /// Registration signing key
        #[arg(long, env = "TLINE_KEY", default_value = dailyclaim_sites::tline::DEFAULT_KEY, hide_env_values = true)]
        key: String,

        /// Domain used for the generated email address
        #[arg(long, env = "TLINE_EMAIL_DOMAIN", default_value = dailyclaim_sites::tline::DEFAULT_EMAIL_DOMAIN)]
        email_domain: String,

        /// HTTP proxy host
        #[arg(long, env = "PROXY_HOST", default_value = DEFAULT_PROXY_HOST)]
        proxy_host: String,

        /// HTTP proxy port
        #[arg(long, env = "PROXY_PORT", default_value_t = DEFAULT_PROXY_PORT)]
        proxy_port: u16,

        /// Connect directly instead of through the proxy
        #[arg(long, env = "TLINE_NO_PROXY", value_parser = FalseyValueParser::new())]
        no_proxy: bool,
    },

    /// Send a test message through the configured channels
    Notify {
        #[arg(long, default_value = "dailyclaim")]
        title: String,

        #[arg(long, default_value = "Notification channels are working.")]
        content: String,
    },
}

impl NotifyArgs {
    fn hub(&self) -> anyhow::Result<NotifyHub> {
        if self.no_notify {
            return Ok(NotifyHub::disabled());
        }
        Ok(NotifyHub::from_settings(&NotifySettings {
            pushplus_token: self.pushplus_token.clone(),
            dd_bot_token: self.dd_bot_token.clone(),
            dd_bot_secret: self.dd_bot_secret.clone(),
        })?)
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let hub = cli.notify.hub()?;

    match cli.command {
        Commands::Rainyun { api_key, dev_token } => {
            commands::rainyun::run(&hub, &api_key, dev_token.as_deref()).await
        }
        Commands::Ikuuu { email, password } => commands::ikuuu::run(&hub, &email, &password).await,
        Commands::Ipzan { accounts } => commands::ipzan::run(&hub, &accounts).await,
        Commands::Leaflow { tokens } => commands::leaflow::run(&hub, &tokens).await,
        Commands::Tline {
            base_url,
            key,
            email_domain,
            proxy_host,
            proxy_port,
            no_proxy,
        } => {
            let params = TLineParams {
                base_url,
                key,
                email_domain,
                proxy_host,
                proxy_port,
                no_proxy,
            };
            commands::tline::run(&hub, params).await
        }
        Commands::Notify { title, content } => commands::notify::run(&hub, &title, &content).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dailyclaim_core::config::load_dotenv();
    let cli = Cli::parse();
    dailyclaim_core::logging::init(cli.verbose);
    if let Some(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            output::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
