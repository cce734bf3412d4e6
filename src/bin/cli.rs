//! Botboard CLI
//!
//! Terminal client for the bot analytics API:
//! - Print the dashboard for a period
//! - Chat with the assistant (normal or admin mode)
//! - Show chat history for the current session
//! - Inspect or reset the session identifier

use botboard::chat::{ChatWidget, Message, SendOutcome, Sender};
use botboard::client::{ChatClient, ChatMode, Period, Role, StatsClient};
use botboard::config::{generate_default_config, Config, ExecutionContext};
use botboard::dashboard::DashboardPage;
use botboard::session::{FileStore, SessionIdentity};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "botboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal client for the bot statistics dashboard and AI assistant")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API URL, overrides the configured public address
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Show info-level logs
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show dashboard statistics
    Stats {
        /// Period (7d, 30d, 3m)
        #[arg(short, long, default_value = "7d")]
        period: Period,
        /// Print the raw API response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Chat with the assistant
    Chat {
        /// Initial mode (normal, admin)
        #[arg(short, long, default_value = "normal")]
        mode: ChatMode,
    },

    /// Show chat history of the current session
    History {
        /// Maximum number of messages
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Manage the chat session identifier
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Print the current session ID (creating one if needed)
    Show,
    /// Discard the current session ID and create a new one
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_default(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.public_url = url;
    }
    if !cli.verbose {
        config.logging.level = "warn".to_string();
    }
    config.logging.init_tracing();

    match cli.command {
        Commands::Stats { period, json } => {
            let stats = StatsClient::from_config(&config.api, ExecutionContext::Client)?;

            if json {
                let response = stats.get_stats(period).await?;
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }

            let page = DashboardPage::load(&stats, period).await;
            print!("{}", page.render_text());
            if page.is_error() {
                std::process::exit(1);
            }
        }

        Commands::Chat { mode } => {
            let identity = session_identity(&config);
            let client = ChatClient::from_config(&config.api, ExecutionContext::Client)?;
            let session_id = identity.get_session_id()?;
            run_chat(ChatWidget::new(client, session_id, mode), &identity).await?;
        }

        Commands::History { limit } => {
            let identity = session_identity(&config);
            let client = ChatClient::from_config(&config.api, ExecutionContext::Client)?;
            let session_id = identity.get_session_id()?;

            let messages = client.history(&session_id, limit).await?;
            if messages.is_empty() {
                println!("No messages in session {}", session_id);
            }
            for message in messages {
                let role = match message.role {
                    Role::User => "USER",
                    Role::Assistant => "ASSISTANT",
                };
                println!("[{}] {} {}", message.timestamp, role, message.content);
            }
        }

        Commands::Session { action } => {
            let identity = session_identity(&config);
            let session_id = match action {
                SessionAction::Show => identity.get_session_id()?,
                SessionAction::Reset => identity.reset_session()?,
            };
            println!("{}", session_id);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn session_identity(config: &Config) -> SessionIdentity {
    let store = FileStore::new(config.session.resolved_store_path());
    SessionIdentity::client(Arc::new(store))
}

/// Interactive chat loop. Lines starting with `/` are commands.
async fn run_chat(
    mut widget: ChatWidget<ChatClient>,
    identity: &SessionIdentity,
) -> anyhow::Result<()> {
    println!("Session {} | mode: {}", widget.session_id(), widget.mode());
    println!("Commands: /mode, /reset, /quit");
    println!();
    print_messages(&widget, 0);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/mode" => {
                widget.toggle_mode();
                println!("Mode: {}", widget.mode());
                print_messages(&widget, 0);
            }
            "/reset" => {
                let session_id = identity.reset_session()?;
                widget.set_session_id(session_id);
                widget.reset_transcript();
                println!("New session {}", widget.session_id());
                print_messages(&widget, 0);
            }
            _ => {
                widget.set_input(line);
                if !widget.can_submit() {
                    continue;
                }

                let seen = widget.transcript().len();
                println!("...");
                match widget.send().await {
                    SendOutcome::Failed => {
                        if let Some(banner) = widget.error() {
                            eprintln!("! {}", banner);
                        }
                    }
                    SendOutcome::Rejected | SendOutcome::Delivered | SendOutcome::Discarded => {}
                }
                // The user's own line is already on screen
                print_messages(&widget, seen + 1);
            }
        }
    }

    Ok(())
}

fn print_messages(widget: &ChatWidget<ChatClient>, from: usize) {
    for message in widget.transcript().iter().skip(from) {
        print_message(widget, message);
    }
}

fn print_message(widget: &ChatWidget<ChatClient>, message: &Message) {
    let prefix = match message.sender {
        Sender::Ai => "AI",
        Sender::User => "You",
    };
    println!("{}: {}", prefix, message.text);

    if let Some(sql) = widget.diagnostic_query(message) {
        println!("    SQL: {}", sql);
    }
}
