mod api;
mod campaigns;
mod cli_messages;
mod commands;
mod config;
mod consts;
mod environment;
mod events;
mod logging;
mod models;
mod ui;

use crate::commands::CommandContext;
use crate::commands::campaigns::CreateOptions;
use crate::commands::settings::SettingsUpdate;
use crate::config::{Config, ENVIRONMENT_ENV, get_config_path};
use crate::environment::Environment;
use crate::models::{CampaignQuery, CampaignStatus, Channel, ContactCategory};
use crate::ui::dashboard::DashboardState;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::path::Path;
use std::{error::Error, io};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Terminal console for the outreach dashboard
struct Args {
    /// Backend API base URL. Overrides the config file and the environment.
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the live campaign dashboard
    Dashboard {
        /// Paint the dashboard background instead of using the terminal's.
        #[arg(long, default_value_t = false)]
        with_background: bool,
    },
    /// List, create, start and delete campaigns
    #[command(subcommand)]
    Campaigns(CampaignsCommand),
    /// Browse and import message templates
    #[command(subcommand)]
    Templates(TemplatesCommand),
    /// Show KPIs, contact statistics and rate limits
    Overview,
    /// List contacts
    Contacts {
        /// Contact type to show, `club` or `all`.
        #[arg(long = "type", value_name = "TYPE")]
        contact_type: Option<String>,

        /// Only show contacts whose name, email or institution contains this.
        #[arg(long)]
        search: Option<String>,
    },
    /// Discover contacts for a college
    Discover {
        /// College to search. All colleges when omitted.
        #[arg(long, value_name = "NAME")]
        college: Option<String>,

        /// Maximum number of contacts to collect.
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Send a test email
    TestEmail {
        #[arg(long, value_name = "ADDRESS")]
        to: String,
    },
    /// Send a test LinkedIn message
    TestLinkedin {
        #[arg(long, value_name = "URL")]
        profile_url: String,

        #[arg(long)]
        message: Option<String>,
    },
    /// Process the queued LinkedIn messages now
    LinkedinQueue,
    /// Show the Calendly scheduling link, event types and bookings
    Calendly,
    /// Show or change local settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum CampaignsCommand {
    /// List campaigns
    List {
        #[arg(long)]
        status: Option<CampaignStatus>,

        #[arg(long)]
        channel: Option<Channel>,
    },
    /// Create a draft campaign
    Create {
        #[arg(long)]
        name: String,

        /// Audience: club, professor, transfer_center, international, president or
        /// student_govt.
        #[arg(long)]
        category: ContactCategory,

        #[arg(long, default_value_t = Channel::Email)]
        channel: Channel,

        /// Template to use instead of the category's default.
        #[arg(long, value_name = "TEMPLATE_ID")]
        template: Option<u64>,

        /// Do not attach the PDF to emails.
        #[arg(long)]
        no_attachment: bool,

        /// Show the rendered message before creating.
        #[arg(long)]
        preview: bool,
    },
    /// Render a template for a category
    Preview {
        #[arg(long, value_name = "TEMPLATE_ID")]
        template: u64,

        #[arg(long)]
        category: ContactCategory,
    },
    /// Start a draft campaign
    Start {
        id: u64,

        /// Keep printing progress until the campaign finishes.
        #[arg(long)]
        follow: bool,
    },
    /// Delete a campaign
    Delete { id: u64 },
    /// Follow the progress of running campaigns
    Watch {
        /// Campaigns to follow. Every active campaign when omitted.
        ids: Vec<u64>,
    },
}

#[derive(Subcommand)]
enum TemplatesCommand {
    /// List templates
    List {
        #[arg(long)]
        channel: Option<Channel>,

        #[arg(long)]
        category: Option<ContactCategory>,
    },
    /// Import the bundled templates into the backend
    Import,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Change one or more settings
    Set {
        #[arg(long)]
        sender_name: Option<String>,

        #[arg(long)]
        sender_email: Option<String>,

        #[arg(long)]
        daily_email_limit: Option<u32>,

        #[arg(long)]
        daily_linkedin_limit: Option<u32>,

        #[arg(long, value_name = "true|false")]
        auto_follow_up: Option<bool>,

        /// Saved API URL. An empty value removes it.
        #[arg(long = "backend-url", value_name = "URL")]
        backend_url: Option<String>,

        /// Seconds between progress checks.
        #[arg(long, value_name = "SECONDS")]
        poll_interval: Option<u64>,

        #[arg(long, value_name = "PATH")]
        attachment_path: Option<String>,
    },
    /// Delete the config file
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let environment_str = std::env::var(ENVIRONMENT_ENV).unwrap_or_default();
    let environment = environment_str
        .parse::<Environment>()
        .unwrap_or(Environment::default());

    let config_path = get_config_path()?;
    let args = Args::parse();

    // The dashboard owns the terminal; log lines would tear the screen.
    if !matches!(args.command, Command::Dashboard { .. }) {
        logging::init_cli_logger();
    }

    let api_url = args.api_url;
    match args.command {
        Command::Dashboard { with_background } => {
            let ctx = connect(&config_path, environment, api_url)?;
            start(ctx, environment, with_background).await
        }
        Command::Campaigns(command) => {
            let ctx = connect(&config_path, environment, api_url)?;
            match command {
                CampaignsCommand::List { status, channel } => {
                    let query = CampaignQuery {
                        status,
                        campaign_type: channel,
                    };
                    commands::campaigns::list(&ctx, query).await
                }
                CampaignsCommand::Create {
                    name,
                    category,
                    channel,
                    template,
                    no_attachment,
                    preview,
                } => {
                    let options = CreateOptions {
                        name,
                        channel,
                        category,
                        template_id: template,
                        attach_pdf: !no_attachment,
                        preview,
                    };
                    commands::campaigns::create(&ctx, options).await
                }
                CampaignsCommand::Preview { template, category } => {
                    commands::campaigns::preview(&ctx, template, category).await
                }
                CampaignsCommand::Start { id, follow } => {
                    commands::campaigns::start(&ctx, id, follow).await
                }
                CampaignsCommand::Delete { id } => commands::campaigns::delete(&ctx, id).await,
                CampaignsCommand::Watch { ids } => commands::campaigns::watch(&ctx, ids).await,
            }
        }
        Command::Templates(command) => {
            let ctx = connect(&config_path, environment, api_url)?;
            match command {
                TemplatesCommand::List { channel, category } => {
                    commands::templates::list(&ctx, channel, category).await
                }
                TemplatesCommand::Import => commands::templates::import(&ctx).await,
            }
        }
        Command::Overview => {
            let ctx = connect(&config_path, environment, api_url)?;
            commands::admin::overview(&ctx).await
        }
        Command::Contacts {
            contact_type,
            search,
        } => {
            let ctx = connect(&config_path, environment, api_url)?;
            commands::admin::contacts(&ctx, contact_type, search).await
        }
        Command::Discover { college, limit } => {
            let ctx = connect(&config_path, environment, api_url)?;
            commands::admin::discover(&ctx, college, limit).await
        }
        Command::TestEmail { to } => {
            let ctx = connect(&config_path, environment, api_url)?;
            commands::admin::test_email(&ctx, &to).await
        }
        Command::TestLinkedin {
            profile_url,
            message,
        } => {
            let ctx = connect(&config_path, environment, api_url)?;
            commands::admin::test_linkedin(&ctx, &profile_url, message).await
        }
        Command::LinkedinQueue => {
            let ctx = connect(&config_path, environment, api_url)?;
            commands::admin::trigger_linkedin_queue(&ctx).await
        }
        Command::Calendly => {
            let ctx = connect(&config_path, environment, api_url)?;
            commands::calendly::show(&ctx).await
        }
        Command::Settings(command) => match command {
            SettingsCommand::Show => commands::settings::show(&config_path),
            SettingsCommand::Set {
                sender_name,
                sender_email,
                daily_email_limit,
                daily_linkedin_limit,
                auto_follow_up,
                backend_url,
                poll_interval,
                attachment_path,
            } => {
                let update = SettingsUpdate {
                    sender_name,
                    sender_email,
                    daily_email_limit,
                    daily_linkedin_limit,
                    auto_follow_up,
                    api_url: backend_url,
                    poll_interval_secs: poll_interval,
                    attachment_path,
                };
                commands::settings::set(&config_path, update)
            }
            SettingsCommand::Reset => commands::settings::reset(&config_path),
        },
    }
}

/// Loads the config file, if any, and builds the backend client.
fn connect(
    config_path: &Path,
    environment: Environment,
    api_url: Option<String>,
) -> Result<CommandContext, Box<dyn Error>> {
    let config = Config::load_or_default(config_path)
        .map_err(|e| format!("Failed to load config: {}", e))?;
    CommandContext::connect(config, environment, api_url)
}

/// Starts the campaign dashboard.
///
/// # Arguments
/// * `ctx` - Backend client and settings.
/// * `env` - The environment the API URL was resolved for.
/// * `with_background` - Whether to paint the background.
async fn start(
    ctx: CommandContext,
    env: Environment,
    with_background: bool,
) -> Result<(), Box<dyn Error>> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Initialize the terminal with Crossterm backend.
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create the application and run it.
    let state = DashboardState::new(env, ctx.api_url.clone(), with_background);
    let app = ui::App::new(ctx.view_model(), state);
    let res = ui::run(&mut terminal, app).await;

    // Clean up the terminal after running the application.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}
