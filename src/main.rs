use std::process::ExitCode;
use std::rc::Rc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use progress_tracker::cli::{self, AlertListArgs, Context, GenerateArgs, OutputFormat, Reported, SignupArgs};
use progress_tracker::config;
use progress_tracker::http::ApiError;
use progress_tracker::http::error::GENERIC_FAILURE;
use progress_tracker::store::AuthStore;
use progress_tracker::ui::{Notifier, TerminalNotifier};

#[derive(Debug, Parser)]
#[command(name = "ptrack")]
#[command(about = "Follow your child's academic progress from the terminal")]
#[command(version)]
struct App {
    /// Output format: table (default), json, csv
    #[arg(long, global = true, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        email: String,
        /// Password (prompted or read from PTRACK_PASSWORD when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Create a parent account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        student_name: String,
        #[arg(long)]
        student_id: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in parent
    Whoami {
        /// Refresh the token and reload the profile first
        #[arg(long)]
        refresh: bool,
    },
    /// Student overview and alert counts
    Dashboard,
    /// Grades, GPA and assignments
    Academic,
    /// Attendance rate and records
    Attendance {
        /// Show a calendar of the current month
        #[arg(long)]
        calendar: bool,
    },
    /// Study sessions and weekly activity
    Engagement,
    /// List alerts and mark them as read
    Alerts {
        #[command(subcommand)]
        action: AlertsAction,
    },
    /// Generate alerts for a student from their metrics
    Generate {
        #[arg(long)]
        name: String,
        #[arg(long)]
        roll_number: String,
        /// Attendance percentage (0-100)
        #[arg(long)]
        attendance: f64,
        /// GPA (0-4.0) or marks (0-100)
        #[arg(long)]
        academic: f64,
        #[arg(long)]
        behavior_notes: Option<String>,
        /// Participation level: low, medium, high
        #[arg(long, default_value = "medium")]
        participation: String,
        #[arg(long)]
        comments: Option<String>,
        /// Save the generated alerts for the signed-in student
        #[arg(long)]
        save: bool,
    },
    /// AI insights about the student
    Insights {
        #[command(subcommand)]
        action: InsightsAction,
    },
    /// Check backend reachability, session and config
    Health,
    /// Show recent API requests
    Activity {
        /// Number of entries to show
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum AlertsAction {
    /// List alerts, newest first within each priority
    List {
        /// Only unread alerts
        #[arg(long)]
        unread: bool,
        /// academic, attendance, engagement, general, or all
        #[arg(long)]
        category: Option<String>,
        /// high, medium, low, or all
        #[arg(long)]
        priority: Option<String>,
        /// Case-insensitive text search over title and message
        #[arg(long)]
        search: Option<String>,
        /// Show message, suggestions and action flags
        #[arg(long)]
        details: bool,
    },
    /// Mark one alert as read
    Read { id: String },
    /// Mark every unread alert as read
    ReadAll,
}

#[derive(Debug, Subcommand)]
enum InsightsAction {
    /// List stored insights
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Ask a question about the student
    Ask { query: String },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value, e.g. `api.base_url http://host:8000/api`
    Set { key: String, value: String },
    /// Reset the config file to defaults
    Reset,
}

fn main() -> ExitCode {
    let app = App::parse();
    let config = config::load();
    if !config.display.color {
        colored::control::set_override(false);
    }

    let notifier: Rc<dyn Notifier> = Rc::new(TerminalNotifier);
    let mut ctx = Context::new(config, AuthStore::load(), Rc::clone(&notifier));

    match dispatch(&mut ctx, app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(notifier.as_ref(), &err);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(ctx: &mut Context, app: App) -> Result<()> {
    let fmt = OutputFormat::from_str_opt(Some(&app.format));

    match app.command {
        Commands::Login { email, password } => cli::run_login(ctx, &email, password),
        Commands::Signup {
            email,
            name,
            student_name,
            student_id,
            phone,
        } => cli::run_signup(
            ctx,
            SignupArgs {
                email,
                name,
                student_name,
                student_id,
                phone,
            },
        ),
        Commands::Logout => cli::run_logout(ctx),
        Commands::Whoami { refresh } => cli::run_whoami(ctx, refresh),
        Commands::Dashboard => cli::run_dashboard(ctx, fmt),
        Commands::Academic => cli::run_academic(ctx, fmt),
        Commands::Attendance { calendar } => cli::run_attendance(ctx, calendar, fmt),
        Commands::Engagement => cli::run_engagement(ctx, fmt),
        Commands::Alerts { action } => match action {
            AlertsAction::List {
                unread,
                category,
                priority,
                search,
                details,
            } => {
                let args = AlertListArgs {
                    unread,
                    category,
                    priority,
                    search,
                    details,
                };
                cli::run_alerts_list(ctx, &args, fmt)
            }
            AlertsAction::Read { id } => cli::run_alerts_read(ctx, &id),
            AlertsAction::ReadAll => cli::run_alerts_read_all(ctx),
        },
        Commands::Generate {
            name,
            roll_number,
            attendance,
            academic,
            behavior_notes,
            participation,
            comments,
            save,
        } => {
            let args = GenerateArgs {
                name,
                roll_number,
                attendance,
                academic,
                behavior_notes,
                participation,
                comments,
                save,
            };
            cli::run_generate(ctx, &args, fmt)
        }
        Commands::Insights { action } => match action {
            InsightsAction::List { limit } => cli::run_insights_list(ctx, limit, fmt),
            InsightsAction::Ask { query } => cli::run_insights_ask(ctx, &query, fmt),
        },
        Commands::Health => cli::run_health(ctx),
        Commands::Activity { limit } => cli::run_activity(ctx, limit, fmt),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}

/// Print a failed command's error unless the user has already seen it.
fn report(notifier: &dyn Notifier, err: &anyhow::Error) {
    if err.is::<Reported>() {
        return;
    }
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::SessionExpired) => {}
        Some(api_err) => notifier.error(&api_err.user_message(GENERIC_FAILURE)),
        None => notifier.error(&format!("{err:#}")),
    }
}
