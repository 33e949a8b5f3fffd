//! User-facing feedback: transient notifications and navigation.
//!
//! Pages and the HTTP session guard never print directly. They report
//! through a [`Notifier`], which the terminal front end renders as coloured
//! one-liners on stderr. Tests substitute [`RecordingNotifier`].

use std::cell::RefCell;

use colored::Colorize;

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Navigation targets a notification can force.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Alerts,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Alerts => "/alerts",
        }
    }
}

/// Sink for notifications and navigation requests.
pub trait Notifier {
    fn toast(&self, level: ToastLevel, message: &str);
    fn navigate(&self, route: Route);

    fn success(&self, message: &str) {
        self.toast(ToastLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.toast(ToastLevel::Error, message);
    }
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

/// Renders notifications to stderr.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn toast(&self, level: ToastLevel, message: &str) {
        let badge = match level {
            ToastLevel::Success => "✓".green().bold(),
            ToastLevel::Info => "i".blue().bold(),
            ToastLevel::Warning => "!".yellow().bold(),
            ToastLevel::Error => "✗".red().bold(),
        };
        eprintln!("{badge} {message}");
    }

    fn navigate(&self, route: Route) {
        match route {
            Route::Login => eprintln!(
                "  {} run `ptrack login` to sign in again",
                "→".dimmed()
            ),
            other => eprintln!("  {} {}", "→".dimmed(), other.path().dimmed()),
        }
    }
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// Collects notifications in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: RefCell<Vec<(ToastLevel, String)>>,
    routes: RefCell<Vec<Route>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<(ToastLevel, String)> {
        self.toasts.borrow().clone()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.borrow().clone()
    }

    /// Messages at the given level, in emission order.
    pub fn messages(&self, level: ToastLevel) -> Vec<String> {
        self.toasts
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn toast(&self, level: ToastLevel, message: &str) {
        self.toasts.borrow_mut().push((level, message.to_string()));
    }

    fn navigate(&self, route: Route) {
        self.routes.borrow_mut().push(route);
    }
}
