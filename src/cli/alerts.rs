//! The alerts page: filtered list, mark one read, mark all read.

use anyhow::Result;
use colored::Colorize;

use crate::alerts::{self, AlertFilter, ReadOutcome};
use crate::data::StudentDataSource;
use crate::http::ApiError;
use crate::models::{Alert, AlertType, Priority};
use crate::store::{Resource, StudentAction, StudentStore};

use super::{Context, OutputFormat, Reported, truncate};

/// Flags of `ptrack alerts list`.
#[derive(Debug, Clone, Default)]
pub struct AlertListArgs {
    pub unread: bool,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
    pub details: bool,
}

/// Fetch the parent's alerts into a fresh store.
fn load_alerts(source: &mut dyn StudentDataSource, parent_id: &str) -> Result<StudentStore, ApiError> {
    let mut store = StudentStore::new();
    let ticket = store.begin(Resource::Alerts);
    let alerts = source.alerts(parent_id)?;
    store.apply(ticket, StudentAction::SetAlerts(alerts));
    Ok(store)
}

pub fn run_alerts_list(ctx: &mut Context, args: &AlertListArgs, format: OutputFormat) -> Result<()> {
    let filter = AlertFilter::from_selection(
        !args.unread,
        args.category.as_deref(),
        args.priority.as_deref(),
        args.search.as_deref(),
    )?;
    let (parent_id, _) = ctx.identity()?;
    let max_rows = ctx.max_rows();
    let store = ctx.with_source(|s| load_alerts(s, &parent_id))?;

    let view = alerts::apply(store.alerts(), &filter);
    let shown: Vec<&Alert> = view.iter().take(max_rows).copied().collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
        OutputFormat::Csv => {
            println!("id,priority,category,type,read,date,title");
            for a in &shown {
                println!(
                    "{},{},{},{},{},{},\"{}\"",
                    a.id,
                    a.priority,
                    a.category,
                    a.kind,
                    a.read,
                    a.date.to_rfc3339(),
                    a.title.replace('"', "\"\"")
                );
            }
        }
        OutputFormat::Table => {
            print_alert_table(&shown, args.details);
            let unread = store.state().unread_count();
            println!();
            println!(
                "  {}",
                format!(
                    "{} of {} alerts · {} unread{}",
                    view.len(),
                    store.alerts().len(),
                    unread,
                    if view.len() > shown.len() {
                        format!(" · showing first {}", shown.len())
                    } else {
                        String::new()
                    }
                )
                .dimmed()
            );
        }
    }
    Ok(())
}

fn type_badge(kind: AlertType) -> colored::ColoredString {
    match kind {
        AlertType::Error => "✗".red().bold(),
        AlertType::Warning => "!".yellow().bold(),
        AlertType::Success => "✓".green().bold(),
        AlertType::Info | AlertType::Unknown => "i".blue().bold(),
    }
}

fn priority_label(priority: Priority) -> colored::ColoredString {
    let text = format!("{:<6}", priority.as_str());
    match priority {
        Priority::High => text.red().bold(),
        Priority::Medium => text.yellow(),
        Priority::Low | Priority::Unknown => text.normal(),
    }
}

fn print_alert_table(alerts: &[&Alert], details: bool) {
    if alerts.is_empty() {
        println!("{}", "No alerts match the current filters.".yellow());
        return;
    }

    println!("{}", "Alerts".bold().cyan());
    println!(
        "  {:<1} {:<1} {:<6} {:<10} {:<10} {:<12} Title",
        "", "", "Prio", "Category", "Date", "ID"
    );
    println!("  {}", "-".repeat(78));
    for alert in alerts {
        let unread = if alert.read { " ".normal() } else { "•".blue().bold() };
        let title = truncate(&alert.title, 40);
        let title = if alert.read { title.dimmed() } else { title.bold() };
        println!(
            "  {} {} {} {:<10} {:<10} {:<12} {}",
            unread,
            type_badge(alert.kind),
            priority_label(alert.priority),
            alert.category.as_str(),
            alert.date.format("%Y-%m-%d"),
            truncate(&alert.id, 12),
            title
        );

        if details {
            println!("      {}", alert.message.dimmed());
            if alert.action_required {
                println!("      {}", "Action required".yellow());
            }
            for suggestion in &alert.suggestions {
                println!("      {} {}", "·".dimmed(), suggestion);
            }
        }
    }
}

pub fn run_alerts_read(ctx: &mut Context, id: &str) -> Result<()> {
    let (parent_id, _) = ctx.identity()?;
    let notifier = ctx.notifier.clone();

    let outcome = ctx.with_source(|source| {
        let mut store = load_alerts(source, &parent_id)?;
        Ok(alerts::mark_read(&mut store, source, notifier.as_ref(), id))
    })?;

    match outcome {
        ReadOutcome::Marked => notifier.success("Alert marked as read"),
        ReadOutcome::AlreadyRead => println!("{}", "Alert was already read.".dimmed()),
        ReadOutcome::NotFound => anyhow::bail!("no alert with id '{id}'"),
        ReadOutcome::Failed(_) => return Err(Reported.into()),
    }
    Ok(())
}

pub fn run_alerts_read_all(ctx: &mut Context) -> Result<()> {
    let (parent_id, _) = ctx.identity()?;
    let notifier = ctx.notifier.clone();

    let report = ctx.with_source(|source| {
        let mut store = load_alerts(source, &parent_id)?;
        Ok(alerts::mark_all_read(&mut store, source, notifier.as_ref()))
    })?;

    if report.marked.is_empty() && report.failed.is_empty() {
        println!("{}", "No unread alerts.".dimmed());
        return Ok(());
    }
    if !report.marked.is_empty() {
        notifier.success(&format!("Marked {} alerts as read", report.marked.len()));
    }
    if !report.is_complete() {
        anyhow::bail!("{} alerts could not be marked as read", report.failed.len());
    }
    Ok(())
}
