//! AI-backed commands: the alert generator form and student insights.
//!
//! Both always talk to the backend, whatever `data.source` says.

use anyhow::Result;
use colored::Colorize;

use crate::alerts::GeneratedSummary;
use crate::api;
use crate::models::generator::{GeneratedAlert, StudentAlertRequest};
use crate::ui::Route;
use crate::validation;

use super::{Context, OutputFormat, truncate};

/// Fields of the alert generator form.
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    pub name: String,
    pub roll_number: String,
    pub attendance: f64,
    pub academic: f64,
    pub behavior_notes: Option<String>,
    pub participation: String,
    pub comments: Option<String>,
    pub save: bool,
}

impl GenerateArgs {
    fn to_request(&self) -> Result<StudentAlertRequest> {
        Ok(StudentAlertRequest {
            name: self.name.trim().to_string(),
            roll_number: self.roll_number.trim().to_string(),
            attendance_percentage: self.attendance,
            academic_performance: self.academic,
            behavior_notes: self.behavior_notes.clone().unwrap_or_default(),
            participation_level: validation::participation(&self.participation)?,
            additional_comments: self.comments.clone().unwrap_or_default(),
        })
    }
}

// ---------------------------------------------------------------------------
// ptrack generate
// ---------------------------------------------------------------------------

pub fn run_generate(ctx: &mut Context, args: &GenerateArgs, format: OutputFormat) -> Result<()> {
    let request = args.to_request()?;

    if args.save {
        let (_, student_id) = ctx.identity()?;
        let saved = api::generator::generate_and_save(&mut ctx.client, &request, &student_id)?;
        if format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&saved.alerts)?);
            return Ok(());
        }
        let message = if saved.message.is_empty() {
            format!("Saved {} alerts", saved.alerts.len())
        } else {
            saved.message.clone()
        };
        ctx.notifier.success(&message);
        for alert in &saved.alerts {
            println!(
                "  {} {:<6} {:<10} {}",
                "•".blue().bold(),
                alert.priority.as_str(),
                alert.category.as_str(),
                alert.title
            );
        }
        ctx.notifier.navigate(Route::Alerts);
        return Ok(());
    }

    let response = api::generator::generate(&mut ctx.client, &request)?;
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("Generated Alerts for {} ({})", response.student_name, response.student_roll_number)
            .bold()
            .cyan()
    );
    println!("{}", "=".repeat(60));
    let engine = if response.ai_powered { "AI" } else { "rule-based fallback" };
    println!("  {} {}", "Engine:".bold(), engine.dimmed());
    println!();

    if response.alerts.is_empty() {
        println!("{}", "No alerts generated for this student.".green());
        return Ok(());
    }
    for alert in &response.alerts {
        print_generated(alert);
    }

    let summary = GeneratedSummary::from_generated(&response.alerts);
    println!("{}", "Summary".bold().cyan());
    println!(
        "  {} alerts · {} high priority · {} need action · {:.0}% avg confidence",
        summary.total_alerts,
        summary.high_priority_count,
        summary.action_required_count,
        summary.average_confidence * 100.0
    );
    Ok(())
}

fn print_generated(alert: &GeneratedAlert) {
    let priority = match alert.priority.as_str() {
        "high" => "high".red().bold(),
        "medium" => "medium".yellow(),
        other => other.normal(),
    };
    println!(
        "  {} [{} · {} · {}]",
        alert.title.bold(),
        alert.alert_type,
        priority,
        alert.category
    );
    println!("    {}", alert.message);
    if !alert.reasoning.is_empty() {
        println!("    {} {}", "Why:".dimmed(), alert.reasoning.dimmed());
    }
    for suggestion in &alert.suggestions {
        println!("    {} {}", "·".dimmed(), suggestion);
    }
    println!(
        "    {}",
        format!("confidence {:.0}%", alert.confidence_score * 100.0).dimmed()
    );
    println!();
}

// ---------------------------------------------------------------------------
// ptrack insights list | ask
// ---------------------------------------------------------------------------

pub fn run_insights_list(ctx: &mut Context, limit: Option<u32>, format: OutputFormat) -> Result<()> {
    let (_, student_id) = ctx.identity()?;
    let insights = api::insights::list(&mut ctx.client, &student_id, limit)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }
    if insights.is_empty() {
        println!("{}", "No insights yet. Ask one with `ptrack insights ask`.".yellow());
        return Ok(());
    }

    println!("{}", "Insights".bold().cyan());
    println!("  {:<10} {:<14} {:>5}  Title", "Date", "Type", "Conf");
    println!("  {}", "-".repeat(60));
    for insight in insights.iter().take(ctx.max_rows()) {
        println!(
            "  {:<10} {:<14} {:>4.0}%  {}",
            insight.created_at.format("%Y-%m-%d"),
            truncate(&insight.insight_type, 14),
            insight.confidence_score * 100.0,
            truncate(&insight.title, 40)
        );
    }
    Ok(())
}

pub fn run_insights_ask(ctx: &mut Context, query: &str, format: OutputFormat) -> Result<()> {
    let (_, student_id) = ctx.identity()?;
    let response = api::insights::generate(&mut ctx.client, &student_id, query)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{}", response.insight);
    if !response.recommendations.is_empty() {
        println!();
        println!("{}", "Recommendations".bold().cyan());
        for rec in &response.recommendations {
            println!("  {} {}", "·".dimmed(), rec);
        }
    }
    println!();
    let mut footer = format!("confidence {:.0}%", response.confidence * 100.0);
    if !response.data_used.is_empty() {
        footer.push_str(&format!(" · based on {}", response.data_used.join(", ")));
    }
    println!("{}", footer.dimmed());
    Ok(())
}
