//! Student pages: dashboard, academic, attendance and engagement.

use anyhow::Result;
use colored::Colorize;

use crate::alerts::AlertStats;
use crate::data::calendar::{self, CalendarDay};
use crate::models::Category;
use crate::models::student::{AcademicData, AttendanceData, AttendanceStatus, EngagementData};
use crate::store::{Resource, StudentAction, StudentStore};

use super::{Context, OutputFormat, bar, colorize_pct, format_number, truncate};

// ---------------------------------------------------------------------------
// ptrack dashboard
// ---------------------------------------------------------------------------

pub fn run_dashboard(ctx: &mut Context, format: OutputFormat) -> Result<()> {
    let (parent_id, student_id) = ctx.identity()?;
    let mut store = StudentStore::new();

    let ticket = store.begin(Resource::Profile);
    let (overview, source) = ctx.with_source(|s| Ok((s.overview(&student_id)?, s.label())))?;
    let stats = ctx.with_source(|s| s.alert_stats(&parent_id))?;
    store.apply(ticket, StudentAction::SetProfile(overview.student.clone()));

    if format == OutputFormat::Json {
        let value = serde_json::json!({
            "student": overview.student,
            "summary": overview.summary,
            "alerts": {
                "total": stats.total_alerts,
                "unread": stats.unread_alerts,
                "high_priority_unread": stats.high_priority_alerts,
                "by_category": stats.alerts_by_category,
            },
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let student = &overview.student;
    println!("{}", format!("{} · Dashboard", student.name).bold().cyan());
    println!("{}", "=".repeat(60));
    let mut class = vec![student.grade.as_str(), student.class_section.as_str()];
    if let Some(school) = &student.school_name {
        class.push(school);
    }
    class.retain(|s| !s.is_empty());
    println!("  {} {}", student.student_id.dimmed(), class.join(" · ").dimmed());
    println!();

    let summary = &overview.summary;
    println!("  {} {:.2}", "GPA:         ".bold(), summary.overall_gpa);
    println!(
        "  {} {} {}",
        "Attendance:  ".bold(),
        bar(summary.attendance_rate),
        colorize_pct(summary.attendance_rate)
    );
    println!(
        "  {} {} {}",
        "Engagement:  ".bold(),
        bar(summary.engagement_score),
        colorize_pct(summary.engagement_score)
    );
    println!();

    print_alert_stats(&stats);
    println!();
    println!("  {}", format!("data source: {source}").dimmed());
    Ok(())
}

fn print_alert_stats(stats: &AlertStats) {
    println!("{}", "Alerts".bold().cyan());
    let high = if stats.high_priority_alerts > 0 {
        format!("{} high priority", stats.high_priority_alerts).red().bold()
    } else {
        "none high priority".green()
    };
    println!(
        "  {} unread of {} · {}",
        format_number(stats.unread_alerts).bold(),
        format_number(stats.total_alerts),
        high
    );
    let by_category: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("{c}: {}", stats.category_count(*c)))
        .collect();
    println!("  {}", by_category.join("  ").dimmed());

    if !stats.recent_alerts.is_empty() {
        println!();
        println!("{}", "Recent".bold().cyan());
        for alert in &stats.recent_alerts {
            let marker = if alert.read { " ".normal() } else { "•".blue().bold() };
            println!(
                "  {} {:<6} {}",
                marker,
                alert.priority.as_str(),
                truncate(&alert.title, 50)
            );
        }
    }
}

// ---------------------------------------------------------------------------
// ptrack academic
// ---------------------------------------------------------------------------

pub fn run_academic(ctx: &mut Context, format: OutputFormat) -> Result<()> {
    let (_, student_id) = ctx.identity()?;
    let mut store = StudentStore::new();
    let ticket = store.begin(Resource::Academic);
    let data = ctx.with_source(|s| s.academic(&student_id))?;
    store.apply(ticket, StudentAction::SetAcademic(data));
    let Some(data) = store.state().academic.as_ref() else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Csv => {
            println!("subject,grade,percentage,trend");
            for s in &data.subjects {
                println!("{},{},{:.1},{}", s.subject, s.current_grade, s.percentage, s.trend.arrow());
            }
        }
        OutputFormat::Table => print_academic_table(data),
    }
    Ok(())
}

fn print_academic_table(data: &AcademicData) {
    println!("{}", format!("Academic Performance · {}", data.semester).bold().cyan());
    println!("{}", "=".repeat(60));
    println!("  {} {:.2}", "Overall GPA:".bold(), data.overall_gpa);
    if let Some(avg) = data.average_percentage() {
        println!("  {} {}", "Average:    ".bold(), colorize_pct(avg));
    }
    println!();

    if data.subjects.is_empty() {
        println!("{}", "No subjects recorded yet.".yellow());
        return;
    }

    println!("  {:<14} {:>5} {:>8}  {:<20} Trend", "Subject", "Grade", "Score", "");
    println!("  {}", "-".repeat(58));
    for (i, s) in data.subjects.iter().enumerate() {
        let line = format!(
            "  {:<14} {:>5} {:>7.1}%  {:<20} {}",
            truncate(&s.subject, 14),
            s.current_grade,
            s.percentage,
            bar(s.percentage),
            s.trend.arrow()
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }

    if let (Some(best), Some(worst)) = (data.strongest_subject(), data.weakest_subject()) {
        println!();
        println!("  {} {}", "Strongest:".green(), best.subject);
        println!("  {} {}", "Needs focus:".yellow(), worst.subject);
    }
}

// ---------------------------------------------------------------------------
// ptrack attendance
// ---------------------------------------------------------------------------

pub fn run_attendance(ctx: &mut Context, show_calendar: bool, format: OutputFormat) -> Result<()> {
    if show_calendar {
        let days = calendar::generate_current_month();
        if format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&days)?);
        } else {
            print_calendar(&days);
        }
        return Ok(());
    }

    let (_, student_id) = ctx.identity()?;
    let mut store = StudentStore::new();
    let ticket = store.begin(Resource::Attendance);
    let data = ctx.with_source(|s| s.attendance(&student_id))?;
    store.apply(ticket, StudentAction::SetAttendance(data));
    let Some(data) = store.state().attendance.as_ref() else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Csv => {
            println!("date,status");
            for r in &data.records {
                println!("{},{}", r.date, r.status.as_str());
            }
        }
        OutputFormat::Table => print_attendance_table(data),
    }
    Ok(())
}

fn print_attendance_table(data: &AttendanceData) {
    println!(
        "{}",
        format!("Attendance · {:04}-{:02}", data.year, data.month).bold().cyan()
    );
    println!("{}", "=".repeat(50));
    println!(
        "  {} {} {}",
        "Rate:   ".bold(),
        bar(data.overall_percentage),
        colorize_pct(data.overall_percentage)
    );
    println!(
        "  {} {}  {} {}  {} {}  {} {}",
        "Days:".bold(),
        data.total_days,
        "Present:".green(),
        data.present_days,
        "Late:".yellow(),
        data.late_days,
        "Absent:".red(),
        data.absent_days
    );

    let missed: Vec<String> = data
        .records
        .iter()
        .filter(|r| !r.status.attended())
        .map(|r| r.date.format("%b %-d").to_string())
        .collect();
    if !missed.is_empty() {
        println!("  {} {}", "Missed:".bold(), missed.join(", ").dimmed());
    }
}

fn status_cell(status: AttendanceStatus) -> colored::ColoredString {
    match status {
        AttendanceStatus::Present => " P ".on_green().black(),
        AttendanceStatus::Late => " L ".on_yellow().black(),
        AttendanceStatus::Absent => " A ".on_red().white(),
        AttendanceStatus::Excused => " E ".on_blue().white(),
    }
}

/// Month grid, Monday to Friday columns.
fn print_calendar(days: &[CalendarDay]) {
    use chrono::Datelike;

    let Some(first) = days.first() else {
        println!("{}", "No school days this month.".yellow());
        return;
    };
    println!("{}", first.date.format("%B %Y").to_string().bold().cyan());
    println!("  {}", " Mon  Tue  Wed  Thu  Fri".dimmed());

    let mut row = String::new();
    let mut col = 0;
    for day in days {
        let weekday = day.date.weekday().num_days_from_monday() as usize;
        if weekday < col {
            println!("  {row}");
            row.clear();
            col = 0;
        }
        while col < weekday {
            row.push_str("     ");
            col += 1;
        }
        row.push_str(&format!("{}{:<2}", status_cell(day.status), day.date.day()));
        col += 1;
    }
    if !row.is_empty() {
        println!("  {row}");
    }

    let summary = calendar::summarize(days);
    println!();
    println!(
        "  {} {}  {} {}  {} {}  {} {}",
        "School days:".bold(),
        summary.school_days,
        "Present:".green(),
        summary.present,
        "Late:".yellow(),
        summary.late,
        "Absent:".red(),
        summary.absent
    );
    println!("  {} {}", "Attendance:".bold(), colorize_pct(summary.attendance_rate()));
    println!("  {}", "Simulated month; regenerated on every run.".dimmed());
}

// ---------------------------------------------------------------------------
// ptrack engagement
// ---------------------------------------------------------------------------

pub fn run_engagement(ctx: &mut Context, format: OutputFormat) -> Result<()> {
    let (_, student_id) = ctx.identity()?;
    let mut store = StudentStore::new();
    let ticket = store.begin(Resource::Engagement);
    let data = ctx.with_source(|s| s.engagement(&student_id))?;
    store.apply(ticket, StudentAction::SetEngagement(data));
    let Some(data) = store.state().engagement.as_ref() else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Csv => {
            println!("subject,minutes");
            for (subject, minutes) in data.minutes_by_subject() {
                println!("{subject},{minutes}");
            }
        }
        OutputFormat::Table => print_engagement_table(data),
    }
    Ok(())
}

fn print_engagement_table(data: &EngagementData) {
    println!(
        "{}",
        format!("Engagement · week of {}", data.week_start_date).bold().cyan()
    );
    println!("{}", "=".repeat(50));
    println!(
        "  {} {} {}",
        "Overall:      ".bold(),
        bar(data.overall_engagement_score),
        colorize_pct(data.overall_engagement_score)
    );
    println!("  {} {}", "Participation:".bold(), colorize_pct(data.participation_score));
    println!("  {} {}", "Focus:        ".bold(), colorize_pct(data.focus_score));
    println!(
        "  {} {:.1}h ({:.1}h/day)",
        "Study time:   ".bold(),
        data.total_study_hours,
        data.average_daily_hours
    );

    let by_subject = data.minutes_by_subject();
    if !by_subject.is_empty() {
        println!();
        println!("{}", "Study Time by Subject".bold().cyan());
        for (subject, minutes) in by_subject {
            println!("  {:<14} {:>5} min", truncate(&subject, 14), format_number(minutes as usize));
        }
    }
}
