//! Session commands: login, signup, logout, whoami.

use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result};
use colored::Colorize;

use crate::api;
use crate::models::session::SignupRequest;
use crate::ui::Route;

use super::Context;

/// Read a password from `PTRACK_PASSWORD` or one line of stdin.
fn read_password(prompt: &str) -> Result<String> {
    if let Ok(password) = std::env::var("PTRACK_PASSWORD")
        && !password.is_empty()
    {
        return Ok(password);
    }
    eprint!("{prompt}: ");
    io::stderr().flush().ok();
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn run_login(ctx: &mut Context, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password("Password")?,
    };
    let user = api::auth::login(&mut ctx.client, email, &password)?;
    ctx.notifier.success(&format!("Welcome back, {}!", display_name(&user.name, &user.email)));
    ctx.notifier.navigate(Route::Dashboard);
    Ok(())
}

/// Flags of `ptrack signup`.
#[derive(Debug, Clone)]
pub struct SignupArgs {
    pub email: String,
    pub name: String,
    pub student_name: String,
    pub student_id: String,
    pub phone: Option<String>,
}

pub fn run_signup(ctx: &mut Context, args: SignupArgs) -> Result<()> {
    let password = read_password("Password")?;
    let confirm_password = read_password("Confirm password")?;
    let request = SignupRequest {
        email: args.email.trim().to_string(),
        name: args.name.trim().to_string(),
        student_name: args.student_name.trim().to_string(),
        student_id: args.student_id.trim().to_string(),
        phone: args.phone.filter(|p| !p.trim().is_empty()),
        password,
        confirm_password,
    };
    let user = api::auth::signup(&mut ctx.client, &request)?;
    ctx.notifier.success(&format!("Account created. Welcome, {}!", display_name(&user.name, &user.email)));
    ctx.notifier.navigate(Route::Dashboard);
    Ok(())
}

pub fn run_logout(ctx: &mut Context) -> Result<()> {
    let was_signed_in = ctx.client.auth().is_authenticated();
    let result = api::auth::logout(&mut ctx.client);
    if was_signed_in {
        ctx.notifier.success("Signed out");
    } else {
        println!("{}", "Not signed in.".yellow());
    }
    // The local session is gone either way; a failed server call is not fatal.
    if let Err(err) = result {
        eprintln!("  {}", err.user_message("logout request failed").dimmed());
    }
    Ok(())
}

pub fn run_whoami(ctx: &mut Context, refresh: bool) -> Result<()> {
    if !ctx.client.auth().is_authenticated() {
        println!("{}", "Not signed in. Run `ptrack login`.".yellow());
        return Ok(());
    }

    if refresh {
        api::auth::refresh(&mut ctx.client)?;
        let profile = api::auth::profile(&mut ctx.client)?;
        let token = ctx.client.auth().token().unwrap_or_default().to_string();
        ctx.client.auth_mut().login(profile, token);
    }

    let Some(user) = ctx.client.auth().user() else {
        return Ok(());
    };
    println!("{}", "Signed in".bold().cyan());
    println!("  {} {}", "Parent: ".bold(), display_name(&user.name, &user.email));
    println!("  {} {}", "Email:  ".bold(), user.email);
    println!("  {} {} ({})", "Student:".bold(), user.student_name, user.student_id);
    if let Some(phone) = &user.phone {
        println!("  {} {}", "Phone:  ".bold(), phone);
    }
    println!("  {} {}", "Backend:".bold(), ctx.client.base_url().dimmed());
    Ok(())
}

fn display_name<'a>(name: &'a str, email: &'a str) -> &'a str {
    if name.trim().is_empty() { email } else { name }
}
