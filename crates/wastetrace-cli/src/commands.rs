//! Command implementations for the wastetrace CLI.
//!
//! Each command is a thin layer over the core API client: it gathers input,
//! makes the call, and renders the result. List commands fall back to the
//! offline cache, labelled with its age, when the backend is unreachable.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing::warn;

use wastetrace_core::api::{ApiClient, ApiError, RegisterOutcome};
use wastetrace_core::auth::{AuthState, CredentialStore};
use wastetrace_core::cache::CacheManager;
use wastetrace_core::config::Config;
use wastetrace_core::models::{
    Account, AccountType, Attachment, Entry, KycStatus, NewAccount, NewEntry, Product,
    QuantityInput, RegistrationForm, ReportStats, TransactionType, UserStats,
};

// ============================================================================
// Input helpers
// ============================================================================

fn prompt(label: &str) -> Result<String> {
    eprint!("{}: ", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

fn prompt_optional(label: &str) -> Result<Option<String>> {
    let value = prompt(&format!("{} (optional)", label))?;
    Ok(if value.is_empty() { None } else { Some(value) })
}

fn prompt_account_type() -> Result<AccountType> {
    let value = prompt("Account type [household/manufacturer/business/consumer]")?;
    match value.to_lowercase().as_str() {
        "household" => Ok(AccountType::Household),
        "manufacturer" => Ok(AccountType::Manufacturer),
        "business" => Ok(AccountType::Business),
        "consumer" => Ok(AccountType::Consumer),
        other => bail!("Unknown account type: {}", other),
    }
}

/// Load an optional image attachment from a local path.
fn prompt_attachment(label: &str) -> Result<Option<Attachment>> {
    let Some(path) = prompt_optional(label)? else {
        return Ok(None);
    };
    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {}", path))?;
    let file_name = std::path::Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Some(Attachment {
        mime_type: guess_mime(&file_name).to_string(),
        file_name,
        bytes,
    }))
}

fn guess_mime(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next().map(str::to_lowercase).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Whether an error is transport-level, making a cache fallback appropriate.
fn is_network_failure(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiError>()
        .map(ApiError::is_network_failure)
        .unwrap_or(false)
}

// ============================================================================
// Session commands
// ============================================================================

pub async fn login(client: &ApiClient, config: &mut Config, args: &[String]) -> Result<()> {
    let remember = args.iter().any(|a| a == "--remember");
    let email = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .or_else(|| config.last_email.clone())
        .filter(|e| !e.is_empty());
    let email = match email {
        Some(email) => email,
        None => prompt("Email")?,
    };
    if email.is_empty() {
        bail!("An email address is required to log in");
    }

    let password = match CredentialStore::lookup(&email) {
        Ok(password) => {
            eprintln!("Using remembered password for {}", email);
            password
        }
        Err(_) => rpassword::prompt_password("Password: ")?,
    };

    let user = client.auth().login(&email, &password).await?;

    if remember {
        if let Err(e) = CredentialStore::remember(&email, &password) {
            warn!(error = %e, "Could not store password in keychain");
        }
    }

    config.last_email = Some(email);
    config.save()?;

    println!("Logged in as {} <{}>", user.name, user.email);
    Ok(())
}

pub fn logout(client: &ApiClient) -> Result<()> {
    client.store().clear_all()?;
    println!("Logged out.");
    Ok(())
}

pub fn whoami(client: &ApiClient) -> Result<()> {
    match client.store().auth_state() {
        AuthState::Authenticated { user, .. } => {
            println!("{} <{}>", user.name, user.email);
            println!("  role:         {}", user.role);
            if let Some(kyc) = user.kyc_status {
                println!("  kyc status:   {}", kyc);
            }
            if let Some(area) = user.area {
                println!("  area:         {}", area);
            }
        }
        AuthState::Unauthenticated => println!("Not logged in."),
    }
    Ok(())
}

pub async fn register(client: &ApiClient) -> Result<()> {
    let name = prompt("Full name")?;
    let email = prompt("Email")?;
    let password = rpassword::prompt_password("Password: ")?;
    let confirm_password = rpassword::prompt_password("Confirm password: ")?;
    let contact = prompt("Contact number")?;
    let area = prompt("Area")?;
    let plot_number = prompt("Plot number")?;
    let account_type = prompt_account_type()?;
    let id_document = prompt_attachment("Path to identity document image")?;
    let selfie = prompt_attachment("Path to liveness selfie image")?;

    let form = RegistrationForm {
        name,
        email,
        password,
        confirm_password,
        contact,
        area,
        plot_number,
        account_type,
        is_international: false,
        id_document,
        selfie,
    };

    match client.auth().register(&form).await? {
        RegisterOutcome::SignedIn { user, .. } => {
            println!("Registered and logged in as {} <{}>", user.name, user.email);
        }
        RegisterOutcome::LoginRequired { message } => {
            println!(
                "{}",
                message.unwrap_or_else(|| "Registration successful. Please login.".to_string())
            );
        }
    }
    Ok(())
}

// ============================================================================
// Stats
// ============================================================================

fn print_user_stats(stats: &UserStats) {
    println!("Supply received: {:>12}", stats.supply_received);
    println!("Distributed:     {:>12}", stats.distributed);
    println!("Returned:        {:>12}", stats.returned);
    println!("Balance:         {:>12}", stats.balance);
    if let Some(kyc) = stats.kyc_status {
        println!("KYC status:      {:>12}", kyc.to_string());
    }
}

fn print_report_stats(stats: &ReportStats) {
    println!();
    println!("System overview");
    println!("  Total accounts:  {:>10}", stats.total_accounts);
    println!("  Global recovery: {:>10}", stats.global_recovery);
    println!("  Pending KYC:     {:>10}", stats.pending_kyc);
    if let Some(ref node_status) = stats.node_status {
        println!("  Node status:     {:>10}", node_status);
    }
}

pub async fn stats(client: &ApiClient, cache: &CacheManager) -> Result<()> {
    let is_admin = client
        .store()
        .user()
        .map(|u| u.is_admin())
        .unwrap_or(false);

    if is_admin {
        let auth = client.auth();
        let reports = client.reports();
        let (mine, system) =
            futures::try_join!(auth.stats(), reports.stats())?;
        cache.save_user_stats(&mine)?;
        print_user_stats(&mine);
        print_report_stats(&system);
        return Ok(());
    }

    match client.auth().stats().await {
        Ok(stats) => {
            cache.save_user_stats(&stats)?;
            print_user_stats(&stats);
        }
        Err(e) if is_network_failure(&e) => {
            let Some(cached) = cache.load_user_stats()? else {
                return Err(e);
            };
            eprintln!("Backend unreachable, showing cached stats ({})", cached.age_display());
            print_user_stats(&cached.data);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

// ============================================================================
// Accounts
// ============================================================================

fn print_accounts(accounts: &[Account]) {
    if accounts.is_empty() {
        println!("No accounts.");
        return;
    }
    println!(
        "{:<36} {:<24} {:<13} {:<9} {}",
        "ID", "NAME", "TYPE", "KYC", "AREA"
    );
    for account in accounts {
        println!(
            "{:<36} {:<24} {:<13} {:<9} {}",
            account.id,
            account.name,
            account.account_type.to_string(),
            account.kyc_status.to_string(),
            account.area.as_deref().unwrap_or("-"),
        );
    }
}

pub async fn accounts(client: &ApiClient, cache: &CacheManager, args: &[String]) -> Result<()> {
    let sub = args.first().map(String::as_str).unwrap_or("list");
    match sub {
        "list" => match client.accounts().list().await {
            Ok(accounts) => {
                cache.save_accounts(&accounts)?;
                print_accounts(&accounts);
            }
            Err(e) if is_network_failure(&e) => {
                let Some(cached) = cache.load_accounts()? else {
                    return Err(e);
                };
                eprintln!(
                    "Backend unreachable, showing cached accounts ({})",
                    cached.age_display()
                );
                print_accounts(&cached.data);
            }
            Err(e) => return Err(e),
        },
        "create" => {
            let account = NewAccount {
                name: prompt("Name")?,
                account_type: prompt_account_type()?,
                plot_number: prompt_optional("Plot number")?,
                area: prompt_optional("Area")?,
                contact: prompt_optional("Contact")?,
                is_international: false,
            };
            let created = client.accounts().create(&account).await?;
            println!("Created account {} ({})", created.name, created.id);
        }
        "block" | "suspend" | "unsuspend" | "delete" => {
            let id = args
                .get(1)
                .with_context(|| format!("Usage: wastetrace accounts {} <id>", sub))?;
            let message = match sub {
                "block" => client.accounts().block(id).await?,
                "suspend" => client.accounts().suspend(id).await?,
                "unsuspend" => client.accounts().unsuspend(id).await?,
                _ => client.accounts().delete(id).await?,
            };
            println!(
                "{}",
                message.unwrap_or_else(|| format!("Account {} {}ed", id, sub.trim_end_matches('e')))
            );
        }
        "kyc" => {
            let id = args
                .get(1)
                .context("Usage: wastetrace accounts kyc <id> <pending|approved|rejected>")?;
            let status = args
                .get(2)
                .and_then(|s| KycStatus::from_input(s))
                .context("Usage: wastetrace accounts kyc <id> <pending|approved|rejected>")?;
            let message = client.accounts().update_kyc(id, status).await?;
            println!(
                "{}",
                message.unwrap_or_else(|| format!("KYC status for {} set to {}", id, status))
            );
        }
        other => bail!("Unknown accounts subcommand: {}", other),
    }
    Ok(())
}

// ============================================================================
// Entries
// ============================================================================

fn print_entries(entries: &[Entry]) {
    if entries.is_empty() {
        println!("No entries.");
        return;
    }
    println!(
        "{:<36} {:<10} {:<32} {:>8} {}",
        "ID", "TYPE", "PRODUCT", "TOTAL", "DATE"
    );
    for entry in entries {
        let date = entry
            .created_at
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<36} {:<10} {:<32} {:>8} {}",
            entry.id,
            entry.transaction_type.to_string(),
            entry.product_name,
            entry.quantities.total(),
            date,
        );
    }
}

pub async fn entries(client: &ApiClient, cache: &CacheManager, args: &[String]) -> Result<()> {
    let sub = args.first().map(String::as_str).unwrap_or("list");
    match sub {
        "list" => match client.entries().list().await {
            Ok(entries) => {
                cache.save_entries(&entries)?;
                print_entries(&entries);
            }
            Err(e) if is_network_failure(&e) => {
                let Some(cached) = cache.load_entries()? else {
                    return Err(e);
                };
                eprintln!(
                    "Backend unreachable, showing cached entries ({})",
                    cached.age_display()
                );
                print_entries(&cached.data);
            }
            Err(e) => return Err(e),
        },
        "add" => {
            let transaction_type =
                TransactionType::from_input(&prompt("Type [supply/transfer/return]")?)?;
            let source_account_id = prompt_optional("Source account id")?;
            let target_account_id = prompt_optional("Target account id")?;
            let pin = prompt("PIN")?;
            let product_group = prompt("Product group")?;
            let product_name = prompt("Product name")?;

            eprintln!("Quantities (leave blank for 0)");
            let quantities = QuantityInput {
                unit: prompt("  Units")?,
                dozen: prompt("  Dozen")?,
                half_dozen: prompt("  Half dozen")?,
                case: prompt("  Case")?,
                series: prompt("  Series")?,
                level_16: prompt("  Level 16")?,
                level_10: prompt("  Level 10")?,
            }
            .normalize()?;

            let entry = NewEntry {
                transaction_type,
                source_account_id,
                target_account_id,
                pin,
                product_group,
                product_name,
                quantities,
            };
            let created = client.entries().create(&entry).await?;
            println!(
                "Recorded {} of {} (total {})",
                created.transaction_type, created.product_name, created.quantities.total()
            );
        }
        "delete" => {
            let id = args.get(1).context("Usage: wastetrace entries delete <id>")?;
            let message = client.entries().delete(id).await?;
            println!("{}", message.unwrap_or_else(|| format!("Entry {} deleted", id)));
        }
        other => bail!("Unknown entries subcommand: {}", other),
    }
    Ok(())
}

// ============================================================================
// Reports & products
// ============================================================================

pub async fn reports(client: &ApiClient, args: &[String]) -> Result<()> {
    let sub = args.first().map(String::as_str).unwrap_or("stats");
    match sub {
        "stats" => {
            let stats = client.reports().stats().await?;
            print_report_stats(&stats);
        }
        "insights" => {
            let insights = client.reports().insights().await?;
            println!("{}", insights.render());
        }
        "export" => {
            let out = args
                .iter()
                .position(|a| a == "--out")
                .and_then(|i| args.get(i + 1))
                .map(String::as_str)
                .unwrap_or("waste_report.pdf");
            let bytes = client.reports().export().await?;
            std::fs::write(out, &bytes)
                .with_context(|| format!("Failed to write report to {}", out))?;
            println!("Saved report to {} ({} bytes)", out, bytes.len());
        }
        other => bail!("Unknown reports subcommand: {}", other),
    }
    Ok(())
}

fn print_products(products: &[Product]) {
    for product in products {
        println!("{}", product);
    }
    println!("({} products)", products.len());
}

pub async fn products(client: &ApiClient, cache: &CacheManager) -> Result<()> {
    match client.products().list().await {
        Ok(products) => {
            cache.save_products(&products)?;
            print_products(&products);
        }
        Err(e) if is_network_failure(&e) => {
            let Some(cached) = cache.load_products()? else {
                return Err(e);
            };
            eprintln!(
                "Backend unreachable, showing cached catalog ({})",
                cached.age_display()
            );
            print_products(&cached.data);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}
