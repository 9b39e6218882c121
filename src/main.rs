// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use salon_books::seed::seed_demo_data;
use salon_books::{finance_summary, format_currency, local_now, open_database, Config, TemporalAnchors};
use std::env;

const USAGE: &str = "Usage: salon-books [seed | summary]";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = Config::from_env()?;

    match args.get(1).map(String::as_str) {
        Some("seed") => run_seed(&config)?,
        Some("summary") => run_summary(&config)?,
        Some("help") | Some("--help") | Some("-h") => println!("{USAGE}"),
        Some(other) => bail!("Unknown command '{other}'\n{USAGE}"),
        // Dashboard mode (default)
        None => run_ui_mode(&config)?,
    }

    Ok(())
}

fn run_seed(config: &Config) -> Result<()> {
    println!("🌱 Seeding demo data into {}", config.db_path.display());

    let conn = open_database(&config.db_path)?;
    let report = seed_demo_data(&conn, local_now())?;

    println!("✓ Clients: {}", report.clients);
    println!("✓ Appointments: {}", report.appointments);
    println!("✓ Finance entries: {}", report.finance_entries);

    Ok(())
}

fn run_summary(config: &Config) -> Result<()> {
    let conn = open_database(&config.db_path)?;
    let now = local_now();
    let anchors = TemporalAnchors::at(now);
    let summary = finance_summary(&conn, now)?;

    println!("💰 Finance highlights as of {}", now.format("%Y-%m-%d %H:%M"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let starts = [anchors.start_of_today, anchors.start_of_week, anchors.start_of_month];
    for ((label, totals), start) in summary.periods().into_iter().zip(starts) {
        println!(
            "{:<8} since {}   income {:>10}   expenses {:>10}",
            label,
            start.format("%Y-%m-%d"),
            format_currency(totals.income),
            format_currency(totals.expense),
        );
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    println!("🖥️  Loading Salon Books dashboard...\n");

    let conn = open_database(&config.db_path)?;
    let mut app = ui::App::load(conn, local_now())?;
    ui::run_ui(&mut app)?;

    println!("\n✅ Dashboard closed");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ Dashboard not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin salon-server --features server");
    std::process::exit(1);
}
