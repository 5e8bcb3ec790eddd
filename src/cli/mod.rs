pub mod setup;
pub mod ui;
pub mod view;

use crate::AppCommand;
use crate::core::currency::parse_currency_code;
use crate::core::dashboard::{Comparison, Dashboard, DisplayMode, Freshness};
use crate::core::error::Result as DashboardResult;
use anyhow::Result;

/// How the dashboard is laid out for this invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewOptions {
    pub mode: DisplayMode,
    pub comparison: Comparison,
}

fn report(result: DashboardResult<Freshness>, announce_success: bool) {
    match result {
        Ok(Freshness::Fresh) if announce_success => println!(
            "{}\n",
            ui::style_text("Exchange rates updated successfully", ui::StyleType::Fresh)
        ),
        Ok(_) => {}
        Err(e) => eprintln!(
            "{}\n",
            ui::style_text(
                &format!("Failed to fetch exchange rates: {e}"),
                ui::StyleType::Error
            )
        ),
    }
}

async fn load(dashboard: &mut Dashboard, force_refresh: bool) {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = dashboard.load_rates(force_refresh).await;
    pb.finish_and_clear();
    report(result, force_refresh);
}

/// Applies one user intent to the dashboard and prints the result.
pub async fn run(
    dashboard: &mut Dashboard,
    command: AppCommand,
    options: ViewOptions,
) -> Result<()> {
    dashboard.set_display_mode(options.mode);
    dashboard.set_comparison(options.comparison);

    match command {
        AppCommand::Currencies(query) => {
            println!(
                "{}",
                view::render_currency_list(dashboard.settings(), query.as_deref())
            );
            return Ok(());
        }
        AppCommand::Show { refresh } => load(dashboard, refresh).await,
        AppCommand::Base(code) => {
            let code = parse_currency_code(&code)?;
            let pb = ui::new_spinner("Fetching exchange rates...");
            let result = dashboard.change_base(&code).await;
            pb.finish_and_clear();
            report(result, false);
        }
        AppCommand::Toggle(code) => {
            let code = parse_currency_code(&code)?;
            load(dashboard, false).await;
            let message = if dashboard.toggle_favorite(&code).await {
                format!("{code} added to favorites")
            } else {
                format!("{code} removed from favorites")
            };
            println!("{}\n", ui::style_text(&message, ui::StyleType::Fresh));
        }
        AppCommand::Move { code, target } => {
            let code = parse_currency_code(&code)?;
            let target = parse_currency_code(&target)?;
            load(dashboard, false).await;
            if !dashboard.reorder(&code, &target).await {
                let message =
                    format!("Favorites unchanged: {code} and {target} must be distinct favorites");
                println!("{}\n", ui::style_text(&message, ui::StyleType::Subtle));
            }
        }
    }

    println!("{}", view::render(dashboard));
    Ok(())
}
