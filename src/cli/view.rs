use super::ui;
use crate::core::currency::{CurrencyRate, currency_name, search_currencies};
use crate::core::dashboard::{Comparison, Dashboard, DisplayMode, Freshness, LoadState};
use crate::core::settings::DashboardSettings;
use chrono::{DateTime, Local, Utc};
use comfy_table::{Cell, CellAlignment};

const GRID_COLUMNS: usize = 3;

/// One line describing a rate in the chosen direction.
pub fn comparison_text(currency: &CurrencyRate, base: &str, comparison: Comparison) -> String {
    match comparison {
        Comparison::BaseToQuote => format!(
            "1 {} = {} {}",
            base,
            ui::format_rate(currency.rate),
            currency.code
        ),
        Comparison::QuoteToBase => format!(
            "1 {} = {} {}",
            currency.code,
            ui::format_rate(currency.inverse()),
            base
        ),
    }
}

fn status_line(dashboard: &Dashboard) -> String {
    let updated = dashboard
        .last_updated()
        .map_or("never".to_string(), format_timestamp);
    match dashboard.state() {
        LoadState::Loaded(Freshness::Fresh) => format!(
            "Last updated: {} {}",
            updated,
            ui::style_text("(live)", ui::StyleType::Fresh)
        ),
        LoadState::Loaded(Freshness::Stale) => format!(
            "Last updated: {} {}",
            updated,
            ui::style_text("(cached, may be outdated)", ui::StyleType::Stale)
        ),
        LoadState::Error => ui::style_text("Exchange rates unavailable", ui::StyleType::Error),
        LoadState::Idle | LoadState::Loading => {
            ui::style_text("Exchange rates not loaded", ui::StyleType::Subtle)
        }
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn card(currency: &CurrencyRate, base: &str, comparison: Comparison) -> Cell {
    let headline = match comparison {
        Comparison::BaseToQuote => currency.rate,
        Comparison::QuoteToBase => currency.inverse(),
    };
    Cell::new(format!(
        "{}  {}\n{}\n{}",
        ui::style_text(&currency.code, ui::StyleType::Code),
        currency.name,
        ui::format_rate(headline),
        ui::style_text(
            &comparison_text(currency, base, comparison),
            ui::StyleType::Subtle
        )
    ))
}

fn render_grid(currencies: &[CurrencyRate], base: &str, comparison: Comparison) -> String {
    let mut table = ui::new_styled_table();
    for row in currencies.chunks(GRID_COLUMNS) {
        table.add_row(row.iter().map(|c| card(c, base, comparison)));
    }
    table.to_string()
}

fn render_list(currencies: &[CurrencyRate], base: &str, comparison: Comparison) -> String {
    let mut table = ui::new_styled_table();
    let rate_header = match comparison {
        Comparison::BaseToQuote => format!("Per 1 {base}"),
        Comparison::QuoteToBase => format!("In {base}"),
    };
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell(&rate_header),
        ui::header_cell("Comparison"),
    ]);

    for (i, currency) in currencies.iter().enumerate() {
        let value = match comparison {
            Comparison::BaseToQuote => currency.rate,
            Comparison::QuoteToBase => currency.inverse(),
        };
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(&currency.code),
            Cell::new(&currency.name),
            ui::rate_cell(value),
            Cell::new(comparison_text(currency, base, comparison)),
        ]);
    }
    table.to_string()
}

/// Renders the whole dashboard for the terminal.
pub fn render(dashboard: &Dashboard) -> String {
    let base = dashboard.base_currency();
    let mut output = format!(
        "{}\nBase: {} ({})\n{}\n\n",
        ui::style_text("X-Change", ui::StyleType::Title),
        ui::style_text(base, ui::StyleType::Code),
        currency_name(base),
        status_line(dashboard)
    );

    let currencies = dashboard.currencies();
    if currencies.is_empty() {
        let hint = if dashboard.settings().favorites.is_empty() {
            "No currencies selected. Add one with `xchange toggle <CODE>`."
        } else {
            "No rates available for your favorite currencies."
        };
        output.push_str(&ui::style_text(hint, ui::StyleType::Subtle));
        return output;
    }

    output.push_str(&match dashboard.display_mode() {
        DisplayMode::Grid => render_grid(currencies, base, dashboard.comparison()),
        DisplayMode::List => render_list(currencies, base, dashboard.comparison()),
    });
    output
}

/// Lists known currencies matching `query`, marking the base and favorites.
pub fn render_currency_list(settings: &DashboardSettings, query: Option<&str>) -> String {
    let matches = search_currencies(query.unwrap_or_default());
    if matches.is_empty() {
        return ui::style_text(
            &format!("No currencies match `{}`", query.unwrap_or_default()),
            ui::StyleType::Subtle,
        );
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Favorite"),
    ]);

    for (code, name) in matches {
        let marker = if code == settings.base_currency {
            "base"
        } else if settings.favorites.iter().any(|f| f == code) {
            "★"
        } else {
            ""
        };
        table.add_row(vec![
            Cell::new(code),
            Cell::new(name),
            Cell::new(marker).set_alignment(CellAlignment::Center),
        ]);
    }
    table.to_string()
}
