use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Success,
    Warning,
    Error,
    Subtle,
    TotalLabel,
    TotalValue,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Success => style(text).green(),
        StyleType::Warning => style(text).yellow(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Creates a cell for a signed value with color coding, "N/A" when absent.
pub fn signed_cell(value: Option<f64>, format_fn: impl Fn(f64) -> String) -> Cell {
    match value {
        Some(v) => {
            let color = if v >= 0.0 { Color::Green } else { Color::Red };
            Cell::new(format_fn(v))
                .fg(color)
                .set_alignment(CellAlignment::Right)
        }
        None => Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
    }
}

/// Creates a risk-badge cell colored by the backend's risk category.
pub fn risk_cell(category: Option<&str>) -> Cell {
    match category {
        Some(category) => {
            let color = match category {
                "Low Risk" => Color::Green,
                "Average Risk" => Color::Yellow,
                "High Risk" => Color::Red,
                _ => Color::DarkGrey,
            };
            Cell::new(category).fg(color)
        }
        None => Cell::new("Risk N/A").fg(Color::DarkGrey),
    }
}

/// Formats a monetary amount the way the marketplace renders it: whole
/// dollars with thousands separators, "N/A" when not provided.
pub fn format_currency(amount: Option<f64>) -> String {
    match amount {
        Some(v) if v.is_finite() => {
            let negative = v < 0.0;
            let digits = format!("{:.0}", v.abs());
            let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
            for (i, ch) in digits.chars().enumerate() {
                if i > 0 && (digits.len() - i) % 3 == 0 {
                    grouped.push(',');
                }
                grouped.push(ch);
            }
            if negative {
                format!("-${grouped}")
            } else {
                format!("${grouped}")
            }
        }
        _ => "N/A".to_string(),
    }
}

/// Formats an equity percentage to one decimal, "N/A" when not provided.
pub fn format_equity(equity: Option<f64>) -> String {
    match equity {
        Some(v) if v.is_finite() => format!("{v:.1}%"),
        _ => "N/A".to_string(),
    }
}

/// Creates a spinner for a single in-flight request.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
