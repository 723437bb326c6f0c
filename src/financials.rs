use anyhow::{Context, Result};
use chrono::Datelike;
use comfy_table::Cell;
use console::Term;
use tracing::debug;

use crate::client::ApiClient;
use crate::editor::{FinancialHistoryEditor, HandleId};
use crate::ui;

/// Interactive editing session for the logged-in startup's financial
/// history. The editor state lives only for the duration of this session and
/// is rebuilt from the backend on every entry.
pub async fn run_session(client: &ApiClient) -> Result<()> {
    let spinner = ui::new_spinner("Loading your startup...");
    let result = client.my_startup().await;
    spinner.finish_and_clear();

    let detail = result
        .context("Could not load financial data; the financials editor is unavailable")?;

    let mut history = detail.financial_history.clone();
    history.sort_by_key(|r| r.year);

    let mut editor = FinancialHistoryEditor::new();
    editor.initialize(&history);

    println!(
        "{}",
        ui::style_text(
            &format!("Financial history: {}", detail.company_name),
            ui::StyleType::Title
        )
    );
    if history.is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No financial history saved yet. Add records below.",
                ui::StyleType::Subtle
            )
        );
    }
    render(&editor);
    println!(
        "{}",
        ui::style_text("Type `help` for the list of commands.", ui::StyleType::Subtle)
    );

    let term = Term::stdout();
    loop {
        term.write_str("financials> ")
            .context("Terminal unavailable")?;
        let line = match term.read_line() {
            Ok(line) => line,
            Err(_) => break,
        };
        debug!("Editor command: {line:?}");

        let mut parts = line.split_whitespace();
        match parts.next() {
            None => continue,
            Some("help") => print_help(),
            Some("list") => render(&editor),
            Some("add") => {
                let id = editor.add_record();
                let year = suggest_year(&editor);
                println!("Added record #{id}.");
                println!(
                    "{}",
                    ui::style_text(
                        &format!("Tip: year {year} is not recorded yet. Try `year {id} {year}`."),
                        ui::StyleType::Subtle
                    )
                );
                render(&editor);
            }
            Some("rm") => match parse_handle(parts.next()) {
                Some(id) => {
                    if editor.remove_record(id) {
                        render(&editor);
                    } else {
                        stale_handle(id);
                    }
                }
                None => usage("rm <record>"),
            },
            Some(field @ ("year" | "revenue" | "profit")) => {
                let Some(id) = parse_handle(parts.next()) else {
                    usage(&format!("{field} <record> [value]"));
                    continue;
                };
                // A missing value clears the field back to blank.
                let value = parts.next().unwrap_or("");
                let updated = match field {
                    "year" => editor.set_year(id, value),
                    "revenue" => editor.set_revenue(id, value),
                    _ => editor.set_profit(id, value),
                };
                if updated {
                    render(&editor);
                } else {
                    stale_handle(id);
                }
            }
            Some("save") => save(&mut editor, client).await,
            Some("quit" | "q" | "exit" | "done") => break,
            Some(other) => {
                println!(
                    "{}",
                    ui::style_text(
                        &format!("Unknown command {other:?}. Type `help`."),
                        ui::StyleType::Warning
                    )
                );
            }
        }
    }

    Ok(())
}

async fn save(editor: &mut FinancialHistoryEditor, client: &ApiClient) {
    let normalized = editor.serialize();
    for warning in &normalized.warnings {
        println!(
            "{}",
            ui::style_text(warning.user_message(), ui::StyleType::Warning)
        );
    }

    let spinner = ui::new_spinner("Updating financials...");
    let result = editor.submit(client, normalized.records).await;
    spinner.finish_and_clear();

    match result {
        Ok(message) => {
            println!("{}", ui::style_text(&message, ui::StyleType::Success));
            println!(
                "Years operating (proposed): {}",
                ui::style_text(&editor.years_operating().to_string(), ui::StyleType::TotalValue)
            );
        }
        Err(e) => {
            // Editing state is untouched; the user can fix up and retry.
            println!(
                "{}",
                ui::style_text(&format!("Financials update failed: {e}"), ui::StyleType::Error)
            );
        }
    }
}

fn render(editor: &FinancialHistoryEditor) {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Record"),
        ui::header_cell("Year"),
        ui::header_cell("Revenue ($)"),
        ui::header_cell("Profit/Loss ($)"),
    ]);
    for entry in editor.entries() {
        table.add_row(vec![
            Cell::new(format!("#{}", entry.id)),
            Cell::new(&entry.draft.year),
            Cell::new(&entry.draft.revenue),
            Cell::new(&entry.draft.profit),
        ]);
    }
    println!("{table}");
    println!(
        "{} {}",
        ui::style_text("Years operating (proposed):", ui::StyleType::TotalLabel),
        ui::style_text(&editor.years_operating().to_string(), ui::StyleType::TotalValue)
    );
}

fn print_help() {
    println!("Commands:");
    println!("  add                      append a blank record");
    println!("  rm <record>              remove a record");
    println!("  year <record> [value]    set (or blank) a record's year");
    println!("  revenue <record> [value] set (or blank) a record's revenue");
    println!("  profit <record> [value]  set (or blank) a record's profit/loss");
    println!("  list                     show the current records");
    println!("  save                     submit the history to the marketplace");
    println!("  quit                     leave without saving pending edits");
}

fn parse_handle(arg: Option<&str>) -> Option<HandleId> {
    arg?.trim_start_matches('#').parse().ok()
}

fn stale_handle(id: HandleId) {
    println!(
        "{}",
        ui::style_text(&format!("No record #{id}."), ui::StyleType::Warning)
    );
}

fn usage(usage: &str) {
    println!(
        "{}",
        ui::style_text(&format!("Usage: {usage}"), ui::StyleType::Warning)
    );
}

/// First year not yet present in the drafts: one past the latest drafted
/// year, or last calendar year when nothing parses.
fn suggest_year(editor: &FinancialHistoryEditor) -> i32 {
    editor
        .entries()
        .iter()
        .filter_map(|entry| entry.draft.year.trim().parse::<i32>().ok())
        .max()
        .map_or_else(|| chrono::Local::now().year() - 1, |year| year + 1)
}
