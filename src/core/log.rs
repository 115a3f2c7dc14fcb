use crate::errors::AppResult;
use crate::store::{AuditEntry, SheetStore};
use ansi_term::Colour;

const OP_WIDTH_MAX: usize = 60;

fn color_for_operation(op: &str) -> Colour {
    match op {
        "user_add" | "user_enable" => Colour::Green,
        "user_del" => Colour::Red,
        "user_disable" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// `operation (target)`, cut to `max` visible characters.
fn op_target(entry: &AuditEntry, max: usize) -> String {
    let full = if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    };

    if full.chars().count() > max {
        let mut s: String = full.chars().take(max - 3).collect();
        s.push_str("...");
        s
    } else {
        full
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Render the audit trail, one line per entry.
    pub fn render(entries: &[AuditEntry]) -> Vec<String> {
        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);
        let op_w = entries
            .iter()
            .map(|e| op_target(e, OP_WIDTH_MAX).chars().count())
            .max()
            .unwrap_or(10);

        entries
            .iter()
            .map(|e| {
                let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                    .map(|dt| dt.format("%FT%T%:z").to_string())
                    .unwrap_or_else(|_| e.date.clone());

                let visible = op_target(e, OP_WIDTH_MAX);
                let padding = " ".repeat(op_w.saturating_sub(visible.chars().count()));

                // only the operation word is coloured
                let color = color_for_operation(&e.operation);
                let painted = match visible.split_once(' ') {
                    Some((op, rest)) => format!("{} {rest}", color.paint(op)),
                    None => color.paint(visible.as_str()).to_string(),
                };

                format!(
                    "{:>id_w$}: {:<date_w$} | {painted}{padding} => {}",
                    e.id, date, e.message
                )
            })
            .collect()
    }

    pub fn print_log(store: &dyn SheetStore) -> AppResult<()> {
        let entries = store.audit_log()?;

        println!("📜 Internal log:\n");
        for line in Self::render(&entries) {
            println!("{line}");
        }

        Ok(())
    }
}
