use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::Core;
use crate::errors::AppResult;
use crate::ui::labels::label;
use crate::ui::messages::{header, info, warning};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::History { month, user } = cmd else {
        return Ok(());
    };

    let lang = cfg.default_language;
    let core = Core::open(cfg)?;
    let view = core.history(&core.operator_session(lang), month, user.as_deref())?;

    header(format!("{} {}", label(lang, "history_title"), view.month));

    if let Some(notice) = view.notice {
        info(label(lang, notice.label_key()));
        return Ok(());
    }

    let mut table = Table::with_headers(&[
        label(lang, "col_index"),
        label(lang, "col_identity"),
        label(lang, "col_date"),
        label(lang, "col_time"),
    ]);
    for r in &view.rows {
        table.add_row(vec![
            r.index.to_string(),
            r.identity.clone(),
            r.date.clone(),
            r.time.clone(),
        ]);
    }
    print!("{}", table.render());

    if view.total_matched > view.rows.len() {
        info(format!("{} / {}", view.rows.len(), view.total_matched));
    }
    if view.skipped_malformed > 0 {
        warning(format!("{} {}", view.skipped_malformed, label(lang, "skipped_rows")));
    }
    Ok(())
}
