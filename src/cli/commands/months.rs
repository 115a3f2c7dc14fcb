use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::Core;
use crate::errors::AppResult;
use crate::ui::labels::label;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if !matches!(cmd, Commands::Months) {
        return Ok(());
    }

    let core = Core::open(cfg)?;
    let list = core.months(&core.operator_session(cfg.default_language))?;

    if list.months.is_empty() {
        info(label(cfg.default_language, "no_months"));
        return Ok(());
    }

    for m in &list.months {
        let marker = if list.default.as_deref() == Some(m.as_str()) { " *" } else { "" };
        println!("{m}{marker}");
    }
    Ok(())
}
