use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::Core;
use crate::errors::AppResult;
use crate::ui::labels::label;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkin { account } = cmd {
        let core = Core::open(cfg)?;
        let receipt = core.check_in_as(account)?;

        success(format!(
            "{}: {}{} {} ({})",
            receipt.identity,
            label(cfg.default_language, "checkin_success"),
            receipt.date,
            receipt.time,
            receipt.partition
        ));
    }
    Ok(())
}
