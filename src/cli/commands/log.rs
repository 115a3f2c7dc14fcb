use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::Core;
use crate::core::log::LogLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        let core = Core::open(cfg)?;
        LogLogic::print_log(core.store())?;
    }

    Ok(())
}
