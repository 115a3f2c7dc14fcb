use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::Core;
use crate::errors::AppResult;
use crate::export::{notify_export_success, write_bytes};
use crate::models::language::Language;
use crate::ui::messages::info;
use std::path::PathBuf;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Export {
        month,
        user,
        file,
        lang,
        force,
    } = cmd
    else {
        return Ok(());
    };

    let lang = match lang {
        Some(code) => Language::from_code(code)?,
        None => cfg.default_language,
    };

    let core = Core::open(cfg)?;
    let export = core.export(&core.operator_session(lang), month, user.as_deref())?;

    // a directory gets the default file name
    let mut path = PathBuf::from(file);
    if path.is_dir() {
        path = path.join(&export.file_name);
    }

    info(format!("Exporting to XLSX: {}", path.display()));
    write_bytes(&path, &export.bytes, *force)?;
    notify_export_success(&path);
    Ok(())
}
