use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use log::Level;
use std::fmt::Display;

/// External crates only need to log warnings and errors
const ALLOWED_EXTERNAL_LEVELS: [Level; 2] = [Level::Warn, Level::Error];
const ALLOWED_LEVELS: [Level; 3] = [Level::Info, Level::Warn, Level::Error];

/// Install the stdout logger. Fails if a logger is already set.
pub fn init_logger() -> AppResult<()> {
    fern::Dispatch::new()
        .format(move |out, message, record| {
            let target = Target::from_str(record.target());
            let now = chrono::Local::now();

            out.finish(format_args!(
                "{:^5} {} {} {}",
                level_to_string(&record.level()),
                Colour::Fixed(8).paint(now.format("%H:%M:%S").to_string()),
                target,
                message
            ))
        })
        .filter(|meta| {
            let target = Target::from_str(meta.target());

            let is_allowed = ALLOWED_LEVELS.contains(&meta.level());
            let is_severe = ALLOWED_EXTERNAL_LEVELS.contains(&meta.level());

            target.is_local() && is_allowed || is_severe
        })
        .chain(std::io::stdout())
        .apply()
        .map_err(|e| AppError::Other(format!("logger already initialised: {e}")))
}

#[derive(Debug, PartialEq, Eq)]
enum Target {
    External(String),
    Web,
    Core,
    Store,
    Cli,
}

impl Target {
    fn from_str(target: &str) -> Self {
        let mut split = target.split("::");
        let krate = split.next().unwrap_or_default();

        if krate != "rcheckin" {
            return Target::External(krate.to_string());
        }

        match split.next() {
            Some("web") => Self::Web,
            Some("store") => Self::Store,
            Some("cli") => Self::Cli,
            _ => Self::Core,
        }
    }

    fn is_local(&self) -> bool {
        !matches!(self, Self::External(_))
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let padded = |s: &str| format!("{s:^8}");
        let result = match self {
            Target::External(x) => Colour::White.paint(padded(x)),
            Target::Web => Colour::Green.bold().paint(padded("WEB")),
            Target::Core => Colour::Blue.paint(padded("CORE")),
            Target::Store => Colour::Purple.paint(padded("STORE")),
            Target::Cli => Colour::Cyan.paint(padded("CLI")),
        };

        Display::fmt(&result, f)
    }
}

fn level_to_string(level: &Level) -> String {
    match level {
        Level::Error => Colour::Black.on(Colour::Red).bold().paint(" ERR ").to_string(),
        Level::Warn => Colour::Black.on(Colour::Yellow).bold().paint(" WRN ").to_string(),
        Level::Info => Colour::Black.on(Colour::Blue).bold().paint(" INF ").to_string(),
        Level::Debug => Colour::White.on(Colour::Black).paint(" DBG ").to_string(),
        Level::Trace => " TRC ".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_from_module_paths() {
        assert_eq!(Target::from_str("rcheckin::web::auth"), Target::Web);
        assert_eq!(Target::from_str("rcheckin::store::sqlite"), Target::Store);
        assert_eq!(Target::from_str("rcheckin::core::ledger"), Target::Core);
        assert_eq!(Target::from_str("rcheckin"), Target::Core);
        assert_eq!(
            Target::from_str("hyper::proto"),
            Target::External("hyper".to_string())
        );
        assert!(!Target::from_str("tower_http").is_local());
    }
}
