use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Крейты рабочего пространства, к которым относится `LOG_LEVEL`.
const OWN_TARGETS: [&str; 3] = ["blog_cli", "blog_client", "blog_core"];

/// Директива фильтра: свои крейты на уровне `level`, зависимости
/// (reqwest, hyper) не громче `warn`.
fn directive(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }

    let mut directive = String::from("warn");
    for target in OWN_TARGETS {
        directive.push_str(&format!(",{target}={level}"));
    }
    directive
}

/// Логи идут в stderr, чтобы не смешиваться с выводом команд.
/// `RUST_LOG` имеет приоритет над `LOG_LEVEL`, `verbose` поднимает уровень
/// до `debug`.
pub fn init_logging(log_level: &str, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { log_level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive(level)))
        .map_err(|e| anyhow!("invalid log level {level:?}: {e}"))?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(verbose)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_level_applies_to_own_crates_only() {
        assert_eq!(
            directive(" info "),
            "warn,blog_cli=info,blog_client=info,blog_core=info"
        );
    }

    #[test]
    fn explicit_directives_are_kept() {
        assert_eq!(directive("reqwest=debug"), "reqwest=debug");
        assert_eq!(directive("warn,blog_core=trace"), "warn,blog_core=trace");
    }

    #[test]
    fn built_directive_is_a_valid_filter() {
        assert!(EnvFilter::try_new(directive("debug")).is_ok());
    }
}
