use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "SURVEYOR_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Pick the filter directive: flag, then `SURVEYOR_LOG`, then config.
pub fn select_filter(flag: Option<&str>, env: Option<&str>, config: Option<&str>) -> String {
    flag.or(env)
        .or(config)
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Install the stderr subscriber. Stdout stays reserved for command output.
pub fn init(flag: Option<&str>, config: Option<&str>) {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let directive = select_filter(flag, env.as_deref(), config);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("warning: invalid log filter `{directive}` ({e}); using `{DEFAULT_FILTER}`");
        EnvFilter::new(DEFAULT_FILTER)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
