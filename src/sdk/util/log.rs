use env_logger::{Builder, Env};

// HTTP internals are chatty at debug level; keep them at warn unless asked.
const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper_util=warn";

/// Logs to stderr, filtered by `RUST_LOG`. Safe to call more than once.
pub fn init_logging() {
    let env = Env::default().default_filter_or(DEFAULT_FILTER);
    let _ = Builder::from_env(env)
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init();
}
