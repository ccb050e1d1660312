//! Startup plumbing shared by the `clean-sysroot` and `rewrite-links` binaries.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Load `.env` (if present) so clap's `env` fallbacks can see it.
///
/// Variables already set in the real environment win.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Install the stderr tracing subscriber. `RUST_LOG` overrides the `warn` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Return the sysroot, or print `message` and the usage to stderr and exit 1.
///
/// clap's own "missing required argument" path exits with status 2, so the
/// sysroot is optional at the parser level and checked here instead.
pub fn require_sysroot(
    sysroot: Option<PathBuf>,
    message: &str,
    usage: impl std::fmt::Display,
) -> PathBuf {
    match sysroot {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => {
            eprintln!("{}", message);
            eprintln!("{}", usage);
            std::process::exit(1);
        }
    }
}
