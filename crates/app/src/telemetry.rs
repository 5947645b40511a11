//! Tracing subscriber setup for the binary.
//!
//! `QUIZ_LOG` holds the filter directives (default `info`).
//! `QUIZ_LOG_FORMAT=json` switches to JSON lines; anything else prints plain text.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("QUIZ_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match std::env::var("QUIZ_LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
