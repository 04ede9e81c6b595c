use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins when set; otherwise `info` with the HTTP stack quieted.
/// Logs go to stderr so stdout only ever carries JSON documents.
pub fn setup_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info")
            .add_directive("reqwest=warn".parse().expect("static directive"))
            .add_directive("hyper=warn".parse().expect("static directive"))
    });

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(true)
        .compact()
        .with_env_filter(filter)
        .init();
}
