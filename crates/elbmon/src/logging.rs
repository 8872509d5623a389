use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr so stdout stays pure
/// Graphite plaintext.
pub fn init(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("elbmon={level}").parse()?)
                .add_directive(format!("elbmon_cloud={level}").parse()?)
                .add_directive(format!("elbmon_output={level}").parse()?),
        )
        .init();
    Ok(())
}
