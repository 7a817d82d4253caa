use crate::Remote;
use anet_core::types::LogSeverity;

pub fn run(
    remote: &Remote,
    severity: &str,
    page_url: &str,
    line: Option<u32>,
    message: &str,
) -> anyhow::Result<()> {
    let severity: LogSeverity = severity.parse()?;
    let client = remote.client();
    let rt = super::runtime()?;
    rt.block_on(client.log_on_server(severity, page_url, line, message))
        .map_err(|e| anyhow::anyhow!(e.display_message()))?;
    tracing::debug!(%severity, "log line sent");
    Ok(())
}
