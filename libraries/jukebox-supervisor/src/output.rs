/// Forwarding of child stdout/stderr into the log
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

#[derive(Debug, Clone, Copy)]
pub(crate) enum OutputStream {
    Stdout,
    Stderr,
}

/// Log every line of `reader` until EOF. Lines are not parsed.
pub(crate) async fn forward_lines<R>(reader: R, pid: Option<u32>, stream: OutputStream)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match stream {
                OutputStream::Stdout => {
                    tracing::info!(target: "jukebox_supervisor::child", pid = ?pid, "{}", line);
                }
                OutputStream::Stderr => {
                    tracing::warn!(target: "jukebox_supervisor::child", pid = ?pid, "{}", line);
                }
            },
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(pid = ?pid, error = %e, "Stopped reading child output");
                break;
            }
        }
    }
}
