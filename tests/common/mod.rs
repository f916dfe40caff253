//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;

use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// One recorded metric: name, ordered labels, value.
pub type Series = (String, Vec<(String, String)>, DebugValue);

/// Start a mock storage backend that answers every connection with the same response.
///
/// `headers` are written verbatim, e.g. `"x-amz-request-id: abc123\r\n"`.
pub async fn start_mock_storage(status_line: &'static str, headers: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut request = Vec::new();
                        let mut buf = [0u8; 1024];
                        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => request.extend_from_slice(&buf[..n]),
                            }
                        }

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
                            status_line,
                            body.len(),
                            headers,
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Run `fut` on a current-thread runtime with a debugging metrics recorder
/// installed for this thread, returning its output and every recorded series.
pub fn with_recorded_metrics<F, T>(fut: F) -> (T, Vec<Series>)
where
    F: Future<Output = T>,
{
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let output = metrics::with_local_recorder(&recorder, || runtime.block_on(fut));

    let series = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(key, _, _, value)| {
            let key = key.key();
            let labels = key
                .labels()
                .map(|label| (label.key().to_string(), label.value().to_string()))
                .collect();
            (key.name().to_string(), labels, value)
        })
        .collect();

    (output, series)
}

/// Value of label `name` on `series`.
#[allow(dead_code)]
pub fn label<'a>(series: &'a Series, name: &str) -> Option<&'a str> {
    series
        .1
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
