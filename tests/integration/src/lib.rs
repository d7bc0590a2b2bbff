//! Integration tests for the stackput upload client.
//!
//! Each test spins an in-process S3-compatible stub server on an ephemeral
//! port and drives an `Uploader` over real HTTP through `HttpTransport`.

use std::net::SocketAddr;
use std::sync::Once;
use std::time::Duration;

use stackput_client::{HttpTransport, RetryPolicy, UploadConfig, Uploader};


mod test_recovery;
mod test_upload;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Create an uploader pointing at the stub server, with a fast test-grade
/// retry schedule.
#[must_use]
pub fn uploader_for(addr: SocketAddr, max_retries: u32) -> Uploader<HttpTransport> {
    init_tracing();

    let transport = HttpTransport::new(format!("http://{addr}")).expect("transport");
    let config = UploadConfig {
        timeout: Duration::from_secs(10),
        retry: RetryPolicy {
            min_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(20),
            factor: 2.0,
            max_retries,
        },
    };
    Uploader::new(transport, config)
}

/// Generate a unique object key for a test.
#[must_use]
pub fn test_key(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("/{prefix}-{id}.bin")
}

/// Payload with a position-dependent pattern so reordered or truncated chunks
/// cannot reassemble cleanly.
#[must_use]
pub fn patterned(len: usize) -> bytes::Bytes {
    let data: Vec<u8> = (0..len).map(|i| u8::try_from(i % 251).expect("fits")).collect();
    bytes::Bytes::from(data)
}
