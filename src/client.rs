use std::io;
use std::net::{Ipv4Addr, UdpSocket};

use tracing::trace;

/// A minimal non-blocking DogStatsD client.
///
/// Owns a UDP socket connected to the configured server and formats gauge samples as
/// `name:value|g|#tags` datagrams. The configured prefix and constant tags are applied to
/// every sample. Sends are fire-and-forget: failures are logged and the sample is dropped,
/// so emitting metrics can never block or fail the caller.
pub(crate) struct StatsdClient {
    socket: UdpSocket,
    prefix: String,
    // Precomputed `|g|#tag,...` trailer shared by every sample.
    trailer: Vec<u8>,
}

impl StatsdClient {
    pub fn connect(prefix: &str, hostname: &str, port: u16, tags: &[String]) -> io::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.connect((hostname, port))?;
        socket.set_nonblocking(true)?;

        let mut trailer = b"|g".to_vec();
        if !tags.is_empty() {
            trailer.extend_from_slice(b"|#");
            for (idx, tag) in tags.iter().enumerate() {
                if idx > 0 {
                    trailer.push(b',');
                }
                trailer.extend_from_slice(tag.as_bytes());
            }
        }

        Ok(StatsdClient { socket, prefix: prefix.to_string(), trailer })
    }

    /// Sends a single gauge sample, best-effort.
    pub fn send_gauge(&self, name: &str, value: f64) {
        let payload = self.render_gauge(name, value);
        if let Err(e) = self.socket.send(&payload) {
            trace!(error = %e, metric = name, "Failed to send gauge payload.");
        }
    }

    fn render_gauge(&self, name: &str, value: f64) -> Vec<u8> {
        let mut formatter = ryu::Buffer::new();
        let formatted_value = formatter.format(value);

        let mut payload = Vec::with_capacity(
            self.prefix.len() + 1 + name.len() + 1 + formatted_value.len() + self.trailer.len(),
        );
        if !self.prefix.is_empty() {
            payload.extend_from_slice(self.prefix.as_bytes());
            payload.push(b'.');
        }
        payload.extend_from_slice(name.as_bytes());
        payload.push(b':');
        payload.extend_from_slice(formatted_value.as_bytes());
        payload.extend_from_slice(&self.trailer);

        payload
    }
}
