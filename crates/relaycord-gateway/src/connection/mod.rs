//! Connection management
//!
//! Transport seam, the WebSocket implementation, and the per-connection
//! tasks (writer and heartbeat).

mod heartbeat;
mod state;
mod transport;
mod websocket;
mod writer;

pub use heartbeat::{Heartbeat, DEFAULT_HEARTBEAT_INTERVAL};
pub use state::{Connection, ConnectionState};
pub use transport::{Connector, FrameSink, FrameStream, TransportError, TransportLink};
pub use websocket::WebSocketConnector;
pub use writer::{spawn_writer, writer_failure};
