//! Integration test utilities for relaycord
//!
//! Mock gateway and REST doubles plus frame fixtures for end-to-end tests
//! of the client, cache and REST layers together.

pub mod helpers;
pub mod mock_gateway;
pub mod mock_http;
pub mod ws_gateway;

pub use fixtures::*;
pub use helpers::*;
pub use mock_gateway::{mock_gateway, MockConnection, MockConnector, MockGateway};
pub use mock_http::{MockHttp, RecordedRequest};
pub use ws_gateway::{WsGateway, WsPeer};
