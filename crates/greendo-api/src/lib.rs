// greendo-api: Async transport for the Ryobi GDO cloud (REST session + relay RPC)

pub mod error;
pub mod rest;
pub mod rpc;
pub mod session;
pub mod transport;

pub use error::Error;
pub use rest::{DEFAULT_API_URL, ResponseEnvelope, ResponseError, RestClient};
pub use rpc::{DEFAULT_SOCKET_URL, RpcChannel};
pub use session::Session;
pub use transport::{TlsMode, TransportConfig};
