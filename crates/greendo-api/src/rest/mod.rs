// Vendor REST API
//
// Cookie-session client for the `/api` endpoints: login, logout, device
// list and device detail, with every reply classified into a
// `ResponseEnvelope`.

pub mod auth;
pub mod client;
pub mod devices;
pub mod response;

pub use client::{DEFAULT_API_URL, RestClient};
pub use response::{ResponseEnvelope, ResponseError, truthy};
