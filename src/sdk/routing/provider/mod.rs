pub mod http;
pub mod remote;
pub mod types;

pub use http::{HttpClient, ReqwestHttpClient};
pub use remote::RemoteProvider;
