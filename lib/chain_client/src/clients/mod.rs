pub mod http;
pub mod mock;

pub use self::{http::HttpChainClient, mock::MockChainClient};
