pub mod duration;
pub mod http;
pub mod logging;
pub mod middleware;
pub mod shutdown;
