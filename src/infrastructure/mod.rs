pub mod gemini;
pub mod google;
pub mod http_gateway;
