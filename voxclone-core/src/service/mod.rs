pub mod http;
pub mod mock;
pub mod provider;

pub use http::HttpSynthesisService;
pub use provider::SynthesisService;
