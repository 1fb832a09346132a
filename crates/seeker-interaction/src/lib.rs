//! HTTP side of the client: the analysis stream and the REST collaborators.

pub mod analysis_client;
pub mod api_client;
mod http;
pub mod line_buffer;
pub mod stream_reader;

pub use analysis_client::AnalysisClient;
pub use api_client::{ApiClient, CreditBalance};
pub use line_buffer::LineBuffer;
pub use stream_reader::StreamReader;
