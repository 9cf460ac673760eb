mod buffered;
mod config;
mod scope;

pub use buffered::{BufferedProducer, FlushReport, Producer};
pub use config::ProducerConfig;
pub use scope::ProducerScope;
