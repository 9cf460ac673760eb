mod context;
mod table;

pub use context::ProducerContext;
pub use table::QueueTable;
