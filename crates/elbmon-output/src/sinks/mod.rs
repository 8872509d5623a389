mod memory;
mod tcp;
mod writer;

pub use memory::MemorySink;
pub use tcp::TcpSink;
pub use writer::WriterSink;
