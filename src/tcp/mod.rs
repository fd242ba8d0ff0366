/// MBAP framing: decoding request ADUs and encoding response ADUs
pub mod frame;
/// TCP listener and per-connection session tasks
pub mod server;
