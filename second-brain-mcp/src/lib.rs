//! The MCP server: a thin JSON-RPC transport dispatching tool calls into
//! the `second-brain-agents` fleet.

pub mod dispatch;
pub mod health;
pub mod jsonrpc;

pub use dispatch::dispatch;
