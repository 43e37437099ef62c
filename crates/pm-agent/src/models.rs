//! These models represent the objects passed around by the agent
//!
//! There are two formats we need to interact with:
//! - anthropic messages/tools, sent from the agent to the LLM
//! - tool requests, sent from the agent to the systems providing capabilities
//!
//! We always immediately convert the provider format into these internal structs
//! using the helpers in `providers::utils`, so the agent loop never sees raw JSON
//! from the wire.
pub mod content;
pub mod message;
pub mod role;
pub mod tool;
