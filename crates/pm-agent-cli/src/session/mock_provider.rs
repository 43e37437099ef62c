use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use pm_agent::models::message::Message;
use pm_agent::models::tool::Tool;
use pm_agent::providers::base::{Completion, Provider, StopReason, Usage};

/// The library's mock provider is only built for its own tests, so the shell keeps
/// a scripted one here. An `Err` entry simulates a failed API call.
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Result<Completion, String>>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockProvider {
    pub fn new(responses: Vec<Result<Completion, String>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<Vec<Message>>>> {
        Arc::clone(&self.requests)
    }
}

pub fn end_turn(text: &str) -> Result<Completion, String> {
    Ok(Completion::new(
        Message::assistant().with_text(text),
        StopReason::EndTurn,
        Usage::default(),
    ))
}

pub fn tool_use(message: Message) -> Result<Completion, String> {
    Ok(Completion::new(message, StopReason::ToolUse, Usage::default()))
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        _system_prompt: &str,
        messages: &[Message],
        _tools: &[Tool],
    ) -> Result<Completion> {
        self.requests.lock().unwrap().push(messages.to_vec());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Ok(Completion::new(
                Message::assistant().with_text(""),
                StopReason::EndTurn,
                Usage::default(),
            ));
        }
        responses.remove(0).map_err(|e| anyhow!(e))
    }
}
