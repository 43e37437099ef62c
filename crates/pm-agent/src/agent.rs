use anyhow::Result;
use futures::stream::BoxStream;
use futures::TryStreamExt;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

use crate::errors::{AgentError, AgentResult};
use crate::models::content::Content;
use crate::models::message::{Message, ToolRequest};
use crate::models::tool::{Tool, ToolCall};
use crate::prompt_template::{load_prompt, SYSTEM_PROMPT};
use crate::providers::base::{Completion, Provider, StopReason};
use crate::systems::System;

/// Upper bound on model calls within a single reply
pub const DEFAULT_MAX_TURNS: usize = 10;

#[derive(Clone, Debug, Serialize)]
struct SystemInfo {
    name: String,
    description: String,
    instructions: String,
}

impl SystemInfo {
    fn new(name: &str, description: &str, instructions: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            instructions: instructions.to_string(),
        }
    }
}

/// Agent integrates a foundational LLM with the systems it needs to pilot
pub struct Agent {
    systems: Vec<Box<dyn System>>,
    provider: Box<dyn Provider>,
    max_turns: usize,
}

impl Agent {
    /// Create a new Agent with the specified provider
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self {
            systems: Vec::new(),
            provider,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Limit how many times the provider is called before a reply gives up
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    /// Add a system to the agent
    pub fn add_system(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
    }

    /// Get all tools from all systems
    fn get_tools(&self) -> Vec<Tool> {
        self.systems
            .iter()
            .flat_map(|system| system.tools().iter().cloned())
            .collect()
    }

    /// Find the system that owns a tool
    fn get_system_for_tool(&self, name: &str) -> Option<&dyn System> {
        self.systems
            .iter()
            .find(|sys| sys.has_tool(name))
            .map(|v| &**v)
    }

    /// Dispatch a single tool call to the appropriate system. A name no system
    /// owns comes back as an error payload the model reads like any other result.
    async fn dispatch_tool_call(
        &self,
        tool_call: AgentResult<ToolCall>,
    ) -> AgentResult<Vec<Content>> {
        let call = tool_call?;
        let Some(system) = self.get_system_for_tool(&call.name) else {
            tracing::debug!(tool = %call.name, "no system owns tool");
            return Ok(vec![Content::json(
                &json!({"error": format!("Unknown tool: {}", call.name)}),
            )]);
        };

        tracing::debug!(tool = %call.name, system = system.name(), "dispatching tool call");
        let result = system.call(call).await;
        if let Err(e) = &result {
            tracing::debug!(error = %e, "tool call failed");
        }
        result
    }

    fn get_system_prompt(&self) -> AgentResult<String> {
        let mut context = HashMap::new();
        let systems_info: Vec<SystemInfo> = self
            .systems
            .iter()
            .map(|system| {
                SystemInfo::new(system.name(), system.description(), system.instructions())
            })
            .collect();

        context.insert("systems", systems_info);
        load_prompt(SYSTEM_PROMPT, &context).map_err(|e| AgentError::Internal(e.to_string()))
    }

    /// Create a stream that yields each message as it's generated by the agent.
    /// This includes both the assistant's responses and any tool responses.
    ///
    /// The stream ends after the model finishes its turn. An unrecognized stop reason
    /// ends it early with an explanatory assistant message instead of looping.
    pub async fn reply(&self, messages: &[Message]) -> Result<BoxStream<'_, Result<Message>>> {
        let mut messages = messages.to_vec();
        let tools = self.get_tools();
        let system_prompt = self.get_system_prompt()?;
        let max_turns = self.max_turns;

        Ok(Box::pin(async_stream::try_stream! {
            let mut turns = 0;
            loop {
                if turns == max_turns {
                    Err::<(), _>(AgentError::MaxTurnsExceeded(max_turns))?;
                }
                turns += 1;

                let Completion { message: response, stop_reason, .. } = self
                    .provider
                    .complete(&system_prompt, &messages, &tools)
                    .await?;

                match stop_reason {
                    StopReason::EndTurn => {
                        yield response;
                        break;
                    }
                    StopReason::ToolUse => {}
                    StopReason::Other(reason) => {
                        tracing::warn!(%reason, "unexpected stop reason, ending reply");
                        yield Message::assistant()
                            .with_text(format!("Unexpected stop reason: {}", reason));
                        break;
                    }
                }

                yield response.clone();

                let tool_requests: Vec<ToolRequest> =
                    response.tool_requests().into_iter().cloned().collect();
                if tool_requests.is_empty() {
                    Err::<(), _>(AgentError::Internal(
                        "Model asked to use tools but sent no tool requests".to_string(),
                    ))?;
                }

                // Run each request in the order the model emitted it; a failure becomes an
                // error result for that request and the rest of the batch still runs
                let mut message_tool_response = Message::user();
                for request in tool_requests {
                    let output = self.dispatch_tool_call(request.tool_call).await;
                    message_tool_response =
                        message_tool_response.with_tool_response(request.id, output);
                }

                yield message_tool_response.clone();

                messages.push(response);
                messages.push(message_tool_response);
            }
        }))
    }

    /// Answer a single prompt in a fresh conversation and return the final text
    pub async fn run(&self, prompt: &str) -> Result<String> {
        let messages = vec![Message::user().with_text(prompt)];
        let mut stream = self.reply(&messages).await?;

        let mut last = None;
        while let Some(message) = stream.try_next().await? {
            last = Some(message);
        }

        Ok(last.map(|message| message.text()).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::message::MessageContent;
    use crate::models::role::Role;
    use crate::product::ProductSystem;
    use crate::providers::base::Usage;
    use crate::providers::mock::{end_turn, tool_use, MockProvider};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // Mock system for testing
    struct MockSystem {
        name: String,
        tools: Vec<Tool>,
        calls: Arc<AtomicUsize>,
    }

    impl MockSystem {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                tools: vec![Tool::new(
                    "echo",
                    "Echoes back the input",
                    json!({"type": "object", "properties": {"message": {"type": "string"}}, "required": ["message"]}),
                )],
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl System for MockSystem {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "A mock system for testing"
        }

        fn instructions(&self) -> &str {
            "Mock system instructions"
        }

        fn tools(&self) -> &[Tool] {
            &self.tools
        }

        async fn call(&self, tool_call: ToolCall) -> AgentResult<Vec<Content>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match tool_call.name.as_str() {
                "echo" => Ok(vec![Content::text(
                    tool_call.arguments["message"].as_str().unwrap_or(""),
                )]),
                _ => Err(AgentError::ToolNotFound(tool_call.name)),
            }
        }
    }

    async fn collect(agent: &Agent, text: &str) -> Result<Vec<Message>> {
        let mut stream = agent.reply(&[Message::user().with_text(text)]).await?;
        let mut messages = Vec::new();
        while let Some(msg) = stream.try_next().await? {
            messages.push(msg);
        }
        Ok(messages)
    }

    fn tool_responses(message: &Message) -> Vec<(String, AgentResult<Vec<Content>>)> {
        message
            .content
            .iter()
            .filter_map(|c| c.as_tool_response())
            .map(|r| (r.id.clone(), r.tool_result.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_simple_response() -> Result<()> {
        let response = Message::assistant().with_text("Hello!");
        let provider = MockProvider::new(vec![end_turn(response.clone())]);
        let agent = Agent::new(Box::new(provider));

        let messages = collect(&agent, "Hi").await?;

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], response);
        Ok(())
    }

    #[tokio::test]
    async fn test_one_tool_round_then_final_text() -> Result<()> {
        let provider = MockProvider::new(vec![
            tool_use(Message::assistant().with_tool_request(
                "toolu_1",
                Ok(ToolCall::new("echo", json!({"message": "test"}))),
            )),
            end_turn(Message::assistant().with_text("Done!")),
        ]);
        let requests = provider.requests();
        let mut agent = Agent::new(Box::new(provider));
        let system = MockSystem::new("test");
        let calls = Arc::clone(&system.calls);
        agent.add_system(Box::new(system));

        let messages = collect(&agent, "Echo test").await?;

        // Tool request, tool response, final text
        assert_eq!(messages.len(), 3);
        assert!(messages[0]
            .content
            .iter()
            .any(|c| matches!(c, MessageContent::ToolRequest(_))));
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(
            tool_responses(&messages[1]),
            vec![("toolu_1".to_string(), Ok(vec![Content::text("test")]))]
        );
        assert_eq!(messages[2].content[0], MessageContent::text("Done!"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The second request carries the assistant tool request and exactly one result message
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].len(), 1);
        assert_eq!(requests[1].len(), 3);
        assert_eq!(requests[1][1].role, Role::Assistant);
        assert_eq!(requests[1][2], messages[1]);
        Ok(())
    }

    #[tokio::test]
    async fn test_run_returns_concatenated_text() -> Result<()> {
        let mut agent = Agent::new(Box::new(MockProvider::new(vec![
            tool_use(
                Message::assistant()
                    .with_text("Checking capacity.")
                    .with_tool_request(
                        "toolu_9",
                        Ok(ToolCall::new(
                            "check_team_capacity",
                            json!({"team": "frontend", "time_period": "next_sprint"}),
                        )),
                    ),
            ),
            end_turn(
                Message::assistant()
                    .with_text("Frontend is at 87.5%. ")
                    .with_text("Avoid adding scope."),
            ),
        ])));
        agent.add_system(Box::new(ProductSystem::default()));

        let answer = agent.run("Can frontend take the new feature?").await?;
        assert_eq!(answer, "Frontend is at 87.5%. Avoid adding scope.");
        Ok(())
    }

    #[tokio::test]
    async fn test_product_tool_result_is_fed_back() -> Result<()> {
        let provider = MockProvider::new(vec![
            tool_use(Message::assistant().with_tool_request(
                "toolu_2",
                Ok(ToolCall::new("check_team_capacity", json!({"team": "backend", "time_period": "next_sprint"}))),
            )),
            end_turn(Message::assistant().with_text("Backend has room.")),
        ]);
        let mut agent = Agent::new(Box::new(provider));
        agent.add_system(Box::new(ProductSystem::default()));

        let messages = collect(&agent, "How loaded is backend?").await?;
        let responses = tool_responses(&messages[1]);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].0, "toolu_2");

        let contents = responses[0].1.as_ref().unwrap();
        let value: Value = serde_json::from_str(contents[0].as_text().unwrap())?;
        assert_eq!(value["utilization"], "76.0%");
        assert_eq!(value["recommendation"], "Good capacity");
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_tool() -> Result<()> {
        let mut agent = Agent::new(Box::new(MockProvider::new(vec![
            tool_use(
                Message::assistant()
                    .with_tool_request("1", Ok(ToolCall::new("invalid_tool", json!({})))),
            ),
            end_turn(Message::assistant().with_text("Error occurred")),
        ])));

        agent.add_system(Box::new(MockSystem::new("test")));

        let messages = collect(&agent, "Invalid tool").await?;

        // Tool request, unknown-tool payload as a normal result, and model text
        assert_eq!(messages.len(), 3);
        assert_eq!(
            tool_responses(&messages[1]),
            vec![(
                "1".to_string(),
                Ok(vec![Content::json(&json!({"error": "Unknown tool: invalid_tool"}))])
            )]
        );
        assert_eq!(messages[2].content[0], MessageContent::text("Error occurred"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_tool_gets_error_payload() -> Result<()> {
        let mut agent = Agent::new(Box::new(MockProvider::new(vec![
            tool_use(
                Message::assistant()
                    .with_tool_request("toolu_7", Ok(ToolCall::new("summarize_feedback", json!({})))),
            ),
            end_turn(Message::assistant().with_text("I can't summarize feedback.")),
        ])));
        agent.add_system(Box::new(ProductSystem::default()));

        let messages = collect(&agent, "Summarize last week's feedback").await?;
        let responses = tool_responses(&messages[1]);
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].0, "toolu_7");

        let contents = responses[0].1.as_ref().unwrap();
        let value: Value = serde_json::from_str(contents[0].as_text().unwrap())?;
        assert_eq!(value, json!({"error": "Unknown tool: summarize_feedback"}));
        Ok(())
    }

    #[tokio::test]
    async fn test_multiple_tool_calls_keep_order_and_ids() -> Result<()> {
        let mut agent = Agent::new(Box::new(MockProvider::new(vec![
            tool_use(
                Message::assistant()
                    .with_tool_request("1", Ok(ToolCall::new("echo", json!({"message": "first"}))))
                    .with_tool_request(
                        "2",
                        Ok(ToolCall::new("echo", json!({"message": "second"}))),
                    ),
            ),
            end_turn(Message::assistant().with_text("All done!")),
        ])));

        agent.add_system(Box::new(MockSystem::new("test")));

        let messages = collect(&agent, "Multiple calls").await?;

        assert_eq!(messages.len(), 3);
        assert_eq!(
            tool_responses(&messages[1]),
            vec![
                ("1".to_string(), Ok(vec![Content::text("first")])),
                ("2".to_string(), Ok(vec![Content::text("second")])),
            ]
        );
        assert_eq!(messages[2].content[0], MessageContent::text("All done!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_call_does_not_abort_batch() -> Result<()> {
        let mut agent = Agent::new(Box::new(MockProvider::new(vec![
            tool_use(
                Message::assistant()
                    .with_tool_request(
                        "a",
                        Ok(ToolCall::new(
                            "calculate_rice_score",
                            json!({"feature_name": "SSO", "reach": 100, "impact": 1, "confidence": 80, "effort": 0}),
                        )),
                    )
                    .with_tool_request(
                        "b",
                        Ok(ToolCall::new("get_roadmap", json!({"quarter": "current"}))),
                    ),
            ),
            end_turn(Message::assistant().with_text("Effort needs to be positive.")),
        ])));
        agent.add_system(Box::new(ProductSystem::default()));

        let messages = collect(&agent, "Score SSO").await?;
        let responses = tool_responses(&messages[1]);

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].0, "a");
        assert!(matches!(
            responses[0].1,
            Err(AgentError::InvalidParameters(_))
        ));
        assert_eq!(responses[1].0, "b");
        assert!(responses[1].1.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_unexpected_stop_reason_ends_reply() -> Result<()> {
        let provider = MockProvider::new(vec![
            Completion::new(
                Message::assistant().with_text("truncated"),
                StopReason::Other("max_tokens".to_string()),
                Usage::default(),
            ),
            end_turn(Message::assistant().with_text("never sent")),
        ]);
        let requests = provider.requests();
        let agent = Agent::new(Box::new(provider));

        let answer = agent.run("Write a long PRD").await?;
        assert_eq!(answer, "Unexpected stop reason: max_tokens");
        assert_eq!(requests.lock().unwrap().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_max_turns_exceeded() -> Result<()> {
        let looping: Vec<Completion> = (0..5)
            .map(|i| {
                tool_use(Message::assistant().with_tool_request(
                    format!("toolu_{}", i),
                    Ok(ToolCall::new("echo", json!({"message": "again"}))),
                ))
            })
            .collect();
        let provider = MockProvider::new(looping);
        let requests = provider.requests();
        let mut agent = Agent::new(Box::new(provider)).with_max_turns(3);
        agent.add_system(Box::new(MockSystem::new("test")));

        let err = agent.run("Loop forever").await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<AgentError>(),
            Some(&AgentError::MaxTurnsExceeded(3))
        );
        assert_eq!(requests.lock().unwrap().len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_tool_use_without_requests_is_an_error() -> Result<()> {
        let agent = Agent::new(Box::new(MockProvider::new(vec![tool_use(
            Message::assistant().with_text("I will use a tool"),
        )])));

        let err = agent.run("Hi").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AgentError>(),
            Some(AgentError::Internal(_))
        ));
        Ok(())
    }

    #[test]
    fn test_system_prompt_includes_systems() -> Result<()> {
        let mut agent = Agent::new(Box::new(MockProvider::new(vec![])));
        agent.add_system(Box::new(ProductSystem::default()));

        let prompt = agent.get_system_prompt()?;
        assert!(prompt.contains("experienced product manager"));
        assert!(prompt.contains("## ProductSystem"));
        assert!(prompt.contains("Known engineering teams"));
        Ok(())
    }

    #[test]
    fn test_tools_are_collected_from_systems() {
        let mut agent = Agent::new(Box::new(MockProvider::new(vec![])));
        agent.add_system(Box::new(MockSystem::new("test")));
        agent.add_system(Box::new(ProductSystem::default()));

        let names: Vec<_> = agent.get_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names.len(), 6);
        assert_eq!(names[0], "echo");
        assert!(agent.get_system_for_tool("get_roadmap").is_some());
        assert!(agent.get_system_for_tool("bash").is_none());
    }
}
