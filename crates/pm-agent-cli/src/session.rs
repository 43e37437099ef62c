use anyhow::Result;
use futures::StreamExt;

use crate::prompt::{InputType, Prompt};
use pm_agent::agent::Agent;
use pm_agent::models::message::Message;

#[cfg(test)]
mod mock_provider;

#[derive(Debug, PartialEq)]
enum TurnOutcome {
    Completed,
    Interrupted,
}

pub struct Session<'a> {
    agent: Agent,
    prompt: Box<dyn Prompt + 'a>,
}

impl<'a> Session<'a> {
    pub fn new(agent: Agent, prompt: Box<impl Prompt + 'a>) -> Self {
        Session { agent, prompt }
    }

    pub async fn start(&mut self) -> Result<()> {
        self.prompt.agent_ready();

        loop {
            let input = self.prompt.get_input()?;
            let content = match input.input_type {
                InputType::Message => match input.content {
                    Some(content) => content,
                    None => continue,
                },
                InputType::Exit => break,
                InputType::AskAgain => continue,
            };

            // No history is carried between requests
            let messages = vec![Message::user().with_text(content)];

            self.prompt.show_busy();
            let outcome = self.agent_process_messages(&messages).await;
            self.prompt.hide_busy();

            if outcome == TurnOutcome::Interrupted {
                break;
            }
        }

        self.prompt.close();
        Ok(())
    }

    async fn agent_process_messages(&mut self, messages: &[Message]) -> TurnOutcome {
        let mut stream = match self.agent.reply(messages).await {
            Ok(stream) => stream,
            Err(e) => {
                self.prompt.render_error(&format!("{:#}", e));
                return TurnOutcome::Completed;
            }
        };

        loop {
            tokio::select! {
                response = stream.next() => {
                    match response {
                        Some(Ok(message)) => self.prompt.render(Box::new(message)),
                        Some(Err(e)) => {
                            tracing::debug!("turn failed: {:?}", e);
                            self.prompt.render_error(&format!("{:#}", e));
                            break;
                        }
                        None => break,
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    drop(stream);
                    self.prompt.render(raw_message("Interrupted. Ending the session.\n"));
                    return TurnOutcome::Interrupted;
                }
            }
        }

        TurnOutcome::Completed
    }
}

fn raw_message(content: &str) -> Box<Message> {
    Box::new(Message::assistant().with_text(content))
}
