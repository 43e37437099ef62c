use anyhow::Result;
use pm_agent::models::message::Message;

pub mod rustyline;
pub mod thinking;

/// Words that end the session, matched case-insensitively
const EXIT_COMMANDS: [&str; 3] = ["quit", "exit", "q"];

pub trait Prompt {
    fn render(&mut self, message: Box<Message>);
    fn render_error(&mut self, error: &str);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self);
    fn hide_busy(&self);
    fn close(&self);
    fn agent_ready(&self) {
        println!("\n");
        println!("Product Management Assistant");
        println!("Ask about feature priorities, user stories, metrics, the roadmap or team capacity.");
        println!("Type 'quit' to exit.");
        println!("\n");
    }
}

pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Optional content as sometimes the user may be issuing a command eg. (Exit)
}

#[derive(Debug, PartialEq)]
pub enum InputType {
    AskAgain, // Ask the user for input again. Control flow command.
    Message,  // User sent a message
    Exit,     // User wants to exit the session
}

impl Input {
    pub fn exit() -> Self {
        Input {
            input_type: InputType::Exit,
            content: None,
        }
    }

    /// Classify one line typed at the prompt
    pub fn parse(line: &str) -> Self {
        let text = line.trim();
        if text.is_empty() {
            Input {
                input_type: InputType::AskAgain,
                content: None,
            }
        } else if EXIT_COMMANDS
            .iter()
            .any(|command| text.eq_ignore_ascii_case(command))
        {
            Input::exit()
        } else {
            Input {
                input_type: InputType::Message,
                content: Some(text.to_string()),
            }
        }
    }
}
