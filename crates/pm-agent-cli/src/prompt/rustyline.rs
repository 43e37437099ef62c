use std::io::{self, Write};

use anyhow::Result;
use bat::WrappingMode;
use cliclack::spinner;
use console::style;
use pm_agent::models::content::Content;
use pm_agent::models::message::{Message, MessageContent, ToolRequest, ToolResponse};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::Value;

use super::{thinking::get_random_thinking_message, Input, Prompt};

const PROMPT: &str = "\x1b[1m\x1b[38;5;30mPM> \x1b[0m";
const THEME: &str = "zenburn";
const MAX_STRING_LENGTH: usize = 80;
const INDENT: &str = "    ";

pub struct RustylinePrompt {
    editor: DefaultEditor,
    spinner: cliclack::ProgressBar,
}

impl RustylinePrompt {
    pub fn new() -> Result<Self> {
        Ok(RustylinePrompt {
            editor: DefaultEditor::new()?,
            spinner: spinner(),
        })
    }
}

fn render_tool_request(tool_request: &ToolRequest) {
    match &tool_request.tool_call {
        Ok(call) => {
            print_newline();
            println!(
                "─── {} | {} ──────────────────────────",
                style(&call.name),
                style("using tool").magenta().dim(),
            );
            print_params(&call.arguments, 0);
            print_newline();
        }
        Err(e) => print_error(&e.to_string()),
    }
}

fn render_tool_response(tool_response: &ToolResponse) {
    match &tool_response.tool_result {
        Ok(contents) => {
            for text in contents.iter().filter_map(Content::as_text) {
                match serde_json::from_str::<Value>(text) {
                    Ok(value) => print_json(&value),
                    Err(_) => print_markdown(text),
                }
            }
        }
        Err(e) => print_error(&e.to_string()),
    }
}

fn print_markdown(content: &str) {
    print_highlighted(content, "Markdown");
}

fn print_json(value: &Value) {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    print_highlighted(&pretty, "JSON");
    print_newline();
}

fn print_highlighted(content: &str, language: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(THEME)
        .language(language)
        .wrapping_mode(WrappingMode::Character)
        .print();
    if printed.is_err() {
        println!("{}", content);
    }
}

fn print_error(content: &str) {
    println!("{} {}", style("error:").red().bold(), style(content).red());
}

fn shorten(s: &str) -> String {
    if s.chars().count() > MAX_STRING_LENGTH {
        let head: String = s.chars().take(MAX_STRING_LENGTH).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

/// Format and print parameters recursively with proper indentation and colors
fn print_params(value: &Value, depth: usize) {
    let indent = INDENT.repeat(depth);

    match value {
        Value::Object(map) => {
            for (key, val) in map {
                match val {
                    Value::Object(_) => {
                        println!("{}{}:", indent, style(key).dim());
                        print_params(val, depth + 1);
                    }
                    Value::Array(arr) => {
                        println!("{}{}:", indent, style(key).dim());
                        for item in arr.iter() {
                            match item {
                                Value::String(s) => {
                                    println!("{}{}- {}", indent, INDENT, style(shorten(s)).green())
                                }
                                _ => print_params(item, depth + 1),
                            }
                        }
                    }
                    Value::String(s) => {
                        println!("{}{}: {}", indent, style(key).dim(), style(shorten(s)).green());
                    }
                    Value::Number(n) => {
                        println!("{}{}: {}", indent, style(key).dim(), style(n).blue());
                    }
                    Value::Bool(b) => {
                        println!("{}{}: {}", indent, style(key).dim(), style(b).blue());
                    }
                    Value::Null => {
                        println!("{}{}: {}", indent, style(key).dim(), style("null").dim());
                    }
                }
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                println!("{}{}.", indent, i + 1);
                print_params(item, depth + 1);
            }
        }
        Value::String(s) => println!("{}{}", indent, style(shorten(s)).green()),
        Value::Number(n) => println!("{}{}", indent, style(n).yellow()),
        Value::Bool(b) => println!("{}{}", indent, style(b).yellow()),
        Value::Null => println!("{}{}", indent, style("null").dim()),
    }
}

fn print_newline() {
    println!();
}

impl Prompt for RustylinePrompt {
    fn render(&mut self, message: Box<Message>) {
        for message_content in &message.content {
            match message_content {
                MessageContent::Text(text) => print_markdown(&text.text),
                MessageContent::ToolRequest(tool_request) => render_tool_request(tool_request),
                MessageContent::ToolResponse(tool_response) => {
                    render_tool_response(tool_response)
                }
            }
        }

        print_newline();
        let _ = io::stdout().flush();
    }

    fn render_error(&mut self, error: &str) {
        print_error(error);
        print_newline();
    }

    fn show_busy(&mut self) {
        self.spinner = spinner();
        self.spinner
            .start(format!("{}...", get_random_thinking_message()));
    }

    fn hide_busy(&self) {
        self.spinner.stop("");
    }

    fn get_input(&mut self) -> Result<Input> {
        match self.editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.trim());
                }
                Ok(Input::parse(&line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(Input::exit()),
            Err(e) => {
                eprintln!("Input error: {}", e);
                Ok(Input::exit())
            }
        }
    }

    fn close(&self) {
        println!("Goodbye!");
    }
}
