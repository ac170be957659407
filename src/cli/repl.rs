// Interactive chat loop

use anyhow::Result;
use std::io::{self, BufRead, IsTerminal, Write};

use super::commands::{format_resources, help_text, Command};
use super::conversation::Conversation;
use super::input::InputHandler;
use crate::assistant::SupportAssistant;

const GREETING: &str = "💬 Chat to Cope\n\
Tell me about your current troubles or feelings. I'll look for possible \
symptoms and suggest coping strategies and support resources.\n\
Type /help for commands, /exit to quit.";

const DISCLAIMER: &str = "This assistant is not a substitute for professional care. \
If you are in immediate danger, call your local emergency number.";

pub struct Repl {
    assistant: SupportAssistant,
    conversation: Conversation,
    input_handler: Option<InputHandler>,
}

impl Repl {
    pub fn new(assistant: SupportAssistant, conversation: Conversation) -> Self {
        let input_handler = if io::stdin().is_terminal() {
            match InputHandler::new() {
                Ok(handler) => Some(handler),
                Err(e) => {
                    tracing::warn!("Failed to initialize input handler: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            assistant,
            conversation,
            input_handler,
        }
    }

    /// Run the interactive loop until /exit or end of input
    pub async fn run(mut self) -> Result<()> {
        println!("{}\n{}\n", GREETING, DISCLAIMER);

        loop {
            let Some(line) = self.read_line()? else {
                println!("Take care of yourself. Goodbye!");
                break;
            };

            if line.is_empty() {
                continue;
            }

            if line.starts_with('/') {
                if self.handle_command(&line)? {
                    break;
                }
                continue;
            }

            match self.assistant.respond(&mut self.conversation, &line).await {
                Ok(turn) => println!("\n{}\n", turn.rendered),
                Err(e) => eprintln!("\x1b[1;31mError:\x1b[0m {:#}\n", e),
            }
        }

        if let Some(handler) = &mut self.input_handler {
            if let Err(e) = handler.save_history() {
                tracing::warn!("Failed to save input history: {}", e);
            }
        }

        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        match &mut self.input_handler {
            Some(handler) => handler.read_line("you> "),
            None => {
                print!("you> ");
                io::stdout().flush()?;
                let mut line = String::new();
                if io::stdin().lock().read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                Ok(Some(line.trim().to_string()))
            }
        }
    }

    /// Returns true when the user asked to quit
    fn handle_command(&mut self, input: &str) -> Result<bool> {
        let Some(command) = Command::parse(input) else {
            println!("Unknown command: {}. Type /help for commands.", input);
            return Ok(false);
        };

        match command {
            Command::Help => println!("{}", help_text()),
            Command::Quit => return Ok(true),
            Command::Clear => {
                self.conversation.clear();
                println!("Conversation cleared.");
            }
            Command::Resources => println!("{}", format_resources(&self.assistant.data().resources)),
            Command::Save(path) => match self.conversation.save(&path) {
                Ok(()) => println!("Conversation saved to {}", path),
                Err(e) => eprintln!("\x1b[1;31mError:\x1b[0m {:#}", e),
            },
        }

        Ok(false)
    }
}
