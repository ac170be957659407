// Slash command handling

use crate::data::Resource;

pub enum Command {
    Help,
    Quit,
    Clear,
    Resources,
    Save(String),
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();

        match trimmed {
            "/help" => return Some(Command::Help),
            "/quit" | "/exit" => return Some(Command::Quit),
            "/clear" | "/reset" => return Some(Command::Clear),
            "/resources" => return Some(Command::Resources),
            _ => {}
        }

        if let Some(rest) = trimmed.strip_prefix("/save ") {
            let path = rest.trim();
            if !path.is_empty() {
                return Some(Command::Save(path.to_string()));
            }
        }

        None
    }
}

pub fn help_text() -> String {
    "Commands:\n\
     \x20 /help              Show this help\n\
     \x20 /resources         List hotlines and warmlines\n\
     \x20 /clear, /reset     Start a fresh conversation\n\
     \x20 /save <path>       Save the conversation as JSON\n\
     \x20 /exit, /quit       Quit\n\n\
     Anything else is sent to the assistant."
        .to_string()
}

/// Support directory grouped as hotlines, then warmlines, then anything else
pub fn format_resources(resources: &[Resource]) -> String {
    if resources.is_empty() {
        return "No support resources loaded.".to_string();
    }

    let rank = |kind: &str| match kind {
        "hotline" => 0,
        "warmline" => 1,
        _ => 2,
    };
    let mut sorted: Vec<&Resource> = resources.iter().collect();
    sorted.sort_by_key(|r| rank(&r.kind));

    sorted
        .iter()
        .map(|r| {
            let mut line = format!("[{}] {} – {}", r.kind, r.name, r.phone);
            if let Some(description) = &r.description {
                line.push_str(&format!(" ({})", description));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
