use crate::markup::Markup;

/// Command names and their help text, in display order
pub const COMMANDS: &[(&str, &str)] = &[
    ("help", "Show this list of commands"),
    ("clear", "Clear all console logs"),
    ("hello", "Get a friendly greeting"),
    ("download", "Download the resume"),
    ("wave", "Byte waves at you"),
    ("about", "Scroll to About section"),
    ("projects", "Scroll to Projects section"),
    ("contact", "Scroll to Contact section"),
    ("home", "Scroll to top"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Wave,
    Clear,
    Help,
    Download,
    /// Scroll to a page section by id
    Goto(&'static str),
    Unknown(String),
}

impl Command {
    /// Parse trimmed input. `None` for blank input.
    pub fn parse(input: &str) -> Option<Self> {
        let raw = input.trim();
        if raw.is_empty() {
            return None;
        }

        let command = match raw.to_lowercase().as_str() {
            "hello" | "wave" => Command::Wave,
            "clear" => Command::Clear,
            "help" => Command::Help,
            "download" => Command::Download,
            "about" => Command::Goto("about"),
            "projects" => Command::Goto("projects"),
            "contact" => Command::Goto("contact"),
            "home" => Command::Goto("home"),
            _ => Command::Unknown(raw.to_string()),
        };
        Some(command)
    }
}

pub fn help_text(name: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, help)| *help)
}

/// Suggestion shown under the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    Prompt,
    Command {
        name: &'static str,
        help: &'static str,
    },
    Unknown,
}

impl Hint {
    /// Match partial input against the command table.
    ///
    /// A leading `/` is ignored. An exact name wins; otherwise the
    /// alphabetically first name with the input as a prefix.
    pub fn for_input(input: &str) -> Self {
        let value = input.trim().to_lowercase();
        let key = value.strip_prefix('/').unwrap_or(&value);
        if key.is_empty() {
            return Hint::Prompt;
        }

        if let Some(&(name, help)) = COMMANDS.iter().find(|(name, _)| *name == key) {
            return Hint::Command { name, help };
        }

        COMMANDS
            .iter()
            .filter(|(name, _)| name.starts_with(key))
            .min_by_key(|(name, _)| *name)
            .map(|&(name, help)| Hint::Command { name, help })
            .unwrap_or(Hint::Unknown)
    }

    pub fn to_markup(&self) -> Markup {
        match self {
            Hint::Prompt => Markup::new()
                .plain("type a command or try ")
                .command("\"help\""),
            Hint::Command { name, help } => Markup::new()
                .command(*name)
                .plain(" — ")
                .note(*help),
            Hint::Unknown => Markup::new()
                .note("Unknown so far… press Enter to try or type")
                .plain(" ")
                .command("\"help\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Command::parse("  CLEAR "), Some(Command::Clear));
        assert_eq!(Command::parse("Hello"), Some(Command::Wave));
        assert_eq!(Command::parse("Projects"), Some(Command::Goto("projects")));
        assert_eq!(
            Command::parse("Sudo Make"),
            Some(Command::Unknown("Sudo Make".to_string()))
        );
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn test_hint_exact_and_prefix() {
        assert_eq!(
            Hint::for_input("/Help"),
            Hint::Command {
                name: "help",
                help: "Show this list of commands"
            }
        );
        // "h" matches help, hello, home; ascending order picks hello
        assert!(matches!(
            Hint::for_input("h"),
            Hint::Command { name: "hello", .. }
        ));
        assert!(matches!(
            Hint::for_input("he"),
            Hint::Command { name: "hello", .. }
        ));
        assert!(matches!(
            Hint::for_input("pro"),
            Hint::Command { name: "projects", .. }
        ));
        assert_eq!(Hint::for_input("xyz"), Hint::Unknown);
        assert_eq!(Hint::for_input(""), Hint::Prompt);
        assert_eq!(Hint::for_input(" / "), Hint::Prompt);
    }

    #[test]
    fn test_hint_markup() {
        assert_eq!(
            Hint::Prompt.to_markup().plain_text(),
            "type a command or try \"help\""
        );
        assert_eq!(
            Hint::for_input("cl").to_markup().plain_text(),
            "clear — Clear all console logs"
        );
    }

    #[test]
    fn test_every_command_has_help() {
        for name in ["help", "clear", "hello", "download", "wave", "about", "projects", "contact", "home"] {
            assert!(help_text(name).is_some(), "{} missing", name);
        }
    }
}
