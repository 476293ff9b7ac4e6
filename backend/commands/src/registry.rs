/// Command registry - every definition the bot exposes, by name.
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::arguments::DefinitionError;
use crate::command::CommandDefinition;

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<CommandDefinition>>,
}

/// Registration summary of one option, as the platform would be told.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSummary {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub converter: String,
    pub required: bool,
    pub autocomplete: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

/// Registration summary of one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSummary {
    pub name: String,
    pub description: String,
    pub options: Vec<OptionSummary>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Names are unique.
    pub fn register(&mut self, def: CommandDefinition) -> Result<(), DefinitionError> {
        if self.find(def.name()).is_some() {
            return Err(DefinitionError::DuplicateCommand(def.name().to_string()));
        }
        info!(command = %def.name(), options = def.arguments().len(), "Registered command");
        self.commands.push(Arc::new(def));
        Ok(())
    }

    pub fn all(&self) -> &[Arc<CommandDefinition>] {
        &self.commands
    }

    pub fn find(&self, name: &str) -> Option<&Arc<CommandDefinition>> {
        self.commands.iter().find(|c| c.name() == name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Summaries for platform registration or help output.
    pub fn summaries(&self) -> Vec<CommandSummary> {
        self.commands
            .iter()
            .map(|c| CommandSummary {
                name: c.name().to_string(),
                description: c.description().to_string(),
                options: c
                    .arguments()
                    .fields()
                    .iter()
                    .map(|f| OptionSummary {
                        name: f.name().to_string(),
                        description: f.description().to_string(),
                        converter: f.converter().name().to_string(),
                        required: f.required(),
                        autocomplete: f.autocomplete().is_some(),
                        choices: f
                            .converter()
                            .choices()
                            .unwrap_or_default()
                            .iter()
                            .map(|choice| choice.label.clone())
                            .collect(),
                    })
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::ArgumentSet;
    use crate::command::{CommandResponse, action_fn};
    use crate::field::FieldBuilder;

    fn ping() -> CommandDefinition {
        CommandDefinition::builder("ping")
            .description("Ping the bot.")
            .arguments(
                ArgumentSet::builder()
                    .field(
                        FieldBuilder::string_choice("size", [("Small", "s"), ("Large", "l")])
                            .description("Response size")
                            .optional(),
                    )
                    .build()
                    .unwrap(),
            )
            .action(action_fn(|_ctx| Ok(CommandResponse::ok("pong"))))
            .build()
            .unwrap()
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut registry = CommandRegistry::new();
        registry.register(ping()).unwrap();
        assert_eq!(
            registry.register(ping()).unwrap_err(),
            DefinitionError::DuplicateCommand("ping".into())
        );
        assert_eq!(registry.len(), 1);
        assert!(registry.find("ping").is_some());
        assert!(registry.find("pong").is_none());
    }

    #[test]
    fn summaries_describe_options() {
        let mut registry = CommandRegistry::new();
        registry.register(ping()).unwrap();
        let summary = &registry.summaries()[0];
        assert_eq!(summary.options[0].converter, "string choice");
        assert!(!summary.options[0].required);
        assert_eq!(summary.options[0].choices, vec!["Small", "Large"]);
    }
}
