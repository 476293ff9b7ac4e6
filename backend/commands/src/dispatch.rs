/// Command dispatch - route interaction payloads to their definitions.
///
/// Every invocation gets its own cancel handle, tripped when the response
/// deadline passes; the engine then stops at the in-flight field.
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use slashforge_core::{CancelHandle, PlatformLookup, cancel_pair};
use thiserror::Error;
use tracing::{info, warn};

use crate::autocomplete::{
    AutocompleteResolver, DEFAULT_AUTOCOMPLETE_DEADLINE, MAX_SUGGESTIONS, Suggestion,
};
use crate::command::{CommandOutcome, CommandResponse};
use crate::interaction::{AutocompleteInteraction, CommandInteraction};
use crate::parser::ParseEngine;
use crate::registry::CommandRegistry;

/// Default overall budget for turning a command payload into a response.
pub const DEFAULT_COMMAND_DEADLINE: Duration = Duration::from_millis(2_500);

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no command registered as /{0}")]
    UnknownCommand(String),

    #[error("invalid interaction payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Tunables supplied by the surrounding runtime.
#[derive(Debug, Clone, Copy)]
pub struct DispatchSettings {
    pub suggestion_cap: usize,
    pub command_deadline: Duration,
    pub autocomplete_deadline: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            suggestion_cap: MAX_SUGGESTIONS,
            command_deadline: DEFAULT_COMMAND_DEADLINE,
            autocomplete_deadline: DEFAULT_AUTOCOMPLETE_DEADLINE,
        }
    }
}

pub struct CommandDispatcher {
    registry: CommandRegistry,
    engine: ParseEngine,
    resolver: AutocompleteResolver,
    settings: DispatchSettings,
}

impl CommandDispatcher {
    pub fn new(
        registry: CommandRegistry,
        lookup: Arc<dyn PlatformLookup>,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            registry,
            engine: ParseEngine::new(lookup),
            resolver: AutocompleteResolver::new(
                settings.suggestion_cap,
                settings.autocomplete_deadline,
            ),
            settings,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Run a command payload. Argument failures come back as an ephemeral
    /// message naming the offending field.
    pub async fn dispatch_command(
        &self,
        interaction: &CommandInteraction,
    ) -> Result<CommandResponse, DispatchError> {
        let command = self
            .registry
            .find(&interaction.command_name)
            .ok_or_else(|| DispatchError::UnknownCommand(interaction.command_name.clone()))?;

        info!(
            command = %command.name(),
            user = interaction.context.user_id,
            "Dispatching command"
        );

        let (handle, token) = cancel_pair();
        let run = command.execute(&self.engine, &interaction.options, &interaction.context, &token);
        let outcome = with_deadline(run, self.settings.command_deadline, &handle).await;

        Ok(match outcome {
            CommandOutcome::Completed(response) => response,
            CommandOutcome::Rejected(failure) => CommandResponse::ephemeral(
                failure.failure_message().unwrap_or_else(|| "Invalid arguments.".to_string()),
            ),
            CommandOutcome::ActionFailed(_) => {
                CommandResponse::ephemeral("Something went wrong while running this command.")
            }
        })
    }

    /// Produce suggestions for an autocomplete payload. Never surfaces an
    /// error for the focused field itself; unknown commands are still an error.
    ///
    /// The autocomplete deadline covers the prior-field parse and the provider
    /// together. When it passes, whatever is still running is cancelled and
    /// the answer is an empty list.
    pub async fn dispatch_autocomplete(
        &self,
        interaction: &AutocompleteInteraction,
    ) -> Result<Vec<Suggestion>, DispatchError> {
        let command = self
            .registry
            .find(&interaction.command_name)
            .ok_or_else(|| DispatchError::UnknownCommand(interaction.command_name.clone()))?;

        let (handle, token) = cancel_pair();
        let run = command.autocomplete(
            &self.engine,
            &self.resolver,
            &interaction.focused_option,
            &interaction.partial_input,
            &interaction.options,
            &interaction.context,
            &token,
        );
        Ok(with_deadline(run, self.settings.autocomplete_deadline, &handle).await)
    }

    /// Parse a JSON command payload and dispatch it.
    pub async fn dispatch_command_json(
        &self,
        payload: &str,
    ) -> Result<CommandResponse, DispatchError> {
        let interaction: CommandInteraction = serde_json::from_str(payload)?;
        self.dispatch_command(&interaction).await
    }

    /// Parse a JSON autocomplete payload and dispatch it.
    pub async fn dispatch_autocomplete_json(
        &self,
        payload: &str,
    ) -> Result<Vec<Suggestion>, DispatchError> {
        let interaction: AutocompleteInteraction = serde_json::from_str(payload)?;
        self.dispatch_autocomplete(&interaction).await
    }
}

/// Drive `work` to completion, cancelling through `handle` once `deadline`
/// passes. The work observes the cancellation and finishes on its own.
async fn with_deadline<F: Future>(
    work: F,
    deadline: Duration,
    handle: &CancelHandle,
) -> F::Output {
    tokio::pin!(work);
    tokio::select! {
        output = &mut work => return output,
        _ = tokio::time::sleep(deadline) => {
            warn!(
                deadline_ms = deadline.as_millis() as u64,
                "Interaction deadline reached; cancelling"
            );
            handle.cancel();
        }
    }
    work.await
}
