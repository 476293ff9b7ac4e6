/// Command definitions: an argument set bound to an action.
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use slashforge_core::CancelToken;
use tracing::{info, warn};

use crate::arguments::{ArgumentSet, DefinitionError, check_description, check_name};
use crate::autocomplete::{AutocompleteRequest, AutocompleteResolver, Suggestion};
use crate::interaction::InvocationContext;
use crate::outcome::ParseOutcome;
use crate::parser::ParseEngine;
use crate::resolved::ResolvedValues;
use crate::value::RawInputs;

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// The reply handed to the response layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResponse {
    pub text: String,
    pub ephemeral: bool, // only visible to the invoker
}

impl CommandResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: false,
        }
    }

    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// What an action gets: the command, who invoked it and the parsed values.
pub struct ActionContext<'a> {
    pub command: &'a str,
    pub invocation: &'a InvocationContext,
    pub arguments: &'a ResolvedValues,
}

#[async_trait]
pub trait CommandAction: Send + Sync {
    async fn run(&self, ctx: &ActionContext<'_>) -> Result<CommandResponse>;
}

/// Synchronous action from a plain function.
pub struct FnAction<F>(F);

pub fn action_fn<F>(f: F) -> FnAction<F>
where
    F: Fn(&ActionContext<'_>) -> Result<CommandResponse> + Send + Sync,
{
    FnAction(f)
}

#[async_trait]
impl<F> CommandAction for FnAction<F>
where
    F: Fn(&ActionContext<'_>) -> Result<CommandResponse> + Send + Sync,
{
    async fn run(&self, ctx: &ActionContext<'_>) -> Result<CommandResponse> {
        (self.0)(ctx)
    }
}

// ---------------------------------------------------------------------------
// Definition
// ---------------------------------------------------------------------------

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Arguments parsed and the action ran.
    Completed(CommandResponse),
    /// Arguments failed to parse; the action never ran.
    Rejected(ParseOutcome),
    /// The action itself returned an error.
    ActionFailed(String),
}

/// Immutable once built; share it behind an `Arc`.
pub struct CommandDefinition {
    name: String,
    description: String,
    arguments: Arc<ArgumentSet>,
    parse_for_autocomplete: bool,
    action: Arc<dyn CommandAction>,
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("arguments", &self.arguments.len())
            .field("parse_for_autocomplete", &self.parse_for_autocomplete)
            .finish_non_exhaustive()
    }
}

impl CommandDefinition {
    pub fn builder(name: impl Into<String>) -> CommandBuilder {
        CommandBuilder {
            name: name.into(),
            description: String::new(),
            arguments: ArgumentSet::empty(),
            parse_for_autocomplete: false,
            action: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn arguments(&self) -> &ArgumentSet {
        &self.arguments
    }

    /// Whether earlier fields are parsed before autocomplete providers run.
    pub fn parse_for_autocomplete(&self) -> bool {
        self.parse_for_autocomplete
    }

    /// Parse the raw options and, only on success, run the action once.
    pub async fn execute(
        &self,
        engine: &ParseEngine,
        raw: &RawInputs,
        invocation: &InvocationContext,
        cancel: &CancelToken,
    ) -> CommandOutcome {
        let values = match engine.parse(&self.arguments, raw, invocation, cancel).await {
            ParseOutcome::Success(values) => values,
            failure => {
                warn!(
                    command = %self.name,
                    field = failure.field().unwrap_or("-"),
                    "Arguments rejected; action not run"
                );
                return CommandOutcome::Rejected(failure);
            }
        };

        info!(command = %self.name, arguments = values.len(), "Running command action");
        let ctx = ActionContext {
            command: &self.name,
            invocation,
            arguments: &values,
        };
        match self.action.run(&ctx).await {
            Ok(response) => CommandOutcome::Completed(response),
            Err(e) => {
                warn!(command = %self.name, error = %e, "Command action failed");
                CommandOutcome::ActionFailed(e.to_string())
            }
        }
    }

    /// Suggestions for the focused option. Earlier options are parsed first
    /// only when `parse_for_autocomplete` is set. Once `cancel` trips, the
    /// provider is skipped and the list is empty.
    #[allow(clippy::too_many_arguments)]
    pub async fn autocomplete(
        &self,
        engine: &ParseEngine,
        resolver: &AutocompleteResolver,
        focused: &str,
        partial: &str,
        raw: &RawInputs,
        invocation: &InvocationContext,
        cancel: &CancelToken,
    ) -> Vec<Suggestion> {
        let prior = if self.parse_for_autocomplete {
            engine
                .parse_for_autocomplete(&self.arguments, raw, focused, invocation, cancel)
                .await
        } else {
            ResolvedValues::new()
        };

        if cancel.is_cancelled() {
            warn!(command = %self.name, field = %focused, "Autocomplete cancelled; no suggestions");
            return Vec::new();
        }

        let request = AutocompleteRequest {
            focused_field: focused.to_string(),
            partial: partial.to_string(),
            prior,
        };
        resolver
            .resolve(&self.arguments, &request, invocation, engine.lookup(), cancel)
            .await
    }
}

pub struct CommandBuilder {
    name: String,
    description: String,
    arguments: ArgumentSet,
    parse_for_autocomplete: bool,
    action: Option<Arc<dyn CommandAction>>,
}

impl CommandBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn arguments(mut self, arguments: ArgumentSet) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn parse_for_autocomplete(mut self, enabled: bool) -> Self {
        self.parse_for_autocomplete = enabled;
        self
    }

    pub fn action(mut self, action: impl CommandAction + 'static) -> Self {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn build(self) -> Result<CommandDefinition, DefinitionError> {
        check_name(&self.name)?;
        check_description(&self.name, &self.description)?;
        let action = self
            .action
            .ok_or_else(|| DefinitionError::MissingAction(self.name.clone()))?;

        Ok(CommandDefinition {
            name: self.name,
            description: self.description,
            arguments: Arc::new(self.arguments),
            parse_for_autocomplete: self.parse_for_autocomplete,
            action,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;
    use slashforge_core::{StaticLookup, cancel_pair};

    use super::*;
    use crate::autocomplete::{suggest_strings, suggest_with};
    use crate::field::FieldBuilder;

    fn raw(value: serde_json::Value) -> RawInputs {
        value.as_object().cloned().unwrap_or_default()
    }

    fn engine() -> ParseEngine {
        ParseEngine::new(Arc::new(StaticLookup::new()))
    }

    #[derive(Default, Clone)]
    struct Counting {
        runs: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CommandAction for Counting {
        async fn run(&self, ctx: &ActionContext<'_>) -> Result<CommandResponse> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            let file = ctx.arguments.attachment("file").map(|a| a.filename.clone());
            Ok(CommandResponse::ok(format!("got {file:?}")))
        }
    }

    fn attachment_command(action: Counting) -> CommandDefinition {
        CommandDefinition::builder("attachment")
            .description("Check attachment command options.")
            .arguments(
                ArgumentSet::builder()
                    .field(FieldBuilder::attachment("file").description("An attached file."))
                    .build()
                    .unwrap(),
            )
            .action(action)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn missing_required_attachment_never_runs_action() {
        let action = Counting::default();
        let command = attachment_command(action.clone());

        let outcome = command
            .execute(
                &engine(),
                &raw(json!({})),
                &InvocationContext::default(),
                &CancelToken::never(),
            )
            .await;

        assert_eq!(outcome, CommandOutcome::Rejected(ParseOutcome::MissingRequired("file".into())));
        assert_eq!(action.runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn success_runs_action_exactly_once() {
        let action = Counting::default();
        let command = attachment_command(action.clone());
        let invocation: InvocationContext = serde_json::from_value(json!({
            "attachments": { "900": { "id": 900, "filename": "a.png" } }
        }))
        .unwrap();

        let outcome = command
            .execute(&engine(), &raw(json!({"file": "900"})), &invocation, &CancelToken::never())
            .await;

        assert_eq!(
            outcome,
            CommandOutcome::Completed(CommandResponse::ok("got Some(\"a.png\")"))
        );
        assert_eq!(action.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn action_errors_are_reported() {
        let command = CommandDefinition::builder("broken")
            .description("Always fails.")
            .action(action_fn(|_ctx| anyhow::bail!("backend unavailable")))
            .build()
            .unwrap();

        let outcome = command
            .execute(
                &engine(),
                &RawInputs::new(),
                &InvocationContext::default(),
                &CancelToken::never(),
            )
            .await;
        assert_eq!(outcome, CommandOutcome::ActionFailed("backend unavailable".into()));
    }

    #[tokio::test]
    async fn prior_fields_only_parsed_when_enabled() {
        let arguments = || {
            ArgumentSet::builder()
                .field(
                    FieldBuilder::string_choice("one", [("O", "o"), ("T", "t"), ("F", "f")])
                        .description("Choice argument"),
                )
                .field(
                    FieldBuilder::string("two")
                        .description("Autocomplete argument")
                        .autocomplete(suggest_with(|ctx| {
                            let one = ctx.prior.string("one").unwrap_or_default();
                            let words = ["one", "two", "three", "four"]
                                .into_iter()
                                .filter(|w| w.contains(one));
                            suggest_strings(words, ctx.partial)
                        })),
                )
                .build()
                .unwrap()
        };
        let build = |enabled: bool| {
            CommandDefinition::builder("autocomplete")
                .description("Test auto-completion events")
                .arguments(arguments())
                .parse_for_autocomplete(enabled)
                .action(action_fn(|_ctx| Ok(CommandResponse::ok("done"))))
                .build()
                .unwrap()
        };
        let engine = engine();
        let resolver = AutocompleteResolver::default();
        let invocation = InvocationContext::default();
        let cancel = CancelToken::never();
        let options = raw(json!({"one": "t"}));

        let enabled = build(true)
            .autocomplete(&engine, &resolver, "two", "", &options, &invocation, &cancel)
            .await;
        let labels: Vec<_> = enabled.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["two", "three"]);

        // Without prior parsing `one` is unknown and nothing is filtered out.
        let disabled = build(false)
            .autocomplete(&engine, &resolver, "two", "", &options, &invocation, &cancel)
            .await;
        assert_eq!(disabled.len(), 4);
    }

    #[tokio::test]
    async fn cancelled_prior_parse_skips_the_provider() {
        let command = CommandDefinition::builder("autocomplete")
            .description("Test auto-completion events")
            .arguments(
                ArgumentSet::builder()
                    .field(FieldBuilder::string("one").description("Filter text"))
                    .field(
                        FieldBuilder::string("two")
                            .description("Autocomplete argument")
                            .autocomplete(suggest_with(|ctx| {
                                suggest_strings(["one", "two"], ctx.partial)
                            })),
                    )
                    .build()
                    .unwrap(),
            )
            .parse_for_autocomplete(true)
            .action(action_fn(|_ctx| Ok(CommandResponse::ok("done"))))
            .build()
            .unwrap();
        let (handle, token) = cancel_pair();
        handle.cancel();

        let out = command
            .autocomplete(
                &engine(),
                &AutocompleteResolver::default(),
                "two",
                "",
                &raw(json!({"one": "o"})),
                &InvocationContext::default(),
                &token,
            )
            .await;
        assert!(out.is_empty());
    }

    #[test]
    fn builder_requires_valid_name_description_and_action() {
        let no_action = CommandDefinition::builder("ping").description("Ping.").build();
        assert_eq!(no_action.unwrap_err(), DefinitionError::MissingAction("ping".into()));

        let bad_name = CommandDefinition::builder("Ping")
            .description("Ping.")
            .action(action_fn(|_ctx| Ok(CommandResponse::ok("pong"))))
            .build();
        assert!(matches!(bad_name, Err(DefinitionError::InvalidName { .. })));

        let no_description = CommandDefinition::builder("ping")
            .action(action_fn(|_ctx| Ok(CommandResponse::ok("pong"))))
            .build();
        assert!(matches!(no_description, Err(DefinitionError::InvalidDescription { .. })));
    }
}
