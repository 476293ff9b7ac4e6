//! The parsing engine.
//!
//! Fields are walked strictly in declaration order, one at a time. Each
//! converter sees only the values of fields declared before it. The first
//! failure ends the parse; nothing is retried.

use std::sync::Arc;

use slashforge_core::{CancelToken, PlatformLookup};
use tracing::{debug, warn};

use crate::arguments::ArgumentSet;
use crate::constraint;
use crate::converter::{ConversionError, ConvertContext};
use crate::field::FieldDescriptor;
use crate::interaction::InvocationContext;
use crate::outcome::ParseOutcome;
use crate::resolved::ResolvedValues;
use crate::value::{ArgValue, RawInputs, RawValue};

enum Step {
    Converted(ArgValue),
    Failed(ConversionError),
    Cancelled,
}

/// Runs argument sets against raw input. Holds no per-invocation state and
/// can be shared freely.
#[derive(Clone)]
pub struct ParseEngine {
    lookup: Arc<dyn PlatformLookup>,
}

impl ParseEngine {
    pub fn new(lookup: Arc<dyn PlatformLookup>) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &dyn PlatformLookup {
        self.lookup.as_ref()
    }

    /// All-or-nothing parse of every field.
    pub async fn parse(
        &self,
        arguments: &ArgumentSet,
        raw: &RawInputs,
        invocation: &InvocationContext,
        cancel: &CancelToken,
    ) -> ParseOutcome {
        let mut resolved = ResolvedValues::new();

        for field in arguments.fields() {
            let name = field.name();
            if cancel.is_cancelled() {
                warn!(field = %name, "Parse cancelled before field");
                return ParseOutcome::Cancelled {
                    field: Some(name.to_string()),
                };
            }

            let Some(raw_value) = present(raw, name) else {
                if field.required() {
                    debug!(field = %name, "Required field missing");
                    return ParseOutcome::MissingRequired(name.to_string());
                }
                debug!(field = %name, "Optional field absent");
                continue;
            };

            let value = match self.convert(field, raw_value, &resolved, invocation, cancel).await {
                Step::Converted(value) => value,
                Step::Failed(reason) => {
                    warn!(field = %name, error = %reason, "Conversion failed");
                    return ParseOutcome::ConversionFailed {
                        field: name.to_string(),
                        reason,
                    };
                }
                Step::Cancelled => {
                    warn!(field = %name, "Parse cancelled during conversion");
                    return ParseOutcome::Cancelled {
                        field: Some(name.to_string()),
                    };
                }
            };

            if let Err(violation) = constraint::validate(&value, field.constraints()) {
                debug!(field = %name, constraint = %violation.constraint, "Constraint violated");
                return ParseOutcome::ConstraintViolated {
                    field: name.to_string(),
                    violation,
                };
            }

            debug!(field = %name, kind = value.kind().as_str(), "Field resolved");
            resolved.insert(name.to_string(), value);
        }

        ParseOutcome::Success(resolved)
    }

    /// Best-effort parse of the fields before `focused`, for autocomplete.
    ///
    /// Absent fields, conversion failures and constraint violations are
    /// skipped rather than reported: the user has not finished typing.
    /// Cancellation returns whatever was resolved so far. A focus naming no
    /// declared field resolves nothing.
    pub async fn parse_for_autocomplete(
        &self,
        arguments: &ArgumentSet,
        raw: &RawInputs,
        focused: &str,
        invocation: &InvocationContext,
        cancel: &CancelToken,
    ) -> ResolvedValues {
        let mut resolved = ResolvedValues::new();
        if arguments.field(focused).is_none() {
            debug!(field = %focused, "Focused field is not declared; nothing to parse");
            return resolved;
        }

        for field in arguments.fields() {
            let name = field.name();
            if name == focused || cancel.is_cancelled() {
                break;
            }
            let Some(raw_value) = present(raw, name) else {
                continue;
            };

            match self.convert(field, raw_value, &resolved, invocation, cancel).await {
                Step::Converted(value) => match constraint::validate(&value, field.constraints()) {
                    Ok(()) => resolved.insert(name.to_string(), value),
                    Err(violation) => {
                        debug!(
                            field = %name,
                            reason = %violation,
                            "Skipping field for autocomplete"
                        );
                    }
                },
                Step::Failed(reason) => {
                    debug!(field = %name, error = %reason, "Skipping field for autocomplete");
                }
                Step::Cancelled => break,
            }
        }

        resolved
    }

    async fn convert(
        &self,
        field: &FieldDescriptor,
        raw: &RawValue,
        resolved: &ResolvedValues,
        invocation: &InvocationContext,
        cancel: &CancelToken,
    ) -> Step {
        let ctx = ConvertContext {
            field: field.name(),
            resolved,
            dependency: field.dependency().and_then(|d| d.resolve(resolved)),
            invocation,
            lookup: self.lookup.as_ref(),
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Step::Cancelled,
            result = field.converter().convert(raw, &ctx) => match result {
                Ok(value) => Step::Converted(value),
                Err(reason) => Step::Failed(reason),
            },
        }
    }
}

/// Raw value for `name`, treating JSON null as absent.
fn present<'a>(raw: &'a RawInputs, name: &str) -> Option<&'a RawValue> {
    raw.get(name).filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use slashforge_core::{
        Channel, ChannelType, Emoji, ForgeError, ForumTag, Snowflake, StaticLookup, cancel_pair,
    };

    use super::*;
    use crate::constraint::Constraint;
    use crate::converter::Converter;
    use crate::field::FieldBuilder;
    use crate::value::ValueKind;

    fn raw(value: serde_json::Value) -> RawInputs {
        value.as_object().cloned().unwrap_or_default()
    }

    fn forum() -> Channel {
        Channel {
            id: 30,
            guild_id: Some(1),
            name: "help".into(),
            kind: ChannelType::GuildForum,
            available_tags: vec![ForumTag {
                id: 7,
                name: "Bug".into(),
                moderated: false,
                emoji_name: None,
            }],
        }
    }

    fn engine() -> ParseEngine {
        ParseEngine::new(Arc::new(
            StaticLookup::new()
                .with_channel(forum())
                .with_channel(Channel {
                    id: 10,
                    guild_id: Some(1),
                    name: "general".into(),
                    kind: ChannelType::GuildText,
                    available_tags: vec![],
                }),
        ))
    }

    fn guild() -> InvocationContext {
        InvocationContext {
            guild_id: Some(1),
            ..InvocationContext::default()
        }
    }

    /// Records the names visible in the snapshot each time it runs.
    #[derive(Debug, Clone, Default)]
    struct Spy {
        seen: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    }

    #[async_trait]
    impl Converter for Spy {
        fn name(&self) -> &'static str {
            "spy"
        }

        fn kind(&self) -> ValueKind {
            ValueKind::Text
        }

        async fn convert(
            &self,
            raw: &RawValue,
            ctx: &ConvertContext<'_>,
        ) -> Result<ArgValue, ConversionError> {
            let names = ctx.resolved.names().map(str::to_string).collect();
            self.seen.lock().unwrap().push((ctx.field.to_string(), names));
            Ok(ArgValue::String(raw.as_str().unwrap_or_default().to_string()))
        }
    }

    /// A platform that never answers.
    struct Hanging;

    #[async_trait]
    impl PlatformLookup for Hanging {
        async fn fetch_channel(&self, _id: Snowflake) -> Result<Option<Channel>, ForgeError> {
            std::future::pending().await
        }

        async fn fetch_emoji(&self, _id: Snowflake) -> Result<Option<Emoji>, ForgeError> {
            std::future::pending().await
        }

        async fn find_emoji(
            &self,
            _guild_id: Option<Snowflake>,
            _name: &str,
        ) -> Result<Option<Emoji>, ForgeError> {
            std::future::pending().await
        }
    }

    /// A platform that errors on every call and counts the attempts.
    #[derive(Default)]
    struct Failing {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PlatformLookup for Failing {
        async fn fetch_channel(&self, _id: Snowflake) -> Result<Option<Channel>, ForgeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ForgeError::lookup("channel", "gateway timeout"))
        }

        async fn fetch_emoji(&self, _id: Snowflake) -> Result<Option<Emoji>, ForgeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ForgeError::lookup("emoji", "gateway timeout"))
        }

        async fn find_emoji(
            &self,
            _guild_id: Option<Snowflake>,
            _name: &str,
        ) -> Result<Option<Emoji>, ForgeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ForgeError::lookup("emoji", "gateway timeout"))
        }
    }

    #[tokio::test]
    async fn converters_only_see_earlier_fields() {
        let spy = Spy::default();
        let args = ArgumentSet::builder()
            .field(FieldBuilder::new("c", spy.clone()).description("Third"))
            .field(FieldBuilder::new("a", spy.clone()).description("First"))
            .field(FieldBuilder::new("b", spy.clone()).description("Second"))
            .build()
            .unwrap();

        let inputs = raw(json!({"a": "1", "b": "2", "c": "3"}));
        let outcome = engine()
            .parse(&args, &inputs, &guild(), &CancelToken::never())
            .await;
        assert!(outcome.is_success());

        let seen = spy.seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                ("c".to_string(), vec![]),
                ("a".to_string(), vec!["c".to_string()]),
                ("b".to_string(), vec!["c".to_string(), "a".to_string()]),
            ]
        );
    }

    #[tokio::test]
    async fn missing_required_aborts_before_later_fields() {
        let spy = Spy::default();
        let args = ArgumentSet::builder()
            .field(FieldBuilder::attachment("file").description("A file"))
            .field(FieldBuilder::new("after", spy.clone()).description("Comes after"))
            .build()
            .unwrap();

        let outcome = engine()
            .parse(&args, &raw(json!({"after": "x"})), &guild(), &CancelToken::never())
            .await;
        assert_eq!(outcome, ParseOutcome::MissingRequired("file".into()));
        assert!(spy.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn absent_optional_fields_skip_their_converter() {
        let spy = Spy::default();
        let args = ArgumentSet::builder()
            .field(FieldBuilder::string("name").description("A name"))
            .field(
                FieldBuilder::new("extra", spy.clone())
                    .description("Extra detail")
                    .optional(),
            )
            .build()
            .unwrap();

        let inputs = raw(json!({"name": "abc", "extra": null}));
        let outcome = engine()
            .parse(&args, &inputs, &guild(), &CancelToken::never())
            .await;
        let values = outcome.into_values().unwrap();
        assert_eq!(values.string("name"), Some("abc"));
        assert!(!values.contains("extra"));
        assert!(spy.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn length_constrained_scenario() {
        let args = ArgumentSet::builder()
            .field(
                FieldBuilder::string("name")
                    .description("A name")
                    .min_length(3)
                    .max_length(10),
            )
            .build()
            .unwrap();
        let engine = engine();
        let cancel = CancelToken::never();

        let short = engine.parse(&args, &raw(json!({"name": "ab"})), &guild(), &cancel).await;
        match short {
            ParseOutcome::ConstraintViolated { field, violation } => {
                assert_eq!(field, "name");
                assert_eq!(violation.constraint, Constraint::MinLength(3));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let ok = engine.parse(&args, &raw(json!({"name": "abc"})), &guild(), &cancel).await;
        let expected = ResolvedValues::new().with("name", ArgValue::String("abc".into()));
        assert_eq!(ok, ParseOutcome::Success(expected));
    }

    #[tokio::test]
    async fn numeric_bounds_are_enforced_after_conversion() {
        let args = ArgumentSet::builder()
            .field(
                FieldBuilder::integer("count")
                    .description("How many")
                    .min_value(1.0)
                    .max_value(10.0),
            )
            .build()
            .unwrap();
        let engine = engine();
        let cancel = CancelToken::never();

        let ok = engine.parse(&args, &raw(json!({"count": "10"})), &guild(), &cancel).await;
        assert_eq!(ok.into_values().unwrap().integer("count"), Some(10));

        let high = engine.parse(&args, &raw(json!({"count": 11})), &guild(), &cancel).await;
        match high {
            ParseOutcome::ConstraintViolated { field, violation } => {
                assert_eq!(field, "count");
                assert_eq!(violation.constraint, Constraint::MaxValue(10.0));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let low = engine.parse(&args, &raw(json!({"count": "0"})), &guild(), &cancel).await;
        assert!(matches!(
            low,
            ParseOutcome::ConstraintViolated { ref violation, .. }
                if violation.constraint == Constraint::MinValue(1.0)
        ));

        let ratio = ArgumentSet::builder()
            .field(
                FieldBuilder::number("ratio")
                    .description("Share of the total")
                    .min_value(0.0)
                    .max_value(1.0),
            )
            .build()
            .unwrap();
        let half = engine.parse(&ratio, &raw(json!({"ratio": 0.5})), &guild(), &cancel).await;
        assert_eq!(half.into_values().unwrap().number("ratio"), Some(0.5));

        let over = engine.parse(&ratio, &raw(json!({"ratio": "1.5"})), &guild(), &cancel).await;
        assert!(matches!(
            over,
            ParseOutcome::ConstraintViolated { ref field, .. } if field == "ratio"
        ));
    }

    #[tokio::test]
    async fn conversion_failure_stops_the_walk() {
        let spy = Spy::default();
        let args = ArgumentSet::builder()
            .field(FieldBuilder::integer("count").description("How many"))
            .field(FieldBuilder::new("after", spy.clone()).description("Comes after"))
            .build()
            .unwrap();

        let inputs = raw(json!({"count": "many", "after": "x"}));
        let outcome = engine()
            .parse(&args, &inputs, &guild(), &CancelToken::never())
            .await;
        assert!(matches!(
            outcome,
            ParseOutcome::ConversionFailed { ref field, .. } if field == "count"
        ));
        assert!(spy.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookup_errors_fail_the_field_after_one_attempt() {
        let spy = Spy::default();
        let lookup = Arc::new(Failing::default());
        let engine = ParseEngine::new(lookup.clone());
        let args = ArgumentSet::builder()
            .field(FieldBuilder::channel("channel").description("A channel"))
            .field(FieldBuilder::new("after", spy.clone()).description("Comes after"))
            .build()
            .unwrap();

        let inputs = raw(json!({"channel": "<#10>", "after": "x"}));
        let outcome = engine
            .parse(&args, &inputs, &guild(), &CancelToken::never())
            .await;

        assert_eq!(
            outcome,
            ParseOutcome::ConversionFailed {
                field: "channel".into(),
                reason: ConversionError::Lookup(
                    "platform lookup failed (channel): gateway timeout".into()
                ),
            }
        );
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        assert!(spy.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn channel_type_violation_is_distinct_from_conversion_failure() {
        let args = ArgumentSet::builder()
            .field(
                FieldBuilder::channel("channel")
                    .description("A text channel")
                    .require_channel_type(ChannelType::GuildText),
            )
            .build()
            .unwrap();

        let outcome = engine()
            .parse(&args, &raw(json!({"channel": "<#30>"})), &guild(), &CancelToken::never())
            .await;
        match outcome {
            ParseOutcome::ConstraintViolated { violation, .. } => assert_eq!(
                violation.constraint,
                Constraint::ChannelTypeIn(BTreeSet::from([ChannelType::GuildText]))
            ),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dependent_tag_resolves_within_chosen_channel() {
        let args = ArgumentSet::builder()
            .field(
                FieldBuilder::channel("channel")
                    .description("A forum")
                    .optional()
                    .require_channel_type(ChannelType::GuildForum),
            )
            .field(
                FieldBuilder::tag("tag")
                    .description("Tag to apply")
                    .optional()
                    .depends_on("channel"),
            )
            .build()
            .unwrap();
        let engine = engine();
        let cancel = CancelToken::never();

        let both = engine
            .parse(&args, &raw(json!({"channel": "30", "tag": "bug"})), &guild(), &cancel)
            .await
            .into_values()
            .unwrap();
        assert_eq!(both.tag("tag").map(|t| t.id), Some(7));

        // Unset channel: the accessor yields nothing and the tag has no scope.
        let orphan = engine.parse(&args, &raw(json!({"tag": "bug"})), &guild(), &cancel).await;
        assert_eq!(
            orphan,
            ParseOutcome::ConversionFailed {
                field: "tag".into(),
                reason: ConversionError::Rejected("no forum channel selected".into()),
            }
        );
    }

    #[tokio::test]
    async fn cancellation_stops_an_inflight_lookup() {
        let args = ArgumentSet::builder()
            .field(FieldBuilder::channel("channel").description("A channel"))
            .build()
            .unwrap();
        let engine = ParseEngine::new(Arc::new(Hanging));
        let (handle, token) = cancel_pair();
        let raw = raw(json!({"channel": "10"}));
        let invocation = guild();

        let parse = engine.parse(&args, &raw, &invocation, &token);
        tokio::pin!(parse);
        tokio::select! {
            _ = &mut parse => panic!("hanging lookup should not complete"),
            _ = tokio::time::sleep(Duration::from_millis(20)) => handle.cancel(),
        }

        let outcome = tokio::time::timeout(Duration::from_secs(1), parse).await.unwrap();
        assert_eq!(
            outcome,
            ParseOutcome::Cancelled {
                field: Some("channel".into()),
            }
        );
    }

    #[tokio::test]
    async fn already_cancelled_parse_does_nothing() {
        let spy = Spy::default();
        let args = ArgumentSet::builder()
            .field(FieldBuilder::new("a", spy.clone()).description("Anything"))
            .build()
            .unwrap();
        let (handle, token) = cancel_pair();
        handle.cancel();

        let outcome = engine().parse(&args, &raw(json!({"a": "1"})), &guild(), &token).await;
        assert!(matches!(outcome, ParseOutcome::Cancelled { .. }));
        assert!(spy.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn autocomplete_parse_stops_at_focus_and_tolerates_failures() {
        let spy = Spy::default();
        let args = ArgumentSet::builder()
            .field(FieldBuilder::string("name").description("A name").min_length(3))
            .field(FieldBuilder::integer("count").description("How many"))
            .field(FieldBuilder::string("ok").description("Fine value"))
            .field(FieldBuilder::new("focus", spy.clone()).description("Being typed"))
            .field(FieldBuilder::new("later", spy.clone()).description("Not yet"))
            .build()
            .unwrap();

        let prior = engine()
            .parse_for_autocomplete(
                &args,
                &raw(json!({"name": "ab", "count": "x", "ok": "fine", "later": "z"})),
                "focus",
                &guild(),
                &CancelToken::never(),
            )
            .await;

        assert_eq!(prior.names().collect::<Vec<_>>(), vec!["ok"]);
        assert!(spy.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn autocomplete_parse_for_an_undeclared_focus_resolves_nothing() {
        let spy = Spy::default();
        let args = ArgumentSet::builder()
            .field(FieldBuilder::new("first", spy.clone()).description("First"))
            .field(FieldBuilder::new("second", spy.clone()).description("Second"))
            .build()
            .unwrap();

        let prior = engine()
            .parse_for_autocomplete(
                &args,
                &raw(json!({"first": "a", "second": "b"})),
                "missing",
                &guild(),
                &CancelToken::never(),
            )
            .await;

        assert!(prior.is_empty());
        assert!(spy.seen.lock().unwrap().is_empty());
    }
}
