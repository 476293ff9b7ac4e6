//! Argument test commands: one command per converter family, each replying
//! with what it parsed.

use std::fmt::Write as _;

use anyhow::Result;
use slashforge_commands::{
    action_fn, suggest_string_map, suggest_strings, suggest_with, ArgumentSet, CommandDefinition,
    CommandRegistry, CommandResponse, FieldBuilder,
};
use slashforge_core::ChannelType;

/// Register every argument test command.
pub fn register(registry: &mut CommandRegistry) -> Result<()> {
    for command in [
        test_tag()?,
        test_emoji()?,
        optional_autocomplete()?,
        length_constrained()?,
        attachment()?,
        channel()?,
        autocomplete()?,
    ] {
        registry.register(command)?;
    }
    Ok(())
}

fn test_tag() -> Result<CommandDefinition> {
    let arguments = ArgumentSet::builder()
        .field(
            FieldBuilder::channel("channel")
                .description("Channel to select a tag from")
                .optional()
                .require_channel_type(ChannelType::GuildForum),
        )
        .field(
            FieldBuilder::tag("tag")
                .description("Tag to use")
                .optional()
                .depends_on("channel"),
        )
        .build()?;

    Ok(CommandDefinition::builder("test-tag")
        .description("Test the tags converter")
        .arguments(arguments)
        .parse_for_autocomplete(true)
        .action(action_fn(|ctx| {
            let channel = ctx.arguments.channel("channel").map(|c| c.mention());
            let tag = ctx.arguments.tag("tag").map(|t| t.name.as_str());
            Ok(CommandResponse::ok(format!(
                "Channel provided: `{}`\nTag provided: `{}`",
                channel.as_deref().unwrap_or("none"),
                tag.unwrap_or("none"),
            )))
        }))
        .build()?)
}

fn test_emoji() -> Result<CommandDefinition> {
    let arguments = ArgumentSet::builder()
        .field(FieldBuilder::emoji("emoji").description("A custom or Unicode emoji"))
        .build()?;

    Ok(CommandDefinition::builder("test-emoji")
        .description("Test the emoji converter")
        .arguments(arguments)
        .action(action_fn(|ctx| {
            let Some(emoji) = ctx.arguments.emoji("emoji") else {
                anyhow::bail!("emoji missing after a successful parse");
            };
            let kind = if emoji.is_guild() { "Guild" } else { "Unicode" };
            Ok(CommandResponse::ok(format!(
                "{kind} emoji provided: `{}` (`{}`)",
                emoji.mention(),
                emoji.name()
            )))
        }))
        .build()?)
}

fn optional_autocomplete() -> Result<CommandDefinition> {
    let arguments = ArgumentSet::builder()
        .field(
            FieldBuilder::string("response")
                .description("Text to receive")
                .optional()
                .autocomplete(suggest_string_map([
                    ("one", "One"),
                    ("two", "Two"),
                    ("three", "Three"),
                ])),
        )
        .build()?;

    Ok(CommandDefinition::builder("optional-autocomplete")
        .description("Check whether autocomplete works with an optional converter.")
        .arguments(arguments)
        .action(action_fn(|ctx| {
            let response = ctx.arguments.string("response").unwrap_or("none");
            Ok(CommandResponse::ok(format!("You provided: `{response}`")))
        }))
        .build()?)
}

fn length_constrained() -> Result<CommandDefinition> {
    let arguments = ArgumentSet::builder()
        .field(
            FieldBuilder::string("name")
                .description("The user's name.")
                .min_length(3)
                .max_length(10),
        )
        .field(
            FieldBuilder::string("last_name")
                .description("The user's last name.")
                .optional()
                .min_length(4)
                .max_length(15),
        )
        .build()?;

    Ok(CommandDefinition::builder("length-constrained")
        .description("Check if length limits work")
        .arguments(arguments)
        .action(action_fn(|ctx| {
            let name = ctx.arguments.string("name").unwrap_or_default();
            let mut text = format!("You name is: `{name}`");
            if let Some(last) = ctx.arguments.string("last_name") {
                write!(text, " `{last}`")?;
            }
            Ok(CommandResponse::ok(text))
        }))
        .build()?)
}

fn attachment() -> Result<CommandDefinition> {
    let arguments = ArgumentSet::builder()
        .field(FieldBuilder::attachment("file").description("An attached file."))
        .field(
            FieldBuilder::attachment("optional_file")
                .description("An optional file.")
                .optional(),
        )
        .build()?;

    Ok(CommandDefinition::builder("attachment")
        .description("Check attachment command options.")
        .arguments(arguments)
        .action(action_fn(|ctx| {
            let file = ctx.arguments.attachment("file").map(|a| a.filename.as_str());
            let mut text = format!("You attached: {}.", file.unwrap_or_default());
            if let Some(extra) = ctx.arguments.attachment("optional_file") {
                write!(text, "\nYou also attached: {}", extra.filename)?;
            }
            Ok(CommandResponse::ok(text))
        }))
        .build()?)
}

fn channel() -> Result<CommandDefinition> {
    let arguments = ArgumentSet::builder()
        .field(
            FieldBuilder::channel("channel")
                .description("A text channel")
                .require_channel_type(ChannelType::GuildText),
        )
        .build()?;

    Ok(CommandDefinition::builder("channel")
        .description("Check channel command options.")
        .arguments(arguments)
        .action(action_fn(|ctx| {
            let channel = ctx.arguments.channel("channel").map(|c| c.mention()).unwrap_or_default();
            Ok(CommandResponse::ok(format!("You specified: {channel}.")))
        }))
        .build()?)
}

fn autocomplete() -> Result<CommandDefinition> {
    let arguments = ArgumentSet::builder()
        .field(
            FieldBuilder::string_choice("one", [("O", "o"), ("T", "t"), ("F", "f")])
                .description("Choice argument"),
        )
        .field(
            FieldBuilder::string("two")
                .description("Autocomplete argument")
                .autocomplete(suggest_with(|ctx| {
                    let one = ctx.prior.string("one").unwrap_or_default().to_lowercase();
                    let words = ["one", "two", "three", "four"]
                        .into_iter()
                        .filter(|w| w.contains(one.as_str()));
                    suggest_strings(words, ctx.partial)
                })),
        )
        .build()?;

    Ok(CommandDefinition::builder("autocomplete")
        .description("Test auto-completion events")
        .arguments(arguments)
        .parse_for_autocomplete(true)
        .action(action_fn(|ctx| {
            let one = ctx.arguments.string("one").unwrap_or_default();
            let two = ctx.arguments.string("two").unwrap_or_default();
            Ok(CommandResponse::ok(format!("**One:** {one}\n**Two:** {two}\n")))
        }))
        .build()?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use slashforge_commands::{
        AutocompleteInteraction, CommandDispatcher, CommandInteraction, DispatchSettings,
    };
    use slashforge_core::{Channel, Emoji, ForumTag, StaticLookup};

    use super::*;

    const GUILD: u64 = 1;

    fn dispatcher() -> CommandDispatcher {
        let mut registry = CommandRegistry::new();
        register(&mut registry).unwrap();

        let tag = |id, name: &str| ForumTag {
            id,
            name: name.into(),
            moderated: false,
            emoji_name: None,
        };
        let lookup = StaticLookup::new()
            .with_channel(Channel {
                id: 10,
                guild_id: Some(GUILD),
                name: "general".into(),
                kind: ChannelType::GuildText,
                available_tags: vec![],
            })
            .with_channel(Channel {
                id: 30,
                guild_id: Some(GUILD),
                name: "help".into(),
                kind: ChannelType::GuildForum,
                available_tags: vec![tag(1001, "Bug"), tag(1002, "Question"), tag(1003, "Feature")],
            })
            .with_emoji(Emoji::Guild {
                id: 500,
                guild_id: GUILD,
                name: "blob".into(),
                animated: false,
            });

        CommandDispatcher::new(registry, Arc::new(lookup), DispatchSettings::default())
    }

    async fn invoke(payload: serde_json::Value) -> CommandResponse {
        let interaction: CommandInteraction = serde_json::from_value(payload).unwrap();
        dispatcher().dispatch_command(&interaction).await.unwrap()
    }

    async fn complete(payload: serde_json::Value) -> Vec<String> {
        let interaction: AutocompleteInteraction = serde_json::from_value(payload).unwrap();
        dispatcher()
            .dispatch_autocomplete(&interaction)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.label)
            .collect()
    }

    #[test]
    fn registers_all_commands() {
        let mut registry = CommandRegistry::new();
        register(&mut registry).unwrap();
        assert_eq!(registry.len(), 7);
    }

    #[tokio::test]
    async fn length_limits_name_the_field() {
        let ok = invoke(json!({
            "commandName": "length-constrained",
            "options": { "name": "Ada", "last_name": "Lovelace" }
        }))
        .await;
        assert_eq!(ok.text, "You name is: `Ada` `Lovelace`");

        let short = invoke(json!({
            "commandName": "length-constrained",
            "options": { "name": "Al" }
        }))
        .await;
        assert!(short.ephemeral);
        assert!(short.text.contains("`name`"));
    }

    #[tokio::test]
    async fn tag_resolves_against_selected_forum() {
        let response = invoke(json!({
            "commandName": "test-tag",
            "options": { "channel": "<#30>", "tag": "question" },
            "context": { "guildId": GUILD }
        }))
        .await;
        assert_eq!(response.text, "Channel provided: `<#30>`\nTag provided: `Question`");
    }

    #[tokio::test]
    async fn tag_suggestions_follow_the_channel() {
        let labels = complete(json!({
            "commandName": "test-tag",
            "focusedOption": "tag",
            "partialInput": "e",
            "options": { "channel": "30" },
            "context": { "guildId": GUILD }
        }))
        .await;
        assert_eq!(labels, vec!["Question", "Feature"]);

        let without_channel = complete(json!({
            "commandName": "test-tag",
            "focusedOption": "tag",
            "partialInput": ""
        }))
        .await;
        assert!(without_channel.is_empty());
    }

    #[tokio::test]
    async fn sample_payloads_match_their_subcommands() {
        let command = include_str!("../payloads/test-tag.json");
        let autocomplete = include_str!("../payloads/test-tag-complete.json");
        assert!(serde_json::from_str::<AutocompleteInteraction>(command).is_err());

        let response = dispatcher().dispatch_command_json(command).await.unwrap();
        assert_eq!(response.text, "Channel provided: `<#30>`\nTag provided: `Bug`");

        let labels: Vec<_> = dispatcher()
            .dispatch_autocomplete_json(autocomplete)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(labels, vec!["Question", "Feature"]);
    }

    #[tokio::test]
    async fn emoji_reports_its_kind() {
        let guild = invoke(json!({
            "commandName": "test-emoji",
            "options": { "emoji": ":blob:" },
            "context": { "guildId": GUILD }
        }))
        .await;
        assert_eq!(guild.text, "Guild emoji provided: `<:blob:500>` (`blob`)");
    }

    #[tokio::test]
    async fn optional_autocomplete_offers_keys() {
        let labels = complete(json!({
            "commandName": "optional-autocomplete",
            "focusedOption": "response",
            "partialInput": "t"
        }))
        .await;
        assert_eq!(labels, vec!["two", "three"]);
    }

    #[tokio::test]
    async fn autocomplete_filters_by_prior_choice() {
        let labels = complete(json!({
            "commandName": "autocomplete",
            "focusedOption": "two",
            "partialInput": "",
            "options": { "one": "o" }
        }))
        .await;
        assert_eq!(labels, vec!["one", "two", "four"]);
    }

    #[tokio::test]
    async fn channel_rejects_wrong_type() {
        let response = invoke(json!({
            "commandName": "channel",
            "options": { "channel": "30" },
            "context": { "guildId": GUILD }
        }))
        .await;
        assert!(response.ephemeral);
        assert!(response.text.starts_with("Invalid value for `channel`"));
    }
}
