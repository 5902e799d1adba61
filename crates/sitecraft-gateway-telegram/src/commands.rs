use teloxide::types::{MessageEntity, MessageEntityKind};
use teloxide::utils::command::BotCommands;

/// Commands the bot answers. Any other text is treated as a website prompt.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "start the conversation")]
    Start,
    #[command(description = "show how to describe a website")]
    Help,
}

/// Whether a message text should be sent to the generator.
///
/// Telegram marks a command with a `bot_command` entity at offset 0, so a
/// leading slash alone ("/ a landing page") does not make a command.
pub fn is_prompt(text: &str, entities: &[MessageEntity]) -> bool {
    !text.is_empty() && !entities.iter().any(opens_with_command)
}

fn opens_with_command(entity: &MessageEntity) -> bool {
    entity.offset == 0 && matches!(entity.kind, MessageEntityKind::BotCommand)
}
