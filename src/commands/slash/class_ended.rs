//! Class-ended slash command: /class_ended

use serenity::builder::CreateApplicationCommand;

/// Creates the class_ended command
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![CreateApplicationCommand::default()
        .name("class_ended")
        .description("Post the end-of-class prompt to the updates channel")
        .to_owned()]
}
