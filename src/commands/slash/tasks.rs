//! Task slash commands: /add_task, /delete_task, /list_tasks, /search_tasks

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

/// Creates task management commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_add_task_command(),
        create_delete_task_command(),
        create_list_tasks_command(),
        create_search_tasks_command(),
    ]
}

fn create_add_task_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("add_task")
        .description("Register a new task")
        .create_option(|option| {
            option
                .name("name")
                .description("Task name")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("subject")
                .description("Subject the task belongs to")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("due_date")
                .description("Due date (YYYY-MM-DD or YYYY-MM-DD HH:MM)")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("description")
                .description("Optional details")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .to_owned()
}

fn create_delete_task_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("delete_task")
        .description("Delete a task you registered")
        .create_option(|option| {
            option
                .name("task_id")
                .description("ID of the task to delete")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}

fn create_list_tasks_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("list_tasks")
        .description("List registered tasks")
        .create_option(|option| {
            option
                .name("filter")
                .description("Urgency filter")
                .kind(CommandOptionType::String)
                .required(false)
                .add_string_choice("All tasks", "all")
                .add_string_choice("Due today", "today")
                .add_string_choice("Due tomorrow", "tomorrow")
                .add_string_choice("Due this week", "this_week")
                .add_string_choice("Overdue", "overdue")
        })
        .create_option(|option| {
            option
                .name("subject")
                .description("Narrow to a subject")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .to_owned()
}

fn create_search_tasks_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("search_tasks")
        .description("Search tasks by name keyword")
        .create_option(|option| {
            option
                .name("keyword")
                .description("Keyword to search for")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}
