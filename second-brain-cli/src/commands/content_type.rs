use clap::Subcommand;
use second_brain_agents::Deps;
use second_brain_core::domain::{ContentCategory, ContentTypeConfig};
use second_brain_core::storage_service::StorageService as _;

#[derive(Subcommand)]
pub enum ContentTypeCommand {
    List,
    Add {
        slug: String,
        display_name: String,
        /// One of content, knowledge, other.
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        writing_instructions: String,
        #[arg(long, default_value = "")]
        length_guidance: String,
    },
    Remove {
        slug: String,
    },
}

pub async fn run(command: ContentTypeCommand, deps: &Deps) -> anyhow::Result<()> {
    match command {
        ContentTypeCommand::List => {
            let types = deps.storage.list_content_types().await?;
            super::print_json(&serde_json::json!({ "content_types": types }));
        }
        ContentTypeCommand::Add { slug, display_name, category, description, writing_instructions, length_guidance } => {
            let category = match category.as_str() {
                "content" => ContentCategory::Content,
                "knowledge" => ContentCategory::Knowledge,
                _ => ContentCategory::Other,
            };
            let config = ContentTypeConfig {
                slug,
                display_name,
                category,
                is_builtin: false,
                description,
                writing_instructions,
                length_guidance,
                ui_config: serde_json::json!({}),
            };
            deps.storage.add_content_type(config).await?;
            super::print_json(&serde_json::json!({ "ok": true }));
        }
        ContentTypeCommand::Remove { slug } => {
            deps.storage.remove_content_type(&slug).await?;
            super::print_json(&serde_json::json!({ "ok": true }));
        }
    }
    Ok(())
}
