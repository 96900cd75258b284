//! One module per subcommand, each a thin translation from parsed CLI
//! arguments into an agent call or direct service call over the shared
//! `Deps` container.

pub mod content_type;
pub mod create;
pub mod health;
pub mod learn;
pub mod pipeline;
pub mod recall;
pub mod review;

pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}
