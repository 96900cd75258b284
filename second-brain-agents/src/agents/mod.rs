//! The fixed fleet of 13 named agents (§4.4, §5.1).

pub mod chief_of_staff;
pub mod clarity;
pub mod coach;
pub mod create;
pub mod email;
pub mod hook_writer;
pub mod learn;
pub mod pmo;
pub mod recall_agent;
pub mod review;
pub mod specialist;
pub mod synthesizer;
pub mod template_builder;

#[cfg(test)]
pub(crate) mod test_support;

pub use chief_of_staff::ChiefOfStaffAgent;
pub use clarity::ClarityAgent;
pub use coach::CoachAgent;
pub use create::CreateAgent;
pub use email::EmailAgent;
pub use hook_writer::HookWriterAgent;
pub use learn::LearnAgent;
pub use pmo::PmoAgent;
pub use recall_agent::RecallAgent;
pub use review::ReviewAgent;
pub use specialist::SpecialistAgent;
pub use synthesizer::SynthesizerAgent;
pub use template_builder::TemplateBuilderAgent;
