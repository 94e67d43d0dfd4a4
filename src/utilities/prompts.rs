//! Prompt construction for the roleplay side of a training session.
//!
//! The evaluator prompt lives in [`crate::scoring::prompt`]; this module
//! builds the in-character system prompt that drives the persona during
//! the conversation itself.

/// Builds the system prompt for a persona-based roleplay session.
///
/// The persona plays the customer/client with a problem; the trainee
/// practices handling them. Scenario details and persona context are
/// optional blocks supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct RoleplayPrompt {
    /// Title of the training the session belongs to.
    pub training_title: String,
    /// Optional scenario background (situation, stakes, constraints).
    pub scenario_details: Option<String>,
    /// Optional persona description (emotional state, communication style).
    pub persona_context: Option<String>,
}

impl RoleplayPrompt {
    /// Create a prompt builder for the given training title.
    pub fn new(training_title: impl Into<String>) -> Self {
        Self {
            training_title: training_title.into(),
            scenario_details: None,
            persona_context: None,
        }
    }

    /// Attach scenario background.
    pub fn with_scenario(mut self, details: impl Into<String>) -> Self {
        self.scenario_details = Some(details.into());
        self
    }

    /// Attach persona context.
    pub fn with_persona(mut self, context: impl Into<String>) -> Self {
        self.persona_context = Some(context.into());
        self
    }

    /// Render the system prompt text.
    pub fn render(&self) -> String {
        let mut prompt = format!(
            "You are roleplaying as a customer/client in a training simulation for \"{}\".\n",
            self.training_title
        );

        if let Some(ref context) = self.persona_context {
            prompt.push_str(&format!("\nPERSONA CONTEXT:\n{}\n", context));
        }

        if let Some(ref details) = self.scenario_details {
            prompt.push_str(&format!("\nSCENARIO DETAILS:\n{}\n", details));
        }

        prompt.push_str(
            "\nCRITICAL INSTRUCTIONS:\n\
             - Stay completely IN CHARACTER as the persona described above\n\
             - DO NOT introduce yourself as an \"AI training assistant\"\n\
             - DO NOT ask \"how can I help you\" - YOU are the one who needs help\n\
             - Start the conversation immediately with your complaint/issue/request as the persona would\n\
             - React naturally to what the trainee says, staying true to the persona's emotional state and communication style\n\
             - Be realistic and challenging but fair - help the trainee practice real-world scenarios\n\
             - Keep responses concise and conversational (2-4 sentences typically)\n\
             - The user is training to handle YOU, so act as the customer/client who has the problem\n\
             \n\
             Begin the roleplay immediately without breaking character.",
        );

        prompt
    }
}
