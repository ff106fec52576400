use chorus_domain::labels::{THOUGHT_LABELS, strip_leading_labels};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{ChorusService, persona::Persona, prompts};

/// One persona's contribution to a run log. Created exactly once per persona
/// per run and immutable afterwards. Always well-formed: retrieval and
/// generation failures are carried in-band as degraded text, never as
/// errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
	pub persona: String,
	pub thought: String,
	pub context_used: Vec<String>,
}

impl ChorusService {
	pub(crate) async fn run_persona(&self, persona: Persona, question: &str) -> AgentResult {
		let profile = persona.profile();
		let context = self.retrieve_context(question, profile).await;

		// A failed lookup already degraded the context to a placeholder;
		// the thought records the failure instead of reacting to it.
		if let Some(failure) = context.failure {
			return AgentResult {
				persona: profile.id.to_string(),
				thought: format!("(retrieval error: {failure})"),
				context_used: context.docs,
			};
		}

		let prompt = prompts::persona_prompt(profile, question, &context.docs);
		let thought = match self
			.providers
			.generation
			.generate(&self.cfg.providers.generation, &prompt)
			.await
		{
			Ok(raw) => strip_leading_labels(&raw, THOUGHT_LABELS),
			Err(err) => {
				warn!(
					error = %err,
					persona = profile.id,
					"Generation failed; recording an error thought."
				);

				format!("(generation error: {err})")
			},
		};

		AgentResult { persona: profile.id.to_string(), thought, context_used: context.docs }
	}
}
