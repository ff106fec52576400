use chorus_domain::labels::{SYNTHESIS_LABELS, strip_leading_labels};
use tracing::warn;

use crate::{ChorusService, executor::AgentResult, prompts};

impl ChorusService {
	/// Terminal step. Its context is the accumulated log rather than the
	/// vector store. A generation failure degrades to an error synthesis and
	/// never invalidates the log built so far.
	pub(crate) async fn synthesize(&self, question: &str, log: &[AgentResult]) -> String {
		let prompt = prompts::synthesis_prompt(question, log);

		match self.providers.generation.generate(&self.cfg.providers.generation, &prompt).await {
			Ok(raw) => strip_leading_labels(&raw, SYNTHESIS_LABELS),
			Err(err) => {
				warn!(error = %err, "Synthesis generation failed; recording an error synthesis.");

				format!("(synthesis error: {err})")
			},
		}
	}
}
