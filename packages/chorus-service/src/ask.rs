use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{ChorusService, ServiceError, ServiceResult, executor::AgentResult, persona::Persona};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
	pub question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
	pub synthesis: String,
	pub logs: Vec<AgentResult>,
}

impl ChorusService {
	/// Runs one question through the whole pipeline: every persona in
	/// `Persona::EXECUTION_ORDER`, strictly in sequence, then the
	/// synthesizer over the completed log. Persona steps are independent of
	/// each other; only the synthesizer sees the full log.
	///
	/// Per-step failures degrade to in-band text, so the final log always
	/// carries exactly one entry per persona, in order. The only error this
	/// returns is an empty question.
	pub async fn ask(&self, req: AskRequest) -> ServiceResult<AskResponse> {
		let question = req.question.trim();

		if question.is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "question must be non-empty.".to_string(),
			});
		}

		let run_id = Uuid::new_v4();

		info!(%run_id, "Run started.");

		// The log is the run's only accumulator: each step returns its
		// contribution and the orchestrator appends it here.
		let mut log = Vec::with_capacity(Persona::EXECUTION_ORDER.len());

		for persona in Persona::EXECUTION_ORDER {
			let entry = self.run_persona(persona, question).await;

			debug!(%run_id, persona = entry.persona.as_str(), "Persona step finished.");

			log.push(entry);
		}

		let synthesis = self.synthesize(question, &log).await;

		info!(%run_id, steps = log.len(), "Run finished.");

		Ok(AskResponse { synthesis, logs: log })
	}
}
