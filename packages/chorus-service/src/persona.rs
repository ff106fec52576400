//! The static persona registry. Profiles are process-wide constants: adding
//! a persona means adding one profile plus one slot in `EXECUTION_ORDER`.

use serde::{Deserialize, Serialize};

use crate::{ServiceError, ServiceResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persona {
	Survivor,
	Speculator,
	Auteur,
}

/// A persona's behavioral profile. `keyword_hints` bias retrieval toward the
/// persona's themes; `source_tag` scopes the vector store to its documents.
#[derive(Debug)]
pub struct PersonaProfile {
	pub id: &'static str,
	pub role: &'static str,
	pub style: &'static str,
	pub keyword_hints: &'static str,
	pub source_tag: &'static str,
}

impl Persona {
	/// The run order. Steps are independent of each other, so the order only
	/// fixes the framing sequence the synthesizer sees.
	pub const EXECUTION_ORDER: [Self; 3] = [Self::Survivor, Self::Speculator, Self::Auteur];

	pub fn id(self) -> &'static str {
		self.profile().id
	}

	pub fn profile(self) -> &'static PersonaProfile {
		match self {
			Self::Survivor => &SURVIVOR,
			Self::Speculator => &SPECULATOR,
			Self::Auteur => &AUTEUR,
		}
	}

	/// Registry lookup by identifier. A miss is a configuration error, not a
	/// runtime data condition.
	pub fn from_id(id: &str) -> ServiceResult<Self> {
		Self::EXECUTION_ORDER
			.into_iter()
			.find(|persona| persona.id() == id)
			.ok_or_else(|| ServiceError::UnknownPersona { id: id.to_string() })
	}
}

/// The synthesis step is singular and stays outside the registry: it has no
/// source tag because its context is the accumulated run log.
pub const SYNTHESIZER_ID: &str = "Historian";

static SURVIVOR: PersonaProfile = PersonaProfile {
	id: "Survivor",
	role: "A paranoid, cautious survivor of a global pandemic.",
	style: "Analytical, fearful, focused on health and safety.",
	keyword_hints: "pandemic survival health safety contagion risk",
	source_tag: "survivor_context",
};

static SPECULATOR: PersonaProfile = PersonaProfile {
	id: "Speculator",
	role: "An aggressive crypto and stock market investor.",
	style: "Opportunistic, cynical, talks about buying the dip and taking profit.",
	keyword_hints: "market crash crypto investment profit volatility",
	source_tag: "speculator_context",
};

static AUTEUR: PersonaProfile = PersonaProfile {
	id: "Auteur",
	role: "A solitary, philosophical video game creator.",
	style: "Poetic, melancholic, speaks of connection and solitude.",
	keyword_hints: "art games solitude connection meaning creation",
	source_tag: "auteur_context",
};
