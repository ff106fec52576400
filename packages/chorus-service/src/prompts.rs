//! Fixed instruction templates for the two generation calls.

use crate::{executor::AgentResult, persona::PersonaProfile};

pub(crate) fn persona_prompt(
	profile: &PersonaProfile,
	question: &str,
	context_docs: &[String],
) -> String {
	let context = if context_docs.is_empty() {
		"(no matching documents in the archive)".to_string()
	} else {
		context_docs.iter().map(|doc| format!("- {doc}")).collect::<Vec<_>>().join("\n")
	};

	format!(
		"\
You are the agent {id}.
Role: {role}
Style: {style}

Context recovered from your archive:
{context}

User question: \"{question}\"

Instructions:
1. Stay in character. Analyze the question using only your personality and the context above.
2. Produce a short reaction: at most 80 words and at most 5 sentences.
3. Answer with the reaction only, without meta-labels such as \"Thought:\" and without introductory parentheses.",
		id = profile.id,
		role = profile.role,
		style = profile.style,
	)
}

pub(crate) fn synthesis_prompt(question: &str, log: &[AgentResult]) -> String {
	let opinions = log
		.iter()
		.map(|entry| format!("AGENT {}: {}", entry.persona, entry.thought))
		.collect::<Vec<_>>()
		.join("\n");

	format!(
		"\
Act as a Digital Historian synthesizing a debate between {count} analyst agents.

User question: \"{question}\"

Agent opinions:
{opinions}

Task:
Write one final conclusion of at most 120 words that contrasts how each agent sees the problem from its own angle.
Keep a narrative tone and end with a single reflective statement.
Answer with the conclusion only, without leading labels such as \"Synthesis:\".",
		count = log.len(),
	)
}
