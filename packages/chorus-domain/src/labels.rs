//! Leading-label stripping for generation output.
//!
//! The generation capability does not reliably honor "no meta-labels"
//! instructions, so known leading labels are removed client-side. The rule
//! set is a small, explicitly enumerated list per output kind; it is a
//! compensating control for an unreliable external capability, not a parser.

/// Labels the persona reaction template forbids but models still emit.
pub const THOUGHT_LABELS: &[&str] =
	&["Thought:", "(Internal thought)", "Internal thought:", "Opinion:", "Reaction:"];

/// Labels seen in front of synthesis output.
pub const SYNTHESIS_LABELS: &[&str] =
	&["Síntesis Narrativa:", "Narrative synthesis:", "Synthesis:", "Conclusion:"];

/// Removes every leading occurrence of the given labels, case-insensitively,
/// along with surrounding whitespace. Stripping loops until no label matches,
/// so applying it to an already-clean string returns that string unchanged.
pub fn strip_leading_labels(text: &str, labels: &[&str]) -> String {
	let mut rest = text.trim();

	'strip: loop {
		for label in labels {
			if let Some(stripped) = strip_label_prefix(rest, label) {
				rest = stripped.trim_start();

				continue 'strip;
			}
		}

		break;
	}

	rest.to_string()
}

fn strip_label_prefix<'a>(text: &'a str, label: &str) -> Option<&'a str> {
	let candidate = text.get(..label.len())?;

	// Uppercase and lowercase forms of the Latin letters used in the label
	// sets have identical UTF-8 lengths, so slicing by the label length is a
	// valid prefix to compare case-insensitively.
	if candidate.to_lowercase() == label.to_lowercase() {
		Some(&text[label.len()..])
	} else {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_known_thought_label() {
		assert_eq!(
			strip_leading_labels("Thought: the data is unsettling.", THOUGHT_LABELS),
			"the data is unsettling."
		);
	}

	#[test]
	fn strips_labels_case_insensitively() {
		assert_eq!(strip_leading_labels("OPINION: buy the dip.", THOUGHT_LABELS), "buy the dip.");
	}

	#[test]
	fn strips_parenthesized_label() {
		assert_eq!(
			strip_leading_labels("(Internal thought) connections fade.", THOUGHT_LABELS),
			"connections fade."
		);
	}

	#[test]
	fn strips_stacked_labels() {
		assert_eq!(
			strip_leading_labels("Thought: Opinion: hold steady.", THOUGHT_LABELS),
			"hold steady."
		);
	}

	#[test]
	fn strips_accented_synthesis_label() {
		assert_eq!(
			strip_leading_labels("SÍNTESIS NARRATIVA: three voices, one fear.", SYNTHESIS_LABELS),
			"three voices, one fear."
		);
	}

	#[test]
	fn is_idempotent_on_clean_text() {
		let clean = strip_leading_labels("Thought: the archive remembers.", THOUGHT_LABELS);

		assert_eq!(strip_leading_labels(&clean, THOUGHT_LABELS), clean);
	}

	#[test]
	fn leaves_mid_text_labels_alone() {
		assert_eq!(
			strip_leading_labels("My only Thought: survive.", THOUGHT_LABELS),
			"My only Thought: survive."
		);
	}

	#[test]
	fn empty_input_stays_empty() {
		assert_eq!(strip_leading_labels("   ", THOUGHT_LABELS), "");
	}
}
