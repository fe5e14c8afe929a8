//! Copilot handler
//!
//! Composes a specialized system instruction from the detected sub-intent
//! and the serialized context bundle, then obtains exactly one completion
//! from the model service.

use crate::context::ContextBundle;
use crate::error::Result;
use crate::llm::CompletionClient;
use crate::orchestrator::SuccessBody;
use std::sync::Arc;
use tracing::debug;

/// Specialized instruction persona for a copilot request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    /// Numbered list of weaknesses and improvements
    CodeAudit,

    /// Yes/no verdict plus concise justification
    PhysicsValidation,

    /// Legacy-code conversion guidance
    CodeModernization,

    /// General scientific assistant
    General,
}

/// Ordered persona rules: first matching rule wins, `General` otherwise.
/// Kept as data so the tie-break order stays explicit and testable.
const PERSONA_RULES: &[(&[&str], Persona)] = &[
    (&["analyse", "analyze", "code"], Persona::CodeAudit),
    (
        &["validate", "valide", "physics", "equation"],
        Persona::PhysicsValidation,
    ),
    (
        &["modernise", "modernize", "fortran"],
        Persona::CodeModernization,
    ),
];

impl Persona {
    /// Detect the persona from request text, case-insensitive.
    pub fn detect(text: &str) -> Self {
        let lowered = text.to_lowercase();
        for (keywords, persona) in PERSONA_RULES {
            if keywords.iter().any(|keyword| lowered.contains(keyword)) {
                return *persona;
            }
        }
        Persona::General
    }

    /// The system instruction embedding this persona.
    pub fn instruction(&self) -> &'static str {
        match self {
            Persona::CodeAudit => {
                "You are a scientific code auditor with expertise in numerical \
                 methods and simulation software. Examine the code in the request \
                 and respond ONLY with a numbered list of weaknesses and concrete \
                 improvements: numerical stability, boundary condition handling, \
                 unit consistency, and performance. No prose outside the list."
            }
            Persona::PhysicsValidation => {
                "You are a computational physicist validating the physical \
                 consistency of models and code. Check conservation of mass, \
                 energy, and momentum, boundary condition consistency, and \
                 numerical scheme stability. Respond with a yes/no verdict \
                 first, then a concise justification."
            }
            Persona::CodeModernization => {
                "You are a scientific engineering expert modernizing legacy \
                 Fortran and C++ to modern Python with NumPy, SciPy, and \
                 TensorFlow. Respond with conversion guidance that preserves \
                 numerical accuracy, physical units, and convergence behavior, \
                 and favors vectorized implementations."
            }
            Persona::General => {
                "You are a scientific engineering assistant for CFD, \
                 thermodynamics, and fluid mechanics. Answer precisely and \
                 concisely, grounding your response in the provided context \
                 when it is relevant."
            }
        }
    }
}

/// Language-model-backed handler for copilot requests
pub struct CopilotHandler {
    client: Arc<dyn CompletionClient>,
    max_tokens: u32,
}

impl CopilotHandler {
    pub fn new(client: Arc<dyn CompletionClient>, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }

    /// Select the persona, build the system instruction with the serialized
    /// context bundle, and issue exactly one completion request.
    pub async fn handle(&self, text: &str, context: &ContextBundle) -> Result<SuccessBody> {
        let persona = Persona::detect(text);
        debug!(?persona, "Copilot persona selected");

        let system = format!(
            "{}\n\n--- Retrieved Context ---\n{}",
            persona.instruction(),
            context.format_for_prompt()
        );

        let completion = self.client.complete(&system, text, self.max_tokens).await?;

        Ok(SuccessBody::copilot(completion.text, completion.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_detection() {
        assert_eq!(
            Persona::detect("Please analyse this code for correctness"),
            Persona::CodeAudit
        );
        assert_eq!(
            Persona::detect("validate my physics model"),
            Persona::PhysicsValidation
        );
        assert_eq!(
            Persona::detect("is this equation dimensionally consistent?"),
            Persona::PhysicsValidation
        );
        assert_eq!(
            Persona::detect("modernise this Fortran routine"),
            Persona::CodeModernization
        );
        assert_eq!(Persona::detect("what is a Reynolds number?"), Persona::General);
    }

    #[test]
    fn test_persona_rule_order_is_tie_break() {
        // Matches both the code-audit and physics rules; the code-audit
        // rule comes first, so it wins.
        assert_eq!(
            Persona::detect("analyse the physics in this equation"),
            Persona::CodeAudit
        );
    }

    #[test]
    fn test_persona_detection_case_insensitive() {
        assert_eq!(Persona::detect("ANALYZE MY CODE"), Persona::CodeAudit);
        assert_eq!(Persona::detect("FORTRAN"), Persona::CodeModernization);
    }

    #[test]
    fn test_instructions_match_response_contract() {
        assert!(Persona::CodeAudit.instruction().contains("numbered list"));
        assert!(Persona::PhysicsValidation.instruction().contains("yes/no"));
        assert!(Persona::CodeModernization
            .instruction()
            .contains("conversion guidance"));
    }
}
