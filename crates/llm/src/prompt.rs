/// Exact reply the model is told to give when the context has no answer
pub const FALLBACK_ANSWER: &str = "Det vet jag inte.";

/// Fill the fixed answering template with retrieved context and the question
#[must_use]
pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "
Du är en expert på att analysera akademiska texter. Du ska svara tydligt och korrekt på frågan nedan, endast med hjälp av den medföljande kontexten.

KONTEKST:
{context}

FRÅGA:
{query}

INSTRUKTION:
- Använd så mycket relevant information som möjligt från kontexten.
- Om svaret inte tydligt finns i kontexten, svara exakt med: \"{FALLBACK_ANSWER}\"
- Gissa inte.
"
    )
}
