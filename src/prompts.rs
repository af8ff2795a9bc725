/// Build the refinement request sent to the model for one pass.
///
/// The wrapper is fixed; only the current prompt text is substituted in.
/// The model is instructed to answer with the rewritten prompt and
/// nothing else, so the caller only needs to trim the response.
pub fn build_refinement_prompt(current_prompt: &str) -> String {
    format!(
        r#"You are an expert **Prompt Refinement and Standardization Engine**. Your goal is to rewrite the user's 'Original Prompt' to conform to best-in-class prompt engineering standards for a Large Language Model (LLM).

Your revision must implement the following **mandatory best practices**:

1.  **Assign a Clear Role:** Start the prompt by giving the model an authoritative, specific persona (e.g., "You are a professional copywriter," or "You are a meticulous JSON formatter").
2.  **Explicit Constraints:** Add clear, specific rules that the LLM must follow (e.g., "NEVER hallucinate," "Limit the response to 3 sentences," "Do not include any conversational preamble").
3.  **Structured Output Request (if applicable):** If the prompt implies a structured output (like a list, table, or JSON), explicitly request that structure and define its fields/format.
4.  **Clarity & Brevity:** Refactor vague language into explicit, simple commands. Remove any unnecessary fluff or redundancy.
5.  **Place Variable Content Last:** Ensure the original prompt's core instructions are defined first, and any placeholder for user input or variable content is clearly indicated at the end (e.g., "The text to summarize is: [INPUT_TEXT]").

---
**Original Prompt to be optimized:**
{current_prompt}

---
**OUTPUT REQUIREMENT:**
Provide **ONLY** the full, single, optimized prompt string as your entire response. Do not include any headers, commentary, or markdown code fences (```). The output must be ready to be used as a new prompt template."#
    )
}
