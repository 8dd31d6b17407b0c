//! LLM prompt engineering for myth verification

/// Builds prompts asking the LLM to judge a myth submission
pub struct PromptBuilder {
    claim: String,
    reality: String,
    sources: Vec<String>,
    max_sources: usize,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(claim: impl Into<String>, reality: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            reality: reality.into(),
            sources: Vec::new(),
            max_sources: usize::MAX,
        }
    }

    /// Add the user-supplied sources
    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    /// Cap the number of sources listed in the prompt
    pub fn with_max_sources(mut self, max_sources: usize) -> Self {
        self.max_sources = max_sources;
        self
    }

    /// Build the complete verification prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Role
        prompt.push_str(ROLE_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. The submission
        prompt.push_str(&format!("Myth Claim: \"{}\"\n", self.claim.trim()));
        prompt.push_str(&format!("Proposed Fact: \"{}\"\n", self.reality.trim()));

        let sources: Vec<&str> = self
            .sources
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .take(self.max_sources)
            .collect();
        if sources.is_empty() {
            prompt.push_str("User Provided Sources: none provided\n\n");
        } else {
            prompt.push_str(&format!("User Provided Sources: {}\n\n", sources.join(", ")));
        }

        // 3. Task list
        prompt.push_str(TASK_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 4. Output format
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

const ROLE_INSTRUCTIONS: &str = "You are the Truth Arbiter for 'Ekmyth', a fact-checking platform.
Review the following submission:";

const TASK_INSTRUCTIONS: &str = r#"Task:
1. Verify if the "Proposed Fact" is accurate and effectively debunks the "Myth Claim".
2. Analyze the credibility of the provided sources (if any).
3. Use web search to cross-reference the claim with reputable sources.
4. Provide a verdict:
   - VERIFIED = The proposed fact is true and busts the myth
   - BUSTED = The proposed fact is actually false
   - PARTIALLY_TRUE = Nuanced
   - UNCERTAIN = Not enough info
5. Provide a confidence score (0-100).
6. Provide a detailed reasoning summary. Explicitly explain WHY the "Myth Claim" is considered false (or true) and WHY the "Proposed Fact" is accurate (or inaccurate), citing evidence found during the search. Ensure both sides are addressed."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"IMPORTANT: Return your response as a valid JSON object with the following structure:
{
  "verdict": "VERIFIED" | "BUSTED" | "PARTIALLY_TRUE" | "UNCERTAIN",
  "confidence": number,
  "reasoning": "string"
}

Remember: Return ONLY the raw JSON, no markdown code blocks, no explanations."#;
