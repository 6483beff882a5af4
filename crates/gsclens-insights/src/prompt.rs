//! Prompt text sent to the narrative generator.

use std::fmt::Write as _;

/// System message for every completion.
pub const SYSTEM_INSTRUCTIONS: &str = "You are an expert SEO analyst who provides insights \
grounded in concrete data. Always answer with detailed, actionable analysis.";

/// Appended to deterministic output when no generator is configured.
pub const ENABLE_AI_SUGGESTION: &str =
    "Tip: set OPENAI_API_KEY to enable AI-backed analysis with tailored recommendations.";

const RESPONSE_INSTRUCTIONS: &str = "\
INSTRUCTIONS:
1. Give a detailed, specific analysis
2. Identify trends, opportunities and problems
3. Suggest concrete, measurable actions
4. Use professional but accessible language
5. Quote specific metrics where possible
6. Structure the answer in clear sections

RESPONSE STRUCTURE:
Data analysis
Key insights
Recommendations
Next steps";

const SUGGESTED_QUESTIONS: [&str; 10] = [
    "How much branded traffic did we get in the last 3 months compared with the 3 months before?",
    "Which queries have the best growth potential?",
    "How is branded traffic performing against non-branded traffic?",
    "Which pages lost the most traffic in the last month?",
    "Identify optimisation opportunities based on CTR data",
    "Analyse keyword cannibalisation",
    "Which queries have a high average position but a low CTR?",
    "Identify the pages with the most room for improvement",
    "How is traffic split across devices (mobile vs desktop)?",
    "What seasonal trends does our organic traffic show?",
];

/// Ready-made analysis questions for users who do not know where to start.
#[must_use]
pub fn suggested_questions() -> &'static [&'static str] {
    &SUGGESTED_QUESTIONS
}

/// Assembles the user prompt: role, data digest, optional JSON context, the
/// question and the response instructions.
#[must_use]
pub fn build_prompt(digest: &str, question: &str, context: Option<&serde_json::Value>) -> String {
    let mut prompt = String::from(
        "You are an expert SEO analyst and digital marketer. Analyse the following \
Google Search Console data and provide actionable insights.\n\n",
    );
    let _ = writeln!(prompt, "GOOGLE SEARCH CONSOLE DATA:\n{digest}\n");

    if let Some(context) = context {
        let rendered =
            serde_json::to_string_pretty(context).unwrap_or_else(|_| context.to_string());
        let _ = writeln!(prompt, "ADDITIONAL CONTEXT:\n{rendered}\n");
    }

    let _ = writeln!(prompt, "USER QUESTION:\n{}\n", question.trim());
    prompt.push_str(RESPONSE_INSTRUCTIONS);
    prompt
}
