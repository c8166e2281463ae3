// Prompts for brand guideline summarisation.

pub const GUIDELINE_SUMMARY_SYSTEM: &str = "You are an expert brand strategist. \
Your task is to analyze uploaded brand guidelines documents and extract key brand \
information in a structured format.

Extract the following information if present:
1. Brand Voice & Tone: How should the brand communicate? (formal, casual, friendly, authoritative, etc.)
2. Core Values: What principles guide the brand?
3. Mission Statement: What is the brand's purpose?
4. Visual Guidelines: Colors, fonts, logo usage rules
5. Do's and Don'ts: What to include/avoid in communications
6. Target Audience: Who is the brand speaking to?
7. Key Messaging: Important phrases, taglines, or messaging pillars
8. Content Guidelines: Rules for creating content

Format your response as a clear, organized summary that can be used to guide AI \
content generation. Be specific and actionable.";

const DOCUMENT_PROMPT_TEMPLATE: &str = "Please analyze the following brand guidelines \
document and extract the key brand rules and guidelines:

{content}";

// Binary formats we cannot read yet only get a placeholder, so the model is
// asked for a generic template instead of a summary.
const TEMPLATE_PROMPT_TEMPLATE: &str = "Please analyze this brand guidelines document \
named \"{file_name}\" ({file_type} file). Since I cannot share the actual file content \
directly, please provide a template of what brand guidelines typically contain and how \
they should be structured. In a real scenario, you would analyze the uploaded document.";

pub fn document_prompt(content: &str) -> String {
    DOCUMENT_PROMPT_TEMPLATE.replace("{content}", content)
}

pub fn template_prompt(file_name: &str, file_type: &str) -> String {
    TEMPLATE_PROMPT_TEMPLATE
        .replace("{file_name}", file_name)
        .replace("{file_type}", file_type)
}
