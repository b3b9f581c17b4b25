/// File name looked up under `PROMPT_DIR` to override the extraction prompt.
pub const EXTRACT_PROMPT_FILE: &str = "extract_schema.txt";

/// Replaced with the (truncated) source text.
pub const BIO_PLACEHOLDER: &str = "<<<BIO>>>";

pub const EXTRACT_PROMPT: &str = "\
Return ONLY a single JSON object with EXACTLY these keys (include them even if null or []):
full_name, current_title, department_or_practice, location, email, phone, linkedin_url, \
summary_paragraph, expertise_bullets, selected_experience, education, certifications, \
affiliations, awards.
No extra keys. No prose. No code fences.
Rules: If unknown use null or []; phone E.164 if possible; text in third-person.
selected_experience is a list of {\"client_or_project\", \"role\", \"impact\"} objects.

BIO TEXT:
<<<BIO>>>";
