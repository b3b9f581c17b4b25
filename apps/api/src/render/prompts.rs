/// File name looked up under `PROMPT_DIR` to override the planning prompt.
pub const PLAN_PROMPT_FILE: &str = "render_plan.txt";

/// Replaced with the exemplar paragraphs as a JSON array of `{style_name, text}`.
pub const PARAGRAPHS_PLACEHOLDER: &str = "<<<PARA_JSON>>>";

pub const PLAN_PROMPT: &str = r#"You analyze an exemplar Word document described as a list of paragraphs with their Word style names.

Return ONLY JSON named render_plan that fully defines how to render bios to match the exemplar, including a HEADER block and SECTION blocks.

Rules:
- Use ONLY style names that appear in the exemplar (e.g., "Heading 1", "Heading 2", "Normal", "List Bullet", "List Paragraph", "Subtitle", etc.).
- Infer section order and choose styles per section.
- Include a HEADER mapping for identity/contacts so we can render the top block consistently.
- Keep text tone third-person; propose simple word limits.

JSON schema to return (keys and types must match; include all keys even if a field is unused):

{
  "header": {
    "name_style": "Heading 1",
    "title_style": "Subtitle",
    "department_style": "Normal",
    "location_style": "Normal",
    "contact_style": "Normal",
    "line_order": ["name", "title", "department_or_practice", "location", "contact"]
  },
  "sections": [
    {
      "key": "summary",
      "label": "Summary",
      "heading_style": "Heading 2",
      "body_style": "Normal",
      "bullet_style": "List Bullet",
      "bullet_limit": 0
    }
  ],
  "tone": {
    "person": "third",
    "bullets_max_words": 16,
    "summary_max_words": 120
  }
}

Notes:
- "key" is one of: summary, expertise, experience, education, certifications, affiliations, awards; or a snake_case name for any other section.
- "contact_style" is used for the "email | phone | linkedin" line.
- "bullet_style" may be null for narrative sections; "bullet_limit" 0 means no cap.
- If a section is list-like (expertise, education, certifications, affiliations, awards), set bullet_limit to 4-8.
- If a section uses bullets in the exemplar but the style name isn't obvious, choose the closest list style seen.
- For HEADER, choose the most appropriate styles found in the exemplar paragraphs. If a style is unclear, pick a reasonable default from styles you see.

PARAGRAPHS (array of {style_name,text}):
<<<PARA_JSON>>>"#;
