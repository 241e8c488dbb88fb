/// Analysis prompt template. Replace `{job_description}` before sending.
pub const ANALYZE_PROMPT_TEMPLATE: &str = r#"You are a career assistant helping users optimize their resumes. A user has provided this job description:

"{job_description}"

Give me:
1. A short 2-3 sentence summary of the job.
2. Three important skills they should highlight in their resume.
Format the answer as:
{
  "summary": "...",
  "skills": ["Skill 1", "Skill 2", "Skill 3"]
}
"#;

pub fn build_analyze_prompt(job_description: &str) -> String {
    ANALYZE_PROMPT_TEMPLATE.replace("{job_description}", job_description)
}
