// src/extractors/prompt.rs

/// System instruction pinning the model to the response schema `parse_profile` expects.
pub const SYSTEM_PROMPT: &str = r#"You are a resume parser. Extract ONLY the following information from the resume and return it in this exact JSON format:
{
    "name": "candidate full name",
    "contact": {
        "email": "email address if found",
        "phone": "phone number if found"
    },
    "skills": ["skill1", "skill2", "etc"],
    "experience": [
        {
            "job_title": "job title",
            "company_name": "company name",
            "duration_dates": "employment period"
        }
    ]
}

Important rules:
1. Return ONLY valid JSON, no other text
2. For missing information, use empty strings or empty arrays
3. For skills, return a flat array of ALL skills found (technical, soft skills, etc)
4. Keep descriptions brief and concise
5. Do not categorize or classify the skills
Respond ONLY with a valid JSON object."#;

pub fn user_prompt(resume_text: &str) -> String {
    format!("Please extract information from this resume:\n\n{}", resume_text)
}
