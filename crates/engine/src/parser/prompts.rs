//! Prompt templates for the Gemini extraction and tailoring calls.
//!
//! Templates use `{placeholder}` markers filled with `str::replace`. Both
//! prompts instruct the model to emit only fields with real data; the
//! coercion layer additionally prunes anything empty that slips through.

pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Parse the following CV/Resume text and extract structured information in JSON format.
IMPORTANT: Only include information that actually exists in the CV text. Do not add placeholder or example data.
If a field doesn't exist in the CV, either omit it entirely or set it to null/empty.

Required JSON structure (only include fields that have actual data):
{
    "name": "Full name (only if found)",
    "email": "Email address (only if found)",
    "phone": "Phone number (only if found)",
    "linkedin": "LinkedIn URL (only if found)",
    "github": "GitHub URL (only if found)",
    "website": "Personal website (only if found)",
    "address": "Address/Location (only if found)",
    "summary": "Professional summary (only if found)",
    "education": [
        {
            "degree": "Degree name",
            "institution": "Institution name",
            "date": "Date range",
            "location": "Location (if mentioned)",
            "gpa": "GPA (if mentioned)",
            "details": "Additional details (if any)"
        }
    ],
    "experience": [
        {
            "title": "Job title",
            "company": "Company name",
            "date": "Date range",
            "location": "Location (if mentioned)",
            "description": ["List of responsibilities and achievements"]
        }
    ],
    "projects": [
        {
            "title": "Project name",
            "description": "Project description",
            "technologies": "Technologies used",
            "date": "Date or duration (if mentioned)",
            "link": "Project link (if mentioned)"
        }
    ],
    "skills": {
        "languages": ["Programming languages (only if mentioned)"],
        "frameworks": ["Frameworks and libraries (only if mentioned)"],
        "tools": ["Tools and software (only if mentioned)"],
        "libraries": ["Additional libraries (only if mentioned)"],
        "databases": ["Databases (only if mentioned)"],
        "other": ["Other technical skills (only if mentioned)"]
    },
    "certifications": [
        {
            "name": "Certification name",
            "issuer": "Issuing organization",
            "date": "Date obtained (if mentioned)"
        }
    ],
    "awards": ["Awards and honors (only if mentioned)"],
    "languages": ["Spoken languages (only if mentioned)"],
    "custom_sections": [
        {
            "title": "Section title",
            "content": "Section content"
        }
    ]
}

CV Text:
{cv_text}

Return only the JSON object with actual data from the CV, no additional text:"#;

pub const TAILOR_PROMPT_TEMPLATE: &str = r#"You are a professional resume writer. Given the candidate's current CV and a job description, enhance the CV content to better match the job requirements while keeping all information truthful and accurate.

IMPORTANT GUIDELINES:
1. Keep all factual information (names, dates, companies, degrees) exactly the same
2. Enhance descriptions to highlight relevant skills and experiences
3. Add relevant keywords from the job description naturally
4. Reorganize or emphasize experiences that match the job requirements
5. Return the enhanced data in the same JSON structure as the current CV
6. Do not add fake experiences, degrees, or skills

Current CV (JSON):
{cv_json}

Job Description:
{job_description}

Return only the JSON object with enhanced content, in the same structure as the input:"#;
