// Prompt text shared by every provider binding.

/// System prompt sent with every analysis request.
pub const ANALYST_SYSTEM: &str = "You are an expert HR professional and resume analyst. \
    Analyze the match between a resume and job description with precision \
    and provide actionable insights.";

/// Builds the single analysis prompt. Both texts are embedded verbatim.
pub fn build_analysis_prompt(job_description: &str, resume_text: &str) -> String {
    format!(
        r#"Please analyze how well this resume matches the given job description. Provide a detailed analysis in the following JSON format:

{{
  "matchScore": <overall score 0-100>,
  "skillMatch": <skills alignment score 0-100>,
  "experienceMatch": <experience alignment score 0-100>,
  "educationMatch": <education alignment score 0-100>,
  "keywordMatch": <keyword coverage score 0-100>,
  "strengths": [<array of 2-4 key strengths where resume aligns well>],
  "improvements": [<array of 2-3 areas that could be improved or highlighted better>],
  "recommendations": [<array of 3-4 specific actionable recommendations>],
  "summary": "<brief 2-3 sentence overall assessment>"
}}

Return exactly one JSON object with exactly these nine fields.

Job Description:
{job_description}

Resume:
{resume_text}

Analyze the alignment considering:
1. Required skills vs candidate skills
2. Experience level and domain match
3. Education requirements
4. Key responsibilities alignment
5. Industry knowledge and terminology

Provide specific, actionable insights that would help improve the match score."#
    )
}
