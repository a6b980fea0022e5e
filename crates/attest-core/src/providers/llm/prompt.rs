//! Prompt construction for evidence validation. Pure functions, no I/O.

pub const SYSTEM_PROMPT: &str = r#"You are an expert compliance auditor and evidence analyst. Your task is to analyze audit evidence and provide structured assessments.

For each piece of evidence, you must:
1. Identify the type of evidence (User Access List, MFA Settings, Policy Document, System Screenshot, Audit Log, etc.)
2. Map it to the most appropriate compliance control from these frameworks:
   - SOC 2 (Trust Services Criteria: CC1-CC9, PI1, A1, C1, etc.)
   - ISO 27001 (Annex A controls: A.5-A.18)
   - SOX ITGC (Access Controls, Change Management, Computer Operations, Program Development)
   - NIST CSF (Identify, Protect, Detect, Respond, Recover)
3. Score completeness (0-100) based on:
   - Presence of required fields/information
   - Timestamps and date coverage
   - Evidence of proper authorization
   - Audit trail completeness
4. Extract key data fields from the evidence
5. Identify any gaps, risks, or issues

Always respond with valid JSON matching the required schema. Be specific about control mappings and provide actionable issue descriptions."#;

const RESPONSE_SHAPE: &str = "Respond with a JSON object containing: evidence_type, mapped_control (with framework, control_id, control_name), completeness_score (0-100), extracted_data, issues (array), and score_reasoning.";

/// Text-modality prompt: raw evidence content is embedded inline.
pub fn text_prompt(content: &str, file_name: &str) -> String {
    format!(
        "Analyze this audit evidence and provide a structured validation assessment.\n\n\
         File: {}\n\
         Content:\n{}\n\n\
         {}\n\n\
         IMPORTANT: Return ONLY valid JSON, no markdown formatting.",
        file_name, content, RESPONSE_SHAPE
    )
}

/// Image-modality prompt: the image travels as an attached asset, so the
/// prompt tells the model which visual cues to read instead.
pub fn image_prompt(file_name: &str) -> String {
    format!(
        "Analyze this screenshot/image as audit evidence and provide a structured validation assessment.\n\n\
         File: {}\n\n\
         Look for:\n\
         - UI elements indicating security settings\n\
         - User/admin information\n\
         - Timestamps and dates\n\
         - System configurations\n\
         - Access controls or permissions\n\n\
         {}\n\n\
         IMPORTANT: Return ONLY valid JSON, no markdown formatting.",
        file_name, RESPONSE_SHAPE
    )
}
