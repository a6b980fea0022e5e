use serde_json::Value;

/// Pull a JSON object out of a model response that may wrap it in prose or
/// markdown fences. Strict parse first; on failure, locate the first
/// balanced `{...}` span (string and escape aware) and parse that.
pub fn extract_json(text: &str) -> anyhow::Result<Value> {
    let trimmed = text.trim();
    if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
        if v.is_object() {
            return Ok(v);
        }
    }

    match balanced_object(text) {
        Some(span) => serde_json::from_str::<Value>(span)
            .map_err(|e| anyhow::anyhow!("embedded JSON object failed to parse: {}", e)),
        None => anyhow::bail!("no JSON object found in provider response"),
    }
}

fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
