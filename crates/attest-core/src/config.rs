pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_TEXT_MODEL: &str = "qwen2.5:7b";
pub const DEFAULT_OLLAMA_VISION_MODEL: &str = "llava:7b";

/// Which inference backend the process talks to. Resolved once at startup
/// and passed into the client constructor; request handlers never branch on
/// the environment themselves.
#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Cloud {
        api_key: String,
        text_model: String,
        vision_model: String,
    },
    Local {
        base_url: String,
        text_model: String,
        vision_model: String,
    },
}

impl ProviderConfig {
    /// Cloud wins whenever a credential is present; otherwise local.
    pub fn from_env() -> Self {
        match std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()) {
            Some(api_key) => ProviderConfig::Cloud {
                api_key,
                text_model: env_or("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                vision_model: env_or("GEMINI_VISION_MODEL", DEFAULT_GEMINI_MODEL),
            },
            None => ProviderConfig::Local {
                base_url: env_or("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL),
                text_model: env_or("OLLAMA_TEXT_MODEL", DEFAULT_OLLAMA_TEXT_MODEL),
                vision_model: env_or("OLLAMA_VISION_MODEL", DEFAULT_OLLAMA_VISION_MODEL),
            },
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            ProviderConfig::Cloud { .. } => "gemini",
            ProviderConfig::Local { .. } => "ollama",
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_defaults() {
        let cfg = ProviderConfig::Local {
            base_url: DEFAULT_OLLAMA_BASE_URL.into(),
            text_model: DEFAULT_OLLAMA_TEXT_MODEL.into(),
            vision_model: DEFAULT_OLLAMA_VISION_MODEL.into(),
        };
        assert_eq!(cfg.provider_name(), "ollama");
    }

    #[test]
    fn cloud_name() {
        let cfg = ProviderConfig::Cloud {
            api_key: "k".into(),
            text_model: DEFAULT_GEMINI_MODEL.into(),
            vision_model: DEFAULT_GEMINI_MODEL.into(),
        };
        assert_eq!(cfg.provider_name(), "gemini");
    }
}
