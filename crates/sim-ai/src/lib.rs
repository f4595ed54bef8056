#![deny(warnings)]

//! Advisor prompts and the streaming text-generation seam.
//!
//! The generative-text provider is a collaborator: this crate renders the
//! prompts, describes the request, and drains whatever [`TextStream`] the
//! caller plugs in. A failed stream is reported once, with a fixed message
//! suitable for showing to the user. There is no retry.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Ideas offered as one-click starting points.
pub const QUICK_START_TEMPLATES: [&str; 3] = [
    "I want to build an AI wrapper for a specific niche (e.g. Resume Rewriter). How should I monetize it?",
    "I want to start a B2B AI Automation Agency for local businesses. Create a business plan.",
    "I want to create an educational course about using AI tools. How should I structure and price it?",
];

const STRATEGY_TEMPLATE: &str = r#"You are an expert App Monetization Strategist and Product Manager.

The user has an app idea: "{idea}".

Please provide a comprehensive monetization analysis. Structure your response with Markdown using the following sections:
1. **Core Value Proposition**: Briefly validate the value.
2. **Recommended Business Model**: (e.g., Freemium, Subscription, Paid, Ad-supported, Usage-based) and WHY.
3. **Pricing Strategy**: Specific price points to test.
4. **Growth Channels**: How to acquire the first 1,000 users.
5. **Potential Pitfalls**: What to avoid.
6. **Implementation Roadmap (Tutorial)**: A step-by-step technical and operational tutorial on how to build and launch the MVP for this specific idea.

Keep the tone professional, encouraging, and highly actionable."#;

const TRENDS_PROMPT: &str = r#"What are the top 5 emerging trends in app monetization right now?
Focus on things like AI features, micro-SaaS, B2B vertical SaaS, and community-led growth.
Provide concise, bulleted insights."#;

const AI_MONETIZATION_PROMPT: &str = r#"You are a tech entrepreneur coach.
Provide a comprehensive guide on "How to Make Money with AI as a Developer".

Structure the response in Markdown:
1. **Building Micro-SaaS Wrappers**: How to wrap existing APIs (like Gemini/OpenAI) into niche value props.
2. **AI Agency / B2B Consulting**: Selling custom automation workflows to non-tech businesses.
3. **Data & Fine-Tuning**: Creating datasets or fine-tuned models for specific domains.
4. **Content Operations**: Using AI to scale content sites or marketing agencies.

For each section, provide a "Difficulty Level" (Low/Medium/High) and "Revenue Potential".
Keep it actionable and realistic."#;

/// Errors raised by a stream implementation.
#[derive(Debug, Error, PartialEq)]
pub enum StreamError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("provider rejected the request: {0}")]
    Rejected(String),
}

/// Errors surfaced to callers of this crate.
#[derive(Debug, Error, PartialEq)]
pub enum AdvisorError {
    #[error("an app idea is required")]
    EmptyIdea,
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),
    /// Displayed text is the user-facing message; the cause is kept as source.
    #[error("{message}")]
    Generation {
        message: &'static str,
        #[source]
        source: StreamError,
    },
}

/// What to ask the provider for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    Strategy { idea: String },
    MarketTrends,
    AiMonetization,
}

impl Prompt {
    /// Strategy prompt for an idea. Blank ideas are refused.
    pub fn strategy(idea: &str) -> Result<Self, AdvisorError> {
        let idea = idea.trim();
        if idea.is_empty() {
            return Err(AdvisorError::EmptyIdea);
        }
        Ok(Prompt::Strategy {
            idea: idea.to_string(),
        })
    }

    pub fn render(&self) -> String {
        match self {
            Prompt::Strategy { idea } => STRATEGY_TEMPLATE.replace("{idea}", idea),
            Prompt::MarketTrends => TRENDS_PROMPT.to_string(),
            Prompt::AiMonetization => AI_MONETIZATION_PROMPT.to_string(),
        }
    }

    /// Message shown when generation for this prompt fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Prompt::Strategy { .. } => {
                "Failed to generate strategy. Please check your API key and try again."
            }
            Prompt::MarketTrends => "Could not load trends. Please try again later.",
            Prompt::AiMonetization => "Could not load the guide. Please try again.",
        }
    }
}

/// Provider settings. Loaded from YAML; missing keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f32,
    pub system_instruction: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.7,
            system_instruction: "You are a Silicon Valley product strategy expert.".to_string(),
        }
    }
}

impl GenerationConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, AdvisorError> {
        let cfg: Self =
            serde_yaml::from_str(text).map_err(|e| AdvisorError::InvalidConfig(e.to_string()))?;
        if cfg.model.trim().is_empty() {
            return Err(AdvisorError::InvalidConfig("model must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&cfg.temperature) {
            return Err(AdvisorError::InvalidConfig(format!(
                "temperature {} outside [0, 2]",
                cfg.temperature
            )));
        }
        Ok(cfg)
    }

    /// Build the request for a prompt. Only strategy analyses carry the
    /// persona and temperature; the other prompts use provider defaults.
    pub fn request(&self, prompt: &Prompt) -> GenerationRequest {
        let tuned = matches!(prompt, Prompt::Strategy { .. });
        GenerationRequest {
            model: self.model.clone(),
            contents: prompt.render(),
            system_instruction: tuned.then(|| self.system_instruction.clone()),
            temperature: tuned.then_some(self.temperature),
        }
    }
}

/// A fully described generation call.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub contents: String,
    pub system_instruction: Option<String>,
    pub temperature: Option<f32>,
}

/// Fragments produced by an open stream.
pub type Fragments<'a> = Box<dyn Iterator<Item = Result<String, StreamError>> + 'a>;

/// Incremental text generation.
pub trait TextStream {
    fn open(&mut self, request: &GenerationRequest) -> Result<Fragments<'_>, StreamError>;
}

/// Drain a stream, handing each non-empty fragment to `on_chunk`, and
/// return the full text. The first error ends the stream.
pub fn run_stream<S, F>(
    stream: &mut S,
    config: &GenerationConfig,
    prompt: &Prompt,
    mut on_chunk: F,
) -> Result<String, AdvisorError>
where
    S: TextStream + ?Sized,
    F: FnMut(&str),
{
    let request = config.request(prompt);
    let fail = |source: StreamError| {
        warn!(error = %source, "generation failed");
        AdvisorError::Generation {
            message: prompt.failure_message(),
            source,
        }
    };
    let fragments = stream.open(&request).map_err(fail)?;
    let mut full = String::new();
    for fragment in fragments {
        let text = fragment.map_err(fail)?;
        if text.is_empty() {
            continue;
        }
        on_chunk(&text);
        full.push_str(&text);
    }
    debug!(model = %request.model, chars = full.len(), "generation complete");
    Ok(full)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Replays scripted fragments and remembers the last request.
    struct Scripted {
        open_error: Option<StreamError>,
        fragments: Vec<Result<String, StreamError>>,
        last: Option<GenerationRequest>,
    }

    impl Scripted {
        fn ok(parts: &[&str]) -> Self {
            Self {
                open_error: None,
                fragments: parts.iter().map(|p| Ok(p.to_string())).collect(),
                last: None,
            }
        }
    }

    impl TextStream for Scripted {
        fn open(&mut self, request: &GenerationRequest) -> Result<Fragments<'_>, StreamError> {
            self.last = Some(request.clone());
            if let Some(e) = self.open_error.take() {
                return Err(e);
            }
            Ok(Box::new(self.fragments.drain(..)))
        }
    }

    #[test]
    fn strategy_prompt_embeds_idea() {
        let p = Prompt::strategy("  habit tracker for cats ").unwrap();
        let text = p.render();
        assert!(text.contains("The user has an app idea: \"habit tracker for cats\"."));
        assert!(text.contains("**Pricing Strategy**"));
        assert_eq!(Prompt::strategy("   "), Err(AdvisorError::EmptyIdea));
    }

    #[test]
    fn only_strategy_requests_are_tuned() {
        let cfg = GenerationConfig::default();
        let r = cfg.request(&Prompt::strategy("x").unwrap());
        assert_eq!(r.temperature, Some(0.7));
        assert!(r.system_instruction.is_some());
        let r = cfg.request(&Prompt::MarketTrends);
        assert_eq!(r.temperature, None);
        assert_eq!(r.system_instruction, None);
        assert_eq!(r.model, "gemini-2.5-flash");
    }

    #[test]
    fn fragments_are_forwarded_and_joined() {
        let mut s = Scripted::ok(&["## Core", "", " value"]);
        let mut seen = Vec::new();
        let full = run_stream(
            &mut s,
            &GenerationConfig::default(),
            &Prompt::AiMonetization,
            |c| seen.push(c.to_string()),
        )
        .unwrap();
        assert_eq!(full, "## Core value");
        assert_eq!(seen, vec!["## Core", " value"]);
        assert!(s.last.unwrap().contents.contains("How to Make Money with AI"));
    }

    #[test]
    fn mid_stream_failure_yields_static_message() {
        let mut s = Scripted::ok(&["partial"]);
        s.fragments.push(Err(StreamError::Transport("reset".into())));
        s.fragments.push(Ok("never seen".into()));
        let mut seen = 0;
        let err = run_stream(
            &mut s,
            &GenerationConfig::default(),
            &Prompt::strategy("idea").unwrap(),
            |_| seen += 1,
        )
        .unwrap_err();
        assert_eq!(seen, 1);
        assert_eq!(
            err.to_string(),
            "Failed to generate strategy. Please check your API key and try again."
        );
        assert!(matches!(
            err,
            AdvisorError::Generation { source: StreamError::Transport(_), .. }
        ));
    }

    #[test]
    fn open_failure_is_reported_once() {
        let mut s = Scripted::ok(&[]);
        s.open_error = Some(StreamError::Rejected("bad key".into()));
        let err = run_stream(&mut s, &GenerationConfig::default(), &Prompt::MarketTrends, |_| {})
            .unwrap_err();
        assert_eq!(err.to_string(), "Could not load trends. Please try again later.");
    }

    #[test]
    fn config_from_yaml() {
        let cfg = GenerationConfig::from_yaml_str("model: gemini-pro\ntemperature: 0.2\n").unwrap();
        assert_eq!(cfg.model, "gemini-pro");
        assert_eq!(cfg.temperature, 0.2);
        assert_eq!(cfg.system_instruction, GenerationConfig::default().system_instruction);
        assert!(GenerationConfig::from_yaml_str("temperature: 5.0").is_err());
        assert!(GenerationConfig::from_yaml_str("model: ''").is_err());
    }

    #[test]
    fn templates_render_as_strategy_prompts() {
        for t in QUICK_START_TEMPLATES {
            let text = Prompt::strategy(t).unwrap().render();
            assert!(text.contains(t));
        }
    }

    proptest! {
        #[test]
        fn non_blank_ideas_are_embedded(idea in "[a-zA-Z][a-zA-Z ]{0,40}[a-zA-Z]") {
            let text = Prompt::strategy(&idea).unwrap().render();
            prop_assert!(text.contains(&idea));
        }
    }
}
