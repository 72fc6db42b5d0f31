pub const MAX_PROMPT_CHARS: usize = 2000;

const WARNING_RATIO: f64 = 0.7;
const CRITICAL_RATIO: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterLevel {
    Normal,
    Warning,
    Critical,
}

/// Raw user input plus the "final prompt" that is actually submitted.
///
/// Editing the raw text mirrors it (trimmed) into the final prompt; choosing
/// an optimization candidate overwrites only the final prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptForm {
    raw: String,
    final_prompt: String,
}

impl PromptForm {
    pub fn new(raw: impl Into<String>) -> Self {
        let mut form = Self::default();
        form.set_raw(raw);
        form
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn final_prompt(&self) -> &str {
        &self.final_prompt
    }

    pub fn set_raw(&mut self, raw: impl Into<String>) {
        self.raw = raw.into();
        self.final_prompt = self.raw.trim().to_string();
    }

    pub fn set_final(&mut self, text: impl Into<String>) {
        self.final_prompt = text.into();
    }

    /// Appends `", tip"` to the raw input (or just `tip` when it is blank).
    pub fn append_tip(&mut self, tip: &str) {
        let raw = if self.raw.trim().is_empty() {
            tip.to_string()
        } else {
            format!("{}, {tip}", self.raw.trim_end())
        };
        self.set_raw(raw);
    }

    pub fn char_count(&self) -> usize {
        self.raw.chars().count()
    }

    pub fn counter_level(&self) -> CounterLevel {
        let ratio = self.char_count() as f64 / MAX_PROMPT_CHARS as f64;
        if ratio > CRITICAL_RATIO {
            CounterLevel::Critical
        } else if ratio > WARNING_RATIO {
            CounterLevel::Warning
        } else {
            CounterLevel::Normal
        }
    }

    pub fn counter_label(&self) -> String {
        format!("{}/{MAX_PROMPT_CHARS}", self.char_count())
    }

    pub fn clear(&mut self) {
        self.raw.clear();
        self.final_prompt.clear();
    }
}

pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4E00}'..='\u{9FFF}').contains(&c))
}
