use std::fmt;

use tracing::debug;

use crate::prompt::PromptForm;

pub const CANDIDATE_COUNT: usize = 6;
pub const CHOSEN_LABEL: &str = "✓ Selected";
pub const DEFAULT_LABEL: &str = "Select this version";

/// One-based candidate slot, always within `1..=CANDIDATE_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateIndex(u8);

impl CandidateIndex {
    pub fn new(index: usize) -> Option<Self> {
        (1..=CANDIDATE_COUNT)
            .contains(&index)
            .then_some(Self(index as u8))
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = CandidateIndex> {
        (1..=CANDIDATE_COUNT as u8).map(CandidateIndex)
    }

    /// Unselected style: 1 and 4 primary, 2 and 5 secondary, 3 and 6 outline.
    pub fn default_style(self) -> ButtonStyle {
        match (self.0 - 1) % 3 {
            0 => ButtonStyle::Primary,
            1 => ButtonStyle::Secondary,
            _ => ButtonStyle::Outline,
        }
    }
}

impl fmt::Display for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    NoneSelected,
    Selected(CandidateIndex),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Outline,
    Chosen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionButton {
    pub index: CandidateIndex,
    pub style: ButtonStyle,
    pub label: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct OptimizationSelector {
    candidates: [String; CANDIDATE_COUNT],
    style_names: Vec<String>,
    state: SelectionState,
}

impl OptimizationSelector {
    /// Replaces the candidate set. Missing entries become empty and are not
    /// selectable; extras are dropped.
    pub fn load(&mut self, candidates: Vec<String>, style_names: Vec<String>) {
        let mut incoming = candidates.into_iter();
        for slot in self.candidates.iter_mut() {
            *slot = incoming.next().unwrap_or_default();
        }
        self.style_names = style_names;
        self.state = SelectionState::NoneSelected;
    }

    pub fn candidate(&self, index: CandidateIndex) -> &str {
        &self.candidates[index.get() - 1]
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn style_name(&self, index: CandidateIndex) -> Option<&str> {
        self.style_names.get(index.get() - 1).map(String::as_str)
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.candidates.iter().any(|candidate| !candidate.trim().is_empty())
    }

    /// Copies candidate `index` into the final prompt. Returns `false` and
    /// leaves everything untouched when that candidate is empty.
    pub fn select(&mut self, index: CandidateIndex, form: &mut PromptForm) -> bool {
        let text = self.candidate(index).trim();
        if text.is_empty() {
            debug!(index = index.get(), "ignoring selection of empty candidate");
            return false;
        }
        form.set_final(text);
        self.state = SelectionState::Selected(index);
        debug!(index = index.get(), "optimization candidate selected");
        true
    }

    pub fn reset(&mut self, form: &mut PromptForm) {
        let raw = form.raw().to_string();
        form.set_final(raw);
        self.state = SelectionState::NoneSelected;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn buttons(&self) -> Vec<OptionButton> {
        CandidateIndex::all()
            .map(|index| {
                if self.state == SelectionState::Selected(index) {
                    OptionButton {
                        index,
                        style: ButtonStyle::Chosen,
                        label: CHOSEN_LABEL,
                    }
                } else {
                    OptionButton {
                        index,
                        style: index.default_style(),
                        label: DEFAULT_LABEL,
                    }
                }
            })
            .collect()
    }
}
