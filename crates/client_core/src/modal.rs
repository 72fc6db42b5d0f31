//! Single-modal controller and the view seam it drives.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModalId {
    ImagePreview,
    VideoPreview,
    PromptTips,
}

impl ModalId {
    pub fn as_str(self) -> &'static str {
        match self {
            ModalId::ImagePreview => "image-preview-modal",
            ModalId::VideoPreview => "video-preview-modal",
            ModalId::PromptTips => "prompt-tips-modal",
        }
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    BackdropClick,
    EscapeKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    Content,
}

/// The parts of the page a modal controller touches.
pub trait ModalSurface: Send {
    /// Returns `false` when the modal element does not exist.
    fn show(&mut self, id: ModalId) -> bool;
    fn hide(&mut self, id: ModalId) -> bool;
    fn set_scroll_locked(&mut self, locked: bool);
    fn add_listener(&mut self, kind: ListenerKind, id: ModalId) -> ListenerId;
    fn remove_listener(&mut self, listener: ListenerId);
    fn set_preview_title(&mut self, title: &str);
    fn reset_image_preview(&mut self);
}

#[derive(Debug, Clone, Copy)]
struct ActiveModal {
    id: ModalId,
    backdrop: ListenerId,
    escape: ListenerId,
}

pub struct ModalController {
    surface: Box<dyn ModalSurface>,
    active: Option<ActiveModal>,
}

impl ModalController {
    pub fn new(surface: Box<dyn ModalSurface>) -> Self {
        Self {
            surface,
            active: None,
        }
    }

    pub fn active(&self) -> Option<ModalId> {
        self.active.map(|active| active.id)
    }

    pub fn is_open(&self, id: ModalId) -> bool {
        self.active() == Some(id)
    }

    /// Opens `id`, closing whichever modal was open before so that only one
    /// listener pair is ever registered.
    pub fn open(&mut self, id: ModalId) -> bool {
        if let Some(previous) = self.active {
            if previous.id == id {
                return true;
            }
            self.close(previous.id);
        }

        if !self.surface.show(id) {
            warn!(modal = %id, "modal element missing; open aborted");
            return false;
        }
        self.surface.set_scroll_locked(true);
        let backdrop = self.surface.add_listener(ListenerKind::BackdropClick, id);
        let escape = self.surface.add_listener(ListenerKind::EscapeKey, id);
        self.active = Some(ActiveModal {
            id,
            backdrop,
            escape,
        });
        debug!(modal = %id, "modal opened");
        true
    }

    /// Closes `id` if it is the active modal. Any other id is a no-op.
    pub fn close(&mut self, id: ModalId) -> bool {
        let active = match self.active {
            Some(active) if active.id == id => active,
            _ => {
                debug!(modal = %id, "close ignored; modal not active");
                return false;
            }
        };
        self.active = None;

        if !self.surface.hide(id) {
            warn!(modal = %id, "modal element missing on close");
        }
        self.surface.set_scroll_locked(false);
        self.surface.remove_listener(active.backdrop);
        self.surface.remove_listener(active.escape);
        if id == ModalId::ImagePreview {
            self.surface.reset_image_preview();
        }
        debug!(modal = %id, "modal closed");
        true
    }

    /// Header text of the image preview; reset when that modal closes.
    pub fn set_preview_title(&mut self, title: &str) {
        self.surface.set_preview_title(title);
    }

    pub fn on_backdrop_click(&mut self, id: ModalId, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Backdrop => self.close(id),
            ClickTarget::Content => false,
        }
    }

    pub fn on_key(&mut self, key: &str) -> bool {
        match self.active {
            Some(active) if key == "Escape" => self.close(active.id),
            _ => false,
        }
    }
}

impl Drop for ModalController {
    fn drop(&mut self) {
        if let Some(active) = self.active {
            self.close(active.id);
        }
    }
}

pub const IMAGE_PREVIEW_TITLE: &str = "Image preview";

#[derive(Debug)]
struct SurfaceState {
    available: BTreeSet<ModalId>,
    visible: BTreeSet<ModalId>,
    scroll_locked: bool,
    listeners: BTreeMap<ListenerId, (ListenerKind, ModalId)>,
    next_listener: u64,
    preview_title: String,
    preview_resets: usize,
}

/// In-memory page model: visibility, scroll lock and listener registry.
///
/// Clones observe the same page, so a front end can keep a handle after
/// giving one to a [`ModalController`].
#[derive(Debug, Clone)]
pub struct MemorySurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::with_modals([
            ModalId::ImagePreview,
            ModalId::VideoPreview,
            ModalId::PromptTips,
        ])
    }
}

impl MemorySurface {
    pub fn with_modals(modals: impl IntoIterator<Item = ModalId>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SurfaceState {
                available: modals.into_iter().collect(),
                visible: BTreeSet::new(),
                scroll_locked: false,
                listeners: BTreeMap::new(),
                next_listener: 1,
                preview_title: IMAGE_PREVIEW_TITLE.to_string(),
                preview_resets: 0,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_visible(&self, id: ModalId) -> bool {
        self.state().visible.contains(&id)
    }

    pub fn scroll_locked(&self) -> bool {
        self.state().scroll_locked
    }

    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        self.state()
            .listeners
            .values()
            .filter(|(registered, _)| *registered == kind)
            .count()
    }

    pub fn preview_title(&self) -> String {
        self.state().preview_title.clone()
    }

    pub fn preview_resets(&self) -> usize {
        self.state().preview_resets
    }
}

impl ModalSurface for MemorySurface {
    fn show(&mut self, id: ModalId) -> bool {
        let mut state = self.state();
        if !state.available.contains(&id) {
            return false;
        }
        state.visible.insert(id);
        true
    }

    fn hide(&mut self, id: ModalId) -> bool {
        let mut state = self.state();
        if !state.available.contains(&id) {
            return false;
        }
        state.visible.remove(&id);
        true
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.state().scroll_locked = locked;
    }

    fn add_listener(&mut self, kind: ListenerKind, id: ModalId) -> ListenerId {
        let mut state = self.state();
        let listener = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.insert(listener, (kind, id));
        listener
    }

    fn remove_listener(&mut self, listener: ListenerId) {
        self.state().listeners.remove(&listener);
    }

    fn set_preview_title(&mut self, title: &str) {
        self.state().preview_title = title.to_string();
    }

    fn reset_image_preview(&mut self) {
        let mut state = self.state();
        state.preview_title = IMAGE_PREVIEW_TITLE.to_string();
        state.preview_resets += 1;
    }
}

#[cfg(test)]
#[path = "tests/modal_tests.rs"]
mod tests;
