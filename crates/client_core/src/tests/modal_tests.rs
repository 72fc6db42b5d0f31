use super::*;

fn controller() -> (ModalController, MemorySurface) {
    let surface = MemorySurface::default();
    (ModalController::new(Box::new(surface.clone())), surface)
}

#[test]
fn open_locks_scroll_and_registers_one_listener_pair() {
    let (mut modals, page) = controller();
    assert!(modals.open(ModalId::VideoPreview));

    assert!(page.is_visible(ModalId::VideoPreview));
    assert!(page.scroll_locked());
    assert_eq!(page.listener_count(ListenerKind::BackdropClick), 1);
    assert_eq!(page.listener_count(ListenerKind::EscapeKey), 1);
    assert_eq!(modals.active(), Some(ModalId::VideoPreview));
}

#[test]
fn closing_a_different_modal_leaves_the_active_one_open() {
    let (mut modals, page) = controller();
    modals.open(ModalId::PromptTips);

    assert!(!modals.close(ModalId::ImagePreview));
    assert!(page.is_visible(ModalId::PromptTips));
    assert!(page.scroll_locked());
    assert_eq!(modals.active(), Some(ModalId::PromptTips));
}

#[test]
fn close_releases_everything_and_is_idempotent() {
    let (mut modals, page) = controller();
    modals.open(ModalId::PromptTips);
    assert!(modals.close(ModalId::PromptTips));
    assert!(!modals.close(ModalId::PromptTips));

    assert!(!page.is_visible(ModalId::PromptTips));
    assert!(!page.scroll_locked());
    assert_eq!(page.listener_count(ListenerKind::BackdropClick), 0);
    assert_eq!(page.listener_count(ListenerKind::EscapeKey), 0);
    assert_eq!(modals.active(), None);
}

#[test]
fn opening_over_another_modal_never_stacks_escape_listeners() {
    let (mut modals, page) = controller();
    modals.open(ModalId::ImagePreview);
    modals.open(ModalId::PromptTips);
    modals.open(ModalId::PromptTips);

    assert!(!page.is_visible(ModalId::ImagePreview));
    assert!(page.is_visible(ModalId::PromptTips));
    assert_eq!(page.listener_count(ListenerKind::EscapeKey), 1);
    assert_eq!(page.listener_count(ListenerKind::BackdropClick), 1);
}

#[test]
fn escape_and_backdrop_close_but_content_clicks_do_not() {
    let (mut modals, page) = controller();
    modals.open(ModalId::VideoPreview);

    assert!(!modals.on_key("Enter"));
    assert!(!modals.on_backdrop_click(ModalId::VideoPreview, ClickTarget::Content));
    assert!(page.is_visible(ModalId::VideoPreview));

    assert!(modals.on_key("Escape"));
    assert!(!page.is_visible(ModalId::VideoPreview));
    assert!(!modals.on_key("Escape"));

    modals.open(ModalId::VideoPreview);
    assert!(modals.on_backdrop_click(ModalId::VideoPreview, ClickTarget::Backdrop));
    assert_eq!(modals.active(), None);
}

#[test]
fn closing_image_preview_resets_its_header() {
    let (mut modals, page) = controller();
    modals.open(ModalId::ImagePreview);
    modals.set_preview_title("Image preview (1024x1792 - portrait)");
    assert_eq!(page.preview_title(), "Image preview (1024x1792 - portrait)");

    modals.close(ModalId::ImagePreview);
    assert_eq!(page.preview_title(), IMAGE_PREVIEW_TITLE);
    assert_eq!(page.preview_resets(), 1);
}

#[test]
fn missing_modal_element_aborts_open() {
    let page = MemorySurface::with_modals([ModalId::PromptTips]);
    let mut modals = ModalController::new(Box::new(page.clone()));

    assert!(!modals.open(ModalId::VideoPreview));
    assert_eq!(modals.active(), None);
    assert!(!page.scroll_locked());
    assert_eq!(page.listener_count(ListenerKind::EscapeKey), 0);
}

#[test]
fn dropping_the_controller_releases_listeners() {
    let (mut modals, page) = controller();
    modals.open(ModalId::PromptTips);
    drop(modals);
    assert_eq!(page.listener_count(ListenerKind::EscapeKey), 0);
    assert!(!page.scroll_locked());
}
