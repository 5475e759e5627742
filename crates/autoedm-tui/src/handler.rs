use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use autoedm_core::CategoryId;
use crate::app::{App, FormField};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent, tx: &UnboundedSender<AppEvent>) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key, tx),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::Generation(update) => app.apply_generation(update),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // The copy acknowledgement must be dismissed before anything else
    if app.show_copied_popup {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.show_copied_popup = false;
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('g') => start_generation(app, tx),
            KeyCode::Char('y') => copy_email(app),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::PageDown => app.scroll_preview_down(5),
        KeyCode::PageUp => app.scroll_preview_up(5),
        _ => match app.focus {
            FormField::CustomerName | FormField::RecentPurchase => handle_text_input(app, key),
            FormField::FavoriteCategory => handle_category(app, key),
            FormField::Generate => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    start_generation(app, tx);
                }
            }
            FormField::Copy => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    copy_email(app);
                }
            }
        },
    }
}

fn handle_text_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Enter {
        app.focus_next();
        return;
    }

    let Some(input) = app.focused_input() else {
        return;
    };

    match key.code {
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        KeyCode::Char(c) => input.insert(c),
        _ => {}
    }
}

fn handle_category(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Right | KeyCode::Char('l') => app.category_next(),
        KeyCode::Left | KeyCode::Char('h') => app.category_prev(),
        KeyCode::Backspace | KeyCode::Delete => app.favorite_category = None,
        KeyCode::Enter => app.focus_next(),
        KeyCode::Char(c) => {
            if let Some(id) = CategoryId::from_str(&c.to_string()) {
                app.favorite_category = Some(id);
            }
        }
        _ => {}
    }
}

/// Start a generation cycle in the background. Progress comes back through
/// the event channel as `AppEvent::Generation`.
fn start_generation(app: &mut App, tx: &UnboundedSender<AppEvent>) {
    let form = app.form();
    let prompts = match app.session.begin(&form) {
        Ok(prompts) => prompts,
        Err(err) => {
            debug!(error = %err, "generation not started");
            return;
        }
    };

    app.status_message = None;
    app.preview_scroll = 0;
    app.animation_frame = 0;

    let generator = app.generator.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let _ = generator
            .run(&prompts, |update| {
                if tx.send(AppEvent::Generation(update)).is_err() {
                    warn!("event loop closed before generation finished");
                }
            })
            .await;
    });
}

fn copy_email(app: &mut App) {
    let Some(text) = app.export_text() else {
        return;
    };

    match app.clipboard.copy(&text) {
        Ok(()) => {
            app.status_message = None;
            app.show_copied_popup = true;
        }
        Err(err) => app.status_message = Some(err.to_string()),
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_preview = app
        .preview_area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);

    if !in_preview {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_preview_down(3),
        MouseEventKind::ScrollUp => app.scroll_preview_up(3),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{test_app, FakeClipboard};
    use autoedm_core::RequestState;
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    async fn type_text(app: &mut App, tx: &UnboundedSender<AppEvent>, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c)), tx).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_typing_fills_focused_field() {
        let (mut app, _) = test_app(&[]);
        let (tx, _rx) = mpsc::unbounded_channel();

        type_text(&mut app, &tx, "Jane").await;
        handle_event(&mut app, key(KeyCode::Tab), &tx).await.unwrap();
        handle_event(&mut app, key(KeyCode::Char('c')), &tx).await.unwrap();
        handle_event(&mut app, key(KeyCode::Enter), &tx).await.unwrap();
        type_text(&mut app, &tx, "a lamp").await;

        let form = app.form();
        assert_eq!(form.customer_name, "Jane");
        assert_eq!(form.favorite_category, Some(CategoryId::C));
        assert_eq!(form.recent_purchase, "a lamp");
    }

    #[tokio::test]
    async fn test_generate_without_category_shows_validation_error() {
        let (mut app, service) = test_app(&["unused"]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        handle_event(&mut app, ctrl('g'), &tx).await.unwrap();

        assert_eq!(app.session.error(), Some("Please select a favorite category"));
        assert!(!app.is_loading());
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(*service.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_generation_cycle_through_event_channel() {
        let (mut app, service) = test_app(&["  Subject ✨ ", "Body text."]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        app.favorite_category = Some(CategoryId::A);
        type_text(&mut app, &tx, "Jane").await;

        handle_event(&mut app, ctrl('g'), &tx).await.unwrap();
        assert!(app.is_loading());
        assert!(!app.can_generate());

        // A second trigger while loading is ignored
        handle_event(&mut app, ctrl('g'), &tx).await.unwrap();

        while app.is_loading() {
            let event = rx.recv().await.unwrap();
            handle_event(&mut app, event, &tx).await.unwrap();
        }

        assert_eq!(app.session.state, RequestState::Idle);
        assert_eq!(*service.calls.lock().unwrap(), 2);
        let preview = app.preview().unwrap();
        assert_eq!(preview.subject_line, "Subject ✨");
        assert_eq!(preview.greeting, "Hi Jane,");
        assert_eq!(preview.highlights[0].category.id, CategoryId::A);
    }

    #[tokio::test]
    async fn test_failed_cycle_sets_generic_error() {
        let (mut app, _) = test_app(&[]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        app.favorite_category = Some(CategoryId::B);
        app.focus = FormField::Generate;

        handle_event(&mut app, key(KeyCode::Enter), &tx).await.unwrap();
        while app.is_loading() {
            let event = rx.recv().await.unwrap();
            handle_event(&mut app, event, &tx).await.unwrap();
        }

        assert_eq!(
            app.session.error(),
            Some("Failed to generate email copy. Please check your API key and try again.")
        );
        assert!(app.preview().is_none());
    }

    #[tokio::test]
    async fn test_popup_blocks_input_until_dismissed() {
        let (mut app, _) = test_app(&[]);
        let (tx, _rx) = mpsc::unbounded_channel();
        app.show_copied_popup = true;

        handle_event(&mut app, key(KeyCode::Char('x')), &tx).await.unwrap();
        handle_event(&mut app, key(KeyCode::Tab), &tx).await.unwrap();
        assert_eq!(app.customer_name.value, "");
        assert_eq!(app.focus, FormField::CustomerName);

        handle_event(&mut app, key(KeyCode::Enter), &tx).await.unwrap();
        assert!(!app.show_copied_popup);
        assert!(!app.should_quit);

        handle_event(&mut app, key(KeyCode::Esc), &tx).await.unwrap();
        assert!(app.should_quit);
    }

    fn complete_result(app: &mut App) {
        app.favorite_category = Some(CategoryId::D);
        app.session.result.subject_line = "Summer picks".to_string();
        app.session.result.body_message = "Fresh arrivals.".to_string();
    }

    #[tokio::test]
    async fn test_copy_sends_export_and_shows_popup() {
        let (mut app, _) = test_app(&[]);
        let (tx, _rx) = mpsc::unbounded_channel();
        let clipboard = FakeClipboard::default();
        app.clipboard = Box::new(clipboard.clone());
        app.status_message = Some("stale".to_string());
        complete_result(&mut app);

        handle_event(&mut app, ctrl('y'), &tx).await.unwrap();

        assert!(app.show_copied_popup);
        assert!(app.status_message.is_none());
        let copied = clipboard.copied.lock().unwrap();
        assert_eq!(copied.len(), 1);
        assert!(copied[0].starts_with("Subject: Summer picks\n"));
        assert!(copied[0].contains("Fresh arrivals."));
    }

    #[tokio::test]
    async fn test_copy_button_uses_clipboard() {
        let (mut app, _) = test_app(&[]);
        let (tx, _rx) = mpsc::unbounded_channel();
        let clipboard = FakeClipboard::default();
        app.clipboard = Box::new(clipboard.clone());
        complete_result(&mut app);
        app.focus = FormField::Copy;

        handle_event(&mut app, key(KeyCode::Enter), &tx).await.unwrap();

        assert!(app.show_copied_popup);
        assert_eq!(clipboard.copied.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clipboard_failure_shows_status_without_popup() {
        let (mut app, _) = test_app(&[]);
        let (tx, _rx) = mpsc::unbounded_channel();
        app.clipboard = Box::new(FakeClipboard { fail: true, ..Default::default() });
        complete_result(&mut app);

        handle_event(&mut app, ctrl('y'), &tx).await.unwrap();

        assert!(!app.show_copied_popup);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Failed to initialize clipboard: no display")
        );

        // Input is not blocked after a failed copy
        handle_event(&mut app, key(KeyCode::Char('J')), &tx).await.unwrap();
        assert_eq!(app.customer_name.value, "J");
    }

    #[tokio::test]
    async fn test_copy_without_preview_is_ignored() {
        let (mut app, _) = test_app(&[]);
        let (tx, _rx) = mpsc::unbounded_channel();

        handle_event(&mut app, ctrl('y'), &tx).await.unwrap();
        assert!(!app.show_copied_popup);
        assert!(app.status_message.is_none());
    }
}
