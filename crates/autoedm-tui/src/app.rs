use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;
use autoedm_core::{
    export, CategoryId, EmailGenerator, EmailPreview, FormInput, GenerationSession,
    GenerationUpdate,
};
use crate::clipboard::{ClipboardSink, SystemClipboard};

/// Focusable elements, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    CustomerName,
    FavoriteCategory,
    RecentPurchase,
    Generate,
    Copy,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line text field with a character-based cursor
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let byte_pos = char_to_byte_index(&self.value, self.cursor);
            self.value.remove(byte_pos);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.len();
    }

    /// Display column of the cursor, counting wide characters as two cells
    pub fn cursor_column(&self) -> usize {
        let byte_pos = char_to_byte_index(&self.value, self.cursor);
        self.value[..byte_pos].width()
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }
}

pub struct App {
    pub should_quit: bool,
    pub focus: FormField,

    // Form state
    pub customer_name: TextInput,
    pub favorite_category: Option<CategoryId>,
    pub recent_purchase: TextInput,

    // Generation state
    pub session: GenerationSession,
    pub generator: EmailGenerator,
    pub has_api_key: bool,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Preview state
    pub preview_scroll: u16,
    pub preview_lines: u16, // wrapped rows at the last render
    pub preview_height: u16,
    pub preview_area: Option<Rect>,

    // Copy acknowledgement popup (blocks other input until dismissed)
    pub show_copied_popup: bool,
    pub status_message: Option<String>,
    pub clipboard: Box<dyn ClipboardSink>,
}

impl App {
    pub fn new(generator: EmailGenerator, has_api_key: bool) -> Self {
        Self {
            should_quit: false,
            focus: FormField::CustomerName,

            customer_name: TextInput::default(),
            favorite_category: None,
            recent_purchase: TextInput::default(),

            session: GenerationSession::new(),
            generator,
            has_api_key,

            animation_frame: 0,

            preview_scroll: 0,
            preview_lines: 0,
            preview_height: 0,
            preview_area: None,

            show_copied_popup: false,
            status_message: None,
            clipboard: Box::new(SystemClipboard::new()),
        }
    }

    /// Current form values
    pub fn form(&self) -> FormInput {
        FormInput::new(
            self.customer_name.value.clone(),
            self.favorite_category,
            self.recent_purchase.value.clone(),
        )
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    /// Whether the generate button is enabled
    pub fn can_generate(&self) -> bool {
        !self.is_loading() && self.favorite_category.is_some()
    }

    /// The preview, once both subject and body are available
    pub fn preview(&self) -> Option<EmailPreview> {
        self.session
            .result
            .is_complete()
            .then(|| EmailPreview::compose(&self.form(), &self.session.result))
    }

    pub fn export_text(&self) -> Option<String> {
        self.session
            .result
            .is_complete()
            .then(|| export::plain_text(&self.form(), &self.session.result))
    }

    pub fn apply_generation(&mut self, update: GenerationUpdate) {
        self.session.apply(update);
        if !self.session.result.is_complete() && self.focus == FormField::Copy {
            self.focus = FormField::Generate;
        }
    }

    // Focus helpers
    fn focus_order(&self) -> Vec<FormField> {
        let mut order = vec![
            FormField::CustomerName,
            FormField::FavoriteCategory,
            FormField::RecentPurchase,
            FormField::Generate,
        ];
        if self.session.result.is_complete() {
            order.push(FormField::Copy);
        }
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + 1) % order.len()];
    }

    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + order.len() - 1) % order.len()];
    }

    /// Text field under focus, if any
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            FormField::CustomerName => Some(&mut self.customer_name),
            FormField::RecentPurchase => Some(&mut self.recent_purchase),
            _ => None,
        }
    }

    // Category selection cycles through "none" and A..D
    pub fn category_next(&mut self) {
        let all = CategoryId::all();
        self.favorite_category = match self.favorite_category {
            None => all.first().copied(),
            Some(id) => all.iter().skip_while(|c| **c != id).nth(1).copied(),
        };
    }

    pub fn category_prev(&mut self) {
        let all = CategoryId::all();
        self.favorite_category = match self.favorite_category {
            None => all.last().copied(),
            Some(id) => all.iter().rev().skip_while(|c| **c != id).nth(1).copied(),
        };
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Furthest scroll that still fills the preview pane
    pub fn max_preview_scroll(&self) -> u16 {
        self.preview_lines.saturating_sub(self.preview_height)
    }

    pub fn scroll_preview_down(&mut self, lines: u16) {
        let max = self.max_preview_scroll();
        self.preview_scroll = self.preview_scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_preview_up(&mut self, lines: u16) {
        self.preview_scroll = self.preview_scroll.saturating_sub(lines);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use autoedm_core::{
        CompletionError, CompletionRequest, CompletionService, GenerationSettings,
    };
    use std::sync::{Arc, Mutex};

    /// Answers every request with the next canned reply
    pub(crate) struct CannedService {
        pub replies: Mutex<Vec<String>>,
        pub calls: Mutex<usize>,
    }

    #[async_trait]
    impl CompletionService for CannedService {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
            *self.calls.lock().unwrap() += 1;
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Err(CompletionError::MissingApiKey)
            } else {
                Ok(replies.remove(0))
            }
        }
    }

    /// Keeps every copied text; fails instead when `fail` is set
    #[derive(Clone, Default)]
    pub(crate) struct FakeClipboard {
        pub copied: Arc<Mutex<Vec<String>>>,
        pub fail: bool,
    }

    impl ClipboardSink for FakeClipboard {
        fn copy(&mut self, text: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("Failed to initialize clipboard: no display");
            }
            self.copied.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    pub(crate) fn test_app(replies: &[&str]) -> (App, Arc<CannedService>) {
        let service = Arc::new(CannedService {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            calls: Mutex::new(0),
        });
        let generator = EmailGenerator::new(service.clone(), GenerationSettings::default());
        let mut app = App::new(generator, true);
        app.clipboard = Box::new(FakeClipboard::default());
        (app, service)
    }

    #[test]
    fn test_text_input_utf8_editing() {
        let mut input = TextInput::default();
        for c in "Zoë".chars() {
            input.insert(c);
        }
        input.left();
        input.backspace();
        assert_eq!(input.value, "Zë");
        input.home();
        input.delete();
        assert_eq!(input.value, "ë");
        input.end();
        input.insert('!');
        assert_eq!(input.value, "ë!");
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn test_cursor_column_counts_wide_characters() {
        let mut input = TextInput::default();
        for c in "日本 café 🎉".chars() {
            input.insert(c);
        }
        assert_eq!(input.cursor, 9);
        assert_eq!(input.cursor_column(), 12);

        input.home();
        input.right();
        input.right();
        assert_eq!(input.cursor_column(), 4);
    }

    #[test]
    fn test_scroll_stops_when_last_row_is_visible() {
        let (mut app, _) = test_app(&[]);
        app.preview_lines = 30;
        app.preview_height = 10;

        app.scroll_preview_down(100);
        assert_eq!(app.preview_scroll, 20);
        app.scroll_preview_up(5);
        assert_eq!(app.preview_scroll, 15);

        // Content that fits the pane never scrolls
        app.preview_lines = 8;
        app.preview_scroll = 0;
        app.scroll_preview_down(3);
        assert_eq!(app.preview_scroll, 0);
    }

    #[test]
    fn test_category_cycles_through_none() {
        let (mut app, _) = test_app(&[]);
        app.category_next();
        assert_eq!(app.favorite_category, Some(CategoryId::A));
        app.category_prev();
        assert_eq!(app.favorite_category, None);
        app.category_prev();
        assert_eq!(app.favorite_category, Some(CategoryId::D));
        app.category_next();
        assert_eq!(app.favorite_category, None);
    }

    #[test]
    fn test_copy_focus_only_with_complete_result() {
        let (mut app, _) = test_app(&[]);
        app.focus = FormField::Generate;
        app.focus_next();
        assert_eq!(app.focus, FormField::CustomerName);

        app.session.result.subject_line = "S".to_string();
        app.session.result.body_message = "B".to_string();
        app.focus = FormField::Generate;
        app.focus_next();
        assert_eq!(app.focus, FormField::Copy);
        app.focus_prev();
        assert_eq!(app.focus, FormField::Generate);
    }

    #[test]
    fn test_preview_tracks_current_form() {
        let (mut app, _) = test_app(&[]);
        app.favorite_category = Some(CategoryId::B);
        assert!(app.preview().is_none());

        app.session.result.subject_line = "S".to_string();
        app.session.result.body_message = "B".to_string();
        assert_eq!(app.preview().unwrap().greeting, "Hi there,");

        for c in "Jane".chars() {
            app.customer_name.insert(c);
        }
        let preview = app.preview().unwrap();
        assert_eq!(preview.greeting, "Hi Jane,");
        assert_eq!(preview.highlights[0].category.id, CategoryId::B);
        assert!(app.export_text().unwrap().starts_with("Subject: S\n"));
    }
}
