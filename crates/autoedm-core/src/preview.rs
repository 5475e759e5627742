//! The email preview, derived from the form and the generated copy.

use serde::Serialize;

use crate::category::{ordered_categories, CategoryDescriptor};
use crate::form::FormInput;
use crate::generation::GenerationResult;

pub const HERO_BANNER: &str = "🛍️ Handpicked Picks for Your Next Upgrade";
pub const CALL_TO_ACTION: &str = "👉 Shop New Arrivals";
pub const FINE_PRINT: &str = "Limited time offer • Free shipping on orders over $50";
pub const FOOTER: &str = "Thank you for shopping with us! Happy Shopping! 🎉";
pub const FAVORITE_BADGE: &str = "⭐ Your Favorite";

/// Number of category cards shown under the call to action
pub const HIGHLIGHT_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCard {
    pub category: &'static CategoryDescriptor,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailPreview {
    pub subject_line: String,
    pub hero_banner: &'static str,
    pub greeting: String,
    pub body: String,
    pub call_to_action: &'static str,
    pub fine_print: &'static str,
    pub highlights: Vec<CategoryCard>,
    pub footer: &'static str,
}

impl EmailPreview {
    pub fn compose(form: &FormInput, result: &GenerationResult) -> Self {
        let highlights = ordered_categories(form.favorite_category)
            .into_iter()
            .take(HIGHLIGHT_COUNT)
            .map(|category| CategoryCard {
                category,
                is_favorite: Some(category.id) == form.favorite_category,
            })
            .collect();

        Self {
            subject_line: result.subject_line.clone(),
            hero_banner: HERO_BANNER,
            greeting: greeting(form),
            body: result.body_message.clone(),
            call_to_action: CALL_TO_ACTION,
            fine_print: FINE_PRINT,
            highlights,
            footer: FOOTER,
        }
    }
}

pub fn greeting(form: &FormInput) -> String {
    format!("Hi {},", form.display_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryId;

    fn result() -> GenerationResult {
        GenerationResult {
            subject_line: "Deals inside 🎁".to_string(),
            body_message: "Body text.".to_string(),
        }
    }

    #[test]
    fn test_named_customer_with_favorite() {
        let form = FormInput::new("Jane", Some(CategoryId::A), "");
        let preview = EmailPreview::compose(&form, &result());

        assert_eq!(preview.greeting, "Hi Jane,");
        assert_eq!(preview.subject_line, "Deals inside 🎁");
        assert_eq!(preview.body, "Body text.");
        assert_eq!(preview.highlights.len(), 2);
        assert_eq!(preview.highlights[0].category.id, CategoryId::A);
        assert!(preview.highlights[0].is_favorite);
        assert_eq!(preview.highlights[1].category.id, CategoryId::B);
        assert!(!preview.highlights[1].is_favorite);
    }

    #[test]
    fn test_anonymous_customer_greeting() {
        let form = FormInput::new("", Some(CategoryId::D), "");
        let preview = EmailPreview::compose(&form, &result());

        assert_eq!(preview.greeting, "Hi there,");
        let ids: Vec<CategoryId> = preview.highlights.iter().map(|c| c.category.id).collect();
        assert_eq!(ids, vec![CategoryId::D, CategoryId::A]);
    }

    #[test]
    fn test_no_favorite_uses_fixed_order() {
        let preview = EmailPreview::compose(&FormInput::default(), &result());
        let ids: Vec<CategoryId> = preview.highlights.iter().map(|c| c.category.id).collect();
        assert_eq!(ids, vec![CategoryId::A, CategoryId::B]);
        assert!(preview.highlights.iter().all(|c| !c.is_favorite));
    }
}
