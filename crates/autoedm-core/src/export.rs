//! Plain-text rendering of the email for the clipboard.

use crate::form::FormInput;
use crate::generation::GenerationResult;
use crate::preview::{greeting, CALL_TO_ACTION, FINE_PRINT, FOOTER, HERO_BANNER};

pub fn plain_text(form: &FormInput, result: &GenerationResult) -> String {
    format!(
        "Subject: {}\n\n{}\n\n{}\n\n{}\n\n{}\n{}\n\n{}",
        result.subject_line,
        HERO_BANNER,
        greeting(form),
        result.body_message,
        CALL_TO_ACTION,
        FINE_PRINT,
        FOOTER
    )
}
