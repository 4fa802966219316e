//! Console fallback for dialogs when the display backend has no native ones.

use std::fmt;

use crate::deferred::DeferredSender;
use crate::error::{HostError, HostResult};

/// Receives the 0-based index of the chosen button.
pub type ChoiceCallback = Box<dyn FnOnce(usize) + Send + 'static>;

/// Receives `(success, text)`.
pub type TextCallback = Box<dyn FnOnce(bool, String) + Send + 'static>;

/// Line-based terminal the fallback dialogs talk to.
pub trait Console {
    fn print(&self, args: fmt::Arguments<'_>);
    /// Blocks until a full line is available.
    fn read_line(&self) -> String;
    /// Engine error channel for failed preconditions.
    fn report_error(&self, function: &str, code: &str, rationale: &str);
}

/// Native dialog capability a display backend may expose.
pub trait NativeDialogs {
    fn show_choice(
        &mut self,
        title: &str,
        description: &str,
        buttons: &[String],
        callback: Option<ChoiceCallback>,
    ) -> HostResult<()>;

    fn input_text(
        &mut self,
        title: &str,
        description: &str,
        partial: &str,
        callback: TextCallback,
    ) -> HostResult<()>;
}

/// Prompts until the user types a listed button number (1-based).
///
/// Invalid input prints the prompt again; there is no way out other than a
/// valid choice. The callback, if any, is queued with the 0-based index.
pub fn console_choice(
    console: &dyn Console,
    deferred: &DeferredSender,
    title: &str,
    description: &str,
    buttons: &[String],
    callback: Option<ChoiceCallback>,
) -> HostResult<()> {
    if buttons.is_empty() {
        console.report_error("dialog_show", "buttons.is_empty()", "no buttons to choose from");
        return Err(HostError::InvalidParameter(
            "choice dialog needs at least one button".into(),
        ));
    }

    let listing = buttons
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{}={}", i + 1, label))
        .collect::<Vec<_>>()
        .join(", ");

    let index = loop {
        console.print(format_args!("{}\n--------\n{}\n", title, description));
        console.print(format_args!("{}\n", listing));

        let line = console.read_line();
        if let Some(index) = parse_choice(line.trim(), buttons.len()) {
            break index;
        }
    };

    if let Some(cb) = callback {
        deferred.call_deferred(move || cb(index))?;
    }
    Ok(())
}

/// Asks for one line of text. An empty answer keeps `partial`.
pub fn console_input_text(
    console: &dyn Console,
    deferred: &DeferredSender,
    title: &str,
    description: &str,
    partial: &str,
    callback: Option<TextCallback>,
) -> HostResult<()> {
    let Some(callback) = callback else {
        console.report_error(
            "dialog_input_text",
            "callback.is_none()",
            "text input dialog requires a callback",
        );
        return Err(HostError::Failed(
            "text input dialog requires a callback".into(),
        ));
    };

    console.print(format_args!(
        "{}\n--------\n{}\n[{}]:\n",
        title, description, partial
    ));

    let line = console.read_line();
    let answer = line.trim();
    let text = if answer.is_empty() {
        partial.to_string()
    } else {
        answer.to_string()
    };

    deferred.call_deferred(move || callback(true, text))
}

#[inline]
fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let n: usize = input.parse().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}
