use scraper::{Html, Selector};

use crate::{models::DropdownOption, text_manipulators::extract_text};

/// Lists the options of `<select name="{control_name}">` in document order.
///
/// Placeholder and disabled options are kept. Anything that prevents finding
/// the control yields an empty list rather than an error, so callers cannot
/// tell "no options" apart from "no such control".
pub fn extract_dropdown_options(html: &str, control_name: &str) -> Vec<DropdownOption> {
    let Ok(option_selector) = Selector::parse(&format!("select[name='{control_name}'] option"))
    else {
        return vec![];
    };
    let document = Html::parse_document(html);
    document
        .select(&option_selector)
        .map(|option| {
            let label = extract_text(option).trim().to_string();
            // Browsers submit the label when an option has no value attribute.
            let value = option
                .value()
                .attr("value")
                .map(str::to_string)
                .unwrap_or_else(|| label.clone());
            DropdownOption { label, value }
        })
        .collect()
}
