use maud::{DOCTYPE, Markup, PreEscaped, html};

use numfmt::{Formatter, Precision};

// Link styles
pub const LINK_STYLE: &str = "link";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "button button-primary";

// Form styles
pub const FORM_LABEL_STYLE: &str = "form-label";
pub const FORM_TEXT_INPUT_STYLE: &str = "form-input";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "table-header";

pub const TABLE_ROW_STYLE: &str = "table-row";

pub const TABLE_CELL_STYLE: &str = "table-cell";

// Page container
pub const PAGE_CONTAINER_STYLE: &str = "page";

const STYLESHEET: &str = r#"
    body { margin: 0; font-family: sans-serif; color: #111827; background: #f9fafb; }
    nav { display: flex; gap: 1.5rem; padding: 1rem 1.5rem; background: #ffffff; border-bottom: 1px solid #e5e7eb; }
    nav a { color: #111827; text-decoration: none; }
    nav a.current { color: #1d4ed8; font-weight: 600; }
    .page { display: flex; flex-direction: column; gap: 1rem; max-width: 72rem; margin: 0 auto; padding: 1.5rem; }
    .link { color: #2563eb; text-decoration: underline; }
    .button { padding: 0.5rem 1rem; border: none; border-radius: 0.25rem; cursor: pointer; }
    .button-primary { background: #3b82f6; color: #ffffff; }
    .form-label { display: block; margin-bottom: 0.25rem; font-size: 0.875rem; }
    .form-input { padding: 0.4rem; border: 1px solid #d1d5db; border-radius: 0.25rem; }
    .table-header { font-size: 0.75rem; text-transform: uppercase; background: #f3f4f6; }
    .table-row { background: #ffffff; border-bottom: 1px solid #e5e7eb; }
    .table-cell { padding: 0.5rem 1rem; }
    .alert { padding: 0.75rem 1rem; border-radius: 0.25rem; background: #fef3c7; }
"#;

pub enum HeadElement {
    /// CSS rules added after the base stylesheet.
    Style(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Transaction Calendar" }

                style { (PreEscaped(STYLESHEET)) }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::Style(text) => style { (text) }
                    }
                }
            }

            body
            {
                (content)
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class=(PAGE_CONTAINER_STYLE)
        {
            h1 { (header) }

            p { (description) }

            p { (fix) }

            a href="/" class=(LINK_STYLE)
            {
                "Back to the calendar"
            }
        }
    );

    base(title, &[], &content)
}

/// Format `number` with thousands separators, two decimal places and the currency `code`.
pub fn format_currency(number: f64, code: &str) -> String {
    let prefix = if number < 0.0 {
        format!("-{code} ")
    } else {
        format!("{code} ")
    };

    let formatted_number = Formatter::new()
        .separator(',')
        .map(|formatter| formatter.precision(Precision::Decimals(2)))
        .map(|mut formatter| formatter.fmt_string(number.abs()))
        .unwrap_or_else(|_| format!("{:.2}", number.abs()));

    // numfmt drops trailing zeros, pad back to two decimal places.
    let formatted_number = match formatted_number.split_once('.') {
        Some((whole, fraction)) => format!("{whole}.{fraction:0<2}"),
        None => format!("{formatted_number}.00"),
    };

    format!("{prefix}{formatted_number}")
}

/// Pick `singular` or `plural` to go with `count`.
pub fn plural<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE)
        {
          (text)
        }
    )
}
