use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::forms::{ActiveForm, Field, FieldInput};
use crate::ui::styles;
use crate::utils::truncate_string;

/// Width of the value column inside the form dialog.
const VALUE_WIDTH: usize = 32;

/// Rows needed to draw `form` inside its border.
pub fn height(form: &ActiveForm) -> u16 {
    let fields = form.form().fields.len() as u16;
    let error = if form.form().error.is_some() { 2 } else { 0 };
    // fields + blank + button + blank + hints + borders
    fields + error + 6
}

pub fn render(frame: &mut Frame, form: &ActiveForm, submitting: bool, area: Rect) {
    frame.render_widget(Clear, area);

    let state = form.form();
    let mut lines: Vec<Line> = state
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| field_line(field, i == state.focus))
        .collect();

    // Submit button
    lines.push(Line::from(""));
    let button_style = if state.is_submit_focused() {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let label = if submitting {
        " Submitting... "
    } else if state.is_submit_focused() {
        " ▶ Submit ◀ "
    } else {
        "   Submit   "
    };
    lines.push(Line::from(vec![
        Span::raw("                  ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    // Validation message
    if let Some(ref error) = state.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Tab/↑↓ field  ←→/Space choose  Enter next  Esc cancel",
        styles::muted_style(),
    )));

    let block = Block::default()
        .title(format!(" {} ", form.title()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(field: &Field, focused: bool) -> Line<'static> {
    let marker = if field.required.is_some() { "*" } else { " " };
    let label = format!(" {}{:<22}", marker, field.label);

    let value = field.display_value();
    let (shown, value_style) = if value.is_empty() {
        let hint = match &field.input {
            FieldInput::Choice { options, .. } if options.is_empty() => "(none available)",
            FieldInput::Choice { .. } => "Select...",
            _ => field.placeholder,
        };
        (hint.to_string(), styles::muted_style())
    } else {
        let shown = match (&field.input, focused) {
            // Keep the end of the text in view while typing
            (FieldInput::Text(_), true) => {
                let skip = value.chars().count().saturating_sub(VALUE_WIDTH);
                value.chars().skip(skip).collect()
            }
            _ => truncate_string(&value, VALUE_WIDTH),
        };
        (shown, styles::list_item_style())
    };

    let value_style = if focused {
        styles::selected_style()
    } else {
        value_style
    };
    let cursor = match (&field.input, focused) {
        (FieldInput::Text(_), true) => "▌",
        (FieldInput::Choice { .. }, true) => " ◀▶",
        _ => "",
    };

    Line::from(vec![
        Span::styled(label, styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(format!("{:<width$}", shown, width = VALUE_WIDTH), value_style),
        Span::styled(cursor, styles::highlight_style()),
        Span::styled("]", styles::muted_style()),
    ])
}
