//! Form controllers for creating records.
//!
//! A [`Form`] is an ordered list of fields plus a submit button. Each entity
//! has a controller that builds its form, and turns the collected values into
//! a typed payload, applying the required-field rules and the light
//! transformations the API expects (ISO dates, numeric coercion, flag
//! defaults).

pub mod business_unit;
pub mod company;
pub mod metric;

use thiserror::Error;

use crate::api::Resource;
use crate::models::NewRecord;

pub use business_unit::BusinessUnitForm;
pub use company::CompanyForm;
pub use metric::MetricForm;

/// Maximum length of a text field. Matches the server's column limits.
const MAX_FIELD_LENGTH: usize = 255;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A required field was left empty.
    #[error("{message}")]
    Missing {
        field: &'static str,
        message: &'static str,
    },

    /// A field has a value the server would reject.
    #[error("{message}")]
    Invalid { field: &'static str, message: String },
}

impl FormError {
    pub fn field(&self) -> &'static str {
        match self {
            FormError::Missing { field, .. } | FormError::Invalid { field, .. } => field,
        }
    }

    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        FormError::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Input widget behind a form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Text(String),
    /// One of `options`; `None` until the user picks one.
    Choice {
        options: Vec<String>,
        selected: Option<usize>,
    },
    Toggle(bool),
}

#[derive(Debug, Clone)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    /// Message shown when the field is required and empty.
    pub required: Option<&'static str>,
    pub input: FieldInput,
    /// Hint shown while the field is empty.
    pub placeholder: &'static str,
}

impl Field {
    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            required: None,
            input: FieldInput::Text(String::new()),
            placeholder: "",
        }
    }

    pub fn choice(key: &'static str, label: &'static str, options: Vec<String>) -> Self {
        Self {
            key,
            label,
            required: None,
            input: FieldInput::Choice {
                options,
                selected: None,
            },
            placeholder: "",
        }
    }

    pub fn toggle(key: &'static str, label: &'static str, on: bool) -> Self {
        Self {
            key,
            label,
            required: None,
            input: FieldInput::Toggle(on),
            placeholder: "",
        }
    }

    pub fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn with_text(mut self, value: &str) -> Self {
        self.input = FieldInput::Text(value.to_string());
        self
    }

    /// Value as shown in the form.
    pub fn display_value(&self) -> String {
        match &self.input {
            FieldInput::Text(value) => value.clone(),
            FieldInput::Choice { options, selected } => selected
                .and_then(|i| options.get(i))
                .cloned()
                .unwrap_or_default(),
            FieldInput::Toggle(on) => if *on { "Yes" } else { "No" }.to_string(),
        }
    }

    fn missing(&self) -> FormError {
        FormError::Missing {
            field: self.key,
            message: self.required.unwrap_or("This field is required"),
        }
    }
}

/// An ordered set of fields followed by a submit button.
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<Field>,
    /// Index into `fields`; `fields.len()` means the submit button.
    pub focus: usize,
    /// Validation message from the last submit attempt.
    pub error: Option<String>,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            focus: 0,
            error: None,
        }
    }

    fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.key == key)
    }

    // ===== Reading values =====

    pub fn text(&self, key: &str) -> &str {
        match self.field(key).map(|f| &f.input) {
            Some(FieldInput::Text(value)) => value,
            _ => "",
        }
    }

    pub fn selected(&self, key: &str) -> Option<usize> {
        match self.field(key).map(|f| &f.input) {
            Some(FieldInput::Choice { selected, .. }) => *selected,
            _ => None,
        }
    }

    pub fn toggled(&self, key: &str) -> bool {
        matches!(self.field(key).map(|f| &f.input), Some(FieldInput::Toggle(true)))
    }

    /// Trimmed text of a required field.
    pub fn required_text(&self, key: &'static str) -> Result<String, FormError> {
        let value = self.text(key).trim();
        if value.is_empty() {
            return Err(self.missing(key));
        }
        Ok(value.to_string())
    }

    /// Trimmed text, or `None` when blank.
    pub fn optional_text(&self, key: &str) -> Option<String> {
        let value = self.text(key).trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    pub fn required_choice(&self, key: &'static str) -> Result<usize, FormError> {
        self.selected(key).ok_or_else(|| self.missing(key))
    }

    fn missing(&self, key: &'static str) -> FormError {
        match self.field(key) {
            Some(field) => field.missing(),
            None => FormError::Missing {
                field: key,
                message: "This field is required",
            },
        }
    }

    // ===== Writing values =====

    pub fn set_text(&mut self, key: &str, value: &str) {
        if let Some(field) = self.field_mut(key) {
            field.input = FieldInput::Text(value.to_string());
        }
    }

    pub fn select(&mut self, key: &str, index: usize) {
        if let Some(Field {
            input: FieldInput::Choice { options, selected },
            ..
        }) = self.field_mut(key)
        {
            if index < options.len() {
                *selected = Some(index);
            }
        }
    }

    pub fn clear_choice(&mut self, key: &str) {
        if let Some(Field {
            input: FieldInput::Choice { selected, .. },
            ..
        }) = self.field_mut(key)
        {
            *selected = None;
        }
    }

    /// Replace the options of a choice field, keeping the selection only if
    /// it is still in range.
    pub fn set_options(&mut self, key: &str, new_options: Vec<String>) {
        if let Some(Field {
            input: FieldInput::Choice { options, selected },
            ..
        }) = self.field_mut(key)
        {
            if selected.is_some_and(|i| i >= new_options.len()) {
                *selected = None;
            }
            *options = new_options;
        }
    }

    // ===== Focus and editing =====

    pub fn is_submit_focused(&self) -> bool {
        self.focus >= self.fields.len()
    }

    pub fn focused_field(&self) -> Option<&Field> {
        self.fields.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    pub fn focus_prev(&mut self) {
        let slots = self.fields.len() + 1;
        self.focus = (self.focus + slots - 1) % slots;
    }

    pub fn focus_key(&mut self, key: &str) {
        if let Some(index) = self.fields.iter().position(|f| f.key == key) {
            self.focus = index;
        }
    }

    /// Type a character into the focused text field.
    pub fn insert_char(&mut self, c: char) {
        if let Some(Field {
            input: FieldInput::Text(value),
            ..
        }) = self.fields.get_mut(self.focus)
        {
            if can_add_char(value.chars().count(), c) {
                value.push(c);
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(Field {
            input: FieldInput::Text(value),
            ..
        }) = self.fields.get_mut(self.focus)
        {
            value.pop();
        }
    }

    /// Step the focused choice field forward or backward, wrapping.
    pub fn cycle_choice(&mut self, forward: bool) {
        if let Some(Field {
            input: FieldInput::Choice { options, selected },
            ..
        }) = self.fields.get_mut(self.focus)
        {
            if options.is_empty() {
                return;
            }
            let len = options.len();
            *selected = Some(match (*selected, forward) {
                (None, true) => 0,
                (None, false) => len - 1,
                (Some(i), true) => (i + 1) % len,
                (Some(i), false) => (i + len - 1) % len,
            });
        }
    }

    /// Flip the focused toggle field.
    pub fn toggle_focused(&mut self) {
        if let Some(Field {
            input: FieldInput::Toggle(on),
            ..
        }) = self.fields.get_mut(self.focus)
        {
            *on = !*on;
        }
    }

    /// Record a validation failure and move focus to the offending field.
    pub fn show_error(&mut self, error: &FormError) {
        self.error = Some(error.to_string());
        self.focus_key(error.field());
    }
}

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character should be accepted into a text field
pub fn can_add_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && is_valid_input_char(c)
}

/// The form currently open, one variant per entity.
#[derive(Debug, Clone)]
pub enum ActiveForm {
    Company(CompanyForm),
    BusinessUnit(BusinessUnitForm),
    Metric(MetricForm),
}

impl ActiveForm {
    pub fn resource(&self) -> Resource {
        match self {
            ActiveForm::Company(_) => Resource::Companies,
            ActiveForm::BusinessUnit(_) => Resource::BusinessUnits,
            ActiveForm::Metric(_) => Resource::Metrics,
        }
    }

    pub fn title(&self) -> String {
        format!("Add New {}", self.resource().entity_name())
    }

    pub fn form(&self) -> &Form {
        match self {
            ActiveForm::Company(f) => &f.form,
            ActiveForm::BusinessUnit(f) => &f.form,
            ActiveForm::Metric(f) => &f.form,
        }
    }

    pub fn form_mut(&mut self) -> &mut Form {
        match self {
            ActiveForm::Company(f) => &mut f.form,
            ActiveForm::BusinessUnit(f) => &mut f.form,
            ActiveForm::Metric(f) => &mut f.form,
        }
    }

    /// Validate and build the payload.
    pub fn build(&self) -> Result<NewRecord, FormError> {
        match self {
            ActiveForm::Company(f) => f.build().map(NewRecord::Company),
            ActiveForm::BusinessUnit(f) => f.build().map(NewRecord::BusinessUnit),
            ActiveForm::Metric(f) => f.build().map(NewRecord::Metric),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> Form {
        Form::new(vec![
            Field::text("name", "Name").required("Please enter a name"),
            Field::choice("kind", "Kind", vec!["A".to_string(), "B".to_string()]).required("Select kind"),
            Field::toggle("flag", "Flag", true),
        ])
    }

    #[test]
    fn test_focus_wraps_through_submit() {
        let mut form = sample_form();
        assert_eq!(form.focus, 0);
        form.focus_prev();
        assert!(form.is_submit_focused());
        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn test_text_editing() {
        let mut form = sample_form();
        for c in "Acme".chars() {
            form.insert_char(c);
        }
        form.insert_char('\n');
        form.backspace();
        assert_eq!(form.text("name"), "Acm");
    }

    #[test]
    fn test_text_length_is_capped() {
        assert!(can_add_char(254, 'a'));
        assert!(!can_add_char(255, 'a'));
        assert!(!can_add_char(0, '\t'));
    }

    #[test]
    fn test_cycle_choice_wraps() {
        let mut form = sample_form();
        form.focus_key("kind");
        form.cycle_choice(false);
        assert_eq!(form.selected("kind"), Some(1));
        form.cycle_choice(true);
        assert_eq!(form.selected("kind"), Some(0));
    }

    #[test]
    fn test_required_rules() {
        let mut form = sample_form();
        let err = form.required_text("name").unwrap_err();
        assert_eq!(err.to_string(), "Please enter a name");
        assert_eq!(err.field(), "name");
        assert_eq!(form.required_choice("kind").unwrap_err().to_string(), "Select kind");

        form.set_text("name", "  Acme ");
        form.select("kind", 1);
        assert_eq!(form.required_text("name").unwrap(), "Acme");
        assert_eq!(form.required_choice("kind").unwrap(), 1);
    }

    #[test]
    fn test_toggle_focused() {
        let mut form = sample_form();
        form.focus_key("flag");
        form.toggle_focused();
        assert!(!form.toggled("flag"));
    }

    #[test]
    fn test_set_options_drops_out_of_range_selection() {
        let mut form = sample_form();
        form.select("kind", 1);
        form.set_options("kind", vec!["only".to_string()]);
        assert_eq!(form.selected("kind"), None);
    }

    #[test]
    fn test_show_error_focuses_field() {
        let mut form = sample_form();
        form.focus = 3;
        form.show_error(&FormError::Missing {
            field: "kind",
            message: "Select kind",
        });
        assert_eq!(form.focus, 1);
        assert_eq!(form.error.as_deref(), Some("Select kind"));
    }
}
