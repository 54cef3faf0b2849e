// Notify / contact form.
// Visual: two text boxes (email, organization) and a button; Tab moves focus,
// Enter submits. On success the form disappears and a thank-you line takes its place.
// Submissions are appended to a JSON list in the local store; nothing leaves the machine.

use std::collections::BTreeMap;
use std::time::SystemTime;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::storage::KeyValueStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Email,
    Text,
}

#[derive(Clone, Debug)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
}

/// Native field constraint that blocked a submit.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} is not an email address")]
    NotEmail(&'static str),
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required(n) | Self::NotEmail(n) => *n,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitted,
}

/// One stored record: the field values plus when and in which language.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Submission {
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    pub timestamp: String,
    pub lang: String,
}

/// `local@domain`, both sides non-empty, no whitespace.
fn looks_like_email(v: &str) -> bool {
    match v.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !v.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[derive(Debug)]
pub struct NotifyForm {
    fields: Vec<Field>,
    focus: usize,
    state: FormState,
    last_error: Option<FieldError>,
    submissions_key: String,
}

impl NotifyForm {
    pub fn new(submissions_key: &str) -> Self {
        Self {
            fields: vec![
                Field { name: "email", kind: FieldKind::Email, required: true, value: String::new() },
                Field { name: "organization", kind: FieldKind::Text, required: false, value: String::new() },
            ],
            focus: 0,
            state: FormState::Editing,
            last_error: None,
            submissions_key: submissions_key.to_owned(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn last_error(&self) -> Option<&FieldError> {
        self.last_error.as_ref()
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_field(&mut self, index: usize) {
        if index < self.fields.len() {
            self.focus = index;
        }
    }

    pub fn set_value(&mut self, name: &str, value: &str) {
        if let Some(f) = self.fields.iter_mut().find(|f| f.name == name) {
            f.value = value.to_owned();
        }
    }

    /// Typed character into the focused field (ignored once submitted).
    pub fn type_char(&mut self, ch: char) {
        if self.state == FormState::Editing {
            self.fields[self.focus].value.push(ch);
            self.last_error = None;
        }
    }

    pub fn backspace(&mut self) {
        if self.state == FormState::Editing {
            self.fields[self.focus].value.pop();
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        for f in &self.fields {
            let v = f.value.trim();
            if v.is_empty() {
                if f.required { return Err(FieldError::Required(f.name)); }
                continue;
            }
            if f.kind == FieldKind::Email && !looks_like_email(v) {
                return Err(FieldError::NotEmail(f.name));
            }
        }
        Ok(())
    }

    /// Check field constraints, append a record to the stored list, show success, reset fields.
    /// A failed store write is logged; the visitor still sees the success message.
    pub fn submit(
        &mut self,
        store: &mut dyn KeyValueStore,
        lang: &str,
        now: SystemTime,
    ) -> Result<Submission, FieldError> {
        if let Err(e) = self.validate() {
            if let Some(i) = self.fields.iter().position(|f| f.name == e.field()) {
                self.focus = i;
            }
            self.last_error = Some(e.clone());
            return Err(e);
        }

        let submission = Submission {
            fields: self.fields.iter().map(|f| (f.name.to_owned(), f.value.trim().to_owned())).collect(),
            timestamp: humantime::format_rfc3339_millis(now).to_string(),
            lang: lang.to_owned(),
        };
        info!(fields = ?submission.fields, lang, "form submitted");

        let mut records = stored_submissions(&*store, &self.submissions_key);
        match serde_json::to_value(&submission) {
            Ok(v) => records.push(v),
            Err(e) => warn!(error = %e, "could not serialize submission"),
        }
        let write = serde_json::to_string(&records)
            .map_err(crate::error::Error::from)
            .and_then(|text| store.set(&self.submissions_key, text));
        if let Err(e) = write {
            warn!(error = %e, "could not store submission");
        }

        self.state = FormState::Submitted;
        self.last_error = None;
        for f in &mut self.fields {
            f.value.clear();
        }
        self.focus = 0;
        Ok(submission)
    }
}

/// Everything stored under `key` so far. Older records of any shape are kept as-is;
/// a value that isn't a JSON list is logged and read as empty.
pub fn stored_submissions(store: &dyn KeyValueStore, key: &str) -> Vec<Value> {
    let Some(text) = store.get(key) else { return Vec::new() };
    match serde_json::from_str::<Vec<Value>>(&text) {
        Ok(list) => list,
        Err(e) => {
            warn!(key, error = %e, "stored submissions are not a JSON list; starting a new one");
            Vec::new()
        }
    }
}
