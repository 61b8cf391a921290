//! Per-field input rules with self-dismissing error messages.
//!
//! # Design
//! Every field owns a `FieldError` that is either `Clean` or `Erroring` with
//! a deadline. Rejecting an input re-arms the deadline, replacing whatever
//! was pending, so each field has at most one live clear timer and an older
//! timer can never wipe a newer message. Time is passed in explicitly:
//! the owning event loop calls `Form::tick(now)`, and can sleep until
//! `Form::next_deadline()` in between.
//!
//! A rejected keystroke is discarded; the committed value only ever holds
//! input that passed the field's rule.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// How long a validation message stays visible without further rejections.
pub const DEFAULT_CLEAR_DELAY: Duration = Duration::from_millis(3000);

pub const LETTERS_ONLY: &str = "Apenas letras e espaços são permitidos.";
pub const DIGITS_ONLY: &str = "Apenas números são permitidos.";

/// Character class a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Any,
    /// Letters (ASCII plus U+00C0..=U+017F) and whitespace.
    Letters,
    /// ASCII digits.
    Digits,
}

impl Rule {
    pub fn check(self, raw: &str) -> Result<(), &'static str> {
        let ok = match self {
            Rule::Any => true,
            Rule::Letters => raw.chars().all(|c| {
                c.is_ascii_alphabetic() || ('\u{C0}'..='\u{17F}').contains(&c) || c.is_whitespace()
            }),
            Rule::Digits => raw.chars().all(|c| c.is_ascii_digit()),
        };
        match (ok, self) {
            (true, _) | (false, Rule::Any) => Ok(()),
            (false, Rule::Letters) => Err(LETTERS_ONLY),
            (false, Rule::Digits) => Err(DIGITS_ONLY),
        }
    }
}

/// Transient error state of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldError {
    #[default]
    Clean,
    Erroring { message: String, deadline: Instant },
}

impl FieldError {
    /// Shows `message` and (re)arms the clear timer.
    pub fn show(&mut self, message: impl Into<String>, now: Instant, delay: Duration) {
        *self = FieldError::Erroring {
            message: message.into(),
            deadline: now + delay,
        };
    }

    /// Hides the message and cancels the pending timer.
    pub fn clear(&mut self) {
        *self = FieldError::Clean;
    }

    /// Fires the timer if its deadline has passed. Returns true if the
    /// message was cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self {
            FieldError::Erroring { deadline, .. } if *deadline <= now => {
                *self = FieldError::Clean;
                true
            }
            _ => false,
        }
    }

    /// The visible message, empty when clean.
    pub fn message(&self) -> &str {
        match self {
            FieldError::Clean => "",
            FieldError::Erroring { message, .. } => message,
        }
    }

    pub fn is_showing(&self) -> bool {
        !self.message().is_empty()
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self {
            FieldError::Clean => None,
            FieldError::Erroring { deadline, .. } => Some(*deadline),
        }
    }
}

/// A validated text input.
#[derive(Debug, Clone)]
pub struct Field {
    rule: Rule,
    max_len: Option<usize>,
    value: String,
    error: FieldError,
}

impl Field {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            max_len: None,
            value: String::new(),
            error: FieldError::Clean,
        }
    }

    /// Input longer than `max_len` characters is dropped without a message.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn error(&self) -> &FieldError {
        &self.error
    }
}

/// Result of feeding raw input to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Accepted,
    Rejected(&'static str),
    /// Over `max_len`, unknown field, or the form is unmounted.
    Ignored,
}

/// A set of validated fields keyed by `K`, sharing one clear delay.
pub struct Form<K> {
    fields: BTreeMap<K, Field>,
    delay: Duration,
    mounted: bool,
}

impl<K: fmt::Debug> fmt::Debug for Form<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("fields", &self.fields)
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl<K: Copy + Ord + fmt::Debug> Form<K> {
    pub fn new(delay: Duration) -> Self {
        Self {
            fields: BTreeMap::new(),
            delay,
            mounted: true,
        }
    }

    pub fn with_field(mut self, key: K, field: Field) -> Self {
        self.fields.insert(key, field);
        self
    }

    /// Validates `raw` as the new content of `key`. Accepted input is
    /// committed and clears any visible message at once; rejected input
    /// leaves the value untouched and (re)arms the field's message.
    pub fn input(&mut self, key: K, raw: &str, now: Instant) -> InputOutcome {
        if !self.mounted {
            return InputOutcome::Ignored;
        }
        let delay = self.delay;
        let Some(field) = self.fields.get_mut(&key) else {
            tracing::debug!(field = ?key, "input for unknown field");
            return InputOutcome::Ignored;
        };
        if field.max_len.is_some_and(|max| raw.chars().count() > max) {
            return InputOutcome::Ignored;
        }
        match field.rule.check(raw) {
            Ok(()) => {
                field.value = raw.to_string();
                field.error.clear();
                InputOutcome::Accepted
            }
            Err(message) => {
                field.error.show(message, now, delay);
                InputOutcome::Rejected(message)
            }
        }
    }

    /// Shows a message on `key` without touching its value, e.g. for
    /// checks made on submit.
    pub fn show_error(&mut self, key: K, message: &str, now: Instant) {
        if !self.mounted {
            return;
        }
        let delay = self.delay;
        if let Some(field) = self.fields.get_mut(&key) {
            field.error.show(message, now, delay);
        }
    }

    /// Fires every timer whose deadline has passed and returns the fields
    /// whose message was cleared.
    pub fn tick(&mut self, now: Instant) -> Vec<K> {
        if !self.mounted {
            return Vec::new();
        }
        self.fields
            .iter_mut()
            .filter_map(|(key, field)| field.error.tick(now).then_some(*key))
            .collect()
    }

    /// Earliest pending clear deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.fields.values().filter_map(|f| f.error.deadline()).min()
    }

    pub fn armed_timers(&self) -> usize {
        self.fields
            .values()
            .filter(|f| f.error.deadline().is_some())
            .count()
    }

    /// True while any field shows a message.
    pub fn is_submit_disabled(&self) -> bool {
        self.fields.values().any(|f| f.error.is_showing())
    }

    pub fn value(&self, key: K) -> &str {
        self.fields.get(&key).map_or("", Field::value)
    }

    pub fn error_message(&self, key: K) -> &str {
        self.fields.get(&key).map_or("", |f| f.error.message())
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Cancels every armed timer. The form ignores input and ticks from
    /// here on.
    pub fn unmount(&mut self) {
        let cancelled = self.armed_timers();
        for field in self.fields.values_mut() {
            field.error.clear();
        }
        self.mounted = false;
        tracing::debug!(cancelled, "form unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Key {
        Name,
        Day,
    }

    fn form() -> Form<Key> {
        Form::new(DEFAULT_CLEAR_DELAY)
            .with_field(Key::Name, Field::new(Rule::Letters))
            .with_field(Key::Day, Field::new(Rule::Digits).with_max_len(2))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn rules_match_expected_character_classes() {
        assert!(Rule::Letters.check("José da Silva").is_ok());
        assert!(Rule::Letters.check("Ângela Łucja").is_ok());
        assert_eq!(Rule::Letters.check("Ana1"), Err(LETTERS_ONLY));
        assert!(Rule::Digits.check("").is_ok());
        assert!(Rule::Digits.check("0123").is_ok());
        assert_eq!(Rule::Digits.check("12a3"), Err(DIGITS_ONLY));
        assert!(Rule::Any.check("qualquer coisa 123!").is_ok());
    }

    #[test]
    fn rejected_input_keeps_previous_value_and_expires() {
        let t0 = Instant::now();
        let mut form = form();
        assert_eq!(form.input(Key::Day, "12", t0), InputOutcome::Accepted);
        assert_eq!(
            form.input(Key::Day, "1a", t0),
            InputOutcome::Rejected(DIGITS_ONLY)
        );
        assert_eq!(form.value(Key::Day), "12");
        assert_eq!(form.error_message(Key::Day), DIGITS_ONLY);

        assert!(form.tick(t0 + ms(2999)).is_empty());
        assert_eq!(form.tick(t0 + ms(3000)), vec![Key::Day]);
        assert_eq!(form.error_message(Key::Day), "");
    }

    #[test]
    fn second_rejection_rearms_from_its_own_time() {
        let t0 = Instant::now();
        let mut form = form();
        form.input(Key::Name, "A1", t0);
        form.input(Key::Name, "A2", t0 + ms(1000));
        assert_eq!(form.armed_timers(), 1);

        assert!(form.tick(t0 + ms(3000)).is_empty());
        assert_eq!(form.error_message(Key::Name), LETTERS_ONLY);
        assert_eq!(form.tick(t0 + ms(4000)), vec![Key::Name]);
    }

    #[test]
    fn accepted_input_clears_message_immediately() {
        let t0 = Instant::now();
        let mut form = form();
        form.input(Key::Name, "Ana!", t0);
        assert!(form.is_submit_disabled());
        form.input(Key::Name, "Ana", t0 + ms(10));
        assert_eq!(form.error_message(Key::Name), "");
        assert_eq!(form.armed_timers(), 0);
        assert!(!form.is_submit_disabled());
    }

    #[test]
    fn over_length_input_is_ignored_silently() {
        let t0 = Instant::now();
        let mut form = form();
        form.input(Key::Day, "31", t0);
        assert_eq!(form.input(Key::Day, "312", t0), InputOutcome::Ignored);
        assert_eq!(form.value(Key::Day), "31");
        assert_eq!(form.error_message(Key::Day), "");
    }

    #[test]
    fn next_deadline_is_the_earliest_pending_timer() {
        let t0 = Instant::now();
        let mut form = form();
        assert_eq!(form.next_deadline(), None);
        form.input(Key::Day, "x", t0 + ms(500));
        form.input(Key::Name, "1", t0);
        assert_eq!(form.next_deadline(), Some(t0 + ms(3000)));
        assert_eq!(form.armed_timers(), 2);
    }

    #[test]
    fn unmount_cancels_timers_and_freezes_form() {
        let t0 = Instant::now();
        let mut form = form();
        form.input(Key::Name, "9", t0);
        form.unmount();
        assert_eq!(form.armed_timers(), 0);
        assert!(form.tick(t0 + ms(5000)).is_empty());
        assert_eq!(form.input(Key::Name, "Ana", t0), InputOutcome::Ignored);
        form.show_error(Key::Name, "late", t0);
        assert_eq!(form.error_message(Key::Name), "");
    }
}
