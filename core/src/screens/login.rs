//! Customer sign-up and admin login forms.
//!
//! # Design
//! The screen shows one of two forms at a time. Switching views unmounts the
//! form being left, which cancels its pending clear timers, and mounts a
//! fresh one. Both forms are thin wrappers over `validation::Form`; the
//! differences are which rules each field enforces and what happens on
//! submit.
//!
//! The admin credential check compares against configured master
//! credentials. It is a placeholder, not authentication.

use std::time::{Duration, Instant};

use crate::config::{AdminCredentials, ClientConfig};
use crate::error::LoginError;
use crate::types::UserRole;
use crate::validation::{Field, Form, InputOutcome, Rule};

pub const NAME_REQUIRED: &str = "O nome é obrigatório.";
pub const PASSWORD_REQUIRED: &str = "A senha é obrigatória.";
pub const INVALID_CREDENTIALS: &str = "Nome de usuário ou senha inválidos.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CustomerField {
    Name,
    BirthDay,
    BirthMonth,
    Whatsapp,
    Email,
    Password,
}

impl CustomerField {
    pub const ALL: [CustomerField; 6] = [
        CustomerField::Name,
        CustomerField::BirthDay,
        CustomerField::BirthMonth,
        CustomerField::Whatsapp,
        CustomerField::Email,
        CustomerField::Password,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CustomerField::Name => "Nome",
            CustomerField::BirthDay => "Dia Aniv.",
            CustomerField::BirthMonth => "Mês Aniv.",
            CustomerField::Whatsapp => "WhatsApp",
            CustomerField::Email => "Email",
            CustomerField::Password => "Senha",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AdminField {
    Name,
    Password,
}

/// Sign-up form shown to customers.
#[derive(Debug)]
pub struct CustomerForm {
    form: Form<CustomerField>,
    password_visible: bool,
}

impl CustomerForm {
    pub fn new(clear_delay: Duration) -> Self {
        let form = Form::new(clear_delay)
            .with_field(CustomerField::Name, Field::new(Rule::Letters))
            .with_field(CustomerField::BirthDay, Field::new(Rule::Digits).with_max_len(2))
            .with_field(CustomerField::BirthMonth, Field::new(Rule::Digits).with_max_len(2))
            .with_field(CustomerField::Whatsapp, Field::new(Rule::Digits))
            .with_field(CustomerField::Email, Field::new(Rule::Any))
            .with_field(CustomerField::Password, Field::new(Rule::Any));
        Self {
            form,
            password_visible: false,
        }
    }

    pub fn input(&mut self, field: CustomerField, raw: &str, now: Instant) -> InputOutcome {
        self.form.input(field, raw, now)
    }

    pub fn form(&self) -> &Form<CustomerField> {
        &self.form
    }

    pub fn toggle_password_visibility(&mut self) -> bool {
        self.password_visible = !self.password_visible;
        self.password_visible
    }

    pub fn is_password_visible(&self) -> bool {
        self.password_visible
    }

    pub fn is_submit_disabled(&self) -> bool {
        self.form.is_submit_disabled()
    }

    pub fn submit(&self) -> Result<UserRole, LoginError> {
        if self.is_submit_disabled() {
            return Err(LoginError::Blocked);
        }
        if let Some(missing) = CustomerField::ALL
            .into_iter()
            .find(|&field| self.form.value(field).trim().is_empty())
        {
            return Err(LoginError::MissingField(missing.label()));
        }
        tracing::info!("customer signed in");
        Ok(UserRole::Customer)
    }
}

/// Restricted login for the salon owner.
#[derive(Debug)]
pub struct AdminLoginForm {
    form: Form<AdminField>,
    password_visible: bool,
    credentials: AdminCredentials,
}

impl AdminLoginForm {
    pub fn new(clear_delay: Duration, credentials: AdminCredentials) -> Self {
        let form = Form::new(clear_delay)
            .with_field(AdminField::Name, Field::new(Rule::Any))
            .with_field(AdminField::Password, Field::new(Rule::Any));
        Self {
            form,
            password_visible: false,
            credentials,
        }
    }

    /// Any input is accepted; typing clears the field's message.
    pub fn input(&mut self, field: AdminField, raw: &str, now: Instant) -> InputOutcome {
        self.form.input(field, raw, now)
    }

    pub fn form(&self) -> &Form<AdminField> {
        &self.form
    }

    pub fn toggle_password_visibility(&mut self) -> bool {
        self.password_visible = !self.password_visible;
        self.password_visible
    }

    pub fn is_password_visible(&self) -> bool {
        self.password_visible
    }

    /// Not gated on visible messages: a wrong password can be resubmitted
    /// straight away.
    pub fn submit(&mut self, now: Instant) -> Result<UserRole, LoginError> {
        let name_missing = self.form.value(AdminField::Name).trim().is_empty();
        let password_missing = self.form.value(AdminField::Password).is_empty();
        if name_missing {
            self.form.show_error(AdminField::Name, NAME_REQUIRED, now);
        }
        if password_missing {
            self.form.show_error(AdminField::Password, PASSWORD_REQUIRED, now);
        }
        if name_missing {
            return Err(LoginError::MissingField("Nome"));
        }
        if password_missing {
            return Err(LoginError::MissingField("Senha"));
        }

        let name = self.form.value(AdminField::Name);
        let password = self.form.value(AdminField::Password);
        if self.credentials.matches(name, password) {
            tracing::info!("admin signed in");
            Ok(UserRole::Admin)
        } else {
            tracing::warn!("admin login rejected");
            self.form
                .show_error(AdminField::Password, INVALID_CREDENTIALS, now);
            Err(LoginError::InvalidCredentials)
        }
    }
}

#[derive(Debug)]
pub enum LoginView {
    Customer(CustomerForm),
    Admin(AdminLoginForm),
}

#[derive(Debug)]
pub struct LoginScreen {
    view: LoginView,
    clear_delay: Duration,
    credentials: AdminCredentials,
}

impl LoginScreen {
    /// Starts on the customer view.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            view: LoginView::Customer(CustomerForm::new(config.error_clear_delay)),
            clear_delay: config.error_clear_delay,
            credentials: config.admin_credentials.clone(),
        }
    }

    pub fn view(&self) -> &LoginView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut LoginView {
        &mut self.view
    }

    pub fn show_admin(&mut self) {
        let next = LoginView::Admin(AdminLoginForm::new(self.clear_delay, self.credentials.clone()));
        self.switch(next);
    }

    pub fn show_customer(&mut self) {
        let next = LoginView::Customer(CustomerForm::new(self.clear_delay));
        self.switch(next);
    }

    fn switch(&mut self, next: LoginView) {
        self.unmount();
        self.view = next;
    }

    /// Fires due clear timers on the visible form.
    pub fn tick(&mut self, now: Instant) {
        match &mut self.view {
            LoginView::Customer(form) => {
                form.form.tick(now);
            }
            LoginView::Admin(form) => {
                form.form.tick(now);
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.view {
            LoginView::Customer(form) => form.form.next_deadline(),
            LoginView::Admin(form) => form.form.next_deadline(),
        }
    }

    pub fn unmount(&mut self) {
        match &mut self.view {
            LoginView::Customer(form) => form.form.unmount(),
            LoginView::Admin(form) => form.form.unmount(),
        }
    }
}
