//! Screen compositions built from the synchronizer, the modal workflows and
//! validated forms.

pub mod admins;
pub mod entity_list;
pub mod login;
pub mod settings;

pub use admins::AdminsScreen;
pub use entity_list::{EntityListScreen, Row};
pub use login::{AdminField, AdminLoginForm, CustomerField, CustomerForm, LoginScreen, LoginView};
pub use settings::{SettingsCard, SettingsHub};
