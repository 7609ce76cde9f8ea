pub mod defaults;
pub mod errors;
pub mod model;
pub mod provider;

pub use defaults::default_settings;
pub use errors::CascadeError;
pub use model::{resolve, Settings, SettingsLayer};
pub use provider::DefaultsProvider;

#[cfg(test)]
mod tests;
