//! Schema system - validation, file templates and the interactive wizard

pub mod registry;
pub mod template;
pub mod validator;
pub mod wizard;

pub use registry::SchemaRegistry;
pub use template::{TemplateContext, TemplateError, TemplateGenerator};
pub use validator::{ValidationError, Validator};
pub use wizard::AssetWizard;
