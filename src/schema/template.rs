//! Template generation for new asset files

use rust_embed::Embed;
use serde::Serialize;
use tera::Tera;
use thiserror::Error;

use crate::entities::asset::Asset;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const ASSET_TEMPLATE: &str = "asset.yaml.tera";

/// Values rendered into a new asset file
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub id: String,
    pub name: String,
    pub area: Option<String>,
    pub asset_type: String,
    pub criticality: String,
    pub environment: Vec<String>,
    pub subsystems: Vec<String>,
    pub created: String,
    pub author: String,
}

impl TemplateContext {
    /// Snapshot the header fields of an asset (components are not rendered)
    pub fn from_asset(asset: &Asset) -> Self {
        Self {
            id: asset.id.to_string(),
            name: asset.name.clone(),
            area: asset.area.clone(),
            asset_type: asset.asset_type.clone(),
            criticality: asset.criticality.to_string(),
            environment: asset.environment.iter().map(|f| wire_name(&f)).collect(),
            subsystems: asset.subsystems.iter().map(wire_name).collect(),
            created: asset.created.to_rfc3339(),
            author: asset.author.clone(),
        }
    }
}

/// The serialized (kebab-case) name of an enum value
fn wire_name<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Double-quoted YAML scalar (JSON strings are valid YAML)
fn yaml_quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

/// Template generator using Tera
pub struct TemplateGenerator {
    tera: Tera,
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

impl TemplateGenerator {
    /// Create a new template generator with embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render a commented asset file
    pub fn generate_asset(&self, ctx: &TemplateContext) -> Result<String, TemplateError> {
        if !self.tera.get_template_names().any(|n| n == ASSET_TEMPLATE) {
            return Err(TemplateError::NotFound(ASSET_TEMPLATE.to_string()));
        }

        let mut context = tera::Context::new();
        context.insert("id", &ctx.id);
        context.insert("name", &yaml_quote(&ctx.name));
        context.insert("area", &ctx.area.as_deref().map(yaml_quote));
        context.insert("asset_type", &yaml_quote(&ctx.asset_type));
        context.insert("asset_type_label", &ctx.asset_type);
        context.insert("criticality", &ctx.criticality);
        context.insert("environment", &ctx.environment);
        context.insert("subsystems", &ctx.subsystems);
        context.insert("created", &ctx.created);
        context.insert("author", &yaml_quote(&ctx.author));

        self.tera
            .render(ASSET_TEMPLATE, &context)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::asset::Criticality;
    use crate::entities::component::Subsystem;
    use crate::entities::environment::EnvFlag;

    fn asset() -> Asset {
        let mut asset = Asset::new(
            "Pump \"P-7\"".to_string(),
            "PT/ED Pump".to_string(),
            Criticality::B,
            "test".to_string(),
        );
        asset.area = Some("Pretreatment".to_string());
        asset.environment.set(EnvFlag::HumidityWashdown, true);
        asset
    }

    #[test]
    fn test_template_parses_back_into_asset() {
        let generator = TemplateGenerator::new().unwrap();
        let source = asset();
        let yaml = generator
            .generate_asset(&TemplateContext::from_asset(&source))
            .unwrap();

        let parsed: Asset = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.id, source.id);
        assert_eq!(parsed.name, "Pump \"P-7\"");
        assert_eq!(parsed.area.as_deref(), Some("Pretreatment"));
        assert_eq!(parsed.criticality, Criticality::B);
        assert_eq!(parsed.environment, source.environment);
        assert_eq!(parsed.subsystems, source.subsystems);
        assert!(parsed.is_enabled(Subsystem::DrivesMotion));
        assert!(parsed.components.is_empty());
    }

    #[test]
    fn test_template_without_area_or_flags() {
        let generator = TemplateGenerator::new().unwrap();
        let mut source = asset();
        source.area = None;
        source.environment.set(EnvFlag::HumidityWashdown, false);
        let yaml = generator
            .generate_asset(&TemplateContext::from_asset(&source))
            .unwrap();

        assert!(!yaml.contains("area:"));
        assert!(yaml.contains("environment: []"));
        let parsed: Asset = serde_yml::from_str(&yaml).unwrap();
        assert!(parsed.environment.is_empty());
    }

    #[test]
    fn test_rendered_file_passes_schema() {
        let generator = TemplateGenerator::new().unwrap();
        let yaml = generator
            .generate_asset(&TemplateContext::from_asset(&asset()))
            .unwrap();
        let result = crate::schema::Validator::default().validate(
            &yaml,
            "new.pmc.yaml",
            crate::core::EntityPrefix::Ast,
        );
        assert!(result.is_ok(), "{:?}", result);
    }

    #[test]
    fn test_wire_name() {
        assert_eq!(wire_name(&Subsystem::DrivesMotion), "drives-motion");
        assert_eq!(wire_name(&EnvFlag::HighCycling), "high-cycling");
    }
}
