use crate::core::template::{
    default_variables, render_frame, sample_template, sync_variables, ZnsPreview,
};
use crate::core::{Storage, TemplateDocument, TemplateType, TemplateVariable, Tool};
use crate::utils::error::{Result, ZaloError};
use crate::utils::validation::validate_url;

/// 範本內容來源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Inline(String),
    File(String),
    /// 內建範例，依範本類型選擇
    Sample,
}

#[derive(Debug, Clone)]
pub struct ZnsSettings {
    pub source: TemplateSource,
    pub template_type: TemplateType,
    /// 命令列指定的變數，優先於檔案中的同名變數
    pub variables: Vec<TemplateVariable>,
    pub variables_file: Option<String>,
    /// 依範本自動補齊變數清單
    pub sync_variables: bool,
    pub business_name: String,
    pub button_text: String,
    pub image_url: Option<String>,
    pub output_file: Option<String>,
}

pub struct ZnsTool<S: Storage> {
    settings: ZnsSettings,
    input: S,
    output: S,
}

impl<S: Storage> ZnsTool<S> {
    pub fn new(settings: ZnsSettings, input: S, output: S) -> Self {
        Self {
            settings,
            input,
            output,
        }
    }

    async fn load_body(&self) -> Result<String> {
        match &self.settings.source {
            TemplateSource::Inline(body) => Ok(body.clone()),
            TemplateSource::File(path) => {
                tracing::debug!("Reading template from {}", path);
                let bytes = self.input.read_file(path).await?;
                String::from_utf8(bytes).map_err(|e| ZaloError::ValidationError {
                    message: format!("Template file '{}' is not valid UTF-8: {}", path, e),
                })
            }
            TemplateSource::Sample => Ok(sample_template(self.settings.template_type).to_string()),
        }
    }

    async fn load_variables(&self) -> Result<Vec<TemplateVariable>> {
        let mut variables = self.settings.variables.clone();

        if let Some(path) = &self.settings.variables_file {
            let bytes = self.input.read_file(path).await?;
            let from_file: Vec<TemplateVariable> = serde_json::from_slice(&bytes)?;
            tracing::debug!("Loaded {} variable(s) from {}", from_file.len(), path);
            variables.extend(from_file);
        }

        if variables.is_empty() && self.settings.source == TemplateSource::Sample {
            variables = default_variables();
        }
        Ok(variables)
    }
}

#[async_trait::async_trait]
impl<S: Storage> Tool for ZnsTool<S> {
    type Input = TemplateDocument;
    type Output = ZnsPreview;

    fn name(&self) -> &'static str {
        "ZNS previewer"
    }

    async fn gather(&self) -> Result<TemplateDocument> {
        let body = self.load_body().await?;
        let mut variables = self.load_variables().await?;

        if self.settings.sync_variables {
            variables = sync_variables(&body, &variables);
            tracing::info!(
                "🔤 Variables synced from template: {:?}",
                variables.iter().map(|v| v.name.as_str()).collect::<Vec<_>>()
            );
        }

        Ok(TemplateDocument::new(body, variables))
    }

    async fn transform(&self, document: TemplateDocument) -> Result<ZnsPreview> {
        if let Some(url) = &self.settings.image_url {
            validate_url("image_url", url)?;
        }

        let preview = ZnsPreview::build(
            &document,
            self.settings.template_type,
            &self.settings.business_name,
            self.settings.image_url.as_deref(),
            &self.settings.button_text,
        );

        if preview.over_limit {
            tracing::warn!(
                "⚠️ Template is {} characters, over the ZNS limit",
                preview.char_count
            );
        }
        Ok(preview)
    }

    async fn export(&self, preview: ZnsPreview) -> Result<Vec<String>> {
        println!("{}", render_frame(&preview));

        let mut written = Vec::new();
        if let Some(path) = &self.settings.output_file {
            self.output
                .write_file(path, preview.content.as_bytes())
                .await?;
            written.push(path.clone());
        }
        Ok(written)
    }
}
