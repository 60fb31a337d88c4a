use crate::app::{LinkSettings, StickerSettings, TemplateSource, ZnsSettings};
use crate::config::toml_config::ToolkitConfig;
use crate::core::batch::BatchPolicy;
use crate::core::qr::QrFormat;
use crate::core::{ChatLinkRequest, TemplateType, TemplateVariable};
use crate::utils::error::{Result, ZaloError};
use crate::utils::validation::{validate_path, Validate};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "zalo-kit")]
#[command(about = "Zalo marketing toolkit: chat links, ZNS previews and stickers")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build a click-to-chat link and QR code for a phone number
    Link(LinkArgs),
    /// Preview a ZNS template with variables substituted
    Zns(ZnsArgs),
    /// Convert images into 360x360 transparent stickers
    Sticker(StickerArgs),
}

#[derive(Debug, Args)]
pub struct LinkArgs {
    /// Phone number, e.g. 0912345678 or 84912345678
    pub phone: String,

    /// Prefilled chat message
    #[arg(short, long, default_value = "")]
    pub message: String,

    #[arg(long)]
    pub qr_color: Option<String>,

    #[arg(long)]
    pub bg_color: Option<String>,

    #[arg(long)]
    pub qr_size: Option<u32>,

    /// QR output formats
    #[arg(long, value_enum, value_delimiter = ',', default_values = ["png", "svg"])]
    pub format: Vec<QrFormat>,

    /// Only print the link, skip QR files
    #[arg(long)]
    pub no_qr: bool,

    /// Copy the link to the system clipboard
    #[arg(long)]
    pub copy: bool,

    /// Seconds to keep serving the clipboard before exiting (Linux), 0 to skip
    #[arg(long, requires = "copy")]
    pub hold_secs: Option<u64>,

    #[arg(short, long)]
    pub output_path: Option<String>,
}

#[derive(Debug, Args)]
pub struct ZnsArgs {
    /// Template body given inline
    #[arg(short, long, conflicts_with = "template_file")]
    pub template: Option<String>,

    /// Read template body from a file
    #[arg(short = 'f', long)]
    pub template_file: Option<String>,

    /// Template type; without a template body the bundled sample is used
    #[arg(long = "type", value_enum)]
    pub template_type: Option<TemplateType>,

    /// Variable as name=value, repeatable
    #[arg(long = "var", value_parser = parse_variable)]
    pub variables: Vec<TemplateVariable>,

    /// JSON array of {"name", "value"} objects
    #[arg(long)]
    pub vars_file: Option<String>,

    /// Rebuild the variable list from the markers in the template
    #[arg(long)]
    pub sync: bool,

    #[arg(long)]
    pub business_name: Option<String>,

    #[arg(long)]
    pub button_text: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,

    /// Write the substituted message to this file
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Debug, Args)]
pub struct StickerArgs {
    /// Image files to convert
    #[arg(required = true)]
    pub inputs: Vec<String>,

    #[arg(short, long)]
    pub output_path: Option<String>,

    #[arg(long, value_enum)]
    pub policy: Option<BatchPolicy>,

    /// Save every sticker as its own PNG instead of one archive
    #[arg(long)]
    pub separate: bool,
}

pub fn parse_variable(raw: &str) -> std::result::Result<TemplateVariable, String> {
    match raw.split_once('=') {
        Some((name, value)) => Ok(TemplateVariable::new(name, value)),
        None => Err(format!("expected name=value, got '{}'", raw)),
    }
}

impl CliConfig {
    /// 載入設定檔；沒有指定時使用預設值
    pub fn load_toolkit_config(&self) -> Result<ToolkitConfig> {
        let config = match &self.config {
            Some(path) => ToolkitConfig::from_file(path)?,
            None => ToolkitConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

impl LinkArgs {
    /// 命令列參數覆蓋設定檔
    pub fn into_settings(self, config: &ToolkitConfig) -> Result<LinkSettings> {
        let mut style = config.link.qr_style();
        if let Some(color) = self.qr_color {
            style.dark_color = color;
        }
        if let Some(color) = self.bg_color {
            style.light_color = color;
        }
        if let Some(size) = self.qr_size {
            style.size = size;
        }
        style.validate()?;

        let output_path = self
            .output_path
            .unwrap_or_else(|| config.link.output_path.clone());
        validate_path("output_path", &output_path)?;

        Ok(LinkSettings {
            request: ChatLinkRequest::new(self.phone, self.message),
            style,
            formats: if self.no_qr { Vec::new() } else { self.format },
            output_path,
            copy: self.copy,
            clipboard_hold: Duration::from_secs(
                self.hold_secs.unwrap_or(config.link.clipboard_hold_secs),
            ),
        })
    }
}

impl ZnsArgs {
    pub fn into_settings(self, config: &ToolkitConfig) -> Result<ZnsSettings> {
        let source = match (self.template, self.template_file) {
            (Some(body), _) => TemplateSource::Inline(body),
            (None, Some(path)) => TemplateSource::File(path),
            (None, None) => TemplateSource::Sample,
        };

        Ok(ZnsSettings {
            source,
            template_type: self.template_type.unwrap_or(config.zns.template_type),
            variables: self.variables,
            variables_file: self.vars_file,
            sync_variables: self.sync,
            business_name: self
                .business_name
                .unwrap_or_else(|| config.zns.business_name.clone()),
            button_text: self
                .button_text
                .unwrap_or_else(|| config.zns.button_text.clone()),
            image_url: self.image_url.or_else(|| config.zns.image_url.clone()),
            output_file: self.output,
        })
    }
}

impl StickerArgs {
    pub fn into_settings(self, config: &ToolkitConfig) -> Result<StickerSettings> {
        if self.inputs.is_empty() {
            return Err(ZaloError::MissingConfigError {
                field: "inputs".to_string(),
            });
        }

        let output_path = self
            .output_path
            .unwrap_or_else(|| config.sticker.output_path.clone());
        validate_path("output_path", &output_path)?;

        Ok(StickerSettings {
            inputs: self.inputs,
            output_path,
            policy: self.policy.unwrap_or(config.sticker.batch_policy),
            separate: self.separate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variable() {
        assert_eq!(
            parse_variable("amount=1,500,000").unwrap(),
            TemplateVariable::new("amount", "1,500,000")
        );
        assert_eq!(
            parse_variable("note=a=b").unwrap(),
            TemplateVariable::new("note", "a=b")
        );
        assert!(parse_variable("missing").is_err());
    }

    #[test]
    fn test_link_flags_override_config() {
        let cli = CliConfig::parse_from([
            "zalo-kit",
            "link",
            "0912345678",
            "-m",
            "Hi there",
            "--qr-color",
            "#000000",
            "--format",
            "svg",
        ]);
        let Command::Link(args) = cli.command else {
            panic!("expected link command");
        };

        let settings = args.into_settings(&ToolkitConfig::default()).unwrap();
        assert_eq!(settings.style.dark_color, "#000000");
        assert_eq!(settings.style.light_color, "#FFFFFF");
        assert_eq!(settings.formats, vec![QrFormat::Svg]);
        assert_eq!(settings.output_path, "./output");
        assert!(!settings.copy);
        assert_eq!(settings.clipboard_hold, Duration::from_secs(15));
        assert_eq!(
            settings.request.deep_link().unwrap().as_str(),
            "https://zalo.me/84912345678?text=Hi%20there"
        );
    }

    #[test]
    fn test_link_hold_secs_overrides_config() {
        let cli = CliConfig::parse_from([
            "zalo-kit",
            "link",
            "0912345678",
            "--copy",
            "--hold-secs",
            "0",
        ]);
        let Command::Link(args) = cli.command else {
            panic!("expected link command");
        };

        let settings = args.into_settings(&ToolkitConfig::default()).unwrap();
        assert!(settings.copy);
        assert_eq!(settings.clipboard_hold, Duration::ZERO);

        let without_copy =
            CliConfig::try_parse_from(["zalo-kit", "link", "0912345678", "--hold-secs", "5"]);
        assert!(without_copy.is_err());
    }

    #[test]
    fn test_link_invalid_color_rejected() {
        let cli = CliConfig::parse_from(["zalo-kit", "link", "0912", "--qr-color", "red"]);
        let Command::Link(args) = cli.command else {
            panic!("expected link command");
        };
        assert!(args.into_settings(&ToolkitConfig::default()).is_err());
    }

    #[test]
    fn test_zns_defaults_to_sample() {
        let cli = CliConfig::parse_from(["zalo-kit", "zns", "--type", "button", "--var", "name=Lan"]);
        let Command::Zns(args) = cli.command else {
            panic!("expected zns command");
        };

        let settings = args.into_settings(&ToolkitConfig::default()).unwrap();
        assert_eq!(settings.source, TemplateSource::Sample);
        assert_eq!(settings.template_type, TemplateType::Button);
        assert_eq!(settings.variables, vec![TemplateVariable::new("name", "Lan")]);
        assert_eq!(settings.button_text, "Theo dõi đơn hàng");
    }

    #[test]
    fn test_sticker_policy_from_config() {
        let mut config = ToolkitConfig::default();
        config.sticker.batch_policy = BatchPolicy::FailFast;

        let cli = CliConfig::parse_from(["zalo-kit", "sticker", "a.png", "b.jpg"]);
        let Command::Sticker(args) = cli.command else {
            panic!("expected sticker command");
        };

        let settings = args.into_settings(&config).unwrap();
        assert_eq!(settings.inputs.len(), 2);
        assert_eq!(settings.policy, BatchPolicy::FailFast);
        assert_eq!(settings.output_path, "./stickers");
    }
}
