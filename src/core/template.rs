use crate::domain::model::{TemplateDocument, TemplateType, TemplateVariable};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// ZNS 訊息字數上限
pub const MAX_CHARS: usize = 2000;

/// 任何 `{{...}}`，名稱照字面比對
static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("marker pattern"));

/// 自動擷取變數時只認 `{{identifier}}`
static IDENTIFIER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("identifier pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Marker { name: &'a str, raw: &'a str },
}

pub fn tokenize(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in MARKER.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Literal(&template[last..whole.start()]));
        }
        segments.push(Segment::Marker {
            name: name.as_str(),
            raw: whole.as_str(),
        });
        last = whole.end();
    }

    if last < template.len() {
        segments.push(Segment::Literal(&template[last..]));
    }
    segments
}

/// 以變數值替換 `{{name}}`。
///
/// 同名變數以先宣告者為準；找不到的標記原樣保留；
/// 替換後的值不會再被掃描。
pub fn render(template: &str, variables: &[TemplateVariable]) -> String {
    let mut out = String::with_capacity(template.len());

    for segment in tokenize(template) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Marker { name, raw } => {
                match variables.iter().find(|v| v.name == name) {
                    Some(var) => out.push_str(&var.value),
                    None => out.push_str(raw),
                }
            }
        }
    }
    out
}

/// 依出現順序列出不重複的變數名稱
pub fn extract_variable_names(template: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    IDENTIFIER_MARKER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// 依範本重建變數清單，已有的值沿用，新名稱預設為空字串
pub fn sync_variables(template: &str, existing: &[TemplateVariable]) -> Vec<TemplateVariable> {
    extract_variable_names(template)
        .into_iter()
        .map(|name| {
            existing
                .iter()
                .find(|v| v.name == name)
                .cloned()
                .unwrap_or_else(|| TemplateVariable::new(name, ""))
        })
        .collect()
}

/// 以 UTF-16 code unit 計算長度
pub fn char_count(body: &str) -> usize {
    body.encode_utf16().count()
}

pub fn is_over_limit(body: &str) -> bool {
    char_count(body) > MAX_CHARS
}

impl TemplateDocument {
    pub fn new(body: impl Into<String>, variables: Vec<TemplateVariable>) -> Self {
        Self {
            body: body.into(),
            variables,
        }
    }

    pub fn render(&self) -> String {
        render(&self.body, &self.variables)
    }

    pub fn sync_variables(&mut self) {
        self.variables = sync_variables(&self.body, &self.variables);
    }
}

pub fn sample_template(template_type: TemplateType) -> &'static str {
    match template_type {
        TemplateType::Text => {
            "Xin chào {{name}}!\n\n\
             Đơn hàng {{order_id}} của bạn đã được xác nhận.\n\n\
             Tổng giá trị: {{amount}} VND\n\
             Ngày đặt hàng: {{date}}\n\n\
             Cảm ơn bạn đã tin tưởng sử dụng dịch vụ của chúng tôi!"
        }
        TemplateType::ImageText => {
            "Chào {{name}}!\n\n\
             Khuyến mãi đặc biệt dành cho bạn!\n\
             Giảm ngay 20% cho đơn hàng tiếp theo.\n\n\
             Mã giảm giá: ZALO20\n\
             Hạn sử dụng: {{date}}"
        }
        TemplateType::Button => {
            "Xin chào {{name}}!\n\n\
             Đơn hàng {{order_id}} đang được vận chuyển.\n\n\
             Dự kiến giao hàng: {{date}}\n\n\
             Vui lòng bấm nút bên dưới để theo dõi đơn hàng."
        }
    }
}

pub fn default_variables() -> Vec<TemplateVariable> {
    vec![
        TemplateVariable::new("name", "Nguyễn Văn A"),
        TemplateVariable::new("order_id", "DH123456"),
        TemplateVariable::new("amount", "1,500,000"),
        TemplateVariable::new("date", "20/12/2024"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZnsPreview {
    pub business_name: String,
    pub template_type: TemplateType,
    pub content: String,
    pub image_url: Option<String>,
    pub button_text: String,
    pub char_count: usize,
    pub over_limit: bool,
}

impl ZnsPreview {
    /// 字數以未替換前的範本計算
    pub fn build(
        document: &TemplateDocument,
        template_type: TemplateType,
        business_name: &str,
        image_url: Option<&str>,
        button_text: &str,
    ) -> Self {
        Self {
            business_name: business_name.to_string(),
            template_type,
            content: document.render(),
            image_url: image_url.filter(|u| !u.is_empty()).map(str::to_string),
            button_text: button_text.to_string(),
            char_count: char_count(&document.body),
            over_limit: is_over_limit(&document.body),
        }
    }
}

/// 文字版的手機訊息框
pub fn render_frame(preview: &ZnsPreview) -> String {
    let mut lines = Vec::new();
    lines.push(format!("┌─ {} · Zalo Official Account", preview.business_name));
    lines.push("│".to_string());

    if preview.template_type == TemplateType::ImageText {
        match &preview.image_url {
            Some(url) => lines.push(format!("│ [image] {}", url)),
            None => lines.push("│ [image placeholder]".to_string()),
        }
        lines.push("│".to_string());
    }

    for line in preview.content.lines() {
        if line.is_empty() {
            lines.push("│".to_string());
        } else {
            lines.push(format!("│ {}", line));
        }
    }

    if preview.template_type == TemplateType::Button {
        lines.push("│".to_string());
        lines.push(format!("│ [ {} ]", preview.button_text));
    }

    lines.push("│".to_string());
    let flag = if preview.over_limit { "  ⚠ over limit" } else { "" };
    lines.push(format!(
        "└─ {}/{} characters{}",
        preview.char_count, MAX_CHARS, flag
    ));
    lines.join("\n")
}
