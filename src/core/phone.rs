use crate::domain::model::{ChatLinkRequest, DeepLink, NormalizedPhone};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const COUNTRY_CODE: &str = "84";
pub const DEEP_LINK_BASE: &str = "https://zalo.me";

/// 與瀏覽器 `encodeURIComponent` 相同：保留 `-_.!~*'()`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 把輸入的電話號碼轉成 `84xxxxxxxxx`。
///
/// 這只是越南號碼的經驗規則，不做 E.164 驗證：
/// - 不檢查位數
/// - 已帶其他國碼的號碼仍會被加上 `84`
/// - 本地號碼若剛好以 `84` 開頭會被原樣保留
pub fn normalize_phone(raw: &str) -> NormalizedPhone {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    let normalized = if let Some(rest) = digits.strip_prefix('0') {
        format!("{}{}", COUNTRY_CODE, rest)
    } else if digits.starts_with(COUNTRY_CODE) {
        digits
    } else {
        format!("{}{}", COUNTRY_CODE, digits)
    };

    NormalizedPhone(normalized)
}

/// 空白號碼不產生連結
pub fn build_deep_link(raw_phone: &str, message: &str) -> Option<DeepLink> {
    if raw_phone.is_empty() {
        return None;
    }

    let phone = normalize_phone(raw_phone);
    Some(deep_link_for(&phone, message))
}

pub fn deep_link_for(phone: &NormalizedPhone, message: &str) -> DeepLink {
    let mut link = format!("{}/{}", DEEP_LINK_BASE, phone);
    if !message.is_empty() {
        link.push_str("?text=");
        link.extend(utf8_percent_encode(message, URI_COMPONENT));
    }
    DeepLink(link)
}

impl ChatLinkRequest {
    pub fn new(raw_phone_number: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            raw_phone_number: raw_phone_number.into(),
            message: message.into(),
        }
    }

    pub fn normalized_phone(&self) -> Option<NormalizedPhone> {
        if self.raw_phone_number.is_empty() {
            None
        } else {
            Some(normalize_phone(&self.raw_phone_number))
        }
    }

    pub fn deep_link(&self) -> Option<DeepLink> {
        build_deep_link(&self.raw_phone_number, &self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_zero_replaced_with_country_code() {
        assert_eq!(normalize_phone("0912345678").as_str(), "84912345678");
    }

    #[test]
    fn test_missing_country_code_is_prepended() {
        assert_eq!(normalize_phone("912345678").as_str(), "84912345678");
    }

    #[test]
    fn test_existing_country_code_kept() {
        assert_eq!(normalize_phone("84912345678").as_str(), "84912345678");
        assert_eq!(normalize_phone("+84 912 345 678").as_str(), "84912345678");
    }

    #[test]
    fn test_formatting_characters_stripped() {
        assert_eq!(normalize_phone("091-234.5678").as_str(), "84912345678");
        assert_eq!(normalize_phone("(091) 234 5678").as_str(), "84912345678");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["0912345678", "912345678", "+84 912 345 678", "0084123", "abc"] {
            let once = normalize_phone(raw);
            let twice = normalize_phone(once.as_str());
            assert_eq!(once, twice, "input {:?}", raw);
        }
    }

    #[test]
    fn test_known_heuristic_limitations() {
        // 其他國碼仍會被加上 84
        assert_eq!(normalize_phone("+1 555 0100").as_str(), "8415550100");
        // 以 84 開頭的本地號碼不變
        assert_eq!(normalize_phone("8412").as_str(), "8412");
    }

    #[test]
    fn test_deep_link_without_message() {
        let link = build_deep_link("84912345678", "").unwrap();
        assert_eq!(link.as_str(), "https://zalo.me/84912345678");
    }

    #[test]
    fn test_deep_link_with_message_is_percent_encoded() {
        let link = build_deep_link("84912345678", "Hi there").unwrap();
        assert_eq!(link.as_str(), "https://zalo.me/84912345678?text=Hi%20there");
    }

    #[test]
    fn test_deep_link_encodes_like_uri_component() {
        let link = build_deep_link("0912345678", "Xin chào! a&b=c (1)").unwrap();
        assert_eq!(
            link.as_str(),
            "https://zalo.me/84912345678?text=Xin%20ch%C3%A0o!%20a%26b%3Dc%20(1)"
        );
    }

    #[test]
    fn test_empty_phone_yields_no_link() {
        assert!(build_deep_link("", "hello").is_none());
        assert!(ChatLinkRequest::new("", "hello").deep_link().is_none());
        assert!(ChatLinkRequest::default().normalized_phone().is_none());
    }
}
