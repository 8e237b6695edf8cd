//! Supported currency codes with English and Thai display names.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{CalcError, CalcResult};

/// Display language for currency and unit names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Th,
}

impl Language {
    pub const ALL: &'static [Language] = &[Language::En, Language::Th];

    pub fn from_str_flexible(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "eng" | "english" => Some(Language::En),
            "th" | "tha" | "thai" => Some(Language::Th),
            _ => None,
        }
    }
}

/// A supported currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name_en: &'static str,
    pub name_th: &'static str,
}

impl CurrencyInfo {
    pub fn name(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.name_en,
            Language::Th => self.name_th,
        }
    }
}

macro_rules! currencies {
    ($(($code:literal, $en:literal, $th:literal)),+ $(,)?) => {
        /// Every supported currency in display order.
        pub static SUPPORTED_CURRENCIES: &[CurrencyInfo] = &[
            $(CurrencyInfo { code: $code, name_en: $en, name_th: $th }),+
        ];
    };
}

currencies![
    ("USD", "United States Dollar", "ดอลลาร์สหรัฐ"),
    ("THB", "Thai Baht", "บาทไทย"),
    ("EUR", "Euro", "ยูโร"),
    ("JPY", "Japanese Yen", "เยนญี่ปุ่น"),
    ("GBP", "British Pound", "ปอนด์อังกฤษ"),
    ("KRW", "South Korean Won", "วอนเกาหลีใต้"),
    ("AUD", "Australian Dollar", "ดอลลาร์ออสเตรเลีย"),
    ("CAD", "Canadian Dollar", "ดอลลาร์แคนาดา"),
    ("CHF", "Swiss Franc", "ฟรังก์สวิส"),
    ("CNY", "Chinese Yuan", "หยวนจีน"),
    ("INR", "Indian Rupee", "รูปีอินเดีย"),
    ("SGD", "Singapore Dollar", "ดอลลาร์สิงคโปร์"),
    ("NZD", "New Zealand Dollar", "ดอลลาร์นิวซีแลนด์"),
    ("HKD", "Hong Kong Dollar", "ดอลลาร์ฮ่องกง"),
    ("SEK", "Swedish Krona", "โครนาสวีเดน"),
    ("NOK", "Norwegian Krone", "โครนนอร์เวย์"),
    ("DKK", "Danish Krone", "โครนเดนมาร์ก"),
    ("RUB", "Russian Ruble", "รูเบิลรัสเซีย"),
    ("ZAR", "South African Rand", "แรนด์แอฟริกาใต้"),
    ("BRL", "Brazilian Real", "เรียลบราซิล"),
    ("MXN", "Mexican Peso", "เปโซเม็กซิโก"),
    ("MYR", "Malaysian Ringgit", "ริงกิตมาเลเซีย"),
    ("PHP", "Philippine Peso", "เปโซฟิลิปปินส์"),
    ("TWD", "Taiwan Dollar", "ดอลลาร์ไต้หวัน"),
    ("IDR", "Indonesian Rupiah", "รูเปียห์อินโดนีเซีย"),
];

static BY_CODE: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
    SUPPORTED_CURRENCIES
        .iter()
        .enumerate()
        .map(|(i, c)| (c.code, i as u8))
        .collect()
});

/// A validated, supported ISO currency code.
///
/// Indexes [`SUPPORTED_CURRENCIES`]; only constructed from a table entry.
/// Serializes as the bare code string (`"USD"`); deserializing rejects
/// unsupported codes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrencyCode(u8);

impl CurrencyCode {
    pub const USD: CurrencyCode = CurrencyCode(0);
    pub const THB: CurrencyCode = CurrencyCode(1);

    /// Parse a trimmed, case-insensitive code.
    ///
    /// ```rust
    /// use calc_core::currency::CurrencyCode;
    ///
    /// assert_eq!(CurrencyCode::parse(" eur ").unwrap().as_str(), "EUR");
    /// assert!(CurrencyCode::parse("XYZ").is_err());
    /// ```
    pub fn parse(s: &str) -> CalcResult<Self> {
        let upper = s.trim().to_ascii_uppercase();
        BY_CODE
            .get(upper.as_str())
            .map(|&index| CurrencyCode(index))
            .ok_or_else(|| CalcError::unknown_currency(s.trim()))
    }

    pub fn all() -> impl Iterator<Item = CurrencyCode> {
        (0..SUPPORTED_CURRENCIES.len()).map(|i| CurrencyCode(i as u8))
    }

    pub fn as_str(&self) -> &'static str {
        self.info().code
    }

    pub fn info(&self) -> &'static CurrencyInfo {
        &SUPPORTED_CURRENCIES[self.0 as usize]
    }

    pub fn name(&self, language: Language) -> &'static str {
        self.info().name(language)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyCode({})", self.as_str())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::parse(s)
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CurrencyCode::parse(&s).map_err(serde::de::Error::custom)
    }
}
