use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{GobanError, Result, invalid};

/// Latin letters used for coordinates. `I` is skipped so it can't be mistaken for `J` or `1`.
const LATIN_LETTERS: &[u8] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

const CHINESE_DIGITS: [char; 10] = ['零', '一', '二', '三', '四', '五', '六', '七', '八', '九'];
const CHINESE_UNITS: [&str; 4] = ["", "十", "百", "千"];
const CHINESE_GROUPS: [&str; 3] = ["", "万", "亿"];

/// How the grid lines along one axis are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationStyle {
    ArabicNumerals,
    ChineseNumerals,
    LatinLetters,
}

impl AnnotationStyle {
    pub const NAMES: [&'static str; 4] = [
        "none",
        "arabic_numerals",
        "chinese_numerals",
        "latin_letters",
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnnotationStyle::ArabicNumerals => "arabic_numerals",
            AnnotationStyle::ChineseNumerals => "chinese_numerals",
            AnnotationStyle::LatinLetters => "latin_letters",
        }
    }

    /// Largest number of lines this style can label, if bounded.
    pub fn max_lines(self) -> Option<u32> {
        match self {
            AnnotationStyle::LatinLetters => Some(LATIN_LETTERS.len() as u32),
            _ => None,
        }
    }

    /// Label for the grid line at the 0-based `index`.
    pub fn label(self, index: u32) -> Result<String> {
        match self {
            AnnotationStyle::ArabicNumerals => Ok((index + 1).to_string()),
            AnnotationStyle::LatinLetters => LATIN_LETTERS
                .get(index as usize)
                .map(|&b| char::from(b).to_string())
                .ok_or_else(|| {
                    invalid(format!(
                        "latin_letters can label at most {} lines, no letter for index {}",
                        LATIN_LETTERS.len(),
                        index
                    ))
                }),
            AnnotationStyle::ChineseNumerals => Ok(chinese_numeral(u64::from(index) + 1)),
        }
    }
}

impl fmt::Display for AnnotationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnnotationStyle {
    type Err = GobanError;

    fn from_str(s: &str) -> Result<Self> {
        match parse_annotation(s)? {
            Some(style) => Ok(style),
            None => Err(invalid("annotation style 'none' has no label format")),
        }
    }
}

/// Parse a per-axis style name. `none` (or an empty string) turns the axis off.
pub fn parse_annotation(name: &str) -> Result<Option<AnnotationStyle>> {
    let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
    match normalized.as_str() {
        "" | "none" => Ok(None),
        "arabic_numerals" | "numerals" => Ok(Some(AnnotationStyle::ArabicNumerals)),
        "chinese_numerals" => Ok(Some(AnnotationStyle::ChineseNumerals)),
        "latin_letters" | "letters" => Ok(Some(AnnotationStyle::LatinLetters)),
        _ => Err(invalid(format!(
            "Unknown annotation style '{}'. Available: {}",
            name,
            AnnotationStyle::NAMES.join(", ")
        ))),
    }
}

/// Chinese numeral text in the everyday (lower-case) form: 十, 十一, 二十, 一百零一, 一千零一十.
pub fn chinese_numeral(value: u64) -> String {
    if value == 0 {
        return CHINESE_DIGITS[0].to_string();
    }

    let mut groups = Vec::new();
    let mut rest = value;
    while rest > 0 {
        groups.push((rest % 10_000) as u32);
        rest /= 10_000;
    }

    let mut out = String::new();
    let mut pending_zero = false;
    for (group_idx, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            pending_zero = !out.is_empty();
            continue;
        }
        if !out.is_empty() && (pending_zero || group < 1000) {
            out.push(CHINESE_DIGITS[0]);
        }
        pending_zero = false;
        out.push_str(&chinese_group(group));
        out.push_str(CHINESE_GROUPS.get(group_idx).copied().unwrap_or(""));
    }

    // 一十 is written 十 when it leads the number.
    if (10..20).contains(&value) {
        out = out.trim_start_matches(CHINESE_DIGITS[1]).to_string();
    }
    out
}

fn chinese_group(group: u32) -> String {
    let digits = [group / 1000, group / 100 % 10, group / 10 % 10, group % 10];
    let mut out = String::new();
    let mut zero_run = false;

    for (pos, &digit) in digits.iter().enumerate() {
        if digit == 0 {
            zero_run = !out.is_empty();
            continue;
        }
        if zero_run {
            out.push(CHINESE_DIGITS[0]);
            zero_run = false;
        }
        out.push(CHINESE_DIGITS[digit as usize]);
        out.push_str(CHINESE_UNITS[3 - pos]);
    }
    out
}
