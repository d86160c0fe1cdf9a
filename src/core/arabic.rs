use regex::Regex;

use crate::core::TarjetasError;

/// Adverbs whose final tanwin is part of the written form and must survive cleanup.
pub const NUNATION_EXCEPTIONS: [&str; 16] = [
    "شكراً",
    "جداً",
    "أبداً",
    "حالاً",
    "طبعاً",
    "عموماً",
    "يومياً",
    "مثلاً",
    "فعلاً",
    "تقريباً",
    "أهلاً",
    "سهلاً",
    "دائماً",
    "غالباً",
    "أحياناً",
    "قليلاً",
];

/// Removes word-final tanwin (fathatan, dammatan, kasratan) from Arabic text.
pub struct NunationCleaner {
    tanwin: Regex,
}

impl NunationCleaner {
    pub fn new() -> Result<Self, TarjetasError> {
        Ok(Self { tanwin: Regex::new(r"[\x{064B}\x{064C}\x{064D}]+$")? })
    }

    pub fn clean(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| {
                let bare = word.replace(['.', '،'], "");
                if NUNATION_EXCEPTIONS.iter().any(|exception| bare.contains(exception)) {
                    word.to_string()
                } else {
                    self.tanwin.replace(word, "").into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn is_harakah(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

/// Drops short vowels and other harakat for display.
pub fn strip_diacritics(text: &str) -> String {
    text.chars().filter(|c| !is_harakah(*c)).collect()
}
