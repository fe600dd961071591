//! Supported target languages.
//!
//! Every language is addressed by a short command tag (`kh`, `fr`, `myan`)
//! which maps to the code the backends understand and an English display
//! name used in LLM prompts.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// Tag typed by the user, also used in output file names
    pub command: &'static str,
    /// Backend language code
    pub code: &'static str,
    /// English display name
    pub name: &'static str,
}

const fn lang(command: &'static str, code: &'static str, name: &'static str) -> Language {
    Language { command, code, name }
}

pub const LANGUAGES: &[Language] = &[
    lang("kh", "km", "Khmer"),
    lang("en", "en", "English"),
    lang("ch", "zh-CN", "Chinese (Simplified)"),
    lang("th", "th", "Thai"),
    lang("vn", "vi", "Vietnamese"),
    lang("jp", "ja", "Japanese"),
    lang("kr", "ko", "Korean"),
    lang("fr", "fr", "French"),
    lang("de", "de", "German"),
    lang("ru", "ru", "Russian"),
    lang("es", "es", "Spanish"),
    lang("it", "it", "Italian"),
    lang("in", "hi", "Hindi"),
    lang("id", "id", "Indonesian"),
    lang("my", "ms", "Malay"),
    lang("ph", "tl", "Filipino"),
    lang("ar", "ar", "Arabic"),
    lang("pt", "pt", "Portuguese"),
    lang("tr", "tr", "Turkish"),
    lang("nl", "nl", "Dutch"),
    lang("pl", "pl", "Polish"),
    lang("sv", "sv", "Swedish"),
    lang("da", "da", "Danish"),
    lang("fi", "fi", "Finnish"),
    lang("no", "no", "Norwegian"),
    lang("cs", "cs", "Czech"),
    lang("el", "el", "Greek"),
    lang("iw", "he", "Hebrew"),
    lang("ro", "ro", "Romanian"),
    lang("uk", "uk", "Ukrainian"),
    lang("hu", "hu", "Hungarian"),
    lang("sk", "sk", "Slovak"),
    lang("bg", "bg", "Bulgarian"),
    lang("hr", "hr", "Croatian"),
    lang("sr", "sr", "Serbian"),
    lang("sl", "sl", "Slovenian"),
    lang("et", "et", "Estonian"),
    lang("lv", "lv", "Latvian"),
    lang("lt", "lt", "Lithuanian"),
    lang("fa", "fa", "Persian"),
    lang("bn", "bn", "Bengali"),
    lang("pa", "pa", "Punjabi"),
    lang("gu", "gu", "Gujarati"),
    lang("ta", "ta", "Tamil"),
    lang("te", "te", "Telugu"),
    lang("kn", "kn", "Kannada"),
    lang("ml", "ml", "Malayalam"),
    lang("si", "si", "Sinhala"),
    lang("ne", "ne", "Nepali"),
    lang("lo", "lo", "Lao"),
    lang("myan", "my", "Burmese"),
    lang("ka", "ka", "Georgian"),
    lang("hy", "hy", "Armenian"),
    lang("az", "az", "Azerbaijani"),
    lang("kk", "kk", "Kazakh"),
    lang("uz", "uz", "Uzbek"),
    lang("tg", "tg", "Tajik"),
    lang("tk", "tk", "Turkmen"),
    lang("ky", "ky", "Kyrgyz"),
    lang("mn", "mn", "Mongolian"),
    lang("af", "af", "Afrikaans"),
    lang("sq", "sq", "Albanian"),
    lang("am", "am", "Amharic"),
    lang("eu", "eu", "Basque"),
    lang("be", "be", "Belarusian"),
    lang("bs", "bs", "Bosnian"),
    lang("ca", "ca", "Catalan"),
    lang("gl", "gl", "Galician"),
    lang("is", "is", "Icelandic"),
    lang("sw", "sw", "Swahili"),
];

/// Look up a language by command tag, ignoring case and a leading `/`
pub fn find(command: &str) -> Option<&'static Language> {
    let command = command.trim().trim_start_matches('/');
    LANGUAGES
        .iter()
        .find(|language| language.command.eq_ignore_ascii_case(command))
}

pub fn find_by_code(code: &str) -> Option<&'static Language> {
    let code = code.trim();
    LANGUAGES
        .iter()
        .find(|language| language.code.eq_ignore_ascii_case(code))
}

/// Render every command tag, five per line
pub fn command_list() -> String {
    LANGUAGES
        .chunks(5)
        .map(|chunk| {
            let commands = chunk
                .iter()
                .map(|language| format!("/{}", language.command))
                .collect::<Vec<_>>()
                .join(", ");
            format!(" • {}", commands)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Set of language codes preferentially routed to the regional service
#[derive(Debug, Clone, Default)]
pub struct RegionalSet {
    codes: HashSet<String>,
}

impl RegionalSet {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            codes: codes
                .into_iter()
                .map(|code| code.as_ref().trim().to_lowercase())
                .filter(|code| !code.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, language: &Language) -> bool {
        self.codes.contains(&language.code.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_seventy_unique_commands() {
        assert_eq!(LANGUAGES.len(), 70);
        let commands: HashSet<_> = LANGUAGES.iter().map(|l| l.command).collect();
        assert_eq!(commands.len(), LANGUAGES.len());
    }

    #[test]
    fn test_find_accepts_slash_and_case() {
        assert_eq!(find("/KH").map(|l| l.code), Some("km"));
        assert_eq!(find("myan").map(|l| l.name), Some("Burmese"));
        assert_eq!(find(" fr ").map(|l| l.name), Some("French"));
        assert!(find("xx").is_none());
        assert!(find("").is_none());
    }

    #[test]
    fn test_find_by_code() {
        assert_eq!(find_by_code("he").map(|l| l.command), Some("iw"));
        assert_eq!(find_by_code("ZH-cn").map(|l| l.command), Some("ch"));
    }

    #[test]
    fn test_command_list_groups_of_five() {
        let listing = command_list();
        let lines: Vec<_> = listing.lines().collect();
        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0], " • /kh, /en, /ch, /th, /vn");
    }

    #[test]
    fn test_regional_set_matches_codes() {
        let regional = RegionalSet::new(["km", "zh-CN", " "]);
        assert_eq!(regional.len(), 2);
        assert!(regional.contains(find("kh").unwrap()));
        assert!(regional.contains(find("ch").unwrap()));
        assert!(!regional.contains(find("fr").unwrap()));
    }
}
