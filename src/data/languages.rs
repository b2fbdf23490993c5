//! Supported languages and the translation each one reads from.

use serde::Serialize;

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub translation_id: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    lang("en", "English (ESV)", "de4e12af7f28f599-02"),
    lang("es", "Spanish (Reina Valera 1909)", "592420522e16049f-01"),
    lang("hat", "Haitian Creole (Bib Sen An)", "hatbsa"),
    lang("hau", "Hausa (Open Hausa Contemporary Bible 2020)", "0ab0c764d56a715d-01"),
    lang("hbo", "Hebrew, Ancient (Westminster Leningrad Codex)", "0b262f1ed7f084a6-01"),
    lang("heb", "Hebrew, Modern (Open Hebrew Living NT 2009)", "a8a97eebae3c98e4-01"),
    lang("hi", "Hindi (Indian Revised Version 2019)", "1e8ab327edbce67f-01"),
    lang("hrv", "Croatian (Open Croatian Living NT 2000)", "b00de703b3d02a5a-01"),
    lang("hun", "Hungarian (Open Hungarian NT)", "fcfc25677b0a53c9-01"),
    lang("ibo", "Igbo (Open Igbo Contemporary Bible 2020)", "a36fc06b086699f1-02"),
    lang("ind", "Indonesian (Plain Indonesian Translation)", "2dd568eeff29fb3c-02"),
    lang("isl", "Icelandic (Open Icelandic Contemporary NT and Psalms)", "e4581313051f2861-01"),
    lang("ita", "Italian (Diodati Bible 1885)", "41f25b97f468e10b-01"),
    lang("pol", "Polish (Open Polish Living NT 2016)", "fbb8b0e1943b417c-01"),
    lang("por", "Portuguese (Biblia Livre Para Todos)", "d63894c8d9a7a503-01"),
    lang("swh", "Swahili (Open Kiswahili Contemporary Version)", "611f8eb23aec8f13-01"),
    lang("vie", "Vietnamese (Open Vietnamese Contemporary Bible 2015)", "5cc7093967a0a392-01"),
    lang("yor", "Yoruba (Open Yoruba Contemporary Bible 2017)", "b8d1feac6e94bd74-01"),
    lang("ukr", "Ukrainian (Open New Ukrainian Translation 2022)", "6c696cd1d82e2723-03"),
    lang("lug", "Luganda (Open Luganda Contemporary Bible 2014)", "f276be3571f516cb-01"),
    lang("lin", "Lingala (Open Lingala Contemporary Bible 2020)", "ac6b6b7cd1e93057-01"),
    lang("nya", "Chichewa (Open God's Word in Contemporary Chichewa 2016)", "43247c35dbe56e1c-01"),
    lang("nob", "Norwegian (Open Norwegian Living NT)", "246ad95eade0d0a1-01"),
    lang("sna", "Shona (Open Shona Contemporary Bible)", "e8d99085dcb83ab5-01"),
    lang("twi", "Twi (Open Akuapem Twi Contemporary Bible 2020)", "b6aee081108c0bc6-01"),
];

const fn lang(code: &'static str, name: &'static str, translation_id: &'static str) -> Language {
    Language {
        code,
        name,
        translation_id,
    }
}

pub fn find_language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Translation id for a language, falling back to the default language.
pub fn translation_for(code: &str) -> &'static str {
    find_language(code)
        .or_else(|| find_language(DEFAULT_LANGUAGE))
        .map(|l| l.translation_id)
        .unwrap_or(LANGUAGES[0].translation_id)
}
