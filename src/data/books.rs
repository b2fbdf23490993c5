//! Book-name table used to turn typed references into USFM book ids.

/// `(usfm id, display name, extra accepted abbreviations)`
const BOOKS: &[(&str, &str, &[&str])] = &[
    ("GEN", "Genesis", &["gen", "gn"]),
    ("EXO", "Exodus", &["exo", "ex", "exod"]),
    ("LEV", "Leviticus", &["lev", "lv"]),
    ("NUM", "Numbers", &["num", "nm"]),
    ("DEU", "Deuteronomy", &["deut", "dt"]),
    ("JOS", "Joshua", &["josh", "jos"]),
    ("JDG", "Judges", &["judg", "jdg"]),
    ("RUT", "Ruth", &["ru", "rth"]),
    ("1SA", "1 Samuel", &["1sam", "1sa"]),
    ("2SA", "2 Samuel", &["2sam", "2sa"]),
    ("1KI", "1 Kings", &["1kgs", "1ki"]),
    ("2KI", "2 Kings", &["2kgs", "2ki"]),
    ("1CH", "1 Chronicles", &["1chr", "1ch"]),
    ("2CH", "2 Chronicles", &["2chr", "2ch"]),
    ("EZR", "Ezra", &["ezr"]),
    ("NEH", "Nehemiah", &["neh"]),
    ("EST", "Esther", &["est", "esth"]),
    ("JOB", "Job", &["jb"]),
    ("PSA", "Psalms", &["psalm", "ps", "psa", "pss"]),
    ("PRO", "Proverbs", &["prov", "prv", "pro"]),
    ("ECC", "Ecclesiastes", &["eccl", "ecc", "qoh"]),
    ("SNG", "Song of Songs", &["song", "songofsolomon", "sos"]),
    ("ISA", "Isaiah", &["isa", "is"]),
    ("JER", "Jeremiah", &["jer", "je"]),
    ("LAM", "Lamentations", &["lam", "la"]),
    ("EZK", "Ezekiel", &["ezek", "ezk", "eze"]),
    ("DAN", "Daniel", &["dan", "dn"]),
    ("HOS", "Hosea", &["hos", "ho"]),
    ("JOL", "Joel", &["jl", "jol"]),
    ("AMO", "Amos", &["am", "amo"]),
    ("OBA", "Obadiah", &["obad", "ob"]),
    ("JON", "Jonah", &["jon", "jnh"]),
    ("MIC", "Micah", &["mic", "mi"]),
    ("NAM", "Nahum", &["nah", "na"]),
    ("HAB", "Habakkuk", &["hab", "hb"]),
    ("ZEP", "Zephaniah", &["zeph", "zep"]),
    ("HAG", "Haggai", &["hag", "hg"]),
    ("ZEC", "Zechariah", &["zech", "zec"]),
    ("MAL", "Malachi", &["mal", "ml"]),
    ("MAT", "Matthew", &["matt", "mt"]),
    ("MRK", "Mark", &["mk", "mrk", "mar"]),
    ("LUK", "Luke", &["lk", "luk"]),
    ("JHN", "John", &["jn", "jhn", "joh"]),
    ("ACT", "Acts", &["act", "ac"]),
    ("ROM", "Romans", &["rom", "rm"]),
    ("1CO", "1 Corinthians", &["1cor", "1co"]),
    ("2CO", "2 Corinthians", &["2cor", "2co"]),
    ("GAL", "Galatians", &["gal", "ga"]),
    ("EPH", "Ephesians", &["eph"]),
    ("PHP", "Philippians", &["phil", "php"]),
    ("COL", "Colossians", &["col"]),
    ("1TH", "1 Thessalonians", &["1thess", "1th"]),
    ("2TH", "2 Thessalonians", &["2thess", "2th"]),
    ("1TI", "1 Timothy", &["1tim", "1ti"]),
    ("2TI", "2 Timothy", &["2tim", "2ti"]),
    ("TIT", "Titus", &["tit"]),
    ("PHM", "Philemon", &["phlm", "phm"]),
    ("HEB", "Hebrews", &["heb"]),
    ("JAS", "James", &["jas", "jm"]),
    ("1PE", "1 Peter", &["1pet", "1pe"]),
    ("2PE", "2 Peter", &["2pet", "2pe"]),
    ("1JN", "1 John", &["1jn", "1jhn"]),
    ("2JN", "2 John", &["2jn", "2jhn"]),
    ("3JN", "3 John", &["3jn", "3jhn"]),
    ("JUD", "Jude", &["jud", "jde"]),
    ("REV", "Revelation", &["rev", "re", "revelations"]),
];

fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolves a USFM id, full name or abbreviation (case and spacing ignored).
pub fn book_id(name: &str) -> Option<&'static str> {
    let key = squash(name);
    if key.is_empty() {
        return None;
    }
    BOOKS
        .iter()
        .find(|(id, full, abbrevs)| {
            id.to_lowercase() == key || squash(full) == key || abbrevs.contains(&key.as_str())
        })
        .map(|(id, _, _)| *id)
}

/// Display name for a USFM id, e.g. `1CO` -> `1 Corinthians`.
pub fn book_name(id: &str) -> Option<&'static str> {
    BOOKS
        .iter()
        .find(|(usfm, _, _)| usfm.eq_ignore_ascii_case(id))
        .map(|(_, name, _)| *name)
}
