//! Static data bundled with the backend.

mod books;
mod languages;
mod verses;

pub use books::*;
pub use languages::*;
pub use verses::*;

/// Bundled background images served by the extension itself.
pub const FALLBACK_IMAGES: [&str; 6] = [
    "/images/1.jpg",
    "/images/2.jpg",
    "/images/3.jpg",
    "/images/4.jpg",
    "/images/5.jpg",
    "/images/6.jpg",
];

/// Backgrounds offered in the settings panel: `(type, value)`.
pub const BUILTIN_BACKGROUNDS: [(&str, &str); 8] = [
    ("color", "#1a1a1a"),
    ("color", "#f8fafc"),
    ("color", "#38bdf8"),
    ("gradient", "linear-gradient(135deg, #38bdf8 0%, #818cf8 100%)"),
    ("gradient", "linear-gradient(135deg, #fbbf24 0%, #f472b6 100%)"),
    ("image", "/images/1.jpg"),
    ("image", "/images/2.jpg"),
    ("image", "/images/3.jpg"),
];
