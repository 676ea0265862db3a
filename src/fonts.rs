//! CJK font setup
//!
//! egui's bundled fonts have no Chinese glyphs, so column names and the
//! Traditional Chinese locale would render as boxes. A system font with CJK
//! coverage is appended as a fallback to both font families.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use egui::{FontData, FontDefinitions, FontFamily};

const CJK_FONT_NAME: &str = "cjk-fallback";

/// Well-known locations of fonts with Traditional Chinese coverage
const CANDIDATE_FONTS: &[&str] = &[
    // Windows
    "C:\\Windows\\Fonts\\msjh.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\mingliu.ttc",
    // macOS
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
    // Linux
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc",
];

/// First font that exists: the configured path, then the well-known ones
pub fn find_cjk_font(configured: Option<&Path>) -> Option<PathBuf> {
    configured
        .into_iter()
        .map(Path::to_path_buf)
        .chain(CANDIDATE_FONTS.iter().map(PathBuf::from))
        .find(|p| p.is_file())
}

/// Font definitions with `bytes` appended as the last fallback
pub fn with_fallback_font(bytes: Vec<u8>) -> FontDefinitions {
    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(CJK_FONT_NAME.to_string(), Arc::new(FontData::from_owned(bytes)));

    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        let list = fonts.families.entry(family).or_default();
        if !list.iter().any(|name| name == CJK_FONT_NAME) {
            list.push(CJK_FONT_NAME.to_string());
        }
    }
    fonts
}

/// Install the default fonts plus a CJK fallback when one can be found
pub fn install_fonts(ctx: &egui::Context, configured: Option<&Path>) {
    let Some(path) = find_cjk_font(configured) else {
        tracing::warn!("No CJK font found, Chinese text will not render");
        ctx.set_fonts(FontDefinitions::default());
        return;
    };

    match std::fs::read(&path) {
        Ok(bytes) => {
            tracing::info!("Using {:?} for CJK glyphs", path);
            ctx.set_fonts(with_fallback_font(bytes));
        }
        Err(e) => {
            tracing::warn!("Failed to read font {:?}: {}", path, e);
            ctx.set_fonts(FontDefinitions::default());
        }
    }
}
