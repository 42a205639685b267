//! SVG markup for the locally rendered placeholder and the preview overlay.

use std::fmt::Write as _;

pub const BORDER_OPACITY: f32 = 0.3;
pub const CORNER_DOT_OPACITY: f32 = 0.4;
pub const GUIDE_LINE_OPACITY: f32 = 0.5;
pub const CAPTION_OPACITY: f32 = 0.15;
pub const PLACEHOLDER_CAPTIONS: [&str; 3] = ["[Event Title]", "[Date & Time]", "[Location]"];

/// Vertical text anchors as fractions of the canvas height.
const TITLE_OFFSET: f32 = 0.42;
const SUBTITLE_OFFSET: f32 = 0.50;
const DATE_OFFSET: f32 = 0.57;
const LOCATION_OFFSET: f32 = 0.63;

/// Escapes the characters that would break SVG text content or attributes.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn placeholder_svg(colors: &[String; 3], width: u32, height: u32) -> String {
    let [primary, secondary, accent] = colors.each_ref().map(|c| escape_markup(c));
    let (w, h) = (width as f32, height as f32);
    let short = w.min(h);
    let inset = short * 0.05;
    let dot = short * 0.012;
    let stroke = (short * 0.003).max(1.0);
    let caption_size = short * 0.045;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = write!(
        svg,
        r#"<defs><radialGradient id="bg" cx="50%" cy="50%" r="75%"><stop offset="0%" stop-color="{primary}"/><stop offset="100%" stop-color="{secondary}"/></radialGradient></defs>"#
    );
    let _ = write!(svg, r#"<rect width="{w}" height="{h}" fill="url(#bg)"/>"#);

    let _ = write!(
        svg,
        r#"<rect x="{inset}" y="{inset}" width="{}" height="{}" fill="none" stroke="{accent}" stroke-width="{stroke}" opacity="{BORDER_OPACITY}"/>"#,
        w - 2.0 * inset,
        h - 2.0 * inset,
    );

    for (cx, cy) in [
        (inset, inset),
        (w - inset, inset),
        (inset, h - inset),
        (w - inset, h - inset),
    ] {
        let _ = write!(
            svg,
            r#"<circle cx="{cx}" cy="{cy}" r="{dot}" fill="{accent}" opacity="{CORNER_DOT_OPACITY}"/>"#
        );
    }

    for y in [h * 0.35, h * 0.65] {
        let _ = write!(
            svg,
            r#"<line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{accent}" stroke-width="{stroke}" opacity="{GUIDE_LINE_OPACITY}"/>"#,
            w * 0.3,
            w * 0.7,
        );
    }

    for (caption, offset) in PLACEHOLDER_CAPTIONS
        .iter()
        .zip([TITLE_OFFSET, SUBTITLE_OFFSET + 0.03, LOCATION_OFFSET - 0.02])
    {
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" font-family="serif" font-size="{caption_size}" text-anchor="middle" fill="{accent}" opacity="{CAPTION_OPACITY}">{}</text>"#,
            w / 2.0,
            (h * offset).round(),
            escape_markup(caption),
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Text drawn on a preview.
#[derive(Debug, Clone, Default)]
pub struct OverlayText {
    pub title: String,
    pub subtitle: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
}

impl OverlayText {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverlayStyle {
    pub heading_font: String,
    pub body_font: String,
    pub text_color: String,
    pub accent_color: String,
    pub panel_opacity: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            heading_font: "Playfair Display".to_string(),
            body_font: "Lato".to_string(),
            text_color: "#1C1917".to_string(),
            accent_color: "#57534E".to_string(),
            panel_opacity: 0.85,
        }
    }
}

pub(crate) fn overlay_svg(
    text: &OverlayText,
    style: &OverlayStyle,
    width: u32,
    height: u32,
) -> String {
    let (w, h) = (width as f32, height as f32);
    let short = w.min(h);
    let panel_x = w * 0.1;
    let panel_y = h / 3.0;
    let radius = short * 0.03;
    let opacity = style.panel_opacity.clamp(0.0, 1.0);
    let heading = escape_markup(&style.heading_font);
    let body = escape_markup(&style.body_font);
    let text_color = escape_markup(&style.text_color);
    let accent = escape_markup(&style.accent_color);

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = write!(
        svg,
        r##"<rect x="{panel_x}" y="{panel_y}" width="{}" height="{}" rx="{radius}" ry="{radius}" fill="#FFFFFF" opacity="{opacity}"/>"##,
        w - 2.0 * panel_x,
        h / 3.0,
    );

    let mut line = |content: &str, offset: f32, font: &str, size: f32, color: &str| {
        let _ = write!(
            svg,
            r#"<text x="{}" y="{}" font-family="{font}" font-size="{size}" text-anchor="middle" fill="{color}">{}</text>"#,
            w / 2.0,
            (h * offset).round(),
            escape_markup(content),
        );
    };

    line(text.title.trim(), TITLE_OFFSET, &heading, short * 0.06, &text_color);
    if let Some(subtitle) = text.subtitle.as_deref().filter(|s| !s.trim().is_empty()) {
        line(subtitle, SUBTITLE_OFFSET, &body, short * 0.035, &accent);
    }
    if let Some(date) = text.date.as_deref().filter(|s| !s.trim().is_empty()) {
        line(date, DATE_OFFSET, &body, short * 0.03, &text_color);
    }
    if let Some(location) = text.location.as_deref().filter(|s| !s.trim().is_empty()) {
        line(location, LOCATION_OFFSET, &body, short * 0.028, &accent);
    }

    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb() -> [String; 3] {
        ["#FF0000".into(), "#00FF00".into(), "#0000FF".into()]
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(
            escape_markup(r#"Tom & Jerry's <"party">"#),
            "Tom &amp; Jerry&apos;s &lt;&quot;party&quot;&gt;"
        );
        assert_eq!(escape_markup("plain"), "plain");
    }

    #[test]
    fn test_placeholder_structure() {
        let svg = placeholder_svg(&rgb(), 1748, 1748);
        assert!(svg.contains("radialGradient"));
        assert!(svg.contains(r##"stop-color="#FF0000""##));
        assert!(svg.contains(r##"stop-color="#00FF00""##));
        assert_eq!(svg.matches("<circle").count(), 4);
        assert_eq!(svg.matches("<line").count(), 2);
        assert!(svg.contains(r#"opacity="0.3""#));
        assert!(svg.contains(r#"opacity="0.4""#));
        assert!(svg.contains(r#"opacity="0.5""#));
        assert_eq!(svg.matches(r#"opacity="0.15""#).count(), 3);
        assert!(svg.contains("[Date &amp; Time]"));
        assert!(svg.contains(r##"stroke="#0000FF""##));
    }

    #[test]
    fn test_overlay_escapes_and_skips_empty_lines() {
        let mut text = OverlayText::new("Ana & <Ben>");
        text.date = Some("  ".into());
        text.location = Some("The \"Barn\"".into());
        let svg = overlay_svg(&text, &OverlayStyle::default(), 1000, 1000);
        assert!(svg.contains("Ana &amp; &lt;Ben&gt;"));
        assert!(svg.contains("The &quot;Barn&quot;"));
        assert_eq!(svg.matches("<text").count(), 2);
        assert!(svg.contains(r#"y="420""#));
        assert!(svg.contains(r#"y="630""#));
        assert!(svg.contains(r#"opacity="0.85""#));
    }
}
