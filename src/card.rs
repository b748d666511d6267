//! Static shareable card rendered as SVG.
//!
//! Two layouts are available: `linear`, a tall single column, and `bento`, a
//! grid of tiles. Both come in six color themes.

use crate::models::StatsRecord;
use std::str::FromStr;

const MARGIN: i32 = 50;
const MAX_REPO_NAME_CHARS: usize = 20;
const TRUNCATED_REPO_NAME_CHARS: usize = 17;
const FOOTER_TEXT: &str = "github-summary.vercel.app";

const SERIF: &str = "Georgia, 'Times New Roman', serif";
const SANS: &str = "-apple-system, BlinkMacSystemFont, sans-serif";
const MONO: &str = "'SF Mono', Monaco, 'Cascadia Code', monospace";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Midnight,
    Forest,
    Sunset,
    Ocean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub bg: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub accent: &'static str,
    pub subtle: &'static str,
    pub card: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Dark,
        Theme::Light,
        Theme::Midnight,
        Theme::Forest,
        Theme::Sunset,
        Theme::Ocean,
    ];

    pub fn colors(self) -> ThemeColors {
        match self {
            Theme::Dark => ThemeColors {
                bg: "#000000",
                text: "#ffffff",
                muted: "#888888",
                accent: "#ffffff",
                subtle: "#333333",
                card: "#111111",
            },
            Theme::Light => ThemeColors {
                bg: "#fafafa",
                text: "#0a0a0a",
                muted: "#666666",
                accent: "#0a0a0a",
                subtle: "#e5e5e5",
                card: "#ffffff",
            },
            Theme::Midnight => ThemeColors {
                bg: "#0f172a",
                text: "#e2e8f0",
                muted: "#64748b",
                accent: "#38bdf8",
                subtle: "#1e293b",
                card: "#111111",
            },
            Theme::Forest => ThemeColors {
                bg: "#052e16",
                text: "#dcfce7",
                muted: "#86efac",
                accent: "#4ade80",
                subtle: "#14532d",
                card: "#111111",
            },
            Theme::Sunset => ThemeColors {
                bg: "#1c1917",
                text: "#fef3c7",
                muted: "#fcd34d",
                accent: "#f59e0b",
                subtle: "#292524",
                card: "#111111",
            },
            Theme::Ocean => ThemeColors {
                bg: "#0c4a6e",
                text: "#e0f2fe",
                muted: "#7dd3fc",
                accent: "#0ea5e9",
                subtle: "#075985",
                card: "#111111",
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Midnight => "midnight",
            Theme::Forest => "forest",
            Theme::Sunset => "sunset",
            Theme::Ocean => "ocean",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown theme '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Linear,
    Bento,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Layout::Linear),
            "bento" => Ok(Layout::Bento),
            _ => Err(format!("unknown layout '{}'", s)),
        }
    }
}

pub fn render_card(record: &StatsRecord, theme: Theme, layout: Layout, year: i32) -> String {
    match layout {
        Layout::Linear => render_linear(record, theme.colors(), year),
        Layout::Bento => render_bento(record, theme.colors(), year),
    }
}

// Utilities for building SVG content

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Groups digits in thousands: `12345` becomes `12,345`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn truncate_repo_name(name: &str) -> String {
    if name.chars().count() > MAX_REPO_NAME_CHARS {
        let head: String = name.chars().take(TRUNCATED_REPO_NAME_CHARS).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

struct Canvas {
    width: i32,
    height: i32,
    body: String,
}

#[derive(Clone, Copy)]
enum Anchor {
    Start,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::End => "end",
        }
    }
}

struct TextStyle<'a> {
    size: i32,
    weight: u16,
    family: &'a str,
    fill: &'a str,
    italic: bool,
    anchor: Anchor,
}

impl<'a> TextStyle<'a> {
    fn new(size: i32, family: &'a str, fill: &'a str) -> Self {
        Self {
            size,
            weight: 400,
            family,
            fill,
            italic: false,
            anchor: Anchor::Start,
        }
    }

    fn weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn end(mut self) -> Self {
        self.anchor = Anchor::End;
        self
    }
}

impl Canvas {
    fn new(width: i32, height: i32, bg: &str) -> Self {
        let mut canvas = Self {
            width,
            height,
            body: String::new(),
        };
        canvas.rect(0, 0, width, height, bg, None);
        canvas
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, fill: &str, stroke: Option<&str>) {
        let stroke = stroke
            .map(|color| format!(" stroke=\"{color}\" stroke-width=\"1\""))
            .unwrap_or_default();
        self.body.push_str(&format!(
            "<rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" fill=\"{fill}\"{stroke}/>\n"
        ));
    }

    fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, stroke: &str, width: i32) {
        self.body.push_str(&format!(
            "<line x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"{stroke}\" stroke-width=\"{width}\"/>\n"
        ));
    }

    fn rule(&mut self, y: i32, stroke: &str) {
        self.line(MARGIN, y, self.width - MARGIN, y, stroke, 1);
    }

    fn text(&mut self, x: i32, y: i32, content: &str, style: &TextStyle<'_>) {
        let font_style = if style.italic { " font-style=\"italic\"" } else { "" };
        self.body.push_str(&format!(
            "<text x=\"{x}\" y=\"{y}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{}\"{font_style} fill=\"{}\" text-anchor=\"{}\">{}</text>\n",
            style.family,
            style.size,
            style.weight,
            style.fill,
            style.anchor.as_str(),
            escape_xml(content)
        ));
    }

    /// Section header with an accent underline sized to the label.
    fn header(&mut self, y: i32, label: &str, colors: &ThemeColors) {
        self.text(MARGIN, y, label, &TextStyle::new(16, MONO, colors.text));
        let underline = (label.chars().count() as f32 * 9.6).round() as i32;
        self.line(MARGIN, y + 6, MARGIN + underline, y + 6, colors.accent, 2);
    }

    fn avatar(&mut self, href: &str, cx: i32, cy: i32, r: i32, ring: &str) {
        let id = format!("avatar-{cx}-{cy}");
        let href = escape_xml(href);
        self.body.push_str(&format!(
            "<clipPath id=\"{id}\"><circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\"/></clipPath>\n\
             <image href=\"{href}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" clip-path=\"url(#{id})\"/>\n\
             <circle cx=\"{cx}\" cy=\"{cy}\" r=\"{}\" fill=\"none\" stroke=\"{ring}\" stroke-width=\"3\"/>\n",
            cx - r,
            cy - r,
            r * 2,
            r * 2,
            r + 2
        ));
    }

    fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{}</svg>\n",
            self.body,
            w = self.width,
            h = self.height
        )
    }
}

fn render_linear(record: &StatsRecord, colors: ThemeColors, year: i32) -> String {
    let mut canvas = Canvas::new(600, 1500, colors.bg);
    let right = canvas.width - MARGIN;

    let mut y = 60;
    if record.avatar.is_empty() {
        canvas.text(MARGIN, y, &record.username, &TextStyle::new(40, SERIF, colors.text).weight(300).italic());
        y += 20;
    } else {
        let size = 70;
        let top = y - 10;
        canvas.avatar(&record.avatar, MARGIN + size / 2, top + size / 2, size / 2, colors.accent);
        canvas.text(
            MARGIN + size + 20,
            top + size / 2 + 12,
            &record.username,
            &TextStyle::new(36, SERIF, colors.text).weight(300).italic(),
        );
        y = top + size + 40;
    }
    canvas.text(right, 60, &year.to_string(), &TextStyle::new(22, SANS, colors.muted).end());

    y += 20;
    canvas.rule(y, colors.subtle);
    y += 40;
    canvas.text(MARGIN, y, "your year in code", &TextStyle::new(14, MONO, colors.muted));

    y += 60;
    canvas.header(y, "stats", &colors);
    y += 50;

    let stats = [
        (record.total_repos, "repositories"),
        (record.total_stars, "stars"),
        (record.total_commits, "commits"),
        (record.total_prs, "pull requests"),
    ];
    for (value, label) in stats {
        canvas.text(MARGIN, y, &format_count(value), &TextStyle::new(54, SANS, colors.text).weight(700));
        canvas.text(MARGIN, y + 24, label, &TextStyle::new(16, SANS, colors.muted).weight(300));
        y += 100;
    }

    y += 10;
    canvas.rule(y, colors.subtle);
    y += 40;
    canvas.header(y, "languages", &colors);
    y += 40;

    for lang in &record.top_languages {
        canvas.text(MARGIN, y, &lang.name, &TextStyle::new(16, SANS, colors.text));
        canvas.text(
            right,
            y,
            &format!("{}%", lang.percentage.round()),
            &TextStyle::new(16, SANS, colors.muted).end(),
        );
        y += 32;
    }

    y += 20;
    canvas.rule(y, colors.subtle);
    y += 40;
    canvas.header(y, "top repositories", &colors);
    y += 40;

    for (i, repo) in record.top_repos.iter().enumerate() {
        canvas.text(
            MARGIN,
            y,
            &format!("{}. {}", i + 1, truncate_repo_name(&repo.name)),
            &TextStyle::new(16, SANS, colors.text),
        );
        canvas.text(right, y, &format!("★ {}", repo.stars), &TextStyle::new(14, SANS, colors.muted).end());
        y += 28;

        if !repo.language.is_empty() {
            canvas.text(MARGIN, y, &repo.language, &TextStyle::new(12, MONO, colors.muted));
            y += 24;
        }
        y += 16;
    }

    let height = canvas.height;
    canvas.rule(height - 70, colors.subtle);
    canvas.text(MARGIN, height - 40, FOOTER_TEXT, &TextStyle::new(12, MONO, colors.muted));

    canvas.finish()
}

fn render_bento(record: &StatsRecord, colors: ThemeColors, year: i32) -> String {
    let mut canvas = Canvas::new(800, 1300, colors.bg);
    let right = canvas.width - MARGIN;

    if !record.avatar.is_empty() {
        canvas.avatar(&record.avatar, 90, 90, 40, colors.accent);
    }
    canvas.text(160, 85, &record.username, &TextStyle::new(36, SERIF, colors.text).weight(300).italic());
    canvas.text(160, 110, "your year in code", &TextStyle::new(14, MONO, colors.muted));
    canvas.text(right, 85, &year.to_string(), &TextStyle::new(22, MONO, colors.muted).end());

    let mut y = 180;
    tile(&mut canvas, &colors, (MARGIN, y, 380, 280), "commits", &format_count(record.total_commits), Some("you shipped code consistently"));
    tile(&mut canvas, &colors, (450, y, 300, 130), "repositories", &record.total_repos.to_string(), None);
    tile(&mut canvas, &colors, (450, y + 150, 145, 130), "stars", &record.total_stars.to_string(), None);
    tile(&mut canvas, &colors, (605, y + 150, 145, 130), "PRs", &record.total_prs.to_string(), None);

    y += 310;
    canvas.text(MARGIN, y, "TOP LANGUAGES", &TextStyle::new(14, MONO, colors.muted));
    y += 30;
    for (i, lang) in record.top_languages.iter().take(4).enumerate() {
        let (x, card_y) = grid_slot(i, y);
        canvas.rect(x, card_y, 340, 110, colors.card, Some(colors.subtle));
        canvas.text(x + 20, card_y + 35, &lang.name, &TextStyle::new(16, MONO, colors.text));
        canvas.text(x + 320, card_y + 35, &format!("#{}", i + 1), &TextStyle::new(14, MONO, colors.muted).end());
        canvas.text(
            x + 20,
            card_y + 75,
            &format!("{}%", lang.percentage.round()),
            &TextStyle::new(32, SANS, colors.text).weight(700),
        );
    }

    y += 290;
    canvas.text(MARGIN, y, "TOP REPOSITORIES", &TextStyle::new(14, MONO, colors.muted));
    y += 30;
    for (i, repo) in record.top_repos.iter().enumerate() {
        let (x, card_y) = grid_slot(i, y);
        canvas.rect(x, card_y, 340, 110, colors.card, Some(colors.subtle));
        canvas.text(
            x + 20,
            card_y + 35,
            &format!("{}. {}", i + 1, truncate_repo_name(&repo.name)),
            &TextStyle::new(16, MONO, colors.text),
        );
        canvas.text(x + 320, card_y + 35, &format!("★ {}", repo.stars), &TextStyle::new(14, MONO, colors.muted).end());
        if !repo.language.is_empty() {
            canvas.text(x + 20, card_y + 75, &repo.language, &TextStyle::new(12, MONO, colors.muted));
        }
    }

    let height = canvas.height;
    canvas.text(MARGIN, height - 40, FOOTER_TEXT, &TextStyle::new(12, MONO, colors.muted));

    canvas.finish()
}

fn grid_slot(i: usize, top: i32) -> (i32, i32) {
    let column = (i % 2) as i32;
    let row = (i / 2) as i32;
    (MARGIN + column * 360, top + row * 130)
}

fn tile(
    canvas: &mut Canvas,
    colors: &ThemeColors,
    (x, y, w, h): (i32, i32, i32, i32),
    label: &str,
    value: &str,
    subtitle: Option<&str>,
) {
    canvas.rect(x, y, w, h, colors.card, Some(colors.subtle));
    canvas.text(x + 20, y + 35, label, &TextStyle::new(14, MONO, colors.muted));

    let (size, baseline) = if w > 350 { (72, 120) } else { (42, 85) };
    canvas.text(x + 20, y + baseline, value, &TextStyle::new(size, SANS, colors.text).weight(700));

    if let Some(subtitle) = subtitle {
        canvas.text(x + 20, y + h - 25, subtitle, &TextStyle::new(13, MONO, colors.muted));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LanguageShare, TopRepo};

    fn record() -> StatsRecord {
        StatsRecord {
            username: "octo<cat>".to_string(),
            avatar: "https://avatars.example/u?a=1&b=2".to_string(),
            bio: String::new(),
            total_repos: 12,
            total_stars: 3400,
            total_forks: 2,
            followers: 8,
            following: 1,
            contributed_to: 4,
            total_commits: 1234567,
            total_prs: 17,
            total_issues: 3,
            account_age: 6,
            coding_velocity: 9,
            lines_of_code: 61_728_350,
            most_active_day: "Mar 5".to_string(),
            most_used_language: "Rust".to_string(),
            top_languages: vec![
                LanguageShare { name: "Rust".to_string(), percentage: 66.666 },
                LanguageShare { name: "Go".to_string(), percentage: 33.333 },
            ],
            top_repos: vec![TopRepo {
                name: "an-extremely-long-repository-name".to_string(),
                stars: 3000,
                description: String::new(),
                language: "Rust".to_string(),
            }],
        }
    }

    #[test]
    fn counts_are_grouped_in_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn long_repo_names_are_truncated() {
        assert_eq!(truncate_repo_name("short"), "short");
        assert_eq!(truncate_repo_name("exactly-twenty-chars"), "exactly-twenty-chars");
        assert_eq!(truncate_repo_name("an-extremely-long-repository-name"), "an-extremely-long...");
    }

    #[test]
    fn theme_and_layout_parse_case_insensitively() {
        assert_eq!("Midnight".parse::<Theme>(), Ok(Theme::Midnight));
        assert_eq!("BENTO".parse::<Layout>(), Ok(Layout::Bento));
        assert!("neon".parse::<Theme>().is_err());
        assert!("grid".parse::<Layout>().is_err());
    }

    #[test]
    fn linear_card_contains_escaped_user_text_and_stats() {
        let svg = render_card(&record(), Theme::Ocean, Layout::Linear, 2025);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("octo&lt;cat&gt;"));
        assert!(!svg.contains("octo<cat>"));
        assert!(svg.contains("a=1&amp;b=2"));
        assert!(svg.contains("1,234,567"));
        assert!(svg.contains(">67%<"));
        assert!(svg.contains("an-extremely-long..."));
        assert!(svg.contains(Theme::Ocean.colors().bg));
        assert!(svg.contains(">2025<"));
    }

    #[test]
    fn bento_card_uses_tiles() {
        let svg = render_card(&record(), Theme::Light, Layout::Bento, 2025);

        assert!(svg.contains("TOP LANGUAGES"));
        assert!(svg.contains("TOP REPOSITORIES"));
        assert!(svg.contains("you shipped code consistently"));
        assert!(svg.contains(">#2<"));
        assert!(svg.contains(Theme::Light.colors().card));
    }

    #[test]
    fn card_without_avatar_omits_image() {
        let mut record = record();
        record.avatar.clear();

        for layout in [Layout::Linear, Layout::Bento] {
            let svg = render_card(&record, Theme::Dark, layout, 2025);
            assert!(!svg.contains("<image"));
        }
    }
}
