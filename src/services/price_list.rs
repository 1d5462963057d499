//! Price-list PDF export.
//!
//! Layout is computed first as plain positioned text lines so it can be
//! inspected without rendering; [`render_pdf`] then draws those lines with
//! `printpdf`. The text is Russian, so a Unicode TrueType font is embedded:
//! `PRICE_LIST_FONT` when configured, otherwise DejaVu Sans found in
//! `fonts/` or the usual system font directories.

use anyhow::{anyhow, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::database::models::{setting, Service, Setting};

/// A4 width
pub const PAGE_WIDTH_MM: f32 = 210.0;
/// A4 height
pub const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 18.0;
const INDENT_MM: f32 = 7.0;
const TITLE_STEP_MM: f32 = 12.0;
const HEADING_STEP_MM: f32 = 9.0;
const LINE_STEP_MM: f32 = 7.0;
const CATEGORY_GAP_MM: f32 = 4.0;

/// Directories searched for DejaVu Sans when no font is configured.
const FONT_DIRS: [&str; 4] = [
    "fonts",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/dejavu",
];
const REGULAR_FONT_FILE: &str = "DejaVuSans.ttf";
const BOLD_FONT_FILE: &str = "DejaVuSans-Bold.ttf";

/// Heading of the first page
pub const PRICE_LIST_TITLE: &str = "Прайс-лист студии маникюра";
/// Heading of the contacts block
pub const CONTACTS_TITLE: &str = "Контактная информация";
/// File name of the uploaded document
pub const PRICE_LIST_FILE_NAME: &str = "price_list.pdf";

/// Face used for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    /// Body text
    Regular,
    /// Titles and category headings
    Bold,
}

/// A single line of text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Line content
    pub text: String,
    /// Face
    pub weight: FontWeight,
    /// Font size in points
    pub size: f32,
    /// Millimetres from the left edge
    pub x: f32,
    /// Millimetres from the bottom edge
    pub y: f32,
}

/// Lines of one A4 page.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    /// Lines in drawing order
    pub lines: Vec<TextLine>,
}

impl PageLayout {
    fn push(&mut self, text: impl Into<String>, weight: FontWeight, size: f32, x: f32, y: f32) {
        self.lines.push(TextLine {
            text: text.into(),
            weight,
            size,
            x,
            y,
        });
    }
}

/// Contact block printed after the catalogue.
#[derive(Debug, Clone)]
pub struct Contacts {
    /// Studio phone
    pub phone: String,
    /// Website link
    pub website: String,
    /// Telegram channel link
    pub channel: String,
}

/// TrueType faces embedded into the document. `bold` may equal `regular`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSet {
    /// Body face
    pub regular: PathBuf,
    /// Heading face
    pub bold: PathBuf,
}

/// `Name.ttf` -> `Name-Bold.ttf` next to it.
fn bold_sibling(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?.to_str()?;
    let file_name = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{stem}-Bold.{ext}"),
        None => format!("{stem}-Bold"),
    };
    Some(path.with_file_name(file_name))
}

/// Picks the fonts for the price list: the configured file (with its `-Bold`
/// sibling when present), else the first directory holding DejaVu Sans.
pub fn resolve_fonts(configured: Option<&Path>) -> Option<FontSet> {
    if let Some(regular) = configured {
        let bold = bold_sibling(regular)
            .filter(|bold| bold.is_file())
            .unwrap_or_else(|| regular.to_path_buf());
        return Some(FontSet {
            regular: regular.to_path_buf(),
            bold,
        });
    }

    FONT_DIRS.iter().map(Path::new).find_map(|dir| {
        let regular = dir.join(REGULAR_FONT_FILE);
        if !regular.is_file() {
            return None;
        }
        let bold = dir.join(BOLD_FONT_FILE);
        let bold = if bold.is_file() { bold } else { regular.clone() };
        Some(FontSet { regular, bold })
    })
}

/// Built-in PDF fonts use WinAnsiEncoding, which covers Latin-1 only.
fn builtin_font_can_render(pages: &[PageLayout]) -> bool {
    pages
        .iter()
        .flat_map(|page| page.lines.iter())
        .all(|line| line.text.chars().all(|c| (c as u32) < 0x100))
}

fn load_font(doc: &PdfDocumentReference, path: &Path) -> Result<IndirectFontRef> {
    let file = File::open(path)
        .map_err(|e| anyhow!("Failed to open font {}: {}", path.display(), e))?;
    doc.add_external_font(BufReader::new(file))
        .map_err(|e| anyhow!("Failed to load font {}: {:?}", path.display(), e))
}

/// `name - price руб. (duration мин.)`
pub fn service_line(service: &Service) -> String {
    format!("{} - {} руб. ({} мин.)", service.name, service.price, service.duration)
}

/// Groups services by category, keeping categories in order of first appearance.
fn group_by_category(services: &[Service]) -> Vec<(&str, Vec<&Service>)> {
    let mut groups: Vec<(&str, Vec<&Service>)> = Vec::new();
    for service in services {
        match groups.iter_mut().find(|(category, _)| *category == service.category) {
            Some((_, group)) => group.push(service),
            None => groups.push((service.category.as_str(), vec![service])),
        }
    }
    groups
}

/// Lays out the price list on A4 pages, followed by a contacts page.
pub fn layout(services: &[Service], contacts: &Contacts) -> Vec<PageLayout> {
    let top = PAGE_HEIGHT_MM - MARGIN_MM;
    let mut pages = Vec::new();
    let mut page = PageLayout::default();
    let mut y = top;

    page.push(PRICE_LIST_TITLE, FontWeight::Bold, 16.0, MARGIN_MM, y);
    y -= TITLE_STEP_MM;

    for (category, group) in group_by_category(services) {
        // Keep a heading together with at least its first line
        if y - HEADING_STEP_MM < MARGIN_MM {
            pages.push(std::mem::take(&mut page));
            y = top;
        }
        page.push(category, FontWeight::Bold, 14.0, MARGIN_MM, y);
        y -= HEADING_STEP_MM;

        for service in group {
            if y < MARGIN_MM {
                pages.push(std::mem::take(&mut page));
                y = top;
            }
            page.push(service_line(service), FontWeight::Regular, 12.0, MARGIN_MM + INDENT_MM, y);
            y -= LINE_STEP_MM;
        }

        y -= CATEGORY_GAP_MM;
    }
    pages.push(page);

    let mut contacts_page = PageLayout::default();
    let mut y = top;
    contacts_page.push(CONTACTS_TITLE, FontWeight::Bold, 16.0, MARGIN_MM, y);
    y -= TITLE_STEP_MM;
    for line in [
        format!("Телефон: {}", contacts.phone),
        format!("Сайт: {}", contacts.website),
        format!("Telegram канал: {}", contacts.channel),
    ] {
        contacts_page.push(line, FontWeight::Regular, 12.0, MARGIN_MM, y);
        y -= LINE_STEP_MM;
    }
    pages.push(contacts_page);

    pages
}

/// Renders laid-out pages to PDF bytes. Without fonts the built-in Helvetica
/// faces are used, which only works for Latin-1 text: anything else is
/// refused rather than rendered as unreadable glyphs.
pub fn render_pdf(pages: &[PageLayout], fonts: Option<&FontSet>) -> Result<Vec<u8>> {
    if fonts.is_none() && !builtin_font_can_render(pages) {
        return Err(anyhow!(
            "Price list needs a Unicode TrueType font: set PRICE_LIST_FONT or install DejaVu Sans"
        ));
    }

    let (doc, first_page, first_layer) = PdfDocument::new(
        PRICE_LIST_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );

    let (regular, bold): (IndirectFontRef, IndirectFontRef) = match fonts {
        Some(fonts) => {
            let regular = load_font(&doc, &fonts.regular)?;
            let bold = if fonts.bold == fonts.regular {
                regular.clone()
            } else {
                load_font(&doc, &fonts.bold)?
            };
            (regular, bold)
        }
        None => (
            doc.add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| anyhow!("Failed to load built-in font: {:?}", e))?,
            doc.add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| anyhow!("Failed to load built-in font: {:?}", e))?,
        ),
    };

    let mut first = Some((first_page, first_layer));
    for page in pages {
        let (page_index, layer_index) = match first.take() {
            Some(indices) => indices,
            None => doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1"),
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);

        for line in &page.lines {
            let font = match line.weight {
                FontWeight::Regular => &regular,
                FontWeight::Bold => &bold,
            };
            layer.use_text(line.text.clone(), line.size, Mm(line.x), Mm(line.y), font);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow!("Failed to write PDF: {:?}", e))
}

/// Builds the price list for the current catalogue, or `None` when there are
/// no services to list.
pub async fn generate(db: &DatabaseManager, config: &Config) -> Result<Option<Vec<u8>>> {
    let services = Service::list_all(&db.pool).await?;
    if services.is_empty() {
        return Ok(None);
    }

    let contacts = Contacts {
        phone: config.studio_phone.clone(),
        website: Setting::get_or(&db.pool, setting::WEBSITE_URL, &config.website_url).await?,
        channel: Setting::get_or(&db.pool, setting::TELEGRAM_CHANNEL, &config.telegram_channel)
            .await?,
    };

    let fonts = resolve_fonts(config.price_list_font.as_deref());
    if fonts.is_none() {
        tracing::warn!("No price list font found in PRICE_LIST_FONT or {:?}", FONT_DIRS);
    }

    let pages = layout(&services, &contacts);
    let bytes = render_pdf(&pages, fonts.as_ref())?;
    tracing::debug!("Generated price list: {} services, {} pages, {} bytes",
        services.len(), pages.len(), bytes.len());

    Ok(Some(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: i64, category: &str, name: &str) -> Service {
        Service {
            id,
            category: category.to_string(),
            name: name.to_string(),
            price: 1000 + id,
            duration: 60,
            master_id: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn contacts() -> Contacts {
        Contacts {
            phone: "+70000000000".to_string(),
            website: "https://example.com".to_string(),
            channel: "https://t.me/example".to_string(),
        }
    }

    #[test]
    fn test_layout_groups_by_category() {
        let services = vec![
            service(1, "Маникюр", "Гель-лак"),
            service(2, "Педикюр", "Классический педикюр"),
            service(3, "Маникюр", "Классический маникюр"),
        ];
        let pages = layout(&services, &contacts());

        assert_eq!(pages.len(), 2);
        let texts: Vec<&str> = pages[0].lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                PRICE_LIST_TITLE,
                "Маникюр",
                "Гель-лак - 1001 руб. (60 мин.)",
                "Классический маникюр - 1003 руб. (60 мин.)",
                "Педикюр",
                "Классический педикюр - 1002 руб. (60 мин.)",
            ]
        );
    }

    #[test]
    fn test_layout_breaks_pages_within_margins() {
        let services: Vec<Service> = (1..=80).map(|i| service(i, "Маникюр", "Услуга")).collect();
        let pages = layout(&services, &contacts());

        assert!(pages.len() > 2);
        for page in &pages {
            for line in &page.lines {
                assert!(line.y >= MARGIN_MM, "line below bottom margin: {:?}", line);
                assert!(line.y <= PAGE_HEIGHT_MM - MARGIN_MM);
            }
        }
        let service_lines: usize = pages
            .iter()
            .flat_map(|p| p.lines.iter())
            .filter(|l| l.weight == FontWeight::Regular && l.text.starts_with("Услуга"))
            .count();
        assert_eq!(service_lines, 80);
    }

    #[test]
    fn test_contacts_page_is_last() {
        let pages = layout(&[service(1, "Маникюр", "Гель-лак")], &contacts());
        let last = pages.last().unwrap();
        assert_eq!(last.lines[0].text, CONTACTS_TITLE);
        assert!(last.lines.iter().any(|l| l.text == "Телефон: +70000000000"));
    }

    #[test]
    fn test_render_pdf_with_builtin_font() {
        let mut page = PageLayout::default();
        page.push("Price list", FontWeight::Bold, 16.0, MARGIN_MM, 270.0);
        page.push("Manicure - 1500 (60 min)", FontWeight::Regular, 12.0, MARGIN_MM, 260.0);
        let second = page.clone();

        let bytes = render_pdf(&[page, second], None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_builtin_font_refuses_cyrillic_layout() {
        let pages = layout(&[service(1, "Маникюр", "Гель-лак")], &contacts());

        let result = render_pdf(&pages, None);

        let error = result.unwrap_err().to_string();
        assert!(error.contains("PRICE_LIST_FONT"), "unexpected error: {error}");
    }

    #[test]
    fn test_render_layout_with_dejavu_font() {
        let Some(fonts) = resolve_fonts(None) else {
            eprintln!("DejaVu Sans not installed, skipping");
            return;
        };
        let services = vec![
            service(1, "Маникюр", "Гель-лак"),
            service(2, "Педикюр", "Классический педикюр"),
        ];
        let pages = layout(&services, &contacts());

        let bytes = render_pdf(&pages, Some(&fonts)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_resolve_fonts_uses_configured_file_and_bold_sibling() {
        let dir = tempfile::TempDir::new().unwrap();
        let regular = dir.path().join("Custom.ttf");
        std::fs::write(&regular, b"").unwrap();

        let fonts = resolve_fonts(Some(&regular)).unwrap();
        assert_eq!(fonts.regular, regular);
        assert_eq!(fonts.bold, regular);

        let bold = dir.path().join("Custom-Bold.ttf");
        std::fs::write(&bold, b"").unwrap();

        let fonts = resolve_fonts(Some(&regular)).unwrap();
        assert_eq!(fonts.bold, bold);
    }

    #[test]
    fn test_render_pdf_missing_font_fails() {
        let fonts = FontSet {
            regular: PathBuf::from("/nonexistent/font.ttf"),
            bold: PathBuf::from("/nonexistent/font.ttf"),
        };
        let result = render_pdf(&[PageLayout::default()], Some(&fonts));
        assert!(result.is_err());
    }
}
