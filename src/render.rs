use crate::utils::{pad_to_width, truncate_str};
use crate::PreviewResult;
use unicode_width::UnicodeWidthStr;

/// Shown in place of a missing hero image.
pub const FALLBACK_IMAGE_URL: &str =
    "https://www.publicdomainpictures.net/pictures/280000/velka/not-found-image-15383864787lu.jpg";

pub const ERROR_BANNER: &str = "Something went wrong, try again ...";

#[derive(Debug, Clone, Copy)]
pub struct CardStyle {
    pub width: usize,
    pub max_description_lines: usize,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            width: 80,
            max_description_lines: 3,
        }
    }
}

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let word = truncate_str(word, width);
        if !line.is_empty() && line.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

/// Renders one preview as a boxed terminal card, numbered from 1.
pub fn render_card(index: usize, preview: &PreviewResult, style: CardStyle) -> String {
    let width = style.width.max(24);
    let inner = width - 4;
    let horizontal_line = "─".repeat(width - 2);

    let mut body = Vec::new();
    let title = format!("[{}] {}", index + 1, or_na(&preview.title));
    body.extend(wrap_text(&title, inner).into_iter().take(2));
    body.push(truncate_str(&preview.url, inner));
    body.push(String::new());

    let mut description = wrap_text(or_na(&preview.description), inner);
    if description.len() > style.max_description_lines {
        description.truncate(style.max_description_lines);
        if let Some(last) = description.last_mut() {
            *last = truncate_str(&format!("{last} ..."), inner);
        }
    }
    body.extend(description);
    body.push(String::new());

    let image = if preview.image.trim().is_empty() {
        FALLBACK_IMAGE_URL
    } else {
        preview.image.as_str()
    };
    body.push(truncate_str(&format!("Icon:  {}", or_na(&preview.favicon)), inner));
    body.push(truncate_str(&format!("Image: {image}"), inner));

    let mut card = format!("┌{horizontal_line}┐\n");
    for line in body {
        card.push_str(&format!("│ {} │\n", pad_to_width(&line, inner)));
    }
    card.push_str(&format!("└{horizontal_line}┘"));
    card
}

pub fn render_cards(results: &[PreviewResult], style: CardStyle) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| render_card(i, r, style))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PreviewResult {
        PreviewResult {
            url: "https://www.rust-lang.org".into(),
            title: "Rust Programming Language".into(),
            favicon: "https://www.rust-lang.org/static/images/favicon-32x32.png".into(),
            description: "A language empowering everyone to build reliable and efficient software."
                .into(),
            image: "https://www.rust-lang.org/static/images/rust-social-wide.jpg".into(),
        }
    }

    #[test]
    fn test_card_lines_have_equal_width() {
        let style = CardStyle {
            width: 40,
            ..Default::default()
        };
        let card = render_card(0, &sample(), style);
        assert!(card.contains("[1] Rust Programming"));
        for line in card.lines() {
            assert_eq!(line.width(), 40, "line {line:?}");
        }
    }

    #[test]
    fn test_missing_image_uses_fallback() {
        let preview = PreviewResult {
            url: "https://example.com".into(),
            ..Default::default()
        };
        let card = render_card(2, &preview, CardStyle { width: 200, ..Default::default() });
        assert!(card.contains("[3] N/A"));
        assert!(card.contains(FALLBACK_IMAGE_URL));
    }

    #[test]
    fn test_long_description_is_capped() {
        let preview = PreviewResult {
            description: "word ".repeat(200),
            ..sample()
        };
        let style = CardStyle {
            width: 40,
            max_description_lines: 2,
        };
        let card = render_card(0, &preview, style);
        assert!(card.matches("word").count() < 40);
        assert!(card.contains("..."));
    }

    #[test]
    fn test_render_cards_numbers_in_order() {
        let cards = render_cards(&[sample(), sample()], CardStyle::default());
        let first = cards.find("[1]").unwrap();
        let second = cards.find("[2]").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert!(wrap_text("   ", 10).is_empty());
    }
}
