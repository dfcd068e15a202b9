use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlImageElement};

use crate::dom::{self, Listener};
use crate::enhancer::Context;
use crate::error::Result;
use crate::styles;

pub struct LazyImages {
    _listeners: Vec<Listener>,
}

/// Logo and critical images must not wait for lazy loading.
pub fn should_defer(has_loading_hint: bool, is_logo: bool, is_critical: bool) -> bool {
    !has_loading_hint && !is_logo && !is_critical
}

/// Grey 400x300 card with a centred caption, as a data URI.
pub fn placeholder_uri(caption: &str) -> String {
    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" "#,
            r#"width="400" height="300" viewBox="0 0 400 300">"#,
            r##"<rect width="400" height="300" fill="#e9ecef"></rect>"##,
            r#"<text x="50%" y="50%" dominant-baseline="middle" text-anchor="middle" "#,
            r##"font-family="system-ui" font-size="16" fill="#6c757d">{}</text>"##,
            "</svg>"
        ),
        escape_xml(caption)
    );
    format!("data:image/svg+xml;charset=utf-8,{}", urlencoding::encode(&svg))
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn reveal(image: &Element) {
    dom::add_class(image, styles::REVEALED);
}

/// What a failed image turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    /// `None` when the placeholder itself failed to load.
    pub new_src: Option<String>,
    pub classes: [&'static str; 2],
}

pub fn fallback(current_src: &str, placeholder: &str) -> Fallback {
    Fallback {
        new_src: (current_src != placeholder).then(|| placeholder.to_string()),
        classes: [styles::MEDIA_FALLBACK, styles::REVEALED],
    }
}

pub fn init_images(ctx: &Context) -> Result<Option<LazyImages>> {
    let images: Vec<HtmlImageElement> = dom::query_all(&ctx.document, "img")
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlImageElement>().ok())
        .collect();
    if images.is_empty() {
        return Ok(None);
    }

    let placeholder = placeholder_uri(&ctx.config.strings.image_unavailable);
    let mut listeners = Vec::new();

    for image in images {
        if should_defer(
            image.has_attribute("loading"),
            dom::has_class(&image, "c-logo__img"),
            image.has_attribute("data-critical"),
        ) {
            image.set_attribute("loading", "lazy")?;
        }
        dom::add_class(&image, "img-fluid");

        let failed = image.clone();
        let placeholder = placeholder.clone();
        listeners.push(Listener::new(&image, "error", move |_| {
            let outcome = fallback(&failed.src(), &placeholder);
            if let Some(src) = outcome.new_src {
                failed.set_src(&src);
            }
            for class in outcome.classes {
                dom::add_class(&failed, class);
            }
        })?);

        if image.complete() {
            let image = image.clone();
            ctx.timers.schedule(ctx.config.image_reveal_delay_ms, move || {
                if image.is_connected() {
                    reveal(&image);
                }
            });
        } else {
            let loaded = image.clone();
            listeners.push(Listener::new(&image, "load", move |_| reveal(&loaded))?);
        }

        // Hidden only once something is in place to reveal it again.
        dom::add_class(&image, styles::MEDIA_REVEAL);
    }

    Ok(Some(LazyImages {
        _listeners: listeners,
    }))
}

/// Videos only get the loading hint. Returns how many were touched.
pub fn init_videos(ctx: &Context) -> Result<Option<usize>> {
    let videos = dom::query_all(&ctx.document, "video");
    if videos.is_empty() {
        return Ok(None);
    }
    let mut hinted = 0;
    for video in videos.iter().filter(|v| !v.has_attribute("loading")) {
        video.set_attribute("loading", "lazy")?;
        hinted += 1;
    }
    Ok(Some(hinted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defers_plain_images_only() {
        assert!(should_defer(false, false, false));
        assert!(!should_defer(true, false, false));
        assert!(!should_defer(false, true, false));
        assert!(!should_defer(false, false, true));
    }

    #[test]
    fn broken_image_swaps_to_placeholder_and_shows() {
        let placeholder = placeholder_uri("Bild nicht verfügbar");
        let outcome = fallback("https://example.org/missing.jpg", &placeholder);
        assert_eq!(outcome.new_src.as_deref(), Some(placeholder.as_str()));
        assert!(outcome.classes.contains(&styles::REVEALED));
        assert!(outcome.classes.contains(&styles::MEDIA_FALLBACK));
    }

    #[test]
    fn failing_placeholder_is_not_swapped_again() {
        let placeholder = placeholder_uri("Bild nicht verfügbar");
        let outcome = fallback(&placeholder, &placeholder);
        assert_eq!(outcome.new_src, None);
        assert!(outcome.classes.contains(&styles::REVEALED));
    }

    #[test]
    fn revealed_media_is_fully_opaque() {
        let rule = format!(".{}.{}", styles::MEDIA_REVEAL, styles::REVEALED);
        let start = styles::SHEET.find(&rule).unwrap();
        let block = &styles::SHEET[start..];
        let block = &block[..block.find('}').unwrap()];
        assert!(block.contains("opacity: 1;"));
    }

    #[test]
    fn placeholder_is_encoded_svg_with_caption() {
        let uri = placeholder_uri("Bild nicht verfügbar");
        assert!(uri.starts_with("data:image/svg+xml;charset=utf-8,"));
        let body = &uri["data:image/svg+xml;charset=utf-8,".len()..];
        assert!(!body.contains(' '));
        assert!(!body.contains('#'));
        let decoded = urlencoding::decode(body).unwrap();
        assert!(decoded.contains("Bild nicht verfügbar"));
        assert!(decoded.contains(r##"fill="#e9ecef""##));
    }

    #[test]
    fn caption_markup_is_escaped() {
        let decoded = urlencoding::decode(
            &placeholder_uri("<b>")["data:image/svg+xml;charset=utf-8,".len()..],
        )
        .unwrap()
        .into_owned();
        assert!(decoded.contains("&lt;b&gt;"));
    }
}
