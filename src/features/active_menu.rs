use crate::dom;
use crate::enhancer::Context;
use crate::error::Result;

fn canonical(path: &str) -> &str {
    if path == "/index.html" {
        "/"
    } else {
        path
    }
}

/// `/` and `/index.html` name the same page.
pub fn path_matches(current: &str, href: &str) -> bool {
    canonical(current) == canonical(href)
}

/// Marks the nav link for the current page. Returns the matched href.
pub fn init(ctx: &Context) -> Result<Option<String>> {
    let current = ctx.window.location().pathname()?;
    let links = dom::query_all(&ctx.document, ".nav-link");

    for link in &links {
        let _ = link.remove_attribute("aria-current");
        dom::set_class(link, "active", false);
    }

    let matched = links.iter().find_map(|link| {
        link.get_attribute("href")
            .filter(|href| path_matches(&current, href))
            .map(|href| (link, href))
    });

    Ok(matched.map(|(link, href)| {
        let _ = link.set_attribute("aria-current", "page");
        dom::add_class(link, "active");
        href
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_and_index_are_equivalent() {
        assert!(path_matches("/", "/index.html"));
        assert!(path_matches("/index.html", "/"));
        assert!(path_matches("/kontakt.html", "/kontakt.html"));
    }

    #[test]
    fn different_pages_do_not_match() {
        assert!(!path_matches("/kontakt.html", "/"));
        assert!(!path_matches("/", "#section-about"));
    }
}
