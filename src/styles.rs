use stylist::GlobalStyle;

use crate::error::Result;

// Class names toggled by the features. The stylesheet below is the only
// place that decides what they look like.
pub const NAV_FULLHEIGHT: &str = "is-fullheight";
pub const NO_SCROLL: &str = "u-no-scroll";
pub const REVEAL: &str = "enhance-reveal";
pub const MEDIA_REVEAL: &str = "enhance-media";
pub const REVEALED: &str = "is-revealed";
pub const MEDIA_FALLBACK: &str = "media-fallback";
pub const HOVER_ARMED: &str = "has-transition";
pub const RIPPLE_HOST: &str = "ripple-host";
pub const RIPPLE: &str = "ripple";
pub const ACCORDION_ANIMATED: &str = "accordion-animated";
pub const FEEDBACK_SHOWN: &str = "is-shown";
pub const FEEDBACK_HIDDEN: &str = "is-hidden";

pub const SHEET: &str = r#"
    .navbar-collapse.is-fullheight {
        height: calc(100vh - var(--header-h));
    }
    body.u-no-scroll {
        overflow: hidden;
    }
    .enhance-reveal {
        opacity: 0;
        transform: translateY(30px);
        transition: opacity 0.8s ease-out, transform 0.8s ease-out;
    }
    .enhance-media {
        opacity: 0;
        transform: translateY(20px);
        transition: opacity 0.8s ease-out, transform 0.8s ease-out;
    }
    .enhance-reveal.is-revealed, .enhance-media.is-revealed {
        opacity: 1;
        transform: translateY(0);
    }
    img.media-fallback {
        object-fit: contain;
    }
    .has-transition {
        transition: all 0.3s ease-out;
    }
    .ripple-host {
        position: relative;
        overflow: hidden;
    }
    .ripple {
        position: absolute;
        border-radius: 50%;
        background: rgba(255, 255, 255, 0.6);
        width: var(--ripple-size);
        height: var(--ripple-size);
        left: var(--ripple-x);
        top: var(--ripple-y);
        transform: scale(0);
        animation: ripple 0.6s ease-out;
        pointer-events: none;
    }
    @keyframes ripple {
        to {
            transform: scale(4);
            opacity: 0;
        }
    }
    .accordion-animated {
        max-height: var(--accordion-height);
        overflow: hidden;
        transition: max-height 0.3s ease-out;
    }
    .invalid-feedback.is-shown {
        display: block;
    }
    .invalid-feedback.is-hidden {
        display: none;
    }
    .scroll-to-top {
        position: fixed;
        bottom: 30px;
        right: 30px;
        width: 50px;
        height: 50px;
        background: linear-gradient(135deg, var(--color-primary), var(--color-primary-light));
        color: white;
        border: none;
        border-radius: 50%;
        font-size: 24px;
        cursor: pointer;
        opacity: 0;
        visibility: hidden;
        transition: all 0.3s ease-out;
        z-index: 999;
        box-shadow: 0 4px 12px rgba(76, 29, 149, 0.3);
    }
    .scroll-to-top.is-visible {
        opacity: 1;
        visibility: visible;
    }
    .privacy-modal {
        position: fixed;
        top: 0;
        left: 0;
        width: 100%;
        height: 100%;
        background: rgba(0, 0, 0, 0.7);
        z-index: 1060;
        display: flex;
        align-items: center;
        justify-content: center;
        opacity: 0;
        transition: opacity 0.3s ease-out;
    }
    .privacy-modal__dialog {
        background: white;
        padding: 2rem;
        border-radius: 0.75rem;
        max-width: 600px;
        max-height: 80vh;
        overflow-y: auto;
        transform: scale(0.9);
        transition: transform 0.3s ease-out;
    }
    .privacy-modal.is-open {
        opacity: 1;
    }
    .privacy-modal.is-open .privacy-modal__dialog {
        transform: scale(1);
    }
"#;

/// Mounts the shared stylesheet. stylist caches by content, so a second
/// call returns the already mounted sheet instead of adding another.
pub fn register() -> Result<GlobalStyle> {
    Ok(GlobalStyle::new(SHEET)?)
}
