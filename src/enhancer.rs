use std::rc::Rc;

use log::info;
use stylist::GlobalStyle;
use web_sys::{Document, HtmlElement, Window};

use crate::components::scroll_top::{self, ScrollTopButton};
use crate::config::SiteConfig;
use crate::dom::{Listener, VisibilityObserver};
use crate::error::{EnhanceError, Result};
use crate::features::buttons::ButtonEffects;
use crate::features::forms::FormValidation;
use crate::features::media::LazyImages;
use crate::features::nav::NavMenu;
use crate::features::privacy::PrivacyLinks;
use crate::features::scroll_spy::ScrollSpy;
use crate::features::smooth_scroll::SmoothScroll;
use crate::features::{
    accordion, active_menu, buttons, cards, count_up, forms, media, nav, privacy, reveal,
    scroll_spy, smooth_scroll,
};
use crate::state::Slot;
use crate::styles;
use crate::timing::Timers;

/// What every feature needs to set itself up.
#[derive(Clone)]
pub struct Context {
    pub window: Window,
    pub document: Document,
    pub body: HtmlElement,
    pub config: Rc<SiteConfig>,
    pub timers: Timers,
}

impl Context {
    pub fn from_window(config: SiteConfig) -> Result<Self> {
        let window = web_sys::window().ok_or(EnhanceError::NoWindow)?;
        let document = window.document().ok_or(EnhanceError::NoDocument)?;
        let body = document.body().ok_or(EnhanceError::NoBody)?;
        Ok(Self {
            window,
            document,
            body,
            config: Rc::new(config),
            timers: Timers::new(),
        })
    }
}

/// Owns every enhancement on the page. Each `init_*` runs its feature at
/// most once; dropping the enhancer removes listeners and pending timers.
pub struct Enhancer {
    ctx: Context,
    _styles: GlobalStyle,
    nav: Slot<NavMenu>,
    smooth_scroll: Slot<SmoothScroll>,
    scroll_spy: Slot<ScrollSpy>,
    active_menu: Slot<String>,
    images: Slot<LazyImages>,
    videos: Slot<usize>,
    forms: Slot<FormValidation>,
    reveal: Slot<VisibilityObserver>,
    buttons: Slot<ButtonEffects>,
    count_up: Slot<VisibilityObserver>,
    scroll_top: Slot<ScrollTopButton>,
    cards: Slot<Vec<Listener>>,
    accordion: Slot<Vec<Listener>>,
    privacy: Slot<PrivacyLinks>,
}

impl Enhancer {
    pub fn new(config: SiteConfig) -> Result<Self> {
        let ctx = Context::from_window(config)?;
        let styles = styles::register()?;
        Ok(Self {
            ctx,
            _styles: styles,
            nav: Slot::default(),
            smooth_scroll: Slot::default(),
            scroll_spy: Slot::default(),
            active_menu: Slot::default(),
            images: Slot::default(),
            videos: Slot::default(),
            forms: Slot::default(),
            reveal: Slot::default(),
            buttons: Slot::default(),
            count_up: Slot::default(),
            scroll_top: Slot::default(),
            cards: Slot::default(),
            accordion: Slot::default(),
            privacy: Slot::default(),
        })
    }

    /// Runs every feature in page order. Safe to call again.
    pub fn init_all(&mut self) {
        self.init_nav();
        self.init_smooth_scroll();
        self.init_scroll_spy();
        self.init_active_menu();
        self.init_images();
        self.init_videos();
        self.init_forms();
        self.init_reveal();
        self.init_buttons();
        self.init_count_up();
        self.init_scroll_top();
        self.init_cards();
        self.init_accordion();
        self.init_privacy();
        info!("{} of 14 enhancements active", self.active_count());
    }

    pub fn init_nav(&mut self) {
        self.nav.init_with("navigation toggle", || nav::init(&self.ctx));
    }

    pub fn init_smooth_scroll(&mut self) {
        self.smooth_scroll
            .init_with("smooth scroll", || smooth_scroll::init(&self.ctx));
    }

    pub fn init_scroll_spy(&mut self) {
        self.scroll_spy
            .init_with("scroll-spy", || scroll_spy::init(&self.ctx));
    }

    pub fn init_active_menu(&mut self) {
        self.active_menu
            .init_with("active menu state", || active_menu::init(&self.ctx));
    }

    pub fn init_images(&mut self) {
        self.images
            .init_with("lazy images", || media::init_images(&self.ctx));
    }

    pub fn init_videos(&mut self) {
        self.videos
            .init_with("lazy videos", || media::init_videos(&self.ctx));
    }

    pub fn init_forms(&mut self) {
        self.forms.init_with("form validation", || forms::init(&self.ctx));
    }

    pub fn init_reveal(&mut self) {
        self.reveal
            .init_with("reveal on scroll", || reveal::init(&self.ctx));
    }

    pub fn init_buttons(&mut self) {
        self.buttons
            .init_with("button effects", || buttons::init(&self.ctx));
    }

    pub fn init_count_up(&mut self) {
        self.count_up.init_with("count-up", || count_up::init(&self.ctx));
    }

    pub fn init_scroll_top(&mut self) {
        self.scroll_top
            .init_with("scroll to top", || scroll_top::mount(&self.ctx));
    }

    pub fn init_cards(&mut self) {
        self.cards.init_with("card hover", || cards::init(&self.ctx));
    }

    pub fn init_accordion(&mut self) {
        self.accordion
            .init_with("accordion", || accordion::init(&self.ctx));
    }

    pub fn init_privacy(&mut self) {
        self.privacy
            .init_with("privacy modal", || privacy::init(&self.ctx));
    }

    pub fn active_count(&self) -> usize {
        [
            self.nav.is_active(),
            self.smooth_scroll.is_active(),
            self.scroll_spy.is_active(),
            self.active_menu.is_active(),
            self.images.is_active(),
            self.videos.is_active(),
            self.forms.is_active(),
            self.reveal.is_active(),
            self.buttons.is_active(),
            self.count_up.is_active(),
            self.scroll_top.is_active(),
            self.cards.is_active(),
            self.accordion.is_active(),
            self.privacy.is_active(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }
}

impl Drop for Enhancer {
    fn drop(&mut self) {
        self.ctx.timers.clear();
    }
}
