use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub segment: Srgba<f64>,
    pub parent: Srgba<f64>,
    pub hovered: Srgba<f64>,
    pub border: Srgba<f64>,
    pub indicator: Srgba<f64>,
    pub center: Srgba<f64>,
    pub text: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            segment: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.15, 0.15, 0.15, 0.8),
                Some(0.8),
            ),
            parent: Self::lookup_color(
                context,
                "theme_unfocused_bg_color",
                Srgba::new(0.2, 0.2, 0.24, 0.85),
                Some(0.85),
            ),
            hovered: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.4, 0.4, 0.8, 0.9),
                Some(0.9),
            ),
            border: Self::lookup_color(
                context,
                "borders",
                Srgba::new(1.0, 1.0, 1.0, 0.25),
                Some(0.35),
            ),
            indicator: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.55, 0.55, 0.95, 1.0),
                None,
            ),
            center: Self::lookup_color(
                context,
                "theme_base_color",
                Srgba::new(0.1, 0.1, 0.1, 0.9),
                Some(0.9),
            ),
            text: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(1.0, 1.0, 1.0, 1.0),
                None,
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.rosette-drawing-area {
    background: none;
    background-color: transparent;
}

.page .header {
    font-size: 28pt;
    font-weight: bold;
}

.page .paragraph {
    font-size: 13pt;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
