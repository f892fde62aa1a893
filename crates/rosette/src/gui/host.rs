//! The demo page the menus are attached to, and pointer target lookup.

use gtk::prelude::*;
use gtk4 as gtk;
use rosette_core::Element;

pub fn build_page() -> gtk::Box {
    let page = gtk::Box::new(gtk::Orientation::Vertical, 24);
    page.add_css_class("page");
    page.set_margin_top(48);
    page.set_margin_bottom(48);
    page.set_margin_start(48);
    page.set_margin_end(48);

    let header = gtk::Label::new(Some("Right-click this header for the emoji menu"));
    header.add_css_class("header");
    header.set_widget_name("title");
    header.set_xalign(0.0);

    let paragraph = gtk::Label::new(Some(
        "Right-click this paragraph for the icon menu. Parent items open a nested \
         ring; the center button goes back or closes. Click anywhere else to dismiss.",
    ));
    paragraph.add_css_class("paragraph");
    paragraph.set_wrap(true);
    paragraph.set_xalign(0.0);

    page.append(&header);
    page.append(&paragraph);
    page
}

fn element_of(widget: &gtk::Widget) -> Element {
    let mut element = Element::new(widget.css_name().as_str());

    // unnamed widgets report their type name
    let name = widget.widget_name();
    if !name.is_empty() && name.as_str() != widget.type_().name() {
        element = element.with_id(name.as_str());
    }

    widget
        .css_classes()
        .iter()
        .fold(element, |e, class| e.with_class(class.as_str()))
}

/// Ancestor chain of the widget under `(x, y)`, innermost first.
pub fn target_chain(surface: &impl IsA<gtk::Widget>, x: f64, y: f64) -> Vec<Element> {
    std::iter::successors(surface.pick(x, y, gtk::PickFlags::DEFAULT), |w| w.parent())
        .map(|w| element_of(&w))
        .collect()
}
