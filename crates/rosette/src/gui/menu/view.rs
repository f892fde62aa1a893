use super::anim::{Animator, Look};
use super::icons::IconCache;
use super::{
    BORDER_WIDTH, CENTER_GLYPH_FRACTION, GLYPH_FRACTION, ICON_FRACTION, INDICATOR_RADIUS,
    TITLE_FRACTION,
};
use crate::gui::theme::ThemeColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use rosette_core::geometry::CENTER_DISTANCE;
use rosette_core::scene::{Popup, Ring, Segment};
use rosette_core::{ItemDisplay, Point, PopupFrame, Scene};
use std::f64::consts::PI;
use std::time::Instant;

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Scales the current transform by `scale` around `center`.
fn scale_about(cr: &Context, center: Point, scale: f64) {
    cr.translate(center.x, center.y);
    cr.scale(scale, scale);
    cr.translate(-center.x, -center.y);
}

fn show_centered_text(cr: &Context, text: &str, at: Point, size: f64) -> Result<(), cairo::Error> {
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(size);
    let ext = cr.text_extents(text)?;
    cr.move_to(
        at.x - ext.x_bearing() - ext.width() / 2.0,
        at.y - ext.y_bearing() - ext.height() / 2.0,
    );
    cr.show_text(text)
}

struct SegmentRenderer<'a> {
    segment: &'a Segment,
    frame: &'a PopupFrame,
    hovered: bool,
}

impl<'a> SegmentRenderer<'a> {
    fn new(segment: &'a Segment, frame: &'a PopupFrame, hovered: bool) -> Self {
        Self {
            segment,
            frame,
            hovered,
        }
    }

    fn draw(
        &self,
        cr: &Context,
        colors: &ThemeColors,
        icons: &mut IconCache,
    ) -> Result<(), cairo::Error> {
        self.draw_wedge(cr, colors)?;
        self.draw_content(cr, colors, icons)?;
        if self.segment.has_children {
            self.draw_indicator(cr, colors)?;
        }
        Ok(())
    }

    fn draw_wedge(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let mut points = self.segment.layout.outline.iter().map(|p| self.frame.to_px(*p));
        let Some(first) = points.next() else {
            return Ok(());
        };

        cr.new_path();
        cr.move_to(first.x, first.y);
        for p in points {
            cr.line_to(p.x, p.y);
        }
        cr.close_path();

        let state = SegmentState::resolve(self.segment, self.hovered);
        set_source(cr, state.color(colors));
        cr.fill_preserve()?;

        set_source(cr, colors.border);
        cr.set_line_width(BORDER_WIDTH);
        cr.stroke()
    }

    fn draw_content(
        &self,
        cr: &Context,
        colors: &ThemeColors,
        icons: &mut IconCache,
    ) -> Result<(), cairo::Error> {
        let label = self.frame.to_px(self.segment.layout.label);
        let size = self.frame.size();

        match &self.segment.display {
            ItemDisplay::Glyph(glyph) => {
                set_source(cr, colors.text);
                show_centered_text(cr, glyph, label, GLYPH_FRACTION * size)
            }
            ItemDisplay::Image(path) => match icons.get(path) {
                Some(pixbuf) => self.draw_icon(cr, pixbuf, label, ICON_FRACTION * size),
                None => {
                    set_source(cr, colors.text);
                    show_centered_text(cr, self.segment.name.as_str(), label, TITLE_FRACTION * size)
                }
            },
            ItemDisplay::Blank => Ok(()),
        }
    }

    fn draw_icon(
        &self,
        cr: &Context,
        pixbuf: &Pixbuf,
        at: Point,
        edge: f64,
    ) -> Result<(), cairo::Error> {
        // fit the longer side into `edge`
        let longest = pixbuf.width().max(pixbuf.height()).max(1) as f64;
        let scale = edge / longest;
        let (w, h) = (
            pixbuf.width() as f64 * scale,
            pixbuf.height() as f64 * scale,
        );

        cr.save()?;
        cr.translate(at.x - w / 2.0, at.y - h / 2.0);
        cr.scale(scale, scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()?;
        cr.restore()
    }

    fn draw_indicator(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let at = self.frame.to_px(self.segment.layout.indicator);
        set_source(cr, colors.indicator);
        cr.new_path();
        cr.arc(at.x, at.y, INDICATOR_RADIUS, 0.0, 2.0 * PI);
        cr.fill()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentState {
    Hovered,
    Parent,
    Idle,
}

impl SegmentState {
    fn resolve(segment: &Segment, hovered: bool) -> Self {
        if hovered {
            Self::Hovered
        } else if segment.has_children {
            Self::Parent
        } else {
            Self::Idle
        }
    }

    fn color(&self, colors: &ThemeColors) -> Srgba<f64> {
        match self {
            Self::Hovered => colors.hovered,
            Self::Parent => colors.parent,
            Self::Idle => colors.segment,
        }
    }
}

/// Paints the scene's popup with its rings in their current transition state.
pub fn draw(
    cr: &Context,
    scene: &Scene,
    colors: &ThemeColors,
    animator: &mut Animator,
    icons: &mut IconCache,
    now: Instant,
) -> Result<(), cairo::Error> {
    animator.retain_rings(|id| scene.ring(id).is_some());

    let Some(popup) = scene.popup().filter(|p| p.visible) else {
        return Ok(());
    };

    let look = animator.popup_look(popup, now);
    if look.opacity <= 0.0 {
        return Ok(());
    }

    paint_group(cr, popup.frame.center(), look, |cr| {
        for ring in scene.rings() {
            let ring_look = animator.ring_look(ring, now);
            draw_ring(cr, scene, ring, ring_look, &popup.frame, colors, icons)?;
        }
        draw_center(cr, popup, colors)
    })
}

/// Draws `body` into a group scaled about `center` and composites it with the
/// look's opacity. The group is popped and the state restored even when `body`
/// fails.
fn paint_group(
    cr: &Context,
    center: Point,
    look: Look,
    body: impl FnOnce(&Context) -> Result<(), cairo::Error>,
) -> Result<(), cairo::Error> {
    cr.save()?;
    scale_about(cr, center, look.scale);
    cr.push_group();

    let drawn = body(cr);
    let painted = cr
        .pop_group_to_source()
        .and_then(|()| cr.paint_with_alpha(look.opacity));
    let restored = cr.restore();
    drawn.and(painted).and(restored)
}

fn draw_ring(
    cr: &Context,
    scene: &Scene,
    ring: &Ring,
    look: Look,
    frame: &PopupFrame,
    colors: &ThemeColors,
    icons: &mut IconCache,
) -> Result<(), cairo::Error> {
    if look.opacity <= 0.0 {
        return Ok(());
    }

    let mut segments: Vec<&Segment> = ring.segments.iter().collect();
    segments.sort_by_key(|s| s.z_index);

    paint_group(cr, frame.center(), look, |cr| {
        segments.into_iter().try_for_each(|segment| {
            SegmentRenderer::new(segment, frame, scene.hovered() == Some(segment.id))
                .draw(cr, colors, icons)
        })
    })
}

fn draw_center(cr: &Context, popup: &Popup, colors: &ThemeColors) -> Result<(), cairo::Error> {
    let center = popup.frame.center();
    let size = popup.frame.size();

    set_source(cr, colors.center);
    cr.new_path();
    cr.arc(
        center.x,
        center.y,
        CENTER_DISTANCE / 100.0 * size,
        0.0,
        2.0 * PI,
    );
    cr.fill_preserve()?;
    set_source(cr, colors.border);
    cr.set_line_width(BORDER_WIDTH);
    cr.stroke()?;

    set_source(cr, colors.text);
    if popup.title.visible {
        show_centered_text(cr, &popup.title.text, center, TITLE_FRACTION * size)
    } else if popup.glyph_visible {
        show_centered_text(
            cr,
            &popup.glyph.to_string(),
            center,
            CENTER_GLYPH_FRACTION * size,
        )
    } else {
        Ok(())
    }
}
