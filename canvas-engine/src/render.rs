//! Rendering contract.
//!
//! The engine never produces pixels. Each frame it hands the host's painter
//! the visible elements in paint order together with their screen-space
//! bounding boxes; the host draws them however it likes (2D canvas, SVG,
//! retained scene graph).

use crate::element::CanvasElement;
use crate::geometry::Rect;
use crate::viewport::Viewport;

/// Host-side painter driven by [`CanvasEditor::render`](crate::editor::CanvasEditor::render).
pub trait ElementPainter {
    /// Called once before any element of a frame is painted.
    fn begin_frame(&mut self, viewport: &Viewport) {
        let _ = viewport;
    }

    /// Paint one element. `screen_rect` is its bounding box in container
    /// pixels.
    fn paint(&mut self, element: &CanvasElement, screen_rect: Rect);

    /// Called once after the last element of a frame.
    fn end_frame(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementSpec;
    use crate::id::ElementId;

    #[derive(Default)]
    struct Counter {
        frames: usize,
        painted: Vec<Rect>,
        finished: bool,
    }

    impl ElementPainter for Counter {
        fn begin_frame(&mut self, _viewport: &Viewport) {
            self.frames += 1;
        }

        fn paint(&mut self, _element: &CanvasElement, screen_rect: Rect) {
            self.painted.push(screen_rect);
        }

        fn end_frame(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn test_painter_hooks() {
        let element = ElementSpec::text("t")
            .at(0.0, 0.0)
            .sized(10.0, 10.0)
            .into_element(ElementId::new(), 0, 1)
            .expect("valid spec");
        let viewport = Viewport::default();

        let mut painter = Counter::default();
        painter.begin_frame(&viewport);
        painter.paint(&element, viewport.rect_to_screen(&element.bounding_box()));
        painter.end_frame();

        assert_eq!(painter.frames, 1);
        assert_eq!(painter.painted, vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
        assert!(painter.finished);
    }
}
