use gradation_engine::coords::Rect;
use gradation_engine::paint::{Color, Paint};
use gradation_engine::scene::shapes::rounded_rect::RoundedRectCmd;
use gradation_engine::scene::{Border, DrawList, ZIndex};

/// Drawing surface passed to [`crate::widget::Widget::paint`].
///
/// Wraps the engine's `DrawList`. Every call gets the next z-index, so later
/// calls paint over earlier ones.
pub struct Painter<'a> {
    draw_list: &'a mut DrawList,
    z: i32,
}

impl<'a> Painter<'a> {
    pub fn new(draw_list: &'a mut DrawList) -> Self {
        Self { draw_list, z: 0 }
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Axis-aligned rectangle with optional inner border.
    pub fn fill_rect(&mut self, rect: Rect, paint: impl Into<Paint>, border: Option<Border>) {
        let z = self.next_z();
        self.draw_list.push_rect(z, rect, paint.into(), border);
    }

    /// Rounded rectangle with optional border. `radius = 0.0` gives sharp corners.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, fill: Color, border: Option<Border>) {
        self.fill_rotated_rect(rect, radius, fill, border, 0.0);
    }

    /// Rounded rectangle rotated by `radians` (clockwise) about `rect.origin`.
    pub fn fill_rotated_rect(
        &mut self,
        rect: Rect,
        radius: f32,
        fill: Color,
        border: Option<Border>,
        radians: f32,
    ) {
        let z = self.next_z();
        self.draw_list
            .push_rounded_rect(z, RoundedRectCmd::new(rect, radius, fill, border).rotated(radians));
    }

    // ── internal ──────────────────────────────────────────────────────────

    #[inline]
    fn next_z(&mut self) -> ZIndex {
        let z = ZIndex::new(self.z);
        self.z += 1;
        z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradation_engine::scene::DrawCmd;

    #[test]
    fn later_calls_paint_on_top() {
        let mut dl = DrawList::new();
        {
            let mut p = Painter::new(&mut dl);
            p.fill_rounded_rect(Rect::new(0.0, 0.0, 4.0, 4.0), 0.0, Color::WHITE, None);
            p.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), Color::BLACK, None);
        }
        let zs: Vec<i32> = dl.items().iter().map(|i| i.key.z.0).collect();
        assert_eq!(zs, vec![0, 1]);
        assert!(matches!(dl.items()[0].cmd, DrawCmd::RoundedRect(_)));
    }
}
