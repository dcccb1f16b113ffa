use gradation_engine::coords::{Rect, Vec2};
use gradation_engine::input::{Key, MouseButton};
use gradation_engine::paint::{Color, LinearGradient};
use gradation_engine::scene::Border;

use crate::event::UiEvent;
use crate::painter::Painter;

/// Palette offered after the preview swatch.
pub const PRESETS: [Color; 16] = [
    Color::BLACK,
    Color::from_premul(0.25, 0.25, 0.25, 1.0),
    Color::DARK_GRAY,
    Color::from_premul(0.75, 0.75, 0.75, 1.0),
    Color::WHITE,
    Color::from_premul(1.0, 0.0, 0.0, 1.0),
    Color::from_premul(1.0, 0.5, 0.0, 1.0),
    Color::from_premul(1.0, 1.0, 0.0, 1.0),
    Color::from_premul(0.0, 1.0, 0.0, 1.0),
    Color::from_premul(0.0, 0.5, 0.0, 1.0),
    Color::CYAN,
    Color::from_premul(0.0, 0.5, 0.5, 1.0),
    Color::from_premul(0.0, 0.0, 1.0, 1.0),
    Color::from_premul(0.0, 0.0, 0.5, 1.0),
    Color::from_premul(1.0, 0.0, 1.0, 1.0),
    Color::from_premul(0.5, 0.0, 0.5, 1.0),
];

const PAD: f32 = 6.0;
const GAP: f32 = 4.0;
/// Presets wrap into two rows of this many.
const PRESET_COLUMNS: usize = 8;

const PANEL_FILL: Color = Color::from_premul(0.12, 0.12, 0.14, 0.96);
const PANEL_EDGE: Color = Color::from_premul(0.35, 0.35, 0.4, 1.0);
const SWATCH_EDGE: Color = Color::from_premul(0.05, 0.05, 0.05, 1.0);

/// Result of routing one event to an open picker.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PickerOutcome {
    /// Still open.
    Pending,
    Picked(Color),
    Cancelled,
}

/// HSV component adjusted by one of the picker's bars.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Channel {
    Hue,
    Saturation,
    Value,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Hue, Channel::Saturation, Channel::Value];

    #[inline]
    fn row(self) -> usize {
        self as usize
    }
}

/// In-window modal colour palette.
///
/// Covers `bounds` and answers every event while open. The left square
/// previews the candidate colour (initially the colour being edited),
/// [`PRESETS`] follow in two rows, and three bars on the right adjust the
/// candidate's hue, saturation and value. Clicking the preview or pressing
/// Enter confirms the candidate; clicking a preset confirms that preset.
#[derive(Debug, Clone)]
pub struct SwatchPicker {
    initial: Color,
    candidate: Color,
    hsv: [f32; 3],
    bounds: Rect,
    hovered: Option<usize>,
    dirty: bool,
}

impl SwatchPicker {
    pub fn new(initial: Color, bounds: Rect) -> Self {
        let (h, s, v) = initial.to_hsv();
        Self {
            initial,
            candidate: initial,
            hsv: [h, s, v],
            bounds,
            hovered: None,
            dirty: true,
        }
    }

    #[inline]
    pub fn initial(&self) -> Color {
        self.initial
    }

    /// Colour the preview currently shows.
    #[inline]
    pub fn candidate(&self) -> Color {
        self.candidate
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn channel(&self, channel: Channel) -> f32 {
        self.hsv[channel.row()]
    }

    // ── layout ────────────────────────────────────────────────────────────

    fn inner(&self) -> Rect {
        self.bounds.inflate(-PAD)
    }

    fn cell(&self) -> f32 {
        ((self.inner().size.y - GAP) * 0.5).max(1.0)
    }

    /// Index 0 is the preview, `1..=16` the presets.
    pub fn swatch_rect(&self, index: usize) -> Rect {
        let inner = self.inner();
        let side = inner.size.y.max(1.0);
        if index == 0 {
            return Rect::new(inner.origin.x, inner.origin.y, side, side);
        }

        let cell = self.cell();
        let i = index - 1;
        let (col, row) = ((i % PRESET_COLUMNS) as f32, (i / PRESET_COLUMNS) as f32);
        Rect::new(
            inner.origin.x + side + GAP + col * (cell + GAP),
            inner.origin.y + row * (cell + GAP),
            cell,
            cell,
        )
    }

    /// Bar for `channel`, stacked right of the presets.
    pub fn channel_rect(&self, channel: Channel) -> Rect {
        let inner = self.inner();
        let x = inner.origin.x
            + inner.size.y.max(1.0)
            + GAP
            + PRESET_COLUMNS as f32 * (self.cell() + GAP)
            + GAP;
        let w = (inner.max().x - x).max(1.0);
        let h = ((inner.size.y - GAP * 2.0) / 3.0).max(1.0);
        Rect::new(x, inner.origin.y + channel.row() as f32 * (h + GAP), w, h)
    }

    fn swatch_color(&self, index: usize) -> Option<Color> {
        match index {
            0 => Some(self.candidate),
            i => PRESETS.get(i - 1).copied(),
        }
    }

    /// Swatch under `pos`, if any.
    pub fn swatch_at(&self, pos: Vec2) -> Option<usize> {
        (0..=PRESETS.len()).find(|&i| self.swatch_rect(i).contains(pos))
    }

    /// Bar under `pos`, if any.
    pub fn channel_at(&self, pos: Vec2) -> Option<Channel> {
        Channel::ALL.into_iter().find(|&c| self.channel_rect(c).contains(pos))
    }

    // ── interaction ───────────────────────────────────────────────────────

    /// Sets `channel` from the horizontal position of `pos` along its bar.
    fn scrub(&mut self, channel: Channel, pos: Vec2) {
        let r = self.channel_rect(channel);
        let t = ((pos.x - r.origin.x) / r.size.x).clamp(0.0, 1.0);
        if t == self.hsv[channel.row()] {
            return;
        }
        self.hsv[channel.row()] = t;
        let [h, s, v] = self.hsv;
        self.candidate = Color::from_hsv(h, s, v);
        self.dirty = true;
    }

    pub fn on_event(&mut self, event: &UiEvent) -> PickerOutcome {
        match *event {
            UiEvent::Hover { pos } => {
                let hovered = self.swatch_at(pos);
                if hovered != self.hovered {
                    self.hovered = hovered;
                    self.dirty = true;
                }
                PickerOutcome::Pending
            }
            UiEvent::Press { pos, button: MouseButton::Left } => {
                if let Some(channel) = self.channel_at(pos) {
                    self.scrub(channel, pos);
                    return PickerOutcome::Pending;
                }
                match self.swatch_at(pos).and_then(|i| self.swatch_color(i)) {
                    Some(c) => PickerOutcome::Picked(c),
                    None => PickerOutcome::Cancelled,
                }
            }
            UiEvent::Drag { pos, start } => {
                if let Some(channel) = self.channel_at(start) {
                    self.scrub(channel, pos);
                }
                PickerOutcome::Pending
            }
            UiEvent::Press { .. } => PickerOutcome::Cancelled,
            UiEvent::KeyPress { key: Key::Escape, .. } => PickerOutcome::Cancelled,
            UiEvent::KeyPress { key: Key::Enter, .. } => PickerOutcome::Picked(self.candidate),
            _ => PickerOutcome::Pending,
        }
    }

    /// Returns `true` once per visual change.
    #[inline]
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ── painting ──────────────────────────────────────────────────────────

    /// Left-to-right blend a bar shows: the colours reachable by moving
    /// only `channel`.
    fn channel_ramp(&self, channel: Channel) -> LinearGradient {
        let r = self.channel_rect(channel);
        let mut ramp = LinearGradient::new(r.origin, Vec2::new(r.max().x, r.origin.y));
        let [h, s, v] = self.hsv;
        match channel {
            Channel::Hue => {
                for k in 0..=6 {
                    let t = k as f32 / 6.0;
                    ramp.set_color_at(t, Color::from_hsv(t, 1.0, 1.0));
                }
            }
            Channel::Saturation => {
                ramp.set_color_at(0.0, Color::from_hsv(h, 0.0, v));
                ramp.set_color_at(1.0, Color::from_hsv(h, 1.0, v));
            }
            Channel::Value => {
                ramp.set_color_at(0.0, Color::from_hsv(h, s, 0.0));
                ramp.set_color_at(1.0, Color::from_hsv(h, s, 1.0));
            }
        }
        ramp
    }

    pub fn paint(&self, painter: &mut Painter) {
        painter.fill_rect(self.bounds, PANEL_FILL, Some(Border::new(1.0, PANEL_EDGE)));

        for channel in Channel::ALL {
            let r = self.channel_rect(channel);
            painter.fill_rect(r, self.channel_ramp(channel), Some(Border::new(1.0, SWATCH_EDGE)));

            let x = r.origin.x + self.channel(channel) * r.size.x;
            let marker = Rect::new(x - 1.5, r.origin.y - 1.0, 3.0, r.size.y + 2.0);
            painter.fill_rect(marker, Color::WHITE, Some(Border::new(1.0, SWATCH_EDGE)));
        }

        for i in 0..=PRESETS.len() {
            let Some(color) = self.swatch_color(i) else { continue };
            let edge = if self.hovered == Some(i) {
                Border::new(2.0, Color::CYAN)
            } else if i == 0 {
                Border::new(2.0, Color::WHITE)
            } else {
                Border::new(1.0, SWATCH_EDGE)
            };
            painter.fill_rounded_rect(self.swatch_rect(i), 2.0, color, Some(edge));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradation_engine::input::Modifiers;

    fn picker() -> SwatchPicker {
        SwatchPicker::new(Color::WHITE, Rect::new(0.0, 0.0, 500.0, 50.0))
    }

    fn centre(r: Rect) -> Vec2 {
        r.origin + r.size * 0.5
    }

    #[test]
    fn swatches_and_bars_fit_inside_bounds() {
        let p = picker();
        let last = p.swatch_rect(PRESETS.len());
        assert!(last.max().y <= 50.0 - PAD + 0.01);
        assert!(p.swatch_rect(0).origin.y >= PAD - 0.01);

        for channel in Channel::ALL {
            let bar = p.channel_rect(channel);
            assert!(bar.origin.x > last.max().x);
            assert!(bar.max().x <= 500.0 - PAD + 0.01);
            assert!(bar.max().y <= 50.0 - PAD + 0.01);
            assert_eq!(p.channel_at(centre(bar)), Some(channel));
            assert_eq!(p.swatch_at(centre(bar)), None);
        }
    }

    #[test]
    fn clicking_a_preset_picks_it() {
        let p = &mut picker();
        let pos = centre(p.swatch_rect(6));
        assert_eq!(
            p.on_event(&UiEvent::Press { pos, button: MouseButton::Left }),
            PickerOutcome::Picked(PRESETS[5])
        );
    }

    #[test]
    fn clicking_the_preview_keeps_the_initial_colour() {
        let p = &mut picker();
        let pos = centre(p.swatch_rect(0));
        assert_eq!(
            p.on_event(&UiEvent::Press { pos, button: MouseButton::Left }),
            PickerOutcome::Picked(Color::WHITE)
        );
    }

    #[test]
    fn escape_secondary_click_or_gap_cancels() {
        let p = &mut picker();
        let esc = UiEvent::KeyPress { key: Key::Escape, modifiers: Modifiers::default() };
        assert_eq!(p.on_event(&esc), PickerOutcome::Cancelled);

        let on_swatch = centre(p.swatch_rect(3));
        assert_eq!(
            p.on_event(&UiEvent::Press { pos: on_swatch, button: MouseButton::Right }),
            PickerOutcome::Cancelled
        );
        assert_eq!(
            p.on_event(&UiEvent::Press { pos: Vec2::new(1.0, 1.0), button: MouseButton::Left }),
            PickerOutcome::Cancelled
        );
    }

    #[test]
    fn bars_mix_an_arbitrary_colour() {
        let p = &mut picker();
        let hue = p.channel_rect(Channel::Hue);
        let sat = p.channel_rect(Channel::Saturation);
        let left = UiEvent::Press {
            pos: Vec2::new(hue.origin.x + hue.size.x / 3.0, hue.origin.y + 2.0),
            button: MouseButton::Left,
        };
        assert_eq!(p.on_event(&left), PickerOutcome::Pending);
        let full = UiEvent::Press { pos: Vec2::new(sat.max().x - 0.01, sat.origin.y + 2.0), button: MouseButton::Left };
        assert_eq!(p.on_event(&full), PickerOutcome::Pending);
        assert_eq!(p.candidate().to_srgb_u8(), [0, 255, 0, 255]);
        assert_eq!(p.initial(), Color::WHITE);

        let enter = UiEvent::KeyPress { key: Key::Enter, modifiers: Modifiers::default() };
        assert_eq!(p.on_event(&enter), PickerOutcome::Picked(p.candidate()));

        let preview = centre(p.swatch_rect(0));
        let picked = p.on_event(&UiEvent::Press { pos: preview, button: MouseButton::Left });
        assert_eq!(picked, PickerOutcome::Picked(p.candidate()));
    }

    #[test]
    fn dragging_from_a_bar_scrubs_it() {
        let p = &mut picker();
        let value = p.channel_rect(Channel::Value);
        let start = Vec2::new(value.origin.x + 1.0, value.origin.y + 2.0);
        p.on_event(&UiEvent::Press { pos: start, button: MouseButton::Left });
        assert!(p.channel(Channel::Value) < 0.01);

        p.take_dirty();
        let far = Vec2::new(value.max().x + 40.0, 45.0);
        assert_eq!(p.on_event(&UiEvent::Drag { pos: far, start }), PickerOutcome::Pending);
        assert_eq!(p.channel(Channel::Value), 1.0);
        assert_eq!(p.candidate(), Color::WHITE);
        assert!(p.take_dirty());
    }

    #[test]
    fn hover_change_marks_dirty_once() {
        let p = &mut picker();
        p.take_dirty();
        let pos = centre(p.swatch_rect(2));
        assert_eq!(p.on_event(&UiEvent::Hover { pos }), PickerOutcome::Pending);
        assert!(p.take_dirty());
        p.on_event(&UiEvent::Hover { pos });
        assert!(!p.take_dirty());
    }
}
