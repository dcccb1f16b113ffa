use gradation_engine::paint::Color;

/// Answers "which colour?" for a stop being recoloured.
///
/// `None` means the user cancelled; callers leave the colour unchanged.
pub trait ColorPicker {
    fn pick(&mut self, initial: Color) -> Option<Color>;
}

impl<F> ColorPicker for F
where
    F: FnMut(Color) -> Option<Color>,
{
    fn pick(&mut self, initial: Color) -> Option<Color> {
        self(initial)
    }
}
