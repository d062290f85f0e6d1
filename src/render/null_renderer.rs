use crate::error::CursorResult;
use crate::render::{RenderFrame, Renderer};

/// Headless renderer for tests: validates each frame and keeps the last one.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_frame: Option<RenderFrame>,
}

impl NullRenderer {
    #[must_use]
    pub fn last_texts(&self) -> Vec<&str> {
        self.last_frame
            .as_ref()
            .map(|frame| frame.texts.iter().map(|text| text.text.as_str()).collect())
            .unwrap_or_default()
    }
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> CursorResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
