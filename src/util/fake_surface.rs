//! In-memory [`ThemeSurface`] used by unit tests.

use super::captcha::{CaptchaProvider, ThemeSurface};

#[derive(Clone, Debug, Default)]
pub struct FakeFrame {
    pub src: String,
    pub assigned: u32,
    pub replaced: u32,
}

#[derive(Debug, Default)]
pub struct FakeSurface {
    pub dark: bool,
    pub frames: Vec<FakeFrame>,
}

impl FakeSurface {
    pub fn with_frames(srcs: &[&str]) -> Self {
        Self {
            dark: false,
            frames: srcs
                .iter()
                .map(|src| FakeFrame {
                    src: (*src).to_owned(),
                    ..FakeFrame::default()
                })
                .collect(),
        }
    }

    pub fn src(&self, index: usize) -> &str {
        &self.frames[index].src
    }
}

impl ThemeSurface for FakeSurface {
    type Frame = usize;

    fn set_dark_class(&mut self, dark: bool) {
        self.dark = dark;
    }

    fn captcha_frames(&self, provider: &CaptchaProvider) -> Vec<usize> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(_, frame)| frame.src.contains(&provider.src_marker))
            .map(|(i, _)| i)
            .collect()
    }

    fn frame_src(&self, frame: &usize) -> String {
        self.frames[*frame].src.clone()
    }

    fn assign_src(&mut self, frame: &usize, src: &str) {
        let f = &mut self.frames[*frame];
        f.src = src.to_owned();
        f.assigned += 1;
    }

    fn replace_frame(&mut self, frame: &usize, src: &str) {
        let f = &mut self.frames[*frame];
        f.src = src.to_owned();
        f.replaced += 1;
    }
}
