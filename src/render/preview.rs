use std::path::Path;

use anyhow::Context as _;

use crate::{
    driver::RenderState,
    foundation::{
        core::{Canvas, Rgb},
        error::{ScrollyError, ScrollyResult},
    },
    render::RenderTarget,
    story::SceneTag,
};

/// Viewport height the parallax strength is tuned for.
const REFERENCE_HEIGHT: f64 = 1080.0;
const CARD_ALPHA: f64 = 0.85;
const PROGRESS_HEIGHT: u32 = 4;
const PROGRESS_COLOR: [u8; 3] = [0x00, 0xf0, 0xff];

/// Straight RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl FrameRGBA {
    pub fn filled(canvas: Canvas, rgb: [u8; 3]) -> Self {
        let px = [rgb[0], rgb[1], rgb[2], 255];
        let n = (canvas.width as usize) * (canvas.height as usize);
        Self {
            width: canvas.width,
            height: canvas.height,
            data: px.repeat(n),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Blend `rgb` at `opacity` over the rectangle `[x0, x1) x [y0, y1)`, clipped to the frame.
    /// Empty or inverted rectangles draw nothing.
    pub fn blend_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, rgb: [u8; 3], opacity: f64) {
        let op = (opacity.clamp(0.0, 1.0) * 255.0).round() as u16;
        if op == 0 {
            return;
        }
        let inv = 255 - op;

        let cx0 = x0.clamp(0, i64::from(self.width)) as usize;
        let cx1 = x1.clamp(0, i64::from(self.width)) as usize;
        let cy0 = y0.clamp(0, i64::from(self.height)) as usize;
        let cy1 = y1.clamp(0, i64::from(self.height)) as usize;
        if cx0 >= cx1 || cy0 >= cy1 {
            return;
        }
        let stride = self.width as usize * 4;

        for y in cy0..cy1 {
            let row = &mut self.data[y * stride..(y + 1) * stride];
            for px in row[cx0 * 4..cx1 * 4].chunks_exact_mut(4) {
                for c in 0..3 {
                    px[c] = (mul_div255(u16::from(rgb[c]), op) + mul_div255(u16::from(px[c]), inv))
                        .min(255) as u8;
                }
                px[3] = 255;
            }
        }
    }

    pub fn save_png(&self, path: &Path) -> ScrollyResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

fn mul_div255(x: u16, y: u16) -> u16 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u16
}

/// Card tint for each scene.
pub fn scene_accent(tag: SceneTag) -> Rgb {
    match tag {
        SceneTag::Landing => Rgb::from_u8(0x80, 0x80, 0x80),
        SceneTag::Architecture => Rgb::from_u8(0x00, 0xf0, 0xff),
        SceneTag::Chaos => Rgb::from_u8(0x9b, 0x59, 0xb6),
        SceneTag::Glitch | SceneTag::Screaming => Rgb::from_u8(0xff, 0x00, 0x3c),
        SceneTag::Shared => Rgb::from_u8(0xff, 0xd7, 0x00),
        SceneTag::Rain => Rgb::from_u8(0x4a, 0x90, 0xb8),
        SceneTag::Reboot => Rgb::from_u8(0xff, 0xf1, 0xe6),
    }
}

/// Rasterizes a [`RenderState`] into a flat storyboard frame: background,
/// one translucent card per visible segment, and the progress bar.
#[derive(Clone, Debug)]
pub struct PreviewTarget {
    canvas: Canvas,
    scenes: Vec<SceneTag>,
    frame: Option<FrameRGBA>,
}

impl PreviewTarget {
    /// `scenes` gives the tag of each segment, in table order.
    pub fn new(canvas: Canvas, scenes: Vec<SceneTag>) -> Self {
        Self {
            canvas,
            scenes,
            frame: None,
        }
    }

    pub fn frame(&self) -> Option<&FrameRGBA> {
        self.frame.as_ref()
    }

    pub fn into_frame(self) -> Option<FrameRGBA> {
        self.frame
    }

    /// Card rectangle for a segment shifted by `translate_y` reference pixels.
    fn card_rect(&self, translate_y: f64) -> (i64, i64, i64, i64) {
        let w = f64::from(self.canvas.width);
        let h = f64::from(self.canvas.height);
        let scale = h / REFERENCE_HEIGHT;
        let cy = h / 2.0 + translate_y * scale;
        let half_w = w * 0.3;
        let half_h = h * 0.15;
        (
            (w / 2.0 - half_w).round() as i64,
            (cy - half_h).round() as i64,
            (w / 2.0 + half_w).round() as i64,
            (cy + half_h).round() as i64,
        )
    }
}

impl RenderTarget for PreviewTarget {
    fn apply(&mut self, state: &RenderState) -> ScrollyResult<()> {
        if self.scenes.len() != state.scroll.segments.len() {
            return Err(ScrollyError::evaluation(format!(
                "preview built for {} segments, state has {}",
                self.scenes.len(),
                state.scroll.segments.len()
            )));
        }

        let mut frame = FrameRGBA::filled(self.canvas, state.background.to_u8());

        for seg in state.scroll.segments.iter().filter(|s| s.visible) {
            let (x0, y0, x1, y1) = self.card_rect(-seg.parallax_offset);
            let tint = scene_accent(self.scenes[seg.index]).to_u8();
            frame.blend_rect(x0, y0, x1, y1, tint, seg.opacity * CARD_ALPHA);
        }

        let bar_w = (state.scroll.scroll_fraction * f64::from(self.canvas.width)).round() as i64;
        let h = i64::from(self.canvas.height);
        frame.blend_rect(
            0,
            h - i64::from(PROGRESS_HEIGHT),
            bar_w,
            h,
            PROGRESS_COLOR,
            1.0,
        );

        tracing::trace!(frame = state.frame, "preview rasterized");
        self.frame = Some(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::MapperConfig, driver::FrameDriver, story::StoryTable};

    fn preview_at(f: f64, frames: usize) -> FrameRGBA {
        let story = Arc::new(StoryTable::builtin().unwrap());
        let scenes = story.iter().map(|s| s.scene_tag).collect();
        let mut d = FrameDriver::new(MapperConfig::default(), story, 0).unwrap();
        let mut state = d.update(f);
        for _ in 1..frames {
            state = d.update(f);
        }
        let mut t = PreviewTarget::new(Canvas::new(64, 36).unwrap(), scenes);
        t.apply(&state).unwrap();
        t.into_frame().unwrap()
    }

    #[test]
    fn filled_frame_has_uniform_pixels() {
        let f = FrameRGBA::filled(Canvas::new(3, 2).unwrap(), [1, 2, 3]);
        assert_eq!(f.data.len(), 24);
        assert_eq!(f.pixel(2, 1), Some([1, 2, 3, 255]));
        assert_eq!(f.pixel(3, 0), None);
    }

    #[test]
    fn blend_rect_clips_and_mixes() {
        let mut f = FrameRGBA::filled(Canvas::new(4, 4).unwrap(), [0, 0, 0]);
        f.blend_rect(-10, -10, 2, 2, [255, 255, 255], 0.5);
        assert_eq!(f.pixel(0, 0), Some([128, 128, 128, 255]));
        assert_eq!(f.pixel(1, 1), Some([128, 128, 128, 255]));
        assert_eq!(f.pixel(2, 2), Some([0, 0, 0, 255]));

        f.blend_rect(0, 0, 4, 4, [255, 0, 0], 0.0);
        assert_eq!(f.pixel(3, 3), Some([0, 0, 0, 255]));
    }

    #[test]
    fn inverted_rect_draws_nothing() {
        let mut f = FrameRGBA::filled(Canvas::new(8, 8).unwrap(), [0, 0, 0]);
        let before = f.clone();
        f.blend_rect(6, 0, 2, 4, [255, 255, 255], 0.5);
        f.blend_rect(0, 6, 4, 2, [255, 255, 255], 0.5);
        f.blend_rect(20, 20, 30, 30, [255, 255, 255], 1.0);
        assert_eq!(f, before);
    }

    #[test]
    fn landing_card_is_drawn_at_center() {
        let f = preview_at(0.0, 1);
        let center = f.pixel(32, 18).unwrap();
        let corner = f.pixel(0, 0).unwrap();
        // Grey card over the near-black void is brighter than the bare background.
        assert!(center[0] > corner[0] + 50);
        // Progress bar is empty at the top of the page.
        assert_eq!(f.pixel(0, 35), Some(corner));
    }

    #[test]
    fn progress_bar_fills_at_the_end() {
        let f = preview_at(1.0, 1);
        let px = f.pixel(63, 35).unwrap();
        assert_eq!([px[0], px[1], px[2]], PROGRESS_COLOR);
    }

    #[test]
    fn mismatched_scene_list_is_rejected() {
        let story = Arc::new(StoryTable::builtin().unwrap());
        let mut d = FrameDriver::new(MapperConfig::default(), story, 0).unwrap();
        let state = d.update(0.5);
        let mut t = PreviewTarget::new(Canvas::new(8, 8).unwrap(), vec![SceneTag::Landing]);
        assert!(t.apply(&state).is_err());
    }

    #[test]
    fn save_png_writes_file() {
        let dir = std::path::PathBuf::from("target").join("preview_unit");
        let path = dir.join("frame.png");
        let _ = std::fs::remove_file(&path);
        preview_at(0.5, 3).save_png(&path).unwrap();
        assert!(path.exists());
    }
}
