//! Step plot of a message next to its Miller code.
//!
//! ```text
//!   message   ┌───┐       ┌───┐
//!           ──┘   └───────┘   └──
//!   miller      ┌─────┐ ┌─┐
//!           ────┘     └─┘ └──────
//! ```
//!
//! Every input bit is drawn twice so both traces share one time axis with two
//! samples per bit interval. Each sample carries a small `0`/`1` label on the
//! inner side of its level.

use crate::{encode_bits, Bit, Error, Result};
use image::{GrayImage, Luma};
use std::path::Path;

const BACKGROUND: Luma<u8> = Luma([255]);
const AXIS: Luma<u8> = Luma([192]);
const TRACE: Luma<u8> = Luma([0]);

/// Largest image `render` will allocate.
const MAX_PIXELS: u64 = 1 << 26;

/// 3x5 digits, one row per entry, leftmost pixel in the high bit.
const GLYPHS: [[u8; 5]; 2] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
];
const GLYPH_WIDTH: u32 = 3;
const GLYPH_HEIGHT: u32 = 5;
/// gap between a level line and its label
const LABEL_GAP: u32 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlotConfig {
    /// horizontal pixels per half-bit sample
    pub sample_width: u32,
    /// vertical pixels between the low and the high level
    pub panel_height: u32,
    pub margin: u32,
    /// length of the tick drawn under every sample
    pub tick: u32,
    /// label every sample with its level, when the sample is large enough
    pub labels: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            sample_width: 16,
            panel_height: 48,
            margin: 12,
            tick: 4,
            labels: true,
        }
    }
}

impl PlotConfig {
    fn fits_labels(&self) -> bool {
        self.labels
            && self.sample_width >= GLYPH_WIDTH + 2
            && self.panel_height >= 2 * (GLYPH_HEIGHT + LABEL_GAP)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Waveform {
    message: Vec<u8>,
    signal: Vec<u8>,
}

impl Waveform {
    /// Encode `bits` and lay out both traces.
    pub fn new(bits: &[Bit]) -> Self {
        let message = bits
            .iter()
            .flat_map(|bit| [bit.level(), bit.level()])
            .collect();
        let signal = encode_bits(bits).levels().collect();
        Waveform { message, signal }
    }

    /// Input levels, each bit repeated twice.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Encoded levels, each symbol split into its two half-bit levels.
    pub fn signal(&self) -> &[u8] {
        &self.signal
    }

    fn dimensions(&self, config: &PlotConfig) -> Option<(u32, u32)> {
        let samples = u32::try_from(self.signal.len().max(self.message.len())).ok()?;
        let width = samples
            .checked_mul(config.sample_width)?
            .checked_add(config.margin.checked_mul(2)?)?
            .checked_add(1)?;
        let panel = config
            .panel_height
            .checked_add(config.tick)?
            .checked_add(config.margin)?;
        let height = panel
            .checked_mul(2)?
            .checked_add(config.margin)?
            .checked_add(1)?;
        (u64::from(width) * u64::from(height) <= MAX_PIXELS).then_some((width, height))
    }

    pub fn render(&self, config: &PlotConfig) -> Result<GrayImage> {
        let samples = self.signal.len();
        let (width, height) = self
            .dimensions(config)
            .ok_or(Error::PlotTooLarge { samples })?;
        debug!("render {samples} samples into {width}x{height}");

        let panel = config.panel_height + config.tick + config.margin;
        let mut img = GrayImage::from_pixel(width, height, BACKGROUND);
        draw_panel(&mut img, &self.message, config.margin, config);
        draw_panel(&mut img, &self.signal, config.margin + panel, config);
        Ok(img)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P, config: &PlotConfig) -> Result<()> {
        let path = path.as_ref();
        self.render(config)?.save(path)?;
        info!("waveform written to {}", path.display());
        Ok(())
    }
}

// Callers guarantee the panel fits `img`; see `Waveform::dimensions`.
fn draw_panel(img: &mut GrayImage, levels: &[u8], top: u32, config: &PlotConfig) {
    let low = top + config.panel_height;
    let x0 = config.margin;
    let x1 = x0 + levels.len() as u32 * config.sample_width;
    let y_of = |level: u8| if level == 0 { low } else { top };
    let labels = config.fits_labels();

    hline(img, x0, x1, low, AXIS);
    for k in 0..=levels.len() as u32 {
        vline(img, x0 + k * config.sample_width, low, low + config.tick, AXIS);
    }

    let mut prev: Option<u8> = None;
    for (k, &level) in levels.iter().enumerate() {
        let start = x0 + k as u32 * config.sample_width;
        let y = y_of(level);
        if let Some(prev) = prev {
            if prev != level {
                vline(img, start, top, low, TRACE);
            }
        }
        hline(img, start, start + config.sample_width, y, TRACE);
        if labels {
            let x = start + (config.sample_width - GLYPH_WIDTH) / 2;
            let y = if level == 0 {
                low - LABEL_GAP - GLYPH_HEIGHT
            } else {
                top + LABEL_GAP
            };
            draw_digit(img, level, x, y);
        }
        prev = Some(level);
    }
}

fn draw_digit(img: &mut GrayImage, digit: u8, x: u32, y: u32) {
    let glyph = &GLYPHS[usize::from(digit & 1)];
    for (row, &bits) in (0..).zip(glyph.iter()) {
        for col in 0..GLYPH_WIDTH {
            if (bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 1 {
                img.put_pixel(x + col, y + row, TRACE);
            }
        }
    }
}

fn hline(img: &mut GrayImage, x0: u32, x1: u32, y: u32, color: Luma<u8>) {
    for x in x0..=x1 {
        img.put_pixel(x, y, color);
    }
}

fn vline(img: &mut GrayImage, x: u32, y0: u32, y1: u32, color: Luma<u8>) {
    for y in y0..=y1 {
        img.put_pixel(x, y, color);
    }
}
