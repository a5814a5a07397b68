use anyhow::Result;

use crate::cmyk::Cmyk;
use crate::color::cmyk_to_hex;
use crate::mixer::MixResult;
use crate::palette::Palette;
use std::path;
use svg::node::element::Circle;
use svg::node::element::Rectangle;
use svg::Document;

const DISC_RADIUS: f64 = 50.0;
const SWATCH_SIZE: f64 = 40.0;
const MARGIN: f64 = 10.0;
const BAR_HEIGHT: f64 = 30.0;

fn draw_disc(document: Document, cx: f64, color: &Cmyk) -> Document {
    document.add(
        Circle::new()
            .set("fill", cmyk_to_hex(*color))
            .set("stroke", "black")
            .set("stroke-width", "2.0")
            .set("cx", cx)
            .set("cy", MARGIN + DISC_RADIUS)
            .set("r", DISC_RADIUS),
    )
}

fn draw_rect(
    document: Document,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: &Cmyk,
) -> Document {
    document.add(
        Rectangle::new()
            .set("fill", cmyk_to_hex(*color))
            .set("stroke", "black")
            .set("stroke-width", "1.0")
            .set("x", x)
            .set("y", y)
            .set("width", width)
            .set("height", height),
    )
}

fn draw_swatches(document: Document, palette: &Palette, top: f64) -> Document {
    let mut document = document;

    for (index, ink) in palette.iter().enumerate() {
        let x = MARGIN + index as f64 * (SWATCH_SIZE + MARGIN);
        document = draw_rect(document, x, top, SWATCH_SIZE, SWATCH_SIZE, ink);
    }

    document
}

/// Stacked bar, each ink takes a share of the width given by its ratio.
fn draw_ratio_bar(
    document: Document,
    palette: &Palette,
    ratios: &[f64],
    top: f64,
    width: f64,
) -> Document {
    let mut document = document;
    let mut x = MARGIN;

    for (ink, ratio) in palette.iter().zip(ratios) {
        let segment = ratio * width;

        if segment > 0.0 {
            document = draw_rect(document, x, top, segment, BAR_HEIGHT, ink);
        }

        x += segment;
    }

    document
}

/// Target and mixed color side by side, the inks below and a bar showing
/// how much of each ink goes into the mix.
pub fn document(palette: &Palette, target: &Cmyk, result: &MixResult) -> Document {
    let discs_width = 4.0 * DISC_RADIUS + MARGIN;
    let swatches_width = palette.len() as f64 * (SWATCH_SIZE + MARGIN) - MARGIN;
    let width = discs_width.max(swatches_width) + 2.0 * MARGIN;
    let swatch_top = 2.0 * (MARGIN + DISC_RADIUS);
    let bar_top = swatch_top + SWATCH_SIZE + MARGIN;
    let height = bar_top + BAR_HEIGHT + MARGIN;

    let document = Document::new().set("viewBox", (0.0, 0.0, width, height));
    let document = draw_disc(document, MARGIN + DISC_RADIUS, target);
    let document = draw_disc(document, 2.0 * MARGIN + 3.0 * DISC_RADIUS, &result.mixed_color);
    let document = draw_swatches(document, palette, swatch_top);

    draw_ratio_bar(document, palette, &result.ratios, bar_top, width - 2.0 * MARGIN)
}

pub fn write_preview(
    filename: &path::Path,
    palette: &Palette,
    target: &Cmyk,
    result: &MixResult,
) -> Result<()> {
    let document = document(palette, target, result);

    svg::save(filename, &document)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::{calculate_ratios, SolverConfig, Termination};

    #[test]
    fn preview_contains_discs_swatches_and_bar() {
        let palette = Palette::new(vec![Cmyk::CYAN, Cmyk::MAGENTA]);
        let target = Cmyk::new(0.5, 0.5, 0.0, 0.0);
        let result =
            calculate_ratios(palette.as_slice(), target, &SolverConfig::default()).unwrap();

        let rendered = document(&palette, &target, &result).to_string();

        assert_eq!(rendered.matches("<circle").count(), 2);
        // two swatches and two bar segments
        assert_eq!(rendered.matches("<rect").count(), 4);
        assert!(rendered.contains("#00ffff"));
        assert!(rendered.contains("#ff00ff"));
        assert!(rendered.contains(&cmyk_to_hex(target)));
    }

    #[test]
    fn unused_inks_have_no_bar_segment() {
        let palette = Palette::new(vec![Cmyk::CYAN, Cmyk::MAGENTA]);
        let result = MixResult {
            mixed_color: Cmyk::CYAN,
            ratios: vec![1.0, 0.0],
            error: 0.0,
            iterations: 0,
            termination: Termination::Converged,
        };

        let rendered = document(&palette, &Cmyk::CYAN, &result).to_string();
        assert_eq!(rendered.matches("<rect").count(), 3);
    }
}
