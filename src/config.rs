use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::layout::Pixel;

/// Font size, line spacing and colour for one class of text in a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: Pixel,
    pub line_height: Pixel,
    pub color: String,
}

impl TextStyle {
    pub fn new(font_size: Pixel, line_height: Pixel) -> Self {
        Self {
            font_size,
            line_height,
            color: "#000000".to_string(),
        }
    }
}

/// Which arrangement algorithm positions the blurbs of a descendant chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrangeStrategy {
    /// Deterministic recursive centering. Fast and stable; the default.
    Spreading,
    /// Simulated annealing over the soft placement constraints. Slower and
    /// randomised, but gives more organic spacing on dense charts.
    Annealing,
}

/// Layout parameters for rendering a descendant chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Emit logging and outline blurb boxes in the rendered output.
    pub debug: bool,
    pub strategy: ArrangeStrategy,
    /// Number of adjustment iterations to run (annealing only).
    pub iterations: usize,
    /// Seed for the annealing random source. Unset means seed from the OS;
    /// set it to make layouts reproducible.
    pub seed: Option<u64>,
    /// Also pull children towards their grandparent's blurb. Encourages a
    /// more centred tree on some charts at the cost of tighter coupling
    /// between generations.
    pub keep_with_ancestors: bool,

    /// Horizontal spacing between blurbs within the same family.
    pub hspace: Pixel,
    /// Width of the lines connecting blurbs.
    pub line_width: Pixel,
    /// Margin added around the entire drawing.
    pub margin: Pixel,
    /// Length of the line dropped from parents to the children group line.
    pub family_drop: Pixel,
    /// Length of the line from the children group line down to a child.
    pub child_drop: Pixel,
    /// Distance kept between a connecting line and any text.
    pub line_gap: Pixel,

    pub title_style: TextStyle,
    pub note_style: TextStyle,
    /// Style of the first line of each blurb.
    pub heading_style: TextStyle,
    /// Style of the lines of each blurb after the first.
    pub detail_style: TextStyle,

    /// Maximum width of detail text before wrapping to a new line.
    pub detail_wrap_width: Pixel,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            debug: false,
            strategy: ArrangeStrategy::Spreading,
            iterations: 30000,
            seed: None,
            keep_with_ancestors: false,
            hspace: 16,
            line_width: 2,
            margin: 16,
            family_drop: 48,
            child_drop: 16,
            line_gap: 8,
            title_style: TextStyle::new(40, 42),
            note_style: TextStyle::new(20, 22),
            heading_style: TextStyle::new(20, 22),
            detail_style: TextStyle::new(16, 18),
            detail_wrap_width: 18 * 16,
        }
    }
}

/// Layout parameters for rendering an ancestor chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AncestorLayoutOptions {
    pub debug: bool,

    pub line_width: Pixel,
    pub margin: Pixel,
    /// Horizontal space between blurbs in different generations.
    pub hspace: Pixel,
    /// Vertical space between blurbs in the same generation.
    pub vspace: Pixel,
    pub line_gap: Pixel,
    /// Length of the hook drawn from a parent or child to the vertical line
    /// that joins them.
    pub hook_length: Pixel,

    pub title_style: TextStyle,
    pub note_style: TextStyle,
    pub heading_style: TextStyle,
    pub detail_style: TextStyle,

    pub detail_wrap_width: Pixel,
}

impl Default for AncestorLayoutOptions {
    fn default() -> Self {
        Self {
            debug: false,
            line_width: 2,
            margin: 16,
            hspace: 12,
            vspace: 4,
            line_gap: 8,
            hook_length: 12,
            title_style: TextStyle::new(40, 42),
            note_style: TextStyle::new(20, 22),
            heading_style: TextStyle::new(20, 22),
            detail_style: TextStyle::new(16, 18),
            detail_wrap_width: 18 * 16,
        }
    }
}

/// Load layout options from a JSON file, falling back to defaults when no
/// path is given. Missing fields take their default values.
pub fn load_layout_options(path: Option<&Path>) -> anyhow::Result<LayoutOptions> {
    let Some(path) = path else {
        return Ok(LayoutOptions::default());
    };
    let text = std::fs::read_to_string(path)?;
    let options = serde_json::from_str(&text)?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_documented_values() {
        let opts = LayoutOptions::default();
        assert_eq!(opts.strategy, ArrangeStrategy::Spreading);
        assert_eq!(opts.iterations, 30000);
        assert_eq!(opts.hspace, 16);
        assert_eq!(opts.detail_wrap_width, 288);
        assert_eq!(opts.heading_style, TextStyle::new(20, 22));
    }

    #[test]
    fn partial_json_config_fills_in_defaults() {
        let opts: LayoutOptions =
            serde_json::from_str(r#"{"strategy": "annealing", "iterations": 500, "seed": 42}"#)
                .unwrap();
        assert_eq!(opts.strategy, ArrangeStrategy::Annealing);
        assert_eq!(opts.iterations, 500);
        assert_eq!(opts.seed, Some(42));
        assert_eq!(opts.margin, 16);
    }
}
