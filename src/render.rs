use std::path::Path;

use anyhow::Result;

use crate::layout::{Layout, TextSection};

/// Serialize a computed layout to an SVG document.
///
/// The output contains a white background, the title and notes anchored at
/// the margin, each blurb as a multi-line `<text>` element at its resolved
/// box, and each connector as a polyline `<path>`. In debug mode every blurb
/// additionally gets a comment and a grey backing rectangle outlining its
/// box.
pub fn render_svg(layout: &dyn Layout) -> String {
    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
    svg.push_str(&format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        layout.width(),
        layout.height()
    ));

    svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

    let margin = layout.margin();
    let mut text_top = 0;
    let title = layout.title();
    if !title.text.is_empty() {
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" dominant-baseline=\"alphabetic\" text-anchor=\"start\" font-size=\"{}px\">{}</text>\n",
            margin,
            margin + title.style.line_height,
            title.style.font_size,
            escape_xml(&title.text)
        ));
        text_top += title.style.line_height;
    }

    for note in layout.notes() {
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" dominant-baseline=\"alphabetic\" text-anchor=\"start\" font-size=\"{}px\">{}</text>\n",
            margin,
            margin + note.style.line_height + text_top,
            note.style.font_size,
            escape_xml(&note.text)
        ));
        text_top += note.style.line_height;
    }

    for blurb in layout.blurbs() {
        if layout.debug() {
            svg.push_str(&format!(
                "<!-- blurb {} (left={}, top={}, width={}, height={}) -->\n",
                blurb.id, blurb.left, blurb.top, blurb.width, blurb.height
            ));
            svg.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#eeeeee\"/>\n",
                blurb.left, blurb.top, blurb.width, blurb.height
            ));
        }

        let (anchor, text_x) = if blurb.centre_text {
            ("middle", blurb.x())
        } else {
            ("start", blurb.left)
        };
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" dominant-baseline=\"hanging\" text-anchor=\"{}\">\n",
            text_x, blurb.top, anchor
        ));
        push_section(&mut svg, &blurb.heading, text_x);
        push_section(&mut svg, &blurb.details, text_x);
        svg.push_str("</text>\n");
    }

    for connector in layout.connectors() {
        let mut data = String::new();
        for (i, point) in connector.points.iter().enumerate() {
            if i == 0 {
                data.push_str(&format!("M {},{}", point.x, point.y));
            } else {
                data.push_str(&format!(" L {},{}", point.x, point.y));
            }
        }
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"#000000\" stroke-width=\"2\" stroke-linecap=\"butt\" stroke-linejoin=\"miter\"/>\n",
            data
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn push_section(svg: &mut String, section: &TextSection, text_x: i32) {
    for line in &section.lines {
        svg.push_str(&format!(
            "<tspan x=\"{}\" dy=\"{}\" font-size=\"{}px\" fill=\"{}\">{}</tspan>\n",
            text_x,
            section.style.line_height,
            section.style.font_size,
            section.style.color,
            escape_xml(line)
        ));
    }
}

/// Write the SVG to a file, or to stdout when no path is given.
pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{svg}");
        }
    }
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
