use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::layout::Layout;

/// JSON-serializable snapshot of a computed layout, for debugging placement
/// issues without reading SVG coordinates by hand.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: i32,
    pub height: i32,
    pub title: String,
    pub notes: Vec<String>,
    pub blurbs: Vec<BlurbDump>,
    pub connectors: Vec<ConnectorDump>,
}

#[derive(Debug, Serialize)]
pub struct BlurbDump {
    pub id: i32,
    pub row: usize,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    pub heading_lines: Vec<String>,
    pub detail_lines: Vec<String>,
    pub centre_text: bool,
    pub parent: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub points: Vec<[i32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &dyn Layout) -> Self {
        let blurbs = layout
            .blurbs()
            .into_iter()
            .map(|blurb| BlurbDump {
                id: blurb.id,
                row: blurb.row,
                left: blurb.left,
                top: blurb.top,
                width: blurb.width,
                height: blurb.height,
                heading_lines: blurb.heading.lines.clone(),
                detail_lines: blurb.details.lines.clone(),
                centre_text: blurb.centre_text,
                parent: blurb.parent,
            })
            .collect();

        let connectors = layout
            .connectors()
            .iter()
            .map(|connector| ConnectorDump {
                points: connector.points.iter().map(|p| [p.x, p.y]).collect(),
            })
            .collect();

        LayoutDump {
            width: layout.width(),
            height: layout.height(),
            title: layout.title().text,
            notes: layout.notes().into_iter().map(|n| n.text).collect(),
            blurbs,
            connectors,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &dyn Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{DescendantChart, Family, Person};
    use crate::config::LayoutOptions;

    #[test]
    fn dump_round_trips_through_json() {
        let mut root = Person::new(1, vec!["Person One".to_string()]);
        root.families.push(Family {
            children: vec![Person::new(2, vec!["Person Two".to_string()])],
            ..Family::default()
        });
        let layout = DescendantChart::new(root).layout(&LayoutOptions::default());

        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.blurbs.len(), 2);
        assert_eq!(dump.connectors.len(), 1);

        let json = serde_json::to_string(&dump).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["blurbs"].as_array().unwrap().len(), 2);
        assert_eq!(value["width"], serde_json::json!(layout.width()));
    }
}
