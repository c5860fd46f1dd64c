pub mod chart;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;

pub use chart::{AncestorChart, AncestorPerson, DescendantChart, Family, Person};
pub use config::{
    AncestorLayoutOptions, ArrangeStrategy, LayoutOptions, TextStyle, load_layout_options,
};
pub use layout::{
    AncestorLayout, Blurb, Connector, DescendantLayout, Layout, Pixel, Point, TextElement,
};
pub use parser::{ParseError, parse_descendant_chart};
pub use render::{render_svg, write_output_svg};

#[cfg(feature = "cli")]
pub use cli::run;
