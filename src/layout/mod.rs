mod annealing;
pub mod ancestor;
mod blurb;
mod spreading;
mod text;

pub use ancestor::AncestorLayout;
pub use annealing::AnnealingArranger;
pub use blurb::{Blurb, BlurbArena, BlurbId, Connector, TextSection};
pub use spreading::SpreadingArranger;
pub use text::{text_width, wrap_text};

use crate::chart::{DescendantChart, Person};
use crate::config::{ArrangeStrategy, LayoutOptions, TextStyle};
use text::title_dimensions;

/// Unit of measurement for all layout dimensions: integer pixel equivalents.
pub type Pixel = i32;

/// A coordinate in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: Pixel,
    pub y: Pixel,
}

/// A run of single-line text with its style, used for titles and notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextElement {
    pub text: String,
    pub style: TextStyle,
}

/// The geometry a renderer needs from a computed chart layout: overall
/// dimensions, the title block, the flat blurb set with resolved positions
/// and the connector polylines. Implemented by both chart layouts.
pub trait Layout {
    fn width(&self) -> Pixel;
    fn height(&self) -> Pixel;
    fn margin(&self) -> Pixel;
    fn title(&self) -> TextElement;
    fn notes(&self) -> Vec<TextElement>;
    fn blurbs(&self) -> Vec<&Blurb>;
    fn connectors(&self) -> &[Connector];
    fn debug(&self) -> bool;
}

/// An arrangement algorithm assigning horizontal positions to the blurbs of
/// a descendant layout. Vertical positions, recentering and connector
/// synthesis are shared by all arrangers.
pub trait Arranger {
    fn arrange(&mut self, layout: &mut DescendantLayout);
}

impl DescendantChart {
    /// Lay out the chart. Walks the person tree building per-row blurb lists
    /// and the constraint graph, runs the configured arranger, then recentres
    /// the drawing and computes the connecting lines.
    pub fn layout(&self, opts: &LayoutOptions) -> DescendantLayout {
        let mut layout = DescendantLayout::build(self, opts);
        log::debug!(
            "arranging {} blurbs in {} rows with {:?}",
            layout.arena.len(),
            layout.rows.len(),
            opts.strategy
        );
        match opts.strategy {
            ArrangeStrategy::Spreading => SpreadingArranger.arrange(&mut layout),
            ArrangeStrategy::Annealing => {
                AnnealingArranger::new(opts.iterations, opts.seed).arrange(&mut layout)
            }
        }
        layout.finish();
        layout
    }
}

/// The computed layout of a descendant chart.
pub struct DescendantLayout {
    title: String,
    notes: Vec<String>,
    width: Pixel,
    height: Pixel,
    /// Vertical distance between generation rows.
    generation_drop: Pixel,

    pub(crate) opts: LayoutOptions,

    pub(crate) arena: BlurbArena,
    pub(crate) rows: Vec<Vec<BlurbId>>,
    connectors: Vec<Connector>,
}

impl DescendantLayout {
    /// Walk the chart into blurb rows and constraints without arranging.
    pub(crate) fn build(chart: &DescendantChart, opts: &LayoutOptions) -> Self {
        let mut layout = Self {
            title: chart.title.clone(),
            notes: chart.notes.clone(),
            width: 0,
            height: 0,
            generation_drop: opts.line_width
                + opts.line_gap * 2
                + opts.child_drop
                + opts.family_drop,
            opts: opts.clone(),
            arena: BlurbArena::default(),
            rows: Vec::new(),
            connectors: Vec::new(),
        };
        layout.add_person(&chart.root, 0, None);
        layout
    }

    /// Look up a blurb by id. Person blurbs carry positive ids, relationship
    /// markers the negated id of the partner.
    pub fn blurb(&self, id: BlurbId) -> Option<&Blurb> {
        self.arena.lookup(id)
    }

    /// Blurb ids per generation row, root row first.
    pub fn rows(&self) -> &[Vec<BlurbId>] {
        &self.rows
    }

    pub(crate) fn generation_drop(&self) -> Pixel {
        self.generation_drop
    }

    /// Add a person and their families to the layout at the given row,
    /// wiring the placement constraints between the person, the relationship
    /// markers, the partners and the children.
    fn add_person(&mut self, person: &Person, row: usize, parent: Option<BlurbId>) -> BlurbId {
        let b = self.new_blurb(person.id, &person.headings, &person.details, row, parent);

        let mut prev_spouse_with_children: Option<BlurbId> = None;
        let mut last_child_of_prev_family: Option<BlurbId> = None;

        for (fi, family) in person.families.iter().enumerate() {
            let mut marker_label = String::from("=");
            if person.families.len() > 1 {
                marker_label.push_str(&format!(" ({})", fi + 1));
            }
            let mut marker_details = vec![marker_label];
            marker_details.extend(family.details.iter().cloned());

            let mut rel: Option<BlurbId> = None;
            let mut sp: Option<BlurbId> = None;
            let fam_centre;
            let fam_rightmost;
            if let Some(spouse) = &family.spouse {
                let r = self.new_blurb(-spouse.id, &[], &marker_details, row, None);
                self.arena.get_mut(r).centre_text = true;

                // keep person and partner tight to the marker between them
                self.keep_with(b, r);

                let s = self.add_person(spouse, row, None);
                self.arena.get_mut(s).no_shift = true;
                self.keep_with(s, r);

                rel = Some(r);
                sp = Some(s);
                fam_centre = r;
                fam_rightmost = s;
            } else {
                fam_centre = b;
                fam_rightmost = b;
            }

            if !family.children.is_empty()
                && let Some(last_child) = last_child_of_prev_family
            {
                // keep the marker right of the previous family's last child
                // to avoid merging of descent lines
                self.arena.get_mut(fam_centre).keep_right_of.push(last_child);
            }

            let mut prev_child: Option<BlurbId> = None;
            let child_count = family.children.len();
            for (ci, child) in family.children.iter().enumerate() {
                let c = self.add_person(child, row + 1, Some(fam_centre));
                if self.arena.get(b).first_child.is_none() {
                    self.arena.get_mut(b).first_child = Some(c);
                }
                self.arena.get_mut(b).last_child = Some(c);

                if let Some(r) = rel {
                    self.keep_with(c, r);

                    // keep the marker right of the first child when there are
                    // several, so the descent line fans out from inside the span
                    if ci == 0 && child_count > 1 {
                        self.arena.get_mut(r).keep_right_of.push(c);
                    }
                } else {
                    self.keep_with(c, b);
                }

                if let Some(pc) = prev_child {
                    self.arena.get_mut(c).keep_with.push(pc);
                }
                prev_child = Some(c);

                if self.opts.keep_with_ancestors
                    && let Some(gp) = parent
                {
                    self.keep_with(c, gp);
                }

                if self.arena.get(b).left_stop.is_none() {
                    self.arena.get_mut(b).left_stop = Some(c);
                }
                self.arena.get_mut(b).right_stop = Some(c);

                if let Some(s) = sp
                    && self.arena.get(s).left_stop.is_none()
                {
                    self.arena.get_mut(s).left_stop = Some(c);
                }
                if let Some(r) = rel
                    && self.arena.get(r).left_stop.is_none()
                {
                    self.arena.get_mut(r).left_stop = Some(c);
                }

                // keep children of later families right of the previous
                // family-with-children's rightmost blurb
                if fi > 0
                    && let Some(ps) = prev_spouse_with_children
                {
                    self.arena.get_mut(c).keep_right_of.push(ps);
                }

                if ci == child_count - 1 {
                    last_child_of_prev_family = Some(c);
                }
            }

            if !family.children.is_empty() {
                prev_spouse_with_children = Some(fam_rightmost);
            }
        }

        b
    }

    fn keep_with(&mut self, a: BlurbId, b: BlurbId) {
        self.arena.get_mut(a).keep_with.push(b);
        self.arena.get_mut(b).keep_with.push(a);
    }

    /// Create a blurb from heading/detail text, size it, and append it to
    /// its row. When no explicit headings are given the first wrapped text
    /// line becomes the heading.
    fn new_blurb(
        &mut self,
        id: BlurbId,
        headings: &[String],
        texts: &[String],
        row: usize,
        parent: Option<BlurbId>,
    ) -> BlurbId {
        let wrapped = wrap_text(
            texts,
            self.opts.detail_wrap_width,
            self.opts.detail_style.font_size,
        );

        let heading_lines: Vec<String>;
        let detail_lines: Vec<String>;
        if headings.is_empty() {
            let mut lines = wrapped.into_iter();
            heading_lines = vec![lines.next().unwrap_or_default()];
            detail_lines = lines.collect();
        } else {
            heading_lines = headings.to_vec();
            detail_lines = wrapped;
        }

        let mut height = self.opts.heading_style.line_height * heading_lines.len() as Pixel;
        height += self.opts.detail_style.line_height * detail_lines.len() as Pixel;

        let mut width: Pixel = 0;
        for line in &heading_lines {
            width = width.max(text_width(line, self.opts.heading_style.font_size));
        }
        for line in &detail_lines {
            width = width.max(text_width(line, self.opts.detail_style.font_size));
        }

        let blurb = Blurb {
            id,
            heading: TextSection {
                lines: heading_lines,
                style: self.opts.heading_style.clone(),
            },
            details: TextSection {
                lines: detail_lines,
                style: self.opts.detail_style.clone(),
            },
            centre_text: false,
            width,
            height,
            row,
            absolute: false,
            left: 0,
            top: 0,
            left_pad: 0,
            left_shift: 0,
            no_shift: false,
            left_neighbour: None,
            parent,
            first_child: None,
            last_child: None,
            left_stop: None,
            right_stop: None,
            keep_with: Vec::new(),
            keep_right_of: Vec::new(),
            top_hook_offset: self.opts.hspace * 2,
            side_hook_offset: self.opts.heading_style.line_height / 2,
        };
        self.arena.insert(blurb);

        while self.rows.len() <= row {
            self.rows.push(Vec::new());
        }
        self.rows[row].push(id);

        id
    }

    /// Shared tail of every arrangement: pin down absolute positions,
    /// recentre the drawing and rebuild the connectors.
    pub(crate) fn finish(&mut self) {
        self.resolve_positions();
        self.recentre();
        self.build_connectors();
    }

    /// Convert any relatively positioned blurbs to absolute coordinates so
    /// the renderer never has to walk neighbour chains.
    fn resolve_positions(&mut self) {
        for row in self.rows.clone() {
            for id in row {
                let left = self.arena.left(id);
                let b = self.arena.get_mut(id);
                b.left = left;
                b.absolute = true;
            }
        }
    }

    /// Translate all blurbs so the margin-expanded bounding box, including
    /// room for the title block, has its origin at (0,0).
    fn recentre(&mut self) {
        if self.arena.is_empty() {
            return;
        }

        let mut min_x = Pixel::MAX;
        let mut max_x = Pixel::MIN;
        let mut min_y = Pixel::MAX;
        let mut max_y = Pixel::MIN;
        for b in self.arena.iter() {
            if self.opts.debug {
                log::debug!(
                    "blurb {}: l={} r={} t={} b={}",
                    b.id,
                    b.left,
                    b.right(),
                    b.top,
                    b.bottom()
                );
            }
            min_x = min_x.min(b.left);
            max_x = max_x.max(b.right());
            min_y = min_y.min(b.top);
            max_y = max_y.max(b.bottom());
        }

        min_x -= self.opts.margin;
        max_x += self.opts.margin;
        min_y -= self.opts.margin;
        max_y += self.opts.margin;

        let (title_height, _) = title_dimensions(
            &self.title,
            &self.notes,
            &self.opts.title_style,
            &self.opts.note_style,
        );
        min_y -= title_height;

        for b in self.arena.iter_mut() {
            b.left -= min_x;
            b.top -= min_y;
        }

        self.width = max_x - min_x;
        self.height = max_y - min_y;
    }

    /// Emit one polyline per blurb with a parent: a hook just above the
    /// blurb, up by the child drop, across to the parent's centre and up to
    /// the parent's bottom edge. A person parent with a single child gets a
    /// plain vertical line since the hook already falls within its span.
    fn build_connectors(&mut self) {
        let gap = self.opts.line_gap;
        let drop = self.opts.child_drop;

        let mut connectors = Vec::new();
        for b in self.arena.iter() {
            let Some(parent_id) = b.parent else {
                continue;
            };
            let parent = self.arena.get(parent_id);
            if parent.id > 0 && parent.first_child.is_some() && parent.first_child == parent.last_child
            {
                connectors.push(Connector {
                    points: vec![
                        Point { x: b.top_hook_x(), y: b.top - gap },
                        Point { x: b.top_hook_x(), y: parent.bottom() + gap },
                    ],
                });
            } else {
                connectors.push(Connector {
                    points: vec![
                        Point { x: b.top_hook_x(), y: b.top - gap },
                        Point { x: b.top_hook_x(), y: b.top - gap - drop },
                        Point { x: parent.x(), y: b.top - gap - drop },
                        Point { x: parent.x(), y: parent.bottom() + gap },
                    ],
                });
            }
        }
        self.connectors = connectors;
    }
}

impl Layout for DescendantLayout {
    fn width(&self) -> Pixel {
        self.width
    }

    fn height(&self) -> Pixel {
        self.height
    }

    fn margin(&self) -> Pixel {
        self.opts.margin
    }

    fn title(&self) -> TextElement {
        TextElement {
            text: self.title.clone(),
            style: self.opts.title_style.clone(),
        }
    }

    fn notes(&self) -> Vec<TextElement> {
        self.notes
            .iter()
            .map(|note| TextElement {
                text: note.clone(),
                style: self.opts.note_style.clone(),
            })
            .collect()
    }

    fn blurbs(&self) -> Vec<&Blurb> {
        self.arena.iter().collect()
    }

    fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    fn debug(&self) -> bool {
        self.opts.debug
    }
}
