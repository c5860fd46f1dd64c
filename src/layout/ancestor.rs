use crate::chart::{AncestorChart, AncestorPerson};
use crate::config::AncestorLayoutOptions;

use super::blurb::{Blurb, BlurbArena, BlurbId, Connector, TextSection};
use super::text::{text_width, title_dimensions, wrap_text};
use super::{Layout, Pixel, Point, TextElement};

/// Expected population of a grid column: 1 root, 2 parents, 4 grandparents...
fn column_population(col: usize) -> usize {
    1 << col
}

impl AncestorChart {
    /// Lay out the chart as a binary generation grid: the root person in the
    /// first column, each next column holding father/mother pairs and
    /// halving the vertical space per person.
    pub fn layout(&self, opts: &AncestorLayoutOptions) -> AncestorLayout {
        let mut layout = AncestorLayout {
            title: self.title.clone(),
            notes: self.notes.clone(),
            width: 0,
            height: 0,
            opts: opts.clone(),
            arena: BlurbArena::default(),
            grid: Vec::new(),
            connectors: Vec::new(),
        };

        log::debug!("ancestor chart generations: {}", self.root.generations());

        layout.add_person(&self.root, 0, 0);
        layout.position_grid();
        layout.build_connectors();
        layout
    }
}

/// The computed layout of an ancestor chart.
pub struct AncestorLayout {
    title: String,
    notes: Vec<String>,
    width: Pixel,
    height: Pixel,

    opts: AncestorLayoutOptions,

    arena: BlurbArena,
    /// Blurb ids by column then row; column populations are 2^col with gaps
    /// for unknown ancestors.
    grid: Vec<Vec<Option<BlurbId>>>,
    connectors: Vec<Connector>,
}

impl AncestorLayout {
    pub fn blurb(&self, id: BlurbId) -> Option<&Blurb> {
        self.arena.lookup(id)
    }

    pub fn grid(&self) -> &[Vec<Option<BlurbId>>] {
        &self.grid
    }

    fn add_person(&mut self, person: &AncestorPerson, col: usize, row: usize) -> BlurbId {
        let id = self.new_blurb(person.id, &person.details, col);

        while self.grid.len() <= col {
            let population = column_population(self.grid.len());
            self.grid.push(vec![None; population]);
        }
        self.grid[col][row] = Some(id);

        // father above, mother below
        if let Some(father) = &person.father {
            self.add_person(father, col + 1, row * 2);
        }
        if let Some(mother) = &person.mother {
            self.add_person(mother, col + 1, row * 2 + 1);
        }

        id
    }

    fn new_blurb(&mut self, id: BlurbId, texts: &[String], col: usize) -> BlurbId {
        let mut heading_lines = Vec::new();
        let mut detail_lines = Vec::new();
        if let Some((first, rest)) = texts.split_first() {
            heading_lines.push(first.clone());
            detail_lines = wrap_text(
                rest,
                self.opts.detail_wrap_width,
                self.opts.detail_style.font_size,
            );
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
            row: col,
            absolute: true,
            left: 0,
            top: 0,
            left_pad: 0,
            left_shift: 0,
            no_shift: false,
            left_neighbour: None,
            parent: None,
            first_child: None,
            last_child: None,
            left_stop: None,
            right_stop: None,
            keep_with: Vec::new(),
            keep_right_of: Vec::new(),
            top_hook_offset: 0,
            side_hook_offset: self.opts.heading_style.line_height * 2 / 3,
        };
        self.arena.insert(blurb);
        id
    }

    /// Size the columns, centre every blurb within its binary division of
    /// the grid height, then shift the drawing for the margin and title.
    fn position_grid(&mut self) {
        let mut grid_height: Pixel = 0;
        let mut grid_width: Pixel = 0;
        let mut col_widths: Vec<Pixel> = vec![0; self.grid.len()];

        for (col, cells) in self.grid.iter().enumerate() {
            let population = column_population(col);

            let mut largest_height: Pixel = 0;
            let mut largest_width: Pixel = 0;
            for id in cells.iter().flatten() {
                let b = self.arena.get(*id);
                largest_height = largest_height.max(b.height);
                largest_width = largest_width.max(b.width);
            }
            col_widths[col] = largest_width + self.opts.hspace;

            // equal vertical space per blurb, vspace between the partners of
            // a pair and twice that between pairs
            let mut col_height = population as Pixel * largest_height;
            if population > 1 {
                col_height += population as Pixel / 2 * self.opts.vspace;
            }
            if population > 2 {
                col_height += (population as Pixel / 2 - 1) * self.opts.vspace * 2;
            }

            grid_height = grid_height.max(col_height);
            grid_width += col_widths[col];
        }

        if self.opts.debug {
            log::debug!(
                "ancestor grid: cols={} width={} height={}",
                self.grid.len(),
                grid_width,
                grid_height
            );
        }

        let mut lowest_top = Pixel::MAX;
        let mut x = self.opts.margin;
        // number of divisions doubles per column: the first column spans the
        // entire height, the second splits it in two, and so on
        let mut divisions: Pixel = 1;
        for (col, cells) in self.grid.clone().iter().enumerate() {
            let spacing = grid_height / divisions;
            for (row, cell) in cells.iter().enumerate() {
                let Some(id) = cell else { continue };
                let b = self.arena.get_mut(*id);
                b.left = x;
                let division_top = self.opts.margin + spacing * row as Pixel;
                b.top = division_top + spacing / 2 - b.height / 2;
                lowest_top = lowest_top.min(b.top);
            }
            x += col_widths[col];
            divisions *= 2;
        }

        self.width = grid_width + self.opts.margin * 2;
        self.height = grid_height;

        // remove any empty space at the top
        if lowest_top != Pixel::MAX && lowest_top > 0 {
            self.height -= lowest_top;
            for b in self.arena.iter_mut() {
                b.top -= lowest_top;
            }
        }

        // make room for the title block
        let (title_height, _) = title_dimensions(
            &self.title,
            &self.notes,
            &self.opts.title_style,
            &self.opts.note_style,
        );
        let headroom = title_height + self.opts.vspace * 4;
        self.height += headroom;
        for b in self.arena.iter_mut() {
            b.top += headroom;
        }
    }

    /// Hook every parent blurb back to its child in the previous column.
    fn build_connectors(&mut self) {
        let gap = self.opts.line_gap;
        let hook = self.opts.hook_length;
        let hspace = self.opts.hspace;

        let mut connectors = Vec::new();
        for (col, cells) in self.grid.iter().enumerate() {
            if col == 0 {
                continue;
            }
            for (row, cell) in cells.iter().enumerate() {
                let Some(id) = cell else { continue };
                let parent = self.arena.get(*id);
                let child_id = self.grid[col - 1][row / 2].expect("parent without child cell");
                let child = self.arena.get(child_id);

                connectors.push(Connector {
                    points: vec![
                        Point {
                            x: parent.left - gap,
                            y: parent.side_hook_y(),
                        },
                        Point {
                            x: parent.left - gap - hook,
                            y: parent.side_hook_y(),
                        },
                        Point {
                            x: parent.left - gap - hook,
                            y: child.side_hook_y(),
                        },
                        Point {
                            x: parent.left - gap - hook - hspace,
                            y: child.side_hook_y(),
                        },
                    ],
                });
            }
        }
        self.connectors = connectors;
    }
}

impl Layout for AncestorLayout {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn ancestor(id: i32, name: &str) -> AncestorPerson {
        AncestorPerson::new(id, vec![name.to_string(), "b. 1800".to_string()])
    }

    fn three_generations() -> AncestorChart {
        let mut father = ancestor(2, "Father Smith");
        father.father = Some(Box::new(ancestor(4, "Grandfather Smith")));
        father.mother = Some(Box::new(ancestor(5, "Grandmother Smith")));
        let mut root = ancestor(1, "Person Smith");
        root.father = Some(Box::new(father));
        root.mother = Some(Box::new(ancestor(3, "Mother Jones")));
        AncestorChart::new(root)
    }

    #[test]
    fn grid_places_father_above_mother() {
        let layout = three_generations().layout(&AncestorLayoutOptions::default());
        let grid = layout.grid();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec![Some(1)]);
        assert_eq!(grid[1], vec![Some(2), Some(3)]);
        assert_eq!(grid[2], vec![Some(4), Some(5), None, None]);

        let father = layout.blurb(2).unwrap();
        let mother = layout.blurb(3).unwrap();
        assert!(father.bottom() <= mother.top);
    }

    #[test]
    fn columns_advance_left_to_right() {
        let layout = three_generations().layout(&AncestorLayoutOptions::default());
        let root = layout.blurb(1).unwrap();
        let father = layout.blurb(2).unwrap();
        let grandfather = layout.blurb(4).unwrap();
        assert!(father.left > root.right());
        assert!(grandfather.left > father.right());
    }

    #[test]
    fn one_connector_per_non_root_ancestor() {
        let layout = three_generations().layout(&AncestorLayoutOptions::default());
        assert_eq!(layout.blurbs().len(), 5);
        assert_eq!(layout.connectors().len(), 4);

        // each connector hooks leftwards from the parent towards the child
        for connector in layout.connectors() {
            let points = &connector.points;
            assert_eq!(points.len(), 4);
            assert!(points[1].x < points[0].x);
            assert!(points[3].x < points[0].x);
        }
    }

    #[test]
    fn title_pushes_the_grid_down() {
        let mut chart = three_generations();
        let opts = AncestorLayoutOptions::default();
        let untitled = chart.layout(&opts);
        chart.title = "Ancestors of Person Smith".to_string();
        let titled = chart.layout(&opts);

        let delta = opts.title_style.line_height;
        assert_eq!(titled.height() - untitled.height(), delta);
        assert_eq!(
            titled.blurb(1).unwrap().top - untitled.blurb(1).unwrap().top,
            delta
        );
    }

    #[test]
    fn lone_root_lays_out_without_connectors() {
        let chart = AncestorChart::new(ancestor(1, "Only Person"));
        let layout = chart.layout(&AncestorLayoutOptions::default());
        assert_eq!(layout.blurbs().len(), 1);
        assert!(layout.connectors().is_empty());
        assert!(layout.width() > 0);
        assert!(layout.height() > 0);
    }
}
