use super::{Arranger, BlurbId, DescendantLayout, Pixel};

/// Deterministic recursive-centering arrangement. Places the deepest row
/// left to right, then works up the rows centering every parent over its
/// children's span, shifting whole subtrees right whenever centering would
/// overlap the running cursor.
pub struct SpreadingArranger;

impl Arranger for SpreadingArranger {
    fn arrange(&mut self, layout: &mut DescendantLayout) {
        place_rows(layout);
        place_deepest_row(layout);
        if layout.rows.len() > 1 {
            centre_over_children(layout);
            close_gaps(layout);
        }
    }
}

/// Stack the rows top to bottom and switch every blurb to absolute
/// positioning.
fn place_rows(layout: &mut DescendantLayout) {
    let drop = layout.generation_drop();
    let mut top: Pixel = 0;
    for row in layout.rows.clone() {
        let mut row_height: Pixel = 0;
        let mut prev: Option<BlurbId> = None;
        for id in row {
            let b = layout.arena.get_mut(id);
            b.absolute = true;
            b.top = top;
            b.left_neighbour = prev;
            prev = Some(id);
            row_height = row_height.max(b.height);
        }
        top += row_height + drop;
    }
}

/// Spread the last row evenly, doubling the gap between blurbs whose parents
/// differ so sibling families stay visually separate.
fn place_deepest_row(layout: &mut DescendantLayout) {
    let hspace = layout.opts.hspace;
    let row = layout.rows[layout.rows.len() - 1].clone();
    let mut left: Pixel = 0;
    let mut prev_parent: Option<BlurbId> = None;
    for (i, &id) in row.iter().enumerate() {
        let parent = layout.arena.get(id).parent;
        if i > 0 {
            left += hspace;
            if parent != prev_parent {
                left += hspace * 2;
            }
        }
        prev_parent = parent;
        let b = layout.arena.get_mut(id);
        b.left = left;
        left += b.width;
    }
}

/// Work up from the second-deepest row spreading out blurbs so subtrees
/// don't overlap. A blurb with children is centred over their span; when
/// that would cross the running cursor the already-placed subtrees from this
/// position onwards move right by the deficit instead.
fn centre_over_children(layout: &mut DescendantLayout) {
    let hspace = layout.opts.hspace;
    for row_idx in (0..layout.rows.len() - 1).rev() {
        let row = layout.rows[row_idx].clone();
        let mut min_left: Pixel = 0;
        let mut prev_parent: Option<BlurbId> = None;
        for (i, &id) in row.iter().enumerate() {
            let parent = layout.arena.get(id).parent;
            if i > 0 {
                min_left += hspace;
                if parent != prev_parent {
                    min_left += hspace * 2;
                }
            }
            prev_parent = parent;

            let (first_child, last_child) = {
                let b = layout.arena.get(id);
                (b.first_child, b.last_child)
            };
            if let (Some(fc), Some(lc)) = (first_child, last_child) {
                let span = layout.arena.get(lc).right() - layout.arena.get(fc).left;
                let mut x = layout.arena.get(fc).left + span / 2;
                x -= layout.arena.get(id).width / 2;

                if x < min_left {
                    for &later in &row[i..] {
                        shift_children(layout, row_idx + 1, later, min_left - x);
                    }
                } else {
                    min_left = x;
                }
            }

            let b = layout.arena.get_mut(id);
            b.left = min_left;
            min_left += b.width;
        }
    }
}

/// Move every blurb parented to `parent` right by `shift`, recursing into
/// their own descendants.
fn shift_children(layout: &mut DescendantLayout, row: usize, parent: BlurbId, shift: Pixel) {
    if row >= layout.rows.len() {
        return;
    }
    let ids = layout.rows[row].clone();
    for id in ids {
        if layout.arena.get(id).parent == Some(parent) {
            layout.arena.get_mut(id).left += shift;
            shift_children(layout, row + 1, id, shift);
        }
    }
}

/// Close up gaps by pulling across any earlier siblings that don't have
/// children of their own.
fn close_gaps(layout: &mut DescendantLayout) {
    let hspace = layout.opts.hspace;
    for row in layout.rows.clone() {
        for i in (1..row.len()).rev() {
            let left_id = row[i - 1];
            let right_id = row[i];
            let childless = layout.arena.get(left_id).first_child.is_none();
            let left_parent = layout.arena.get(left_id).parent;
            let right_parent = layout.arena.get(right_id).parent;
            if childless
                && right_parent.is_some()
                && left_parent.is_some()
                && right_parent == left_parent
            {
                let gap = layout.arena.get(right_id).left - layout.arena.get(left_id).right();
                if gap > hspace {
                    let new_left =
                        layout.arena.get(right_id).left - hspace - layout.arena.get(left_id).width;
                    layout.arena.get_mut(left_id).left = new_left;
                }
            }
        }
    }
}
