use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{Arranger, BlurbId, DescendantLayout, Pixel};

/// Stochastic arrangement by simulated annealing. Blurbs keep their
/// neighbour-relative base positions and carry a mutable horizontal shift;
/// the optimiser perturbs random shifts under a decreasing temperature,
/// minimising the distance cost of the KeepWith/KeepRightOf constraints.
///
/// Always completes its iteration budget and returns a valid, if not
/// cost-optimal, arrangement. Pass a seed for reproducible layouts.
pub struct AnnealingArranger {
    iterations: usize,
    rng: StdRng,
}

impl AnnealingArranger {
    pub fn new(iterations: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { iterations, rng }
    }

    /// Stack rows vertically and thread each row's neighbour chain, then run
    /// a few sweeps pulling blurbs up against their stops so the optimiser
    /// starts from a roughly aligned state.
    fn align(&mut self, layout: &mut DescendantLayout) {
        let hspace = layout.opts.hspace;
        let drop = layout.generation_drop();
        let rows = layout.rows.clone();

        let mut top: Pixel = 0;
        for row in &rows {
            let mut row_height: Pixel = 0;
            for (i, &id) in row.iter().enumerate() {
                {
                    let b = layout.arena.get_mut(id);
                    b.top = top;
                    row_height = row_height.max(b.height);
                }
                if i > 0 {
                    let prev = row[i - 1];
                    let prev_parent = layout.arena.get(prev).parent;
                    let b = layout.arena.get_mut(id);
                    b.left_pad = hspace;
                    b.left_neighbour = Some(prev);

                    // a little more padding between blurbs of different families
                    if b.id > 0
                        && (b.parent.is_some() || prev_parent.is_some())
                        && b.parent != prev_parent
                    {
                        b.left_pad += hspace * 2;
                        if let Some(pp) = prev_parent {
                            b.keep_right_of.push(pp);
                        }
                    }
                }
            }
            top += row_height + drop;
        }

        // get parents roughly aligned over their children
        for _ in 0..3 {
            for row in rows.iter().rev() {
                for &id in row {
                    let (no_shift, left_stop, right_stop) = {
                        let b = layout.arena.get(id);
                        (b.no_shift, b.left_stop, b.right_stop)
                    };
                    if !no_shift
                        && let Some(stop) = left_stop
                    {
                        let diff = layout.arena.x(stop) - layout.arena.x(id);
                        if diff > 0 {
                            layout.arena.get_mut(id).left_shift += diff;
                        }
                    }
                    if let Some(stop) = right_stop {
                        let diff = layout.arena.x(id) - layout.arena.x(stop);
                        if diff > 0 {
                            layout.arena.get_mut(stop).left_shift += diff;
                        }
                    }
                }
            }
        }
    }

    /// Randomly shift one shiftable blurb, returning its id and the shift to
    /// restore on rejection. Proposals that would drive the total shift
    /// negative or jump across a hard stop are rerolled.
    fn jiggle(&mut self, layout: &mut DescendantLayout) -> (BlurbId, Pixel) {
        let id = loop {
            let row = self.rng.random_range(0..layout.rows.len());
            let n = self.rng.random_range(0..layout.rows[row].len());
            let candidate = layout.rows[row][n];
            if !layout.arena.get(candidate).no_shift {
                break candidate;
            }
        };

        let saved = layout.arena.get(id).left_shift;
        let x = layout.arena.x(id);
        let (left_stop, right_stop) = {
            let b = layout.arena.get(id);
            (b.left_stop, b.right_stop)
        };
        let hspace = layout.opts.hspace as f64;

        let mut delta: Pixel = 0;
        loop {
            let mut rejected = delta == 0 || saved + delta < 0;
            if !rejected
                && let Some(stop) = left_stop
            {
                let stop_x = layout.arena.x(stop);
                if x > stop_x && x + delta < stop_x {
                    rejected = true;
                }
            }
            if !rejected
                && let Some(stop) = right_stop
            {
                let stop_x = layout.arena.x(stop);
                if x < stop_x && x + delta > stop_x {
                    rejected = true;
                }
            }
            if !rejected {
                break;
            }
            delta = ((0.5 - self.rng.random::<f64>() * self.rng.random::<f64>()) * hspace) as Pixel;
        }

        layout.arena.get_mut(id).left_shift = saved + delta;
        (id, saved)
    }

    /// Metropolis loop: improvements always stick, regressions survive with
    /// probability exp(-diff / T) under the temperature schedule
    /// T(i) = 10 * iterations / (i + 1).
    fn optimize(&mut self, layout: &mut DescendantLayout) {
        if self.iterations == 0 {
            return;
        }
        let temperature = self.iterations as f64 * 10.0;
        let mut kept_regressions = 0usize;
        for i in 0..self.iterations {
            let before = fitness(layout);
            let (id, saved) = self.jiggle(layout);
            let after = fitness(layout);

            let diff = after - before;
            if diff <= 0 {
                continue;
            }

            let t = temperature / (i as f64 + 1.0);
            let probability = (-(diff as f64) / t).exp();
            if self.rng.random::<f64>() <= probability {
                kept_regressions += 1;
                continue;
            }
            layout.arena.get_mut(id).left_shift = saved;
        }
        log::debug!(
            "annealing finished: iterations={} kept_regressions={} fitness={}",
            self.iterations,
            kept_regressions,
            fitness(layout)
        );
    }
}

impl Arranger for AnnealingArranger {
    fn arrange(&mut self, layout: &mut DescendantLayout) {
        self.align(layout);
        self.optimize(layout);
    }
}

/// Cost of the current arrangement; lower is better. Squared centre distance
/// per KeepWith pair plus a strongly weighted one-sided squared penalty per
/// unsatisfied KeepRightOf pair.
pub(super) fn fitness(layout: &DescendantLayout) -> i64 {
    let mut total: i64 = 0;
    for b in layout.arena.iter() {
        let bx = layout.arena.x(b.id);
        let by = layout.arena.y(b.id);
        for &other in &b.keep_with {
            let dx = (bx - layout.arena.x(other)) as i64;
            let dy = (by - layout.arena.y(other)) as i64;
            total += dx * dx + dy * dy;
        }
        for &other in &b.keep_right_of {
            let deficit = (layout.arena.x(other) - bx).max(0) as i64;
            total += deficit * deficit * 10;
        }
    }
    total
}
