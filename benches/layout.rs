use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use kintree::{
    ArrangeStrategy, DescendantChart, Family, LayoutOptions, Person, parse_descendant_chart,
    render_svg,
};

const ANCESTRY_FIXTURE: &str = include_str!("../tests/fixtures/ancestry.txt");

/// Build a balanced chart with the given number of generations; every person
/// below the last generation has a partner and `children` children.
fn synthetic_chart(generations: usize, children: usize) -> DescendantChart {
    fn build(next_id: &mut i32, depth: usize, generations: usize, children: usize) -> Person {
        let id = *next_id;
        *next_id += 1;
        let mut person = Person::new(
            id,
            vec![
                format!("Person {id}"),
                "b. 25 Oct 1850, Norton, Somerset, England".to_string(),
                "d. 12 Dec 1914".to_string(),
            ],
        );
        if depth + 1 < generations {
            let spouse_id = *next_id;
            *next_id += 1;
            let spouse = Person::new(spouse_id, vec![format!("Partner {spouse_id}")]);
            let kids = (0..children)
                .map(|_| build(next_id, depth + 1, generations, children))
                .collect();
            person.families.push(Family {
                spouse: Some(spouse),
                details: vec!["m. 14 Aug 1875".to_string()],
                children: kids,
            });
        }
        person
    }

    let mut next_id = 1;
    DescendantChart::new(build(&mut next_id, 0, generations, children))
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse/ancestry", |b| {
        b.iter(|| parse_descendant_chart(black_box(ANCESTRY_FIXTURE)).unwrap())
    });
}

fn bench_spreading(c: &mut Criterion) {
    let chart = synthetic_chart(5, 3);
    let opts = LayoutOptions::default();
    c.bench_function("layout/spreading", |b| {
        b.iter(|| black_box(&chart).layout(&opts))
    });
}

fn bench_annealing(c: &mut Criterion) {
    let chart = synthetic_chart(4, 2);
    let opts = LayoutOptions {
        strategy: ArrangeStrategy::Annealing,
        iterations: 2000,
        seed: Some(1),
        ..LayoutOptions::default()
    };
    c.bench_function("layout/annealing-2k", |b| {
        b.iter(|| black_box(&chart).layout(&opts))
    });
}

fn bench_render(c: &mut Criterion) {
    let chart = synthetic_chart(5, 3);
    let layout = chart.layout(&LayoutOptions::default());
    c.bench_function("render/svg", |b| b.iter(|| render_svg(black_box(&layout))));
}

criterion_group!(
    benches,
    bench_parse,
    bench_spreading,
    bench_annealing,
    bench_render
);
criterion_main!(benches);
