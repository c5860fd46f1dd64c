use std::path::Path;

use kintree::{
    ArrangeStrategy, DescendantChart, Layout, LayoutOptions, Person, parse_descendant_chart,
    render_svg,
};

// Keep this list explicit so new fixtures must be added intentionally.
const FIXTURES: [&str; 3] = ["simple.txt", "ancestry.txt", "gramps.txt"];

fn read_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|err| panic!("fixture {name} unreadable: {err}"))
}

fn options(strategy: ArrangeStrategy) -> LayoutOptions {
    LayoutOptions {
        strategy,
        // keep annealing runs quick and reproducible
        iterations: 2000,
        seed: Some(7),
        ..LayoutOptions::default()
    }
}

/// Depth of every person in the chart, in (id, depth) pairs.
fn person_depths(chart: &DescendantChart) -> Vec<(i32, usize)> {
    fn walk(person: &Person, depth: usize, out: &mut Vec<(i32, usize)>) {
        out.push((person.id, depth));
        for family in &person.families {
            if let Some(spouse) = &family.spouse {
                walk(spouse, depth, out);
            }
            for child in &family.children {
                walk(child, depth + 1, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(&chart.root, 0, &mut out);
    out
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
}

#[test]
fn render_all_fixtures() {
    for fixture in FIXTURES {
        let input = read_fixture(fixture);
        let chart = parse_descendant_chart(&input)
            .unwrap_or_else(|err| panic!("{fixture}: parse failed: {err}"));

        for strategy in [ArrangeStrategy::Spreading, ArrangeStrategy::Annealing] {
            let layout = chart.layout(&options(strategy));
            let svg = render_svg(&layout);
            assert_valid_svg(&svg, fixture);
            assert!(layout.width() > 0, "{fixture}: zero width");
            assert!(layout.height() > 0, "{fixture}: zero height");
        }
    }
}

#[test]
fn blurb_rows_equal_person_depths() {
    for fixture in FIXTURES {
        let input = read_fixture(fixture);
        let chart = parse_descendant_chart(&input).unwrap();
        let depths = person_depths(&chart);
        let max_depth = depths.iter().map(|(_, d)| *d).max().unwrap();

        let layout = chart.layout(&options(ArrangeStrategy::Spreading));
        assert_eq!(layout.rows().len(), max_depth + 1, "{fixture}: row count");
        for (id, depth) in depths {
            let blurb = layout
                .blurb(id)
                .unwrap_or_else(|| panic!("{fixture}: person {id} has no blurb"));
            assert_eq!(blurb.row, depth, "{fixture}: person {id}");
        }
    }
}

#[test]
fn connectors_match_parented_blurbs() {
    for fixture in FIXTURES {
        let input = read_fixture(fixture);
        let chart = parse_descendant_chart(&input).unwrap();

        for strategy in [ArrangeStrategy::Spreading, ArrangeStrategy::Annealing] {
            let layout = chart.layout(&options(strategy));
            let with_parent = layout
                .blurbs()
                .iter()
                .filter(|blurb| blurb.parent.is_some())
                .count();
            assert_eq!(layout.connectors().len(), with_parent, "{fixture}");
        }
    }
}

#[test]
fn spreading_keeps_siblings_apart() {
    for fixture in FIXTURES {
        let input = read_fixture(fixture);
        let chart = parse_descendant_chart(&input).unwrap();
        let layout = chart.layout(&options(ArrangeStrategy::Spreading));

        for row in layout.rows() {
            for pair in row.windows(2) {
                let left = layout.blurb(pair[0]).unwrap();
                let right = layout.blurb(pair[1]).unwrap();
                if left.parent.is_some() && left.parent == right.parent {
                    assert!(
                        right.left >= left.right(),
                        "{fixture}: siblings {} and {} overlap",
                        left.id,
                        right.id
                    );
                }
            }
        }
    }
}

#[test]
fn simple_family_end_to_end() {
    let input = read_fixture("simple.txt");
    let chart = parse_descendant_chart(&input).unwrap();
    let layout = chart.layout(&options(ArrangeStrategy::Spreading));

    // root, marker, partner and two children; connectors only for the
    // children
    assert_eq!(layout.blurbs().len(), 5);
    assert_eq!(layout.connectors().len(), 2);
    assert_eq!(layout.blurb(1).unwrap().row, 0);
    assert_eq!(layout.blurb(-2).unwrap().row, 0);
    assert_eq!(layout.blurb(2).unwrap().row, 0);
    assert_eq!(layout.blurb(3).unwrap().row, 1);
    assert_eq!(layout.blurb(4).unwrap().row, 1);
}

#[test]
fn marker_labels_number_multiple_families() {
    let input = read_fixture("gramps.txt");
    let chart = parse_descendant_chart(&input).unwrap();
    let layout = chart.layout(&options(ArrangeStrategy::Spreading));

    // Fiona has three recorded marriages
    assert_eq!(layout.blurb(-2).unwrap().heading.lines, vec!["= (1)"]);
    let svg = render_svg(&layout);
    assert!(svg.contains("= (2)"));
    assert!(svg.contains("= (3)"));
}
