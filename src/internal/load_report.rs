#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]

use plotters::prelude::*;
use probemap::{OpenAddressingMap, SeparateChainingMap, StringMap, weighted_hash};
use rand::Rng;

const KEY_COUNT: usize = 5_000;
const INITIAL_CAPACITY: usize = 11;
const SAMPLE_EVERY: usize = 25;

/// Map state observed after one insert
#[derive(Debug, Clone, Copy)]
struct Sample {
    inserted: usize,
    load: f64,
    empty_ratio: f64,
    capacity: usize,
}

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let len = rng.random_range(3..12);
            (0..len).map(|_| char::from(rng.random_range(b'a'..=b'z'))).collect()
        })
        .collect()
}

fn record<M: StringMap<usize>>(map: &mut M, keys: &[String]) -> Vec<Sample> {
    keys.iter()
        .enumerate()
        .map(|(position, key)| {
            map.put(key.clone(), position);
            Sample {
                inserted: position + 1,
                load: map.table_load(),
                empty_ratio: map.empty_buckets() as f64 / map.capacity() as f64,
                capacity: map.capacity(),
            }
        })
        .collect()
}

fn summarize(name: &str, samples: &[Sample]) {
    let resizes = samples
        .windows(2)
        .filter(|pair| matches!(pair, [a, b] if a.capacity != b.capacity))
        .count();
    let peak = samples.iter().map(|s| s.load).fold(0.0, f64::max);
    if let Some(last) = samples.last() {
        println!(
            "{name}: {} inserts, {resizes} resizes, final capacity {}, final load {:.2}, \
             peak load {peak:.2}, empty {:.1}%",
            last.inserted,
            last.capacity,
            last.load,
            last.empty_ratio * 100.0
        );
    }
}

fn plot(
    path: &str,
    caption: &str,
    y_desc: &str,
    series: &[(&str, RGBColor, Vec<(usize, f64)>)],
) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..KEY_COUNT, 0.0..1.05)?;

    chart
        .configure_mesh()
        .x_desc("Keys inserted")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (name, color, points) in series {
        let line_style = ShapeStyle::from(color).stroke_width(2);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), line_style))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

fn points(samples: &[Sample], metric: fn(&Sample) -> f64) -> Vec<(usize, f64)> {
    samples.iter().step_by(SAMPLE_EVERY).map(|s| (s.inserted, metric(s))).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let keys = random_keys(KEY_COUNT);

    let mut open = OpenAddressingMap::new(INITIAL_CAPACITY, weighted_hash);
    let mut chained = SeparateChainingMap::new(INITIAL_CAPACITY, weighted_hash);
    let open_samples = record(&mut open, &keys);
    let chained_samples = record(&mut chained, &keys);

    summarize("quadratic probing", &open_samples);
    summarize("separate chaining", &chained_samples);

    let open_color = RGBColor(220, 50, 50);
    let chained_color = RGBColor(50, 90, 220);

    plot(
        "load_factor.png",
        "Load factor while inserting",
        "size / capacity",
        &[
            ("Quadratic probing", open_color, points(&open_samples, |s| s.load)),
            ("Separate chaining", chained_color, points(&chained_samples, |s| s.load)),
        ],
    )?;
    plot(
        "empty_buckets.png",
        "Empty buckets while inserting",
        "empty buckets / capacity",
        &[
            ("Quadratic probing", open_color, points(&open_samples, |s| s.empty_ratio)),
            ("Separate chaining", chained_color, points(&chained_samples, |s| s.empty_ratio)),
        ],
    )?;

    println!("Generated plot images: load_factor.png, empty_buckets.png");
    Ok(())
}
