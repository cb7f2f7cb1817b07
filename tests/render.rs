//! Full-render scenarios across the chart kinds.

use svgplot::{Bar, BarStack, Chart, ChartError, Dataset, Line, Pie, Plot, Schedule, TimeSeries};

/// Pull an attribute value out of every element chunk whose class
/// matches.
fn attr_values(svg: &str, element: &str, class_prefix: &str, attr: &str) -> Vec<f64> {
    svg.split(&format!("<{} ", element))
        .skip(1)
        .filter(|chunk| {
            chunk
                .split("class=\"")
                .nth(1)
                .and_then(|c| c.split('"').next())
                .is_some_and(|c| c.starts_with(class_prefix))
        })
        .filter_map(|chunk| {
            chunk
                .split(&format!("{}=\"", attr))
                .nth(1)
                .and_then(|v| v.split('"').next())
                .and_then(|v| v.parse().ok())
        })
        .collect()
}

#[test]
fn bar_round_trip_ticks_offsets_and_heights() {
    let mut chart = Bar::vertical(["a", "b", "c"]);
    chart.config.key = false;
    chart.config.show_data_values = false;
    chart.config.min_scale_value = Some(0.0);
    chart.scale_divisions = Some(1.0);
    chart
        .add_data(Dataset::from_values("A", [1.0, 2.0, 3.0]))
        .unwrap();
    let svg = chart.render().unwrap();

    // exactly 4 ticks at 0, 1, 2, 3
    assert_eq!(svg.matches("class=\"yAxisLabels\"").count(), 4);
    for label in ["0", "1", "2", "3"] {
        assert!(svg.contains(&format!(">{}</text>", label)));
    }

    // one rectangle per field at increasing x offsets
    let xs = attr_values(&svg, "rect", "fill", "x");
    assert_eq!(xs.len(), 3);
    assert!(xs.windows(2).all(|w| w[1] > w[0]));

    // heights proportional to 1, 2, 3
    let heights = attr_values(&svg, "rect", "fill", "height");
    assert!((heights[1] / heights[0] - 2.0).abs() < 0.01);
    assert!((heights[2] / heights[0] - 3.0).abs() < 0.01);
}

#[test]
fn stacked_bars_tile_without_overlap() {
    let mut chart = Bar::vertical(["x", "y"]);
    chart.config.key = false;
    chart.config.show_data_values = false;
    chart.stack = BarStack::Top;
    chart.add_data(Dataset::from_values("a", [2.0, 1.0])).unwrap();
    chart.add_data(Dataset::from_values("b", [1.0, 2.0])).unwrap();
    let svg = chart.render().unwrap();

    let ys = attr_values(&svg, "rect", "fill", "y");
    let heights = attr_values(&svg, "rect", "fill", "height");
    assert_eq!(ys.len(), 4);
    // per field: upper bar's bottom edge equals lower bar's top edge
    // (coordinates in the markup are rounded to two decimals)
    for field in 0..2 {
        let lower_top = ys[field * 2];
        let upper_bottom = ys[field * 2 + 1] + heights[field * 2 + 1];
        assert!((upper_bottom - lower_top).abs() < 0.02);
    }
}

#[test]
fn pie_sample_has_three_wedges_and_a_key() {
    let mut pie = Pie::new(["apples", "pears", "plums"]);
    pie.add_data(Dataset::from_values("fruit", [1.0, 1.0, 2.0]))
        .unwrap();
    let svg = pie.render().unwrap();
    assert_eq!(svg.matches("class=\"fill").count(), 3);
    assert_eq!(svg.matches("class=\"keyText\"").count(), 3);
    assert!(svg.contains("apples"));
}

#[test]
fn degenerate_single_point_plot_still_renders() {
    let mut plot = Plot::new();
    plot.add_data(Dataset::from_pairs("solo", [(5.0, 5.0)])).unwrap();
    let svg = plot.render().unwrap();
    assert!(svg.contains("class=\"dataPoint1\""));
    // the expanded range keeps the value inside the plot
    assert!(svg.starts_with("<svg"));
}

#[test]
fn output_is_compact_and_has_no_declaration() {
    let mut chart = Bar::vertical(["a"]);
    chart.add_data(Dataset::from_values("s", [1.0])).unwrap();
    let svg = chart.render().unwrap();
    assert!(!svg.contains("<?xml"));
    // no pretty-printing between elements (stylesheet text aside)
    assert!(!svg.contains(">\n<"));
    assert!(svg.ends_with("</svg>"));
}

#[test]
fn failed_render_produces_no_partial_markup() {
    let mut pie = Pie::new(["a", "b"]);
    pie.add_data(Dataset::from_values("zero", [0.0, 0.0])).unwrap();
    match pie.render() {
        Err(ChartError::Config(_)) => {}
        other => panic!("expected a configuration error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn line_sample_renders_titles_and_key() {
    let mut chart = Line::new(["Jan", "Feb", "Mar", "Apr"]);
    chart.config.show_graph_title = true;
    chart.config.graph_title = "Sales".into();
    chart.config.show_graph_subtitle = true;
    chart.config.graph_subtitle = "by month".into();
    chart.config.show_x_title = true;
    chart.config.show_y_title = true;
    chart.add_data(Dataset::from_values("2002", [12.0, 45.0, 21.0, 33.0]))
        .unwrap();
    chart.add_data(Dataset::from_values("2003", [10.0, 29.0, 41.0, 25.0]))
        .unwrap();
    let svg = chart.render().unwrap();
    assert!(svg.contains("class=\"mainTitle\""));
    assert!(svg.contains(">Sales</text>"));
    assert!(svg.contains("class=\"subTitle\""));
    assert!(svg.contains("class=\"xAxisTitle\""));
    assert!(svg.contains("class=\"yAxisTitle\""));
    assert_eq!(svg.matches("class=\"keyText\"").count(), 2);
}

#[test]
fn time_series_sample_labels_are_dates() {
    let mut ts = TimeSeries::new();
    ts.plot.config.show_data_values = false;
    ts.x_label_format = "%Y".into();
    ts.add_data_strs(
        "history",
        &[("6/17/72", 11.0), ("1/11/95", 9.0), ("4/13/04", 2.0)],
    )
    .unwrap();
    let svg = ts.render().unwrap();
    assert!(svg.contains(">19"));
    assert!(svg.contains("class=\"line1\""));
}

#[test]
fn schedule_sample_renders_rows() {
    let mut sched = Schedule::new();
    sched.config.show_graph_title = true;
    sched.config.graph_title = "My Schedule".into();
    sched.timescale_divisions = Some("2 weeks".into());
    sched.x_label_format = "%m/%d".into();
    sched
        .add_task(
            "Housesitting",
            svgplot::parse_date("6/17/04").unwrap(),
            svgplot::parse_date("6/19/04").unwrap(),
        )
        .unwrap();
    sched
        .add_task(
            "Summer Session",
            svgplot::parse_date("6/15/04").unwrap(),
            svgplot::parse_date("8/15/04").unwrap(),
        )
        .unwrap();
    let svg = sched.render().unwrap();
    assert!(svg.contains(">My Schedule</text>"));
    assert_eq!(attr_values(&svg, "rect", "fill", "x").len(), 2);
}

#[test]
fn custom_style_resolver_reroutes_fill_keys() {
    struct Alternating;
    impl svgplot::StyleResolver for Alternating {
        fn fill_key(&self, _dataset: usize, field: usize) -> String {
            format!("fill{}", field % 2 + 1)
        }
    }

    let mut chart = Bar::vertical(["a", "b", "c"]);
    chart.config.key = false;
    chart.config.show_data_values = false;
    chart.set_styles(Box::new(Alternating));
    chart
        .add_data(Dataset::from_values("s", [1.0, 2.0, 3.0]))
        .unwrap();
    let svg = chart.render().unwrap();
    assert_eq!(svg.matches("class=\"fill1\"").count(), 2);
    assert_eq!(svg.matches("class=\"fill2\"").count(), 1);
}

#[test]
fn charts_render_independently_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let mut chart = Bar::vertical(["a", "b"]);
                chart
                    .add_data(Dataset::from_values(format!("t{}", i), [1.0, 2.0]))
                    .unwrap();
                chart.render().unwrap()
            })
        })
        .collect();
    for handle in handles {
        let svg = handle.join().unwrap();
        assert!(svg.starts_with("<svg"));
    }
}
