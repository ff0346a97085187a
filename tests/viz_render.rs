use precip_rs::viz::{self, ChartOptions};
use precip_rs::{Curve, CurveKind, Session, functions};
use std::fs;
use tempfile::tempdir;

fn gappy_curve() -> Curve {
    Curve {
        name: "Lausanne".into(),
        kind: CurveKind::Series,
        points: vec![
            (36_526.0, Some(1000.0)),
            (36_892.0, None),
            (37_257.0, Some(1100.0)),
            (37_622.0, Some(1050.0)),
        ],
    }
}

#[test]
fn svg_chart_has_labels_and_legend() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.svg");
    viz::plot_curves(&[gappy_curve()], &path, &ChartOptions::default()).unwrap();

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Lausanne"));
    assert!(svg.contains(viz::Y_AXIS_LABEL));
    assert!(svg.contains(viz::X_AXIS_LABEL));
}

#[test]
fn png_chart_from_demo_session_with_function() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.png");
    let mut session = Session::new(2000);
    session.set_function(Some("sin(x)"));
    let opts = ChartOptions {
        title: "Demo".into(),
        width: 640,
        height: 400,
    };
    viz::plot_curves(&session.curves(), &path, &opts).unwrap();
    let meta = fs::metadata(&path).expect("file created");
    assert!(meta.len() > 0);
}

#[test]
fn function_only_chart_renders() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fx.svg");
    let curve = functions::sample("x^2", 50).unwrap();
    viz::plot_curves(&[curve], &path, &ChartOptions::default()).unwrap();
    assert!(fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn nothing_to_draw_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.svg");
    assert!(viz::plot_curves(&[], &path, &ChartOptions::default()).is_err());

    let gaps_only = Curve {
        name: "Davos".into(),
        kind: CurveKind::Series,
        points: vec![(1.0, None), (2.0, None)],
    };
    assert!(viz::plot_curves(&[gaps_only], &path, &ChartOptions::default()).is_err());
}

#[test]
fn lone_values_become_point_marks() {
    let marks = viz::marks(&gappy_curve());
    assert_eq!(
        marks,
        vec![
            viz::Mark::Point((36_526.0, 1000.0)),
            viz::Mark::Path(vec![(37_257.0, 1100.0), (37_622.0, 1050.0)]),
        ]
    );

    let lone = Curve {
        name: "Davos".into(),
        kind: CurveKind::Series,
        points: vec![(1.0, None), (2.0, Some(5.0)), (3.0, None)],
    };
    assert_eq!(viz::marks(&lone), vec![viz::Mark::Point((2.0, 5.0))]);
}

#[test]
fn svg_draws_a_marker_for_a_lone_value() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lone.svg");
    viz::plot_curves(&[gappy_curve()], &path, &ChartOptions::default()).unwrap();
    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.contains("<circle"));
    assert!(svg.contains("<polyline"));
}
