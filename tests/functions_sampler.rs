use precip_rs::CurveKind;
use precip_rs::functions::{self, NO_FUNCTION};

#[test]
fn square_sampled_at_three_points() {
    let curve = functions::sample("x^2", 3).expect("registered");
    assert_eq!(curve.name, "x^2");
    assert_eq!(curve.kind, CurveKind::Function);
    let xs: Vec<f64> = curve.points.iter().map(|p| p.0).collect();
    let ys: Vec<Option<f64>> = curve.points.iter().map(|p| p.1).collect();
    assert_eq!(xs, vec![-10.0, 0.0, 10.0]);
    assert_eq!(ys, vec![Some(100.0), Some(0.0), Some(100.0)]);
}

#[test]
fn at_least_two_samples_are_taken() {
    for n in [0, 1, 2] {
        let pts = functions::from_label("sin(x)").unwrap().sample(n);
        assert_eq!(pts.len(), 2, "n={n}");
        assert_eq!(pts[0].0, -10.0);
        assert_eq!(pts[1].0, 10.0);
    }
}

#[test]
fn every_label_covers_minus_ten_to_ten() {
    let labels: Vec<_> = functions::labels().collect();
    assert_eq!(
        labels,
        vec!["x^2", "sin(x)", "sin(x)+sin(3x)/3+sin(5x)/5", "x*sin(x)"]
    );
    for label in labels {
        let def = functions::from_label(label).unwrap();
        assert_eq!(def.domain, (-10.0, 10.0));
        let pts = def.sample(400);
        assert_eq!(pts.len(), 400);
        assert!(pts.iter().all(|(_, y)| y.is_finite()));
    }
}

#[test]
fn pointwise_values_match_formulas() {
    let x = 1.5_f64;
    let eval = |label: &str| (functions::from_label(label).unwrap().f)(x);
    assert!((eval("sin(x)") - x.sin()).abs() < 1e-12);
    assert!((eval("x*sin(x)") - x * x.sin()).abs() < 1e-12);
    let sq = x.sin() + (3.0 * x).sin() / 3.0 + (5.0 * x).sin() / 5.0;
    assert!((eval("sin(x)+sin(3x)/3+sin(5x)/5") - sq).abs() < 1e-12);
}

#[test]
fn unknown_labels_give_no_curve() {
    assert!(functions::sample("cos(x)", 10).is_none());
    assert!(functions::sample(NO_FUNCTION, 10).is_none());
    assert!(functions::sample("", 10).is_none());
}
