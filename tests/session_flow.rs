use precip_rs::functions::NO_FUNCTION;
use precip_rs::{CurveKind, Error, Session, SeriesStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn demo_session_selects_every_city_over_full_range() {
    let session = Session::new(2020);
    assert_eq!(session.params().selected.len(), 4);
    assert_eq!(session.params().range.from().format("%Y").to_string(), "1875");
    assert_eq!(session.params().range.to().format("%Y").to_string(), "2020");
    assert_eq!(session.status(), "");

    let curves = session.curves();
    assert_eq!(curves.len(), 4);
    assert!(curves.iter().all(|c| c.kind == CurveKind::Series));
    assert!(curves.iter().all(|c| c.points.len() == 146));
}

#[test]
fn import_reports_status_and_selects_series() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.csv");
    fs::write(
        &good,
        "Ville;Date et heure;Precipitations (mm)\nFoo;01.01.2030;5\n",
    )
    .unwrap();

    let mut session = Session::new(2020);
    assert_eq!(session.import_file(&good).unwrap(), "Foo");
    assert_eq!(session.status(), "Fichier chargé avec succès !");
    assert!(session.is_selected("Foo"));
    // range widened to the new maximum
    assert_eq!(session.params().range.to().format("%Y").to_string(), "2030");
    assert_eq!(session.curves().len(), 5);
}

#[test]
fn failed_import_keeps_store_and_sets_status() {
    let dir = tempdir().unwrap();
    let bad = dir.path().join("bad.csv");
    fs::write(&bad, "Ville;Temperature\nZRH;12\n").unwrap();

    let mut session = Session::new(2020);
    let before = session.store().clone();
    let err = session.import_file(&bad).unwrap_err();
    assert!(matches!(err, Error::Format(_)));
    assert_eq!(
        session.status(),
        "Fichier invalide. Vérifiez les colonnes et le séparateur."
    );
    assert_eq!(session.store(), &before);

    let err = session.import_file(dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(session.status().starts_with("Erreur: "));
}

#[test]
fn typed_range_is_parsed_and_swapped() {
    let mut session = Session::new(2020);
    session.set_range_text("31.12.1950", "01.01.1950").unwrap();
    let curves = session.curves();
    assert!(curves.iter().all(|c| c.points.len() == 1));

    let err = session.set_range_text("demain", "01.01.1950").unwrap_err();
    assert!(matches!(err, Error::DateRange(_)));
    assert_eq!(session.status(), "Date invalide. Veuillez réessayer.");
}

#[test]
fn function_curve_comes_last_and_reset_clears_it() {
    let mut session = Session::new(2020);
    session.set_samples(3);
    session.set_function(Some("x^2"));
    let curves = session.curves();
    let last = curves.last().unwrap();
    assert_eq!(last.kind, CurveKind::Function);
    assert_eq!(last.points.len(), 3);

    session.set_function(Some(NO_FUNCTION));
    assert!(session.curves().iter().all(|c| c.kind == CurveKind::Series));

    session.set_function(Some("x*sin(x)"));
    session.set_range_text("01.01.1900", "01.01.1900").unwrap();
    session.reset();
    assert!(session.params().function.is_none());
    assert_eq!(session.params().range, session.store().full_range().unwrap());
    assert_eq!(session.status(), "");
}

#[test]
fn selection_toggles_and_select_only() {
    let mut session = Session::new(2020);
    session.set_selected("Davos", false);
    assert!(!session.is_selected("Davos"));
    assert_eq!(session.curves().len(), 3);

    session.toggle("Davos");
    assert!(session.is_selected("Davos"));
    assert_eq!(session.curves().last().unwrap().name, "Davos");
    session.toggle("Davos");
    assert!(!session.is_selected("Davos"));

    session.select_only(&["Lugano", "Lausanne"]);
    let names: Vec<_> = session.curves().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Lugano", "Lausanne"]);
}

#[test]
fn empty_session_has_unbounded_range_and_no_curves() {
    let session = Session::with_store(SeriesStore::new());
    assert!(session.curves().is_empty());
    assert!(session.params().selected.is_empty());
}
