//! Integration tests for reading reference isotope tables

use nucdiff_isotopes::{find_isotope, read_isotopes, write_json, ReferenceIsotope};
use rstest::{fixture, rstest};

const EXAMPLE: &str = "./data/stable_isotopes.txt";

#[fixture]
fn isotopes() -> Vec<ReferenceIsotope> {
    read_isotopes(EXAMPLE).unwrap()
}

#[rstest]
fn malformed_lines_are_skipped(isotopes: Vec<ReferenceIsotope>) {
    // short Li6 line and the non-numeric O16 line are dropped
    assert_eq!(isotopes.len(), 7);
    assert!(isotopes.iter().all(|i| i.label() != "Li6"));
    assert!(isotopes.iter().all(|i| i.name != "O"));
}

#[rstest]
#[case(1, 0, "H1", 0.999885)]
#[case(2, 2, "He4", 0.999999)]
#[case(6, 6, "C12", 0.9893)]
#[case(26, 30, "Fe56", 0.91754)]
fn isotope_cells(
    isotopes: Vec<ReferenceIsotope>,
    #[case] z: usize,
    #[case] n: usize,
    #[case] label: &str,
    #[case] abundance: f64,
) {
    let isotope = find_isotope(&isotopes, z, n).unwrap();
    assert_eq!(isotope.label(), label);
    assert_eq!(isotope.abundance, abundance);
}

#[test]
fn missing_table_is_an_error() {
    assert!(read_isotopes("./data/does_not_exist.txt").is_err());
}

#[rstest]
fn json_output(isotopes: Vec<ReferenceIsotope>) {
    let path = std::env::temp_dir().join(format!("nucdiff_isotopes_{}.json", std::process::id()));
    write_json(&isotopes, &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let read: Vec<ReferenceIsotope> = serde_json::from_str(&text).unwrap();
    assert_eq!(read, isotopes);
}
