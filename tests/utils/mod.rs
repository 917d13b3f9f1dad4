use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDateTime;
use keel_mixing::{Archive, Field2D, Side, SideData, Simulation};

#[allow(unused_macros)] // False alarm
macro_rules! test_file {
    ($test_name:ident, $fname:expr) => {
        #[test]
        fn $test_name() {
            let (archive, expected) = utils::load_test_file($fname);
            utils::check_expectations(&archive, &expected);
        }
    };
}

fn test_path(fname: &str) -> PathBuf {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);
    test_path
}

/// Load the archive described by a fixture and the expected values stored alongside it.
///
/// Fixtures are plain text. After a `### Keel Archive ###` line come `title,` and `created,`
/// attributes, then each group starts with `### Group NAME ###`. Vectors take one line, two
/// dimensional arrays one line per time-step, and `expect_` lines hold the expected results.
pub fn load_test_file(fname: &str) -> (Archive, HashMap<String, Vec<f64>>) {
    let location = test_path(fname);
    let f = File::open(&location).unwrap_or_else(|err| panic!("Error opening {:?}: {}", location, err));

    let mut archive = Archive::new("");
    let mut groups: Vec<(String, HashMap<String, Vec<Vec<f64>>>)> = vec![];
    let mut expected = HashMap::new();

    for line in BufReader::new(f).lines() {
        let line = line.expect("Error reading file");
        let line = line.trim();

        if line.is_empty() || line == "### Keel Archive ###" {
            continue;
        } else if line.starts_with("### Group ") {
            let name = line.trim_start_matches("### Group ").trim_end_matches(" ###");
            groups.push((name.to_owned(), HashMap::new()));
            continue;
        }

        let mut tokens = line.splitn(2, ',');
        let key = tokens.next().unwrap();
        let rest = tokens.next().unwrap_or("");

        if key == "title" {
            archive = Archive::new(rest).with_created(archive.created());
        } else if key == "created" {
            let created = NaiveDateTime::parse_from_str(rest, "%Y-%m-%dT%H:%M:%S").unwrap();
            archive = archive.with_created(created);
        } else {
            let values: Vec<f64> = rest
                .split(',')
                .map(|tok| f64::from_str(tok.trim()).unwrap())
                .collect();

            if key.starts_with("expect_") {
                expected.insert(key["expect_".len()..].to_owned(), values);
            } else {
                let (_, arrays) = groups.last_mut().expect("array outside a group");
                arrays.entry(key.to_owned()).or_default().push(values);
            }
        }
    }

    for (name, arrays) in groups {
        archive = archive.with_group(build_simulation(name, arrays)).unwrap();
    }

    (archive, expected)
}

fn build_simulation(name: String, mut arrays: HashMap<String, Vec<Vec<f64>>>) -> Simulation {
    let mut vector = |key: &str| arrays.remove(key).map(|mut rows| rows.remove(0));

    let mut sim = Simulation::new(name)
        .with_time(vector("time").unwrap_or_default())
        .with_depth(vector("z").unwrap_or_default());

    for side in &[Side::Upstream, Side::Downstream] {
        let side = *side;
        let length = arrays.remove(side.length_key());
        let integrand = arrays.remove(side.integrand_key());
        let strat_grad = arrays.remove(side.strat_key());

        if let (Some(mut length), Some(integrand), Some(strat_grad)) = (length, integrand, strat_grad) {
            let data = SideData::new(
                length.remove(0),
                Field2D::from_rows(&integrand).unwrap(),
                Field2D::from_rows(&strat_grad).unwrap(),
            )
            .unwrap();
            sim = sim.with_side(side, data);
        }
    }

    sim
}

/// Equal within `tol`, or the same kind of non-finite value.
pub fn approx_equal(tgt: f64, guess: f64, tol: f64) -> bool {
    assert!(tol > 0.0);

    if tgt.is_nan() {
        guess.is_nan()
    } else if tgt.is_infinite() {
        tgt == guess
    } else {
        f64::abs(tgt - guess) <= tol
    }
}

pub fn assert_all_approx(key: &str, tgt: &[f64], guess: &[f64]) {
    println!("{}: expected {:?}, found {:?}", key, tgt, guess);
    assert_eq!(tgt.len(), guess.len(), "{} has the wrong length", key);
    for (t, g) in tgt.iter().zip(guess) {
        assert!(approx_equal(*t, *g, 1.0e-9), "{}: {} != {}", key, t, g);
    }
}

pub fn check_expectations(archive: &Archive, expected: &HashMap<String, Vec<f64>>) {
    use keel_mixing::{analyze_side, AnalysisError, KeelConfig, Side};
    use metfor::Meters;

    let config = KeelConfig::default();
    assert_eq!(archive.groups().len(), 1);
    let sim = &archive.groups()[0];

    for side in &[Side::Upstream, Side::Downstream] {
        let side = *side;
        let suffix = side.suffix();
        let key = |name: &str| format!("{}{}", name, suffix);

        let flux = match expected.get(&key("flux")) {
            Some(flux) => flux,
            None => {
                // No expectations means the side is not in the archive.
                assert_eq!(
                    analyze_side(sim, side, &config).err(),
                    Some(AnalysisError::MissingArray(side.integrand_key()))
                );
                continue;
            }
        };

        let anal = analyze_side(sim, side, &config).unwrap();
        let avgs = anal.averages();

        assert_all_approx(&key("area"), &expected[&key("area")], &[avgs.area]);
        assert_all_approx(&key("flux"), flux, &avgs.flux);
        assert_all_approx(&key("diff"), &expected[&key("diff")], &avgs.diffusivity);
        assert_all_approx(
            &key("n2bar"),
            &expected[&key("n2bar")],
            anal.diagnostics().depth_mean_n2(),
        );

        let zmix: Vec<f64> = anal
            .mixing_depth()
            .iter()
            .map(|z| z.into_option().map(|Meters(z)| z).unwrap_or(std::f64::NAN))
            .collect();
        assert_all_approx(&key("zmix"), &expected[&key("zmix")], &zmix);
    }
}
