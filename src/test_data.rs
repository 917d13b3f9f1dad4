//! Data used in tests.

use crate::{
    field::Field2D,
    simulation::{Side, SideData, Simulation},
};

pub fn example_integrand() -> Field2D {
    Field2D::from_rows(&[[1.0, 1.0, 2.0], [0.0, 2.0, 2.0]]).unwrap()
}

pub fn example_strat_grad() -> Field2D {
    Field2D::from_rows(&[[2.0, 2.0, 2.0], [4.0, 4.0, 4.0]]).unwrap()
}

pub fn example_length() -> Vec<f64> {
    vec![1.0, 1.0, 1.0]
}

pub fn example_depth() -> Vec<f64> {
    vec![0.0, 1.0, 2.0]
}

/// Two time-steps, three depth levels, the same data on both sides.
pub fn make_example_simulation() -> Simulation {
    let side = SideData::new(example_length(), example_integrand(), example_strat_grad()).unwrap();

    Simulation::new("EXAMPLE")
        .with_time(vec![0.0, 10.0])
        .with_depth(example_depth())
        .with_side(Side::Upstream, side.clone())
        .with_side(Side::Downstream, side)
}

pub fn approx_equal(tgt: f64, guess: f64, tol: f64) -> bool {
    assert!(tol > 0.0);

    f64::abs(tgt - guess) <= tol
}

pub fn assert_slice_approx(tgt: &[f64], guess: &[f64], tol: f64) {
    assert_eq!(tgt.len(), guess.len());
    for (t, g) in tgt.iter().zip(guess) {
        assert!(approx_equal(*t, *g, tol), "{} != {}", t, g);
    }
}
