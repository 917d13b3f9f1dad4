use keel_mixing::{Field2D, Side, SideData, Simulation};

const N_TIME: usize = 400;
const N_DEPTH: usize = 128;

/// A simulation shaped like a typical model run, filled with smooth synthetic data.
pub fn make_test_simulation() -> Simulation {
    let time: Vec<f64> = (0..N_TIME).map(|t| t as f64 * 30.0).collect();
    let depth: Vec<f64> = (0..N_DEPTH).map(|z| z as f64 * 0.125).collect();

    let side = |phase: f64| {
        let length: Vec<f64> = depth.iter().map(|z| 20.0 - 0.5 * z).collect();

        let mut phi = Vec::with_capacity(N_TIME * N_DEPTH);
        let mut n2 = Vec::with_capacity(N_TIME * N_DEPTH);
        for t in 0..N_TIME {
            for z in &depth {
                let arg = phase + t as f64 * 0.01 + z;
                phi.push(1.0e-6 * (1.0 + arg.sin()) * (-z / 8.0).exp());
                n2.push(1.0e-4 * (1.5 + (0.5 * arg).cos()));
            }
        }

        SideData::new(
            length,
            Field2D::new(N_TIME, N_DEPTH, phi).unwrap(),
            Field2D::new(N_TIME, N_DEPTH, n2).unwrap(),
        )
        .unwrap()
    };

    Simulation::new("BENCH")
        .with_side(Side::Upstream, side(0.0))
        .with_side(Side::Downstream, side(1.0))
        .with_time(time)
        .with_depth(depth)
}
