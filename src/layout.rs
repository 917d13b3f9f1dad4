//! Conversion between a `Simulation` and the named variables of an archive group.
use crate::{
    archive::ArchiveError,
    error::AnalysisError,
    field::Field2D,
    simulation::{Side, SideData, Simulation},
};
use strum::IntoEnumIterator;
use tracing::{debug, warn};

// name, dimensions, units, long name
const SCHEMA: [(&str, &[&str], &str, &str); 8] = [
    ("time", &["time"], "s", "Time"),
    ("z", &["depth"], "m", "Depth"),
    ("LU", &["depth"], "m", "Integration length upstream"),
    ("LD", &["depth"], "m", "Integration length downstream"),
    ("phiU", &["time", "depth"], "", "Flux integrand upstream"),
    ("phiD", &["time", "depth"], "", "Flux integrand downstream"),
    ("N2U", &["time", "depth"], "", "N2* upstream"),
    ("N2D", &["time", "depth"], "", "N2* downstream"),
];

/// The dimension names, units and long name of a variable in the group layout.
pub(crate) fn describe(name: &str) -> Option<(&'static [&'static str], &'static str, &'static str)> {
    SCHEMA
        .iter()
        .find(|entry| entry.0 == name)
        .map(|&(_, dims, units, long_name)| (dims, units, long_name))
}

/// The data of a variable, flattened row major, and the size of each of its dimensions.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Variable {
    pub data: Vec<f64>,
    pub dims: Vec<usize>,
}

impl Variable {
    fn vector(data: &[f64]) -> Self {
        Variable {
            data: data.to_vec(),
            dims: vec![data.len()],
        }
    }

    fn field(fld: &Field2D) -> Self {
        Variable {
            data: fld.values().to_vec(),
            dims: vec![fld.n_time(), fld.n_depth()],
        }
    }

    fn into_vector(self) -> Option<Vec<f64>> {
        if self.dims.len() == 1 {
            Some(self.data)
        } else {
            None
        }
    }

    fn into_field(self) -> Result<Field2D, AnalysisError> {
        match self.dims[..] {
            [n_time, n_depth] => Field2D::new(n_time, n_depth, self.data),
            _ => Err(AnalysisError::InvalidInput),
        }
    }
}

/// The variables of one group, in the order they are stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct GroupArrays {
    name: String,
    variables: Vec<(String, Variable)>,
}

impl GroupArrays {
    pub fn new<S: Into<String>>(name: S) -> Self {
        GroupArrays {
            name: name.into(),
            variables: vec![],
        }
    }

    pub fn push<S: Into<String>>(&mut self, name: S, var: Variable) {
        self.variables.push((name.into(), var));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &[(String, Variable)] {
        &self.variables
    }

    pub fn n_time(&self) -> usize {
        self.len_of("time")
    }

    pub fn n_depth(&self) -> usize {
        self.len_of("z")
    }

    fn len_of(&self, name: &str) -> usize {
        self.variables
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, var)| var.data.len())
            .unwrap_or(0)
    }

    fn take(&mut self, name: &str) -> Option<Variable> {
        let idx = self.variables.iter().position(|(key, _)| key == name)?;
        Some(self.variables.remove(idx).1)
    }

    /// Lay out a simulation for writing. Every side present must match the shape of the time and
    /// depth coordinates. Sides that are missing, or failed to load, are left out.
    pub fn from_simulation(sim: &Simulation) -> Result<Self, ArchiveError> {
        let mut arrays = GroupArrays::new(sim.name());
        arrays.push("time", Variable::vector(sim.time()));
        arrays.push("z", Variable::vector(sim.depth()));

        let expected = (sim.time().len(), sim.depth().len());
        for side in Side::iter() {
            let data = match sim.side(side) {
                Ok(data) => data,
                Err(_) => continue,
            };

            if data.integrand().shape() != expected {
                return Err(ArchiveError::BadVariable {
                    group: sim.name().to_owned(),
                    variable: side.integrand_key().to_owned(),
                });
            }

            arrays.push(side.length_key(), Variable::vector(data.length()));
            arrays.push(side.integrand_key(), Variable::field(data.integrand()));
            arrays.push(side.strat_key(), Variable::field(data.strat_grad()));
        }

        Ok(arrays)
    }

    /// Build a simulation from the variables read from a group.
    ///
    /// A side with none of its variables is missing. A side with only some of them, or with
    /// variables that do not fit together, keeps the error.
    pub fn into_simulation(mut self) -> Result<Simulation, ArchiveError> {
        let time = self.coordinate("time")?;
        let depth = self.coordinate("z")?;
        let mut sim = Simulation::new(self.name.clone())
            .with_time(time)
            .with_depth(depth);

        for side in Side::iter() {
            let length = self.take(side.length_key());
            let integrand = self.take(side.integrand_key());
            let strat_grad = self.take(side.strat_key());

            if length.is_none() && integrand.is_none() && strat_grad.is_none() {
                debug!(group = %self.name, side = side.suffix(), "side not archived");
                continue;
            }

            let data = load_side(side, length, integrand, strat_grad);
            if let Err(err) = &data {
                warn!(group = %self.name, side = side.suffix(), error = %err, "side unavailable");
            }
            sim = sim.with_side_result(side, data);
        }

        for (key, _) in &self.variables {
            debug!(group = %self.name, key = %key, "ignoring unknown variable");
        }

        Ok(sim)
    }

    fn coordinate(&mut self, name: &str) -> Result<Vec<f64>, ArchiveError> {
        match self.take(name) {
            Some(var) => var.into_vector().ok_or_else(|| ArchiveError::BadVariable {
                group: self.name.clone(),
                variable: name.to_owned(),
            }),
            None => Ok(vec![]),
        }
    }
}

fn load_side(
    side: Side,
    length: Option<Variable>,
    integrand: Option<Variable>,
    strat_grad: Option<Variable>,
) -> Result<SideData, AnalysisError> {
    let length = length
        .ok_or(AnalysisError::MissingArray(side.length_key()))?
        .into_vector()
        .ok_or(AnalysisError::InvalidInput)?;
    let integrand = integrand
        .ok_or(AnalysisError::MissingArray(side.integrand_key()))?
        .into_field()?;
    let strat_grad = strat_grad
        .ok_or(AnalysisError::MissingArray(side.strat_key()))?
        .into_field()?;

    SideData::new(length, integrand, strat_grad)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{analysis::analyze_side, config::KeelConfig, test_data::make_example_simulation};

    fn reload(sim: &Simulation) -> Simulation {
        GroupArrays::from_simulation(sim)
            .unwrap()
            .into_simulation()
            .unwrap()
    }

    #[test]
    fn test_group_layout() {
        let arrays = GroupArrays::from_simulation(&make_example_simulation()).unwrap();

        let names: Vec<&str> = arrays.variables().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["time", "z", "LU", "phiU", "N2U", "LD", "phiD", "N2D"]);
        assert_eq!(arrays.name(), "EXAMPLE");
        assert_eq!(arrays.n_time(), 2);
        assert_eq!(arrays.n_depth(), 3);

        for (name, var) in arrays.variables() {
            let (dims, ..) = describe(name).unwrap();
            assert_eq!(dims.len(), var.dims.len());
        }
        assert_eq!(describe("phiD").unwrap().2, "Flux integrand downstream");
        assert!(describe("u").is_none());

        assert_eq!(reload(&make_example_simulation()), make_example_simulation());
    }

    #[test]
    fn test_zero_time_steps_kept() {
        let empty = Field2D::new(0, 3, vec![]).unwrap();
        let side = SideData::new(vec![1.0, 1.0, 1.0], empty.clone(), empty).unwrap();
        let sim = Simulation::new("EMPTY")
            .with_depth(vec![0.0, 1.0, 2.0])
            .with_side(Side::Upstream, side);

        let arrays = GroupArrays::from_simulation(&sim).unwrap();
        assert_eq!(arrays.n_time(), 0);
        assert_eq!(arrays.n_depth(), 3);

        let loaded = arrays.into_simulation().unwrap();
        assert_eq!(loaded, sim);
        assert_eq!(loaded.side(Side::Upstream).unwrap().integrand().shape(), (0, 3));
        assert!(loaded.side(Side::Downstream).is_err());
    }

    #[test]
    fn test_inconsistent_side_keeps_error() {
        let mut arrays = GroupArrays::new("A");
        arrays.push("time", Variable::vector(&[0.0, 1.0]));
        arrays.push("z", Variable::vector(&[0.0, 1.0, 2.0]));
        arrays.push("LU", Variable::vector(&[1.0, 1.0, 1.0]));
        arrays.push(
            "phiU",
            Variable {
                data: vec![1.0; 6],
                dims: vec![2, 3],
            },
        );
        arrays.push(
            "N2U",
            Variable {
                data: vec![1.0; 4],
                dims: vec![2, 2],
            },
        );
        arrays.push("phiD", Variable::vector(&[1.0, 2.0, 3.0]));

        let sim = arrays.into_simulation().unwrap();
        let mismatch = AnalysisError::ShapeMismatch {
            expected: (2, 3),
            found: (2, 2),
        };

        assert_eq!(sim.side(Side::Upstream).err(), Some(mismatch));
        assert_eq!(
            analyze_side(&sim, Side::Upstream, &KeelConfig::default()).err(),
            Some(mismatch)
        );
        assert_eq!(
            sim.side(Side::Downstream).err(),
            Some(AnalysisError::MissingArray("LD"))
        );
    }

    #[test]
    fn test_wrong_rank_side() {
        let mut arrays = GroupArrays::from_simulation(&make_example_simulation()).unwrap();
        arrays.take("N2U");
        arrays.push("N2U", Variable::vector(&[1.0, 1.0, 1.0]));

        let sim = arrays.into_simulation().unwrap();
        assert_eq!(sim.side(Side::Upstream).err(), Some(AnalysisError::InvalidInput));
        assert!(sim.side(Side::Downstream).is_ok());
    }

    #[test]
    fn test_absent_side_is_missing() {
        let mut arrays = GroupArrays::from_simulation(&make_example_simulation()).unwrap();
        for key in &["LD", "phiD", "N2D"] {
            arrays.take(key);
        }
        arrays.push("extra", Variable::vector(&[1.0]));

        let sim = arrays.into_simulation().unwrap();
        assert!(sim.side(Side::Upstream).is_ok());
        assert_eq!(
            sim.side(Side::Downstream).err(),
            Some(AnalysisError::MissingArray("phiD"))
        );
    }

    #[test]
    fn test_bad_coordinate() {
        let mut arrays = GroupArrays::new("A");
        arrays.push(
            "time",
            Variable {
                data: vec![0.0; 4],
                dims: vec![2, 2],
            },
        );

        match arrays.into_simulation() {
            Err(ArchiveError::BadVariable { group, variable }) => {
                assert_eq!(group, "A");
                assert_eq!(variable, "time");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unwritable_shape() {
        let sim = make_example_simulation().with_time(vec![0.0]);

        match GroupArrays::from_simulation(&sim) {
            Err(ArchiveError::BadVariable { variable, .. }) => assert_eq!(variable, "phiU"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
