//! Store simulations in the netCDF layout the keel runs are archived in.
//!
//! Each simulation is a group named by its identifier, e.g. `F05H09`, with the dimensions `time`
//! and `depth` and these variables:
//!
//! | Variable               | Dimensions      | Units |
//! |------------------------|-----------------|-------|
//! | `time`                 | (time)          | s     |
//! | `z`                    | (depth)         | m     |
//! | `LU`, `LD`             | (depth)         | m     |
//! | `phiU`, `phiD`         | (time, depth)   |       |
//! | `N2U`, `N2D`           | (time, depth)   |       |
//!
//! The file carries a `title` attribute and, optionally, a `created` attribute.
//!
//! If all of a side's variables are absent from a group, that side is missing from the loaded
//! simulation. If only some are present, or they do not fit together, the side is loaded as the
//! error describing the problem, and analysis of that side reports it.
//!
//! Reading and writing files requires the `netcdf` feature. Files are only held open for the
//! duration of a single read or write call.

use crate::simulation::Simulation;
use chrono::NaiveDateTime;
use std::{error::Error, fmt::Display, path::Path};

#[cfg(feature = "netcdf")]
use crate::layout::{describe, GroupArrays, Variable};
#[cfg(feature = "netcdf")]
use tracing::debug;

#[cfg(feature = "netcdf")]
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Errors reading or writing an archive.
#[derive(Debug)]
pub enum ArchiveError {
    /// The file to read does not exist.
    FileNotFound(String),
    /// A group name that cannot be stored and read back unchanged.
    InvalidName(String),
    /// A file attribute has the wrong type or format.
    BadAttribute(&'static str),
    /// A variable cannot be stored or loaded with the layout it requires.
    BadVariable {
        /// The group holding the variable.
        group: String,
        /// The variable name.
        variable: String,
    },
    /// Forward an error from the netCDF library.
    #[cfg(feature = "netcdf")]
    NetCdf(netcdf::Error),
    /// The crate was built without the `netcdf` feature.
    NotAvailable,
}

impl Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use self::ArchiveError::*;

        match self {
            FileNotFound(path) => write!(f, "archive not found: {}", path),
            InvalidName(name) => write!(f, "invalid group name: '{}'", name),
            BadAttribute(name) => write!(f, "bad archive attribute: {}", name),
            BadVariable { group, variable } => {
                write!(f, "bad variable {} in group {}", variable, group)
            }
            #[cfg(feature = "netcdf")]
            NetCdf(err) => write!(f, "netCDF error: {}", err),
            NotAvailable => write!(f, "built without netCDF support"),
        }
    }
}

impl Error for ArchiveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            #[cfg(feature = "netcdf")]
            ArchiveError::NetCdf(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for ArchiveError {
    fn from(err: netcdf::Error) -> Self {
        ArchiveError::NetCdf(err)
    }
}

/// A collection of simulations along with some descriptive metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Archive {
    title: String,
    created: Option<NaiveDateTime>,
    groups: Vec<Simulation>,
}

impl Archive {
    /// Create a new, empty archive.
    pub fn new<S: Into<String>>(title: S) -> Self {
        Archive {
            title: title.into(),
            ..Archive::default()
        }
    }

    /// Builder method for the creation time.
    #[inline]
    pub fn with_created<T>(self, created: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        Archive {
            created: Option::from(created),
            ..self
        }
    }

    /// Add a simulation, replacing any existing group with the same name.
    ///
    /// The name is used as the group name in the file, so it must be non-empty, have no leading
    /// or trailing white space, and contain no `/` or control characters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keel_mixing::{Archive, Simulation};
    ///
    /// let archive = Archive::new("Mixing under ice keels")
    ///     .with_group(Simulation::new("F05H09"))
    ///     .unwrap();
    /// assert!(archive.group("F05H09").is_some());
    ///
    /// assert!(archive.with_group(Simulation::new(" F05H09")).is_err());
    /// ```
    pub fn with_group(mut self, sim: Simulation) -> Result<Self, ArchiveError> {
        check_name(sim.name())?;

        if let Some(existing) = self.groups.iter_mut().find(|g| g.name() == sim.name()) {
            *existing = sim;
        } else {
            self.groups.push(sim);
        }

        Ok(self)
    }

    /// Description of the archive.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// When the archive was created, if known.
    #[inline]
    pub fn created(&self) -> Option<NaiveDateTime> {
        self.created
    }

    /// All the simulations, in the order they were added.
    #[inline]
    pub fn groups(&self) -> &[Simulation] {
        &self.groups
    }

    /// Find a simulation by name.
    pub fn group(&self, name: &str) -> Option<&Simulation> {
        self.groups.iter().find(|g| g.name() == name)
    }
}

#[cfg(feature = "netcdf")]
impl Archive {
    /// Load an archive from a netCDF file.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Archive, ArchiveError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ArchiveError::FileNotFound(path.display().to_string()));
        }
        debug!(path = %path.display(), "reading archive");

        let file = netcdf::open(path)?;

        let title = match file.attribute("title") {
            Some(attr) => string_value(attr.value()?).ok_or(ArchiveError::BadAttribute("title"))?,
            None => String::new(),
        };

        let created = match file.attribute("created") {
            Some(attr) => {
                let stamp = string_value(attr.value()?).ok_or(ArchiveError::BadAttribute("created"))?;
                let created = NaiveDateTime::parse_from_str(&stamp, DATE_FORMAT)
                    .map_err(|_| ArchiveError::BadAttribute("created"))?;
                Some(created)
            }
            None => None,
        };

        let mut archive = Archive::new(title).with_created(created);
        for grp in file.groups()? {
            let mut arrays = GroupArrays::new(grp.name());

            for var in grp.variables() {
                let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
                let data = if dims.iter().product::<usize>() == 0 {
                    vec![]
                } else {
                    var.get_values::<f64, _>(..)?
                };

                arrays.push(var.name(), Variable { data, dims });
            }

            debug!(group = arrays.name(), variables = arrays.variables().len(), "read group");
            archive.groups.push(arrays.into_simulation()?);
        }

        Ok(archive)
    }

    /// Write the archive to a netCDF file, replacing it if it exists.
    ///
    /// Every side present in a simulation must match the shape of its time and depth
    /// coordinates. Sides that are missing, or that failed to load, are not written.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ArchiveError> {
        let path = path.as_ref();
        debug!(path = %path.display(), groups = self.groups.len(), "writing archive");

        // Check everything before touching the file system.
        let groups = self
            .groups
            .iter()
            .map(GroupArrays::from_simulation)
            .collect::<Result<Vec<_>, _>>()?;

        let mut file = netcdf::create(path)?;
        file.add_attribute("title", self.title.as_str())?;
        if let Some(created) = self.created {
            file.add_attribute("created", created.format(DATE_FORMAT).to_string())?;
        }

        for arrays in &groups {
            let mut grp = file.add_group(arrays.name())?;
            grp.add_dimension("time", arrays.n_time())?;
            grp.add_dimension("depth", arrays.n_depth())?;

            for (name, var) in arrays.variables() {
                let (dims, units, long_name) =
                    describe(name).ok_or_else(|| ArchiveError::BadVariable {
                        group: arrays.name().to_owned(),
                        variable: name.clone(),
                    })?;

                let mut nc_var = grp.add_variable::<f64>(name, dims)?;
                nc_var.put_attribute("units", units)?;
                nc_var.put_attribute("long_name", long_name)?;
                if !var.data.is_empty() {
                    nc_var.put_values(&var.data, ..)?;
                }
            }

            debug!(group = arrays.name(), variables = arrays.variables().len(), "wrote group");
        }

        Ok(())
    }
}

#[cfg(not(feature = "netcdf"))]
impl Archive {
    /// Load an archive from a netCDF file. Always fails without the `netcdf` feature.
    pub fn read_from<P: AsRef<Path>>(_path: P) -> Result<Archive, ArchiveError> {
        Err(ArchiveError::NotAvailable)
    }

    /// Write the archive to a netCDF file. Always fails without the `netcdf` feature.
    pub fn write_to<P: AsRef<Path>>(&self, _path: P) -> Result<(), ArchiveError> {
        Err(ArchiveError::NotAvailable)
    }
}

#[cfg(feature = "netcdf")]
fn string_value(val: netcdf::AttributeValue) -> Option<String> {
    match val {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

fn check_name(name: &str) -> Result<(), ArchiveError> {
    let bad = name.is_empty()
        || name.trim() != name
        || name.contains('/')
        || name.chars().any(char::is_control);

    if bad {
        Err(ArchiveError::InvalidName(name.to_owned()))
    } else {
        Ok(())
    }
}
