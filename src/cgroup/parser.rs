//! Parser for lines of `/proc/<pid>/cgroup`.
//!
//! Each line has the form `<hierarchy-id>:<controller-list>:<cgroup-path>`:
//!
//! - `<hierarchy-id>`: arbitrary number on cgroup v1, always `0` on v2
//! - `<controller-list>`: comma-separated controllers on v1 (`cpu,memory`,
//!   `name=systemd`), always empty on v2
//! - `<cgroup-path>`: path relative to the hierarchy's mount point

#[derive(Debug, thiserror::Error)]
pub enum CgroupLineError {
    #[error("invalid cgroup line format: {0}")]
    InvalidFormat(String),
    #[error("invalid hierarchy id in cgroup line: {0}")]
    InvalidHierarchyID(String),
    #[error("too many separators: {0}")]
    TooManySeparators(String),
}

/// A parsed cgroup membership line, borrowing from the input.
#[derive(Debug, PartialEq, Eq)]
pub struct CgroupLine<'a> {
    pub hierarchy_id: u32,
    pub controller_list: Vec<&'a str>,
    pub cgroup_path: &'a str,
}

impl<'a> CgroupLine<'a> {
    /// Iterates over the `/`-separated segments of the cgroup path.
    ///
    /// The leading empty segment of an absolute path is kept, so positions
    /// line up with a plain split on `/`.
    pub fn segments(&self) -> std::str::Split<'a, char> {
        self.cgroup_path.split('/')
    }
}

/// Parses a single line of a cgroup membership file.
///
/// # Errors
///
/// - [`CgroupLineError::InvalidFormat`] if fewer than three fields are present.
/// - [`CgroupLineError::InvalidHierarchyID`] if the first field is not a number.
/// - [`CgroupLineError::TooManySeparators`] if more than three fields are present.
pub fn parse_cgroup_line(line: &str) -> Result<CgroupLine<'_>, CgroupLineError> {
    let mut it = line.split(':');
    let hierarchy_id = it
        .next()
        .ok_or_else(|| CgroupLineError::InvalidFormat(line.to_owned()))?
        .parse::<u32>()
        .map_err(|_| CgroupLineError::InvalidHierarchyID(line.to_owned()))?;
    let controller_list = it
        .next()
        .ok_or_else(|| CgroupLineError::InvalidFormat(line.to_owned()))?;
    let controller_list: Vec<&str> = if controller_list.is_empty() {
        Vec::default()
    } else {
        controller_list.split(',').collect()
    };
    let cgroup_path = it
        .next()
        .ok_or_else(|| CgroupLineError::InvalidFormat(line.to_owned()))?;
    it.next().map_or(Ok(()), |_| {
        Err(CgroupLineError::TooManySeparators(line.to_owned()))
    })?;

    Ok(CgroupLine {
        hierarchy_id,
        controller_list,
        cgroup_path: cgroup_path.trim(),
    })
}
