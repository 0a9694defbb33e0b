//! Container identification from cgroup membership.
//!
//! A process's `/proc/<pid>/cgroup` file lists every hierarchy it belongs to.
//! Container runtimes name the cgroup they create after the container, so the
//! container id can be recovered positionally from the cgroup path:
//!
//! - Docker: `1:name=systemd:/docker/<container-id>`
//! - Kubernetes: `1:name=systemd:/kubepods/<qos-class>/pod<uid>/<container-id>`
mod extract;
mod parser;

pub use extract::{CONTAINER_HIERARCHY_ID, extract_container_id};
pub use parser::{CgroupLine, CgroupLineError, parse_cgroup_line};
