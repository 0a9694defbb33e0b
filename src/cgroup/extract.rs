use super::parser::{CgroupLine, parse_cgroup_line};

/// Hierarchy whose path carries the container runtime's bookkeeping.
pub const CONTAINER_HIERARCHY_ID: u32 = 1;

/// Extracts the container id from the contents of a `/proc/<pid>/cgroup` file.
///
/// Only lines of hierarchy [`CONTAINER_HIERARCHY_ID`] are considered. Within a
/// line's path, the first `docker` or `docker.service` segment that has a
/// successor yields that successor, and the first `kubepods` segment followed
/// by at least three segments yields the third of them
/// (`kubepods/<qos-class>/pod<uid>/<container-id>`). Lines that fail to parse
/// are skipped.
///
/// Returns `None` if no line matches.
///
/// # Examples
///
/// ```
/// # use pidmap::cgroup::extract_container_id;
/// let text = "1:name=systemd:/kubepods/besteffort/podb44d9344-3dd9-11e9-8cee-0265528b4d7c/3c92362\n";
/// assert_eq!(extract_container_id(text), Some("3c92362"));
/// assert_eq!(extract_container_id("0::/init.scope\n"), None);
/// ```
pub fn extract_container_id(cgroup_info: &str) -> Option<&str> {
    cgroup_info
        .lines()
        .filter_map(|line| match parse_cgroup_line(line) {
            Ok(cgl) => Some(cgl),
            Err(err) => {
                log::trace!("skipping cgroup line: {}", err);
                None
            }
        })
        .filter(|cgl| cgl.hierarchy_id == CONTAINER_HIERARCHY_ID)
        .find_map(|cgl| container_id_from_line(&cgl))
}

/// Applies the positional rules to a single line.
///
/// The first rule that matches decides the line, even if the segment it
/// points at is empty; an empty id counts as no match for that line.
fn container_id_from_line<'a>(cgl: &CgroupLine<'a>) -> Option<&'a str> {
    let segments: Vec<&'a str> = cgl.segments().collect();
    for (i, segment) in segments.iter().enumerate() {
        let candidate = match *segment {
            "docker" | "docker.service" if segments.len() > i + 1 => segments[i + 1],
            "kubepods" if segments.len() > i + 3 => segments[i + 3],
            _ => continue,
        };
        return (!candidate.is_empty()).then_some(candidate);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCKER_ID: &str = "bf4e1697bc0f3fcd6aca1f359853ea2f0ae527ef2b14867f1a2ce3a44bf842e4";
    const KUBE_ID: &str = "3c923625e1cbe7d10a4c971636469d5458e029f7f5e63da95ccdcfb7212c3194";

    #[test]
    fn test_docker_path() {
        let text = format!("1:name=systemd:/docker/{DOCKER_ID}");
        assert_eq!(extract_container_id(&text), Some(DOCKER_ID));
    }

    #[test]
    fn test_kubepods_path() {
        let text = format!(
            "1:name=systemd:/kubepods/besteffort/podb44d9344-3dd9-11e9-8cee-0265528b4d7c/{KUBE_ID}"
        );
        assert_eq!(extract_container_id(&text), Some(KUBE_ID));
    }

    #[test]
    fn test_docker_service_path() {
        let text = "1:name=systemd:/system.slice/docker.service/abc123\n";
        assert_eq!(extract_container_id(text), Some("abc123"));
    }

    #[test]
    fn test_full_v1_file() {
        let text = format!(
            "12:pids:/docker/{DOCKER_ID}\n\
             11:memory:/docker/{DOCKER_ID}\n\
             2:cpu,cpuacct:/docker/{DOCKER_ID}\n\
             1:name=systemd:/docker/{DOCKER_ID}\n\
             0::/system.slice/containerd.service\n"
        );
        assert_eq!(extract_container_id(&text), Some(DOCKER_ID));
    }

    #[test]
    fn test_no_container_segment() {
        let text = "1:name=systemd:/user.slice/user-1000.slice/session-2.scope\n";
        assert_eq!(extract_container_id(text), None);
    }

    #[test]
    fn test_no_hierarchy_one() {
        let text = format!("2:cpu:/docker/{DOCKER_ID}\n0::/docker/{DOCKER_ID}\n");
        assert_eq!(extract_container_id(&text), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_container_id(""), None);
    }

    #[test]
    fn test_docker_without_successor() {
        assert_eq!(extract_container_id("1:name=systemd:/docker"), None);
        assert_eq!(extract_container_id("1:name=systemd:/docker/"), None);
    }

    #[test]
    fn test_kubepods_too_short() {
        let text = "1:name=systemd:/kubepods/besteffort/podb44d9344";
        assert_eq!(extract_container_id(text), None);
    }

    #[test]
    fn test_first_rule_wins() {
        let text = "1:name=systemd:/docker/first/kubepods/a/b/second";
        assert_eq!(extract_container_id(text), Some("first"));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = format!("garbage\n1:a:b:c\n1:name=systemd:/docker/{DOCKER_ID}\n");
        assert_eq!(extract_container_id(&text), Some(DOCKER_ID));
    }

    #[test]
    fn test_empty_match_falls_through_to_next_line() {
        let text = "1:name=systemd:/docker/\n1:name=systemd:/docker/abc\n";
        assert_eq!(extract_container_id(text), Some("abc"));
    }
}
