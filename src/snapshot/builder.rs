use crate::cgroup;
use crate::container::ContainerID;
use crate::procfs::{self, ProcessTable};

use super::Snapshot;

/// Scans the process table once and records the container of every process.
///
/// Processes that vanish mid-scan, are not containerized, or carry an id that
/// is not a valid [`ContainerID`] are left out. The result does not depend on
/// the order in which the table lists processes.
///
/// # Errors
///
/// Returns an error only if the process table itself cannot be listed.
pub fn build_snapshot<T>(table: &T) -> procfs::Result<Snapshot>
where
    T: ProcessTable + ?Sized,
{
    let pids = table.list_pids()?;
    let mut snapshot = Snapshot::default();

    for pid in pids {
        let Some(cgroup_info) = table.read_cgroup(pid) else {
            continue;
        };
        let Some(raw_id) = cgroup::extract_container_id(&cgroup_info) else {
            continue;
        };
        match ContainerID::new(raw_id) {
            Ok(container_id) => snapshot.insert(pid, container_id),
            Err(err) => log::warn!("ignoring container of process {}: {}", pid, err),
        }
    }

    log::trace!("built snapshot with {} containerized processes", snapshot.len());
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procfs::testing::{StaticTable, docker};

    fn id(s: &str) -> ContainerID {
        ContainerID::new(s).unwrap()
    }

    #[test]
    fn test_build_snapshot() {
        let table = StaticTable::new([
            (1, "0::/init.scope\n".to_owned()),
            (100, docker("aaa")),
            (
                200,
                "1:name=systemd:/kubepods/burstable/pod1234/bbb\n".to_owned(),
            ),
        ]);

        let snapshot = build_snapshot(&table).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(100), Some(&id("aaa")));
        assert_eq!(snapshot.get(200), Some(&id("bbb")));
        assert!(!snapshot.contains(1));
    }

    #[test]
    fn test_build_snapshot_skips_over_length_ids() {
        let long = "a".repeat(65);
        let table = StaticTable::new([(100, docker(&long)), (101, docker("ok"))]);

        let snapshot = build_snapshot(&table).unwrap();
        assert_eq!(snapshot, Snapshot::from_iter([(101, id("ok"))]));
    }

    #[test]
    fn test_build_snapshot_empty_table() {
        let table = StaticTable::new(Vec::<(u32, String)>::new());
        assert!(build_snapshot(&table).unwrap().is_empty());
    }

    #[test]
    fn test_build_snapshot_unlistable_table() {
        let table = StaticTable::new([(100, docker("aaa"))]);
        table.break_listing();
        assert!(build_snapshot(&table).is_err());
    }

    #[test]
    fn test_build_snapshot_from_procfs() {
        let tempdir = tempfile::tempdir().unwrap();
        for (pid, contents) in [("100", docker("aaa")), ("200", "0::/user.slice\n".to_owned())] {
            let dir = tempdir.path().join(pid);
            std::fs::create_dir(&dir).unwrap();
            std::fs::write(dir.join("cgroup"), contents).unwrap();
        }
        // listed but already gone
        std::fs::create_dir(tempdir.path().join("300")).unwrap();

        let snapshot = build_snapshot(&procfs::ProcFs::new(tempdir.path())).unwrap();
        assert_eq!(snapshot, Snapshot::from_iter([(100, id("aaa"))]));
    }
}
