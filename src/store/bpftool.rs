use std::path::{Path, PathBuf};

use crate::container::ContainerID;

use super::encoding::{encode_key, encode_value, hex_args};
use super::{Error, MapSpec, Operation, PidMapStore, Result};

/// What `bpftool map delete` reports when the key is not in the map.
const MISSING_KEY: &str = "delete failed: No such file or directory";

/// A pinned BPF hash map, driven through the `bpftool` command-line utility.
#[derive(Debug, Clone)]
pub struct Bpftool {
    program: PathBuf,
    pin_path: PathBuf,
    spec: MapSpec,
}

impl Bpftool {
    /// Creates a store for the map pinned at `pin_path`, using the `bpftool`
    /// executable at `program` (looked up in `PATH` if it is a bare name).
    pub fn new(program: impl Into<PathBuf>, pin_path: impl Into<PathBuf>, spec: MapSpec) -> Self {
        Self {
            program: program.into(),
            pin_path: pin_path.into(),
            spec,
        }
    }

    pub fn pin_path(&self) -> &Path {
        &self.pin_path
    }

    fn create_args(&self) -> Vec<String> {
        vec![
            "map".to_owned(),
            "create".to_owned(),
            self.pin_path.display().to_string(),
            "type".to_owned(),
            "hash".to_owned(),
            "key".to_owned(),
            self.spec.key_size.to_string(),
            "value".to_owned(),
            self.spec.value_size.to_string(),
            "entries".to_owned(),
            self.spec.max_entries.to_string(),
            "name".to_owned(),
            self.spec.name.clone(),
            "flags".to_owned(),
            self.spec.flags.to_string(),
        ]
    }

    fn entry_args(&self, subcommand: &str, pid: u32) -> Vec<String> {
        let mut args = vec![
            "map".to_owned(),
            subcommand.to_owned(),
            "pinned".to_owned(),
            self.pin_path.display().to_string(),
            "key".to_owned(),
            "hex".to_owned(),
        ];
        args.extend(hex_args(&encode_key(pid)));
        args
    }

    async fn run(&self, op: Operation, args: Vec<String>) -> Result<()> {
        log::trace!("running {} {}", self.program.display(), args.join(" "));
        let output = tokio::process::Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: self.program.clone(),
                op,
                source,
            })?;

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(Error::Command {
                op,
                status: output.status,
                output: combined.trim().to_owned(),
            });
        }

        Ok(())
    }
}

impl PidMapStore for Bpftool {
    fn spec(&self) -> &MapSpec {
        &self.spec
    }

    async fn create(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.pin_path).await {
            Ok(()) => log::debug!("removed existing pin `{}`", self.pin_path.display()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(Error::RemovePin {
                    path: self.pin_path.clone(),
                    source,
                });
            }
        }

        self.run(Operation::Create, self.create_args()).await
    }

    async fn delete(&self, pid: u32) -> Result<()> {
        match self.run(Operation::Delete, self.entry_args("delete", pid)).await {
            // Already gone, which is the state a removal asks for.
            Err(Error::Command { output, .. }) if output.contains(MISSING_KEY) => {
                log::debug!("pid {} was not in map `{}`", pid, self.pin_path.display());
                Ok(())
            }
            result => result,
        }
    }

    async fn upsert(&self, pid: u32, container_id: &ContainerID) -> Result<()> {
        let value = encode_value(container_id, self.spec.value_size)?;
        let mut args = self.entry_args("update", pid);
        args.push("value".to_owned());
        args.push("hex".to_owned());
        args.extend(hex_args(&value));

        self.run(Operation::Upsert, args).await
    }
}
