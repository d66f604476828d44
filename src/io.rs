//! Whole-file load and save of topology documents.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs;
use std::path::Path;

use crate::topology::Topology;

/// Load a topology from a JSON document file
pub fn load_from_file(path: &Path) -> Result<Topology> {
    info!("Loading topology from: {:?}", path);
    let json = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read topology file '{}'", path.display()))?;
    let topology = Topology::deserialize(&json)
        .wrap_err_with(|| format!("Failed to parse topology file '{}'", path.display()))?;
    info!(
        "Loaded topology '{}' ({} nodes, {} links)",
        topology.name(),
        topology.nodes().len(),
        topology.links().len()
    );
    Ok(topology)
}

/// Save a topology as a JSON document file
pub fn save_to_file(topology: &Topology, path: &Path) -> Result<()> {
    let json = topology.serialize()?;
    fs::write(path, json)
        .wrap_err_with(|| format!("Failed to write topology file '{}'", path.display()))?;
    info!("Saved topology '{}' to {:?}", topology.name(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_roundtrip() {
        let mut topo = Topology::new("disk");
        topo.add_host(None).unwrap();
        topo.add_switch(None).unwrap();
        topo.add_link("h0", "s0", "100mbps", "10ms").unwrap();

        let file = NamedTempFile::new().unwrap();
        save_to_file(&topo, file.path()).unwrap();
        let loaded = load_from_file(file.path()).unwrap();

        assert_eq!(loaded.name(), "disk");
        assert_eq!(loaded.serialize().unwrap(), topo.serialize().unwrap());
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_from_file(Path::new("/definitely/not/here.json")).is_err());
    }
}
