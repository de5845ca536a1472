//! Running-service detection by port probe.
//!
//! Connects to each known default port on localhost with a short timeout.
//! A port claimed by a single known tool is attributed to that tool; a port
//! shared by several is reported as an unknown service on that port.

use std::collections::{BTreeMap, BTreeSet};
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::time::Duration;

use crate::registry::ToolRegistry;
use crate::signal::{EvidenceKind, EvidenceRecord, EvidenceSource};

const ORIGIN: &str = "port probe";

/// Probe every default port in the registry.
pub fn probe_services(registry: &ToolRegistry, timeout: Duration) -> EvidenceSource {
    let candidates: BTreeSet<u16> = registry
        .iter()
        .flat_map(|(_, entry)| entry.default_ports.iter().copied())
        .collect();

    let open: BTreeSet<u16> = candidates
        .into_iter()
        .filter(|port| is_port_open(*port, timeout))
        .collect();

    tracing::debug!("Open ports among known defaults: {:?}", open);
    services_from_open_ports(registry, &open)
}

/// Attribute open ports to known tools.
pub fn services_from_open_ports(registry: &ToolRegistry, open: &BTreeSet<u16>) -> EvidenceSource {
    let mut claimants: BTreeMap<u16, Vec<&str>> = BTreeMap::new();
    for (key, entry) in registry.iter() {
        for port in &entry.default_ports {
            claimants.entry(*port).or_default().push(key);
        }
    }

    let mut source = EvidenceSource::new(EvidenceKind::RunningServices, ORIGIN);
    for port in open {
        let service = match claimants.get(port).map(Vec::as_slice) {
            Some([only]) => only.to_string(),
            _ => format!("unknown-service-{}", port),
        };
        let mut record = EvidenceRecord::for_service(service).with_method("running_service");
        record.port = Some(*port);
        source.insert(format!("port:{}", port), record);
    }
    source
}

/// Check whether something accepts connections on a local port.
pub fn is_port_open(port: u16, timeout: Duration) -> bool {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    TcpStream::connect_timeout(&addr, timeout).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryEntry;
    use std::net::TcpListener;

    fn registry_with_ports(tools: &[(&str, &[u16])]) -> ToolRegistry {
        let entries = tools
            .iter()
            .map(|(name, ports)| {
                (
                    name.to_string(),
                    RegistryEntry {
                        name: name.to_string(),
                        default_ports: ports.iter().copied().collect(),
                        ..Default::default()
                    },
                )
            })
            .collect();
        ToolRegistry::new(entries)
    }

    #[test]
    fn unique_port_maps_to_tool() {
        let registry = registry_with_ports(&[("streamlit", &[8501]), ("gradio", &[7860])]);
        let open = BTreeSet::from([8501]);
        let source = services_from_open_ports(&registry, &open);
        assert_eq!(source.len(), 1);
        let record = &source.records["port:8501"];
        assert_eq!(record.service.as_deref(), Some("streamlit"));
        assert_eq!(record.port, Some(8501));
    }

    #[test]
    fn shared_port_is_unknown_service() {
        let registry = registry_with_ports(&[("fastapi", &[8000]), ("django", &[8000])]);
        let source = services_from_open_ports(&registry, &BTreeSet::from([8000]));
        assert_eq!(
            source.records["port:8000"].service.as_deref(),
            Some("unknown-service-8000")
        );
    }

    #[test]
    fn probe_finds_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let registry = registry_with_ports(&[("mytool", &[port])]);

        let source = probe_services(&registry, Duration::from_millis(200));
        assert_eq!(
            source.records[&format!("port:{}", port)].service.as_deref(),
            Some("mytool")
        );
    }

    #[test]
    fn closed_port_is_not_open() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        assert!(!is_port_open(port, Duration::from_millis(100)));
    }
}
