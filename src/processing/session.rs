//! Interactive session state.
//!
//! A [`Session`] is the single owner of the current [`Partition`]. Every
//! command builds the next partition, checks it still tiles the origin block
//! and only then swaps it in. Hosts that share a session across threads must
//! serialize access themselves.

use super::hierarchy::{join_candidate_at, HierarchyIndex};
use super::partition::Partition;
use super::tiling::check_tiling;
use crate::error::Result;
use crate::models::{Address, Cidr, InputErrors, NetworkInput, SubnetDescriptor, SubnetId};
use colored::Colorize;

#[derive(Debug, Clone)]
pub struct Session {
    partition: Partition,
}

impl Session {
    /// Validate the form and start from the block it names.
    pub fn start(input: &NetworkInput) -> std::result::Result<Session, InputErrors> {
        let partition = partition_from_input(input)?;
        log::info!("Session started on {}", partition.origin());
        Ok(Session { partition })
    }

    pub fn from_partition(partition: Partition) -> Session {
        Session { partition }
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Current subnets in canonical order.
    pub fn snapshot(&self) -> &[SubnetDescriptor] {
        self.partition.subnets()
    }

    pub fn origin(&self) -> Cidr {
        self.partition.origin()
    }

    pub fn hierarchy(&self) -> HierarchyIndex {
        HierarchyIndex::build(self.snapshot(), self.origin().prefix)
    }

    pub fn divide(&mut self, id: SubnetId) -> Result<&[SubnetDescriptor]> {
        let next = self.partition.divide(id).map_err(|e| rejected("divide", e))?;
        self.commit(next)
    }

    pub fn join(&mut self, a: SubnetId, b: SubnetId) -> Result<&[SubnetDescriptor]> {
        let next = self.partition.join(a, b).map_err(|e| rejected("join", e))?;
        self.commit(next)
    }

    /// Join the sibling pair under `ancestor` at `level`, as a hierarchy click does.
    pub fn join_at(&mut self, level: u8, ancestor: Address) -> Result<&[SubnetDescriptor]> {
        let (a, b) = join_candidate_at(self.snapshot(), level, ancestor)
            .map_err(|e| rejected("join", e))?;
        self.join(a, b)
    }

    pub fn rename(&mut self, id: SubnetId, name: &str) -> Result<&[SubnetDescriptor]> {
        self.partition
            .rename(id, name)
            .map_err(|e| rejected("rename", e))?;
        log::info!("Renamed {id} to '{}'", name.trim());
        Ok(self.snapshot())
    }

    /// Start over from new form input. Invalid input keeps the current partition.
    pub fn reset(
        &mut self,
        input: &NetworkInput,
    ) -> std::result::Result<&[SubnetDescriptor], InputErrors> {
        let partition = partition_from_input(input).map_err(|errors| {
            log::warn!("{} reset: {errors}", "rejected".on_red());
            errors
        })?;
        log::info!("Session reset to {}", partition.origin());
        self.partition = partition;
        Ok(self.snapshot())
    }

    fn commit(&mut self, next: Partition) -> Result<&[SubnetDescriptor]> {
        check_tiling(next.subnets(), next.origin())?;
        log::info!(
            "Partition of {} now has {} subnets",
            next.origin(),
            next.len()
        );
        self.partition = next;
        Ok(self.snapshot())
    }
}

fn partition_from_input(input: &NetworkInput) -> std::result::Result<Partition, InputErrors> {
    let (address, prefix) = input.validate()?;
    Partition::new(address, prefix).map_err(|e| InputErrors {
        address: None,
        prefix: Some(e),
    })
}

fn rejected(command: &str, err: crate::error::CidrError) -> crate::error::CidrError {
    log::warn!("{} {command}: {err}", "rejected".on_red());
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CidrError;
    use crate::models::parse_address;

    fn cidrs(session: &Session) -> Vec<String> {
        session
            .snapshot()
            .iter()
            .map(|s| s.cidr().to_string())
            .collect()
    }

    #[test]
    fn test_start_normalizes_host_address() {
        let session = Session::start(&NetworkInput::new("192.168.10.20", "16")).unwrap();
        assert_eq!(cidrs(&session), vec!["192.168.0.0/16"]);
        assert_eq!(session.origin().to_string(), "192.168.0.0/16");
    }

    #[test]
    fn test_start_invalid() {
        let errors = Session::start(&NetworkInput::new("192.168.1", "40")).unwrap_err();
        assert!(errors.address.is_some());
        assert!(errors.prefix.is_some());
    }

    #[test]
    fn test_divide_and_join_at() {
        let mut session = Session::start(&NetworkInput::new("192.168.0.0", "16")).unwrap();
        let root = session.snapshot()[0].id();
        session.divide(root).unwrap();
        let second = session.snapshot()[1].id();
        session.divide(second).unwrap();
        assert_eq!(
            cidrs(&session),
            vec!["192.168.0.0/17", "192.168.128.0/18", "192.168.192.0/18"]
        );

        let before = cidrs(&session);
        let err = session.join_at(16, parse_address("192.168.0.0").unwrap());
        assert!(matches!(err, Err(CidrError::NoCandidate { found: 1, .. })));
        assert_eq!(cidrs(&session), before);

        session
            .join_at(17, parse_address("192.168.128.0").unwrap())
            .unwrap();
        assert_eq!(cidrs(&session), vec!["192.168.0.0/17", "192.168.128.0/17"]);
        session
            .join_at(16, parse_address("192.168.0.0").unwrap())
            .unwrap();
        assert_eq!(cidrs(&session), vec!["192.168.0.0/16"]);
    }

    #[test]
    fn test_rename_survives_other_commands() {
        let mut session = Session::start(&NetworkInput::new("10.0.0.0", "24")).unwrap();
        session.divide(session.snapshot()[0].id()).unwrap();
        let first = session.snapshot()[0].id();
        session.rename(first, "servers").unwrap();
        session.divide(session.snapshot()[1].id()).unwrap();
        assert_eq!(session.snapshot()[0].name(), Some("servers"));
        assert_eq!(session.snapshot()[0].id(), first);
    }

    #[test]
    fn test_join_clears_name() {
        let mut session = Session::start(&NetworkInput::new("10.0.0.0", "24")).unwrap();
        session.divide(session.snapshot()[0].id()).unwrap();
        let (a, b) = (session.snapshot()[0].id(), session.snapshot()[1].id());
        session.rename(a, "left").unwrap();
        session.rename(b, "right").unwrap();
        session.join(a, b).unwrap();
        assert!(session.snapshot()[0].name().is_none());
    }

    #[test]
    fn test_reset() {
        let mut session = Session::start(&NetworkInput::new("10.0.0.0", "24")).unwrap();
        assert!(session.reset(&NetworkInput::new("bad", "24")).is_err());
        assert_eq!(cidrs(&session), vec!["10.0.0.0/24"]);
        session.reset(&NetworkInput::new("172.16.5.1", "12")).unwrap();
        assert_eq!(cidrs(&session), vec!["172.16.0.0/12"]);
    }

    #[test]
    fn test_hierarchy_from_session() {
        let mut session = Session::start(&NetworkInput::new("10.0.0.0", "8")).unwrap();
        session.divide(session.snapshot()[0].id()).unwrap();
        let index = session.hierarchy();
        assert_eq!(index.levels(), &[9, 8]);
        assert!(index.candidate(8, parse_address("10.0.0.0").unwrap()).is_some());
    }
}
