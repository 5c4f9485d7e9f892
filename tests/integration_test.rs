//! Integration tests for cidr-flow
//!
//! These tests drive a session the way the interactive loop does and check
//! the published snapshot after every command.

use cidr_flow::models::{format_address, parse_address};
use cidr_flow::processing::{check_tiling, join_candidate_at, levels};
use cidr_flow::{CidrError, NetworkInput, Session};

fn cidrs(session: &Session) -> Vec<String> {
    session
        .snapshot()
        .iter()
        .map(|s| s.cidr().to_string())
        .collect()
}

#[test]
fn test_divide_slash_16_once() {
    let mut session = Session::start(&NetworkInput::new("192.168.0.0", "16")).unwrap();
    let root = session.snapshot()[0].id();
    session.divide(root).unwrap();

    let subnets = session.snapshot();
    assert_eq!(subnets.len(), 2);
    assert_eq!(subnets[0].cidr().to_string(), "192.168.0.0/17");
    assert_eq!(subnets[0].usable_hosts(), 32766);
    assert_eq!(subnets[0].first_usable_text(), "192.168.0.1");
    assert_eq!(subnets[0].last_usable_text(), "192.168.127.254");
    assert_eq!(subnets[1].cidr().to_string(), "192.168.128.0/17");
}

#[test]
fn test_slash_31_divides_into_hosts() {
    let mut session = Session::start(&NetworkInput::new("10.0.0.0", "31")).unwrap();
    let block = &session.snapshot()[0];
    assert_eq!(block.usable_hosts(), 2);
    assert_eq!(block.usable_host_range(), "10.0.0.0 - 10.0.0.1");
    assert_eq!(block.host_address_range(), "10.0.0.0 - 10.0.0.1");

    let id = block.id();
    session.divide(id).unwrap();
    assert_eq!(cidrs(&session), vec!["10.0.0.0/32", "10.0.0.1/32"]);
    assert!(session.snapshot().iter().all(|s| s.usable_hosts() == 1));

    let hosts = session.snapshot()[0].id();
    assert!(matches!(
        session.divide(hosts),
        Err(CidrError::NotDivisible(_))
    ));

    let (a, b) = (session.snapshot()[0].id(), session.snapshot()[1].id());
    session.join(a, b).unwrap();
    assert_eq!(cidrs(&session), vec!["10.0.0.0/31"]);
}

#[test]
fn test_join_non_siblings_fails() {
    let mut session = Session::start(&NetworkInput::new("192.168.0.0", "22")).unwrap();
    for row in [0, 0, 2] {
        let id = session.snapshot()[row].id();
        session.divide(id).unwrap();
    }
    assert_eq!(
        cidrs(&session),
        vec![
            "192.168.0.0/24",
            "192.168.1.0/24",
            "192.168.2.0/24",
            "192.168.3.0/24"
        ]
    );

    let (a, c) = (session.snapshot()[0].id(), session.snapshot()[2].id());
    let before = cidrs(&session);
    assert!(matches!(
        session.join(a, c),
        Err(CidrError::NotJoinable(_, _))
    ));
    assert_eq!(cidrs(&session), before);
}

#[test]
fn test_hierarchy_uneven_split() {
    let mut session = Session::start(&NetworkInput::new("192.168.0.0", "16")).unwrap();
    let root = session.snapshot()[0].id();
    session.divide(root).unwrap();
    let upper = session.snapshot()[1].id();
    session.divide(upper).unwrap();

    let subnets = session.snapshot();
    assert_eq!(levels(subnets, 16), vec![18, 17, 16]);

    let top = parse_address("192.168.0.0").unwrap();
    assert!(matches!(
        join_candidate_at(subnets, 16, top),
        Err(CidrError::NoCandidate { level: 16, .. })
    ));

    let upper_block = parse_address("192.168.128.0").unwrap();
    let (a, b) = join_candidate_at(subnets, 17, upper_block).unwrap();
    let pair: Vec<String> = [a, b]
        .iter()
        .map(|id| {
            let s = session.partition().get(*id).unwrap();
            format!("{}/{}", format_address(s.network_address()), s.prefix_length())
        })
        .collect();
    assert_eq!(pair, vec!["192.168.128.0/18", "192.168.192.0/18"]);
}

#[test]
fn test_rename_then_stale_ids() {
    let mut session = Session::start(&NetworkInput::new("172.16.0.0", "12")).unwrap();
    let root = session.snapshot()[0].id();
    session.rename(root, "campus").unwrap();
    assert_eq!(session.snapshot()[0].name(), Some("campus"));
    assert_eq!(session.snapshot()[0].id(), root);

    session.divide(root).unwrap();
    assert!(session.snapshot().iter().all(|s| s.name().is_none()));
    assert_eq!(session.rename(root, "gone"), Err(CidrError::NotFound(root)));
    assert_eq!(session.divide(root), Err(CidrError::NotFound(root)));
}

#[test]
fn test_long_walk_keeps_tiling() {
    let mut session = Session::start(&NetworkInput::new("10.20.30.40", "20")).unwrap();
    assert_eq!(session.origin().to_string(), "10.20.16.0/20");

    // split the first row repeatedly, then merge everything back
    for _ in 0..8 {
        let id = session.snapshot()[0].id();
        session.divide(id).unwrap();
        check_tiling(session.snapshot(), session.origin()).unwrap();
    }
    assert_eq!(session.snapshot().len(), 9);

    while session.snapshot().len() > 1 {
        let (a, b) = (session.snapshot()[0].id(), session.snapshot()[1].id());
        session.join(a, b).unwrap();
        check_tiling(session.snapshot(), session.origin()).unwrap();
    }
    assert_eq!(cidrs(&session), vec!["10.20.16.0/20"]);
}
