//! Property-based tests for address math and partition commands.

use cidr_flow::models::{
    format_address, mask_for, network_address_of, parse_address, NetworkInput, SubnetDescriptor,
};
use cidr_flow::processing::{check_tiling, divide_subnet, join_subnets, Partition};
use proptest::prelude::*;

// Strategy for generating aligned blocks
fn block_strategy(max_prefix: u8) -> impl Strategy<Value = (u32, u8)> {
    (any::<u32>(), 0u8..=max_prefix)
        .prop_map(|(addr, prefix)| (network_address_of(addr, prefix).unwrap(), prefix))
}

#[derive(Debug, Clone)]
enum Step {
    Divide(usize),
    Join(usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..64).prop_map(Step::Divide),
        (0usize..64).prop_map(Step::Join),
    ]
}

proptest! {
    #[test]
    fn test_format_parse_round_trip(addr in any::<u32>()) {
        let text = format_address(addr);
        prop_assert_eq!(parse_address(&text).unwrap(), addr);
        prop_assert_eq!(format_address(parse_address(&text).unwrap()), text);
    }

    #[test]
    fn test_mask_leading_ones(prefix in 0u8..=32) {
        let mask = mask_for(prefix).unwrap();
        prop_assert_eq!(mask.leading_ones(), u32::from(prefix));
        prop_assert_eq!(mask.count_ones(), u32::from(prefix));
    }

    #[test]
    fn test_network_plus_host_bits(addr in any::<u32>(), prefix in 0u8..=32) {
        let network = network_address_of(addr, prefix).unwrap();
        let mask = mask_for(prefix).unwrap();
        prop_assert_eq!(network | (!mask & addr), addr);
    }

    #[test]
    fn test_divide_join_inverse((network, prefix) in block_strategy(31)) {
        let d = SubnetDescriptor::build(network, prefix).unwrap();
        let (a, b) = divide_subnet(&d).unwrap();
        let parent = join_subnets(&a, &b).unwrap();
        prop_assert_eq!(parent.network_address(), d.network_address());
        prop_assert_eq!(parent.prefix_length(), d.prefix_length());
        prop_assert_ne!(parent.id(), d.id());
    }

    #[test]
    fn test_invalid_address_independent_of_prefix(
        octet in 256u32..1000,
        p1 in "[0-9]{1,2}",
        p2 in "[a-z0-9]{0,3}",
    ) {
        let text = format!("10.0.0.{octet}");
        let e1 = NetworkInput::new(&text, &p1).validate().unwrap_err();
        let e2 = NetworkInput::new(&text, &p2).validate().unwrap_err();
        prop_assert!(e1.address.is_some());
        prop_assert_eq!(e1.address, e2.address);
    }

    #[test]
    fn test_partition_invariants(
        (network, prefix) in block_strategy(24),
        steps in prop::collection::vec(step_strategy(), 0..40),
    ) {
        let mut partition = Partition::new(network, prefix).unwrap();
        for step in steps {
            let len = partition.len();
            let next = match step {
                Step::Divide(i) => partition.divide(partition.subnets()[i % len].id()),
                Step::Join(i) if len > 1 => {
                    let i = i % (len - 1);
                    partition.join(partition.subnets()[i].id(), partition.subnets()[i + 1].id())
                }
                Step::Join(_) => continue,
            };
            if let Ok(next) = next {
                partition = next;
            }
            prop_assert!(check_tiling(partition.subnets(), partition.origin()).is_ok());
        }
    }
}
